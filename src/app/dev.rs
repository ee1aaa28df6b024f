//! Dev Mode listing and the Creative Mode fallback.
//!
//! Dev Mode shows the same catalogue as the scene as plain scrolling cards,
//! grouped the way the catalogue groups them. It needs no graphics
//! capability, so it is also what the fallback view points to.

use egui::RichText;

use portfolio_scene::catalogue::{CertificateId, ProjectGroup, ProjectId};
use portfolio_scene::modal::present;
use portfolio_scene::render::capability::FallbackView;
use portfolio_scene::render::PresentationMode;
use portfolio_scene::scene::SelectionState;

use super::modal::{certificate_body, project_body};
use super::PortfolioApp;

impl PortfolioApp {
    pub fn draw_dev(&mut self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.add_space(12.0);
                ui.vertical_centered(|ui| {
                    ui.set_max_width(720.0);
                    ui.heading("Projects");
                    for group in ProjectGroup::ALL {
                        let ids: Vec<ProjectId> = self
                            .catalogue
                            .projects
                            .iter()
                            .enumerate()
                            .filter(|(_, p)| p.group == group)
                            .map(|(i, _)| ProjectId(i))
                            .collect();
                        if ids.is_empty() {
                            continue;
                        }
                        ui.add_space(8.0);
                        ui.label(RichText::new(group.label()).size(18.0).strong());
                        for id in ids {
                            let state = SelectionState { project: Some(id), certificate: None };
                            if let Some(card) = present(&state, &self.catalogue).project {
                                egui::Frame::group(ui.style()).show(ui, |ui| {
                                    ui.set_width(ui.available_width());
                                    ui.label(RichText::new(&card.title).size(16.0).strong());
                                    project_body(ui, &card);
                                });
                            }
                        }
                    }

                    ui.add_space(16.0);
                    ui.heading("Certificates");
                    for i in 0..self.catalogue.certificates.len() {
                        let state = SelectionState { project: None, certificate: Some(CertificateId(i)) };
                        if let Some(card) = present(&state, &self.catalogue).certificate {
                            egui::Frame::group(ui.style()).show(ui, |ui| {
                                ui.set_width(ui.available_width());
                                ui.label(RichText::new(&card.title).strong());
                                certificate_body(ui, &card);
                            });
                        }
                    }

                    if self.catalogue.is_empty() {
                        ui.weak("The catalogue is empty.");
                    }
                    ui.add_space(24.0);
                });
            });
    }

    /// Static replacement for the scene.
    pub fn draw_fallback(&mut self, ui: &mut egui::Ui, view: &FallbackView) {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.3);
            ui.heading(view.title);
            ui.add_space(8.0);
            ui.label(view.message);
            ui.add_space(4.0);
            ui.weak(&view.cause);
            ui.add_space(12.0);
            if ui.button(view.suggestion).clicked() {
                self.set_mode(PresentationMode::Dev);
            }
        });
    }
}
