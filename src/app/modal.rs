//! Detail windows for the selected project and certificate.
//!
//! The cards come from `SceneSession::modal()`; this module only lays them
//! out. A dimmed backdrop sits between the canvas and the windows and closes
//! everything when clicked.

use egui::{Color32, RichText};

use portfolio_scene::modal::{CertificateCard, OutboundLink, ProjectCard};
use portfolio_scene::render::palette;
use portfolio_scene::scene::SceneEvent;

use super::scene_view::color;
use super::PortfolioApp;

impl PortfolioApp {
    pub fn draw_modals(&mut self, ctx: &egui::Context) {
        let Some(view) = self.session.as_ref().map(|s| s.modal()) else {
            return;
        };
        if !view.is_open() {
            return;
        }

        let mut events = Vec::new();

        let screen = ctx.screen_rect();
        egui::Area::new(egui::Id::new("modal_backdrop"))
            .order(egui::Order::Middle)
            .fixed_pos(screen.min)
            .show(ctx, |ui| {
                let response = ui.allocate_rect(screen, egui::Sense::click());
                ui.painter().rect_filled(screen, 0.0, Color32::from_black_alpha(140));
                if response.clicked() {
                    events.push(SceneEvent::ModalBackdropClicked);
                }
            });

        if let Some(card) = &view.project {
            let mut open = true;
            egui::Window::new(RichText::new(&card.title).strong())
                .id(egui::Id::new("project_modal"))
                .order(egui::Order::Foreground)
                .open(&mut open)
                .collapsible(false)
                .resizable(false)
                .default_width(420.0)
                .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
                .show(ctx, |ui| project_body(ui, card));
            if !open {
                events.push(SceneEvent::ModalCloseClicked);
            }
        }

        if let Some(card) = &view.certificate {
            let mut open = true;
            // Offset so both windows stay visible when two axes are selected
            let offset = if view.project.is_some() { 220.0 } else { 0.0 };
            egui::Window::new(RichText::new(&card.title).strong())
                .id(egui::Id::new("certificate_modal"))
                .order(egui::Order::Foreground)
                .open(&mut open)
                .collapsible(false)
                .resizable(false)
                .default_width(320.0)
                .anchor(egui::Align2::CENTER_CENTER, egui::vec2(offset, 0.0))
                .show(ctx, |ui| certificate_body(ui, card));
            if !open {
                events.push(SceneEvent::ModalCloseClicked);
            }
        }

        for event in events {
            self.send(event);
        }
    }
}

fn link_row(ui: &mut egui::Ui, links: &[OutboundLink]) {
    if links.is_empty() {
        return;
    }
    ui.horizontal_wrapped(|ui| {
        for link in links {
            ui.hyperlink_to(link.kind.label(), &link.url);
        }
    });
}

pub fn project_body(ui: &mut egui::Ui, card: &ProjectCard) {
    ui.horizontal(|ui| {
        ui.label(
            RichText::new(card.badge.label())
                .color(color(palette::classification_color(card.badge)))
                .strong(),
        );
        ui.weak(card.group.label());
    });
    if let Some(preview) = &card.preview {
        ui.weak(format!("preview: {}", preview));
    }
    if !card.description.is_empty() {
        ui.add_space(4.0);
        ui.label(&card.description);
    }
    if !card.tool_tags.is_empty() {
        ui.add_space(4.0);
        ui.horizontal_wrapped(|ui| {
            for tag in &card.tool_tags {
                ui.label(RichText::new(tag).monospace().small());
            }
        });
    }
    ui.add_space(6.0);
    link_row(ui, &card.links);

    if !card.versions.is_empty() {
        egui::CollapsingHeader::new(format!("Versions ({})", card.versions.len()))
            .id_salt(("versions", card.id.0))
            .show(ui, |ui| {
                for v in &card.versions {
                    ui.label(RichText::new(format!("{}  {}", v.version, v.date)).strong());
                    if !v.description.is_empty() {
                        ui.label(&v.description);
                    }
                }
            });
    }
    if !card.collaborators.is_empty() {
        ui.add_space(4.0);
        ui.horizontal_wrapped(|ui| {
            ui.weak("With");
            for c in &card.collaborators {
                match &c.profile {
                    Some(link) => {
                        ui.hyperlink_to(&c.name, &link.url);
                    }
                    None => {
                        ui.label(&c.name);
                    }
                }
            }
        });
    }
}

pub fn certificate_body(ui: &mut egui::Ui, card: &CertificateCard) {
    if let Some(issuer) = &card.issuer {
        ui.label(RichText::new(issuer).strong());
    }
    if let Some(date) = &card.date {
        ui.weak(date);
    }
    if let Some(image) = &card.image {
        ui.weak(format!("image: {}", image));
    }
    if let Some(link) = &card.link {
        ui.add_space(4.0);
        ui.hyperlink_to(link.kind.label(), &link.url);
    }
}
