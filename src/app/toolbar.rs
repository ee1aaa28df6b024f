//! Toolbar rendering for `PortfolioApp`.
//!
//! Draws the Dev/Creative switch, the world selector, the category filter,
//! the day/night toggle and a camera reset button.

use portfolio_scene::catalogue::{CategoryFilter, Classification};
use portfolio_scene::render::PresentationMode;
use portfolio_scene::scene::{LayoutVariant, SceneEvent};

use super::PortfolioApp;

impl PortfolioApp {
    /// Render the top toolbar strip.
    pub fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.add_space(4.0);

            // Presentation mode
            for mode in [PresentationMode::Dev, PresentationMode::Creative] {
                if ui.selectable_label(self.mode == mode, mode.label()).clicked() {
                    self.set_mode(mode);
                }
            }
            ui.separator();

            let creative = self.mode == PresentationMode::Creative && self.fallback.is_none();

            // World selector
            let mut variant = self.variant;
            ui.add_enabled_ui(creative, |ui| {
                egui::ComboBox::from_id_salt("world")
                    .selected_text(variant.label())
                    .show_ui(ui, |ui| {
                        for v in LayoutVariant::ALL {
                            ui.selectable_value(&mut variant, v, v.label());
                        }
                    });
            });
            self.set_variant(variant);

            // Category filter: dims, never hides
            let current = self.session.as_ref().map(|s| s.filter()).unwrap_or_default();
            let mut filter = current;
            ui.add_enabled_ui(creative && self.session.is_some(), |ui| {
                egui::ComboBox::from_id_salt("filter")
                    .selected_text(filter.label())
                    .show_ui(ui, |ui| {
                        ui.selectable_value(&mut filter, CategoryFilter::All, "All");
                        for class in Classification::ALL {
                            ui.selectable_value(&mut filter, CategoryFilter::Only(class), class.label());
                        }
                        ui.selectable_value(&mut filter, CategoryFilter::Certificates, "Certificates");
                    });
            });
            if filter != current {
                self.send(SceneEvent::SetFilter(filter));
            }

            if ui
                .add_enabled(creative, egui::Button::new("\u{27F2}"))
                .on_hover_text("Reset camera")
                .clicked()
            {
                self.send(SceneEvent::ResetCamera);
            }

            // Day / night toggle
            let theme_label = if self.is_night { "\u{263E}" } else { "\u{2600}" };
            if ui.button(theme_label).on_hover_text("Toggle day / night").clicked() {
                self.toggle_theme();
            }
        });
    }
}
