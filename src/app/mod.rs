//! `PortfolioApp`: the top-level egui application state.
//!
//! This module declares the `PortfolioApp` struct, its constructor and the
//! frame loop. Drawing is split across the sibling sub-modules:
//!
//! - `toolbar`   : mode, world, theme and category controls
//! - `scene_view`: Creative Mode canvas: input → `SceneEvent`, projection, painting
//! - `modal`     : project / certificate detail windows
//! - `dev`       : Dev Mode listing and the static fallback

pub mod dev;
pub mod modal;
pub mod scene_view;
pub mod toolbar;

use portfolio_scene::catalogue::Catalogue;
use portfolio_scene::config::SceneConfig;
use portfolio_scene::mobile::touch::GestureRecognizer;
use portfolio_scene::mobile::{DeviceTier, PointerSource};
use portfolio_scene::render::capability::{isolate, FallbackView, GraphicsCapability, SceneError};
use portfolio_scene::render::PresentationMode;
use portfolio_scene::scene::session::SceneKey;
use portfolio_scene::scene::{LayoutVariant, SceneEvent, SceneSession, ThemeContext};

// ─── Application state ───────────────────────────────────────────────────────

pub struct PortfolioApp {
    pub catalogue: Catalogue,
    pub config: SceneConfig,
    pub mode: PresentationMode,
    pub variant: LayoutVariant,
    pub is_night: bool,
    /// The mounted scene; `None` in Dev Mode or after a failure
    pub session: Option<SceneSession>,
    /// Set once the 3D view has failed; Creative Mode then shows this instead
    pub fallback: Option<FallbackView>,
    pub gestures: GestureRecognizer,
    /// While touch drives the canvas, emulated mouse events are ignored
    pub pointer_source: PointerSource,
    pub last_frame_time: Option<f64>,
}

impl PortfolioApp {
    pub fn new(
        catalogue: Catalogue,
        config: SceneConfig,
        capability: Result<GraphicsCapability, SceneError>,
    ) -> Self {
        let fallback = match capability {
            Ok(cap) => {
                log::info!("creative mode available on {} ({})", cap.adapter, cap.backend);
                None
            }
            Err(e) => {
                log::warn!("creative mode unavailable: {}", e);
                Some(FallbackView::from_error(&e))
            }
        };
        Self {
            catalogue,
            config,
            mode: PresentationMode::default(),
            variant: LayoutVariant::default(),
            is_night: true,
            session: None,
            fallback,
            gestures: GestureRecognizer::new(),
            pointer_source: PointerSource::default(),
            last_frame_time: None,
        }
    }

    /// Mount the current world for a canvas `width` logical pixels wide.
    /// Construction runs behind the isolating boundary.
    pub fn mount_scene(&mut self, width: f32) {
        if self.fallback.is_some() {
            return;
        }
        let catalogue = self.catalogue.clone();
        let config = self.config.clone();
        let theme = ThemeContext::new(self.is_night, DeviceTier::from_viewport_width(width));
        let variant = self.variant;
        match isolate(move || SceneSession::mount(catalogue, variant, theme, config, None)) {
            Ok(session) => {
                self.session = Some(session);
                self.last_frame_time = None;
            }
            Err(e) => self.fallback = Some(FallbackView::from_error(&e)),
        }
    }

    /// Drop the scene; it is rebuilt lazily by the next Creative frame.
    pub fn unmount_scene(&mut self) {
        self.session = None;
        self.gestures.cancel();
    }

    pub fn set_variant(&mut self, variant: LayoutVariant) {
        if variant != self.variant {
            self.variant = variant;
            self.unmount_scene();
        }
    }

    pub fn set_mode(&mut self, mode: PresentationMode) {
        if mode != self.mode {
            log::info!("presentation → {}", mode.label());
            self.mode = mode;
            if mode == PresentationMode::Dev {
                self.unmount_scene();
            }
        }
    }

    pub fn toggle_theme(&mut self) {
        self.is_night = !self.is_night;
        if let Some(session) = self.session.as_mut() {
            session.dispatch(SceneEvent::ToggleTheme);
        }
    }

    /// Route an event into the live session, if any.
    pub fn send(&mut self, event: SceneEvent) -> bool {
        self.session.as_mut().map_or(false, |s| s.dispatch(event))
    }
}

impl eframe::App for PortfolioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply dark/light visuals
        if self.is_night {
            ctx.set_visuals(egui::Visuals::dark());
        } else {
            ctx.set_visuals(egui::Visuals::light());
        }

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.send(SceneEvent::Key(SceneKey::Escape));
        }

        // Top toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });

        // Main content area
        let ctx_clone = ctx.clone();
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| match self.mode {
                PresentationMode::Dev => self.draw_dev(ui),
                PresentationMode::Creative => match self.fallback.clone() {
                    Some(view) => self.draw_fallback(ui, &view),
                    None => self.draw_scene(ui, &ctx_clone),
                },
            });

        if self.mode == PresentationMode::Creative {
            self.draw_modals(ctx);
        }
    }
}
