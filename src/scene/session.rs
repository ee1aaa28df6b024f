//! Scene session: one mounted scene from mount to unmount.
//!
//! Lifecycle:
//!   mount()    layout → entities → ambient systems → camera framing
//!   tick(dt)   elapsed time advances; hosts update before their moons
//!   dispatch() pointer/key/window events routed into entities and selection
//!   drop       unmount (logged)

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::catalogue::{classify, CategoryFilter, Catalogue};
use crate::config::{CameraConfig, SceneConfig};
use crate::math;
use crate::mobile::DeviceTier;
use crate::modal::{self, ModalView};
use crate::render::camera::OrbitCamera;

use super::ambient::AmbientSystem;
use super::entity::{Propagation, SceneEntity};
use super::layout::{layout, Layout, SlotBinding};
use super::selection::{SelectionController, SelectionState};
use super::{LayoutVariant, ThemeContext};

/// Smallest on-screen pick radius, so distant moons stay clickable.
pub const MIN_HIT_PX: f32 = 12.0;

/// Longest frame step; a stalled host resumes without a jump.
const MAX_DT: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneKey {
    Escape,
    Other,
}

/// Input the host forwards to the session. Positions are viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneEvent {
    PointerMoved { pos: [f32; 2] },
    PointerLeft,
    Click { pos: [f32; 2] },
    Key(SceneKey),
    ModalBackdropClicked,
    ModalCloseClicked,
    /// Orbit by a drag delta in pixels
    Drag { dx: f32, dy: f32 },
    /// Multiply camera distance (< 1 zooms in)
    Zoom { factor: f32 },
    Resize { width: f32, height: f32 },
    ToggleTheme,
    SetFilter(CategoryFilter),
    ResetCamera,
}

pub struct SceneSession {
    catalogue: Catalogue,
    variant: LayoutVariant,
    theme: ThemeContext,
    filter: CategoryFilter,
    config: SceneConfig,
    layout: Layout,
    entities: Vec<SceneEntity>,
    ambient: AmbientSystem,
    selection: SelectionController,
    camera: OrbitCamera,
    camera_home_distance: f32,
    hovered: Option<usize>,
    viewport: [f32; 2],
    elapsed: f32,
    seed: u64,
}

fn frame_camera(variant: LayoutVariant, device: DeviceTier, cfg: &CameraConfig) -> (OrbitCamera, f32) {
    let (start, polar) = match variant {
        LayoutVariant::Orbital => (cfg.orbital_start, cfg.space_polar),
        LayoutVariant::Ring => (cfg.ring_start, cfg.ground_polar),
        LayoutVariant::Grid => (cfg.grid_start, cfg.ground_polar),
    };
    let mut camera = OrbitCamera::looking_at(start, math::ORIGIN)
        .with_distance_bounds(cfg.min_distance, cfg.max_distance)
        .with_polar_bounds(polar[0], polar[1])
        .with_auto_rotate(cfg.auto_rotate)
        .with_fov_deg(cfg.fov_deg);
    let home = camera.distance;
    if device.is_mobile() {
        camera.reframe(home, cfg.mobile_distance_factor);
    }
    (camera, home)
}

impl SceneSession {
    /// Build a scene for `catalogue`. `seed` overrides the configured seed;
    /// with neither, every mount is different.
    pub fn mount(
        catalogue: Catalogue,
        variant: LayoutVariant,
        theme: ThemeContext,
        config: SceneConfig,
        seed: Option<u64>,
    ) -> Self {
        let config = config.sanitized();
        let seed = seed.or(config.seed).unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);
        let layout = layout(
            &catalogue.projects,
            &catalogue.certificates,
            variant,
            theme.device,
            &config,
            &mut rng,
        );

        let entities: Vec<SceneEntity> = layout
            .slots
            .iter()
            .map(|slot| {
                let (class, label) = match slot.binding {
                    SlotBinding::Project(id) => match catalogue.project(id) {
                        Some(p) => (Some(classify(p)), p.title.clone()),
                        None => (None, String::new()),
                    },
                    SlotBinding::Certificate(id) => {
                        (None, catalogue.certificate(id).map(|c| c.title.clone()).unwrap_or_default())
                    }
                    SlotBinding::Filler => (None, String::new()),
                };
                SceneEntity::new(slot.clone(), class, label, variant, &config.entity)
            })
            .collect();

        let ambient =
            AmbientSystem::build(&layout, config.grid.spacing, theme.device, &config.ambient, seed);
        let (camera, camera_home_distance) = frame_camera(variant, theme.device, &config.camera);

        log::info!(
            "scene mounted: {} ({} entities, {:?}, night={}, seed={})",
            variant.label(),
            entities.len(),
            theme.device,
            theme.is_night,
            seed
        );

        Self {
            catalogue,
            variant,
            theme,
            filter: CategoryFilter::All,
            config,
            layout,
            entities,
            ambient,
            selection: SelectionController::new(),
            camera,
            camera_home_distance,
            hovered: None,
            viewport: [1280.0, 800.0],
            elapsed: 0.0,
            seed,
        }
    }

    // ── Accessors ──

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }
    pub fn variant(&self) -> LayoutVariant {
        self.variant
    }
    pub fn theme(&self) -> ThemeContext {
        self.theme
    }
    pub fn filter(&self) -> CategoryFilter {
        self.filter
    }
    pub fn layout(&self) -> &Layout {
        &self.layout
    }
    pub fn entities(&self) -> &[SceneEntity] {
        &self.entities
    }
    pub fn ambient(&self) -> &AmbientSystem {
        &self.ambient
    }
    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }
    pub fn selection(&self) -> SelectionState {
        self.selection.state()
    }
    pub fn hovered(&self) -> Option<&SceneEntity> {
        self.hovered.and_then(|i| self.entities.get(i))
    }
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
    pub fn seed(&self) -> u64 {
        self.seed
    }
    /// The configuration after repair at mount.
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }
    pub fn viewport(&self) -> [f32; 2] {
        self.viewport
    }

    /// Detail cards for the current selection.
    pub fn modal(&self) -> ModalView {
        modal::present(&self.selection.state(), &self.catalogue)
    }

    fn is_selected(sel: &SelectionState, binding: SlotBinding) -> bool {
        match binding {
            SlotBinding::Project(id) => sel.project == Some(id),
            SlotBinding::Certificate(id) => sel.certificate == Some(id),
            SlotBinding::Filler => false,
        }
    }

    // ── Frame ──

    /// Apply one frame of input, then advance by `dt`.
    pub fn frame(&mut self, events: impl IntoIterator<Item = SceneEvent>, dt: f32) {
        for event in events {
            self.dispatch(event);
        }
        self.tick(dt);
    }

    pub fn tick(&mut self, dt: f32) {
        let dt = dt.clamp(0.0, MAX_DT);
        self.elapsed += dt;
        let sel = self.selection.state();

        // Layout emits planets before moons, so hosts are already updated.
        for i in 0..self.entities.len() {
            let host_position = self.entities[i]
                .host()
                .and_then(|h| self.entities.get(h))
                .map(|h| h.state.position);
            let selected = Self::is_selected(&sel, self.entities[i].binding());
            self.entities[i].update(self.elapsed, dt, selected, host_position);
        }

        self.ambient.update(self.elapsed, dt, self.theme);
        self.camera.update(dt, !sel.is_empty());
    }

    // ── Hit testing ──

    /// Entities under `pos`, nearest first.
    pub fn hits(&self, pos: [f32; 2]) -> Vec<usize> {
        let mut hits: Vec<(f32, usize)> = self
            .entities
            .iter()
            .enumerate()
            .filter_map(|(i, e)| {
                let p = self.camera.project(e.anchor(), self.viewport)?;
                let r = (e.hit_radius() * p.pixels_per_unit).max(MIN_HIT_PX);
                let dx = p.screen[0] - pos[0];
                let dy = p.screen[1] - pos[1];
                (dx * dx + dy * dy <= r * r).then_some((p.depth, i))
            })
            .collect();
        hits.sort_by(|a, b| a.0.total_cmp(&b.0));
        hits.into_iter().map(|(_, i)| i).collect()
    }

    /// Front-most interactive entity under `pos`.
    pub fn hit_test(&self, pos: [f32; 2]) -> Option<usize> {
        self.hits(pos).into_iter().find(|&i| self.entities[i].is_interactive())
    }

    // ── Events ──

    /// Route one event. Returns true when something visible changed.
    pub fn dispatch(&mut self, event: SceneEvent) -> bool {
        match event {
            SceneEvent::PointerMoved { pos } => self.set_hover(self.hit_test(pos)),
            SceneEvent::PointerLeft => self.set_hover(None),
            SceneEvent::Click { pos } => self.click(pos),
            SceneEvent::Key(SceneKey::Escape)
            | SceneEvent::ModalBackdropClicked
            | SceneEvent::ModalCloseClicked => self.selection.close_all(),
            SceneEvent::Key(SceneKey::Other) => false,
            SceneEvent::Drag { dx, dy } => {
                self.camera.orbit(dx, dy, self.config.camera.drag_sensitivity);
                true
            }
            SceneEvent::Zoom { factor } => {
                let before = self.camera.distance;
                self.camera.zoom(factor);
                self.camera.distance != before
            }
            SceneEvent::Resize { width, height } => self.resize(width, height),
            SceneEvent::ToggleTheme => {
                self.theme.is_night = !self.theme.is_night;
                log::info!("theme → {}", if self.theme.is_night { "night" } else { "day" });
                true
            }
            SceneEvent::SetFilter(filter) => {
                let changed = filter != self.filter;
                self.filter = filter;
                changed
            }
            SceneEvent::ResetCamera => {
                self.camera.reset();
                true
            }
        }
    }

    fn set_hover(&mut self, target: Option<usize>) -> bool {
        if target == self.hovered {
            return false;
        }
        if let Some(old) = self.hovered.and_then(|i| self.entities.get_mut(i)) {
            old.pointer_leave();
        }
        if let Some(new) = target.and_then(|i| self.entities.get_mut(i)) {
            new.pointer_enter();
        }
        self.hovered = target;
        true
    }

    fn click(&mut self, pos: [f32; 2]) -> bool {
        // An open modal covers the canvas: the click lands on its backdrop.
        if !self.selection.state().is_empty() {
            return self.selection.close_all();
        }
        let hits = self.hits(pos);
        let selection = &mut self.selection;
        let mut changed = false;
        let mut on_select = |binding: SlotBinding| {
            changed |= match binding {
                SlotBinding::Project(id) => selection.select_project(id),
                SlotBinding::Certificate(id) => selection.select_certificate(id),
                SlotBinding::Filler => false,
            };
        };
        for i in hits {
            if self.entities[i].click(&mut on_select) == Propagation::Stop {
                break;
            }
        }
        changed
    }

    fn resize(&mut self, width: f32, height: f32) -> bool {
        if !(width > 0.0 && height > 0.0) {
            return false;
        }
        self.viewport = [width, height];
        let device = DeviceTier::from_viewport_width(width);
        if device != self.theme.device {
            self.theme.device = device;
            self.ambient.set_device(device);
            let factor = device.pick(self.config.camera.mobile_distance_factor, 1.0);
            self.camera.reframe(self.camera_home_distance, factor);
        }
        true
    }
}

impl Drop for SceneSession {
    fn drop(&mut self) {
        log::info!(
            "scene unmounted: {} ({} entities, {:.1}s)",
            self.variant.label(),
            self.entities.len(),
            self.elapsed
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::{CatalogueEntry, Certificate, ProjectId};
    use crate::scene::EntityKind;

    const DT: f32 = 1.0 / 60.0;

    fn catalogue(p: usize, c: usize) -> Catalogue {
        Catalogue::new(
            (0..p).map(|i| CatalogueEntry::new(format!("P{}", i), &["Rust"])).collect(),
            (0..c).map(|i| Certificate::new(format!("C{}", i))).collect(),
        )
    }

    fn mount(variant: LayoutVariant) -> SceneSession {
        let mut s = SceneSession::mount(
            catalogue(5, 3),
            variant,
            ThemeContext::new(true, DeviceTier::Desktop),
            SceneConfig::default(),
            Some(7),
        );
        s.dispatch(SceneEvent::Resize { width: 1280.0, height: 800.0 });
        s
    }

    fn screen_of(s: &SceneSession, i: usize) -> Option<[f32; 2]> {
        s.camera().project(s.entities()[i].anchor(), s.viewport()).map(|p| p.screen)
    }

    /// Tick until entity `i` is the front-most hit at its own centre.
    fn wait_until_clickable(s: &mut SceneSession, i: usize) -> [f32; 2] {
        for _ in 0..1200 {
            s.tick(DT);
            if let Some(pos) = screen_of(s, i) {
                if s.hit_test(pos) == Some(i) {
                    return pos;
                }
            }
        }
        panic!("entity {} never became clickable", i);
    }

    #[test]
    fn test_end_to_end_orbital_click_and_escape() {
        let mut s = mount(LayoutVariant::Orbital);
        assert_eq!(s.entities().len(), 8);
        let hosts: Vec<_> = s
            .entities()
            .iter()
            .filter(|e| e.kind == EntityKind::Moon)
            .map(|e| e.host())
            .collect();
        assert_eq!(hosts, vec![Some(0), Some(1), Some(2)]);

        let planet2 = s
            .layout()
            .slot_of(SlotBinding::Project(ProjectId(2)))
            .unwrap();
        let pos = wait_until_clickable(&mut s, planet2);
        assert!(s.dispatch(SceneEvent::Click { pos }));
        assert_eq!(s.selection().project, Some(ProjectId(2)));

        let view = s.modal();
        assert_eq!(view.project.as_ref().map(|p| p.title.as_str()), Some("P2"));
        assert!(view.certificate.is_none());

        // Emphasis follows selection.
        for _ in 0..120 {
            s.tick(DT);
        }
        assert!(s.entities()[planet2].state.selected);
        assert!(s.entities()[planet2].state.scale > 1.25);

        assert!(s.dispatch(SceneEvent::Key(SceneKey::Escape)));
        assert!(!s.modal().is_open());
        assert!(s.selection().is_empty());
    }

    #[test]
    fn test_click_empty_space_does_nothing() {
        let mut s = mount(LayoutVariant::Orbital);
        s.tick(DT);
        assert!(!s.dispatch(SceneEvent::Click { pos: [2.0, 2.0] }));
        assert!(s.selection().is_empty());
    }

    #[test]
    fn test_canvas_click_with_open_modal_is_backdrop() {
        let mut s = mount(LayoutVariant::Ring);
        let cottage = s.layout().slot_of(SlotBinding::Project(ProjectId(0))).unwrap();
        let pos = wait_until_clickable(&mut s, cottage);
        s.dispatch(SceneEvent::Click { pos });
        assert!(s.modal().is_open());
        assert!(s.dispatch(SceneEvent::Click { pos }));
        assert!(!s.modal().is_open());
    }

    #[test]
    fn test_modal_close_and_backdrop_events() {
        let mut s = mount(LayoutVariant::Ring);
        let cert = s
            .layout()
            .slot_of(SlotBinding::Certificate(crate::catalogue::CertificateId(1)))
            .unwrap();
        let pos = wait_until_clickable(&mut s, cert);
        s.dispatch(SceneEvent::Click { pos });
        assert_eq!(s.selection().certificate, Some(crate::catalogue::CertificateId(1)));
        assert!(s.dispatch(SceneEvent::ModalCloseClicked));
        assert!(!s.dispatch(SceneEvent::ModalBackdropClicked));
    }

    #[test]
    fn test_hover_single_front_most() {
        let mut s = mount(LayoutVariant::Grid);
        let tower = s.layout().slot_of(SlotBinding::Project(ProjectId(0))).unwrap();
        let pos = wait_until_clickable(&mut s, tower);
        assert!(s.dispatch(SceneEvent::PointerMoved { pos }));
        assert_eq!(s.entities().iter().filter(|e| e.state.hovered).count(), 1);
        assert!(s.entities()[tower].state.hovered);
        assert!(s.dispatch(SceneEvent::PointerLeft));
        assert!(s.entities().iter().all(|e| !e.state.hovered));
    }

    #[test]
    fn test_auto_rotate_pauses_while_selected() {
        let mut s = mount(LayoutVariant::Orbital);
        let planet = s.layout().slot_of(SlotBinding::Project(ProjectId(0))).unwrap();
        let pos = wait_until_clickable(&mut s, planet);
        s.dispatch(SceneEvent::Click { pos });
        let az = s.camera().azimuth;
        s.tick(DT);
        assert_eq!(s.camera().azimuth, az);
        s.dispatch(SceneEvent::Key(SceneKey::Escape));
        s.tick(DT);
        assert!(s.camera().azimuth != az);
    }

    #[test]
    fn test_resize_changes_density_not_layout() {
        let mut s = mount(LayoutVariant::Orbital);
        let slots_before: Vec<_> = s.layout().slots.iter().map(|sl| sl.binding).collect();
        let desktop_distance = s.camera().distance;
        assert_eq!(s.ambient().starfield.stars.len(), 5000);

        s.dispatch(SceneEvent::Resize { width: 400.0, height: 800.0 });
        assert_eq!(s.theme().device, DeviceTier::Mobile);
        assert_eq!(s.ambient().starfield.stars.len(), 2000);
        assert!(s.camera().distance > desktop_distance);
        let slots_after: Vec<_> = s.layout().slots.iter().map(|sl| sl.binding).collect();
        assert_eq!(slots_before, slots_after);
    }

    #[test]
    fn test_zoom_is_bounded() {
        let mut s = mount(LayoutVariant::Orbital);
        for _ in 0..50 {
            s.dispatch(SceneEvent::Zoom { factor: 0.5 });
        }
        assert!((s.camera().distance - 8.0).abs() < 1e-4);
        assert!(!s.dispatch(SceneEvent::Zoom { factor: 0.5 }));
    }

    #[test]
    fn test_theme_and_filter() {
        let mut s = mount(LayoutVariant::Ring);
        assert!(s.dispatch(SceneEvent::ToggleTheme));
        assert!(!s.theme().is_night);
        assert!(s.dispatch(SceneEvent::SetFilter(CategoryFilter::Certificates)));
        assert!(!s.dispatch(SceneEvent::SetFilter(CategoryFilter::Certificates)));
        assert_eq!(s.filter(), CategoryFilter::Certificates);
    }

    #[test]
    fn test_empty_catalogue_mounts() {
        let mut s = SceneSession::mount(
            Catalogue::default(),
            LayoutVariant::Grid,
            ThemeContext::default(),
            SceneConfig::default(),
            Some(1),
        );
        s.tick(DT);
        assert!(s.entities().iter().all(|e| !e.is_interactive()));
        assert!(!s.dispatch(SceneEvent::Click { pos: [640.0, 400.0] }));
    }

    #[test]
    fn test_isolated_frame_keeps_session_usable() {
        use crate::render::capability::{isolate, SceneError};

        let mut s = mount(LayoutVariant::Orbital);
        isolate(|| s.frame([SceneEvent::Zoom { factor: 0.5 }], DT)).unwrap();
        let zoomed = s.camera().distance;
        assert!(zoomed < s.camera_home_distance);

        let r: Result<(), _> = isolate(|| {
            s.frame([SceneEvent::PointerLeft], DT);
            panic!("paint failed")
        });
        assert!(matches!(r, Err(SceneError::Panicked(ref m)) if m == "paint failed"));
        s.frame([SceneEvent::ResetCamera], DT);
        assert!(s.camera().distance > zoomed);
    }

    #[test]
    fn test_mount_repairs_degenerate_config() {
        let mut config = SceneConfig::default();
        config.orbital.ring_every = 0;
        config.grid.spacing = 0.0;
        for (variant, p, c) in [(LayoutVariant::Orbital, 3, 0), (LayoutVariant::Grid, 5, 3)] {
            let mut s = SceneSession::mount(
                catalogue(p, c),
                variant,
                ThemeContext::new(true, DeviceTier::Desktop),
                config.clone(),
                Some(3),
            );
            for _ in 0..30 {
                s.tick(DT);
            }
            let interactive = s.entities().iter().filter(|e| e.is_interactive()).count();
            assert_eq!(interactive, p + c);
            assert!(s.config().grid.spacing > 0.0);
            assert!(s.config().orbital.ring_every >= 1);
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = mount(LayoutVariant::Grid);
        let b = mount(LayoutVariant::Grid);
        let pa: Vec<_> = a.layout().slots.iter().map(|s| s.position).collect();
        let pb: Vec<_> = b.layout().slots.iter().map(|s| s.position).collect();
        assert_eq!(pa, pb);
    }
}
