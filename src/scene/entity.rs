//! Scene entities: one per placement slot.
//!
//! Each frame an entity recomputes its state with the pure rule
//! `EntityState::next`:
//!   - scale eases towards the hover/selected target, 1.0 otherwise
//!   - a selected entity spins at a fixed rate, others relax to rotation 0
//!   - orbiting positions are absolute functions of elapsed time
//!
//! Materials are pure functions of the theme, so toggling day/night never
//! needs to touch entity state.

use crate::catalogue::{CategoryFilter, Classification};
use crate::config::EntityConfig;
use crate::math::{self, Vec3};
use crate::render::animator;
use crate::render::palette::{self, hex, Rgba};

use super::layout::{BuildingStyle, Motion, PlacementSlot, SlotBinding};
use super::{LayoutVariant, ThemeContext};

/// Opacity of entities outside the active category filter.
pub const DIMMED_OPACITY: f32 = 0.25;

const MOON_SIZE: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Planet,
    Moon,
    Cottage,
    Monolith,
    Tower,
    Filler,
}

impl EntityKind {
    pub fn for_slot(variant: LayoutVariant, binding: SlotBinding) -> Self {
        match (variant, binding) {
            (_, SlotBinding::Filler) => Self::Filler,
            (LayoutVariant::Orbital, SlotBinding::Project(_)) => Self::Planet,
            (LayoutVariant::Orbital, SlotBinding::Certificate(_)) => Self::Moon,
            (LayoutVariant::Ring, SlotBinding::Project(_)) => Self::Cottage,
            (LayoutVariant::Grid, SlotBinding::Project(_)) => Self::Tower,
            (_, SlotBinding::Certificate(_)) => Self::Monolith,
        }
    }
}

/// Whether a handled event should reach anything behind the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Stop,
    Continue,
}

/// Per-entity smoothing parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityTuning {
    /// Smoothing factor per 60 fps frame
    pub smoothing: f32,
    /// Spin rate while selected (rad/s)
    pub spin_rate: f32,
    /// Scale target while hovered or selected
    pub emphasis_scale: f32,
}

impl EntityTuning {
    pub fn for_kind(kind: EntityKind, cfg: &EntityConfig) -> Self {
        let emphasis_scale = match kind {
            EntityKind::Planet => cfg.planet_scale,
            EntityKind::Moon => cfg.moon_scale,
            EntityKind::Cottage => cfg.cottage_scale,
            EntityKind::Monolith => cfg.monolith_scale,
            EntityKind::Tower => cfg.tower_scale,
            EntityKind::Filler => 1.0,
        };
        Self { smoothing: cfg.smoothing, spin_rate: cfg.spin_rate, emphasis_scale }
    }
}

/// Inputs of one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    pub elapsed: f32,
    pub dt: f32,
    pub selected: bool,
    /// The host's position this frame (moons only)
    pub host_position: Option<Vec3>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityState {
    pub hovered: bool,
    pub selected: bool,
    pub scale: f32,
    pub rotation: f32,
    pub position: Vec3,
}

impl EntityState {
    pub fn at_rest(position: Vec3) -> Self {
        Self { hovered: false, selected: false, scale: 1.0, rotation: 0.0, position }
    }

    /// Pure per-frame rule.
    pub fn next(&self, motion: &Motion, input: FrameInput, tuning: &EntityTuning) -> Self {
        let k = animator::frame_factor(tuning.smoothing, input.dt);
        let target = if self.hovered || input.selected { tuning.emphasis_scale } else { 1.0 };
        let rotation = if input.selected {
            (self.rotation + tuning.spin_rate * input.dt.max(0.0)) % std::f32::consts::TAU
        } else {
            animator::approach(self.rotation, 0.0, k)
        };
        let position = match *motion {
            Motion::Orbit { radius, speed, phase, bob, .. } => {
                animator::orbit_offset(radius, speed, phase, bob, input.elapsed)
            }
            Motion::Moon { radius, speed, phase, bob, .. } => math::add(
                input.host_position.unwrap_or(math::ORIGIN),
                animator::moon_offset(radius, speed, phase, bob, input.elapsed),
            ),
            Motion::Static { .. } => self.position,
        };
        Self {
            hovered: self.hovered,
            selected: input.selected,
            scale: animator::approach(self.scale, target, k),
            rotation,
            position,
        }
    }
}

// ── Materials ──

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub color: Rgba,
    pub intensity: f32,
    /// Offset from the entity's anchor
    pub offset: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Body (walls, planet surface)
    pub base: Rgba,
    /// Secondary surface (roof, atmosphere, crystal)
    pub accent: Rgba,
    pub emissive: Rgba,
    pub emissive_intensity: f32,
    pub light: Option<PointLight>,
}

/// Everything the renderer needs to draw one entity this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Presentation {
    pub position: Vec3,
    pub scale: f32,
    pub rotation: f32,
    /// World radius (bodies) or footprint half-width (buildings)
    pub size: f32,
    /// Building height; 0 for bodies
    pub height: f32,
    pub material: Material,
    pub show_label: bool,
    pub opacity: f32,
}

#[derive(Debug, Clone)]
pub struct SceneEntity {
    pub slot: PlacementSlot,
    pub kind: EntityKind,
    /// Projects only
    pub classification: Option<Classification>,
    pub label: String,
    pub state: EntityState,
    tuning: EntityTuning,
}

impl SceneEntity {
    pub fn new(
        slot: PlacementSlot,
        classification: Option<Classification>,
        label: impl Into<String>,
        variant: LayoutVariant,
        cfg: &EntityConfig,
    ) -> Self {
        let kind = EntityKind::for_slot(variant, slot.binding);
        Self {
            kind,
            classification,
            label: label.into(),
            state: EntityState::at_rest(slot.position),
            tuning: EntityTuning::for_kind(kind, cfg),
            slot,
        }
    }

    #[inline]
    pub fn binding(&self) -> SlotBinding {
        self.slot.binding
    }

    #[inline]
    pub fn is_interactive(&self) -> bool {
        self.kind != EntityKind::Filler
    }

    /// Host slot index of a moon.
    pub fn host(&self) -> Option<usize> {
        match self.slot.motion {
            Motion::Moon { host, .. } => host,
            _ => None,
        }
    }

    pub fn pointer_enter(&mut self) {
        if self.is_interactive() {
            self.state.hovered = true;
        }
    }

    pub fn pointer_leave(&mut self) {
        self.state.hovered = false;
    }

    /// Report this entity's binding to `on_select` and stop propagation.
    /// Filler is not clickable and lets the click through.
    pub fn click(&self, on_select: &mut dyn FnMut(SlotBinding)) -> Propagation {
        if !self.is_interactive() {
            return Propagation::Continue;
        }
        on_select(self.slot.binding);
        Propagation::Stop
    }

    pub fn update(&mut self, elapsed: f32, dt: f32, selected: bool, host_position: Option<Vec3>) {
        let input = FrameInput { elapsed, dt, selected, host_position };
        self.state = self.state.next(&self.slot.motion, input, &self.tuning);
    }

    /// Unscaled world size (radius or footprint half-width).
    pub fn base_size(&self) -> f32 {
        match (self.kind, self.slot.motion) {
            (_, Motion::Orbit { size, .. }) => size,
            (EntityKind::Moon, _) => MOON_SIZE,
            (EntityKind::Cottage, _) => 1.2,
            (EntityKind::Monolith, _) => 0.6,
            (EntityKind::Tower, _) => 1.3,
            _ => 1.2,
        }
    }

    pub fn height(&self) -> f32 {
        match self.slot.motion {
            Motion::Static { height, .. } => height,
            _ => 0.0,
        }
    }

    /// Y rotation of the entity's front; buildings face the centre.
    pub fn facing(&self) -> f32 {
        match self.slot.motion {
            Motion::Static { facing, .. } => facing + self.state.rotation,
            _ => self.state.rotation,
        }
    }

    /// Centre used for hit testing and labels.
    pub fn anchor(&self) -> Vec3 {
        let h = self.height() * self.state.scale * 0.5;
        math::add(self.state.position, [0.0, h, 0.0])
    }

    /// World-space pick radius.
    pub fn hit_radius(&self) -> f32 {
        let size = self.base_size().max(self.height() * 0.5);
        size * self.state.scale
    }

    fn emphasized(&self) -> bool {
        self.state.hovered || self.state.selected
    }

    pub fn material(&self, theme: ThemeContext, elapsed: f32) -> Material {
        let night = theme.is_night;
        let emph = self.emphasized();
        let class_color = self
            .classification
            .map(palette::classification_color)
            .unwrap_or(palette::CERTIFICATE);

        match self.kind {
            EntityKind::Planet => {
                let palette_index = match self.slot.motion {
                    Motion::Orbit { palette, .. } => palette,
                    _ => 0,
                };
                let colors = palette::planet_colors(palette_index);
                let glow = if emph { 0.5 } else { 0.2 };
                Material {
                    base: colors.surface,
                    accent: colors.atmosphere,
                    emissive: colors.emissive,
                    emissive_intensity: if night { glow } else { glow * 0.5 },
                    light: night.then_some(PointLight {
                        color: colors.surface,
                        intensity: if emph { 3.0 } else { 1.0 },
                        offset: math::ORIGIN,
                    }),
                }
            }
            EntityKind::Moon => Material {
                base: palette::MOON,
                accent: palette::MOON,
                emissive: palette::MOON_EMISSIVE,
                emissive_intensity: if emph { 1.0 } else { 0.6 },
                light: None,
            },
            EntityKind::Cottage => {
                let flicker = 6.0 + (elapsed * 10.0 + self.state.position[0]).sin() * 0.5;
                Material {
                    base: if night { hex("#94a3b8") } else { Rgba::WHITE },
                    accent: class_color,
                    emissive: palette::WINDOW_GLOW,
                    emissive_intensity: if night { 1.0 } else { 0.0 },
                    light: night.then_some(PointLight {
                        color: palette::WINDOW_GLOW,
                        intensity: flicker,
                        offset: [0.0, 0.8, 0.0],
                    }),
                }
            }
            EntityKind::Monolith => Material {
                base: if night { hex("#475569") } else { hex("#94a3b8") },
                accent: if night { palette::CRYSTAL_NIGHT } else { palette::CRYSTAL_DAY },
                emissive: if night { hex("#0f172a") } else { palette::CRYSTAL_DAY },
                emissive_intensity: match (night, emph) {
                    (true, true) => 1.0,
                    (true, false) => 0.5,
                    (false, _) => 0.0,
                },
                light: night.then_some(PointLight {
                    color: palette::CRYSTAL_LIGHT,
                    intensity: 1.5,
                    offset: [0.0, self.height() + 0.5, 0.0],
                }),
            },
            EntityKind::Tower => Material {
                base: if night { class_color.mix(Rgba::BLACK, 0.45) } else { class_color },
                accent: if night { palette::WINDOW_GLOW } else { hex("#e0f2fe") },
                emissive: palette::WINDOW_GLOW,
                emissive_intensity: if night { if emph { 1.0 } else { 0.6 } } else { 0.0 },
                light: (night && emph).then_some(PointLight {
                    color: palette::WINDOW_GLOW,
                    intensity: 2.0,
                    offset: [0.0, self.height(), 0.0],
                }),
            },
            EntityKind::Filler => {
                let style = match self.slot.motion {
                    Motion::Static { style, .. } => style,
                    _ => BuildingStyle::Plain,
                };
                let base = match style {
                    BuildingStyle::Glass => hex("#64748b"),
                    BuildingStyle::Brick => hex("#b45309"),
                    BuildingStyle::Concrete | BuildingStyle::Plain => hex("#9ca3af"),
                };
                Material {
                    base: if night { base.mix(Rgba::BLACK, 0.5) } else { base },
                    accent: base,
                    emissive: palette::WINDOW_GLOW,
                    emissive_intensity: if night { 0.2 } else { 0.0 },
                    light: None,
                }
            }
        }
    }

    pub fn matches_filter(&self, filter: CategoryFilter) -> bool {
        match (self.slot.binding, self.classification) {
            (SlotBinding::Project(_), Some(class)) => filter.matches_project(class),
            (SlotBinding::Project(_), None) => filter.matches_project(Classification::Default),
            (SlotBinding::Certificate(_), _) => filter.matches_certificate(),
            (SlotBinding::Filler, _) => filter == CategoryFilter::All,
        }
    }

    pub fn presentation(&self, theme: ThemeContext, filter: CategoryFilter, elapsed: f32) -> Presentation {
        Presentation {
            position: self.state.position,
            scale: self.state.scale,
            rotation: self.facing(),
            size: self.base_size(),
            height: self.height(),
            material: self.material(theme, elapsed),
            show_label: self.is_interactive() && self.emphasized(),
            opacity: if self.matches_filter(filter) { 1.0 } else { DIMMED_OPACITY },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::{CertificateId, ProjectId};
    use crate::mobile::DeviceTier;

    fn planet_slot() -> PlacementSlot {
        PlacementSlot {
            binding: SlotBinding::Project(ProjectId(0)),
            position: [5.0, 0.0, 0.0],
            motion: Motion::Orbit {
                radius: 5.0,
                speed: 0.15,
                phase: 0.0,
                bob: 0.3,
                size: 0.5,
                palette: 0,
                ringed: true,
            },
        }
    }

    fn building_slot(binding: SlotBinding) -> PlacementSlot {
        PlacementSlot {
            binding,
            position: [4.0, 0.0, 0.0],
            motion: Motion::Static {
                cell: Some((1, 0)),
                style: BuildingStyle::Brick,
                height: 3.0,
                facing: 0.0,
            },
        }
    }

    fn planet() -> SceneEntity {
        SceneEntity::new(
            planet_slot(),
            Some(Classification::Web),
            "P",
            LayoutVariant::Orbital,
            &EntityConfig::default(),
        )
    }

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_kind_mapping() {
        let p = SlotBinding::Project(ProjectId(0));
        let c = SlotBinding::Certificate(CertificateId(0));
        assert_eq!(EntityKind::for_slot(LayoutVariant::Orbital, p), EntityKind::Planet);
        assert_eq!(EntityKind::for_slot(LayoutVariant::Orbital, c), EntityKind::Moon);
        assert_eq!(EntityKind::for_slot(LayoutVariant::Ring, p), EntityKind::Cottage);
        assert_eq!(EntityKind::for_slot(LayoutVariant::Ring, c), EntityKind::Monolith);
        assert_eq!(EntityKind::for_slot(LayoutVariant::Grid, p), EntityKind::Tower);
        assert_eq!(EntityKind::for_slot(LayoutVariant::Grid, SlotBinding::Filler), EntityKind::Filler);
    }

    #[test]
    fn test_hover_scale_converges_without_overshoot() {
        let mut e = planet();
        e.pointer_enter();
        let mut last = e.state.scale;
        for i in 0..240 {
            e.update(i as f32 * DT, DT, false, None);
            assert!(e.state.scale >= last && e.state.scale <= 1.3 + 1e-6);
            last = e.state.scale;
        }
        assert!((e.state.scale - 1.3).abs() < 1e-3);

        e.pointer_leave();
        for i in 0..240 {
            e.update(i as f32 * DT, DT, false, None);
            assert!(e.state.scale <= last && e.state.scale >= 1.0 - 1e-6);
            last = e.state.scale;
        }
        assert!((e.state.scale - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_selected_spins_then_relaxes() {
        let mut e = planet();
        for i in 0..60 {
            e.update(i as f32 * DT, DT, true, None);
        }
        assert!(e.state.selected);
        assert!((e.state.rotation - 0.6).abs() < 1e-3);
        for i in 0..600 {
            e.update(i as f32 * DT, DT, false, None);
        }
        assert!(e.state.rotation.abs() < 1e-3);
        assert!(!e.state.selected);
    }

    #[test]
    fn test_orbit_position_is_absolute() {
        let mut a = planet();
        let mut b = planet();
        for i in 1..=10 {
            a.update(i as f32 * 0.1, 0.1, false, None);
        }
        b.update(1.0, 0.1, false, None);
        assert_eq!(a.state.position, b.state.position);
    }

    #[test]
    fn test_moon_follows_host() {
        let slot = PlacementSlot {
            binding: SlotBinding::Certificate(CertificateId(0)),
            position: [0.0; 3],
            motion: Motion::Moon { host: Some(0), radius: 1.3, speed: 1.5, phase: 0.0, bob: 0.15 },
        };
        let mut m = SceneEntity::new(slot, None, "C", LayoutVariant::Orbital, &EntityConfig::default());
        m.update(2.0, DT, false, Some([10.0, 0.0, 0.0]));
        let d = math::distance_squared(m.state.position, [10.0, 0.0, 0.0]).sqrt();
        assert!(d >= 1.3 - 1e-4 && d <= (1.3f32.powi(2) + 0.15f32.powi(2)).sqrt() + 1e-4);
        assert_eq!(m.host(), Some(0));
    }

    #[test]
    fn test_click_stops_propagation() {
        let e = planet();
        let mut got = None;
        assert_eq!(e.click(&mut |b| got = Some(b)), Propagation::Stop);
        assert_eq!(got, Some(SlotBinding::Project(ProjectId(0))));
    }

    #[test]
    fn test_filler_not_clickable() {
        let mut f = SceneEntity::new(
            building_slot(SlotBinding::Filler),
            None,
            "",
            LayoutVariant::Grid,
            &EntityConfig::default(),
        );
        let mut called = false;
        assert_eq!(f.click(&mut |_| called = true), Propagation::Continue);
        assert!(!called);
        f.pointer_enter();
        assert!(!f.state.hovered);
    }

    #[test]
    fn test_night_material_adds_lights() {
        let cottage = SceneEntity::new(
            PlacementSlot {
                binding: SlotBinding::Project(ProjectId(0)),
                position: [9.0, 0.0, 0.0],
                motion: Motion::Static { cell: None, style: BuildingStyle::Plain, height: 1.0, facing: 0.0 },
            },
            Some(Classification::Android),
            "Cottage",
            LayoutVariant::Ring,
            &EntityConfig::default(),
        );
        let day = cottage.material(ThemeContext::new(false, DeviceTier::Desktop), 1.0);
        let night = cottage.material(ThemeContext::new(true, DeviceTier::Desktop), 1.0);
        assert!(day.light.is_none());
        assert_eq!(day.base, Rgba::WHITE);
        assert_eq!(day.accent, palette::ANDROID);
        let light = night.light.unwrap();
        assert_eq!(light.color, palette::WINDOW_GLOW);
        assert!((5.5..=6.5).contains(&light.intensity));
        assert_ne!(night.base, day.base);
    }

    #[test]
    fn test_planet_glow_on_hover() {
        let mut e = planet();
        let night = ThemeContext::new(true, DeviceTier::Desktop);
        assert_eq!(e.material(night, 0.0).light.unwrap().intensity, 1.0);
        e.pointer_enter();
        let m = e.material(night, 0.0);
        assert_eq!(m.light.unwrap().intensity, 3.0);
        assert_eq!(m.emissive_intensity, 0.5);
    }

    #[test]
    fn test_filter_dims_not_hides() {
        let e = planet();
        let theme = ThemeContext::default();
        let shown = e.presentation(theme, CategoryFilter::Only(Classification::Web), 0.0);
        let dimmed = e.presentation(theme, CategoryFilter::Only(Classification::Android), 0.0);
        assert_eq!(shown.opacity, 1.0);
        assert_eq!(dimmed.opacity, DIMMED_OPACITY);
        assert_eq!(dimmed.position, shown.position);
    }

    #[test]
    fn test_anchor_at_half_height() {
        let t = SceneEntity::new(
            building_slot(SlotBinding::Project(ProjectId(1))),
            Some(Classification::System),
            "T",
            LayoutVariant::Grid,
            &EntityConfig::default(),
        );
        assert!((t.anchor()[1] - 1.5).abs() < 1e-6);
        assert!((t.hit_radius() - 1.5).abs() < 1e-6);
    }
}
