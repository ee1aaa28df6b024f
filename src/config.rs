//! Scene configuration.
//!
//! Every tunable of the engine lives here with a `Default` that reproduces
//! the stock scene. A JSON file named by `PORTFOLIO_SCENE_CONFIG` may
//! override any subset of fields; missing fields keep their defaults.

use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};
use std::path::Path;

/// Environment variable naming a scene configuration JSON file.
pub const CONFIG_ENV: &str = "PORTFOLIO_SCENE_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read scene config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid scene config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Layout
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Solar-system layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitalConfig {
    /// Radius of the innermost orbit
    pub base_radius: f32,
    /// Gap between consecutive orbits (must be > 0)
    pub radius_step: f32,
    /// Kepler constant: speed = k / sqrt(radius)
    pub kepler_k: f32,
    pub size_min: f32,
    pub size_jitter: f32,
    /// Vertical weave of the orbital plane
    pub bob: f32,
    /// Every n-th planet carries a ring
    pub ring_every: usize,
    /// Certificates orbit the first min(N, cap) planets
    pub moon_host_cap: usize,
    pub moon_gap: f32,
    pub moon_step: f32,
    pub moon_speed: f32,
    pub moon_speed_step: f32,
    pub moon_bob: f32,
    /// Asteroid band appears when there are more planets than this
    pub belt_min_planets: usize,
    pub belt_margin: f32,
}

impl Default for OrbitalConfig {
    fn default() -> Self {
        Self {
            base_radius: 5.0,
            radius_step: 2.5,
            kepler_k: 0.34,
            size_min: 0.4,
            size_jitter: 0.3,
            bob: 0.3,
            ring_every: 4,
            moon_host_cap: 4,
            moon_gap: 0.8,
            moon_step: 0.3,
            moon_speed: 1.5,
            moon_speed_step: 0.3,
            moon_bob: 0.15,
            belt_min_planets: 4,
            belt_margin: 1.0,
        }
    }
}

/// Village layout: two concentric rings around a campfire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RingConfig {
    pub project_radius: f32,
    pub certificate_radius: f32,
    /// Angular offset of the certificate ring (radians)
    pub certificate_phase: f32,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            project_radius: 9.0,
            certificate_radius: 14.0,
            certificate_phase: 0.5,
        }
    }
}

/// City layout: a square lattice with a central plaza.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Starting half extent k of the lattice [-k, k]²
    pub half_extent: i32,
    /// World distance between cell centres
    pub spacing: f32,
    pub filler_mobile: usize,
    pub filler_desktop: usize,
    pub filler_height_min: f32,
    pub filler_height_max: f32,
    pub entry_height_min: f32,
    pub entry_height_max: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            half_extent: 3,
            spacing: 4.0,
            filler_mobile: 8,
            filler_desktop: 24,
            filler_height_min: 1.0,
            filler_height_max: 4.0,
            entry_height_min: 3.0,
            entry_height_max: 7.0,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Entities
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Per-frame entity rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityConfig {
    /// Per-frame smoothing factor k at 60 fps
    pub smoothing: f32,
    /// Rotation rate of a selected entity (rad/s)
    pub spin_rate: f32,
    pub planet_scale: f32,
    pub moon_scale: f32,
    pub cottage_scale: f32,
    pub monolith_scale: f32,
    pub tower_scale: f32,
}

impl Default for EntityConfig {
    fn default() -> Self {
        Self {
            smoothing: 0.1,
            spin_rate: 0.6,
            planet_scale: 1.3,
            moon_scale: 1.5,
            cottage_scale: 1.2,
            monolith_scale: 1.15,
            tower_scale: 1.2,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Ambient
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Decoration densities (mobile / desktop) and rhythms.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientConfig {
    pub stars_mobile: usize,
    pub stars_desktop: usize,
    pub star_radius: f32,
    pub constellation_points: usize,
    pub constellation_radius: f32,
    pub constellation_link: f32,
    pub fireflies_mobile: usize,
    pub fireflies_desktop: usize,
    pub asteroids: usize,
    pub cars_mobile: usize,
    pub cars_desktop: usize,
    pub pedestrians_mobile: usize,
    pub pedestrians_desktop: usize,
    /// Seconds per traffic-light phase
    pub light_interval: f32,
    pub car_speed: f32,
    pub pedestrian_speed: f32,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            stars_mobile: 2000,
            stars_desktop: 5000,
            star_radius: 300.0,
            constellation_points: 50,
            constellation_radius: 290.0,
            constellation_link: 70.0,
            fireflies_mobile: 15,
            fireflies_desktop: 100,
            asteroids: 100,
            cars_mobile: 4,
            cars_desktop: 12,
            pedestrians_mobile: 4,
            pedestrians_desktop: 16,
            light_interval: 6.0,
            car_speed: 3.0,
            pedestrian_speed: 0.8,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Camera
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view (degrees)
    pub fov_deg: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Polar bounds in space (radians from +Y)
    pub space_polar: [f32; 2],
    /// Polar bounds over a ground plane (village, city)
    pub ground_polar: [f32; 2],
    pub orbital_start: [f32; 3],
    pub ring_start: [f32; 3],
    pub grid_start: [f32; 3],
    /// Auto-rotate speed (rad/s), paused while anything is selected
    pub auto_rotate: f32,
    /// Default distance multiplier on mobile
    pub mobile_distance_factor: f32,
    /// Drag pixels → radians
    pub drag_sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_deg: 50.0,
            min_distance: 8.0,
            max_distance: 60.0,
            space_polar: [0.3, FRAC_PI_2],
            ground_polar: [FRAC_PI_4, std::f32::consts::PI / 2.2],
            orbital_start: [0.0, 15.0, 25.0],
            ring_start: [0.0, 14.0, 22.0],
            grid_start: [0.0, 24.0, 30.0],
            auto_rotate: 0.1,
            mobile_distance_factor: 1.4,
            drag_sensitivity: 0.008,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SceneConfig
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub orbital: OrbitalConfig,
    pub ring: RingConfig,
    pub grid: GridConfig,
    pub entity: EntityConfig,
    pub ambient: AmbientConfig,
    pub camera: CameraConfig,
    /// Fixed layout/decoration seed; random per mount when absent
    pub seed: Option<u64>,
}

impl SceneConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(text)?;
        Ok(cfg.sanitized())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Configuration from `PORTFOLIO_SCENE_CONFIG`, falling back to defaults.
    pub fn from_env() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV) else {
            return Self::default();
        };
        match Self::load(&path) {
            Ok(cfg) => {
                log::info!("scene config loaded from {}", Path::new(&path).display());
                cfg
            }
            Err(e) => {
                log::warn!("{}; using default scene config", e);
                Self::default()
            }
        }
    }

    /// Repair values that would break layout invariants.
    pub fn sanitized(mut self) -> Self {
        let d = OrbitalConfig::default();
        if !(self.orbital.radius_step > 0.0) {
            log::warn!("orbital.radius_step must be positive; using {}", d.radius_step);
            self.orbital.radius_step = d.radius_step;
        }
        if !(self.orbital.base_radius > 0.0) {
            log::warn!("orbital.base_radius must be positive; using {}", d.base_radius);
            self.orbital.base_radius = d.base_radius;
        }
        self.orbital.ring_every = self.orbital.ring_every.max(1);
        self.orbital.moon_host_cap = self.orbital.moon_host_cap.max(1);
        self.grid.half_extent = self.grid.half_extent.max(1);
        if !(self.grid.spacing > 0.0) {
            self.grid.spacing = GridConfig::default().spacing;
        }
        if self.grid.filler_height_max < self.grid.filler_height_min {
            std::mem::swap(&mut self.grid.filler_height_min, &mut self.grid.filler_height_max);
        }
        if self.grid.entry_height_max < self.grid.entry_height_min {
            std::mem::swap(&mut self.grid.entry_height_min, &mut self.grid.entry_height_max);
        }
        self.entity.smoothing = self.entity.smoothing.clamp(0.001, 1.0);
        self.ambient.constellation_points = self.ambient.constellation_points.min(100);
        self.ambient.light_interval = self.ambient.light_interval.max(0.5);
        let cam = &mut self.camera;
        if cam.max_distance < cam.min_distance {
            std::mem::swap(&mut cam.min_distance, &mut cam.max_distance);
        }
        cam.min_distance = cam.min_distance.max(0.5);
        for polar in [&mut cam.space_polar, &mut cam.ground_polar] {
            polar[0] = polar[0].clamp(0.01, FRAC_PI_2);
            polar[1] = polar[1].clamp(polar[0], FRAC_PI_2);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let cfg = SceneConfig::from_json(r#"{"orbital": {"moon_host_cap": 6}, "seed": 7}"#).unwrap();
        assert_eq!(cfg.orbital.moon_host_cap, 6);
        assert_eq!(cfg.orbital.base_radius, 5.0);
        assert_eq!(cfg.ring.project_radius, 9.0);
        assert_eq!(cfg.seed, Some(7));
    }

    #[test]
    fn test_empty_object_is_default() {
        let cfg = SceneConfig::from_json("{}").unwrap();
        assert_eq!(cfg.ambient.stars_desktop, 5000);
        assert!(cfg.seed.is_none());
    }

    #[test]
    fn test_sanitize_repairs_invariants() {
        let cfg = SceneConfig::from_json(
            r#"{"orbital": {"radius_step": -1.0, "ring_every": 0},
                "camera": {"min_distance": 50.0, "max_distance": 10.0},
                "ambient": {"constellation_points": 500}}"#,
        )
        .unwrap();
        assert_eq!(cfg.orbital.radius_step, 2.5);
        assert_eq!(cfg.orbital.ring_every, 1);
        assert!(cfg.camera.min_distance < cfg.camera.max_distance);
        assert_eq!(cfg.ambient.constellation_points, 100);
    }

    #[test]
    fn test_bad_json_is_error() {
        assert!(matches!(SceneConfig::from_json("{"), Err(ConfigError::Json(_))));
    }
}
