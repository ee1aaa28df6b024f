//! Orbit camera: drag to orbit, scroll/pinch to zoom, perspective projection.
//!
//! Spherical coordinates around `target`:
//!   eye = target + d · [sin(polar)·sin(az), cos(polar), sin(polar)·cos(az)]
//!
//! `polar` is measured from +Y. Clamping it to (0, π/2] keeps the eye above
//! the ground plane and prevents the view from flipping over the pole.

use crate::math::{self, Vec3, UP};

/// Screen-space result of projecting a world point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    /// Pixel position inside the viewport (origin top-left)
    pub screen: [f32; 2],
    /// Distance along the view axis (larger = further away)
    pub depth: f32,
    /// Pixels per world unit at this depth
    pub pixels_per_unit: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Pose {
    azimuth: f32,
    polar: f32,
    distance: f32,
}

#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub target: Vec3,
    /// Horizontal orbit angle in radians (0 = looking down -Z)
    pub azimuth: f32,
    /// Angle from +Y in radians
    pub polar: f32,
    pub distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar: f32,
    pub max_polar: f32,
    /// Auto-rotate speed (rad/s); 0 disables
    pub auto_rotate: f32,
    /// Vertical field of view (radians)
    pub fov_y: f32,
    home: Pose,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::looking_at([0.0, 15.0, 25.0], math::ORIGIN)
    }
}

impl OrbitCamera {
    /// Camera at `eye` orbiting `target`, with permissive bounds.
    pub fn looking_at(eye: Vec3, target: Vec3) -> Self {
        let offset = math::sub(eye, target);
        let distance = math::length(offset).max(1e-3);
        let polar = (offset[1] / distance).clamp(-1.0, 1.0).acos();
        let azimuth = offset[0].atan2(offset[2]);
        let home = Pose { azimuth, polar, distance };
        Self {
            target,
            azimuth,
            polar,
            distance,
            min_distance: 0.5,
            max_distance: 1000.0,
            min_polar: 0.01,
            max_polar: std::f32::consts::FRAC_PI_2,
            auto_rotate: 0.0,
            fov_y: 50.0f32.to_radians(),
            home,
        }
    }

    pub fn with_distance_bounds(mut self, min: f32, max: f32) -> Self {
        self.min_distance = min.min(max);
        self.max_distance = max.max(min);
        self.clamp();
        self.home = self.pose();
        self
    }

    pub fn with_polar_bounds(mut self, min: f32, max: f32) -> Self {
        self.min_polar = min.clamp(0.01, std::f32::consts::FRAC_PI_2);
        self.max_polar = max.clamp(self.min_polar, std::f32::consts::FRAC_PI_2);
        self.clamp();
        self.home = self.pose();
        self
    }

    pub fn with_auto_rotate(mut self, speed: f32) -> Self {
        self.auto_rotate = speed;
        self
    }

    pub fn with_fov_deg(mut self, fov: f32) -> Self {
        self.fov_y = fov.clamp(10.0, 120.0).to_radians();
        self
    }

    fn pose(&self) -> Pose {
        Pose { azimuth: self.azimuth, polar: self.polar, distance: self.distance }
    }

    fn clamp(&mut self) {
        self.polar = self.polar.clamp(self.min_polar, self.max_polar);
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);
    }

    pub fn eye(&self) -> Vec3 {
        let (sp, cp) = self.polar.sin_cos();
        let (sa, ca) = self.azimuth.sin_cos();
        math::add(self.target, math::scale([sp * sa, cp, sp * ca], self.distance))
    }

    /// Orbit by a pointer drag in pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32, sensitivity: f32) {
        self.azimuth -= dx * sensitivity;
        self.polar -= dy * sensitivity;
        self.clamp();
    }

    /// Multiply the distance by `factor` (< 1 zooms in), clamped.
    pub fn zoom(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.distance *= factor;
            self.clamp();
        }
    }

    /// Advance auto-rotation; paused while anything is selected.
    pub fn update(&mut self, dt: f32, paused: bool) {
        if !paused && self.auto_rotate != 0.0 {
            self.azimuth = (self.azimuth + self.auto_rotate * dt) % std::f32::consts::TAU;
        }
    }

    pub fn reset(&mut self) {
        self.azimuth = self.home.azimuth;
        self.polar = self.home.polar;
        self.distance = self.home.distance;
        self.clamp();
    }

    /// Rescale the home distance (device framing) and jump to it.
    pub fn reframe(&mut self, base_distance: f32, factor: f32) {
        self.home.distance = (base_distance * factor).clamp(self.min_distance, self.max_distance);
        self.distance = self.home.distance;
    }

    /// Perspective projection into a `viewport` of `[width, height]` pixels.
    ///
    /// Points behind the near plane project to `None`.
    pub fn project(&self, point: Vec3, viewport: [f32; 2]) -> Option<Projected> {
        const NEAR: f32 = 0.1;
        let eye = self.eye();
        let forward = math::normalize(math::sub(self.target, eye));
        let right = math::normalize(math::cross(forward, UP));
        let up = math::cross(right, forward);

        let v = math::sub(point, eye);
        let z = math::dot(v, forward);
        if z <= NEAR {
            return None;
        }
        let focal = viewport[1] * 0.5 / (self.fov_y * 0.5).tan();
        let pixels_per_unit = focal / z;
        Some(Projected {
            screen: [
                viewport[0] * 0.5 + math::dot(v, right) * pixels_per_unit,
                viewport[1] * 0.5 - math::dot(v, up) * pixels_per_unit,
            ],
            depth: z,
            pixels_per_unit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn cam() -> OrbitCamera {
        OrbitCamera::looking_at([0.0, 15.0, 25.0], math::ORIGIN)
            .with_distance_bounds(8.0, 60.0)
            .with_polar_bounds(0.3, FRAC_PI_2)
    }

    #[test]
    fn test_eye_roundtrips_start_position() {
        let e = cam().eye();
        assert!((e[0] - 0.0).abs() < 1e-3);
        assert!((e[1] - 15.0).abs() < 1e-3);
        assert!((e[2] - 25.0).abs() < 1e-3);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut c = cam();
        for _ in 0..100 {
            c.zoom(0.5);
        }
        assert!((c.distance - 8.0).abs() < 1e-5);
        for _ in 0..100 {
            c.zoom(2.0);
        }
        assert!((c.distance - 60.0).abs() < 1e-5);
    }

    #[test]
    fn test_polar_clamped_above_ground() {
        let mut c = cam();
        c.orbit(0.0, -10_000.0, 0.01);
        assert!(c.polar <= FRAC_PI_2 + 1e-6);
        assert!(c.eye()[1] >= -1e-3);
        c.orbit(0.0, 10_000.0, 0.01);
        assert!((c.polar - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_target_projects_to_center() {
        let p = cam().project(math::ORIGIN, [800.0, 600.0]).unwrap();
        assert!((p.screen[0] - 400.0).abs() < 1e-3);
        assert!((p.screen[1] - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_projection_orientation_and_depth() {
        let c = cam();
        let right = c.project([5.0, 0.0, 0.0], [800.0, 600.0]).unwrap();
        let above = c.project([0.0, 5.0, 0.0], [800.0, 600.0]).unwrap();
        assert!(right.screen[0] > 400.0);
        assert!(above.screen[1] < 300.0);
        let near = c.project([0.0, 0.0, 10.0], [800.0, 600.0]).unwrap();
        let far = c.project([0.0, 0.0, -10.0], [800.0, 600.0]).unwrap();
        assert!(near.depth < far.depth);
        assert!(near.pixels_per_unit > far.pixels_per_unit);
        assert!(c.project([0.0, 30.0, 50.0], [800.0, 600.0]).is_none());
    }

    #[test]
    fn test_auto_rotate_pauses_and_reset() {
        let mut c = cam().with_auto_rotate(0.1);
        let az = c.azimuth;
        c.update(1.0, true);
        assert_eq!(c.azimuth, az);
        c.update(1.0, false);
        assert!((c.azimuth - az - 0.1).abs() < 1e-5);
        c.zoom(2.0);
        c.reset();
        assert!((c.azimuth - az).abs() < 1e-6);
        assert!((c.distance - 850.0f32.sqrt()).abs() < 1e-3);
    }
}
