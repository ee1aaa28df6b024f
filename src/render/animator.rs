/// Orbital Mechanics & Smoothing.
///
/// Positions of orbiting bodies are absolute functions of elapsed time, never
/// integrated frame by frame, so a dropped frame cannot accumulate drift.
/// - Orbit Revolution: planets revolve around the origin, slower further out
/// - Moons: revolve around their host's current position
/// - Floating: gentle sine-wave vertical drift of the orbital plane
/// - Smoothing: exponential approach used for hover/select scale and rotation

use crate::math::Vec3;

/// Kepler-style angular speed: outer rings turn slower.
///
/// `speed = k / sqrt(radius)`; degenerate radii get the inner-ring speed.
#[inline]
pub fn kepler_speed(k: f32, radius: f32) -> f32 {
    if radius > 0.1 {
        k / radius.sqrt()
    } else {
        k
    }
}

/// Angle on an orbit at time `t`.
#[inline(always)]
pub fn orbit_angle(phase: f32, speed: f32, t: f32) -> f32 {
    speed.mul_add(t, phase)
}

/// Planet position around the origin at elapsed time `t`.
///
/// The orbital plane bobs with `sin(2·angle)·bob`, so planets weave slightly
/// above and below the ecliptic instead of gliding on a flat disc.
pub fn orbit_offset(radius: f32, speed: f32, phase: f32, bob: f32, t: f32) -> Vec3 {
    let angle = orbit_angle(phase, speed, t);
    let (s, c) = angle.sin_cos();
    [radius * c, (2.0 * angle).sin() * bob, radius * s]
}

/// Moon position at elapsed time `t`, relative to nothing: the caller adds
/// the host's position for the same frame.
pub fn moon_offset(radius: f32, speed: f32, phase: f32, bob: f32, t: f32) -> Vec3 {
    orbit_offset(radius, speed, phase, bob, t)
}

/// Exponential approach: `current + (target - current)·k`.
///
/// For `k ∈ (0, 1]` the result never crosses `target`, so repeated
/// application converges monotonically without overshoot.
#[inline(always)]
pub fn approach(current: f32, target: f32, k: f32) -> f32 {
    (target - current).mul_add(k.clamp(0.0, 1.0), current)
}

/// Frame-rate independent smoothing factor.
///
/// `k` is tuned per 60 fps frame; `dt` rescales it so a 30 fps host converges
/// in the same wall-clock time: `1 - (1 - k)^(dt·60)`.
pub fn frame_factor(k: f32, dt: f32) -> f32 {
    let k = k.clamp(0.0, 1.0);
    if dt <= 0.0 {
        return 0.0;
    }
    1.0 - (1.0 - k).powf(dt * 60.0)
}
