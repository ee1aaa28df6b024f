//! Scene math: small vector helpers over plain `[f32; 3]`.
//!
//! The scene works in a right-handed, Y-up world:
//!   - X/Z span the ground plane (orbits, rings, the city lattice)
//!   - Y is height (bobbing planets, firefly drift, building heights)
//!
//! ## Sqrt Elimination
//! Distance thresholds (constellation links, hit radii) compare squared
//! lengths: |a - b| < r  ↔  |a - b|² < r²

/// World-space point / direction.
pub type Vec3 = [f32; 3];

pub const ORIGIN: Vec3 = [0.0, 0.0, 0.0];
pub const UP: Vec3 = [0.0, 1.0, 0.0];

#[inline(always)]
pub fn add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

#[inline(always)]
pub fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline(always)]
pub fn scale(a: Vec3, s: f32) -> Vec3 {
    [a[0] * s, a[1] * s, a[2] * s]
}

/// Dot product with FMA chaining (one rounding per step).
#[inline(always)]
pub fn dot(a: Vec3, b: Vec3) -> f32 {
    a[0].mul_add(b[0], a[1].mul_add(b[1], a[2] * b[2]))
}

#[inline(always)]
pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline(always)]
pub fn length_squared(a: Vec3) -> f32 {
    dot(a, a)
}

#[inline(always)]
pub fn length(a: Vec3) -> f32 {
    length_squared(a).sqrt()
}

/// Squared distance (no sqrt needed for threshold comparisons).
#[inline(always)]
pub fn distance_squared(a: Vec3, b: Vec3) -> f32 {
    length_squared(sub(a, b))
}

/// Unit vector in the direction of `a`. Degenerate input stays as-is.
#[inline]
pub fn normalize(a: Vec3) -> Vec3 {
    let len = length(a);
    if len > 1e-6 {
        scale(a, 1.0 / len)
    } else {
        a
    }
}

/// Linear interpolation: lerp(a, b, t) = fma(t, b - a, a)
#[inline(always)]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    t.mul_add(b - a, a)
}

/// Point on a sphere shell from two uniform samples in [0, 1).
///
/// theta = 2πu, phi = acos(2v - 1) gives an area-uniform distribution
/// (no clustering at the poles).
pub fn sphere_point(radius: f32, u: f32, v: f32) -> Vec3 {
    let theta = std::f32::consts::TAU * u;
    let phi = (2.0 * v - 1.0).clamp(-1.0, 1.0).acos();
    [
        radius * phi.sin() * theta.cos(),
        radius * phi.sin() * theta.sin(),
        radius * phi.cos(),
    ]
}

/// Rotate a point around the world Y axis.
#[inline]
pub fn rotate_y(p: Vec3, angle: f32) -> Vec3 {
    let (s, c) = angle.sin_cos();
    [p[0] * c + p[2] * s, p[1], -p[0] * s + p[2] * c]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_squared() {
        let d2 = distance_squared([0.0, 0.0, 0.0], [3.0, 4.0, 0.0]);
        assert!((d2 - 25.0).abs() < 1e-6);
    }

    #[test]
    fn test_cross_is_right_handed() {
        let z = cross([1.0, 0.0, 0.0], UP);
        assert!((z[2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_sphere_point_on_shell() {
        for i in 0..20 {
            let u = i as f32 / 20.0;
            let p = sphere_point(300.0, u, 1.0 - u);
            assert!((length(p) - 300.0).abs() < 0.01, "|p| = {}", length(p));
        }
    }

    #[test]
    fn test_rotate_y_preserves_height_and_radius() {
        let p = rotate_y([2.0, 1.5, 0.0], 1.0);
        assert!((p[1] - 1.5).abs() < 1e-6);
        assert!((p[0] * p[0] + p[2] * p[2] - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_lerp() {
        assert!((lerp(0.0, 10.0, 0.5) - 5.0).abs() < 1e-6);
        assert!((lerp(0.0, 10.0, 1.0) - 10.0).abs() < 1e-6);
    }
}
