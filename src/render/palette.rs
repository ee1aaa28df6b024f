//! Scene palettes: hex colours resolved at compile time.
//!
//! Every colour in the scene is authored as a CSS-style hex string and parsed
//! by a `const fn`, so palette tables are plain `Rgba` constants with no
//! runtime parsing and no lookup maps.
//!
//! Hex digit decoding is branchless:
//!   is_digit = (b - '0') < 10, is_lower = (b - 'a') < 6, is_upper = (b - 'A') < 6
//!   value = is_digit·(b - '0') + is_lower·(b - 'a' + 10) + is_upper·(b - 'A' + 10)

use crate::catalogue::Classification;

/// RGBA colour (0-255 per channel)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Self = Self { r: 255, g: 255, b: 255, a: 255 };

    /// Same colour with alpha multiplied by `opacity` (clamped to [0, 1]).
    pub fn with_opacity(self, opacity: f32) -> Self {
        let a = (self.a as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    /// Brighten towards white by `amount` in [0, 1] (emissive glow).
    pub fn brighten(self, amount: f32) -> Self {
        let t = amount.clamp(0.0, 1.0);
        let up = |c: u8| (c as f32 + (255.0 - c as f32) * t).round() as u8;
        Self { r: up(self.r), g: up(self.g), b: up(self.b), a: self.a }
    }

    /// Component-wise blend of two colours.
    pub fn mix(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let m = |a: u8, b: u8| crate::math::lerp(a as f32, b as f32, t).round() as u8;
        Self {
            r: m(self.r, other.r),
            g: m(self.g, other.g),
            b: m(self.b, other.b),
            a: m(self.a, other.a),
        }
    }
}

#[inline(always)]
const fn hex_digit(b: u8) -> u8 {
    let is_digit = (b.wrapping_sub(b'0') < 10) as u8;
    let is_lower = (b.wrapping_sub(b'a') < 6) as u8;
    let is_upper = (b.wrapping_sub(b'A') < 6) as u8;
    is_digit
        .wrapping_mul(b.wrapping_sub(b'0'))
        .wrapping_add(is_lower.wrapping_mul(b.wrapping_sub(b'a').wrapping_add(10)))
        .wrapping_add(is_upper.wrapping_mul(b.wrapping_sub(b'A').wrapping_add(10)))
}

#[inline(always)]
const fn hex_byte(hi: u8, lo: u8) -> u8 {
    (hex_digit(hi) << 4) | hex_digit(lo)
}

/// Parse `#RGB` or `#RRGGBB`. Anything else yields black.
pub const fn hex(s: &str) -> Rgba {
    let b = s.as_bytes();
    if b.is_empty() || b[0] != b'#' {
        return Rgba::BLACK;
    }
    match b.len() {
        4 => {
            let r = hex_digit(b[1]);
            let g = hex_digit(b[2]);
            let bl = hex_digit(b[3]);
            Rgba { r: r << 4 | r, g: g << 4 | g, b: bl << 4 | bl, a: 255 }
        }
        7 => Rgba {
            r: hex_byte(b[1], b[2]),
            g: hex_byte(b[3], b[4]),
            b: hex_byte(b[5], b[6]),
            a: 255,
        },
        _ => Rgba::BLACK,
    }
}

// ── Planets ──

/// Surface / atmosphere / emissive triple for one planet.
#[derive(Debug, Clone, Copy)]
pub struct PlanetColors {
    pub surface: Rgba,
    pub atmosphere: Rgba,
    pub emissive: Rgba,
}

const fn planet(surface: &str, atmosphere: &str, emissive: &str) -> PlanetColors {
    PlanetColors { surface: hex(surface), atmosphere: hex(atmosphere), emissive: hex(emissive) }
}

/// Planet palette, cycled by planet index.
pub const PLANET_COLORS: [PlanetColors; 12] = [
    planet("#60a5fa", "#93c5fd", "#3b82f6"), // Blue
    planet("#f97316", "#fdba74", "#ea580c"), // Orange
    planet("#a78bfa", "#c4b5fd", "#8b5cf6"), // Purple
    planet("#4ade80", "#86efac", "#22c55e"), // Green
    planet("#f472b6", "#f9a8d4", "#ec4899"), // Pink
    planet("#fbbf24", "#fde047", "#f59e0b"), // Gold
    planet("#2dd4bf", "#5eead4", "#14b8a6"), // Teal
    planet("#fb7185", "#fda4af", "#f43f5e"), // Rose
    planet("#38bdf8", "#7dd3fc", "#0ea5e9"), // Sky
    planet("#c084fc", "#d8b4fe", "#a855f7"), // Violet
    planet("#34d399", "#6ee7b7", "#10b981"), // Emerald
    planet("#fb923c", "#fdba74", "#f97316"), // Amber
];

pub fn planet_colors(index: usize) -> PlanetColors {
    PLANET_COLORS[index % PLANET_COLORS.len()]
}

pub const MOON: Rgba = hex("#fbbf24");
pub const MOON_EMISSIVE: Rgba = hex("#f59e0b");
pub const SUN: Rgba = hex("#fbbf24");
pub const SUN_GLOW: Rgba = hex("#fcd34d");
pub const ORBIT_RING: Rgba = hex("#475569");
pub const ASTEROID: Rgba = hex("#6b7280");
pub const SPACE: Rgba = hex("#030712");

// ── Classification badges ──

pub const ANDROID: Rgba = hex("#34d399");
pub const WEB: Rgba = hex("#60a5fa");
pub const SYSTEM: Rgba = hex("#a78bfa");
pub const DEFAULT: Rgba = hex("#94a3b8");
pub const CERTIFICATE: Rgba = hex("#fbbf24");

pub fn classification_color(class: Classification) -> Rgba {
    match class {
        Classification::Android => ANDROID,
        Classification::Web => WEB,
        Classification::System => SYSTEM,
        Classification::Default => DEFAULT,
    }
}

// ── Ground / sky per theme ──

/// Environment colours that change with day/night.
#[derive(Debug, Clone, Copy)]
pub struct Environment {
    pub sky: Rgba,
    pub ground: Rgba,
    pub path: Rgba,
    pub wood: Rgba,
    pub text: Rgba,
    pub dome: Rgba,
}

pub const DAY: Environment = Environment {
    sky: hex("#87ceeb"),
    ground: hex("#86efac"),
    path: hex("#d6d3d1"),
    wood: hex("#92400e"),
    text: hex("#0f172a"),
    dome: hex("#bae6fd"),
};

pub const NIGHT: Environment = Environment {
    sky: hex("#020617"),
    ground: hex("#1e293b"),
    path: hex("#334155"),
    wood: hex("#475569"),
    text: hex("#e2e8f0"),
    dome: hex("#4c1d95"),
};

pub fn environment(is_night: bool) -> Environment {
    if is_night {
        NIGHT
    } else {
        DAY
    }
}

pub const WINDOW_GLOW: Rgba = hex("#ff9f43");
pub const CRYSTAL_NIGHT: Rgba = hex("#67e8f9");
pub const CRYSTAL_DAY: Rgba = hex("#0ea5e9");
pub const CRYSTAL_LIGHT: Rgba = hex("#06b6d4");
pub const FIREFLY_A: Rgba = hex("#fde047");
pub const FIREFLY_B: Rgba = hex("#bef264");
pub const CONSTELLATION: Rgba = hex("#81d4fa");
pub const FLAME: Rgba = hex("#fb923c");
pub const CAR_LIGHT: Rgba = hex("#fef08a");
pub const CAR_BODY: Rgba = hex("#ef4444");
pub const PEDESTRIAN: Rgba = hex("#f8fafc");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_digit_branchless() {
        assert_eq!(hex_digit(b'0'), 0);
        assert_eq!(hex_digit(b'9'), 9);
        assert_eq!(hex_digit(b'a'), 10);
        assert_eq!(hex_digit(b'F'), 15);
    }

    #[test]
    fn test_hex_long_and_short() {
        assert_eq!(hex("#FF8800"), Rgba { r: 255, g: 136, b: 0, a: 255 });
        assert_eq!(hex("#F80"), Rgba { r: 255, g: 136, b: 0, a: 255 });
        assert_eq!(hex("nonsense"), Rgba::BLACK);
    }

    #[test]
    fn test_palette_constants_resolve() {
        assert_eq!(PLANET_COLORS[0].surface, Rgba { r: 0x60, g: 0xa5, b: 0xfa, a: 255 });
        assert_eq!(planet_colors(12).surface, PLANET_COLORS[0].surface);
    }

    #[test]
    fn test_with_opacity_and_brighten() {
        let c = Rgba { r: 100, g: 100, b: 100, a: 200 };
        assert_eq!(c.with_opacity(0.5).a, 100);
        let b = c.brighten(1.0);
        assert_eq!((b.r, b.g, b.b), (255, 255, 255));
        assert_eq!(c.brighten(0.0), c);
    }
}
