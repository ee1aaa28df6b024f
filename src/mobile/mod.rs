//! Device tier & touch input.
//!
//! The viewport width decides how much decoration the scene can afford:
//! - Mobile (< 768 logical px): fewer stars, fireflies and filler, wider framing
//! - Desktop: full density
//!
//! Device tier never changes which catalogue entries are shown.

pub mod touch;

/// Viewport widths below this are treated as mobile.
pub const MOBILE_BREAKPOINT: f32 = 768.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeviceTier {
    Mobile,
    #[default]
    Desktop,
}

impl DeviceTier {
    pub fn from_viewport_width(width: f32) -> Self {
        if width < MOBILE_BREAKPOINT {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }

    #[inline]
    pub fn is_mobile(self) -> bool {
        self == Self::Mobile
    }

    /// Pick the density that matches this tier.
    #[inline]
    pub fn pick<T>(self, mobile: T, desktop: T) -> T {
        match self {
            Self::Mobile => mobile,
            Self::Desktop => desktop,
        }
    }
}

/// Which device last drove the canvas.
///
/// Touch screens also emit emulated pointer events in the same frame as the
/// touch itself, so a frame with any touch counts as touch. A frame with
/// pointer activity and no touch hands control back to the mouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerSource {
    #[default]
    Mouse,
    Touch,
}

impl PointerSource {
    pub fn observe(self, saw_touch: bool, saw_pointer: bool) -> Self {
        if saw_touch {
            Self::Touch
        } else if saw_pointer {
            Self::Mouse
        } else {
            self
        }
    }

    #[inline]
    pub fn is_touch(self) -> bool {
        self == Self::Touch
    }
}
