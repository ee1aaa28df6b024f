pub mod animator;
pub mod camera;
pub mod capability;
pub mod palette;

/// How the portfolio is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresentationMode {
    /// Conventional scrolling listing (no 3D)
    Dev,
    /// Interactive 3D scene
    #[default]
    Creative,
}

impl PresentationMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Dev => "Dev Mode",
            Self::Creative => "Creative Mode",
        }
    }
}
