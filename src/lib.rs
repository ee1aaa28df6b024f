//! Portfolio scene engine.
//!
//! Turns a flat catalogue of projects and certificates into an animated,
//! clickable 3D scene (solar system, village or city) and back into detail
//! cards when something is selected.

pub mod catalogue;
pub mod config;
pub mod math;
pub mod modal;
pub mod render;
pub mod scene;

// Device tier and touch gestures
pub mod mobile;

pub use catalogue::{Catalogue, CatalogueEntry, CategoryFilter, Certificate, Classification};
pub use config::SceneConfig;
pub use mobile::DeviceTier;
pub use modal::{present, ModalView};
pub use render::PresentationMode;
pub use scene::{LayoutVariant, SceneEvent, SceneSession, ThemeContext};
