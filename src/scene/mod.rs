//! Scene: procedural scene-graph generation and interactive selection.
//!
//! ```text
//! Catalogue ──classify──► layout() ──slots──► SceneEntity ×N
//!                                              │ tick(dt)
//!   SceneEvent ──► SceneSession::dispatch ─────┤ hit test → click
//!                        │                     ▼
//!                 SelectionController ──► modal::present()
//! ```

pub mod ambient;
pub mod entity;
pub mod layout;
pub mod selection;
pub mod session;

pub use entity::{EntityKind, EntityState, Propagation, SceneEntity};
pub use layout::{layout, Layout, Motion, PlacementSlot, SlotBinding};
pub use selection::{SelectionController, SelectionState};
pub use session::{SceneEvent, SceneSession};

use crate::mobile::DeviceTier;

/// Day/night and device tier, shared by every entity's material rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThemeContext {
    pub is_night: bool,
    pub device: DeviceTier,
}

impl ThemeContext {
    pub fn new(is_night: bool, device: DeviceTier) -> Self {
        Self { is_night, device }
    }
}

/// Which world the catalogue is laid out as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LayoutVariant {
    /// Solar system: projects are planets, certificates are moons
    #[default]
    Orbital,
    /// Village: cottages and monoliths on two rings around a campfire
    Ring,
    /// City: towers and monoliths on a shuffled lattice with traffic
    Grid,
}

impl LayoutVariant {
    pub const ALL: [LayoutVariant; 3] = [Self::Orbital, Self::Ring, Self::Grid];

    pub fn label(self) -> &'static str {
        match self {
            Self::Orbital => "Solar System",
            Self::Ring => "Village",
            Self::Grid => "City",
        }
    }
}
