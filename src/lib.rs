//! Elastic Arena - circular bodies bouncing around a walled 2D box
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, collisions, arena tick)
//! - `settings`: Explicit, validated configuration
//! - `palette`: Presentation-only colors keyed by body id
//! - `session`: Frame driver used by the binary

pub mod error;
pub mod palette;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, PlacementError, SessionError, SettingsError};
pub use palette::{Palette, Rgb};
pub use session::{FrameStats, Session, Snapshot};
pub use settings::Settings;

/// Simulation configuration constants
pub mod consts {
    /// Tolerance that makes the overlap test slightly stricter than tangency
    pub const OVERLAP_EPS: f64 = 1e-3;
    /// Below this center distance the collision normal is undefined
    pub const MIN_SEPARATION: f64 = 1e-9;
    /// Candidate draws allowed per body before placement gives up
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 10_000;
    /// Gap kept between a freshly spawned body and the walls
    pub const SPAWN_WALL_MARGIN: f64 = 1.0;

    /// Default arena dimensions
    pub const ARENA_WIDTH: f64 = 1000.0;
    pub const ARENA_HEIGHT: f64 = 650.0;

    /// Nominal frame rates (time scale = elapsed * TARGET_FPS)
    pub const FPS: u32 = 120;
    pub const TARGET_FPS: u32 = 120;
}
