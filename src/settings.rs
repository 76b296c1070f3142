//! Simulation settings
//!
//! One explicit, immutable value handed to the arena and the generator.
//! Persisted as JSON; any field left out of the file takes its default.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, SettingsError};
use crate::sim::{Bounds, SpawnRules};

/// Arena dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaSettings {
    pub width: f64,
    pub height: f64,
}

impl Default for ArenaSettings {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
        }
    }
}

/// Physics knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Time scale used for fixed steps
    pub time_per_draw: f64,
    /// Overlap tolerance for collision checks
    pub overlap_eps: f64,
    /// Resolve body-body collisions at all
    pub handle_collisions: bool,
    /// Candidate draws allowed per body during placement
    pub max_placement_attempts: u32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            time_per_draw: 1.0,
            overlap_eps: OVERLAP_EPS,
            handle_collisions: true,
            max_placement_attempts: MAX_PLACEMENT_ATTEMPTS,
        }
    }
}

/// Frame pacing and HUD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Frames per second the driver aims for
    pub fps: u32,
    /// Rate the physics is tuned for; time scale = elapsed * target_fps
    pub target_fps: u32,
    /// Report total energy
    pub show_stats: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            fps: FPS,
            target_fps: TARGET_FPS,
            show_stats: true,
        }
    }
}

/// Complete simulation settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub arena: ArenaSettings,
    pub spawn: SpawnRules,
    pub physics: PhysicsSettings,
    pub display: DisplaySettings,
    /// Fixed seed for reproducible runs; random when absent
    pub seed: Option<u64>,
}

impl Settings {
    /// Wall bounds described by these settings
    pub fn bounds(&self) -> Result<Bounds, ConfigError> {
        Bounds::from_size(self.arena.width, self.arena.height)
    }

    /// Reject settings the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let bounds = self.bounds()?;

        let eps = self.physics.overlap_eps;
        if !eps.is_finite() || eps <= 0.0 {
            return Err(ConfigError::InvalidEpsilon(eps));
        }
        let step = self.physics.time_per_draw;
        if !step.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "time_per_draw",
                value: step,
            });
        }
        if step < 0.0 {
            return Err(ConfigError::Negative {
                field: "time_per_draw",
                value: step,
            });
        }
        if self.physics.max_placement_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        if self.display.fps == 0 {
            return Err(ConfigError::ZeroRate { name: "fps" });
        }
        if self.display.target_fps == 0 {
            return Err(ConfigError::ZeroRate { name: "target_fps" });
        }

        self.spawn.validate(&bounds)
    }

    /// Parse and validate settings from JSON text
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
