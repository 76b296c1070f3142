//! Error types for the arena simulation.

use std::path::PathBuf;

use thiserror::Error;

/// Invalid configuration, rejected at construction time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Radius must be finite and strictly positive.
    #[error("radius must be positive and finite, got {0}")]
    InvalidRadius(f64),

    /// Decay factors multiply velocity each tick and must lie in (0, 1].
    #[error("decay factor must be in (0, 1], got {0}")]
    InvalidDecay(f64),

    /// Position or velocity component is NaN or infinite.
    #[error("{field} must be finite, got {value}")]
    NonFinite {
        /// Which quantity was rejected.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A length or step that must be zero or more.
    #[error("{field} must not be negative, got {value}")]
    Negative {
        /// Which quantity was rejected.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A `[min, max]` range with `min > max`.
    #[error("{name}: min {min} is greater than max {max}")]
    InvertedRange {
        /// Setting name.
        name: &'static str,
        /// Lower end.
        min: f64,
        /// Upper end.
        max: f64,
    },

    /// Wall bounds that enclose no area.
    #[error("arena bounds x: [{min_x}, {max_x}], y: [{min_y}, {max_y}] enclose no area")]
    EmptyBounds {
        /// Left wall.
        min_x: f64,
        /// Right wall.
        max_x: f64,
        /// Top wall.
        min_y: f64,
        /// Bottom wall.
        max_y: f64,
    },

    /// The largest configured body cannot be placed inside the arena.
    #[error("body of radius {radius} does not fit an arena of {width}x{height}")]
    BodyDoesNotFit {
        /// Largest configured radius.
        radius: f64,
        /// Arena width.
        width: f64,
        /// Arena height.
        height: f64,
    },

    /// Overlap tolerance must be positive and finite.
    #[error("overlap eps must be positive, got {0}")]
    InvalidEpsilon(f64),

    /// Frame rates must be non-zero.
    #[error("{name} must be non-zero")]
    ZeroRate {
        /// Setting name.
        name: &'static str,
    },

    /// Placement cap of zero can never place a body.
    #[error("max placement attempts must be non-zero")]
    ZeroAttempts,
}

/// Errors raised while inserting bodies into an arena.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlacementError {
    /// Random placement could not find a free spot.
    #[error("placed {placed} of {requested} bodies; gave up after {attempts} attempts")]
    Exhausted {
        /// Bodies accepted before giving up.
        placed: usize,
        /// Bodies asked for.
        requested: usize,
        /// Candidates drawn for the body that failed.
        attempts: u32,
    },

    /// Body pokes out of the arena walls.
    #[error("body at ({x}, {y}) with radius {radius} lies outside the arena")]
    OutOfBounds {
        /// Center x.
        x: f64,
        /// Center y.
        y: f64,
        /// Radius.
        radius: f64,
    },

    /// Body overlaps one that is already in the arena.
    #[error("body overlaps existing body {0}")]
    Overlapping(u32),
}

/// Errors loading settings from disk.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The file could not be read.
    #[error("failed to read settings from {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file is not valid settings JSON.
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    /// The file parsed but describes an unusable configuration.
    #[error("invalid settings: {0}")]
    Invalid(#[from] ConfigError),
}

/// Errors surfaced by a running session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Rejected configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Population failed.
    #[error(transparent)]
    Placement(#[from] PlacementError),

    /// Settings could not be loaded.
    #[error(transparent)]
    Settings(#[from] SettingsError),
}
