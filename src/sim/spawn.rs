//! Body generation for arena population
//!
//! The arena only asks a `BodyGenerator` for candidates and throws away the
//! ones that do not fit. `RandomBodies` is the seeded generator driven by
//! `SpawnRules`.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arena::Bounds;
use super::body::Body;
use crate::consts::SPAWN_WALL_MARGIN;
use crate::error::ConfigError;

/// Source of candidate bodies
pub trait BodyGenerator {
    fn generate(&mut self) -> Body;
}

impl<F> BodyGenerator for F
where
    F: FnMut() -> Body,
{
    fn generate(&mut self) -> Body {
        self()
    }
}

/// Inclusive `[min, max]` range for a random quantity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// A span that always yields `value`
    pub const fn fixed(value: f64) -> Self {
        Self::new(value, value)
    }

    pub fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        for value in [self.min, self.max] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field: name, value });
            }
        }
        if self.min > self.max {
            return Err(ConfigError::InvertedRange {
                name,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// Uniform sample; a degenerate span returns its single value
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.min >= self.max {
            self.min
        } else {
            rng.random_range(self.min..=self.max)
        }
    }
}

impl From<(f64, f64)> for Span {
    fn from((min, max): (f64, f64)) -> Self {
        Self::new(min, max)
    }
}

/// Rules for randomly generated bodies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnRules {
    /// Bodies placed on every reset
    pub count: usize,
    pub radius: Span,
    /// Speed magnitude per axis; the sign is a coin flip
    pub speed_x: Span,
    pub speed_y: Span,
    /// Per-tick velocity decay per axis, each in (0, 1]
    pub decay_x: Span,
    pub decay_y: Span,
    /// Extra gap between a new body and the walls
    pub wall_margin: f64,
}

impl Default for SpawnRules {
    fn default() -> Self {
        Self {
            count: 5,
            radius: Span::fixed(45.0),
            speed_x: Span::new(0.0, 4.0),
            speed_y: Span::new(0.0, 4.0),
            decay_x: Span::fixed(1.0 - 1e-6),
            decay_y: Span::fixed(1.0 - 1e-6),
            wall_margin: SPAWN_WALL_MARGIN,
        }
    }
}

impl SpawnRules {
    /// Check the rules on their own and against the arena they will fill
    pub fn validate(&self, bounds: &Bounds) -> Result<(), ConfigError> {
        self.radius.validate("radius")?;
        self.speed_x.validate("speed_x")?;
        self.speed_y.validate("speed_y")?;
        self.decay_x.validate("decay_x")?;
        self.decay_y.validate("decay_y")?;

        if self.radius.min <= 0.0 {
            return Err(ConfigError::InvalidRadius(self.radius.min));
        }
        for decay in [self.decay_x, self.decay_y] {
            for factor in [decay.min, decay.max] {
                if !(factor > 0.0 && factor <= 1.0) {
                    return Err(ConfigError::InvalidDecay(factor));
                }
            }
        }
        if !self.wall_margin.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "wall_margin",
                value: self.wall_margin,
            });
        }
        if self.wall_margin < 0.0 {
            return Err(ConfigError::Negative {
                field: "wall_margin",
                value: self.wall_margin,
            });
        }

        let needed = 2.0 * (self.radius.max + self.wall_margin);
        if needed > bounds.width() || needed > bounds.height() {
            return Err(ConfigError::BodyDoesNotFit {
                radius: self.radius.max,
                width: bounds.width(),
                height: bounds.height(),
            });
        }
        Ok(())
    }
}

/// Seeded random body generator
#[derive(Debug, Clone)]
pub struct RandomBodies {
    rules: SpawnRules,
    bounds: Bounds,
    rng: Pcg32,
}

impl RandomBodies {
    pub fn new(rules: SpawnRules, bounds: Bounds, seed: u64) -> Result<Self, ConfigError> {
        rules.validate(&bounds)?;
        Ok(Self {
            rules,
            bounds,
            rng: Pcg32::seed_from_u64(seed),
        })
    }

    pub fn rules(&self) -> &SpawnRules {
        &self.rules
    }

    /// Coordinate keeping the disc plus margin between two walls
    fn coord(&mut self, min: f64, max: f64, radius: f64) -> f64 {
        let inset = radius + self.rules.wall_margin;
        Span::new(min + inset, max - inset).sample(&mut self.rng)
    }

    /// Speed magnitude from `span` with a random sign
    fn speed(&mut self, span: Span) -> f64 {
        let magnitude = span.sample(&mut self.rng);
        if self.rng.random_bool(0.5) {
            magnitude
        } else {
            -magnitude
        }
    }
}

impl BodyGenerator for RandomBodies {
    fn generate(&mut self) -> Body {
        let radius = self.rules.radius.sample(&mut self.rng);
        let Bounds {
            min_x,
            max_x,
            min_y,
            max_y,
        } = self.bounds;

        let pos = DVec2::new(
            self.coord(min_x, max_x, radius),
            self.coord(min_y, max_y, radius),
        );
        let (speed_x, speed_y) = (self.rules.speed_x, self.rules.speed_y);
        let vel = DVec2::new(self.speed(speed_x), self.speed(speed_y));
        let decay = DVec2::new(
            self.rules.decay_x.sample(&mut self.rng),
            self.rules.decay_y.sample(&mut self.rng),
        );

        Body::new_unchecked(pos, vel, decay, radius)
    }
}
