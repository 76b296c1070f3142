//! Circular body state and per-body motion
//!
//! A body only knows about itself and the walls. Pairwise interaction lives
//! in `collision`, bookkeeping across bodies in `arena`.

use std::f64::consts::PI;
use std::fmt;

use glam::DVec2;
use serde::Serialize;

use crate::error::ConfigError;

/// Stable identity of a body within one arena
///
/// Assigned on insertion and never reused, so it can key presentation data
/// (colors) without hashing mutable coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
pub struct BodyId(pub u32);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A circular body with uniform density
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    id: BodyId,
    /// Center position
    pub pos: DVec2,
    /// Displacement per unit of time
    pub vel: DVec2,
    /// Per-axis multiplicative velocity decay applied once per `advance`
    pub(crate) decay: DVec2,
    radius: f64,
}

impl Body {
    /// Create a body, rejecting non-physical parameters.
    ///
    /// The id stays at its default until an arena accepts the body.
    pub fn new(pos: DVec2, vel: DVec2, decay: DVec2, radius: f64) -> Result<Self, ConfigError> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(ConfigError::InvalidRadius(radius));
        }
        for (field, value) in [("x", pos.x), ("y", pos.y), ("vx", vel.x), ("vy", vel.y)] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field, value });
            }
        }
        for factor in [decay.x, decay.y] {
            if !(factor > 0.0 && factor <= 1.0) {
                return Err(ConfigError::InvalidDecay(factor));
            }
        }

        Ok(Self::new_unchecked(pos, vel, decay, radius))
    }

    /// Build a body from parameters the caller has already validated
    pub(crate) fn new_unchecked(pos: DVec2, vel: DVec2, decay: DVec2, radius: f64) -> Self {
        debug_assert!(radius > 0.0);
        Self {
            id: BodyId::default(),
            pos,
            vel,
            decay,
            radius,
        }
    }

    /// Body that keeps its speed forever (decay of 1 on both axes)
    pub fn undamped(pos: DVec2, vel: DVec2, radius: f64) -> Result<Self, ConfigError> {
        Self::new(pos, vel, DVec2::ONE, radius)
    }

    pub fn id(&self) -> BodyId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: BodyId) {
        self.id = id;
    }

    /// Per-axis decay factors, each in `(0, 1]`
    pub fn decay(&self) -> DVec2 {
        self.decay
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Area-proportional mass
    #[inline]
    pub fn mass(&self) -> f64 {
        PI * self.radius * self.radius
    }

    /// Kinetic energy
    #[inline]
    pub fn energy(&self) -> f64 {
        self.mass() * self.vel.length_squared() / 2.0
    }

    #[inline]
    pub fn momentum(&self) -> DVec2 {
        self.vel * self.mass()
    }

    /// Integrate position over `dt`, then apply one step of velocity decay.
    ///
    /// Decay is a fixed per-call factor and is NOT scaled by `dt`: a call with
    /// `dt == 0` leaves the position alone but still slows the body down.
    pub fn advance(&mut self, dt: f64) {
        self.pos += self.vel * dt;
        self.vel *= self.decay;
    }

    /// Bounce off the arena walls, leaving the body tangent to any wall it touched.
    ///
    /// Checks run min_x, max_x, min_y, max_y; when the arena is narrower than
    /// the body, the later clamp on an axis wins.
    pub fn reflect_off_bounds(&mut self, min_x: f64, max_x: f64, min_y: f64, max_y: f64) {
        if self.pos.x - self.radius <= min_x {
            self.vel.x = -self.vel.x;
            self.pos.x = min_x + self.radius;
        }

        if self.pos.x + self.radius >= max_x {
            self.vel.x = -self.vel.x;
            self.pos.x = max_x - self.radius;
        }

        if self.pos.y - self.radius <= min_y {
            self.vel.y = -self.vel.y;
            self.pos.y = min_y + self.radius;
        }

        if self.pos.y + self.radius >= max_y {
            self.vel.y = -self.vel.y;
            self.pos.y = max_y - self.radius;
        }
    }
}
