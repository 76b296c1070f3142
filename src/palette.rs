//! Body colors for presentation
//!
//! The physics core has no notion of color. Whoever draws the arena keeps a
//! `Palette` keyed by `BodyId` next to it.

use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::sim::BodyId;

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const BLACK: Self = Self([0, 0, 0]);

    /// Uniformly random color
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self([rng.random(), rng.random(), rng.random()])
    }

    /// `#rrggbb`
    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.0;
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

/// Color lookup for bodies
#[derive(Debug, Clone, Default)]
pub struct Palette {
    colors: HashMap<BodyId, Rgb>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self, id: BodyId, color: Rgb) {
        self.colors.insert(id, color);
    }

    /// Give `id` a random color and return it
    pub fn assign_random<R: Rng + ?Sized>(&mut self, id: BodyId, rng: &mut R) -> Rgb {
        let color = Rgb::random(rng);
        self.assign(id, color);
        color
    }

    pub fn color_of(&self, id: BodyId) -> Option<Rgb> {
        self.colors.get(&id).copied()
    }

    /// Forget a body's color
    pub fn remove(&mut self, id: BodyId) -> Option<Rgb> {
        self.colors.remove(&id)
    }

    pub fn clear(&mut self) {
        self.colors.clear();
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
