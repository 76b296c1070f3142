//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Caller-supplied time scale only, no clocks
//! - Seeded RNG only
//! - Stable iteration order (insertion order)
//! - No rendering or platform dependencies

pub mod arena;
pub mod body;
pub mod collision;
pub mod spawn;

pub use arena::{Arena, Bounds, TickReport};
pub use body::{Body, BodyId};
pub use collision::{Contact, distance, elastic_exchange, overlaps, resolve};
pub use spawn::{BodyGenerator, RandomBodies, SpawnRules, Span};
