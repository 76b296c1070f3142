//! Frame driver
//!
//! Glues settings, arena, body generator and palette together the way a
//! presentation loop needs them: reset, advance one frame, read stats.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::error::{PlacementError, SessionError};
use crate::palette::{Palette, Rgb};
use crate::settings::Settings;
use crate::sim::{Arena, BodyId, RandomBodies, TickReport};

/// Per-frame summary
#[derive(Debug, Clone, Copy)]
pub struct FrameStats {
    /// Frames advanced since the last reset
    pub frame: u64,
    /// Time scale passed to the arena tick
    pub time_scale: f64,
    pub bodies: usize,
    pub total_energy: f64,
    pub report: TickReport,
}

/// Serializable view of one body
#[derive(Debug, Clone, Serialize)]
pub struct BodySnapshot {
    pub id: BodyId,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub radius: f64,
    pub color: Option<Rgb>,
}

/// Serializable view of the whole session
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub seed: u64,
    pub frame: u64,
    pub total_energy: f64,
    pub bodies: Vec<BodySnapshot>,
}

/// A running simulation with its presentation state
pub struct Session {
    settings: Settings,
    seed: u64,
    arena: Arena,
    generator: RandomBodies,
    palette: Palette,
    color_rng: Pcg32,
    frame: u64,
}

impl Session {
    /// Build an empty session; call `reset` to populate it
    pub fn new(settings: Settings) -> Result<Self, SessionError> {
        let arena = Arena::from_settings(&settings)?;
        let seed = settings.seed.unwrap_or_else(|| rand::rng().random());
        let generator = RandomBodies::new(settings.spawn.clone(), arena.bounds(), seed)?;

        let collisions = if settings.physics.handle_collisions {
            "on"
        } else {
            "off"
        };
        log::info!(
            "Session: {}x{} arena, {} bodies, collisions {}, seed {}",
            settings.arena.width,
            settings.arena.height,
            settings.spawn.count,
            collisions,
            seed
        );

        Ok(Self {
            settings,
            seed,
            arena,
            generator,
            palette: Palette::new(),
            // Separate stream so colors never shift body placement
            color_rng: Pcg32::seed_from_u64(seed.wrapping_add(1)),
            frame: 0,
        })
    }

    /// Build and populate a session in one go
    pub fn start(settings: Settings) -> Result<Self, SessionError> {
        let mut session = Self::new(settings)?;
        session.reset()?;
        Ok(session)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Clear the arena and place a fresh set of bodies
    ///
    /// Bodies placed before a placement failure stay, and get colors.
    pub fn reset(&mut self) -> Result<(), PlacementError> {
        self.arena.clear();
        self.palette.clear();
        self.frame = 0;

        let result = self
            .arena
            .add_random_bodies(self.settings.spawn.count, &mut self.generator);

        for body in self.arena.iter() {
            self.palette.assign_random(body.id(), &mut self.color_rng);
        }

        result.map(|_| ())
    }

    /// Advance one frame given the wall-clock seconds since the last one
    pub fn frame(&mut self, elapsed_secs: f64) -> FrameStats {
        let time_scale = elapsed_secs * self.settings.display.target_fps as f64;
        self.step(time_scale)
    }

    /// Advance one frame with the configured fixed time scale
    pub fn fixed_frame(&mut self) -> FrameStats {
        self.step(self.settings.physics.time_per_draw)
    }

    /// Advance one frame with an explicit time scale
    pub fn step(&mut self, time_scale: f64) -> FrameStats {
        let report = self.arena.tick(time_scale);
        self.frame += 1;

        FrameStats {
            frame: self.frame,
            time_scale,
            bodies: self.arena.len(),
            total_energy: self.arena.total_energy(),
            report,
        }
    }

    /// Energy readout, as shown on screen
    pub fn stats_line(&self) -> String {
        format_energy(self.arena.total_energy())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            seed: self.seed,
            frame: self.frame,
            total_energy: self.arena.total_energy(),
            bodies: self
                .arena
                .iter()
                .map(|b| BodySnapshot {
                    id: b.id(),
                    x: b.pos.x,
                    y: b.pos.y,
                    vx: b.vel.x,
                    vy: b.vel.y,
                    radius: b.radius(),
                    color: self.palette.color_of(b.id()),
                })
                .collect(),
        }
    }
}

/// Format an energy value for display
pub fn format_energy(energy: f64) -> String {
    format!("{energy:.2}J")
}
