//! Elastic Arena entry point
//!
//! Headless driver: builds a session from settings, runs frames and logs the
//! energy readout. Drawing is left to whoever embeds the library.

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;

use elastic_arena::{Session, Settings};

#[derive(Parser, Debug)]
#[command(version, about = "Elastic ball collisions in a walled 2D arena")]
struct Args {
    /// Settings file (JSON); defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 1200)]
    frames: u64,

    /// Override the RNG seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Override the number of bodies
    #[arg(short, long)]
    bodies: Option<usize>,

    /// Let bodies pass through each other
    #[arg(long)]
    no_collisions: bool,

    /// Pace frames in real time and scale ticks by elapsed time
    #[arg(long)]
    realtime: bool,

    /// Print the final state as JSON
    #[arg(long)]
    dump: bool,
}

fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };

    if let Some(seed) = args.seed {
        settings.seed = Some(seed);
    }
    if let Some(count) = args.bodies {
        settings.spawn.count = count;
    }
    if args.no_collisions {
        settings.physics.handle_collisions = false;
    }

    settings.validate().context("invalid settings")?;
    Ok(settings)
}

fn main() -> Result<()> {
    env_logger::init();
    log::info!("Elastic Arena starting...");

    let args = Args::parse();
    let settings = load_settings(&args)?;
    let show_stats = settings.display.show_stats;
    let stats_every = u64::from(settings.display.target_fps);
    let frame_budget = Duration::from_secs_f64(1.0 / f64::from(settings.display.fps));

    let mut session = Session::start(settings).context("failed to populate the arena")?;
    log::info!(
        "Starting energy {} with {} bodies",
        session.stats_line(),
        session.arena().len()
    );

    let mut last = Instant::now();
    for _ in 0..args.frames {
        let stats = if args.realtime {
            let spent = last.elapsed();
            if spent < frame_budget {
                thread::sleep(frame_budget - spent);
            }
            let now = Instant::now();
            let elapsed = now.duration_since(last).as_secs_f64();
            last = now;
            session.frame(elapsed)
        } else {
            session.fixed_frame()
        };

        if stats.report.collisions > 0 {
            log::debug!(
                "frame {}: {} collision(s)",
                stats.frame,
                stats.report.collisions
            );
        }
        if show_stats && stats.frame % stats_every == 0 {
            log::info!("frame {}: {}", stats.frame, session.stats_line());
        }
    }

    log::info!(
        "Finished {} frames, final energy {}",
        session.frame_count(),
        session.stats_line()
    );

    if args.dump {
        let json = serde_json::to_string_pretty(&session.snapshot())?;
        println!("{json}");
    }

    Ok(())
}
