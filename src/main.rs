use anyhow::{anyhow, Result};
use clap::Parser;
use env_logger::Env;
use log::{info, trace};
use std::path::PathBuf;

use fitplayer::model::WorkoutStore;
use fitplayer::player::{clock, EngineOptions, PlaybackEngine, PlayerSurface, SessionOutcome};
use fitplayer::session::SqliteHistory;
use fitplayer::utils::Config;
use fitplayer::video::{Frame, SyntheticFactory};

/// fitplayer - timed workout circuit playback
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Workout to play, by name
    #[arg(value_name = "WORKOUT")]
    workout: Option<String>,

    /// Workouts file (defaults to the configured location)
    #[arg(short = 'f', long, value_name = "FILE")]
    workouts_file: Option<PathBuf>,

    /// History database (defaults to the configured location)
    #[arg(long, value_name = "FILE")]
    db: Option<PathBuf>,

    /// List available workouts and exit
    #[arg(short, long)]
    list: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load()?;

    let log_level = if args.debug {
        "debug"
    } else {
        config.general.log_level.as_str()
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level))
        .format_timestamp_millis()
        .init();

    info!("Starting fitplayer v{}", env!("CARGO_PKG_VERSION"));

    let workouts_path = args
        .workouts_file
        .unwrap_or_else(|| config.storage.workouts_file.clone());
    let store = WorkoutStore::new(&workouts_path);
    let workouts = store.load_all()?;

    if args.list {
        if workouts.is_empty() {
            println!("No workouts in {:?}", workouts_path);
        }
        for workout in &workouts {
            println!(
                "{}  ({} exercises, {})",
                workout.display_name(),
                workout.exercise_count(),
                clock::format_mmss(workout.total_duration_secs()),
            );
        }
        return Ok(());
    }

    let name = args
        .workout
        .ok_or_else(|| anyhow!("No workout named; use --list to see what is available"))?;
    let workout = workouts
        .iter()
        .find(|w| w.display_name() == name)
        .ok_or_else(|| anyhow!("Workout '{}' not found in {:?}", name, workouts_path))?;

    let db_path = args.db.unwrap_or_else(|| config.storage.history_db.clone());
    let history = SqliteHistory::open(&db_path)?;

    // Headless run: frames are synthesized, timers and progress go to the
    // log. Swap the factory and surface to plug in a real decoder and UI.
    let (engine, handle) = PlaybackEngine::new(
        workout,
        Box::new(SyntheticFactory::default()),
        Box::new(history),
        Box::new(ConsoleSurface::default()),
        EngineOptions::default(),
    )?;

    handle.start();
    let summary = engine.run();

    match summary.outcome {
        SessionOutcome::Completed => println!(
            "Workout Completed! Total Time: {}",
            clock::format_total(summary.total_elapsed)
        ),
        SessionOutcome::Interrupted => println!(
            "Workout Interrupted. Total Time: {}",
            clock::format_total(summary.total_elapsed)
        ),
    }

    Ok(())
}

/// Surface that reports playback on the console log
#[derive(Default)]
struct ConsoleSurface {
    last_segment_timer: String,
    last_total_timer: String,
}

impl PlayerSurface for ConsoleSurface {
    fn render_frame(&mut self, frame: &Frame) {
        trace!("frame {}x{}", frame.width, frame.height);
    }

    fn set_segment_timer(&mut self, text: &str) {
        if text != self.last_segment_timer {
            info!("segment {}", text);
            self.last_segment_timer = text.to_string();
        }
    }

    fn set_total_timer(&mut self, text: &str) {
        if text != self.last_total_timer {
            trace!("total {}", text);
            self.last_total_timer = text.to_string();
        }
    }

    fn set_progress(&mut self, current: usize, total: usize) {
        info!("Exercise {} of {}", current, total);
    }

    fn show_rest_preview(&mut self, preview: Option<&Frame>) {
        match preview {
            Some(frame) => info!("Next exercise preview ({}x{})", frame.width, frame.height),
            None => info!("Next exercise (no preview available)"),
        }
    }
}
