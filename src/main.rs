//! Ender Platformer headless runner
//!
//! Plays the level with the autopilot against the in-memory presenter and
//! reports what happened. Useful for soak-testing tuning and level files.

use std::cell::Cell;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use clap::Parser;
use serde::Serialize;

use ender_platformer::platform::HeadlessPresenter;
use ender_platformer::sim::{Autopilot, ExitReason, GameEvent, LevelData, SessionPhase};
use ender_platformer::{ConfigError, Difficulty, Session, Tuning, init_logging};

/// Tick-driven platformer core, run headless
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of ticks to simulate (60 per second)
    #[arg(short, long, default_value_t = 3600)]
    ticks: u64,

    /// Autopilot seed
    #[arg(short, long, default_value_t = 1)]
    seed: u64,

    /// Tuning JSON file (missing fields use defaults)
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Level JSON file with base/leap/flag rows
    #[arg(long)]
    levels: Option<PathBuf>,

    /// Difficulty preset: easy, normal or hard
    #[arg(short, long, value_parser = parse_difficulty)]
    difficulty: Option<Difficulty>,

    /// Print the run summary as JSON
    #[arg(long)]
    summary_json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
    Difficulty::from_str(s).ok_or_else(|| format!("unknown difficulty '{s}'"))
}

#[derive(Debug, Default, Serialize)]
struct Summary {
    ticks: u64,
    phase: String,
    lives: u32,
    deaths: u32,
    checkpoints: u32,
    enemies_killed: u32,
    bullets_fired: u32,
    boss_dead: bool,
    layout: String,
    player_x: i32,
    exit_reason: Option<String>,
}

fn load_config(args: &Args) -> Result<(Tuning, LevelData), ConfigError> {
    let mut tuning = match &args.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    // Aim spawns without an explicit easiness follow the preset
    if let Some(difficulty) = args.difficulty {
        tuning.difficulty = difficulty;
    }
    let level = match &args.levels {
        Some(path) => LevelData::load(path)?,
        None => LevelData::default(),
    };
    Ok((tuning, level))
}

fn run(args: &Args) -> Result<Summary, ConfigError> {
    let (tuning, level) = load_config(args)?;

    let exit_reason: Rc<Cell<Option<ExitReason>>> = Rc::new(Cell::new(None));
    let menu = {
        let exit_reason = Rc::clone(&exit_reason);
        move |reason: ExitReason| exit_reason.set(Some(reason))
    };
    let mut session = Session::new(tuning, level, HeadlessPresenter::new(), menu)?;
    let mut pilot = Autopilot::new(args.seed);
    let mut summary = Summary::default();

    for _ in 0..args.ticks {
        let input = pilot.next_input(session.state());
        for event in session.step(&input) {
            match event {
                GameEvent::PlayerDied { .. } => summary.deaths += 1,
                GameEvent::CheckpointSaved { .. } => summary.checkpoints += 1,
                GameEvent::EnemyKilled { .. } => summary.enemies_killed += 1,
                GameEvent::BulletFired { .. } => summary.bullets_fired += 1,
                _ => {}
            }
        }
        if matches!(session.phase(), SessionPhase::Exited | SessionPhase::Finished) {
            break;
        }
    }

    let state = session.state();
    summary.ticks = state.time_ticks;
    summary.phase = format!("{:?}", state.session.phase);
    summary.lives = state.session.lives;
    summary.boss_dead = state.session.boss_dead;
    summary.layout = state.layout.variant.as_str().to_string();
    summary.player_x = state.player.rect.x;
    summary.exit_reason = exit_reason.get().map(|r| format!("{r:?}"));
    Ok(summary)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);
    log::info!("Ender Platformer (headless) starting, seed {}", args.seed);

    let summary = match run(&args) {
        Ok(summary) => summary,
        Err(err) => {
            log::error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    if args.summary_json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                log::error!("Failed to serialize summary: {err}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!(
            "{} after {} ticks: {} lives left, {} deaths, {} checkpoints, {} enemies killed, layout {}",
            summary.phase,
            summary.ticks,
            summary.lives,
            summary.deaths,
            summary.checkpoints,
            summary.enemies_killed,
            summary.layout
        );
    }
    ExitCode::SUCCESS
}
