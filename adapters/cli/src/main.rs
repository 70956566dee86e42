#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a computer-versus-computer match in the
//! terminal.

mod board;
mod config;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use grid_tactics_core::{Command, Event, Phase, Team};
use grid_tactics_system_ai::{Ai, Config as AiConfig};
use grid_tactics_system_scheduler::HandOffScheduler;
use grid_tactics_world::{self as world, query, World};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::MatchFile;

/// Plays a grid tactics match between two computer opponents.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML match file with `[match]` rules and `[host]` settings.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Seed replacing the one from the match file.
    #[arg(short, long)]
    seed: Option<u64>,
    /// Turn after which an unfinished match is abandoned.
    #[arg(long)]
    max_turns: Option<u32>,
    /// Log filter applied when `RUST_LOG` is unset.
    #[arg(long, default_value = "grid_tactics=info")]
    log_filter: String,
}

fn init_logging(directives: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid log filter `{directives}`"))?,
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

/// Entry point for the grid tactics command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_filter)?;

    let mut file = match &args.config {
        Some(path) => MatchFile::load(path)?,
        None => MatchFile::default(),
    };
    if let Some(seed) = args.seed {
        file.rules.seed = seed;
    }
    if let Some(max_turns) = args.max_turns {
        file.host.max_turns = max_turns;
    }

    let outcome = play(&file)?;
    match outcome {
        Some(winner) => println!("{winner:?} wins"),
        None => println!("no winner after {} turns", file.host.max_turns),
    }
    Ok(())
}

/// Runs the host loop until the match ends or the turn limit passes.
fn play(file: &MatchFile) -> Result<Option<Team>> {
    let seed = file.rules.seed;
    let mut world = World::new(file.rules.clone()).context("failed to set up the match")?;
    let mut opponents = [
        Ai::new(AiConfig::new(Team::Player, seed.wrapping_add(1))),
        Ai::new(AiConfig::new(Team::Ai, seed.wrapping_add(2))),
    ];
    let mut scheduler = HandOffScheduler::new();
    let frame = Duration::from_millis(file.host.frame_ms.max(1));

    info!(
        columns = file.rules.columns,
        rows = file.rules.rows,
        seed,
        "match started"
    );
    println!("{}", board::render(&world));

    let mut pending = Vec::new();
    world::apply(&mut world, Command::TossCoin, &mut pending);
    loop {
        for event in &pending {
            narrate(&world, event);
        }
        if query::phase(&world) == Phase::GameOver {
            return Ok(query::winner(&world));
        }
        if query::turn_number(&world) > file.host.max_turns {
            warn!(max_turns = file.host.max_turns, "turn limit reached");
            return Ok(None);
        }

        let mut commands = Vec::new();
        for opponent in &mut opponents {
            opponent.handle(&pending, &world, &mut commands);
        }
        scheduler.handle(&pending, &mut commands);

        pending.clear();
        for command in commands {
            world::apply(&mut world, command, &mut pending);
        }
        if pending.is_empty() {
            world::apply(&mut world, Command::Tick { dt: frame }, &mut pending);
        }
    }
}

fn narrate(world: &World, event: &Event) {
    match event {
        Event::CoinTossed { starting } => info!(?starting, "coin tossed"),
        Event::UnitPlaced {
            team, kind, cell, ..
        } => info!(?team, ?kind, cell = %cell.label(), "unit placed"),
        Event::TurnStarted { team, turn } => {
            info!(?team, turn, "turn started");
            println!("{}", board::render(world));
        }
        Event::UnitMoved { unit, from, to, .. } => info!(
            unit = unit.get(),
            from = %from.label(),
            to = %to.label(),
            "unit moved"
        ),
        Event::UnitAttacked {
            attacker,
            target,
            damage,
            remaining_health,
        } => info!(
            attacker = attacker.get(),
            target = target.get(),
            damage,
            remaining_health,
            "unit attacked"
        ),
        Event::CounterAttacked {
            unit,
            target,
            damage,
            remaining_health,
        } => info!(
            unit = unit.get(),
            target = target.get(),
            damage,
            remaining_health,
            "counter attack"
        ),
        Event::UnitDestroyed { unit, team, cell } => {
            info!(unit = unit.get(), ?team, cell = %cell.label(), "unit destroyed");
        }
        Event::GameOver { winner } => {
            info!(?winner, "match over");
            println!("{}", board::render(world));
        }
        Event::MoveRejected { unit, reason, .. } => {
            debug!(unit = unit.get(), %reason, "move rejected");
        }
        Event::AttackRejected { attacker, reason } => {
            debug!(attacker = attacker.get(), %reason, "attack rejected");
        }
        _ => {}
    }
}
