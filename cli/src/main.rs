use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use blockbusters_core::*;
use clap::Parser;

use settings::{MapPolicy, Settings};

mod questions;
mod render;
mod settings;

/// Simulated seconds per engine update between prompts.
const TICK_SECS: f64 = 0.25;

/// Upper bound on updates while no human input is needed.
const MAX_TICKS: usize = 10_000;

const HELP: &str = "\
Type a board letter to pick a cell, then A-D to answer.
Commands: reset (new board), restart (new board, scores cleared), help, quit";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Settings file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Board map file
    #[arg(short, long)]
    board: Option<PathBuf>,

    /// Question collection (XML), may be repeated
    #[arg(long = "questions")]
    questions: Vec<PathBuf>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// What to do when the board map cannot be read
    #[arg(long, value_enum)]
    on_missing_board: Option<MapPolicy>,

    /// Seat a computer as the second player, answering correctly this often
    #[arg(long)]
    cpu: Option<f64>,

    /// Print the board state as JSON after every command
    #[arg(long)]
    dump_state: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let mut settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if args.board.is_some() {
        settings.board = args.board.clone();
    }
    if !args.questions.is_empty() {
        settings.questions = args.questions.clone();
    }
    if let Some(policy) = args.on_missing_board {
        settings.on_missing_board = policy;
    }
    if let Some(accuracy) = args.cpu {
        settings.seat_cpu(accuracy);
    }

    let seed = args.seed.or(settings.seed).unwrap_or_else(clock_seed);
    log::debug!("seed: {seed}");

    let grid = settings.load_grid()?;
    let bank = questions::load_bank(&settings.questions, seed)?;
    anyhow::ensure!(!bank.is_empty(), "No questions loaded");

    let engine = RoundEngine::new(
        grid,
        settings.seats(seed),
        settings.game.clone(),
        bank,
        seed,
    )
    .context("Could not start the game")?;

    run(engine, args.dump_state)
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

fn run<S: QuestionSupplier>(mut engine: RoundEngine<S>, dump_state: bool) -> Result<()> {
    let stdin = io::stdin();
    let mut out = io::stdout().lock();
    writeln!(out, "{HELP}")?;

    pump(&mut engine, &mut out)?;
    show(&engine, &mut out, dump_state)?;

    for line in stdin.lock().lines() {
        let line = line.context("Could not read input")?;
        let command = line.trim();

        match command.to_ascii_lowercase().as_str() {
            "" => {}
            "quit" | "exit" => break,
            "help" | "?" => writeln!(out, "{HELP}")?,
            "reset" => engine.reset(),
            "restart" => engine.restart(),
            _ => {
                let mut chars = command.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => {
                        if let Err(err) = apply_key(&mut engine, c, &mut out) {
                            writeln!(out, "{err}")?;
                        }
                    }
                    _ => writeln!(out, "Unknown command {command:?}, try help")?,
                }
            }
        }

        pump(&mut engine, &mut out)?;
        show(&engine, &mut out, dump_state)?;
    }
    Ok(())
}

/// A single key answers the posed question or picks a cell.
fn apply_key<S: QuestionSupplier>(
    engine: &mut RoundEngine<S>,
    key: char,
    out: &mut impl Write,
) -> Result<()> {
    if matches!(engine.stage(), TurnStage::QuestionPosed { .. }) {
        let option = OptionLetter::from_char(key).context("Answer with A, B, C or D")?;
        engine.choose_option(option)?;
        // let the result be seen before it takes effect
        show(engine, out, false)?;
    } else if !engine.select_cell(key)?.has_update() {
        writeln!(out, "{key} is not playable right now")?;
    }
    Ok(())
}

/// Advances the engine until it needs a human again or the board ends.
fn pump<S: QuestionSupplier>(engine: &mut RoundEngine<S>, out: &mut impl Write) -> Result<()> {
    for _ in 0..MAX_TICKS {
        if engine.is_finished() || awaits_human(engine) {
            break;
        }
        let name = engine.active_player().name.clone();
        match engine.update(TICK_SECS) {
            UpdateOutcome::Answered(outcome) => {
                writeln!(out, "{name} answers: {outcome:?}")?;
            }
            UpdateOutcome::Resolved(resolution) => {
                writeln!(out, "{}", render::resolution(resolution))?;
            }
            _ => {}
        }
    }
    Ok(())
}

fn awaits_human<S: QuestionSupplier>(engine: &RoundEngine<S>) -> bool {
    engine.phase().accepts_input()
        && !engine.seats()[engine.active_index()].is_cpu()
        && !matches!(engine.stage(), TurnStage::ResultDisplayed { .. })
}

fn show<S: QuestionSupplier>(
    engine: &RoundEngine<S>,
    out: &mut impl Write,
    dump_state: bool,
) -> Result<()> {
    let obs = Observation::from_engine(engine);
    writeln!(out)?;
    write!(out, "{}", render::board(&obs))?;
    write!(out, "{}", render::status(&obs))?;
    if dump_state {
        writeln!(out, "{}", serde_json::to_string(&obs)?)?;
    }
    out.flush()?;
    Ok(())
}
