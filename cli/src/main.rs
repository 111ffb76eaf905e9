use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use mines_core::{
    ActionOutcome, AudioNotifier, Amount, GameEngine, GridSize, Persistence, SoundSwitch,
    TileIndex,
};

use crate::bell::TerminalBell;
use crate::store::FileStore;

mod bell;
mod render;
mod store;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity<clap_verbosity_flag::WarnLevel>,

    /// File the session is saved to
    #[arg(long, env = "MINES_STATE", default_value = "mines-state.json")]
    state: PathBuf,

    /// Do not ring the terminal bell
    #[arg(long)]
    mute: bool,

    /// Print the game view as JSON instead of a board
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
enum Command {
    /// Show the board and balance
    Show,
    /// Place the bet and start a round
    Start,
    /// Reveal a gem
    #[command(alias = "r")]
    Reveal { tile: TileIndex },
    /// Call out a mine, ending the round
    #[command(alias = "f")]
    Flag { tile: TileIndex },
    /// Take the current winnings
    #[command(alias = "c")]
    Cashout,
    /// Change the bet amount
    Bet { amount: Amount },
    /// Change the displayed mine count
    Mines { count: u8 },
    /// Change the grid side length
    Grid { size: GridSize },
    /// Override the balance between rounds
    Balance { amount: Amount },
    /// Change the player name
    Name { username: String },
    /// List recent rounds
    History {
        #[arg(short, long, default_value_t = 8)]
        limit: usize,
    },
    /// Summarize all rounds
    Stats,
    /// Read commands from stdin until EOF or `quit`
    Play,
}

/// One line of interactive input.
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_help_flag = true)]
struct Line {
    #[command(subcommand)]
    command: Command,
}

type Engine<N> = GameEngine<FileStore, SoundSwitch<N>>;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();
    let mut sound = SoundSwitch::new(TerminalBell::stderr());
    sound.set_enabled(!args.mute);
    let mut engine = GameEngine::open(FileStore::new(&args.state), sound);
    log::debug!("state file: {}", engine.store().path().display());

    match args.command.unwrap_or(Command::Show) {
        Command::Play => play(&mut engine, args.json),
        command => run(&mut engine, command, args.json),
    }
}

fn run<N: AudioNotifier>(
    engine: &mut Engine<N>,
    command: Command,
    json: bool,
) -> anyhow::Result<()> {
    let mut out = io::stdout().lock();
    match command {
        Command::History { limit } => {
            write!(out, "{}", render::history(engine.session().history.recent(limit)))?;
        }
        Command::Stats => {
            writeln!(out, "{}", render::stats(&engine.stats()))?;
        }
        command => {
            let outcome = apply(engine, command)?;
            if let Some(message) = render::outcome(outcome) {
                writeln!(out, "{message}")?;
            }
            show(engine, &mut out, json)?;
        }
    }
    Ok(())
}

fn play<N: AudioNotifier>(engine: &mut Engine<N>, json: bool) -> anyhow::Result<()> {
    show(engine, &mut io::stdout().lock(), json)?;
    for line in io::stdin().lock().lines() {
        let line = line.context("could not read from stdin")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "q" | "quit" | "exit") {
            break;
        }

        let parsed = Line::try_parse_from(line.split_whitespace());
        let result = match parsed {
            Ok(Line {
                command: Command::Play,
            }) => continue,
            Ok(Line { command }) => run(engine, command, json),
            Err(err) => {
                eprintln!("{err}");
                continue;
            }
        };
        if let Err(err) = result {
            eprintln!("error: {err:#}");
        }
    }
    Ok(())
}

/// Applies a state-changing command to the engine.
fn apply<P: Persistence, N: AudioNotifier>(
    engine: &mut GameEngine<P, N>,
    command: Command,
) -> anyhow::Result<ActionOutcome> {
    Ok(match command {
        Command::Show | Command::History { .. } | Command::Stats | Command::Play => {
            ActionOutcome::NoChange
        }
        Command::Start => engine.start().context("could not start a round")?,
        Command::Reveal { tile } => engine.reveal(tile)?,
        Command::Flag { tile } => engine.resolve_mine(tile)?,
        Command::Cashout => engine.cashout(),
        Command::Bet { amount } => engine.set_bet_amount(amount)?,
        Command::Mines { count } => engine.set_mine_count(count),
        Command::Grid { size } => engine.set_grid_size(size)?,
        Command::Balance { amount } => engine.set_balance(amount)?,
        Command::Name { username } => engine.set_username(username),
    })
}

fn show<P: Persistence, N: AudioNotifier>(
    engine: &GameEngine<P, N>,
    out: &mut impl Write,
    json: bool,
) -> anyhow::Result<()> {
    let view = engine.view();
    if json {
        serde_json::to_writer_pretty(&mut *out, &view)?;
        writeln!(out)?;
    } else {
        write!(out, "{}", render::board(&view))?;
        writeln!(out, "{}", render::status(&view))?;
    }
    Ok(())
}
