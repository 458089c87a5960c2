//! Goban: a Go rules engine.
//!
//! ## Usage
//!
//! - `goban` - Show a demo
//! - `goban gtp` - Start a GTP server for GUI integration
//! - `goban selfplay` - Play a random game against itself and print the score
//!
//! Set `RUST_LOG` (e.g. `RUST_LOG=goban=debug`) to see engine logging on stderr.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use goban::board::Board;
use goban::constants::DEFAULT_SIZE;
use goban::game::{PassPlayer, RandomPlayer, play_match};
use goban::gtp::{GtpEngine, check_size};
use goban::point::Stone;
use goban::score::score;

/// Goban: a Go rules engine
#[derive(Parser)]
#[command(name = "goban")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the GTP (Go Text Protocol) server for use with GUI applications
    Gtp {
        /// Board size
        #[arg(long, default_value_t = DEFAULT_SIZE)]
        size: usize,
    },
    /// Run a short demo of captures and scoring
    Demo,
    /// Play random moves for both sides until the game ends
    Selfplay {
        /// Board size
        #[arg(long, default_value_t = DEFAULT_SIZE)]
        size: usize,
        /// Seed for the random players
        #[arg(long)]
        seed: Option<u64>,
        /// Stop after this many moves
        #[arg(long, default_value_t = 1000)]
        max_moves: usize,
        /// Let White always pass
        #[arg(long)]
        passive_white: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Gtp { size }) => {
            GtpEngine::new(size)?.run()
        }
        Some(Commands::Selfplay {
            size,
            seed,
            max_moves,
            passive_white,
        }) => {
            check_size(size)?;
            run_selfplay(size, seed, max_moves, passive_white);
            Ok(())
        }
        Some(Commands::Demo) | None => {
            run_demo()?;
            Ok(())
        }
    }
}

fn run_demo() -> Result<()> {
    println!("Goban: Go rules engine\n");

    println!("=== Capture ===");
    let mut board = Board::new(4);
    for (col, row, color) in [
        (0, 0, Stone::Black),
        (0, 1, Stone::Black),
        (1, 0, Stone::Black),
        (2, 0, Stone::White),
        (1, 1, Stone::White),
    ] {
        board.place(col, row, color)?;
    }
    println!("{board}");
    let placement = board.place(0, 2, Stone::White)?;
    println!("White at (0,2) captures {} stones:", placement.captured);
    println!("{board}");

    println!("=== Scoring ===");
    let mut board = Board::new(4);
    for row in 0..4 {
        board.place(0, row, Stone::Black)?;
        board.place(2, row, Stone::White)?;
    }
    println!("{board}");
    let s = score(&board);
    println!("Black: {:.1}  White: {:.1}  ({s})", s.black(), s.white());
    Ok(())
}

fn run_selfplay(size: usize, seed: Option<u64>, max_moves: usize, passive_white: bool) {
    let seed = seed.unwrap_or_else(|| fastrand::u64(..));
    let mut black = RandomPlayer::with_seed(seed);
    let mut white = RandomPlayer::with_seed(seed.wrapping_add(1));
    let m = if passive_white {
        play_match(size, &mut black, &mut PassPlayer, max_moves)
    } else {
        play_match(size, &mut black, &mut white, max_moves)
    };

    println!("{}", m.board());
    println!("Moves: {} ({:?})", m.moves(), m.state());
    if let Some(s) = m.result() {
        println!("Black: {:.1}  White: {:.1}  Result: {s}", s.black(), s.white());
    }
}
