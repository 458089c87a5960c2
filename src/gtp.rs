//! Go Text Protocol (GTP) front end.
//!
//! Lets the engine be driven by GTP controllers and graphical Go programs.
//! Turn order is enforced: `play` must alternate colors, starting with black.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`
//! - `list_commands`, `known_command <cmd>`
//! - `quit`
//! - `boardsize <size>` - Start a new match on a `size`x`size` board
//! - `clear_board` - Start a new match on the current board size
//! - `play <color> <vertex>` - Play a move (`pass` passes)
//! - `genmove <color>` - Let the engine pick and play a move
//! - `showboard` - Print the board
//! - `final_score` - Score the position, e.g. `W+3.5`
//! - `board` - Canonical board string (one character per point, row-major)
//!
//! ## Example
//!
//! ```ignore
//! use goban::gtp::GtpEngine;
//! let mut engine = GtpEngine::new(9)?;
//! engine.run()?;
//! ```

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, anyhow, bail};

use crate::constants::MAX_SIZE;
use crate::game::{Match, Move, RandomPlayer, play_turn};
use crate::point::Stone;
use crate::score::score;

/// The list of known GTP commands.
const KNOWN_COMMANDS: &[&str] = &[
    "board",
    "boardsize",
    "clear_board",
    "final_score",
    "genmove",
    "known_command",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "showboard",
    "version",
];

/// Column letters; GTP skips 'I'.
const COLUMNS: &[u8] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";

/// GTP engine state.
pub struct GtpEngine {
    game: Match,
    player: RandomPlayer,
}

impl GtpEngine {
    /// Create an engine with an empty `size`x`size` board.
    pub fn new(size: usize) -> Result<Self> {
        Self::with_player(size, RandomPlayer::new())
    }

    /// Create an engine whose `genmove` uses `player`. Fails for sizes GTP
    /// vertices cannot name.
    pub fn with_player(size: usize, player: RandomPlayer) -> Result<Self> {
        check_size(size)?;
        Ok(Self {
            game: Match::new(size),
            player,
        })
    }

    /// Run the GTP command loop, reading from stdin and writing to stdout.
    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();

        for line in stdin.lock().lines() {
            let line = line.context("reading GTP command")?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((command, args)) = parts.split_first() else {
                continue;
            };
            let command = command.to_lowercase();

            let (prefix, message) = match self.execute(&command, args) {
                Ok(message) => ('=', message),
                Err(e) => ('?', e.to_string()),
            };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            writeln!(stdout, "{prefix}{id_str} {message}\n")?;
            stdout.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        match trimmed[..end].parse::<u32>() {
            Ok(id) => (Some(id), trimmed[end..].trim()),
            Err(_) => (None, trimmed),
        }
    }

    /// Execute a GTP command and return the response text.
    fn execute(&mut self, command: &str, args: &[&str]) -> Result<String> {
        match command {
            "name" => Ok(env!("CARGO_PKG_NAME").to_string()),

            "version" => Ok(env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => Ok("2".to_string()),

            "list_commands" => Ok(KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let cmd = arg(args, 0)?.to_lowercase();
                Ok(KNOWN_COMMANDS.contains(&cmd.as_str()).to_string())
            }

            "quit" => Ok(String::new()),

            "boardsize" => {
                let size: usize = arg(args, 0)?.parse().context("invalid size")?;
                check_size(size).context("unacceptable size")?;
                self.game = Match::new(size);
                Ok(String::new())
            }

            "clear_board" => {
                self.game = Match::new(self.game.board().size());
                Ok(String::new())
            }

            "play" => {
                let color = parse_color(arg(args, 0)?)?;
                let mv = parse_vertex(arg(args, 1)?, self.game.board().size())?;
                self.game.submit(color, mv)?;
                Ok(String::new())
            }

            "genmove" => {
                let color = parse_color(arg(args, 0)?)?;
                if self.game.is_over() {
                    return Ok("pass".into());
                }
                if color != self.game.to_move() {
                    bail!("not {color}'s turn");
                }
                let (mv, _) = play_turn(&mut self.game, &mut self.player)?;
                Ok(format_vertex(mv, self.game.board().size()))
            }

            "showboard" => Ok(format!("\n{}", self.game.board())),

            "final_score" => Ok(score(self.game.board()).to_string()),

            "board" => Ok(self.game.board().signature()),

            _ => Err(anyhow!("unknown command: {command}")),
        }
    }
}

/// Check that a `size`x`size` board fits the GTP column letters.
pub fn check_size(size: usize) -> Result<()> {
    if !(1..=MAX_SIZE).contains(&size) {
        bail!("board size must be between 1 and {MAX_SIZE}, got {size}");
    }
    Ok(())
}

fn arg<'a>(args: &[&'a str], i: usize) -> Result<&'a str> {
    args.get(i).copied().ok_or_else(|| anyhow!("missing argument"))
}

/// Parse a GTP color (`b`, `black`, `w`, `white`).
pub fn parse_color(s: &str) -> Result<Stone> {
    match s.to_lowercase().as_str() {
        "b" | "black" => Ok(Stone::Black),
        "w" | "white" => Ok(Stone::White),
        _ => bail!("invalid color: {s}"),
    }
}

/// Parse a GTP vertex (e.g. "D4", "pass") on a `size`x`size` board.
///
/// Row 1 is the bottom line of the board, which is row `size - 1` of the
/// engine's top-down numbering.
pub fn parse_vertex(s: &str, size: usize) -> Result<Move> {
    if s.eq_ignore_ascii_case("pass") {
        return Ok(Move::Pass);
    }
    let bytes = s.as_bytes();
    let Some((&letter, digits)) = bytes.split_first() else {
        bail!("empty vertex");
    };
    let col = COLUMNS
        .iter()
        .position(|&c| c == letter.to_ascii_uppercase())
        .ok_or_else(|| anyhow!("invalid vertex: {s}"))?;
    let number: usize = std::str::from_utf8(digits)?
        .parse()
        .with_context(|| format!("invalid vertex: {s}"))?;
    if col >= size || number == 0 || number > size {
        bail!("vertex off the board: {s}");
    }
    Ok(Move::Place {
        col,
        row: size - number,
    })
}

/// Inverse of [`parse_vertex`].
pub fn format_vertex(mv: Move, size: usize) -> String {
    match mv {
        Move::Pass => "pass".into(),
        Move::Place { col, row } => {
            format!("{}{}", COLUMNS[col] as char, size - row)
        }
    }
}
