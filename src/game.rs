//! Match coordination around a [`Board`].
//!
//! The board only knows the rules of a single placement. A [`Match`] adds
//! what sits around it: whose turn it is, counting consecutive passes, and
//! deciding when the game is over. Matches can be driven directly, by
//! [`play_match`] with two [`Player`]s, or from several threads through
//! [`spawn_match`], which funnels every submitted move through one channel so
//! the board only ever sees one move at a time.

use std::sync::mpsc;
use std::thread;

use thiserror::Error;
use tracing::{debug, info};

use crate::board::{Board, MoveError, Placement};
use crate::constants::{PASSES_TO_END, WIRE_PASS};
use crate::point::{Occupancy, Stone};
use crate::score::{Score, score};

/// A move in a match.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Move {
    Place { col: usize, row: usize },
    Pass,
}

impl Move {
    /// Decode the flat-index wire form: `-1` passes, otherwise
    /// `col = i % size`, `row = i / size`.
    pub fn from_wire(i: i64, size: usize) -> Result<Move, MatchError> {
        if i == WIRE_PASS {
            return Ok(Move::Pass);
        }
        let idx = usize::try_from(i).map_err(|_| MatchError::BadIndex(i))?;
        if idx >= size * size {
            return Err(MatchError::BadIndex(i));
        }
        Ok(Move::Place {
            col: idx % size,
            row: idx / size,
        })
    }

    /// Encode as a flat index.
    pub fn to_wire(self, size: usize) -> i64 {
        match self {
            Move::Pass => WIRE_PASS,
            Move::Place { col, row } => (row * size + col) as i64,
        }
    }
}

/// Errors from submitting a move to a match.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MatchError {
    #[error("not your turn: {expected} to play")]
    NotYourTurn { expected: Stone },
    #[error("the match is over")]
    Ended,
    #[error("move index {0} is not on the board")]
    BadIndex(i64),
    #[error("the match is no longer running")]
    Disconnected,
    #[error(transparent)]
    Illegal(#[from] MoveError),
}

/// Why a match ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EndReason {
    Passes,
    /// Stopped by the caller after a fixed number of moves.
    MoveLimit,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MatchState {
    InProgress,
    Ended(EndReason),
}

/// What an accepted move did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Turn {
    Played(Placement),
    Passed,
}

/// One game between Black and White. Black moves first.
#[derive(Clone, Debug)]
pub struct Match {
    board: Board,
    to_move: Stone,
    passes: u32,
    moves: usize,
    state: MatchState,
}

impl Match {
    pub fn new(size: usize) -> Self {
        Match {
            board: Board::new(size),
            to_move: Stone::Black,
            passes: 0,
            moves: 0,
            state: MatchState::InProgress,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Stone {
        self.to_move
    }

    pub fn state(&self) -> MatchState {
        self.state
    }

    pub fn is_over(&self) -> bool {
        self.state != MatchState::InProgress
    }

    /// Accepted moves so far, passes included.
    pub fn moves(&self) -> usize {
        self.moves
    }

    pub fn consecutive_passes(&self) -> u32 {
        self.passes
    }

    /// Submit `mv` for `color`.
    ///
    /// A rejected move leaves the turn with the same player.
    pub fn submit(&mut self, color: Stone, mv: Move) -> Result<Turn, MatchError> {
        if self.is_over() {
            return Err(MatchError::Ended);
        }
        if color != self.to_move {
            return Err(MatchError::NotYourTurn {
                expected: self.to_move,
            });
        }

        let turn = match mv {
            Move::Pass => {
                self.board.pass();
                self.passes += 1;
                Turn::Passed
            }
            Move::Place { col, row } => {
                let placement = self.board.place(col, row, color)?;
                self.passes = 0;
                Turn::Played(placement)
            }
        };
        self.moves += 1;
        self.to_move = color.opposite();

        if self.passes >= PASSES_TO_END {
            self.end(EndReason::Passes);
        }
        Ok(turn)
    }

    /// End the match now, e.g. when a move cap is reached.
    pub fn end(&mut self, reason: EndReason) {
        if !self.is_over() {
            info!(?reason, moves = self.moves, "match over");
            self.state = MatchState::Ended(reason);
        }
    }

    /// Final score, once the match is over.
    pub fn result(&self) -> Option<Score> {
        self.is_over().then(|| score(&self.board))
    }
}

/// Something that picks moves for one side.
pub trait Player {
    fn name(&self) -> &str;

    /// Choose a move for `color`. Called again on the same position if the
    /// previous choice was rejected.
    fn choose(&mut self, board: &Board, color: Stone) -> Move;
}

/// A player that always passes.
#[derive(Debug, Default)]
pub struct PassPlayer;

impl Player for PassPlayer {
    fn name(&self) -> &str {
        "pass"
    }

    fn choose(&mut self, _board: &Board, _color: Stone) -> Move {
        Move::Pass
    }
}

/// A player that picks uniformly among empty points, never filling a point
/// surrounded only by its own stones and never playing a suicide. Passes
/// when nothing is left.
#[derive(Debug)]
pub struct RandomPlayer {
    rng: fastrand::Rng,
}

impl RandomPlayer {
    pub fn new() -> Self {
        RandomPlayer {
            rng: fastrand::Rng::new(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        RandomPlayer {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl Default for RandomPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl Player for RandomPlayer {
    fn name(&self) -> &str {
        "random"
    }

    fn choose(&mut self, board: &Board, color: Stone) -> Move {
        let own = Occupancy::from(color);
        let points = board.points();
        let candidates: Vec<usize> = points
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_empty())
            .filter(|(_, p)| {
                !p.neighbors()
                    .iter()
                    .all(|&n| points[n].occupancy() == own)
            })
            .map(|(i, _)| i)
            .filter(|&i| {
                let (col, row) = board.coords(i);
                !board.is_suicide(col, row, color)
            })
            .collect();
        if candidates.is_empty() {
            return Move::Pass;
        }
        let (col, row) = board.coords(candidates[self.rng.usize(..candidates.len())]);
        Move::Place { col, row }
    }
}

/// Attempts a player gets to find a legal move before it is made to pass.
const MAX_ATTEMPTS: usize = 16;

/// Let `player` move for the side to play. After [`MAX_ATTEMPTS`] rejected
/// choices the player passes instead. Returns the move that was accepted.
pub fn play_turn(m: &mut Match, player: &mut dyn Player) -> Result<(Move, Turn), MatchError> {
    let color = m.to_move();
    for _ in 0..MAX_ATTEMPTS {
        let mv = player.choose(m.board(), color);
        match m.submit(color, mv) {
            Ok(turn) => return Ok((mv, turn)),
            Err(MatchError::Illegal(e)) => debug!(%color, ?mv, error = %e, "move rejected"),
            Err(e) => return Err(e),
        }
    }
    let turn = m.submit(color, Move::Pass)?;
    Ok((Move::Pass, turn))
}

/// Play a match between `black` and `white` until both pass in a row or
/// `max_moves` moves have been made.
pub fn play_match(
    size: usize,
    black: &mut dyn Player,
    white: &mut dyn Player,
    max_moves: usize,
) -> Match {
    let mut m = Match::new(size);
    info!(size, black = black.name(), white = white.name(), "match start");

    while !m.is_over() {
        if m.moves() >= max_moves {
            m.end(EndReason::MoveLimit);
            break;
        }
        // Only fails once the match is over, which ends the loop.
        let _ = match m.to_move() {
            Stone::Black => play_turn(&mut m, black),
            Stone::White => play_turn(&mut m, white),
        };
    }

    if let Some(s) = m.result() {
        info!(score = %s, "final score");
    }
    m
}

struct Submission {
    color: Stone,
    mv: Move,
    reply: mpsc::Sender<Result<Turn, MatchError>>,
}

/// Cloneable sender side of a running match.
#[derive(Clone)]
pub struct MatchClient {
    tx: mpsc::Sender<Submission>,
}

impl MatchClient {
    /// Submit a move and wait for the match thread to apply it.
    pub fn submit(&self, color: Stone, mv: Move) -> Result<Turn, MatchError> {
        let (reply, rx) = mpsc::channel();
        self.tx
            .send(Submission { color, mv, reply })
            .map_err(|_| MatchError::Ended)?;
        rx.recv().map_err(|_| MatchError::Disconnected)?
    }
}

/// A match running on its own thread.
pub struct MatchHandle {
    client: MatchClient,
    join: thread::JoinHandle<Match>,
}

impl MatchHandle {
    pub fn client(&self) -> MatchClient {
        self.client.clone()
    }

    /// Stop accepting moves and hand back the match. Waits until every
    /// client has been dropped or the match is over.
    pub fn finish(self) -> Result<Match, MatchError> {
        drop(self.client);
        self.join.join().map_err(|_| MatchError::Disconnected)
    }
}

/// Start a match on a dedicated thread. All moves go through one channel and
/// are applied in arrival order.
pub fn spawn_match(size: usize) -> MatchHandle {
    let (tx, rx) = mpsc::channel::<Submission>();
    let join = thread::spawn(move || {
        let mut m = Match::new(size);
        for sub in rx {
            let result = m.submit(sub.color, sub.mv);
            // The submitter may have given up waiting.
            let _ = sub.reply.send(result);
            if m.is_over() {
                break;
            }
        }
        m
    });
    MatchHandle {
        client: MatchClient { tx },
        join,
    }
}
