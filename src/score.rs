//! Area scoring.
//!
//! Each color gets one point per stone on the board plus one point per empty
//! point that only its stones can reach through empty points. Regions reached
//! by both colors (dame) score for nobody. White receives [`KOMI`].

use std::fmt;

use crate::board::Board;
use crate::constants::KOMI;
use crate::point::{Occupancy, Stone};

/// Final score of a position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    pub black_stones: usize,
    pub black_territory: usize,
    pub white_stones: usize,
    pub white_territory: usize,
    pub komi: f64,
}

impl Score {
    pub fn black(&self) -> f64 {
        (self.black_stones + self.black_territory) as f64
    }

    pub fn white(&self) -> f64 {
        (self.white_stones + self.white_territory) as f64 + self.komi
    }

    /// The color with the higher total. With a fractional komi there is
    /// always one.
    pub fn winner(&self) -> Stone {
        if self.black() > self.white() {
            Stone::Black
        } else {
            Stone::White
        }
    }

    /// Winning margin.
    pub fn margin(&self) -> f64 {
        (self.black() - self.white()).abs()
    }
}

impl fmt::Display for Score {
    /// GTP `final_score` notation, e.g. `B+1.5`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self.winner() {
            Stone::Black => 'B',
            Stone::White => 'W',
        };
        write!(f, "{c}+{:.1}", self.margin())
    }
}

/// Score the board. Read-only: reachability flags are local to this call.
pub fn score(board: &Board) -> Score {
    let from_black = reachable_empty(board, Stone::Black);
    let from_white = reachable_empty(board, Stone::White);

    let black_territory = from_black
        .iter()
        .zip(&from_white)
        .filter(|&(&b, &w)| b && !w)
        .count();
    let white_territory = from_white
        .iter()
        .zip(&from_black)
        .filter(|&(&w, &b)| w && !b)
        .count();

    Score {
        black_stones: board.stone_count(Stone::Black),
        black_territory,
        white_stones: board.stone_count(Stone::White),
        white_territory,
        komi: KOMI,
    }
}

/// Flood-fill from every stone of `color` across empty points. Returns a
/// per-point flag that is set for each empty point reached.
fn reachable_empty(board: &Board, color: Stone) -> Vec<bool> {
    let points = board.points();
    let occ = Occupancy::from(color);
    let mut reached = vec![false; points.len()];
    let mut stack: Vec<usize> = points
        .iter()
        .enumerate()
        .filter(|(_, p)| p.occupancy() == occ)
        .map(|(i, _)| i)
        .collect();

    while let Some(pt) = stack.pop() {
        for &n in points[pt].neighbors() {
            if !reached[n] && points[n].is_empty() {
                reached[n] = true;
                stack.push(n);
            }
        }
    }
    reached
}
