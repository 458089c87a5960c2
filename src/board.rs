//! The board rules engine.
//!
//! A [`Board`] owns a flat arena of [`Point`]s (row-major, `row * size + col`)
//! and an arena of groups. Placing a stone follows the usual order:
//!
//! 1. bounds and occupancy checks,
//! 2. a positional-repetition check on the position the move *would* produce,
//!    done before anything is mutated,
//! 3. occupy the point and take it out of its neighbors' liberties,
//! 4. create a group for the stone and merge same-colored neighbor groups,
//! 5. remove enemy neighbor groups left without liberties,
//! 6. remove the stone's own group if it is still without liberties,
//! 7. record the new position in the history.
//!
//! Every rejection leaves the board untouched.

use std::collections::HashSet;
use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::group::{GroupId, Groups};
use crate::point::{Occupancy, Point, Stone};

/// Why a placement was rejected. All of these are recoverable: the board is
/// unchanged and the caller may try another move.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("illegal move: ({col}, {row}) is off the board")]
    OutOfBounds { col: usize, row: usize },
    #[error("illegal move: point not empty")]
    Occupied,
    #[error("illegal move: repeats an earlier position")]
    KoViolation,
}

/// Outcome of a successful placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Placement {
    /// Enemy stones removed by this move.
    pub captured: usize,
    /// Own stones removed because the move left them without liberties
    /// (zero unless the move was suicide).
    pub self_captured: usize,
}

impl Placement {
    pub fn is_suicide(&self) -> bool {
        self.self_captured > 0
    }
}

/// Stones a placement would remove, worked out without touching the board.
struct Resolution {
    captured: Vec<usize>,
    self_captured: Vec<usize>,
}

/// An NxN Go board with capture, suicide and positional-repetition rules.
#[derive(Clone, Debug)]
pub struct Board {
    size: usize,
    points: Vec<Point>,
    groups: Groups,
    /// Every position seen in this match, as canonical signatures.
    history: HashSet<String>,
}

impl Board {
    /// Create an empty `size`x`size` board. The empty position is the first
    /// entry in the history.
    pub fn new(size: usize) -> Self {
        let points = (0..size * size)
            .map(|i| Point::new(i % size, i / size, size))
            .collect();
        let mut board = Board {
            size,
            points,
            groups: Groups::new(),
            history: HashSet::new(),
        };
        board.history.insert(board.signature());
        board
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn in_bounds(&self, col: usize, row: usize) -> bool {
        col < self.size && row < self.size
    }

    /// Row-major index of `(col, row)`.
    pub fn index(&self, col: usize, row: usize) -> usize {
        row * self.size + col
    }

    /// `(col, row)` of a row-major index.
    pub fn coords(&self, idx: usize) -> (usize, usize) {
        (idx % self.size, idx / self.size)
    }

    pub fn point(&self, col: usize, row: usize) -> Option<&Point> {
        if !self.in_bounds(col, row) {
            return None;
        }
        self.points.get(self.index(col, row))
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn groups(&self) -> &Groups {
        &self.groups
    }

    /// Occupancy at `(col, row)`; off-board points read as empty.
    pub fn occupancy(&self, col: usize, row: usize) -> Occupancy {
        self.point(col, row)
            .map(Point::occupancy)
            .unwrap_or(Occupancy::Empty)
    }

    pub fn is_empty(&self, col: usize, row: usize) -> bool {
        self.occupancy(col, row) == Occupancy::Empty
    }

    /// Group of the stone at `(col, row)`, if there is one.
    pub fn group_of(&self, col: usize, row: usize) -> Option<GroupId> {
        self.point(col, row).and_then(Point::group)
    }

    /// Liberties of the group containing the stone at `(col, row)`; zero for
    /// an empty or off-board point.
    pub fn liberty_count(&self, col: usize, row: usize) -> usize {
        self.group_of(col, row)
            .map(|g| self.groups.liberty_count(&self.points, g))
            .unwrap_or(0)
    }

    pub fn stone_count(&self, color: Stone) -> usize {
        let occ = Occupancy::from(color);
        self.points.iter().filter(|p| p.occupancy() == occ).count()
    }

    /// Number of distinct positions seen so far, the empty board included.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Whether `signature` has occurred in this match.
    pub fn seen(&self, signature: &str) -> bool {
        self.history.contains(signature)
    }

    /// Canonical encoding of the position: one character per point in
    /// row-major order (`.` empty, `B` black, `W` white).
    pub fn signature(&self) -> String {
        self.points
            .iter()
            .map(|p| p.occupancy().to_byte() as char)
            .collect()
    }

    /// Passing never changes the board or the history.
    pub fn pass(&mut self) {}

    /// Whether `color` playing at `(col, row)` would remove its own stone
    /// without capturing anything. False for off-board or occupied points.
    pub fn is_suicide(&self, col: usize, row: usize, color: Stone) -> bool {
        if !self.in_bounds(col, row) {
            return false;
        }
        let pt = self.index(col, row);
        self.points[pt].is_empty() && !self.resolve(pt, color).self_captured.is_empty()
    }

    /// Place a stone of `color` at `(col, row)`.
    ///
    /// # Errors
    /// - [`MoveError::OutOfBounds`] if the point is off the board
    /// - [`MoveError::Occupied`] if the point already holds a stone
    /// - [`MoveError::KoViolation`] if the resulting position has occurred
    ///   before in this match
    pub fn place(&mut self, col: usize, row: usize, color: Stone) -> Result<Placement, MoveError> {
        if !self.in_bounds(col, row) {
            return Err(MoveError::OutOfBounds { col, row });
        }
        let pt = self.index(col, row);
        if !self.points[pt].is_empty() {
            return Err(MoveError::Occupied);
        }

        let resolution = self.resolve(pt, color);
        let next = self.signature_after(pt, color, &resolution);
        // A lone suicide stone leaves the position as it was; that is
        // accepted like a pass rather than treated as a repetition.
        if self.history.contains(&next) && next != self.signature() {
            debug!(col, row, %color, "rejected: position repetition");
            return Err(MoveError::KoViolation);
        }

        self.points[pt].set_occupancy(Occupancy::from(color));
        for n in self.points[pt].neighbors().to_vec() {
            self.points[n].remove_liberty(pt);
        }

        let own = self.groups.new_group(&mut self.points, pt, color);
        for n in self.points[pt].neighbors().to_vec() {
            if self.points[n].occupancy() != Occupancy::from(color) {
                continue;
            }
            if let Some(other) = self.points[n].group() {
                self.groups.merge(&mut self.points, own, other);
            }
        }

        let mut placement = Placement::default();
        for n in self.points[pt].neighbors().to_vec() {
            if self.points[n].occupancy() != Occupancy::from(color.opposite()) {
                continue;
            }
            if let Some(enemy) = self.points[n].group() {
                if self.groups.liberty_count(&self.points, enemy) == 0 {
                    placement.captured += self.remove_group(enemy);
                }
            }
        }
        if self.groups.liberty_count(&self.points, own) == 0 {
            placement.self_captured = self.remove_group(own);
        }

        if placement.captured > 0 {
            debug!(col, row, %color, captured = placement.captured, "captured stones");
        }
        if placement.is_suicide() {
            debug!(col, row, %color, removed = placement.self_captured, "suicide");
        }
        debug_assert_eq!(placement.captured, resolution.captured.len());
        debug_assert_eq!(placement.self_captured, resolution.self_captured.len());
        debug_assert_eq!(self.signature(), next);

        self.history.insert(next);
        Ok(placement)
    }

    /// Remove every stone of group `id` and give the vacated points back to
    /// their neighbors as liberties. Returns the number of stones removed.
    pub fn remove_group(&mut self, id: GroupId) -> usize {
        let Some(group) = self.groups.release(id) else {
            return 0;
        };
        for &pt in group.members() {
            self.points[pt].set_occupancy(Occupancy::Empty);
            self.points[pt].set_group(None);
            for n in self.points[pt].neighbors().to_vec() {
                self.points[n].add_liberty(pt);
            }
        }
        group.len()
    }

    /// Work out which stones placing `color` at `pt` would remove.
    ///
    /// An enemy group is captured iff `pt` is its only liberty. Without a
    /// capture, the new stone dies iff it has no empty neighbor and every
    /// friendly group it joins has no liberty besides `pt`; it then takes
    /// those groups with it.
    fn resolve(&self, pt: usize, color: Stone) -> Resolution {
        let friend = Occupancy::from(color);
        let enemy = Occupancy::from(color.opposite());
        let mut seen: Vec<GroupId> = Vec::new();
        let mut captured = Vec::new();
        let mut friends = Vec::new();

        for &n in self.points[pt].neighbors() {
            let occ = self.points[n].occupancy();
            let Some(g) = self.points[n].group() else {
                continue;
            };
            if seen.contains(&g) {
                continue;
            }
            seen.push(g);
            let libs = self.groups.liberties(&self.points, g);
            let only_pt = libs.len() == 1 && libs.contains(&pt);
            if occ == enemy && only_pt {
                if let Some(group) = self.groups.get(g) {
                    captured.extend_from_slice(group.members());
                }
            } else if occ == friend {
                friends.push((g, only_pt));
            }
        }

        let mut self_captured = Vec::new();
        let breathes = !captured.is_empty()
            || !self.points[pt].liberties().is_empty()
            || friends.iter().any(|&(_, only_pt)| !only_pt);
        if !breathes {
            self_captured.push(pt);
            for (g, _) in friends {
                if let Some(group) = self.groups.get(g) {
                    self_captured.extend_from_slice(group.members());
                }
            }
        }
        Resolution {
            captured,
            self_captured,
        }
    }

    fn signature_after(&self, pt: usize, color: Stone, resolution: &Resolution) -> String {
        let mut bytes: Vec<u8> = self.points.iter().map(|p| p.occupancy().to_byte()).collect();
        bytes[pt] = Occupancy::from(color).to_byte();
        for &r in resolution.captured.iter().chain(&resolution.self_captured) {
            bytes[r] = Occupancy::Empty.to_byte();
        }
        bytes.into_iter().map(char::from).collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            for col in 0..self.size {
                let ch = self.occupancy(col, row).to_byte() as char;
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
