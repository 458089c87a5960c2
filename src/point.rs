//! Intersections and their fixed adjacency.
//!
//! Every [`Point`] lives in the board's flat arena and refers to its
//! neighbors by row-major index. Each point also keeps the subset of its
//! neighbors that are currently empty (its liberties); the board updates
//! both sides of that relation on every placement and removal.

use std::fmt;

use crate::constants::{EMPTY, STONE_BLACK, STONE_WHITE};
use crate::group::GroupId;

/// A stone color.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Stone {
    Black,
    White,
}

impl Stone {
    /// The other color.
    pub fn opposite(self) -> Stone {
        match self {
            Stone::Black => Stone::White,
            Stone::White => Stone::Black,
        }
    }
}

impl fmt::Display for Stone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stone::Black => write!(f, "black"),
            Stone::White => write!(f, "white"),
        }
    }
}

/// What sits on an intersection.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Occupancy {
    #[default]
    Empty,
    Black,
    White,
}

impl Occupancy {
    /// The stone on this point, if any.
    pub fn stone(self) -> Option<Stone> {
        match self {
            Occupancy::Empty => None,
            Occupancy::Black => Some(Stone::Black),
            Occupancy::White => Some(Stone::White),
        }
    }

    /// Character used in the canonical board string.
    pub fn to_byte(self) -> u8 {
        match self {
            Occupancy::Empty => EMPTY,
            Occupancy::Black => STONE_BLACK,
            Occupancy::White => STONE_WHITE,
        }
    }

    /// Inverse of [`Occupancy::to_byte`].
    pub fn from_byte(b: u8) -> Option<Occupancy> {
        match b {
            EMPTY => Some(Occupancy::Empty),
            STONE_BLACK => Some(Occupancy::Black),
            STONE_WHITE => Some(Occupancy::White),
            _ => None,
        }
    }
}

impl From<Stone> for Occupancy {
    fn from(stone: Stone) -> Self {
        match stone {
            Stone::Black => Occupancy::Black,
            Stone::White => Occupancy::White,
        }
    }
}

/// One intersection of the board.
#[derive(Clone, Debug)]
pub struct Point {
    col: usize,
    row: usize,
    occupancy: Occupancy,
    /// Orthogonal neighbors, fixed at construction (2, 3 or 4 entries).
    neighbors: Vec<usize>,
    /// Neighbors that are currently empty.
    liberties: Vec<usize>,
    group: Option<GroupId>,
}

impl Point {
    /// Create the point at `(col, row)` of a `size`x`size` board.
    ///
    /// The board starts empty, so the initial liberties are all neighbors.
    pub(crate) fn new(col: usize, row: usize, size: usize) -> Self {
        let neighbors = neighbor_indices(col, row, size);
        Point {
            col,
            row,
            occupancy: Occupancy::Empty,
            liberties: neighbors.clone(),
            neighbors,
            group: None,
        }
    }

    pub fn col(&self) -> usize {
        self.col
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn occupancy(&self) -> Occupancy {
        self.occupancy
    }

    pub fn is_empty(&self) -> bool {
        self.occupancy == Occupancy::Empty
    }

    pub fn neighbors(&self) -> &[usize] {
        &self.neighbors
    }

    /// Neighbors that are currently empty.
    pub fn liberties(&self) -> &[usize] {
        &self.liberties
    }

    /// Group this stone belongs to, or `None` for an empty point.
    pub fn group(&self) -> Option<GroupId> {
        self.group
    }

    pub(crate) fn set_occupancy(&mut self, occupancy: Occupancy) {
        self.occupancy = occupancy;
    }

    pub(crate) fn set_group(&mut self, group: Option<GroupId>) {
        self.group = group;
    }

    /// Mark neighbor `pt` as empty. Ignored if it is already a liberty.
    pub(crate) fn add_liberty(&mut self, pt: usize) {
        debug_assert!(self.neighbors.contains(&pt));
        if !self.liberties.contains(&pt) {
            self.liberties.push(pt);
        }
    }

    /// Mark neighbor `pt` as occupied.
    pub(crate) fn remove_liberty(&mut self, pt: usize) {
        self.liberties.retain(|&l| l != pt);
    }
}

/// Row-major indices of the orthogonal neighbors of `(col, row)`, clipped at
/// the edges. Order: West, East, North, South.
pub fn neighbor_indices(col: usize, row: usize, size: usize) -> Vec<usize> {
    let mut v = Vec::with_capacity(4);
    if col > 0 {
        v.push(row * size + col - 1);
    }
    if col + 1 < size {
        v.push(row * size + col + 1);
    }
    if row > 0 {
        v.push((row - 1) * size + col);
    }
    if row + 1 < size {
        v.push((row + 1) * size + col);
    }
    v
}
