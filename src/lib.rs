//! Goban: a Go board rules engine.
//!
//! Tracks stones on an NxN board, resolves captures and suicide, forbids
//! repeating any earlier whole-board position, and scores finished games by
//! area.
//!
//! ## Modules
//!
//! - [`constants`] - Default board size, komi and board-string characters
//! - [`point`] - Intersections, stone colors and adjacency
//! - [`group`] - Groups of connected stones and their liberties
//! - [`board`] - Placement, capture, suicide and the repetition guard
//! - [`score`] - Area scoring with flood-fill territory
//! - [`game`] - Turn order, passes, players and threaded matches
//! - [`gtp`] - Go Text Protocol front end
//!
//! ## Example
//!
//! ```
//! use goban::board::Board;
//! use goban::point::Stone;
//! use goban::score::score;
//!
//! let mut board = Board::new(9);
//! board.place(2, 2, Stone::Black).unwrap();
//! board.place(6, 6, Stone::White).unwrap();
//! assert_eq!(board.liberty_count(2, 2), 4);
//!
//! let s = score(&board);
//! println!("{s}");
//! ```

pub mod board;
pub mod constants;
pub mod game;
pub mod group;
pub mod gtp;
pub mod point;
pub mod score;
