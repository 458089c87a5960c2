//! Constants for board geometry, scoring, and the canonical board string.
//!
//! Board size is chosen at runtime (see [`crate::board::Board::new`]); the
//! values here are the defaults and fixed rule parameters.

// =============================================================================
// Board Geometry
// =============================================================================

/// Default board size (NxN) used by the CLI and the GTP front end.
pub const DEFAULT_SIZE: usize = 9;

/// Largest supported board size. GTP vertex letters run out past 25 columns.
pub const MAX_SIZE: usize = 25;

// =============================================================================
// Scoring
// =============================================================================

/// Komi (compensation points for White). The half point rules out ties.
pub const KOMI: f64 = 0.5;

// =============================================================================
// Match Flow
// =============================================================================

/// Consecutive passes that end a match.
pub const PASSES_TO_END: u32 = 2;

/// Pass marker in the flat-index wire encoding of a move.
pub const WIRE_PASS: i64 = -1;

// =============================================================================
// Canonical Board String (as bytes for direct comparison)
// =============================================================================

/// Empty point.
pub const EMPTY: u8 = b'.';

/// Black stone.
pub const STONE_BLACK: u8 = b'B';

/// White stone.
pub const STONE_WHITE: u8 = b'W';
