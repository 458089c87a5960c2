//! Integration tests for goban
//!
//! Covers the board invariants (liberty bookkeeping, group consistency), the
//! capture/suicide/repetition rules, scoring, and whole matches.

use std::collections::HashSet;

use goban::board::{Board, MoveError};
use goban::game::{Match, MatchError, Move, RandomPlayer, Player, play_match};
use goban::point::{Occupancy, Point, Stone};
use goban::score::score;

// =============================================================================
// Helper functions for setting up test positions
// =============================================================================

/// Place stones in order, panicking on any rejection.
fn setup(size: usize, moves: &[(usize, usize, Stone)]) -> Board {
    let mut board = Board::new(size);
    for &(col, row, color) in moves {
        if let Err(e) = board.place(col, row, color) {
            panic!("setup move ({col}, {row}) {color} rejected: {e}");
        }
    }
    board
}

/// Place black stones at `black` and white stones at `white`.
fn setpos(size: usize, black: &[(usize, usize)], white: &[(usize, usize)]) -> Board {
    let mut moves = Vec::new();
    moves.extend(black.iter().map(|&(c, r)| (c, r, Stone::Black)));
    moves.extend(white.iter().map(|&(c, r)| (c, r, Stone::White)));
    setup(size, &moves)
}

/// Own liberties of the point at `(col, row)`.
fn point_liberties(board: &Board, col: usize, row: usize) -> usize {
    board.point(col, row).unwrap().liberties().len()
}

/// Check every structural invariant of the board.
fn assert_invariants(board: &Board) {
    let points = board.points();
    for (i, p) in points.iter().enumerate() {
        for &q in p.neighbors() {
            assert_eq!(
                p.liberties().contains(&q),
                points[q].is_empty(),
                "liberty of point {i} towards {q} out of sync"
            );
        }
        assert!(p.liberties().iter().all(|l| p.neighbors().contains(l)));

        match (p.occupancy().stone(), p.group()) {
            (None, None) => {}
            (Some(color), Some(g)) => {
                let group = board.groups().get(g).expect("point refers to a dead group");
                assert_eq!(group.color(), color);
                assert!(group.members().contains(&i));
                for &q in p.neighbors() {
                    if points[q].occupancy() == p.occupancy() {
                        assert_eq!(points[q].group(), Some(g), "group is not maximal at {i}");
                    }
                }
            }
            (stone, group) => panic!("point {i} has stone {stone:?} but group {group:?}"),
        }
    }

    let mut seen = HashSet::new();
    for (g, group) in board.groups().iter() {
        assert!(!group.is_empty());
        assert!(
            board.groups().liberty_count(points, g) > 0,
            "group without liberties survived"
        );
        for &m in group.members() {
            assert!(seen.insert(m), "point {m} is in two groups");
            assert_eq!(points[m].group(), Some(g));
        }
    }
}

// =============================================================================
// Adjacency and liberties
// =============================================================================

#[test]
fn test_empty_board_liberties() {
    let board = Board::new(4);
    assert_eq!(point_liberties(&board, 0, 0), 2);
    assert_eq!(point_liberties(&board, 1, 0), 3);
    assert_eq!(point_liberties(&board, 1, 1), 4);
    assert_eq!(point_liberties(&board, 3, 3), 2);
    assert_eq!(board.point(4, 0).map(|p| p.neighbors().len()), None);
    assert_invariants(&board);
}

#[test]
fn test_placement_reduces_liberties() {
    let board = setup(4, &[(0, 0, Stone::Black)]);
    assert_eq!(point_liberties(&board, 0, 0), 2);
    assert_eq!(board.liberty_count(0, 0), 2);
    assert_eq!(point_liberties(&board, 1, 0), 2);
    assert_eq!(point_liberties(&board, 0, 1), 2);
    assert_invariants(&board);
}

#[test]
fn test_neighbor_stones_share_liberties() {
    // B B .
    // . . .
    let board = setup(3, &[(0, 0, Stone::Black), (1, 0, Stone::Black)]);
    assert_eq!(board.group_of(0, 0), board.group_of(1, 0));
    assert_eq!(board.liberty_count(0, 0), 3);
    assert_invariants(&board);
}

#[test]
fn test_enemy_stones_stay_separate() {
    let board = setup(3, &[(0, 0, Stone::Black), (1, 0, Stone::White)]);
    assert_ne!(board.group_of(0, 0), board.group_of(1, 0));
    assert_eq!(board.liberty_count(0, 0), 1);
    assert_eq!(board.liberty_count(1, 0), 2);
    assert_invariants(&board);
}

#[test]
fn test_bridging_stone_merges_groups() {
    let mut board = setpos(4, &[(0, 1), (2, 1)], &[]);
    assert_ne!(board.group_of(0, 1), board.group_of(2, 1));
    board.place(1, 1, Stone::Black).unwrap();
    assert_eq!(board.group_of(0, 1), board.group_of(2, 1));
    assert_eq!(board.groups().count(), 1);
    assert_eq!(board.liberty_count(1, 1), 7);
    assert_invariants(&board);
}

// =============================================================================
// Capture tests
// =============================================================================

#[test]
fn test_capture_corner_group() {
    let board = setup(
        4,
        &[
            (0, 0, Stone::Black),
            (0, 1, Stone::Black),
            (1, 0, Stone::Black),
            (2, 0, Stone::White),
            (1, 1, Stone::White),
            (0, 2, Stone::White),
        ],
    );
    for (c, r) in [(0, 0), (0, 1), (1, 0)] {
        assert!(board.is_empty(c, r), "({c}, {r}) should be captured");
        assert_eq!(board.group_of(c, r), None);
    }
    assert_eq!(point_liberties(&board, 0, 0), 2);
    assert_eq!(point_liberties(&board, 0, 1), 1);
    assert_eq!(point_liberties(&board, 1, 0), 1);
    assert_eq!(board.liberty_count(1, 1), 4);
    assert_eq!(board.stone_count(Stone::Black), 0);
    assert_invariants(&board);
}

#[test]
fn test_capture_reports_stone_count() {
    let mut board = setup(
        4,
        &[
            (0, 0, Stone::Black),
            (0, 1, Stone::Black),
            (1, 0, Stone::Black),
            (2, 0, Stone::White),
            (1, 1, Stone::White),
        ],
    );
    let placement = board.place(0, 2, Stone::White).unwrap();
    assert_eq!(placement.captured, 3);
    assert_eq!(placement.self_captured, 0);
}

#[test]
fn test_capture_two_groups_at_once() {
    // . W B .
    // W B B .
    // B . . .
    // Both white stones have (0,0) as their last liberty.
    let mut board = setpos(
        4,
        &[(0, 2), (2, 0), (1, 1), (2, 1)],
        &[(0, 1), (1, 0)],
    );
    let placement = board.place(0, 0, Stone::Black).unwrap();
    assert_eq!(placement.captured, 2);
    assert!(board.is_empty(0, 1));
    assert!(board.is_empty(1, 0));
    assert_eq!(board.liberty_count(0, 0), 2);
    assert_invariants(&board);
}

#[test]
fn test_suicide_resolved_after_capture() {
    // Black at (0,0) has no empty neighbor, but captures White (1,0).
    let mut board = setpos(3, &[(0, 1), (2, 0), (1, 1)], &[(1, 0), (0, 2)]);
    let placement = board.place(0, 0, Stone::Black).unwrap();
    assert_eq!(placement.captured, 1);
    assert!(!placement.is_suicide());
    assert_eq!(board.occupancy(0, 0), Occupancy::Black);
    assert_eq!(board.group_of(0, 0), board.group_of(1, 1));
    assert_eq!(board.liberty_count(0, 0), 3);
    assert_invariants(&board);
}

#[test]
fn test_suicide_without_capture_removes_group() {
    let mut board = setup(
        3,
        &[
            (0, 0, Stone::Black),
            (1, 0, Stone::White),
            (1, 1, Stone::White),
            (0, 2, Stone::White),
        ],
    );
    let placement = board.place(0, 1, Stone::Black).unwrap();
    assert_eq!(placement.self_captured, 2);
    assert!(board.is_empty(0, 0));
    assert!(board.is_empty(0, 1));
    assert_eq!(board.stone_count(Stone::White), 3);
    assert_invariants(&board);
}

#[test]
fn test_single_stone_suicide_is_removed() {
    let mut board = setpos(3, &[], &[(1, 0), (0, 1)]);
    let before = board.signature();
    let placement = board.place(0, 0, Stone::Black).unwrap();
    assert!(placement.is_suicide());
    assert!(board.is_empty(0, 0));
    assert_eq!(board.signature(), before);
    assert_invariants(&board);
}

// =============================================================================
// Repetition guard
// =============================================================================

/// Ko shape on a 4x4 board after Black captures at (2,1):
/// . B W .
/// B . B W
/// . B W .
fn ko_position() -> Board {
    let mut board = setup(
        4,
        &[
            (1, 0, Stone::Black),
            (0, 1, Stone::Black),
            (1, 2, Stone::Black),
            (2, 0, Stone::White),
            (3, 1, Stone::White),
            (2, 2, Stone::White),
            (1, 1, Stone::White),
        ],
    );
    let placement = board.place(2, 1, Stone::Black).unwrap();
    assert_eq!(placement.captured, 1);
    board
}

#[test]
fn test_ko_retake_rejected_without_mutation() {
    let mut board = ko_position();
    let before = board.signature();
    let history = board.history_len();
    let libs: Vec<usize> = board.points().iter().map(|p| p.liberties().len()).collect();

    assert_eq!(board.place(1, 1, Stone::White), Err(MoveError::KoViolation));

    assert_eq!(board.signature(), before);
    assert_eq!(board.history_len(), history);
    let after: Vec<usize> = board.points().iter().map(|p| p.liberties().len()).collect();
    assert_eq!(libs, after);
    assert_invariants(&board);
}

#[test]
fn test_ko_retake_allowed_elsewhere_first() {
    let mut board = ko_position();
    board.place(3, 3, Stone::White).unwrap();
    board.place(0, 3, Stone::Black).unwrap();
    // The position after retaking now has extra stones, so it is new.
    let placement = board.place(1, 1, Stone::White).unwrap();
    assert_eq!(placement.captured, 1);
    assert!(board.is_empty(2, 1));
    assert_invariants(&board);
}

#[test]
fn test_rejections_leave_board_unchanged() {
    let mut board = ko_position();
    let before = board.signature();
    assert_eq!(
        board.place(0, 9, Stone::Black),
        Err(MoveError::OutOfBounds { col: 0, row: 9 })
    );
    assert_eq!(board.place(1, 0, Stone::White), Err(MoveError::Occupied));
    assert_eq!(board.signature(), before);
}

#[test]
fn test_history_grows_per_new_position() {
    let mut board = Board::new(4);
    assert!(board.seen(&board.signature()));
    board.place(0, 0, Stone::Black).unwrap();
    board.pass();
    board.place(3, 3, Stone::White).unwrap();
    assert_eq!(board.history_len(), 3);
    assert!(board.seen("B..............."));
}

// =============================================================================
// Signature
// =============================================================================

#[test]
fn test_signature_independent_of_move_order() {
    let a = setpos(4, &[(0, 0), (1, 2)], &[(3, 3), (2, 1)]);
    let b = setup(
        4,
        &[
            (2, 1, Stone::White),
            (1, 2, Stone::Black),
            (3, 3, Stone::White),
            (0, 0, Stone::Black),
        ],
    );
    assert_eq!(a.signature(), b.signature());
    assert_eq!(a.signature(), "B.....W..B.....W");
}

#[test]
fn test_signature_layout() {
    let board = setup(3, &[(2, 0, Stone::Black), (0, 1, Stone::White)]);
    let sig = board.signature();
    assert_eq!(sig.len(), 9);
    assert_eq!(sig, "..BW.....");
    for (i, b) in sig.bytes().enumerate() {
        let (c, r) = board.coords(i);
        assert_eq!(Occupancy::from_byte(b), Some(board.occupancy(c, r)));
    }
}

#[test]
fn test_points_know_their_coordinates() {
    let board = setup(4, &[(3, 1, Stone::Black)]);
    for (i, p) in board.points().iter().enumerate() {
        assert_eq!((p.col(), p.row()), board.coords(i));
        assert_eq!(board.point(p.col(), p.row()).map(Point::occupancy), Some(p.occupancy()));
    }
    let p = board.point(3, 1).unwrap();
    assert_eq!((p.col(), p.row()), (3, 1));
    assert_eq!(p.occupancy(), Occupancy::Black);
}

// =============================================================================
// Scoring
// =============================================================================

#[test]
fn test_score_black_fills_three_columns() {
    let mut black = Vec::new();
    for col in 0..3 {
        for row in 0..4 {
            black.push((col, row));
        }
    }
    let board = setpos(4, &black, &[]);
    let s = score(&board);
    assert_eq!(s.black_stones, 12);
    assert_eq!(s.black_territory, 4);
    assert_eq!(s.black(), 16.0);
    assert_eq!(s.white(), 0.5);
    assert_eq!(s.winner(), Stone::Black);
}

#[test]
fn test_score_shared_area_is_dame() {
    let black: Vec<_> = (0..4).map(|row| (0, row)).collect();
    let white: Vec<_> = (0..4).map(|row| (2, row)).collect();
    let s = score(&setpos(4, &black, &white));
    assert_eq!(s.black(), 4.0);
    assert_eq!(s.white(), 8.5);
    assert_eq!(s.to_string(), "W+4.5");
}

#[test]
fn test_score_separate_areas() {
    let black: Vec<_> = (0..4).map(|row| (1, row)).collect();
    let white: Vec<_> = (0..4).map(|row| (2, row)).collect();
    let s = score(&setpos(4, &black, &white));
    assert_eq!(s.black(), 8.0);
    assert_eq!(s.white(), 8.5);
    assert_eq!(s.winner(), Stone::White);
}

// =============================================================================
// Matches
// =============================================================================

#[test]
fn test_match_over_wire_indices() {
    let mut m = Match::new(4);
    for (color, i) in [
        (Stone::Black, 0),
        (Stone::White, 5),
        (Stone::Black, -1),
        (Stone::White, -1),
    ] {
        let mv = Move::from_wire(i, 4).unwrap();
        m.submit(color, mv).unwrap();
    }
    assert!(m.is_over());
    assert_eq!(m.board().signature(), "B....W..........");
    assert_eq!(m.submit(Stone::Black, Move::Pass), Err(MatchError::Ended));
}

#[test]
fn test_random_games_keep_invariants() {
    for seed in 0..8 {
        let mut m = Match::new(5);
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut black = RandomPlayer::with_seed(seed);
        let mut white = RandomPlayer::with_seed(seed + 100);
        while !m.is_over() && m.moves() < 200 {
            let color = m.to_move();
            let mv = if rng.u8(..10) == 0 {
                Move::Pass
            } else {
                match color {
                    Stone::Black => black.choose(m.board(), color),
                    Stone::White => white.choose(m.board(), color),
                }
            };
            let before = m.board().signature();
            match m.submit(color, mv) {
                Ok(_) => {}
                Err(MatchError::Illegal(_)) => assert_eq!(m.board().signature(), before),
                Err(e) => panic!("unexpected error {e}"),
            }
            assert_invariants(m.board());
        }
    }
}

#[test]
fn test_play_match_scores_whole_board() {
    let mut black = RandomPlayer::with_seed(42);
    let mut white = RandomPlayer::with_seed(43);
    let m = play_match(5, &mut black, &mut white, 500);
    let s = m.result().unwrap();
    let counted = s.black_stones + s.black_territory + s.white_stones + s.white_territory;
    assert!(counted <= 25);
    assert_eq!(s.black_stones, m.board().stone_count(Stone::Black));
    assert_invariants(m.board());
}
