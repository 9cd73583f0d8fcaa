//! Computer move selection at three difficulty tiers.
//!
//! All strategies take a board snapshot and the marker the computer plays
//! as, and return the index of an empty cell. They only mutate local
//! clones; the caller's board is never changed. `None` is returned only
//! for a full board, which the session rules out by evaluating the
//! outcome before asking for a move.

use crate::board::{Board, Marker};
use crate::outcome::{LINES, Outcome, evaluate};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Computer difficulty tier.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    /// Mostly random, occasionally wins or blocks.
    #[default]
    Easy,
    /// Deterministic win/block/center/corner priority.
    Medium,
    /// Opening book plus exhaustive minimax; never loses.
    Hard,
}

/// Corner indices, used by the medium priority list and the hard
/// opening book.
const CORNERS: [usize; 4] = [0, 2, 6, 8];

/// Center index.
const CENTER: usize = 4;

/// Finds a cell that completes a line for `marker` in one move.
///
/// Scans the lines in [`LINES`] order and returns the empty cell of the
/// first line holding two `marker` cells, or `None`.
#[instrument(skip(board))]
pub fn winning_move(board: &Board, marker: Marker) -> Option<usize> {
    for line in LINES {
        let mut own = 0;
        let mut empty = None;
        for pos in line {
            if board.is_empty(pos) {
                empty = Some(pos);
            } else if board.get(pos) == Some(crate::board::Cell::Occupied(marker)) {
                own += 1;
            }
        }
        if own == 2 && let Some(pos) = empty {
            return Some(pos);
        }
    }
    None
}

/// Selects a move for `marker` at the given difficulty.
#[instrument(skip(board, rng))]
pub fn choose_move<R: Rng>(
    board: &Board,
    marker: Marker,
    difficulty: Difficulty,
    rng: &mut R,
) -> Option<usize> {
    let pos = match difficulty {
        Difficulty::Easy => easy_move(board, marker, rng),
        Difficulty::Medium => medium_move(board, marker, rng),
        Difficulty::Hard => hard_move(board, marker, rng),
    };
    debug!(?difficulty, ?marker, ?pos, "Strategy selected move");
    pos
}

/// Picks a uniformly random entry from `cells`.
fn random_cell<R: Rng>(cells: &[usize], rng: &mut R) -> Option<usize> {
    if cells.is_empty() {
        None
    } else {
        Some(cells[rng.random_range(0..cells.len())])
    }
}

/// Easy: 30% chance to take a win, then 50% chance to block, else random.
fn easy_move<R: Rng>(board: &Board, marker: Marker, rng: &mut R) -> Option<usize> {
    if rng.random_bool(0.3)
        && let Some(pos) = winning_move(board, marker)
    {
        return Some(pos);
    }
    if rng.random_bool(0.5)
        && let Some(pos) = winning_move(board, marker.opponent())
    {
        return Some(pos);
    }
    random_cell(&board.empty_cells(), rng)
}

/// Medium: win, block, center, random corner, random cell, in that order.
fn medium_move<R: Rng>(board: &Board, marker: Marker, rng: &mut R) -> Option<usize> {
    if let Some(pos) = winning_move(board, marker) {
        return Some(pos);
    }
    if let Some(pos) = winning_move(board, marker.opponent()) {
        return Some(pos);
    }
    if board.is_empty(CENTER) {
        return Some(CENTER);
    }
    let corners: Vec<usize> = CORNERS.iter().copied().filter(|&c| board.is_empty(c)).collect();
    if let Some(pos) = random_cell(&corners, rng) {
        return Some(pos);
    }
    random_cell(&board.empty_cells(), rng)
}

/// Hard: opening book for the first ply, exhaustive minimax otherwise.
fn hard_move<R: Rng>(board: &Board, marker: Marker, rng: &mut R) -> Option<usize> {
    let empty = board.empty_cells();
    if empty.is_empty() {
        return None;
    }

    // Opening book: center on an empty board; any corner answers a
    // center opening. Both skip the full search on its deepest trees.
    if empty.len() == 9 {
        return Some(CENTER);
    }
    if empty.len() == 8 && board.get(CENTER) == Some(crate::board::Cell::Occupied(marker.opponent()))
    {
        return random_cell(&CORNERS, rng);
    }

    // Exhaustive minimax over a scratch copy, mutate-then-undo.
    let mut scratch = board.clone();
    let mut best_pos = None;
    let mut best_score = i32::MIN;
    for pos in empty {
        scratch
            .place(pos, marker)
            .expect("empty cell accepts a hypothetical placement");
        let score = minimax(&mut scratch, marker.opponent(), marker, 1);
        scratch.clear(pos);
        // Strict comparison keeps the lowest index on ties.
        if score > best_score {
            best_score = score;
            best_pos = Some(pos);
        }
    }
    best_pos
}

/// Scores a position for `root`, assuming optimal alternating play.
///
/// Terminal scores are `10 - depth` for a root win, `depth - 10` for a
/// root loss, and `0` for a draw, so faster wins and slower losses are
/// preferred. `depth` counts plies below the top-level call.
fn minimax(board: &mut Board, to_move: Marker, root: Marker, depth: i32) -> i32 {
    match evaluate(board) {
        Outcome::Won { marker, .. } => {
            return if marker == root { 10 - depth } else { depth - 10 };
        }
        Outcome::Draw => return 0,
        Outcome::InProgress => {}
    }

    let maximizing = to_move == root;
    let mut best = if maximizing { i32::MIN } else { i32::MAX };
    for pos in 0..9 {
        if !board.is_empty(pos) {
            continue;
        }
        board
            .place(pos, to_move)
            .expect("empty cell accepts a hypothetical placement");
        let score = minimax(board, to_move.opponent(), root, depth + 1);
        board.clear(pos);
        best = if maximizing {
            best.max(score)
        } else {
            best.min(score)
        };
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn board_from(marks: &[(usize, Marker)]) -> Board {
        let mut board = Board::new();
        for &(pos, marker) in marks {
            board.place(pos, marker).unwrap();
        }
        board
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_winning_move_finds_open_cell() {
        let board = board_from(&[(0, Marker::Computer), (1, Marker::Computer)]);
        assert_eq!(winning_move(&board, Marker::Computer), Some(2));
        assert_eq!(winning_move(&board, Marker::Human), None);
    }

    #[test]
    fn test_winning_move_ignores_blocked_line() {
        let board = board_from(&[
            (0, Marker::Computer),
            (1, Marker::Computer),
            (2, Marker::Human),
        ]);
        assert_eq!(winning_move(&board, Marker::Computer), None);
    }

    #[test]
    fn test_winning_move_first_line_in_order() {
        // Two completable lines for the computer; rows come first.
        let board = board_from(&[
            (0, Marker::Computer),
            (1, Marker::Computer),
            (3, Marker::Computer),
            (6, Marker::Human),
        ]);
        assert_eq!(winning_move(&board, Marker::Computer), Some(2));
    }

    #[test]
    fn test_medium_blocks_opponent_win() {
        // X X _ / _ O _ / _ _ _, O to move must block at 2.
        let board = board_from(&[
            (0, Marker::Human),
            (1, Marker::Human),
            (4, Marker::Computer),
        ]);
        let pos = choose_move(&board, Marker::Computer, Difficulty::Medium, &mut rng());
        assert_eq!(pos, Some(2));
    }

    #[test]
    fn test_win_takes_priority_over_block() {
        // O O _ / X X _ / _ _ _, O completes its own line at 2.
        let board = board_from(&[
            (0, Marker::Computer),
            (1, Marker::Computer),
            (3, Marker::Human),
            (4, Marker::Human),
        ]);
        for difficulty in [Difficulty::Medium, Difficulty::Hard] {
            let pos = choose_move(&board, Marker::Computer, difficulty, &mut rng());
            assert_eq!(pos, Some(2), "{difficulty} must take the win");
        }
    }

    #[test]
    fn test_medium_takes_center_then_corner() {
        let board = board_from(&[(1, Marker::Human)]);
        let pos = medium_move(&board, Marker::Computer, &mut rng());
        assert_eq!(pos, Some(4));

        let board = board_from(&[(4, Marker::Human), (1, Marker::Computer)]);
        let pos = medium_move(&board, Marker::Computer, &mut rng()).unwrap();
        assert!(CORNERS.contains(&pos));
    }

    #[test]
    fn test_hard_opens_center() {
        let pos = hard_move(&Board::new(), Marker::Computer, &mut rng());
        assert_eq!(pos, Some(4));
    }

    #[test]
    fn test_hard_answers_center_with_corner() {
        let board = board_from(&[(4, Marker::Human)]);
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            let pos = hard_move(&board, Marker::Computer, &mut rng).unwrap();
            assert!(CORNERS.contains(&pos));
        }
    }

    #[test]
    fn test_hard_prefers_faster_win() {
        // O can win immediately at 2; minimax must not dawdle.
        let board = board_from(&[
            (0, Marker::Computer),
            (1, Marker::Computer),
            (3, Marker::Human),
            (7, Marker::Human),
        ]);
        let pos = hard_move(&board, Marker::Computer, &mut rng());
        assert_eq!(pos, Some(2));
    }

    #[test]
    fn test_hard_blocks_fork_setup() {
        // X at opposite corners with O center; any edge reply is the
        // known non-losing answer, a corner reply loses to a fork.
        let board = board_from(&[
            (0, Marker::Human),
            (4, Marker::Computer),
            (8, Marker::Human),
        ]);
        let pos = hard_move(&board, Marker::Computer, &mut rng()).unwrap();
        assert!([1, 3, 5, 7].contains(&pos));
    }

    #[test]
    fn test_all_tiers_return_empty_cells_only() {
        let board = board_from(&[
            (0, Marker::Human),
            (4, Marker::Computer),
            (8, Marker::Human),
            (2, Marker::Computer),
            (6, Marker::Human),
        ]);
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            for seed in 0..32 {
                let mut rng = StdRng::seed_from_u64(seed);
                let pos = choose_move(&board, Marker::Computer, difficulty, &mut rng)
                    .expect("moves remain");
                assert!(board.is_empty(pos), "{difficulty} played occupied cell {pos}");
            }
        }
    }

    #[test]
    fn test_full_board_yields_no_move() {
        let mut board = Board::new();
        for (i, marker) in [
            Marker::Human,
            Marker::Computer,
            Marker::Human,
            Marker::Human,
            Marker::Computer,
            Marker::Computer,
            Marker::Computer,
            Marker::Human,
            Marker::Human,
        ]
        .into_iter()
        .enumerate()
        {
            board.place(i, marker).unwrap();
        }
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            assert_eq!(
                choose_move(&board, Marker::Computer, difficulty, &mut rng()),
                None
            );
        }
    }

    #[test]
    fn test_strategies_leave_board_unchanged() {
        let board = board_from(&[(4, Marker::Human), (0, Marker::Computer), (8, Marker::Human)]);
        let snapshot = board.clone();
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            choose_move(&board, Marker::Computer, difficulty, &mut rng());
            assert_eq!(board, snapshot);
        }
    }

    #[test]
    fn test_difficulty_string_round_trip() {
        use std::str::FromStr;
        for (text, expected) in [
            ("easy", Difficulty::Easy),
            ("medium", Difficulty::Medium),
            ("hard", Difficulty::Hard),
        ] {
            assert_eq!(Difficulty::from_str(text).unwrap(), expected);
            assert_eq!(expected.to_string(), text);
            assert_eq!(serde_json::to_string(&expected).unwrap(), format!("{text:?}"));
        }
    }
}
