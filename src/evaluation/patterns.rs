//! Window patterns along rows, columns and both diagonals.

use crate::{
    constants::{
        Direction, CLOSED_DOUBLE_GAP_SCORE, FLOATING_THREAT_SCORE, OPEN_DOUBLE_GAP_SCORE,
        SINGLE_SCORE, WINNING_WINDOW_SCORE,
    },
    piece::{Cell, Player},
    position::Position,
    square::Square,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum WindowScore {
    /// Completable on the very next move; ends scoring for the player.
    Winning,
    Points(f64),
}

/// Pattern score of `player` over every direction.
///
/// Returns [`WINNING_WINDOW_SCORE`] as soon as a window is found that the
/// player can complete with a single, immediately playable piece.
pub fn pattern_score<P: Position>(board: &P, player: Player) -> f64 {
    line_score(board, player).map_or(WINNING_WINDOW_SCORE, |lines| {
        lines + column_score(board, player)
    })
}

/// Row and diagonal windows; `None` once a winning window shows up.
fn line_score<P: Position>(board: &P, player: Player) -> Option<f64> {
    let (rows, cols, connect) = (board.rows(), board.cols(), board.connect());
    let points = |row, col, dir| match score_window(board, player, Square::new(row, col), dir) {
        WindowScore::Winning => None,
        WindowScore::Points(points) => Some(points),
    };
    let mut score = 0.0;

    // Rows above the tallest stack cannot hold anything yet.
    if cols >= connect {
        for row in 0..board.max_height() {
            for col in 0..=cols - connect {
                score += points(row, col, Direction::Horizontal)?;
            }
        }
    }

    if rows >= connect && cols >= connect {
        for row in 0..=rows - connect {
            for col in 0..=cols - connect {
                score += points(row, col, Direction::Diagonal)?;
            }
            for col in connect - 1..cols {
                score += points(row, col, Direction::AntiDiagonal)?;
            }
        }
    }

    Some(score)
}

/// Scores the `connect`-long window starting at `start` and running along `dir`.
pub(crate) fn score_window<P: Position>(
    board: &P,
    player: Player,
    start: Square,
    dir: Direction,
) -> WindowScore {
    let (rows, cols, connect) = (board.rows(), board.cols(), board.connect());
    let (dr, dc) = dir.delta();
    let mut own = 0;
    let mut first_gap = None;
    let mut opens_with_gap = false;

    for i in 0..connect as isize {
        let Some(square) = start.offset(dr * i, dc * i, rows, cols) else {
            return WindowScore::Points(0.0);
        };
        match board.cell(square.row, square.col) {
            Cell::Occupied(p) if p == player => own += 1,
            Cell::Occupied(_) => return WindowScore::Points(0.0),
            Cell::Empty => {
                if i == 0 {
                    opens_with_gap = true;
                }
                if first_gap.is_none() {
                    first_gap = Some(square);
                }
            }
        }
    }

    if own == 0 {
        return WindowScore::Points(0.0);
    }
    if own >= connect - 1 {
        return match first_gap {
            Some(gap) if !is_playable(board, gap) => WindowScore::Points(FLOATING_THREAT_SCORE),
            _ => WindowScore::Winning,
        };
    }
    if own + 2 == connect {
        let span = connect as isize;
        let follow_up_empty = start
            .offset(dr * span, dc * span, rows, cols)
            .is_some_and(|sq| board.cell(sq.row, sq.col).is_empty());
        return if opens_with_gap && follow_up_empty {
            WindowScore::Points(OPEN_DOUBLE_GAP_SCORE)
        } else {
            WindowScore::Points(CLOSED_DOUBLE_GAP_SCORE)
        };
    }
    if own == 1 {
        return WindowScore::Points(SINGLE_SCORE);
    }
    WindowScore::Points(0.0)
}

/// A cell is playable when it rests on the floor or on another piece.
#[inline]
fn is_playable<P: Position>(board: &P, square: Square) -> bool {
    square.row == 0 || !board.cell(square.row - 1, square.col).is_empty()
}

/// Runs of `player` pieces capped by an empty cell, scored `10^(len - 1)`.
///
/// Only the lowest `rows - connect + 1` cells of each column are walked, so a
/// run whose capping cell sits higher than that is not counted.
fn column_score<P: Position>(board: &P, player: Player) -> f64 {
    let (rows, connect) = (board.rows(), board.connect());
    if rows < connect {
        return 0.0;
    }
    let mut score = 0.0;
    for col in 0..board.cols() {
        let mut run = 0;
        for row in 0..=rows - connect {
            match board.cell(row, col) {
                Cell::Occupied(p) if p == player => run += 1,
                Cell::Occupied(_) => run = 0,
                Cell::Empty => {
                    if run > 0 {
                        score += 10f64.powi(run - 1);
                    }
                    break;
                }
            }
        }
    }
    score
}
