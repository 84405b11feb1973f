//! The board/rules contract the search core is written against.

use smallvec::SmallVec;

use crate::{
    piece::{Cell, Player},
    square::Square,
};

/// Columns that can still be played, in ascending order.
pub type MoveList = SmallVec<[usize; 16]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Open,
    Won(Player),
    Draw,
}

impl GameState {
    #[inline]
    pub fn is_terminal(self) -> bool {
        self != GameState::Open
    }
}

/// [`GameState`] as seen by one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Open,
    WinSelf,
    WinOpponent,
    Draw,
}

impl Outcome {
    #[inline]
    pub fn from_state(state: GameState, me: Player) -> Self {
        match state {
            GameState::Open => Outcome::Open,
            GameState::Draw => Outcome::Draw,
            GameState::Won(player) if player == me => Outcome::WinSelf,
            GameState::Won(_) => Outcome::WinOpponent,
        }
    }

    #[inline]
    pub fn is_terminal(self) -> bool {
        self != Outcome::Open
    }
}

/// A gravity grid the search can mutate in place.
///
/// Implementations must restore exactly the previous position on [`undo`],
/// since callers push and pop in strict LIFO order and rely on siblings seeing
/// the same board.
///
/// [`undo`]: Position::undo
pub trait Position {
    fn rows(&self) -> usize;
    fn cols(&self) -> usize;
    /// Pieces in a line needed to win.
    fn connect(&self) -> usize;

    fn cell(&self, row: usize, col: usize) -> Cell;
    fn is_column_full(&self, col: usize) -> bool;

    fn legal_columns(&self) -> MoveList {
        (0..self.cols()).filter(|&c| !self.is_column_full(c)).collect()
    }

    /// Drops a piece for the side to move.
    fn play(&mut self, col: usize) {
        let player = self.side_to_move();
        self.play_as(col, player);
    }

    /// Drops a piece for `player`, regardless of whose turn it is.
    fn play_as(&mut self, col: usize, player: Player);

    /// Takes back the most recent [`play`](Position::play) or
    /// [`play_as`](Position::play_as), restoring the side to move it found.
    fn undo(&mut self);

    fn state(&self) -> GameState;
    fn marked_count(&self) -> usize;
    fn last_move(&self) -> Option<Square>;
    fn side_to_move(&self) -> Player;

    #[inline]
    fn outcome(&self, me: Player) -> Outcome {
        Outcome::from_state(self.state(), me)
    }

    /// Height of the tallest column.
    fn max_height(&self) -> usize {
        (0..self.cols())
            .map(|col| {
                (0..self.rows())
                    .take_while(|&row| !self.cell(row, col).is_empty())
                    .count()
            })
            .max()
            .unwrap_or(0)
    }
}
