use thiserror::Error;

use crate::{
    constants::Direction,
    piece::{Cell, Player},
    position::{GameState, Position},
    square::Square,
};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BoardError {
    #[error("column {0} is outside the board")]
    ColumnOutOfRange(usize),
    #[error("column {0} is full")]
    ColumnFull(usize),
    #[error("the game is already over")]
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Placement {
    square: Square,
    player: Player,
    /// Side to move before the piece was placed.
    side_to_move: Player,
    state: GameState,
}

/// Connect-X grid with gravity. Row 0 is the bottom row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    connect: usize,
    cells: Vec<Cell>,
    heights: Vec<usize>,
    history: Vec<Placement>,
    side_to_move: Player,
}

impl Board {
    pub fn new(rows: usize, cols: usize, connect: usize) -> Self {
        assert!(rows > 0 && cols > 0, "board needs at least one cell");
        Self {
            rows,
            cols,
            connect,
            cells: vec![Cell::Empty; rows * cols],
            heights: vec![0; cols],
            history: vec![],
            side_to_move: Player::First,
        }
    }

    /// Plays `col` for the side to move, rejecting anything illegal.
    pub fn try_play(&mut self, col: usize) -> Result<(), BoardError> {
        if col >= self.cols {
            return Err(BoardError::ColumnOutOfRange(col));
        }
        if self.state().is_terminal() {
            return Err(BoardError::GameOver);
        }
        if self.is_column_full(col) {
            return Err(BoardError::ColumnFull(col));
        }
        self.play(col);
        Ok(())
    }

    #[inline]
    pub fn height(&self, col: usize) -> usize {
        self.heights[col]
    }

    /// Length of the line of `player` pieces through `square` along `dir`.
    fn line_length(&self, square: Square, dir: Direction, player: Player) -> usize {
        let (dr, dc) = dir.delta();
        let mut count = 1;
        for sign in [1, -1] {
            let mut current = square;
            while let Some(next) = current.offset(dr * sign, dc * sign, self.rows, self.cols) {
                if self.cells[next.index(self.cols)] != Cell::Occupied(player) {
                    break;
                }
                count += 1;
                current = next;
            }
        }
        count
    }

    fn state_after(&self, square: Square, player: Player) -> GameState {
        if Direction::ALL
            .iter()
            .any(|&dir| self.line_length(square, dir, player) >= self.connect)
        {
            GameState::Won(player)
        } else if self.history.len() + 1 == self.rows * self.cols {
            GameState::Draw
        } else {
            GameState::Open
        }
    }
}

impl Position for Board {
    #[inline]
    fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn connect(&self) -> usize {
        self.connect
    }

    #[inline]
    fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.cols + col]
    }

    #[inline]
    fn is_column_full(&self, col: usize) -> bool {
        self.height(col) == self.rows
    }

    fn play_as(&mut self, col: usize, player: Player) {
        assert!(!self.is_column_full(col), "played into full column {col}");
        let square = Square::new(self.heights[col], col);
        let state = self.state_after(square, player);
        self.cells[square.index(self.cols)] = Cell::Occupied(player);
        self.heights[col] += 1;
        self.history.push(Placement {
            square,
            player,
            side_to_move: self.side_to_move,
            state,
        });
        self.side_to_move = player.opposite();
    }

    fn undo(&mut self) {
        let Some(last) = self.history.pop() else {
            panic!("undo without a matching play");
        };
        self.cells[last.square.index(self.cols)] = Cell::Empty;
        self.heights[last.square.col] -= 1;
        self.side_to_move = last.side_to_move;
    }

    #[inline]
    fn state(&self) -> GameState {
        self.history
            .last()
            .map_or(GameState::Open, |placement| placement.state)
    }

    #[inline]
    fn marked_count(&self) -> usize {
        self.history.len()
    }

    #[inline]
    fn last_move(&self) -> Option<Square> {
        self.history.last().map(|placement| placement.square)
    }

    #[inline]
    fn side_to_move(&self) -> Player {
        self.side_to_move
    }

    fn max_height(&self) -> usize {
        self.heights.iter().copied().max().unwrap_or(0)
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in (0..self.rows).rev() {
            for col in 0..self.cols {
                write!(f, " {} ", self.cell(row, col))?;
            }
            writeln!(f)?;
        }
        for col in 0..self.cols {
            write!(f, "{:^3}", col % 10)?;
        }
        writeln!(f)
    }
}
