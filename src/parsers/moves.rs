use std::num::ParseIntError;

use thiserror::Error;

use crate::board::{Board, BoardError};

/// Errors from reading a move list such as `"3 3 4 2"` or `"3,3,4,2"`.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MoveParseError {
    #[error("invalid column number")]
    InvalidColumn(#[from] ParseIntError),
    #[error("move #{index} is illegal: {source}")]
    IllegalMove { index: usize, source: BoardError },
}

/// Replays a whitespace- or comma-separated list of 0-based columns on an
/// empty `rows` x `cols` board, first player first.
pub fn parse(
    rows: usize,
    cols: usize,
    connect: usize,
    notation: &str,
) -> Result<Board, MoveParseError> {
    let mut board = Board::new(rows, cols, connect);
    for (index, token) in notation
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .enumerate()
    {
        let col = token.parse::<usize>()?;
        board
            .try_play(col)
            .map_err(|source| MoveParseError::IllegalMove { index, source })?;
    }
    Ok(board)
}

impl Board {
    pub fn from_moves(
        rows: usize,
        cols: usize,
        connect: usize,
        notation: &str,
    ) -> Result<Board, MoveParseError> {
        parse(rows, cols, connect, notation)
    }
}
