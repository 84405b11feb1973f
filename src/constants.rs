//! Provides some useful constants, that are used throughout the crate.

/// The four line orientations a connection can be made along.
///
///  AntiDiagonal  Vertical  Diagonal
///            \      |      /
///             \     |     /
///  Horizontal <-----0----->
///
/// Deltas always point "upward/rightward": rows grow from the bottom of the
/// board, so scanning along a delta walks away from the supporting pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Horizontal,
    Vertical,
    Diagonal,
    AntiDiagonal,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Horizontal,
        Direction::Vertical,
        Direction::Diagonal,
        Direction::AntiDiagonal,
    ];

    /// `(row, col)` step of one cell along the line.
    #[inline]
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Direction::Horizontal => (0, 1),
            Direction::Vertical => (1, 0),
            Direction::Diagonal => (1, 1),
            Direction::AntiDiagonal => (1, -1),
        }
    }
}

/// Window with a single own piece and nothing else.
pub const SINGLE_SCORE: f64 = 1.0;
/// Double gap that still needs more than one tempo.
pub const CLOSED_DOUBLE_GAP_SCORE: f64 = 10.0;
/// One piece short of a connection, but the gap is floating.
pub const FLOATING_THREAT_SCORE: f64 = 1000.0;
/// Double gap that becomes an open threat with a single move.
pub const OPEN_DOUBLE_GAP_SCORE: f64 = 10000.0;
/// One piece short of a connection and the gap can be filled right now.
pub const WINNING_WINDOW_SCORE: f64 = 100000.0;
