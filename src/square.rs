//! Board coordinates.

/// A cell of the grid. Rows count upward from the bottom, so pieces settle
/// into the lowest free row of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square {
    pub row: usize,
    pub col: usize,
}

impl Square {
    /// Creates new [`Square`] from a row and a column.
    ///
    /// Example:
    ///
    /// ```
    /// use connectx::square::Square;
    ///
    /// let square = Square::new(0, 3);
    /// assert_eq!(square.to_string(), "(0, 3)");
    /// ```
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Moves the square by a signed delta, returning `None` when it would leave
    /// a `rows` x `cols` grid.
    #[inline]
    pub fn offset(self, dr: isize, dc: isize, rows: usize, cols: usize) -> Option<Square> {
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        (row < rows && col < cols).then_some(Square { row, col })
    }

    #[inline]
    pub fn index(self, cols: usize) -> usize {
        self.row * cols + self.col
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
