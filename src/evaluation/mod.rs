use crate::{
    piece::Player,
    position::{Outcome, Position},
};

mod patterns;

pub use patterns::pattern_score;

/// Static evaluation from the point of view of one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluator {
    me: Player,
}

impl Evaluator {
    pub fn new(me: Player) -> Self {
        Self { me }
    }

    /// Scores `board` for the evaluating side.
    ///
    /// Finished games score ±∞ or 0. Open positions where either side has a
    /// one-move win score ±∞ (our own wins are checked first). Anything else
    /// gets the best pattern balance reachable in one move by the side to
    /// move. The board is left exactly as it was found.
    pub fn evaluate<P: Position>(&self, board: &mut P) -> f64 {
        let side = board.side_to_move();
        let score = self.score(board);
        debug_assert_eq!(board.side_to_move(), side, "evaluation changed the turn");
        score
    }

    fn score<P: Position>(&self, board: &mut P) -> f64 {
        match board.outcome(self.me) {
            Outcome::WinSelf => return f64::INFINITY,
            Outcome::WinOpponent => return f64::NEG_INFINITY,
            Outcome::Draw => return 0.0,
            Outcome::Open => {}
        }
        if has_immediate_win(board, self.me) {
            return f64::INFINITY;
        }
        if has_immediate_win(board, self.me.opposite()) {
            return f64::NEG_INFINITY;
        }
        self.positional(board)
    }

    /// Extremum of `own - opponent` pattern score over every move of the side
    /// to move: maximum when that is us, minimum otherwise.
    pub fn positional<P: Position>(&self, board: &mut P) -> f64 {
        let maximizing = board.side_to_move() == self.me;
        let mut best = if maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        for col in board.legal_columns() {
            board.play(col);
            let score = pattern_score(board, self.me) - pattern_score(board, self.me.opposite());
            board.undo();
            if (maximizing && score > best) || (!maximizing && score < best) {
                best = score;
            }
        }
        best
    }
}

/// Whether `player` could win right now by dropping a piece in some column.
pub fn has_immediate_win<P: Position>(board: &mut P, player: Player) -> bool {
    board.legal_columns().into_iter().any(|col| {
        board.play_as(col, player);
        let wins = board.outcome(player) == Outcome::WinSelf;
        board.undo();
        wins
    })
}
