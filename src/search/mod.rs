use std::time::Duration;

use crate::{
    clock::Clock, evaluation::Evaluator, hashing::ZobristHasher, piece::Player,
    position::Position, transposition_table::TranspositionTable,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Every call into the search, cache hits included.
    pub nodes: u64,
    pub cache_hits: u64,
    pub leaves: u64,
    pub cutoffs: u64,
}

/// State shared by every node of one move selection.
pub struct Search<'a, C: Clock> {
    hasher: &'a ZobristHasher,
    table: Option<&'a mut TranspositionTable>,
    evaluator: Evaluator,
    clock: &'a C,
    started: Duration,
    leaf_budget: Duration,
    pub stats: SearchStats,
}

impl<'a, C: Clock> Search<'a, C> {
    /// `table: None` searches without memoization.
    pub fn new(
        hasher: &'a ZobristHasher,
        table: Option<&'a mut TranspositionTable>,
        me: Player,
        clock: &'a C,
        started: Duration,
        leaf_budget: Duration,
    ) -> Self {
        Self {
            hasher,
            table,
            evaluator: Evaluator::new(me),
            clock,
            started,
            leaf_budget,
            stats: SearchStats::default(),
        }
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.clock.now().saturating_sub(self.started)
    }

    #[inline]
    fn out_of_time(&self) -> bool {
        self.elapsed() > self.leaf_budget
    }

    /// Fail-hard alpha-beta from the evaluator's point of view.
    ///
    /// Any cached score for the position is returned as is, whatever depth or
    /// window produced it, and every computed score is cached, including ones
    /// cut short by pruning.
    pub fn alpha_beta<P: Position>(
        &mut self,
        board: &mut P,
        maximizing: bool,
        depth: i32,
        mut alpha: f64,
        mut beta: f64,
    ) -> f64 {
        self.stats.nodes += 1;
        let key = self.hasher.fingerprint(board);
        if let Some(score) = self.table.as_deref().and_then(|table| table.probe(key)) {
            self.stats.cache_hits += 1;
            return score;
        }
        let marked = board.marked_count();
        let side = board.side_to_move();

        let score = if depth <= 0 || board.state().is_terminal() || self.out_of_time() {
            self.stats.leaves += 1;
            self.evaluator.evaluate(board)
        } else if maximizing {
            let mut best = f64::NEG_INFINITY;
            for col in board.legal_columns() {
                board.play(col);
                best = best.max(self.alpha_beta(board, false, depth - 1, alpha, beta));
                board.undo();
                alpha = alpha.max(best);
                if beta <= alpha {
                    self.stats.cutoffs += 1;
                    break;
                }
            }
            best
        } else {
            let mut best = f64::INFINITY;
            for col in board.legal_columns() {
                board.play(col);
                best = best.min(self.alpha_beta(board, true, depth - 1, alpha, beta));
                board.undo();
                beta = beta.min(best);
                if beta <= alpha {
                    self.stats.cutoffs += 1;
                    break;
                }
            }
            best
        };

        debug_assert_eq!(board.marked_count(), marked, "search left a move on the board");
        debug_assert_eq!(self.hasher.fingerprint(board), key, "search changed the board");
        debug_assert_eq!(board.side_to_move(), side, "search changed the turn");
        if let Some(table) = self.table.as_deref_mut() {
            table.put(key, score);
        }
        score
    }
}

/// Plain minimax with the same leaf evaluation, no pruning, no cache and no
/// clock. Reference for [`Search::alpha_beta`].
pub fn minimax<P: Position>(
    board: &mut P,
    evaluator: &Evaluator,
    maximizing: bool,
    depth: i32,
    stats: &mut SearchStats,
) -> f64 {
    stats.nodes += 1;
    if depth <= 0 || board.state().is_terminal() {
        stats.leaves += 1;
        return evaluator.evaluate(board);
    }
    let mut best = if maximizing {
        f64::NEG_INFINITY
    } else {
        f64::INFINITY
    };
    for col in board.legal_columns() {
        board.play(col);
        let score = minimax(board, evaluator, !maximizing, depth - 1, stats);
        board.undo();
        best = if maximizing {
            best.max(score)
        } else {
            best.min(score)
        };
    }
    best
}
