//! Move selection: fast paths, iterative deepening and move recovery.
//!
//! A move is chosen by the first of these that applies:
//!
//! 1. a column that wins on the spot,
//! 2. the middle column on the first move of either side,
//! 3. the middle column again while the opponent keeps playing there early,
//! 4. the only column left,
//! 5. iterative-deepening alpha-beta until the time budget runs out.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use connectx::{agent::Agent, board::Board, config::AgentConfig};
//!
//! let config = AgentConfig::new(6, 7, 4, true, Duration::from_millis(200)).with_seed(1);
//! let mut agent = Agent::new(config).unwrap();
//! let mut board = Board::new(6, 7, 4);
//! assert_eq!(agent.select_move(&mut board), 3);
//! ```

use std::time::Duration;

use log::{debug, trace};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    clock::{Clock, SystemClock},
    config::{AgentConfig, ConfigError},
    hashing::ZobristHasher,
    piece::Player,
    position::{Outcome, Position},
    search::{Search, SearchStats},
    transposition_table::TranspositionTable,
};

/// Which rule picked the move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    ImmediateWin,
    Opening,
    CenterContinuation,
    ForcedMove,
    /// At least one deepening iteration completed.
    Search,
    /// The budget ran out before depth 1 finished.
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoveReport {
    pub column: usize,
    pub kind: SelectionKind,
    /// Deepest completed iteration, 0 for fast paths.
    pub depth: i32,
    /// Score of the deepest completed iteration, if any.
    pub score: Option<f64>,
    pub stats: SearchStats,
    pub elapsed: Duration,
}

/// A Connect-X player with its own hashing keys and transposition table.
pub struct Agent<C: Clock = SystemClock> {
    config: AgentConfig,
    me: Player,
    hasher: ZobristHasher,
    table: TranspositionTable,
    rng: StdRng,
    clock: C,
}

impl Agent<SystemClock> {
    /// Configures an agent for a new game with default budget settings.
    pub fn initialize(
        rows: usize,
        cols: usize,
        connect: usize,
        first: bool,
        timeout_secs: f64,
    ) -> Result<Self, ConfigError> {
        let timeout =
            Duration::try_from_secs_f64(timeout_secs).map_err(|_| ConfigError::Timeout(timeout_secs))?;
        Self::new(AgentConfig::new(rows, cols, connect, first, timeout))
    }

    pub fn new(config: AgentConfig) -> Result<Self, ConfigError> {
        Self::with_clock(config, SystemClock::default())
    }
}

impl<C: Clock> Agent<C> {
    pub fn with_clock(config: AgentConfig, clock: C) -> Result<Self, ConfigError> {
        Self::with_table(config, clock, TranspositionTable::new())
    }

    /// Starts from an existing table, e.g. one kept from an earlier game.
    pub fn with_table(
        config: AgentConfig,
        clock: C,
        table: TranspositionTable,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            me: config.player(),
            hasher: ZobristHasher::new(config.rows, config.cols, config.seed),
            table,
            rng,
            clock,
            config,
        })
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn player(&self) -> Player {
        self.me
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn table(&self) -> &TranspositionTable {
        &self.table
    }

    pub fn into_table(self) -> TranspositionTable {
        self.table
    }

    /// Picks a column for the agent. `board` must be open, have a free column
    /// and have the agent to move; it is returned unchanged.
    pub fn select_move<P: Position>(&mut self, board: &mut P) -> usize {
        self.select_move_with_report(board).column
    }

    pub fn select_move_with_report<P: Position>(&mut self, board: &mut P) -> MoveReport {
        let started = self.clock.now();
        let legal = board.legal_columns();
        assert!(!legal.is_empty(), "no legal column to select");

        if let Some((column, kind)) = self.fast_path(board) {
            debug!("{kind:?}: column {column}");
            return MoveReport {
                column,
                kind,
                depth: 0,
                score: None,
                stats: SearchStats::default(),
                elapsed: self.clock.now().saturating_sub(started),
            };
        }

        let Self {
            config,
            me,
            hasher,
            table,
            rng,
            clock,
        } = self;
        let deadline = config.deadline();
        let tolerance = config.match_tolerance;
        let mut search = Search::new(
            hasher,
            config.use_cache.then_some(table),
            *me,
            clock,
            started,
            config.leaf_budget(),
        );

        // Nothing changes past the last empty cell.
        let max_depth = (board.rows() * board.cols() - board.marked_count()) as i32;
        let mut column = legal[legal.len() / 2];
        let mut score = None;
        let mut completed = 0;
        let mut depth = 1;
        while search.elapsed() < deadline && depth <= max_depth {
            let depth_score =
                search.alpha_beta(board, true, depth, f64::NEG_INFINITY, f64::INFINITY);
            if search.elapsed() >= deadline {
                debug!("depth {depth} finished past the deadline, keeping depth {completed}");
                break;
            }
            column = recover_move(
                &mut search,
                board,
                rng,
                true,
                depth,
                depth_score,
                config.timeout,
                tolerance,
            );
            debug!(
                "depth {depth}: score {depth_score}, column {column}, {} nodes, {} cache hits",
                search.stats.nodes, search.stats.cache_hits
            );
            score = Some(depth_score);
            completed = depth;
            depth += 1;
        }

        MoveReport {
            column,
            kind: if completed > 0 {
                SelectionKind::Search
            } else {
                SelectionKind::Fallback
            },
            depth: completed,
            score,
            stats: search.stats,
            elapsed: search.elapsed(),
        }
    }

    fn fast_path<P: Position>(&self, board: &mut P) -> Option<(usize, SelectionKind)> {
        let legal = board.legal_columns();
        for &col in &legal {
            board.play_as(col, self.me);
            let wins = board.outcome(self.me) == Outcome::WinSelf;
            board.undo();
            if wins {
                return Some((col, SelectionKind::ImmediateWin));
            }
        }

        let middle = self.config.middle_column();
        let marked = board.marked_count();
        if marked <= 1 && !board.is_column_full(middle) {
            return Some((middle, SelectionKind::Opening));
        }
        if board.last_move().is_some_and(|last| last.col == middle)
            && !board.is_column_full(middle)
            && marked < 5
        {
            return Some((middle, SelectionKind::CenterContinuation));
        }
        if legal.len() == 1 {
            return Some((legal[0], SelectionKind::ForcedMove));
        }
        None
    }
}

/// Finds a column whose one-ply-shallower search reproduces `target`.
///
/// Columns are tried in order and the first whose score equals `target`, or
/// lies within `tolerance` of it, wins. Otherwise the best-scoring column seen
/// is returned, and a random legal column when none improved on the initial
/// bound or the budget was already spent.
#[allow(clippy::too_many_arguments)]
fn recover_move<P: Position, C: Clock>(
    search: &mut Search<'_, C>,
    board: &mut P,
    rng: &mut StdRng,
    maximizing: bool,
    depth: i32,
    target: f64,
    timeout: Duration,
    tolerance: f64,
) -> usize {
    let legal = board.legal_columns();
    let mut best: Option<usize> = None;
    let mut best_score = if maximizing {
        f64::NEG_INFINITY
    } else {
        f64::INFINITY
    };

    if search.elapsed() < timeout {
        for &col in &legal {
            board.play(col);
            let score =
                search.alpha_beta(board, !maximizing, depth - 1, f64::NEG_INFINITY, f64::INFINITY);
            board.undo();
            if score == target || (score - target).abs() <= tolerance {
                trace!("column {col} reproduces {target}");
                return col;
            }
            if (maximizing && score > best_score) || (!maximizing && score < best_score) {
                best_score = score;
                best = Some(col);
            }
        }
    }

    best.unwrap_or_else(|| {
        trace!("no column reproduces {target}, picking at random");
        legal[rng.gen_range(0..legal.len())]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{board::Board, clock::ManualClock, parsers::moves};

    fn agent(rows: usize, cols: usize, connect: usize, first: bool) -> Agent<ManualClock> {
        let config = AgentConfig::new(rows, cols, connect, first, Duration::from_secs(10)).with_seed(17);
        Agent::with_clock(config, ManualClock::new()).unwrap()
    }

    #[test]
    fn opening_takes_the_middle() {
        let mut board = Board::new(6, 7, 4);
        let report = agent(6, 7, 4, true).select_move_with_report(&mut board);
        assert_eq!(report.column, 3);
        assert_eq!(report.kind, SelectionKind::Opening);

        let mut board = moves::parse(6, 7, 4, "0").unwrap();
        assert_eq!(agent(6, 7, 4, false).select_move(&mut board), 3);

        let mut board = Board::new(6, 8, 4);
        assert_eq!(agent(6, 8, 4, true).select_move(&mut board), 4);
    }

    #[test]
    fn immediate_win_comes_first() {
        // X X X _ on the bottom row, X to move.
        let mut board = moves::parse(6, 7, 4, "0 0 1 1 2 2").unwrap();
        let before = board.clone();
        let report = agent(6, 7, 4, true).select_move_with_report(&mut board);
        assert_eq!(report.column, 3);
        assert_eq!(report.kind, SelectionKind::ImmediateWin);
        assert_eq!(report.stats, SearchStats::default());
        assert_eq!(board, before);
    }

    #[test]
    fn center_continuation() {
        let mut board = moves::parse(6, 7, 4, "3 3 1 3").unwrap();
        let report = agent(6, 7, 4, true).select_move_with_report(&mut board);
        assert_eq!(report.column, 3);
        assert_eq!(report.kind, SelectionKind::CenterContinuation);
    }

    #[test]
    fn forced_move() {
        // Only column 2 has room left.
        let mut board = moves::parse(2, 3, 3, "0 1 1 0").unwrap();
        let report = agent(2, 3, 3, true).select_move_with_report(&mut board);
        assert_eq!(report.column, 2);
        assert_eq!(report.kind, SelectionKind::ForcedMove);
    }

    #[test]
    fn blocks_a_row_threat() {
        // O holds columns 1-3 of the bottom row; only column 4 stops it.
        let mut board = moves::parse(6, 7, 4, "0 1 5 2 6 3").unwrap();
        let report = agent(6, 7, 4, true).select_move_with_report(&mut board);
        assert_eq!(report.kind, SelectionKind::Search);
        assert_eq!(report.column, 4);
        assert!(report.score.is_some_and(f64::is_finite));
    }

    #[test]
    fn deeper_iterations_reuse_the_root_entry() {
        // Known approximation: once the root is cached, later depths return it.
        let mut board = moves::parse(6, 7, 4, "3 2 4 4 2 5").unwrap();
        let mut ai = agent(6, 7, 4, true);
        let report = ai.select_move_with_report(&mut board);
        assert_eq!(report.depth, 36);
        assert!(report.stats.cache_hits as i32 >= report.depth - 1);
    }

    #[test]
    fn search_leaves_board_untouched_and_returns_legal_move() {
        let mut board = moves::parse(6, 7, 4, "3 2 4 4 2 5").unwrap();
        let before = board.clone();
        let report = agent(6, 7, 4, true).select_move_with_report(&mut board);
        assert_eq!(board, before);
        assert!(board.legal_columns().contains(&report.column));
        assert_eq!(report.kind, SelectionKind::Search);
        assert!(report.depth >= 1);
    }

    #[test]
    fn expired_budget_falls_back_to_middle_available_column() {
        let config = AgentConfig::new(6, 7, 4, true, Duration::from_secs(1)).with_seed(3);
        let mut ai = Agent::with_clock(config, ManualClock::with_step(Duration::from_secs(2))).unwrap();
        let mut board = moves::parse(6, 7, 4, "3 2 4 4 2 5").unwrap();
        let report = ai.select_move_with_report(&mut board);
        assert_eq!(report.kind, SelectionKind::Fallback);
        assert_eq!(report.column, 3);
        assert_eq!(report.depth, 0);
    }

    #[test]
    fn late_depth_is_discarded() {
        // The clock passes the deadline while depth 1 runs.
        let config = AgentConfig::new(6, 7, 4, true, Duration::from_secs(1))
            .with_outer_margin(Duration::ZERO)
            .with_seed(3);
        let mut ai = Agent::with_clock(config, ManualClock::with_step(Duration::from_millis(400))).unwrap();
        let mut board = moves::parse(6, 7, 4, "3 2 4 4 2 5").unwrap();
        let report = ai.select_move_with_report(&mut board);
        assert_eq!(report.kind, SelectionKind::Fallback);
        assert_eq!(report.score, None);
    }

    #[test]
    fn root_turned_leaf_leaves_board_untouched() {
        // The root is polled past the leaf budget but before the deadline.
        let config = AgentConfig::new(6, 7, 4, true, Duration::from_secs(1)).with_seed(3);
        let mut ai = Agent::with_clock(config, ManualClock::with_step(Duration::from_millis(950))).unwrap();
        let mut board = moves::parse(6, 7, 4, "3 2 4 4 2 5").unwrap();
        let before = board.clone();
        let report = ai.select_move_with_report(&mut board);
        assert_eq!(report.stats.leaves, 1);
        assert_eq!(report.kind, SelectionKind::Fallback);
        assert_eq!(board, before);
        assert_eq!(board.side_to_move(), Player::First);
    }

    #[test]
    fn recovered_move_reproduces_the_depth_score() {
        let hasher = ZobristHasher::new(6, 7, Some(8));
        let clock = ManualClock::new();
        let mut rng = StdRng::seed_from_u64(8);
        let mut board = moves::parse(6, 7, 4, "3 2 4 4 2 5").unwrap();
        let budget = Duration::from_secs(3600);

        for depth in 1..=3 {
            let mut search = Search::new(&hasher, None, Player::First, &clock, Duration::ZERO, budget);
            let target = search.alpha_beta(&mut board, true, depth, f64::NEG_INFINITY, f64::INFINITY);
            let column = recover_move(&mut search, &mut board, &mut rng, true, depth, target, budget, 1.0);

            board.play(column);
            let replay = search.alpha_beta(&mut board, false, depth - 1, f64::NEG_INFINITY, f64::INFINITY);
            board.undo();
            assert!(replay == target || (replay - target).abs() <= 1.0, "depth {depth}");
        }
    }

    #[test]
    fn recovery_without_time_picks_a_legal_column() {
        let hasher = ZobristHasher::new(6, 7, Some(8));
        let clock = ManualClock::new();
        clock.set(Duration::from_secs(5));
        let mut rng = StdRng::seed_from_u64(8);
        let mut board = moves::parse(6, 7, 4, "3 2 4 4 2 5").unwrap();
        let mut search = Search::new(&hasher, None, Player::First, &clock, Duration::ZERO, Duration::from_secs(1));
        let column = recover_move(&mut search, &mut board, &mut rng, true, 2, 0.0, Duration::from_secs(1), 1.0);
        assert!(board.legal_columns().contains(&column));
        assert_eq!(search.stats.nodes, 0);
    }

    #[test]
    fn table_is_kept_across_games() {
        let mut board = moves::parse(6, 7, 4, "3 2 4 4 2 5").unwrap();
        let mut ai = agent(6, 7, 4, true);
        ai.select_move(&mut board);
        let table = ai.into_table();
        assert!(!table.is_empty());
        let entries = table.len();

        let config = AgentConfig::new(6, 7, 4, true, Duration::from_secs(10)).with_seed(17);
        let ai = Agent::with_table(config, ManualClock::new(), table).unwrap();
        assert_eq!(ai.table().len(), entries);
    }

    #[test]
    fn disabled_cache_stays_empty() {
        let config = AgentConfig::new(6, 7, 4, true, Duration::from_secs(1))
            .with_seed(17)
            .without_cache();
        let clock = ManualClock::with_step(Duration::from_millis(1));
        let mut ai = Agent::with_clock(config, clock).unwrap();
        let mut board = moves::parse(6, 7, 4, "3 2 4 4 2 5 5 6 6 0").unwrap();
        ai.select_move(&mut board);
        assert!(ai.table().is_empty());
    }

    #[test]
    fn initialize_validates() {
        assert!(Agent::initialize(6, 7, 4, true, 1.0).is_ok());
        assert_eq!(
            Agent::initialize(6, 7, 4, true, -1.0).err(),
            Some(ConfigError::Timeout(-1.0))
        );
        assert!(Agent::initialize(6, 7, 9, true, 1.0).is_err());
    }
}
