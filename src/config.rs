use std::time::Duration;

use thiserror::Error;

use crate::piece::Player;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("board must have at least one row and one column, got {rows}x{cols}")]
    EmptyBoard { rows: usize, cols: usize },
    #[error("connect length {connect} does not fit a {rows}x{cols} board")]
    ConnectLength {
        connect: usize,
        rows: usize,
        cols: usize,
    },
    #[error("buffer fraction must be in (0, 1], got {0}")]
    BufferFraction(f64),
    #[error("invalid timeout of {0} seconds")]
    Timeout(f64),
}

/// Everything an agent needs to know before its first move.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    pub rows: usize,
    pub cols: usize,
    pub connect: usize,
    /// Whether the agent moves first.
    pub first: bool,
    /// Wall-clock budget for a single move.
    pub timeout: Duration,
    /// Share of `timeout` after which search nodes stop expanding.
    pub buffer_fraction: f64,
    /// Iterative deepening stops starting new depths this close to `timeout`.
    pub outer_margin: Duration,
    /// Largest score difference accepted when mapping a score back to a move.
    pub match_tolerance: f64,
    /// Seeds hashing keys and the fallback move picker. `None` draws from entropy.
    pub seed: Option<u64>,
    pub use_cache: bool,
}

impl AgentConfig {
    pub fn new(rows: usize, cols: usize, connect: usize, first: bool, timeout: Duration) -> Self {
        Self {
            rows,
            cols,
            connect,
            first,
            timeout,
            buffer_fraction: 0.90,
            outer_margin: Duration::from_millis(10),
            match_tolerance: 1.0,
            seed: None,
            use_cache: true,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_buffer_fraction(mut self, buffer_fraction: f64) -> Self {
        self.buffer_fraction = buffer_fraction;
        self
    }

    pub fn with_outer_margin(mut self, outer_margin: Duration) -> Self {
        self.outer_margin = outer_margin;
        self
    }

    pub fn with_match_tolerance(mut self, match_tolerance: f64) -> Self {
        self.match_tolerance = match_tolerance;
        self
    }

    pub fn without_cache(mut self) -> Self {
        self.use_cache = false;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::EmptyBoard {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.connect < 2 || self.connect > self.rows.max(self.cols) {
            return Err(ConfigError::ConnectLength {
                connect: self.connect,
                rows: self.rows,
                cols: self.cols,
            });
        }
        if !(self.buffer_fraction > 0.0 && self.buffer_fraction <= 1.0) {
            return Err(ConfigError::BufferFraction(self.buffer_fraction));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::Timeout(0.0));
        }
        Ok(())
    }

    #[inline]
    pub fn player(&self) -> Player {
        Player::from_first(self.first)
    }

    #[inline]
    pub fn middle_column(&self) -> usize {
        self.cols / 2
    }

    /// Elapsed time after which search nodes are evaluated as leaves.
    #[inline]
    pub fn leaf_budget(&self) -> Duration {
        self.timeout.mul_f64(self.buffer_fraction)
    }

    /// Elapsed time after which no further depth is started or accepted.
    #[inline]
    pub fn deadline(&self) -> Duration {
        self.timeout.saturating_sub(self.outer_margin)
    }
}
