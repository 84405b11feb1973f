pub mod agent;
pub mod board;
pub mod clock;
pub mod config;
pub mod constants;
pub mod evaluation;
pub mod hashing;
pub mod parsers;
pub mod piece;
pub mod position;
pub mod search;
pub mod square;
pub mod transposition_table;

pub use agent::{Agent, MoveReport, SelectionKind};
pub use board::Board;
pub use config::AgentConfig;
pub use constants::Direction;
pub use piece::{Cell, Player};
pub use position::{GameState, Outcome, Position};
pub use square::Square;
