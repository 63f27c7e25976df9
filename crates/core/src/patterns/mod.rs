//! Recurring mistake patterns within a game

mod miner;
mod types;

pub use miner::{mine_patterns, MIN_PATTERN_SIZE};
pub use types::*;
