//! Evaluator seam
//!
//! Position scoring, best-move search and move classification are owned by an
//! external engine. Every call is stateless and may fail on its own; callers
//! substitute neutral defaults instead of aborting.

use shakmaty::{Chess, Move};
use thiserror::Error;

use super::analysis::{CandidateMove, MoveClassification, PositionEval};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvaluatorError {
    #[error("evaluator unavailable: {0}")]
    Unavailable(String),

    #[error("evaluation failed: {0}")]
    Failed(String),
}

pub trait Evaluator: Send + Sync {
    fn evaluate_position(&self, position: &Chess, depth: u8) -> Result<PositionEval, EvaluatorError>;

    fn classify_move(
        &self,
        position: &Chess,
        played: &Move,
        depth: u8,
    ) -> Result<MoveClassification, EvaluatorError>;

    /// Top `k` moves, best first.
    fn alternative_moves(
        &self,
        position: &Chess,
        k: usize,
        depth: u8,
    ) -> Result<Vec<CandidateMove>, EvaluatorError>;
}
