//! Evaluator integration
//!
//! Defines the evaluator seam and ships an engine-free material evaluator.

pub mod analysis;
pub mod evaluator;
pub mod material;

// Re-export main types for convenience
pub use analysis::{CandidateMove, Classification, MoveClassification, PositionEval};
pub use evaluator::{Evaluator, EvaluatorError};
pub use material::MaterialEvaluator;
