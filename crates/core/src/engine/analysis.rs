//! Types exchanged with the evaluator

use std::fmt;

use serde::{Deserialize, Serialize};

/// Move quality label. Assigned only by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Best,
    Good,
    Inaccuracy,
    Mistake,
    Blunder,
    /// Any label outside the known set
    Unknown,
}

impl Classification {
    /// Accuracy on the 0-100 scale.
    pub fn accuracy(&self) -> f64 {
        match self {
            Classification::Best => 100.0,
            Classification::Good => 80.0,
            Classification::Inaccuracy => 60.0,
            Classification::Mistake => 40.0,
            Classification::Blunder => 20.0,
            Classification::Unknown => 50.0,
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label {
            "Best" => Classification::Best,
            "Good" => Classification::Good,
            "Inaccuracy" => Classification::Inaccuracy,
            "Mistake" => Classification::Mistake,
            "Blunder" => Classification::Blunder,
            _ => Classification::Unknown,
        }
    }

    /// Classification from an evaluation drop in pawns, as the material evaluator grades it.
    pub fn from_eval_diff(eval_diff: f64) -> Self {
        match eval_diff {
            d if d >= 2.0 => Classification::Blunder,
            d if d >= 1.0 => Classification::Mistake,
            d if d >= 0.3 => Classification::Inaccuracy,
            d if d >= -0.1 => Classification::Good,
            _ => Classification::Best,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Classification::Mistake | Classification::Blunder)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Best => "Best",
            Classification::Good => "Good",
            Classification::Inaccuracy => "Inaccuracy",
            Classification::Mistake => "Mistake",
            Classification::Blunder => "Blunder",
            Classification::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evaluation of a position, from the side to move's perspective (pawns).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionEval {
    pub score: f64,
    /// Best move in UCI notation, if any legal move exists
    pub best_move: Option<String>,
}

/// Evaluator verdict on a played move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveClassification {
    pub classification: Classification,
    /// Evaluation lost by the move, in pawns (positive = worse than best)
    pub eval_diff: f64,
}

/// One ranked candidate from the evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateMove {
    /// SAN or UCI notation
    pub notation: String,
    pub score: f64,
}

impl CandidateMove {
    pub fn new(notation: impl Into<String>, score: f64) -> Self {
        Self {
            notation: notation.into(),
            score,
        }
    }
}
