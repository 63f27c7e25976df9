//! Pattern types for recurring mistakes

use serde::{Deserialize, Serialize};

use crate::analysis::{Concept, GamePhase};
use crate::tactics::Motif;

/// What a group of mistakes has in common
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PatternKind {
    /// Mistakes and blunders within one phase
    Phase(GamePhase),
    /// Mistakes and blunders tagged with the same concept
    Concept(Concept),
    /// Missed tactical opportunities sharing a motif
    MissedMotif(Motif),
}

impl PatternKind {
    pub fn label(&self) -> String {
        match self {
            PatternKind::Phase(phase) => format!("frequent_{}_mistakes", phase),
            PatternKind::Concept(concept) => format!("{}_mistakes", concept),
            PatternKind::MissedMotif(motif) => format!("missed_{}_opportunities", motif),
        }
    }

    pub fn description(&self) -> String {
        match self {
            PatternKind::Phase(phase) => format!("Multiple mistakes in the {} phase", phase),
            PatternKind::Concept(concept) => format!("Multiple mistakes involving {}", concept),
            PatternKind::MissedMotif(motif) => format!("Multiple missed {} opportunities", motif),
        }
    }
}

/// A mistake pattern found in a game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MistakePattern {
    pub kind: PatternKind,
    pub label: String,
    pub description: String,
    pub count: u32,
    /// Up to two example moves, in game order
    pub examples: Vec<String>,
}

impl MistakePattern {
    pub fn new(kind: PatternKind, count: u32, examples: Vec<String>) -> Self {
        Self {
            kind,
            label: kind.label(),
            description: kind.description(),
            count,
            examples,
        }
    }
}
