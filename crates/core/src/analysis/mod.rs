//! Move analysis and game orchestration

pub mod concepts;
pub mod game;
pub mod move_analyzer;
pub mod phase;
pub mod types;

pub use concepts::{Concept, ConceptHit};
pub use game::{GameAnalyzer, GameAnalyzerBuilder};
pub use move_analyzer::{MoveAnalyzer, PlyJob, PlyOutcome};
pub use phase::{detect_phase, phase_for, GamePhase};
pub use types::{
    ConceptTally, Diagnostic, DiagnosticKind, GameAnalysisResult, MissedOpportunity,
    MoveAnalysis, MoveRecord, PhaseAggregate, PhaseBreakdown,
};
