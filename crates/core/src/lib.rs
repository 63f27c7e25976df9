//! Chess Coach Core Library
//!
//! Reviews a finished game for one side: per-move classification, positional
//! and tactical concepts, missed opportunities, mistake patterns, and
//! coaching suggestions.

pub mod analysis;
pub mod config;
pub mod engine;
pub mod error;
pub mod features;
pub mod insights;
pub mod parser;
pub mod patterns;
pub mod rules;
pub mod tactics;

pub use analysis::{GameAnalysisResult, GameAnalyzer, GameAnalyzerBuilder, GamePhase, MoveAnalysis};
pub use config::AnalysisConfig;
pub use engine::{Classification, Evaluator, EvaluatorError, MaterialEvaluator};
pub use error::{Error, Result};
pub use features::{extract_features, PositionFeatures};
pub use insights::{Strength, Suggestion, Weakness};
pub use parser::{parse_pgn_file, parse_pgn_str, PgnGame};
pub use patterns::MistakePattern;
pub use rules::{RulesEngine, RulesError, ShakmatyRules};
pub use tactics::{Motif, TacticalCandidate};

pub use shakmaty::{Chess, Color};
