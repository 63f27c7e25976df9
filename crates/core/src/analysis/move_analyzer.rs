//! Analysis of a single played move

use std::sync::Arc;

use shakmaty::{Chess, Move};
use tracing::{debug, warn};

use super::concepts::detect_concepts;
use super::phase::GamePhase;
use super::types::{Diagnostic, DiagnosticKind, MissedOpportunity, MoveAnalysis};
use crate::config::AnalysisConfig;
use crate::engine::{Classification, Evaluator, PositionEval};
use crate::features::extract_features;
use crate::rules::{move_to_uci, RulesEngine};
use crate::tactics::{best_opportunity, move_motifs, scan_candidates};

/// Accuracy substituted when the evaluator cannot classify a move
pub const NEUTRAL_ACCURACY: f64 = 50.0;

/// A reviewed ply ready for analysis: the move and the positions around it.
#[derive(Debug, Clone)]
pub struct PlyJob {
    pub ply: usize,
    pub before: Chess,
    pub after: Chess,
    pub mv: Move,
    pub phase: GamePhase,
}

#[derive(Debug, Clone)]
pub struct PlyOutcome {
    pub analysis: MoveAnalysis,
    pub missed: Option<MissedOpportunity>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Clone)]
pub struct MoveAnalyzer {
    rules: Arc<dyn RulesEngine>,
    evaluator: Arc<dyn Evaluator>,
    config: AnalysisConfig,
}

impl MoveAnalyzer {
    pub fn new(
        rules: Arc<dyn RulesEngine>,
        evaluator: Arc<dyn Evaluator>,
        config: AnalysisConfig,
    ) -> Self {
        Self {
            rules,
            evaluator,
            config,
        }
    }

    pub fn analyze(&self, job: &PlyJob) -> PlyOutcome {
        let rules = self.rules.as_ref();
        let depth = self.config.depth;
        let mut diagnostics = Vec::new();

        let mut failure = |what: &str, error: &dyn std::fmt::Display| {
            warn!(ply = job.ply, error = %error, "{} failed, using neutral default", what);
            diagnostics.push(Diagnostic::new(
                job.ply,
                DiagnosticKind::EvaluatorFailure,
                format!("{}: {}", what, error),
            ));
        };

        let (classification, eval_diff, accuracy) =
            match self.evaluator.classify_move(&job.before, &job.mv, depth) {
                Ok(verdict) => (
                    verdict.classification,
                    verdict.eval_diff,
                    verdict.classification.accuracy(),
                ),
                Err(e) => {
                    failure("classify_move", &e);
                    (Classification::Good, 0.0, NEUTRAL_ACCURACY)
                }
            };

        let eval = match self.evaluator.evaluate_position(&job.before, depth) {
            Ok(eval) => eval,
            Err(e) => {
                failure("evaluate_position", &e);
                PositionEval {
                    score: 0.0,
                    best_move: None,
                }
            }
        };

        let alternatives =
            match self
                .evaluator
                .alternative_moves(&job.before, self.config.candidate_count, depth)
            {
                Ok(alternatives) => alternatives,
                Err(e) => {
                    failure("alternative_moves", &e);
                    Vec::new()
                }
            };

        let notation = rules.san(&job.before, &job.mv);
        let uci = move_to_uci(&job.mv);

        let tactical = scan_candidates(rules, &job.before, &alternatives);
        let best_tactical = best_opportunity(&tactical).cloned();

        let missed = best_tactical
            .as_ref()
            .filter(|_| !tactical.iter().any(|c| c.uci == uci))
            .map(|best| MissedOpportunity {
                ply: job.ply,
                fen: rules.fen(&job.before),
                played_move: notation.clone(),
                missed_move: best.notation.clone(),
                motifs: best.motifs.clone(),
                evaluation_diff: best.score - eval.score,
            });

        let motifs = move_motifs(rules, &job.before, &job.mv);
        let concepts = detect_concepts(rules, &job.before, &job.after, &job.mv, job.phase, &motifs);

        debug!(
            ply = job.ply,
            notation = %notation,
            classification = %classification,
            concepts = concepts.len(),
            "Analyzed move"
        );

        PlyOutcome {
            analysis: MoveAnalysis {
                ply: job.ply,
                notation,
                uci,
                fen: rules.fen(&job.before),
                phase: job.phase,
                evaluation: eval.score,
                best_move: eval.best_move,
                eval_diff,
                accuracy,
                classification,
                concepts,
                alternatives,
                best_tactical_alternative: best_tactical,
                features: extract_features(rules, &job.before),
            },
            missed,
            diagnostics,
        }
    }

    /// Stand-in for a ply whose analysis never completed.
    pub fn neutral(&self, job: &PlyJob, reason: &str) -> PlyOutcome {
        let rules = self.rules.as_ref();
        PlyOutcome {
            analysis: MoveAnalysis {
                ply: job.ply,
                notation: rules.san(&job.before, &job.mv),
                uci: move_to_uci(&job.mv),
                fen: rules.fen(&job.before),
                phase: job.phase,
                evaluation: 0.0,
                best_move: None,
                eval_diff: 0.0,
                accuracy: NEUTRAL_ACCURACY,
                classification: Classification::Good,
                concepts: Vec::new(),
                alternatives: Vec::new(),
                best_tactical_alternative: None,
                features: extract_features(rules, &job.before),
            },
            missed: None,
            diagnostics: vec![Diagnostic::new(
                job.ply,
                DiagnosticKind::EvaluatorFailure,
                reason,
            )],
        }
    }
}
