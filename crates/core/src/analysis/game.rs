//! Game orchestration
//!
//! Replays the move list, drives the [`MoveAnalyzer`] for the reviewed side
//! and reduces the per-ply results into a [`GameAnalysisResult`].

use std::collections::BTreeMap;
use std::sync::Arc;

use shakmaty::Color;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, warn};

use super::move_analyzer::{MoveAnalyzer, PlyJob, PlyOutcome};
use super::phase::detect_phase;
use super::types::{Diagnostic, DiagnosticKind, GameAnalysisResult, MoveRecord};
use crate::config::AnalysisConfig;
use crate::engine::Evaluator;
use crate::error::{Error, Result};
use crate::insights;
use crate::patterns;
use crate::rules::{move_to_uci, RulesEngine, RulesError};

#[derive(Default)]
pub struct GameAnalyzerBuilder {
    rules: Option<Arc<dyn RulesEngine>>,
    evaluator: Option<Arc<dyn Evaluator>>,
    config: AnalysisConfig,
}

impl GameAnalyzerBuilder {
    pub fn rules(mut self, rules: impl RulesEngine + 'static) -> Self {
        self.rules = Some(Arc::new(rules));
        self
    }

    pub fn evaluator(mut self, evaluator: impl Evaluator + 'static) -> Self {
        self.evaluator = Some(Arc::new(evaluator));
        self
    }

    /// Shares an evaluator (e.g. an engine pool) with other analyzers.
    pub fn shared_evaluator(mut self, evaluator: Arc<dyn Evaluator>) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    pub fn config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }

    /// Fails if either collaborator is missing.
    pub fn build(self) -> Result<GameAnalyzer> {
        let rules = self
            .rules
            .ok_or(Error::CollaboratorUnavailable("rules engine"))?;
        let evaluator = self
            .evaluator
            .ok_or(Error::CollaboratorUnavailable("evaluator"))?;

        Ok(GameAnalyzer {
            analyzer: MoveAnalyzer::new(rules.clone(), evaluator, self.config.clone()),
            rules,
            config: self.config,
        })
    }
}

/// Entry point of the analysis pipeline. Holds no per-game state, so one
/// instance can analyze any number of games, concurrently if needed.
#[derive(Clone)]
pub struct GameAnalyzer {
    analyzer: MoveAnalyzer,
    rules: Arc<dyn RulesEngine>,
    config: AnalysisConfig,
}

impl GameAnalyzer {
    pub fn builder() -> GameAnalyzerBuilder {
        GameAnalyzerBuilder::default()
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyzes `moves` (SAN or UCI, from the initial position) for `reviewed`.
    ///
    /// Never fails: unreadable input and evaluator errors are reported through
    /// `diagnostics` and `error` on the result.
    pub async fn analyze_game<S: AsRef<str>>(&self, moves: &[S], reviewed: Color) -> GameAnalysisResult {
        info!(plies = moves.len(), reviewed = ?reviewed, "Analyzing game");

        let mut result = GameAnalysisResult::empty(reviewed);
        let jobs = self.replay(moves, reviewed, &mut result);
        let outcomes = self.run_jobs(jobs).await;

        for outcome in outcomes {
            result
                .phases
                .get_mut(outcome.analysis.phase)
                .record(&outcome.analysis);
            result.missed_opportunities.extend(outcome.missed);
            result.diagnostics.extend(outcome.diagnostics);
            result.move_analyses.push(outcome.analysis);
        }
        result.diagnostics.sort_by_key(|d| d.ply);

        if !result.move_analyses.is_empty() {
            let total: f64 = result.move_analyses.iter().map(|a| a.accuracy).sum();
            result.overall_accuracy = total / result.move_analyses.len() as f64;
        }

        result.mistake_patterns =
            patterns::mine_patterns(&result.move_analyses, &result.missed_opportunities);
        let assessment = insights::assess(
            &result.phases,
            &result.mistake_patterns,
            &result.missed_opportunities,
        );
        result.improvement_suggestions = insights::suggest(&assessment.weaknesses);
        result.strengths_identified = assessment.strengths;
        result.weaknesses_identified = assessment.weaknesses;

        info!(
            analyzed = result.move_analyses.len(),
            accuracy = result.overall_accuracy,
            patterns = result.mistake_patterns.len(),
            partial = result.is_partial(),
            "Game analysis complete"
        );
        result
    }

    /// Plays every move in order, filling `result.moves`, and returns the
    /// reviewed side's plies.
    fn replay<S: AsRef<str>>(
        &self,
        moves: &[S],
        reviewed: Color,
        result: &mut GameAnalysisResult,
    ) -> Vec<PlyJob> {
        let rules = self.rules.as_ref();
        let mut position = rules.initial_position();
        let mut jobs = Vec::new();

        for (index, token) in moves.iter().enumerate() {
            let token = token.as_ref();
            let ply = result.moves.len();

            let played = rules
                .parse_move(&position, token)
                .and_then(|mv| rules.play(&position, &mv).map(|after| (mv, after)));

            let (mv, after) = match played {
                Ok(played) => played,
                Err(e @ (RulesError::EmptyNotation | RulesError::Notation { .. })) => {
                    warn!(index, token, error = %e, "Skipping unreadable move token");
                    result.diagnostics.push(Diagnostic::new(
                        ply,
                        DiagnosticKind::ParseError,
                        format!("move token {} skipped: {}", index, e),
                    ));
                    continue;
                }
                Err(e) => {
                    warn!(ply, token, error = %e, "Replay halted");
                    let message = format!("replay halted at ply {}: {}", ply, e);
                    result.diagnostics.push(Diagnostic::new(
                        ply,
                        DiagnosticKind::ReplayHalted,
                        message.clone(),
                    ));
                    result.error = Some(message);
                    break;
                }
            };

            let phase = detect_phase(rules, &position, ply);
            result.moves.push(MoveRecord {
                ply,
                notation: rules.san(&position, &mv),
                uci: move_to_uci(&mv),
                fen_after: rules.fen(&after),
                phase,
            });

            if rules.turn(&position) == reviewed {
                jobs.push(PlyJob {
                    ply,
                    before: position.clone(),
                    after: after.clone(),
                    mv,
                    phase,
                });
            }
            position = after;
        }

        debug!(replayed = result.moves.len(), reviewed_plies = jobs.len(), "Replay finished");
        jobs
    }

    /// Runs the per-ply analyses on blocking tasks, at most
    /// `max_concurrent_queries` at a time. Output is ordered by ply.
    async fn run_jobs(&self, jobs: Vec<PlyJob>) -> Vec<PlyOutcome> {
        let limit = self.config.max_concurrent_queries.max(1);
        let mut pending: BTreeMap<usize, PlyJob> = BTreeMap::new();
        let mut done: BTreeMap<usize, PlyOutcome> = BTreeMap::new();
        let mut set = JoinSet::new();

        for job in jobs {
            while set.len() >= limit {
                if let Some(joined) = set.join_next().await {
                    collect(joined, &mut pending, &mut done);
                }
            }

            pending.insert(job.ply, job.clone());
            let analyzer = self.analyzer.clone();
            set.spawn_blocking(move || analyzer.analyze(&job));
        }

        while let Some(joined) = set.join_next().await {
            collect(joined, &mut pending, &mut done);
        }

        // Whatever is still pending belongs to a task that never returned
        for (ply, job) in pending {
            warn!(ply, "Move analysis task failed, using neutral default");
            done.insert(ply, self.analyzer.neutral(&job, "analysis task failed"));
        }

        done.into_values().collect()
    }
}

fn collect(
    joined: std::result::Result<PlyOutcome, JoinError>,
    pending: &mut BTreeMap<usize, PlyJob>,
    done: &mut BTreeMap<usize, PlyOutcome>,
) {
    match joined {
        Ok(outcome) => {
            pending.remove(&outcome.analysis.ply);
            done.insert(outcome.analysis.ply, outcome);
        }
        Err(e) => warn!(error = %e, "Move analysis task panicked"),
    }
}
