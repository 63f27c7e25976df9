//! Result types of a game analysis

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use shakmaty::Color;

use super::concepts::{Concept, ConceptHit};
use super::phase::GamePhase;
use crate::engine::{CandidateMove, Classification};
use crate::features::PositionFeatures;
use crate::insights::{Strength, Suggestion, Weakness};
use crate::patterns::MistakePattern;
use crate::tactics::{Motif, TacticalCandidate};

/// One replayed ply, for either side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub ply: usize,
    /// SAN
    pub notation: String,
    pub uci: String,
    pub fen_after: String,
    pub phase: GamePhase,
}

/// Analysis of a move played by the reviewed side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveAnalysis {
    pub ply: usize,
    pub notation: String,
    pub uci: String,
    /// Position before the move
    pub fen: String,
    pub phase: GamePhase,
    /// Evaluator score of the position before the move
    pub evaluation: f64,
    pub best_move: Option<String>,
    pub eval_diff: f64,
    pub accuracy: f64,
    pub classification: Classification,
    pub concepts: Vec<ConceptHit>,
    pub alternatives: Vec<CandidateMove>,
    pub best_tactical_alternative: Option<TacticalCandidate>,
    pub features: PositionFeatures,
}

impl MoveAnalysis {
    pub fn has_concept(&self, concept: Concept) -> bool {
        self.concepts.iter().any(|hit| hit.concept == concept)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConceptTally {
    pub count: u32,
    pub confidence_sum: f64,
}

impl ConceptTally {
    pub fn average_confidence(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.confidence_sum / f64::from(self.count)
        }
    }
}

/// Per-phase totals. Accumulation order does not matter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseAggregate {
    pub move_count: u32,
    pub accuracy_sum: f64,
    pub classifications: BTreeMap<Classification, u32>,
    pub concepts: BTreeMap<Concept, ConceptTally>,
}

impl PhaseAggregate {
    pub fn record(&mut self, analysis: &MoveAnalysis) {
        self.move_count += 1;
        self.accuracy_sum += analysis.accuracy;
        *self.classifications.entry(analysis.classification).or_default() += 1;

        for hit in &analysis.concepts {
            let tally = self.concepts.entry(hit.concept).or_default();
            tally.count += 1;
            tally.confidence_sum += hit.confidence;
        }
    }

    pub fn merge(&mut self, other: &PhaseAggregate) {
        self.move_count += other.move_count;
        self.accuracy_sum += other.accuracy_sum;
        for (classification, count) in &other.classifications {
            *self.classifications.entry(*classification).or_default() += count;
        }
        for (concept, tally) in &other.concepts {
            let entry = self.concepts.entry(*concept).or_default();
            entry.count += tally.count;
            entry.confidence_sum += tally.confidence_sum;
        }
    }

    /// Mean accuracy, or `None` if no move was played in this phase.
    pub fn average_accuracy(&self) -> Option<f64> {
        (self.move_count > 0).then(|| self.accuracy_sum / f64::from(self.move_count))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseBreakdown {
    pub opening: PhaseAggregate,
    pub middlegame: PhaseAggregate,
    pub endgame: PhaseAggregate,
}

impl PhaseBreakdown {
    pub fn get(&self, phase: GamePhase) -> &PhaseAggregate {
        match phase {
            GamePhase::Opening => &self.opening,
            GamePhase::Middlegame => &self.middlegame,
            GamePhase::Endgame => &self.endgame,
        }
    }

    pub fn get_mut(&mut self, phase: GamePhase) -> &mut PhaseAggregate {
        match phase {
            GamePhase::Opening => &mut self.opening,
            GamePhase::Middlegame => &mut self.middlegame,
            GamePhase::Endgame => &mut self.endgame,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (GamePhase, &PhaseAggregate)> {
        GamePhase::ALL.into_iter().map(move |phase| (phase, self.get(phase)))
    }

    /// Concept tallies summed over all phases.
    pub fn concept_totals(&self) -> BTreeMap<Concept, ConceptTally> {
        let mut total = PhaseAggregate::default();
        for (_, aggregate) in self.iter() {
            total.merge(aggregate);
        }
        total.concepts
    }
}

/// A tactical candidate the reviewed side did not play.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissedOpportunity {
    pub ply: usize,
    pub fen: String,
    pub played_move: String,
    pub missed_move: String,
    pub motifs: Vec<Motif>,
    /// Candidate score minus the position evaluation
    pub evaluation_diff: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    ParseError,
    EvaluatorFailure,
    ReplayHalted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub ply: usize,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(ply: usize, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            ply,
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameAnalysisResult {
    #[serde(with = "color_name")]
    pub reviewed: Color,
    pub moves: Vec<MoveRecord>,
    pub move_analyses: Vec<MoveAnalysis>,
    pub phases: PhaseBreakdown,
    pub overall_accuracy: f64,
    pub missed_opportunities: Vec<MissedOpportunity>,
    pub mistake_patterns: Vec<MistakePattern>,
    pub strengths_identified: Vec<Strength>,
    pub weaknesses_identified: Vec<Weakness>,
    pub improvement_suggestions: Vec<Suggestion>,
    pub diagnostics: Vec<Diagnostic>,
    /// Set when replay stopped before the end of the move list
    pub error: Option<String>,
}

impl GameAnalysisResult {
    pub fn empty(reviewed: Color) -> Self {
        Self {
            reviewed,
            moves: Vec::new(),
            move_analyses: Vec::new(),
            phases: PhaseBreakdown::default(),
            overall_accuracy: 0.0,
            missed_opportunities: Vec::new(),
            mistake_patterns: Vec::new(),
            strengths_identified: Vec::new(),
            weaknesses_identified: Vec::new(),
            improvement_suggestions: Vec::new(),
            diagnostics: Vec::new(),
            error: None,
        }
    }

    pub fn is_partial(&self) -> bool {
        self.error.is_some()
    }
}

mod color_name {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use shakmaty::Color;

    pub fn serialize<S: Serializer>(color: &Color, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(match color {
            Color::White => "white",
            Color::Black => "black",
        })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color, D::Error> {
        let name = String::deserialize(deserializer)?;
        match name.as_str() {
            "white" => Ok(Color::White),
            "black" => Ok(Color::Black),
            other => Err(de::Error::custom(format!("unknown color: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::ShakmatyRules;

    fn analysis(classification: Classification, concepts: &[Concept]) -> MoveAnalysis {
        let rules = ShakmatyRules;
        let pos = shakmaty::Chess::default();
        MoveAnalysis {
            ply: 0,
            notation: "e4".to_string(),
            uci: "e2e4".to_string(),
            fen: String::new(),
            phase: GamePhase::Opening,
            evaluation: 0.0,
            best_move: None,
            eval_diff: 0.0,
            accuracy: classification.accuracy(),
            classification,
            concepts: concepts.iter().map(|&c| ConceptHit::from(c)).collect(),
            alternatives: Vec::new(),
            best_tactical_alternative: None,
            features: crate::features::extract_features(&rules, &pos),
        }
    }

    #[test]
    fn test_record_is_order_independent() {
        let a = analysis(Classification::Best, &[Concept::Development]);
        let b = analysis(Classification::Blunder, &[Concept::Development, Concept::Check]);

        let mut forward = PhaseAggregate::default();
        forward.record(&a);
        forward.record(&b);

        let mut backward = PhaseAggregate::default();
        backward.record(&b);
        backward.record(&a);

        assert_eq!(forward, backward);
        assert_eq!(forward.move_count, 2);
        assert_eq!(forward.average_accuracy(), Some(60.0));
        assert_eq!(forward.classifications[&Classification::Blunder], 1);
        assert_eq!(forward.concepts[&Concept::Development].count, 2);
        assert_eq!(PhaseAggregate::default().average_accuracy(), None);
    }

    #[test]
    fn test_merge_matches_record() {
        let a = analysis(Classification::Good, &[Concept::Capture]);
        let b = analysis(Classification::Mistake, &[Concept::Capture]);

        let mut left = PhaseAggregate::default();
        left.record(&a);
        let mut right = PhaseAggregate::default();
        right.record(&b);
        left.merge(&right);

        let mut both = PhaseAggregate::default();
        both.record(&a);
        both.record(&b);
        assert_eq!(left, both);
    }

    #[test]
    fn test_empty_result_serializes() {
        let result = GameAnalysisResult::empty(Color::Black);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["reviewed"], "black");
        assert!(json["error"].is_null());

        let back: GameAnalysisResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }
}
