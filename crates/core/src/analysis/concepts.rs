//! Chess concepts shown by a played move

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shakmaty::{Chess, Move, Role, Square};

use super::phase::GamePhase;
use crate::features::activity::{center_control, reach, CENTER_SQUARES};
use crate::features::king_safety::king_safety;
use crate::rules::{coords, destination, home_rank, RulesEngine};
use crate::tactics::Motif;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Concept {
    Development,
    CenterControl,
    Castling,
    PieceActivity,
    KingSafety,
    PawnPromotion,
    KingActivity,
    Check,
    Capture,
    WinningCapture,
    EqualCapture,
    LosingCapture,
    Fork,
    HighValueFork,
    Pin,
}

impl Concept {
    pub const ALL: [Concept; 15] = [
        Concept::Development,
        Concept::CenterControl,
        Concept::Castling,
        Concept::PieceActivity,
        Concept::KingSafety,
        Concept::PawnPromotion,
        Concept::KingActivity,
        Concept::Check,
        Concept::Capture,
        Concept::WinningCapture,
        Concept::EqualCapture,
        Concept::LosingCapture,
        Concept::Fork,
        Concept::HighValueFork,
        Concept::Pin,
    ];

    /// Relative weight of the detection; used for ranking, not as a probability.
    pub fn confidence(&self) -> f64 {
        match self {
            Concept::Development => 0.8,
            Concept::CenterControl => 0.7,
            Concept::Castling => 0.9,
            Concept::PieceActivity => 0.7,
            Concept::KingSafety => 0.8,
            Concept::PawnPromotion => 0.9,
            Concept::KingActivity => 0.7,
            Concept::Check => 0.9,
            Concept::Capture => 0.9,
            Concept::WinningCapture => 0.8,
            Concept::EqualCapture => 0.7,
            Concept::LosingCapture => 0.5,
            Concept::Fork => 0.8,
            Concept::HighValueFork => 0.85,
            Concept::Pin => 0.8,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Concept::Development => "development",
            Concept::CenterControl => "center_control",
            Concept::Castling => "castling",
            Concept::PieceActivity => "piece_activity",
            Concept::KingSafety => "king_safety",
            Concept::PawnPromotion => "pawn_promotion",
            Concept::KingActivity => "king_activity",
            Concept::Check => "check",
            Concept::Capture => "capture",
            Concept::WinningCapture => "winning_capture",
            Concept::EqualCapture => "equal_capture",
            Concept::LosingCapture => "losing_capture",
            Concept::Fork => "fork",
            Concept::HighValueFork => "high_value_fork",
            Concept::Pin => "pin",
        }
    }
}

impl fmt::Display for Concept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Concept {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Concept::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown concept: {}", s))
    }
}

impl From<Motif> for Concept {
    fn from(motif: Motif) -> Self {
        match motif {
            Motif::Check => Concept::Check,
            Motif::Capture => Concept::Capture,
            Motif::WinningCapture => Concept::WinningCapture,
            Motif::EqualCapture => Concept::EqualCapture,
            Motif::LosingCapture => Concept::LosingCapture,
            Motif::Fork => Concept::Fork,
            Motif::HighValueFork => Concept::HighValueFork,
            Motif::Pin => Concept::Pin,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConceptHit {
    pub concept: Concept,
    pub confidence: f64,
}

impl From<Concept> for ConceptHit {
    fn from(concept: Concept) -> Self {
        Self {
            concept,
            confidence: concept.confidence(),
        }
    }
}

/// Phase-specific concepts of `mv` followed by the concepts of its motifs.
pub fn detect_concepts(
    rules: &dyn RulesEngine,
    before: &Chess,
    after: &Chess,
    mv: &Move,
    phase: GamePhase,
    motifs: &[Motif],
) -> Vec<ConceptHit> {
    let mut concepts = match phase {
        GamePhase::Opening => opening_concepts(rules, before, after, mv),
        GamePhase::Middlegame => middlegame_concepts(rules, before, after, mv),
        GamePhase::Endgame => endgame_concepts(mv),
    };
    concepts.extend(motifs.iter().map(|&m| Concept::from(m)));
    concepts.into_iter().map(ConceptHit::from).collect()
}

fn opening_concepts(rules: &dyn RulesEngine, before: &Chess, after: &Chess, mv: &Move) -> Vec<Concept> {
    let mover = rules.turn(before);
    let mut concepts = Vec::new();

    let from_home = mv
        .from()
        .is_some_and(|from| coords(from).1 == home_rank(mover));
    if from_home && !matches!(mv.role(), Role::Pawn | Role::King) {
        concepts.push(Concept::Development);
    }

    // Signed center control, seen from the mover's side
    let sign = if mover.is_white() { 1 } else { -1 };
    let improves = sign * center_control(rules, after) > sign * center_control(rules, before);
    if CENTER_SQUARES.contains(&destination(mv)) || improves {
        concepts.push(Concept::CenterControl);
    }

    if mv.is_castle() {
        concepts.push(Concept::Castling);
    }
    concepts
}

fn middlegame_concepts(
    rules: &dyn RulesEngine,
    before: &Chess,
    after: &Chess,
    mv: &Move,
) -> Vec<Concept> {
    let mover = rules.turn(before);
    let mut concepts = Vec::new();

    if let Some(from) = mv.from() {
        let target = destination(mv);
        if reach(rules, after, target).count() > reach(rules, before, from).count() {
            concepts.push(Concept::PieceActivity);
        }
    }

    if mv.role() == Role::King
        && king_safety(rules, after, mover).safety_score
            > king_safety(rules, before, mover).safety_score
    {
        concepts.push(Concept::KingSafety);
    }
    concepts
}

fn endgame_concepts(mv: &Move) -> Vec<Concept> {
    let mut concepts = Vec::new();
    if mv.is_promotion() {
        concepts.push(Concept::PawnPromotion);
    }
    if mv.role() == Role::King {
        if let Some(from) = mv.from() {
            if center_distance(destination(mv)) < center_distance(from) {
                concepts.push(Concept::KingActivity);
            }
        }
    }
    concepts
}

/// Euclidean distance to the central 2x2 block.
fn center_distance(square: Square) -> f64 {
    let (file, rank) = coords(square);
    let df = (file - 3).abs().min((file - 4).abs());
    let dr = (rank - 3).abs().min((rank - 4).abs());
    f64::from(df * df + dr * dr).sqrt()
}
