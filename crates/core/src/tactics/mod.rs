//! Tactical pattern detection
//!
//! Tags candidate moves with the motifs they create (check, capture, fork,
//! pin). Every candidate is played on its own copy of the position.

pub mod pins;

use std::fmt;

use serde::{Deserialize, Serialize};
use shakmaty::{Bitboard, Chess, Color, Move, Role};
use tracing::debug;

use crate::engine::CandidateMove;
use crate::rules::{destination, move_to_uci, piece_value, RulesEngine};

pub use pins::is_pinned;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Motif {
    Check,
    Capture,
    WinningCapture,
    EqualCapture,
    LosingCapture,
    Fork,
    HighValueFork,
    Pin,
}

impl Motif {
    pub fn as_str(&self) -> &'static str {
        match self {
            Motif::Check => "check",
            Motif::Capture => "capture",
            Motif::WinningCapture => "winning_capture",
            Motif::EqualCapture => "equal_capture",
            Motif::LosingCapture => "losing_capture",
            Motif::Fork => "fork",
            Motif::HighValueFork => "high_value_fork",
            Motif::Pin => "pin",
        }
    }
}

impl fmt::Display for Motif {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A candidate move carrying at least one motif.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TacticalCandidate {
    /// SAN
    pub notation: String,
    pub uci: String,
    /// Evaluator score of the candidate
    pub score: f64,
    pub motifs: Vec<Motif>,
}

/// Motifs created by playing `mv` in `position`. Empty if the move is illegal.
pub fn move_motifs(rules: &dyn RulesEngine, position: &Chess, mv: &Move) -> Vec<Motif> {
    let mover = rules.turn(position);
    let Ok(after) = rules.play(position, mv) else {
        return Vec::new();
    };

    let mut motifs = Vec::new();

    if rules.is_check(&after) {
        motifs.push(Motif::Check);
    }

    // En passant lands on an empty square and is not tagged
    let captured = rules
        .piece_at(position, destination(mv))
        .filter(|piece| piece.color != mover);
    if let Some(captured) = captured {
        motifs.push(Motif::Capture);
        let taken = piece_value(captured.role);
        let moving = piece_value(mv.role());
        motifs.push(match taken.cmp(&moving) {
            std::cmp::Ordering::Greater => Motif::WinningCapture,
            std::cmp::Ordering::Equal => Motif::EqualCapture,
            std::cmp::Ordering::Less => Motif::LosingCapture,
        });
    }

    let targets = rules.attacked_squares(&after, mover) & occupied_by(rules, &after, mover.other());
    if targets.count() >= 2 {
        motifs.push(Motif::Fork);
        let high_value = targets.into_iter().any(|sq| {
            rules
                .piece_at(&after, sq)
                .is_some_and(|p| matches!(p.role, Role::Queen | Role::Rook))
        });
        if high_value {
            motifs.push(Motif::HighValueFork);
        }
    }

    if creates_pin(rules, &after, mover) {
        motifs.push(Motif::Pin);
    }

    motifs
}

fn occupied_by(rules: &dyn RulesEngine, position: &Chess, color: Color) -> Bitboard {
    let mut occupied = Bitboard::EMPTY;
    for role in Role::ALL {
        occupied |= rules.pieces(position, color, role);
    }
    occupied
}

/// Any enemy piece pinned to its king by `attacker`.
fn creates_pin(rules: &dyn RulesEngine, position: &Chess, attacker: Color) -> bool {
    let defender = attacker.other();
    let Some(king) = rules.king_square(position, defender) else {
        return false;
    };

    let candidates = occupied_by(rules, position, defender) & !Bitboard::from_square(king);
    candidates
        .into_iter()
        .any(|sq| is_pinned(rules, position, sq, king, attacker))
}

/// Tags each evaluator candidate and keeps those carrying a motif, in the
/// evaluator's order.
pub fn scan_candidates(
    rules: &dyn RulesEngine,
    position: &Chess,
    candidates: &[CandidateMove],
) -> Vec<TacticalCandidate> {
    candidates
        .iter()
        .filter_map(|candidate| {
            let mv = match rules.parse_move(position, &candidate.notation) {
                Ok(mv) => mv,
                Err(e) => {
                    debug!(notation = %candidate.notation, error = %e, "Skipping candidate");
                    return None;
                }
            };

            let motifs = move_motifs(rules, position, &mv);
            if motifs.is_empty() {
                return None;
            }

            Some(TacticalCandidate {
                notation: rules.san(position, &mv),
                uci: move_to_uci(&mv),
                score: candidate.score,
                motifs,
            })
        })
        .collect()
}

/// Highest-scoring tactical candidate; the earlier one wins ties.
pub fn best_opportunity(candidates: &[TacticalCandidate]) -> Option<&TacticalCandidate> {
    candidates.iter().fold(None, |best, candidate| match best {
        Some(b) if b.score >= candidate.score => Some(b),
        _ => Some(candidate),
    })
}
