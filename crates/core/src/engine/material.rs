//! Engine-free evaluator
//!
//! Scores moves by the material balance they leave behind, one ply deep. It is
//! deterministic and needs no external process, which makes it the fallback
//! collaborator for the CLI and a reference implementation of [`Evaluator`].

use shakmaty::{Board, Chess, Color, Move, Position, Role};

use super::analysis::{CandidateMove, Classification, MoveClassification, PositionEval};
use super::evaluator::{Evaluator, EvaluatorError};
use crate::rules::move_to_uci;

/// Score of delivering checkmate, in pawns
pub const MATE_SCORE: f64 = 100.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialEvaluator;

impl MaterialEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Every legal move with its one-ply score, best first. Ties break on UCI
    /// so the ranking is stable.
    fn ranked_moves(&self, position: &Chess) -> Vec<(Move, String, f64)> {
        let mut ranked: Vec<(Move, String, f64)> = position
            .legal_moves()
            .into_iter()
            .filter_map(|mv| {
                let score = score_after(position, &mv)?;
                let uci = move_to_uci(&mv);
                Some((mv, uci, score))
            })
            .collect();

        ranked.sort_by(|a, b| b.2.total_cmp(&a.2).then_with(|| a.1.cmp(&b.1)));
        ranked
    }
}

impl Evaluator for MaterialEvaluator {
    fn evaluate_position(&self, position: &Chess, _depth: u8) -> Result<PositionEval, EvaluatorError> {
        let ranked = self.ranked_moves(position);
        match ranked.into_iter().next() {
            Some((_, uci, score)) => Ok(PositionEval {
                score,
                best_move: Some(uci),
            }),
            None => Ok(PositionEval {
                score: if position.is_checkmate() { -MATE_SCORE } else { 0.0 },
                best_move: None,
            }),
        }
    }

    fn classify_move(
        &self,
        position: &Chess,
        played: &Move,
        _depth: u8,
    ) -> Result<MoveClassification, EvaluatorError> {
        let played_score = score_after(position, played).ok_or_else(|| {
            EvaluatorError::Failed(format!("illegal move {}", move_to_uci(played)))
        })?;

        let best_score = self
            .ranked_moves(position)
            .first()
            .map(|(_, _, score)| *score)
            .unwrap_or(played_score);

        let eval_diff = best_score - played_score;
        // A move matching the best score is the best move
        let classification = if eval_diff <= 0.0 {
            Classification::Best
        } else {
            Classification::from_eval_diff(eval_diff)
        };

        Ok(MoveClassification {
            classification,
            eval_diff,
        })
    }

    fn alternative_moves(
        &self,
        position: &Chess,
        k: usize,
        _depth: u8,
    ) -> Result<Vec<CandidateMove>, EvaluatorError> {
        Ok(self
            .ranked_moves(position)
            .into_iter()
            .take(k)
            .map(|(_, uci, score)| CandidateMove::new(uci, score))
            .collect())
    }
}

/// Material balance for the mover after `mv`, or `None` if the move is illegal.
fn score_after(position: &Chess, mv: &Move) -> Option<f64> {
    let mover = position.turn();
    let after = position.clone().play(mv.clone()).ok()?;

    if after.is_checkmate() {
        Some(MATE_SCORE)
    } else if after.is_stalemate() {
        Some(0.0)
    } else {
        Some(material_balance(after.board(), mover))
    }
}

/// Material of `color` minus material of the opponent, in pawns.
pub fn material_balance(board: &Board, color: Color) -> f64 {
    let mut balance = 0.0;
    for square in board.occupied() {
        if let Some(piece) = board.piece_at(square) {
            let value = material_value(piece.role);
            if piece.color == color {
                balance += value;
            } else {
                balance -= value;
            }
        }
    }
    balance
}

fn material_value(role: Role) -> f64 {
    match role {
        Role::Pawn => 1.0,
        Role::Knight => 3.0,
        Role::Bishop => 3.0,
        Role::Rook => 5.0,
        Role::Queen => 9.0,
        Role::King => 0.0,
    }
}
