use std::fmt;

use serde::{Deserialize, Serialize};
use shakmaty::{Chess, Color, Role};

use crate::rules::RulesEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Opening,
    Middlegame,
    Endgame,
}

impl GamePhase {
    pub const ALL: [GamePhase; 3] = [GamePhase::Opening, GamePhase::Middlegame, GamePhase::Endgame];

    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Opening => "opening",
            GamePhase::Middlegame => "middlegame",
            GamePhase::Endgame => "endgame",
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phase at `ply` given the number of non-pawn, non-king pieces on the board.
///
/// The thresholds apply to the move number (`ply / 2`). Not monotonic: from
/// move 20 on, a position with 7-10 pieces is an endgame, while before it the
/// same material is still a middlegame.
pub fn phase_for(ply: usize, pieces: u32) -> GamePhase {
    let move_number = ply / 2;
    if move_number < 10 {
        GamePhase::Opening
    } else if pieces <= 6 {
        GamePhase::Endgame
    } else if move_number < 20 {
        GamePhase::Middlegame
    } else if pieces <= 10 {
        GamePhase::Endgame
    } else {
        GamePhase::Middlegame
    }
}

/// Knights, bishops, rooks and queens of both sides.
pub fn piece_count(rules: &dyn RulesEngine, position: &Chess) -> u32 {
    [Color::White, Color::Black]
        .into_iter()
        .flat_map(|color| {
            [Role::Knight, Role::Bishop, Role::Rook, Role::Queen]
                .into_iter()
                .map(move |role| rules.pieces(position, color, role).count() as u32)
        })
        .sum()
}

pub fn detect_phase(rules: &dyn RulesEngine, position: &Chess, ply: usize) -> GamePhase {
    phase_for(ply, piece_count(rules, position))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::ShakmatyRules;

    #[test]
    fn test_opening_regardless_of_material() {
        assert_eq!(phase_for(5, 0), GamePhase::Opening);
        assert_eq!(phase_for(5, 14), GamePhase::Opening);
        assert_eq!(phase_for(19, 2), GamePhase::Opening);
    }

    #[test]
    fn test_middle_and_end() {
        assert_eq!(phase_for(25, 6), GamePhase::Endgame);
        assert_eq!(phase_for(25, 10), GamePhase::Middlegame);
        assert_eq!(phase_for(21, 8), GamePhase::Middlegame);
        assert_eq!(phase_for(45, 11), GamePhase::Middlegame);
    }

    #[test]
    fn test_non_monotonic_after_move_twenty() {
        // Eight pieces: middlegame at move 10, endgame at move 20
        assert_eq!(phase_for(21, 8), GamePhase::Middlegame);
        assert_eq!(phase_for(41, 8), GamePhase::Endgame);
        assert_eq!(phase_for(41, 6), GamePhase::Endgame);
        assert_eq!(phase_for(41, 12), GamePhase::Middlegame);
    }

    #[test]
    fn test_piece_count_of_start_position() {
        let rules = ShakmatyRules;
        let pos = rules.initial_position();
        assert_eq!(piece_count(&rules, &pos), 14);
        assert_eq!(detect_phase(&rules, &pos, 0), GamePhase::Opening);
        assert_eq!(detect_phase(&rules, &pos, 60), GamePhase::Middlegame);
    }
}
