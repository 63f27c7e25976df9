use serde::{Deserialize, Serialize};
use shakmaty::{Bitboard, Chess, Color, Role, Square};

use crate::rules::{coords, forward, square_at, RulesEngine};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct KingSafety {
    pub castled: bool,
    pub pawn_shield: u32,
    pub attacker_count: u32,
    pub defender_count: u32,
    /// Relative measure only; compare, never sum across positions
    pub safety_score: f64,
}

impl KingSafety {
    fn score(castled: bool, shield: u32, attackers: u32, defenders: u32) -> f64 {
        let castled = if castled { 1.0 } else { 0.0 };
        2.0 * castled + 1.5 * f64::from(shield) - 1.5 * f64::from(attackers) + f64::from(defenders)
    }
}

pub fn king_safety(rules: &dyn RulesEngine, position: &Chess, color: Color) -> KingSafety {
    let Some(king) = rules.king_square(position, color) else {
        return KingSafety::default();
    };

    let castled = is_castled_square(king, color);
    let pawn_shield = pawn_shield(rules, position, color, king);

    let zone = king_zone(king);
    let attacked = rules.attacked_squares(position, color.other());
    let defended = rules.attacked_squares(position, color);

    let attacker_count = (zone & attacked).count() as u32;
    let defender_count = (zone & defended).count() as u32;

    KingSafety {
        castled,
        pawn_shield,
        attacker_count,
        defender_count,
        safety_score: KingSafety::score(castled, pawn_shield, attacker_count, defender_count),
    }
}

fn is_castled_square(king: Square, color: Color) -> bool {
    match color {
        Color::White => king == Square::G1 || king == Square::C1,
        Color::Black => king == Square::G8 || king == Square::C8,
    }
}

/// Own pawns on the three files around the king, one rank in front of it.
fn pawn_shield(rules: &dyn RulesEngine, position: &Chess, color: Color, king: Square) -> u32 {
    let (file, rank) = coords(king);
    let pawns = rules.pieces(position, color, Role::Pawn);

    (file - 1..=file + 1)
        .filter_map(|f| square_at(f, rank + forward(color)))
        .filter(|&sq| pawns.contains(sq))
        .count() as u32
}

/// The up to eight squares adjacent to `king`.
pub fn king_zone(king: Square) -> Bitboard {
    let (file, rank) = coords(king);
    let mut zone = Bitboard::EMPTY;
    for df in -1..=1 {
        for dr in -1..=1 {
            if df == 0 && dr == 0 {
                continue;
            }
            if let Some(sq) = square_at(file + df, rank + dr) {
                zone |= Bitboard::from_square(sq);
            }
        }
    }
    zone
}
