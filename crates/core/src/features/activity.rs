use serde::{Deserialize, Serialize};
use shakmaty::{Bitboard, Chess, Color, Role, Square};

use super::ByColor;
use crate::rules::RulesEngine;

pub const CENTER_SQUARES: [Square; 4] = [Square::E4, Square::D4, Square::E5, Square::D5];

/// Legal destination counts, summed per piece type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mobility {
    pub pawn: u32,
    pub knight: u32,
    pub bishop: u32,
    pub rook: u32,
    pub queen: u32,
    pub king: u32,
}

impl Mobility {
    pub fn total(&self) -> u32 {
        self.pawn + self.knight + self.bishop + self.rook + self.queen + self.king
    }

    fn slot(&mut self, role: Role) -> &mut u32 {
        match role {
            Role::Pawn => &mut self.pawn,
            Role::Knight => &mut self.knight,
            Role::Bishop => &mut self.bishop,
            Role::Rook => &mut self.rook,
            Role::Queen => &mut self.queen,
            Role::King => &mut self.king,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceActivity {
    pub mobility: ByColor<Mobility>,
    /// Center squares attacked by white minus those attacked by black
    pub center_control: i32,
    /// White minor pieces off their home squares minus black ones
    pub development: i32,
}

pub fn piece_activity(rules: &dyn RulesEngine, position: &Chess) -> PieceActivity {
    let to_move = rules.turn(position);
    let passed = rules.pass_turn(position);

    let mobility = ByColor::from_fn(|color| {
        // Legal moves exist only for the side to move
        if color == to_move {
            mobility(rules, position, color)
        } else {
            passed
                .as_ref()
                .map(|p| mobility(rules, p, color))
                .unwrap_or_default()
        }
    });

    PieceActivity {
        mobility,
        center_control: center_control(rules, position),
        development: development(rules, position, Color::White)
            - development(rules, position, Color::Black),
    }
}

fn mobility(rules: &dyn RulesEngine, position: &Chess, color: Color) -> Mobility {
    let mut mobility = Mobility::default();
    for role in Role::ALL {
        for square in rules.pieces(position, color, role) {
            *mobility.slot(role) += rules.legal_destinations(position, square).count() as u32;
        }
    }
    mobility
}

/// Signed control of the four central squares.
pub fn center_control(rules: &dyn RulesEngine, position: &Chess) -> i32 {
    let white = rules.attacked_squares(position, Color::White);
    let black = rules.attacked_squares(position, Color::Black);

    CENTER_SQUARES
        .iter()
        .map(|&sq| i32::from(white.contains(sq)) - i32::from(black.contains(sq)))
        .sum()
}

/// Minor pieces of `color` that have left their starting squares.
pub fn development(rules: &dyn RulesEngine, position: &Chess, color: Color) -> i32 {
    minor_home_squares(color)
        .iter()
        .filter(|(square, role)| {
            !rules
                .piece_at(position, *square)
                .is_some_and(|p| p.color == color && p.role == *role)
        })
        .count() as i32
}

fn minor_home_squares(color: Color) -> [(Square, Role); 4] {
    match color {
        Color::White => [
            (Square::B1, Role::Knight),
            (Square::G1, Role::Knight),
            (Square::C1, Role::Bishop),
            (Square::F1, Role::Bishop),
        ],
        Color::Black => [
            (Square::B8, Role::Knight),
            (Square::G8, Role::Knight),
            (Square::C8, Role::Bishop),
            (Square::F8, Role::Bishop),
        ],
    }
}

/// Squares the piece on `square` attacks that are not blocked by its own side.
pub fn reach(rules: &dyn RulesEngine, position: &Chess, square: Square) -> Bitboard {
    let Some(piece) = rules.piece_at(position, square) else {
        return Bitboard::EMPTY;
    };

    let mut own = Bitboard::EMPTY;
    for role in Role::ALL {
        own |= rules.pieces(position, piece.color, role);
    }
    rules.attacks_from(position, square) & !own
}
