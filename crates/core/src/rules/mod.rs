//! Rules engine seam
//!
//! Move legality, move generation and static board queries are delegated to a
//! [`RulesEngine`]. Positions are immutable values: playing a move returns a new
//! position and never touches the one it was derived from.

use shakmaty::fen::Fen;
use shakmaty::san::{San, SanPlus};
use shakmaty::{
    Bitboard, Chess, Color, EnPassantMode, File, Move, Piece, Position, Rank, Role, Square,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RulesError {
    #[error("empty move notation")]
    EmptyNotation,

    #[error("unparseable move '{notation}': {reason}")]
    Notation { notation: String, reason: String },

    #[error("illegal move '{notation}'")]
    IllegalMove { notation: String },
}

/// Board rules and static queries consumed by the analysis pipeline.
///
/// Implementations must be deterministic and must not mutate shared state.
pub trait RulesEngine: Send + Sync {
    fn initial_position(&self) -> Chess;

    /// Resolves SAN (`Nf3`, `exd5+`, `O-O`) or UCI (`g1f3`) notation to a legal move.
    fn parse_move(&self, position: &Chess, notation: &str) -> Result<Move, RulesError>;

    /// Plays `mv` on a copy of `position`.
    fn play(&self, position: &Chess, mv: &Move) -> Result<Chess, RulesError>;

    /// Standard algebraic notation of a legal move in `position`.
    fn san(&self, position: &Chess, mv: &Move) -> String;

    fn piece_at(&self, position: &Chess, square: Square) -> Option<Piece>;

    /// Squares attacked by whatever piece stands on `square`.
    fn attacks_from(&self, position: &Chess, square: Square) -> Bitboard;

    fn pieces(&self, position: &Chess, color: Color, role: Role) -> Bitboard;

    /// Destination squares of the legal moves starting on `square`.
    fn legal_destinations(&self, position: &Chess, square: Square) -> Bitboard;

    fn is_check(&self, position: &Chess) -> bool;

    fn turn(&self, position: &Chess) -> Color;

    fn fen(&self, position: &Chess) -> String;

    /// The same placement with the other side to move, if that is a legal setup.
    fn pass_turn(&self, position: &Chess) -> Option<Chess>;

    /// Union of every square attacked by `color`.
    fn attacked_squares(&self, position: &Chess, color: Color) -> Bitboard {
        let mut attacked = Bitboard::EMPTY;
        for role in Role::ALL {
            for square in self.pieces(position, color, role) {
                attacked |= self.attacks_from(position, square);
            }
        }
        attacked
    }

    fn king_square(&self, position: &Chess, color: Color) -> Option<Square> {
        self.pieces(position, color, Role::King).first()
    }
}

/// Default rules engine backed by shakmaty.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShakmatyRules;

impl RulesEngine for ShakmatyRules {
    fn initial_position(&self) -> Chess {
        Chess::default()
    }

    fn parse_move(&self, position: &Chess, notation: &str) -> Result<Move, RulesError> {
        let cleaned = clean_notation(notation);
        if cleaned.is_empty() {
            return Err(RulesError::EmptyNotation);
        }

        let san = cleaned.parse::<SanPlus>();
        if let Ok(san) = &san {
            if let Ok(mv) = san.san.to_move(position) {
                return Ok(mv);
            }
        }

        // Fall back to UCI by matching against the legal move list
        if let Some(mv) = position
            .legal_moves()
            .into_iter()
            .find(|m| move_to_uci(m) == cleaned)
        {
            return Ok(mv);
        }

        match san {
            Ok(_) => Err(RulesError::IllegalMove {
                notation: cleaned.to_string(),
            }),
            Err(e) => Err(RulesError::Notation {
                notation: cleaned.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    fn play(&self, position: &Chess, mv: &Move) -> Result<Chess, RulesError> {
        position
            .clone()
            .play(mv.clone())
            .map_err(|_| RulesError::IllegalMove {
                notation: move_to_uci(mv),
            })
    }

    fn san(&self, position: &Chess, mv: &Move) -> String {
        San::from_move(position, mv.clone()).to_string()
    }

    fn piece_at(&self, position: &Chess, square: Square) -> Option<Piece> {
        position.board().piece_at(square)
    }

    fn attacks_from(&self, position: &Chess, square: Square) -> Bitboard {
        position.board().attacks_from(square)
    }

    fn pieces(&self, position: &Chess, color: Color, role: Role) -> Bitboard {
        let board = position.board();
        board.by_color(color) & board.by_role(role)
    }

    fn legal_destinations(&self, position: &Chess, square: Square) -> Bitboard {
        let mut destinations = Bitboard::EMPTY;
        for mv in position.legal_moves() {
            if mv.from() == Some(square) {
                destinations |= Bitboard::from_square(destination(&mv));
            }
        }
        destinations
    }

    fn is_check(&self, position: &Chess) -> bool {
        position.is_check()
    }

    fn turn(&self, position: &Chess) -> Color {
        position.turn()
    }

    fn fen(&self, position: &Chess) -> String {
        Fen::from_position(position, EnPassantMode::Legal).to_string()
    }

    fn pass_turn(&self, position: &Chess) -> Option<Chess> {
        position.clone().swap_turn().ok()
    }
}

/// Strips whitespace and trailing annotation glyphs (`!`, `?`).
fn clean_notation(notation: &str) -> &str {
    notation
        .trim()
        .trim_end_matches(|c: char| c == '!' || c == '?')
}

/// Convert shakmaty Move to UCI string
pub fn move_to_uci(mv: &Move) -> String {
    match mv {
        Move::Normal { from, to, promotion, .. } => {
            let promo = promotion.map(|r| match r {
                Role::Queen => "q",
                Role::Rook => "r",
                Role::Bishop => "b",
                Role::Knight => "n",
                _ => "",
            }).unwrap_or("");
            format!("{}{}{}", from, to, promo)
        }
        Move::EnPassant { from, to, .. } => format!("{}{}", from, to),
        Move::Castle { king, .. } => format!("{}{}", king, destination(mv)),
        Move::Put { .. } => String::new(),
    }
}

/// Square the moving piece lands on. For castling that is the king's square,
/// not the rook's.
pub fn destination(mv: &Move) -> Square {
    match mv {
        Move::Castle { king, rook } => {
            let file = if rook.file() > king.file() { File::G } else { File::C };
            Square::from_coords(file, king.rank())
        }
        other => other.to(),
    }
}

/// (file, rank) as signed indices, both 0..8.
pub fn coords(square: Square) -> (i32, i32) {
    (square.file() as i32, square.rank() as i32)
}

pub fn square_at(file: i32, rank: i32) -> Option<Square> {
    if (0..8).contains(&file) && (0..8).contains(&rank) {
        Some(Square::from_coords(File::new(file as u32), Rank::new(rank as u32)))
    } else {
        None
    }
}

/// Rank direction pawns of `color` advance in.
pub fn forward(color: Color) -> i32 {
    match color {
        Color::White => 1,
        Color::Black => -1,
    }
}

pub fn home_rank(color: Color) -> i32 {
    match color {
        Color::White => 0,
        Color::Black => 7,
    }
}

/// Standard unit value; the king is priceless.
pub fn piece_value(role: Role) -> u32 {
    match role {
        Role::Pawn => 1,
        Role::Knight => 3,
        Role::Bishop => 3,
        Role::Rook => 5,
        Role::Queen => 9,
        Role::King => u32::MAX,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position_from(fen: &str) -> Chess {
        let fen: Fen = fen.parse().unwrap();
        fen.into_position(shakmaty::CastlingMode::Standard).unwrap()
    }

    #[test]
    fn test_parse_san_and_uci() {
        let rules = ShakmatyRules;
        let pos = rules.initial_position();

        let san = rules.parse_move(&pos, "Nf3").unwrap();
        let uci = rules.parse_move(&pos, "g1f3").unwrap();
        assert_eq!(san, uci);
        assert_eq!(move_to_uci(&san), "g1f3");
        assert_eq!(rules.san(&pos, &uci), "Nf3");
    }

    #[test]
    fn test_parse_strips_annotations() {
        let rules = ShakmatyRules;
        let pos = rules.initial_position();
        assert!(rules.parse_move(&pos, " e4!? ").is_ok());
        assert_eq!(rules.parse_move(&pos, "  "), Err(RulesError::EmptyNotation));
        assert_eq!(rules.parse_move(&pos, "!!"), Err(RulesError::EmptyNotation));
    }

    #[test]
    fn test_parse_rejects_illegal_and_garbage() {
        let rules = ShakmatyRules;
        let pos = rules.initial_position();
        assert!(matches!(
            rules.parse_move(&pos, "Ke2"),
            Err(RulesError::IllegalMove { .. })
        ));
        assert!(rules.parse_move(&pos, "zz9").is_err());
    }

    #[test]
    fn test_play_leaves_original_untouched() {
        let rules = ShakmatyRules;
        let pos = rules.initial_position();
        let mv = rules.parse_move(&pos, "e4").unwrap();
        let next = rules.play(&pos, &mv).unwrap();

        assert_eq!(rules.turn(&pos), Color::White);
        assert_eq!(rules.turn(&next), Color::Black);
        assert!(rules.piece_at(&pos, Square::E4).is_none());
        assert!(rules.piece_at(&next, Square::E4).is_some());
    }

    #[test]
    fn test_castle_uci_uses_king_destination() {
        let rules = ShakmatyRules;
        let pos = position_from("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let short = rules.parse_move(&pos, "O-O").unwrap();
        let long = rules.parse_move(&pos, "O-O-O").unwrap();
        assert_eq!(move_to_uci(&short), "e1g1");
        assert_eq!(move_to_uci(&long), "e1c1");
    }

    #[test]
    fn test_static_queries() {
        let rules = ShakmatyRules;
        let pos = rules.initial_position();

        assert_eq!(rules.pieces(&pos, Color::White, Role::Pawn).count(), 8);
        assert_eq!(rules.king_square(&pos, Color::Black), Some(Square::E8));
        assert_eq!(rules.legal_destinations(&pos, Square::G1).count(), 2);
        assert_eq!(rules.legal_destinations(&pos, Square::D1).count(), 0);
        // Third rank is fully covered by white pawns and knights
        let attacked = rules.attacked_squares(&pos, Color::White);
        assert!(attacked.contains(Square::E3));
        assert!(!attacked.contains(Square::E5));

        let passed = rules.pass_turn(&pos).unwrap();
        assert_eq!(rules.turn(&passed), Color::Black);
        assert_eq!(rules.legal_destinations(&passed, Square::G8).count(), 2);
    }

    #[test]
    fn test_square_helpers() {
        assert_eq!(coords(Square::E4), (4, 3));
        assert_eq!(square_at(4, 3), Some(Square::E4));
        assert_eq!(square_at(8, 0), None);
        assert_eq!(square_at(0, -1), None);
    }
}
