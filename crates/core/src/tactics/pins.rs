//! Pin detection by ray casting

use shakmaty::{Chess, Color, Role, Square};

use crate::rules::{coords, square_at, RulesEngine};

/// Whether the piece on `square` is pinned to the king on `king` by a slider
/// of `attacker`.
///
/// The piece and the king must share a rank, file or diagonal with nothing
/// between them. Stepping away from the king past the piece, the first piece
/// met must be an `attacker` rook or queen (rank/file) or bishop or queen
/// (diagonal). Anything else blocks the pin, and so does the board edge.
pub fn is_pinned(
    rules: &dyn RulesEngine,
    position: &Chess,
    square: Square,
    king: Square,
    attacker: Color,
) -> bool {
    let Some((step, orthogonal)) = alignment(king, square) else {
        return false;
    };

    let (king_file, king_rank) = coords(king);
    let (file, rank) = coords(square);

    // Between the king and the piece
    let (mut f, mut r) = (king_file + step.0, king_rank + step.1);
    while (f, r) != (file, rank) {
        match square_at(f, r) {
            Some(sq) if rules.piece_at(position, sq).is_none() => {}
            _ => return false,
        }
        f += step.0;
        r += step.1;
    }

    // Beyond the piece
    let (mut f, mut r) = (file + step.0, rank + step.1);
    while let Some(sq) = square_at(f, r) {
        if let Some(piece) = rules.piece_at(position, sq) {
            return piece.color == attacker && slides_along(piece.role, orthogonal);
        }
        f += step.0;
        r += step.1;
    }
    false
}

/// Unit step from `from` towards `to` and whether it is orthogonal, if the
/// two squares are distinct and aligned.
fn alignment(from: Square, to: Square) -> Option<((i32, i32), bool)> {
    let (from_file, from_rank) = coords(from);
    let (to_file, to_rank) = coords(to);
    let (df, dr) = (to_file - from_file, to_rank - from_rank);

    if df == 0 && dr == 0 {
        None
    } else if df == 0 || dr == 0 {
        Some(((df.signum(), dr.signum()), true))
    } else if df.abs() == dr.abs() {
        Some(((df.signum(), dr.signum()), false))
    } else {
        None
    }
}

fn slides_along(role: Role, orthogonal: bool) -> bool {
    match role {
        Role::Queen => true,
        Role::Rook => orthogonal,
        Role::Bishop => !orthogonal,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::fen::Fen;
    use shakmaty::CastlingMode;

    use crate::rules::ShakmatyRules;

    fn position_from(fen: &str) -> Chess {
        let fen: Fen = fen.parse().unwrap();
        fen.into_position(CastlingMode::Standard).unwrap()
    }

    #[test]
    fn test_diagonal_pin() {
        let rules = ShakmatyRules;
        // Bb5 pins the c6 knight to the e8 king once d7 is empty
        let pos = position_from("r1bqk2r/ppp2ppp/2n2n2/1B2p3/4P3/5N2/PPPP1PPP/RNBQK2R b KQkq - 0 1");
        assert!(is_pinned(&rules, &pos, Square::C6, Square::E8, Color::White));
        assert!(!is_pinned(&rules, &pos, Square::F6, Square::E8, Color::White));
    }

    #[test]
    fn test_orthogonal_pin_and_wrong_slider() {
        let rules = ShakmatyRules;
        // Rook on e1, black knight e5, black king e8
        let pinned = position_from("4k3/8/8/4n3/8/8/8/4R1K1 b - - 0 1");
        assert!(is_pinned(&rules, &pinned, Square::E5, Square::E8, Color::White));

        // A bishop cannot pin along a file
        let bishop = position_from("4k3/8/8/4n3/8/8/8/4B1K1 b - - 0 1");
        assert!(!is_pinned(&rules, &bishop, Square::E5, Square::E8, Color::White));
    }

    #[test]
    fn test_blocker_between_king_and_piece_prevents_pin() {
        let rules = ShakmatyRules;
        // Black pawn on e6 sits between the king and the knight
        let pos = position_from("4k3/8/4p3/4n3/8/8/8/4R1K1 b - - 0 1");
        assert!(!is_pinned(&rules, &pos, Square::E5, Square::E8, Color::White));

        // White pawn in between blocks too
        let pos = position_from("4k3/8/4P3/4n3/8/8/8/4R1K1 b - - 0 1");
        assert!(!is_pinned(&rules, &pos, Square::E5, Square::E8, Color::White));
    }

    #[test]
    fn test_blocker_beyond_piece_prevents_pin() {
        let rules = ShakmatyRules;
        let pos = position_from("4k3/8/8/4n3/8/4P3/8/4R1K1 b - - 0 1");
        assert!(!is_pinned(&rules, &pos, Square::E5, Square::E8, Color::White));
    }

    #[test]
    fn test_edge_and_misaligned() {
        let rules = ShakmatyRules;
        let pos = position_from("4k3/8/8/4n3/8/8/8/6K1 b - - 0 1");
        assert!(!is_pinned(&rules, &pos, Square::E5, Square::E8, Color::White));
        assert!(!is_pinned(&rules, &pos, Square::D6, Square::E8, Color::White));
        assert!(!is_pinned(&rules, &pos, Square::E8, Square::E8, Color::White));
    }
}
