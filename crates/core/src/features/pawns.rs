use serde::{Deserialize, Serialize};
use shakmaty::{Bitboard, Chess, Color, Role, Square};

use crate::rules::{coords, forward, square_at, RulesEngine};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PawnStructure {
    pub total_pawns: u32,
    /// Files holding two or more pawns
    pub doubled_pawns: u32,
    pub pawn_islands: u32,
    pub isolated_pawns: u32,
    /// Pawns with a friendly pawn on an adjacent file
    pub supported_pawns: u32,
    pub passed_pawns: u32,
    pub backward_pawns: u32,
}

pub fn pawn_structure(rules: &dyn RulesEngine, position: &Chess, color: Color) -> PawnStructure {
    let own = rules.pieces(position, color, Role::Pawn);
    let enemy = rules.pieces(position, color.other(), Role::Pawn);
    let occupied = occupied(rules, position);

    let mut files = [0u32; 8];
    for square in own {
        files[square.file() as usize] += 1;
    }

    let mut structure = PawnStructure {
        total_pawns: own.count() as u32,
        doubled_pawns: files.iter().filter(|&&n| n >= 2).count() as u32,
        pawn_islands: islands(&files),
        ..PawnStructure::default()
    };

    for square in own {
        let isolated = is_isolated(&files, square);
        let passed = is_passed(enemy, square, color);

        if isolated {
            structure.isolated_pawns += 1;
        }
        if passed {
            structure.passed_pawns += 1;
        }
        if !isolated && !passed && is_backward(own, enemy, occupied, square, color) {
            structure.backward_pawns += 1;
        }
    }
    structure.supported_pawns = structure.total_pawns - structure.isolated_pawns;

    structure
}

fn occupied(rules: &dyn RulesEngine, position: &Chess) -> Bitboard {
    let mut occupied = Bitboard::EMPTY;
    for color in [Color::White, Color::Black] {
        for role in Role::ALL {
            occupied |= rules.pieces(position, color, role);
        }
    }
    occupied
}

fn islands(files: &[u32; 8]) -> u32 {
    let mut islands = 0;
    let mut in_island = false;
    for &count in files {
        if count > 0 && !in_island {
            islands += 1;
        }
        in_island = count > 0;
    }
    islands
}

fn adjacent_files(file: i32) -> impl Iterator<Item = i32> {
    [file - 1, file + 1].into_iter().filter(|f| (0..8).contains(f))
}

fn is_isolated(files: &[u32; 8], square: Square) -> bool {
    let (file, _) = coords(square);
    adjacent_files(file).all(|f| files[f as usize] == 0)
}

/// No enemy pawn on this or an adjacent file anywhere ahead.
fn is_passed(enemy: Bitboard, square: Square, color: Color) -> bool {
    let (file, rank) = coords(square);
    let dir = forward(color);

    let mut r = rank + dir;
    while (0..8).contains(&r) {
        for f in file - 1..=file + 1 {
            if square_at(f, r).is_some_and(|sq| enemy.contains(sq)) {
                return false;
            }
        }
        r += dir;
    }
    true
}

/// No friendly pawn level with or behind it on an adjacent file, and its
/// advance square is blocked or covered by an enemy pawn.
fn is_backward(
    own: Bitboard,
    enemy: Bitboard,
    occupied: Bitboard,
    square: Square,
    color: Color,
) -> bool {
    let (file, rank) = coords(square);
    let dir = forward(color);

    let supportable = adjacent_files(file).any(|f| {
        let mut r = rank;
        while (0..8).contains(&r) {
            if square_at(f, r).is_some_and(|sq| own.contains(sq)) {
                return true;
            }
            r -= dir;
        }
        false
    });
    if supportable {
        return false;
    }

    let Some(advance) = square_at(file, rank + dir) else {
        return false;
    };
    if occupied.contains(advance) {
        return true;
    }
    adjacent_files(file)
        .filter_map(|f| square_at(f, rank + 2 * dir))
        .any(|sq| enemy.contains(sq))
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

    fn assert_invariants(structure: &PawnStructure) {
        assert_eq!(
            structure.isolated_pawns + structure.supported_pawns,
            structure.total_pawns
        );
        assert!(structure.doubled_pawns <= structure.total_pawns / 2);
    }

    #[test]
    fn test_invariants_hold_through_a_game() {
        let rules = ShakmatyRules;
        let moves = [
            "e4", "e5", "Nf3", "Nc6", "Bb5", "a6", "Bxc6", "dxc6", "O-O", "f6", "d4", "exd4",
            "Nxd4", "c5", "Nb3", "Qxd1", "Rxd1", "Bg4", "f3", "Be6", "Nc3", "Bd6", "Be3", "b6",
            "a4", "O-O-O",
        ];

        let mut pos = rules.initial_position();
        let mut saw_doubled = false;
        for notation in moves {
            for color in [Color::White, Color::Black] {
                let structure = pawn_structure(&rules, &pos, color);
                assert_invariants(&structure);
                saw_doubled |= structure.doubled_pawns > 0;
            }
            let mv = rules.parse_move(&pos, notation).unwrap();
            pos = rules.play(&pos, &mv).unwrap();
        }
        for color in [Color::White, Color::Black] {
            assert_invariants(&pawn_structure(&rules, &pos, color));
        }

        // Black's c-pawns are doubled from move four on
        assert!(saw_doubled);
        assert_eq!(pawn_structure(&rules, &pos, Color::Black).doubled_pawns, 1);
    }

    #[test]
    fn test_starting_structure() {
        let rules = ShakmatyRules;
        let structure = pawn_structure(&rules, &Chess::default(), Color::White);
        assert_eq!(structure.total_pawns, 8);
        assert_eq!(structure.pawn_islands, 1);
        assert_eq!(structure.isolated_pawns, 0);
        assert_eq!(structure.passed_pawns, 0);
        assert_eq!(structure.backward_pawns, 0);
        assert_invariants(&structure);
    }

    #[test]
    fn test_doubled_isolated_and_islands() {
        let rules = ShakmatyRules;
        // White: a2, c2, c3, e4, f2. Black: h7.
        let pos = position_from("4k3/7p/8/8/4P3/2P5/P1P2P2/4K3 w - - 0 1");
        let structure = pawn_structure(&rules, &pos, Color::White);

        assert_eq!(structure.total_pawns, 5);
        assert_eq!(structure.doubled_pawns, 1);
        assert_eq!(structure.pawn_islands, 3);
        // a2, c2, c3 have no neighbours on adjacent files
        assert_eq!(structure.isolated_pawns, 3);
        assert_eq!(structure.supported_pawns, 2);
        assert_eq!(structure.passed_pawns, 5);
        assert_invariants(&structure);

        let black = pawn_structure(&rules, &pos, Color::Black);
        assert_eq!(black.passed_pawns, 1);
        assert_invariants(&black);
    }

    #[test]
    fn test_passed_pawn_scan_reaches_board_edge() {
        let rules = ShakmatyRules;
        // Black pawn on c7 still blocks the white b2 pawn from far away
        let pos = position_from("4k3/2p5/8/8/8/8/1P6/4K3 w - - 0 1");
        let structure = pawn_structure(&rules, &pos, Color::White);
        assert_eq!(structure.passed_pawns, 0);
    }

    #[test]
    fn test_backward_pawn() {
        let rules = ShakmatyRules;
        // d3 lags behind c4 and e4; its advance square d4 is covered by the c5 pawn
        let pos = position_from("4k3/8/8/2p5/2P1P3/3P4/8/4K3 w - - 0 1");
        let structure = pawn_structure(&rules, &pos, Color::White);
        assert_eq!(structure.backward_pawns, 1);
        assert_invariants(&structure);

        // A c2 pawn can come up behind d3
        let pos = position_from("4k3/8/8/2p5/2P1P3/3P4/2P5/4K3 w - - 0 1");
        let structure = pawn_structure(&rules, &pos, Color::White);
        assert_eq!(structure.backward_pawns, 0);
        assert_eq!(structure.doubled_pawns, 1);
        assert_invariants(&structure);
    }

    #[test]
    fn test_backward_pawn_blocked_by_enemy_cover() {
        let rules = ShakmatyRules;
        // d2 has only e4 ahead of it and d3 is covered by the c4 pawn
        let pos = position_from("4k3/8/8/8/2p1P3/8/3P4/4K3 w - - 0 1");
        let structure = pawn_structure(&rules, &pos, Color::White);
        assert_eq!(structure.backward_pawns, 1);
        assert_invariants(&structure);
    }
}
