//! Position feature extraction
//!
//! Piece activity, king safety and pawn structure for a single position
//! snapshot. All queries go through the [`RulesEngine`].

pub mod activity;
pub mod king_safety;
pub mod pawns;

use serde::{Deserialize, Serialize};
use shakmaty::{Chess, Color};

use crate::rules::RulesEngine;

pub use activity::{Mobility, PieceActivity, CENTER_SQUARES};
pub use king_safety::KingSafety;
pub use pawns::PawnStructure;

/// A value kept separately for each side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ByColor<T> {
    pub white: T,
    pub black: T,
}

impl<T> ByColor<T> {
    pub fn from_fn(mut f: impl FnMut(Color) -> T) -> Self {
        Self {
            white: f(Color::White),
            black: f(Color::Black),
        }
    }

    pub fn get(&self, color: Color) -> &T {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    pub fn get_mut(&mut self, color: Color) -> &mut T {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionFeatures {
    pub piece_activity: PieceActivity,
    pub king_safety: ByColor<KingSafety>,
    pub pawn_structure: ByColor<PawnStructure>,
}

pub fn extract_features(rules: &dyn RulesEngine, position: &Chess) -> PositionFeatures {
    PositionFeatures {
        piece_activity: activity::piece_activity(rules, position),
        king_safety: ByColor::from_fn(|color| king_safety::king_safety(rules, position, color)),
        pawn_structure: ByColor::from_fn(|color| pawns::pawn_structure(rules, position, color)),
    }
}
