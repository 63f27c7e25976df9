//! Mistake-pattern mining

use std::collections::BTreeMap;

use super::types::{MistakePattern, PatternKind};
use crate::analysis::{GamePhase, MissedOpportunity, MoveAnalysis};

/// A group needs this many members to become a pattern
pub const MIN_PATTERN_SIZE: usize = 2;
const MAX_EXAMPLES: usize = 2;

/// Groups mistakes and blunders by phase and by concept, and missed
/// opportunities by motif. Phase patterns come first, then concept patterns,
/// then missed-motif patterns.
pub fn mine_patterns(
    analyses: &[MoveAnalysis],
    missed: &[MissedOpportunity],
) -> Vec<MistakePattern> {
    let errors: Vec<&MoveAnalysis> = analyses
        .iter()
        .filter(|a| a.classification.is_error())
        .collect();

    let mut patterns = Vec::new();

    for phase in GamePhase::ALL {
        let members: Vec<&str> = errors
            .iter()
            .filter(|a| a.phase == phase)
            .map(|a| a.notation.as_str())
            .collect();
        push_group(&mut patterns, PatternKind::Phase(phase), &members);
    }

    let mut by_concept: BTreeMap<_, Vec<&str>> = BTreeMap::new();
    for analysis in &errors {
        for hit in &analysis.concepts {
            by_concept
                .entry(hit.concept)
                .or_default()
                .push(analysis.notation.as_str());
        }
    }
    for (concept, members) in by_concept {
        push_group(&mut patterns, PatternKind::Concept(concept), &members);
    }

    let mut by_motif: BTreeMap<_, Vec<&str>> = BTreeMap::new();
    for opportunity in missed {
        for motif in &opportunity.motifs {
            by_motif
                .entry(*motif)
                .or_default()
                .push(opportunity.missed_move.as_str());
        }
    }
    for (motif, members) in by_motif {
        push_group(&mut patterns, PatternKind::MissedMotif(motif), &members);
    }

    patterns
}

fn push_group(patterns: &mut Vec<MistakePattern>, kind: PatternKind, members: &[&str]) {
    if members.len() < MIN_PATTERN_SIZE {
        return;
    }
    let examples = members
        .iter()
        .take(MAX_EXAMPLES)
        .map(|m| m.to_string())
        .collect();
    patterns.push(MistakePattern::new(kind, members.len() as u32, examples));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Concept, ConceptHit};
    use crate::engine::Classification;
    use crate::features::extract_features;
    use crate::rules::ShakmatyRules;
    use crate::tactics::Motif;

    fn analysis(
        ply: usize,
        notation: &str,
        phase: GamePhase,
        classification: Classification,
        concepts: &[Concept],
    ) -> MoveAnalysis {
        MoveAnalysis {
            ply,
            notation: notation.to_string(),
            uci: String::new(),
            fen: String::new(),
            phase,
            evaluation: 0.0,
            best_move: None,
            eval_diff: 0.0,
            accuracy: classification.accuracy(),
            classification,
            concepts: concepts.iter().map(|&c| ConceptHit::from(c)).collect(),
            alternatives: Vec::new(),
            best_tactical_alternative: None,
            features: extract_features(&ShakmatyRules, &shakmaty::Chess::default()),
        }
    }

    fn missed(missed_move: &str, motifs: &[Motif]) -> MissedOpportunity {
        MissedOpportunity {
            ply: 0,
            fen: String::new(),
            played_move: "a3".to_string(),
            missed_move: missed_move.to_string(),
            motifs: motifs.to_vec(),
            evaluation_diff: 1.0,
        }
    }

    #[test]
    fn test_two_middlegame_king_safety_blunders() {
        let analyses = vec![
            analysis(24, "Kh1", GamePhase::Middlegame, Classification::Blunder, &[Concept::KingSafety]),
            analysis(30, "Kg2", GamePhase::Middlegame, Classification::Blunder, &[Concept::KingSafety]),
        ];
        let patterns = mine_patterns(&analyses, &[]);

        assert_eq!(patterns.len(), 2);
        assert_eq!(patterns[0].label, "frequent_middlegame_mistakes");
        assert_eq!(patterns[0].count, 2);
        assert_eq!(patterns[0].examples, vec!["Kh1", "Kg2"]);
        assert_eq!(patterns[1].label, "king_safety_mistakes");
        assert_eq!(patterns[1].kind, PatternKind::Concept(Concept::KingSafety));
        assert_eq!(patterns[1].count, 2);
    }

    #[test]
    fn test_single_mistakes_and_good_moves_make_no_pattern() {
        let analyses = vec![
            analysis(0, "e4", GamePhase::Opening, Classification::Mistake, &[Concept::CenterControl]),
            analysis(2, "d4", GamePhase::Opening, Classification::Good, &[Concept::CenterControl]),
            analysis(24, "Rd1", GamePhase::Middlegame, Classification::Inaccuracy, &[]),
        ];
        assert!(mine_patterns(&analyses, &[]).is_empty());
    }

    #[test]
    fn test_examples_capped_at_two() {
        let analyses: Vec<MoveAnalysis> = ["a3", "b3", "c3"]
            .iter()
            .enumerate()
            .map(|(i, n)| analysis(i * 2, n, GamePhase::Opening, Classification::Mistake, &[]))
            .collect();
        let patterns = mine_patterns(&analyses, &[]);

        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].count, 3);
        assert_eq!(patterns[0].examples.len(), 2);
    }

    #[test]
    fn test_missed_motifs_grouped() {
        let opportunities = vec![
            missed("Nc7+", &[Motif::Check, Motif::Fork]),
            missed("Nf7", &[Motif::Fork]),
            missed("Bb5", &[Motif::Pin]),
        ];
        let patterns = mine_patterns(&[], &opportunities);

        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].label, "missed_fork_opportunities");
        assert_eq!(patterns[0].examples, vec!["Nc7+", "Nf7"]);
    }
}
