//! Improvement suggestions derived from weaknesses

use super::types::{InsightTopic, Priority, Suggestion, SuggestionCategory, Weakness};
use crate::analysis::{Concept, GamePhase};

/// Below this many specific suggestions, every missing general topic is appended
pub const MIN_SUGGESTIONS: usize = 3;

type Rule = (fn(&InsightTopic) -> bool, SuggestionCategory);

/// First matching rule decides the category
const RULES: &[Rule] = &[
    (is_opening, SuggestionCategory::Opening),
    (is_middlegame, SuggestionCategory::Middlegame),
    (is_endgame, SuggestionCategory::Endgame),
    (is_tactical, SuggestionCategory::Tactical),
    (is_motif, SuggestionCategory::SpecificMotif),
    (is_pawn, SuggestionCategory::Pawn),
    (is_king, SuggestionCategory::King),
    (is_piece, SuggestionCategory::Piece),
];

fn is_opening(topic: &InsightTopic) -> bool {
    phase_of(topic) == Some(GamePhase::Opening)
}

fn is_middlegame(topic: &InsightTopic) -> bool {
    phase_of(topic) == Some(GamePhase::Middlegame)
}

fn is_endgame(topic: &InsightTopic) -> bool {
    phase_of(topic) == Some(GamePhase::Endgame)
}

fn is_tactical(topic: &InsightTopic) -> bool {
    matches!(topic, InsightTopic::TacticalAwareness)
}

fn is_motif(topic: &InsightTopic) -> bool {
    matches!(
        topic,
        InsightTopic::Concept(Concept::Fork | Concept::HighValueFork | Concept::Pin)
    )
}

fn is_pawn(topic: &InsightTopic) -> bool {
    matches!(topic, InsightTopic::Concept(Concept::PawnPromotion))
}

fn is_king(topic: &InsightTopic) -> bool {
    matches!(
        topic,
        InsightTopic::Concept(Concept::KingSafety | Concept::KingActivity)
    )
}

fn is_piece(topic: &InsightTopic) -> bool {
    matches!(topic, InsightTopic::Concept(Concept::PieceActivity))
}

const GENERAL: [InsightTopic; 3] = [
    InsightTopic::Calculation,
    InsightTopic::PatternRecognition,
    InsightTopic::GameAnalysis,
];

fn phase_of(topic: &InsightTopic) -> Option<GamePhase> {
    match topic {
        InsightTopic::PhasePlay(phase) | InsightTopic::PhaseMistakes(phase) => Some(*phase),
        _ => None,
    }
}

pub fn categorize(topic: &InsightTopic) -> SuggestionCategory {
    RULES
        .iter()
        .find(|(matches, _)| matches(topic))
        .map(|(_, category)| *category)
        .unwrap_or(SuggestionCategory::Default)
}

/// One suggestion per weakness, in order. Short lists get all general advice
/// not already covered.
pub fn suggest(weaknesses: &[Weakness]) -> Vec<Suggestion> {
    let mut suggestions: Vec<Suggestion> = weaknesses
        .iter()
        .map(|weakness| {
            let category = categorize(&weakness.topic);
            let (description, exercises) = advice(category, &weakness.topic);
            Suggestion {
                topic: weakness.topic,
                category,
                priority: Priority::from_severity(weakness.severity),
                description,
                exercises,
            }
        })
        .collect();

    if suggestions.len() >= MIN_SUGGESTIONS {
        return suggestions;
    }

    for topic in GENERAL {
        if suggestions.iter().any(|s| s.topic == topic) {
            continue;
        }
        let (description, exercises) = advice(SuggestionCategory::General, &topic);
        suggestions.push(Suggestion {
            topic,
            category: SuggestionCategory::General,
            priority: Priority::Medium,
            description,
            exercises,
        });
    }

    suggestions
}

fn advice(category: SuggestionCategory, topic: &InsightTopic) -> (String, Vec<String>) {
    let (description, exercises): (String, [&str; 2]) = match category {
        SuggestionCategory::Opening => (
            "Study opening principles and common opening lines".into(),
            ["Opening repertoire development", "Opening principles practice"],
        ),
        SuggestionCategory::Middlegame => (
            "Focus on middlegame planning and piece coordination".into(),
            ["Positional understanding exercises", "Strategic planning practice"],
        ),
        SuggestionCategory::Endgame => (
            "Study essential endgame techniques and principles".into(),
            ["Basic endgame positions", "Endgame technique drills"],
        ),
        SuggestionCategory::Tactical => (
            "Improve tactical awareness through regular puzzle solving".into(),
            ["Tactical pattern recognition", "Calculation exercises"],
        ),
        SuggestionCategory::SpecificMotif => {
            let name = humanize(topic);
            return (
                format!("Practice recognizing and creating {} opportunities", name),
                vec![format!("{} puzzles", capitalize(&name)), "Tactical motif drills".into()],
            );
        }
        SuggestionCategory::Pawn => (
            "Study pawn structure principles and common patterns".into(),
            ["Pawn structure analysis", "Pawn break exercises"],
        ),
        SuggestionCategory::King => (
            "Focus on king safety and king activity in appropriate phases".into(),
            ["King safety evaluation", "King activation in endgames"],
        ),
        SuggestionCategory::Piece => (
            "Work on piece coordination and activity".into(),
            ["Piece coordination exercises", "Minor piece optimization"],
        ),
        SuggestionCategory::Default => (
            format!("Practice {} through targeted exercises", humanize(topic)),
            ["Focused drills", "Position analysis"],
        ),
        SuggestionCategory::General => match topic {
            InsightTopic::Calculation => (
                "Improve calculation skills through regular practice".into(),
                ["Calculation training", "Visualization exercises"],
            ),
            InsightTopic::PatternRecognition => (
                "Develop pattern recognition through consistent study".into(),
                ["Common pattern drills", "Position comparison exercises"],
            ),
            _ => (
                "Regularly analyze your games to identify improvement areas".into(),
                ["Self-analysis routine", "Computer-assisted analysis"],
            ),
        },
    };
    (description, exercises.iter().map(|e| e.to_string()).collect())
}

fn humanize(topic: &InsightTopic) -> String {
    topic.key().replace('_', " ")
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
