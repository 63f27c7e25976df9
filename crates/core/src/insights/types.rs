use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analysis::{Concept, GamePhase};

/// Subject of a strength, weakness or suggestion. Serialized as its key,
/// e.g. `"middlegame_play"` or `"king_safety"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum InsightTopic {
    /// Overall play in a phase
    PhasePlay(GamePhase),
    /// Recurring mistakes in a phase
    PhaseMistakes(GamePhase),
    Concept(Concept),
    TacticalAwareness,
    Calculation,
    PatternRecognition,
    GameAnalysis,
}

impl InsightTopic {
    pub fn key(&self) -> String {
        match self {
            InsightTopic::PhasePlay(phase) => format!("{}_play", phase),
            InsightTopic::PhaseMistakes(phase) => format!("frequent_{}", phase),
            InsightTopic::Concept(concept) => concept.as_str().to_string(),
            InsightTopic::TacticalAwareness => "tactical_awareness".to_string(),
            InsightTopic::Calculation => "calculation".to_string(),
            InsightTopic::PatternRecognition => "pattern_recognition".to_string(),
            InsightTopic::GameAnalysis => "game_analysis".to_string(),
        }
    }
}

impl fmt::Display for InsightTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl From<InsightTopic> for String {
    fn from(topic: InsightTopic) -> Self {
        topic.key()
    }
}

impl TryFrom<String> for InsightTopic {
    type Error = String;

    fn try_from(key: String) -> Result<Self, Self::Error> {
        match key.as_str() {
            "tactical_awareness" => return Ok(InsightTopic::TacticalAwareness),
            "calculation" => return Ok(InsightTopic::Calculation),
            "pattern_recognition" => return Ok(InsightTopic::PatternRecognition),
            "game_analysis" => return Ok(InsightTopic::GameAnalysis),
            _ => {}
        }

        for phase in GamePhase::ALL {
            if key == format!("{}_play", phase) {
                return Ok(InsightTopic::PhasePlay(phase));
            }
            if key == format!("frequent_{}", phase) {
                return Ok(InsightTopic::PhaseMistakes(phase));
            }
        }

        key.parse::<Concept>()
            .map(InsightTopic::Concept)
            .map_err(|_| format!("unknown insight topic: {}", key))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strength {
    pub topic: InsightTopic,
    /// 0.0 - 1.0
    pub confidence: f64,
    pub occurrences: u32,
    /// Phase accuracy, for phase topics
    pub accuracy: Option<f64>,
    pub example: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weakness {
    pub topic: InsightTopic,
    /// 0.0 - 1.0
    pub severity: f64,
    pub occurrences: u32,
    pub accuracy: Option<f64>,
    pub example: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn from_severity(severity: f64) -> Self {
        if severity >= 0.7 {
            Priority::High
        } else if severity >= 0.4 {
            Priority::Medium
        } else {
            Priority::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionCategory {
    Opening,
    Middlegame,
    Endgame,
    Tactical,
    SpecificMotif,
    Pawn,
    King,
    Piece,
    Default,
    /// Standing advice added when few specific suggestions exist
    General,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub topic: InsightTopic,
    pub category: SuggestionCategory,
    pub priority: Priority,
    pub description: String,
    pub exercises: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_keys_round_trip() {
        let topics = [
            InsightTopic::PhasePlay(GamePhase::Middlegame),
            InsightTopic::PhaseMistakes(GamePhase::Endgame),
            InsightTopic::Concept(Concept::KingSafety),
            InsightTopic::TacticalAwareness,
            InsightTopic::GameAnalysis,
        ];
        for topic in topics {
            assert_eq!(InsightTopic::try_from(topic.key()), Ok(topic));
        }
        assert_eq!(InsightTopic::PhasePlay(GamePhase::Middlegame).key(), "middlegame_play");
        assert_eq!(InsightTopic::PhaseMistakes(GamePhase::Opening).key(), "frequent_opening");
        assert!(InsightTopic::try_from("tempo".to_string()).is_err());
    }

    #[test]
    fn test_topic_serializes_as_key() {
        let json = serde_json::to_string(&InsightTopic::Concept(Concept::HighValueFork)).unwrap();
        assert_eq!(json, "\"high_value_fork\"");
        let back: InsightTopic = serde_json::from_str(&json).unwrap();
        assert_eq!(back, InsightTopic::Concept(Concept::HighValueFork));
    }

    #[test]
    fn test_priority_thresholds() {
        assert_eq!(Priority::from_severity(0.8), Priority::High);
        assert_eq!(Priority::from_severity(0.7), Priority::High);
        assert_eq!(Priority::from_severity(0.4), Priority::Medium);
        assert_eq!(Priority::from_severity(0.2), Priority::Low);
    }
}
