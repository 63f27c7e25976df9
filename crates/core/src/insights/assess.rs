//! Strength and weakness classification

use serde::{Deserialize, Serialize};

use super::types::{InsightTopic, Strength, Weakness};
use crate::analysis::{Concept, MissedOpportunity, PhaseBreakdown};
use crate::patterns::{MistakePattern, PatternKind};

pub const STRENGTH_ACCURACY: f64 = 75.0;
pub const WEAKNESS_ACCURACY: f64 = 60.0;
pub const STRENGTH_CONFIDENCE: f64 = 0.7;
pub const MIN_CONCEPT_OCCURRENCES: u32 = 2;
/// Pattern size at which severity saturates
const SEVERITY_SCALE: f64 = 5.0;
const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub strengths: Vec<Strength>,
    pub weaknesses: Vec<Weakness>,
}

pub fn assess(
    phases: &PhaseBreakdown,
    patterns: &[MistakePattern],
    missed: &[MissedOpportunity],
) -> Assessment {
    let mut assessment = Assessment::default();

    for (phase, aggregate) in phases.iter() {
        let Some(accuracy) = aggregate.average_accuracy() else {
            continue;
        };

        if accuracy >= STRENGTH_ACCURACY {
            assessment.strengths.push(Strength {
                topic: InsightTopic::PhasePlay(phase),
                confidence: (accuracy / 100.0).min(1.0),
                occurrences: aggregate.move_count,
                accuracy: Some(accuracy),
                example: None,
            });
        } else if accuracy <= WEAKNESS_ACCURACY {
            assessment.weaknesses.push(Weakness {
                topic: InsightTopic::PhasePlay(phase),
                severity: ((100.0 - accuracy) / 100.0).min(1.0),
                occurrences: aggregate.move_count,
                accuracy: Some(accuracy),
                example: None,
            });
        }
    }

    for (concept, tally) in phases.concept_totals() {
        let confidence = tally.average_confidence();
        if tally.count >= MIN_CONCEPT_OCCURRENCES && confidence + EPSILON >= STRENGTH_CONFIDENCE {
            assessment.strengths.push(Strength {
                topic: InsightTopic::Concept(concept),
                confidence,
                occurrences: tally.count,
                accuracy: None,
                example: None,
            });
        }
    }

    for pattern in patterns {
        let topic = match pattern.kind {
            PatternKind::Phase(phase) => InsightTopic::PhaseMistakes(phase),
            PatternKind::Concept(concept) => InsightTopic::Concept(concept),
            PatternKind::MissedMotif(motif) => InsightTopic::Concept(Concept::from(motif)),
        };
        assessment.weaknesses.push(Weakness {
            topic,
            severity: scaled(pattern.count as usize),
            occurrences: pattern.count,
            accuracy: None,
            example: pattern.examples.first().cloned(),
        });
    }

    if !missed.is_empty() {
        assessment.weaknesses.push(Weakness {
            topic: InsightTopic::TacticalAwareness,
            severity: scaled(missed.len()),
            occurrences: missed.len() as u32,
            accuracy: None,
            example: missed.first().map(|m| m.missed_move.clone()),
        });
    }

    assessment
}

fn scaled(count: usize) -> f64 {
    (count as f64 / SEVERITY_SCALE).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{ConceptTally, GamePhase, PhaseAggregate};
    use crate::tactics::Motif;

    fn aggregate(move_count: u32, accuracy_sum: f64) -> PhaseAggregate {
        PhaseAggregate {
            move_count,
            accuracy_sum,
            ..PhaseAggregate::default()
        }
    }

    #[test]
    fn test_phase_accuracy_thresholds() {
        let phases = PhaseBreakdown {
            opening: aggregate(4, 340.0),
            middlegame: aggregate(2, 120.0),
            endgame: aggregate(2, 140.0),
        };
        let assessment = assess(&phases, &[], &[]);

        assert_eq!(assessment.strengths.len(), 1);
        assert_eq!(
            assessment.strengths[0].topic,
            InsightTopic::PhasePlay(GamePhase::Opening)
        );
        assert_eq!(assessment.strengths[0].confidence, 0.85);

        // 70% endgame is neither
        assert_eq!(assessment.weaknesses.len(), 1);
        assert_eq!(
            assessment.weaknesses[0].topic,
            InsightTopic::PhasePlay(GamePhase::Middlegame)
        );
        assert_eq!(assessment.weaknesses[0].severity, 0.4);
    }

    #[test]
    fn test_empty_phases_are_ignored() {
        let assessment = assess(&PhaseBreakdown::default(), &[], &[]);
        assert!(assessment.strengths.is_empty());
        assert!(assessment.weaknesses.is_empty());
    }

    #[test]
    fn test_concept_strength_across_phases() {
        let mut phases = PhaseBreakdown::default();
        for aggregate in [&mut phases.opening, &mut phases.middlegame, &mut phases.endgame] {
            aggregate.concepts.insert(
                Concept::CenterControl,
                ConceptTally {
                    count: 1,
                    confidence_sum: 0.7,
                },
            );
        }
        phases.opening.concepts.insert(
            Concept::LosingCapture,
            ConceptTally {
                count: 3,
                confidence_sum: 1.5,
            },
        );

        let assessment = assess(&phases, &[], &[]);
        let topics: Vec<InsightTopic> = assessment.strengths.iter().map(|s| s.topic).collect();
        assert_eq!(topics, vec![InsightTopic::Concept(Concept::CenterControl)]);
        assert_eq!(assessment.strengths[0].occurrences, 3);
    }

    #[test]
    fn test_patterns_and_missed_tactics_become_weaknesses() {
        let patterns = vec![
            MistakePattern::new(
                PatternKind::Phase(GamePhase::Middlegame),
                2,
                vec!["Kh1".into(), "Kg2".into()],
            ),
            MistakePattern::new(PatternKind::MissedMotif(Motif::Fork), 6, vec!["Nc7".into()]),
        ];
        let missed = vec![MissedOpportunity {
            ply: 10,
            fen: String::new(),
            played_move: "h3".into(),
            missed_move: "Nc7".into(),
            motifs: vec![Motif::Fork],
            evaluation_diff: 3.0,
        }];

        let assessment = assess(&PhaseBreakdown::default(), &patterns, &missed);
        let weaknesses = &assessment.weaknesses;
        assert_eq!(weaknesses.len(), 3);

        assert_eq!(weaknesses[0].topic, InsightTopic::PhaseMistakes(GamePhase::Middlegame));
        assert_eq!(weaknesses[0].severity, 0.4);
        assert_eq!(weaknesses[0].example.as_deref(), Some("Kh1"));

        assert_eq!(weaknesses[1].topic, InsightTopic::Concept(Concept::Fork));
        assert_eq!(weaknesses[1].severity, 1.0);

        assert_eq!(weaknesses[2].topic, InsightTopic::TacticalAwareness);
        assert_eq!(weaknesses[2].severity, 0.2);
    }
}
