use anyhow::Error;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

pub const DOMAIN_COUNT: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    RelationalAnchoring,
    EmotionalRealityValidation,
    NarrativeIntegration,
    CollaborativeAgencyFraming,
    ValueEmbeddedMotivation,
    CognitiveEffortReduction,
    TemporalEmotionalFraming,
    EmpathicLeadershipPositioning,
    AffectiveModalityMatching,
}

#[derive(Debug, Clone)]
pub struct DomainMetadata {
    pub name: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

impl Domain {
    pub fn all() -> [Domain; DOMAIN_COUNT] {
        [
            Domain::RelationalAnchoring,
            Domain::EmotionalRealityValidation,
            Domain::NarrativeIntegration,
            Domain::CollaborativeAgencyFraming,
            Domain::ValueEmbeddedMotivation,
            Domain::CognitiveEffortReduction,
            Domain::TemporalEmotionalFraming,
            Domain::EmpathicLeadershipPositioning,
            Domain::AffectiveModalityMatching,
        ]
    }

    pub fn metadata(self) -> DomainMetadata {
        match self {
            Domain::RelationalAnchoring => DomainMetadata {
                name: "relational_anchoring",
                label: "Relational Anchoring",
                description: "how directly the message speaks to the reader's role and relationships",
            },
            Domain::EmotionalRealityValidation => DomainMetadata {
                name: "emotional_reality_validation",
                label: "Emotional Reality Validation",
                description: "whether the reader's lived emotional state is acknowledged before any ask",
            },
            Domain::NarrativeIntegration => DomainMetadata {
                name: "narrative_integration",
                label: "Narrative Integration",
                description: "how well the message fits a story the reader already tells about themselves",
            },
            Domain::CollaborativeAgencyFraming => DomainMetadata {
                name: "collaborative_agency_framing",
                label: "Collaborative Agency Framing",
                description: "whether action is framed as something done with the reader, not to them",
            },
            Domain::ValueEmbeddedMotivation => DomainMetadata {
                name: "value_embedded_motivation",
                label: "Value-Embedded Motivation",
                description: "how tightly the call to action is tied to values the persona holds",
            },
            Domain::CognitiveEffortReduction => DomainMetadata {
                name: "cognitive_effort_reduction",
                label: "Cognitive Effort Reduction",
                description: "how little work the reader must do to understand and act",
            },
            Domain::TemporalEmotionalFraming => DomainMetadata {
                name: "temporal_emotional_framing",
                label: "Temporal Emotional Framing",
                description: "whether timing language matches the reader's emotional horizon",
            },
            Domain::EmpathicLeadershipPositioning => DomainMetadata {
                name: "empathic_leadership_positioning",
                label: "Empathic Leadership Positioning",
                description: "whether the sender leads with empathy rather than authority",
            },
            Domain::AffectiveModalityMatching => DomainMetadata {
                name: "affective_modality_matching",
                label: "Affective Modality Matching",
                description: "whether the emotional register matches the requested tone",
            },
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.metadata().label)
    }
}

impl FromStr for Domain {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Domain::all()
            .into_iter()
            .find(|domain| {
                let meta = domain.metadata();
                meta.name.eq_ignore_ascii_case(needle) || meta.label.eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| anyhow::anyhow!("domaine inconnu: {}", s))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomainScoreSet {
    entries: Vec<(String, f64)>,
}

impl DomainScoreSet {
    pub fn from_entries(entries: Vec<(String, f64)>) -> Self {
        Self { entries }
    }

    pub fn from_json_object(object: &Map<String, Value>) -> Option<Self> {
        let mut entries = Vec::with_capacity(object.len());
        for (label, value) in object {
            entries.push((label.clone(), value.as_f64()?));
        }
        Some(Self { entries })
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(entry_label, _)| entry_label == label)
            .map(|(_, score)| *score)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries
            .iter()
            .map(|(label, score)| (label.as_str(), *score))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // Divisor is the fixed rubric size, never the number of entries actually
    // returned: a partial reply lowers the aggregate instead of hiding gaps.
    pub fn aggregate(&self) -> f64 {
        let sum: f64 = self.entries.iter().map(|(_, score)| score).sum();
        sum / DOMAIN_COUNT as f64
    }
}

impl Serialize for DomainScoreSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, score) in &self.entries {
            map.serialize_entry(label, score)?;
        }
        map.end()
    }
}
