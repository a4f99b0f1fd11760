use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissionId {
    Sequences,
    Equations,
    Geometry,
    Percentages,
    Statistics,
}

impl MissionId {
    pub const ALL: [MissionId; 5] = [
        MissionId::Sequences,
        MissionId::Equations,
        MissionId::Geometry,
        MissionId::Percentages,
        MissionId::Statistics,
    ];

    /// Route segment, also the serde name.
    pub fn slug(self) -> &'static str {
        match self {
            MissionId::Sequences => "sequences",
            MissionId::Equations => "equations",
            MissionId::Geometry => "geometry",
            MissionId::Percentages => "percentages",
            MissionId::Statistics => "statistics",
        }
    }
}

impl fmt::Display for MissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} `{value}`")]
pub struct ParseSlugError {
    kind: &'static str,
    value: String,
}

impl FromStr for MissionId {
    type Err = ParseSlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MissionId::ALL
            .into_iter()
            .find(|id| id.slug() == s)
            .ok_or_else(|| ParseSlugError {
                kind: "mission",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// Colour family of the difficulty badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Green,
    Yellow,
    Red,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn slug(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            Difficulty::Easy => Tone::Green,
            Difficulty::Medium => Tone::Yellow,
            Difficulty::Hard => Tone::Red,
        }
    }

    /// How the problem generator should pitch a problem at this level.
    pub fn generator_brief(self) -> &'static str {
        match self {
            Difficulty::Easy => {
                "a single-step problem with small whole numbers, suitable for a warm-up"
            }
            Difficulty::Medium => {
                "a two or three step problem that may involve fractions or decimals"
            }
            Difficulty::Hard => {
                "a multi-step problem that combines ideas and needs careful reasoning"
            }
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Difficulty {
    type Err = ParseSlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.slug() == s)
            .ok_or_else(|| ParseSlugError {
                kind: "difficulty",
                value: s.to_string(),
            })
    }
}

/// Static summary shown on a mission card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MissionConfig {
    pub id: MissionId,
    pub title: &'static str,
    pub description: &'static str,
    pub image_url: &'static str,
    /// CSS `background` value for the hover glow, e.g. `linear-gradient(135deg, #0ea5e9, #4f46e5)`.
    pub gradient: &'static str,
    /// CSS colour of the icon tile, e.g. `#38bdf8`.
    pub color: &'static str,
    pub icon: &'static str,
}

/// A generated problem. The field names double as the JSON schema handed to the
/// generator, so they stay camelCase on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MathProblem {
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_data: Option<String>,
    pub correct_answer: f64,
    #[serde(default)]
    pub explanation_steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable_unit: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn ai(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Ai,
            text: text.into(),
        }
    }
}
