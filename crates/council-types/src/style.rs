//! Session inputs that steer the analysis: cognitive style and reflection focus

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::validation::ValidationError;

/// The sixteen four-letter cognitive style codes
pub const COGNITIVE_STYLES: [&str; 16] = [
    "INTJ", "INTP", "ENTJ", "ENTP", "INFJ", "INFP", "ENFJ", "ENFP", "ISTJ", "ISFJ", "ESTJ",
    "ESFJ", "ISTP", "ISFP", "ESTP", "ESFP",
];

/// A validated cognitive style code, always stored upper-case
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CognitiveStyle(String);

impl CognitiveStyle {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for CognitiveStyle {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        if COGNITIVE_STYLES.contains(&code.as_str()) {
            Ok(Self(code))
        } else {
            Err(ValidationError::new(
                "cognitiveStyle",
                format!("unknown cognitive style '{}'", s.trim()),
            ))
        }
    }
}

impl TryFrom<String> for CognitiveStyle {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CognitiveStyle> for String {
    fn from(style: CognitiveStyle) -> Self {
        style.0
    }
}

impl fmt::Display for CognitiveStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The lens the council is asked to reflect through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReflectionFocus {
    #[default]
    #[serde(rename = "Decision-Making")]
    DecisionMaking,
    #[serde(rename = "Self-Understanding")]
    SelfUnderstanding,
    #[serde(rename = "Relationships")]
    Relationships,
}

impl ReflectionFocus {
    pub const ALL: [ReflectionFocus; 3] = [
        ReflectionFocus::DecisionMaking,
        ReflectionFocus::SelfUnderstanding,
        ReflectionFocus::Relationships,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ReflectionFocus::DecisionMaking => "Decision-Making",
            ReflectionFocus::SelfUnderstanding => "Self-Understanding",
            ReflectionFocus::Relationships => "Relationships",
        }
    }
}

impl FromStr for ReflectionFocus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|focus| {
                focus
                    .label()
                    .chars()
                    .filter(|c| c.is_ascii_alphanumeric())
                    .collect::<String>()
                    .to_ascii_lowercase()
                    == wanted
            })
            .ok_or_else(|| {
                ValidationError::new("reflectionFocus", format!("unknown focus '{}'", s.trim()))
            })
    }
}

impl fmt::Display for ReflectionFocus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
