//! Persona domain types.
//!
//! A persona is a named response style: its own system prompt plus the
//! keywords that route a message to it. Personas are created once at
//! startup and shared read-only across requests.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonaKey {
    General,
    Education,
    MentalHealth,
}

impl PersonaKey {
    /// Every key, in catalog order.
    pub const ALL: [PersonaKey; 3] = [
        PersonaKey::General,
        PersonaKey::Education,
        PersonaKey::MentalHealth,
    ];

    /// The wire form of the key (e.g. `"mental_health"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonaKey::General => "general",
            PersonaKey::Education => "education",
            PersonaKey::MentalHealth => "mental_health",
        }
    }

    /// Parse a wire key. Exact match only; unknown keys yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }
}

impl fmt::Display for PersonaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable persona definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    /// Stable identifier
    pub key: PersonaKey,

    /// Human-facing name (e.g. "Education Specialist")
    pub display_name: String,

    /// System prompt the backend receives for this persona
    pub system_prompt: String,

    /// Lowercase substrings that route a message to this persona
    pub trigger_keywords: Vec<String>,
}

impl Persona {
    pub fn new(
        key: PersonaKey,
        display_name: impl Into<String>,
        system_prompt: impl Into<String>,
        trigger_keywords: &[&str],
    ) -> Self {
        Self {
            key,
            display_name: display_name.into(),
            system_prompt: system_prompt.into(),
            trigger_keywords: trigger_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
        }
    }

    /// Whether any trigger keyword occurs in `normalized` as a substring.
    ///
    /// `normalized` must already be lowercase.
    pub fn matches(&self, normalized: &str) -> bool {
        self.trigger_keywords
            .iter()
            .any(|k| normalized.contains(k.as_str()))
    }
}
