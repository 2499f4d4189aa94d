//! Rule-based persona classification.
//!
//! The message is lowercased and each persona's keywords are tested as
//! plain substrings (`"teach"` matches inside `"teacher"`). Personas are
//! tried in [`PRIORITY`] order and the first match wins; there is no
//! scoring. A message that matches nothing, including an empty one, is
//! routed to `general`.

use std::sync::Arc;

use aurora_core::persona::PersonaKey;
use tracing::debug;

use crate::registry::PersonaRegistry;

/// Classification order. Safety-sensitive content goes first, so a message
/// matching both sets always resolves to `mental_health`.
pub const PRIORITY: [PersonaKey; 2] = [PersonaKey::MentalHealth, PersonaKey::Education];

/// The persona a message falls back to when nothing in [`PRIORITY`] matches.
pub const DEFAULT_PERSONA: PersonaKey = PersonaKey::General;

/// Maps a raw message to a persona key.
#[derive(Debug, Clone)]
pub struct PersonaClassifier {
    registry: Arc<PersonaRegistry>,
}

impl PersonaClassifier {
    pub fn new(registry: Arc<PersonaRegistry>) -> Self {
        Self { registry }
    }

    /// Classify a message.
    pub fn classify(&self, message: &str) -> PersonaKey {
        let normalized = message.to_lowercase();

        let key = PRIORITY
            .into_iter()
            .find(|key| self.registry.persona(*key).matches(&normalized))
            .unwrap_or(DEFAULT_PERSONA);

        debug!(persona = %key, "Classified message");
        key
    }
}
