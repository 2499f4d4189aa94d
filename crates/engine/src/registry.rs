//! Persona catalog.
//!
//! Exactly three personas exist, created once and never mutated. Lookup
//! misses are the caller's concern; the orchestrator falls back to
//! classification, which always lands on a known key.

use aurora_core::persona::{Persona, PersonaKey};

const GENERAL_PROMPT: &str = "You are Aurora, a helpful and friendly AI assistant. You provide clear, informative responses to general questions and engage in natural conversation. Keep responses conversational but informative, as if speaking to a friend. Be warm, empathetic, and helpful.";

const EDUCATION_PROMPT: &str = "You are Aurora's Education Specialist persona. You help with learning, studying, academic questions, homework, explanations of concepts, and educational guidance. You're encouraging, patient, and adapt your explanations to different learning levels. Use examples and analogies to make complex topics easier to understand.";

const MENTAL_HEALTH_PROMPT: &str = "You are Aurora's Mental Health Support persona. You provide compassionate, supportive responses for emotional well-being, stress management, and mental health topics. You're empathetic, non-judgmental, and encourage professional help when appropriate. Focus on active listening, validation, and helpful coping strategies. Always remind users to seek professional help for serious mental health concerns.";

const GENERAL_KEYWORDS: &[&str] = &[
    "hello", "hi", "help", "what", "how", "tell me", "explain", "general", "question",
];

const EDUCATION_KEYWORDS: &[&str] = &[
    "study", "learn", "school", "homework", "math", "science", "history", "explain", "teach",
    "education", "academic", "university", "college", "lesson",
];

const MENTAL_HEALTH_KEYWORDS: &[&str] = &[
    "stress", "anxiety", "depression", "mental", "emotional", "feeling", "mood", "therapy",
    "counseling", "support", "wellness", "cope", "overwhelmed", "sad", "worried",
];

/// Read-only catalog of the available personas.
#[derive(Debug, Clone)]
pub struct PersonaRegistry {
    personas: [Persona; 3],
}

impl PersonaRegistry {
    /// The standard catalog: general, education, mental_health.
    pub fn new() -> Self {
        Self {
            personas: [
                Persona::new(
                    PersonaKey::General,
                    "General Assistant",
                    GENERAL_PROMPT,
                    GENERAL_KEYWORDS,
                ),
                Persona::new(
                    PersonaKey::Education,
                    "Education Specialist",
                    EDUCATION_PROMPT,
                    EDUCATION_KEYWORDS,
                ),
                Persona::new(
                    PersonaKey::MentalHealth,
                    "Mental Health Support",
                    MENTAL_HEALTH_PROMPT,
                    MENTAL_HEALTH_KEYWORDS,
                ),
            ],
        }
    }

    /// Look up a persona by its wire key. Unknown keys yield `None`.
    pub fn get(&self, key: &str) -> Option<&Persona> {
        PersonaKey::parse(key).map(|k| self.persona(k))
    }

    /// The persona for a typed key. Every key has an entry.
    pub fn persona(&self, key: PersonaKey) -> &Persona {
        let index = match key {
            PersonaKey::General => 0,
            PersonaKey::Education => 1,
            PersonaKey::MentalHealth => 2,
        };
        &self.personas[index]
    }

    /// All personas in catalog order.
    pub fn all(&self) -> &[Persona] {
        &self.personas
    }
}

impl Default for PersonaRegistry {
    fn default() -> Self {
        Self::new()
    }
}
