//! The persona routing and context engine: the heart of Aurora.
//!
//! A request flows through the engine as:
//!
//! 1. **Resolve** a persona: an explicit, known preference wins; otherwise
//!    the [`PersonaClassifier`] picks one by keyword priority
//! 2. **Build context** from the trailing window of the session's history
//! 3. **Generate** through the configured backend
//! 4. **Record** the exchange in the [`SessionStore`], only on success
//!
//! A missing or failing backend never surfaces as an error; the
//! [`ConversationOrchestrator`] returns a fallback result instead.

pub mod classifier;
pub mod context;
pub mod orchestrator;
pub mod registry;
pub mod session;

pub use classifier::PersonaClassifier;
pub use context::{CONTEXT_WINDOW, ContextWindowBuilder};
pub use orchestrator::{ConversationOrchestrator, FALLBACK_RESPONSE, GenerationSettings};
pub use registry::PersonaRegistry;
pub use session::{MAX_EXCHANGES, SessionStore};

#[cfg(test)]
pub(crate) mod test_helpers;
