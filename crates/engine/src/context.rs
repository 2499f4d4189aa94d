//! Renders the trailing window of a session's history into prompt text.

use std::fmt::Write;

use aurora_core::exchange::Exchange;

/// Number of trailing exchanges surfaced per backend call.
///
/// Independent of [`crate::session::MAX_EXCHANGES`], which bounds what is
/// kept rather than what is shown.
pub const CONTEXT_WINDOW: usize = 3;

const HEADER: &str = "Previous conversation context:\n";

/// Builds the context block appended to a persona's system prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextWindowBuilder;

impl ContextWindowBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Render the last [`CONTEXT_WINDOW`] exchanges, oldest first.
    ///
    /// An empty history renders as an empty string, header included.
    pub fn build(&self, history: &[Exchange]) -> String {
        if history.is_empty() {
            return String::new();
        }

        let start = history.len().saturating_sub(CONTEXT_WINDOW);
        let mut context = String::from(HEADER);
        for exchange in &history[start..] {
            let _ = writeln!(context, "User: {}", exchange.user_message);
            let _ = writeln!(context, "Aurora: {}", exchange.response);
        }
        context
    }

    /// Effective system prompt: the persona template, a blank line, then the
    /// context block (which may be empty).
    pub fn compose(&self, template: &str, history: &[Exchange]) -> String {
        format!("{template}\n\n{}", self.build(history))
    }
}
