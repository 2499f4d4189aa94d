//! # Aurora Core
//!
//! Domain types, traits, and error definitions for the Aurora persona
//! assistant. This crate has **no framework dependencies**: it defines the
//! model every other crate implements against.
//!
//! ## Design Philosophy
//!
//! The two external collaborators of the routing engine are traits here:
//! - [`Provider`]: the generation backend (`system prompt + message -> text`)
//! - [`ConversationStore`]: the durable record of exchanges
//!
//! Implementations live in `aurora-providers` and `aurora-store`, which keeps
//! the engine testable with scripted stand-ins.

pub mod error;
pub mod exchange;
pub mod message;
pub mod persona;
pub mod provider;
pub mod store;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ProviderError, Result, StoreError};
pub use exchange::{Exchange, GenerationFailure, GenerationResult};
pub use message::{Message, Role};
pub use persona::{Persona, PersonaKey};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use store::{ConversationRecord, ConversationStore, SessionSummary};
