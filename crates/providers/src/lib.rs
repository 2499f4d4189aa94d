//! Generation backend adapters for Aurora.
//!
//! All adapters implement the `aurora_core::Provider` trait.
//! [`router::build_from_config`] picks the single backend used at runtime.

pub mod openai_compat;
pub mod router;

pub use openai_compat::OpenAiCompatProvider;
pub use router::build_from_config;
