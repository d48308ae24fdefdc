//! LLM provider abstractions for chatrelay.
//!
//! - `LlmProvider`: RPITIT trait for concrete provider implementations
//! - `BoxLlmProvider`: Object-safe wrapper for runtime provider selection
//! - `ReplyGenerator`: turns conversation history into a reply, never failing

pub mod box_provider;
pub mod provider;
pub mod reply;
