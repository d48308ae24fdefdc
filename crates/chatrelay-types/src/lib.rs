//! Shared domain types for chatrelay.
//!
//! Conversations, messages, LLM request/response shapes, relay configuration
//! and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
