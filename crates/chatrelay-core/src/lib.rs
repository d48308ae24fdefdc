//! Business logic and port trait definitions for chatrelay.
//!
//! This crate defines the "ports" (repository and LLM provider traits) that
//! the infrastructure layer implements, plus the message-handling service
//! that orchestrates them. It depends only on `chatrelay-types` -- never on
//! `chatrelay-infra` or any database/IO crate.

pub mod chat;
pub mod llm;

#[cfg(test)]
mod testing;
