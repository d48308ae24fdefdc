//! Infrastructure layer for chatrelay.
//!
//! Concrete implementations of the ports defined in `chatrelay-core`:
//! SQLite persistence, the OpenAI-compatible completion client and
//! configuration loading.

pub mod config;
pub mod llm;
pub mod sqlite;
