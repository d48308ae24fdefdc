//! Observability helpers for chatrelay: subscriber setup and the GenAI
//! semantic-convention attribute names used in spans and events.

pub mod genai_attrs;
pub mod tracing_setup;
