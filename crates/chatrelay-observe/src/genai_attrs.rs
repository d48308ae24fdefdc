//! OpenTelemetry GenAI semantic-convention attribute names.
//!
//! Usable as constant field names in `tracing` macros:
//! `info!({ GEN_AI_REQUEST_MODEL } = %model, "...")`.

/// The name of the GenAI provider (e.g., "groq").
pub const GEN_AI_PROVIDER_NAME: &str = "gen_ai.provider.name";

/// The model ID requested (e.g., "llama-3.1-8b-instant").
pub const GEN_AI_REQUEST_MODEL: &str = "gen_ai.request.model";

/// The maximum number of output tokens requested.
pub const GEN_AI_REQUEST_MAX_TOKENS: &str = "gen_ai.request.max_tokens";
