//! Chat endpoint.
//!
//! The body is taken as raw JSON so that malformed input and wrongly typed
//! fields produce the relay's own 400 body instead of axum's rejection text.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde_json::Value;

use chatrelay_types::chat::ChatReply;

use crate::http::error::AppError;
use crate::state::AppState;

/// 400 body for a missing, non-string or unparseable `message`.
pub const INVALID_MESSAGE_ERROR: &str = "Invalid message";

/// 400 body for a `sessionId` that is present but not a string.
pub const INVALID_SESSION_ERROR: &str = "Invalid sessionId";

/// POST /chat/message
///
/// Body: `{ "message": string, "sessionId"?: string }`.
/// Returns `{ "reply": string, "sessionId": string }`.
pub async fn send_message(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ChatReply>, AppError> {
    let Json(body) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected chat request body");
        AppError::Validation(INVALID_MESSAGE_ERROR.to_string())
    })?;

    let (message, session_id) = parse_request(&body)?;

    let reply = state.chat_service.handle(message, session_id).await?;

    Ok(Json(reply))
}

fn parse_request(body: &Value) -> Result<(&str, Option<String>), AppError> {
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::Validation(INVALID_MESSAGE_ERROR.to_string()))?;

    // Null behaves like an absent field; an empty string is an opaque id.
    let session_id = match body.get("sessionId") {
        None | Some(Value::Null) => None,
        Some(Value::String(id)) => Some(id.clone()),
        Some(_) => return Err(AppError::Validation(INVALID_SESSION_ERROR.to_string())),
    };

    Ok((message, session_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validation_message(result: Result<(&str, Option<String>), AppError>) -> String {
        match result {
            Err(AppError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn parses_message_and_session() {
        let body = json!({ "message": "Hi", "sessionId": "abc" });
        let (message, session) = parse_request(&body).unwrap();
        assert_eq!(message, "Hi");
        assert_eq!(session.as_deref(), Some("abc"));
    }

    #[test]
    fn null_session_is_absent() {
        let body = json!({ "message": "Hi", "sessionId": null });
        let (_, session) = parse_request(&body).unwrap();
        assert!(session.is_none());
    }

    #[test]
    fn empty_session_is_kept() {
        let body = json!({ "message": "Hi", "sessionId": "" });
        let (_, session) = parse_request(&body).unwrap();
        assert_eq!(session.as_deref(), Some(""));
    }

    #[test]
    fn non_string_message_is_invalid() {
        for body in [
            json!({}),
            json!({ "message": 42 }),
            json!({ "message": null }),
            json!({ "message": ["Hi"] }),
            json!("Hi"),
        ] {
            assert_eq!(validation_message(parse_request(&body)), INVALID_MESSAGE_ERROR);
        }
    }

    #[test]
    fn non_string_session_is_invalid() {
        let body = json!({ "message": "Hi", "sessionId": 7 });
        assert_eq!(validation_message(parse_request(&body)), INVALID_SESSION_ERROR);
    }
}
