//! Chat reply endpoint
//!
//! `POST /api/chat` with `{ "message": "..." }`. The body is read raw so that
//! malformed JSON, a missing field and a non-string field all end up as the
//! same 400 instead of axum's extractor rejections.

use axum::{body::Bytes, extract::State, Json};
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub ts: i64,
}

pub async fn chat(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ChatResponse>, ApiError> {
    let message = extract_message(&body).ok_or(ApiError::MessageRequired)?;
    let reply = state.matcher.reply_for(&message).to_string();
    tracing::debug!(chars = message.chars().count(), "Answered chat message");

    Ok(Json(ChatResponse {
        reply,
        ts: state.clock.now_millis(),
    }))
}

/// Non-empty string `message` field of a JSON object body
fn extract_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    match value.get("message")? {
        Value::String(message) if !message.is_empty() => Some(message.clone()),
        _ => None,
    }
}
