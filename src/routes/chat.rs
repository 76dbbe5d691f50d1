//! Chat widget relay
//!
//! Stateless per message: one free-text message in, one reply out. Chat
//! must always produce some reply, so upstream failures degrade to a
//! fixed fallback string instead of an error status.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use std::sync::Arc;

use crate::app::AppState;
use crate::domain::chat::{ChatRequest, ChatResponse};
use crate::services::ai::FALLBACK_REPLY;

/// POST /chat
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> (StatusCode, Json<ChatResponse>) {
    let message = req.message.trim();

    // Blank input is checked client-side before dispatch; reject it here
    // too, but keep the contract that the body always carries a reply.
    if message.is_empty() {
        tracing::warn!("Empty chat message rejected");
        return (
            StatusCode::BAD_REQUEST,
            Json(ChatResponse {
                reply: FALLBACK_REPLY.to_string(),
                timestamp: Utc::now(),
            }),
        );
    }

    let reply = match state
        .ai
        .chat_reply(message, &state.catalog, &state.rules)
        .await
    {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!(error = %e, "Chat relay failed, returning fallback");
            FALLBACK_REPLY.to_string()
        }
    };

    (
        StatusCode::OK,
        Json(ChatResponse {
            reply,
            timestamp: Utc::now(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::testing;

    #[tokio::test]
    async fn blank_message_is_rejected_without_dispatch() {
        let (status, Json(response)) = chat(
            State(testing::state()),
            Json(ChatRequest {
                message: "   ".to_string(),
            }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response.reply, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn failed_relay_returns_fallback_with_ok_status() {
        // Test state points at an unroutable endpoint, so the relay fails.
        let (status, Json(response)) = chat(
            State(testing::state()),
            Json(ChatRequest {
                message: "How much is a 2x1 banner?".to_string(),
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(response.reply, FALLBACK_REPLY);
    }
}
