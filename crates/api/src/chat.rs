//! Chat API module for the Parley HTTP API.
//!
//! Covers the chat lifecycle the front end drives: switching and erasing
//! chats, sending the composed draft, and the two polling endpoints
//! (`/status` to check for new inbound traffic, `/history` to fetch the
//! message list when a repaint is due).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use parley_core::{wire::ChatDocument, ChatProperties, Message};

use crate::session::with_session;
use crate::ApiError;

/// Chat API router.
pub fn router() -> Router {
    Router::new()
        .route("/open", post(open_chat))
        .route("/erase", post(erase_chat))
        .route("/messages", post(send_message))
        .route("/history", get(history))
        .route("/status", get(status))
        .route("/document", get(document))
}

// ==================== Request/Response Types ====================

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenChatRequest {
    pub chat_id: String,
    #[serde(default)]
    pub user_id: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatView {
    pub id: String,
    pub name: String,
    pub author: String,
    pub message_count: usize,
    pub properties: ChatProperties,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub message: Message,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub messages: Vec<Message>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: String,
    pub new_messages: usize,
}

// ==================== Handlers ====================

#[instrument(skip_all, fields(chat = %req.chat_id))]
async fn open_chat(Json(req): Json<OpenChatRequest>) -> Result<Json<ChatView>, ApiError> {
    with_session(|session| {
        session.open(&req.chat_id, &req.user_id)?;
        let chat = session.require_chat()?;
        Ok(Json(ChatView {
            id: chat.id.clone(),
            name: chat.name.clone(),
            author: chat.author.clone(),
            message_count: chat.msgs.len(),
            properties: chat.properties.clone(),
        }))
    })
    .await
}

#[instrument(skip_all, fields(chat = %req.chat_id))]
async fn erase_chat(Json(req): Json<OpenChatRequest>) -> Result<Json<ChatView>, ApiError> {
    with_session(|session| {
        session.open(&req.chat_id, &req.user_id)?;
        session.erase()?;
        let chat = session.require_chat()?;
        Ok(Json(ChatView {
            id: chat.id.clone(),
            name: chat.name.clone(),
            author: chat.author.clone(),
            message_count: chat.msgs.len(),
            properties: chat.properties.clone(),
        }))
    })
    .await
}

#[instrument(skip_all)]
async fn send_message(
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<SendMessageResponse>, ApiError> {
    with_session(|session| {
        let message = session.send(&req.text)?;
        Ok(Json(SendMessageResponse { message }))
    })
    .await
}

/// Returns the message list once per repaint flag, `204 No Content`
/// otherwise.
#[instrument(skip_all)]
async fn history() -> Result<Response, ApiError> {
    let messages = with_session(|session| session.history()).await?;
    match messages {
        Some(messages) => Ok(Json(HistoryResponse { messages }).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

#[instrument(skip_all)]
async fn status() -> Result<Json<StatusResponse>, ApiError> {
    let new_messages = with_session(|session| session.poll()).await?;
    Ok(Json(StatusResponse {
        status: format!("New messages: {}", new_messages),
        new_messages,
    }))
}

/// The full chat document, exactly as it would be written to disk.
#[instrument(skip_all)]
async fn document() -> Result<Json<ChatDocument>, ApiError> {
    with_session(|session| {
        let store = session.store().clone();
        let chat = session.require_chat()?;
        Ok(Json(store.document_for(chat)))
    })
    .await
}
