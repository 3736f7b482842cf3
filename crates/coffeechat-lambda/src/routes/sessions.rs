use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use coffeechat_core::models::chat_session::ChatSession;
use coffeechat_core::models::message::Message;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SaveSessionRequest {
    #[serde(default)]
    pub session_id: Option<Uuid>,
    pub messages: Vec<Message>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveSessionResponse {
    pub session_id: Uuid,
}

pub async fn get_session(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(application_id): Path<Uuid>,
) -> Result<Json<ChatSession>, ApiError> {
    state
        .sessions
        .load(user.user_id, application_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("no chat session for {application_id}")))
}

/// Save the full history. Messages are replayed through the session so a
/// stored history never holds more than one open edit proposal.
pub async fn save_session(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(application_id): Path<Uuid>,
    Json(request): Json<SaveSessionRequest>,
) -> Result<Json<SaveSessionResponse>, ApiError> {
    let mut session = ChatSession {
        session_id: request.session_id,
        user_id: user.user_id,
        application_id,
        messages: Vec::with_capacity(request.messages.len()),
    };
    for message in request.messages {
        session.append(message)?;
    }

    let session_id = state
        .sessions
        .save(
            user.user_id,
            application_id,
            session.session_id,
            &session.messages,
        )
        .await?;

    Ok(Json(SaveSessionResponse { session_id }))
}
