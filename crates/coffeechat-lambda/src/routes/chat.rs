use axum::extract::State;
use axum::{Extension, Json};
use serde::Deserialize;

use coffeechat_core::models::context::ContextRequest;
use coffeechat_core::models::envelope::AssistantEnvelope;
use coffeechat_core::models::message::{Message, Role};

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

/// One chat turn from the editor. Accepts camelCase field names from older
/// web clients.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatTurn>,
    #[serde(default, alias = "essayContent")]
    pub essay_content: Option<String>,
    #[serde(default, alias = "applicationTitle")]
    pub application_title: Option<String>,
    #[serde(default, alias = "essayTitle")]
    pub essay_title: Option<String>,
    #[serde(default, alias = "essayPrompt")]
    pub essay_prompt: Option<String>,
    #[serde(default, alias = "selectedText")]
    pub selected_text: Option<String>,
}

pub async fn chat(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<AssistantEnvelope>, ApiError> {
    if request.messages.is_empty() {
        return Err(ApiError::BadRequest("messages must not be empty".to_string()));
    }

    let history: Vec<Message> = request
        .messages
        .into_iter()
        .map(|turn| match turn.role {
            Role::User => Message::user(turn.content),
            Role::Assistant => Message::assistant(turn.content, None),
        })
        .collect();

    let context = state
        .context
        .build(&ContextRequest {
            user_id: Some(user.user_id),
            application_title: request.application_title,
            essay_title: request.essay_title,
            essay_prompt: request.essay_prompt,
            essay_content: request.essay_content,
            selected_text: request.selected_text,
        })
        .await;

    let envelope = state.assistant.converse(&history, &context).await?;
    Ok(Json(envelope))
}
