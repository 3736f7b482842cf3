use axum::extract::{Path, State};
use axum::{Extension, Json};
use uuid::Uuid;

use coffeechat_core::models::essay::{Essay, EssayPatch};

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

pub async fn get_essay(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Essay>, ApiError> {
    Ok(Json(state.essays.essay(user.user_id, id).await?))
}

pub async fn update_essay(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(patch): Json<EssayPatch>,
) -> Result<Json<Essay>, ApiError> {
    if patch.is_empty() {
        return Err(ApiError::BadRequest("nothing to update".to_string()));
    }
    Ok(Json(state.essays.update_essay(user.user_id, id, &patch).await?))
}
