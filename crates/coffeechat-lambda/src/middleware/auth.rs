use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use coffeechat_auth::jwt::bearer_token;

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated user taken from the token's `sub` claim.
#[derive(Clone, Copy, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
}

/// Verifies the `Authorization: Bearer <token>` header and makes the
/// caller available to handlers as an [`AuthUser`] extension.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user_id = {
        let header = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        let token = bearer_token(header)?;
        state.verifier.validate_token(token)?.user_id()?
    };

    req.extensions_mut().insert(AuthUser { user_id });

    Ok(next.run(req).await)
}
