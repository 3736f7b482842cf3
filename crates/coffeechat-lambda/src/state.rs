use std::sync::Arc;

use coffeechat_auth::jwt::TokenVerifier;
use coffeechat_bedrock::context::ContextAggregator;
use coffeechat_bedrock::gateway::Assistant;
use coffeechat_storage::essays::EssayStore;
use coffeechat_storage::sessions::ChatSessionStore;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<dyn ChatSessionStore>,
    pub essays: Arc<dyn EssayStore>,
    pub context: ContextAggregator,
    pub assistant: Arc<dyn Assistant>,
    pub verifier: Arc<TokenVerifier>,
}
