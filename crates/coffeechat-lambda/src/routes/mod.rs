pub mod chat;
pub mod essays;
pub mod health;
pub mod sessions;

use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

use crate::middleware;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let protected = Router::new()
        .route("/chat", post(chat::chat))
        .route(
            "/chat-sessions/{application_id}",
            get(sessions::get_session).put(sessions::save_session),
        )
        .route(
            "/essays/{id}",
            get(essays::get_essay).patch(essays::update_essay),
        )
        .route_layer(axum_mw::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        // Health (no auth)
        .route("/health", get(health::health_check))
        .merge(protected)
        .layer(axum_mw::from_fn(middleware::audit::audit_log))
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::{SystemTime, UNIX_EPOCH};

    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode};
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use uuid::Uuid;

    use coffeechat_auth::jwt::{SupabaseClaims, TokenVerifier};
    use coffeechat_bedrock::context::ContextAggregator;
    use coffeechat_bedrock::error::BedrockError;
    use coffeechat_bedrock::gateway::{Assistant, GenerationBlock, normalize};
    use coffeechat_core::directory::BoxFuture;
    use coffeechat_core::models::context::ContextBundle;
    use coffeechat_core::models::envelope::AssistantEnvelope;
    use coffeechat_core::models::essay::Essay;
    use coffeechat_core::models::message::Message;
    use coffeechat_storage::memory::MemoryStore;

    use super::*;

    const SECRET: &[u8] = b"test-secret-that-is-long-enough-for-hs256";

    /// Echoes the essay context back as a modify proposal, or fails.
    struct EchoAssistant {
        fail: bool,
    }

    impl Assistant for EchoAssistant {
        fn converse<'a>(
            &'a self,
            _history: &'a [Message],
            context: &'a ContextBundle,
        ) -> BoxFuture<'a, Result<AssistantEnvelope, BedrockError>> {
            Box::pin(async move {
                if self.fail {
                    return Err(BedrockError::Invocation("throttled".to_string()));
                }
                normalize(
                    vec![
                        GenerationBlock::Text("Here:".to_string()),
                        GenerationBlock::ToolUse {
                            name: "modify_essay".to_string(),
                            input: json!({ "content": context.essay }),
                        },
                    ],
                    context,
                )
            })
        }
    }

    fn app(store: &MemoryStore, fail: bool) -> Router {
        let lookups = Arc::new(store.clone());
        router(AppState {
            sessions: Arc::new(store.clone()),
            essays: Arc::new(store.clone()),
            context: ContextAggregator::new(lookups.clone(), lookups),
            assistant: Arc::new(EchoAssistant { fail }),
            verifier: Arc::new(TokenVerifier::new(SECRET)),
        })
    }

    fn token(user_id: Uuid) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
        let claims = SupabaseClaims {
            sub: user_id.to_string(),
            aud: "authenticated".to_string(),
            exp: now + 3600,
            iat: Some(now),
            email: None,
            role: Some("authenticated".to_string()),
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).unwrap()
    }

    fn request(method: Method, uri: &str, user: Option<Uuid>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header("authorization", format!("Bearer {}", token(user)));
        }
        match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_needs_no_token() {
        let response = app(&MemoryStore::new(), false)
            .oneshot(request(Method::GET, "/health", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn protected_routes_reject_missing_token() {
        let uri = format!("/chat-sessions/{}", Uuid::new_v4());
        let response = app(&MemoryStore::new(), false)
            .oneshot(request(Method::GET, &uri, None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn forged_token_is_rejected() {
        let response = app(&MemoryStore::new(), false)
            .oneshot(
                Request::builder()
                    .uri(format!("/essays/{}", Uuid::new_v4()))
                    .header("authorization", "Bearer not.a.jwt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn chat_returns_envelope_with_proposal() {
        let body = json!({
            "messages": [
                { "role": "assistant", "content": "Hi! I'm Goose." },
                { "role": "user", "content": "Can you improve my intro?" }
            ],
            "essayContent": "I like cats.",
            "application_title": "Cat Fanciers Society"
        });

        let response = app(&MemoryStore::new(), false)
            .oneshot(request(Method::POST, "/chat", Some(Uuid::new_v4()), Some(body)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let envelope = json_body(response).await;
        assert!(envelope["response_text"].as_str().unwrap().starts_with("Here:"));
        assert_eq!(envelope["essay_edit"]["edit_kind"], "modify");
        assert!(
            envelope["essay_edit"]["proposed_content"]
                .as_str()
                .unwrap()
                .contains("I like cats.")
        );
    }

    #[tokio::test]
    async fn chat_generation_failure_is_502() {
        let body = json!({ "messages": [{ "role": "user", "content": "Hello" }] });

        let response = app(&MemoryStore::new(), true)
            .oneshot(request(Method::POST, "/chat", Some(Uuid::new_v4()), Some(body)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            json_body(response).await,
            json!({ "error": "Failed to process chat message" })
        );
    }

    #[tokio::test]
    async fn session_round_trip() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let uri = format!("/chat-sessions/{}", Uuid::new_v4());

        let missing = app(&store, false)
            .oneshot(request(Method::GET, &uri, Some(user), None))
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let messages = vec![Message::user("Hello"), Message::assistant("Hi.", None)];
        let saved = app(&store, false)
            .oneshot(request(
                Method::PUT,
                &uri,
                Some(user),
                Some(json!({ "messages": messages })),
            ))
            .await
            .unwrap();
        assert_eq!(saved.status(), StatusCode::OK);
        let session_id = json_body(saved).await["session_id"].clone();

        let loaded = app(&store, false)
            .oneshot(request(Method::GET, &uri, Some(user), None))
            .await
            .unwrap();
        assert_eq!(loaded.status(), StatusCode::OK);
        let session = json_body(loaded).await;
        assert_eq!(session["session_id"], session_id);
        assert_eq!(session["messages"][1]["content"], "Hi.");
    }

    #[tokio::test]
    async fn user_message_with_attachment_is_rejected() {
        let uri = format!("/chat-sessions/{}", Uuid::new_v4());
        let mut message = serde_json::to_value(Message::user("Sneaky")).unwrap();
        message["attachment"] = json!({ "type": "profile_brief", "summary": "x" });

        let response = app(&MemoryStore::new(), false)
            .oneshot(request(
                Method::PUT,
                &uri,
                Some(Uuid::new_v4()),
                Some(json!({ "messages": [message] })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    async fn stored_essay(store: &MemoryStore, owner: Uuid) -> Essay {
        let now = jiff::Timestamp::now();
        let essay = Essay {
            id: Uuid::new_v4(),
            user_id: owner,
            application_id: Uuid::new_v4(),
            title: "Why us".to_string(),
            prompt: "Tell us.".to_string(),
            content: "Old.".to_string(),
            word_limit: None,
            created_at: now,
            updated_at: now,
        };
        store.insert_essay(essay.clone()).await;
        essay
    }

    #[tokio::test]
    async fn essay_patch_updates_content() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let essay = stored_essay(&store, owner).await;
        let uri = format!("/essays/{}", essay.id);

        let response = app(&store, false)
            .oneshot(request(
                Method::PATCH,
                &uri,
                Some(owner),
                Some(json!({ "content": "New words here." })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let updated = json_body(response).await;
        assert_eq!(updated["content"], "New words here.");
        assert_eq!(updated["title"], "Why us");

        let empty = app(&store, false)
            .oneshot(request(Method::PATCH, &uri, Some(owner), Some(json!({}))))
            .await
            .unwrap();
        assert_eq!(empty.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn another_users_essay_is_404() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let essay = stored_essay(&store, owner).await;
        let uri = format!("/essays/{}", essay.id);
        let stranger = Some(Uuid::new_v4());

        let read = app(&store, false)
            .oneshot(request(Method::GET, &uri, stranger, None))
            .await
            .unwrap();
        assert_eq!(read.status(), StatusCode::NOT_FOUND);

        let write = app(&store, false)
            .oneshot(request(
                Method::PATCH,
                &uri,
                stranger,
                Some(json!({ "content": "Overwritten." })),
            ))
            .await
            .unwrap();
        assert_eq!(write.status(), StatusCode::NOT_FOUND);

        let own = app(&store, false)
            .oneshot(request(Method::GET, &uri, Some(owner), None))
            .await
            .unwrap();
        assert_eq!(own.status(), StatusCode::OK);
        assert_eq!(json_body(own).await["content"], "Old.");
    }

    #[tokio::test]
    async fn unknown_essay_is_404() {
        let uri = format!("/essays/{}", Uuid::new_v4());
        let response = app(&MemoryStore::new(), false)
            .oneshot(request(Method::GET, &uri, Some(Uuid::new_v4()), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
