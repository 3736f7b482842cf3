use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use jiff::Timestamp;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use coffeechat_calendar::client::CalendarClient;
use coffeechat_calendar::error::CalendarError;
use coffeechat_calendar::token::{AccessGrant, TokenSource};
use coffeechat_core::directory::BoxFuture;

#[derive(Default)]
struct CountingSource {
    calls: AtomicUsize,
}

impl TokenSource for CountingSource {
    fn acquire(&self) -> BoxFuture<'_, Result<AccessGrant, CalendarError>> {
        Box::pin(async move {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(AccessGrant {
                access_token: format!("token-{n}"),
                expires_in: 3600,
            })
        })
    }
}

/// Stand-in for the events endpoint. Records the bearer token of every
/// request and answers 401 while `reject` is set.
#[derive(Clone, Default)]
struct Stub {
    reject: Arc<AtomicBool>,
    seen: Arc<Mutex<Vec<String>>>,
}

async fn list_events(State(stub): State<Stub>, headers: HeaderMap) -> Response {
    let bearer = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    stub.seen.lock().await.push(bearer);

    if stub.reject.load(Ordering::SeqCst) {
        return (StatusCode::UNAUTHORIZED, "Invalid Credentials").into_response();
    }
    axum::Json(json!({
        "items": [{
            "id": "evt-1",
            "summary": "Fall Info Session",
            "start": { "dateTime": "2026-10-20T18:00:00-05:00" },
            "end": { "dateTime": "2026-10-20T19:00:00-05:00" }
        }]
    }))
    .into_response()
}

async fn serve(stub: Stub) -> String {
    let app = Router::new()
        .route("/calendars/{calendar_id}/events", get(list_events))
        .with_state(stub);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn client(stub: &Stub) -> (CalendarClient, Arc<CountingSource>) {
    let source = Arc::new(CountingSource::default());
    let client = CalendarClient::new(reqwest::Client::new(), source.clone())
        .with_base_url(serve(stub.clone()).await);
    (client, source)
}

#[tokio::test]
async fn cached_token_is_reused_across_calls() {
    let stub = Stub::default();
    let (client, source) = client(&stub).await;

    let events = client.list_upcoming("primary", Timestamp::now()).await.unwrap();
    assert_eq!(events.len(), 1);
    client.list_upcoming("primary", Timestamp::now()).await.unwrap();

    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    assert!(client.is_authenticated().await);
    assert_eq!(
        *stub.seen.lock().await,
        vec!["Bearer token-1".to_string(), "Bearer token-1".to_string()]
    );
}

#[tokio::test]
async fn unauthorized_response_clears_the_cache() {
    let stub = Stub::default();
    let (client, source) = client(&stub).await;
    client.list_upcoming("primary", Timestamp::now()).await.unwrap();

    stub.reject.store(true, Ordering::SeqCst);
    let err = client
        .list_upcoming("primary", Timestamp::now())
        .await
        .unwrap_err();
    assert!(matches!(err, CalendarError::Api { status: 401, .. }));
    assert!(!client.is_authenticated().await);

    stub.reject.store(false, Ordering::SeqCst);
    client.list_upcoming("primary", Timestamp::now()).await.unwrap();

    assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    assert_eq!(stub.seen.lock().await.last().unwrap(), "Bearer token-2");
}
