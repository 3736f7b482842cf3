use std::sync::atomic::{AtomicUsize, Ordering};

use jiff::{SignedDuration, Timestamp};

use coffeechat_calendar::error::CalendarError;
use coffeechat_calendar::token::{AccessGrant, MAX_TOKEN_LIFETIME, TokenCache, TokenSource};
use coffeechat_core::directory::BoxFuture;

fn at(seconds: i64) -> Timestamp {
    Timestamp::from_second(1_760_000_000 + seconds).unwrap()
}

fn grant(expires_in: i64) -> AccessGrant {
    AccessGrant {
        access_token: "ya29.token".to_string(),
        expires_in,
    }
}

#[test]
fn empty_cache_has_no_token() {
    assert!(TokenCache::new().valid_token(at(0)).is_none());
}

#[test]
fn token_is_valid_until_it_expires() {
    let mut cache = TokenCache::new();
    cache.store(grant(600), at(0));

    assert_eq!(cache.valid_token(at(599)), Some("ya29.token"));
    assert!(cache.valid_token(at(600)).is_none());
}

#[test]
fn long_grants_are_capped_at_fifty_minutes() {
    let mut cache = TokenCache::new();
    cache.store(grant(3600), at(0));

    let cap = MAX_TOKEN_LIFETIME.as_secs();
    assert_eq!(MAX_TOKEN_LIFETIME, SignedDuration::from_mins(50));
    assert!(cache.is_authenticated(at(cap - 1)));
    assert!(!cache.is_authenticated(at(cap)));
}

#[test]
fn clear_forgets_the_token() {
    let mut cache = TokenCache::new();
    cache.store(grant(600), at(0));
    cache.clear();
    assert!(!cache.is_authenticated(at(1)));
}

#[test]
fn grant_parses_from_token_endpoint_json() {
    let body = r#"{"access_token":"abc","expires_in":3599,"scope":"calendar","token_type":"Bearer"}"#;
    let parsed: AccessGrant = serde_json::from_str(body).unwrap();
    assert_eq!(
        parsed,
        AccessGrant {
            access_token: "abc".to_string(),
            expires_in: 3599,
        }
    );
}

/// Hands out `token-1`, `token-2`, ... and counts how often it was asked.
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
                expires_in: 600,
            })
        })
    }
}

struct FailingSource;

impl TokenSource for FailingSource {
    fn acquire(&self) -> BoxFuture<'_, Result<AccessGrant, CalendarError>> {
        Box::pin(async { Err(CalendarError::Auth("refresh token revoked".to_string())) })
    }
}

#[tokio::test]
async fn valid_cached_token_skips_the_source() {
    let source = CountingSource::default();
    let mut cache = TokenCache::new();

    assert_eq!(cache.token_or_acquire(&source, at(0)).await.unwrap(), "token-1");
    assert_eq!(cache.token_or_acquire(&source, at(300)).await.unwrap(), "token-1");
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn expired_token_is_refreshed_exactly_once() {
    let source = CountingSource::default();
    let mut cache = TokenCache::new();
    cache.token_or_acquire(&source, at(0)).await.unwrap();

    assert_eq!(cache.token_or_acquire(&source, at(600)).await.unwrap(), "token-2");
    assert_eq!(cache.token_or_acquire(&source, at(601)).await.unwrap(), "token-2");
    assert_eq!(source.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn failed_refresh_leaves_cache_empty() {
    let mut cache = TokenCache::new();
    let err = cache.token_or_acquire(&FailingSource, at(0)).await.unwrap_err();

    assert!(matches!(err, CalendarError::Auth(_)));
    assert!(!cache.is_authenticated(at(0)));
}
