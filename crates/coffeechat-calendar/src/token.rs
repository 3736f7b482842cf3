//! Access tokens for the calendar API.
//!
//! The client owns a [`TokenCache`] and consults it before every call. When
//! the cached token is missing or expired it awaits a fresh grant from its
//! [`TokenSource`] and caches that.

use jiff::{SignedDuration, Timestamp};
use serde::Deserialize;
use tracing::{debug, info};

use coffeechat_core::directory::BoxFuture;

use crate::error::CalendarError;

/// Tokens are treated as expired after this long even when the grant says
/// they live longer.
pub const MAX_TOKEN_LIFETIME: SignedDuration = SignedDuration::from_mins(50);

pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// A freshly issued access token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccessGrant {
    pub access_token: String,
    /// Lifetime in seconds.
    pub expires_in: i64,
}

#[derive(Debug, Clone, Default)]
pub struct TokenCache {
    cached: Option<(String, Timestamp)>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached token, if it has not expired by `now`.
    pub fn valid_token(&self, now: Timestamp) -> Option<&str> {
        self.cached
            .as_ref()
            .filter(|(_, expires_at)| now < *expires_at)
            .map(|(token, _)| token.as_str())
    }

    pub fn is_authenticated(&self, now: Timestamp) -> bool {
        self.valid_token(now).is_some()
    }

    pub fn store(&mut self, grant: AccessGrant, now: Timestamp) {
        let lifetime = SignedDuration::from_secs(grant.expires_in.max(0)).min(MAX_TOKEN_LIFETIME);
        let expires_at = now.checked_add(lifetime).unwrap_or(now);
        debug!(%expires_at, "access token cached");
        self.cached = Some((grant.access_token, expires_at));
    }

    pub fn clear(&mut self) {
        self.cached = None;
    }

    /// The cached token when still valid at `now`; otherwise await a new
    /// grant from `source`, cache it and return it.
    pub async fn token_or_acquire(
        &mut self,
        source: &dyn TokenSource,
        now: Timestamp,
    ) -> Result<String, CalendarError> {
        if let Some(token) = self.valid_token(now) {
            return Ok(token.to_string());
        }

        let grant = source.acquire().await?;
        let token = grant.access_token.clone();
        self.store(grant, now);
        Ok(token)
    }
}

/// Where new access tokens come from.
///
/// Methods return boxed futures for dyn compatibility.
pub trait TokenSource: Send + Sync {
    fn acquire(&self) -> BoxFuture<'_, Result<AccessGrant, CalendarError>>;
}

/// Exchanges a long-lived refresh token for access tokens.
pub struct RefreshTokenSource {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    refresh_token: String,
}

impl RefreshTokenSource {
    pub fn new(
        http: reqwest::Client,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            http,
            token_url: GOOGLE_TOKEN_URL.to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            refresh_token: refresh_token.into(),
        }
    }

    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    async fn refresh(&self) -> Result<AccessGrant, CalendarError> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", self.refresh_token.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(CalendarError::Auth(format!("token refresh failed ({status}): {message}")));
        }

        let grant: AccessGrant = response.json().await?;
        info!(expires_in = grant.expires_in, "access token refreshed");
        Ok(grant)
    }
}

impl std::fmt::Debug for RefreshTokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshTokenSource")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

impl TokenSource for RefreshTokenSource {
    fn acquire(&self) -> BoxFuture<'_, Result<AccessGrant, CalendarError>> {
        Box::pin(self.refresh())
    }
}
