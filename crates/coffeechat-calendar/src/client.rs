use std::sync::Arc;

use jiff::Timestamp;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::CalendarError;
use crate::events::{CalendarEvent, NewCalendarEvent, parse_event_list};
use crate::token::{TokenCache, TokenSource};

pub const GOOGLE_CALENDAR_API: &str = "https://www.googleapis.com/calendar/v3";

/// Most events returned by one listing.
pub const MAX_RESULTS: u32 = 50;

/// Google Calendar client. Owns its token cache; tokens are refreshed
/// through the [`TokenSource`] when the cached one has expired.
pub struct CalendarClient {
    http: reqwest::Client,
    base_url: String,
    source: Arc<dyn TokenSource>,
    cache: Mutex<TokenCache>,
}

#[derive(Debug, Deserialize)]
struct InsertedEvent {
    id: String,
}

impl CalendarClient {
    pub fn new(http: reqwest::Client, source: Arc<dyn TokenSource>) -> Self {
        Self {
            http,
            base_url: GOOGLE_CALENDAR_API.to_string(),
            source,
            cache: Mutex::new(TokenCache::new()),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub async fn is_authenticated(&self) -> bool {
        self.cache.lock().await.is_authenticated(Timestamp::now())
    }

    /// Forget the cached token.
    pub async fn clear_auth(&self) {
        self.cache.lock().await.clear();
    }

    /// A usable access token, refreshing it first if needed. The cache lock
    /// is held across the refresh so concurrent callers share one grant.
    async fn access_token(&self) -> Result<String, CalendarError> {
        self.cache
            .lock()
            .await
            .token_or_acquire(self.source.as_ref(), Timestamp::now())
            .await
    }

    fn events_url(&self, calendar_id: &str) -> Result<Url, CalendarError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| CalendarError::Url(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| CalendarError::Url(format!("cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .extend(["calendars", calendar_id, "events"]);
        Ok(url)
    }

    /// Turn a non-success response into an error, dropping the cached token
    /// when the API says it is no longer valid.
    async fn check(&self, response: reqwest::Response) -> Result<reqwest::Response, CalendarError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            self.clear_auth().await;
        }
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        warn!(status = status.as_u16(), "calendar API request failed");
        Err(CalendarError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Up to [`MAX_RESULTS`] single events starting from `now`, earliest
    /// first.
    pub async fn list_upcoming(
        &self,
        calendar_id: &str,
        now: Timestamp,
    ) -> Result<Vec<CalendarEvent>, CalendarError> {
        let token = self.access_token().await?;
        let response = self
            .http
            .get(self.events_url(calendar_id)?)
            .bearer_auth(token)
            .query(&[
                ("timeMin", now.to_string()),
                ("maxResults", MAX_RESULTS.to_string()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
            ])
            .send()
            .await?;

        let body = self.check(response).await?.text().await?;
        let events = parse_event_list(&body)?;
        info!(calendar_id, count = events.len(), "calendar events listed");
        Ok(events)
    }

    /// Insert an event. Returns the new event's id.
    pub async fn create_event(
        &self,
        calendar_id: &str,
        event: &NewCalendarEvent,
    ) -> Result<String, CalendarError> {
        let token = self.access_token().await?;
        let response = self
            .http
            .post(self.events_url(calendar_id)?)
            .bearer_auth(token)
            .json(&event.to_insert_body())
            .send()
            .await?;

        let inserted: InsertedEvent = self.check(response).await?.json().await?;
        info!(calendar_id, event_id = %inserted.id, title = %event.title, "calendar event created");
        Ok(inserted.id)
    }
}
