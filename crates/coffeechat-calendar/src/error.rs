use thiserror::Error;

#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("calendar API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("unexpected response body: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("authorization failed: {0}")]
    Auth(String),

    #[error("invalid event: {0}")]
    InvalidEvent(String),

    #[error("invalid URL: {0}")]
    Url(String),
}
