use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("user message {message_id} cannot carry an attachment")]
    UserAttachment { message_id: Uuid },

    #[error("no pending essay edit to resolve")]
    NoPendingEdit,
}

/// Failure of a read-only profile or organization lookup.
///
/// The context aggregator absorbs these and substitutes placeholders.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("lookup unavailable: {0}")]
    Unavailable(String),

    #[error("malformed lookup record: {0}")]
    Malformed(String),
}
