//! Chat session persistence.
//!
//! One document per (user, application). Saving with a known session id
//! upserts that session; saving without one starts a new session and
//! returns its id, which later saves must reuse.

use tracing::{debug, info};
use uuid::Uuid;

use coffeechat_core::directory::BoxFuture;
use coffeechat_core::keys;
use coffeechat_core::models::chat_session::{ChatSession, ChatSessionRecord};
use coffeechat_core::models::message::Message;

use crate::error::StorageError;
use crate::state;
use crate::S3Store;

pub trait ChatSessionStore: Send + Sync {
    /// The most recently saved session for the key, or `None`.
    fn load(
        &self,
        user_id: Uuid,
        application_id: Uuid,
    ) -> BoxFuture<'_, Result<Option<ChatSession>, StorageError>>;

    /// Persist the full message list. Returns the session id.
    fn save<'a>(
        &'a self,
        user_id: Uuid,
        application_id: Uuid,
        session_id: Option<Uuid>,
        messages: &'a [Message],
    ) -> BoxFuture<'a, Result<Uuid, StorageError>>;
}

/// Build the record to write, carrying `created_at` forward when the same
/// session is being updated.
pub(crate) fn next_record(
    existing: Option<&ChatSessionRecord>,
    user_id: Uuid,
    application_id: Uuid,
    session_id: Option<Uuid>,
    messages: &[Message],
) -> ChatSessionRecord {
    let now = jiff::Timestamp::now();
    let id = session_id.unwrap_or_else(Uuid::new_v4);
    let created_at = existing
        .filter(|record| record.id == id)
        .map(|record| record.created_at)
        .unwrap_or(now);

    ChatSessionRecord {
        id,
        user_id,
        application_id,
        messages: messages.to_vec(),
        created_at,
        updated_at: now,
    }
}

impl ChatSessionStore for S3Store {
    fn load(
        &self,
        user_id: Uuid,
        application_id: Uuid,
    ) -> BoxFuture<'_, Result<Option<ChatSession>, StorageError>> {
        Box::pin(async move {
            let key = keys::chat_session(user_id, application_id);
            let record: Option<ChatSessionRecord> =
                state::load_json_opt(&self.s3, &self.bucket, &key).await?;

            debug!(%user_id, %application_id, found = record.is_some(), "chat session loaded");
            Ok(record.map(ChatSession::from))
        })
    }

    fn save<'a>(
        &'a self,
        user_id: Uuid,
        application_id: Uuid,
        session_id: Option<Uuid>,
        messages: &'a [Message],
    ) -> BoxFuture<'a, Result<Uuid, StorageError>> {
        Box::pin(async move {
            let key = keys::chat_session(user_id, application_id);
            let existing: Option<ChatSessionRecord> =
                state::load_json_opt(&self.s3, &self.bucket, &key).await?;

            let record = next_record(
                existing.as_ref(),
                user_id,
                application_id,
                session_id,
                messages,
            );
            state::save_json(&self.s3, &self.bucket, &key, &record).await?;

            info!(
                session_id = %record.id,
                %application_id,
                messages = record.messages.len(),
                "chat session saved"
            );
            Ok(record.id)
        })
    }
}
