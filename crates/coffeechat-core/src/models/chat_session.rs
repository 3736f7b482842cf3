use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::message::{Message, PendingEdit, Role};
use crate::error::CoreError;

/// Opening assistant message shown when no history exists yet.
pub const GREETING: &str = "Hi! I'm Goose, your AI writing assistant. I can help you \
brainstorm ideas, improve your writing, check grammar, and provide feedback. \
What would you like to work on?";

/// The live conversation for one (user, application) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChatSession {
    /// Assigned by the store on first save.
    #[serde(default)]
    pub session_id: Option<Uuid>,
    pub user_id: Uuid,
    pub application_id: Uuid,
    pub messages: Vec<Message>,
}

impl ChatSession {
    /// An unsaved session opened with the assistant greeting.
    pub fn fresh(user_id: Uuid, application_id: Uuid) -> Self {
        Self {
            session_id: None,
            user_id,
            application_id,
            messages: vec![Message::assistant(GREETING, None)],
        }
    }

    /// Append a message, keeping at most one open essay-edit proposal.
    ///
    /// A new pending edit replaces any earlier one; proposals are never
    /// queued.
    pub fn append(&mut self, message: Message) -> Result<(), CoreError> {
        if message.role == Role::User && message.attachment.is_some() {
            return Err(CoreError::UserAttachment {
                message_id: message.id,
            });
        }
        if message.pending_edit().is_some() {
            self.clear_pending_edits();
        }
        self.messages.push(message);
        Ok(())
    }

    /// The open proposal and the id of the message carrying it.
    pub fn pending_edit(&self) -> Option<(Uuid, &PendingEdit)> {
        self.messages
            .iter()
            .rev()
            .find_map(|m| m.pending_edit().map(|edit| (m.id, edit)))
    }

    pub fn pending_edit_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.pending_edit().is_some())
            .count()
    }

    /// Drop every `PendingEdit` attachment in the session. Other attachment
    /// kinds are untouched. Returns how many were cleared.
    pub fn clear_pending_edits(&mut self) -> usize {
        let mut cleared = 0;
        for message in &mut self.messages {
            if message.pending_edit().is_some() {
                message.attachment = None;
                cleared += 1;
            }
        }
        cleared
    }
}

/// A chat session as persisted by the session store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSessionRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub application_id: Uuid,
    pub messages: Vec<Message>,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

impl From<ChatSessionRecord> for ChatSession {
    fn from(record: ChatSessionRecord) -> Self {
        Self {
            session_id: Some(record.id),
            user_id: record.user_id,
            application_id: record.application_id,
            messages: record.messages,
        }
    }
}
