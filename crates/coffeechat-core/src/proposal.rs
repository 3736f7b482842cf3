//! Edit proposal reconciliation.
//!
//! A session is either `Idle` or has exactly one `Pending` essay edit,
//! attached to the assistant message that introduced it. Accepting copies
//! the (possibly user-edited) proposal into the essay buffer; rejecting
//! leaves the buffer alone. Either way every `PendingEdit` attachment in the
//! session is cleared. Nothing here persists anything.

use uuid::Uuid;

use crate::error::CoreError;
use crate::models::chat_session::ChatSession;
use crate::models::essay::EssayBuffer;
use crate::models::message::PendingEdit;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProposalState {
    Idle,
    Pending { message_id: Uuid, edit: PendingEdit },
}

impl ProposalState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }
}

pub fn state(session: &ChatSession) -> ProposalState {
    match session.pending_edit() {
        Some((message_id, edit)) => ProposalState::Pending {
            message_id,
            edit: edit.clone(),
        },
        None => ProposalState::Idle,
    }
}

/// Resolve the open proposal by writing `content` into the buffer verbatim.
pub fn accept(
    session: &mut ChatSession,
    buffer: &mut EssayBuffer,
    content: &str,
) -> Result<(), CoreError> {
    if session.pending_edit().is_none() {
        return Err(CoreError::NoPendingEdit);
    }
    buffer.set_content(content);
    session.clear_pending_edits();
    Ok(())
}

/// Resolve the open proposal without touching the buffer.
pub fn reject(session: &mut ChatSession) -> Result<(), CoreError> {
    if session.clear_pending_edits() == 0 {
        return Err(CoreError::NoPendingEdit);
    }
    Ok(())
}
