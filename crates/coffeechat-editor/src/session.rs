//! One open essay with its chat.
//!
//! Turns are strictly sequential: `begin_turn` appends the user message and
//! hands back what the assistant needs, `complete_turn` appends the reply.
//! Chat history is saved after each completed turn. Essay text is only
//! saved when asked. A failed save never rolls back the conversation.

use tracing::{info, warn};
use uuid::Uuid;

use coffeechat_bedrock::context::ContextAggregator;
use coffeechat_bedrock::error::BedrockError;
use coffeechat_bedrock::gateway::Assistant;
use coffeechat_core::models::chat_session::ChatSession;
use coffeechat_core::models::context::ContextRequest;
use coffeechat_core::models::envelope::AssistantEnvelope;
use coffeechat_core::models::essay::{Application, Essay, EssayBuffer};
use coffeechat_core::models::message::Message;
use coffeechat_core::proposal::{self, ProposalState};
use coffeechat_storage::error::StorageError;
use coffeechat_storage::essays::EssayStore;
use coffeechat_storage::sessions::ChatSessionStore;

use crate::error::EditorError;

/// Shown in place of a reply when generation fails.
pub const APOLOGY: &str =
    "Sorry, I encountered an error while processing your request. Please try again.";

/// What the assistant needs to answer the turn just begun.
#[derive(Debug, Clone)]
pub struct TurnRequest {
    pub history: Vec<Message>,
    pub context: ContextRequest,
}

#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub reply: Message,
    /// False when generation failed and the apology was shown instead.
    pub generated: bool,
    /// False when the chat history could not be saved.
    pub saved: bool,
}

pub struct EditorSession {
    user_id: Uuid,
    application_title: String,
    essay_id: Uuid,
    essay_title: String,
    essay_prompt: String,
    chat: ChatSession,
    buffer: EssayBuffer,
    selected_text: Option<String>,
    awaiting_reply: bool,
}

impl EditorSession {
    /// Open the editor, restoring saved chat history when there is any.
    ///
    /// A store failure is logged and the editor starts fresh.
    pub async fn open(
        store: &dyn ChatSessionStore,
        user_id: Uuid,
        application: &Application,
        essay: &Essay,
    ) -> Self {
        let chat = match store.load(user_id, application.id).await {
            Ok(Some(chat)) => chat,
            Ok(None) => ChatSession::fresh(user_id, application.id),
            Err(e) => {
                warn!(
                    %user_id,
                    application_id = %application.id,
                    error = %e,
                    "could not load chat history, starting fresh"
                );
                ChatSession::fresh(user_id, application.id)
            }
        };

        Self {
            user_id,
            application_title: application.title.clone(),
            essay_id: essay.id,
            essay_title: essay.title.clone(),
            essay_prompt: essay.prompt.clone(),
            chat,
            buffer: EssayBuffer::from_essay(essay),
            selected_text: None,
            awaiting_reply: false,
        }
    }

    pub fn chat(&self) -> &ChatSession {
        &self.chat
    }

    pub fn buffer(&self) -> &EssayBuffer {
        &self.buffer
    }

    pub fn session_id(&self) -> Option<Uuid> {
        self.chat.session_id
    }

    pub fn proposal(&self) -> ProposalState {
        proposal::state(&self.chat)
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    /// Replace the essay text, as typing does.
    pub fn edit_essay(&mut self, text: impl Into<String>) {
        self.buffer.set_content(text);
    }

    /// Highlight an excerpt to focus the next turn on. `None` clears it.
    pub fn select_text(&mut self, excerpt: Option<String>) {
        self.selected_text = excerpt.filter(|s| !s.trim().is_empty());
    }

    pub fn context_request(&self) -> ContextRequest {
        ContextRequest {
            user_id: Some(self.user_id),
            application_title: Some(self.application_title.clone()),
            essay_title: Some(self.essay_title.clone()),
            essay_prompt: Some(self.essay_prompt.clone()),
            essay_content: Some(self.buffer.content().to_string()),
            selected_text: self.selected_text.clone(),
        }
    }

    pub fn begin_turn(&mut self, text: &str) -> Result<TurnRequest, EditorError> {
        if self.awaiting_reply {
            return Err(EditorError::TurnInFlight);
        }
        if text.trim().is_empty() {
            return Err(EditorError::EmptyMessage);
        }

        self.chat.append(Message::user(text))?;
        self.awaiting_reply = true;

        Ok(TurnRequest {
            history: self.chat.messages.clone(),
            context: self.context_request(),
        })
    }

    /// Append the assistant's reply, or the apology if generation failed.
    pub fn complete_turn(
        &mut self,
        result: Result<AssistantEnvelope, BedrockError>,
    ) -> Result<&Message, EditorError> {
        if !self.awaiting_reply {
            return Err(EditorError::NoTurnInFlight);
        }
        self.awaiting_reply = false;

        let reply = match result {
            Ok(envelope) => envelope.into_message(),
            Err(e) => {
                warn!(essay_id = %self.essay_id, error = %e, "assistant turn failed");
                Message::assistant(APOLOGY, None)
            }
        };
        self.chat.append(reply)?;

        self.chat
            .messages
            .last()
            .ok_or(EditorError::NoTurnInFlight)
    }

    /// Save the chat history, remembering the session id the store assigns.
    pub async fn persist(&mut self, store: &dyn ChatSessionStore) -> Result<Uuid, StorageError> {
        match store
            .save(
                self.user_id,
                self.chat.application_id,
                self.chat.session_id,
                &self.chat.messages,
            )
            .await
        {
            Ok(id) => {
                self.chat.session_id = Some(id);
                Ok(id)
            }
            Err(e) => {
                warn!(
                    application_id = %self.chat.application_id,
                    error = %e,
                    "chat history not saved"
                );
                Err(e)
            }
        }
    }

    /// Run a whole turn: build context, ask the assistant, record the reply,
    /// then save.
    pub async fn send_turn(
        &mut self,
        aggregator: &ContextAggregator,
        assistant: &dyn Assistant,
        store: &dyn ChatSessionStore,
        text: &str,
    ) -> Result<TurnOutcome, EditorError> {
        let request = self.begin_turn(text)?;
        let context = aggregator.build(&request.context).await;
        let result = assistant.converse(&request.history, &context).await;
        let generated = result.is_ok();

        let reply = self.complete_turn(result)?.clone();
        let saved = self.persist(store).await.is_ok();

        info!(
            essay_id = %self.essay_id,
            generated,
            saved,
            pending_edit = reply.pending_edit().is_some(),
            "turn complete"
        );
        Ok(TurnOutcome {
            reply,
            generated,
            saved,
        })
    }

    /// Accept the open proposal, writing `content` into the essay as is.
    pub fn accept_edit(&mut self, content: &str) -> Result<(), EditorError> {
        proposal::accept(&mut self.chat, &mut self.buffer, content)?;
        Ok(())
    }

    pub fn reject_edit(&mut self) -> Result<(), EditorError> {
        proposal::reject(&mut self.chat)?;
        Ok(())
    }

    /// Write the buffer's text to the essay store.
    pub async fn save_essay(&mut self, store: &dyn EssayStore) -> Result<Essay, EditorError> {
        let essay = store
            .update_essay(self.user_id, self.essay_id, &self.buffer.to_patch())
            .await?;
        self.buffer.mark_saved();
        info!(essay_id = %self.essay_id, words = essay.word_count(), "essay saved");
        Ok(essay)
    }
}
