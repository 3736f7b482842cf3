use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Application {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub school: String,
    #[serde(default)]
    pub deadline: Option<String>,
    pub status: ApplicationStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ApplicationStatus {
    Draft,
    InProgress,
    Submitted,
}

/// An essay belonging to an application. Word count is always derived from
/// `content`, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Essay {
    pub id: Uuid,
    /// Owner. Essays are only visible to this user.
    pub user_id: Uuid,
    pub application_id: Uuid,
    pub title: String,
    pub prompt: String,
    pub content: String,
    #[serde(default)]
    pub word_limit: Option<u32>,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

impl Essay {
    pub fn word_count(&self) -> usize {
        word_count(&self.content)
    }

    /// Apply a partial update. Returns true if any field changed; only then
    /// is `updated_at` moved.
    pub fn apply(&mut self, patch: &EssayPatch) -> bool {
        let mut changed = false;
        if let Some(content) = &patch.content {
            changed |= *content != self.content;
            self.content.clone_from(content);
        }
        if let Some(title) = &patch.title {
            changed |= *title != self.title;
            self.title.clone_from(title);
        }
        if let Some(prompt) = &patch.prompt {
            changed |= *prompt != self.prompt;
            self.prompt.clone_from(prompt);
        }
        if changed {
            self.updated_at = jiff::Timestamp::now();
        }
        changed
    }
}

/// Partial update of an essay. `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EssayPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl EssayPatch {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.title.is_none() && self.prompt.is_none()
    }
}

/// Number of whitespace-delimited, non-empty tokens.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// The in-memory, editable copy of an essay's text.
///
/// Changes stay local until the caller saves explicitly.
#[derive(Debug, Clone, Default)]
pub struct EssayBuffer {
    content: String,
    word_limit: Option<u32>,
    dirty: bool,
}

impl EssayBuffer {
    pub fn new(content: impl Into<String>, word_limit: Option<u32>) -> Self {
        Self {
            content: content.into(),
            word_limit,
            dirty: false,
        }
    }

    pub fn from_essay(essay: &Essay) -> Self {
        Self::new(essay.content.clone(), essay.word_limit)
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Replace the whole text, as typing or an accepted proposal does.
    pub fn set_content(&mut self, content: impl Into<String>) {
        let content = content.into();
        if content != self.content {
            self.content = content;
            self.dirty = true;
        }
    }

    pub fn word_count(&self) -> usize {
        word_count(&self.content)
    }

    pub fn word_limit(&self) -> Option<u32> {
        self.word_limit
    }

    pub fn set_word_limit(&mut self, limit: Option<u32>) {
        self.word_limit = limit;
    }

    pub fn is_over_limit(&self) -> bool {
        self.word_limit
            .is_some_and(|limit| self.word_count() > limit as usize)
    }

    /// Words left before the limit; negative once over it.
    pub fn remaining_words(&self) -> Option<i64> {
        self.word_limit
            .map(|limit| i64::from(limit) - self.word_count() as i64)
    }

    /// True when the buffer holds changes not yet saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    pub fn to_patch(&self) -> EssayPatch {
        EssayPatch::content(self.content.clone())
    }
}
