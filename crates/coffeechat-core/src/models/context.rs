use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Profile section used when the user's profile cannot be found or read.
pub const NO_PROFILE: &str = "No user profile available.";

/// Organization section used when no organization matches the application.
pub const NO_ORGANIZATION: &str = "No organization information found.";

/// What the editor knows when it asks for a reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ContextRequest {
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub application_title: Option<String>,
    #[serde(default)]
    pub essay_title: Option<String>,
    #[serde(default)]
    pub essay_prompt: Option<String>,
    #[serde(default)]
    pub essay_content: Option<String>,
    #[serde(default)]
    pub selected_text: Option<String>,
}

/// Prompt context for a single chat turn. Built fresh each turn and never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextBundle {
    pub profile: String,
    pub organization: String,
    pub essay: String,
    /// Raw resume text from the profile, when one exists.
    pub resume: Option<String>,
}

impl ContextBundle {
    pub fn has_profile(&self) -> bool {
        self.profile != NO_PROFILE
    }

    pub fn has_organization(&self) -> bool {
        self.organization != NO_ORGANIZATION
    }
}
