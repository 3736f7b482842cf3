use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::message::{
    Attachment, Message, OrganizationBrief, OrganizationLookup, PendingEdit, ProfileBrief,
    ResumeBrief,
};

/// Normalized reply from the assistant gateway.
///
/// Each attachment kind has its own slot; when a reply invokes the same
/// tool twice the later call wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AssistantEnvelope {
    pub response_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub essay_edit: Option<PendingEdit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_brief: Option<OrganizationBrief>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_brief: Option<ProfileBrief>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_brief: Option<ResumeBrief>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_lookup: Option<OrganizationLookup>,
}

impl AssistantEnvelope {
    pub fn text(response_text: impl Into<String>) -> Self {
        Self {
            response_text: response_text.into(),
            ..Self::default()
        }
    }

    /// Store an attachment in its kind's slot, replacing any earlier one.
    pub fn set_attachment(&mut self, attachment: Attachment) {
        match attachment {
            Attachment::PendingEdit(edit) => self.essay_edit = Some(edit),
            Attachment::OrganizationBrief(brief) => self.organization_brief = Some(brief),
            Attachment::ProfileBrief(brief) => self.profile_brief = Some(brief),
            Attachment::ResumeBrief(brief) => self.resume_brief = Some(brief),
            Attachment::OrganizationLookup(lookup) => self.organization_lookup = Some(lookup),
        }
    }

    /// The attachment a chat message keeps. A message holds one, so the
    /// actionable essay edit wins, then the organization analysis, the
    /// organization lookup, the resume, and finally the profile card.
    pub fn primary_attachment(&self) -> Option<Attachment> {
        if let Some(edit) = &self.essay_edit {
            return Some(Attachment::PendingEdit(edit.clone()));
        }
        if let Some(brief) = &self.organization_brief {
            return Some(Attachment::OrganizationBrief(brief.clone()));
        }
        if let Some(lookup) = &self.organization_lookup {
            return Some(Attachment::OrganizationLookup(lookup.clone()));
        }
        if let Some(brief) = &self.resume_brief {
            return Some(Attachment::ResumeBrief(brief.clone()));
        }
        self.profile_brief.clone().map(Attachment::ProfileBrief)
    }

    pub fn into_message(self) -> Message {
        let attachment = self.primary_attachment();
        Message::assistant(self.response_text, attachment)
    }
}
