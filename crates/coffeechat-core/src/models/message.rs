use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// One turn of a conversation between the user and the assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Message {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub timestamp: jiff::Timestamp,
    /// Structured data produced by a tool call. Only assistant messages
    /// carry one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Role {
    User,
    Assistant,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::User,
            content: content.into(),
            timestamp: jiff::Timestamp::now(),
            attachment: None,
        }
    }

    pub fn assistant(content: impl Into<String>, attachment: Option<Attachment>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::Assistant,
            content: content.into(),
            timestamp: jiff::Timestamp::now(),
            attachment,
        }
    }

    pub fn pending_edit(&self) -> Option<&PendingEdit> {
        match &self.attachment {
            Some(Attachment::PendingEdit(edit)) => Some(edit),
            _ => None,
        }
    }
}

/// Tool-call output riding alongside an assistant message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export)]
pub enum Attachment {
    PendingEdit(PendingEdit),
    OrganizationBrief(OrganizationBrief),
    ProfileBrief(ProfileBrief),
    ResumeBrief(ResumeBrief),
    OrganizationLookup(OrganizationLookup),
}

/// A proposed replacement for the whole essay, awaiting accept/reject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PendingEdit {
    pub edit_kind: EditKind,
    pub proposed_content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum EditKind {
    Write,
    Modify,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrganizationBrief {
    pub analysis: String,
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProfileBrief {
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ResumeBrief {
    pub purpose: String,
    pub excerpt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrganizationLookup {
    pub name: String,
    pub purpose: String,
    pub info: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachment_serializes_with_type_tag() {
        let attachment = Attachment::PendingEdit(PendingEdit {
            edit_kind: EditKind::Modify,
            proposed_content: "Better.".to_string(),
        });
        let json = serde_json::to_value(&attachment).unwrap();
        assert_eq!(json["type"], "pending_edit");
        assert_eq!(json["edit_kind"], "modify");
        assert_eq!(json["proposed_content"], "Better.");
    }

    #[test]
    fn message_without_attachment_omits_field() {
        let json = serde_json::to_value(Message::user("hi")).unwrap();
        assert!(json.get("attachment").is_none());
        assert_eq!(json["role"], "user");
    }
}
