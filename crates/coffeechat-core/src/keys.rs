//! S3 key/path conventions.
//!
//! Pure string functions. These define the canonical layout of objects in
//! the CoffeeChat bucket.

use uuid::Uuid;

pub fn chat_session(user_id: Uuid, application_id: Uuid) -> String {
    format!("chat-sessions/{user_id}/{application_id}.json")
}

pub fn essay(user_id: Uuid, id: Uuid) -> String {
    format!("essays/{user_id}/{id}.json")
}

pub fn profile(user_id: Uuid) -> String {
    format!("profiles/{user_id}.json")
}

pub fn organization(id: Uuid) -> String {
    format!("organizations/{id}.json")
}

pub const ORGANIZATIONS_PREFIX: &str = "organizations/";

/// Name index over every organization record.
pub const ORGANIZATION_INDEX: &str = "organization-index.json";
