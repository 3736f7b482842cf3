//! coffeechat-editor
//!
//! The essay editor's view of a chat: turn-taking, edit proposals, and the
//! essay buffer, driven against the assistant and the stores.

pub mod error;
pub mod session;
