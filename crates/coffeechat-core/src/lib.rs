//! coffeechat-core
//!
//! Pure domain types for the essay assistant: chat messages and their
//! attachments, sessions, essays, the edit-proposal reconciler, and the
//! storage key layout. No AWS SDK dependency.

pub mod directory;
pub mod error;
pub mod keys;
pub mod models;
pub mod proposal;
