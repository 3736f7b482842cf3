//! coffeechat-bedrock
//!
//! Prompt context assembly, the assistant tool catalog, and the Bedrock
//! Converse gateway that turns a chat turn into an [`AssistantEnvelope`].
//!
//! [`AssistantEnvelope`]: coffeechat_core::models::envelope::AssistantEnvelope

pub mod client;
pub mod context;
pub mod document;
pub mod error;
pub mod gateway;
pub mod tools;
