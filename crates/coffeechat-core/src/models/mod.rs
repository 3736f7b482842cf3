pub mod chat_session;
pub mod context;
pub mod envelope;
pub mod essay;
pub mod message;
pub mod organization;
pub mod profile;
