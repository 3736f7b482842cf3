//! coffeechat-calendar
//!
//! Google Calendar access for club events: listing what is coming up and
//! adding an organization's event to the user's calendar.

pub mod client;
pub mod error;
pub mod events;
pub mod token;
