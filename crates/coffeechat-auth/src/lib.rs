//! coffeechat-auth
//!
//! Verification of Supabase-issued session tokens.

pub mod error;
pub mod jwt;
