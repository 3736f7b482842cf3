//! coffeechat-storage
//!
//! Persistence for chat sessions, essays, profiles and organizations.
//! S3-backed in production, with an in-memory store for tests and local
//! runs.

pub mod client;
pub mod directory;
pub mod error;
pub mod essays;
pub mod memory;
pub mod objects;
pub mod sessions;
pub mod state;

use aws_sdk_s3::Client;

/// A bucket plus the client used to reach it.
#[derive(Clone)]
pub struct S3Store {
    pub s3: Client,
    pub bucket: String,
}

impl S3Store {
    pub fn new(s3: Client, bucket: impl Into<String>) -> Self {
        Self {
            s3,
            bucket: bucket.into(),
        }
    }
}
