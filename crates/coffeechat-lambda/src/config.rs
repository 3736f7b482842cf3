use std::env;

use eyre::{WrapErr, eyre};

pub const DEFAULT_BUCKET: &str = "coffeechat";
pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_MODEL_ID: &str = "us.anthropic.claude-sonnet-4-20250514-v1:0";

/// Service settings, read once at startup.
#[derive(Clone)]
pub struct ServiceConfig {
    pub bucket: String,
    pub region: String,
    pub model_id: String,
    pub max_tokens: i32,
    pub jwt_secret: String,
}

impl ServiceConfig {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let max_tokens: i32 = match lookup("COFFEECHAT_MAX_TOKENS") {
            Some(raw) => raw
                .trim()
                .parse()
                .wrap_err_with(|| format!("COFFEECHAT_MAX_TOKENS is not a number: {raw:?}"))?,
            None => coffeechat_bedrock::gateway::DEFAULT_MAX_TOKENS,
        };

        let jwt_secret = lookup("SUPABASE_JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| eyre!("SUPABASE_JWT_SECRET must be set"))?;

        Ok(Self {
            bucket: lookup("COFFEECHAT_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
            region: lookup("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            model_id: lookup("COFFEECHAT_MODEL_ID")
                .unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
            max_tokens,
            jwt_secret,
        })
    }
}

impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("model_id", &self.model_id)
            .field("max_tokens", &self.max_tokens)
            .field("jwt_secret", &"[REDACTED]")
            .finish()
    }
}
