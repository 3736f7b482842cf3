use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use coffeechat_auth::jwt::TokenVerifier;
use coffeechat_bedrock::context::ContextAggregator;
use coffeechat_bedrock::gateway::BedrockGateway;
use coffeechat_storage::S3Store;

mod config;
mod error;
mod middleware;
mod routes;
mod state;

use config::ServiceConfig;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging for CloudWatch
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = ServiceConfig::from_env()?;
    tracing::info!(?config, "starting coffeechat api");

    let s3 = coffeechat_storage::client::build_client_with_region(&config.region).await;
    let store = Arc::new(S3Store::new(s3, config.bucket.clone()));

    let bedrock = coffeechat_bedrock::client::build_client(Some(&config.region)).await;
    let gateway = BedrockGateway::new(bedrock, config.model_id.clone())
        .with_max_tokens(config.max_tokens);

    let state = AppState {
        sessions: store.clone(),
        essays: store.clone(),
        context: ContextAggregator::new(store.clone(), store),
        assistant: Arc::new(gateway),
        verifier: Arc::new(TokenVerifier::new(config.jwt_secret.as_bytes())),
    };

    lambda_http::run(routes::router(state))
        .await
        .map_err(|e| eyre::eyre!(e))
}
