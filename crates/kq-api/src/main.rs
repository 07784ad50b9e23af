//! KubeQuery API — natural-language cluster inspection server.
//!
//! Accepts a free-text question over HTTP, translates it into a structured
//! read-only cluster query via Bedrock, executes it against the control
//! plane, and answers in plain language.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use kq_api::cluster::kube::KubeCluster;
use kq_api::config::ApiConfig;
use kq_api::interpret::bedrock::{BedrockConfig, BedrockInterpreter};
use kq_api::routes;
use kq_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "kq-api starting");

    let config = ApiConfig::from_env();

    let cluster = KubeCluster::connect(config.cluster_timeout()).await?;
    tracing::info!("cluster control-plane client initialized");

    let aws = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .load()
        .await;
    let interpreter = BedrockInterpreter::new(
        aws_sdk_bedrockruntime::Client::new(&aws),
        BedrockConfig::from_env(),
    );

    let state = AppState::new(Arc::new(cluster), Arc::new(interpreter));
    let app = routes::build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
