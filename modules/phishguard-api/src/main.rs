use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ai_client::Groq;
use phishguard_common::Config;
use phishguard_scanner::{Analyzer, Probes};

mod rest;

pub struct AppState {
    pub analyzer: Analyzer,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("phishguard_api=info".parse()?)
                .add_directive("phishguard_scanner=info".parse()?),
        )
        .init();

    let config = Config::from_env();

    let agent = Groq::new(config.groq_api_key.clone(), config.groq_model.clone());
    let analyzer = Analyzer::new(Probes::production(), Arc::new(agent));

    let state = Arc::new(AppState { analyzer });
    let app = rest::router(state);

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!(model = %config.groq_model, "PhishGuard API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
