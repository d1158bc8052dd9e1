use anyhow::Context;
use campus_data::Catalog;
use campus_model::GeminiModel;
use campus_server::{AppState, ServerConfig, build_router};
use clap::Parser;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = ServerConfig::parse();
    campus_telemetry::init_with_config(config.telemetry_config())?;

    let model = GeminiModel::new(config.gemini_config()?).context("failed to build Gemini client")?;
    let state = AppState::new(
        Arc::new(model),
        Arc::new(Catalog::builtin()),
        Some(config.tts_model.clone()),
        config.max_tool_rounds,
    )?;
    let app = build_router(state);

    let addr = config.listen_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await.with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, model = %config.model, "campus server listening");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    campus_telemetry::shutdown_telemetry();
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}
