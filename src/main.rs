use anyhow::Context;
use clap::Parser;
use register_gate::utils::logger;
use register_gate::{create_app, AppState, CliConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting register-gate");

    let config = match cli.load_app_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };
    tracing::debug!("Auth service: {}", config.auth.url);

    let state = AppState::from_config(&config).context("failed to build auth clients")?;
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(config.bind())
        .await
        .with_context(|| format!("failed to bind {}", config.bind()))?;
    tracing::info!("✅ Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
