use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use chat_relay::config::{Cli, Config};
use chat_relay::server::api::{build_router, AppState};
use chat_relay::upstream::client::RelayClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments.
    let cli = Cli::parse();

    // Initialize tracing/logging.
    let filter = if cli.verbose {
        "chat_relay=debug,tower_http=debug"
    } else {
        "chat_relay=info,tower_http=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with_target(true)
        .init();

    info!("chat-relay v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration.
    let config = Config::load(&cli.config)?;

    info!(
        base_url = config.upstream.base_url,
        api_key_env = config.upstream.api_key_env,
        "Configuration loaded"
    );

    // Resolve the upstream credential once at startup.
    let api_key = config.upstream.resolve_api_key()?;

    // Build the upstream client (single handle, reused across requests).
    let client = RelayClient::new(config.upstream.base_url.clone(), api_key)?;

    // Build application state.
    let state = Arc::new(AppState {
        backend: Arc::new(client),
    });

    // Build the HTTP router.
    let app = build_router(state);

    // Start the server.
    let listen_addr = cli.listen.unwrap_or_else(|| config.server.listen.clone());
    info!(addr = listen_addr, "Starting server");

    let listener = TcpListener::bind(&listen_addr).await?;
    info!("Listening on {listen_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
