//! Gemini proxy server.
//!
//! ```text
//!     Browser                   ┌──────────────────────────────┐
//!     POST {prompt, config}     │          gemini-proxy         │
//!     ─────────────────────────▶│  handler → payload → client ─┼──▶ generativelanguage API
//!     ◀─────────────────────────│  response / error envelope ◀─┼─── (key held server-side)
//!                               └──────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use gemini_proxy::config::loader::{default_config, load_config};
use gemini_proxy::lifecycle::signals::spawn_signal_listener;
use gemini_proxy::observability::{logging, metrics};
use gemini_proxy::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "gemini-proxy")]
#[command(about = "Forwards prompts to the Gemini API with a server-held key", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => default_config()?,
    };

    logging::init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        model = %config.upstream.model,
        config_file = ?args.config,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: std::net::SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Arc::new(Shutdown::new());
    let server_shutdown = shutdown.subscribe();
    spawn_signal_listener(shutdown.clone());

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
