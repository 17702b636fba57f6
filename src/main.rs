//! Server entry point: CLI parsing, logging setup, config load, accept loop.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cgi_httpd::config::{load_config, validate_config};
use cgi_httpd::{Server, ServerConfig};

#[derive(Debug, Parser)]
#[command(name = "cgi-httpd", about = "HTTP server with static file and CGI handling")]
struct Args {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the bind address (e.g. 127.0.0.1:9090).
    #[arg(long)]
    bind: Option<String>,

    /// Override the document root directory.
    #[arg(long)]
    root: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cgi_httpd=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }
    if let Some(root) = args.root {
        config.document_root = root;
    }
    validate_config(&config)?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        document_root = %config.document_root.display(),
        "configuration loaded"
    );

    let server = Server::new(config);
    let listener = server.bind()?;

    tokio::select! {
        result = server.run(listener) => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupt received, shutting down");
        }
    }

    Ok(())
}
