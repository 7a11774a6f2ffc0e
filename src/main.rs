//! Tenant router (v1)
//!
//! Edge service in front of a multi-tenant web application.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────────┐
//!                      │                  TENANT ROUTER                   │
//!                      │                                                  │
//!   Client Request     │  ┌────────┐   ┌─────────┐   ┌─────────────────┐  │
//!   ───────────────────┼─▶│  http  │──▶│ routing │──▶│  host router    │  │
//!                      │  │ server │   │ filter  │   │ (rules+session) │  │
//!                      │  └────────┘   └─────────┘   └───────┬─────────┘  │
//!                      │                                     │            │
//!   Redirect (307/308) │                   ┌─────────────────┴─────┐      │
//!   ◀──────────────────┼───────────────────┤  redirect │ rewrite   │      │
//!                      │                   └───────────┬───────────┘      │
//!                      │                               ▼                  │
//!   Client Response    │                        ┌─────────────┐           │   Upstream
//!   ◀──────────────────┼────────────────────────│   forward   │◀──────────┼── application
//!                      │                        └─────────────┘           │
//!                      └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use axum::http::{header, Request};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use tenant_router::config::{load_config, RouterConfig};
use tenant_router::observability::{logging, metrics};
use tenant_router::routing::{HostRouter, PathFilter};
use tenant_router::session::StaticSession;
use tenant_router::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "tenant-router")]
#[command(about = "Host-based routing edge for multi-tenant web apps", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "TENANT_ROUTER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the edge server (default)
    Serve,
    /// Print the routing decision for a host and path
    Explain {
        /// Host header value, e.g. demo.localhost:3000
        #[arg(long)]
        host: String,
        /// Path and query, e.g. /about?x=1
        #[arg(long, default_value = "/")]
        path: String,
        /// Route as a signed-out visitor
        #[arg(long)]
        anonymous: bool,
    },
    /// Validate the configuration and print it
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Explain {
            host,
            path,
            anonymous,
        } => explain(&config, &host, &path, anonymous).await,
        Commands::CheckConfig => {
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

async fn serve(config: RouterConfig) -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging(&config.observability)?;

    tracing::info!("tenant-router v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        root_domain = %config.tenancy.root_domain,
        deployment_suffix = %config.tenancy.deployment_suffix,
        upstream = %config.upstream.address,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let stop = shutdown.trigger_on_signal();

    let server = HttpServer::new(config)?;
    server.run(listener, stop).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn explain(
    config: &RouterConfig,
    host: &str,
    path: &str,
    anonymous: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (parts, _) = Request::builder()
        .uri(path)
        .header(header::HOST, host)
        .body(())?
        .into_parts();

    if !PathFilter::from_config(&config.filter).should_route(parts.uri.path()) {
        let output = serde_json::json!({ "rule": "filter", "decision": "pass_through" });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let router = HostRouter::from_config(config, Arc::new(StaticSession::new(!anonymous)));
    let routed = router.evaluate(&parts).await?;
    println!("{}", serde_json::to_string_pretty(&routed)?);
    Ok(())
}
