//! Academic schedule gateway.
//!
//! ```text
//! Client POST {prefix}/{groups,teachers,schedule,announces}
//!     → http::server        request id, trace, content type, metrics
//!     → http::request       validate query        (invalid → 400, no upstream call)
//!     → resilience::timeouts bounded context       (15 s, cancelled on disconnect)
//!     → source::SourceClient one upstream call     (HttpSourceClient → upstream)
//!     → http::outcome        classify result
//!     → http::response       status + JSON body
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use schedule_gateway::config::{load_config, override_bind, GatewayConfig};
use schedule_gateway::lifecycle::{wait_for_shutdown, Shutdown};
use schedule_gateway::observability::{init_tracing, metrics};
use schedule_gateway::{HttpServer, HttpSourceClient};

#[derive(Parser)]
#[command(name = "schedule-gateway")]
#[command(about = "HTTP gateway for academic schedule queries", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    let config = override_bind(config, args.bind)?;

    init_tracing(&config.observability.log_level);

    tracing::info!("schedule-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        prefix = %config.api.path_prefix,
        upstream = %config.upstream.base_url,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let source = HttpSourceClient::new(&config.upstream)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Arc::new(Shutdown::new());
    let server_shutdown = shutdown.subscribe();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        signal_shutdown.trigger_after(wait_for_shutdown()).await;
    });

    let server = HttpServer::new(config, Arc::new(source));
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
