use anyhow::Context;
use clap::Parser;
use config::ServerConfig;
use histcache::dispatch::{CacheDocument, ReadRequest};
use histcache::CacheService;
use log::info;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;

mod config;
mod http;

#[derive(Parser)]
#[command(author, version, about = "Dashboard visualization-state cache server")]
struct Args {
    /// Load the server config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value = "127.0.0.1:9000")]
    bind: SocketAddr,
    /// Directory holding the collection files
    #[arg(long, default_value = "data/cache")]
    storage_root: PathBuf,
    /// Seed every collection file with its default content and exit
    #[arg(long, default_value_t = false)]
    init: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let server_config = if let Some(path) = args.config {
        ServerConfig::load(path)?
    } else {
        ServerConfig::from_args(args.bind, args.storage_root)
    };

    let service = Arc::new(CacheService::new(server_config.storage_root.clone()));
    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating server runtime")?;

    if args.init {
        let document = runtime
            .block_on(service.read(ReadRequest {
                kind: Some("all".into()),
            }))
            .with_context(|| {
                format!(
                    "initializing collections under {}",
                    server_config.storage_root.display()
                )
            })?;
        if let CacheDocument::All(snapshot) = document {
            println!(
                "Cache ready at {} -> rois {}, histograms {}, zoom ranges {}",
                server_config.storage_root.display(),
                snapshot.rois.len(),
                snapshot.histograms.len(),
                snapshot.zoom_ranges.len()
            );
        }
        return Ok(());
    }

    runtime.block_on(serve(server_config, service))
}

async fn serve(server_config: ServerConfig, service: Arc<CacheService>) -> anyhow::Result<()> {
    let routes = http::routes(service);
    let (address, server) = warp::serve(routes)
        .try_bind_with_graceful_shutdown(server_config.bind, shutdown_signal())
        .with_context(|| format!("binding {}", server_config.bind))?;

    info!(
        "cache server listening on {} (storage root {})",
        address,
        server_config.storage_root.display()
    );
    server.await;
    info!("cache server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            log::error!("failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(err) => {
                log::error!("failed to listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
