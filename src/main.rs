//! Sightline HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use sightline::catalog::RestCatalogClient;
use sightline::config::Config;
use sightline::encoder::{EncoderConfig, FacadeEncoder};
use sightline::gateway::{HandlerState, create_router_with_state};
use sightline::refstore::QdrantReferenceStore;
use sightline::scan::ScanPipeline;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!(
        r#"
███████╗██╗ ██████╗ ██╗  ██╗████████╗██╗     ██╗███╗   ██╗███████╗
██╔════╝██║██╔════╝ ██║  ██║╚══██╔══╝██║     ██║████╗  ██║██╔════╝
███████╗██║██║  ███╗███████║   ██║   ██║     ██║██╔██╗ ██║█████╗
╚════██║██║██║   ██║██╔══██║   ██║   ██║     ██║██║╚██╗██║██╔══╝
███████║██║╚██████╔╝██║  ██║   ██║   ███████╗██║██║ ╚████║███████╗
╚══════╝╚═╝ ╚═════╝ ╚═╝  ╚═╝   ╚═╝   ╚══════╝╚═╝╚═╝  ╚═══╝╚══════╝

        POINT. SHOOT. KNOW THE BUILDING.
"#
    );

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        catalog_url = %config.catalog_url,
        qdrant_url = %config.qdrant_url,
        "Sightline starting"
    );

    let encoder_config = if let Some(path) = &config.model_path {
        EncoderConfig::new(path.clone())
    } else {
        tracing::warn!("No SIGHTLINE_MODEL_PATH configured, running encoder in stub mode");
        EncoderConfig::stub()
    };
    let encoder = Arc::new(FacadeEncoder::load(encoder_config)?);

    let catalog = RestCatalogClient::new(config.catalog_url.clone());
    let refs = QdrantReferenceStore::new(&config.qdrant_url).await?;

    if let Err(e) = catalog.health_check().await {
        tracing::warn!(error = %e, "Catalog service not reachable at startup");
    }
    if let Err(e) = refs.health_check().await {
        tracing::warn!(error = %e, "Reference store not reachable at startup");
    }

    let pipeline = Arc::new(ScanPipeline::with_ref_cache(
        encoder,
        catalog,
        refs,
        config.matching.clone(),
        config.ref_cache_capacity,
        Duration::from_secs(config.ref_cache_ttl_secs),
    ));

    let state = HandlerState::new(pipeline);
    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Sightline shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
