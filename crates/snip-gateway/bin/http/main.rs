mod cli;

use crate::cli::{LogFormatArg, StorageBackendArg, CLI};
use anyhow::Context;
use axum::http::HeaderValue;
use clap::Parser;
use snip_core::Shortener;
use snip_generator::Base62Generator;
use snip_gateway::{App, AppState};
use snip_shortener::{ShortenerService, ShortenerSettings};
use snip_storage::{InMemoryStore, RedisStore, StoreSettings};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormatArg) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormatArg::Text => builder.init(),
        LogFormatArg::Json => builder.json().init(),
    }
}

async fn build_shortener(config: &CLI) -> anyhow::Result<Arc<dyn Shortener>> {
    let settings = ShortenerSettings::builder()
        .max_attempts(config.max_attempts)
        .build();

    let shortener: Arc<dyn Shortener> = match config.storage {
        StorageBackendArg::InMemory => Arc::new(ShortenerService::with_settings(
            InMemoryStore::with_ttl(config.ttl()),
            Base62Generator::new(),
            settings,
        )),
        StorageBackendArg::Redis => {
            let store_settings = StoreSettings::builder()
                .ttl(config.ttl())
                .key_prefix(config.key_prefix.clone())
                .build();
            let store = RedisStore::connect(&config.redis_url, store_settings)
                .await
                .context("failed to connect to Redis")?;
            Arc::new(ShortenerService::with_settings(
                store,
                Base62Generator::new(),
                settings,
            ))
        }
    };
    Ok(shortener)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    info!("shutting down gateway server");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::try_parse()?;
    init_tracing(config.log_format);

    let base_url = config.base_url();
    info!(
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage,
        base_url = %base_url,
        ttl_secs = config.ttl_secs,
        max_attempts = config.max_attempts,
        "starting gateway server"
    );

    let allowed_origins = config
        .cors_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin.trim())
                .with_context(|| format!("invalid CORS origin {origin:?}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let shortener = build_shortener(&config).await?;
    let state = AppState::new(shortener, base_url).with_store_timeout(config.store_timeout());

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, App::service(state, &allowed_origins))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
