//! `region-nearby run`: start the forwarding server.
//!
//! Loads configuration from a file (explicit or auto-detected) or falls
//! back to built-in defaults, applies command-line overrides, builds the
//! downstream handler, and serves with connect info so every request
//! carries its peer address. A background loop hot-reloads the file.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::cli::RunArgs;
use crate::config::model::Config;
use crate::config::sources::{self, create_file_source};
use crate::config::{ConfigSource, ConfigVersion, Overrides};
use crate::error::RegionNearbyError;
use crate::handler::build_handler;
use crate::logging;
use crate::server::{self, AppState, HttpClient, LoadedConfig, Stats};

pub async fn execute(args: RunArgs) -> Result<(), RegionNearbyError> {
    logging::init(
        &args.log_level,
        logging::resolve_format(args.pretty, args.json),
    );

    #[cfg(feature = "sentry-integration")]
    let _sentry_guard = args
        .sentry_dsn
        .as_ref()
        .map(|dsn| crate::sentry_integration::init(dsn, args.sentry_environment.as_deref()));

    let overrides = Overrides {
        edge_region: args.edge_region.clone(),
        replica_regions: args.replica_regions.clone(),
        timeout: args.timeout,
    };

    let source = resolve_file_source(args.config.as_deref()).await?;
    let (config, version, source_name) = match &source {
        Some(source) => {
            let (config, version) = source.load().await?;
            (config, version, source.name())
        }
        None => {
            tracing::info!("no config file found, using defaults");
            let version = ConfigVersion::Hash(sources::sha256_hex(b"defaults"));
            (Config::default(), version, "defaults")
        }
    };
    let config = overrides.apply(config)?;

    let http_client = server::build_http_client();
    let handler = build_handler(&config, &http_client)?;

    tracing::info!(
        source = source_name,
        version = version.short(),
        downstream = handler.kind(),
        edge_region = config.edge_region.as_deref().unwrap_or("-"),
        replicas = config.replica_regions().len(),
        "config loaded"
    );

    let state = Arc::new(AppState {
        config: tokio::sync::RwLock::new(LoadedConfig {
            config: Arc::new(config),
            handler,
            version,
            source_name: source_name.to_string(),
            loaded_at: Instant::now(),
        }),
        http_client,
        start_time: Instant::now(),
        stats: Stats::new(),
    });

    // Dropping or signalling shutdown_tx stops the refresh loop
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    let refresh_handle = source.map(|source| {
        let refresh_state = Arc::clone(&state);
        let poll_interval = args.poll_interval;
        tokio::spawn(async move {
            config_refresh_loop(refresh_state, source, overrides, poll_interval, shutdown_rx).await;
        })
    });

    let router = server::build_router(state, args.max_body);
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(addr = %addr, "region-nearby started");

    let graceful_shutdown = async move {
        server::shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    };

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(graceful_shutdown)
    .await?;

    if let Some(handle) = refresh_handle {
        if let Err(e) = handle.await {
            tracing::error!(error = %e, "config refresh task failed");
        }
    }

    tracing::info!("region-nearby stopped");
    Ok(())
}

async fn resolve_file_source(
    explicit: Option<&Path>,
) -> Result<Option<Box<dyn ConfigSource>>, RegionNearbyError> {
    if let Some(path) = explicit {
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Err(RegionNearbyError::ConfigFileNotFound {
                path: path.to_path_buf(),
            });
        }
        return create_file_source(path).map(Some);
    }

    for name in &sources::CANDIDATES {
        let path = PathBuf::from(name);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::info!(path = %path.display(), "auto-detected config file");
            return create_file_source(&path).map(Some);
        }
    }

    Ok(None)
}

/// Load, override and build a handler in one step so a bad reload
/// leaves the running config untouched.
async fn reload(
    source: &dyn ConfigSource,
    overrides: &Overrides,
    client: &HttpClient,
) -> Result<LoadedConfig, RegionNearbyError> {
    let (config, version) = source.load().await?;
    let config = overrides.apply(config)?;
    let handler = build_handler(&config, client)?;
    Ok(LoadedConfig {
        config: Arc::new(config),
        handler,
        version,
        source_name: source.name().to_string(),
        loaded_at: Instant::now(),
    })
}

async fn config_refresh_loop(
    state: Arc<AppState>,
    source: Box<dyn ConfigSource>,
    overrides: Overrides,
    interval_secs: u64,
    mut shutdown: tokio::sync::watch::Receiver<bool>,
) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
    interval.tick().await; // Skip first immediate tick

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = shutdown.changed() => {
                tracing::debug!("config refresh loop shutting down");
                return;
            }
        }

        let current_version = state.config.read().await.version.clone();

        match source.has_changed(&current_version).await {
            Ok(true) => {
                tracing::info!("config change detected, reloading");
                match reload(source.as_ref(), &overrides, &state.http_client).await {
                    Ok(loaded) => {
                        let version = loaded.version.short().to_string();
                        let downstream = loaded.handler.kind();
                        *state.config.write().await = loaded;
                        state.stats.config_reloads.fetch_add(1, Ordering::Relaxed);
                        tracing::info!(version = %version, downstream, "config reloaded");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "config reload failed, keeping current config");
                    }
                }
            }
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(error = %e, "config change check failed");
            }
        }
    }
}
