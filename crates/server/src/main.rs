//! Folio server entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{Router, extract::DefaultBodyLimit};
use folio_api::AppState;
use folio_common::{CacheStore, Config, LocalStorage, MemoryCacheStore, RedisCacheStore};
use folio_core::{AuthClient, ContentCache, SessionService, SessionVerifier};
use folio_web::{SiteInfo, WebState};
use fred::prelude::*;
use tokio::signal;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Upper bound for any request body. Admin uploads set their own limit below this.
const MAX_BODY_BYTES: usize = 52 * 1024 * 1024;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

/// Build the content cache, shared through Redis when configured.
async fn connect_cache(config: &Config) -> anyhow::Result<ContentCache> {
    let Some(url) = config.cache.redis_url.as_deref() else {
        info!("Using in-process content cache");
        return Ok(ContentCache::new(Arc::new(MemoryCacheStore::new())));
    };

    let redis_config = fred::types::config::Config::from_url(url)?;
    let client = fred::clients::Client::new(redis_config, None, None, None);
    client.connect();
    client.wait_for_connect().await?;
    info!("Connected to Redis content cache");

    let store: Arc<dyn CacheStore> = Arc::new(RedisCacheStore::new(
        Arc::new(client),
        config.cache.prefix.clone(),
    ));
    Ok(ContentCache::new(store))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting folio server...");

    let config = Config::load()?;

    let db = folio_db::init(&config).await?;
    info!("Connected to database");
    let service_db = folio_db::init_service(&config).await?;

    if config.database.run_migrations {
        info!("Running database migrations...");
        folio_db::migrate(&db).await?;
        info!("Migrations completed");
    }

    let cache = connect_cache(&config).await?;

    let storage = Arc::new(LocalStorage::new(
        config.storage.base_path.clone(),
        config.storage.base_url.clone(),
    ));

    let auth_client = AuthClient::from_config(&config.auth)?;
    if auth_client.is_none() {
        warn!("No auth service url configured, expired sessions will not be refreshed");
    }
    let session_service =
        SessionService::new(SessionVerifier::from_config(&config.auth), auth_client);

    let state = AppState::new(
        Arc::new(db),
        Arc::new(service_db),
        cache,
        storage,
        session_service,
    );
    let web_state = WebState {
        app: state.clone(),
        site: SiteInfo::new(config.server.site_name.clone(), &config.server.url),
    };

    let app = Router::new()
        .nest("/api", folio_api::app(state))
        .nest_service(
            config.storage.base_url.as_str(),
            ServeDir::new(&config.storage.base_path),
        )
        .nest_service("/static", ServeDir::new("static"))
        .merge(folio_web::app(web_state))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
