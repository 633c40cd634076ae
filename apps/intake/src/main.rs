mod applications;
mod cache;
mod config;
mod db;
mod errors;
mod models;
mod response;
mod routes;
mod security;
mod state;
mod storage;
#[cfg(test)]
mod testing;
mod views;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::cache::{CacheStore, MemoryCache, RedisCache};
use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::applications::store::PgApplicationStore;
use crate::routes::build_router;
use crate::security::admin_gate::BasicAdminGate;
use crate::security::form_token::FormTokens;
use crate::state::AppState;
use crate::storage::S3UploadStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting job intake v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    run_migrations(&db).await?;

    // Listing cache: Redis when configured, otherwise in-process
    let cache: Arc<dyn CacheStore> = match &config.redis_url {
        Some(url) => {
            let client = redis::Client::open(url.as_str())?;
            info!("Redis client initialized");
            Arc::new(RedisCache::new(client))
        }
        None => {
            info!("REDIS_URL not set, caching listings in memory");
            Arc::new(MemoryCache::new())
        }
    };

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized (bucket: {})", config.s3_bucket);

    let tokens = FormTokens::new(
        config.form_token_secret.as_bytes(),
        chrono::Duration::seconds(config.form_token_ttl_secs),
    )
    .map_err(|e| anyhow::anyhow!("FORM_TOKEN_SECRET is unusable: {e}"))?;

    // Build app state
    let state = AppState {
        applications: Arc::new(PgApplicationStore::new(db)),
        uploads: Arc::new(S3UploadStore::new(
            s3,
            config.s3_bucket.clone(),
            config.uploads_public_base_url.clone(),
        )),
        cache,
        tokens,
        admin: Arc::new(BasicAdminGate::new(
            &config.admin_username,
            &config.admin_password,
        )),
        public_base_url: config.public_base_url.clone(),
    };

    // Build router. The form is embedded on other sites, so CORS stays open.
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "intake-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(config.s3_region.clone()))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    // MinIO serves buckets under the path, not as subdomains.
    let s3_config = aws_sdk_s3::config::Builder::from(&s3_config)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}
