use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// When unset the listing cache lives in process memory.
    pub redis_url: Option<String>,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub s3_region: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    /// Base URL under which stored uploads are publicly reachable.
    pub uploads_public_base_url: String,
    pub form_token_secret: String,
    pub form_token_ttl_secs: i64,
    pub admin_username: String,
    pub admin_password: String,
    /// Absolute origin of this service, used in embeddable form markup.
    pub public_base_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let s3_bucket = require_env("S3_BUCKET")?;
        let s3_endpoint = require_env("S3_ENDPOINT")?;
        let uploads_public_base_url = optional_env("UPLOADS_PUBLIC_BASE_URL").unwrap_or_else(|| {
            format!("{}/{}", s3_endpoint.trim_end_matches('/'), s3_bucket)
        });

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: optional_env("REDIS_URL"),
            s3_region: optional_env("S3_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            uploads_public_base_url,
            s3_bucket,
            s3_endpoint,
            form_token_secret: require_env("FORM_TOKEN_SECRET")?,
            form_token_ttl_secs: optional_env("FORM_TOKEN_TTL_SECS")
                .unwrap_or_else(|| "86400".to_string())
                .parse::<i64>()
                .context("FORM_TOKEN_TTL_SECS must be a whole number of seconds")?,
            admin_username: require_env("ADMIN_USERNAME")?,
            admin_password: require_env("ADMIN_PASSWORD")?,
            public_base_url: optional_env("PUBLIC_BASE_URL").unwrap_or_default(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
