use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the secrets have sensible defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Public frontend base URL used when building share-link URLs.
    pub app_url: String,
    /// Optional Redis URL; when unset the server runs with the no-op cache.
    pub redis_url: Option<String>,
    /// Shared secret for identity-webhook signature verification.
    pub webhook_secret: String,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Required | Default                 |
    /// |------------------------|----------|-------------------------|
    /// | `HOST`                 | no       | `0.0.0.0`               |
    /// | `PORT`                 | no       | `3000`                  |
    /// | `CORS_ORIGINS`         | no       | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS` | no       | `30`                    |
    /// | `APP_URL`              | no       | `http://localhost:5173` |
    /// | `REDIS_URL`            | no       | --                      |
    /// | `WEBHOOK_SECRET`       | **yes**  | --                      |
    ///
    /// # Panics
    ///
    /// Panics on malformed numeric values or missing secrets; startup is
    /// the right time to fail on misconfiguration.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let app_url =
            std::env::var("APP_URL").unwrap_or_else(|_| "http://localhost:5173".into());

        let redis_url = std::env::var("REDIS_URL").ok();

        let webhook_secret = std::env::var("WEBHOOK_SECRET")
            .expect("WEBHOOK_SECRET must be set in the environment");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            app_url,
            redis_url,
            webhook_secret,
            jwt,
        }
    }
}
