use devcamper_core::query::DefaultOrder;

use crate::auth::jwt::JwtConfig;

/// Default lifetime of a password reset token, in minutes.
const DEFAULT_RESET_TOKEN_EXPIRY_MINS: i64 = 10;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Sort order of list endpoints when the client sends no `sort`.
    pub default_order: DefaultOrder,
    /// Mark the `token` cookie `Secure` (enable behind HTTPS).
    pub cookie_secure: bool,
    /// Lifetime of a password reset token in minutes (default: `10`).
    pub reset_token_expiry_mins: i64,
    /// Base URL used to build password reset links in emails.
    pub public_url: String,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                  |
    /// |---------------------------|--------------------------|
    /// | `HOST`                    | `0.0.0.0`                |
    /// | `PORT`                    | `5000`                   |
    /// | `CORS_ORIGINS`            | `http://localhost:3000`  |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                     |
    /// | `LIST_DEFAULT_ORDER`      | `oldest`                 |
    /// | `COOKIE_SECURE`           | `false`                  |
    /// | `RESET_TOKEN_EXPIRY_MINS` | `10`                     |
    /// | `PUBLIC_URL`              | `http://localhost:5000`  |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let default_order: DefaultOrder = std::env::var("LIST_DEFAULT_ORDER")
            .unwrap_or_else(|_| "oldest".into())
            .parse()
            .unwrap_or_else(|e| panic!("LIST_DEFAULT_ORDER: {e}"));

        let cookie_secure: bool = std::env::var("COOKIE_SECURE")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("COOKIE_SECURE must be 'true' or 'false'");

        let reset_token_expiry_mins: i64 = std::env::var("RESET_TOKEN_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_RESET_TOKEN_EXPIRY_MINS.to_string())
            .parse()
            .expect("RESET_TOKEN_EXPIRY_MINS must be a valid i64");

        let public_url = std::env::var("PUBLIC_URL")
            .unwrap_or_else(|_| format!("http://localhost:{port}"))
            .trim_end_matches('/')
            .to_string();

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            default_order,
            cookie_secure,
            reset_token_expiry_mins,
            public_url,
            jwt,
        }
    }
}
