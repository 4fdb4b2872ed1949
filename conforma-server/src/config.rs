//! Env-driven server configuration.

use std::env;

use conforma_auth::tokens::DEFAULT_TTL_SECS;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    /// Optional initial super-admin, created at startup when both
    /// are set and the email is not taken yet.
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let host = env::var("HTTP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("HTTP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);
        let jwt_secret =
            env::var("AUTH_JWT_SECRET").unwrap_or_else(|_| "dev-secret".to_string());
        let token_ttl_secs = env::var("AUTH_TOKEN_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TTL_SECS);

        Self {
            host,
            port,
            jwt_secret,
            token_ttl_secs,
            admin_email: env::var("ADMIN_EMAIL").ok(),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
