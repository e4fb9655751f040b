use std::path::PathBuf;

use shared::error::{AppError, AppResult, ErrorCode};

/// Default JWT secret, acceptable only outside production
const DEV_JWT_SECRET: &str = "bazaar-dev-secret-change-me";

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | WORK_DIR | /var/lib/bazaar | Working directory (database, logs) |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | JWT_SECRET | (dev default) | HMAC secret for session tokens |
/// | TOKEN_TTL_HOURS | 24 | Session token lifetime |
/// | GATEWAY_URL | https://api.razorpay.com/v1 | Payment gateway base URL |
/// | GATEWAY_KEY_ID | (unset) | Gateway API key id; unset = demo-only mode |
/// | GATEWAY_KEY_SECRET | (unset) | Gateway API key secret |
/// | CURRENCY | INR | Currency code for all amounts (minor units) |
/// | CACHE_TTL_SECS | 60 | Default response-cache TTL |
/// | CART_TTL_SECS | 21600 | Idle lifetime of a session cart |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/data/bazaar HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for database and log files
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// HMAC secret for session tokens
    pub jwt_secret: String,
    /// Session token lifetime in hours
    pub token_ttl_hours: i64,
    /// Payment gateway base URL
    pub gateway_url: String,
    /// Gateway API key id; `None` means demo-only mode
    pub gateway_key_id: Option<String>,
    /// Gateway API key secret
    pub gateway_key_secret: Option<String>,
    /// Currency code; all amounts are integer minor units of this currency
    pub currency: String,
    /// Default response-cache TTL in seconds
    pub cache_ttl_secs: u64,
    /// Idle lifetime of a session cart in seconds
    pub cart_ttl_secs: u64,
}

impl Config {
    /// Load configuration from environment variables,
    /// falling back to defaults for anything unset
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/bazaar".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            jwt_secret: std::env::var("JWT_SECRET").unwrap_or_else(|_| DEV_JWT_SECRET.into()),
            token_ttl_hours: std::env::var("TOKEN_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(24),
            gateway_url: std::env::var("GATEWAY_URL")
                .unwrap_or_else(|_| "https://api.razorpay.com/v1".into()),
            gateway_key_id: std::env::var("GATEWAY_KEY_ID").ok().filter(|v| !v.is_empty()),
            gateway_key_secret: std::env::var("GATEWAY_KEY_SECRET")
                .ok()
                .filter(|v| !v.is_empty()),
            currency: std::env::var("CURRENCY").unwrap_or_else(|_| "INR".into()),
            cache_ttl_secs: std::env::var("CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            cart_ttl_secs: std::env::var("CART_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(21_600),
        }
    }

    /// Validate configuration and prepare the working directory.
    ///
    /// Fatal on an unusable work dir or a default JWT secret in production.
    pub fn validate(&self) -> AppResult<()> {
        std::fs::create_dir_all(self.database_dir()).map_err(|e| {
            AppError::with_message(
                ErrorCode::ConfigError,
                format!("cannot create work dir {}: {}", self.work_dir, e),
            )
        })?;

        if self.is_production() && self.jwt_secret == DEV_JWT_SECRET {
            return Err(AppError::with_message(
                ErrorCode::ConfigError,
                "JWT_SECRET must be set in production",
            ));
        }

        if self.gateway_key_id.is_some() != self.gateway_key_secret.is_some() {
            return Err(AppError::with_message(
                ErrorCode::ConfigError,
                "GATEWAY_KEY_ID and GATEWAY_KEY_SECRET must be set together",
            ));
        }

        Ok(())
    }

    /// Directory holding the embedded database
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// Whether gateway credentials are configured
    pub fn gateway_configured(&self) -> bool {
        self.gateway_key_id.is_some() && self.gateway_key_secret.is_some()
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            work_dir: "/tmp/bazaar-test".into(),
            http_port: 3000,
            environment: "development".into(),
            jwt_secret: DEV_JWT_SECRET.into(),
            token_ttl_hours: 24,
            gateway_url: "https://gateway.example".into(),
            gateway_key_id: None,
            gateway_key_secret: None,
            currency: "INR".into(),
            cache_ttl_secs: 60,
            cart_ttl_secs: 21_600,
        }
    }

    #[test]
    fn test_default_secret_rejected_in_production() {
        let mut config = base_config();
        config.environment = "production".into();
        assert!(config.validate().is_err());

        config.jwt_secret = "an-actual-secret".into();
        let dir = tempfile::tempdir().unwrap();
        config.work_dir = dir.path().to_string_lossy().into_owned();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_gateway_credentials_must_pair() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = base_config();
        config.work_dir = dir.path().to_string_lossy().into_owned();
        config.gateway_key_id = Some("key".into());
        assert!(config.validate().is_err());

        config.gateway_key_secret = Some("secret".into());
        assert!(config.validate().is_ok());
        assert!(config.gateway_configured());
    }
}
