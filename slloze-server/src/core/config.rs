use crate::auth::JwtConfig;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Purpose |
/// |----------|---------|---------|
/// | HTTP_PORT | 3000 | HTTP service port |
/// | GATEWAY_URL | http://localhost:4000 | Resource gateway base URL |
/// | GATEWAY_TOKEN | (unset) | Bearer credential for the gateway |
/// | ENVIRONMENT | development | Runtime environment |
/// | LOG_DIR | (unset) | Directory for rolling log files |
/// | JWT_SECRET | (generated in dev) | Token signing secret |
/// | JWT_EXPIRATION_MINUTES | 60 | Token lifetime |
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API port
    pub http_port: u16,
    /// Resource gateway base URL
    pub gateway_url: String,
    /// Bearer credential sent to the gateway, if any
    pub gateway_token: Option<String>,
    /// JWT configuration
    pub jwt: JwtConfig,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Log directory for file output
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from the environment, with defaults
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            gateway_url: std::env::var("GATEWAY_URL")
                .unwrap_or_else(|_| "http://localhost:4000".into()),
            gateway_token: std::env::var("GATEWAY_TOKEN").ok(),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
        }
    }

    /// Override selected values, mostly for tests
    pub fn with_overrides(http_port: u16, gateway_url: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.http_port = http_port;
        config.gateway_url = gateway_url.into();
        config
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
