use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {0}")]
    Missing(String),
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub node: NodeConfig,
    pub propagation: PropagationConfig,
    pub seed: SeedConfig,
    pub tokens: TokenConfig,
}

#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub bind_address: String,
    pub data_dir: String,
}

#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_ttl_seconds: u64,
    pub refresh_ttl_seconds: u64,
    /// How often the background task prunes expired revocation records.
    pub cleanup_interval_seconds: u64,
}

impl TokenConfig {
    /// TTL for revocation records written at logout.
    ///
    /// Always the refresh-token lifetime: the record must outlive the
    /// longest-lived token bound to the session, or a revoked session
    /// would read as valid again before its tokens expire naturally.
    pub fn revocation_ttl_seconds(&self) -> u64 {
        self.refresh_ttl_seconds
    }
}

#[derive(Debug, Clone)]
pub struct PropagationConfig {
    /// Base URL of the resource service's internal endpoints. `None`
    /// disables propagation (single-service development mode).
    pub resource_url: Option<String>,
    pub timeout_ms: u64,
}

/// Bootstrap admin account, applied at authority startup.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            access_secret: String::new(),
            refresh_secret: String::new(),
            access_ttl_seconds: 900,               // 15 minutes
            refresh_ttl_seconds: 1_209_600,        // 14 days
            cleanup_interval_seconds: 60,
        }
    }
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            resource_url: None,
            timeout_ms: 2000,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let bind_address =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string());

        let access_secret = std::env::var("ACCESS_TOKEN_SECRET")
            .map_err(|_| ConfigError::Missing("ACCESS_TOKEN_SECRET".to_string()))?;
        let refresh_secret = std::env::var("REFRESH_TOKEN_SECRET")
            .map_err(|_| ConfigError::Missing("REFRESH_TOKEN_SECRET".to_string()))?;

        let defaults = TokenConfig::default();
        let access_ttl_seconds = env_u64("ACCESS_TOKEN_TTL_SECONDS", defaults.access_ttl_seconds);
        let refresh_ttl_seconds =
            env_u64("REFRESH_TOKEN_TTL_SECONDS", defaults.refresh_ttl_seconds);
        let cleanup_interval_seconds =
            env_u64("CLEANUP_INTERVAL_SECONDS", defaults.cleanup_interval_seconds);

        let resource_url = std::env::var("RESOURCE_INTERNAL_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());
        let timeout_ms = env_u64("PROPAGATION_TIMEOUT_MS", 2000);

        let config = Config {
            node: NodeConfig {
                bind_address,
                data_dir,
            },
            tokens: TokenConfig {
                access_secret,
                refresh_secret,
                access_ttl_seconds,
                refresh_ttl_seconds,
                cleanup_interval_seconds,
            },
            propagation: PropagationConfig {
                resource_url,
                timeout_ms,
            },
            seed: SeedConfig {
                admin_username: std::env::var("SEED_ADMIN_USERNAME").ok(),
                admin_password: std::env::var("SEED_ADMIN_PASSWORD").ok(),
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let tokens = &self.tokens;

        if tokens.access_secret.trim().is_empty() || tokens.refresh_secret.trim().is_empty() {
            return Err(ConfigError::Validation(
                "token secrets cannot be empty".to_string(),
            ));
        }
        // One leaked secret must not be enough to forge both token types.
        if tokens.access_secret == tokens.refresh_secret {
            return Err(ConfigError::Validation(
                "ACCESS_TOKEN_SECRET and REFRESH_TOKEN_SECRET must differ".to_string(),
            ));
        }
        if tokens.access_ttl_seconds == 0 || tokens.refresh_ttl_seconds == 0 {
            return Err(ConfigError::Validation(
                "token TTLs must be greater than 0".to_string(),
            ));
        }
        if tokens.access_ttl_seconds >= tokens.refresh_ttl_seconds {
            return Err(ConfigError::Validation(
                "access-token TTL must be shorter than refresh-token TTL".to_string(),
            ));
        }
        if self.propagation.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "PROPAGATION_TIMEOUT_MS must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
