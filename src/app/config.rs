/// Centralized environment configuration.
/// All env vars and defaults are defined here.
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL. Required.
    pub database_url: String,

    /// Shared secret expected on identity-provider webhook deliveries.
    /// Default: dev-webhook-secret (override in production)
    pub webhook_secret: String,
}

impl Config {
    /// Build config from environment variables.
    /// Returns an error if required vars are missing.
    pub fn from_env() -> Result<Self, String> {
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set in .env")?;

        let webhook_secret = std::env::var("WEBHOOK_SECRET")
            .unwrap_or_else(|_| "dev-webhook-secret".to_string());

        Ok(Self {
            database_url,
            webhook_secret,
        })
    }

    /// Config for tests. Uses in-memory database URL.
    pub fn for_tests() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            webhook_secret: "test-webhook-secret".to_string(),
        }
    }
}
