/// Configuration management for the API server
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 3000)
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `JWT_SECRET`: Secret key for JWT signing (required, at least 32 characters)
/// - `JWT_EXPIRATION_MINUTES`: Token lifetime (default: 60)
/// - `CORS_ORIGINS`: Comma-separated allowed origins (default: *)
/// - `SEED_DEMO_DATA`: Insert a demo user and tasks at startup (default: false)
/// - `SWEEP_INTERVAL_SECS` / `SWEEPER_ENABLED`: In-process sweeper settings
/// - `RUST_LOG` / `LOG_FORMAT`: Log filtering and format
///
/// # Example
///
/// ```no_run
/// use taskboard_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use std::env;
use taskboard_shared::auth::jwt::DEFAULT_EXPIRATION_MINUTES;
use taskboard_worker::config::{parse_bool, SweeperConfig};

/// Minimum accepted `JWT_SECRET` length
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT configuration
    pub jwt: JwtConfig,

    /// In-process due-date sweeper
    pub sweeper: SweeperConfig,

    /// Whether to seed demo data at startup
    pub seed_demo_data: bool,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for JWT signing
    ///
    /// Must be kept secret and be at least 32 bytes.
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// Token lifetime in minutes
    pub expiration_minutes: i64,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// A `.env` file in the working directory is read first if present.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing
    /// - Environment variables have invalid values
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_host = lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let api_port = lookup("API_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()?;

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse::<u32>()?;

        let jwt_secret = lookup("JWT_SECRET")
            .ok_or_else(|| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            anyhow::bail!("JWT_SECRET must be at least {} characters long", MIN_JWT_SECRET_LEN);
        }

        let expiration_minutes = match lookup("JWT_EXPIRATION_MINUTES") {
            Some(value) => value.parse::<i64>()?,
            None => DEFAULT_EXPIRATION_MINUTES,
        };

        if expiration_minutes < 1 {
            anyhow::bail!("JWT_EXPIRATION_MINUTES must be at least 1");
        }

        let seed_demo_data = match lookup("SEED_DEMO_DATA") {
            Some(value) => parse_bool(&value)
                .ok_or_else(|| anyhow::anyhow!("SEED_DEMO_DATA must be true or false, got '{}'", value))?,
            None => false,
        };

        let sweeper = SweeperConfig::from_lookup(&lookup)?;

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                cors_origins,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                expiration_minutes,
            },
            sweeper,
            seed_demo_data,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Whether CORS should allow any origin
    pub fn cors_allows_any(&self) -> bool {
        self.api.cors_origins.iter().any(|origin| origin == "*")
    }
}
