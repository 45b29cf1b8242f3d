/// Sweeper configuration
///
/// # Environment Variables
///
/// - `SWEEP_INTERVAL_SECS`: Seconds between sweeps (default: 60, minimum: 1)
/// - `SWEEPER_ENABLED`: Whether to run the sweeper at all (default: true)
/// - `DATABASE_URL`: PostgreSQL connection string (standalone worker only)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (standalone worker only, default: 10)

use std::env;
use std::time::Duration;

/// Default time between sweeps
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Scheduling settings for the due-date sweeper
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweeperConfig {
    /// Whether the sweeper runs
    pub enabled: bool,

    /// Time between sweeps
    pub interval: Duration,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

impl SweeperConfig {
    /// Loads the sweeper settings from the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an unparseable value or the
    /// interval is zero.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads the sweeper settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let enabled = match lookup("SWEEPER_ENABLED") {
            Some(value) => parse_bool(&value)
                .ok_or_else(|| anyhow::anyhow!("SWEEPER_ENABLED must be true or false, got '{}'", value))?,
            None => true,
        };

        let interval_secs = match lookup("SWEEP_INTERVAL_SECS") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map_err(|e| anyhow::anyhow!("SWEEP_INTERVAL_SECS is invalid: {}", e))?,
            None => DEFAULT_SWEEP_INTERVAL.as_secs(),
        };

        if interval_secs == 0 {
            anyhow::bail!("SWEEP_INTERVAL_SECS must be at least 1");
        }

        Ok(Self {
            enabled,
            interval: Duration::from_secs(interval_secs),
        })
    }
}

/// Full configuration of the standalone worker binary
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// PostgreSQL connection URL
    pub database_url: String,

    /// Maximum number of pooled connections
    pub database_max_connections: u32,

    /// Sweeper scheduling
    pub sweeper: SweeperConfig,
}

impl WorkerConfig {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is missing or a value is invalid.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let database_max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse::<u32>()?;

        Ok(Self {
            database_url,
            database_max_connections,
            sweeper: SweeperConfig::from_lookup(lookup)?,
        })
    }
}

/// Parses the usual spellings of a boolean flag
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_sweeper_defaults() {
        let config = SweeperConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, SweeperConfig::default());
        assert!(config.enabled);
        assert_eq!(config.interval, Duration::from_secs(60));
    }

    #[test]
    fn test_sweeper_overrides() {
        let config = SweeperConfig::from_lookup(lookup(&[
            ("SWEEPER_ENABLED", "false"),
            ("SWEEP_INTERVAL_SECS", "5"),
        ]))
        .unwrap();

        assert!(!config.enabled);
        assert_eq!(config.interval, Duration::from_secs(5));
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let result = SweeperConfig::from_lookup(lookup(&[("SWEEP_INTERVAL_SECS", "0")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(SweeperConfig::from_lookup(lookup(&[("SWEEP_INTERVAL_SECS", "soon")])).is_err());
        assert!(SweeperConfig::from_lookup(lookup(&[("SWEEPER_ENABLED", "maybe")])).is_err());
    }

    #[test]
    fn test_worker_config_requires_database_url() {
        assert!(WorkerConfig::from_lookup(lookup(&[])).is_err());

        let config = WorkerConfig::from_lookup(lookup(&[(
            "DATABASE_URL",
            "postgresql://localhost/taskboard",
        )]))
        .unwrap();
        assert_eq!(config.database_max_connections, 10);
        assert_eq!(config.sweeper, SweeperConfig::default());
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool(""), None);
    }
}
