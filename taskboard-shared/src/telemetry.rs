//! Tracing subscriber setup shared by the binaries
//!
//! Filtering follows `RUST_LOG` when set and falls back to the binary's
//! default directives. `LOG_FORMAT=json` switches to JSON lines.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output format for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,

    /// One JSON object per line
    Json,
}

impl LogFormat {
    /// Reads `LOG_FORMAT`; anything other than `json` means text
    pub fn from_env() -> Self {
        match std::env::var("LOG_FORMAT") {
            Ok(value) if value.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

/// Installs the global tracing subscriber
///
/// # Errors
///
/// Fails if a global subscriber was already installed.
pub fn init_tracing(default_filter: &str) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let json = LogFormat::from_env() == LogFormat::Json;

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(|| fmt::layer()))
        .try_init()
}
