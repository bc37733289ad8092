// Logging setup, powered by tracing-subscriber

use tracing_subscriber::EnvFilter;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human readable: timestamp LEVEL target - message
    Compact,
    /// JSON Lines for log shippers
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "json" | "jsonl" => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

/// Build the `EnvFilter` from the base level plus noisy-crate overrides.
///
/// `RUST_LOG` wins when set.
fn build_env_filter(level: &str) -> anyhow::Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let mut directives = vec![level.to_string()];

    // Suppress noisy third-party crates
    let noisy: &[(&str, &str)] = &[
        ("sqlx", "warn"),
        ("hyper", "warn"),
        ("h2", "warn"),
        ("tower_http", "info"),
    ];
    for (target, target_level) in noisy {
        directives.push(format!("{}={}", target, target_level));
    }

    let filter = directives.join(",");
    EnvFilter::try_new(&filter).map_err(|e| anyhow::anyhow!("Invalid tracing filter '{}': {}", filter, e))
}

/// Install the global subscriber
pub fn init_logging(level: &str, format: &str) -> anyhow::Result<()> {
    let filter = build_env_filter(level)?;

    let result = match LogFormat::parse(format) {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
        LogFormat::Compact => tracing_subscriber::fmt()
            .compact()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}
