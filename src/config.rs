//! Store configuration, read from the environment by the CLI.

use log::warn;
use std::env;
use std::time::Duration;

/// Environment variable holding the simulated latency in milliseconds.
pub const LATENCY_ENV: &str = "SPLITEASE_LATENCY_MS";

/// Environment variable enabling strict reference checks (`1` or `true`).
pub const STRICT_REFS_ENV: &str = "SPLITEASE_STRICT_REFS";

/// How the store treats allocation references it cannot resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReferencePolicy {
    /// Dangling item keys, unknown members and odd item data are accepted
    /// as-is; the split engine skips what it cannot resolve.
    #[default]
    Lenient,

    /// The store rejects writes that leave dangling references or invalid
    /// items, and prunes allocations of items removed by an update.
    Strict,
}

/// Settings for a [`crate::ReceiptStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreConfig {
    /// Simulated round-trip delay applied before every store call.
    pub latency: Option<Duration>,

    pub references: ReferencePolicy,
}

impl StoreConfig {
    pub fn strict() -> Self {
        StoreConfig {
            references: ReferencePolicy::Strict,
            ..Self::default()
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Reads `SPLITEASE_LATENCY_MS` and `SPLITEASE_STRICT_REFS`.
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_vars(
            env::var(LATENCY_ENV).ok().as_deref(),
            env::var(STRICT_REFS_ENV).ok().as_deref(),
        )
    }

    fn from_vars(latency_ms: Option<&str>, strict: Option<&str>) -> Self {
        let mut config = StoreConfig::default();

        if let Some(raw) = latency_ms {
            match raw.trim().parse::<u64>() {
                Ok(0) => {}
                Ok(ms) => config.latency = Some(Duration::from_millis(ms)),
                Err(_) => warn!("Ignoring invalid {}={:?}", LATENCY_ENV, raw),
            }
        }

        if let Some(raw) = strict {
            match raw.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" => config.references = ReferencePolicy::Strict,
                "" | "0" | "false" | "no" => {}
                _ => warn!("Ignoring invalid {}={:?}", STRICT_REFS_ENV, raw),
            }
        }

        config
    }
}
