use std::env;
use std::str::FromStr;

use crate::fabric::{FabricConfig, FaultPolicy};

/// Config holds the runtime configuration of the `fabric-synth` binary
#[derive(Debug, Clone)]
pub struct Config {
    pub fabric: FabricConfig,
    pub seed_faults: bool,
    pub strict: bool,
    pub output_path: String,
    pub history_points: usize,
    pub history_step_secs: i64,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn load() -> Self {
        let defaults = FabricConfig::default();
        Self {
            fabric: FabricConfig {
                core_count: get_env_parsed("FABRIC_CORE_COUNT", defaults.core_count),
                spine_count: get_env_parsed("FABRIC_SPINE_COUNT", defaults.spine_count),
                tor_count: get_env_parsed("FABRIC_TOR_COUNT", defaults.tor_count),
                endpoint_count: get_env_parsed("FABRIC_ENDPOINT_COUNT", defaults.endpoint_count),
            },
            seed_faults: get_env_parsed("FABRIC_SEED_FAULTS", true),
            strict: get_env_parsed("FABRIC_STRICT", false),
            output_path: get_env("FABRIC_OUTPUT", ""),
            history_points: get_env_parsed("FABRIC_HISTORY_POINTS", 0),
            history_step_secs: get_env_parsed("FABRIC_HISTORY_STEP_SECS", 60),
        }
    }

    pub fn fault_policy(&self) -> FaultPolicy {
        if self.seed_faults {
            FaultPolicy::default()
        } else {
            FaultPolicy::none()
        }
    }
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an env var, falling back to `default` when unset or malformed
fn get_env_parsed<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid {}={:?}, using default", key, raw);
            default
        }),
        Err(_) => default,
    }
}
