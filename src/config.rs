use crate::session::DEFAULT_HISTORY_KEY;
use log::warn;
use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreType {
    Memory,
    File,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub port: u16,
    pub store_type: StoreType,
    pub store_file_path: String,
    pub history_key: String,
    pub rng_seed: Option<u64>,
    pub gradient_duration_ms: u64,
    pub notification_duration_ms: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let number = |key: &str, default: u64| {
            lookup(key).and_then(|v| v.parse().ok()).unwrap_or(default)
        };
        Self {
            // Server
            bind_address: lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT").and_then(|v| v.parse().ok()).unwrap_or(8080),
            // History storage
            store_type: match lookup("STORE_TYPE").as_deref() {
                None | Some("memory") => StoreType::Memory,
                Some("file") => StoreType::File,
                Some(other) => {
                    warn!("Unknown STORE_TYPE '{}', using memory", other);
                    StoreType::Memory
                }
            },
            store_file_path: lookup("STORE_FILE_PATH")
                .unwrap_or_else(|| "color_history.json".to_string()),
            history_key: lookup("HISTORY_KEY").unwrap_or_else(|| DEFAULT_HISTORY_KEY.to_string()),
            rng_seed: lookup("RNG_SEED").and_then(|v| v.parse().ok()),
            // Page effects
            gradient_duration_ms: number("GRADIENT_DURATION_MS", 3000),
            notification_duration_ms: number("NOTIFICATION_DURATION_MS", 2000),
        }
    }
}
