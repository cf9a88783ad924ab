pub mod loader;

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::components::GameMode;
use crate::game::{HAND_INTERVAL_START_MS, TICK_INTERVAL_MS, TIME_ATTACK_SECS};

// Global configuration instance with thread-safe access. Only the embedding
// layer reads this; the engine receives plain values at session start.
pub static CONFIG: once_cell::sync::Lazy<Arc<RwLock<Config>>> =
    once_cell::sync::Lazy::new(|| Arc::new(RwLock::new(Config::default())));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub game: GameConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub mode: GameMode,
    /// Fixed session seed; omit for a fresh seed per session.
    pub seed: Option<u32>,
    pub tick_ms: u64,
    pub hand_interval_ms: u64,
    pub time_attack_secs: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::default(),
            seed: None,
            tick_ms: TICK_INTERVAL_MS,
            hand_interval_ms: HAND_INTERVAL_START_MS,
            time_attack_secs: TIME_ATTACK_SECS,
        }
    }
}

impl Config {
    // Force reload the configuration from file
    pub fn force_reload() -> bool {
        if let Ok(new_config) = loader::load_config_from_file() {
            let mut config = CONFIG.write().unwrap();
            *config = new_config;
            true
        } else {
            false
        }
    }
}
