//! Simulation settings loaded from the process environment.
use std::env;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::dirs;

#[derive(Clone, Debug)]
pub struct SimConfig {
    pub game_seed: u64,
    /// Ticks to simulate.
    pub ticks: u64,
    /// Side length of the square sandbox map.
    pub map_size: u32,
    /// Directory with `config.toml` / `abilities.ron` overrides.
    pub data_dir: Option<PathBuf>,
    pub save_dir: PathBuf,
    pub session_id: String,
    /// Log file directory; `None` logs to stderr only.
    pub log_dir: Option<PathBuf>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            game_seed: 0,
            ticks: 2_100,
            map_size: 40,
            data_dir: None,
            save_dir: dirs::save_dir(),
            session_id: default_session_id(),
            log_dir: Some(dirs::log_dir()),
        }
    }
}

impl SimConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `SOLAR_SEED` - Seed for every random roll (default: 0)
    /// - `SOLAR_TICKS` - Ticks to simulate (default: 2100)
    /// - `SOLAR_MAP_SIZE` - Map side length, at least 32 (default: 40)
    /// - `SOLAR_DATA_DIR` - Content override directory (default: built-in data)
    /// - `SOLAR_SAVE_DIR` - Save slot directory (default: platform-specific)
    /// - `SOLAR_SESSION_ID` - Session identifier (default: auto-generated)
    /// - `SOLAR_LOG_FILE` - Also log to a session file (default: true)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(seed) = read_env::<u64>("SOLAR_SEED") {
            config.game_seed = seed;
        }
        if let Some(ticks) = read_env::<u64>("SOLAR_TICKS") {
            config.ticks = ticks;
        }
        if let Some(size) = read_env::<u32>("SOLAR_MAP_SIZE") {
            config.map_size = size.max(32);
        }

        config.data_dir = env::var("SOLAR_DATA_DIR").ok().map(PathBuf::from);
        if let Ok(dir) = env::var("SOLAR_SAVE_DIR") {
            config.save_dir = PathBuf::from(dir);
        }
        if let Ok(session_id) = env::var("SOLAR_SESSION_ID") {
            config.session_id = session_id;
        }
        if read_env::<bool>("SOLAR_LOG_FILE") == Some(false) {
            config.log_dir = None;
        }

        config
    }
}

fn default_session_id() -> String {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();
    format!("session_{}", timestamp)
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
