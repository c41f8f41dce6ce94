//! Platform-specific directory utilities.

use std::path::PathBuf;

const APP_NAME: &str = "solar-sim";

/// Platform log directory.
///
/// - macOS: `~/Library/Caches/solar-sim/logs`
/// - Linux: `~/.cache/solar-sim/logs` (or `$XDG_CACHE_HOME/solar-sim/logs`)
/// - Windows: `%LOCALAPPDATA%\solar-sim\logs`
/// - Fallback: `/tmp/solar-sim/logs`
pub fn log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join(APP_NAME))
        .join("logs")
}

/// Platform save directory. Falls back to `./save_data`.
pub fn save_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.data_dir().join("saves"))
        .unwrap_or_else(|| PathBuf::from("./save_data"))
}
