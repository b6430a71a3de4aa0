//! Persistent application configuration model and defaults.

use std::path::PathBuf;

/// Root configuration persisted to `tunelinks.toml`.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Config {
    /// Catalog storage location.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Video search provider behavior.
    #[serde(default)]
    pub search: SearchConfig,
    /// Logging preferences.
    #[serde(default)]
    pub ui: UiConfig,
}

/// Where the song catalog CSV lives.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct StorageConfig {
    #[serde(default = "default_songs_path")]
    pub songs_path: PathBuf,
}

/// External video-search call preferences.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct SearchConfig {
    /// When false, video enrichment is skipped entirely; the deterministic
    /// lyrics/chords generators still run.
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_connect_ms")]
    pub timeout_connect_ms: u64,
    #[serde(default = "default_timeout_read_ms")]
    pub timeout_read_ms: u64,
}

/// Logging preferences.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct UiConfig {
    #[serde(default)]
    pub verbose_logging: bool,
}

/// Clamps parsed values to workable bounds before the config is used.
pub fn sanitize_config(config: Config) -> Config {
    let Config { storage, search, ui } = config;
    let clamped_connect = search.timeout_connect_ms.clamp(500, 60_000);
    let clamped_read = search.timeout_read_ms.clamp(500, 120_000);

    Config {
        storage,
        search: SearchConfig {
            timeout_connect_ms: clamped_connect,
            timeout_read_ms: clamped_read,
            ..search
        },
        ui,
    }
}

fn default_true() -> bool {
    true
}

fn default_songs_path() -> PathBuf {
    PathBuf::from("songs.csv")
}

fn default_user_agent() -> String {
    "tunelinks/0.1.0 (song catalog link enrichment)".to_string()
}

fn default_timeout_connect_ms() -> u64 {
    5_000
}

fn default_timeout_read_ms() -> u64 {
    10_000
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            songs_path: default_songs_path(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            user_agent: default_user_agent(),
            timeout_connect_ms: default_timeout_connect_ms(),
            timeout_read_ms: default_timeout_read_ms(),
        }
    }
}
