// src/config/mod.rs
//! User configuration, read from `config.json` in the platform config dir.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const APP_DIR: &str = "neonplayer";
const CONFIG_FILE: &str = "config.json";

/// Player settings. Every field has a default, so a partial file is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Audio file played when none is given on the command line.
    pub source: PathBuf,
    /// Equalizer animation interval.
    pub tick_ms: u64,
    /// How often the backend reports the playback position.
    pub time_update_ms: u64,
    /// Seconds moved per seek key press.
    pub seek_step_secs: f64,
    /// Volume at startup, `0.0..=1.0`.
    pub initial_volume: f32,
    /// Accent colour name or `#rrggbb`.
    pub accent: String,
    /// Log destination; defaults to the platform cache dir.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: PathBuf::from("song.mp3"),
            tick_ms: 100,
            time_update_ms: 250,
            seek_step_secs: 5.0,
            initial_volume: 1.0,
            accent: "#39ff14".to_string(),
            log_file: None,
        }
    }
}

impl Config {
    /// Default location of the config file.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load from the default location, or defaults when there is none.
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config.sanitized())
    }

    /// Pull out-of-range values back to something usable.
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.tick_ms == 0 {
            warn!("tick_ms must be positive, using {}", defaults.tick_ms);
            self.tick_ms = defaults.tick_ms;
        }
        if self.time_update_ms == 0 {
            self.time_update_ms = defaults.time_update_ms;
        }
        if !self.seek_step_secs.is_finite() || self.seek_step_secs <= 0.0 {
            self.seek_step_secs = defaults.seek_step_secs;
        }
        self.initial_volume = if self.initial_volume.is_finite() {
            self.initial_volume.clamp(0.0, 1.0)
        } else {
            defaults.initial_volume
        };
        self
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn time_update_interval(&self) -> Duration {
        Duration::from_millis(self.time_update_ms)
    }

    /// Parsed accent colour; unknown names fall back to green.
    pub fn accent_color(&self) -> Color {
        self.accent.parse().unwrap_or(Color::LightGreen)
    }

    /// Where logs go: the configured file, else the cache dir, else the temp dir.
    pub fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join(APP_DIR)
                .join("neonplayer.log")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "source": "/music/day1.mp3", "seek_step_secs": 10 }}"#).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.source, PathBuf::from("/music/day1.mp3"));
        assert_eq!(config.seek_step_secs, 10.0);
        assert_eq!(config.tick_ms, 100);
    }

    #[test]
    fn out_of_range_values_are_repaired() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "tick_ms": 0, "initial_volume": 3.5, "seek_step_secs": -1 }}"#)
            .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.tick_interval(), Duration::from_millis(100));
        assert_eq!(config.initial_volume, 1.0);
        assert_eq!(config.seek_step_secs, 5.0);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn accent_parses_hex_and_names() {
        let mut config = Config::default();
        assert_eq!(config.accent_color(), Color::Rgb(0x39, 0xff, 0x14));
        config.accent = "magenta".into();
        assert_eq!(config.accent_color(), Color::Magenta);
        config.accent = "neon-ish".into();
        assert_eq!(config.accent_color(), Color::LightGreen);
    }
}
