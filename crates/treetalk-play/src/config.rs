//! `treetalk.toml` playback configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name searched for by [`PlaybackConfig::find_and_load`].
pub const CONFIG_FILE_NAME: &str = "treetalk.toml";

/// Top-level structure of a `treetalk.toml` file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    playback: PlaybackConfig,
}

/// Timing and randomness settings for a playback session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Delay between revealed characters.
    #[serde(default = "default_char_delay")]
    pub char_delay_ms: u64,
    /// Pause after a sentence is fully revealed, before moving on.
    #[serde(default = "default_natural_pause")]
    pub natural_pause_ms: u64,
    /// Delay between presented choices.
    #[serde(default = "default_choice_delay")]
    pub choice_delay_ms: u64,
    /// Fixed RNG seed; `None` seeds from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_char_delay() -> u64 {
    20
}

fn default_natural_pause() -> u64 {
    200
}

fn default_choice_delay() -> u64 {
    50
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            char_delay_ms: default_char_delay(),
            natural_pause_ms: default_natural_pause(),
            choice_delay_ms: default_choice_delay(),
            seed: None,
        }
    }
}

impl PlaybackConfig {
    pub fn char_delay(&self) -> Duration {
        Duration::from_millis(self.char_delay_ms)
    }

    pub fn natural_pause(&self) -> Duration {
        Duration::from_millis(self.natural_pause_ms)
    }

    pub fn choice_delay(&self) -> Duration {
        Duration::from_millis(self.choice_delay_ms)
    }

    /// Parse the `[playback]` table of a `treetalk.toml` document.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        let file: ConfigFile = toml::from_str(s)?;
        Ok(file.playback)
    }

    /// Load configuration from a specific file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Search for `treetalk.toml` starting at `start_dir` and walking up
    /// parent directories. Returns the config and the file it came from.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>, ConfigError> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                let config = Self::load(&candidate)?;
                return Ok(Some((config, candidate)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Default `treetalk.toml` contents written by `treetalk new`.
    pub fn template() -> String {
        let d = Self::default();
        format!(
            r#"[playback]
char_delay_ms = {}
natural_pause_ms = {}
choice_delay_ms = {}
# seed = 42
"#,
            d.char_delay_ms, d.natural_pause_ms, d.choice_delay_ms
        )
    }
}
