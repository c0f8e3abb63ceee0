// Configuration management for Pianoscore

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::notes::Difficulty;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Level used when a request or command names none
    pub default_difficulty: Difficulty,

    /// Where the CLI writes simplified MIDI files when no output is given
    pub output_dir: PathBuf,

    /// Largest accepted audio upload in bytes.
    /// Enforced by the host that accepts uploads, not by the pipeline.
    pub max_upload_bytes: u64,

    /// Accepted audio file extensions (lowercase, without the dot)
    pub allowed_extensions: Vec<String>,

    /// How many transcriptions the host may run at once.
    /// Transcription is CPU-heavy; the pipeline itself never checks this.
    pub max_concurrent_jobs: usize,

    /// Default log filter when RUST_LOG is not set
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_difficulty: Difficulty::Original,
            output_dir: get_default_output_dir(),
            max_upload_bytes: 50 * 1024 * 1024,
            allowed_extensions: vec!["mp3".to_string(), "wav".to_string()],
            max_concurrent_jobs: 1,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load config from disk. A missing file means defaults; a file that
    /// cannot be read or parsed is an error.
    pub fn load(config_path: &Path) -> anyhow::Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
        let config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config {}", config_path.display()))?;

        Ok(config)
    }

    /// Save config to disk
    pub fn save(&self, config_path: &Path) -> anyhow::Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(config_path, contents)?;

        Ok(())
    }
}

/// Get the default output directory for simplified scores
fn get_default_output_dir() -> PathBuf {
    dirs::audio_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join("Music")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Pianoscore")
}

/// Get the config file path
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pianoscore")
        .join("config.toml")
}
