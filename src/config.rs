use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub backend_url: Option<String>,
    pub speech_command: Option<String>,
    pub export_dir: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            backend_url: Some(DEFAULT_BACKEND_URL.to_string()),
            speech_command: None,
            export_dir: None,
            data_dir: None,
        }
    }

    /// Load the user's config, writing the defaults on first run so there is a file to edit
    pub fn load_or_init() -> Result<Self> {
        Self::load_or_init_at(&Self::get_config_path()?)
    }

    pub fn load_or_init_at(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            return Self::load_from(config_path);
        }
        let config = Self::new();
        config.save_to(config_path)?;
        tracing::info!("wrote default config to {:?}", config_path);
        Ok(config)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, config_content)?;
        Ok(())
    }

    /// Backend base URL - environment first, then config file, then default
    pub fn backend_url(&self) -> String {
        std::env::var("MINDGUARD_BACKEND_URL").ok()
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.backend_url.clone())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string())
    }

    /// Speech recognizer command line, if one is configured
    pub fn speech_command(&self) -> Option<String> {
        std::env::var("MINDGUARD_SPEECH_COMMAND").ok()
            .or_else(|| self.speech_command.clone())
            .filter(|cmd| !cmd.trim().is_empty())
    }

    /// Where `chat.txt` is written; the working directory unless configured
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Directory holding chat history and the log file
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow!("Could not determine data directory"))?;
        Ok(data_dir.join("mindguard"))
    }

    fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("mindguard").join("config.json"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
