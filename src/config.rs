//! Configuration management for ChatBuddy
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.chatbuddy/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::engine::phrases;
use crate::errors::{ChatError, Result};
use crate::memory::knowledge::{ScoringMethod, DEFAULT_THRESHOLD};

/// Complete configuration for ChatBuddy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
    #[serde(default)]
    pub fallback: FallbackConfig,
    #[serde(default)]
    pub repl: ReplConfig,
}

/// Bot persona configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub name: String,
    pub typing_indicator: bool,
}

/// Knowledge base configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    pub path: String,
    pub scorer: ScoringMethod,
    pub threshold: f64,
    pub persist_learned: bool,
}

/// Fallback responder configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    pub replies: Vec<String>,
    pub follow_ups: Vec<String>,
    pub follow_up_probability: f64,
}

/// Interactive loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplConfig {
    pub history_file: String,
    pub prompt: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "Buddy".to_string(),
            typing_indicator: true,
        }
    }
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            path: "~/.chatbuddy/knowledge.json".to_string(),
            scorer: ScoringMethod::Overlap,
            threshold: DEFAULT_THRESHOLD,
            persist_learned: true,
        }
    }
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            replies: phrases::to_owned(phrases::FALLBACK_REPLIES),
            follow_ups: phrases::to_owned(phrases::FOLLOW_UPS),
            follow_up_probability: 0.3,
        }
    }
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            history_file: "~/.chatbuddy/history".to_string(),
            prompt: "you> ".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            Self::load_from_file(&config_path)
        } else {
            Self::load_default()
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ChatError::ConfigError(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| ChatError::ConfigError(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load default configuration from standard location or use built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(home) = dirs::home_dir() {
            let config_path = home.join(".chatbuddy").join("config.toml");
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }

        Ok(Config::default())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.bot.name.trim().is_empty() {
            return Err(ChatError::ConfigError(
                "bot.name must not be empty".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.knowledge.threshold) {
            return Err(ChatError::ConfigError(
                "knowledge.threshold must be between 0.0 and 1.0".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.fallback.follow_up_probability) {
            return Err(ChatError::ConfigError(
                "fallback.follow_up_probability must be between 0.0 and 1.0".to_string(),
            ));
        }

        if self.fallback.replies.is_empty() {
            return Err(ChatError::ConfigError(
                "fallback.replies must contain at least one reply".to_string(),
            ));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = self.to_toml()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ChatError::ConfigError(format!("Failed to create config dir: {}", e))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| ChatError::ConfigError(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Render the configuration as pretty TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ChatError::ConfigError(format!("Failed to serialize config: {}", e)))
    }

    /// Expand tilde in paths
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    /// Knowledge file location
    pub fn knowledge_path(&self) -> PathBuf {
        Self::expand_path(&self.knowledge.path)
    }

    /// Line-editor history file location
    pub fn history_path(&self) -> PathBuf {
        Self::expand_path(&self.repl.history_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.bot.name, "Buddy");
        assert_eq!(config.knowledge.scorer, ScoringMethod::Overlap);
        assert!((config.knowledge.threshold - 0.3).abs() < f64::EPSILON);
        assert!((config.fallback.follow_up_probability - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_config_validation_success() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_threshold() {
        let mut config = Config::default();
        config.knowledge.threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_probability() {
        let mut config = Config::default();
        config.fallback.follow_up_probability = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_empty_replies() {
        let mut config = Config::default();
        config.fallback.replies.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[bot]\nname = \"Robo\"\n\n[knowledge]\nscorer = \"tfidf\"\n").unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.bot.name, "Robo");
        assert!(config.bot.typing_indicator);
        assert_eq!(config.knowledge.scorer, ScoringMethod::TfIdf);
        assert!(!config.fallback.replies.is_empty());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.bot.name = "Saved".to_string();
        config.save(&path).unwrap();

        let loaded = Config::load(Some(path)).unwrap();
        assert_eq!(loaded.bot.name, "Saved");
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();

        assert!(matches!(
            Config::load_from_file(&path),
            Err(ChatError::ConfigError(_))
        ));
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = Config::expand_path("~/.chatbuddy");
        assert!(!expanded.to_string_lossy().contains('~'));
    }

    #[test]
    fn test_expand_path_without_tilde() {
        let path = "/absolute/path";
        let expanded = Config::expand_path(path);
        assert_eq!(expanded.to_string_lossy(), path);
    }
}
