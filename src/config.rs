//! Console configuration: operator defaults and storage locations.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level console configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Configuration file version
    pub version: String,

    /// Authoring defaults
    pub defaults: DefaultsConfig,

    /// Storage locations
    pub storage: StorageConfig,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            defaults: DefaultsConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Language option id preselected for new states
    pub language: String,

    /// Word-count option id preselected for new states
    pub word_count: String,

    /// How many retrieval hits to display
    pub retrieval_top_n: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            word_count: "standard".to_string(),
            retrieval_top_n: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Current selection state, restored on startup
    pub state_file: PathBuf,

    /// Named template snapshots
    pub snapshot_file: PathBuf,

    /// Knowledge entries
    pub knowledge_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            state_file: PathBuf::from(".copyforge-state.json"),
            snapshot_file: PathBuf::from(".copyforge-snapshots.json"),
            knowledge_file: PathBuf::from(".copyforge-knowledge.json"),
        }
    }
}

impl ConsoleConfig {
    /// Load configuration from a JSON file; a missing file yields defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Persist configuration to a JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_defaults() {
        let config = ConsoleConfig::default();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.defaults.language, "en");
        assert_eq!(config.defaults.retrieval_top_n, 5);
        assert_eq!(
            config.storage.state_file,
            PathBuf::from(".copyforge-state.json")
        );
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        let mut config = ConsoleConfig::default();
        config.defaults.language = "zh".to_string();
        config.save(&path).unwrap();

        let loaded = ConsoleConfig::load(&path).unwrap();
        assert_eq!(loaded.defaults.language, "zh");
    }

    #[test]
    fn test_config_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ConsoleConfig::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config.version, "1.0");
    }
}
