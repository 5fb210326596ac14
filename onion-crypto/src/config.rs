// src/config.rs

//! Engine configuration.

use crate::errors::{CryptoError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Upper bound on start-up self-test rounds
pub const MAX_SELF_TEST_ROUNDS: u32 = 1024;

/// Options read once when a [`crate::CryptoEngine`] is created
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Run the known-answer and consistency checks before handing out the engine
    pub self_test_on_start: bool,

    /// Enable the post-quantum KEM hook
    pub pq_enabled: bool,

    /// Number of fresh-key rounds in the self-test
    pub self_test_rounds: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            self_test_on_start: true,
            pq_enabled: true,
            self_test_rounds: 1,
        }
    }
}

impl EngineConfig {
    /// Parses configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| CryptoError::ConfigError(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes configuration to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CryptoError::ConfigError(format!("Failed to serialize config: {}", e)))
    }

    /// Loads configuration from file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CryptoError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&contents)
    }

    /// Saves configuration to file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let contents = self.to_json()?;
        std::fs::write(path, contents).map_err(|e| {
            CryptoError::ConfigError(format!("Failed to write {}: {}", path.display(), e))
        })
    }

    /// Checks option ranges
    pub fn validate(&self) -> Result<()> {
        if self.self_test_on_start && self.self_test_rounds == 0 {
            return Err(CryptoError::ConfigError(
                "self_test_rounds must be at least 1 when self_test_on_start is set".to_string(),
            ));
        }
        if self.self_test_rounds > MAX_SELF_TEST_ROUNDS {
            return Err(CryptoError::ConfigError(format!(
                "self_test_rounds {} exceeds maximum {}",
                self.self_test_rounds, MAX_SELF_TEST_ROUNDS
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = EngineConfig::default();
        assert!(config.self_test_on_start);
        assert!(config.pq_enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_round_trip() {
        let config = EngineConfig {
            self_test_on_start: false,
            pq_enabled: false,
            self_test_rounds: 0,
        };
        let json = config.to_json().unwrap();
        assert_eq!(EngineConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_missing_fields_default() {
        let config = EngineConfig::from_json(r#"{ "pq_enabled": false }"#).unwrap();
        assert!(!config.pq_enabled);
        assert!(config.self_test_on_start);
        assert_eq!(config.self_test_rounds, 1);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            EngineConfig::from_json("not json"),
            Err(CryptoError::ConfigError(_))
        ));
    }

    #[test]
    fn test_validate_rounds() {
        let zero = EngineConfig {
            self_test_rounds: 0,
            ..Default::default()
        };
        assert!(zero.validate().is_err());

        let huge = EngineConfig {
            self_test_rounds: MAX_SELF_TEST_ROUNDS + 1,
            ..Default::default()
        };
        assert!(huge.validate().is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "onion-crypto-config-{}.json",
            crate::random::randint()
        ));
        let config = EngineConfig {
            self_test_rounds: 4,
            ..Default::default()
        };
        config.save_to_file(&path).unwrap();
        let loaded = EngineConfig::from_file(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded.unwrap(), config);
    }
}
