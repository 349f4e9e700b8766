//! Player configuration
//!
//! Nickname, session length and fall speed preset. Persisted as a JSON blob
//! by the application layer; the game core never reads it directly.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::persistence;
use crate::session::{DEFAULT_DURATION_SECS, sanitize_duration};
use crate::tuning::DifficultyTier;

/// Longest nickname kept (characters)
pub const MAX_NICKNAME_CHARS: usize = 16;
/// Shortest nickname accepted to start a game
pub const MIN_NICKNAME_CHARS: usize = 2;
const DEFAULT_NICKNAME: &str = "player";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default)]
    pub nickname: String,
    #[serde(default = "default_duration", rename = "durationSec")]
    pub duration_secs: u32,
    /// Fall speed preset (only Easy is offered in the UI today)
    #[serde(default)]
    pub tier: DifficultyTier,
}

fn default_duration() -> u32 {
    DEFAULT_DURATION_SECS
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            nickname: DEFAULT_NICKNAME.to_string(),
            duration_secs: DEFAULT_DURATION_SECS,
            tier: DifficultyTier::default(),
        }
    }
}

impl PlayerConfig {
    /// Storage key
    const STORAGE_KEY: &'static str = "coin_rush_single_config_v1";

    /// Repair whatever came out of storage
    pub fn sanitized(mut self) -> Self {
        let trimmed = self.nickname.trim();
        self.nickname = if trimmed.is_empty() {
            DEFAULT_NICKNAME.to_string()
        } else {
            trimmed.chars().take(MAX_NICKNAME_CHARS).collect()
        };
        self.duration_secs = sanitize_duration(self.duration_secs);
        self
    }

    /// Start button is enabled
    pub fn can_start(&self) -> bool {
        self.nickname.trim().chars().count() >= MIN_NICKNAME_CHARS
    }

    /// Build a config from form input, rejecting short nicknames
    pub fn from_input(nickname: &str, duration_secs: u32) -> Result<Self> {
        let nickname = nickname.trim();
        if nickname.chars().count() < MIN_NICKNAME_CHARS {
            return Err(GameError::InvalidNickname {
                min: MIN_NICKNAME_CHARS,
                got: nickname.to_string(),
            });
        }
        Ok(Self {
            nickname: nickname.to_string(),
            duration_secs,
            tier: DifficultyTier::default(),
        }
        .sanitized())
    }

    /// Load from storage; missing or corrupt blobs give the defaults
    pub fn load() -> Self {
        match persistence::load_json::<Self>(Self::STORAGE_KEY) {
            Ok(Some(config)) => {
                log::info!("Loaded player config");
                config.sanitized()
            }
            Ok(None) => {
                log::info!("Using default player config");
                Self::default()
            }
            Err(e) => {
                log::warn!("Discarding stored player config: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        persistence::save_json(Self::STORAGE_KEY, self)?;
        log::info!("Player config saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize() {
        let config = PlayerConfig {
            nickname: "   ".into(),
            duration_secs: 90,
            tier: DifficultyTier::Easy,
        }
        .sanitized();
        assert_eq!(config.nickname, "player");
        assert_eq!(config.duration_secs, 45);

        let config = PlayerConfig {
            nickname: "abcdefghijklmnopqrstuvwxyz".into(),
            duration_secs: 30,
            tier: DifficultyTier::Hard,
        }
        .sanitized();
        assert_eq!(config.nickname, "abcdefghijklmnop");
        assert_eq!(config.duration_secs, 30);
        assert_eq!(config.tier, DifficultyTier::Hard);
    }

    #[test]
    fn test_from_input() {
        assert!(PlayerConfig::from_input(" a ", 45).is_err());
        let config = PlayerConfig::from_input(" satoshi ", 60).unwrap();
        assert_eq!(config.nickname, "satoshi");
        assert!(config.can_start());
    }

    #[test]
    fn test_load_save() {
        // Absent
        persistence::remove(PlayerConfig::STORAGE_KEY).unwrap();
        assert_eq!(PlayerConfig::load(), PlayerConfig::default());

        let config = PlayerConfig::from_input("nakamoto", 30).unwrap();
        config.save().unwrap();
        assert_eq!(PlayerConfig::load(), config);

        // Corrupt
        persistence::save_raw(PlayerConfig::STORAGE_KEY, "[]").unwrap();
        assert_eq!(PlayerConfig::load(), PlayerConfig::default());
    }

    #[test]
    fn test_partial_blob_fills_defaults() {
        persistence::save_raw(PlayerConfig::STORAGE_KEY, r#"{"nickname":"bob"}"#).unwrap();
        let config = PlayerConfig::load();
        assert_eq!(config.nickname, "bob");
        assert_eq!(config.duration_secs, 45);
    }
}
