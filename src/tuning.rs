//! Data-driven game balance
//!
//! Spawn cadence, item sizing, fall speed presets and score values. Every
//! random draw in the simulation takes its range from here.

use serde::{Deserialize, Serialize};

/// Fall speed presets. Only `Easy` is wired up by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DifficultyTier {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl DifficultyTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyTier::Easy => "Easy",
            DifficultyTier::Medium => "Medium",
            DifficultyTier::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(DifficultyTier::Easy),
            "medium" | "med" => Some(DifficultyTier::Medium),
            "hard" => Some(DifficultyTier::Hard),
            _ => None,
        }
    }

    /// Base fall duration range in ms (before per-item jitter)
    pub fn fall_duration_range(&self) -> (f64, f64) {
        match self {
            DifficultyTier::Easy => (2600.0, 4200.0),
            DifficultyTier::Medium => (1600.0, 2400.0),
            DifficultyTier::Hard => (1200.0, 2000.0),
        }
    }
}

/// Spawn parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnTuning {
    /// Nominal gap between spawns (ms)
    pub base_interval_ms: f64,
    /// Jitter applied to each threshold check (ms, min/max)
    pub interval_jitter_ms: (f64, f64),
    /// Item size range (render units)
    pub size_range: (f32, f32),
    /// Probability that a spawned item is a collectible
    pub collectible_chance: f64,
    /// Jitter added to each item's fall duration (ms, min/max)
    pub fall_jitter_ms: (f64, f64),
    /// Active fall speed preset
    pub tier: DifficultyTier,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            base_interval_ms: 520.0,
            interval_jitter_ms: (-120.0, 160.0),
            size_range: (54.0, 88.0),
            collectible_chance: 0.78,
            fall_jitter_ms: (-100.0, 300.0),
            tier: DifficultyTier::Easy,
        }
    }
}

/// Score values per item kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringTuning {
    pub collectible_points: i32,
    pub hazard_points: i32,
}

impl Default for ScoringTuning {
    fn default() -> Self {
        Self {
            collectible_points: 10,
            hazard_points: -15,
        }
    }
}

/// Complete balance sheet for one game
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tuning {
    pub spawn: SpawnTuning,
    pub scoring: ScoringTuning,
}

impl Tuning {
    /// Default balance with a different fall speed preset
    pub fn with_tier(tier: DifficultyTier) -> Self {
        let mut tuning = Self::default();
        tuning.spawn.tier = tier;
        tuning
    }

    /// Parse a JSON balance sheet, e.g. from a host-provided blob
    pub fn from_json(json: &str) -> Result<Self, crate::GameError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers_get_faster() {
        let easy = DifficultyTier::Easy.fall_duration_range();
        let medium = DifficultyTier::Medium.fall_duration_range();
        let hard = DifficultyTier::Hard.fall_duration_range();
        assert!(easy.0 > medium.0 && medium.0 > hard.0);
        assert!(easy.1 > medium.1 && medium.1 > hard.1);
    }

    #[test]
    fn test_tier_names_round_trip() {
        for tier in [DifficultyTier::Easy, DifficultyTier::Medium, DifficultyTier::Hard] {
            assert_eq!(DifficultyTier::from_str(tier.as_str()), Some(tier));
        }
        assert_eq!(DifficultyTier::from_str("med"), Some(DifficultyTier::Medium));
        assert_eq!(DifficultyTier::from_str("insane"), None);
    }

    #[test]
    fn test_with_tier_keeps_other_defaults() {
        let tuning = Tuning::with_tier(DifficultyTier::Hard);
        assert_eq!(tuning.spawn.tier, DifficultyTier::Hard);
        assert_eq!(tuning.spawn.base_interval_ms, 520.0);
        assert_eq!(tuning.scoring.hazard_points, -15);
    }

    #[test]
    fn test_from_json() {
        let json = serde_json::to_string(&Tuning::with_tier(DifficultyTier::Medium)).unwrap();
        let parsed = Tuning::from_json(&json).unwrap();
        assert_eq!(parsed.spawn.tier, DifficultyTier::Medium);
        assert!(Tuning::from_json("{not json").is_err());
    }
}
