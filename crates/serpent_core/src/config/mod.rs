//! # Bot Configuration Module
//!
//! Every radius, threshold and multiplier the pipeline reads lives here.
//! The external tuning layer may replace the whole struct between ticks;
//! the pipeline never mutates it.
//!
//! ## Usage
//! ```rust
//! use serpent_core::config::BotConfig;
//!
//! let config = BotConfig::default();
//! let cautious = BotConfig::cautious();
//! assert!(cautious.validate().is_ok());
//! ```

mod decision_config;
mod sensor_config;
mod target_config;
mod tracker_config;
mod trap_config;

pub use decision_config::DecisionConfig;
pub use sensor_config::SensorConfig;
pub use target_config::{AttackConfig, FoodConfig};
pub use tracker_config::TrackerConfig;
pub use trap_config::TrapConfig;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{CoreError, Result};
use crate::snapshot::IngestDefaults;

/// Full pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Master switch; a disabled bot skips the whole tick
    pub enabled: bool,
    pub sensor: SensorConfig,
    pub tracker: TrackerConfig,
    pub trap: TrapConfig,
    pub food: FoodConfig,
    pub attack: AttackConfig,
    pub decision: DecisionConfig,
    /// Substitutes for fields missing from the world snapshot
    pub ingest: IngestDefaults,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sensor: SensorConfig::default(),
            tracker: TrackerConfig::default(),
            trap: TrapConfig::default(),
            food: FoodConfig::default(),
            attack: AttackConfig::default(),
            decision: DecisionConfig::default(),
            ingest: IngestDefaults::default(),
        }
    }
}

impl BotConfig {
    /// Default tuning
    pub fn balanced() -> Self {
        Self::default()
    }

    /// Wider margins, no attacks, eats only when very safe
    pub fn cautious() -> Self {
        let mut cfg = Self::default();
        cfg.sensor.body_avoid_radius = 750.0;
        cfg.sensor.danger_clearance = 200.0;
        cfg.sensor.boundary_hard_limit = 1500.0;
        cfg.food.min_safety_to_eat = 0.75;
        cfg.attack.enabled = false;
        cfg.decision.escape_weight = 100.0;
        cfg
    }

    /// Tighter margins, earlier attacks
    pub fn aggressive() -> Self {
        let mut cfg = Self::default();
        cfg.sensor.danger_clearance = 120.0;
        cfg.food.min_safety_to_eat = 0.45;
        cfg.attack.min_length = 120.0;
        cfg.attack.max_danger = 0.25;
        cfg.attack.length_advantage = 1.25;
        cfg.decision.attack_weight = 50.0;
        cfg
    }

    /// For scenario tests: no attacks so only safety and food terms move the heading
    pub fn deterministic() -> Self {
        let mut cfg = Self::default();
        cfg.attack.enabled = false;
        cfg
    }

    /// Look up a preset by name.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "balanced" | "default" => Some(Self::balanced()),
            "cautious" => Some(Self::cautious()),
            "aggressive" => Some(Self::aggressive()),
            "deterministic" => Some(Self::deterministic()),
            _ => None,
        }
    }

    /// Load a config file (`.json`, `.yaml`, `.yml`) and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();

        let cfg: BotConfig = match ext.as_str() {
            "json" => serde_json::from_str(&text)?,
            "yaml" | "yml" => serde_yaml::from_str(&text)?,
            _ => {
                return Err(CoreError::UnsupportedFormat { path: path.display().to_string() })
            }
        };

        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject tunables that would break the pipeline's arithmetic.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("sensor.body_avoid_radius", self.sensor.body_avoid_radius),
            ("sensor.wall_clearance", self.sensor.wall_clearance),
            ("sensor.danger_clearance", self.sensor.danger_clearance),
            ("sensor.safe_clearance", self.sensor.safe_clearance),
            ("sensor.hard_block_clearance", self.sensor.hard_block_clearance),
            ("sensor.stopping_distance_base", self.sensor.stopping_distance_base),
            ("sensor.boundary_buffer", self.sensor.boundary_buffer),
            ("sensor.head_threat_radius", self.sensor.head_threat_radius),
            ("sensor.segment_saturation", self.sensor.segment_saturation),
            ("trap.detection_radius", self.trap.detection_radius),
            ("food.search_radius", self.food.search_radius),
            ("decision.clearance_cap", self.decision.clearance_cap),
            ("decision.segment_spacing", self.decision.segment_spacing),
        ];

        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                warn!("config rejected: {} = {}", name, value);
                return Err(CoreError::InvalidConfig(format!("{} must be > 0, got {}", name, value)));
            }
        }

        let unit = [
            ("food.min_safety_to_eat", self.food.min_safety_to_eat),
            ("attack.max_danger", self.attack.max_danger),
            ("decision.circle_enter_urgency", self.decision.circle_enter_urgency),
            ("decision.circle_exit_urgency", self.decision.circle_exit_urgency),
            ("tracker.turn_smoothing", self.tracker.turn_smoothing),
        ];

        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                warn!("config rejected: {} = {}", name, value);
                return Err(CoreError::InvalidConfig(format!("{} must be in [0, 1], got {}", name, value)));
            }
        }

        if self.decision.circle_exit_urgency > self.decision.circle_enter_urgency {
            return Err(CoreError::InvalidConfig(
                "decision.circle_exit_urgency must not exceed circle_enter_urgency".to_string(),
            ));
        }

        if self.tracker.history_capacity < 2 {
            return Err(CoreError::InvalidConfig("tracker.history_capacity must be >= 2".to_string()));
        }

        if self.decision.circle_min_turn > self.decision.circle_max_turn {
            return Err(CoreError::InvalidConfig(
                "decision.circle_min_turn must not exceed circle_max_turn".to_string(),
            ));
        }

        Ok(())
    }
}

// ========== Tests ==========

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_valid() {
        let cfg = BotConfig::default();
        assert!(cfg.enabled);
        assert!(cfg.validate().is_ok());
        assert!((cfg.sensor.boundary_hard_limit - 1200.0).abs() < 0.01);
    }

    #[test]
    fn test_presets_valid() {
        for name in ["balanced", "cautious", "aggressive", "deterministic"] {
            let cfg = BotConfig::preset(name).unwrap();
            assert!(cfg.validate().is_ok(), "preset {} invalid", name);
        }
        assert!(BotConfig::preset("reckless").is_none());
    }

    #[test]
    fn test_cautious_vs_aggressive() {
        let cautious = BotConfig::cautious();
        let aggressive = BotConfig::aggressive();
        assert!(cautious.food.min_safety_to_eat > aggressive.food.min_safety_to_eat);
        assert!(!cautious.attack.enabled);
        assert!(aggressive.attack.min_length < BotConfig::default().attack.min_length);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut cfg = BotConfig::default();
        cfg.sensor.wall_clearance = 0.0;
        assert!(matches!(cfg.validate(), Err(CoreError::InvalidConfig(_))));

        let mut cfg = BotConfig::default();
        cfg.decision.circle_exit_urgency = 0.9;
        assert!(cfg.validate().is_err());

        let mut cfg = BotConfig::default();
        cfg.food.min_safety_to_eat = 1.5;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg: BotConfig =
            serde_json::from_str(r#"{"sensor": {"wall_clearance": 75.0}, "enabled": false}"#).unwrap();
        assert!(!cfg.enabled);
        assert!((cfg.sensor.wall_clearance - 75.0).abs() < 1e-6);
        assert!((cfg.sensor.danger_clearance - 150.0).abs() < 1e-6);
        assert_eq!(cfg.tracker.history_capacity, 30);
    }

    #[test]
    fn test_load_yaml_and_json() {
        let dir = tempfile::tempdir().unwrap();

        let yaml_path = dir.path().join("bot.yaml");
        let mut f = std::fs::File::create(&yaml_path).unwrap();
        writeln!(f, "ingest:\n  tick_ms: 20\nattack:\n  enabled: false").unwrap();
        let cfg = BotConfig::load(&yaml_path).unwrap();
        assert_eq!(cfg.ingest.tick_ms, 20);
        assert!(!cfg.attack.enabled);

        let json_path = dir.path().join("bot.json");
        std::fs::write(&json_path, serde_json::to_string(&BotConfig::cautious()).unwrap()).unwrap();
        let cfg = BotConfig::load(&json_path).unwrap();
        assert!((cfg.food.min_safety_to_eat - 0.75).abs() < 1e-6);

        let txt_path = dir.path().join("bot.txt");
        std::fs::write(&txt_path, "{}").unwrap();
        assert!(matches!(BotConfig::load(&txt_path), Err(CoreError::UnsupportedFormat { .. })));
    }
}
