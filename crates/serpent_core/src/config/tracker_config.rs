//! Entity Tracker Configuration

use serde::{Deserialize, Serialize};

/// Cross-tick rival tracking parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Position samples kept per rival
    pub history_capacity: usize,
    /// Ticks unseen before a record is dropped
    pub stale_timeout_ticks: u64,
    /// Linear extrapolation horizon (ticks)
    pub prediction_horizon: f32,

    // === Approach / hunting ===
    pub approach_radius: f32,
    /// Heading cone toward the agent that counts as approaching (rad)
    pub approach_cone: f32,
    pub hunting_threshold: u32,
    pub aggression_gain: f32,
    pub far_radius: f32,
    pub far_decay_ticks: u32,
    pub aggression_decay: f32,

    // === Turn / boost ===
    pub turn_smoothing: f32,
    pub high_turn_rate: f32,
    pub boost_gain: f32,
    pub boost_decay: f32,
    /// Speed above this fraction of max speed counts as boosting
    pub boost_speed_ratio: f32,
    /// Fallback boost threshold when max speed is unknown
    pub boost_speed_floor: f32,
    /// Minimum speed for a rival to count as moving toward the agent
    pub min_closing_speed: f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            history_capacity: 30,
            stale_timeout_ticks: 90,
            prediction_horizon: 10.0,

            approach_radius: 500.0,
            approach_cone: 30f32.to_radians(),
            hunting_threshold: 10,
            aggression_gain: 0.05,
            far_radius: 600.0,
            far_decay_ticks: 60,
            aggression_decay: 0.9,

            turn_smoothing: 0.9,
            high_turn_rate: 0.15,
            boost_gain: 0.1,
            boost_decay: 0.95,
            boost_speed_ratio: 0.75,
            boost_speed_floor: 7.5,
            min_closing_speed: 1.0,
        }
    }
}
