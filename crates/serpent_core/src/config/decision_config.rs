//! Decision Engine Configuration

use serde::{Deserialize, Serialize};

/// Per-sector scoring weights and circle-mode parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    // === Scoring terms ===
    pub blocked_penalty: f32,
    pub clearance_cap: f32,
    pub clearance_weight: f32,
    pub wall_penalty: f32,
    pub head_penalty: f32,
    pub head_span: usize,
    pub momentum_weight: f32,
    pub center_weight: f32,
    pub food_weight: f32,
    pub food_span: usize,
    pub attack_weight: f32,
    pub attack_span: usize,
    pub escape_weight: f32,
    pub escape_span: usize,
    pub escape_min_danger: f32,

    // === Defensive circle ===
    pub circle_enter_urgency: f32,
    pub circle_exit_urgency: f32,
    pub circle_max_gap: f32,
    pub circle_flip_angle: f32,
    pub circle_min_turn: f32,
    pub circle_max_turn: f32,
    /// Body length estimate per segment when no trail is visible
    pub segment_spacing: f32,

    // === Boost ===
    pub boost_max_danger: f32,
    pub boost_min_routes: usize,
    pub prey_boost_distance: f32,

    // === Reason labels ===
    pub emergency_forward_danger: f32,
    pub critical_danger: f32,
    pub boundary_reason_danger: f32,
    pub wall_reason_danger: f32,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            blocked_penalty: 1000.0,
            clearance_cap: 800.0,
            clearance_weight: 10.0,
            wall_penalty: 200.0,
            head_penalty: 150.0,
            head_span: 45,
            momentum_weight: 5.0,
            center_weight: 40.0,
            food_weight: 30.0,
            food_span: 30,
            attack_weight: 35.0,
            attack_span: 30,
            escape_weight: 80.0,
            escape_span: 90,
            escape_min_danger: 0.3,

            circle_enter_urgency: 0.7,
            circle_exit_urgency: 0.3,
            circle_max_gap: std::f32::consts::FRAC_PI_2,
            circle_flip_angle: 30f32.to_radians(),
            circle_min_turn: 0.05,
            circle_max_turn: 0.35,
            segment_spacing: 12.0,

            boost_max_danger: 0.2,
            boost_min_routes: 24,
            prey_boost_distance: 300.0,

            emergency_forward_danger: 0.8,
            critical_danger: 0.8,
            boundary_reason_danger: 0.5,
            wall_reason_danger: 0.5,
        }
    }
}
