//! Target Selector Configuration
//!
//! The bonus tiers here (1.3 / 1.1 clearance, 2.5 prey priority, ...) are
//! tuning choices; the adaptive layer is free to move them.

use serde::{Deserialize, Serialize};

/// Consumable selector
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodConfig {
    /// Selector runs only while danger <= 1 - min_safety_to_eat
    pub min_safety_to_eat: f32,
    pub search_radius: f32,
    pub min_distance: f32,
    /// Moving items this close are still allowed in a crowd
    pub crowded_prey_radius: f32,
    pub min_routes: usize,
    pub flank_offset: i32,
    pub safety_clearance: f32,
    pub contest_radius: f32,
    pub body_margin: f32,
    /// Items smaller than this get the wider body margin
    pub small_size: f32,
    pub small_margin_scale: f32,
    pub head_radius: f32,
    pub path_margin: f32,

    // === Scoring ===
    pub prey_priority: f32,
    pub heading_penalty: f32,
    pub clearance_bonus_high: f32,
    pub clearance_bonus_low: f32,
    pub corridor_span: usize,
    pub corridor_bonus: f32,

    // === Stuck detection ===
    pub stuck_timeout_ms: u64,
    pub progress_step: f32,
    pub abandon_area_radius: f32,
    pub abandon_ttl_ms: u64,
}

impl Default for FoodConfig {
    fn default() -> Self {
        Self {
            min_safety_to_eat: 0.6,
            search_radius: 900.0,
            min_distance: 40.0,
            crowded_prey_radius: 100.0,
            min_routes: 3,
            flank_offset: 8,
            safety_clearance: 50.0,
            contest_radius: 150.0,
            body_margin: 60.0,
            small_size: 5.0,
            small_margin_scale: 1.5,
            head_radius: 200.0,
            path_margin: 20.0,

            prey_priority: 2.5,
            heading_penalty: 0.5,
            clearance_bonus_high: 1.3,
            clearance_bonus_low: 1.1,
            corridor_span: 20,
            corridor_bonus: 0.3,

            stuck_timeout_ms: 3000,
            progress_step: 20.0,
            abandon_area_radius: 100.0,
            abandon_ttl_ms: 5000,
        }
    }
}

/// Rival-cutoff selector
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackConfig {
    pub enabled: bool,
    pub min_length: f32,
    pub max_danger: f32,
    pub min_routes: usize,
    pub max_nearby_rivals: usize,
    pub search_radius: f32,
    pub isolation_radius: f32,
    pub length_advantage: f32,
    pub projection_ticks: f32,
    pub projection_margin: f32,
    pub projected_isolation_radius: f32,
    /// Agent may arrive up to this factor later than the rival
    pub time_slack: f32,
    pub chase_radius: f32,
    pub chase_score_factor: f32,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_length: 200.0,
            max_danger: 0.15,
            min_routes: 24,
            max_nearby_rivals: 1,
            search_radius: 800.0,
            isolation_radius: 400.0,
            length_advantage: 1.5,
            projection_ticks: 20.0,
            projection_margin: 60.0,
            projected_isolation_radius: 300.0,
            time_slack: 1.2,
            chase_radius: 450.0,
            chase_score_factor: 0.5,
        }
    }
}
