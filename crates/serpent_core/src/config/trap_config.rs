//! Encirclement Detector Configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrapConfig {
    pub detection_radius: f32,
    pub detection_radius_per_segment: f32,
    pub detection_radius_max: f32,
    /// Body points closer than this get the narrow spread
    pub near_spread_distance: f32,
    /// Total spread in degrees for far / near body points
    pub far_spread_deg: usize,
    pub near_spread_deg: usize,

    pub coverage_threshold: f32,
    pub min_samples: usize,
    pub max_closest: f32,

    // === Urgency ===
    pub head_seal_angle: f32,
    pub head_seal_bonus: f32,
    pub small_gap: f32,
    pub small_gap_bonus: f32,
    pub very_close: f32,
    pub very_close_bonus: f32,

    // === Counter-attack ===
    pub counter_length_ratio: f32,
    pub counter_gap_angle: f32,
    pub counter_head_radius: f32,
    pub counter_lead_ticks: f32,
    pub counter_margin: f32,

    pub profile_ttl_ms: u64,
    /// Sectors searched each side of a blocked gap center
    pub escape_search_span: usize,
}

impl Default for TrapConfig {
    fn default() -> Self {
        Self {
            detection_radius: 450.0,
            detection_radius_per_segment: 0.5,
            detection_radius_max: 900.0,
            near_spread_distance: 100.0,
            far_spread_deg: 20,
            near_spread_deg: 10,

            coverage_threshold: 0.4,
            min_samples: 10,
            max_closest: 180.0,

            head_seal_angle: 45f32.to_radians(),
            head_seal_bonus: 0.25,
            small_gap: std::f32::consts::FRAC_PI_2,
            small_gap_bonus: 0.15,
            very_close: 80.0,
            very_close_bonus: 0.2,

            counter_length_ratio: 0.8,
            counter_gap_angle: std::f32::consts::FRAC_PI_2,
            counter_head_radius: 200.0,
            counter_lead_ticks: 8.0,
            counter_margin: 40.0,

            profile_ttl_ms: 2000,
            escape_search_span: 90,
        }
    }
}

impl TrapConfig {
    /// Detection radius grows with the agent's own length.
    pub fn radius_for(&self, segments: f32) -> f32 {
        (self.detection_radius + segments.max(0.0) * self.detection_radius_per_segment)
            .min(self.detection_radius_max)
    }
}
