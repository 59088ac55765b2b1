//! Sensor Array Configuration

use serde::{Deserialize, Serialize};

/// Radar tunables: radii, clearance thresholds, danger floors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    // === Rival bodies ===
    /// Bodies farther than this are ignored by the radar
    pub body_avoid_radius: f32,
    /// Clearance below which the scoring engine penalizes sharply
    pub wall_clearance: f32,
    /// Clearance below which a sector sits in the danger ring
    pub danger_clearance: f32,
    /// Clearance required for a sector to count as an escape route
    pub safe_clearance: f32,
    /// Clearance below which bodies hard-block regardless of heading
    pub hard_block_clearance: f32,
    /// Stopping distance at zero speed
    pub stopping_distance_base: f32,
    /// Extra stopping distance per unit of speed
    pub stopping_distance_per_speed: f32,
    /// Half-angle of the forward cone (rad)
    pub forward_cone: f32,
    /// Clearance added per sector away from an obstacle's own sector
    pub clearance_falloff: f32,

    // === Arena boundary ===
    pub boundary_hard_limit: f32,
    /// Hard limit grows by this much per unit of agent speed
    pub boundary_speed_margin: f32,
    pub boundary_buffer: f32,
    pub boundary_block_spread: usize,

    // === Rival heads ===
    pub head_threat_radius: f32,
    /// Radius widening per unit of rival speed (capped at 1.5x)
    pub head_radius_per_speed: f32,
    pub head_block_threshold: f32,
    pub head_block_spread: usize,
    pub prediction_block_radius: f32,
    pub prediction_block_spread: usize,
    pub boost_amplifier: f32,
    pub hunting_amplifier: f32,
    pub aggressive_amplifier: f32,
    pub aggressive_threshold: f32,

    // === Crowding ===
    pub max_safe_rivals: usize,
    pub segment_saturation: f32,
    pub density_threshold: f32,
    pub crowd_danger_floor: f32,
    pub min_escape_routes: usize,
    pub scarce_route_danger: f32,

    // === Compound danger ===
    pub wall_danger_min: f32,
    pub converging_radius: f32,
    pub converging_amplifier: f32,
    /// Trap urgency above which the trap gap overrides the escape angle
    pub trap_override_urgency: f32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            body_avoid_radius: 600.0,
            wall_clearance: 60.0,
            danger_clearance: 150.0,
            safe_clearance: 200.0,
            hard_block_clearance: 80.0,
            stopping_distance_base: 120.0,
            stopping_distance_per_speed: 20.0,
            forward_cone: 0.5,
            clearance_falloff: 2.0,

            boundary_hard_limit: 1200.0,
            boundary_speed_margin: 10.0,
            boundary_buffer: 2500.0,
            boundary_block_spread: 30,

            head_threat_radius: 700.0,
            head_radius_per_speed: 15.0,
            head_block_threshold: 0.15,
            head_block_spread: 40,
            prediction_block_radius: 250.0,
            prediction_block_spread: 20,
            boost_amplifier: 1.4,
            hunting_amplifier: 1.3,
            aggressive_amplifier: 1.15,
            aggressive_threshold: 0.6,

            max_safe_rivals: 3,
            segment_saturation: 150.0,
            density_threshold: 0.6,
            crowd_danger_floor: 0.6,
            min_escape_routes: 6,
            scarce_route_danger: 0.85,

            wall_danger_min: 0.3,
            converging_radius: 800.0,
            converging_amplifier: 1.3,
            trap_override_urgency: 0.5,
        }
    }
}

impl SensorConfig {
    /// Stopping distance at the given speed.
    pub fn stopping_distance(&self, speed: f32) -> f32 {
        self.stopping_distance_base + speed.max(0.0) * self.stopping_distance_per_speed
    }
}
