//! Learned behavior profile of one rival

use serde::Serialize;

use crate::config::TrackerConfig;

/// Inputs for one profile update
#[derive(Clone, Copy, Debug)]
pub struct Observation {
    /// |heading change| since the previous sighting (rad)
    pub heading_delta: f32,
    pub boosting: bool,
    pub dist: f32,
    pub prev_dist: Option<f32>,
    /// Angle between the rival's heading and its bearing to the agent
    pub aim_error: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BehaviorProfile {
    /// [0, 1]
    pub aggression: f32,
    /// [0, 1]; 1 = flies straight
    pub predictability: f32,
    /// [0, 1]
    pub boost_frequency: f32,
    /// Smoothed |heading change| per tick
    pub turn_rate: f32,
    pub hunting_us: bool,
    pub approach_count: u32,
    pub far_ticks: u32,
}

impl Default for BehaviorProfile {
    fn default() -> Self {
        Self {
            aggression: 0.0,
            predictability: 0.5,
            boost_frequency: 0.0,
            turn_rate: 0.0,
            hunting_us: false,
            approach_count: 0,
            far_ticks: 0,
        }
    }
}

/// Turn rate below this counts as flying straight
const STRAIGHT_TURN_RATE: f32 = 0.02;
const PREDICTABILITY_GAIN: f32 = 0.05;
const PREDICTABILITY_LOSS: f32 = 0.5;

impl BehaviorProfile {
    pub fn update(&mut self, obs: &Observation, cfg: &TrackerConfig) {
        let s = cfg.turn_smoothing;
        self.turn_rate = s * self.turn_rate + (1.0 - s) * obs.heading_delta.abs();

        if obs.boosting {
            self.boost_frequency = (self.boost_frequency + cfg.boost_gain).min(1.0);
        } else {
            self.boost_frequency *= cfg.boost_decay;
        }

        let closer = obs.prev_dist.is_some_and(|prev| obs.dist < prev);
        if obs.dist < cfg.approach_radius && obs.aim_error.abs() < cfg.approach_cone && closer {
            self.approach_count = self.approach_count.saturating_add(1);
            self.aggression = (self.aggression + cfg.aggression_gain).min(1.0);
        }

        if obs.dist > cfg.far_radius {
            self.far_ticks = self.far_ticks.saturating_add(1);
            if self.far_ticks > cfg.far_decay_ticks {
                self.aggression *= cfg.aggression_decay;
                self.hunting_us = false;
                self.approach_count = 0;
            }
        } else {
            self.far_ticks = 0;
        }

        if self.approach_count > cfg.hunting_threshold {
            self.hunting_us = true;
        }

        if self.turn_rate < STRAIGHT_TURN_RATE {
            self.predictability = (self.predictability + PREDICTABILITY_GAIN).min(1.0);
        } else {
            self.predictability = (self.predictability - self.turn_rate * PREDICTABILITY_LOSS).max(0.0);
        }
    }
}
