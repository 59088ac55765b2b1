//! Rival head pass
//!
//! Heads are the only parts that kill, so they get a lookup-table danger
//! amplified by what the tracker has learned about the rival.

use super::{EscapeAccumulator, HazardKind, SensorArray};
use crate::config::SensorConfig;
use crate::geometry::{angle_diff, bearing, distance};
use crate::scanner::ScanResult;
use crate::sector::angle_to_sector;
use crate::snapshot::Agent;
use crate::tracker::EntityTracker;

/// Upper bounds of the distance bands; the last band ends at the threat radius
const DISTANCE_BANDS: [f32; 4] = [100.0, 200.0, 350.0, 500.0];

/// Rows: distance band. Columns: cone <=30, <=60, <=90, >90 degrees.
const HEAD_DANGER_TABLE: [[f32; 4]; 5] = [
    [1.00, 1.00, 1.00, 1.00],
    [0.90, 0.75, 0.60, 0.40],
    [0.70, 0.55, 0.40, 0.25],
    [0.50, 0.35, 0.25, 0.12],
    [0.30, 0.20, 0.12, 0.05],
];

/// Base danger of a head at `dist`, where `cone` is the angle between the
/// rival's heading and its bearing to the agent. Zero beyond `radius`.
pub fn head_danger_lookup(dist: f32, cone: f32, radius: f32) -> f32 {
    if !(dist.is_finite() && dist < radius) {
        return 0.0;
    }
    let row = DISTANCE_BANDS.iter().position(|&band| dist < band).unwrap_or(DISTANCE_BANDS.len());
    let cone_deg = cone.abs().to_degrees();
    let col = if cone_deg <= 30.0 {
        0
    } else if cone_deg <= 60.0 {
        1
    } else if cone_deg <= 90.0 {
        2
    } else {
        3
    };
    HEAD_DANGER_TABLE[row][col]
}

pub(super) struct HeadPass {
    pub head_danger: f32,
    pub converging: usize,
}

pub(super) fn apply(
    array: &mut SensorArray,
    agent: &Agent,
    scan: &ScanResult,
    tracker: &EntityTracker,
    cfg: &SensorConfig,
    escape: &mut EscapeAccumulator,
) -> HeadPass {
    let mut head_danger: f32 = 0.0;
    let mut converging = 0usize;

    for head in &scan.heads {
        if !head.dist.is_finite() {
            continue;
        }
        let tracked = tracker.get(head.id);

        if head.dist < cfg.converging_radius && tracked.is_some_and(|t| t.approaching) {
            converging += 1;
        }

        let radius = (cfg.head_threat_radius + head.speed * cfg.head_radius_per_speed)
            .min(cfg.head_threat_radius * 1.5);
        if head.dist >= radius {
            continue;
        }

        let toward_head = bearing(agent.pos, head.pos);
        let cone = angle_diff(head.heading, toward_head + std::f32::consts::PI);
        let mut danger = head_danger_lookup(head.dist, cone, radius);

        let boosting = match tracked {
            Some(t) => t.boosting,
            None => head.max_speed > 0.0 && head.speed > head.max_speed * 0.75,
        };
        if boosting {
            danger *= cfg.boost_amplifier;
        }
        if let Some(t) = tracked {
            if t.profile.hunting_us {
                danger *= cfg.hunting_amplifier;
            } else if t.profile.aggression >= cfg.aggressive_threshold {
                danger *= cfg.aggressive_amplifier;
            }

            if t.prediction.confidence > 0.5
                && distance(t.prediction.pos, agent.pos) < cfg.prediction_block_radius
            {
                let predicted = angle_to_sector(bearing(agent.pos, t.prediction.pos));
                array.block_around(predicted, cfg.prediction_block_spread);
            }
        }
        let danger = danger.clamp(0.0, 1.0);
        head_danger = head_danger.max(danger);

        let sector = angle_to_sector(toward_head);
        array.write_clearance(sector, head.dist - agent.radius - head.radius, HazardKind::Enemy);

        if danger > cfg.head_block_threshold {
            escape.push(toward_head + std::f32::consts::PI, danger);
            array.block_around(sector, cfg.head_block_spread);
        }
    }

    HeadPass { head_danger, converging }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::f32::consts::{FRAC_PI_2, PI};

    use crate::config::TrackerConfig;
    use crate::scenario_builder::ScenarioBuilder;
    use crate::snapshot::RivalId;
    use crate::tracker::{Prediction, TrackedRival};

    /// Rival 400 units ahead, facing the agent: base danger 0.50.
    fn pass_with(tweak: impl FnOnce(&mut TrackedRival)) -> (SensorArray, HeadPass) {
        let world = ScenarioBuilder::new().agent_at(0.0, 0.0, 0.0).rival(7, (400.0, 0.0), PI).build();
        let mut tracker = EntityTracker::new();
        tracker.update(&world, &TrackerConfig::default());
        if let Some(r) = tracker.get_mut(RivalId(7)) {
            tweak(r);
        }
        let scan = ScanResult::collect(&world, world.agent.pos, 2000.0);
        let mut array = SensorArray::new();
        let mut escape = EscapeAccumulator::default();
        let pass = apply(&mut array, &world.agent, &scan, &tracker, &SensorConfig::default(), &mut escape);
        (array, pass)
    }

    #[test]
    fn test_tracked_behaviour_amplifies_danger() {
        let cfg = SensorConfig::default();
        let (_, plain) = pass_with(|_| {});
        assert!((plain.head_danger - 0.50).abs() < 1e-6);

        let (_, boosting) = pass_with(|r| r.boosting = true);
        assert!((boosting.head_danger - 0.50 * cfg.boost_amplifier).abs() < 1e-5);

        let (_, hunting) = pass_with(|r| r.profile.hunting_us = true);
        assert!((hunting.head_danger - 0.50 * cfg.hunting_amplifier).abs() < 1e-5);

        let (_, aggressive) = pass_with(|r| r.profile.aggression = cfg.aggressive_threshold);
        assert!((aggressive.head_danger - 0.50 * cfg.aggressive_amplifier).abs() < 1e-5);

        // Hunting replaces the aggression factor; boost stacks on top
        let (_, all) = pass_with(|r| {
            r.boosting = true;
            r.profile.hunting_us = true;
            r.profile.aggression = 1.0;
        });
        let expected = 0.50 * cfg.boost_amplifier * cfg.hunting_amplifier;
        assert!((all.head_danger - expected).abs() < 1e-5);
    }

    #[test]
    fn test_confident_prediction_blocks_ahead_of_time() {
        let predicted = angle_to_sector(FRAC_PI_2);

        let (array, _) = pass_with(|r| r.prediction = Prediction { pos: (0.0, 150.0), confidence: 0.9 });
        assert!(array.is_blocked(predicted));

        let (array, _) = pass_with(|r| r.prediction = Prediction { pos: (0.0, 150.0), confidence: 0.4 });
        assert!(!array.is_blocked(predicted));

        // Confident but beyond the block radius
        let (array, _) = pass_with(|r| r.prediction = Prediction { pos: (0.0, 400.0), confidence: 0.9 });
        assert!(!array.is_blocked(predicted));
    }

    #[test]
    fn test_lookup_bands() {
        assert_eq!(head_danger_lookup(50.0, 3.0, 700.0), 1.0);
        assert_eq!(head_danger_lookup(150.0, 0.1, 700.0), 0.90);
        assert_eq!(head_danger_lookup(150.0, 2.0, 700.0), 0.40);
        assert_eq!(head_danger_lookup(600.0, 0.0, 700.0), 0.30);
        assert_eq!(head_danger_lookup(800.0, 0.0, 700.0), 0.0);
        assert_eq!(head_danger_lookup(f32::NAN, 0.0, 700.0), 0.0);
    }

    #[test]
    fn test_lookup_monotonic_in_distance() {
        for col_angle in [0.0f32, 0.8, 1.3, 2.5] {
            let mut last = 2.0;
            for d in [50.0, 150.0, 300.0, 450.0, 650.0] {
                let v = head_danger_lookup(d, col_angle, 700.0);
                assert!(v <= last);
                last = v;
            }
        }
    }
}
