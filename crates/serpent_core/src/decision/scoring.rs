//! Per-sector scoring
//!
//! score(s) = blocked + clearance + heads + momentum + center pull
//!          + food + attack + escape
//!
//! Every term is independent; the highest total wins and ties go to the
//! sector the agent is already heading into.

use crate::config::BotConfig;
use crate::geometry::{angle_diff, bearing};
use crate::scanner::ScanResult;
use crate::sector::{angle_to_sector, sector_distance, sector_to_angle, SECTOR_COUNT};
use crate::sensor::{SensorArray, SensorSummary};
use crate::snapshot::WorldSnapshot;
use crate::targets::TargetCandidate;

/// Signals fused by the scorer for one tick
pub struct ScoreInputs<'a> {
    pub world: &'a WorldSnapshot,
    pub scan: &'a ScanResult,
    pub array: &'a SensorArray,
    pub summary: &'a SensorSummary,
    pub food: Option<&'a TargetCandidate>,
    pub attack: Option<&'a TargetCandidate>,
}

/// Triangular falloff: 1 at distance 0, 0 at `span` and beyond.
#[inline]
fn falloff(d: usize, span: usize) -> f32 {
    if span == 0 || d > span {
        0.0
    } else {
        1.0 - d as f32 / span as f32
    }
}

/// Head within threat range: (sector, closeness in [0, 1])
fn head_pressure(inputs: &ScoreInputs<'_>, cfg: &BotConfig) -> Vec<(usize, f32)> {
    let agent = &inputs.world.agent;
    let radius = cfg.sensor.head_threat_radius;
    inputs
        .scan
        .heads
        .iter()
        .filter(|h| h.dist.is_finite() && h.dist < radius)
        .map(|h| (angle_to_sector(bearing(agent.pos, h.pos)), 1.0 - h.dist / radius))
        .collect()
}

/// Strength of a consumable pull from its value, distance and priority.
fn food_strength(food: &TargetCandidate, cfg: &BotConfig) -> f32 {
    let value = (food.size / food.distance.max(1.0) * 100.0).clamp(0.2, 2.0);
    if food.is_prey() {
        value * cfg.food.prey_priority
    } else {
        value
    }
}

/// Fill `scores` (one per sector) and return the winning sector.
pub fn score_sectors(inputs: &ScoreInputs<'_>, scores: &mut Vec<f32>, cfg: &BotConfig) -> usize {
    let d = &cfg.decision;
    let agent = &inputs.world.agent;
    let summary = inputs.summary;
    let array = inputs.array;

    scores.clear();
    scores.resize(SECTOR_COUNT, 0.0);

    let heading_sector = angle_to_sector(agent.heading);
    let heads = head_pressure(inputs, cfg);
    let center_bearing = bearing(agent.pos, inputs.world.arena.center);
    let escape_sector = angle_to_sector(summary.escape_angle);

    let food = inputs.food.map(|f| (angle_to_sector(f.angle), f.distance, food_strength(f, cfg)));
    let attack = inputs
        .attack
        .filter(|_| summary.danger <= cfg.attack.max_danger)
        .map(|a| (angle_to_sector(a.angle), a.distance, 1.0 + a.score));

    for (s, score) in scores.iter_mut().enumerate() {
        let reading = array.reading(s);
        let mut total = 0.0;

        // (a) blocked
        if reading.blocked {
            total -= d.blocked_penalty;
        }

        // (b) clearance
        let c = reading.clearance.min(d.clearance_cap).max(0.0);
        total += d.clearance_weight * c / d.clearance_cap;
        if c < cfg.sensor.wall_clearance {
            total -= d.wall_penalty * (1.0 - c / cfg.sensor.wall_clearance);
        }

        // (c) nearby heads
        for &(hs, closeness) in &heads {
            total -= d.head_penalty * closeness * falloff(sector_distance(s, hs), d.head_span);
        }

        // (d) momentum
        total += d.momentum_weight * falloff(sector_distance(s, heading_sector), SECTOR_COUNT / 2);

        // (e) center pull
        if summary.boundary_danger > 0.0 {
            let toward = (1.0 + angle_diff(sector_to_angle(s), center_bearing).cos()) * 0.5;
            total += d.center_weight * summary.boundary_danger * toward;
        }

        // (f) consumable
        if let Some((fs, dist, strength)) = food {
            if !reading.blocked && reading.clearance >= dist {
                total += d.food_weight * strength * falloff(sector_distance(s, fs), d.food_span);
            }
        }

        // (g) attack
        if let Some((as_, dist, strength)) = attack {
            if !reading.blocked && reading.clearance >= dist {
                total += d.attack_weight * strength * falloff(sector_distance(s, as_), d.attack_span);
            }
        }

        // (h) escape
        if summary.danger > d.escape_min_danger {
            total += d.escape_weight * summary.danger * falloff(sector_distance(s, escape_sector), d.escape_span);
        }

        *score = if total.is_finite() { total } else { -f32::MAX };
    }

    let mut best = heading_sector;
    for (s, &score) in scores.iter().enumerate() {
        if score > scores[best] {
            best = s;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario_builder::ScenarioBuilder;
    use crate::sector::offset_sector;
    use crate::tracker::EntityTracker;

    fn run(world: &WorldSnapshot, food: Option<&TargetCandidate>) -> (usize, Vec<f32>) {
        let cfg = BotConfig::default();
        let tracker = EntityTracker::new();
        let scan = ScanResult::collect(world, world.agent.pos, 1200.0);
        let mut array = SensorArray::new();
        let summary = array.sense(world, &scan, &tracker, &cfg.sensor);
        let inputs = ScoreInputs { world, scan: &scan, array: &array, summary: &summary, food, attack: None };
        let mut scores = Vec::new();
        let best = score_sectors(&inputs, &mut scores, &cfg);
        (best, scores)
    }

    #[test]
    fn test_open_field_keeps_heading() {
        let world = ScenarioBuilder::new().agent_at(0.0, 0.0, 1.0).build();
        let (best, scores) = run(&world, None);
        assert_eq!(best, angle_to_sector(1.0));
        assert_eq!(scores.len(), SECTOR_COUNT);
    }

    #[test]
    fn test_blocked_sector_never_wins_over_open() {
        let world = ScenarioBuilder::new()
            .agent_at(0.0, 0.0, 0.0)
            .rival_line(2, (60.0, -200.0), (60.0, 200.0), 40)
            .build();
        let (best, scores) = run(&world, None);
        let ahead = angle_to_sector(0.0);
        assert!(scores[ahead] < -500.0);
        assert!(sector_distance(best, ahead) > 45);
    }

    #[test]
    fn test_food_pulls_heading() {
        let world = ScenarioBuilder::new().agent_at(0.0, 0.0, 0.0).build();
        let angle = 0.6f32;
        let food = TargetCandidate {
            kind: crate::targets::TargetKind::Food,
            pos: (300.0 * angle.cos(), 300.0 * angle.sin()),
            size: 5.0,
            distance: 300.0,
            angle,
            score: 1.0,
            rival: None,
        };
        let (best, _) = run(&world, Some(&food));
        assert_eq!(best, angle_to_sector(angle));
        assert_ne!(best, offset_sector(angle_to_sector(0.0), 0));
    }
}
