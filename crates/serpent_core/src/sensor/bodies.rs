//! Rival body pass
//!
//! Body points are static walls for the tick. Each one lowers the clearance
//! of its own sector and, with a linear falloff, of the neighbours covered
//! by its apparent width. Blocking widens as the wall gets closer.

use super::{EscapeAccumulator, HazardKind, SensorArray, WallRef};
use crate::config::SensorConfig;
use crate::geometry::{angle_diff, bearing};
use crate::scanner::ScanResult;
use crate::sector::{angle_to_sector, offset_sector};
use crate::snapshot::Agent;

/// Dead-ahead blocks never exceed a quarter circle each side
const MAX_AHEAD_SPREAD: usize = 90;
const MAX_NEAR_SPREAD: usize = 60;
const DANGER_RING_EXTRA: usize = 3;
const MAX_APPARENT_SPREAD: usize = 30;

pub(super) struct BodyPass {
    pub wall_danger: f32,
    pub forward_danger: f32,
    pub nearest_wall: Option<WallRef>,
    pub nearby_rivals: usize,
    pub segment_density: f32,
}

pub(super) fn apply(
    array: &mut SensorArray,
    agent: &Agent,
    scan: &ScanResult,
    cfg: &SensorConfig,
    stopping_distance: f32,
    escape: &mut EscapeAccumulator,
) -> BodyPass {
    let mut nearest_wall: Option<WallRef> = None;
    let mut forward_danger: f32 = 0.0;
    let mut owners = Vec::new();
    let mut segment_count = 0usize;

    for sample in scan.bodies.iter().take_while(|b| b.dist <= cfg.body_avoid_radius) {
        if !(sample.dist.is_finite() && sample.radius.is_finite()) {
            continue;
        }
        segment_count += 1;
        owners.push(sample.owner);

        let angle = bearing(agent.pos, sample.pos);
        let sector = angle_to_sector(angle);
        let clearance = sample.dist - agent.radius - sample.radius;

        // Apparent half-width in sectors
        let half_width = (agent.radius + sample.radius).atan2(sample.dist.max(1.0)).to_degrees();
        let apparent = (half_width.ceil() as usize).clamp(1, MAX_APPARENT_SPREAD);

        array.write_clearance(sector, clearance, HazardKind::Enemy);
        for k in 1..=apparent {
            let c = clearance + k as f32 * cfg.clearance_falloff;
            array.write_clearance(offset_sector(sector, k as i32), c, HazardKind::Enemy);
            array.write_clearance(offset_sector(sector, -(k as i32)), c, HazardKind::Enemy);
        }

        if nearest_wall.map_or(true, |w| clearance < w.clearance) {
            nearest_wall = Some(WallRef { clearance, angle, owner: sample.owner });
        }

        let ahead = angle_diff(agent.heading, angle).abs() <= cfg.forward_cone;
        if ahead && clearance < stopping_distance {
            forward_danger = forward_danger.max(1.0 - clearance / stopping_distance);
        }

        let spread = if ahead && clearance < stopping_distance {
            let proximity = (1.0 - clearance / stopping_distance).clamp(0.0, 1.0);
            Some((apparent + (proximity * MAX_AHEAD_SPREAD as f32).round() as usize).min(MAX_AHEAD_SPREAD))
        } else if clearance < cfg.hard_block_clearance {
            let proximity = (1.0 - clearance / cfg.hard_block_clearance).clamp(0.0, 1.0);
            Some((apparent + (proximity * 45.0).round() as usize).min(MAX_NEAR_SPREAD))
        } else if clearance < cfg.danger_clearance {
            Some(apparent + DANGER_RING_EXTRA)
        } else {
            None
        };
        if let Some(spread) = spread {
            array.block_around(sector, spread);
        }

        if clearance < cfg.danger_clearance {
            let weight = (1.0 - clearance / cfg.danger_clearance).max(0.05);
            escape.push(angle + std::f32::consts::PI, weight);
        }
    }

    owners.sort_unstable();
    owners.dedup();

    let wall_danger = nearest_wall
        .map(|w| (1.0 - w.clearance / cfg.safe_clearance).clamp(0.0, 1.0))
        .unwrap_or(0.0);

    BodyPass {
        wall_danger,
        forward_danger: forward_danger.clamp(0.0, 1.0),
        nearest_wall,
        nearby_rivals: owners.len(),
        segment_density: segment_count as f32 / cfg.segment_saturation,
    }
}
