//! Arena boundary pass
//!
//! The arena is a disk. Along each sector pointing roughly outward the
//! distance to the rim is the radial gap divided by the cosine between the
//! sector and the outward radial direction.

use super::{EscapeAccumulator, HazardKind, SensorArray};
use crate::config::SensorConfig;
use crate::geometry::{bearing, distance};
use crate::sector::{angle_to_sector, sector_to_angle, SECTOR_COUNT};
use crate::snapshot::{Agent, Arena};

/// Sectors whose cosine to the outward direction is below this ignore the rim
const OUTWARD_COS_MIN: f32 = 0.1;

/// Returns boundary danger in [0, 1].
pub(super) fn apply(
    array: &mut SensorArray,
    agent: &Agent,
    arena: &Arena,
    cfg: &SensorConfig,
    escape: &mut EscapeAccumulator,
) -> f32 {
    let from_center = distance(arena.center, agent.pos);
    let rim_gap = arena.radius - from_center;
    let hard_limit = cfg.boundary_hard_limit + agent.speed * cfg.boundary_speed_margin;

    // Rim out of sensing range
    if rim_gap >= hard_limit + cfg.boundary_buffer {
        return 0.0;
    }

    let outward = if from_center > 1e-3 { bearing(arena.center, agent.pos) } else { agent.heading };
    let rim_gap = rim_gap.max(0.0);

    for s in 0..SECTOR_COUNT {
        let cos_a = (sector_to_angle(s) - outward).cos();
        if cos_a <= OUTWARD_COS_MIN {
            continue;
        }
        let along = rim_gap / cos_a - agent.radius;
        array.write_clearance(s, along.max(0.0), HazardKind::Edge);
    }

    let danger = if rim_gap < hard_limit {
        array.block_around(angle_to_sector(outward), cfg.boundary_block_spread);
        1.0
    } else {
        (1.0 - (rim_gap - hard_limit) / cfg.boundary_buffer).clamp(0.0, 1.0)
    };

    escape.push(outward + std::f32::consts::PI, danger);
    danger
}
