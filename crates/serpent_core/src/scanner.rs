//! Obstacle scanner
//!
//! Read-only radius query over every live rival: body points become
//! static walls for the tick, head points carry the full motion state.
//! Both lists come back sorted nearest-first.

use serde::Serialize;

use crate::geometry::{dist_sq, distance};
use crate::snapshot::{RivalId, WorldSnapshot};

/// One rival body point within range
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BodySample {
    pub pos: (f32, f32),
    pub dist: f32,
    /// Wall radius of the owning rival
    pub radius: f32,
    pub owner: RivalId,
}

/// One rival head within range
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HeadSample {
    pub id: RivalId,
    pub pos: (f32, f32),
    pub dist: f32,
    pub heading: f32,
    pub speed: f32,
    pub max_speed: f32,
    pub radius: f32,
    pub segments: f32,
}

/// Result of a radius query
#[derive(Clone, Debug, Default, Serialize)]
pub struct ScanResult {
    pub bodies: Vec<BodySample>,
    pub heads: Vec<HeadSample>,
}

impl ScanResult {
    /// Collect all rival body and head points within `radius` of `origin`.
    pub fn collect(world: &WorldSnapshot, origin: (f32, f32), radius: f32) -> Self {
        let radius = if radius.is_finite() { radius.max(0.0) } else { 0.0 };
        let radius_sq = radius * radius;
        let mut bodies = Vec::new();
        let mut heads = Vec::new();

        for rival in world.rivals.iter().filter(|r| !r.dead) {
            if dist_sq(origin, rival.pos) <= radius_sq {
                heads.push(HeadSample {
                    id: rival.id,
                    pos: rival.pos,
                    dist: distance(origin, rival.pos),
                    heading: rival.heading,
                    speed: rival.speed,
                    max_speed: rival.max_speed,
                    radius: rival.radius,
                    segments: rival.segments,
                });
            }

            for &point in &rival.body {
                if dist_sq(origin, point) <= radius_sq {
                    bodies.push(BodySample {
                        pos: point,
                        dist: distance(origin, point),
                        radius: rival.radius,
                        owner: rival.id,
                    });
                }
            }
        }

        bodies.sort_by(|a, b| a.dist.total_cmp(&b.dist));
        heads.sort_by(|a, b| a.dist.total_cmp(&b.dist));

        Self { bodies, heads }
    }

    /// Distinct rivals contributing body samples, ascending by id.
    pub fn body_owners(&self) -> Vec<RivalId> {
        let mut owners: Vec<RivalId> = self.bodies.iter().map(|b| b.owner).collect();
        owners.sort_unstable();
        owners.dedup();
        owners
    }

    pub fn bodies_of(&self, id: RivalId) -> impl Iterator<Item = &BodySample> {
        self.bodies.iter().filter(move |b| b.owner == id)
    }
}
