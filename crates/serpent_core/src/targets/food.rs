//! Consumable selector
//!
//! Rejections run cheapest first; survivors are scored by value over
//! distance. A target area that stops getting closer is abandoned for a
//! while.

use tracing::debug;

use super::{TargetCandidate, TargetKind};
use crate::config::FoodConfig;
use crate::geometry::{angle_diff, bearing, distance, path_clear};
use crate::scanner::ScanResult;
use crate::sector::{angle_to_sector, offset_sector, sectors_around};
use crate::sensor::{SensorArray, SensorSummary};
use crate::snapshot::{RivalId, WorldSnapshot};

/// Progress bookkeeping for the area currently pursued
#[derive(Clone, Copy, Debug, PartialEq)]
struct Pursuit {
    anchor: (f32, f32),
    best_dist: f32,
    last_progress_ms: u64,
}

#[derive(Clone, Debug, Default)]
pub struct FoodSelector {
    pursuit: Option<Pursuit>,
    /// (area center, blocked until)
    abandoned: Vec<((f32, f32), u64)>,
}

impl FoodSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.pursuit = None;
        self.abandoned.clear();
    }

    pub fn abandoned_areas(&self) -> usize {
        self.abandoned.len()
    }

    pub fn select(
        &mut self,
        world: &WorldSnapshot,
        scan: &ScanResult,
        array: &SensorArray,
        summary: &SensorSummary,
        cfg: &FoodConfig,
    ) -> Option<TargetCandidate> {
        let now = world.timestamp_ms;
        self.abandoned.retain(|&(_, until)| until > now);

        if summary.danger > 1.0 - cfg.min_safety_to_eat {
            self.pursuit = None;
            return None;
        }

        let mut candidates = self.candidates(world, scan, array, summary, cfg);
        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));

        while let Some(best) = candidates.first().cloned() {
            if self.track_progress(&best, now, cfg) {
                return Some(best);
            }
            candidates.retain(|c| distance(c.pos, best.pos) > cfg.abandon_area_radius);
        }
        self.pursuit = None;
        None
    }

    /// Returns false when the area just got abandoned.
    fn track_progress(&mut self, target: &TargetCandidate, now: u64, cfg: &FoodConfig) -> bool {
        match self.pursuit.as_mut() {
            Some(p) if distance(p.anchor, target.pos) <= cfg.abandon_area_radius => {
                p.anchor = target.pos;
                if target.distance < p.best_dist - cfg.progress_step {
                    p.best_dist = target.distance;
                    p.last_progress_ms = now;
                } else if now.saturating_sub(p.last_progress_ms) > cfg.stuck_timeout_ms {
                    debug!(x = p.anchor.0, y = p.anchor.1, "food target stuck, abandoning area");
                    self.abandoned.push((p.anchor, now.saturating_add(cfg.abandon_ttl_ms)));
                    self.pursuit = None;
                    return false;
                }
                true
            }
            _ => {
                self.pursuit = Some(Pursuit { anchor: target.pos, best_dist: target.distance, last_progress_ms: now });
                true
            }
        }
    }

    fn candidates(
        &self,
        world: &WorldSnapshot,
        scan: &ScanResult,
        array: &SensorArray,
        summary: &SensorSummary,
        cfg: &FoodConfig,
    ) -> Vec<TargetCandidate> {
        let agent = &world.agent;
        let radius = cfg.search_radius * (1.0 - 0.5 * summary.danger);

        let statics = world.foods.iter().map(|f| (f.pos, f.size, TargetKind::Food));
        let moving = world.preys.iter().map(|p| (p.pos, p.size, TargetKind::Prey));

        let mut out = Vec::new();
        for (pos, size, kind) in statics.chain(moving) {
            let dist = distance(agent.pos, pos);
            if !(dist.is_finite() && dist <= radius) {
                continue;
            }
            let prey = kind == TargetKind::Prey;

            if dist < cfg.min_distance {
                continue;
            }
            if summary.crowded && !(prey && dist < cfg.crowded_prey_radius) {
                continue;
            }
            if summary.escape_routes < cfg.min_routes {
                continue;
            }

            let angle = bearing(agent.pos, pos);
            let sector = angle_to_sector(angle);
            if flank_blocked(array, sector, cfg.flank_offset) {
                continue;
            }
            let clearance = array.clearance(sector);
            if clearance < dist + cfg.safety_clearance {
                continue;
            }
            if self.is_abandoned(pos, cfg) {
                continue;
            }
            if contested(scan, pos, cfg.contest_radius) {
                continue;
            }

            let margin = if !prey && size < cfg.small_size { cfg.body_margin * cfg.small_margin_scale } else { cfg.body_margin };
            if scan.bodies.iter().any(|b| distance(b.pos, pos) < margin) {
                continue;
            }
            if world.rivals.iter().any(|r| !r.dead && distance(r.pos, pos) < cfg.head_radius) {
                continue;
            }
            let obstacles = scan.bodies.iter().map(|b| (b.pos, b.radius));
            if !path_clear(agent.pos, pos, agent.radius + cfg.path_margin, obstacles) {
                continue;
            }

            let score = score_item(array, agent.heading, angle, sector, size, dist, clearance, prey, cfg);
            out.push(TargetCandidate { kind, pos, size, distance: dist, angle, score, rival: None });
        }
        out
    }

    fn is_abandoned(&self, pos: (f32, f32), cfg: &FoodConfig) -> bool {
        self.abandoned.iter().any(|&(area, _)| distance(area, pos) <= cfg.abandon_area_radius)
    }
}

/// The bearing sector or either flank is blocked.
fn flank_blocked(array: &SensorArray, sector: usize, flank: i32) -> bool {
    array.is_blocked(sector)
        || array.is_blocked(offset_sector(sector, flank))
        || array.is_blocked(offset_sector(sector, -flank))
}

/// Two or more distinct rivals have body near the item.
fn contested(scan: &ScanResult, pos: (f32, f32), radius: f32) -> bool {
    let mut owners: Vec<RivalId> = scan
        .bodies
        .iter()
        .filter(|b| distance(b.pos, pos) < radius)
        .map(|b| b.owner)
        .collect();
    owners.sort_unstable();
    owners.dedup();
    owners.len() >= 2
}

fn score_item(
    array: &SensorArray,
    heading: f32,
    angle: f32,
    sector: usize,
    size: f32,
    dist: f32,
    clearance: f32,
    prey: bool,
    cfg: &FoodConfig,
) -> f32 {
    let mut score = size / dist.max(1.0);
    if prey {
        score *= cfg.prey_priority;
    }

    let off_heading = angle_diff(heading, angle).abs() / std::f32::consts::PI;
    score *= 1.0 - cfg.heading_penalty * off_heading;

    if clearance >= dist * 2.0 {
        score *= cfg.clearance_bonus_high;
    } else if clearance >= dist * 1.5 {
        score *= cfg.clearance_bonus_low;
    }

    let span = cfg.corridor_span;
    let open = sectors_around(sector, span).filter(|&s| !array.is_blocked(s)).count();
    let corridor = open as f32 / (2 * span + 1) as f32;
    score * (1.0 + cfg.corridor_bonus * corridor)
}
