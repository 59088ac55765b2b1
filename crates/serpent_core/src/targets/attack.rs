//! Rival cutoff selector
//!
//! Only runs when the field is calm: low danger, no crowd, nobody
//! converging, plenty of escape routes and at most one rival around.
//! Prefers cutting in front of an isolated, much shorter rival; falls back
//! to chasing a slower one that is running away.

use super::{TargetCandidate, TargetKind};
use crate::config::AttackConfig;
use crate::geometry::{angle_diff, bearing, distance, offset, path_clear, plan_intercept};
use crate::scanner::{HeadSample, ScanResult};
use crate::sensor::SensorSummary;
use crate::snapshot::{Agent, WorldSnapshot};

#[derive(Clone, Debug, Default)]
pub struct AttackSelector;

impl AttackSelector {
    pub fn new() -> Self {
        Self
    }

    /// Length the agent needs before attacking at the current danger.
    pub fn min_length(summary: &SensorSummary, cfg: &AttackConfig) -> f32 {
        cfg.min_length * (1.0 + summary.danger)
    }

    pub fn select(
        &self,
        world: &WorldSnapshot,
        scan: &ScanResult,
        summary: &SensorSummary,
        agent_length: f32,
        cfg: &AttackConfig,
    ) -> Option<TargetCandidate> {
        let agent = &world.agent;
        let nearby: Vec<&HeadSample> = scan.heads.iter().filter(|h| h.dist <= cfg.search_radius).collect();

        let calm = cfg.enabled
            && agent_length > Self::min_length(summary, cfg)
            && summary.danger <= cfg.max_danger
            && !summary.crowded
            && summary.converging == 0
            && summary.escape_routes >= cfg.min_routes
            && nearby.len() <= cfg.max_nearby_rivals;
        if !calm {
            return None;
        }

        let eligible: Vec<&HeadSample> = nearby
            .into_iter()
            .filter(|h| isolated(world, h, h.pos, cfg.isolation_radius))
            .filter(|h| agent.segments >= h.segments * cfg.length_advantage)
            .collect();

        let cutoff = eligible
            .iter()
            .filter_map(|h| cutoff_candidate(world, agent, scan, h, cfg))
            .max_by(|a, b| a.score.total_cmp(&b.score));
        if cutoff.is_some() {
            return cutoff;
        }

        eligible
            .iter()
            .filter_map(|h| chase_candidate(agent, scan, h, cfg))
            .max_by(|a, b| a.score.total_cmp(&b.score))
    }
}

/// No other live rival head within `radius` of `point`.
fn isolated(world: &WorldSnapshot, target: &HeadSample, point: (f32, f32), radius: f32) -> bool {
    !world
        .rivals
        .iter()
        .any(|r| !r.dead && r.id != target.id && distance(r.pos, point) < radius)
}

fn corridor_clear(agent: &Agent, scan: &ScanResult, to: (f32, f32)) -> bool {
    path_clear(agent.pos, to, agent.radius, scan.bodies.iter().map(|b| (b.pos, b.radius)))
}

fn cutoff_candidate(
    world: &WorldSnapshot,
    agent: &Agent,
    scan: &ScanResult,
    head: &HeadSample,
    cfg: &AttackConfig,
) -> Option<TargetCandidate> {
    let plan = plan_intercept(
        agent.pos,
        agent.speed,
        head.pos,
        head.heading,
        head.speed,
        cfg.projection_ticks,
        cfg.projection_margin,
    );
    if !isolated(world, head, plan.point, cfg.projected_isolation_radius) {
        return None;
    }
    if !plan.pursuer_wins(cfg.time_slack) || !corridor_clear(agent, scan, plan.point) {
        return None;
    }

    let proximity = (1.0 - head.dist / cfg.search_radius).clamp(0.0, 1.0);
    let facing = angle_diff(head.heading, bearing(head.pos, agent.pos)).cos().max(0.0);
    let dist = distance(agent.pos, plan.point);
    Some(TargetCandidate {
        kind: TargetKind::Cutoff,
        pos: plan.point,
        size: head.segments,
        distance: dist,
        angle: bearing(agent.pos, plan.point),
        score: proximity * (1.0 + facing),
        rival: Some(head.id),
    })
}

fn chase_candidate(agent: &Agent, scan: &ScanResult, head: &HeadSample, cfg: &AttackConfig) -> Option<TargetCandidate> {
    let away = bearing(agent.pos, head.pos);
    let fleeing = angle_diff(away, head.heading).abs() < std::f32::consts::FRAC_PI_2;
    if head.dist > cfg.chase_radius || head.speed >= agent.speed || !fleeing {
        return None;
    }
    let aim = offset(head.pos, head.heading, head.radius * 2.0);
    if !corridor_clear(agent, scan, aim) {
        return None;
    }
    Some(TargetCandidate {
        kind: TargetKind::Chase,
        pos: aim,
        size: head.segments,
        distance: distance(agent.pos, aim),
        angle: bearing(agent.pos, aim),
        score: (1.0 - head.dist / cfg.chase_radius).clamp(0.0, 1.0) * cfg.chase_score_factor,
        rival: Some(head.id),
    })
}
