//! Sensor Array (radar)
//!
//! Per-tick picture of the hazards around the agent: for every sector the
//! clearance to the nearest hazard, what kind of hazard it is, and whether
//! steering that way is forbidden.
//!
//! ## Pass order (all buffers reset first)
//! 1. own trail -> own-body map only (the agent may steer alongside itself)
//! 2. arena boundary
//! 3. rival bodies (walls)
//! 4. crowding / escape routes
//! 5. rival heads
//! 6. compound danger + escape vector
//!
//! The encirclement override is applied afterwards by the pipeline via
//! [`SensorSummary::apply_encirclement`].

mod bodies;
mod boundary;
mod heads;

pub use heads::head_danger_lookup;

use serde::Serialize;

use crate::config::SensorConfig;
use crate::geometry::{bearing, distance, normalize_angle};
use crate::scanner::ScanResult;
use crate::sector::{angle_to_sector, sectors_around, SECTOR_COUNT};
use crate::snapshot::{RivalId, WorldSnapshot};
use crate::tracker::EntityTracker;
use crate::trap::EncirclementState;

/// What sits at the end of a sector's clearance
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum HazardKind {
    None,
    Enemy,
    Edge,
}

/// One sector of the radar
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SensorReading {
    /// Distance to the nearest hazard minus both radii (+inf when open)
    pub clearance: f32,
    pub kind: HazardKind,
    /// Never steer here; the clearance still serves as a tie-break
    pub blocked: bool,
}

impl SensorReading {
    pub const OPEN: Self = Self { clearance: f32::INFINITY, kind: HazardKind::None, blocked: false };

    pub fn is_open(&self) -> bool {
        self.kind == HazardKind::None && self.clearance.is_infinite() && !self.blocked
    }
}

/// Nearest rival wall seen this tick (diagnostics)
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct WallRef {
    pub clearance: f32,
    pub angle: f32,
    pub owner: RivalId,
}

/// Scalar outputs of one radar pass
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SensorSummary {
    /// Compound danger in [0, 1]
    pub danger: f32,
    pub head_danger: f32,
    pub boundary_danger: f32,
    pub wall_danger: f32,
    pub forward_danger: f32,
    pub escape_angle: f32,
    pub escape_routes: usize,
    pub crowded: bool,
    /// Distinct rivals with bodies inside the avoidance radius
    pub nearby_rivals: usize,
    /// Rivals independently assessed as closing in
    pub converging: usize,
    pub segment_density: f32,
    pub stopping_distance: f32,
    pub nearest_wall: Option<WallRef>,
}

impl SensorSummary {
    /// Total escape-route samples (one every 10 degrees).
    pub const ROUTE_SAMPLES: usize = SECTOR_COUNT / 10;

    /// Let an urgent encirclement take over the escape direction.
    pub fn apply_encirclement(&mut self, trap: Option<&EncirclementState>, cfg: &SensorConfig) {
        if let Some(trap) = trap {
            if trap.urgency > cfg.trap_override_urgency {
                self.escape_angle = trap.escape_angle;
                self.danger = self.danger.max(trap.urgency).clamp(0.0, 1.0);
            }
        }
    }
}

/// Weighted sum of unit vectors pointing away from danger
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct EscapeAccumulator {
    x: f32,
    y: f32,
    weight: f32,
}

impl EscapeAccumulator {
    pub(crate) fn push(&mut self, angle: f32, weight: f32) {
        if !(weight.is_finite() && weight > 0.0) {
            return;
        }
        self.x += angle.cos() * weight;
        self.y += angle.sin() * weight;
        self.weight += weight;
    }

    /// Average direction, or `fallback` when nothing contributed.
    pub(crate) fn resolve(&self, fallback: f32) -> f32 {
        if self.weight <= 1e-6 {
            return normalize_angle(fallback);
        }
        let (x, y) = (self.x / self.weight, self.y / self.weight);
        if x.abs() < 1e-6 && y.abs() < 1e-6 {
            return normalize_angle(fallback);
        }
        y.atan2(x)
    }
}

/// Radar buffers, owned by the pipeline context and overwritten every tick
#[derive(Clone, Debug, Serialize)]
pub struct SensorArray {
    readings: Vec<SensorReading>,
    own_body: Vec<f32>,
}

impl Default for SensorArray {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorArray {
    pub fn new() -> Self {
        Self {
            readings: vec![SensorReading::OPEN; SECTOR_COUNT],
            own_body: vec![f32::INFINITY; SECTOR_COUNT],
        }
    }

    pub fn reset(&mut self) {
        self.readings.fill(SensorReading::OPEN);
        self.own_body.fill(f32::INFINITY);
    }

    pub fn readings(&self) -> &[SensorReading] {
        &self.readings
    }

    pub fn own_body(&self) -> &[f32] {
        &self.own_body
    }

    #[inline]
    pub fn reading(&self, sector: usize) -> &SensorReading {
        &self.readings[sector % SECTOR_COUNT]
    }

    #[inline]
    pub fn is_blocked(&self, sector: usize) -> bool {
        self.readings[sector % SECTOR_COUNT].blocked
    }

    #[inline]
    pub fn clearance(&self, sector: usize) -> f32 {
        self.readings[sector % SECTOR_COUNT].clearance
    }

    #[cfg(test)]
    pub(crate) fn readings_mut(&mut self) -> &mut [SensorReading] {
        &mut self.readings
    }

    pub fn has_unblocked(&self) -> bool {
        self.readings.iter().any(|r| !r.blocked)
    }

    /// Lower a sector's clearance; returns whether it improved.
    pub(crate) fn write_clearance(&mut self, sector: usize, clearance: f32, kind: HazardKind) -> bool {
        let reading = &mut self.readings[sector % SECTOR_COUNT];
        if clearance < reading.clearance {
            reading.clearance = clearance;
            reading.kind = kind;
            true
        } else {
            false
        }
    }

    pub(crate) fn block_around(&mut self, center: usize, spread: usize) {
        for s in sectors_around(center, spread) {
            self.readings[s].blocked = true;
        }
    }

    /// Record the agent's own trail. Never touches clearance, kind or blocked.
    pub(crate) fn mark_own_body(&mut self, origin: (f32, f32), body: &[(f32, f32)], radius: f32) {
        for &point in body {
            let d = distance(origin, point);
            if d <= 1e-3 {
                continue;
            }
            let s = angle_to_sector(bearing(origin, point));
            let clearance = (d - radius * 2.0).max(0.0);
            if clearance < self.own_body[s] {
                self.own_body[s] = clearance;
            }
        }
    }

    /// Sample every 10 degrees; count unblocked sectors with safe clearance.
    pub fn escape_routes(&self, safe_clearance: f32) -> usize {
        (0..SECTOR_COUNT)
            .step_by(10)
            .filter(|&s| !self.readings[s].blocked && self.readings[s].clearance > safe_clearance)
            .count()
    }

    /// Unblocked sector with the largest clearance (lowest index on ties).
    pub fn widest_open_sector(&self) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (s, r) in self.readings.iter().enumerate() {
            if r.blocked {
                continue;
            }
            match best {
                Some((_, c)) if c >= r.clearance => {}
                _ => best = Some((s, r.clearance)),
            }
        }
        best.map(|(s, _)| s)
    }

    /// Sector along the own trail with the most room, if any trail is visible.
    pub fn roomiest_own_body_sector(&self) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (s, &d) in self.own_body.iter().enumerate() {
            if !d.is_finite() {
                continue;
            }
            match best {
                Some((_, c)) if c >= d => {}
                _ => best = Some((s, d)),
            }
        }
        best.map(|(s, _)| s)
    }

    /// Full radar pass for one tick.
    ///
    /// `scan` must cover at least the body-avoidance and head-threat radii.
    pub fn sense(
        &mut self,
        world: &WorldSnapshot,
        scan: &ScanResult,
        tracker: &EntityTracker,
        cfg: &SensorConfig,
    ) -> SensorSummary {
        let agent = &world.agent;
        self.reset();
        self.mark_own_body(agent.pos, &agent.body, agent.radius);

        let mut escape = EscapeAccumulator::default();
        let stopping_distance = cfg.stopping_distance(agent.speed);

        let boundary_danger = boundary::apply(self, agent, &world.arena, cfg, &mut escape);
        let walls = bodies::apply(self, agent, scan, cfg, stopping_distance, &mut escape);
        let heads = heads::apply(self, agent, scan, tracker, cfg, &mut escape);

        let crowded = walls.nearby_rivals > cfg.max_safe_rivals
            || walls.segment_density > cfg.density_threshold;
        let escape_routes = self.escape_routes(cfg.safe_clearance);

        let mut danger = heads.head_danger.max(boundary_danger);
        if walls.wall_danger >= cfg.wall_danger_min {
            danger = danger.max(walls.wall_danger);
        }
        if heads.converging >= 2 {
            danger *= cfg.converging_amplifier;
        }
        if crowded {
            danger = danger.max(cfg.crowd_danger_floor);
        }
        if escape_routes < cfg.min_escape_routes {
            danger = danger.max(cfg.scarce_route_danger);
        }
        let danger = if danger.is_finite() { danger.clamp(0.0, 1.0) } else { 1.0 };

        SensorSummary {
            danger,
            head_danger: heads.head_danger,
            boundary_danger,
            wall_danger: walls.wall_danger,
            forward_danger: walls.forward_danger,
            escape_angle: escape.resolve(agent.heading + std::f32::consts::PI),
            escape_routes,
            crowded,
            nearby_rivals: walls.nearby_rivals,
            converging: heads.converging,
            segment_density: walls.segment_density,
            stopping_distance,
            nearest_wall: walls.nearest_wall,
        }
    }
}
