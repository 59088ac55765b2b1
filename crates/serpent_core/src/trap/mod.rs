//! Encirclement Detector
//!
//! Decides whether any single rival is coiling around the agent. For every
//! rival with body points inside the detection radius:
//!
//! 1. Occupancy: each body point marks the sectors within its angular
//!    spread (wider for points beyond `near_spread_distance`)
//! 2. Coverage = occupied / total sectors
//! 3. Gap = longest free run on the ring ([`gap::longest_gap`])
//! 4. Encircling when coverage, sample count and closest distance all pass
//! 5. Urgency = coverage + sealing/small-gap/very-close bonuses
//! 6. Counter-attack feasibility through [`plan_intercept`]
//!
//! Only the most urgent rival becomes the active encirclement. Its escape
//! angle is resolved against the radar by [`escape::resolve_escape`].

mod escape;
mod gap;

pub use escape::{resolve_escape, EscapeTier};
pub use gap::{longest_gap, Gap};

use fxhash::FxHashMap;
use serde::Serialize;
use tracing::debug;

use crate::config::TrapConfig;
use crate::geometry::{angle_diff, bearing, distance, plan_intercept};
use crate::scanner::ScanResult;
use crate::sector::{angle_to_sector, sector_center, sectors_around, SECTOR_COUNT, SECTOR_WIDTH};
use crate::sensor::SensorArray;
use crate::snapshot::{Agent, Rival, RivalId, WorldSnapshot};
use crate::tracker::EntityTracker;

/// The active encirclement for this tick
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EncirclementState {
    pub rival: RivalId,
    /// Fraction of sectors occupied, [0, 1]
    pub coverage: f32,
    pub samples: usize,
    pub closest: f32,
    pub gap_center: usize,
    pub gap_center_angle: f32,
    /// Angular width of the gap (rad)
    pub gap_width: f32,
    /// [0, 1]
    pub urgency: f32,
    pub counter_feasible: bool,
    pub counter_angle: Option<f32>,
    /// Circling turn-rate multiplier; above 1 means circle tighter
    pub tightness: f32,
    pub escape_angle: f32,
    pub escape_tier: EscapeTier,
}

impl EncirclementState {
    #[cfg(test)]
    pub(crate) fn for_test(rival: RivalId, urgency: f32, escape_angle: f32) -> Self {
        Self {
            rival,
            coverage: urgency,
            samples: 20,
            closest: 100.0,
            gap_center: angle_to_sector(escape_angle),
            gap_center_angle: escape_angle,
            gap_width: 1.0,
            urgency,
            counter_feasible: false,
            counter_angle: None,
            tightness: 1.0,
            escape_angle,
            escape_tier: EscapeTier::GapCenter,
        }
    }
}

/// Last evaluation of one rival, kept for diagnostics until it expires
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TrapProfile {
    pub coverage: f32,
    pub samples: usize,
    pub closest: f32,
    pub encircling: bool,
    pub urgency: f32,
    pub seen_ms: u64,
}

/// Occupancy measurement of one rival
#[derive(Clone, Copy, Debug)]
struct Coil {
    coverage: f32,
    samples: usize,
    closest: f32,
    gap: Gap,
}

impl Coil {
    fn encircling(&self, cfg: &TrapConfig) -> bool {
        self.coverage > cfg.coverage_threshold && self.samples >= cfg.min_samples && self.closest <= cfg.max_closest
    }
}

#[derive(Clone, Debug)]
pub struct EncirclementDetector {
    occupied: Vec<bool>,
    closest: Vec<f32>,
    profiles: FxHashMap<RivalId, TrapProfile>,
    active: Option<EncirclementState>,
}

impl Default for EncirclementDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl EncirclementDetector {
    pub fn new() -> Self {
        Self {
            occupied: vec![false; SECTOR_COUNT],
            closest: vec![f32::INFINITY; SECTOR_COUNT],
            profiles: FxHashMap::default(),
            active: None,
        }
    }

    pub fn active(&self) -> Option<&EncirclementState> {
        self.active.as_ref()
    }

    pub fn profile(&self, id: RivalId) -> Option<&TrapProfile> {
        self.profiles.get(&id)
    }

    pub fn profile_count(&self) -> usize {
        self.profiles.len()
    }

    pub fn clear(&mut self) {
        self.profiles.clear();
        self.active = None;
    }

    /// Evaluate every rival and return the most urgent encirclement.
    ///
    /// `fallback_escape` is the radar's generic escape angle, used only when
    /// every other escape tier is exhausted.
    pub fn detect(
        &mut self,
        world: &WorldSnapshot,
        scan: &ScanResult,
        tracker: &EntityTracker,
        array: &SensorArray,
        fallback_escape: f32,
        cfg: &TrapConfig,
    ) -> Option<EncirclementState> {
        let agent = &world.agent;
        let radius = cfg.radius_for(agent.segments);
        let mut best: Option<EncirclementState> = None;

        for id in scan.body_owners() {
            let Some(rival) = world.rival(id) else { continue };
            if rival.dead || agent.id == Some(id) {
                continue;
            }
            let Some(coil) = self.measure(agent.pos, scan, id, radius, cfg) else { continue };
            let encircling = coil.encircling(cfg);

            let state = encircling.then(|| self.assess(agent, rival, tracker, &coil, cfg));
            self.profiles.insert(
                id,
                TrapProfile {
                    coverage: coil.coverage,
                    samples: coil.samples,
                    closest: coil.closest,
                    encircling,
                    urgency: state.as_ref().map_or(0.0, |s| s.urgency),
                    seen_ms: world.timestamp_ms,
                },
            );

            if let Some(state) = state {
                if best.as_ref().map_or(true, |b| state.urgency > b.urgency) {
                    best = Some(state);
                }
            }
        }

        self.prune(world.timestamp_ms, cfg.profile_ttl_ms);

        if let Some(state) = best.as_mut() {
            let (angle, tier) = resolve_escape(array, state.gap_center, cfg.escape_search_span, fallback_escape);
            state.escape_angle = angle;
            state.escape_tier = tier;
            debug!(
                rival = state.rival.0,
                coverage = state.coverage,
                urgency = state.urgency,
                gap_deg = state.gap_width.to_degrees(),
                ?tier,
                "encirclement detected"
            );
        }

        self.active = best.clone();
        best
    }

    /// Rebuild the occupancy buffers for one rival.
    fn measure(
        &mut self,
        origin: (f32, f32),
        scan: &ScanResult,
        id: RivalId,
        radius: f32,
        cfg: &TrapConfig,
    ) -> Option<Coil> {
        self.occupied.fill(false);
        self.closest.fill(f32::INFINITY);

        let mut samples = 0usize;
        let mut nearest = f32::INFINITY;
        for body in scan.bodies_of(id).filter(|b| b.dist.is_finite() && b.dist <= radius) {
            samples += 1;
            nearest = nearest.min(body.dist);

            let spread_deg = if body.dist > cfg.near_spread_distance { cfg.far_spread_deg } else { cfg.near_spread_deg };
            let sector = angle_to_sector(bearing(origin, body.pos));
            for s in sectors_around(sector, spread_deg / 2) {
                self.occupied[s] = true;
                self.closest[s] = self.closest[s].min(body.dist);
            }
        }
        if samples == 0 {
            return None;
        }

        let covered = self.occupied.iter().filter(|&&o| o).count();
        let gap = longest_gap(&self.occupied).unwrap_or_else(|| {
            // Fully enclosed: aim at the loosest part of the wall
            let loosest = self
                .closest
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.total_cmp(b.1))
                .map_or(0, |(s, _)| s);
            Gap { start: loosest, len: 0, center: loosest }
        });

        Some(Coil { coverage: covered as f32 / SECTOR_COUNT as f32, samples, closest: nearest, gap })
    }

    fn assess(
        &self,
        agent: &Agent,
        rival: &Rival,
        tracker: &EntityTracker,
        coil: &Coil,
        cfg: &TrapConfig,
    ) -> EncirclementState {
        let gap_center_angle = sector_center(coil.gap.center);
        let gap_width = coil.gap.len as f32 * SECTOR_WIDTH;
        let head_bearing = bearing(agent.pos, rival.pos);

        let near_gap = |angle: f32| angle_diff(gap_center_angle, angle).abs() < cfg.head_seal_angle;
        let sealing = near_gap(head_bearing)
            || tracker
                .get(rival.id)
                .is_some_and(|t| t.prediction.confidence > 0.5 && near_gap(bearing(agent.pos, t.prediction.pos)));

        let mut urgency = coil.coverage;
        if sealing {
            urgency += cfg.head_seal_bonus;
        }
        if gap_width < cfg.small_gap {
            urgency += cfg.small_gap_bonus;
        }
        if coil.closest < cfg.very_close {
            urgency += cfg.very_close_bonus;
        }
        let urgency = urgency.clamp(0.0, 1.0);

        let mut counter_angle = None;
        let mut counter_feasible = false;
        if agent.segments >= rival.segments * cfg.counter_length_ratio
            && angle_diff(gap_center_angle, head_bearing).abs() < cfg.counter_gap_angle
            && distance(agent.pos, rival.pos) < cfg.counter_head_radius
        {
            let plan = plan_intercept(
                agent.pos,
                agent.speed,
                rival.pos,
                rival.heading,
                rival.speed,
                cfg.counter_lead_ticks,
                cfg.counter_margin,
            );
            let angle = bearing(agent.pos, plan.point);
            let s = angle_to_sector(angle);
            counter_feasible = !self.occupied[s] || self.closest[s] > distance(agent.pos, plan.point);
            counter_angle = Some(angle);
        }

        let tightness = (1.0 + 0.5 * (1.0 - coil.closest / cfg.max_closest.max(1.0))).clamp(0.5, 1.5);

        EncirclementState {
            rival: rival.id,
            coverage: coil.coverage,
            samples: coil.samples,
            closest: coil.closest,
            gap_center: coil.gap.center,
            gap_center_angle,
            gap_width,
            urgency,
            counter_feasible,
            counter_angle,
            tightness,
            escape_angle: gap_center_angle,
            escape_tier: EscapeTier::GapCenter,
        }
    }

    fn prune(&mut self, now_ms: u64, ttl_ms: u64) {
        self.profiles.retain(|_, p| now_ms.saturating_sub(p.seen_ms) <= ttl_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BotConfig;
    use crate::scenario_builder::ScenarioBuilder;

    fn ring_points(from_deg: f32, to_deg: f32, n: usize, r: f32) -> Vec<(f32, f32)> {
        (0..n)
            .map(|k| {
                let a = (from_deg + (to_deg - from_deg) * k as f32 / (n - 1) as f32).to_radians();
                (r * a.cos(), r * a.sin())
            })
            .collect()
    }

    /// Dashed coil around the origin leaving a ~60 degree gap at heading 0,
    /// head sitting just inside the gap.
    fn coiled_world() -> WorldSnapshot {
        let head_angle = 25f32.to_radians();
        ScenarioBuilder::new()
            .agent_at(0.0, 0.0, 0.0)
            .rival_body(9, (70.0 * head_angle.cos(), 70.0 * head_angle.sin()), ring_points(35.0, 325.0, 19, 60.0))
            .build()
    }

    fn run(world: &WorldSnapshot, array: &SensorArray) -> (EncirclementDetector, Option<EncirclementState>) {
        let cfg = BotConfig::default();
        let mut tracker = EntityTracker::new();
        tracker.update(world, &cfg.tracker);
        let scan = ScanResult::collect(world, world.agent.pos, 1000.0);
        let mut detector = EncirclementDetector::new();
        let state = detector.detect(world, &scan, &tracker, array, 2.0, &cfg.trap);
        (detector, state)
    }

    #[test]
    fn test_coil_with_small_gap_is_urgent() {
        let world = coiled_world();
        let (detector, state) = run(&world, &SensorArray::new());
        let state = state.unwrap();

        assert_eq!(state.rival, RivalId(9));
        assert!(state.coverage > 0.4 && state.coverage < 0.7, "{}", state.coverage);
        let gap_deg = state.gap_width.to_degrees();
        assert!((55.0..=65.0).contains(&gap_deg), "{}", gap_deg);
        assert!(state.gap_center_angle.abs() < 3f32.to_radians());
        assert!(state.urgency > 0.7);
        assert!((state.closest - 60.0).abs() < 1e-3);
        assert!(state.tightness > 1.0);
        assert_eq!(state.escape_tier, EscapeTier::GapCenter);
        assert!(state.counter_angle.is_some());
        assert_eq!(detector.active(), Some(&state));
        assert!(detector.profile(RivalId(9)).unwrap().encircling);
    }

    #[test]
    fn test_counter_attack_feasibility() {
        // Head running out through the gap: the intercept point is open
        let (_, state) = run(&coiled_world(), &SensorArray::new());
        let state = state.unwrap();
        assert!(state.counter_feasible);
        let angle = state.counter_angle.unwrap();
        assert!(angle.abs() < 10f32.to_radians(), "{}", angle);

        // Head turned into its own coil: the intercept point sits behind the wall
        let mut world = coiled_world();
        world.rivals[0].heading = std::f32::consts::FRAC_PI_2;
        let (_, state) = run(&world, &SensorArray::new());
        let state = state.unwrap();
        assert!(state.counter_angle.is_some());
        assert!(!state.counter_feasible);
    }

    #[test]
    fn test_escape_avoids_blocked_gap() {
        let world = coiled_world();
        let mut array = SensorArray::new();
        array.block_around(angle_to_sector(0.0), 40);
        let (_, state) = run(&world, &array);
        let state = state.unwrap();

        assert_eq!(state.escape_tier, EscapeTier::NearGap);
        assert!(!array.is_blocked(angle_to_sector(state.escape_angle)));
    }

    #[test]
    fn test_loose_body_is_not_a_trap() {
        // Same shape but far away: closest beyond max_closest
        let world = ScenarioBuilder::new()
            .agent_at(0.0, 0.0, 0.0)
            .rival_body(9, (300.0, 100.0), ring_points(35.0, 325.0, 19, 300.0))
            .build();
        let (detector, state) = run(&world, &SensorArray::new());
        assert!(state.is_none());
        let profile = detector.profile(RivalId(9)).unwrap();
        assert!(!profile.encircling);
        assert!(profile.coverage > 0.4);
    }

    #[test]
    fn test_too_few_samples() {
        let world = ScenarioBuilder::new()
            .agent_at(0.0, 0.0, 0.0)
            .rival_body(9, (0.0, 70.0), ring_points(0.0, 300.0, 6, 60.0))
            .build();
        let (_, state) = run(&world, &SensorArray::new());
        assert!(state.is_none());
    }

    #[test]
    fn test_most_urgent_rival_wins() {
        let head_angle = 25f32.to_radians();
        let world = ScenarioBuilder::new()
            .agent_at(0.0, 0.0, 0.0)
            .rival_body(9, (70.0 * head_angle.cos(), 70.0 * head_angle.sin()), ring_points(35.0, 325.0, 19, 60.0))
            .rival_body(4, (0.0, -400.0), ring_points(100.0, 260.0, 12, 150.0))
            .build();
        let (detector, state) = run(&world, &SensorArray::new());
        assert_eq!(state.unwrap().rival, RivalId(9));
        assert_eq!(detector.profile_count(), 2);
    }

    #[test]
    fn test_coverage_grows_with_points() {
        let cfg = BotConfig::default();
        let points = ring_points(0.0, 350.0, 30, 120.0);
        let mut last = 0.0;
        for n in 1..=points.len() {
            let world = ScenarioBuilder::new()
                .agent_at(0.0, 0.0, 0.0)
                .rival_body(3, (0.0, 2000.0), points[..n].to_vec())
                .build();
            let scan = ScanResult::collect(&world, world.agent.pos, 1000.0);
            let mut detector = EncirclementDetector::new();
            let coil = detector.measure(world.agent.pos, &scan, RivalId(3), 500.0, &cfg.trap).unwrap();
            assert!(coil.coverage >= last);
            last = coil.coverage;
        }
        assert!(last > 0.9);
    }

    #[test]
    fn test_profiles_expire() {
        let cfg = BotConfig::default();
        let tracker = EntityTracker::new();
        let array = SensorArray::new();
        let mut detector = EncirclementDetector::new();

        let world = ScenarioBuilder::new()
            .at_tick(0)
            .agent_at(0.0, 0.0, 0.0)
            .rival_body(9, (0.0, 300.0), ring_points(0.0, 90.0, 5, 200.0))
            .build();
        let scan = ScanResult::collect(&world, world.agent.pos, 1000.0);
        detector.detect(&world, &scan, &tracker, &array, 0.0, &cfg.trap);
        assert_eq!(detector.profile_count(), 1);

        let empty = ScenarioBuilder::new().at_tick(100).agent_at(0.0, 0.0, 0.0).build();
        let scan = ScanResult::collect(&empty, empty.agent.pos, 1000.0);
        detector.detect(&empty, &scan, &tracker, &array, 0.0, &cfg.trap);
        assert_eq!(detector.profile_count(), 1);

        let later = ScenarioBuilder::new().at_tick(200).agent_at(0.0, 0.0, 0.0).build();
        detector.detect(&later, &scan, &tracker, &array, 0.0, &cfg.trap);
        assert_eq!(detector.profile_count(), 0);
        assert!(detector.active().is_none());
    }

    #[cfg(all(test, feature = "proptest"))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: adding body points never lowers coverage
            #[test]
            fn prop_coverage_monotonic(
                points in prop::collection::vec((0.0f32..6.28, 20.0f32..450.0), 1..40),
                extra in (0.0f32..6.28, 20.0f32..450.0),
            ) {
                let cfg = BotConfig::default();
                let to_xy = |(a, r): (f32, f32)| (r * a.cos(), r * a.sin());
                let base: Vec<(f32, f32)> = points.iter().copied().map(to_xy).collect();
                let mut more = base.clone();
                more.push(to_xy(extra));

                let coverage = |body: Vec<(f32, f32)>| {
                    let world = ScenarioBuilder::new()
                        .agent_at(0.0, 0.0, 0.0)
                        .rival_body(3, (0.0, 3000.0), body)
                        .build();
                    let scan = ScanResult::collect(&world, world.agent.pos, 1000.0);
                    let mut detector = EncirclementDetector::new();
                    detector
                        .measure(world.agent.pos, &scan, RivalId(3), 500.0, &cfg.trap)
                        .map_or(0.0, |c| c.coverage)
                };
                prop_assert!(coverage(more) >= coverage(base));
            }

            /// Property: the escape lands in an open sector whenever one exists
            #[test]
            fn prop_escape_in_open_sector(blocked in prop::collection::vec(prop::bool::weighted(0.9), 360)) {
                let world = coiled_world();
                let mut array = SensorArray::new();
                for (s, b) in blocked.iter().enumerate() {
                    array.readings_mut()[s].blocked = *b;
                }
                let (_, state) = run(&world, &array);
                let state = state.unwrap();
                if array.has_unblocked() {
                    prop_assert!(!array.is_blocked(angle_to_sector(state.escape_angle)));
                }
            }
        }
    }
}
