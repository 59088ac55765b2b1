//! Per-tick pipeline
//!
//! `BotCore` owns every piece of state: the per-tick buffers (radar,
//! sector scores, scan), which are overwritten at the start of each tick,
//! and the cross-tick state (tracker, trap profiles, food pursuit, circling
//! direction), which persists until [`BotCore::clear_tracking`].
//!
//! ## Tick order
//! 1. tracker update
//! 2. obstacle scan
//! 3. radar
//! 4. encirclement detection + radar override
//! 5. target selection
//! 6. decision
//!
//! A disabled bot or a dead agent skips the tick entirely.

use serde::Serialize;
use tracing::{debug, trace};

use crate::config::BotConfig;
use crate::decision::{Decision, DecisionEngine, DecisionInputs, Mode};
use crate::scanner::ScanResult;
use crate::sensor::{SensorArray, SensorSummary};
use crate::snapshot::{RawSnapshot, WorldSnapshot};
use crate::targets::{AttackSelector, FoodSelector, TargetCandidate};
use crate::tracker::{EntityTracker, TrackedRival, TrackerStats};
use crate::trap::{EncirclementDetector, EncirclementState};

/// Everything computed in one tick, for the observability layer
#[derive(Clone, Debug, Serialize)]
pub struct TickReport {
    pub tick: u64,
    pub summary: SensorSummary,
    pub encirclement: Option<EncirclementState>,
    pub food: Option<TargetCandidate>,
    pub attack: Option<TargetCandidate>,
    pub decision: Decision,
    pub tracker: TrackerStats,
}

/// Buffers reset and fully recomputed every tick
#[derive(Debug, Default)]
struct TickContext {
    array: SensorArray,
    scores: Vec<f32>,
}

#[derive(Debug)]
pub struct BotCore {
    config: BotConfig,
    ctx: TickContext,
    tracker: EntityTracker,
    detector: EncirclementDetector,
    food: FoodSelector,
    attack: AttackSelector,
    engine: DecisionEngine,
    last_report: Option<TickReport>,
}

impl Default for BotCore {
    fn default() -> Self {
        Self::new(BotConfig::default())
    }
}

impl BotCore {
    pub fn new(config: BotConfig) -> Self {
        Self {
            config,
            ctx: TickContext::default(),
            tracker: EntityTracker::new(),
            detector: EncirclementDetector::new(),
            food: FoodSelector::new(),
            attack: AttackSelector::new(),
            engine: DecisionEngine::new(),
            last_report: None,
        }
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    /// Swap tunables between ticks.
    pub fn set_config(&mut self, config: BotConfig) {
        self.config = config;
    }

    /// Radius covering every consumer of the obstacle scan.
    fn scan_radius(&self) -> f32 {
        let c = &self.config;
        c.sensor
            .body_avoid_radius
            .max(c.sensor.head_threat_radius * 1.5)
            .max(c.trap.detection_radius_max)
            .max(c.food.search_radius + c.food.contest_radius)
    }

    /// Ingest a host snapshot and run one tick.
    ///
    /// A snapshot without a tick is stamped with the tracker's next frame.
    pub fn tick_raw(&mut self, raw: &RawSnapshot) -> Option<Decision> {
        let fallback_tick = self.tracker.frame() + 1;
        let world = WorldSnapshot::from_raw_at(raw, &self.config.ingest, fallback_tick);
        self.tick(&world)
    }

    /// Run the full pipeline; `None` when disabled or the agent is dead.
    pub fn tick(&mut self, world: &WorldSnapshot) -> Option<Decision> {
        if !self.config.enabled || !world.agent.alive {
            trace!(tick = world.tick, "tick skipped");
            return None;
        }
        let cfg = &self.config;
        let agent = &world.agent;

        self.tracker.update(world, &cfg.tracker);

        let scan = ScanResult::collect(world, agent.pos, self.scan_radius());
        let mut summary = self.ctx.array.sense(world, &scan, &self.tracker, &cfg.sensor);

        let trap = self
            .detector
            .detect(world, &scan, &self.tracker, &self.ctx.array, summary.escape_angle, &cfg.trap);
        summary.apply_encirclement(trap.as_ref(), &cfg.sensor);

        let food = self.food.select(world, &scan, &self.ctx.array, &summary, &cfg.food);
        let agent_length = agent.body_length(cfg.decision.segment_spacing);
        let attack = self.attack.select(world, &scan, &summary, agent_length, &cfg.attack);

        let was_circling = self.engine.circle().is_active();
        let inputs = DecisionInputs {
            world,
            scan: &scan,
            array: &self.ctx.array,
            summary: &summary,
            trap: trap.as_ref(),
            food: food.as_ref(),
            attack: attack.as_ref(),
        };
        let decision = self.engine.decide(&inputs, &mut self.ctx.scores, cfg);

        if was_circling != (decision.mode == Mode::DefensiveCircle) {
            debug!(tick = world.tick, mode = ?decision.mode, "mode changed");
        }

        self.last_report = Some(TickReport {
            tick: world.tick,
            summary,
            encirclement: trap,
            food,
            attack,
            decision: decision.clone(),
            tracker: self.tracker.stats(),
        });
        Some(decision)
    }

    /// Forget every cross-tick memory (agent death or respawn).
    pub fn clear_tracking(&mut self) {
        self.tracker.clear();
        self.detector.clear();
        self.food.clear();
        self.engine.clear();
        self.last_report = None;
    }

    pub fn last_report(&self) -> Option<&TickReport> {
        self.last_report.as_ref()
    }

    pub fn sensor(&self) -> &SensorArray {
        &self.ctx.array
    }

    pub fn scores(&self) -> &[f32] {
        &self.ctx.scores
    }

    pub fn tracker(&self) -> &EntityTracker {
        &self.tracker
    }

    pub fn top_threats(&self, k: usize) -> Vec<&TrackedRival> {
        self.tracker.top_threats(k)
    }

    pub fn hunters(&self) -> Vec<&TrackedRival> {
        self.tracker.hunters()
    }

    pub fn stats(&self) -> TrackerStats {
        self.tracker.stats()
    }
}
