//! Decision Engine
//!
//! Fuses radar, tracker, encirclement and target signals into one heading
//! and a boost flag.
//!
//! ## Modes
//! - `Normal`: per-sector scoring ([`scoring::score_sectors`])
//! - `DefensiveCircle`: fixed-rate turning while an urgent trap with a
//!   small gap is active ([`circle::CircleState`]); never boosts
//!
//! Leaving the circle falls back to normal scoring within the same tick.

mod circle;
mod reason;
mod scoring;

pub use circle::{CircleState, TurnDirection};
pub use reason::Reason;
pub use scoring::{score_sectors, ScoreInputs};

use serde::Serialize;

use crate::config::BotConfig;
use crate::scanner::ScanResult;
use crate::sector::{angle_to_sector, sector_center};
use crate::sensor::{SensorArray, SensorSummary};
use crate::snapshot::WorldSnapshot;
use crate::targets::TargetCandidate;
use crate::trap::EncirclementState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Mode {
    Normal,
    DefensiveCircle,
}

/// Output of one tick
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Decision {
    /// Absolute heading (rad)
    pub heading: f32,
    pub boost: bool,
    pub reason: Reason,
    pub mode: Mode,
    /// Persisted circling direction, if one has been chosen
    pub turn_direction: Option<TurnDirection>,
    pub sector: usize,
}

/// Everything the engine reads for one tick
pub struct DecisionInputs<'a> {
    pub world: &'a WorldSnapshot,
    pub scan: &'a ScanResult,
    pub array: &'a SensorArray,
    pub summary: &'a SensorSummary,
    pub trap: Option<&'a EncirclementState>,
    pub food: Option<&'a TargetCandidate>,
    pub attack: Option<&'a TargetCandidate>,
}

#[derive(Clone, Debug, Default)]
pub struct DecisionEngine {
    circle: CircleState,
}

impl DecisionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn circle(&self) -> &CircleState {
        &self.circle
    }

    /// Forget the sticky circling direction (death/respawn).
    pub fn clear(&mut self) {
        self.circle.clear();
    }

    /// `scores` is the per-tick sector buffer owned by the caller.
    pub fn decide(&mut self, inputs: &DecisionInputs<'_>, scores: &mut Vec<f32>, cfg: &BotConfig) -> Decision {
        let agent = &inputs.world.agent;

        let circling = self.circle.update(inputs.trap, &cfg.decision);
        if let (true, Some(trap)) = (circling, inputs.trap) {
            let head = inputs.world.rival(trap.rival).map(|r| r.pos);
            let body_length = agent.body_length(cfg.decision.segment_spacing);
            let heading = self.circle.steer(agent, trap, head, body_length, &cfg.decision);
            return Decision {
                heading,
                boost: false,
                reason: Reason::DefensiveCircle,
                mode: Mode::DefensiveCircle,
                turn_direction: self.circle.direction(),
                sector: angle_to_sector(heading),
            };
        }

        let score_inputs = ScoreInputs {
            world: inputs.world,
            scan: inputs.scan,
            array: inputs.array,
            summary: inputs.summary,
            food: inputs.food,
            attack: inputs.attack,
        };
        let sector = score_sectors(&score_inputs, scores, cfg);
        let heading = if sector == angle_to_sector(agent.heading) { agent.heading } else { sector_center(sector) };

        Decision {
            heading,
            boost: should_boost(inputs, sector, cfg),
            reason: Reason::classify(inputs.summary, inputs.food, inputs.attack, cfg),
            mode: Mode::Normal,
            turn_direction: self.circle.direction(),
            sector,
        }
    }
}

/// Boost only to grab nearby prey in a calm, open field. Never to flee.
fn should_boost(inputs: &DecisionInputs<'_>, sector: usize, cfg: &BotConfig) -> bool {
    let d = &cfg.decision;
    let s = inputs.summary;
    s.danger < d.boost_max_danger
        && inputs.array.clearance(sector) > cfg.sensor.danger_clearance * 2.0
        && s.escape_routes >= d.boost_min_routes
        && !s.crowded
        && s.converging == 0
        && inputs.food.is_some_and(|f| f.is_prey() && f.distance < d.prey_boost_distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario_builder::ScenarioBuilder;
    use crate::snapshot::RivalId;
    use crate::targets::TargetKind;
    use crate::tracker::EntityTracker;

    struct Fixture {
        world: WorldSnapshot,
        scan: ScanResult,
        array: SensorArray,
        summary: SensorSummary,
    }

    fn fixture(world: WorldSnapshot) -> Fixture {
        let cfg = BotConfig::default();
        let tracker = EntityTracker::new();
        let scan = ScanResult::collect(&world, world.agent.pos, 1200.0);
        let mut array = SensorArray::new();
        let summary = array.sense(&world, &scan, &tracker, &cfg.sensor);
        Fixture { world, scan, array, summary }
    }

    fn prey_at(angle: f32, dist: f32) -> TargetCandidate {
        TargetCandidate {
            kind: TargetKind::Prey,
            pos: (dist * angle.cos(), dist * angle.sin()),
            size: 10.0,
            distance: dist,
            angle,
            score: 1.0,
            rival: None,
        }
    }

    fn decide(f: &Fixture, trap: Option<&EncirclementState>, food: Option<&TargetCandidate>) -> Decision {
        let inputs = DecisionInputs {
            world: &f.world,
            scan: &f.scan,
            array: &f.array,
            summary: &f.summary,
            trap,
            food,
            attack: None,
        };
        DecisionEngine::new().decide(&inputs, &mut Vec::new(), &BotConfig::default())
    }

    #[test]
    fn test_open_field_exact_heading() {
        let f = fixture(ScenarioBuilder::new().agent_at(0.0, 0.0, 0.4321).build());
        let d = decide(&f, None, None);
        assert_eq!(d.heading, 0.4321);
        assert!(!d.boost);
        assert_eq!(d.reason, Reason::Scanning);
        assert_eq!(d.mode, Mode::Normal);
    }

    #[test]
    fn test_boost_for_close_prey_only() {
        let f = fixture(ScenarioBuilder::new().agent_at(0.0, 0.0, 0.0).build());
        let near = prey_at(0.2, 200.0);
        let d = decide(&f, None, Some(&near));
        assert!(d.boost);
        assert_eq!(d.reason, Reason::Food);

        let far = prey_at(0.2, 600.0);
        assert!(!decide(&f, None, Some(&far)).boost);

        let mut food = near.clone();
        food.kind = TargetKind::Food;
        assert!(!decide(&f, None, Some(&food)).boost);
    }

    #[test]
    fn test_urgent_trap_circles_without_boost() {
        let f = fixture(ScenarioBuilder::new().agent_at(0.0, 0.0, 0.0).rival(3, (0.0, 80.0), 0.0).build());
        let mut trap = EncirclementState::for_test(RivalId(3), 0.95, 0.0);
        trap.gap_width = 1.0;
        let near = prey_at(0.2, 200.0);
        let d = decide(&f, Some(&trap), Some(&near));

        assert_eq!(d.mode, Mode::DefensiveCircle);
        assert_eq!(d.reason, Reason::DefensiveCircle);
        assert!(!d.boost);
        // Head on the left: counter-clockwise
        assert_eq!(d.turn_direction, Some(TurnDirection::CounterClockwise));
        assert!(d.heading > 0.0);
    }

    #[test]
    fn test_wide_gap_does_not_circle() {
        let f = fixture(ScenarioBuilder::new().agent_at(0.0, 0.0, 0.0).build());
        let mut trap = EncirclementState::for_test(RivalId(3), 0.95, 0.0);
        trap.gap_width = 2.5;
        let d = decide(&f, Some(&trap), None);
        assert_eq!(d.mode, Mode::Normal);
    }
}
