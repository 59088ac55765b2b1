//! Defensive circling state machine
//!
//! ```text
//!   Normal --(urgency > enter && gap < max_gap)--> Circling
//!   Circling --(no trap || urgency < exit)--> Normal
//! ```
//!
//! The turn direction survives mode changes until [`CircleState::clear`].

use serde::Serialize;
use tracing::info;

use crate::config::DecisionConfig;
use crate::geometry::{angle_diff, bearing, normalize_angle};
use crate::snapshot::Agent;
use crate::trap::EncirclementState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TurnDirection {
    /// Increasing angle
    CounterClockwise,
    Clockwise,
}

impl TurnDirection {
    pub fn sign(self) -> f32 {
        match self {
            TurnDirection::CounterClockwise => 1.0,
            TurnDirection::Clockwise => -1.0,
        }
    }

    fn toward(delta: f32) -> Self {
        if delta >= 0.0 {
            TurnDirection::CounterClockwise
        } else {
            TurnDirection::Clockwise
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CircleState {
    active: bool,
    direction: Option<TurnDirection>,
}

impl CircleState {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn direction(&self) -> Option<TurnDirection> {
        self.direction
    }

    pub fn clear(&mut self) {
        self.active = false;
        self.direction = None;
    }

    /// Advance the mode for this tick; returns whether circling.
    pub fn update(&mut self, trap: Option<&EncirclementState>, cfg: &DecisionConfig) -> bool {
        match (self.active, trap) {
            (false, Some(t)) if t.urgency > cfg.circle_enter_urgency && t.gap_width < cfg.circle_max_gap => {
                info!(rival = t.rival.0, urgency = t.urgency, "entering defensive circle");
                self.active = true;
            }
            (true, None) => {
                info!("leaving defensive circle: trap cleared");
                self.active = false;
            }
            (true, Some(t)) if t.urgency < cfg.circle_exit_urgency => {
                info!(urgency = t.urgency, "leaving defensive circle: urgency dropped");
                self.active = false;
            }
            _ => {}
        }
        self.active
    }

    /// Heading for one circling tick.
    ///
    /// The turn rate traces a circle whose circumference equals the body
    /// length, scaled by the trap's tightness, then clamped.
    pub fn steer(
        &mut self,
        agent: &Agent,
        trap: &EncirclementState,
        rival_head: Option<(f32, f32)>,
        body_length: f32,
        cfg: &DecisionConfig,
    ) -> f32 {
        let rate = (std::f32::consts::TAU * agent.speed / body_length.max(1.0) * trap.tightness)
            .clamp(cfg.circle_min_turn, cfg.circle_max_turn);

        if let Some(head) = rival_head {
            let delta = angle_diff(agent.heading, bearing(agent.pos, head));
            match self.direction {
                None => self.direction = Some(TurnDirection::toward(delta)),
                Some(dir) if delta.abs() > cfg.circle_flip_angle && TurnDirection::toward(delta) != dir => {
                    self.direction = Some(TurnDirection::toward(delta));
                }
                _ => {}
            }
        }
        let dir = *self.direction.get_or_insert(TurnDirection::CounterClockwise);

        normalize_angle(agent.heading + dir.sign() * rate)
    }
}
