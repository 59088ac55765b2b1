//! Target Selectors
//!
//! Two independent, tick-scoped selectors. Each produces at most one
//! candidate per tick, replaced wholesale every tick:
//! - [`FoodSelector`]: static food and moving prey, gated by the radar
//! - [`AttackSelector`]: rival cutoff (or a slower chase fallback)

mod attack;
mod food;

pub use attack::AttackSelector;
pub use food::FoodSelector;

use serde::Serialize;

use crate::snapshot::RivalId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TargetKind {
    Food,
    /// Moving high-value item
    Prey,
    /// Intercept point ahead of a rival's head
    Cutoff,
    /// Slow pursuit of a fleeing rival
    Chase,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TargetCandidate {
    pub kind: TargetKind,
    pub pos: (f32, f32),
    pub size: f32,
    pub distance: f32,
    /// Bearing from the agent
    pub angle: f32,
    pub score: f32,
    pub rival: Option<RivalId>,
}

impl TargetCandidate {
    pub fn is_prey(&self) -> bool {
        self.kind == TargetKind::Prey
    }
}
