//! Diagnostic reason labels
//!
//! Labels never influence the chosen heading.

use std::fmt;

use serde::Serialize;

use crate::config::BotConfig;
use crate::sensor::SensorSummary;
use crate::targets::TargetCandidate;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Reason {
    DefensiveCircle,
    EmergencyObstruction,
    CriticalDanger,
    Crowded,
    BoundaryDanger,
    WallDanger,
    Attack,
    Food,
    Scanning,
}

impl Reason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::DefensiveCircle => "defensive_circle",
            Reason::EmergencyObstruction => "emergency_obstruction",
            Reason::CriticalDanger => "critical_danger",
            Reason::Crowded => "crowded",
            Reason::BoundaryDanger => "boundary_danger",
            Reason::WallDanger => "wall_danger",
            Reason::Attack => "attack",
            Reason::Food => "food",
            Reason::Scanning => "scanning",
        }
    }

    /// First matching situational check, in priority order.
    pub fn classify(
        summary: &SensorSummary,
        food: Option<&TargetCandidate>,
        attack: Option<&TargetCandidate>,
        cfg: &BotConfig,
    ) -> Self {
        let d = &cfg.decision;
        if summary.forward_danger >= d.emergency_forward_danger {
            Reason::EmergencyObstruction
        } else if summary.danger >= d.critical_danger {
            Reason::CriticalDanger
        } else if summary.crowded {
            Reason::Crowded
        } else if summary.boundary_danger >= d.boundary_reason_danger {
            Reason::BoundaryDanger
        } else if summary.wall_danger >= d.wall_reason_danger {
            Reason::WallDanger
        } else if attack.is_some() && summary.danger <= cfg.attack.max_danger {
            Reason::Attack
        } else if food.is_some() {
            Reason::Food
        } else {
            Reason::Scanning
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
