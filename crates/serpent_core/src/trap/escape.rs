//! Escape-angle resolution with ordered fallback tiers
//!
//! Always terminates in an angle. Whenever any sector is unblocked, the
//! result lies in an unblocked sector.

use serde::Serialize;

use crate::geometry::normalize_angle;
use crate::sector::{offset_sector, sector_center};
use crate::sensor::SensorArray;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum EscapeTier {
    /// The gap center itself is open
    GapCenter,
    /// Nearest open sector within the search span of the gap center
    NearGap,
    /// Open sector with the most clearance anywhere
    Widest,
    /// Any open sector, clearance ignored
    AnyOpen,
    /// Along the agent's own trail (transparent to the radar)
    OwnBody,
    /// Generic radar escape vector
    Vector,
}

pub fn resolve_escape(array: &SensorArray, gap_center: usize, span: usize, fallback: f32) -> (f32, EscapeTier) {
    if !array.is_blocked(gap_center) {
        return (sector_center(gap_center), EscapeTier::GapCenter);
    }

    for d in 1..=span as i32 {
        let left = offset_sector(gap_center, -d);
        let right = offset_sector(gap_center, d);
        let pick = match (array.is_blocked(left), array.is_blocked(right)) {
            (false, false) if array.clearance(left) > array.clearance(right) => Some(left),
            (false, _) if array.is_blocked(right) => Some(left),
            (_, false) => Some(right),
            _ => None,
        };
        if let Some(s) = pick {
            return (sector_center(s), EscapeTier::NearGap);
        }
    }

    if let Some(s) = array.widest_open_sector() {
        let tier = if array.clearance(s) > 0.0 { EscapeTier::Widest } else { EscapeTier::AnyOpen };
        return (sector_center(s), tier);
    }

    if let Some(s) = array.roomiest_own_body_sector() {
        return (sector_center(s), EscapeTier::OwnBody);
    }

    (normalize_angle(fallback), EscapeTier::Vector)
}
