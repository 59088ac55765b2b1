//! Sector model
//!
//! Fixed angular partition of the full circle, one sector per degree.
//! Sector `i` maps to angle `(i / N) * 2PI - PI`; every component bins
//! angles through [`angle_to_sector`] so the rule stays identical.

use std::f32::consts::{PI, TAU};

use crate::geometry::normalize_angle;

/// Number of sectors around the agent.
pub const SECTOR_COUNT: usize = 360;

/// Angular width of one sector (radians).
pub const SECTOR_WIDTH: f32 = TAU / SECTOR_COUNT as f32;

/// Sector index for an absolute angle.
pub fn angle_to_sector(angle: f32) -> usize {
    let a = normalize_angle(angle);
    let idx = (((a + PI) / TAU) * SECTOR_COUNT as f32).floor() as i64;
    idx.rem_euclid(SECTOR_COUNT as i64) as usize
}

/// Absolute angle of a sector, in (-PI, PI].
pub fn sector_to_angle(sector: usize) -> f32 {
    let i = (sector % SECTOR_COUNT) as f32;
    normalize_angle((i / SECTOR_COUNT as f32) * TAU - PI)
}

/// Angle through the middle of a sector; always bins back to `sector`.
pub fn sector_center(sector: usize) -> f32 {
    normalize_angle(sector_to_angle(sector) + SECTOR_WIDTH * 0.5)
}

/// Circular distance between two sectors, in 0..=N/2.
#[inline]
pub fn sector_distance(a: usize, b: usize) -> usize {
    let a = a % SECTOR_COUNT;
    let b = b % SECTOR_COUNT;
    let d = a.abs_diff(b);
    d.min(SECTOR_COUNT - d)
}

/// Sector `base` shifted by a signed offset, wrapping around.
#[inline]
pub fn offset_sector(base: usize, delta: i32) -> usize {
    (base as i64 + delta as i64).rem_euclid(SECTOR_COUNT as i64) as usize
}

/// Iterate `center - spread ..= center + spread`, wrapped.
///
/// Spreads of half the circle or more visit every sector exactly once.
pub fn sectors_around(center: usize, spread: usize) -> impl Iterator<Item = usize> {
    let spread = spread.min(SECTOR_COUNT / 2) as i32;
    let end = if spread as usize == SECTOR_COUNT / 2 { spread - 1 } else { spread };
    (-spread..=end).map(move |d| offset_sector(center, d))
}
