//! Geometry helpers
//!
//! Pure functions over `(f32, f32)` world coordinates and radian angles.
//! Every component goes through these so angle wrapping stays consistent.

use std::f32::consts::{PI, TAU};

/// Squared Euclidean distance.
#[inline]
pub fn dist_sq(a: (f32, f32), b: (f32, f32)) -> f32 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    dx * dx + dy * dy
}

/// Euclidean distance.
#[inline]
pub fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    dist_sq(a, b).sqrt()
}

/// Wrap an angle into (-PI, PI]. Non-finite input maps to 0.
pub fn normalize_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        PI
    } else {
        wrapped
    }
}

/// Signed shortest rotation from `from` to `to`, in (-PI, PI].
#[inline]
pub fn angle_diff(from: f32, to: f32) -> f32 {
    normalize_angle(to - from)
}

/// Absolute bearing from `from` to `to`.
#[inline]
pub fn bearing(from: (f32, f32), to: (f32, f32)) -> f32 {
    (to.1 - from.1).atan2(to.0 - from.0)
}

/// Point `dist` units away from `origin` along `angle`.
#[inline]
pub fn offset(origin: (f32, f32), angle: f32, dist: f32) -> (f32, f32) {
    (origin.0 + angle.cos() * dist, origin.1 + angle.sin() * dist)
}

/// Distance from `point` to the segment `a`-`b`.
pub fn point_segment_distance(point: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    let len_sq = dx * dx + dy * dy;

    if len_sq < 1e-6 {
        return distance(point, a);
    }

    let t = (((point.0 - a.0) * dx + (point.1 - a.1) * dy) / len_sq).clamp(0.0, 1.0);
    distance(point, (a.0 + t * dx, a.1 + t * dy))
}

/// True when no obstacle circle touches the corridor `from`-`to`.
///
/// Each obstacle is `(position, radius)`; `half_width` is the corridor's own
/// half width (usually the agent radius plus a margin).
pub fn path_clear<I>(from: (f32, f32), to: (f32, f32), half_width: f32, obstacles: I) -> bool
where
    I: IntoIterator<Item = ((f32, f32), f32)>,
{
    obstacles
        .into_iter()
        .all(|(pos, radius)| point_segment_distance(pos, from, to) > radius + half_width)
}

/// Where a straight-moving target will be and who gets there first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterceptPlan {
    /// Aim point slightly ahead of the target's projected path
    pub point: (f32, f32),
    /// Ticks for the pursuer to reach `point`
    pub pursuer_eta: f32,
    /// Ticks for the target to reach `point`
    pub target_eta: f32,
}

impl InterceptPlan {
    /// Pursuer arrives no later than `slack` times the target's ETA.
    pub fn pursuer_wins(&self, slack: f32) -> bool {
        self.pursuer_eta <= self.target_eta * slack
    }
}

/// Project a target forward along its heading and time both parties to it.
///
/// Shared by the encirclement counter-attack and the cutoff selector.
pub fn plan_intercept(
    pursuer_pos: (f32, f32),
    pursuer_speed: f32,
    target_pos: (f32, f32),
    target_heading: f32,
    target_speed: f32,
    lead_ticks: f32,
    margin: f32,
) -> InterceptPlan {
    let lead = target_speed.max(0.0) * lead_ticks.max(0.0) + margin.max(0.0);
    let point = offset(target_pos, target_heading, lead);

    let pursuer_eta = distance(pursuer_pos, point) / pursuer_speed.max(0.1);
    let target_eta = lead / target_speed.max(0.1);

    InterceptPlan { point, pursuer_eta, target_eta }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_angle_range() {
        assert!((normalize_angle(3.0 * PI) - PI).abs() < 1e-5);
        assert!((normalize_angle(-PI) - PI).abs() < 1e-5);
        assert!((normalize_angle(0.5) - 0.5).abs() < 1e-6);
        assert!((normalize_angle(-0.5 - TAU) + 0.5).abs() < 1e-5);
        assert_eq!(normalize_angle(f32::NAN), 0.0);
    }

    #[test]
    fn test_angle_diff_wraps() {
        let d = angle_diff(PI - 0.1, -PI + 0.1);
        assert!((d - 0.2).abs() < 1e-5);
        let d = angle_diff(-PI + 0.1, PI - 0.1);
        assert!((d + 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_point_segment_distance() {
        assert!((point_segment_distance((5.0, 3.0), (0.0, 0.0), (10.0, 0.0)) - 3.0).abs() < 1e-5);
        // Beyond the end clamps to the endpoint
        assert!((point_segment_distance((13.0, 4.0), (0.0, 0.0), (10.0, 0.0)) - 5.0).abs() < 1e-5);
        // Degenerate segment
        assert!((point_segment_distance((3.0, 4.0), (0.0, 0.0), (0.0, 0.0)) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_path_clear() {
        let blockers = vec![((50.0, 5.0), 10.0)];
        assert!(!path_clear((0.0, 0.0), (100.0, 0.0), 5.0, blockers.clone()));
        assert!(path_clear((0.0, 0.0), (0.0, 100.0), 5.0, blockers));
    }

    #[test]
    fn test_plan_intercept() {
        // Target at (100, 0) moving +y at 5/tick, pursuer at origin at speed 10
        let plan = plan_intercept((0.0, 0.0), 10.0, (100.0, 0.0), PI / 2.0, 5.0, 10.0, 0.0);
        assert!((plan.point.0 - 100.0).abs() < 1e-3);
        assert!((plan.point.1 - 50.0).abs() < 1e-3);
        assert!((plan.target_eta - 10.0).abs() < 1e-3);
        assert!(plan.pursuer_eta > 11.0 && plan.pursuer_eta < 11.3);
        assert!(!plan.pursuer_wins(1.0));
        assert!(plan.pursuer_wins(1.2));
    }
}
