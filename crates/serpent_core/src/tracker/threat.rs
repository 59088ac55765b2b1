//! Threat scoring
//!
//! Threat (0-100) = distance step + approach + time-to-reach + size
//! advantage + learned behavior.

use super::profile::BehaviorProfile;

/// Weight constants for the threat formula
pub mod weights {
    /// (upper distance bound, points)
    pub const DISTANCE_STEPS: [(f32, f32); 4] = [(150.0, 40.0), (300.0, 30.0), (500.0, 20.0), (800.0, 10.0)];
    pub const APPROACHING: f32 = 20.0;
    pub const REACH_FAST: (f32, f32) = (30.0, 15.0); // (ticks, points)
    pub const REACH_SOON: (f32, f32) = (60.0, 8.0);
    pub const LENGTH_MUCH_LONGER: (f32, f32) = (1.5, 10.0); // (ratio, points)
    pub const LENGTH_LONGER: (f32, f32) = (1.0, 5.0);
    pub const AGGRESSION: f32 = 10.0;
    pub const HUNTING: f32 = 10.0;
    pub const BOOST_APPROACH: f32 = 10.0;
}

#[derive(Clone, Copy, Debug)]
pub struct ThreatInputs {
    pub dist: f32,
    pub approaching: bool,
    /// Ticks until the head reaches the agent at its current closing speed
    pub time_to_reach: Option<f32>,
    /// Rival length / agent length
    pub length_ratio: f32,
    pub boosting: bool,
}

/// Score in [0, 100]
pub fn threat_score(inputs: &ThreatInputs, profile: &BehaviorProfile) -> f32 {
    let mut score = weights::DISTANCE_STEPS
        .iter()
        .find(|(bound, _)| inputs.dist < *bound)
        .map(|&(_, points)| points)
        .unwrap_or(0.0);

    if inputs.approaching {
        score += weights::APPROACHING;
    }

    if let Some(ttr) = inputs.time_to_reach {
        if ttr < weights::REACH_FAST.0 {
            score += weights::REACH_FAST.1;
        } else if ttr < weights::REACH_SOON.0 {
            score += weights::REACH_SOON.1;
        }
    }

    if inputs.length_ratio > weights::LENGTH_MUCH_LONGER.0 {
        score += weights::LENGTH_MUCH_LONGER.1;
    } else if inputs.length_ratio > weights::LENGTH_LONGER.0 {
        score += weights::LENGTH_LONGER.1;
    }

    score += profile.aggression * weights::AGGRESSION;
    if profile.hunting_us {
        score += weights::HUNTING;
    }
    if inputs.boosting && inputs.approaching {
        score += weights::BOOST_APPROACH;
    }

    if score.is_finite() {
        score.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(dist: f32) -> ThreatInputs {
        ThreatInputs { dist, approaching: false, time_to_reach: None, length_ratio: 0.5, boosting: false }
    }

    #[test]
    fn test_distance_steps() {
        let p = BehaviorProfile::default();
        assert_eq!(threat_score(&inputs(100.0), &p), 40.0);
        assert_eq!(threat_score(&inputs(400.0), &p), 20.0);
        assert_eq!(threat_score(&inputs(2000.0), &p), 0.0);
    }

    #[test]
    fn test_worst_case_clamped() {
        let p = BehaviorProfile { aggression: 1.0, hunting_us: true, ..Default::default() };
        let i = ThreatInputs {
            dist: 50.0,
            approaching: true,
            time_to_reach: Some(5.0),
            length_ratio: 3.0,
            boosting: true,
        };
        assert_eq!(threat_score(&i, &p), 100.0);
    }

    #[test]
    fn test_closing_beats_idle() {
        let p = BehaviorProfile::default();
        let idle = inputs(250.0);
        let closing = ThreatInputs { approaching: true, time_to_reach: Some(40.0), ..idle };
        assert!(threat_score(&closing, &p) > threat_score(&idle, &p));
    }
}
