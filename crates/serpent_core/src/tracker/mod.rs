//! Entity Tracker
//!
//! Long-lived registry of every rival seen recently. Records live in an
//! index arena (slot vector + free list) keyed by [`RivalId`]; a record
//! that has not been observed for `stale_timeout_ticks` frames is removed
//! outright, so a rival that comes back starts from a fresh record.
//!
//! Per observation:
//! - one-tick velocity from the position delta
//! - motion history ring buffer and average speed
//! - behavior profile (turn rate, boost frequency, approaches, hunting)
//! - linear prediction with a confidence
//! - threat score in [0, 100]

mod history;
mod profile;
mod threat;

pub use history::{MotionHistory, MotionSample};
pub use profile::{BehaviorProfile, Observation};
pub use threat::{threat_score, weights, ThreatInputs};

use fxhash::FxHashMap;
use serde::Serialize;
use tracing::trace;

use crate::config::TrackerConfig;
use crate::geometry::{angle_diff, bearing, distance};
use crate::snapshot::{Agent, Rival, RivalId, WorldSnapshot};

/// Linear extrapolation of a rival's position
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Prediction {
    pub pos: (f32, f32),
    /// [0, 1]
    pub confidence: f32,
}

#[derive(Clone, Debug, Serialize)]
pub struct TrackedRival {
    pub id: RivalId,
    pub pos: (f32, f32),
    pub heading: f32,
    pub speed: f32,
    pub max_speed: f32,
    pub segments: f32,
    /// Position delta per frame
    pub velocity: (f32, f32),
    pub avg_speed: f32,
    /// Distance to the agent at the last observation
    pub distance: f32,
    pub approaching: bool,
    pub boosting: bool,
    pub threat: f32,
    pub profile: BehaviorProfile,
    pub prediction: Prediction,
    pub history: MotionHistory,
    pub first_seen: u64,
    pub last_seen: u64,
}

impl TrackedRival {
    fn new(rival: &Rival, frame: u64, cfg: &TrackerConfig) -> Self {
        let velocity = (rival.heading.cos() * rival.speed, rival.heading.sin() * rival.speed);
        Self {
            id: rival.id,
            pos: rival.pos,
            heading: rival.heading,
            speed: rival.speed,
            max_speed: rival.max_speed,
            segments: rival.segments,
            velocity,
            avg_speed: rival.speed,
            distance: f32::INFINITY,
            approaching: false,
            boosting: false,
            threat: 0.0,
            profile: BehaviorProfile::default(),
            prediction: Prediction { pos: rival.pos, confidence: 0.0 },
            history: MotionHistory::new(cfg.history_capacity),
            first_seen: frame,
            last_seen: frame,
        }
    }

    fn observe(&mut self, rival: &Rival, agent: &Agent, frame: u64, fresh: bool, cfg: &TrackerConfig) {
        let elapsed = frame.saturating_sub(self.last_seen).max(1) as f32;
        if !fresh {
            self.velocity = ((rival.pos.0 - self.pos.0) / elapsed, (rival.pos.1 - self.pos.1) / elapsed);
        }
        let heading_delta = if fresh { 0.0 } else { angle_diff(self.heading, rival.heading) };
        let prev_dist = if fresh { None } else { Some(self.distance) };

        self.pos = rival.pos;
        self.heading = rival.heading;
        self.speed = rival.speed;
        self.max_speed = rival.max_speed;
        self.segments = rival.segments;
        self.last_seen = frame;

        self.history.push(MotionSample { pos: rival.pos, heading: rival.heading, speed: rival.speed, frame });
        self.avg_speed = self.history.average_speed();

        self.boosting = if self.max_speed > 0.0 {
            self.speed > self.max_speed * cfg.boost_speed_ratio
        } else {
            self.speed > cfg.boost_speed_floor
        };

        let dist = distance(rival.pos, agent.pos);
        let aim_error = angle_diff(rival.heading, bearing(rival.pos, agent.pos));
        self.distance = dist;
        self.approaching = aim_error.abs() < cfg.approach_cone && self.speed > cfg.min_closing_speed;

        self.profile.update(
            &Observation { heading_delta, boosting: self.boosting, dist, prev_dist, aim_error },
            cfg,
        );

        let mut confidence = self.profile.predictability;
        if self.boosting {
            confidence *= 0.7;
        }
        if self.profile.turn_rate > cfg.high_turn_rate {
            confidence *= 0.5;
        }
        self.prediction = Prediction {
            pos: (
                self.pos.0 + self.velocity.0 * cfg.prediction_horizon,
                self.pos.1 + self.velocity.1 * cfg.prediction_horizon,
            ),
            confidence: confidence.clamp(0.0, 1.0),
        };

        let closing = self.speed * aim_error.cos();
        let inputs = ThreatInputs {
            dist,
            approaching: self.approaching,
            time_to_reach: (closing > 0.1).then(|| dist / closing),
            length_ratio: self.segments / agent.segments.max(1.0),
            boosting: self.boosting,
        };
        self.threat = threat_score(&inputs, &self.profile);
    }
}

/// Aggregate view for the observability layer
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TrackerStats {
    pub active: usize,
    pub hunters: usize,
    /// Up to three (id, threat) pairs, highest first
    pub top_threats: Vec<(RivalId, f32)>,
    pub mean_threat: f32,
}

#[derive(Clone, Debug, Default)]
pub struct EntityTracker {
    slots: Vec<Option<TrackedRival>>,
    free: Vec<usize>,
    index: FxHashMap<RivalId, usize>,
    frame: u64,
}

impl EntityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames processed since creation or the last [`clear`](Self::clear).
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Observe every live rival in the snapshot, then evict stale records.
    pub fn update(&mut self, world: &WorldSnapshot, cfg: &TrackerConfig) {
        self.frame += 1;
        let frame = self.frame;

        for rival in world.rivals.iter().filter(|r| !r.dead) {
            let (slot, fresh) = match self.index.get(&rival.id) {
                Some(&slot) => (slot, false),
                None => (self.insert(TrackedRival::new(rival, frame, cfg)), true),
            };
            if let Some(record) = self.slots.get_mut(slot).and_then(Option::as_mut) {
                record.observe(rival, &world.agent, frame, fresh, cfg);
            }
        }

        self.evict_stale(cfg.stale_timeout_ticks);
    }

    fn insert(&mut self, record: TrackedRival) -> usize {
        let id = record.id;
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(record);
                slot
            }
            None => {
                self.slots.push(Some(record));
                self.slots.len() - 1
            }
        };
        self.index.insert(id, slot);
        slot
    }

    fn evict_stale(&mut self, timeout: u64) {
        let frame = self.frame;
        let stale: Vec<(RivalId, usize)> = self
            .index
            .iter()
            .filter(|(_, &slot)| {
                self.slots[slot].as_ref().map_or(true, |r| frame.saturating_sub(r.last_seen) > timeout)
            })
            .map(|(&id, &slot)| (id, slot))
            .collect();

        for (id, slot) in stale {
            trace!(rival = id.0, "evicting stale rival");
            self.index.remove(&id);
            self.slots[slot] = None;
            self.free.push(slot);
        }
    }

    /// Drop every record (agent death or respawn).
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.index.clear();
        self.frame = 0;
    }

    pub fn get(&self, id: RivalId) -> Option<&TrackedRival> {
        self.index.get(&id).and_then(|&slot| self.slots[slot].as_ref())
    }

    #[cfg(test)]
    pub(crate) fn get_mut(&mut self, id: RivalId) -> Option<&mut TrackedRival> {
        let slot = *self.index.get(&id)?;
        self.slots[slot].as_mut()
    }

    /// All records in ascending id order.
    pub fn all(&self) -> Vec<&TrackedRival> {
        let mut all: Vec<&TrackedRival> = self.slots.iter().flatten().collect();
        all.sort_by_key(|r| r.id);
        all
    }

    /// Highest threat first; ties broken by id.
    pub fn top_threats(&self, k: usize) -> Vec<&TrackedRival> {
        let mut all = self.all();
        all.sort_by(|a, b| b.threat.total_cmp(&a.threat).then(a.id.cmp(&b.id)));
        all.truncate(k);
        all
    }

    pub fn hunters(&self) -> Vec<&TrackedRival> {
        self.all().into_iter().filter(|r| r.profile.hunting_us).collect()
    }

    pub fn within_radius(&self, center: (f32, f32), radius: f32) -> Vec<&TrackedRival> {
        self.all().into_iter().filter(|r| distance(center, r.pos) <= radius).collect()
    }

    pub fn stats(&self) -> TrackerStats {
        let all = self.all();
        let mean_threat = if all.is_empty() {
            0.0
        } else {
            all.iter().map(|r| r.threat).sum::<f32>() / all.len() as f32
        };
        TrackerStats {
            active: all.len(),
            hunters: all.iter().filter(|r| r.profile.hunting_us).count(),
            top_threats: self.top_threats(3).into_iter().map(|r| (r.id, r.threat)).collect(),
            mean_threat,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario_builder::ScenarioBuilder;

    fn world_with_rival_at(x: f32, heading: f32) -> WorldSnapshot {
        ScenarioBuilder::new().agent_at(0.0, 0.0, 0.0).rival(7, (x, 0.0), heading).build()
    }

    #[test]
    fn test_create_and_velocity() {
        let cfg = TrackerConfig::default();
        let mut tracker = EntityTracker::new();
        tracker.update(&world_with_rival_at(400.0, 0.0), &cfg);
        tracker.update(&world_with_rival_at(410.0, 0.0), &cfg);

        let r = tracker.get(RivalId(7)).unwrap();
        assert_eq!(r.velocity, (10.0, 0.0));
        assert_eq!(r.history.oldest().unwrap().frame, 1);
        assert_eq!(r.history.latest().unwrap().frame, 2);
        assert!((r.prediction.pos.0 - (410.0 + 10.0 * cfg.prediction_horizon)).abs() < 1e-3);
        assert!(r.prediction.confidence > 0.0);
    }

    #[test]
    fn test_prediction_confidence_discounts() {
        let cfg = TrackerConfig::default();

        let mut calm = EntityTracker::new();
        calm.update(&world_with_rival_at(400.0, 0.0), &cfg);
        let r = calm.get(RivalId(7)).unwrap();
        assert!(!r.boosting);
        assert!((r.prediction.confidence - r.profile.predictability).abs() < 1e-6);

        // 12 > 0.75 * 14
        let mut boosting = EntityTracker::new();
        let world = ScenarioBuilder::new()
            .agent_at(0.0, 0.0, 0.0)
            .rival(7, (400.0, 0.0), 0.0)
            .rival_speed(7, 12.0)
            .build();
        boosting.update(&world, &cfg);
        let r = boosting.get(RivalId(7)).unwrap();
        assert!(r.boosting);
        assert!((r.prediction.confidence - r.profile.predictability * 0.7).abs() < 1e-6);

        // Heading swings 2 rad: turn rate 0.1 * 2 = 0.2
        let mut turning = EntityTracker::new();
        turning.update(&world_with_rival_at(400.0, 0.0), &cfg);
        turning.update(&world_with_rival_at(400.0, 2.0), &cfg);
        let r = turning.get(RivalId(7)).unwrap();
        assert!(r.profile.turn_rate > cfg.high_turn_rate);
        assert!((r.prediction.confidence - r.profile.predictability * 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_stale_records_removed() {
        let cfg = TrackerConfig::default();
        let mut tracker = EntityTracker::new();
        tracker.update(&world_with_rival_at(400.0, 0.0), &cfg);
        let empty = ScenarioBuilder::new().agent_at(0.0, 0.0, 0.0).build();

        for _ in 0..cfg.stale_timeout_ticks {
            tracker.update(&empty, &cfg);
        }
        assert!(tracker.get(RivalId(7)).is_some());

        tracker.update(&empty, &cfg);
        assert!(tracker.get(RivalId(7)).is_none());
        assert!(tracker.is_empty());

        // Re-appearance starts a fresh record in the freed slot
        tracker.update(&world_with_rival_at(400.0, 0.0), &cfg);
        let r = tracker.get(RivalId(7)).unwrap();
        assert_eq!(r.first_seen, tracker.frame());
        assert_eq!(r.history.oldest().unwrap().frame, tracker.frame());
        assert_eq!(tracker.slots.len(), 1);
    }

    #[test]
    fn test_approaching_rival_becomes_hunter() {
        let cfg = TrackerConfig::default();
        let mut tracker = EntityTracker::new();
        let mut x = 480.0;
        for _ in 0..=cfg.hunting_threshold + 1 {
            tracker.update(&world_with_rival_at(x, std::f32::consts::PI), &cfg);
            x -= 6.0;
        }
        let r = tracker.get(RivalId(7)).unwrap();
        assert!(r.approaching);
        assert!(r.profile.hunting_us);
        assert_eq!(tracker.hunters().len(), 1);
        assert!(r.threat > 50.0);
    }

    #[test]
    fn test_queries_and_stats() {
        let cfg = TrackerConfig::default();
        let mut tracker = EntityTracker::new();
        let world = ScenarioBuilder::new()
            .agent_at(0.0, 0.0, 0.0)
            .rival(1, (100.0, 0.0), std::f32::consts::PI)
            .rival(2, (700.0, 0.0), 0.0)
            .rival(3, (2000.0, 0.0), 0.0)
            .build();
        tracker.update(&world, &cfg);

        let top = tracker.top_threats(2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].id, RivalId(1));
        assert!(top[0].threat >= top[1].threat);
        assert_eq!(tracker.within_radius((0.0, 0.0), 800.0).len(), 2);
        assert_eq!(tracker.all().len(), 3);

        let stats = tracker.stats();
        assert_eq!(stats.active, 3);
        assert_eq!(stats.top_threats.len(), 3);
        assert_eq!(stats.top_threats[0].0, RivalId(1));
        assert!(stats.mean_threat > 0.0);

        tracker.clear();
        assert!(tracker.is_empty());
        assert_eq!(tracker.stats(), TrackerStats::default());
    }

    #[test]
    fn test_dead_rivals_not_tracked() {
        let cfg = TrackerConfig::default();
        let mut tracker = EntityTracker::new();
        let mut world = world_with_rival_at(300.0, 0.0);
        world.rivals[0].dead = true;
        tracker.update(&world, &cfg);
        assert!(tracker.is_empty());
    }
}
