//! World Snapshot
//!
//! Normalized, read-only view of one tick of host state. Built once per
//! tick from [`RawSnapshot`] so the algorithms never see a missing field.
//!
//! ## Ingestion rules
//! 1. Missing scalars take the value from [`IngestDefaults`]
//! 2. Points with a missing or non-finite coordinate are dropped
//! 3. Dying body points, eaten food and rivals without an id/position are dropped
//! 4. A missing agent position marks the agent as not alive

mod defaults;
mod raw;

pub use defaults::IngestDefaults;
pub use raw::{RawAgent, RawArena, RawFood, RawPoint, RawPrey, RawRival, RawSnapshot};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::geometry::normalize_angle;

/// Host identity of a rival
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RivalId(pub u32);

/// The controlled agent
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: Option<RivalId>,
    pub pos: (f32, f32),
    pub heading: f32,
    pub speed: f32,
    pub max_speed: f32,
    pub radius: f32,
    pub segments: f32,
    pub score: f32,
    pub kills: u32,
    pub alive: bool,
    /// Own trailing body, head-first
    pub body: Vec<(f32, f32)>,
}

/// Another agent in the arena
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rival {
    pub id: RivalId,
    pub pos: (f32, f32),
    pub heading: f32,
    pub speed: f32,
    pub max_speed: f32,
    pub radius: f32,
    pub segments: f32,
    pub dead: bool,
    /// Solid trailing body points, head-first
    pub body: Vec<(f32, f32)>,
}

/// Static consumable
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub pos: (f32, f32),
    pub size: f32,
}

/// Moving high-value consumable
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prey {
    pub pos: (f32, f32),
    pub size: f32,
    pub speed: f32,
    pub heading: f32,
}

/// Circular arena
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub center: (f32, f32),
    pub radius: f32,
}

/// One tick of normalized world state
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub timestamp_ms: u64,
    pub agent: Agent,
    pub rivals: Vec<Rival>,
    pub foods: Vec<Food>,
    pub preys: Vec<Prey>,
    pub arena: Arena,
}

fn finite_or(value: Option<f32>, default: f32) -> f32 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => default,
    }
}

fn finite_pair(x: Option<f32>, y: Option<f32>) -> Option<(f32, f32)> {
    match (x, y) {
        (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some((x, y)),
        _ => None,
    }
}

fn solid_points(points: &[RawPoint]) -> Vec<(f32, f32)> {
    points
        .iter()
        .filter(|p| !p.dying.unwrap_or(false))
        .filter_map(|p| finite_pair(p.x, p.y))
        .collect()
}

impl WorldSnapshot {
    /// Normalize a raw host snapshot.
    pub fn from_raw(raw: &RawSnapshot, defaults: &IngestDefaults) -> Self {
        Self::from_raw_at(raw, defaults, 0)
    }

    /// Like [`Self::from_raw`], with `fallback_tick` standing in for a missing tick.
    ///
    /// Drivers that keep their own frame count pass it here so the derived
    /// timestamp keeps advancing when the host sends neither tick nor time.
    pub fn from_raw_at(raw: &RawSnapshot, defaults: &IngestDefaults, fallback_tick: u64) -> Self {
        let tick = raw.tick.unwrap_or(fallback_tick);
        let timestamp_ms = raw.timestamp_ms.unwrap_or(tick.saturating_mul(defaults.tick_ms));

        let arena = match &raw.arena {
            Some(a) => Arena {
                center: (
                    finite_or(a.center_x, defaults.arena_center.0),
                    finite_or(a.center_y, defaults.arena_center.1),
                ),
                radius: finite_or(a.radius, defaults.arena_radius).max(1.0),
            },
            None => Arena { center: defaults.arena_center, radius: defaults.arena_radius },
        };

        let agent = Self::ingest_agent(raw.agent.as_ref(), defaults);

        let mut rivals = Vec::with_capacity(raw.rivals.len());
        for r in &raw.rivals {
            let (Some(id), Some(pos)) = (r.id, finite_pair(r.x, r.y)) else {
                trace!("snapshot: dropping rival without id/position");
                continue;
            };
            let id = RivalId(id);
            if agent.id == Some(id) {
                continue;
            }
            rivals.push(Rival {
                id,
                pos,
                heading: normalize_angle(finite_or(r.heading, defaults.heading)),
                speed: finite_or(r.speed, defaults.speed).max(0.0),
                max_speed: finite_or(r.max_speed, defaults.max_speed).max(0.0),
                radius: finite_or(r.radius, defaults.rival_radius).max(0.0),
                segments: finite_or(r.segments, defaults.segments).max(0.0),
                dead: r.dead.unwrap_or(false),
                body: solid_points(&r.body),
            });
        }

        let foods = raw
            .foods
            .iter()
            .filter(|f| !f.eaten.unwrap_or(false))
            .filter_map(|f| {
                finite_pair(f.x, f.y).map(|pos| Food {
                    pos,
                    size: finite_or(f.size, defaults.food_size).max(0.0),
                })
            })
            .collect();

        let preys = raw
            .preys
            .iter()
            .filter(|p| !p.eaten.unwrap_or(false))
            .filter_map(|p| {
                finite_pair(p.x, p.y).map(|pos| Prey {
                    pos,
                    size: finite_or(p.size, defaults.prey_size).max(0.0),
                    speed: finite_or(p.speed, defaults.prey_speed).max(0.0),
                    heading: normalize_angle(finite_or(p.heading, defaults.heading)),
                })
            })
            .collect();

        Self { tick, timestamp_ms, agent, rivals, foods, preys, arena }
    }

    fn ingest_agent(raw: Option<&RawAgent>, defaults: &IngestDefaults) -> Agent {
        let Some(a) = raw else {
            trace!("snapshot: no agent, treating as dead");
            return Agent::placeholder(defaults);
        };

        let pos = finite_pair(a.x, a.y);
        Agent {
            id: a.id.map(RivalId),
            pos: pos.unwrap_or(defaults.arena_center),
            heading: normalize_angle(finite_or(a.heading, defaults.heading)),
            speed: finite_or(a.speed, defaults.speed).max(0.0),
            max_speed: finite_or(a.max_speed, defaults.max_speed).max(0.0),
            radius: finite_or(a.radius, defaults.agent_radius).max(0.0),
            segments: finite_or(a.segments, defaults.segments).max(0.0),
            score: finite_or(a.score, 0.0),
            kills: a.kills.unwrap_or(0),
            alive: pos.is_some() && a.alive.unwrap_or(true),
            body: solid_points(&a.body),
        }
    }

    /// Lookup by id among this tick's rivals.
    pub fn rival(&self, id: RivalId) -> Option<&Rival> {
        self.rivals.iter().find(|r| r.id == id)
    }
}

impl Agent {
    fn placeholder(defaults: &IngestDefaults) -> Self {
        Self {
            id: None,
            pos: defaults.arena_center,
            heading: defaults.heading,
            speed: 0.0,
            max_speed: defaults.max_speed,
            radius: defaults.agent_radius,
            segments: 0.0,
            score: 0.0,
            kills: 0,
            alive: false,
            body: Vec::new(),
        }
    }

    /// Length of the visible own trail, or a segment-count estimate.
    pub fn body_length(&self, segment_spacing: f32) -> f32 {
        let traced: f32 = self
            .body
            .windows(2)
            .map(|w| crate::geometry::distance(w[0], w[1]))
            .sum();
        if traced > 0.0 {
            traced
        } else {
            self.segments * segment_spacing
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_with_agent() -> RawSnapshot {
        RawSnapshot {
            tick: Some(5),
            agent: Some(RawAgent {
                id: Some(1),
                x: Some(100.0),
                y: Some(200.0),
                heading: Some(0.5),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let defaults = IngestDefaults::default();
        let world = WorldSnapshot::from_raw(&raw_with_agent(), &defaults);
        assert!(world.agent.alive);
        assert_eq!(world.agent.pos, (100.0, 200.0));
        assert!((world.agent.radius - defaults.agent_radius).abs() < 1e-6);
        assert_eq!(world.timestamp_ms, 5 * defaults.tick_ms);
        assert_eq!(world.arena.radius, defaults.arena_radius);
    }

    #[test]
    fn test_fallback_tick_drives_timestamp() {
        let defaults = IngestDefaults::default();
        let mut raw = raw_with_agent();
        raw.tick = None;
        let world = WorldSnapshot::from_raw_at(&raw, &defaults, 42);
        assert_eq!(world.tick, 42);
        assert_eq!(world.timestamp_ms, 42 * defaults.tick_ms);

        // A host tick wins over the fallback
        let world = WorldSnapshot::from_raw_at(&raw_with_agent(), &defaults, 42);
        assert_eq!(world.tick, 5);
    }

    #[test]
    fn test_agent_without_position_is_dead() {
        let mut raw = raw_with_agent();
        if let Some(agent) = raw.agent.as_mut() {
            agent.x = None;
        }
        let world = WorldSnapshot::from_raw(&raw, &IngestDefaults::default());
        assert!(!world.agent.alive);

        let world = WorldSnapshot::from_raw(&RawSnapshot::default(), &IngestDefaults::default());
        assert!(!world.agent.alive);
    }

    #[test]
    fn test_malformed_entities_dropped() {
        let mut raw = raw_with_agent();
        raw.rivals = vec![
            RawRival { id: None, x: Some(1.0), y: Some(1.0), ..Default::default() },
            RawRival { id: Some(7), x: Some(f32::NAN), y: Some(1.0), ..Default::default() },
            // The agent's own entry echoed back by the host
            RawRival { id: Some(1), x: Some(100.0), y: Some(200.0), ..Default::default() },
            RawRival {
                id: Some(9),
                x: Some(300.0),
                y: Some(300.0),
                body: vec![
                    RawPoint::at(310.0, 300.0),
                    RawPoint { x: Some(320.0), y: Some(300.0), dying: Some(true) },
                    RawPoint { x: None, y: Some(1.0), dying: None },
                ],
                ..Default::default()
            },
        ];
        raw.foods = vec![
            RawFood { x: Some(1.0), y: Some(2.0), size: None, eaten: None },
            RawFood { x: Some(1.0), y: Some(2.0), size: Some(3.0), eaten: Some(true) },
        ];

        let world = WorldSnapshot::from_raw(&raw, &IngestDefaults::default());
        assert_eq!(world.rivals.len(), 1);
        assert_eq!(world.rivals[0].id, RivalId(9));
        assert_eq!(world.rivals[0].body, vec![(310.0, 300.0)]);
        assert_eq!(world.foods.len(), 1);
        assert!((world.foods[0].size - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_json_ingestion() {
        let json = r#"{
            "tick": 3,
            "timestamp_ms": 1000,
            "agent": {"x": 0, "y": 0, "heading": 7.0, "body": [{"x": -10, "y": 0}]},
            "rivals": [{"id": 2, "x": 50, "y": 0, "speed": null}],
            "arena": {"radius": 10000}
        }"#;
        let raw: RawSnapshot = serde_json::from_str(json).unwrap();
        let world = WorldSnapshot::from_raw(&raw, &IngestDefaults::default());
        assert_eq!(world.timestamp_ms, 1000);
        assert!(world.agent.heading <= std::f32::consts::PI);
        assert_eq!(world.rivals[0].speed, IngestDefaults::default().speed);
        assert_eq!(world.arena.radius, 10000.0);
        assert_eq!(world.arena.center, IngestDefaults::default().arena_center);
    }

    #[test]
    fn test_body_length() {
        let mut world = WorldSnapshot::from_raw(&raw_with_agent(), &IngestDefaults::default());
        world.agent.body = vec![(0.0, 0.0), (30.0, 0.0), (30.0, 40.0)];
        assert!((world.agent.body_length(12.0) - 70.0).abs() < 1e-4);
        world.agent.body.clear();
        world.agent.segments = 10.0;
        assert!((world.agent.body_length(12.0) - 120.0).abs() < 1e-4);
    }
}
