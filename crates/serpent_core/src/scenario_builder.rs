//! ScenarioBuilder - declarative world construction
//!
//! Fixtures for tests, benches and the CLI soak command.
//!
//! ## Example
//!
//! ```rust,ignore
//! let world = ScenarioBuilder::new()
//!     .agent_at(0.0, 0.0, 0.0)
//!     .rival(4, (50.0, 0.0), PI)
//!     .rival_line(7, (300.0, 0.0), (100.0, 0.0), 5)
//!     .food((120.0, 40.0), 3.0)
//!     .build();
//! ```
//!
//! ## Defaults
//! - arena centered on the origin, radius 100_000 (boundary out of range)
//! - agent: speed 5.8, max speed 14, radius 10, 50 segments
//! - rivals: speed 5.8, max speed 14, radius 10, 10 segments
//! - timestamp = tick * 16 ms

use std::f32::consts::PI;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::geometry::{bearing, offset};
use crate::snapshot::{Agent, Arena, Food, Prey, Rival, RivalId, WorldSnapshot};

const TICK_MS: u64 = 16;
const SEGMENT_SPACING: f32 = 12.0;

// ============================================================================
// Builder
// ============================================================================

#[derive(Debug, Clone)]
pub struct ScenarioBuilder {
    tick: u64,
    agent: Agent,
    rivals: Vec<Rival>,
    foods: Vec<Food>,
    preys: Vec<Prey>,
    arena: Arena,
}

impl Default for ScenarioBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioBuilder {
    pub fn new() -> Self {
        Self {
            tick: 0,
            agent: Agent {
                id: None,
                pos: (0.0, 0.0),
                heading: 0.0,
                speed: 5.8,
                max_speed: 14.0,
                radius: 10.0,
                segments: 50.0,
                score: 0.0,
                kills: 0,
                alive: true,
                body: Vec::new(),
            },
            rivals: Vec::new(),
            foods: Vec::new(),
            preys: Vec::new(),
            arena: Arena { center: (0.0, 0.0), radius: 100_000.0 },
        }
    }

    pub fn at_tick(mut self, tick: u64) -> Self {
        self.tick = tick;
        self
    }

    pub fn arena(mut self, center: (f32, f32), radius: f32) -> Self {
        self.arena = Arena { center, radius };
        self
    }

    // ------------------------------------------------------------------------
    // Agent
    // ------------------------------------------------------------------------

    pub fn agent_at(mut self, x: f32, y: f32, heading: f32) -> Self {
        self.agent.pos = (x, y);
        self.agent.heading = heading;
        self
    }

    pub fn agent_speed(mut self, speed: f32) -> Self {
        self.agent.speed = speed;
        self
    }

    pub fn agent_segments(mut self, segments: f32) -> Self {
        self.agent.segments = segments;
        self
    }

    pub fn agent_radius(mut self, radius: f32) -> Self {
        self.agent.radius = radius;
        self
    }

    pub fn agent_id(mut self, id: u32) -> Self {
        self.agent.id = Some(RivalId(id));
        self
    }

    pub fn agent_body(mut self, body: Vec<(f32, f32)>) -> Self {
        self.agent.body = body;
        self
    }

    pub fn dead_agent(mut self) -> Self {
        self.agent.alive = false;
        self
    }

    // ------------------------------------------------------------------------
    // Rivals
    // ------------------------------------------------------------------------

    /// Bare head with no trailing body.
    pub fn rival(self, id: u32, pos: (f32, f32), heading: f32) -> Self {
        self.push_rival(id, pos, heading, Vec::new())
    }

    /// Head at `head`, `n` body points evenly spaced toward `tail`.
    /// The head moves away from its tail.
    pub fn rival_line(self, id: u32, head: (f32, f32), tail: (f32, f32), n: usize) -> Self {
        let body = (1..=n)
            .map(|k| {
                let t = k as f32 / n.max(1) as f32;
                (head.0 + (tail.0 - head.0) * t, head.1 + (tail.1 - head.1) * t)
            })
            .collect();
        self.push_rival(id, head, bearing(tail, head), body)
    }

    /// Head at `head` with an explicit body; heading points away from the
    /// first body point.
    pub fn rival_body(self, id: u32, head: (f32, f32), body: Vec<(f32, f32)>) -> Self {
        let heading = body.first().map_or(0.0, |&p| bearing(p, head));
        self.push_rival(id, head, heading, body)
    }

    pub fn rival_speed(mut self, id: u32, speed: f32) -> Self {
        if let Some(r) = self.rivals.iter_mut().find(|r| r.id == RivalId(id)) {
            r.speed = speed;
        }
        self
    }

    pub fn rival_heading(mut self, id: u32, heading: f32) -> Self {
        if let Some(r) = self.rivals.iter_mut().find(|r| r.id == RivalId(id)) {
            r.heading = heading;
        }
        self
    }

    pub fn rival_segments(mut self, id: u32, segments: f32) -> Self {
        if let Some(r) = self.rivals.iter_mut().find(|r| r.id == RivalId(id)) {
            r.segments = segments;
        }
        self
    }

    fn push_rival(mut self, id: u32, pos: (f32, f32), heading: f32, body: Vec<(f32, f32)>) -> Self {
        self.rivals.push(Rival {
            id: RivalId(id),
            pos,
            heading,
            speed: 5.8,
            max_speed: 14.0,
            radius: 10.0,
            segments: 10.0,
            dead: false,
            body,
        });
        self
    }

    // ------------------------------------------------------------------------
    // Items
    // ------------------------------------------------------------------------

    pub fn food(mut self, pos: (f32, f32), size: f32) -> Self {
        self.foods.push(Food { pos, size });
        self
    }

    pub fn prey(mut self, pos: (f32, f32), size: f32, speed: f32, heading: f32) -> Self {
        self.preys.push(Prey { pos, size, speed, heading });
        self
    }

    pub fn build(self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.tick,
            timestamp_ms: self.tick * TICK_MS,
            agent: self.agent,
            rivals: self.rivals,
            foods: self.foods,
            preys: self.preys,
            arena: self.arena,
        }
    }
}

// ============================================================================
// Seeded random worlds
// ============================================================================

/// Crowded random world around an agent near the arena center.
///
/// Same seed, same world. Rival bodies are wandering trails trailing behind
/// their heads.
pub fn random_world(seed: u64, rivals: usize) -> WorldSnapshot {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let arena_radius = 6000.0;

    let agent_pos = offset((0.0, 0.0), rng.gen_range(-PI..PI), rng.gen_range(0.0..arena_radius * 0.8));
    let agent_heading: f32 = rng.gen_range(-PI..PI);
    let own = trail(&mut rng, agent_pos, agent_heading + PI, 20);
    let mut builder = ScenarioBuilder::new()
        .at_tick(seed)
        .arena((0.0, 0.0), arena_radius)
        .agent_at(agent_pos.0, agent_pos.1, agent_heading)
        .agent_segments(rng.gen_range(20.0..120.0))
        .agent_body(own);

    for i in 0..rivals {
        let head = offset(agent_pos, rng.gen_range(-PI..PI), rng.gen_range(80.0..1500.0));
        let heading: f32 = rng.gen_range(-PI..PI);
        let len = rng.gen_range(5..60);
        let body = trail(&mut rng, head, heading + PI, len);
        let id = i as u32 + 1;
        builder = builder
            .rival_body(id, head, body)
            .rival_heading(id, heading)
            .rival_speed(id, rng.gen_range(4.0..14.0))
            .rival_segments(id, len as f32 * 1.5);
    }

    for _ in 0..40 {
        let pos = offset(agent_pos, rng.gen_range(-PI..PI), rng.gen_range(20.0..1200.0));
        builder = builder.food(pos, rng.gen_range(1.0..12.0));
    }
    for _ in 0..3 {
        let pos = offset(agent_pos, rng.gen_range(-PI..PI), rng.gen_range(100.0..900.0));
        builder = builder.prey(pos, rng.gen_range(8.0..20.0), rng.gen_range(3.0..8.0), rng.gen_range(-PI..PI));
    }

    builder.build()
}

/// Wandering trail of `n` points starting one spacing from `start`.
fn trail(rng: &mut ChaCha8Rng, start: (f32, f32), direction: f32, n: usize) -> Vec<(f32, f32)> {
    let mut points = Vec::with_capacity(n);
    let mut pos = start;
    let mut dir = direction;
    for _ in 0..n {
        dir += rng.gen_range(-0.25..0.25);
        pos = offset(pos, dir, SEGMENT_SPACING);
        points.push(pos);
    }
    points
}
