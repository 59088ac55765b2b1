//! # serpent_core - Perception and decision core for an arena serpent bot
//!
//! Every tick the core turns one world snapshot into a heading and a boost
//! flag:
//! - 360-sector radar of rival bodies, heads and the arena rim
//! - long-lived rival tracker with prediction and behavior profiles
//! - encirclement detection with circular gap search
//! - food and rival-cutoff target selection
//! - per-sector scoring plus a defensive circling mode
//!
//! ## Usage
//! ```rust
//! use serpent_core::{BotConfig, BotCore, ScenarioBuilder};
//!
//! let mut core = BotCore::new(BotConfig::default());
//! let world = ScenarioBuilder::new().agent_at(0.0, 0.0, 0.0).build();
//! let decision = core.tick(&world).expect("agent is alive");
//! assert_eq!(decision.heading, 0.0);
//! ```

// Doc formatting lints - purely cosmetic
#![allow(clippy::doc_lazy_continuation)]
// Scoring helpers take many scalar inputs
#![allow(clippy::too_many_arguments)]
// Sector loops index several parallel buffers
#![allow(clippy::needless_range_loop)]

pub mod config;
pub mod decision;
pub mod error;
pub mod geometry;
pub mod pipeline;
pub mod scanner;
pub mod scenario_builder;
pub mod sector;
pub mod sensor;
pub mod snapshot;
pub mod targets;
pub mod tracker;
pub mod trap;

pub use config::BotConfig;
pub use decision::{Decision, Mode, Reason, TurnDirection};
pub use error::{CoreError, Result};
pub use pipeline::{BotCore, TickReport};
pub use scenario_builder::{random_world, ScenarioBuilder};
pub use snapshot::{RawSnapshot, RivalId, WorldSnapshot};
pub use tracker::TrackerStats;
pub use trap::EncirclementState;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
