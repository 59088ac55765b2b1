//! Wire shape of the host's world snapshot.
//!
//! Every field is optional; missing values are filled from
//! [`IngestDefaults`](super::IngestDefaults) in one place.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPoint {
    pub x: Option<f32>,
    pub y: Option<f32>,
    /// Points that are fading out are not solid
    pub dying: Option<bool>,
}

impl RawPoint {
    pub fn at(x: f32, y: f32) -> Self {
        Self { x: Some(x), y: Some(y), dying: None }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawAgent {
    pub id: Option<u32>,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub heading: Option<f32>,
    pub speed: Option<f32>,
    pub max_speed: Option<f32>,
    pub radius: Option<f32>,
    pub segments: Option<f32>,
    pub score: Option<f32>,
    pub kills: Option<u32>,
    pub alive: Option<bool>,
    pub body: Vec<RawPoint>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRival {
    pub id: Option<u32>,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub heading: Option<f32>,
    pub speed: Option<f32>,
    pub max_speed: Option<f32>,
    pub radius: Option<f32>,
    pub segments: Option<f32>,
    pub dead: Option<bool>,
    pub body: Vec<RawPoint>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawFood {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub size: Option<f32>,
    pub eaten: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPrey {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub size: Option<f32>,
    pub speed: Option<f32>,
    pub heading: Option<f32>,
    pub eaten: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawArena {
    pub center_x: Option<f32>,
    pub center_y: Option<f32>,
    pub radius: Option<f32>,
}

/// One tick of host state, as delivered
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSnapshot {
    pub tick: Option<u64>,
    pub timestamp_ms: Option<u64>,
    pub agent: Option<RawAgent>,
    pub rivals: Vec<RawRival>,
    pub foods: Vec<RawFood>,
    pub preys: Vec<RawPrey>,
    pub arena: Option<RawArena>,
}
