use serde::{Deserialize, Serialize};

/// Substitutes for missing snapshot fields, applied once at ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestDefaults {
    /// Nominal tick length; timestamp = tick * tick_ms when absent
    pub tick_ms: u64,
    pub heading: f32,
    pub speed: f32,
    pub max_speed: f32,
    pub agent_radius: f32,
    pub rival_radius: f32,
    pub segments: f32,
    pub food_size: f32,
    pub prey_size: f32,
    pub prey_speed: f32,
    pub arena_center: (f32, f32),
    pub arena_radius: f32,
}

impl Default for IngestDefaults {
    fn default() -> Self {
        Self {
            tick_ms: 16,
            heading: 0.0,
            speed: 5.8,
            max_speed: 14.0,
            agent_radius: 10.0,
            rival_radius: 10.0,
            segments: 10.0,
            food_size: 1.0,
            prey_size: 10.0,
            prey_speed: 5.0,
            arena_center: (21600.0, 21600.0),
            arena_radius: 21600.0,
        }
    }
}
