//! Fixed-capacity motion history (ring buffer)

use std::collections::VecDeque;

use serde::Serialize;

use crate::geometry::distance;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MotionSample {
    pub pos: (f32, f32),
    pub heading: f32,
    pub speed: f32,
    pub frame: u64,
}

/// Oldest samples are overwritten once full
#[derive(Clone, Debug, Serialize)]
pub struct MotionHistory {
    samples: VecDeque<MotionSample>,
    capacity: usize,
}

impl MotionHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(2);
        Self { samples: VecDeque::with_capacity(capacity), capacity }
    }

    pub fn push(&mut self, sample: MotionSample) {
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn oldest(&self) -> Option<&MotionSample> {
        self.samples.front()
    }

    pub fn latest(&self) -> Option<&MotionSample> {
        self.samples.back()
    }

    /// Displacement from the oldest retained sample to now, per frame.
    pub fn average_speed(&self) -> f32 {
        match (self.oldest(), self.latest()) {
            (Some(a), Some(b)) if b.frame > a.frame => {
                distance(a.pos, b.pos) / (b.frame - a.frame) as f32
            }
            (_, Some(b)) => b.speed,
            _ => 0.0,
        }
    }
}
