//! Simulation clock — owns the cycle counter.
//!
//! The counter starts at 0 and only moves forward. `advance` is the
//! normal path; `jump_to` exists for hosts whose clock skips cycles.

use crate::{
    error::{SimError, SimResult},
    types::{RunId, Tick},
};
use serde::{Deserialize, Serialize};

/// Wall-clock duration of one simulated cycle, in seconds.
pub const CYCLE_SECONDS: f32 = 0.012;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimClock {
    pub run_id:      RunId,
    pub cycle_count: Tick,
}

impl SimClock {
    pub fn new(run_id: RunId) -> Self {
        Self { run_id, cycle_count: 0 }
    }

    /// Advance one cycle. Returns the new cycle number.
    pub fn advance(&mut self) -> Tick {
        self.cycle_count += 1;
        self.cycle_count
    }

    /// Move straight to `cycle`, skipping everything in between.
    pub fn jump_to(&mut self, cycle: Tick) -> SimResult<Tick> {
        if cycle <= self.cycle_count {
            return Err(SimError::NonMonotonicCycle {
                current:   self.cycle_count,
                requested: cycle,
            });
        }
        self.cycle_count = cycle;
        Ok(cycle)
    }

    pub fn elapsed_seconds(&self) -> f32 {
        self.cycle_count as f32 * CYCLE_SECONDS
    }
}
