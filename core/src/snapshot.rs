//! Snapshot serialization — full world state to/from JSON.
//!
//! A snapshot is taken every SNAPSHOT_INTERVAL cycles and once more when
//! the scenario finishes, whenever the host has a store attached.

use crate::{
    types::{RunId, Tick},
    world_state::WorldState,
};
use serde::{Deserialize, Serialize};

pub const SNAPSHOT_INTERVAL: Tick = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub run_id: RunId,
    pub cycle:  Tick,
    pub world:  WorldState,
}
