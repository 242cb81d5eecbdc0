//! Shared primitive types used across the entire simulation.

use crate::error::{SimError, SimResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A simulation cycle. The host advances it by exactly one per tick.
pub type Tick = u64;

/// Host-assigned robot identifier, stable for the lifetime of a run.
pub type RobotId = u32;

/// The canonical run identifier.
pub type RunId = String;

/// Highest agent number the host accepts.
pub const MAX_PLAYER_NUMBER: u8 = 7;

/// The agent number a scenario passes to spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PlayerNumber(u8);

impl PlayerNumber {
    pub fn new(number: u8) -> SimResult<Self> {
        if (1..=MAX_PLAYER_NUMBER).contains(&number) {
            Ok(Self(number))
        } else {
            Err(SimError::InvalidPlayerNumber { number })
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for PlayerNumber {
    type Error = SimError;

    fn try_from(number: u8) -> SimResult<Self> {
        Self::new(number)
    }
}

impl From<PlayerNumber> for u8 {
    fn from(number: PlayerNumber) -> u8 {
        number.0
    }
}

impl fmt::Display for PlayerNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A field position in meters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A velocity in meters per second.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn norm(&self) -> f32 {
        self.x.hypot(self.y)
    }

    pub fn scaled(&self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub position:    Point2,
    /// Radians, counter-clockwise from the field's x axis.
    pub orientation: f32,
}
