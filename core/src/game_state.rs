//! Match phases as set by the game controller.
//!
//! Phases form a closed, totally ordered sequence. A match only ever
//! moves forward through it.

use crate::error::{SimError, SimResult};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum GameState {
    #[default]
    Initial,
    Ready,
    Set,
    Playing,
    Finished,
}

impl GameState {
    pub const ALL: [GameState; 5] = [
        Self::Initial,
        Self::Ready,
        Self::Set,
        Self::Playing,
        Self::Finished,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initial  => "Initial",
            Self::Ready    => "Ready",
            Self::Set      => "Set",
            Self::Playing  => "Playing",
            Self::Finished => "Finished",
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameState {
    type Err = SimError;

    fn from_str(name: &str) -> SimResult<Self> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == name)
            .ok_or_else(|| SimError::UnknownGameState { name: name.to_string() })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameControllerState {
    pub game_state: GameState,
}
