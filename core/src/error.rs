use crate::game_state::GameState;
use crate::types::{RobotId, Tick};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid player number {number}: expected 1..=7")]
    InvalidPlayerNumber { number: u8 },

    #[error("Player number {number} already spawned as robot {existing}")]
    DuplicatePlayerNumber { number: u8, existing: RobotId },

    #[error("Unknown robot id {id}")]
    UnknownRobot { id: RobotId },

    #[error("Player {number} was never spawned")]
    PlayerNotSpawned { number: u8 },

    #[error("Unknown game state '{name}'")]
    UnknownGameState { name: String },

    #[error("Game state may only advance: {from} -> {to} is backwards")]
    BackwardGameState { from: GameState, to: GameState },

    #[error("Invalid cycle: expected a value after {current}, got {requested}")]
    NonMonotonicCycle { current: Tick, requested: Tick },

    #[error("Scenario '{scenario}' setup failed: {source}")]
    Setup {
        scenario: String,
        #[source]
        source:   Box<SimError>,
    },

    #[error("Run finished at cycle {cycle}; no further ticks")]
    RunFinished { cycle: Tick },

    #[error("Run aborted at cycle {cycle} by an earlier failure")]
    RunAborted { cycle: Tick },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SimResult<T> = Result<T, SimError>;
