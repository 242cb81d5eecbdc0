//! kickoff-core: scripted scenarios for a discrete-time robot-soccer
//! simulation, and the reference host that runs them.

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod game_state;
pub mod host;
pub mod physics;
pub mod scenario;
pub mod scenarios;
pub mod schedule;
pub mod scripted_scenario;
pub mod snapshot;
pub mod store;
pub mod types;
pub mod world_state;
