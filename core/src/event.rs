//! Events recorded during a run, and the domain events the host raises.
//!
//! Every mutation a scenario makes through `HostContext` produces exactly
//! one `SimEvent`. Variants are appended, never reordered.

use crate::{
    game_state::GameState,
    types::{PlayerNumber, Point2, RobotId, RunId, Tick},
    world_state::Ball,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    RunInitialized {
        run_id:   RunId,
        scenario: String,
    },
    RobotSpawned {
        cycle:         Tick,
        robot_id:      RobotId,
        player_number: PlayerNumber,
        position:      Point2,
        orientation:   f32,
    },
    PoseForced {
        cycle:       Tick,
        robot_id:    RobotId,
        position:    Point2,
        orientation: f32,
    },
    BallReplaced {
        cycle: Tick,
        ball:  Ball,
    },
    BallCleared {
        cycle: Tick,
    },
    GameStateChanged {
        cycle: Tick,
        from:  GameState,
        to:    GameState,
    },
    GoalDetected {
        cycle: Tick,
    },
    ScenarioFinished {
        cycle: Tick,
    },
}

impl SimEvent {
    /// Stable name for the event_type column in event_log.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::RunInitialized { .. }   => "run_initialized",
            Self::RobotSpawned { .. }     => "robot_spawned",
            Self::PoseForced { .. }       => "pose_forced",
            Self::BallReplaced { .. }     => "ball_replaced",
            Self::BallCleared { .. }      => "ball_cleared",
            Self::GameStateChanged { .. } => "game_state_changed",
            Self::GoalDetected { .. }     => "goal_detected",
            Self::ScenarioFinished { .. } => "scenario_finished",
        }
    }
}

/// Conditions the host detects and reports to the scenario through a
/// named callback, outside the regular per-cycle hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainEvent {
    Goal,
}

/// The event log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id:         Option<i64>,
    pub run_id:     RunId,
    pub cycle:      Tick,
    pub source:     String,
    pub event_type: String,
    pub payload:    String, // JSON-serialized SimEvent
}
