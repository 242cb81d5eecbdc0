//! The shared world state.
//!
//! Owned by the host, handed to exactly one scenario callback at a time.
//! Scenario-facing mutation goes through `HostContext`, which records an
//! event for every change; the methods here hold the invariants.

use crate::{
    error::{SimError, SimResult},
    game_state::{GameControllerState, GameState},
    types::{PlayerNumber, Point2, Pose, RobotId, Tick, Vector2},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub position: Point2,
    pub velocity: Vector2,
}

impl Ball {
    pub fn at_rest(position: Point2) -> Self {
        Self { position, velocity: Vector2::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Robot {
    pub id:            RobotId,
    pub player_number: PlayerNumber,
    pub pose:          Pose,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    pub cycle_count:           Tick,
    finished:                  bool,
    ball:                      Option<Ball>,
    robots:                    Vec<Robot>,
    pub game_controller_state: GameControllerState,
}

impl WorldState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finished(&self) -> bool {
        self.finished
    }

    /// Mark the run complete. There is no way back.
    /// Returns true only on the call that flipped the flag.
    pub fn finish(&mut self) -> bool {
        let newly = !self.finished;
        self.finished = true;
        newly
    }

    pub fn ball(&self) -> Option<&Ball> {
        self.ball.as_ref()
    }

    pub fn ball_mut(&mut self) -> Option<&mut Ball> {
        self.ball.as_mut()
    }

    /// Replace the ball wholesale.
    pub fn set_ball(&mut self, ball: Ball) {
        self.ball = Some(ball);
    }

    /// Returns the ball that was in play, if any.
    pub fn clear_ball(&mut self) -> Option<Ball> {
        self.ball.take()
    }

    pub fn game_state(&self) -> GameState {
        self.game_controller_state.game_state
    }

    /// Advance the match phase. Re-assigning the current phase is a no-op;
    /// moving backwards is an error. Returns true if the phase changed.
    pub fn set_game_state(&mut self, next: GameState) -> SimResult<bool> {
        let current = self.game_controller_state.game_state;
        if next < current {
            return Err(SimError::BackwardGameState { from: current, to: next });
        }
        self.game_controller_state.game_state = next;
        Ok(next != current)
    }

    pub fn robots(&self) -> &[Robot] {
        &self.robots
    }

    pub fn robot(&self, id: RobotId) -> Option<&Robot> {
        self.robots.iter().find(|robot| robot.id == id)
    }

    pub fn robot_mut(&mut self, id: RobotId) -> Option<&mut Robot> {
        self.robots.iter_mut().find(|robot| robot.id == id)
    }

    pub fn robot_by_number(&self, number: PlayerNumber) -> Option<&Robot> {
        self.robots.iter().find(|robot| robot.player_number == number)
    }

    /// Append a robot. Ids are handed out in spawn order starting at 0.
    pub(crate) fn push_robot(&mut self, player_number: PlayerNumber, pose: Pose) -> SimResult<RobotId> {
        if let Some(existing) = self.robot_by_number(player_number) {
            return Err(SimError::DuplicatePlayerNumber {
                number:   player_number.get(),
                existing: existing.id,
            });
        }
        let id = self.robots.len() as RobotId;
        self.robots.push(Robot { id, player_number, pose });
        Ok(id)
    }
}
