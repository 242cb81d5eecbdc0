//! Capabilities the host grants a scenario during a callback.
//!
//! A `HostContext` borrows the world state mutably for the duration of a
//! single callback, so only one callback can touch the world at a time.

use crate::{
    error::{SimError, SimResult},
    event::SimEvent,
    game_state::GameState,
    types::{PlayerNumber, Point2, Pose, RobotId, Tick},
    world_state::{Ball, WorldState},
};
use std::f32::consts::FRAC_PI_2;

/// Sideline where freshly spawned robots wait.
pub const SPAWN_SIDELINE_Y: f32 = -3.0;
/// Spacing between spawned robots along the sideline.
pub const SPAWN_SPACING: f32 = 0.6;

/// Where the host puts a robot that was just spawned: on the own sideline,
/// facing into the field.
pub fn default_pose(player_number: PlayerNumber) -> Pose {
    Pose {
        position:    Point2::new(-SPAWN_SPACING * f32::from(player_number.get()), SPAWN_SIDELINE_Y),
        orientation: FRAC_PI_2,
    }
}

pub struct HostContext<'a> {
    world:  &'a mut WorldState,
    events: &'a mut Vec<SimEvent>,
}

impl<'a> HostContext<'a> {
    pub fn new(world: &'a mut WorldState, events: &'a mut Vec<SimEvent>) -> Self {
        Self { world, events }
    }

    /// Read-only view of the world.
    pub fn world(&self) -> &WorldState {
        self.world
    }

    pub fn cycle_count(&self) -> Tick {
        self.world.cycle_count
    }

    pub fn spawn(&mut self, player_number: PlayerNumber) -> SimResult<RobotId> {
        let pose = default_pose(player_number);
        let robot_id = self.world.push_robot(player_number, pose)?;
        log::debug!("cycle={} spawned robot {robot_id} as player {player_number}", self.cycle_count());
        self.events.push(SimEvent::RobotSpawned {
            cycle: self.cycle_count(),
            robot_id,
            player_number,
            position: pose.position,
            orientation: pose.orientation,
        });
        Ok(robot_id)
    }

    /// Teleport a robot.
    pub fn force_pose(&mut self, robot_id: RobotId, position: Point2, orientation: f32) -> SimResult<()> {
        let cycle = self.cycle_count();
        let robot = self
            .world
            .robot_mut(robot_id)
            .ok_or(SimError::UnknownRobot { id: robot_id })?;
        robot.pose = Pose { position, orientation };
        log::debug!("cycle={cycle} forced robot {robot_id} to ({}, {}) @ {orientation}", position.x, position.y);
        self.events.push(SimEvent::PoseForced { cycle, robot_id, position, orientation });
        Ok(())
    }

    pub fn set_ball(&mut self, ball: Ball) {
        self.world.set_ball(ball);
        self.events.push(SimEvent::BallReplaced { cycle: self.cycle_count(), ball });
    }

    /// Take the ball out of play. Clearing an absent ball records nothing.
    pub fn clear_ball(&mut self) {
        if self.world.clear_ball().is_some() {
            self.events.push(SimEvent::BallCleared { cycle: self.cycle_count() });
        }
    }

    pub fn set_game_state(&mut self, next: GameState) -> SimResult<()> {
        let from = self.world.game_state();
        if self.world.set_game_state(next)? {
            log::info!("cycle={} game state {from} -> {next}", self.cycle_count());
            self.events.push(SimEvent::GameStateChanged {
                cycle: self.cycle_count(),
                from,
                to: next,
            });
        }
        Ok(())
    }

    pub fn finish(&mut self) {
        if self.world.finish() {
            log::info!("cycle={} scenario finished", self.cycle_count());
            self.events.push(SimEvent::ScenarioFinished { cycle: self.cycle_count() });
        }
    }
}
