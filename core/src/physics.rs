//! Physics seam of the host.
//!
//! Runs once per tick before any scenario callback. Implementations move
//! bodies in the world and report domain events they detect.

use crate::{
    config::PhysicsConfig,
    error::SimResult,
    event::DomainEvent,
    world_state::WorldState,
};

pub trait Physics: Send {
    fn name(&self) -> &'static str;

    /// Integrate one cycle. `world.cycle_count` already holds the new cycle.
    fn integrate(&mut self, world: &mut WorldState) -> SimResult<Vec<DomainEvent>>;
}

/// Leaves the world untouched. Scripted-only runs and tests use this.
#[derive(Debug, Default)]
pub struct NoPhysics;

impl Physics for NoPhysics {
    fn name(&self) -> &'static str { "none" }

    fn integrate(&mut self, _world: &mut WorldState) -> SimResult<Vec<DomainEvent>> {
        Ok(vec![])
    }
}

/// Rolls the ball in a straight line with constant deceleration and
/// reports a goal when it crosses either goal line between the posts.
#[derive(Debug, Default)]
pub struct BallPhysics {
    config: PhysicsConfig,
}

impl BallPhysics {
    pub fn new(config: PhysicsConfig) -> Self {
        Self { config }
    }
}

impl Physics for BallPhysics {
    fn name(&self) -> &'static str { "ball" }

    fn integrate(&mut self, world: &mut WorldState) -> SimResult<Vec<DomainEvent>> {
        let PhysicsConfig { cycle_seconds, rolling_deceleration, goal_line_x, goal_half_width } =
            self.config;
        let cycle = world.cycle_count;
        let Some(ball) = world.ball_mut() else {
            return Ok(vec![]);
        };

        let previous_x = ball.position.x;
        ball.position.x += ball.velocity.x * cycle_seconds;
        ball.position.y += ball.velocity.y * cycle_seconds;

        let speed = ball.velocity.norm();
        if speed > 0.0 {
            let slowed = (speed - rolling_deceleration * cycle_seconds).max(0.0);
            ball.velocity = ball.velocity.scaled(slowed / speed);
        }

        let crossed_line = (previous_x < goal_line_x && ball.position.x >= goal_line_x)
            || (previous_x > -goal_line_x && ball.position.x <= -goal_line_x);
        if crossed_line && ball.position.y.abs() < goal_half_width {
            log::debug!(
                "cycle={cycle} ball crossed goal line at ({:.2}, {:.2})",
                ball.position.x,
                ball.position.y
            );
            return Ok(vec![DomainEvent::Goal]);
        }
        Ok(vec![])
    }
}
