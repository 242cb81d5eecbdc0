//! A scenario driven entirely by a `ScenarioConfig`.
//!
//! Setup spawns the configured players and places the initial ball.
//! Every tick the schedule is consulted for the current cycle. A goal
//! can clear the ball and pin a `Finish` some cycles into the future.

use crate::{
    config::{GoalReaction, ScenarioConfig},
    error::SimResult,
    host::HostContext,
    scenario::Scenario,
    schedule::{Schedule, ScriptedAction},
    types::{PlayerNumber, RobotId, Tick},
};
use std::collections::HashMap;

pub struct ScriptedScenario {
    config:   ScenarioConfig,
    schedule: Schedule,
    roster:   HashMap<PlayerNumber, RobotId>,
    goals:    Vec<Tick>,
}

impl ScriptedScenario {
    pub fn new(config: ScenarioConfig) -> Self {
        let schedule = config.schedule();
        Self {
            config,
            schedule,
            roster: HashMap::new(),
            goals: Vec::new(),
        }
    }

    /// Robot id the host assigned to `player` during setup.
    pub fn robot_id(&self, player: PlayerNumber) -> Option<RobotId> {
        self.roster.get(&player).copied()
    }

    /// Cycles at which goals were reported, oldest first.
    pub fn goals(&self) -> &[Tick] {
        &self.goals
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }
}

impl Scenario for ScriptedScenario {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn setup(&mut self, ctx: &mut HostContext<'_>) -> SimResult<()> {
        for &player in &self.config.spawn {
            let robot_id = ctx.spawn(player)?;
            self.roster.insert(player, robot_id);
        }
        if let Some(ball) = self.config.initial_ball {
            ctx.set_ball(ball);
        }
        log::debug!(
            "scenario '{}' ready: {} robots, {} scripted actions",
            self.config.name,
            self.roster.len(),
            self.schedule.len()
        );
        Ok(())
    }

    fn on_cycle(&mut self, ctx: &mut HostContext<'_>) -> SimResult<()> {
        let cycle = ctx.cycle_count();
        for action in self.schedule.due(cycle) {
            log::debug!("cycle={cycle} scripted {action:?}");
            action.apply(ctx, &self.roster)?;
        }
        Ok(())
    }

    fn on_goal(&mut self, ctx: &mut HostContext<'_>) -> SimResult<()> {
        let cycle = ctx.cycle_count();
        self.goals.push(cycle);
        log::info!("cycle={cycle} goal scored in '{}'", self.config.name);

        let Some(GoalReaction { clear_ball, finish_after }) = self.config.on_goal.clone() else {
            return Ok(());
        };
        if clear_ball {
            ctx.clear_ball();
        }
        if let Some(delay) = finish_after {
            match cycle.checked_add(delay) {
                Some(end) => {
                    log::info!("cycle={cycle} finishing at cycle {end}");
                    self.schedule.insert(end, ScriptedAction::Finish);
                }
                // A cycle past the end of the clock never comes.
                None => log::warn!("cycle={cycle} finish {delay} cycles after the goal is unreachable"),
            }
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any { self }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{event::SimEvent, world_state::WorldState};

    fn with_goal_delay(finish_after: Tick) -> ScriptedScenario {
        ScriptedScenario::new(ScenarioConfig {
            name:         "late_whistle".into(),
            spawn:        vec![],
            initial_ball: None,
            script:       vec![],
            on_goal:      Some(GoalReaction { clear_ball: true, finish_after: Some(finish_after) }),
        })
    }

    #[test]
    fn goal_pins_finish_after_delay() {
        let mut scenario = with_goal_delay(200);
        let mut world = WorldState::new();
        let mut events = Vec::new();
        world.cycle_count = 50;

        scenario.on_goal(&mut HostContext::new(&mut world, &mut events)).unwrap();
        assert_eq!(scenario.schedule().actions_at(250), &[ScriptedAction::Finish]);
        assert_eq!(scenario.goals(), &[50]);
    }

    #[test]
    fn goal_delay_past_end_of_clock_is_never_scheduled() {
        let mut scenario = with_goal_delay(Tick::MAX);
        let mut world = WorldState::new();
        let mut events = Vec::new();
        world.cycle_count = 5;

        scenario.on_goal(&mut HostContext::new(&mut world, &mut events)).unwrap();
        assert!(scenario.schedule().is_empty());
        assert!(!world.finished());
        assert!(!events.iter().any(|e| matches!(e, SimEvent::ScenarioFinished { .. })));
    }
}
