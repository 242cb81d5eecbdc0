//! Cycle-keyed action table.
//!
//! Every action is keyed on one exact cycle. The table is consulted once
//! per tick with the current cycle; an action fires only if its key
//! equals that cycle. A host clock that skips a key means the action
//! never fires. There is no catch-up.

use crate::{
    error::{SimError, SimResult},
    game_state::GameState,
    host::HostContext,
    types::{PlayerNumber, Point2, RobotId, Tick},
    world_state::Ball,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptedAction {
    SetGameState {
        game_state: GameState,
    },
    ForcePose {
        player:      PlayerNumber,
        position:    Point2,
        #[serde(default)]
        orientation: f32,
    },
    SetBall {
        ball: Ball,
    },
    ClearBall,
    Finish,
}

impl ScriptedAction {
    /// Apply this action. `roster` maps player numbers to the robot ids
    /// the host assigned during setup.
    pub fn apply(
        &self,
        ctx: &mut HostContext<'_>,
        roster: &HashMap<PlayerNumber, RobotId>,
    ) -> SimResult<()> {
        match self {
            Self::SetGameState { game_state } => ctx.set_game_state(*game_state)?,
            Self::ForcePose { player, position, orientation } => {
                let robot_id = *roster
                    .get(player)
                    .ok_or(SimError::PlayerNotSpawned { number: player.get() })?;
                ctx.force_pose(robot_id, *position, *orientation)?;
            }
            Self::SetBall { ball } => ctx.set_ball(*ball),
            Self::ClearBall => ctx.clear_ball(),
            Self::Finish => ctx.finish(),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Schedule {
    actions:         BTreeMap<Tick, Vec<ScriptedAction>>,
    last_dispatched: Option<Tick>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an action at `cycle`. Actions sharing a cycle run in insertion order.
    pub fn insert(&mut self, cycle: Tick, action: ScriptedAction) {
        self.actions.entry(cycle).or_default().push(action);
    }

    pub fn actions_at(&self, cycle: Tick) -> &[ScriptedAction] {
        self.actions.get(&cycle).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Highest cycle with an action on it.
    pub fn last_cycle(&self) -> Option<Tick> {
        self.actions.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.actions.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Take the actions due at exactly `cycle`. Consulting the same cycle
    /// twice in a row yields nothing the second time.
    pub fn due(&mut self, cycle: Tick) -> Vec<ScriptedAction> {
        if self.last_dispatched == Some(cycle) {
            return Vec::new();
        }
        self.last_dispatched = Some(cycle);
        self.actions_at(cycle).to_vec()
    }
}

impl FromIterator<(Tick, ScriptedAction)> for Schedule {
    fn from_iter<I: IntoIterator<Item = (Tick, ScriptedAction)>>(iter: I) -> Self {
        let mut schedule = Schedule::new();
        for (cycle, action) in iter {
            schedule.insert(cycle, action);
        }
        schedule
    }
}
