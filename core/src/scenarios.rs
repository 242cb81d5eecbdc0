//! Built-in scenarios.

use crate::{
    config::{GoalReaction, ScenarioConfig, ScriptEntry},
    game_state::GameState,
    schedule::ScriptedAction,
    types::{PlayerNumber, Point2, Vector2},
    world_state::Ball,
};

/// Cycle at which `kickoff_shot` ends unconditionally.
pub const KICKOFF_SHOT_END: u64 = 6000;
/// Cycles between a goal and the end of `kickoff_shot`.
pub const KICKOFF_SHOT_GOAL_GRACE: u64 = 200;

/// Striker #7 walks through Ready/Set, gets teleported behind a rolling
/// ball shortly after kickoff, and the ball is taken away again 100
/// cycles later. A goal ends the run early.
pub fn kickoff_shot() -> ScenarioConfig {
    let striker = PlayerNumber::new(7).expect("7 is a valid player number");
    let entry = |cycle, action| ScriptEntry { cycle, action };

    ScenarioConfig {
        name:         "kickoff_shot".to_string(),
        spawn:        vec![striker],
        initial_ball: None,
        script:       vec![
            entry(100, ScriptedAction::SetGameState { game_state: GameState::Ready }),
            entry(1600, ScriptedAction::SetGameState { game_state: GameState::Set }),
            entry(1700, ScriptedAction::SetGameState { game_state: GameState::Playing }),
            entry(1900, ScriptedAction::ForcePose {
                player:      striker,
                position:    Point2::new(-3.0, 0.0),
                orientation: 0.0,
            }),
            entry(1900, ScriptedAction::SetBall {
                ball: Ball {
                    position: Point2::new(-2.0, 0.0),
                    velocity: Vector2::new(9.0, 2.0),
                },
            }),
            entry(2000, ScriptedAction::ClearBall),
            entry(KICKOFF_SHOT_END, ScriptedAction::Finish),
        ],
        on_goal:      Some(GoalReaction {
            clear_ball:   true,
            finish_after: Some(KICKOFF_SHOT_GOAL_GRACE),
        }),
    }
}

/// Look up a built-in scenario by name.
pub fn builtin(name: &str) -> Option<ScenarioConfig> {
    match name {
        "kickoff_shot" => Some(kickoff_shot()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_json_matches_builtin() {
        let shipped = ScenarioConfig::from_json(include_str!("../../data/scenarios/kickoff_shot.json"))
            .expect("shipped scenario parses");
        assert_eq!(shipped, kickoff_shot());
    }

    #[test]
    fn unknown_builtin_is_none() {
        assert!(builtin("kickoff_shot").is_some());
        assert!(builtin("penalty_shootout").is_none());
    }
}
