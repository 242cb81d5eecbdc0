//! Fatal failures: setup errors abort before the first cycle, callback
//! errors abort the run in place.

use kickoff_core::{
    config::ScenarioConfig,
    engine::{RunStatus, SimHost},
    error::{SimError, SimResult},
    event::{DomainEvent, SimEvent},
    host::HostContext,
    physics::NoPhysics,
    scenario::Scenario,
    scripted_scenario::ScriptedScenario,
    store::SimStore,
    types::{PlayerNumber, Point2},
    world_state::Ball,
};

fn scripted(json: &str) -> Box<ScriptedScenario> {
    Box::new(ScriptedScenario::new(ScenarioConfig::from_json(json).expect("config")))
}

#[test]
fn duplicate_spawn_aborts_setup() {
    let result = SimHost::load(
        "err-duplicate".to_string(),
        scripted(r#"{ "name": "twins", "spawn": [3, 3] }"#),
        Box::new(NoPhysics),
    );
    match result.err().expect("setup must fail") {
        SimError::Setup { scenario, source } => {
            assert_eq!(scenario, "twins");
            assert!(matches!(*source, SimError::DuplicatePlayerNumber { number: 3, existing: 0 }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn forcing_an_unspawned_player_aborts_the_run() {
    let mut host = SimHost::load(
        "err-unspawned".to_string(),
        scripted(
            r#"{
                "name": "ghost",
                "spawn": [1],
                "script": [
                    { "cycle": 5, "action": "force_pose", "player": 2, "position": { "x": 0.0, "y": 0.0 } }
                ]
            }"#,
        ),
        Box::new(NoPhysics),
    )
    .expect("load");

    let result = host.run(100);
    assert!(matches!(result, Err(SimError::PlayerNotSpawned { number: 2 })));
    assert_eq!(host.status(), RunStatus::Aborted);
    assert_eq!(host.clock.cycle_count, 5);
    assert!(matches!(host.tick(), Err(SimError::RunAborted { cycle: 5 })));
}

/// Teleports a robot id it never spawned.
struct StrayPose;

impl Scenario for StrayPose {
    fn name(&self) -> &str { "stray_pose" }

    fn setup(&mut self, ctx: &mut HostContext<'_>) -> SimResult<()> {
        ctx.spawn(PlayerNumber::new(2)?)?;
        Ok(())
    }

    fn on_cycle(&mut self, ctx: &mut HostContext<'_>) -> SimResult<()> {
        if ctx.cycle_count() == 3 {
            ctx.force_pose(42, Point2::new(0.0, 0.0), 0.0)?;
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any { self }
}

#[test]
fn unknown_robot_id_aborts_the_run() {
    let mut host = SimHost::load("err-unknown".to_string(), Box::new(StrayPose), Box::new(NoPhysics))
        .expect("load");

    host.tick().expect("tick 1");
    host.tick().expect("tick 2");
    assert!(matches!(host.tick(), Err(SimError::UnknownRobot { id: 42 })));
    assert_eq!(host.status(), RunStatus::Aborted);
}

#[test]
fn backward_phase_in_script_aborts_the_run() {
    let mut host = SimHost::load(
        "err-backward".to_string(),
        scripted(
            r#"{
                "name": "rewind",
                "script": [
                    { "cycle": 1, "action": "set_game_state", "game_state": "Playing" },
                    { "cycle": 2, "action": "set_game_state", "game_state": "Ready" }
                ]
            }"#,
        ),
        Box::new(NoPhysics),
    )
    .expect("load");

    host.tick().expect("tick 1");
    assert!(matches!(host.tick(), Err(SimError::BackwardGameState { .. })));
}

#[test]
fn clock_cannot_jump_backwards() {
    let mut host = SimHost::load(
        "err-clock".to_string(),
        scripted(r#"{ "name": "idle" }"#),
        Box::new(NoPhysics),
    )
    .expect("load");

    host.tick_to(10).expect("jump");
    assert!(matches!(
        host.tick_to(10),
        Err(SimError::NonMonotonicCycle { current: 10, requested: 10 })
    ));
    assert_eq!(host.status(), RunStatus::Running, "a rejected jump is not a callback failure");
}

/// Clears the ball on a goal, then fails in the same tick's on_cycle.
struct GoalThenFail;

impl Scenario for GoalThenFail {
    fn name(&self) -> &str { "goal_then_fail" }

    fn setup(&mut self, ctx: &mut HostContext<'_>) -> SimResult<()> {
        ctx.set_ball(Ball::at_rest(Point2::new(1.0, 0.0)));
        Ok(())
    }

    fn on_cycle(&mut self, ctx: &mut HostContext<'_>) -> SimResult<()> {
        if ctx.world().ball().is_none() {
            ctx.force_pose(99, Point2::new(0.0, 0.0), 0.0)?;
        }
        Ok(())
    }

    fn on_goal(&mut self, ctx: &mut HostContext<'_>) -> SimResult<()> {
        ctx.clear_ball();
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any { self }
}

#[test]
fn aborted_tick_still_logs_mutations_made_before_the_failure() {
    let run_id = "err-partial-tick";
    let store = SimStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    let mut host = SimHost::load_with_store(
        run_id.to_string(),
        Box::new(GoalThenFail),
        Box::new(NoPhysics),
        Some(store),
    )
    .expect("load");

    host.tick().expect("tick 1");
    host.inject(DomainEvent::Goal);
    assert!(matches!(host.tick(), Err(SimError::UnknownRobot { id: 99 })));
    assert_eq!(host.status(), RunStatus::Aborted);
    assert!(host.world().ball().is_none());

    let tail: Vec<_> = host
        .event_log()
        .iter()
        .filter(|event| {
            matches!(event, SimEvent::GoalDetected { cycle: 2 } | SimEvent::BallCleared { cycle: 2 })
        })
        .collect();
    assert_eq!(
        tail,
        vec![&SimEvent::GoalDetected { cycle: 2 }, &SimEvent::BallCleared { cycle: 2 }]
    );

    let stored: Vec<_> = host
        .store_events_for_cycle(2)
        .expect("read events")
        .into_iter()
        .map(|entry| entry.event_type)
        .collect();
    assert_eq!(stored, vec!["goal_detected", "ball_cleared"]);
}
