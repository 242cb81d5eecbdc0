//! Exact-cycle guards: fire once, never on a skipped cycle, and never
//! twice for the same cycle.

use kickoff_core::{
    engine::SimHost,
    event::{DomainEvent, SimEvent},
    game_state::GameState,
    host::HostContext,
    physics::NoPhysics,
    scenario::Scenario,
    scenarios::kickoff_shot,
    scripted_scenario::ScriptedScenario,
    world_state::WorldState,
};

fn load(run_id: &str) -> SimHost {
    SimHost::load(
        run_id.to_string(),
        Box::new(ScriptedScenario::new(kickoff_shot())),
        Box::new(NoPhysics),
    )
    .expect("kickoff_shot loads")
}

fn count<F: Fn(&SimEvent) -> bool>(host: &SimHost, predicate: F) -> usize {
    host.event_log().iter().filter(|event| predicate(event)).count()
}

#[test]
fn every_transition_fires_exactly_once_at_its_cycle() {
    let mut host = load("guards-once");
    host.run(10_000).expect("run");

    let changes: Vec<_> = host
        .event_log()
        .iter()
        .filter_map(|event| match event {
            SimEvent::GameStateChanged { cycle, to, .. } => Some((*cycle, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        changes,
        vec![
            (100, GameState::Ready),
            (1600, GameState::Set),
            (1700, GameState::Playing),
        ]
    );
    assert_eq!(count(&host, |e| matches!(e, SimEvent::PoseForced { cycle: 1900, .. })), 1);
    assert_eq!(count(&host, |e| matches!(e, SimEvent::BallReplaced { cycle: 1900, .. })), 1);
    assert_eq!(count(&host, |e| matches!(e, SimEvent::BallCleared { cycle: 2000 })), 1);
    assert_eq!(count(&host, |e| matches!(e, SimEvent::ScenarioFinished { cycle: 6000 })), 1);
}

#[test]
fn skipped_cycle_never_fires_its_transition() {
    let mut host = load("guards-skip");

    host.tick_to(99).expect("tick 99");
    host.tick_to(101).expect("tick 101");
    while host.clock.cycle_count < 1599 {
        host.tick().expect("tick");
    }
    assert_eq!(host.world().game_state(), GameState::Initial, "Ready was skipped");

    host.tick().expect("tick 1600");
    assert_eq!(host.world().game_state(), GameState::Set);
}

#[test]
fn skipped_finish_leaves_run_open() {
    let mut host = load("guards-skip-finish");
    host.tick_to(5999).expect("tick 5999");
    host.tick_to(6001).expect("tick 6001");
    for _ in 0..100 {
        host.tick().expect("tick");
    }
    assert!(!host.world().finished());
}

#[test]
fn repeated_on_cycle_for_same_cycle_is_a_no_op() {
    let mut scenario = ScriptedScenario::new(kickoff_shot());
    let mut world = WorldState::new();
    let mut events = Vec::new();

    scenario
        .setup(&mut HostContext::new(&mut world, &mut events))
        .expect("setup");
    world.cycle_count = 1900;

    scenario
        .on_cycle(&mut HostContext::new(&mut world, &mut events))
        .expect("first call");
    let after_first = (world.clone(), events.len());

    scenario
        .on_cycle(&mut HostContext::new(&mut world, &mut events))
        .expect("second call");
    assert_eq!(world, after_first.0);
    assert_eq!(events.len(), after_first.1);
}

/// Records the order in which the host calls back.
struct Recorder {
    calls: Vec<(u64, &'static str)>,
}

impl Scenario for Recorder {
    fn name(&self) -> &str { "recorder" }

    fn setup(&mut self, ctx: &mut HostContext<'_>) -> kickoff_core::error::SimResult<()> {
        self.calls.push((ctx.cycle_count(), "setup"));
        Ok(())
    }

    fn on_cycle(&mut self, ctx: &mut HostContext<'_>) -> kickoff_core::error::SimResult<()> {
        self.calls.push((ctx.cycle_count(), "on_cycle"));
        Ok(())
    }

    fn on_goal(&mut self, ctx: &mut HostContext<'_>) -> kickoff_core::error::SimResult<()> {
        self.calls.push((ctx.cycle_count(), "on_goal"));
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any { self }
}

#[test]
fn host_calls_goal_before_cycle_once_per_tick() {
    let mut host = SimHost::load(
        "guards-order".to_string(),
        Box::new(Recorder { calls: vec![] }),
        Box::new(NoPhysics),
    )
    .expect("load");

    host.tick().expect("tick 1");
    host.inject(DomainEvent::Goal);
    host.tick().expect("tick 2");
    host.tick().expect("tick 3");

    let recorder = host
        .scenario()
        .as_any()
        .downcast_ref::<Recorder>()
        .expect("recorder");
    assert_eq!(
        recorder.calls,
        vec![
            (0, "setup"),
            (1, "on_cycle"),
            (2, "on_goal"),
            (2, "on_cycle"),
            (3, "on_cycle"),
        ]
    );
}
