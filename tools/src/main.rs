//! scenario-runner: headless host for kickoff-core scenarios.
//!
//! Usage:
//!   scenario-runner --scenario data/scenarios/kickoff_shot.json --max-cycles 10000
//!   scenario-runner --builtin kickoff_shot --db run.db --physics ball
//!   scenario-runner --builtin kickoff_shot --ipc-mode

use anyhow::{Context, Result};
use kickoff_core::{
    config::{PhysicsConfig, ScenarioConfig},
    engine::{RunOutcome, SimHost},
    event::{DomainEvent, SimEvent},
    physics::{BallPhysics, NoPhysics, Physics},
    scenarios,
    scripted_scenario::ScriptedScenario,
    store::SimStore,
    world_state::WorldState,
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Tick { count: u64 },
    Goal,
    Quit,
}

#[derive(serde::Serialize)]
struct UiState<'a> {
    run_id: &'a str,
    status: kickoff_core::engine::RunStatus,
    world:  &'a WorldState,
    events: &'a [SimEvent],
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let max_cycles = parse_arg(&args, "--max-cycles", 10_000u64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let scenario_path = string_arg(&args, "--scenario");
    let builtin = string_arg(&args, "--builtin").unwrap_or("kickoff_shot");
    let physics_name = string_arg(&args, "--physics").unwrap_or("ball");
    let db = string_arg(&args, "--db");

    let config = match scenario_path {
        Some(path) => ScenarioConfig::load(path)?,
        None => scenarios::builtin(builtin)
            .with_context(|| format!("no built-in scenario named '{builtin}'"))?,
    };

    let physics: Box<dyn Physics> = match physics_name {
        "none" => Box::new(NoPhysics),
        "ball" => Box::new(BallPhysics::new(PhysicsConfig::default())),
        other => anyhow::bail!("unknown physics '{other}' (expected 'none' or 'ball')"),
    };

    let store = match db {
        Some(path) => {
            let store = SimStore::open(path)?;
            store.migrate()?;
            Some(store)
        }
        None => None,
    };

    let run_id = format!(
        "{}-{}-{}",
        config.name,
        chrono::Utc::now().format("%Y%m%dT%H%M%S"),
        &uuid::Uuid::new_v4().simple().to_string()[..8]
    );

    if !ipc_mode {
        println!("kickoff scenario-runner");
        println!("  scenario:   {}", config.name);
        println!("  physics:    {physics_name}");
        println!("  max cycles: {max_cycles}");
        println!("  db:         {}", db.unwrap_or("(none)"));
        println!();
    }

    let scenario = Box::new(ScriptedScenario::new(config));
    let mut host = SimHost::load_with_store(run_id.clone(), scenario, physics, store)?;

    if ipc_mode {
        run_ipc_loop(&mut host, &run_id)?;
    } else {
        let outcome = host.run(max_cycles)?;
        print_summary(&host, &run_id, outcome);
    }

    Ok(())
}

fn run_ipc_loop(host: &mut SimHost, run_id: &str) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();
    let mut reported = host.event_log().len();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        let result = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::Tick { count } => tick_n(host, count),
            IpcCommand::Goal => {
                host.inject(DomainEvent::Goal);
                Ok(())
            }
            IpcCommand::GetState => Ok(()),
        };

        if let Err(e) = result {
            let err_json = serde_json::json!({ "error": e.to_string() });
            writeln!(stdout, "{}", err_json)?;
        } else {
            let state = UiState {
                run_id,
                status: host.status(),
                world:  host.world(),
                events: &host.event_log()[reported..],
            };
            writeln!(stdout, "{}", serde_json::to_string(&state)?)?;
            reported = host.event_log().len();
        }
        stdout.flush()?;
    }
    Ok(())
}

/// Tick up to `count` times, stopping early once the scenario finishes.
fn tick_n(host: &mut SimHost, count: u64) -> kickoff_core::error::SimResult<()> {
    for _ in 0..count {
        if host.is_finished() {
            break;
        }
        host.tick()?;
    }
    Ok(())
}

fn print_summary(host: &SimHost, run_id: &str, outcome: RunOutcome) {
    let world = host.world();
    let goals = host
        .event_log()
        .iter()
        .filter(|e| matches!(e, SimEvent::GoalDetected { .. }))
        .count();

    println!("=== RUN SUMMARY ===");
    println!("  run_id:      {run_id}");
    match outcome {
        RunOutcome::Finished { cycle } => println!("  finished at: cycle {cycle}"),
        RunOutcome::CycleLimit { cycle } => println!("  stopped at:  cycle {cycle} (limit)"),
    }
    println!("  sim time:    {:.1}s", host.clock.elapsed_seconds());
    println!("  game state:  {}", world.game_state());
    println!("  robots:      {}", world.robots().len());
    println!("  goals:       {goals}");
    println!("  events:      {}", host.event_log().len());
    match world.ball() {
        Some(ball) => println!(
            "  ball:        ({:.2}, {:.2})",
            ball.position.x, ball.position.y
        ),
        None => println!("  ball:        (none)"),
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
