//! The reference simulator host.
//!
//! EXECUTION ORDER per tick (fixed, never reordered):
//!   1. Clock advances by one cycle.
//!   2. Physics integrates and reports domain events.
//!   3. Injected and detected domain events are dispatched to their
//!      named scenario callbacks, in that order.
//!   4. The scenario's on_cycle runs.
//!   5. The tick's events are logged; the finished flag is read.
//!
//! RULES:
//!   - Exactly one scenario callback runs at a time; each gets the world
//!     through a HostContext that lives only for that call.
//!   - A finished run accepts no further ticks.
//!   - Any callback error aborts the run. Nothing is rolled back, and the
//!     failed tick's events up to the error are still logged.

use crate::{
    clock::SimClock,
    error::{SimError, SimResult},
    event::{DomainEvent, EventLogEntry, SimEvent},
    host::HostContext,
    physics::Physics,
    scenario::{dispatch_event, Scenario},
    snapshot::{WorldSnapshot, SNAPSHOT_INTERVAL},
    store::SimStore,
    types::{RunId, Tick},
    world_state::WorldState,
};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Running,
    Finished,
    Aborted,
}

/// How a call to `run` ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    /// The scenario set `finished`.
    Finished { cycle: Tick },
    /// The host's own cycle ceiling was reached first.
    CycleLimit { cycle: Tick },
}

pub struct SimHost {
    pub run_id: RunId,
    pub clock:  SimClock,
    world:      WorldState,
    scenario:   Box<dyn Scenario>,
    physics:    Box<dyn Physics>,
    store:      Option<SimStore>,
    pending:    VecDeque<DomainEvent>,
    event_log:  Vec<SimEvent>,
    status:     RunStatus,
}

impl SimHost {
    /// Construct the world and run the scenario's setup at cycle 0.
    /// A setup failure aborts before any cycle executes.
    pub fn load(
        run_id: RunId,
        scenario: Box<dyn Scenario>,
        physics: Box<dyn Physics>,
    ) -> SimResult<Self> {
        Self::load_with_store(run_id, scenario, physics, None)
    }

    /// Like `load`, persisting the run, its events and snapshots to `store`.
    /// The store must already be migrated.
    pub fn load_with_store(
        run_id: RunId,
        mut scenario: Box<dyn Scenario>,
        physics: Box<dyn Physics>,
        store: Option<SimStore>,
    ) -> SimResult<Self> {
        let mut world = WorldState::new();
        let mut events = vec![SimEvent::RunInitialized {
            run_id:   run_id.clone(),
            scenario: scenario.name().to_string(),
        }];

        {
            let mut ctx = HostContext::new(&mut world, &mut events);
            scenario.setup(&mut ctx).map_err(|source| SimError::Setup {
                scenario: scenario.name().to_string(),
                source:   Box::new(source),
            })?;
        }

        if let Some(store) = &store {
            store.insert_run(&run_id, scenario.name(), env!("CARGO_PKG_VERSION"))?;
        }

        log::info!(
            "run {run_id}: loaded scenario '{}' with {} robots, physics={}",
            scenario.name(),
            world.robots().len(),
            physics.name()
        );

        let mut host = Self {
            clock: SimClock::new(run_id.clone()),
            run_id,
            world,
            scenario,
            physics,
            store,
            pending: VecDeque::new(),
            event_log: Vec::new(),
            status: RunStatus::Running,
        };
        host.record(0, events)?;
        Ok(host)
    }

    /// Queue a domain event; it is dispatched during the next tick.
    pub fn inject(&mut self, event: DomainEvent) {
        self.pending.push_back(event);
    }

    /// Advance one cycle. This is the core simulation step.
    pub fn tick(&mut self) -> SimResult<Vec<SimEvent>> {
        self.ensure_running()?;
        let cycle = self.clock.advance();
        self.step(cycle)
    }

    /// Jump the clock straight to `cycle` and run one tick there.
    /// Cycles in between never happen.
    pub fn tick_to(&mut self, cycle: Tick) -> SimResult<Vec<SimEvent>> {
        self.ensure_running()?;
        self.clock.jump_to(cycle)?;
        self.step(cycle)
    }

    /// Tick until the scenario finishes or the clock reaches `max_cycle`.
    pub fn run(&mut self, max_cycle: Tick) -> SimResult<RunOutcome> {
        while self.status == RunStatus::Running && self.clock.cycle_count < max_cycle {
            self.tick()?;
        }
        let cycle = self.clock.cycle_count;
        if self.world.finished() {
            Ok(RunOutcome::Finished { cycle })
        } else {
            log::warn!("run {}: cycle limit {max_cycle} reached before the scenario finished", self.run_id);
            Ok(RunOutcome::CycleLimit { cycle })
        }
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn scenario(&self) -> &dyn Scenario {
        self.scenario.as_ref()
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status == RunStatus::Finished
    }

    /// Every event recorded so far, setup included.
    pub fn event_log(&self) -> &[SimEvent] {
        &self.event_log
    }

    /// Query persisted events for a cycle. Empty when no store is attached.
    pub fn store_events_for_cycle(&self, cycle: Tick) -> SimResult<Vec<EventLogEntry>> {
        match &self.store {
            Some(store) => store.events_for_cycle(&self.run_id, cycle),
            None => Ok(vec![]),
        }
    }

    pub fn store(&self) -> Option<&SimStore> {
        self.store.as_ref()
    }

    fn ensure_running(&self) -> SimResult<()> {
        let cycle = self.clock.cycle_count;
        match self.status {
            RunStatus::Running => Ok(()),
            RunStatus::Finished => Err(SimError::RunFinished { cycle }),
            RunStatus::Aborted => Err(SimError::RunAborted { cycle }),
        }
    }

    fn step(&mut self, cycle: Tick) -> SimResult<Vec<SimEvent>> {
        self.world.cycle_count = cycle;
        let mut events = Vec::new();
        if let Err(error) = self.run_callbacks(&mut events) {
            log::error!("run {}: aborted at cycle {cycle}: {error}", self.run_id);
            self.status = RunStatus::Aborted;
            // Mutations made before the failure stay in the world; log them.
            if let Err(record_error) = self.record(cycle, events) {
                log::warn!("run {}: could not record events of aborted cycle {cycle}: {record_error}", self.run_id);
            }
            return Err(error);
        }

        self.record(cycle, events.clone())?;

        if self.world.finished() {
            self.status = RunStatus::Finished;
            self.take_snapshot(cycle)?;
        } else if cycle.is_multiple_of(SNAPSHOT_INTERVAL) {
            self.take_snapshot(cycle)?;
        }
        Ok(events)
    }

    fn run_callbacks(&mut self, events: &mut Vec<SimEvent>) -> SimResult<()> {
        let mut domain_events: Vec<DomainEvent> = self.pending.drain(..).collect();
        domain_events.extend(self.physics.integrate(&mut self.world)?);

        for domain_event in domain_events {
            match domain_event {
                DomainEvent::Goal => events.push(SimEvent::GoalDetected {
                    cycle: self.world.cycle_count,
                }),
            }
            let mut ctx = HostContext::new(&mut self.world, events);
            dispatch_event(self.scenario.as_mut(), domain_event, &mut ctx)?;
        }

        let mut ctx = HostContext::new(&mut self.world, events);
        self.scenario.on_cycle(&mut ctx)
    }

    /// Append events to the in-memory log and, if attached, the store.
    fn record(&mut self, cycle: Tick, events: Vec<SimEvent>) -> SimResult<()> {
        if let Some(store) = &self.store {
            for event in &events {
                let entry = EventLogEntry {
                    id:         None,
                    run_id:     self.run_id.clone(),
                    cycle,
                    source:     event_source(event, self.scenario.name()).to_string(),
                    event_type: event.type_name().to_string(),
                    payload:    serde_json::to_string(event)?,
                };
                store.append_event(&entry)?;
            }
        }
        self.event_log.extend(events);
        Ok(())
    }

    fn take_snapshot(&self, cycle: Tick) -> SimResult<()> {
        let Some(store) = &self.store else {
            return Ok(());
        };
        let snapshot = WorldSnapshot {
            run_id: self.run_id.clone(),
            cycle,
            world:  self.world.clone(),
        };
        let json = serde_json::to_string(&snapshot)?;
        store.save_snapshot(&self.run_id, cycle, &json)?;
        log::debug!("Snapshot saved at cycle {cycle}");
        Ok(())
    }
}

/// Who produced an event: the host itself or the scenario acting through it.
fn event_source<'a>(event: &SimEvent, scenario: &'a str) -> &'a str {
    match event {
        SimEvent::RunInitialized { .. } | SimEvent::GoalDetected { .. } => "host",
        _ => scenario,
    }
}
