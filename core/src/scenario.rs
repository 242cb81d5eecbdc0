//! The scenario contract.
//!
//! RULE: A scenario talks to the host only through the `HostContext` it
//! is handed. It returns nothing but success or a fatal error.
//!
//! Call order per run:
//!   1. `setup`     once, at cycle 0, before any tick.
//!   2. per tick, after the clock advanced and physics ran:
//!        domain-event callbacks (`on_goal`, ...) for each detected event,
//!        then `on_cycle`.

use crate::{error::SimResult, event::DomainEvent, host::HostContext};
use std::any::Any;

pub trait Scenario: Send {
    /// Stable name used in logs and the event log.
    fn name(&self) -> &str;

    fn setup(&mut self, ctx: &mut HostContext<'_>) -> SimResult<()>;

    fn on_cycle(&mut self, ctx: &mut HostContext<'_>) -> SimResult<()>;

    fn on_goal(&mut self, _ctx: &mut HostContext<'_>) -> SimResult<()> {
        Ok(())
    }

    /// For downcasting in tests and tooling only.
    fn as_any(&self) -> &dyn Any;
}

/// Route a domain event to its named callback.
pub fn dispatch_event(
    scenario: &mut dyn Scenario,
    event: DomainEvent,
    ctx: &mut HostContext<'_>,
) -> SimResult<()> {
    match event {
        DomainEvent::Goal => scenario.on_goal(ctx),
    }
}
