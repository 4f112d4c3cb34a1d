#![forbid(unsafe_code)]

use lifecycle_engines::accumulator::AccumulatorRuntime;
use lifecycle_kernel_contracts::lifecycle::{Notification, ProcessId};
use tracing::debug;

pub const LIFECYCLE_ACC_ENGINE_ID: &str = "LIFECYCLE.ACC";

/// Accept/accept-all/drain surface consumed by callers of the accumulator.
pub trait LifecycleAccumulator {
    fn accept(&mut self, notification: Notification);

    /// Resets every tracked ledger before loading `batch`.
    fn accept_all(&mut self, batch: Vec<Notification>);

    fn drain(&mut self, process_id: ProcessId) -> Vec<Notification>;
}

impl LifecycleAccumulator for AccumulatorRuntime {
    fn accept(&mut self, notification: Notification) {
        AccumulatorRuntime::accept(self, notification);
    }

    fn accept_all(&mut self, batch: Vec<Notification>) {
        AccumulatorRuntime::accept_all(self, batch);
    }

    fn drain(&mut self, process_id: ProcessId) -> Vec<Notification> {
        AccumulatorRuntime::drain(self, process_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccumulatorWiringConfig {
    pub accumulator_enabled: bool,
}

impl AccumulatorWiringConfig {
    pub fn mvp_v1(accumulator_enabled: bool) -> Self {
        Self {
            accumulator_enabled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccumulatorWiringOutcome<O> {
    NotInvokedDisabled,
    Forwarded(O),
}

#[derive(Debug, Clone)]
pub struct AccumulatorWiring<E>
where
    E: LifecycleAccumulator,
{
    config: AccumulatorWiringConfig,
    engine: E,
}

impl<E> AccumulatorWiring<E>
where
    E: LifecycleAccumulator,
{
    pub fn new(config: AccumulatorWiringConfig, engine: E) -> Self {
        Self { config, engine }
    }

    pub fn run_accept(&mut self, notification: Notification) -> AccumulatorWiringOutcome<()> {
        if !self.enabled("accept") {
            return AccumulatorWiringOutcome::NotInvokedDisabled;
        }
        self.engine.accept(notification);
        AccumulatorWiringOutcome::Forwarded(())
    }

    pub fn run_accept_all(&mut self, batch: Vec<Notification>) -> AccumulatorWiringOutcome<()> {
        if !self.enabled("accept_all") {
            return AccumulatorWiringOutcome::NotInvokedDisabled;
        }
        self.engine.accept_all(batch);
        AccumulatorWiringOutcome::Forwarded(())
    }

    pub fn run_drain(
        &mut self,
        process_id: ProcessId,
    ) -> AccumulatorWiringOutcome<Vec<Notification>> {
        if !self.enabled("drain") {
            return AccumulatorWiringOutcome::NotInvokedDisabled;
        }
        AccumulatorWiringOutcome::Forwarded(self.engine.drain(process_id))
    }

    pub fn engine_ref(&self) -> &E {
        &self.engine
    }

    fn enabled(&self, operation: &'static str) -> bool {
        if !self.config.accumulator_enabled {
            debug!(
                engine_id = LIFECYCLE_ACC_ENGINE_ID,
                operation, "accumulator disabled; not invoked"
            );
            return false;
        }
        true
    }
}
