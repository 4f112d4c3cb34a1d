#![forbid(unsafe_code)]

use std::sync::{Arc, Mutex, MutexGuard};

use lifecycle_engines::accumulator::{AccumulatorConfig, AccumulatorRuntime};
use lifecycle_kernel_contracts::lifecycle::{Notification, ProcessId};
use lifecycle_kernel_contracts::ContractViolation;
use tracing::warn;

/// Cloneable handle that serializes every operation on one accumulator behind a single lock.
///
/// `accept_all` touches every ledger and `drain` rewrites the ledger it reads, so the whole
/// ledger table is guarded, not individual ledgers.
#[derive(Debug, Clone, Default)]
pub struct SharedAccumulator {
    runtime: Arc<Mutex<AccumulatorRuntime>>,
}

impl SharedAccumulator {
    pub fn new(config: AccumulatorConfig) -> Self {
        Self {
            runtime: Arc::new(Mutex::new(AccumulatorRuntime::new(config))),
        }
    }

    pub fn accept(&self, notification: Notification) -> Result<(), ContractViolation> {
        self.lock_runtime()?.accept(notification);
        Ok(())
    }

    pub fn accept_all(&self, batch: Vec<Notification>) -> Result<(), ContractViolation> {
        self.lock_runtime()?.accept_all(batch);
        Ok(())
    }

    pub fn drain(&self, process_id: ProcessId) -> Result<Vec<Notification>, ContractViolation> {
        Ok(self.lock_runtime()?.drain(process_id))
    }

    fn lock_runtime(&self) -> Result<MutexGuard<'_, AccumulatorRuntime>, ContractViolation> {
        match self.runtime.lock() {
            Ok(guard) => Ok(guard),
            Err(poisoned) => {
                let recovered = poisoned.into_inner();
                drop(recovered);
                self.runtime.clear_poison();
                warn!("accumulator lock poisoned; call refused and poison cleared");
                Err(ContractViolation::InvalidValue {
                    field: "shared_accumulator.runtime",
                    reason: "state lock poisoned",
                })
            }
        }
    }
}
