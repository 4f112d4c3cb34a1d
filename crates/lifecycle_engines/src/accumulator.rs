#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use lifecycle_kernel_contracts::lifecycle::{
    LifecyclePhase, LifecycleState, Notification, ProcessId,
};
use lifecycle_kernel_contracts::ReasonCodeId;
use tracing::{debug, trace};

use crate::ranking::sort_ranked;

pub mod reason_codes {
    use lifecycle_kernel_contracts::ReasonCodeId;

    pub const ACC_OK_APPENDED: ReasonCodeId = ReasonCodeId(0x4143_0001);
    pub const ACC_DRAIN_NO_START_PHASE: ReasonCodeId = ReasonCodeId(0x4143_0010);
    pub const ACC_DRAIN_NO_FINAL_PHASE: ReasonCodeId = ReasonCodeId(0x4143_0011);

    pub const ACC_REJECT_DUPLICATE_BY_COUNT: ReasonCodeId = ReasonCodeId(0x4143_00F1);
    pub const ACC_REJECT_START1_PRESENT: ReasonCodeId = ReasonCodeId(0x4143_00F2);
    pub const ACC_REJECT_MID1_MISSING: ReasonCodeId = ReasonCodeId(0x4143_00F3);
    pub const ACC_REJECT_FINAL1_PRESENT: ReasonCodeId = ReasonCodeId(0x4143_00F4);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccumulatorConfig {
    /// Initial capacity of a lazily created ledger. Has no effect on filtering or ordering.
    pub ledger_capacity_hint: usize,
}

impl AccumulatorConfig {
    pub fn mvp_v1() -> Self {
        Self {
            ledger_capacity_hint: 8,
        }
    }
}

/// Per-process notification ledgers with accept-time admission and drain-time pruning.
///
/// Ledgers are created on the first notification for a process and are never removed; a
/// batch reset only empties them.
#[derive(Debug, Clone)]
pub struct AccumulatorRuntime {
    config: AccumulatorConfig,
    ledgers: BTreeMap<ProcessId, Vec<Notification>>,
}

impl Default for AccumulatorRuntime {
    fn default() -> Self {
        Self::new(AccumulatorConfig::mvp_v1())
    }
}

impl AccumulatorRuntime {
    pub fn new(config: AccumulatorConfig) -> Self {
        Self {
            config,
            ledgers: BTreeMap::new(),
        }
    }

    /// Appends `notification` to its process ledger when it passes admission. Rejections are
    /// silent.
    pub fn accept(&mut self, notification: Notification) {
        let capacity = self.config.ledger_capacity_hint;
        let ledger = self
            .ledgers
            .entry(notification.process_id)
            .or_insert_with(|| Vec::with_capacity(capacity));

        if let Err(reason_code) = admission(ledger, &notification) {
            debug!(
                process_id = notification.process_id.0,
                state = %notification.state,
                seq_no = notification.seq_no,
                reason_code = reason_code.0,
                "notification rejected"
            );
            return;
        }

        ledger.push(notification);
        trace!(
            process_id = notification.process_id.0,
            state = %notification.state,
            seq_no = notification.seq_no,
            reason_code = reason_codes::ACC_OK_APPENDED.0,
            ledger_len = ledger.len(),
            "notification appended"
        );
    }

    /// Batch boundary: empties every known ledger, then accepts `batch` in order.
    pub fn accept_all<I>(&mut self, batch: I)
    where
        I: IntoIterator<Item = Notification>,
    {
        self.reset_all_ledgers();
        for notification in batch {
            self.accept(notification);
        }
    }

    /// Empties every known ledger, including those of processes absent from the next batch.
    pub fn reset_all_ledgers(&mut self) {
        for ledger in self.ledgers.values_mut() {
            ledger.clear();
        }
        debug!(ledgers = self.ledgers.len(), "all ledgers reset");
    }

    /// Prunes the process ledger in place and returns it in ranked order.
    ///
    /// The ledger entry itself survives, so draining again without new input returns the same
    /// sequence. An unknown process yields an empty sequence and no ledger is created.
    pub fn drain(&mut self, process_id: ProcessId) -> Vec<Notification> {
        let Some(ledger) = self.ledgers.get_mut(&process_id) else {
            return Vec::new();
        };

        if contains_state(ledger, LifecycleState::Start1) {
            ledger.retain(|n| n.state != LifecycleState::Start2);
        }
        if contains_state(ledger, LifecycleState::Final1) {
            ledger.retain(|n| n.state != LifecycleState::Final2);
        }
        if !contains_phase(ledger, LifecyclePhase::Start) {
            wipe(ledger, process_id, reason_codes::ACC_DRAIN_NO_START_PHASE);
        }
        if !contains_phase(ledger, LifecyclePhase::Final) {
            wipe(ledger, process_id, reason_codes::ACC_DRAIN_NO_FINAL_PHASE);
        }

        sort_ranked(ledger);
        ledger.clone()
    }

    /// Raw retained entries for `process_id`, before any drain-time pruning.
    pub fn ledger(&self, process_id: ProcessId) -> Option<&[Notification]> {
        self.ledgers.get(&process_id).map(Vec::as_slice)
    }

    pub fn tracked_process_count(&self) -> usize {
        self.ledgers.len()
    }
}

fn admission(ledger: &[Notification], candidate: &Notification) -> Result<(), ReasonCodeId> {
    // Position-based duplicate check: a ledger of length N already holds seq_no N.
    if usize::try_from(candidate.seq_no).is_ok_and(|seq_no| seq_no == ledger.len()) {
        return Err(reason_codes::ACC_REJECT_DUPLICATE_BY_COUNT);
    }
    match candidate.state {
        LifecycleState::Start2 if contains_state(ledger, LifecycleState::Start1) => {
            Err(reason_codes::ACC_REJECT_START1_PRESENT)
        }
        LifecycleState::Mid2 if !contains_state(ledger, LifecycleState::Mid1) => {
            Err(reason_codes::ACC_REJECT_MID1_MISSING)
        }
        LifecycleState::Final2 if contains_state(ledger, LifecycleState::Final1) => {
            Err(reason_codes::ACC_REJECT_FINAL1_PRESENT)
        }
        LifecycleState::Start1
        | LifecycleState::Start2
        | LifecycleState::Mid1
        | LifecycleState::Mid2
        | LifecycleState::Final1
        | LifecycleState::Final2 => Ok(()),
    }
}

fn contains_state(ledger: &[Notification], state: LifecycleState) -> bool {
    ledger.iter().any(|n| n.state == state)
}

fn contains_phase(ledger: &[Notification], phase: LifecyclePhase) -> bool {
    ledger.iter().any(|n| n.state.phase() == phase)
}

fn wipe(ledger: &mut Vec<Notification>, process_id: ProcessId, reason_code: ReasonCodeId) {
    if ledger.is_empty() {
        return;
    }
    debug!(
        process_id = process_id.0,
        dropped = ledger.len(),
        reason_code = reason_code.0,
        "incomplete lifecycle wiped on drain"
    );
    ledger.clear();
}
