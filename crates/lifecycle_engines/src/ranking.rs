#![forbid(unsafe_code)]

use std::cmp::Ordering;

use lifecycle_kernel_contracts::lifecycle::{LifecycleState, Notification};

/// Canonical output rank: START1 < START2 < MID1 < MID2 < FINAL1 < FINAL2.
pub fn state_rank(state: LifecycleState) -> u8 {
    match state {
        LifecycleState::Start1 => 0,
        LifecycleState::Start2 => 1,
        LifecycleState::Mid1 => 2,
        LifecycleState::Mid2 => 3,
        LifecycleState::Final1 => 4,
        LifecycleState::Final2 => 5,
    }
}

/// MID1/MID1 and MID1/MID2 pairs keep arrival order. MID2/MID2 is not part of this.
fn keeps_arrival_order(a: LifecycleState, b: LifecycleState) -> bool {
    matches!(
        (a, b),
        (LifecycleState::Mid1, LifecycleState::Mid1)
            | (LifecycleState::Mid1, LifecycleState::Mid2)
            | (LifecycleState::Mid2, LifecycleState::Mid1)
    )
}

pub fn compare_notifications(a: &Notification, b: &Notification) -> Ordering {
    if keeps_arrival_order(a.state, b.state) {
        return Ordering::Equal;
    }
    match state_rank(a.state).cmp(&state_rank(b.state)) {
        Ordering::Equal => a.seq_no.cmp(&b.seq_no),
        other => other,
    }
}

/// Stable in-place sort by [`compare_notifications`].
///
/// The arrival-order exception makes the comparator intransitive across MID runs
/// (MID2(3) = MID1(4) = MID2(5) but MID2(3) < MID2(5)), and `slice::sort_by` may panic on
/// such orderings. Insertion sort only moves an entry past neighbours that compare strictly
/// greater, so equal pairs never swap and the result is total.
pub fn sort_ranked(entries: &mut [Notification]) {
    for i in 1..entries.len() {
        let mut j = i;
        while j > 0 && compare_notifications(&entries[j - 1], &entries[j]) == Ordering::Greater {
            entries.swap(j - 1, j);
            j -= 1;
        }
    }
}
