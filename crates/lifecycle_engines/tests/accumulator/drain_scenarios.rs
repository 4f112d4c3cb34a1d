#![forbid(unsafe_code)]

use lifecycle_engines::accumulator::AccumulatorRuntime;
use lifecycle_kernel_contracts::lifecycle::{LifecycleState, Notification, ProcessId};

use LifecycleState::{Final1, Final2, Mid1, Mid2, Start1, Start2};

/// Sequence numbers are dense from 1 within each batch.
fn batch(process_id: ProcessId, states: &[LifecycleState]) -> Vec<Notification> {
    states
        .iter()
        .enumerate()
        .map(|(i, state)| Notification::v1(process_id, *state, i as i32 + 1))
        .collect()
}

fn states(entries: &[Notification]) -> Vec<LifecycleState> {
    entries.iter().map(|e| e.state).collect()
}

fn seqs(entries: &[Notification]) -> Vec<i32> {
    entries.iter().map(|e| e.seq_no).collect()
}

#[test]
fn at_acc_drain_01_alternate_start_and_orphan_mid2_are_dropped() {
    let p = ProcessId(100);
    let mut rt = AccumulatorRuntime::default();
    rt.accept_all(batch(p, &[Start1, Start2, Mid2, Final1]));
    let out = rt.drain(p);
    assert_eq!(states(&out), vec![Start1, Final1]);
    assert_eq!(seqs(&out), vec![1, 4]);
}

#[test]
fn at_acc_drain_02_mid_interleaving_keeps_arrival_order() {
    let p = ProcessId(101);
    let mut rt = AccumulatorRuntime::default();
    rt.accept_all(batch(p, &[Start1, Mid1, Mid2, Mid1, Final2, Final1]));
    let out = rt.drain(p);
    assert_eq!(states(&out), vec![Start1, Mid1, Mid2, Mid1, Final1]);
    assert_eq!(seqs(&out), vec![1, 2, 3, 4, 6]);
}

#[test]
fn at_acc_drain_03_final_only_yields_nothing() {
    let p = ProcessId(102);
    let mut rt = AccumulatorRuntime::default();
    rt.accept_all(batch(p, &[Final1]));
    assert!(rt.drain(p).is_empty());
}

#[test]
fn at_acc_drain_04_mid_only_yields_nothing() {
    let p = ProcessId(103);
    let mut rt = AccumulatorRuntime::default();
    rt.accept_all(batch(p, &[Mid1]));
    assert!(rt.drain(p).is_empty());
}

#[test]
fn at_acc_drain_05_late_start1_supersedes_start2() {
    let p = ProcessId(104);
    let mut rt = AccumulatorRuntime::default();
    rt.accept_all(batch(p, &[Start2, Start1, Mid1, Final1]));
    let out = rt.drain(p);
    assert_eq!(states(&out), vec![Start1, Mid1, Final1]);
    assert_eq!(seqs(&out), vec![2, 3, 4]);
}

#[test]
fn at_acc_drain_06_lone_start2_is_admitted_but_wiped_without_final() {
    let p = ProcessId(105);
    let mut rt = AccumulatorRuntime::default();
    rt.accept_all(batch(p, &[Start2]));
    assert_eq!(states(rt.ledger(p).unwrap()), vec![Start2]);
    // No final-phase notification, so drain wipes the lifecycle even though a start exists.
    assert!(rt.drain(p).is_empty());
    assert_eq!(rt.ledger(p), Some(&[][..]));
}

#[test]
fn at_acc_drain_07_out_of_order_arrivals_are_ranked() {
    let p = ProcessId(106);
    let mut rt = AccumulatorRuntime::default();
    rt.accept_all(batch(p, &[Final2, Mid2, Start1, Mid1, Mid2, Final1]));
    let out = rt.drain(p);
    assert_eq!(states(&out), vec![Start1, Mid1, Mid2, Final1]);
    // The leading MID2 (seq 2) arrives before any MID1 and is never admitted.
    assert_eq!(seqs(&out), vec![3, 4, 5, 6]);
}

#[test]
fn at_acc_drain_08_each_batch_is_a_fresh_window() {
    let p = ProcessId(107);
    let mut rt = AccumulatorRuntime::default();
    rt.accept_all(batch(p, &[Start1, Final1]));
    assert_eq!(states(&rt.drain(p)), vec![Start1, Final1]);

    rt.accept_all(batch(p, &[Mid1, Final1]));
    assert!(rt.drain(p).is_empty());

    rt.accept_all(batch(p, &[Start2, Mid1, Mid2, Final2]));
    assert_eq!(states(&rt.drain(p)), vec![Start2, Mid1, Mid2, Final2]);
}

#[test]
fn at_acc_drain_09_accept_all_clears_unrelated_process() {
    let a = ProcessId(108);
    let b = ProcessId(109);
    let mut rt = AccumulatorRuntime::default();
    rt.accept_all(batch(a, &[Start1, Mid1, Final1]));
    assert_eq!(rt.drain(a).len(), 3);

    rt.accept_all(batch(b, &[Start1, Final1]));
    assert!(rt.drain(a).is_empty());
    assert_eq!(states(&rt.drain(b)), vec![Start1, Final1]);
}

#[test]
fn at_acc_drain_10_single_accepts_accumulate_across_processes() {
    let a = ProcessId(110);
    let b = ProcessId(111);
    let mut rt = AccumulatorRuntime::default();
    let mut a_batch = batch(a, &[Final1, Mid1, Start1]).into_iter();
    let mut b_batch = batch(b, &[Start2, Final2]).into_iter();
    // interleave the two producers
    rt.accept(a_batch.next().unwrap());
    rt.accept(b_batch.next().unwrap());
    rt.accept(a_batch.next().unwrap());
    rt.accept(b_batch.next().unwrap());
    rt.accept(a_batch.next().unwrap());

    assert_eq!(states(&rt.drain(a)), vec![Start1, Mid1, Final1]);
    assert_eq!(seqs(&rt.drain(a)), vec![3, 2, 1]);
    assert_eq!(states(&rt.drain(b)), vec![Start2, Final2]);
}

#[test]
fn at_acc_drain_11_drain_is_idempotent() {
    let p = ProcessId(112);
    let mut rt = AccumulatorRuntime::default();
    rt.accept_all(batch(p, &[Final2, Mid2, Start1, Mid1, Mid2, Final1]));
    let first = rt.drain(p);
    let second = rt.drain(p);
    assert_eq!(first, second);
}

#[test]
fn at_acc_drain_12_zero_seq_no_on_non_empty_ledger_is_admitted() {
    let p = ProcessId(113);
    let mut rt = AccumulatorRuntime::default();
    rt.accept(Notification::v1(p, Start1, 5));
    rt.accept(Notification::v1(p, Final1, 0));
    let out = rt.drain(p);
    assert_eq!(states(&out), vec![Start1, Final1]);
    assert_eq!(seqs(&out), vec![5, 0]);
}
