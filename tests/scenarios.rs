//! End-to-end scheduling scenarios, run against the host-testable
//! scheduler core (`versatile_rtos::scheduler::Scheduler`) with no
//! hardware or mock context switch involved — `tick`/`sleep`/
//! `select_and_commit` never touch a CPU register, so the sequence of
//! `SwitchDecision`s they produce is exactly the sequence of tasks that
//! would actually run on target.
//!
//! Scenario numbering follows spec §8.

use versatile_rtos::config::{MAX_TASKS, STACK_RESERVE_WORDS};
use versatile_rtos::error::SchedulerError;
use versatile_rtos::scheduler::{Scheduler, SwitchDecision};
use versatile_rtos::task::TaskId;

extern "C" fn trampoline() -> ! {
    loop {}
}
extern "C" fn entry() -> ! {
    loop {}
}

fn spawn(sched: &mut Scheduler, stack: &mut [usize], priority: u8) -> TaskId {
    sched
        .create_task(stack.as_mut_ptr(), stack.len(), priority, trampoline, entry)
        .expect("create_task should succeed")
}

fn boot(sched: &mut Scheduler) -> TaskId {
    match sched.select_first() {
        SwitchDecision::Switch { next, .. } => next,
        SwitchDecision::NoneReady => panic!("expected a task to boot into"),
    }
}

fn next_run(sched: &mut Scheduler) -> TaskId {
    match sched.tick() {
        SwitchDecision::Switch { next, .. } => next,
        SwitchDecision::NoneReady => panic!("expected a switch"),
    }
}

/// S1: two equal-priority tasks, neither sleeps -> perfectly alternating
/// ABABAB..., starting with the task created first.
#[test]
fn s1_equal_priority_alternates() {
    let mut sched = Scheduler::new();
    let mut sa = [0usize; 64];
    let mut sb = [0usize; 64];
    let a = spawn(&mut sched, &mut sa, 0);
    let b = spawn(&mut sched, &mut sb, 0);

    assert_eq!(boot(&mut sched), a);
    let mut expected = [b, a, b, a, b, a];
    for want in expected.iter_mut() {
        assert_eq!(next_run(&mut sched), *want);
    }
}

/// S2: priorities 0 and 5, neither sleeps -> only the priority-0 task's
/// tag ever repeats.
#[test]
fn s2_higher_priority_starves_lower() {
    let mut sched = Scheduler::new();
    let mut s_hi = [0usize; 64];
    let mut s_lo = [0usize; 64];
    let hi = spawn(&mut sched, &mut s_hi, 0);
    let _lo = spawn(&mut sched, &mut s_lo, 5);

    assert_eq!(boot(&mut sched), hi);
    for _ in 0..20 {
        assert_eq!(next_run(&mut sched), hi);
    }
}

/// S3: priorities 0 and 5; the priority-0 task sleeps(10) every
/// iteration -> one priority-0 tag, then 10 priority-5 tags, then one
/// priority-0 tag, repeating.
#[test]
fn s3_periodic_sleeper_yields_band_to_lower_priority() {
    let mut sched = Scheduler::new();
    let mut s_hi = [0usize; 64];
    let mut s_lo = [0usize; 64];
    let hi = spawn(&mut sched, &mut s_hi, 0);
    let lo = spawn(&mut sched, &mut s_lo, 5);

    assert_eq!(boot(&mut sched), hi);

    for _ in 0..3 {
        match sched.sleep(10) {
            SwitchDecision::Switch { next, .. } => assert_eq!(next, lo),
            _ => panic!("lo should take over while hi sleeps"),
        }
        for _ in 0..9 {
            assert_eq!(next_run(&mut sched), lo);
        }
        assert_eq!(next_run(&mut sched), hi);
    }
}

/// S4: three equal-priority tasks -> rotation A B C A B C ...
#[test]
fn s4_three_way_rotation() {
    let mut sched = Scheduler::new();
    let mut sa = [0usize; 64];
    let mut sb = [0usize; 64];
    let mut sc = [0usize; 64];
    let a = spawn(&mut sched, &mut sa, 0);
    let b = spawn(&mut sched, &mut sb, 0);
    let c = spawn(&mut sched, &mut sc, 0);

    assert_eq!(boot(&mut sched), a);
    for want in [b, c, a, b, c, a, b, c] {
        assert_eq!(next_run(&mut sched), want);
    }
}

/// S5: single task -> it reselects itself every tick, no crash.
#[test]
fn s5_single_task_reselects_itself() {
    let mut sched = Scheduler::new();
    let mut sa = [0usize; 64];
    let a = spawn(&mut sched, &mut sa, 0);

    assert_eq!(boot(&mut sched), a);
    for _ in 0..50 {
        assert_eq!(next_run(&mut sched), a);
    }
}

/// Regression: a lone task calling `sleep(n)` has no other Ready task to
/// hand the CPU to, so `select_and_commit` must report `NoneReady` for
/// every tick until its own countdown expires, rather than a `Switch` that
/// would let `apply_switch` skip the suspension entirely (spec.md §5 —
/// `sleep` must block for at least `n` ticks even when the caller is the
/// only task in the system). Actually forcing the CPU to stop is
/// `kernel::sleep`'s job (a spin-wait with interrupts enabled); this pins
/// down the scheduler-core decisions that loop is built on.
#[test]
fn lone_task_sleep_yields_no_switch_until_its_own_wakeup() {
    let mut sched = Scheduler::new();
    let mut sa = [0usize; 64];
    let a = spawn(&mut sched, &mut sa, 0);

    assert_eq!(boot(&mut sched), a);

    assert_eq!(sched.sleep(3), SwitchDecision::NoneReady);
    for _ in 0..2 {
        assert_eq!(sched.tick(), SwitchDecision::NoneReady);
    }
    match sched.tick() {
        SwitchDecision::Switch { prev, next } => {
            assert_eq!(prev, Some(a));
            assert_eq!(next, a);
        }
        other => panic!("unexpected {other:?}"),
    }
}

/// S6: stack_words == STACK_RESERVE_WORDS is the minimum legal stack;
/// `saved_sp` must land exactly at the base, never beyond it.
#[test]
fn s6_minimum_reserve_stack_lands_at_base() {
    let mut sched = Scheduler::new();
    let mut stack = [0usize; STACK_RESERVE_WORDS];
    let base = stack.as_mut_ptr();
    let id = sched
        .create_task(base, stack.len(), 0, trampoline, entry)
        .expect("minimum-reserve stack must be accepted");
    assert_eq!(sched.task(id).saved_sp, base as usize);

    // One word smaller must be rejected rather than underflow.
    let mut too_small = [0usize; STACK_RESERVE_WORDS - 1];
    let err = sched.create_task(
        too_small.as_mut_ptr(),
        too_small.len(),
        0,
        trampoline,
        entry,
    );
    assert_eq!(err, Err(SchedulerError::ZeroSizedStack));
}

/// Property 9: `task_create` beyond pool capacity fails cleanly and does
/// not corrupt scheduling of the tasks already created.
#[test]
fn pool_exhaustion_does_not_corrupt_existing_tasks() {
    let mut sched = Scheduler::new();
    let mut stacks = [[0usize; 64]; MAX_TASKS + 1];
    let mut ids = [0usize; MAX_TASKS];
    for (i, slot) in ids.iter_mut().enumerate() {
        *slot = spawn(&mut sched, &mut stacks[i], 0);
    }

    let overflow = sched.create_task(
        stacks[MAX_TASKS].as_mut_ptr(),
        stacks[MAX_TASKS].len(),
        0,
        trampoline,
        entry,
    );
    assert_eq!(overflow, Err(SchedulerError::PoolExhausted));

    // The pool's MAX_TASKS original tasks still round-robin correctly.
    assert_eq!(boot(&mut sched), ids[0]);
    for &want in ids.iter().skip(1) {
        assert_eq!(next_run(&mut sched), want);
    }
    assert_eq!(next_run(&mut sched), ids[0]);
}

/// Property 10: `pick_next` (via `select_and_commit`) on an empty bank
/// returns no switch and does not mutate state.
#[test]
fn pick_next_on_empty_scheduler_is_noop() {
    let mut sched = Scheduler::new();
    assert_eq!(sched.select_first(), SwitchDecision::NoneReady);
    assert_eq!(sched.current(), None);
    assert_eq!(sched.tick(), SwitchDecision::NoneReady);
    assert_eq!(sched.tick_count(), 1);
}
