//! # Scheduler
//!
//! The core scheduling engine: owns the TCB pool, the ready-queue bank,
//! and the sleep list, and implements the tick-driven preemption logic
//! of spec.md §4.4 plus the `sleep()` contract of spec.md §5.
//!
//! This module is deliberately free of any architecture concern — no
//! inline assembly, no MMIO, no raw `static mut` singleton. It is driven
//! by `kernel.rs` (which does own the architecture-visible singleton and
//! the actual register save/restore), and is exercised directly by the
//! host-side unit tests without any hardware or mock context switch at
//! all, since `tick`/`sleep`/`pick_next` never touch a CPU register.

use crate::config::MAX_TASKS;
use crate::error::SchedulerError;
use crate::log::trace;
use crate::readyqueue::ReadyQueueBank;
use crate::sleeplist::SleepList;
use crate::task::{TaskControlBlock, TaskEntry, TaskId, TaskState};

/// Outcome of a scheduling decision (spec.md §4.4 steps 3–4, and the
/// "select+commit sub-path" spec.md §5 sanctions `sleep()` to invoke
/// directly instead of going through a full software-interrupt trap).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchDecision {
    /// No Ready task exists; `current` is left exactly as it was.
    NoneReady,
    /// Switch from `prev` (the previously running task, if any) to `next`.
    Switch {
        prev: Option<TaskId>,
        next: TaskId,
    },
}

/// The scheduler singleton's state.
pub struct Scheduler {
    pool: [TaskControlBlock; MAX_TASKS],
    task_count: usize,
    ready: ReadyQueueBank,
    sleep_list: SleepList,
    current: Option<TaskId>,
    tick_count: u64,
}

impl Scheduler {
    pub const fn new() -> Self {
        Self {
            pool: [TaskControlBlock::EMPTY; MAX_TASKS],
            task_count: 0,
            ready: ReadyQueueBank::new(),
            sleep_list: SleepList::new(),
            current: None,
            tick_count: 0,
        }
    }

    /// Reset to the freshly-initialized state. Must precede any other
    /// call (spec.md §6, `scheduler_init`).
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn current(&self) -> Option<TaskId> {
        self.current
    }

    pub fn task(&self, id: TaskId) -> &TaskControlBlock {
        &self.pool[id]
    }

    /// Raw pointer to task `id`'s TCB, for callers (the `kernel` module)
    /// that need two simultaneous disjoint borrows across a context
    /// switch — something safe references through this single array
    /// can't express.
    pub fn task_ptr(&mut self, id: TaskId) -> *mut TaskControlBlock {
        &mut self.pool[id] as *mut _
    }

    /// Record `sp` as task `id`'s saved stack pointer. Used by the IRQ
    /// dispatch path to capture where a task's context landed on its own
    /// stack before the tick engine potentially selects someone else.
    pub fn set_saved_sp(&mut self, id: TaskId, sp: usize) {
        self.pool[id].saved_sp = sp;
    }

    /// Register a new task. `trampoline` is the common entry point every
    /// task's initial `saved_pc` resumes at; `user_entry` is the caller's
    /// function, stashed in the TCB so the trampoline can dispatch to it
    /// and catch a return (spec.md §9's resolution of the
    /// return-from-task open question).
    pub fn create_task(
        &mut self,
        stack_base: *mut usize,
        stack_words: usize,
        priority: u8,
        trampoline: TaskEntry,
        user_entry: TaskEntry,
    ) -> Result<TaskId, SchedulerError> {
        if stack_words < crate::config::STACK_RESERVE_WORDS {
            return Err(SchedulerError::ZeroSizedStack);
        }
        if self.task_count >= MAX_TASKS {
            return Err(SchedulerError::PoolExhausted);
        }

        let id = self.task_count;
        self.pool[id].init(stack_base, stack_words, priority, trampoline);
        self.pool[id].entry = user_entry;
        self.task_count += 1;
        self.ready.enqueue(&mut self.pool, id);
        trace!("create_task: id={} priority={}", id, self.pool[id].priority);
        Ok(id)
    }

    /// The user entry function stashed for task `id`, for the trampoline
    /// to dispatch to.
    pub fn user_entry(&self, id: TaskId) -> TaskEntry {
        self.pool[id].entry
    }

    /// Mark task `id` `Stopped` (reached only via the return trampoline).
    pub fn mark_stopped(&mut self, id: TaskId) {
        self.pool[id].state = TaskState::Stopped;
    }

    /// Run just the select+commit sub-path, with no preceding wake or
    /// preempt phase. Used once, at boot, to choose the very first task
    /// to run (there is nothing to wake or preempt yet).
    pub fn select_first(&mut self) -> SwitchDecision {
        self.select_and_commit()
    }

    /// Full tick-engine pass: wake phase, preempt phase, then
    /// select+commit. Called only from the software-interrupt trap the
    /// timer IRQ raises (spec.md §6).
    pub fn tick(&mut self) -> SwitchDecision {
        self.tick_count += 1;
        trace!("tick: count={}", self.tick_count);
        self.wake_phase();
        self.preempt_phase();
        self.select_and_commit()
    }

    /// `sleep(ms)` per spec.md §5: `ms == 0` yields without actually
    /// sleeping (re-enqueued at the tail of its own band, exactly like a
    /// voluntary preemption); `ms > 0` moves the calling task onto the
    /// sleep list. Either way, control is handed to `select_and_commit`
    /// directly — the "select+commit sub-path" spec.md §5 sanctions as
    /// an alternative to a full software-interrupt trap.
    pub fn sleep(&mut self, ms: u32) -> SwitchDecision {
        if let Some(cur) = self.current {
            trace!("sleep: task={} ms={}", cur, ms);
            if ms == 0 {
                self.pool[cur].state = TaskState::Ready;
                self.ready.enqueue(&mut self.pool, cur);
            } else {
                self.pool[cur].wake_ticks_remaining = ms;
                self.pool[cur].state = TaskState::Sleeping;
                self.sleep_list.push_front(&mut self.pool, cur);
            }
        }
        self.select_and_commit()
    }

    /// Wake phase (spec.md §4.4 step 1): decrement every sleeper's
    /// countdown, and migrate anyone who reaches zero back to Ready.
    fn wake_phase(&mut self) {
        let mut woken = [None; MAX_TASKS];
        let n = self.sleep_list.tick(&mut self.pool, &mut woken);
        for slot in woken.iter().take(n) {
            let t = slot.expect("wake_phase: woken slot must be populated");
            self.sleep_list.remove(&mut self.pool, t);
            self.pool[t].state = TaskState::Ready;
            self.ready.enqueue(&mut self.pool, t);
            trace!("wake_phase: woke task={}", t);
        }
    }

    /// Preempt phase (spec.md §4.4 step 2): if `current` is Running,
    /// demote it to Ready and re-enqueue at the tail of its band. A
    /// `current` that is Sleeping or Stopped was already taken off
    /// elsewhere and must not be touched here.
    fn preempt_phase(&mut self) {
        if let Some(cur) = self.current {
            if self.pool[cur].state == TaskState::Running {
                self.pool[cur].state = TaskState::Ready;
                self.ready.enqueue(&mut self.pool, cur);
                trace!("preempt_phase: demoted task={}", cur);
            }
        }
    }

    /// Select phase + commit phase (spec.md §4.4 steps 3–4).
    fn select_and_commit(&mut self) -> SwitchDecision {
        let prev = self.current;
        match self.ready.pick_next(&mut self.pool) {
            None => {
                trace!("select_and_commit: no ready task");
                SwitchDecision::NoneReady
            }
            Some(next) => {
                self.pool[next].state = TaskState::Running;
                self.current = Some(next);
                trace!("select_and_commit: next={}", next);
                SwitchDecision::Switch { prev, next }
            }
        }
    }
}
