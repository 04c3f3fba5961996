//! # Kernel
//!
//! Top-level initialization and public API. Owns the global scheduler
//! singleton, wraps every access to it in a critical section, and is the
//! only module that knows both the scheduler core (`scheduler::Scheduler`)
//! and the architecture layer (`arch`) — it is the glue between the two.
//!
//! ## Startup Sequence
//!
//! ```text
//! _reset_handler (boot.rs)
//!   └─► main::kernel_main()
//!         ├─► kernel::scheduler_init()   ← Reset the scheduler singleton
//!         ├─► kernel::task_create() × N  ← Register tasks
//!         └─► kernel::scheduler_start()  ← Arm the timer, launch task 0
//! ```

use crate::arch;
use crate::config::{SYSTEM_CLOCK_HZ, TICK_PERIOD_MS};
use crate::error::SchedulerError;
use crate::scheduler::{Scheduler, SwitchDecision};
use crate::sync;
use crate::task::{TaskEntry, TaskId, TaskState};

// ---------------------------------------------------------------------------
// Global scheduler instance
// ---------------------------------------------------------------------------

/// Global scheduler instance.
///
/// # Safety
/// Accessed only through `SCHEDULER_PTR`, itself only ever dereferenced
/// from within a `critical_section` or from the masked-IRQ dispatch path
/// — both serialize access, so there is never a concurrent mutable
/// borrow despite the `static mut`.
static mut SCHEDULER: Scheduler = Scheduler::new();

/// Raw pointer to the global scheduler, for the arch layer's IRQ
/// dispatch (`arch::arm926::irq_dispatch`), which cannot carry a Rust
/// reference across the naked-asm boundary.
#[no_mangle]
pub static mut SCHEDULER_PTR: *mut Scheduler = core::ptr::null_mut();

// ---------------------------------------------------------------------------
// Kernel API
// ---------------------------------------------------------------------------

/// Reset the scheduler to its initial empty state and publish
/// `SCHEDULER_PTR` for the arch layer. Must be called exactly once,
/// before any other kernel function.
pub fn scheduler_init() {
    unsafe {
        SCHEDULER = Scheduler::new();
        SCHEDULER_PTR = core::ptr::addr_of_mut!(SCHEDULER);
    }
    arch::install_vector_table();
}

/// Register a new task. `entry` must never return (enforced by the
/// `extern "C" fn() -> !` signature); if it somehow does, the trampoline
/// installed here catches it and marks the task `Stopped` rather than
/// running off into undefined memory.
pub fn task_create(
    entry: TaskEntry,
    stack: &'static mut [usize],
    priority: u8,
) -> Result<TaskId, SchedulerError> {
    let stack_words = stack.len();
    let stack_base = stack.as_mut_ptr();
    sync::critical_section(|_cs| unsafe {
        (*SCHEDULER_PTR).create_task(stack_base, stack_words, priority, task_trampoline, entry)
    })
}

/// Put the calling task to sleep for `ms` milliseconds (or, if `ms == 0`,
/// voluntarily yield without sleeping). Performs the context switch
/// inline and does not return until this task is selected again.
pub fn sleep(ms: u32) {
    // The decision and the register-level switch it triggers must happen
    // under the same interrupt mask: if a tick fired between them, it
    // could hand this task's CPU to a third task while `apply_switch` is
    // still mid-way through saving this one's context.
    let (decision, sleeper) = sync::critical_section(|_cs| unsafe {
        let sleeper = (*SCHEDULER_PTR).current();
        ((*SCHEDULER_PTR).sleep(ms), sleeper)
    });
    apply_switch(decision);
    if decision == SwitchDecision::NoneReady {
        // No other task is Ready, so there is nothing for
        // `arch::task_switch` to switch to: this call stream is still the
        // one running on the CPU even though the caller was just marked
        // Sleeping and unlinked from the ready bank. Spin with interrupts
        // enabled — the timer ISR can still preempt this loop exactly like
        // any other task, and once a future tick's wake phase re-selects
        // `sleeper`, the IRQ return path resumes right back here. This
        // loop *is* the suspension spec.md §5 requires before `sleep`
        // returns to its caller.
        if let Some(id) = sleeper {
            wait_until_running(id);
        }
    }
}

/// Busy-wait, with interrupts enabled, until task `id` is both `current`
/// and `Running` again. Only ever invoked from `sleep` when `pick_next`
/// found no other Ready task to switch to.
fn wait_until_running(id: TaskId) {
    loop {
        let running = sync::critical_section(|_cs| unsafe {
            (*SCHEDULER_PTR).current() == Some(id)
                && (*SCHEDULER_PTR).task(id).state == TaskState::Running
        });
        if running {
            return;
        }
        core::hint::spin_loop();
    }
}

/// Arm the tick timer and launch the highest-priority task created so
/// far. Never returns. Panics with `SchedulerError::NoReadyTaskAtStart` if
/// `task_create` was never called successfully.
#[cfg(target_arch = "arm")]
pub fn scheduler_start() -> ! {
    let decision = sync::critical_section(|_cs| unsafe { (*SCHEDULER_PTR).select_first() });
    match decision {
        SwitchDecision::Switch { next, .. } => {
            arch::init_timer(SYSTEM_CLOCK_HZ, TICK_PERIOD_MS);
            let next_tcb = unsafe { (*SCHEDULER_PTR).task(next) };
            unsafe { arch::task_switch(None, next_tcb) };
            // `task_switch` with `prev == None` never actually returns —
            // there is no "boot" task frame for anything to resume back
            // into — but it isn't typed `-> !` (see arch::arm926::
            // task_switch_raw), so satisfy this function's own `-> !`.
            loop {
                core::hint::spin_loop();
            }
        }
        SwitchDecision::NoneReady => panic!("{}", SchedulerError::NoReadyTaskAtStart),
    }
}

/// Host/test stand-in for `scheduler_start`: performs the same selection
/// but returns a `Result` instead of diverging, since there is no real
/// task stack to transfer control into off-target.
#[cfg(not(target_arch = "arm"))]
pub fn scheduler_start() -> Result<TaskId, SchedulerError> {
    let decision = sync::critical_section(|_cs| unsafe { (*SCHEDULER_PTR).select_first() });
    match decision {
        SwitchDecision::Switch { next, .. } => {
            arch::init_timer(SYSTEM_CLOCK_HZ, TICK_PERIOD_MS);
            let next_tcb = unsafe { (*SCHEDULER_PTR).task(next) };
            unsafe { arch::task_switch(None, next_tcb) };
            Ok(next)
        }
        SwitchDecision::NoneReady => Err(SchedulerError::NoReadyTaskAtStart),
    }
}

/// Called from the IRQ dispatch trampoline (`arch::arm926::irq_dispatch`)
/// with the stack pointer the interrupted task's context was just pushed
/// onto. Runs the full tick engine and returns the stack pointer to
/// resume on: the interrupted task's own `interrupted_sp` if no switch
/// was selected, or the newly selected task's `saved_sp` otherwise.
///
/// # Safety
/// Must only be called from the IRQ entry trampoline, with IRQs already
/// masked by virtue of still being in exception context.
#[allow(dead_code)]
pub unsafe fn on_timer_tick(interrupted_sp: usize) -> usize {
    let sched = &mut *SCHEDULER_PTR;
    if let Some(cur) = sched.current() {
        sched.set_saved_sp(cur, interrupted_sp);
    }
    match sched.tick() {
        SwitchDecision::NoneReady => 0,
        SwitchDecision::Switch { next, .. } => sched.task(next).saved_sp,
    }
}

fn apply_switch(decision: SwitchDecision) {
    if let SwitchDecision::Switch { prev, next } = decision {
        unsafe {
            let sched = &mut *SCHEDULER_PTR;
            let next_ptr = sched.task_ptr(next);
            if let Some(p) = prev {
                if p != next {
                    let prev_ptr = sched.task_ptr(p);
                    arch::task_switch(Some(&mut *prev_ptr), &*next_ptr);
                }
            }
        }
    }
}

/// Shared entry point every task's `saved_pc` resumes at on its very
/// first dispatch. Looks up the real user function through the
/// scheduler's `current` task and calls it; if it returns, marks the
/// task `Stopped` and parks forever instead of executing garbage.
extern "C" fn task_trampoline() -> ! {
    let entry = sync::critical_section(|_cs| unsafe {
        (*SCHEDULER_PTR)
            .current()
            .map(|id| (*SCHEDULER_PTR).user_entry(id))
    });
    if let Some(entry) = entry {
        entry();
    }
    sync::critical_section(|_cs| unsafe {
        if let Some(id) = (*SCHEDULER_PTR).current() {
            (*SCHEDULER_PTR).mark_stopped(id);
        }
    });
    loop {
        core::hint::spin_loop();
    }
}
