//! # Task Control Block
//!
//! Defines the per-task bookkeeping record the scheduler core operates on.
//! A TCB never owns its stack: the caller supplies the buffer at
//! `task_create` time and the core only ever reads/writes the saved
//! pointers into it.
//!
//! ## State Machine
//!
//! ```text
//!   ┌───────┐   pick_next()    ┌─────────┐
//!   │ Ready │ ───────────────► │ Running │
//!   └───────┘                  └─────────┘
//!       ▲                           │
//!       │       tick: preempt       │
//!       └───────────────────────────┘
//!       ▲                           │
//!       │       tick: wake         │  sleep(ms)
//!       │                          ▼
//!   ┌──────────┐            (moved off ready list)
//!   │ Sleeping │ ◄───────────────────┘
//!   └──────────┘
//!
//!   Stopped: terminal, reached only if a task function returns.
//! ```

use crate::config::STACK_RESERVE_WORDS;

/// Index of a task within the static TCB pool. Used in place of raw
/// pointers for all intrusive list links (ready-band FIFO, sleep list),
/// per the arena-plus-indices pattern: no owning handle cycles, no
/// aliasing hazards, and trivially `Copy`.
pub type TaskId = usize;

/// Execution state of a task, per spec.md §3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TaskState {
    /// Waiting in a ready-band FIFO for `pick_next` to select it.
    Ready,
    /// Currently the `current` task on the CPU.
    Running,
    /// Waiting in the sleep list for `wake_ticks_remaining` to reach zero.
    Sleeping,
    /// Terminal: the task function returned and was caught by the
    /// trampoline. Never scheduled again.
    Stopped,
}

/// A task's entry point. Must never return; if it does, the trampoline
/// installed by `task_create` marks the TCB `Stopped` and parks.
pub type TaskEntry = extern "C" fn() -> !;

/// Task Control Block — the central per-task record.
///
/// TCBs live only in the scheduler's static pool (`Scheduler::pool`);
/// there is no heap and no separate allocation path.
///
/// `#[repr(C)]` so `arch::arm926`'s naked context-switch assembly can
/// locate `saved_sp` by a fixed, compiler-independent byte offset
/// (`core::mem::offset_of!`).
#[repr(C)]
pub struct TaskControlBlock {
    /// Base address of the caller-provided stack buffer (word-addressable).
    /// `None` for an unallocated pool slot.
    pub stack_base: Option<*mut usize>,

    /// Size of the stack buffer, in words.
    pub stack_words: usize,

    /// The task's stack pointer at the moment it was last preempted,
    /// put to sleep, or created. Consumed by the context-switch
    /// primitive; never read by the scheduler core itself.
    pub saved_sp: usize,

    /// Callee-saved general-purpose registers captured at last switch-out.
    pub saved_callee_regs: [u32; 8],

    /// Return link captured at last switch-out. Zero at creation.
    pub saved_lr: u32,

    /// Resume address captured at last switch-out. The trampoline's
    /// address at creation; whatever address the task was last switched
    /// out from after that.
    pub saved_pc: u32,

    /// The caller's real entry function, stashed here so the shared
    /// trampoline (`saved_pc`) can look up what to call for whichever
    /// task is `current` when it first runs.
    pub entry: TaskEntry,

    /// Static priority, 0 (highest) .. 31 (lowest). Masked to that range
    /// at creation.
    pub priority: u8,

    /// Current scheduling state.
    pub state: TaskState,

    /// Remaining 1 ms ticks until a Sleeping task becomes Ready. Unused
    /// unless `state == Sleeping`.
    pub wake_ticks_remaining: u32,

    /// Next task in whichever intrusive list this TCB currently belongs
    /// to (a ready-band FIFO or the sleep list). `None` if this is the
    /// tail, or if the TCB is in no list.
    pub queue_next: Option<TaskId>,

    /// Previous task in whichever intrusive list this TCB currently
    /// belongs to. `None` if this is the head, or if the TCB is in no
    /// list.
    pub queue_prev: Option<TaskId>,

    /// Whether this pool slot is allocated (`true`) or free (`false`).
    pub active: bool,
}

// Safety: `stack_base` is a raw pointer into caller-provided memory that
// outlives the TCB for the lifetime of the program; the scheduler only
// ever touches it from within a critical section (task context or the
// tick engine with interrupts masked), never concurrently.
unsafe impl Send for TaskControlBlock {}
unsafe impl Sync for TaskControlBlock {}

impl TaskControlBlock {
    extern "C" fn empty_entry() -> ! {
        loop {}
    }

    /// An empty (unallocated) TCB, used to fill the static pool array.
    pub const EMPTY: Self = Self {
        stack_base: None,
        stack_words: 0,
        saved_sp: 0,
        saved_callee_regs: [0; 8],
        saved_lr: 0,
        saved_pc: 0,
        entry: Self::empty_entry,
        priority: 0,
        state: TaskState::Stopped,
        wake_ticks_remaining: 0,
        queue_next: None,
        queue_prev: None,
        active: false,
    };

    /// Initialize a freshly allocated TCB per spec.md §4.1.
    ///
    /// `trampoline` becomes the initial `saved_pc`, so the very first
    /// resume lands in the shared trampoline rather than the caller's
    /// function directly; the caller's real entry point is recorded
    /// separately in `entry` for the trampoline to dispatch to.
    pub fn init(
        &mut self,
        stack_base: *mut usize,
        stack_words: usize,
        priority: u8,
        trampoline: TaskEntry,
    ) {
        // SAFETY: caller guarantees `stack_base .. stack_base + stack_words`
        // is a valid, exclusively-owned stack buffer and the stack grows
        // toward lower addresses.
        let sp = (stack_words - STACK_RESERVE_WORDS) as isize;
        self.stack_base = Some(stack_base);
        self.stack_words = stack_words;
        self.saved_sp = unsafe { stack_base.offset(sp) as usize };
        self.saved_callee_regs = [0; 8];
        self.saved_lr = 0;
        self.saved_pc = trampoline as usize as u32;

        // SAFETY: the reserved window is exactly STACK_RESERVE_WORDS long
        // and wholly owned by this TCB; write the synthetic frame the
        // restore sequence in `arch::arm926::task_switch` (and the IRQ
        // epilogue) expects so this task's very first dispatch looks
        // identical to resuming one that was switched out normally: r0..r12
        // and lr zeroed, pc = trampoline, cpsr = a fresh task's initial
        // mode/flags.
        unsafe {
            let frame = stack_base.offset(sp);
            for i in 0..13 {
                core::ptr::write(frame.add(i), 0);
            }
            core::ptr::write(frame.add(13), 0); // lr
            core::ptr::write(frame.add(14), trampoline as usize);
            core::ptr::write(frame.add(15), crate::config::INITIAL_TASK_CPSR as usize);
        }

        self.priority = priority & 31;
        self.state = TaskState::Ready;
        self.wake_ticks_remaining = 0;
        self.queue_next = None;
        self.queue_prev = None;
        self.active = true;
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.active && self.state == TaskState::Ready
    }
}
