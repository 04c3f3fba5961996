//! # A minimal preemptive scheduler for bare-metal ARM926EJ-S
//!
//! A priority-preemptive, round-robin-within-band task scheduler for the
//! QEMU `versatilepb` machine (ARM926EJ-S). There is no user/kernel
//! separation, no dynamic memory, and no filesystem: every task's stack
//! is a caller-provided static buffer, and the TCB pool itself is a fixed-
//! capacity array.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                    Application Tasks                    │
//! ├────────────────────────────────────────────────────────┤
//! │                 Kernel API (kernel.rs)                  │
//! │   scheduler_init() · task_create() · sleep() · start()  │
//! ├──────────────┬────────────────────┬───────────────────┤
//! │  Scheduler   │   Ready-queue bank  │  Sleep list       │
//! │  scheduler.rs│   readyqueue.rs     │  sleeplist.rs     │
//! │  ─ tick()    │   ─ 32 FIFOs        │  ─ wake phase     │
//! │  ─ sleep()   │   ─ bitmap+ctz      │                   │
//! ├──────────────┴────────────────────┴───────────────────┤
//! │              Task Model (task.rs)                       │
//! │        TCB · TaskState · intrusive pool links           │
//! ├────────────────────────────────────────────────────────┤
//! │            Arch Port (arch/arm926.rs)                   │
//! │   vector table · PL190 VIC · SP804 · context switch     │
//! ├────────────────────────────────────────────────────────┤
//! │         ARM926EJ-S / QEMU versatilepb                   │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Scheduling model
//!
//! 32 priority bands (0 = highest), each a FIFO. `pick_next` always
//! returns the oldest Ready task in the lowest non-empty band — strictly
//! priority-preemptive across bands, round-robin within one. A task
//! leaves the CPU only by a timer tick (every 1 ms) or by calling
//! `sleep(ms)`; there is no other yield point.
//!
//! ## Memory model
//!
//! - **No heap**: every TCB lives in a fixed-size static pool
//!   (`config::MAX_TASKS` slots).
//! - **No `alloc`**: pure `core`, plus `critical_section` for interrupt
//!   masking.
//! - **Per-task stack**: supplied by the caller, never resized or
//!   deallocated by the kernel.
//! - **Critical sections**: `critical_section::with` around every access
//!   to the scheduler singleton, since it is shared between task context
//!   and the timer IRQ.

#![no_std]

pub mod arch;
pub mod boot;
pub mod config;
pub mod error;
pub mod intc;
pub mod kernel;
pub mod log;
pub mod readyqueue;
pub mod scheduler;
pub mod sleeplist;
pub mod sync;
pub mod task;
pub mod timer;
pub mod uart;
