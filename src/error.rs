//! # Scheduler Errors
//!
//! Configuration-time failures the kernel API surfaces to the caller
//! (spec.md §7). Runtime invariant violations are not represented here —
//! those are programmer bugs and are handled with `debug_assert!`/`panic!`
//! at the point of violation, never returned as a recoverable `Result`.

/// Configuration error returned by the kernel's public API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SchedulerError {
    /// `task_create` was called after the TCB pool's capacity
    /// (`config::MAX_TASKS`) was already reached.
    PoolExhausted,
    /// `task_create` was given a stack too small to hold the reserve
    /// window (`config::STACK_RESERVE_WORDS`), including the zero-word
    /// case.
    ZeroSizedStack,
    /// `scheduler_start` was called with no Ready task in the bank.
    NoReadyTaskAtStart,
}

impl core::fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            SchedulerError::PoolExhausted => "task pool exhausted",
            SchedulerError::ZeroSizedStack => "task stack too small for the reserve window",
            SchedulerError::NoReadyTaskAtStart => "scheduler_start called with no ready task",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for SchedulerError {}
