//! # Diagnostic Logging
//!
//! Thin `defmt` wrapper, gated behind the `defmt` Cargo feature so the
//! crate still builds (and runs, and is unit-testable on the host)
//! without it. Diagnostic-only: nothing in the scheduler core depends on
//! whether a log line was actually emitted, per spec.md §6 ("UART...
//! used only for diagnostic output and not part of the core's
//! correctness").
//!
//! Call sites live at tick-engine phase boundaries (wake/preempt/select/
//! commit) and at the `task_create`/`sleep` entry points.

#[cfg(feature = "defmt")]
macro_rules! trace {
    ($($arg:tt)*) => {
        defmt::trace!($($arg)*)
    };
}

#[cfg(not(feature = "defmt"))]
macro_rules! trace {
    ($($arg:tt)*) => {{}};
}

pub(crate) use trace;
