//! # Synchronization Primitives
//!
//! Interrupt-safe critical section abstraction. All shared scheduler
//! state must be accessed from within a critical section to prevent data
//! races between task context and the timer IRQ — there is exactly one
//! core, so masking IRQs for the duration of the closure is sufficient.
//!
//! Built on the `critical-section` crate rather than a hand-rolled
//! `cpsid`/`cpsie` wrapper, so the same kernel code also links (and
//! actually runs) on the host during `cargo test`, where
//! `critical-section`'s `std` backend provides the `Impl`. On target,
//! `arch::arm926` registers the real CPSR-masking `Impl` via
//! `critical_section::set_impl!`.

/// Execute a closure within a critical section (IRQs masked for its
/// duration).
///
/// # Usage
/// ```ignore
/// sync::critical_section(|_cs| {
///     // Access shared state safely
/// });
/// ```
#[inline]
pub fn critical_section<F, R>(f: F) -> R
where
    F: FnOnce(critical_section::CriticalSection) -> R,
{
    critical_section::with(f)
}
