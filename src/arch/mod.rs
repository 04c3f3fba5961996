//! # Architecture Abstraction Layer
//!
//! Provides the hardware boundary the scheduler core is built against:
//! installing the vector table, arming the tick timer, and performing the
//! actual register save/restore of a context switch. The real port lives
//! in [`arm926`] and only compiles for `target_arch = "arm"`; everywhere
//! else (the host running `cargo test`) [`mock`] stands in, so the
//! scheduler core and `kernel` can be exercised without any hardware or
//! emulator.

#[cfg(target_arch = "arm")]
pub mod arm926;
#[cfg(target_arch = "arm")]
pub use arm926 as imp;

#[cfg(not(target_arch = "arm"))]
pub mod mock;
#[cfg(not(target_arch = "arm"))]
pub use mock as imp;

pub use imp::{init_timer, install_vector_table, task_switch};
