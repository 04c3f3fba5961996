//! # Mock Architecture Port
//!
//! Stands in for [`super::arm926`] on any host that isn't actually an
//! ARM target — which in practice means `cargo test` on the development
//! machine. Every hardware effect becomes a no-op; `task_switch` does
//! not actually transfer control (there is no real task stack to jump
//! into on the host), it just returns, which is exactly the "mock
//! context switch" the scheduler core's test suite is built around.

use crate::task::TaskControlBlock;

pub fn install_vector_table() {}

pub fn init_timer(_clock_hz: u32, _period_ms: u32) {}

/// # Safety
/// No actual register state is touched; any arguments are accepted.
pub unsafe fn task_switch(_prev: Option<&mut TaskControlBlock>, _next: &TaskControlBlock) {}
