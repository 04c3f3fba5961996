//! # Kernel Configuration
//!
//! Compile-time constants governing the scheduler and the `versatilepb`
//! platform glue. All limits are fixed at compile time — no dynamic
//! allocation anywhere in this crate.

/// Maximum number of concurrent tasks the static TCB pool can hold.
/// Increase with care: each task still owns a caller-provided stack
/// buffer, plus one `TaskControlBlock` slot in the pool.
pub const MAX_TASKS: usize = 16;

/// Number of priority bands in the ready-queue bank. Band 0 is highest
/// priority; band `PRIORITY_LEVELS - 1` is lowest. Must not exceed 32,
/// since the ready bitmap is a single `u32`.
pub const PRIORITY_LEVELS: usize = 32;

/// Number of words reserved at the top of a new task's stack, holding
/// the synthetic initial context frame `TaskControlBlock::init` writes
/// there: `r0..r12`, `lr`, `pc`, `cpsr` (13 + 1 + 1 + 1 = 16 words). This
/// is exactly the frame shape `arch::arm926::task_switch` and the IRQ
/// path's restore sequence both consume, so a task can be resumed by
/// either mechanism regardless of which one last switched it out.
pub const STACK_RESERVE_WORDS: usize = 16;

/// CPSR a freshly created task resumes with: System mode (`0x1f`), IRQs
/// unmasked, FIQ masked (this port never uses FIQ).
pub const INITIAL_TASK_CPSR: u32 = 0x5f;

/// Scheduler tick period in milliseconds. One SP804 timer interrupt fires
/// per tick.
pub const TICK_PERIOD_MS: u32 = 1;

/// Reference clock frequency feeding the SP804 timer on `versatilepb`.
pub const SYSTEM_CLOCK_HZ: u32 = 24_000_000;

/// `versatilepb` PrimeCell PL011 UART0 base address.
pub const UART0_BASE: usize = 0x101f_1000;

/// `versatilepb` PrimeCell SP804 Timer0/1 base address.
pub const TIMER01_BASE: usize = 0x101e_2000;

/// `versatilepb` PrimeCell PL190 vectored interrupt controller base
/// address.
pub const VIC_BASE: usize = 0x1014_0000;

/// IRQ line the SP804 Timer0 is wired to on `versatilepb`.
pub const TIMER0_IRQ: u32 = 36;

/// Stack size in words reserved for each CPU exception mode during boot
/// (`svc`, `irq`, `und`, `abt`). Small: these modes never run application
/// code, only the brief trampolines in `boot.rs` and `arch/arm926.rs`.
pub const STARTUP_STACK_WORDS: usize = 256;
