//! # ARM926EJ-S Port Layer
//!
//! Hardware-specific code for the classic ARMv5TE core used by QEMU's
//! `versatilepb` machine. Unlike Cortex-M, this core has no hardware
//! exception-frame stacking and no `cpsid`/`cpsie` (those are ARMv6+):
//! IRQ entry banks `r13_irq`/`r14_irq` only, and masking interrupts means
//! reading `cpsr`, setting/clearing the I bit by hand, and writing it
//! back via `msr cpsr_c`.
//!
//! ## Context Switch Mechanism
//!
//! Tasks and the kernel both run in System mode, sharing the usr-mode
//! register bank (`r0`–`r14_usr`) so a task's own stack is exactly the
//! stack both switch paths save a context onto, in one shared 16-word
//! frame: `[r0..r12][lr][pc][cpsr]` (see `task_switch`). On IRQ entry the
//! core is in IRQ mode with `lr_irq`/`spsr_irq` holding the return
//! address and flags; `srsdb` banks those onto the System-mode stack
//! before the handler switches to System mode and pushes the rest of the
//! general-purpose register file, so `irq_dispatch` runs with a normal
//! System-mode stack and may call arbitrary Rust. A voluntary switch
//! (`task_switch`) builds the same frame by hand, since it has no real
//! exception to bank a return address off of. Restoring is `ldmia` for
//! the general-purpose half followed by `rfeia`, which atomically
//! reloads `pc` and `cpsr` — identical on both paths, so a task can be
//! resumed by whichever one runs next, regardless of which one last
//! switched it out.
//!
//! ## Interrupt Sources
//!
//! Only the SP804 Timer0 is unmasked, routed through the PL190 VIC
//! (`config::TIMER0_IRQ`). The UART is polled, not interrupt-driven.

use core::arch::{asm, global_asm};
use core::mem::offset_of;

use crate::config::TIMER0_IRQ;
use crate::task::TaskControlBlock;

/// Byte offset of `TaskControlBlock::saved_sp`, resolved at compile time
/// so the naked context-switch assembly below can load/store it without
/// a Rust-level field access.
const SAVED_SP_OFFSET: usize = offset_of!(TaskControlBlock, saved_sp);

// ---------------------------------------------------------------------------
// Vector table
// ---------------------------------------------------------------------------

global_asm!(
    ".section .vectors, \"ax\"",
    ".global _vector_table",
    "_vector_table:",
    "ldr pc, =_reset_handler",
    "ldr pc, =_undefined_handler",
    "ldr pc, =_swi_handler",
    "ldr pc, =_prefetch_abort_handler",
    "ldr pc, =_data_abort_handler",
    "nop", // reserved vector, never taken
    "ldr pc, =_irq_handler",
    "ldr pc, =_fiq_handler",
);

/// Point VIC0's vector base (or, on `versatilepb`, simply confirm the
/// vector table linked at address 0 is the active one) and leave FIQ
/// masked forever — this port never uses FIQ.
pub fn install_vector_table() {
    extern "C" {
        static _vector_table: u32;
    }
    // SAFETY: the linker script places `_vector_table` at address 0,
    // which is also where the core fetches exception vectors from after
    // reset on `versatilepb` (VECTORS_HIGH strapped low). This read just
    // asserts the symbol resolves; no hardware register needs poking.
    let _ = unsafe { core::ptr::addr_of!(_vector_table) };
}

// ---------------------------------------------------------------------------
// Timer + VIC configuration
// ---------------------------------------------------------------------------

/// Arm SP804 Timer0 for a periodic 1 ms tick and unmask its IRQ line at
/// the PL190 VIC. Thin glue over the standalone `timer`/`intc` drivers —
/// this module owns the IRQ vector and the critical-section impl, not
/// the register layout of either peripheral.
pub fn init_timer(clock_hz: u32, period_ms: u32) {
    crate::timer::start_periodic(clock_hz, period_ms);
    crate::intc::enable_irq(TIMER0_IRQ);
}

// ---------------------------------------------------------------------------
// Critical sections
// ---------------------------------------------------------------------------

const CPSR_I_BIT: u32 = 1 << 7;

#[inline]
fn read_cpsr() -> u32 {
    let cpsr: u32;
    unsafe { asm!("mrs {0}, cpsr", out(reg) cpsr) };
    cpsr
}

#[inline]
fn write_cpsr_c(cpsr: u32) {
    unsafe { asm!("msr cpsr_c, {0}", in(reg) cpsr) };
}

struct Arm926CriticalSection;
critical_section::set_impl!(Arm926CriticalSection);

unsafe impl critical_section::Impl for Arm926CriticalSection {
    unsafe fn acquire() -> critical_section::RawRestoreState {
        let cpsr = read_cpsr();
        write_cpsr_c(cpsr | CPSR_I_BIT);
        (cpsr & CPSR_I_BIT) == 0
    }

    unsafe fn release(was_enabled: critical_section::RawRestoreState) {
        if was_enabled {
            let cpsr = read_cpsr();
            write_cpsr_c(cpsr & !CPSR_I_BIT);
        }
    }
}

// ---------------------------------------------------------------------------
// Context switch
// ---------------------------------------------------------------------------

// `task_switch` and the IRQ path below agree on one frame shape so a task
// can be resumed by either mechanism regardless of which one switched it
// out: from the current `sp`, in address order,
//   [r0..r12][lr][pc][cpsr]
// (16 words — `config::STACK_RESERVE_WORDS`). `r0..r12,lr` are popped by
// `ldmia`; `pc,cpsr` are then loaded atomically by `rfeia`, which is what
// lets a sleeping task resume with interrupts back in whatever state they
// were in when it last ran, even though `task_switch` itself is an
// ordinary call, not a real exception return.
//
// `task_switch` is a voluntary switch: by AAPCS, r0-r3/r12 are already
// caller-saved at any call boundary, so saving them again here is pure
// frame-shape symmetry with the IRQ path, not a correctness requirement.
// `TaskControlBlock::init` writes this same 16-word shape into a new
// task's stack so its first dispatch looks identical to resuming one
// that was already switched out once.
global_asm!(
    ".section .text, \"ax\"",
    ".global task_switch",
    ".type task_switch, %function",
    "task_switch:",
    // r0 = prev TCB ptr (0 if None), r1 = next TCB ptr.
    "cmp r0, #0",
    "beq 2f",
    "adr r2, 1f",
    "mrs r3, cpsr",
    "stmdb sp!, {{r2, r3}}",
    "stmdb sp!, {{r0-r12, lr}}",
    "str sp, [r0, #{off}]",
    "2:",
    "ldr sp, [r1, #{off}]",
    "ldmia sp!, {{r0-r12, lr}}",
    "rfeia sp!",
    // Reached only by a `pc` restored from a frame this function itself
    // built: i.e. this exact task resuming after a later switch handed
    // the CPU back to it. `lr` was just reloaded from that same frame, so
    // this falls straight back into whichever `task_switch` call last
    // switched this task out.
    "1:",
    "bx lr",
    off = const SAVED_SP_OFFSET,
);

extern "C" {
    /// Switch from `prev`'s saved context to `next`'s. Used both to
    /// launch the very first task (`prev == None`) and for every
    /// subsequent switch decided by the scheduler core.
    ///
    /// Genuinely returns, in the ordinary AAPCS sense, exactly once:
    /// whenever `prev` is later resumed by *some* call to this same
    /// routine (not necessarily this one). Must not be declared `-> !`
    /// on the Rust side even though a given call may not return for a
    /// long time (or, for the `prev == None` boot call, ever) — marking
    /// it noreturn would let the compiler treat the code after a call
    /// site as unreachable and elide it, which breaks the resume.
    ///
    /// # Safety
    /// Must be called with interrupts masked and with `next` holding a
    /// `saved_sp` previously populated by `TaskControlBlock::init` or by
    /// a prior call to this function.
    fn task_switch_raw(prev: *mut TaskControlBlock, next: *const TaskControlBlock);
}

/// Safe(r) wrapper giving `task_switch_raw` the `Option`-shaped signature
/// the rest of the kernel calls.
///
/// # Safety
/// See `task_switch_raw`.
pub unsafe fn task_switch(prev: Option<&mut TaskControlBlock>, next: &TaskControlBlock) {
    let prev_ptr = match prev {
        Some(p) => p as *mut TaskControlBlock,
        None => core::ptr::null_mut(),
    };
    task_switch_raw(prev_ptr, next as *const TaskControlBlock);
}

// ---------------------------------------------------------------------------
// Exception handlers
// ---------------------------------------------------------------------------

/// IRQ entry point, installed via the vector table. Acknowledges the
/// timer, runs the tick engine, and if a switch was selected performs it
/// before returning from the interrupt.
///
/// # Safety
/// Naked; must preserve the exact ARM IRQ entry/exit convention. Called
/// only by the core on a hardware IRQ.
#[no_mangle]
#[naked]
unsafe extern "C" fn _irq_handler() {
    asm!(
        "sub lr, lr, #4",
        // Bank lr_irq/spsr_irq aside, then drop into System mode so the
        // full register file lands on the interrupted task's own stack,
        // in the exact [r0..r12,lr][pc,cpsr] shape `task_switch` uses.
        "srsdb sp!, #0x1f",
        "cps #0x1f",
        "stmdb sp!, {{r0-r12, lr}}",
        "bl {dispatch}",
        // r0 now holds the next task's saved_sp if a switch happened, or
        // 0 to resume the interrupted task unchanged (sp is already its
        // own frame in that case).
        "cmp r0, #0",
        "moveq r0, sp",
        "mov sp, r0",
        "ldmia sp!, {{r0-r12, lr}}",
        "rfeia sp!",
        dispatch = sym irq_dispatch,
        options(noreturn),
    );
}

/// Runs in System mode with a full register file saved on the
/// interrupted task's stack. Acks the timer, runs the tick engine, and
/// tells the caller which stack to resume on.
#[no_mangle]
unsafe extern "C" fn irq_dispatch(interrupted_sp: *mut usize) -> usize {
    crate::timer::acknowledge();
    crate::kernel::on_timer_tick(interrupted_sp as usize)
}

#[no_mangle]
extern "C" fn _swi_handler() -> ! {
    // Unused: `sleep()` invokes the select+commit sub-path directly
    // (see `kernel::sleep`) rather than trapping through SWI.
    loop {}
}

#[no_mangle]
extern "C" fn _undefined_handler() -> ! {
    loop {}
}

#[no_mangle]
extern "C" fn _prefetch_abort_handler() -> ! {
    loop {}
}

#[no_mangle]
extern "C" fn _data_abort_handler() -> ! {
    loop {}
}

#[no_mangle]
extern "C" fn _fiq_handler() -> ! {
    loop {}
}
