//! # Reset / Boot Stub
//!
//! The very first code to run after a `versatilepb` reset: set up a
//! banked stack pointer for every CPU mode the port uses, zero `.bss`,
//! switch to System mode (where the kernel and every task run), and
//! hand off to the application's `kernel_main`.
//!
//! `kernel_main` is an `extern "C"` symbol the application binary
//! provides (analogous to the weak-symbol hand-off `cortex-m-rt`'s
//! `#[entry]` performs) so this module never needs to know the
//! application crate's name.
//!
//! This never returns — if it did, the core would fall off the end of
//! mapped RAM.

use core::arch::global_asm;

use crate::config::STARTUP_STACK_WORDS;

const STACK_BYTES: usize = STARTUP_STACK_WORDS * 4;

global_asm!(
    ".section .text.boot",
    ".global _reset_handler",
    "_reset_handler:",
    // Undefined mode
    "msr cpsr_c, #0xdb",
    "ldr r0, ={und_stack}",
    "add sp, r0, {stack_bytes}",
    // Abort mode
    "msr cpsr_c, #0xd7",
    "ldr r0, ={abt_stack}",
    "add sp, r0, {stack_bytes}",
    // IRQ mode
    "msr cpsr_c, #0xd2",
    "ldr r0, ={irq_stack}",
    "add sp, r0, {stack_bytes}",
    // Supervisor mode (reset entry mode on versatilepb)
    "msr cpsr_c, #0xd3",
    "ldr r0, ={svc_stack}",
    "add sp, r0, {stack_bytes}",
    // System mode: kernel and every task run here, sharing the usr bank
    "msr cpsr_c, #0xdf",
    "ldr r0, ={sys_stack}",
    "add sp, r0, {stack_bytes}",
    "bl {rust_entry}",
    "1: b 1b",
    und_stack = sym UND_STACK,
    abt_stack = sym ABT_STACK,
    irq_stack = sym IRQ_STACK,
    svc_stack = sym SVC_STACK,
    sys_stack = sym SYS_STACK,
    stack_bytes = const STACK_BYTES,
    rust_entry = sym rust_entry,
);

#[repr(align(8))]
struct ModeStack([u8; STACK_BYTES]);

#[no_mangle]
static UND_STACK: ModeStack = ModeStack([0; STACK_BYTES]);
#[no_mangle]
static ABT_STACK: ModeStack = ModeStack([0; STACK_BYTES]);
#[no_mangle]
static IRQ_STACK: ModeStack = ModeStack([0; STACK_BYTES]);
#[no_mangle]
static SVC_STACK: ModeStack = ModeStack([0; STACK_BYTES]);
#[no_mangle]
static SYS_STACK: ModeStack = ModeStack([0; STACK_BYTES]);

extern "C" fn rust_entry() -> ! {
    zero_bss();
    extern "C" {
        fn kernel_main() -> !;
    }
    // SAFETY: the application binary defines `kernel_main` with this
    // exact signature; linked into the same image as this crate.
    unsafe { kernel_main() }
}

fn zero_bss() {
    extern "C" {
        static mut __bss_start: u32;
        static mut __bss_end: u32;
    }
    unsafe {
        let start = core::ptr::addr_of_mut!(__bss_start);
        let end = core::ptr::addr_of_mut!(__bss_end);
        let count = end.offset_from(start) as usize;
        core::ptr::write_bytes(start, 0, count);
    }
}
