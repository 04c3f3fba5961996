//! # Example Firmware
//!
//! Three tasks sharing one CPU, demonstrating the priority-preemptive,
//! round-robin-within-band scheduler:
//!
//! | Task | Priority | Behavior |
//! |------|----------|----------|
//! | `task_a` | 0 | Emits `A`, sleeps 200 ticks |
//! | `task_b` | 0 | Emits `B`, sleeps 200 ticks |
//! | `task_c` | 5 | Emits `C` every loop, never sleeps |
//!
//! `task_a`/`task_b` alternate in FIFO order within band 0 while both are
//! Ready; `task_c` only gets the CPU while both are asleep, since band 0
//! strictly preempts band 5 whenever it has a Ready member (spec.md §4.2).
//!
//! Only builds and links as firmware for `target_arch = "arm"`; on any
//! other host (e.g. `cargo test`, `cargo clippy` during development) this
//! binary compiles down to an empty `main`, since there is no
//! `versatilepb` to boot on the development machine.

#![cfg_attr(target_arch = "arm", no_std)]
#![cfg_attr(target_arch = "arm", no_main)]

#[cfg(target_arch = "arm")]
mod firmware {
    use core::fmt::Write as _;

    use panic_halt as _;

    use versatile_rtos::kernel;
    use versatile_rtos::uart::Uart;

    const STACK_WORDS: usize = 256;

    static mut STACK_A: [usize; STACK_WORDS] = [0; STACK_WORDS];
    static mut STACK_B: [usize; STACK_WORDS] = [0; STACK_WORDS];
    static mut STACK_C: [usize; STACK_WORDS] = [0; STACK_WORDS];

    fn emit(tag: &str) {
        let mut uart = Uart::new();
        let _ = uart.write_str(tag);
    }

    extern "C" fn task_a() -> ! {
        loop {
            emit("A");
            kernel::sleep(200);
        }
    }

    extern "C" fn task_b() -> ! {
        loop {
            emit("B");
            kernel::sleep(200);
        }
    }

    extern "C" fn task_c() -> ! {
        loop {
            emit("C");
        }
    }

    /// Called from `boot::rust_entry` once `.bss` is zeroed and every
    /// mode's stack pointer is set up. Never returns.
    #[no_mangle]
    pub extern "C" fn kernel_main() -> ! {
        kernel::scheduler_init();

        // SAFETY: each static stack is handed to exactly one
        // `task_create` call below and never referenced anywhere else,
        // satisfying the `&'static mut` exclusivity the kernel API
        // requires.
        let stack_a: &'static mut [usize] = unsafe { &mut *core::ptr::addr_of_mut!(STACK_A) };
        let stack_b: &'static mut [usize] = unsafe { &mut *core::ptr::addr_of_mut!(STACK_B) };
        let stack_c: &'static mut [usize] = unsafe { &mut *core::ptr::addr_of_mut!(STACK_C) };

        kernel::task_create(task_a, stack_a, 0).expect("task_create(task_a)");
        kernel::task_create(task_b, stack_b, 0).expect("task_create(task_b)");
        kernel::task_create(task_c, stack_c, 5).expect("task_create(task_c)");

        kernel::scheduler_start()
    }
}

#[cfg(not(target_arch = "arm"))]
fn main() {}
