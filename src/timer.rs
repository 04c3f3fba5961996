//! # SP804 Timer Driver
//!
//! Drives Timer0 of `versatilepb`'s dual SP804 PrimeCell block as the
//! scheduler's 1 ms tick source. Timer1 on the same block is left unused
//! (available for an application to claim for its own purposes).

use crate::config::TIMER01_BASE;

const TIMER_LOAD: usize = 0x00;
const TIMER_VALUE: usize = 0x04;
const TIMER_CONTROL: usize = 0x08;
const TIMER_INTCLR: usize = 0x0c;

const CTRL_32BIT: u32 = 1 << 1;
const CTRL_IRQ_ENABLE: u32 = 1 << 5;
const CTRL_PERIODIC: u32 = 1 << 6;
const CTRL_ENABLE: u32 = 1 << 7;

/// Configure Timer0 for a periodic interrupt every `period_ms`
/// milliseconds, given the reference clock feeding it.
pub fn start_periodic(clock_hz: u32, period_ms: u32) {
    let reload = (clock_hz / 1000) * period_ms;
    unsafe {
        let timer = TIMER01_BASE as *mut u32;
        core::ptr::write_volatile(timer.add(TIMER_CONTROL / 4), 0);
        core::ptr::write_volatile(timer.add(TIMER_LOAD / 4), reload);
        core::ptr::write_volatile(timer.add(TIMER_VALUE / 4), reload);
        core::ptr::write_volatile(
            timer.add(TIMER_CONTROL / 4),
            CTRL_32BIT | CTRL_PERIODIC | CTRL_IRQ_ENABLE | CTRL_ENABLE,
        );
    }
}

/// Clear Timer0's pending interrupt. Must be called from the IRQ
/// handler before returning, or the line stays asserted and the core
/// re-enters the handler immediately on return.
pub fn acknowledge() {
    unsafe {
        let timer = TIMER01_BASE as *mut u32;
        core::ptr::write_volatile(timer.add(TIMER_INTCLR / 4), 1);
    }
}
