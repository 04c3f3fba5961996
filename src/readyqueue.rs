//! # Ready-Queue Bank
//!
//! 32 independent FIFOs indexed by priority, plus a summary bitmap so
//! `pick_next` can skip empty bands in O(1) via `trailing_zeros` (the
//! `ctz` of spec.md §4.2). Membership is intrusive: each task's
//! `queue_next`/`queue_prev` fields are the link nodes, addressed by
//! pool index rather than raw pointer (see `task::TaskId`).
//!
//! This is the standard segregated-by-priority, bitmap-backed ready
//! queue design used by priority-preemptive kernels generally,
//! specialized here to a flat array of head/tail pairs rather than a
//! generic trait, since this crate has exactly one task representation
//! and one queue implementation.

use crate::config::PRIORITY_LEVELS;
use crate::task::{TaskControlBlock, TaskId, TaskState};

/// One FIFO per priority band, plus the non-empty-band summary bitmap.
pub struct ReadyQueueBank {
    head: [Option<TaskId>; PRIORITY_LEVELS],
    tail: [Option<TaskId>; PRIORITY_LEVELS],
    bitmap: u32,
}

impl ReadyQueueBank {
    pub const fn new() -> Self {
        Self {
            head: [None; PRIORITY_LEVELS],
            tail: [None; PRIORITY_LEVELS],
            bitmap: 0,
        }
    }

    /// Append `t` at the tail of its band's FIFO and set the band's
    /// bitmap bit. `t` must not already be linked into any list.
    pub fn enqueue(&mut self, pool: &mut [TaskControlBlock], t: TaskId) {
        let band = pool[t].priority as usize;
        debug_assert!(band < PRIORITY_LEVELS);

        pool[t].queue_next = None;
        pool[t].queue_prev = self.tail[band];

        match self.tail[band] {
            Some(prev_tail) => pool[prev_tail].queue_next = Some(t),
            None => self.head[band] = Some(t),
        }
        self.tail[band] = Some(t);
        self.bitmap |= 1 << band;
    }

    /// Unlink `t` from its band's FIFO. No-op if `t` is not present in
    /// any ready band (tolerates being called on a task that's already
    /// off the ready bank, per spec.md §4.2).
    pub fn dequeue(&mut self, pool: &mut [TaskControlBlock], t: TaskId) {
        let band = pool[t].priority as usize;
        let in_this_band = self.head[band] == Some(t)
            || pool[t].queue_prev.is_some()
            || pool[t].queue_next.is_some();
        if !in_this_band {
            return;
        }

        match pool[t].queue_prev {
            Some(prev) => pool[prev].queue_next = pool[t].queue_next,
            None => self.head[band] = pool[t].queue_next,
        }
        match pool[t].queue_next {
            Some(next) => pool[next].queue_prev = pool[t].queue_prev,
            None => self.tail[band] = pool[t].queue_prev,
        }
        pool[t].queue_next = None;
        pool[t].queue_prev = None;

        if self.head[band].is_none() {
            self.bitmap &= !(1 << band);
        }
    }

    /// Scan bands by increasing priority number (lowest number first),
    /// skipping empty bands via `trailing_zeros`; within a band, return
    /// the first task whose state is still `Ready`, dequeuing it before
    /// returning. Returns `None` if no Ready task exists, without
    /// mutating any state.
    pub fn pick_next(&mut self, pool: &mut [TaskControlBlock]) -> Option<TaskId> {
        let mut bitmap = self.bitmap;
        while bitmap != 0 {
            let band = bitmap.trailing_zeros() as usize;
            let mut cursor = self.head[band];
            while let Some(t) = cursor {
                cursor = pool[t].queue_next;
                if pool[t].state == TaskState::Ready {
                    self.dequeue(pool, t);
                    return Some(t);
                }
            }
            bitmap &= !(1 << band);
        }
        None
    }

    #[cfg(test)]
    pub fn bitmap(&self) -> u32 {
        self.bitmap
    }

    #[cfg(test)]
    pub fn head_tail(&self, band: usize) -> (Option<TaskId>, Option<TaskId>) {
        (self.head[band], self.tail[band])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool_with(n: usize) -> [TaskControlBlock; 4] {
        let mut pool = [
            TaskControlBlock::EMPTY,
            TaskControlBlock::EMPTY,
            TaskControlBlock::EMPTY,
            TaskControlBlock::EMPTY,
        ];
        for i in 0..n {
            pool[i].active = true;
            pool[i].state = TaskState::Ready;
            pool[i].priority = 0;
        }
        pool
    }

    #[test]
    fn test_bitmap_tracks_membership() {
        let mut bank = ReadyQueueBank::new();
        let mut pool = pool_with(2);
        assert_eq!(bank.bitmap(), 0);
        bank.enqueue(&mut pool, 0);
        assert_eq!(bank.bitmap(), 1);
        bank.enqueue(&mut pool, 1);
        assert_eq!(bank.bitmap(), 1);
        bank.dequeue(&mut pool, 0);
        assert_eq!(bank.bitmap(), 1);
        bank.dequeue(&mut pool, 1);
        assert_eq!(bank.bitmap(), 0);
    }

    #[test]
    fn test_enqueue_dequeue_is_idempotent_round_trip() {
        let mut bank = ReadyQueueBank::new();
        let mut pool = pool_with(1);
        let before = bank.head_tail(0);
        let before_bitmap = bank.bitmap();
        bank.enqueue(&mut pool, 0);
        bank.dequeue(&mut pool, 0);
        assert_eq!(bank.head_tail(0), before);
        assert_eq!(bank.bitmap(), before_bitmap);
    }

    #[test]
    fn test_fifo_order_within_band() {
        let mut bank = ReadyQueueBank::new();
        let mut pool = pool_with(3);
        bank.enqueue(&mut pool, 0);
        bank.enqueue(&mut pool, 1);
        bank.enqueue(&mut pool, 2);

        assert_eq!(bank.pick_next(&mut pool), Some(0));
        assert_eq!(bank.pick_next(&mut pool), Some(1));
        assert_eq!(bank.pick_next(&mut pool), Some(2));
        assert_eq!(bank.pick_next(&mut pool), None);
    }

    #[test]
    fn test_lower_band_number_wins() {
        let mut bank = ReadyQueueBank::new();
        let mut pool = pool_with(2);
        pool[0].priority = 5;
        pool[1].priority = 0;
        bank.enqueue(&mut pool, 0);
        bank.enqueue(&mut pool, 1);

        assert_eq!(bank.pick_next(&mut pool), Some(1));
        assert_eq!(bank.pick_next(&mut pool), Some(0));
    }

    #[test]
    fn test_pick_next_on_empty_bank_is_noop() {
        let mut bank = ReadyQueueBank::new();
        let mut pool = pool_with(0);
        assert_eq!(bank.pick_next(&mut pool), None);
        assert_eq!(bank.bitmap(), 0);
    }

    #[test]
    fn test_dequeue_of_absent_task_is_noop() {
        let mut bank = ReadyQueueBank::new();
        let mut pool = pool_with(2);
        bank.enqueue(&mut pool, 0);
        let bitmap_before = bank.bitmap();
        // task 1 was never enqueued
        bank.dequeue(&mut pool, 1);
        assert_eq!(bank.bitmap(), bitmap_before);
        assert_eq!(bank.pick_next(&mut pool), Some(0));
    }
}
