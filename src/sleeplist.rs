//! # Sleep List
//!
//! A single doubly linked list, rooted at `head`, holding every task
//! currently blocked in `sleep()`. Insertion is O(1) head-prepend; order
//! within the list is irrelevant to correctness because the tick engine's
//! wake phase visits every node on every tick (spec.md §4.3).

use crate::task::{TaskControlBlock, TaskId};

pub struct SleepList {
    head: Option<TaskId>,
}

impl SleepList {
    pub const fn new() -> Self {
        Self { head: None }
    }

    /// Prepend `t` at the head of the sleep list. `t` must not already
    /// be linked into any list.
    pub fn push_front(&mut self, pool: &mut [TaskControlBlock], t: TaskId) {
        pool[t].queue_prev = None;
        pool[t].queue_next = self.head;
        if let Some(old_head) = self.head {
            pool[old_head].queue_prev = Some(t);
        }
        self.head = Some(t);
    }

    /// Unlink `t` from the sleep list.
    pub fn remove(&mut self, pool: &mut [TaskControlBlock], t: TaskId) {
        match pool[t].queue_prev {
            Some(prev) => pool[prev].queue_next = pool[t].queue_next,
            None => self.head = pool[t].queue_next,
        }
        if let Some(next) = pool[t].queue_next {
            pool[next].queue_prev = pool[t].queue_prev;
        }
        pool[t].queue_next = None;
        pool[t].queue_prev = None;
    }

    /// Walk every sleeping task, decrementing `wake_ticks_remaining` and
    /// returning the set of tasks whose countdown just reached zero
    /// (saving `next` before any unlinking happens, per spec.md §4.4
    /// item 1). Callers are responsible for unlinking each woken task
    /// via `remove` and re-enqueuing it into the ready bank.
    ///
    /// `woken` is a caller-provided scratch buffer; this keeps the sleep
    /// list free of heap allocation while letting the tick engine decide
    /// what "woken" means for the ready bank.
    pub fn tick(&self, pool: &mut [TaskControlBlock], woken: &mut [Option<TaskId>]) -> usize {
        let mut count = 0;
        let mut cursor = self.head;
        while let Some(t) = cursor {
            let next = pool[t].queue_next;
            if pool[t].wake_ticks_remaining > 0 {
                pool[t].wake_ticks_remaining -= 1;
            }
            if pool[t].wake_ticks_remaining == 0 {
                if count < woken.len() {
                    woken[count] = Some(t);
                    count += 1;
                }
            }
            cursor = next;
        }
        count
    }

    #[cfg(test)]
    pub fn head(&self) -> Option<TaskId> {
        self.head
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskState;

    fn pool_with(n: usize) -> [TaskControlBlock; 4] {
        let mut pool = [
            TaskControlBlock::EMPTY,
            TaskControlBlock::EMPTY,
            TaskControlBlock::EMPTY,
            TaskControlBlock::EMPTY,
        ];
        for i in 0..n {
            pool[i].active = true;
            pool[i].state = TaskState::Sleeping;
        }
        pool
    }

    #[test]
    fn test_push_front_and_remove_round_trip() {
        let mut list = SleepList::new();
        let mut pool = pool_with(2);
        list.push_front(&mut pool, 0);
        list.push_front(&mut pool, 1);
        assert_eq!(list.head(), Some(1));
        list.remove(&mut pool, 1);
        list.remove(&mut pool, 0);
        assert_eq!(list.head(), None);
    }

    #[test]
    fn test_tick_decrements_and_reports_zero_crossing() {
        let mut list = SleepList::new();
        let mut pool = pool_with(2);
        pool[0].wake_ticks_remaining = 1;
        pool[1].wake_ticks_remaining = 3;
        list.push_front(&mut pool, 0);
        list.push_front(&mut pool, 1);

        let mut woken = [None; 4];
        let n = list.tick(&mut pool, &mut woken);
        assert_eq!(n, 1);
        assert_eq!(woken[0], Some(0));
        assert_eq!(pool[1].wake_ticks_remaining, 2);
    }

    #[test]
    fn test_tick_visits_every_node_even_as_some_unlink() {
        let mut list = SleepList::new();
        let mut pool = pool_with(3);
        pool[0].wake_ticks_remaining = 1;
        pool[1].wake_ticks_remaining = 1;
        pool[2].wake_ticks_remaining = 5;
        list.push_front(&mut pool, 0);
        list.push_front(&mut pool, 1);
        list.push_front(&mut pool, 2);

        let mut woken = [None; 4];
        let n = list.tick(&mut pool, &mut woken);
        assert_eq!(n, 2);
        assert!(woken[..2].contains(&Some(0)));
        assert!(woken[..2].contains(&Some(1)));
    }
}
