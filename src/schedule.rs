//! Cooperative, cancellable fire-once timers.
//!
//! Nothing runs in the background: the owner advances the clock once per
//! frame with the real elapsed time and receives whatever became due.

use std::time::Duration;

/// Identifies one scheduled task so it can be cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug)]
struct Scheduled<T> {
    handle: TaskHandle,
    due: Duration,
    task: T,
}

#[derive(Debug)]
pub struct Scheduler<T> {
    clock: Duration,
    next_id: u64,
    queue: Vec<Scheduled<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Scheduler {
            clock: Duration::ZERO,
            next_id: 0,
            queue: Vec::new(),
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed on this scheduler's clock.
    pub fn now(&self) -> Duration {
        self.clock
    }

    pub fn schedule(&mut self, delay: Duration, task: T) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        self.queue.push(Scheduled {
            handle,
            due: self.clock + delay,
            task,
        });
        handle
    }

    /// Remove a task before it fires. Returns it if it was still pending.
    pub fn cancel(&mut self, handle: TaskHandle) -> Option<T> {
        let idx = self.queue.iter().position(|s| s.handle == handle)?;
        Some(self.queue.remove(idx).task)
    }

    /// Drop every pending task. Returns how many were cancelled.
    pub fn cancel_all(&mut self) -> usize {
        let n = self.queue.len();
        self.queue.clear();
        n
    }

    /// Move the clock forward and return the tasks that became due, earliest
    /// first; tasks due at the same instant keep their scheduling order.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<T> {
        self.clock += elapsed;
        let clock = self.clock;

        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.queue.drain(..).partition(|s| s.due <= clock);
        self.queue = pending;

        due.sort_by_key(|s| (s.due, s.handle.0));
        due.into_iter().map(|s| s.task).collect()
    }

    /// Time until the earliest pending task fires.
    pub fn next_due_in(&self) -> Option<Duration> {
        self.queue
            .iter()
            .map(|s| s.due.saturating_sub(self.clock))
            .min()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn tasks_fire_only_once_due() {
        let mut sched = Scheduler::new();
        sched.schedule(MS * 400, "flip");

        assert!(sched.advance(MS * 399).is_empty());
        assert_eq!(sched.next_due_in(), Some(MS));
        assert_eq!(sched.advance(MS), vec!["flip"]);
        assert!(sched.is_idle());
        assert!(sched.advance(MS * 1000).is_empty());
    }

    #[test]
    fn due_tasks_come_back_in_order() {
        let mut sched = Scheduler::new();
        sched.schedule(MS * 30, 3);
        sched.schedule(MS * 10, 1);
        sched.schedule(MS * 30, 4);
        sched.schedule(MS * 20, 2);

        assert_eq!(sched.advance(MS * 100), vec![1, 2, 3, 4]);
    }

    #[test]
    fn delay_is_relative_to_current_clock() {
        let mut sched = Scheduler::new();
        sched.advance(MS * 500);
        sched.schedule(MS * 100, ());
        assert!(sched.advance(MS * 99).is_empty());
        assert_eq!(sched.advance(MS).len(), 1);
        assert_eq!(sched.now(), MS * 600);
    }

    #[test]
    fn cancelled_tasks_never_fire() {
        let mut sched = Scheduler::new();
        let a = sched.schedule(MS * 10, 'a');
        sched.schedule(MS * 10, 'b');
        sched.schedule(MS * 10, 'c');

        assert_eq!(sched.cancel(a), Some('a'));
        assert_eq!(sched.cancel(a), None);
        assert_eq!(sched.pending(), 2);

        assert_eq!(sched.cancel_all(), 2);
        assert!(sched.advance(MS * 10).is_empty());
        assert_eq!(sched.next_due_in(), None);
    }
}
