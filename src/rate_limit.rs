use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::timer::Scheduler;

/// A trailing-edge rate limiter around `f`.
///
/// Every `call` drops the pending timer (cancelling it) and schedules `f` to
/// run `wait_ms` later with the arguments of that latest call. A burst of
/// calls therefore turns into one call, `wait_ms` after the last one.
pub struct RateLimited<A: 'static, S: Scheduler> {
    f: Rc<dyn Fn(A)>,
    wait_ms: u32,
    scheduler: S,
    slot: Rc<RefCell<Option<S::Handle>>>,
    pending: Rc<Cell<bool>>,
}

pub fn debounce<A, S, F>(f: F, wait_ms: u32, scheduler: S) -> RateLimited<A, S>
where
    A: 'static,
    S: Scheduler,
    F: Fn(A) + 'static,
{
    RateLimited {
        f: Rc::new(f),
        wait_ms,
        scheduler,
        slot: Rc::new(RefCell::new(None)),
        pending: Rc::new(Cell::new(false)),
    }
}

/// Same trailing-edge behaviour as [`debounce`]. The page uses it to collapse
/// scroll bursts, not to emit at a fixed rate while scrolling continues.
pub fn throttle<A, S, F>(f: F, wait_ms: u32, scheduler: S) -> RateLimited<A, S>
where
    A: 'static,
    S: Scheduler,
    F: Fn(A) + 'static,
{
    debounce(f, wait_ms, scheduler)
}

impl<A: 'static, S: Scheduler> RateLimited<A, S> {
    pub fn call(&self, args: A) {
        let f = self.f.clone();
        let pending = self.pending.clone();
        let handle = self.scheduler.schedule(
            self.wait_ms,
            Box::new(move || {
                pending.set(false);
                f(args);
            }),
        );
        self.pending.set(true);
        // Replacing the slot drops, and so cancels, the previous timer.
        let previous = self.slot.borrow_mut().replace(handle);
        drop(previous);
    }

    pub fn cancel(&self) {
        let previous = self.slot.borrow_mut().take();
        drop(previous);
        self.pending.set(false);
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }

    pub fn wait_ms(&self) -> u32 {
        self.wait_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::manual::ManualScheduler;

    fn recorder() -> (Rc<RefCell<Vec<(u64, i32)>>>, ManualScheduler) {
        (Rc::new(RefCell::new(Vec::new())), ManualScheduler::new())
    }

    #[test]
    fn burst_collapses_into_one_trailing_call_with_last_args() {
        let (calls, clock) = recorder();
        let sink = calls.clone();
        let c = clock.clone();
        let limited = debounce(move |n: i32| sink.borrow_mut().push((c.now(), n)), 250, clock.clone());

        limited.call(1);
        clock.advance(100);
        limited.call(2);
        clock.advance(100);
        limited.call(3);
        assert!(limited.is_pending());
        assert_eq!(clock.pending(), 1);

        clock.advance(249);
        assert!(calls.borrow().is_empty());
        clock.advance(1);

        assert_eq!(*calls.borrow(), vec![(450, 3)]);
        assert!(!limited.is_pending());
    }

    #[test]
    fn calls_separated_by_more_than_wait_each_fire() {
        let (calls, clock) = recorder();
        let sink = calls.clone();
        let c = clock.clone();
        let limited = throttle(move |n: i32| sink.borrow_mut().push((c.now(), n)), 16, clock.clone());

        limited.call(1);
        clock.advance(20);
        limited.call(2);
        clock.advance(20);

        assert_eq!(*calls.borrow(), vec![(16, 1), (36, 2)]);
    }

    #[test]
    fn throttle_is_trailing_edge_too() {
        let (calls, clock) = recorder();
        let sink = calls.clone();
        let c = clock.clone();
        let limited = throttle(move |n: i32| sink.borrow_mut().push((c.now(), n)), 16, clock.clone());

        for n in 0..10 {
            limited.call(n);
            clock.advance(5);
        }
        clock.advance(100);

        assert_eq!(*calls.borrow(), vec![(61, 9)]);
    }

    #[test]
    fn cancel_drops_the_pending_call() {
        let (calls, clock) = recorder();
        let sink = calls.clone();
        let limited = debounce(move |n: i32| sink.borrow_mut().push((0, n)), 250, clock.clone());

        limited.call(7);
        limited.cancel();
        clock.advance(1000);

        assert!(calls.borrow().is_empty());
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn zero_argument_functions_work() {
        let clock = ManualScheduler::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let limited = debounce(move |()| h.set(h.get() + 1), 250, clock.clone());

        limited.call(());
        limited.call(());
        clock.advance(250);

        assert_eq!(hits.get(), 1);
    }
}
