use gloo_timers::callback::Timeout;

/// Something that can run a task later on the page's event loop.
///
/// The returned handle cancels the task when dropped, which is what lets the
/// toast and the rate limiters replace a pending task by simply overwriting
/// the slot that holds it.
pub trait Scheduler: Clone + 'static {
    type Handle: 'static;

    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Self::Handle;
}

/// `setTimeout` via gloo. Dropping the `Timeout` clears it.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    type Handle = Timeout;

    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Timeout {
        Timeout::new(delay_ms, task)
    }
}

#[cfg(test)]
pub mod manual {
    //! Deterministic clock for driving timer logic in host tests.

    use super::Scheduler;
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};

    struct Pending {
        id: u64,
        due: u64,
        task: Box<dyn FnOnce()>,
    }

    #[derive(Default)]
    struct Inner {
        now: u64,
        next_id: u64,
        pending: Vec<Pending>,
    }

    #[derive(Clone, Default)]
    pub struct ManualScheduler {
        inner: Rc<RefCell<Inner>>,
    }

    pub struct ManualHandle {
        id: u64,
        inner: Weak<RefCell<Inner>>,
    }

    impl Drop for ManualHandle {
        fn drop(&mut self) {
            if let Some(inner) = self.inner.upgrade() {
                if let Ok(mut inner) = inner.try_borrow_mut() {
                    inner.pending.retain(|p| p.id != self.id);
                }
            }
        }
    }

    impl ManualScheduler {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn now(&self) -> u64 {
            self.inner.borrow().now
        }

        pub fn pending(&self) -> usize {
            self.inner.borrow().pending.len()
        }

        /// Moves the clock forward, firing due tasks in due-time order.
        pub fn advance(&self, ms: u64) {
            let target = self.inner.borrow().now + ms;
            loop {
                let next = {
                    let mut inner = self.inner.borrow_mut();
                    let idx = inner
                        .pending
                        .iter()
                        .enumerate()
                        .filter(|(_, p)| p.due <= target)
                        .min_by_key(|(_, p)| (p.due, p.id))
                        .map(|(i, _)| i);
                    match idx {
                        Some(i) => {
                            let p = inner.pending.remove(i);
                            inner.now = p.due;
                            Some(p.task)
                        }
                        None => {
                            inner.now = target;
                            None
                        }
                    }
                };
                match next {
                    Some(task) => task(),
                    None => break,
                }
            }
        }
    }

    impl Scheduler for ManualScheduler {
        type Handle = ManualHandle;

        fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> ManualHandle {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            let due = inner.now + u64::from(delay_ms);
            inner.pending.push(Pending { id, due, task });
            ManualHandle {
                id,
                inner: Rc::downgrade(&self.inner),
            }
        }
    }
}
