use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;

/// Delay applied to the students name filter.
pub const FILTER_DEBOUNCE_MS: u32 = 300;

/// Runs only the last scheduled task once the delay has passed without a new
/// call. Cloning shares the pending timer.
#[derive(Clone, Default)]
pub struct Debouncer {
    pending: Rc<RefCell<Option<Timeout>>>,
}

impl PartialEq for Debouncer {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.pending, &other.pending)
    }
}

impl Debouncer {
    /// Replacing the held `Timeout` drops, and so cancels, the previous one.
    pub fn schedule(&self, delay_ms: u32, task: impl FnOnce() + 'static) {
        *self.pending.borrow_mut() = Some(Timeout::new(delay_ms, task));
    }

    /// Dropping the taken `Timeout` clears it.
    pub fn cancel(&self) {
        self.pending.borrow_mut().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_without_pending_task_is_noop() {
        let debouncer = Debouncer::default();
        debouncer.cancel();
        assert!(debouncer.pending.borrow().is_none());
    }

    #[test]
    fn clones_share_the_timer_slot() {
        let debouncer = Debouncer::default();
        assert!(debouncer == debouncer.clone());
        assert!(debouncer != Debouncer::default());
    }
}
