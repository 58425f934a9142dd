//! Trailing-edge debounce over `gloo` timeouts.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;

/// Wraps a callback so rapid repeated calls collapse into one trailing call
/// after a quiet period. Only the final call's value is delivered; there is
/// no leading-edge call and no cap on how long a continuous stream of calls
/// can defer delivery.
///
/// Dropping the handle (or calling [`cancel`](Self::cancel)) cancels any
/// pending delivery.
pub struct Debounced<T: 'static> {
    wait_ms: u32,
    callback: Rc<dyn Fn(T)>,
    pending: Rc<RefCell<Option<Timeout>>>,
}

impl<T> Debounced<T> {
    pub fn new(wait_ms: u32, callback: impl Fn(T) + 'static) -> Self {
        Self {
            wait_ms,
            callback: Rc::new(callback),
            pending: Rc::new(RefCell::new(None)),
        }
    }

    /// Schedule `value` for delivery `wait_ms` from now, superseding any
    /// value scheduled earlier.
    pub fn call(&self, value: T) {
        let callback = Rc::clone(&self.callback);
        let pending = Rc::clone(&self.pending);
        let timeout = Timeout::new(self.wait_ms, move || {
            pending.borrow_mut().take();
            callback(value);
        });
        // Replacing the slot drops the previous timeout, which cancels it.
        *self.pending.borrow_mut() = Some(timeout);
    }

    /// Drop any pending delivery without firing it.
    pub fn cancel(&self) {
        self.pending.borrow_mut().take();
    }
}
