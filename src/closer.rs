//! One-shot termination latch for background tasks.
//!
//! A [`Closer`] starts open and can be closed exactly once; closing again is
//! a no-op. Any number of tasks may block on [`Closer::wait`] or poll with
//! [`Closer::wait_timeout`] concurrently; all of them are released when the
//! latch closes. There is no transition back to the open state.
//!
//! The expirer loop uses `wait_timeout(interval)` to select between "tick
//! elapsed" (run a sweep) and "latch closed" (exit), which guarantees the
//! task terminates within one tick of [`Closer::close`].

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// One-shot latch signalling termination to background tasks.
#[derive(Debug, Default)]
pub struct Closer {
    closed: Mutex<bool>,
    cond: Condvar,
}

impl Closer {
    /// Creates an open latch.
    pub fn new() -> Self {
        Self {
            closed: Mutex::new(false),
            cond: Condvar::new(),
        }
    }

    /// Closes the latch, waking all waiters. Idempotent.
    pub fn close(&self) {
        let mut closed = self.closed.lock();
        if !*closed {
            *closed = true;
            self.cond.notify_all();
        }
    }

    /// Returns `true` if the latch has been closed.
    pub fn closed(&self) -> bool {
        *self.closed.lock()
    }

    /// Blocks until the latch is closed.
    pub fn wait(&self) {
        let mut closed = self.closed.lock();
        while !*closed {
            self.cond.wait(&mut closed);
        }
    }

    /// Blocks until the latch is closed or `timeout` elapses.
    ///
    /// Returns `true` if the latch is closed, `false` on timeout.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut closed = self.closed.lock();
        while !*closed {
            if self.cond.wait_until(&mut closed, deadline).timed_out() {
                break;
            }
        }
        *closed
    }
}
