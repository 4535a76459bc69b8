// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The clock and thread identity a host runs against.

use core::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread::{self, ThreadId};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tessera_core::time::Time;

/// Where a [`Host`](crate::Host) gets the time and learns which thread it is
/// on.
pub trait Executor: Send + Sync + fmt::Debug {
    /// Returns the current host time.
    fn now(&self) -> Time;

    /// Returns whether the caller is on the controlling thread.
    fn is_controlling_thread(&self) -> bool;

    /// Asks the controlling thread to call [`Host::poll`](crate::Host::poll)
    /// soon.
    fn wake(&self);
}

// ---------------------------------------------------------------------------
// Deterministic executor
// ---------------------------------------------------------------------------

/// A clock that only moves when told to.
///
/// Clones share the same time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Arc<Mutex<Time>>,
}

impl ManualClock {
    /// Creates a clock reading `start`.
    #[must_use]
    pub fn new(start: Time) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Returns the current time.
    #[must_use]
    pub fn now(&self) -> Time {
        *self.now.lock()
    }

    /// Sets the current time.
    pub fn set(&self, time: Time) {
        *self.now.lock() = time;
    }

    /// Moves the clock forward by `seconds`.
    pub fn advance(&self, seconds: f64) {
        *self.now.lock() += seconds;
    }
}

/// An [`Executor`] for tests: a [`ManualClock`], a switch for pretending to
/// be off the controlling thread, and a wake counter.
#[derive(Debug, Default)]
pub struct FakeExecutor {
    clock: ManualClock,
    off_controlling: AtomicBool,
    wakes: AtomicUsize,
}

impl FakeExecutor {
    /// Creates an executor reading `clock`.
    #[must_use]
    pub fn new(clock: ManualClock) -> Self {
        Self {
            clock,
            off_controlling: AtomicBool::new(false),
            wakes: AtomicUsize::new(0),
        }
    }

    /// Returns the clock.
    #[must_use]
    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    /// Makes [`is_controlling_thread`](Executor::is_controlling_thread)
    /// answer `!off`.
    pub fn set_off_controlling_thread(&self, off: bool) {
        self.off_controlling.store(off, Ordering::SeqCst);
    }

    /// Returns how many times [`wake`](Executor::wake) was called.
    #[must_use]
    pub fn wake_count(&self) -> usize {
        self.wakes.load(Ordering::SeqCst)
    }
}

impl Executor for FakeExecutor {
    fn now(&self) -> Time {
        self.clock.now()
    }

    fn is_controlling_thread(&self) -> bool {
        !self.off_controlling.load(Ordering::SeqCst)
    }

    fn wake(&self) {
        self.wakes.fetch_add(1, Ordering::SeqCst);
    }
}

// ---------------------------------------------------------------------------
// Real-thread executor
// ---------------------------------------------------------------------------

/// An [`Executor`] bound to the thread that created it, reading a monotonic
/// clock that starts at zero.
pub struct ThreadExecutor {
    origin: Instant,
    controlling: ThreadId,
    woken: Mutex<bool>,
    wake_signal: Condvar,
}

impl fmt::Debug for ThreadExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadExecutor")
            .field("controlling", &self.controlling)
            .field("woken", &*self.woken.lock())
            .finish_non_exhaustive()
    }
}

impl ThreadExecutor {
    /// Creates an executor whose controlling thread is the current one.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            controlling: thread::current().id(),
            woken: Mutex::new(false),
            wake_signal: Condvar::new(),
        }
    }

    /// Blocks until [`wake`](Executor::wake) is called or `timeout` passes.
    ///
    /// Returns whether a wake was consumed.
    pub fn wait_for_wake(&self, timeout: Duration) -> bool {
        let mut woken = self.woken.lock();
        if !*woken {
            self.wake_signal.wait_for(&mut woken, timeout);
        }
        core::mem::take(&mut *woken)
    }
}

impl Default for ThreadExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor for ThreadExecutor {
    fn now(&self) -> Time {
        Time(self.origin.elapsed().as_secs_f64())
    }

    fn is_controlling_thread(&self) -> bool {
        thread::current().id() == self.controlling
    }

    fn wake(&self) {
        *self.woken.lock() = true;
        self.wake_signal.notify_one();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_is_shared_between_clones() {
        let clock = ManualClock::new(Time(1.0));
        let other = clock.clone();
        other.advance(0.5);
        assert_eq!(clock.now(), Time(1.5));
    }

    #[test]
    fn fake_executor_pretends_to_be_off_thread() {
        let executor = FakeExecutor::default();
        assert!(executor.is_controlling_thread());
        executor.set_off_controlling_thread(true);
        assert!(!executor.is_controlling_thread());
        executor.wake();
        assert_eq!(executor.wake_count(), 1);
    }

    #[test]
    fn thread_executor_knows_its_thread() {
        let executor = Arc::new(ThreadExecutor::new());
        assert!(executor.is_controlling_thread());
        let remote = executor.clone();
        let answer = thread::spawn(move || {
            remote.wake();
            remote.is_controlling_thread()
        })
        .join()
        .expect("thread panicked");
        assert!(!answer, "spawned thread is not the controlling thread");
        assert!(executor.wait_for_wake(Duration::from_secs(5)));
    }
}
