// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The update timer.

use tessera_core::time::Time;

/// The coarse timer behind far-off update requests.
///
/// Holds at most one deadline. A later request never pushes back an earlier
/// one, and an earlier request replaces the armed deadline outright, so a
/// superseded deadline can never fire.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UpdateTimer {
    deadline: Option<Time>,
}

impl UpdateTimer {
    /// Creates a disarmed timer.
    #[must_use]
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Returns the armed deadline.
    #[must_use]
    pub fn deadline(&self) -> Option<Time> {
        self.deadline
    }

    /// Arms the timer for `at` unless it already fires no later.
    ///
    /// Returns whether the deadline changed.
    pub fn schedule(&mut self, at: Time) -> bool {
        match self.deadline {
            Some(armed) if armed <= at => false,
            _ => {
                self.deadline = Some(at);
                true
            }
        }
    }

    /// Disarms the timer, returning the deadline it had.
    pub fn cancel(&mut self) -> Option<Time> {
        self.deadline.take()
    }

    /// Disarms the timer if its deadline has passed. Returns whether it
    /// fired.
    pub fn fire(&mut self, now: Time) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earlier_deadline_wins() {
        let mut timer = UpdateTimer::new();
        assert!(timer.schedule(Time(2.0)), "first request arms the timer");
        assert!(!timer.schedule(Time(3.0)), "later request is ignored");
        assert!(timer.schedule(Time(1.0)), "earlier request replaces");
        assert_eq!(timer.deadline(), Some(Time(1.0)));
    }

    #[test]
    fn fires_once_when_due() {
        let mut timer = UpdateTimer::new();
        timer.schedule(Time(1.0));
        assert!(!timer.fire(Time(0.5)));
        assert!(timer.fire(Time(1.0)));
        assert!(!timer.fire(Time(2.0)), "a fired timer is disarmed");
    }
}
