// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time values for the update cycle.
//!
//! [`Time`] is a point on the host's monotonic timeline, measured in seconds
//! as `f64`. The scheduler compares deadlines with it, the view graph stamps
//! each update with it, and [`Time::INFINITY`] means "no further update
//! requested".

use core::fmt;
use core::ops::{Add, AddAssign, Sub};

/// A point in host time, in seconds.
#[derive(Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Time(pub f64);

impl Time {
    /// The origin of the timeline.
    pub const ZERO: Self = Self(0.0);

    /// A time later than any finite time.
    pub const INFINITY: Self = Self(f64::INFINITY);

    /// Creates a time from whole nanoseconds.
    #[inline]
    #[must_use]
    pub fn from_nanos(nanos: u64) -> Self {
        Self(nanos as f64 * 1e-9)
    }

    /// Returns the time in seconds.
    #[inline]
    #[must_use]
    pub const fn seconds(self) -> f64 {
        self.0
    }

    /// Returns whether this time is finite.
    #[inline]
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    /// Returns the earlier of two times.
    #[inline]
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        Self(self.0.min(other.0))
    }

    /// Returns the later of two times.
    #[inline]
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        Self(self.0.max(other.0))
    }

    /// Returns `self - earlier` in seconds, or `0.0` if `earlier` is later.
    #[inline]
    #[must_use]
    pub fn saturating_since(self, earlier: Self) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }
}

impl fmt::Debug for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_infinite() {
            write!(f, "Time(inf)")
        } else {
            write!(f, "Time({:.6}s)", self.0)
        }
    }
}

impl Add<f64> for Time {
    type Output = Self;

    #[inline]
    fn add(self, rhs: f64) -> Self {
        Self(self.0 + rhs)
    }
}

impl AddAssign<f64> for Time {
    #[inline]
    fn add_assign(&mut self, rhs: f64) {
        self.0 += rhs;
    }
}

impl Sub for Time {
    type Output = f64;

    #[inline]
    fn sub(self, rhs: Self) -> f64 {
        self.0 - rhs.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_nanos_converts_to_seconds() {
        assert_eq!(Time::from_nanos(1_500_000_000), Time(1.5));
    }

    #[test]
    fn infinity_compares_after_everything() {
        assert!(Time(1e12) < Time::INFINITY);
        assert!(!Time::INFINITY.is_finite());
        assert_eq!(Time(3.0).min(Time::INFINITY), Time(3.0));
    }

    #[test]
    fn saturating_since_clamps() {
        assert_eq!(Time(1.0).saturating_since(Time(2.0)), 0.0);
        assert_eq!(Time(2.5).saturating_since(Time(2.0)), 0.5);
    }

    #[test]
    fn arithmetic() {
        let mut t = Time(1.0) + 0.25;
        t += 0.25;
        assert_eq!(t, Time(1.5));
        assert_eq!(Time(2.0) - Time(0.5), 1.5);
    }

    #[test]
    fn debug_format() {
        assert_eq!(alloc::format!("{:?}", Time::INFINITY), "Time(inf)");
        assert_eq!(alloc::format!("{:?}", Time(0.5)), "Time(0.500000s)");
    }
}
