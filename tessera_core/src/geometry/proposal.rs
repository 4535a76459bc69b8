// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Proposed sizes.

use kurbo::Size;

use super::{Axis, EdgeInsets};

/// A size proposed by a parent to a child, where either dimension may be left
/// unspecified (`None`) to ask for the child's ideal length on that axis.
///
/// `Some(0.0)` asks for the minimum size and `Some(f64::INFINITY)` for the
/// maximum.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ProposedSize {
    /// Proposed width, or `None` for the ideal width.
    pub width: Option<f64>,
    /// Proposed height, or `None` for the ideal height.
    pub height: Option<f64>,
}

impl ProposedSize {
    /// Proposes zero in both dimensions.
    pub const ZERO: Self = Self::new(Some(0.0), Some(0.0));

    /// Proposes infinity in both dimensions.
    pub const INFINITY: Self = Self::new(Some(f64::INFINITY), Some(f64::INFINITY));

    /// Leaves both dimensions unspecified.
    pub const UNSPECIFIED: Self = Self::new(None, None);

    /// The length used for unspecified dimensions by views with no better
    /// answer.
    pub const DEFAULT_LENGTH: f64 = 10.0;

    /// Creates a proposal.
    #[inline]
    #[must_use]
    pub const fn new(width: Option<f64>, height: Option<f64>) -> Self {
        Self { width, height }
    }

    /// Returns the dimension along `axis`.
    #[inline]
    #[must_use]
    pub fn get(self, axis: Axis) -> Option<f64> {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Replaces the dimension along `axis`.
    #[inline]
    pub fn set(&mut self, axis: Axis, value: Option<f64>) {
        match axis {
            Axis::Horizontal => self.width = value,
            Axis::Vertical => self.height = value,
        }
    }

    /// Builds a proposal from a length along `axis` and one across it.
    #[inline]
    #[must_use]
    pub fn along(axis: Axis, along: Option<f64>, across: Option<f64>) -> Self {
        match axis {
            Axis::Horizontal => Self::new(along, across),
            Axis::Vertical => Self::new(across, along),
        }
    }

    /// Returns whether both dimensions are specified.
    #[inline]
    #[must_use]
    pub fn is_fully_specified(self) -> bool {
        self.width.is_some() && self.height.is_some()
    }

    /// Replaces unspecified dimensions with [`DEFAULT_LENGTH`](Self::DEFAULT_LENGTH).
    #[inline]
    #[must_use]
    pub fn fixing_unspecified(self) -> Size {
        self.fixing_unspecified_with(Size::new(Self::DEFAULT_LENGTH, Self::DEFAULT_LENGTH))
    }

    /// Replaces unspecified dimensions with those of `fallback`.
    #[inline]
    #[must_use]
    pub fn fixing_unspecified_with(self, fallback: Size) -> Size {
        Size::new(
            self.width.unwrap_or(fallback.width),
            self.height.unwrap_or(fallback.height),
        )
    }

    /// Shrinks specified dimensions by `insets`, never below zero.
    ///
    /// Negative insets grow the proposal.
    #[must_use]
    pub fn inset(self, insets: EdgeInsets) -> Self {
        Self::new(
            self.width.map(|w| (w - insets.horizontal()).max(0.0)),
            self.height.map(|h| (h - insets.vertical()).max(0.0)),
        )
    }

    /// Returns a bit pattern usable as a cache key.
    #[must_use]
    pub(crate) fn cache_key(self) -> (u64, u64) {
        const NONE: u64 = u64::MAX;
        (
            self.width.map_or(NONE, f64::to_bits),
            self.height.map_or(NONE, f64::to_bits),
        )
    }
}

impl From<Size> for ProposedSize {
    fn from(size: Size) -> Self {
        Self::new(Some(size.width), Some(size.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixing_unspecified_uses_default_length() {
        let p = ProposedSize::new(Some(30.0), None);
        assert_eq!(p.fixing_unspecified(), Size::new(30.0, 10.0));
        assert_eq!(ProposedSize::UNSPECIFIED.fixing_unspecified(), Size::new(10.0, 10.0));
    }

    #[test]
    fn inset_clamps_at_zero_and_keeps_unspecified() {
        let p = ProposedSize::new(Some(10.0), None);
        let insets = EdgeInsets::new(1.0, 8.0, 1.0, 8.0);
        assert_eq!(p.inset(insets), ProposedSize::new(Some(0.0), None));
    }

    #[test]
    fn negative_inset_grows() {
        let p = ProposedSize::from(Size::new(10.0, 10.0));
        assert_eq!(
            p.inset(EdgeInsets::all(-5.0)),
            ProposedSize::new(Some(20.0), Some(20.0))
        );
    }

    #[test]
    fn axis_accessors() {
        let mut p = ProposedSize::UNSPECIFIED;
        p.set(Axis::Vertical, Some(4.0));
        assert_eq!(p.get(Axis::Vertical), Some(4.0));
        assert_eq!(p.get(Axis::Horizontal), None);
        assert_eq!(
            ProposedSize::along(Axis::Vertical, Some(1.0), Some(2.0)),
            ProposedSize::new(Some(2.0), Some(1.0))
        );
    }

    #[test]
    fn cache_key_distinguishes_none_from_zero() {
        assert_ne!(
            ProposedSize::ZERO.cache_key(),
            ProposedSize::UNSPECIFIED.cache_key()
        );
    }
}
