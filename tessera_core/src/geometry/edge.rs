// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangle edges, edge sets, and insets.

use bitflags::bitflags;

use super::LayoutDirection;

/// A layout-direction-relative edge of a rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    /// The top edge.
    Top,
    /// The leading edge (left in left-to-right layouts).
    Leading,
    /// The bottom edge.
    Bottom,
    /// The trailing edge (right in left-to-right layouts).
    Trailing,
}

/// A physical edge of a rectangle, independent of layout direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AbsoluteEdge {
    /// The top edge.
    Top,
    /// The left edge.
    Left,
    /// The bottom edge.
    Bottom,
    /// The right edge.
    Right,
}

impl AbsoluteEdge {
    /// All four edges in a stable order.
    pub const ALL: [Self; 4] = [Self::Top, Self::Left, Self::Bottom, Self::Right];

    /// Returns the set containing only this edge.
    #[must_use]
    pub const fn set(self) -> AbsoluteEdgeSet {
        match self {
            Self::Top => AbsoluteEdgeSet::TOP,
            Self::Left => AbsoluteEdgeSet::LEFT,
            Self::Bottom => AbsoluteEdgeSet::BOTTOM,
            Self::Right => AbsoluteEdgeSet::RIGHT,
        }
    }
}

bitflags! {
    /// A set of layout-direction-relative edges.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct EdgeSet: u8 {
        /// The top edge.
        const TOP = 1 << 0;
        /// The leading edge.
        const LEADING = 1 << 1;
        /// The bottom edge.
        const BOTTOM = 1 << 2;
        /// The trailing edge.
        const TRAILING = 1 << 3;
        /// Leading and trailing.
        const HORIZONTAL = Self::LEADING.bits() | Self::TRAILING.bits();
        /// Top and bottom.
        const VERTICAL = Self::TOP.bits() | Self::BOTTOM.bits();
    }
}

bitflags! {
    /// A set of physical edges.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct AbsoluteEdgeSet: u8 {
        /// The top edge.
        const TOP = 1 << 0;
        /// The left edge.
        const LEFT = 1 << 1;
        /// The bottom edge.
        const BOTTOM = 1 << 2;
        /// The right edge.
        const RIGHT = 1 << 3;
        /// Left and right.
        const HORIZONTAL = Self::LEFT.bits() | Self::RIGHT.bits();
        /// Top and bottom.
        const VERTICAL = Self::TOP.bits() | Self::BOTTOM.bits();
    }
}

impl AbsoluteEdgeSet {
    /// Resolves relative edges to physical edges for `direction`.
    #[must_use]
    pub fn from_edges(edges: EdgeSet, direction: LayoutDirection) -> Self {
        let mut out = Self::empty();
        if edges.contains(EdgeSet::TOP) {
            out |= Self::TOP;
        }
        if edges.contains(EdgeSet::BOTTOM) {
            out |= Self::BOTTOM;
        }
        let (leading, trailing) = match direction {
            LayoutDirection::LeftToRight => (Self::LEFT, Self::RIGHT),
            LayoutDirection::RightToLeft => (Self::RIGHT, Self::LEFT),
        };
        if edges.contains(EdgeSet::LEADING) {
            out |= leading;
        }
        if edges.contains(EdgeSet::TRAILING) {
            out |= trailing;
        }
        out
    }

    /// Returns whether `edge` is in the set.
    #[inline]
    #[must_use]
    pub fn contains_edge(self, edge: AbsoluteEdge) -> bool {
        self.contains(edge.set())
    }
}

/// Insets from each edge of a rectangle, relative to layout direction.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EdgeInsets {
    /// Inset from the top edge.
    pub top: f64,
    /// Inset from the leading edge.
    pub leading: f64,
    /// Inset from the bottom edge.
    pub bottom: f64,
    /// Inset from the trailing edge.
    pub trailing: f64,
}

impl EdgeInsets {
    /// No insets.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Creates insets.
    #[inline]
    #[must_use]
    pub const fn new(top: f64, leading: f64, bottom: f64, trailing: f64) -> Self {
        Self {
            top,
            leading,
            bottom,
            trailing,
        }
    }

    /// The same inset on every edge.
    #[inline]
    #[must_use]
    pub const fn all(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    /// `value` on the edges in `edges`, zero elsewhere.
    #[must_use]
    pub fn edges(edges: EdgeSet, value: f64) -> Self {
        Self::all(value).in_edges(edges)
    }

    /// Keeps the insets on `edges` and zeroes the rest.
    #[must_use]
    pub fn in_edges(self, edges: EdgeSet) -> Self {
        let pick = |edge, v: f64| if edges.contains(edge) { v } else { 0.0 };
        Self::new(
            pick(EdgeSet::TOP, self.top),
            pick(EdgeSet::LEADING, self.leading),
            pick(EdgeSet::BOTTOM, self.bottom),
            pick(EdgeSet::TRAILING, self.trailing),
        )
    }

    /// Returns the insets with every value negated.
    #[must_use]
    pub fn negated(self) -> Self {
        Self::new(-self.top, -self.leading, -self.bottom, -self.trailing)
    }

    /// Sum of leading and trailing.
    #[inline]
    #[must_use]
    pub fn horizontal(self) -> f64 {
        self.leading + self.trailing
    }

    /// Sum of top and bottom.
    #[inline]
    #[must_use]
    pub fn vertical(self) -> f64 {
        self.top + self.bottom
    }

    /// Returns the edges with a non-zero inset.
    #[must_use]
    pub fn non_zero_edges(self) -> EdgeSet {
        let mut out = EdgeSet::empty();
        out.set(EdgeSet::TOP, self.top != 0.0);
        out.set(EdgeSet::LEADING, self.leading != 0.0);
        out.set(EdgeSet::BOTTOM, self.bottom != 0.0);
        out.set(EdgeSet::TRAILING, self.trailing != 0.0);
        out
    }

    /// Returns the physical left and right insets for `direction`.
    #[must_use]
    pub fn left_right(self, direction: LayoutDirection) -> (f64, f64) {
        match direction {
            LayoutDirection::LeftToRight => (self.leading, self.trailing),
            LayoutDirection::RightToLeft => (self.trailing, self.leading),
        }
    }
}
