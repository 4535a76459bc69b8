// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout axes and direction.

use kurbo::{Point, Size};

/// One of the two layout axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The x axis.
    Horizontal,
    /// The y axis.
    Vertical,
}

impl Axis {
    /// Returns the perpendicular axis.
    #[inline]
    #[must_use]
    pub const fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    /// Returns the component of `size` along this axis.
    #[inline]
    #[must_use]
    pub fn of_size(self, size: Size) -> f64 {
        match self {
            Self::Horizontal => size.width,
            Self::Vertical => size.height,
        }
    }

    /// Returns the component of `point` along this axis.
    #[inline]
    #[must_use]
    pub fn of_point(self, point: Point) -> f64 {
        match self {
            Self::Horizontal => point.x,
            Self::Vertical => point.y,
        }
    }

    /// Builds a size from a length along this axis and one across it.
    #[inline]
    #[must_use]
    pub fn size(self, along: f64, across: f64) -> Size {
        match self {
            Self::Horizontal => Size::new(along, across),
            Self::Vertical => Size::new(across, along),
        }
    }

    /// Builds a point from a coordinate along this axis and one across it.
    #[inline]
    #[must_use]
    pub fn point(self, along: f64, across: f64) -> Point {
        match self {
            Self::Horizontal => Point::new(along, across),
            Self::Vertical => Point::new(across, along),
        }
    }
}

/// The direction in which horizontal content flows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LayoutDirection {
    /// Leading edge is on the left.
    #[default]
    LeftToRight,
    /// Leading edge is on the right.
    RightToLeft,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_and_point_swap_on_vertical() {
        assert_eq!(Axis::Vertical.size(3.0, 4.0), Size::new(4.0, 3.0));
        assert_eq!(Axis::Horizontal.point(1.0, 2.0), Point::new(1.0, 2.0));
        assert_eq!(Axis::Vertical.of_size(Size::new(4.0, 3.0)), 3.0);
        assert_eq!(Axis::Horizontal.cross(), Axis::Vertical);
    }
}
