// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Alignment guides and two-axis alignments.

use kurbo::{Point, Size};

use super::Axis;

/// Identifies an alignment guide on one axis.
///
/// The built-in guides sit at the start, middle, and end of the axis. Custom
/// guides default to the start until a view supplies an explicit value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AlignmentKey {
    axis: Axis,
    id: u16,
}

impl AlignmentKey {
    const START: u16 = 0;
    const MIDDLE: u16 = 1;
    const END: u16 = 2;
    const FIRST_CUSTOM: u16 = 16;

    /// Creates a custom guide. Distinct `id`s give distinct guides.
    #[must_use]
    pub const fn custom(axis: Axis, id: u16) -> Self {
        Self {
            axis,
            id: Self::FIRST_CUSTOM + id,
        }
    }

    /// Returns the axis this guide positions along.
    #[inline]
    #[must_use]
    pub const fn axis(self) -> Axis {
        self.axis
    }

    /// Returns the guide's value for a view of `size` that has no explicit
    /// override.
    #[must_use]
    pub fn default_value(self, size: Size) -> f64 {
        let length = self.axis.of_size(size);
        match self.id {
            Self::MIDDLE => length * 0.5,
            Self::END => length,
            _ => 0.0,
        }
    }
}

/// A guide for aligning views horizontally.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HorizontalAlignment(pub AlignmentKey);

impl HorizontalAlignment {
    /// Align leading edges.
    pub const LEADING: Self = Self(AlignmentKey {
        axis: Axis::Horizontal,
        id: AlignmentKey::START,
    });
    /// Align centers.
    pub const CENTER: Self = Self(AlignmentKey {
        axis: Axis::Horizontal,
        id: AlignmentKey::MIDDLE,
    });
    /// Align trailing edges.
    pub const TRAILING: Self = Self(AlignmentKey {
        axis: Axis::Horizontal,
        id: AlignmentKey::END,
    });
}

/// A guide for aligning views vertically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VerticalAlignment(pub AlignmentKey);

impl VerticalAlignment {
    /// Align top edges.
    pub const TOP: Self = Self(AlignmentKey {
        axis: Axis::Vertical,
        id: AlignmentKey::START,
    });
    /// Align centers.
    pub const CENTER: Self = Self(AlignmentKey {
        axis: Axis::Vertical,
        id: AlignmentKey::MIDDLE,
    });
    /// Align bottom edges.
    pub const BOTTOM: Self = Self(AlignmentKey {
        axis: Axis::Vertical,
        id: AlignmentKey::END,
    });
}

/// A pair of horizontal and vertical guides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Alignment {
    /// The horizontal guide.
    pub horizontal: HorizontalAlignment,
    /// The vertical guide.
    pub vertical: VerticalAlignment,
}

impl Alignment {
    /// Centered on both axes.
    pub const CENTER: Self = Self::new(HorizontalAlignment::CENTER, VerticalAlignment::CENTER);
    /// Top-leading corner.
    pub const TOP_LEADING: Self = Self::new(HorizontalAlignment::LEADING, VerticalAlignment::TOP);
    /// Bottom-trailing corner.
    pub const BOTTOM_TRAILING: Self =
        Self::new(HorizontalAlignment::TRAILING, VerticalAlignment::BOTTOM);
    /// Top edge, centered horizontally.
    pub const TOP: Self = Self::new(HorizontalAlignment::CENTER, VerticalAlignment::TOP);
    /// Leading edge, centered vertically.
    pub const LEADING: Self = Self::new(HorizontalAlignment::LEADING, VerticalAlignment::CENTER);

    /// Creates an alignment.
    #[must_use]
    pub const fn new(horizontal: HorizontalAlignment, vertical: VerticalAlignment) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Returns the guide for `axis`.
    #[must_use]
    pub const fn key(self, axis: Axis) -> AlignmentKey {
        match axis {
            Axis::Horizontal => self.horizontal.0,
            Axis::Vertical => self.vertical.0,
        }
    }
}

/// A point in a unit square, used as a placement anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitPoint {
    /// Fraction of the width.
    pub x: f64,
    /// Fraction of the height.
    pub y: f64,
}

impl UnitPoint {
    /// The origin.
    pub const TOP_LEADING: Self = Self { x: 0.0, y: 0.0 };
    /// The middle.
    pub const CENTER: Self = Self { x: 0.5, y: 0.5 };
    /// The far corner.
    pub const BOTTOM_TRAILING: Self = Self { x: 1.0, y: 1.0 };

    /// Returns the point scaled into `size`.
    #[must_use]
    pub fn in_size(self, size: Size) -> Point {
        Point::new(self.x * size.width, self.y * size.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_defaults() {
        let size = Size::new(10.0, 20.0);
        assert_eq!(HorizontalAlignment::CENTER.0.default_value(size), 5.0);
        assert_eq!(VerticalAlignment::BOTTOM.0.default_value(size), 20.0);
        assert_eq!(AlignmentKey::custom(Axis::Vertical, 1).default_value(size), 0.0);
    }

    #[test]
    fn unit_point_scales() {
        assert_eq!(UnitPoint::CENTER.in_size(Size::new(4.0, 8.0)), Point::new(2.0, 4.0));
    }
}
