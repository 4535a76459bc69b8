// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spatial damage tracking for partial re-rendering.

use alloc::vec::Vec;

use kurbo::Rect;

/// A region of the output that needs re-rendering.
///
/// Renderers can use this to only redraw areas that changed since the last
/// update.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum DamageRegion {
    /// The entire output needs redrawing.
    #[default]
    Full,
    /// Axis-aligned rectangles that need redrawing, in root coordinates.
    Rects(Vec<Rect>),
    /// Nothing changed; the previous output can be reused.
    None,
}

impl DamageRegion {
    /// Returns `true` if no region needs redrawing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Adds one rectangle. Empty rectangles are ignored.
    pub fn add_rect(&mut self, rect: Rect) {
        if rect.is_zero_area() {
            return;
        }
        match self {
            Self::Full => {}
            Self::Rects(rects) => rects.push(rect),
            Self::None => *self = Self::Rects(alloc::vec![rect]),
        }
    }

    /// Merges another damage region into this one.
    pub fn merge(&mut self, other: &Self) {
        match (&*self, other) {
            (Self::Full, _) | (_, Self::Full) => *self = Self::Full,
            (Self::None, _) => *self = other.clone(),
            (_, Self::None) => {}
            (Self::Rects(a), Self::Rects(b)) => {
                let mut merged = a.clone();
                merged.extend_from_slice(b);
                *self = Self::Rects(merged);
            }
        }
    }

    /// Returns the smallest rectangle covering the damage, or `None` for
    /// [`Full`](Self::Full) and [`None`](Self::None).
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            Self::Rects(rects) => rects.iter().copied().reduce(|a, b| a.union(b)),
            Self::Full | Self::None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_rect_starts_from_none() {
        let mut damage = DamageRegion::None;
        damage.add_rect(Rect::ZERO);
        assert!(damage.is_empty(), "zero-area rects add nothing");
        damage.add_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        damage.add_rect(Rect::new(20.0, 0.0, 30.0, 5.0));
        assert_eq!(damage.bounds(), Some(Rect::new(0.0, 0.0, 30.0, 10.0)));
    }

    #[test]
    fn full_absorbs_everything() {
        let mut damage = DamageRegion::Rects(alloc::vec![Rect::new(0.0, 0.0, 1.0, 1.0)]);
        damage.merge(&DamageRegion::Full);
        assert_eq!(damage, DamageRegion::Full);
        damage.add_rect(Rect::new(0.0, 0.0, 5.0, 5.0));
        assert_eq!(damage, DamageRegion::Full);
        assert_eq!(damage.bounds(), None);
    }

    #[test]
    fn merge_concatenates_rects() {
        let mut a = DamageRegion::None;
        a.merge(&DamageRegion::Rects(alloc::vec![Rect::new(0.0, 0.0, 1.0, 1.0)]));
        a.merge(&DamageRegion::Rects(alloc::vec![Rect::new(2.0, 2.0, 3.0, 3.0)]));
        a.merge(&DamageRegion::None);
        let DamageRegion::Rects(rects) = a else {
            panic!("expected rects");
        };
        assert_eq!(rects.len(), 2);
    }
}
