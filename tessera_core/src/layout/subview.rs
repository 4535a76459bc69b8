// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Proxies through which a layout sizes and places its children.

use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use kurbo::{Point, Rect, Size};

use super::{LayoutComputer, ViewDimensions, ViewSpacing};
use crate::geometry::{LayoutDirection, ProposedSize, UnitPoint};

/// Where a parent puts a child: the proposal the child is sized with, and
/// the point in the parent's bounds that the child's `anchor` lands on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// The size proposed to the child.
    pub proposal: ProposedSize,
    /// The child's anchor point.
    pub anchor: UnitPoint,
    /// Where the anchor lands, in the parent's coordinate space.
    pub position: Point,
}

impl Placement {
    /// Creates a placement.
    #[must_use]
    pub const fn new(proposal: ProposedSize, anchor: UnitPoint, position: Point) -> Self {
        Self {
            proposal,
            anchor,
            position,
        }
    }

    /// Centers a child in `bounds`, proposing the bounds' size.
    #[must_use]
    pub fn centered(bounds: Rect) -> Self {
        Self::new(bounds.size().into(), UnitPoint::CENTER, bounds.center())
    }

    /// Resolves the child's frame given its size.
    #[must_use]
    pub fn frame(&self, size: Size) -> Rect {
        let offset = self.anchor.in_size(size);
        Rect::from_origin_size(
            Point::new(self.position.x - offset.x, self.position.y - offset.y),
            size,
        )
    }
}

/// A parent's view of one child: its computer, its index among siblings,
/// and the parent's layout direction.
///
/// Proxies are built per layout pass and are not persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutProxy {
    computer: LayoutComputer,
    index: u32,
    direction: LayoutDirection,
}

impl LayoutProxy {
    /// Creates a proxy.
    #[must_use]
    pub fn new(computer: LayoutComputer, index: u32, direction: LayoutDirection) -> Self {
        Self {
            computer,
            index,
            direction,
        }
    }

    /// The child's computer.
    #[inline]
    #[must_use]
    pub fn computer(&self) -> &LayoutComputer {
        &self.computer
    }

    /// The child's index among its siblings.
    #[inline]
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// The parent's layout direction.
    #[inline]
    #[must_use]
    pub const fn direction(&self) -> LayoutDirection {
        self.direction
    }

    /// Returns the child's size for `proposal`.
    #[must_use]
    pub fn size_that_fits(&self, proposal: ProposedSize) -> Size {
        self.computer.size_that_fits(proposal)
    }

    /// Returns the child's dimensions for `proposal`.
    #[must_use]
    pub fn dimensions(&self, proposal: ProposedSize) -> ViewDimensions {
        ViewDimensions::new(self.computer.clone(), self.size_that_fits(proposal))
    }

    /// Returns the child's spacing preferences.
    #[must_use]
    pub fn spacing(&self) -> ViewSpacing {
        ViewSpacing::new(self.computer.spacing(), self.direction)
    }

    /// Returns the child's layout priority.
    #[must_use]
    pub fn layout_priority(&self) -> f64 {
        self.computer.layout_priority()
    }
}

/// The children handed to a [`Layout`](super::Layout) implementation.
#[derive(Debug)]
pub struct LayoutSubviews {
    proxies: Vec<LayoutProxy>,
    placements: RefCell<Vec<Option<Placement>>>,
    place_calls: Cell<usize>,
}

impl LayoutSubviews {
    /// Wraps a list of child proxies.
    #[must_use]
    pub fn new(proxies: Vec<LayoutProxy>) -> Self {
        let placements = RefCell::new(alloc::vec![None; proxies.len()]);
        Self {
            proxies,
            placements,
            place_calls: Cell::new(0),
        }
    }

    /// The number of children.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    /// Whether there are no children.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }

    /// Returns the child at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<LayoutSubview<'_>> {
        self.proxies.get(index).map(|proxy| LayoutSubview {
            proxy,
            slot: index,
            owner: self,
        })
    }

    /// Iterates over the children in order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = LayoutSubview<'_>> + '_ {
        self.proxies
            .iter()
            .enumerate()
            .map(move |(slot, proxy)| LayoutSubview {
                proxy,
                slot,
                owner: self,
            })
    }

    /// The proxies, in order.
    #[must_use]
    pub fn proxies(&self) -> &[LayoutProxy] {
        &self.proxies
    }

    /// How many times [`LayoutSubview::place`] was called since the last
    /// [`take_placements`](Self::take_placements).
    #[must_use]
    pub fn place_calls(&self) -> usize {
        self.place_calls.get()
    }

    /// Removes and returns the placements recorded so far.
    pub(crate) fn take_placements(&self) -> Vec<Option<Placement>> {
        self.place_calls.set(0);
        let mut placements = self.placements.borrow_mut();
        let empty = alloc::vec![None; placements.len()];
        core::mem::replace(&mut *placements, empty)
    }
}

/// One child, as seen by a [`Layout`](super::Layout) implementation.
#[derive(Clone, Copy, Debug)]
pub struct LayoutSubview<'a> {
    proxy: &'a LayoutProxy,
    slot: usize,
    owner: &'a LayoutSubviews,
}

impl<'a> LayoutSubview<'a> {
    /// The underlying proxy.
    #[must_use]
    pub fn proxy(&self) -> &'a LayoutProxy {
        self.proxy
    }

    /// Returns the child's size for `proposal`.
    #[must_use]
    pub fn size_that_fits(&self, proposal: ProposedSize) -> Size {
        self.proxy.size_that_fits(proposal)
    }

    /// Returns the child's dimensions for `proposal`.
    #[must_use]
    pub fn dimensions(&self, proposal: ProposedSize) -> ViewDimensions {
        self.proxy.dimensions(proposal)
    }

    /// Returns the child's spacing preferences.
    #[must_use]
    pub fn spacing(&self) -> ViewSpacing {
        self.proxy.spacing()
    }

    /// Returns the child's layout priority.
    #[must_use]
    pub fn priority(&self) -> f64 {
        self.proxy.layout_priority()
    }

    /// Places the child so that `anchor` lands on `position`, sizing it for
    /// `proposal`.
    ///
    /// A later call for the same child replaces the earlier one.
    pub fn place(&self, position: Point, anchor: UnitPoint, proposal: ProposedSize) {
        self.owner.placements.borrow_mut()[self.slot] =
            Some(Placement::new(proposal, anchor, position));
        self.owner.place_calls.set(self.owner.place_calls.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_subviews(n: u32) -> LayoutSubviews {
        LayoutSubviews::new(
            (0..n)
                .map(|i| LayoutProxy::new(LayoutComputer::default(), i, LayoutDirection::default()))
                .collect(),
        )
    }

    #[test]
    fn placement_frame_respects_anchor() {
        let p = Placement::new(
            ProposedSize::UNSPECIFIED,
            UnitPoint::CENTER,
            Point::new(10.0, 10.0),
        );
        assert_eq!(p.frame(Size::new(4.0, 2.0)), Rect::new(8.0, 9.0, 12.0, 11.0));
    }

    #[test]
    fn place_records_and_take_resets() {
        let subviews = sample_subviews(3);
        for s in subviews.iter() {
            s.place(Point::ZERO, UnitPoint::TOP_LEADING, ProposedSize::ZERO);
        }
        assert_eq!(subviews.place_calls(), 3);
        let placements = subviews.take_placements();
        assert!(placements.iter().all(Option::is_some));
        assert_eq!(subviews.place_calls(), 0);
        assert!(subviews.take_placements().iter().all(Option::is_none));
    }
}
