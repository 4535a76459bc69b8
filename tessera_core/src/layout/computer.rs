// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout computers and the engines behind them.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::any::Any;
use core::cell::RefCell;
use core::fmt;

use kurbo::{Rect, Size};

use super::Spacing;
use crate::geometry::{AlignmentKey, Axis, HorizontalAlignment, ProposedSize, VerticalAlignment};

/// The computation behind a [`LayoutComputer`].
///
/// Engines may memoize answers internally (hence `&mut self`), but every
/// query must be a pure function of its arguments and the engine's inputs:
/// asking the same question twice gives the same answer.
pub trait LayoutEngine: Any {
    /// Priority used by containers when distributing space.
    fn layout_priority(&self) -> f64 {
        0.0
    }

    /// Whether containers should skip automatic padding around this view.
    fn ignores_automatic_padding(&self) -> bool {
        false
    }

    /// Preferred spacing around this view.
    fn spacing(&mut self) -> Spacing {
        Spacing::default()
    }

    /// Returns the size this view takes for `proposal`.
    fn size_that_fits(&mut self, proposal: ProposedSize) -> Size;

    /// Returns the length along `axis` for `proposal`.
    fn length_that_fits(&mut self, proposal: ProposedSize, axis: Axis) -> f64 {
        axis.of_size(self.size_that_fits(proposal))
    }

    /// Returns an explicit value for the alignment guide `key` at `size`, or
    /// `None` to use the guide's default.
    fn explicit_alignment(&mut self, key: AlignmentKey, size: Size) -> Option<f64> {
        _ = (key, size);
        None
    }

    /// Returns the frames of this view's children when it occupies `bounds`.
    ///
    /// Leaf views have no children.
    fn child_geometries(&mut self, bounds: Rect) -> Vec<Rect> {
        _ = bounds;
        Vec::new()
    }
}

/// The engine of a view with no layout behavior of its own.
///
/// It answers every proposal with the proposal itself, substituting
/// [`ProposedSize::DEFAULT_LENGTH`] for unspecified dimensions.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DefaultLayoutEngine;

impl LayoutEngine for DefaultLayoutEngine {
    fn size_that_fits(&mut self, proposal: ProposedSize) -> Size {
        proposal.fixing_unspecified()
    }
}

/// A handle answering size and placement queries for one view.
///
/// Computers are cheap to clone; clones share the engine. Two computers are
/// equal when they share an engine and have the same seed, so a graph
/// attribute holding a computer only reports a change when the engine was
/// replaced.
#[derive(Clone)]
pub struct LayoutComputer {
    engine: Rc<RefCell<dyn LayoutEngine>>,
    seed: u32,
}

impl LayoutComputer {
    /// Wraps an engine.
    #[must_use]
    pub fn new(engine: impl LayoutEngine) -> Self {
        Self {
            engine: Rc::new(RefCell::new(engine)),
            seed: 0,
        }
    }

    /// A computer backed by [`DefaultLayoutEngine`].
    #[must_use]
    pub fn default_computer() -> Self {
        Self::new(DefaultLayoutEngine)
    }

    /// Returns the seed, bumped every time the engine is replaced.
    #[inline]
    #[must_use]
    pub const fn seed(&self) -> u32 {
        self.seed
    }

    /// Replaces the engine with `engine` unless the current engine is an
    /// equal value of the same type.
    ///
    /// Returns `true` if the engine was replaced.
    pub fn update_if_not_equal<E: LayoutEngine + PartialEq>(&mut self, engine: E) -> bool {
        {
            let current = self.engine.borrow();
            let current: &dyn Any = &*current;
            if current.downcast_ref::<E>() == Some(&engine) {
                return false;
            }
        }
        self.engine = Rc::new(RefCell::new(engine));
        self.seed = self.seed.wrapping_add(1);
        true
    }

    /// See [`LayoutEngine::size_that_fits`].
    #[must_use]
    pub fn size_that_fits(&self, proposal: ProposedSize) -> Size {
        self.engine.borrow_mut().size_that_fits(proposal)
    }

    /// See [`LayoutEngine::length_that_fits`].
    #[must_use]
    pub fn length_that_fits(&self, proposal: ProposedSize, axis: Axis) -> f64 {
        self.engine.borrow_mut().length_that_fits(proposal, axis)
    }

    /// See [`LayoutEngine::spacing`].
    #[must_use]
    pub fn spacing(&self) -> Spacing {
        self.engine.borrow_mut().spacing()
    }

    /// See [`LayoutEngine::layout_priority`].
    #[must_use]
    pub fn layout_priority(&self) -> f64 {
        self.engine.borrow().layout_priority()
    }

    /// See [`LayoutEngine::ignores_automatic_padding`].
    #[must_use]
    pub fn ignores_automatic_padding(&self) -> bool {
        self.engine.borrow().ignores_automatic_padding()
    }

    /// See [`LayoutEngine::explicit_alignment`].
    #[must_use]
    pub fn explicit_alignment(&self, key: AlignmentKey, size: Size) -> Option<f64> {
        self.engine.borrow_mut().explicit_alignment(key, size)
    }

    /// See [`LayoutEngine::child_geometries`].
    #[must_use]
    pub fn child_geometries(&self, bounds: Rect) -> Vec<Rect> {
        self.engine.borrow_mut().child_geometries(bounds)
    }
}

impl Default for LayoutComputer {
    fn default() -> Self {
        Self::default_computer()
    }
}

impl PartialEq for LayoutComputer {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.engine, &other.engine) && self.seed == other.seed
    }
}

impl fmt::Debug for LayoutComputer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutComputer")
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

/// A view's size together with its alignment guides.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewDimensions {
    computer: LayoutComputer,
    size: Size,
}

impl ViewDimensions {
    /// Dimensions of the view behind `computer` at `size`.
    #[must_use]
    pub fn new(computer: LayoutComputer, size: Size) -> Self {
        Self { computer, size }
    }

    /// The view's size.
    #[inline]
    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    /// The view's width.
    #[inline]
    #[must_use]
    pub fn width(&self) -> f64 {
        self.size.width
    }

    /// The view's height.
    #[inline]
    #[must_use]
    pub fn height(&self) -> f64 {
        self.size.height
    }

    /// Returns the explicit value for `key`, if the view provides one.
    #[must_use]
    pub fn explicit(&self, key: AlignmentKey) -> Option<f64> {
        self.computer.explicit_alignment(key, self.size)
    }

    /// Returns the value of guide `key`, explicit or default.
    #[must_use]
    pub fn get(&self, key: AlignmentKey) -> f64 {
        self.explicit(key)
            .unwrap_or_else(|| key.default_value(self.size))
    }

    /// Returns the value of a horizontal guide.
    #[must_use]
    pub fn horizontal(&self, guide: HorizontalAlignment) -> f64 {
        self.get(guide.0)
    }

    /// Returns the value of a vertical guide.
    #[must_use]
    pub fn vertical(&self, guide: VerticalAlignment) -> f64 {
        self.get(guide.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Fixed(Size);

    impl LayoutEngine for Fixed {
        fn size_that_fits(&mut self, _proposal: ProposedSize) -> Size {
            self.0
        }

        fn explicit_alignment(&mut self, key: AlignmentKey, size: Size) -> Option<f64> {
            (key == VerticalAlignment::CENTER.0).then_some(size.height * 0.25)
        }
    }

    #[test]
    fn default_computer_fixes_unspecified() {
        let c = LayoutComputer::default();
        assert_eq!(c.size_that_fits(ProposedSize::UNSPECIFIED), Size::new(10.0, 10.0));
        assert_eq!(
            c.size_that_fits(ProposedSize::new(Some(3.0), None)),
            Size::new(3.0, 10.0)
        );
        assert_eq!(c.layout_priority(), 0.0);
        assert!(!c.ignores_automatic_padding());
        assert!(c.child_geometries(Rect::ZERO).is_empty());
    }

    #[test]
    fn equality_is_identity_plus_seed() {
        let a = LayoutComputer::new(Fixed(Size::new(1.0, 1.0)));
        let b = a.clone();
        assert_eq!(a, b);
        assert_ne!(a, LayoutComputer::new(Fixed(Size::new(1.0, 1.0))));
    }

    #[test]
    fn update_if_not_equal_bumps_seed_only_on_change() {
        let mut c = LayoutComputer::new(Fixed(Size::new(1.0, 1.0)));
        let before = c.clone();
        assert!(!c.update_if_not_equal(Fixed(Size::new(1.0, 1.0))));
        assert_eq!(c, before);
        assert!(c.update_if_not_equal(Fixed(Size::new(2.0, 2.0))));
        assert_eq!(c.seed(), 1);
        assert_ne!(c, before);
        assert_eq!(c.size_that_fits(ProposedSize::ZERO), Size::new(2.0, 2.0));
        // A different engine type always replaces.
        assert!(c.update_if_not_equal(DefaultLayoutEngine));
    }

    #[test]
    fn dimensions_prefer_explicit_guides() {
        let c = LayoutComputer::new(Fixed(Size::new(4.0, 8.0)));
        let dims = ViewDimensions::new(c, Size::new(4.0, 8.0));
        assert_eq!(dims.vertical(VerticalAlignment::CENTER), 2.0);
        assert_eq!(dims.vertical(VerticalAlignment::BOTTOM), 8.0);
        assert_eq!(dims.horizontal(HorizontalAlignment::CENTER), 2.0);
    }
}
