// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layouts with a single child.

use alloc::vec;
use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::{Point, Rect, Size, Vec2};

use super::{LayoutEngine, LayoutProxy, Placement, Spacing};
use crate::geometry::{AlignmentKey, EdgeInsets, LayoutDirection, ProposedSize};

/// What a unary layout knows when placing its child.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementContext {
    /// The size the layout chose for itself.
    pub size: Size,
    /// The proposal the layout was sized with.
    pub proposal: ProposedSize,
    /// Safe-area insets of the layout's bounds.
    pub safe_area: EdgeInsets,
    /// The layout direction.
    pub direction: LayoutDirection,
}

/// A layout with exactly one child.
///
/// Like [`Layout`](super::Layout), both functions must be pure. The child is
/// placed exactly once per placement query.
pub trait UnaryLayout: PartialEq + 'static {
    /// Returns this view's size for `proposal`.
    fn size_that_fits(&self, proposal: ProposedSize, child: &LayoutProxy) -> Size;

    /// Places the child within a frame of `context.size` at the origin.
    fn placement(&self, child: &LayoutProxy, context: &PlacementContext) -> Placement;

    /// The view's spacing preferences. Defaults to the child's.
    fn spacing(&self, child: &LayoutProxy) -> Spacing {
        child.spacing().spacing
    }

    /// The view's layout priority. Defaults to the child's.
    fn layout_priority(&self, child: &LayoutProxy) -> f64 {
        child.layout_priority()
    }

    /// Whether the view opts out of automatic padding. Defaults to the
    /// child's answer.
    fn ignores_automatic_padding(&self, child: &LayoutProxy) -> bool {
        child.computer().ignores_automatic_padding()
    }
}

/// Runs a [`UnaryLayout`] as a [`LayoutEngine`], memoizing sizes per
/// proposal and the child frame per bounds.
#[derive(Debug)]
pub struct UnaryLayoutEngine<L> {
    layout: L,
    child: LayoutProxy,
    safe_area: EdgeInsets,
    sizes: HashMap<(u64, u64), Size>,
    frame: Option<(Rect, Rect)>,
}

impl<L: UnaryLayout> UnaryLayoutEngine<L> {
    /// Creates an engine for `layout` around `child`.
    #[must_use]
    pub fn new(layout: L, child: LayoutProxy) -> Self {
        Self {
            layout,
            child,
            safe_area: EdgeInsets::ZERO,
            sizes: HashMap::new(),
            frame: None,
        }
    }

    /// Sets the safe-area insets reported to placement.
    #[must_use]
    pub fn with_safe_area(mut self, safe_area: EdgeInsets) -> Self {
        self.safe_area = safe_area;
        self
    }

    /// The wrapped layout.
    #[must_use]
    pub fn layout(&self) -> &L {
        &self.layout
    }
}

impl<L: UnaryLayout> PartialEq for UnaryLayoutEngine<L> {
    fn eq(&self, other: &Self) -> bool {
        self.layout == other.layout
            && self.child == other.child
            && self.safe_area == other.safe_area
    }
}

impl<L: UnaryLayout> LayoutEngine for UnaryLayoutEngine<L> {
    fn layout_priority(&self) -> f64 {
        self.layout.layout_priority(&self.child)
    }

    fn ignores_automatic_padding(&self) -> bool {
        self.layout.ignores_automatic_padding(&self.child)
    }

    fn spacing(&mut self) -> Spacing {
        self.layout.spacing(&self.child)
    }

    fn size_that_fits(&mut self, proposal: ProposedSize) -> Size {
        let key = proposal.cache_key();
        if let Some(size) = self.sizes.get(&key) {
            return *size;
        }
        let size = self.layout.size_that_fits(proposal, &self.child);
        self.sizes.insert(key, size);
        size
    }

    fn explicit_alignment(&mut self, key: AlignmentKey, size: Size) -> Option<f64> {
        let bounds = Rect::from_origin_size(Point::ZERO, size);
        let frame = self.child_geometries(bounds).first().copied()?;
        let value = self.child.computer().explicit_alignment(key, frame.size())?;
        Some(key.axis().of_point(frame.origin()) + value)
    }

    fn child_geometries(&mut self, bounds: Rect) -> Vec<Rect> {
        if let Some((cached, frame)) = self.frame {
            if cached == bounds {
                return vec![frame];
            }
        }
        let context = PlacementContext {
            size: bounds.size(),
            proposal: ProposedSize::from(bounds.size()),
            safe_area: self.safe_area,
            direction: self.child.direction(),
        };
        let placement = self.layout.placement(&self.child, &context);
        let size = self.child.size_that_fits(placement.proposal);
        let frame = placement.frame(size) + Vec2::new(bounds.x0, bounds.y0);
        self.frame = Some((bounds, frame));
        vec![frame]
    }
}
