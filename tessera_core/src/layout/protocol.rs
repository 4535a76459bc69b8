// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`Layout`] trait for containers and the engine that runs one.

use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::{Rect, Size};

use super::{LayoutEngine, LayoutProxy, LayoutSubviews, Placement, Spacing, ViewSpacing};
use crate::geometry::{AlignmentKey, EdgeSet, LayoutDirection, ProposedSize};

/// A container layout algorithm.
///
/// Implementations size themselves from their subviews and place each
/// subview. Both operations must be pure functions of their arguments: the
/// optional [`Cache`](Self::Cache) may hold intermediate results, but
/// rebuilding it with [`make_cache`](Self::make_cache) must never change an
/// answer.
pub trait Layout: 'static {
    /// Intermediate results kept between calls on the same subviews.
    type Cache: 'static;

    /// Builds a fresh cache.
    fn make_cache(&self, subviews: &LayoutSubviews) -> Self::Cache;

    /// Refreshes `cache` after the subviews changed. The default rebuilds it.
    fn update_cache(&self, cache: &mut Self::Cache, subviews: &LayoutSubviews) {
        *cache = self.make_cache(subviews);
    }

    /// Returns the container's size for `proposal`.
    ///
    /// An unspecified proposal asks for the ideal size. Zero and infinite
    /// proposals must produce a finite, non-negative size.
    fn size_that_fits(
        &self,
        proposal: ProposedSize,
        subviews: &LayoutSubviews,
        cache: &mut Self::Cache,
    ) -> Size;

    /// Places every subview within `bounds` by calling
    /// [`LayoutSubview::place`](super::LayoutSubview::place) once per child.
    fn place_subviews(
        &self,
        bounds: Rect,
        proposal: ProposedSize,
        subviews: &LayoutSubviews,
        cache: &mut Self::Cache,
    );

    /// Returns the container's spacing preferences. The default is the union
    /// of every subview's preferences on every edge.
    fn spacing(&self, subviews: &LayoutSubviews, cache: &mut Self::Cache) -> ViewSpacing {
        _ = cache;
        let mut spacing = ViewSpacing::zero();
        for subview in subviews.iter() {
            spacing.form_union(&subview.spacing(), EdgeSet::all());
        }
        spacing
    }

    /// Returns an explicit value for guide `key`, or `None` to merge the
    /// subviews' explicit guides.
    fn explicit_alignment(
        &self,
        key: AlignmentKey,
        bounds: Rect,
        proposal: ProposedSize,
        subviews: &LayoutSubviews,
        cache: &mut Self::Cache,
    ) -> Option<f64> {
        _ = (key, bounds, proposal, subviews, cache);
        None
    }
}

/// Runs a [`Layout`] as a [`LayoutEngine`].
///
/// Sizes are memoized per proposal and frames per bounds, so repeated
/// queries within one update do not rerun the algorithm.
pub struct LayoutAdapter<L: Layout> {
    layout: L,
    subviews: LayoutSubviews,
    cache: Option<L::Cache>,
    sizes: HashMap<(u64, u64), Size>,
    frames: Option<(Rect, Vec<Rect>)>,
}

impl<L: Layout> core::fmt::Debug for LayoutAdapter<L> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LayoutAdapter")
            .field("subviews", &self.subviews.len())
            .field("cached_sizes", &self.sizes.len())
            .finish_non_exhaustive()
    }
}

impl<L: Layout> LayoutAdapter<L> {
    /// Creates an engine running `layout` over `children`.
    #[must_use]
    pub fn new(layout: L, children: Vec<LayoutProxy>) -> Self {
        Self {
            layout,
            subviews: LayoutSubviews::new(children),
            cache: None,
            sizes: HashMap::new(),
            frames: None,
        }
    }

    /// Replaces the children, refreshing the layout cache and dropping
    /// memoized answers.
    pub fn set_children(&mut self, children: Vec<LayoutProxy>) {
        self.subviews = LayoutSubviews::new(children);
        if let Some(cache) = self.cache.as_mut() {
            self.layout.update_cache(cache, &self.subviews);
        }
        self.sizes.clear();
        self.frames = None;
    }

    fn cache(&mut self) -> &mut L::Cache {
        let Self {
            layout,
            subviews,
            cache,
            ..
        } = self;
        cache.get_or_insert_with(|| layout.make_cache(subviews))
    }

    /// Runs placement and resolves each child's frame. Children the layout
    /// did not place are centered in `bounds`.
    fn place(&mut self, bounds: Rect) -> Vec<Rect> {
        let proposal = ProposedSize::from(bounds.size());
        self.cache();
        if let Some(cache) = self.cache.as_mut() {
            self.layout
                .place_subviews(bounds, proposal, &self.subviews, cache);
        }
        let placements = self.subviews.take_placements();
        placements
            .into_iter()
            .zip(self.subviews.proxies())
            .map(|(placement, proxy)| {
                let placement = placement.unwrap_or_else(|| Placement::centered(bounds));
                placement.frame(proxy.size_that_fits(placement.proposal))
            })
            .collect()
    }
}

impl<L: Layout> LayoutEngine for LayoutAdapter<L> {
    fn spacing(&mut self) -> Spacing {
        self.cache();
        match self.cache.as_mut() {
            Some(cache) => self.layout.spacing(&self.subviews, cache).spacing,
            None => Spacing::default(),
        }
    }

    fn size_that_fits(&mut self, proposal: ProposedSize) -> Size {
        let key = proposal.cache_key();
        if let Some(size) = self.sizes.get(&key) {
            return *size;
        }
        self.cache();
        let size = match self.cache.as_mut() {
            Some(cache) => self.layout.size_that_fits(proposal, &self.subviews, cache),
            None => proposal.fixing_unspecified(),
        };
        debug_assert!(
            size.width >= 0.0 && size.height >= 0.0,
            "layout produced a negative size {size:?}"
        );
        self.sizes.insert(key, size);
        size
    }

    fn explicit_alignment(&mut self, key: AlignmentKey, size: Size) -> Option<f64> {
        let bounds = Rect::from_origin_size(kurbo::Point::ZERO, size);
        self.cache();
        if let Some(cache) = self.cache.as_mut() {
            let explicit = self.layout.explicit_alignment(
                key,
                bounds,
                ProposedSize::from(size),
                &self.subviews,
                cache,
            );
            if explicit.is_some() {
                return explicit;
            }
        }
        // Average the children's explicit guides, in our coordinate space.
        let frames = self.child_geometries(bounds);
        let axis = key.axis();
        let mut sum = 0.0;
        let mut count = 0_u32;
        for (frame, proxy) in frames.iter().zip(self.subviews.proxies()) {
            if let Some(value) = proxy.computer().explicit_alignment(key, frame.size()) {
                sum += axis.of_point(frame.origin()) + value;
                count += 1;
            }
        }
        (count > 0).then(|| sum / f64::from(count))
    }

    fn child_geometries(&mut self, bounds: Rect) -> Vec<Rect> {
        if let Some((cached, frames)) = &self.frames {
            if *cached == bounds {
                return frames.clone();
            }
        }
        let frames = self.place(bounds);
        self.frames = Some((bounds, frames.clone()));
        frames
    }
}

/// Wraps `computers` as proxies indexed in order.
pub(crate) fn proxies_for(
    computers: impl IntoIterator<Item = super::LayoutComputer>,
    direction: LayoutDirection,
) -> Vec<LayoutProxy> {
    computers
        .into_iter()
        .zip(0_u32..)
        .map(|(computer, index)| LayoutProxy::new(computer, index, direction))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::UnitPoint;
    use crate::layout::LayoutComputer;
    use core::cell::Cell;
    use kurbo::Point;

    /// Lays children out in a row at their ideal sizes.
    struct Row {
        runs: Cell<u32>,
        skip_last: bool,
    }

    impl Layout for Row {
        type Cache = ();

        fn make_cache(&self, _subviews: &LayoutSubviews) {}

        fn size_that_fits(
            &self,
            _proposal: ProposedSize,
            subviews: &LayoutSubviews,
            _cache: &mut (),
        ) -> Size {
            self.runs.set(self.runs.get() + 1);
            subviews.iter().fold(Size::ZERO, |acc, s| {
                let size = s.size_that_fits(ProposedSize::UNSPECIFIED);
                Size::new(acc.width + size.width, acc.height.max(size.height))
            })
        }

        fn place_subviews(
            &self,
            bounds: Rect,
            _proposal: ProposedSize,
            subviews: &LayoutSubviews,
            _cache: &mut (),
        ) {
            let mut x = bounds.x0;
            let n = subviews.len();
            for (i, s) in subviews.iter().enumerate() {
                if self.skip_last && i + 1 == n {
                    break;
                }
                s.place(
                    Point::new(x, bounds.y0),
                    UnitPoint::TOP_LEADING,
                    ProposedSize::UNSPECIFIED,
                );
                x += s.size_that_fits(ProposedSize::UNSPECIFIED).width;
            }
        }
    }

    fn make_row(n: usize, skip_last: bool) -> LayoutAdapter<Row> {
        let children = proxies_for(
            (0..n).map(|_| LayoutComputer::default()),
            LayoutDirection::LeftToRight,
        );
        LayoutAdapter::new(
            Row {
                runs: Cell::new(0),
                skip_last,
            },
            children,
        )
    }

    #[test]
    fn size_is_pure_and_memoized() {
        let mut row = make_row(3, false);
        let a = row.size_that_fits(ProposedSize::UNSPECIFIED);
        let b = row.size_that_fits(ProposedSize::UNSPECIFIED);
        assert_eq!(a, b);
        assert_eq!(a, Size::new(30.0, 10.0));
        assert_eq!(row.layout.runs.get(), 1, "second query hits the memo");
    }

    #[test]
    fn every_child_gets_one_frame() {
        let mut row = make_row(4, false);
        let frames = row.child_geometries(Rect::new(0.0, 0.0, 40.0, 10.0));
        assert_eq!(frames.len(), 4);
        assert_eq!(frames[3], Rect::new(30.0, 0.0, 40.0, 10.0));
    }

    #[test]
    fn unplaced_children_are_centered() {
        let mut row = make_row(2, true);
        let frames = row.child_geometries(Rect::new(0.0, 0.0, 50.0, 20.0));
        assert_eq!(frames.len(), 2);
        // Centered default placement proposes the full bounds.
        assert_eq!(frames[1], Rect::new(0.0, 0.0, 50.0, 20.0));
    }

    #[test]
    fn set_children_drops_memo() {
        let mut row = make_row(1, false);
        assert_eq!(row.size_that_fits(ProposedSize::UNSPECIFIED).width, 10.0);
        row.set_children(proxies_for(
            [LayoutComputer::default(), LayoutComputer::default()],
            LayoutDirection::LeftToRight,
        ));
        assert_eq!(row.size_that_fits(ProposedSize::UNSPECIFIED).width, 20.0);
    }
}
