// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stack containers.

use alloc::vec::Vec;

use kurbo::{Point, Rect, Size};

use super::{Layout, LayoutSubviews, ViewSpacing};
use crate::geometry::{
    Alignment, AlignmentKey, Axis, EdgeSet, HorizontalAlignment, ProposedSize, UnitPoint,
    VerticalAlignment,
};

/// Per-child facts a stack reuses across size and placement queries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StackCache {
    /// Gap before each child; the first is always zero.
    gaps: Vec<f64>,
    /// Smallest and largest length of each child along the stack axis.
    ranges: Vec<(f64, f64)>,
    priorities: Vec<f64>,
}

impl StackCache {
    fn total_gap(&self) -> f64 {
        self.gaps.iter().sum()
    }
}

/// The shared stacking algorithm.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Stack {
    axis: Axis,
    /// Cross-axis guide children are aligned on.
    alignment: AlignmentKey,
    spacing: Option<f64>,
}

impl Stack {
    fn make_cache(self, subviews: &LayoutSubviews) -> StackCache {
        let axis = self.axis;
        let spacings: Vec<ViewSpacing> = subviews.iter().map(|s| s.spacing()).collect();
        let gaps = (0..subviews.len())
            .map(|i| match (i, self.spacing) {
                (0, _) => 0.0,
                (_, Some(spacing)) => spacing,
                (_, None) => spacings[i - 1].distance(&spacings[i], axis),
            })
            .collect();
        let ranges = subviews
            .iter()
            .map(|s| {
                let len =
                    |p| axis.of_size(s.size_that_fits(ProposedSize::along(axis, Some(p), None)));
                (len(0.0), len(f64::INFINITY))
            })
            .collect();
        let priorities = subviews.iter().map(|s| s.priority()).collect();
        StackCache {
            gaps,
            ranges,
            priorities,
        }
    }

    /// Divides `available` along the axis between the children, most
    /// important and least flexible first.
    fn allocate(
        self,
        available: Option<f64>,
        across: Option<f64>,
        subviews: &LayoutSubviews,
        cache: &StackCache,
    ) -> Vec<Size> {
        let axis = self.axis;
        let n = subviews.len();
        let mut sizes = alloc::vec![Size::ZERO; n];
        let Some(available) = available else {
            for (slot, s) in sizes.iter_mut().zip(subviews.iter()) {
                *slot = s.size_that_fits(ProposedSize::along(axis, None, across));
            }
            return sizes;
        };

        let mut order: Vec<usize> = (0..n).collect();
        let flexibility = |i: usize| cache.ranges[i].1 - cache.ranges[i].0;
        order.sort_by(|&a, &b| {
            cache.priorities[b]
                .total_cmp(&cache.priorities[a])
                .then(flexibility(a).total_cmp(&flexibility(b)))
        });

        let mut remaining = (available - cache.total_gap()).max(0.0);
        for (position, &i) in order.iter().enumerate() {
            let priority = cache.priorities[i];
            let peers = order[position..]
                .iter()
                .filter(|&&j| cache.priorities[j] == priority)
                .count();
            let reserved: f64 = (0..n)
                .filter(|&j| cache.priorities[j] < priority)
                .map(|j| cache.ranges[j].0)
                .sum();
            let share = ((remaining - reserved) / peers as f64).max(0.0);
            let Some(s) = subviews.get(i) else { continue };
            let size = s.size_that_fits(ProposedSize::along(axis, Some(share), across));
            remaining = (remaining - axis.of_size(size)).max(0.0);
            sizes[i] = size;
        }
        sizes
    }

    fn size_that_fits(
        self,
        proposal: ProposedSize,
        subviews: &LayoutSubviews,
        cache: &StackCache,
    ) -> Size {
        let axis = self.axis;
        let sizes = self.allocate(proposal.get(axis), proposal.get(axis.cross()), subviews, cache);
        let along: f64 = sizes.iter().map(|s| axis.of_size(*s)).sum::<f64>() + cache.total_gap();
        let across = sizes
            .iter()
            .map(|s| axis.cross().of_size(*s))
            .fold(0.0, f64::max);
        axis.size(along, across)
    }

    fn place_subviews(self, bounds: Rect, subviews: &LayoutSubviews, cache: &StackCache) {
        let axis = self.axis;
        let cross = axis.cross();
        let size = bounds.size();
        let across = cross.of_size(size);
        let sizes = self.allocate(Some(axis.of_size(size)), Some(across), subviews, cache);

        let proposals: Vec<ProposedSize> = sizes
            .iter()
            .map(|s| ProposedSize::along(axis, Some(axis.of_size(*s)), Some(across)))
            .collect();
        let dims: Vec<_> = subviews
            .iter()
            .zip(&proposals)
            .map(|(s, p)| s.dimensions(*p))
            .collect();

        // Line the children's guides up, then align the whole run in bounds.
        let guide = dims.iter().map(|d| d.get(self.alignment)).fold(0.0, f64::max);
        let extent = dims
            .iter()
            .map(|d| guide - d.get(self.alignment) + cross.of_size(d.size()))
            .fold(0.0, f64::max);
        let start = self.alignment.default_value(axis.size(0.0, extent));
        let shift = self.alignment.default_value(size) - start;

        let origin = bounds.origin();
        let mut along = axis.of_point(origin);
        for (i, s) in subviews.iter().enumerate() {
            along += cache.gaps.get(i).copied().unwrap_or(0.0);
            let offset = guide - dims[i].get(self.alignment) + shift;
            s.place(
                axis.point(along, cross.of_point(origin) + offset),
                UnitPoint::TOP_LEADING,
                proposals[i],
            );
            along += axis.of_size(dims[i].size());
        }
    }

    fn spacing(self, subviews: &LayoutSubviews) -> ViewSpacing {
        let (leading, trailing, sides) = match self.axis {
            Axis::Horizontal => (EdgeSet::LEADING, EdgeSet::TRAILING, EdgeSet::VERTICAL),
            Axis::Vertical => (EdgeSet::TOP, EdgeSet::BOTTOM, EdgeSet::HORIZONTAL),
        };
        let mut spacing = ViewSpacing::zero();
        let n = subviews.len();
        for (i, s) in subviews.iter().enumerate() {
            let mut edges = sides;
            if i == 0 {
                edges |= leading;
            }
            if i + 1 == n {
                edges |= trailing;
            }
            spacing.form_union(&s.spacing(), edges);
        }
        spacing
    }
}

macro_rules! stack_layout {
    ($name:ident, $axis:expr, $alignment:ty, $doc:literal) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, PartialEq)]
        pub struct $name {
            /// Cross-axis alignment of the children.
            pub alignment: $alignment,
            /// Fixed gap between children, or `None` to use their spacing
            /// preferences.
            pub spacing: Option<f64>,
        }

        impl $name {
            /// Creates the stack.
            #[must_use]
            pub const fn new(alignment: $alignment, spacing: Option<f64>) -> Self {
                Self { alignment, spacing }
            }

            fn stack(self) -> Stack {
                Stack {
                    axis: $axis,
                    alignment: self.alignment.0,
                    spacing: self.spacing,
                }
            }
        }

        impl Layout for $name {
            type Cache = StackCache;

            fn make_cache(&self, subviews: &LayoutSubviews) -> StackCache {
                self.stack().make_cache(subviews)
            }

            fn size_that_fits(
                &self,
                proposal: ProposedSize,
                subviews: &LayoutSubviews,
                cache: &mut StackCache,
            ) -> Size {
                self.stack().size_that_fits(proposal, subviews, cache)
            }

            fn place_subviews(
                &self,
                bounds: Rect,
                _proposal: ProposedSize,
                subviews: &LayoutSubviews,
                cache: &mut StackCache,
            ) {
                self.stack().place_subviews(bounds, subviews, cache);
            }

            fn spacing(&self, subviews: &LayoutSubviews, _cache: &mut StackCache) -> ViewSpacing {
                self.stack().spacing(subviews)
            }
        }
    };
}

stack_layout!(
    HStack,
    Axis::Horizontal,
    VerticalAlignment,
    "Arranges children in a row."
);
stack_layout!(
    VStack,
    Axis::Vertical,
    HorizontalAlignment,
    "Arranges children in a column."
);

/// Overlays children, aligning them within a shared frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZStack {
    /// How children align with each other.
    pub alignment: Alignment,
}

impl Layout for ZStack {
    type Cache = ();

    fn make_cache(&self, _subviews: &LayoutSubviews) {}

    fn size_that_fits(
        &self,
        proposal: ProposedSize,
        subviews: &LayoutSubviews,
        _cache: &mut (),
    ) -> Size {
        subviews.iter().fold(Size::ZERO, |acc, s| {
            let size = s.size_that_fits(proposal);
            Size::new(acc.width.max(size.width), acc.height.max(size.height))
        })
    }

    fn place_subviews(
        &self,
        bounds: Rect,
        proposal: ProposedSize,
        subviews: &LayoutSubviews,
        _cache: &mut (),
    ) {
        let h = self.alignment.horizontal.0;
        let v = self.alignment.vertical.0;
        let size = bounds.size();
        for s in subviews.iter() {
            let dims = s.dimensions(proposal);
            let x = bounds.x0 + h.default_value(size) - dims.get(h);
            let y = bounds.y0 + v.default_value(size) - dims.get(v);
            s.place(Point::new(x, y), UnitPoint::TOP_LEADING, proposal);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::LayoutDirection;
    use crate::layout::{LayoutAdapter, LayoutComputer, LayoutEngine, LayoutProxy};

    /// A leaf that takes the proposal within `[min, max]` on both axes.
    #[derive(Debug, PartialEq)]
    struct Clamped {
        min: Size,
        max: Size,
        priority: f64,
    }

    impl LayoutEngine for Clamped {
        fn layout_priority(&self) -> f64 {
            self.priority
        }

        fn size_that_fits(&mut self, proposal: ProposedSize) -> Size {
            let ideal = self.min;
            let s = proposal.fixing_unspecified_with(ideal);
            Size::new(
                s.width.clamp(self.min.width, self.max.width),
                s.height.clamp(self.min.height, self.max.height),
            )
        }
    }

    fn fixed(w: f64, h: f64) -> LayoutComputer {
        let size = Size::new(w, h);
        LayoutComputer::new(Clamped {
            min: size,
            max: size,
            priority: 0.0,
        })
    }

    fn flexible(priority: f64) -> LayoutComputer {
        LayoutComputer::new(Clamped {
            min: Size::ZERO,
            max: Size::new(f64::INFINITY, f64::INFINITY),
            priority,
        })
    }

    fn make_subviews(children: Vec<LayoutComputer>) -> LayoutSubviews {
        LayoutSubviews::new(
            children
                .into_iter()
                .zip(0_u32..)
                .map(|(c, i)| LayoutProxy::new(c, i, LayoutDirection::LeftToRight))
                .collect(),
        )
    }

    #[test]
    fn hstack_ideal_size_sums_with_spacing() {
        let stack = HStack::new(VerticalAlignment::CENTER, Some(5.0));
        let subviews = make_subviews(alloc::vec![fixed(10.0, 4.0), fixed(20.0, 8.0)]);
        let mut cache = stack.make_cache(&subviews);
        let size = stack.size_that_fits(ProposedSize::UNSPECIFIED, &subviews, &mut cache);
        assert_eq!(size, Size::new(35.0, 8.0));
    }

    #[test]
    fn default_spacing_applies_between_children() {
        let stack = VStack::new(HorizontalAlignment::LEADING, None);
        let subviews = make_subviews(alloc::vec![fixed(1.0, 1.0), fixed(1.0, 1.0)]);
        let mut cache = stack.make_cache(&subviews);
        let size = stack.size_that_fits(ProposedSize::UNSPECIFIED, &subviews, &mut cache);
        assert_eq!(size.height, 2.0 + crate::layout::DEFAULT_SPACING);
    }

    #[test]
    fn flexible_children_share_remaining_space() {
        let stack = HStack::new(VerticalAlignment::TOP, Some(0.0));
        let subviews = make_subviews(alloc::vec![flexible(0.0), fixed(20.0, 5.0), flexible(0.0)]);
        let mut cache = stack.make_cache(&subviews);
        let proposal = ProposedSize::new(Some(100.0), Some(5.0));
        let size = stack.size_that_fits(proposal, &subviews, &mut cache);
        assert_eq!(size.width, 100.0);
        let bounds = Rect::new(0.0, 0.0, 100.0, 5.0);
        stack.place_subviews(bounds, ProposedSize::UNSPECIFIED, &subviews, &mut cache);
        assert_eq!(subviews.place_calls(), 3, "each child is placed exactly once");
    }

    #[test]
    fn higher_priority_gets_space_first() {
        let stack = HStack::new(VerticalAlignment::TOP, Some(0.0));
        let subviews = make_subviews(alloc::vec![flexible(0.0), flexible(1.0)]);
        let mut engine = LayoutAdapter::new(stack, subviews.proxies().to_vec());
        let frames = engine.child_geometries(Rect::new(0.0, 0.0, 60.0, 10.0));
        assert_eq!(frames[0].width(), 0.0);
        assert_eq!(frames[1].width(), 60.0);
        assert_eq!(frames[1].x0, 0.0);
    }

    #[test]
    fn hstack_places_in_order_with_alignment() {
        let stack = HStack::new(VerticalAlignment::BOTTOM, Some(2.0));
        let children = alloc::vec![fixed(10.0, 4.0), fixed(10.0, 8.0)];
        let mut engine = LayoutAdapter::new(stack, make_subviews(children).proxies().to_vec());
        let frames = engine.child_geometries(Rect::new(0.0, 0.0, 22.0, 8.0));
        assert_eq!(frames[0], Rect::new(0.0, 4.0, 10.0, 8.0));
        assert_eq!(frames[1], Rect::new(12.0, 0.0, 22.0, 8.0));
    }

    #[test]
    fn zstack_centers_children() {
        let stack = ZStack {
            alignment: Alignment::CENTER,
        };
        let children = alloc::vec![fixed(10.0, 10.0), fixed(4.0, 2.0)];
        let mut engine = LayoutAdapter::new(stack, make_subviews(children).proxies().to_vec());
        assert_eq!(engine.size_that_fits(ProposedSize::UNSPECIFIED), Size::new(10.0, 10.0));
        let frames = engine.child_geometries(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(frames[1], Rect::new(3.0, 4.0, 7.0, 6.0));
    }

    #[test]
    fn rebuilt_cache_gives_same_answers() {
        let stack = HStack::new(VerticalAlignment::CENTER, None);
        let subviews = make_subviews(alloc::vec![fixed(3.0, 3.0), flexible(0.0)]);
        let mut cache = stack.make_cache(&subviews);
        let p = ProposedSize::new(Some(50.0), None);
        let first = stack.size_that_fits(p, &subviews, &mut cache);
        stack.update_cache(&mut cache, &subviews);
        assert_eq!(stack.size_that_fits(p, &subviews, &mut cache), first);
        assert_eq!(cache, stack.make_cache(&subviews));
    }
}
