// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-child layouts: aspect ratio, fixed size, safe-area ignoring,
//! padding, frames, priority and spacing overrides.

use kurbo::{Point, Size};

use super::{LayoutProxy, Placement, PlacementContext, Spacing, UnaryLayout};
use crate::geometry::{
    AbsoluteEdgeSet, Alignment, Axis, EdgeInsets, EdgeSet, ProposedSize, UnitPoint,
};

/// Positions a child of `proposal` so its guides line up with ours under
/// `alignment`.
fn aligned(
    child: &LayoutProxy,
    size: Size,
    alignment: Alignment,
    proposal: ProposedSize,
) -> Placement {
    let dims = child.dimensions(proposal);
    let h = alignment.horizontal.0;
    let v = alignment.vertical.0;
    let x = h.default_value(size) - dims.get(h);
    let y = v.default_value(size) - dims.get(v);
    Placement::new(proposal, UnitPoint::TOP_LEADING, Point::new(x, y))
}

fn centered(size: Size, proposal: ProposedSize) -> Placement {
    Placement::new(proposal, UnitPoint::CENTER, UnitPoint::CENTER.in_size(size))
}

/// How content scales into a proposal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ContentMode {
    /// Scale to fit inside the proposal.
    #[default]
    Fit,
    /// Scale to fill the proposal, possibly overflowing it.
    Fill,
}

/// Constrains a child to an aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AspectRatioLayout {
    /// Width over height, or `None` to use the child's ideal size.
    pub ratio: Option<f64>,
    /// Fit or fill.
    pub mode: ContentMode,
}

impl AspectRatioLayout {
    /// Creates the layout.
    #[must_use]
    pub const fn new(ratio: Option<f64>, mode: ContentMode) -> Self {
        Self { ratio, mode }
    }

    fn offered(&self, child: &LayoutProxy, proposal: ProposedSize) -> ProposedSize {
        if proposal == ProposedSize::UNSPECIFIED {
            return proposal;
        }
        let size = match self.ratio {
            Some(ratio) => Size::new(ratio, 1.0),
            None => child.size_that_fits(ProposedSize::UNSPECIFIED),
        };
        let size = if size.width == size.height {
            Size::new(1.0, 1.0)
        } else {
            size
        };
        let scale_on = |target: Option<f64>, length: f64| match target {
            Some(t) if length != 0.0 || t != 0.0 => t / length,
            _ => f64::INFINITY,
        };
        let sx = scale_on(proposal.width, size.width);
        let sy = scale_on(proposal.height, size.height);
        let scale = match self.mode {
            ContentMode::Fit => sx.min(sy),
            // An unspecified axis scales infinitely; fill then follows the
            // specified one.
            ContentMode::Fill if sx.is_infinite() || sy.is_infinite() => sx.min(sy),
            ContentMode::Fill => sx.max(sy),
        };
        ProposedSize::from(size * scale)
    }
}

impl UnaryLayout for AspectRatioLayout {
    fn size_that_fits(&self, proposal: ProposedSize, child: &LayoutProxy) -> Size {
        child.size_that_fits(self.offered(child, proposal))
    }

    fn placement(&self, child: &LayoutProxy, context: &PlacementContext) -> Placement {
        centered(context.size, self.offered(child, context.proposal))
    }
}

/// Proposes `None` to the child on the fixed axes, so it takes its ideal
/// length there.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedSizeLayout {
    /// Fix the width.
    pub horizontal: bool,
    /// Fix the height.
    pub vertical: bool,
}

impl FixedSizeLayout {
    fn child_proposal(self, proposal: ProposedSize) -> ProposedSize {
        ProposedSize::new(
            if self.horizontal { None } else { proposal.width },
            if self.vertical { None } else { proposal.height },
        )
    }
}

impl Default for FixedSizeLayout {
    fn default() -> Self {
        Self {
            horizontal: true,
            vertical: true,
        }
    }
}

impl UnaryLayout for FixedSizeLayout {
    fn size_that_fits(&self, proposal: ProposedSize, child: &LayoutProxy) -> Size {
        child.size_that_fits(self.child_proposal(proposal))
    }

    fn placement(&self, _child: &LayoutProxy, context: &PlacementContext) -> Placement {
        centered(context.size, self.child_proposal(context.proposal))
    }
}

/// Extends the child into the safe-area insets on `edges`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SafeAreaIgnoringLayout {
    /// The edges whose safe area the child may cover.
    pub edges: EdgeSet,
}

impl Default for SafeAreaIgnoringLayout {
    fn default() -> Self {
        Self {
            edges: EdgeSet::all(),
        }
    }
}

impl UnaryLayout for SafeAreaIgnoringLayout {
    fn size_that_fits(&self, proposal: ProposedSize, child: &LayoutProxy) -> Size {
        child.size_that_fits(proposal)
    }

    fn placement(&self, _child: &LayoutProxy, context: &PlacementContext) -> Placement {
        let insets = context.safe_area.in_edges(self.edges);
        let (left, _) = insets.left_right(context.direction);
        Placement::new(
            context.proposal.inset(insets.negated()),
            UnitPoint::TOP_LEADING,
            Point::new(-left, -insets.top),
        )
    }

    fn ignores_automatic_padding(&self, _child: &LayoutProxy) -> bool {
        true
    }
}

/// Insets the child.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaddingLayout {
    /// The insets applied around the child.
    pub insets: EdgeInsets,
}

impl PaddingLayout {
    /// The padding used when none is given.
    pub const DEFAULT_LENGTH: f64 = 16.0;

    /// Pads `edges` by `length`, or by [`DEFAULT_LENGTH`](Self::DEFAULT_LENGTH).
    #[must_use]
    pub fn new(edges: EdgeSet, length: Option<f64>) -> Self {
        Self {
            insets: EdgeInsets::edges(edges, length.unwrap_or(Self::DEFAULT_LENGTH)),
        }
    }
}

impl UnaryLayout for PaddingLayout {
    fn size_that_fits(&self, proposal: ProposedSize, child: &LayoutProxy) -> Size {
        let size = child.size_that_fits(proposal.inset(self.insets));
        Size::new(
            size.width + self.insets.horizontal(),
            size.height + self.insets.vertical(),
        )
    }

    fn placement(&self, child: &LayoutProxy, context: &PlacementContext) -> Placement {
        let (left, _) = self.insets.left_right(child.direction());
        Placement::new(
            context.proposal.inset(self.insets),
            UnitPoint::TOP_LEADING,
            Point::new(left, self.insets.top),
        )
    }

    fn spacing(&self, child: &LayoutProxy) -> Spacing {
        let mut spacing = child.spacing().spacing;
        let edges = self.insets.non_zero_edges();
        spacing.reset(AbsoluteEdgeSet::from_edges(edges, child.direction()));
        spacing
    }

    fn ignores_automatic_padding(&self, _child: &LayoutProxy) -> bool {
        true
    }
}

/// A frame with fixed dimensions on zero, one, or both axes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameLayout {
    width: Option<f64>,
    height: Option<f64>,
    alignment: Alignment,
}

impl FrameLayout {
    /// Creates a frame. Negative or non-finite dimensions are ignored.
    #[must_use]
    pub fn new(width: Option<f64>, height: Option<f64>, alignment: Alignment) -> Self {
        let valid = |v: f64| v >= 0.0 && v.is_finite();
        Self {
            width: width.filter(|w| valid(*w)),
            height: height.filter(|h| valid(*h)),
            alignment,
        }
    }
}

impl UnaryLayout for FrameLayout {
    fn size_that_fits(&self, proposal: ProposedSize, child: &LayoutProxy) -> Size {
        if let (Some(width), Some(height)) = (self.width, self.height) {
            return Size::new(width, height);
        }
        let size = child.size_that_fits(ProposedSize::new(
            self.width.or(proposal.width),
            self.height.or(proposal.height),
        ));
        Size::new(
            self.width.unwrap_or(size.width),
            self.height.unwrap_or(size.height),
        )
    }

    fn placement(&self, child: &LayoutProxy, context: &PlacementContext) -> Placement {
        let proposal = ProposedSize::new(
            self.width.or(context.proposal.width),
            self.height.or(context.proposal.height),
        );
        aligned(child, context.size, self.alignment, proposal)
    }

    fn spacing(&self, child: &LayoutProxy) -> Spacing {
        let mut spacing = child.spacing().spacing;
        let mut edges = EdgeSet::empty();
        edges.set(EdgeSet::HORIZONTAL, self.width.is_some());
        edges.set(EdgeSet::VERTICAL, self.height.is_some());
        spacing.reset(AbsoluteEdgeSet::from_edges(edges, child.direction()));
        spacing
    }
}

/// Minimum, ideal, and maximum lengths on one axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FlexLimits {
    /// Smallest length.
    pub min: Option<f64>,
    /// Length used for an unspecified proposal.
    pub ideal: Option<f64>,
    /// Largest length.
    pub max: Option<f64>,
}

impl FlexLimits {
    /// Normalizes the limits so `min <= ideal <= max`, clamping `min` at zero.
    #[must_use]
    pub fn new(min: Option<f64>, ideal: Option<f64>, max: Option<f64>) -> Self {
        let min = min.map(|m| m.max(0.0));
        let ideal = ideal.map(|i| i.max(min.unwrap_or(0.0)));
        let max = max.map(|m| m.max(ideal.or(min).unwrap_or(0.0)));
        Self { min, ideal, max }
    }

    fn clamp(self, value: f64) -> f64 {
        value
            .max(self.min.unwrap_or(f64::NEG_INFINITY))
            .min(self.max.unwrap_or(f64::INFINITY))
    }

    fn is_unbounded(self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// The length proposed to the child for `proposed`.
    fn child_proposal(self, proposed: Option<f64>) -> Option<f64> {
        match proposed {
            Some(p) if !self.is_unbounded() => Some(self.clamp(p)),
            Some(p) => Some(p),
            None => self.ideal,
        }
    }

    /// Our own length given what was proposed to the child and what it chose.
    fn resolve(self, child_proposal: Option<f64>, child: f64) -> f64 {
        match (self.min, self.max) {
            (Some(min), Some(max)) if min <= max => child.max(min).min(max).max(
                child_proposal.map_or(f64::NEG_INFINITY, |p| p.max(min).min(max)),
            ),
            (Some(min), None) => child_proposal.unwrap_or(f64::INFINITY).min(child).max(min),
            (None, Some(max)) => child_proposal.unwrap_or(f64::NEG_INFINITY).max(child).min(max),
            _ => child,
        }
    }
}

/// A frame with flexible limits on each axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlexFrameLayout {
    /// Width limits.
    pub width: FlexLimits,
    /// Height limits.
    pub height: FlexLimits,
    /// Child alignment within the frame.
    pub alignment: Alignment,
}

impl FlexFrameLayout {
    fn limits(&self, axis: Axis) -> FlexLimits {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    fn child_proposal(&self, proposal: ProposedSize) -> ProposedSize {
        ProposedSize::new(
            self.width.child_proposal(proposal.width),
            self.height.child_proposal(proposal.height),
        )
    }
}

impl UnaryLayout for FlexFrameLayout {
    fn size_that_fits(&self, proposal: ProposedSize, child: &LayoutProxy) -> Size {
        let child_proposal = self.child_proposal(proposal);
        let size = child.size_that_fits(child_proposal);
        let resolve = |axis: Axis| {
            self.limits(axis)
                .resolve(child_proposal.get(axis), axis.of_size(size))
        };
        Size::new(resolve(Axis::Horizontal), resolve(Axis::Vertical))
    }

    fn placement(&self, child: &LayoutProxy, context: &PlacementContext) -> Placement {
        let proposal = ProposedSize::new(
            self.width.child_proposal(Some(context.size.width)),
            self.height.child_proposal(Some(context.size.height)),
        );
        aligned(child, context.size, self.alignment, proposal)
    }
}

/// Overrides the child's layout priority.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutPriorityLayout {
    /// The priority reported to containers.
    pub priority: f64,
}

impl UnaryLayout for LayoutPriorityLayout {
    fn size_that_fits(&self, proposal: ProposedSize, child: &LayoutProxy) -> Size {
        child.size_that_fits(proposal)
    }

    fn placement(&self, _child: &LayoutProxy, context: &PlacementContext) -> Placement {
        Placement::new(context.proposal, UnitPoint::TOP_LEADING, Point::ZERO)
    }

    fn layout_priority(&self, _child: &LayoutProxy) -> f64 {
        self.priority
    }
}

/// Replaces the child's spacing preferences.
#[derive(Clone, Debug, PartialEq)]
pub struct SpacingLayout {
    /// The preferences reported to containers.
    pub spacing: Spacing,
}

impl UnaryLayout for SpacingLayout {
    fn size_that_fits(&self, proposal: ProposedSize, child: &LayoutProxy) -> Size {
        child.size_that_fits(proposal)
    }

    fn placement(&self, _child: &LayoutProxy, context: &PlacementContext) -> Placement {
        Placement::new(context.proposal, UnitPoint::TOP_LEADING, Point::ZERO)
    }

    fn spacing(&self, _child: &LayoutProxy) -> Spacing {
        self.spacing.clone()
    }
}
