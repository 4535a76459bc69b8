// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Size negotiation and placement.
//!
//! Every view that takes part in layout is represented by a
//! [`LayoutComputer`], a shared handle to a [`LayoutEngine`]. A parent
//! proposes a [`ProposedSize`](crate::geometry::ProposedSize), the child
//! answers with its size, and the parent then places the child.
//!
//! Containers implement [`Layout`] and run through [`LayoutAdapter`];
//! single-child modifiers implement [`UnaryLayout`] and run through
//! [`UnaryLayoutEngine`]. Both engines memoize answers, and both fill in a
//! centered default for any child the algorithm forgot to place, so every
//! child receives exactly one frame.

mod any;
mod computer;
mod modifiers;
mod protocol;
mod spacing;
mod stack;
mod subview;
mod unary;

pub use any::{AnyLayout, AnyUnaryLayout};
pub use computer::{DefaultLayoutEngine, LayoutComputer, LayoutEngine, ViewDimensions};
pub use modifiers::{
    AspectRatioLayout, ContentMode, FixedSizeLayout, FlexFrameLayout, FlexLimits, FrameLayout,
    LayoutPriorityLayout, PaddingLayout, SafeAreaIgnoringLayout, SpacingLayout,
};
pub use protocol::{Layout, LayoutAdapter};
pub(crate) use protocol::proxies_for;
pub use spacing::{Category, DEFAULT_SPACING, Spacing, SpacingKey, ViewSpacing};
pub use stack::{HStack, StackCache, VStack, ZStack};
pub use subview::{LayoutProxy, LayoutSubview, LayoutSubviews, Placement};
pub use unary::{PlacementContext, UnaryLayout, UnaryLayoutEngine};
