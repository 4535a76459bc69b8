// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry vocabulary shared by layout, styling, and the view graph.
//!
//! Sizes, points, and rectangles are [`kurbo`] types. This module adds the
//! pieces layout needs on top of them: axes and layout direction,
//! [`ProposedSize`] with per-axis "unspecified" dimensions, edges and
//! [`EdgeInsets`], and alignment keys.

mod alignment;
mod axis;
mod edge;
mod proposal;

pub use alignment::{Alignment, AlignmentKey, HorizontalAlignment, UnitPoint, VerticalAlignment};
pub use axis::{Axis, LayoutDirection};
pub use edge::{AbsoluteEdge, AbsoluteEdgeSet, Edge, EdgeInsets, EdgeSet};
pub use proposal::ProposedSize;
