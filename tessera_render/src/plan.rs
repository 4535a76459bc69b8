// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render plan: an ordered sequence of draw items for one update.

use alloc::vec::Vec;

use kurbo::Rect;
use tessera_core::display_list::{DisplayIdentity, DisplayVersion};
use tessera_core::shape_style::{BlendMode, Style};

use crate::DamageRegion;

/// How an item compares with the previous plan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ItemChange {
    /// Drawn identically last time.
    Unchanged,
    /// Drawn last time, with different content, frame, or opacity.
    Changed,
    /// Not drawn last time.
    #[default]
    Inserted,
}

/// A single draw command in the render plan.
///
/// Items are produced in back-to-front order, matching the display list's
/// traversal order.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderItem {
    /// The display item this command draws.
    pub identity: DisplayIdentity,
    /// Content version of that item.
    pub version: DisplayVersion,
    /// Frame in root coordinates.
    pub frame: Rect,
    /// Opacity accumulated from enclosing items (0.0–1.0).
    pub opacity: f32,
    /// Resolved paint.
    pub style: Style,
    /// Comparison with the previous plan.
    pub change: ItemChange,
}

impl RenderItem {
    /// Returns the blend mode of the paint.
    #[must_use]
    pub fn blend_mode(&self) -> BlendMode {
        self.style.blend()
    }
}

/// Counts of item changes in a plan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlanStats {
    /// Items drawn identically last time.
    pub unchanged: usize,
    /// Items drawn differently last time.
    pub changed: usize,
    /// Items not drawn last time.
    pub inserted: usize,
    /// Items drawn last time and gone now.
    pub removed: usize,
}

/// The draw commands for one update.
#[derive(Clone, Debug, Default)]
pub struct RenderPlan {
    /// Draw items in back-to-front order.
    pub items: Vec<RenderItem>,
    /// Region that differs from the previous plan.
    pub damage: DamageRegion,
    /// Change counts.
    pub stats: PlanStats,
}

impl RenderPlan {
    /// Creates an empty plan that damages the whole output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the plan for reuse.
    pub fn clear(&mut self) {
        self.items.clear();
        self.damage = DamageRegion::Full;
        self.stats = PlanStats::default();
    }

    /// Returns whether the previous output can be shown unchanged.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.damage.is_empty()
    }
}
