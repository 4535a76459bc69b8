// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spacing preferences between adjacent views.

use alloc::collections::BTreeMap;

use crate::geometry::{AbsoluteEdge, AbsoluteEdgeSet, Axis, EdgeSet, LayoutDirection};

/// The spacing used between two views when neither states a preference.
pub const DEFAULT_SPACING: f64 = 8.0;

/// A class of spacing preference.
///
/// Two views only combine categorized preferences when both name the same
/// category on facing edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    /// The top edge sits below a run of text.
    EdgeBelowText,
    /// The bottom edge sits above a run of text.
    EdgeAboveText,
    /// The left edge sits right of a run of text.
    EdgeRightText,
    /// The right edge sits left of a run of text.
    EdgeLeftText,
    /// An application-defined category.
    Custom(u16),
}

/// A key in a [`Spacing`] map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpacingKey {
    /// The category, or `None` for an uncategorized minimum.
    pub category: Option<Category>,
    /// The edge the minimum applies to.
    pub edge: AbsoluteEdge,
}

impl SpacingKey {
    /// Creates a key.
    #[must_use]
    pub const fn new(category: Option<Category>, edge: AbsoluteEdge) -> Self {
        Self { category, edge }
    }
}

/// Minimum distances a view prefers around each of its edges.
#[derive(Clone, Debug, PartialEq)]
pub struct Spacing {
    minima: BTreeMap<SpacingKey, f64>,
}

impl Default for Spacing {
    /// Zero distance to adjacent text on every edge.
    fn default() -> Self {
        let mut spacing = Self::zero();
        spacing.add_text_defaults(AbsoluteEdgeSet::all());
        spacing
    }
}

impl Spacing {
    /// A spacing with no preferences at all.
    #[must_use]
    pub fn zero() -> Self {
        Self {
            minima: BTreeMap::new(),
        }
    }

    /// Creates a spacing from explicit minima.
    #[must_use]
    pub fn from_minima(minima: impl IntoIterator<Item = (SpacingKey, f64)>) -> Self {
        Self {
            minima: minima.into_iter().collect(),
        }
    }

    /// The same uncategorized minimum on every edge.
    #[must_use]
    pub fn all(value: f64) -> Self {
        Self::from_minima(AbsoluteEdge::ALL.map(|edge| (SpacingKey::new(None, edge), value)))
    }

    /// Returns the minimum stored for `key`.
    #[must_use]
    pub fn get(&self, key: SpacingKey) -> Option<f64> {
        self.minima.get(&key).copied()
    }

    /// Stores a minimum.
    pub fn insert(&mut self, key: SpacingKey, value: f64) {
        self.minima.insert(key, value);
    }

    /// Returns the number of stored minima.
    #[must_use]
    pub fn len(&self) -> usize {
        self.minima.len()
    }

    /// Returns whether no minima are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.minima.is_empty()
    }

    /// Merges `other`'s minima on `edges` into `self`, keeping the larger
    /// value where both have one.
    pub fn incorporate(&mut self, edges: AbsoluteEdgeSet, other: &Self) {
        if edges.is_empty() {
            return;
        }
        for (key, &value) in &other.minima {
            if !edges.contains_edge(key.edge) {
                continue;
            }
            self.minima
                .entry(*key)
                .and_modify(|v| *v = v.max(value))
                .or_insert(value);
        }
    }

    /// Removes every minimum on `edges`.
    pub fn clear(&mut self, edges: AbsoluteEdgeSet) {
        if edges.is_empty() {
            return;
        }
        self.minima.retain(|key, _| !edges.contains_edge(key.edge));
    }

    /// Removes every minimum on `edges`, then restores the zero text
    /// defaults there.
    pub fn reset(&mut self, edges: AbsoluteEdgeSet) {
        if edges.is_empty() {
            return;
        }
        self.clear(edges);
        self.add_text_defaults(edges);
    }

    /// [`reset`](Self::reset) for layout-relative edges.
    pub fn reset_edges(&mut self, edges: EdgeSet, direction: LayoutDirection) {
        self.reset(AbsoluteEdgeSet::from_edges(edges, direction));
    }

    fn add_text_defaults(&mut self, edges: AbsoluteEdgeSet) {
        let defaults = [
            (AbsoluteEdge::Top, Category::EdgeBelowText),
            (AbsoluteEdge::Left, Category::EdgeRightText),
            (AbsoluteEdge::Bottom, Category::EdgeAboveText),
            (AbsoluteEdge::Right, Category::EdgeLeftText),
        ];
        for (edge, category) in defaults {
            if edges.contains_edge(edge) {
                self.minima.insert(SpacingKey::new(Some(category), edge), 0.0);
            }
        }
    }

    /// Returns the preferred distance from this view to `next`, which
    /// follows it along `axis`.
    ///
    /// Categorized minima present on both facing edges win, summed per
    /// category and maximized across categories. Otherwise the larger of the
    /// two uncategorized minima is used. `None` means neither side has an
    /// opinion.
    #[must_use]
    pub fn distance_to_successor(
        &self,
        axis: Axis,
        direction: LayoutDirection,
        next: &Self,
    ) -> Option<f64> {
        let (leading, trailing) = match direction {
            LayoutDirection::LeftToRight => (AbsoluteEdge::Left, AbsoluteEdge::Right),
            LayoutDirection::RightToLeft => (AbsoluteEdge::Right, AbsoluteEdge::Left),
        };
        let (near, far) = match axis {
            Axis::Horizontal => (leading, trailing),
            Axis::Vertical => (AbsoluteEdge::Top, AbsoluteEdge::Bottom),
        };
        // Walk the smaller map and look each key up in the larger one.
        if self.minima.len() >= next.minima.len() {
            next.distance(near, far, self)
        } else {
            self.distance(far, near, next)
        }
    }

    fn distance(&self, from: AbsoluteEdge, to: AbsoluteEdge, other: &Self) -> Option<f64> {
        let categorized = self
            .minima
            .iter()
            .filter_map(|(key, value)| {
                let category = key.category?;
                if key.edge != from {
                    return None;
                }
                let other_value = other.get(SpacingKey::new(Some(category), to))?;
                Some(value + other_value)
            })
            .reduce(f64::max);
        if categorized.is_some() {
            return categorized;
        }
        let from_value = self.get(SpacingKey::new(None, from));
        let to_value = other.get(SpacingKey::new(None, to));
        match (from_value, to_value) {
            (None, None) => None,
            (a, b) => Some(a.unwrap_or(f64::NEG_INFINITY).max(b.unwrap_or(f64::NEG_INFINITY))),
        }
    }
}

/// A view's spacing preferences as seen by a container layout.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewSpacing {
    /// The underlying preferences.
    pub spacing: Spacing,
    /// The direction used to resolve leading and trailing edges.
    pub direction: LayoutDirection,
}

impl ViewSpacing {
    /// Wraps `spacing`.
    #[must_use]
    pub fn new(spacing: Spacing, direction: LayoutDirection) -> Self {
        Self { spacing, direction }
    }

    /// Empty preferences.
    #[must_use]
    pub fn zero() -> Self {
        Self::new(Spacing::zero(), LayoutDirection::default())
    }

    /// Merges `other`'s preferences on `edges`.
    pub fn form_union(&mut self, other: &Self, edges: EdgeSet) {
        let edges = AbsoluteEdgeSet::from_edges(edges, self.direction);
        self.spacing.incorporate(edges, &other.spacing);
    }

    /// Returns the distance to `next` along `axis`, falling back to
    /// [`DEFAULT_SPACING`].
    #[must_use]
    pub fn distance(&self, next: &Self, axis: Axis) -> f64 {
        self.spacing
            .distance_to_successor(axis, self.direction, &next.spacing)
            .unwrap_or(DEFAULT_SPACING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(category: Option<Category>, edge: AbsoluteEdge) -> SpacingKey {
        SpacingKey::new(category, edge)
    }

    #[test]
    fn default_has_text_zeros() {
        let spacing = Spacing::default();
        assert_eq!(spacing.len(), 4);
        assert_eq!(
            spacing.get(key(Some(Category::EdgeBelowText), AbsoluteEdge::Top)),
            Some(0.0)
        );
    }

    #[test]
    fn default_spacings_have_no_opinion() {
        let a = Spacing::default();
        let b = Spacing::default();
        assert_eq!(
            a.distance_to_successor(Axis::Horizontal, LayoutDirection::LeftToRight, &b),
            None
        );
        let va = ViewSpacing::new(a, LayoutDirection::LeftToRight);
        let vb = ViewSpacing::new(b, LayoutDirection::LeftToRight);
        assert_eq!(va.distance(&vb, Axis::Vertical), DEFAULT_SPACING);
    }

    #[test]
    fn uncategorized_takes_max() {
        let a = Spacing::from_minima([(key(None, AbsoluteEdge::Right), 4.0)]);
        let b = Spacing::from_minima([(key(None, AbsoluteEdge::Left), 6.0)]);
        let d = a.distance_to_successor(Axis::Horizontal, LayoutDirection::LeftToRight, &b);
        assert_eq!(d, Some(6.0));
    }

    #[test]
    fn categorized_sums_and_beats_uncategorized() {
        let custom = Some(Category::Custom(1));
        let a = Spacing::from_minima([
            (key(custom, AbsoluteEdge::Bottom), 3.0),
            (key(None, AbsoluteEdge::Bottom), 100.0),
        ]);
        let b = Spacing::from_minima([(key(custom, AbsoluteEdge::Top), 2.0)]);
        let d = a.distance_to_successor(Axis::Vertical, LayoutDirection::LeftToRight, &b);
        assert_eq!(d, Some(5.0));
    }

    #[test]
    fn right_to_left_swaps_facing_edges() {
        let a = Spacing::from_minima([(key(None, AbsoluteEdge::Left), 9.0)]);
        let b = Spacing::zero();
        assert_eq!(
            a.distance_to_successor(Axis::Horizontal, LayoutDirection::RightToLeft, &b),
            Some(9.0)
        );
        assert_eq!(
            a.distance_to_successor(Axis::Horizontal, LayoutDirection::LeftToRight, &b),
            None
        );
    }

    #[test]
    fn incorporate_keeps_max_on_selected_edges() {
        let mut a = Spacing::from_minima([(key(None, AbsoluteEdge::Top), 1.0)]);
        let b = Spacing::from_minima([
            (key(None, AbsoluteEdge::Top), 5.0),
            (key(None, AbsoluteEdge::Left), 7.0),
        ]);
        a.incorporate(AbsoluteEdgeSet::TOP, &b);
        assert_eq!(a.get(key(None, AbsoluteEdge::Top)), Some(5.0));
        assert_eq!(a.get(key(None, AbsoluteEdge::Left)), None);
    }

    #[test]
    fn reset_restores_text_defaults() {
        let mut a = Spacing::all(4.0);
        a.reset(AbsoluteEdgeSet::TOP);
        assert_eq!(a.get(key(None, AbsoluteEdge::Top)), None);
        assert_eq!(
            a.get(key(Some(Category::EdgeBelowText), AbsoluteEdge::Top)),
            Some(0.0)
        );
        a.clear(AbsoluteEdgeSet::all());
        assert!(a.is_empty());
    }
}
