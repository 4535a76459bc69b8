// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The platform-agnostic output of an update.
//!
//! A [`DisplayList`] is a tree of [`DisplayItem`]s in back-to-front order.
//! Each item has a stable [`DisplayIdentity`], derived from the identity of
//! the list element that drew it and its position below that element, and a
//! [`DisplayVersion`] that only changes when the item's content changes.
//! Renderers diff two lists by identity and skip items whose versions match.

use alloc::vec::Vec;

use kurbo::{Rect, Vec2};

use crate::shape_style::Style;

/// Stable identity of a display item across updates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DisplayIdentity(pub u64);

impl DisplayIdentity {
    /// Returns the identity of this item's child at `index`.
    #[must_use]
    pub const fn child(self, index: usize) -> Self {
        // FNV-1a style mixing of the parent identity and the index.
        let mut hash = self.0 ^ 0xcbf2_9ce4_8422_2325;
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        hash ^= index as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        Self(hash)
    }
}

/// Version of a display item's content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DisplayVersion(pub u64);

/// What a display item draws.
#[derive(Clone, Debug, PartialEq)]
pub enum DisplayContent {
    /// Fills the item's frame with a resolved style.
    Fill(Style),
    /// Draws nested items in the same coordinate space.
    Group(DisplayList),
    /// Draws nested items translated by the vector.
    Offset(Vec2, DisplayList),
    /// Draws nested items faded by the opacity.
    Opacity(f32, DisplayList),
}

impl DisplayContent {
    fn nested(&self) -> Option<&DisplayList> {
        match self {
            Self::Fill(_) => None,
            Self::Group(list) | Self::Offset(_, list) | Self::Opacity(_, list) => Some(list),
        }
    }
}

/// One entry of a [`DisplayList`].
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayItem {
    /// Bounds of the item in its parent's coordinate space.
    pub frame: Rect,
    /// Stable identity.
    pub identity: DisplayIdentity,
    /// Content version.
    pub version: DisplayVersion,
    /// What the item draws.
    pub content: DisplayContent,
}

impl DisplayItem {
    /// Creates an item with the default version.
    #[must_use]
    pub fn new(identity: DisplayIdentity, frame: Rect, content: DisplayContent) -> Self {
        Self {
            frame,
            identity,
            version: DisplayVersion::default(),
            content,
        }
    }

    /// Returns whether the two items draw the same thing, ignoring versions.
    #[must_use]
    pub fn same_content(&self, other: &Self) -> bool {
        if self.identity != other.identity || self.frame != other.frame {
            return false;
        }
        match (&self.content, &other.content) {
            (DisplayContent::Fill(a), DisplayContent::Fill(b)) => a == b,
            (DisplayContent::Group(a), DisplayContent::Group(b)) => a.same_content(b),
            (DisplayContent::Offset(va, a), DisplayContent::Offset(vb, b)) => {
                va == vb && a.same_content(b)
            }
            (DisplayContent::Opacity(oa, a), DisplayContent::Opacity(ob, b)) => {
                oa == ob && a.same_content(b)
            }
            _ => false,
        }
    }
}

/// A tree of display items in back-to-front order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DisplayList {
    /// Top-level items.
    pub items: Vec<DisplayItem>,
}

impl DisplayList {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Returns whether the list draws nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items, nested items included.
    #[must_use]
    pub fn total_len(&self) -> usize {
        self.items
            .iter()
            .map(|item| 1 + item.content.nested().map_or(0, Self::total_len))
            .sum()
    }

    /// Returns whether both lists draw the same thing, ignoring versions.
    #[must_use]
    pub fn same_content(&self, other: &Self) -> bool {
        self.items.len() == other.items.len()
            && self
                .items
                .iter()
                .zip(&other.items)
                .all(|(a, b)| a.same_content(b))
    }

    /// Stamps every item with a version.
    ///
    /// Items that draw the same thing as the item with the same identity in
    /// `previous` keep that item's version; every other item gets `version`.
    /// A container whose nested items changed gets the new version too.
    pub fn assign_versions(&mut self, previous: Option<&Self>, version: DisplayVersion) {
        for item in &mut self.items {
            let old = previous.and_then(|p| p.items.iter().find(|o| o.identity == item.identity));
            let old_nested = old.and_then(|o| o.content.nested());
            match &mut item.content {
                DisplayContent::Fill(_) => {}
                DisplayContent::Group(list)
                | DisplayContent::Offset(_, list)
                | DisplayContent::Opacity(_, list) => list.assign_versions(old_nested, version),
            }
            item.version = match old {
                Some(old) if old.same_content(item) && nested_versions_match(old, item) => {
                    old.version
                }
                _ => version,
            };
        }
    }

    /// Visits every item depth first, with its translation from the root.
    pub fn visit(&self, f: &mut impl FnMut(&DisplayItem, Vec2, f32)) {
        self.visit_at(Vec2::ZERO, 1.0, f);
    }

    fn visit_at(&self, origin: Vec2, opacity: f32, f: &mut impl FnMut(&DisplayItem, Vec2, f32)) {
        for item in &self.items {
            f(item, origin, opacity);
            match &item.content {
                DisplayContent::Fill(_) => {}
                DisplayContent::Group(list) => list.visit_at(origin, opacity, f),
                DisplayContent::Offset(by, list) => list.visit_at(origin + *by, opacity, f),
                DisplayContent::Opacity(o, list) => list.visit_at(origin, opacity * o, f),
            }
        }
    }
}

fn nested_versions_match(old: &DisplayItem, new: &DisplayItem) -> bool {
    match (old.content.nested(), new.content.nested()) {
        (Some(a), Some(b)) => a
            .items
            .iter()
            .zip(&b.items)
            .all(|(x, y)| x.version == y.version),
        _ => true,
    }
}

/// Accumulates items while walking a laid-out view tree.
#[derive(Debug, Default)]
pub struct DisplayListBuilder {
    items: Vec<DisplayItem>,
}

impl DisplayListBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an item.
    pub fn push(&mut self, item: DisplayItem) {
        self.items.push(item);
    }

    /// Appends a fill, unless the style draws nothing.
    pub fn fill(&mut self, identity: DisplayIdentity, frame: Rect, style: Style) {
        if style.is_clear() {
            return;
        }
        self.push(DisplayItem::new(identity, frame, DisplayContent::Fill(style)));
    }

    /// Builds nested items with `body` and appends them wrapped by `wrap`.
    ///
    /// Nothing is appended when `body` adds no items.
    pub fn nested(
        &mut self,
        identity: DisplayIdentity,
        frame: Rect,
        body: impl FnOnce(&mut Self),
        wrap: impl FnOnce(DisplayList) -> DisplayContent,
    ) {
        let mut inner = Self::new();
        body(&mut inner);
        let list = inner.finish();
        if list.is_empty() {
            return;
        }
        self.push(DisplayItem::new(identity, frame, wrap(list)));
    }

    /// Returns the finished list.
    #[must_use]
    pub fn finish(self) -> DisplayList {
        DisplayList { items: self.items }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape_style::{Color, Fill};

    fn fill(identity: u64, color: Color) -> DisplayItem {
        DisplayItem::new(
            DisplayIdentity(identity),
            Rect::new(0.0, 0.0, 10.0, 10.0),
            DisplayContent::Fill(Style::new(Fill::Color(color))),
        )
    }

    fn make_list(items: Vec<DisplayItem>) -> DisplayList {
        DisplayList { items }
    }

    #[test]
    fn child_identities_are_distinct_and_stable() {
        let root = DisplayIdentity(7);
        assert_eq!(root.child(0), root.child(0));
        assert_ne!(root.child(0), root.child(1));
        assert_ne!(root.child(0), DisplayIdentity(8).child(0));
    }

    #[test]
    fn unchanged_items_keep_their_version() {
        let mut first = make_list(alloc::vec![fill(1, Color::RED), fill(2, Color::BLUE)]);
        first.assign_versions(None, DisplayVersion(1));

        let mut second = make_list(alloc::vec![fill(1, Color::RED), fill(2, Color::GREEN)]);
        second.assign_versions(Some(&first), DisplayVersion(2));
        assert_eq!(second.items[0].version, DisplayVersion(1));
        assert_eq!(second.items[1].version, DisplayVersion(2));
    }

    #[test]
    fn containers_take_the_version_of_changed_children() {
        let group = |color| {
            DisplayItem::new(
                DisplayIdentity(9),
                Rect::ZERO,
                DisplayContent::Offset(Vec2::new(5.0, 0.0), make_list(alloc::vec![fill(1, color)])),
            )
        };
        let mut first = make_list(alloc::vec![group(Color::RED)]);
        first.assign_versions(None, DisplayVersion(1));
        let mut second = make_list(alloc::vec![group(Color::BLUE)]);
        second.assign_versions(Some(&first), DisplayVersion(2));
        assert_eq!(second.items[0].version, DisplayVersion(2));
        let mut third = second.clone();
        third.assign_versions(Some(&second), DisplayVersion(3));
        assert_eq!(third, second, "nothing changed, nothing re-versioned");
    }

    #[test]
    fn builder_skips_clear_fills_and_empty_groups() {
        let mut builder = DisplayListBuilder::new();
        builder.fill(DisplayIdentity(1), Rect::ZERO, Style::CLEAR);
        builder.nested(DisplayIdentity(2), Rect::ZERO, |_| {}, DisplayContent::Group);
        builder.nested(
            DisplayIdentity(3),
            Rect::ZERO,
            |b| b.fill(DisplayIdentity(4), Rect::ZERO, Style::new(Fill::Color(Color::RED))),
            |list| DisplayContent::Opacity(0.5, list),
        );
        let list = builder.finish();
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.total_len(), 2);
    }

    #[test]
    fn visit_accumulates_offset_and_opacity() {
        let inner = make_list(alloc::vec![fill(1, Color::RED)]);
        let faded = DisplayItem::new(
            DisplayIdentity(2),
            Rect::ZERO,
            DisplayContent::Opacity(0.5, inner),
        );
        let list = make_list(alloc::vec![DisplayItem::new(
            DisplayIdentity(3),
            Rect::ZERO,
            DisplayContent::Offset(Vec2::new(3.0, 4.0), make_list(alloc::vec![faded])),
        )]);
        let mut seen = Vec::new();
        list.visit(&mut |item, origin, opacity| seen.push((item.identity.0, origin, opacity)));
        assert_eq!(
            seen,
            [
                (3, Vec2::ZERO, 1.0),
                (2, Vec2::new(3.0, 4.0), 1.0),
                (1, Vec2::new(3.0, 4.0), 0.5)
            ]
        );
    }
}
