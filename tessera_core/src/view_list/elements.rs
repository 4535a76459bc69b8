// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element generators.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use super::Release;
use crate::layout::AnyUnaryLayout;
use crate::view::ViewNode;

/// Discriminant compared before any structural reuse check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// [`EmptyElements`].
    Empty,
    /// [`UnaryElements`].
    Unary,
    /// [`MergedElements`].
    Merged,
    /// Elements owned by a list subgraph.
    Subgraph,
    /// A generator defined outside this crate.
    Custom(u32),
}

/// The body handed each materialized element. Returns `false` to stop.
pub type MakeBody<'b> = dyn FnMut(ViewNode) -> bool + 'b;

/// Generators for a run of elements.
pub trait Elements: fmt::Debug {
    /// Returns the generator's discriminant.
    fn kind(&self) -> ElementKind;

    /// Returns the number of elements generated.
    fn count(&self) -> usize;

    /// Materializes elements from `start` onward, handing each to `body`.
    ///
    /// Elements before `start` are skipped and `start` is reduced by their
    /// count. Returns `false` if `body` stopped.
    fn make_elements(&self, start: &mut usize, body: &mut MakeBody<'_>) -> bool;

    /// Returns whether the element at `index` can take over the state built
    /// for `other`'s element at `other_index`.
    ///
    /// This must return `false` whenever equivalence cannot be shown: for
    /// different kinds, different generator bodies, or when either side has
    /// pending body modifiers.
    fn try_to_reuse_element(&self, index: usize, other: &dyn Elements, other_index: usize)
    -> bool;

    /// Keeps the state backing these elements alive while the token lives.
    fn retain(&self) -> Option<Release> {
        None
    }

    /// Upcasts for structural comparison after the kinds matched.
    fn as_any(&self) -> &dyn Any;
}

/// Inputs shared by the elements of one list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BaseInputs {
    /// Modifiers still to be applied to each element's body, outermost first.
    pub body_stack: Vec<AnyUnaryLayout>,
}

impl BaseInputs {
    /// Wraps `body` in every pending modifier.
    #[must_use]
    pub fn apply(&self, body: ViewNode) -> ViewNode {
        self.body_stack
            .iter()
            .rev()
            .fold(body, |child, layout| ViewNode::Modified {
                layout: layout.clone(),
                child: Rc::new(child),
            })
    }
}

/// No elements.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EmptyElements;

impl Elements for EmptyElements {
    fn kind(&self) -> ElementKind {
        ElementKind::Empty
    }

    fn count(&self) -> usize {
        0
    }

    fn make_elements(&self, _start: &mut usize, _body: &mut MakeBody<'_>) -> bool {
        true
    }

    fn try_to_reuse_element(&self, _: usize, _: &dyn Elements, _: usize) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A single element generated from one view.
#[derive(Clone, Debug, PartialEq)]
pub struct UnaryElements {
    body: ViewNode,
    base: BaseInputs,
}

impl UnaryElements {
    /// Creates a generator for `body`.
    #[must_use]
    pub fn new(body: ViewNode, base: BaseInputs) -> Self {
        Self { body, base }
    }

    /// Returns the generating view.
    #[must_use]
    pub fn body(&self) -> &ViewNode {
        &self.body
    }
}

impl Elements for UnaryElements {
    fn kind(&self) -> ElementKind {
        ElementKind::Unary
    }

    fn count(&self) -> usize {
        1
    }

    fn make_elements(&self, start: &mut usize, body: &mut MakeBody<'_>) -> bool {
        if *start > 0 {
            *start -= 1;
            return true;
        }
        body(self.base.apply(self.body.clone()))
    }

    fn try_to_reuse_element(&self, _: usize, other: &dyn Elements, _: usize) -> bool {
        if other.kind() != ElementKind::Unary {
            return false;
        }
        let Some(other) = other.as_any().downcast_ref::<Self>() else {
            return false;
        };
        if !self.base.body_stack.is_empty() || !other.base.body_stack.is_empty() {
            return false;
        }
        self.body == other.body
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Several generators laid end to end.
#[derive(Clone, Debug)]
pub struct MergedElements {
    parts: Vec<Rc<dyn Elements>>,
}

impl MergedElements {
    /// Concatenates `parts`.
    #[must_use]
    pub fn new(parts: Vec<Rc<dyn Elements>>) -> Self {
        Self { parts }
    }

    /// Returns the generator containing element `index`, with the index
    /// relative to that generator.
    #[must_use]
    pub fn find_element(&self, index: usize) -> Option<(&dyn Elements, usize)> {
        let mut base = 0;
        for part in &self.parts {
            let count = part.count();
            if index < base + count {
                return Some((&**part, index - base));
            }
            base += count;
        }
        None
    }
}

impl Elements for MergedElements {
    fn kind(&self) -> ElementKind {
        ElementKind::Merged
    }

    fn count(&self) -> usize {
        self.parts.iter().map(|p| p.count()).sum()
    }

    fn make_elements(&self, start: &mut usize, body: &mut MakeBody<'_>) -> bool {
        for part in &self.parts {
            if !part.make_elements(start, body) {
                return false;
            }
        }
        true
    }

    fn try_to_reuse_element(&self, index: usize, other: &dyn Elements, other_index: usize) -> bool {
        let Some((mine, local)) = self.find_element(index) else {
            return false;
        };
        if other.kind() != ElementKind::Merged {
            return false;
        }
        let Some((theirs, other_local)) = other
            .as_any()
            .downcast_ref::<Self>()
            .and_then(|m| m.find_element(other_index))
        else {
            return false;
        };
        mine.try_to_reuse_element(local, theirs, other_local)
    }

    fn retain(&self) -> Option<Release> {
        self.parts
            .iter()
            .filter_map(|p| p.retain())
            .reduce(Release::merge)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::EdgeSet;
    use crate::layout::PaddingLayout;
    use crate::shape_style::{AnyShapeStyle, Color};
    use alloc::vec;
    use kurbo::Size;
    use proptest::prelude::*;

    fn fill(r: f32) -> ViewNode {
        ViewNode::fill(
            AnyShapeStyle::new(Color::rgb(r, 0.0, 0.0)),
            Size::new(10.0, 10.0),
        )
    }

    fn unary(body: ViewNode) -> Rc<dyn Elements> {
        Rc::new(UnaryElements::new(body, BaseInputs::default()))
    }

    #[test]
    fn unary_skips_when_start_is_past_it() {
        let elements = UnaryElements::new(ViewNode::Empty, BaseInputs::default());
        let mut start = 2;
        let mut made = 0;
        assert!(elements.make_elements(&mut start, &mut |_| {
            made += 1;
            true
        }));
        assert_eq!((start, made), (1, 0));
    }

    #[test]
    fn body_stack_wraps_each_element() {
        let base = BaseInputs {
            body_stack: vec![AnyUnaryLayout::new(PaddingLayout::new(EdgeSet::all(), None))],
        };
        let elements = UnaryElements::new(fill(1.0), base);
        let mut made = Vec::new();
        elements.make_elements(&mut 0, &mut |node| {
            made.push(node);
            true
        });
        assert!(matches!(made[0], ViewNode::Modified { .. }));
    }

    #[test]
    fn reuse_requires_equal_bodies_and_no_body_stack() {
        let a = UnaryElements::new(fill(1.0), BaseInputs::default());
        assert!(a.try_to_reuse_element(0, &a.clone(), 0));
        let other = UnaryElements::new(fill(0.5), BaseInputs::default());
        assert!(!a.try_to_reuse_element(0, &other, 0));
        assert!(!a.try_to_reuse_element(0, &EmptyElements, 0));

        let stacked = UnaryElements::new(
            fill(1.0),
            BaseInputs {
                body_stack: vec![AnyUnaryLayout::new(PaddingLayout::new(EdgeSet::all(), None))],
            },
        );
        assert!(!stacked.try_to_reuse_element(0, &stacked.clone(), 0));
    }

    #[test]
    fn merged_finds_and_reuses_by_index() {
        let merged =
            MergedElements::new(vec![unary(fill(1.0)), unary(fill(0.5)), unary(fill(0.25))]);
        assert_eq!(merged.count(), 3);
        let (_, local) = merged.find_element(2).unwrap();
        assert_eq!(local, 0);
        assert!(merged.find_element(3).is_none());

        let shifted = MergedElements::new(vec![unary(fill(0.5)), unary(fill(0.25))]);
        assert!(merged.try_to_reuse_element(1, &shifted, 0));
        assert!(!merged.try_to_reuse_element(0, &shifted, 0));
    }

    #[test]
    fn merged_stops_when_body_stops() {
        let merged = MergedElements::new(vec![unary(fill(1.0)), unary(fill(0.5))]);
        let mut made = 0;
        let finished = merged.make_elements(&mut 0, &mut |_| {
            made += 1;
            false
        });
        assert!(!finished);
        assert_eq!(made, 1);
    }

    proptest! {
        #[test]
        fn reuse_never_crosses_generators(
            a in 0_u8..16,
            b in 0_u8..16,
            empty_side in any::<bool>(),
        ) {
            prop_assume!(a != b);
            let first = UnaryElements::new(fill(f32::from(a) / 16.0), BaseInputs::default());
            let second = UnaryElements::new(fill(f32::from(b) / 16.0), BaseInputs::default());
            prop_assert!(!first.try_to_reuse_element(0, &second, 0));
            let merged = MergedElements::new(vec![unary(fill(f32::from(b) / 16.0))]);
            prop_assert!(!first.try_to_reuse_element(0, &merged, 0));
            if empty_side {
                prop_assert!(!first.try_to_reuse_element(0, &EmptyElements, 0));
                prop_assert!(!EmptyElements.try_to_reuse_element(0, &first, 0));
            }
        }
    }
}
