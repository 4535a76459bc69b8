// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lazily materialized lists of child views.
//!
//! A [`ViewList`] is what evaluating a container's children produces: a
//! sequence of elements that can be counted without materializing them,
//! walked from any offset, and matched across rebuilds by identity.
//!
//! Lists nest. Walking one with [`ViewList::apply_nodes`] visits [`Node`]s
//! depth first:
//!
//! ```text
//! Group ─┬─ BaseViewList ──► Sublist { elements, id }
//!        ├─ Section ─┬─ header  ──► Sublist
//!        │           ├─ content ──► Sublist
//!        │           └─ footer  ──► Sublist
//!        └─ ViewListSlice ──► (clipped Sublists of its base)
//! ```
//!
//! The traversal body returns `false` to stop before visiting any further
//! sibling, which makes indexed lookup cheap. A [`SublistTransform`] carries
//! adjustments pushed by wrapping lists (binding explicit IDs, attaching a
//! subgraph) down to every [`Sublist`] below them, in stack order.
//!
//! Lists are values: they are rebuilt rather than mutated when their inputs
//! change. Previously built elements may be reused across rebuilds through
//! [`Elements::try_to_reuse_element`], which fails closed.

mod dynamic;
mod elements;
mod group;
mod id;
mod lists;
mod outputs;
mod style;
mod subgraph;

pub use dynamic::{EditLog, TrackedList};
pub use elements::{
    BaseInputs, ElementKind, Elements, EmptyElements, MakeBody, MergedElements, UnaryElements,
};
pub use group::{Group, Section, SectionBody, SectionInfo};
pub use id::{CanonicalId, ExplicitId, JoinedViews, ReuseIdentifier, ViewIds, ViewListId};
pub use lists::{BaseViewList, BindIdList, EmptyViewList, ViewListSlice};
pub use outputs::{
    ListAttribute, ListInputs, ListKind, ListOptions, ListValue, ListViews, ViewListOutputs,
};
pub use style::IteratorStyle;
pub use subgraph::{ListSubgraph, Release, ReleaseQueue, ReleasedSubgraph};

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;

/// Marks a point in the sequence of graph transactions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransactionId(pub u32);

impl TransactionId {
    /// Returns the following transaction.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// A change in an element's presence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Edit {
    /// The element was added.
    Inserted,
    /// The element was removed.
    Removed,
}

/// Traits attached to a run of elements.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewTraits {
    /// Whether insertions and removals in this run may animate.
    pub can_transition: bool,
    /// Display-list identity scope the elements draw into.
    pub stable_id_scope: Option<u32>,
    /// Priority containers use when dividing space.
    pub layout_priority: Option<f64>,
}

impl ViewTraits {
    /// Returns whether no trait is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// The body of a node traversal.
///
/// Receives the offset within the node, the iteration style, the node, and
/// the active transform. Returns `false` to stop the traversal.
pub type ApplyBody<'b> =
    dyn for<'n> FnMut(&mut usize, IteratorStyle, Node<'n>, &mut SublistTransform) -> bool + 'b;

/// A list of child view descriptors.
pub trait ViewList: fmt::Debug {
    /// Returns the exact number of elements under `style`.
    fn count(&self, style: IteratorStyle) -> usize;

    /// Returns an approximation of [`count`](Self::count) for capacity
    /// planning; never use it for indexing.
    fn estimated_count(&self, style: IteratorStyle) -> usize {
        self.count(style)
    }

    /// Returns the traits shared by every element.
    fn traits(&self) -> ViewTraits {
        ViewTraits::default()
    }

    /// Returns the identities of the elements, when known without walking.
    fn view_ids(&self) -> Option<ViewIds> {
        None
    }

    /// Walks this list's nodes starting at element `start`.
    ///
    /// Nodes that end before `start` are skipped, and `start` is reduced by
    /// their count. Returns `false` if `body` stopped the traversal.
    fn apply_nodes(
        &self,
        start: &mut usize,
        style: IteratorStyle,
        transform: &mut SublistTransform,
        body: &mut ApplyBody<'_>,
    ) -> bool;

    /// Returns how the element with `id` changed since `since`, if known.
    ///
    /// Missing information yields `None`, never a guessed edit.
    fn edit(&self, id: &ViewListId, since: TransactionId) -> Option<Edit> {
        _ = (id, since);
        None
    }

    /// Returns the offset of the first element carrying the explicit `id`.
    fn first_offset(&self, id: &ExplicitId, style: IteratorStyle) -> Option<usize> {
        _ = (id, style);
        None
    }

    /// Walks every [`Sublist`] from element `start`, with transforms applied.
    fn apply_sublists(
        &self,
        start: &mut usize,
        style: IteratorStyle,
        transform: &mut SublistTransform,
        body: &mut dyn FnMut(Sublist) -> bool,
    ) -> bool {
        self.apply_nodes(start, style, transform, &mut |start, style, node, transform| {
            node.apply_sublists(start, style, transform, body)
        })
    }

    /// Returns whether the list has no elements.
    fn is_empty(&self) -> bool {
        self.count(IteratorStyle::PLAIN) == 0
    }
}

/// Collects every sublist of `list` in order, with transforms applied.
#[must_use]
pub fn sublists(list: &dyn ViewList, style: IteratorStyle) -> Vec<Sublist> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut transform = SublistTransform::default();
    list.apply_sublists(&mut start, style, &mut transform, &mut |sublist| {
        out.push(sublist);
        true
    });
    out
}

/// A contiguous run of elements sharing one identity scope.
#[derive(Clone, Debug)]
pub struct Sublist {
    /// Offset of the first visited element within `elements`.
    pub start: usize,
    /// Number of elements in the run.
    pub count: usize,
    /// Identity of the run; element `i` is `id.element_id(i)`.
    pub id: ViewListId,
    /// The generators for the run.
    pub elements: Rc<dyn Elements>,
    /// Traits of the run.
    pub traits: ViewTraits,
}

/// One adjustment pushed onto a [`SublistTransform`].
pub trait TransformItem: fmt::Debug {
    /// Adjusts a sublist found below the point this item was pushed.
    fn apply(&self, sublist: &mut Sublist);

    /// Adjusts an identity found below the point this item was pushed.
    fn bind_id(&self, id: &mut ViewListId);
}

/// A stack of adjustments applied to sublists during a traversal.
///
/// Items are pushed on the way down and popped on the way back up. They are
/// applied innermost first.
#[derive(Clone, Debug, Default)]
pub struct SublistTransform {
    items: Vec<Rc<dyn TransformItem>>,
}

impl SublistTransform {
    /// Pushes an adjustment.
    pub fn push(&mut self, item: Rc<dyn TransformItem>) {
        self.items.push(item);
    }

    /// Pops the most recent adjustment.
    pub fn pop(&mut self) {
        self.items.pop();
    }

    /// Returns whether no adjustment is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of active adjustments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Applies every active adjustment to `sublist`.
    pub fn apply(&self, sublist: &mut Sublist) {
        for item in self.items.iter().rev() {
            item.apply(sublist);
        }
    }

    /// Applies every active adjustment to `id`.
    pub fn bind_id(&self, id: &mut ViewListId) {
        for item in self.items.iter().rev() {
            item.bind_id(id);
        }
    }
}

/// A node visited during a traversal.
#[derive(Clone, Debug)]
pub enum Node<'a> {
    /// A nested list, walked through its own `apply_nodes`.
    List(&'a dyn ViewList),
    /// A leaf run of elements.
    Sublist(Sublist),
    /// Concatenated lists.
    Group(&'a Group),
    /// A header, content, and footer.
    Section(&'a Section),
}

impl Node<'_> {
    /// Returns the number of elements below this node.
    #[must_use]
    pub fn count(&self, style: IteratorStyle) -> usize {
        match self {
            Node::List(list) => list.count(style),
            Node::Sublist(sublist) => style.apply_granularity(sublist.count),
            Node::Group(group) => group.count(style),
            Node::Section(section) => section.count(style),
        }
    }

    /// Returns the estimated number of elements below this node.
    #[must_use]
    pub fn estimated_count(&self, style: IteratorStyle) -> usize {
        match self {
            Node::List(list) => list.estimated_count(style),
            Node::Sublist(sublist) => style.apply_granularity(sublist.count),
            Node::Group(group) => group.estimated_count(style),
            Node::Section(section) => section.estimated_count(style),
        }
    }

    /// Expands this node one level, handing its children to `body`.
    ///
    /// A sublist is handed to `body` itself unless `start` skips it.
    pub fn apply_nodes(
        self,
        start: &mut usize,
        style: IteratorStyle,
        transform: &mut SublistTransform,
        body: &mut ApplyBody<'_>,
    ) -> bool {
        match self {
            Node::List(list) => list.apply_nodes(start, style, transform, body),
            Node::Sublist(sublist) => {
                let count = style.apply_granularity(sublist.count);
                if *start >= count {
                    *start -= count;
                    return true;
                }
                let result = body(start, style, Node::Sublist(sublist), transform);
                *start = 0;
                result
            }
            Node::Group(group) => group.apply_children(start, style, transform, body),
            Node::Section(section) => {
                if section.is_hierarchical() {
                    section.header().apply_nodes(start, style, transform, body)
                } else {
                    section.group().apply_children(start, style, transform, body)
                }
            }
        }
    }

    /// Walks every sublist below this node, with transforms applied.
    pub fn apply_sublists(
        self,
        start: &mut usize,
        style: IteratorStyle,
        transform: &mut SublistTransform,
        body: &mut dyn FnMut(Sublist) -> bool,
    ) -> bool {
        match self {
            Node::List(list) => list.apply_sublists(start, style, transform, body),
            Node::Sublist(mut sublist) => {
                let count = style.apply_granularity(sublist.count);
                if *start >= count {
                    *start -= count;
                    return true;
                }
                transform.apply(&mut sublist);
                let result = body(sublist);
                *start = 0;
                result
            }
            Node::Group(group) => {
                group.apply_children(start, style, transform, &mut |start, style, node, t| {
                    node.apply_sublists(start, style, t, body)
                })
            }
            Node::Section(section) => {
                section.apply_parts(start, style, transform, &mut |start, style, node, _, t| {
                    node.apply_sublists(start, style, t, body)
                })
            }
        }
    }

    /// Returns the offset of the first element carrying `id`.
    #[must_use]
    pub fn first_offset(&self, id: &ExplicitId, style: IteratorStyle) -> Option<usize> {
        match self {
            Node::List(list) => list.first_offset(id, style),
            Node::Sublist(_) => None,
            Node::Group(group) => group.first_offset(id, style),
            Node::Section(section) => section.first_offset(id, style),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ViewNode;
    use alloc::boxed::Box;
    use alloc::vec;
    use proptest::prelude::*;

    /// A list shape for generated tests.
    #[derive(Clone, Debug)]
    enum Shape {
        Leaf(usize),
        Group(Vec<Shape>),
        Section(Box<Shape>, Box<Shape>, Box<Shape>),
        Slice(Box<Shape>, usize, usize),
    }

    fn make_list(shape: &Shape, next_id: &mut i32) -> Rc<dyn ViewList> {
        match shape {
            Shape::Leaf(n) => {
                let parts = (0..*n)
                    .map(|_| {
                        Rc::new(UnaryElements::new(ViewNode::Empty, BaseInputs::default()))
                            as Rc<dyn Elements>
                    })
                    .collect();
                let id = *next_id;
                *next_id += 1;
                Rc::new(BaseViewList::new(
                    Rc::new(MergedElements::new(parts)),
                    id,
                    ViewTraits::default(),
                ))
            }
            Shape::Group(children) => Rc::new(Group::new(
                children.iter().map(|c| make_list(c, next_id)).collect(),
            )),
            Shape::Section(h, c, f) => {
                let id = u32::try_from(*next_id).unwrap_or(0);
                Rc::new(Section::new(
                    id,
                    make_list(h, next_id),
                    make_list(c, next_id),
                    make_list(f, next_id),
                    false,
                ))
            }
            Shape::Slice(base, from, len) => {
                let base = make_list(base, next_id);
                let total = base.count(IteratorStyle::PLAIN);
                let lower = (*from).min(total);
                let upper = (lower + len).min(total);
                Rc::new(ViewListSlice::new(base, lower..upper))
            }
        }
    }

    fn shape_strategy() -> impl Strategy<Value = Shape> {
        let leaf = (0_usize..4).prop_map(Shape::Leaf);
        leaf.prop_recursive(4, 32, 4, |inner| {
            prop_oneof![
                proptest::collection::vec(inner.clone(), 0..4).prop_map(Shape::Group),
                (inner.clone(), inner.clone(), inner.clone()).prop_map(|(h, c, f)| {
                    Shape::Section(Box::new(h), Box::new(c), Box::new(f))
                }),
                (inner, 0_usize..4, 0_usize..6)
                    .prop_map(|(b, from, len)| Shape::Slice(Box::new(b), from, len)),
            ]
        })
    }

    fn visited_count(list: &dyn ViewList) -> usize {
        let mut total = 0;
        let mut start = 0;
        let mut transform = SublistTransform::default();
        list.apply_sublists(&mut start, IteratorStyle::PLAIN, &mut transform, &mut |s| {
            total += s.count - s.start;
            true
        });
        total
    }

    #[test]
    fn group_of_leaves_visits_every_sublist() {
        let mut next = 0;
        let list = make_list(
            &Shape::Group(vec![Shape::Leaf(2), Shape::Leaf(0), Shape::Leaf(3)]),
            &mut next,
        );
        assert_eq!(list.count(IteratorStyle::PLAIN), 5);
        let found = sublists(&*list, IteratorStyle::PLAIN);
        assert_eq!(found.len(), 2, "empty leaves are skipped");
        assert_eq!(found[1].id.implicit_id(), 2);
    }

    #[test]
    fn start_offset_skips_whole_sublists() {
        let mut next = 0;
        let list = make_list(
            &Shape::Group(vec![Shape::Leaf(2), Shape::Leaf(3)]),
            &mut next,
        );
        let mut start = 3;
        let mut seen = Vec::new();
        list.apply_sublists(
            &mut start,
            IteratorStyle::PLAIN,
            &mut SublistTransform::default(),
            &mut |s| {
                seen.push((s.id.implicit_id(), s.start));
                true
            },
        );
        assert_eq!(seen, vec![(1, 1)]);
    }

    #[test]
    fn body_can_stop_traversal() {
        let mut next = 0;
        let list = make_list(
            &Shape::Group(vec![Shape::Leaf(1), Shape::Leaf(1), Shape::Leaf(1)]),
            &mut next,
        );
        let mut visits = 0;
        let finished = list.apply_sublists(
            &mut 0,
            IteratorStyle::PLAIN,
            &mut SublistTransform::default(),
            &mut |_| {
                visits += 1;
                visits < 2
            },
        );
        assert!(!finished);
        assert_eq!(visits, 2);
    }

    #[derive(Debug)]
    struct Mark(i64);

    impl TransformItem for Mark {
        fn apply(&self, sublist: &mut Sublist) {
            self.bind_id(&mut sublist.id);
        }

        fn bind_id(&self, id: &mut ViewListId) {
            id.bind(self.0, None, false, 0);
        }
    }

    #[test]
    fn transform_applies_innermost_first() {
        let mut transform = SublistTransform::default();
        transform.push(Rc::new(Mark(1)));
        transform.push(Rc::new(Mark(2)));
        let mut id = ViewListId::new(0);
        transform.bind_id(&mut id);
        let order: Vec<_> = id.explicit_ids().cloned().collect();
        assert_eq!(order, vec![ExplicitId::Int(2), ExplicitId::Int(1)]);
        transform.pop();
        assert_eq!(transform.len(), 1);
    }

    proptest! {
        #[test]
        fn count_matches_traversal(shape in shape_strategy()) {
            let mut next = 0;
            let list = make_list(&shape, &mut next);
            prop_assert_eq!(visited_count(&*list), list.count(IteratorStyle::PLAIN));
        }
    }
}
