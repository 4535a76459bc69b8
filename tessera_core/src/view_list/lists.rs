// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Leaf lists and slices of lists.

use alloc::rc::Rc;
use core::ops::Range;

use super::{
    ApplyBody, Edit, Elements, ExplicitId, IteratorStyle, Node, Sublist, SublistTransform,
    TransactionId, TransformItem, ViewIds, ViewList, ViewListId, ViewTraits,
};

/// A list with no elements.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyViewList;

impl ViewList for EmptyViewList {
    fn count(&self, _style: IteratorStyle) -> usize {
        0
    }

    fn view_ids(&self) -> Option<ViewIds> {
        Some(ViewIds::Elements {
            id: ViewListId::default(),
            count: 0,
        })
    }

    fn apply_nodes(
        &self,
        _start: &mut usize,
        _style: IteratorStyle,
        _transform: &mut SublistTransform,
        _body: &mut ApplyBody<'_>,
    ) -> bool {
        true
    }
}

/// A list over one run of element generators in one implicit scope.
#[derive(Clone, Debug)]
pub struct BaseViewList {
    elements: Rc<dyn Elements>,
    implicit_id: i32,
    traits: ViewTraits,
}

impl BaseViewList {
    /// Creates a list over `elements`.
    #[must_use]
    pub fn new(elements: Rc<dyn Elements>, implicit_id: i32, traits: ViewTraits) -> Self {
        Self {
            elements,
            implicit_id,
            traits,
        }
    }

    /// Returns the generators.
    #[must_use]
    pub fn elements(&self) -> &Rc<dyn Elements> {
        &self.elements
    }
}

impl ViewList for BaseViewList {
    fn count(&self, style: IteratorStyle) -> usize {
        style.apply_granularity(self.elements.count())
    }

    fn traits(&self) -> ViewTraits {
        self.traits.clone()
    }

    fn view_ids(&self) -> Option<ViewIds> {
        Some(ViewIds::Elements {
            id: ViewListId::new(self.implicit_id),
            count: self.elements.count(),
        })
    }

    fn apply_nodes(
        &self,
        start: &mut usize,
        style: IteratorStyle,
        transform: &mut SublistTransform,
        body: &mut ApplyBody<'_>,
    ) -> bool {
        let count = self.count(style);
        if *start >= count {
            *start -= count;
            return true;
        }
        let sublist = Sublist {
            start: *start,
            count: self.elements.count(),
            id: ViewListId::new(self.implicit_id),
            elements: self.elements.clone(),
            traits: self.traits.clone(),
        };
        let result = body(start, style, Node::Sublist(sublist), transform);
        *start = 0;
        result
    }
}

/// A window `bounds` into another list.
#[derive(Clone, Debug)]
pub struct ViewListSlice {
    base: Rc<dyn ViewList>,
    bounds: Range<usize>,
}

impl ViewListSlice {
    /// Creates a window into `base`.
    #[must_use]
    pub fn new(base: Rc<dyn ViewList>, bounds: Range<usize>) -> Self {
        Self { base, bounds }
    }
}

/// Passes nodes to `body` until `remaining` elements have been visited,
/// cutting the last sublist short.
fn visit_clipped(
    remaining: &mut usize,
    stopped: &mut bool,
    body: &mut ApplyBody<'_>,
    start: &mut usize,
    style: IteratorStyle,
    node: Node<'_>,
    transform: &mut SublistTransform,
) -> bool {
    if *remaining == 0 {
        return false;
    }
    match node {
        Node::Sublist(mut sublist) => {
            let available = style.apply_granularity(sublist.count).saturating_sub(*start);
            let visible = available.min(*remaining);
            if visible < available && style.apply_granularity(1) == 1 {
                sublist.count = *start + visible;
            }
            *remaining -= visible;
            let result = body(start, style, Node::Sublist(sublist), transform);
            if !result {
                *stopped = true;
            }
            result && *remaining > 0
        }
        other => other.apply_nodes(start, style, transform, &mut |s, st, n, t| {
            visit_clipped(remaining, stopped, body, s, st, n, t)
        }),
    }
}

impl ViewList for ViewListSlice {
    fn count(&self, _style: IteratorStyle) -> usize {
        self.bounds.len()
    }

    fn traits(&self) -> ViewTraits {
        self.base.traits()
    }

    fn view_ids(&self) -> Option<ViewIds> {
        Some(ViewIds::Slice {
            base: Rc::new(self.base.view_ids()?),
            bounds: self.bounds.clone(),
        })
    }

    fn apply_nodes(
        &self,
        start: &mut usize,
        style: IteratorStyle,
        transform: &mut SublistTransform,
        body: &mut ApplyBody<'_>,
    ) -> bool {
        let count = self.bounds.len();
        if *start >= count {
            *start -= count;
            return true;
        }
        let mut remaining = count - *start;
        let mut stopped = false;
        let mut inner = self.bounds.start + *start;
        self.base
            .apply_nodes(&mut inner, style, transform, &mut |s, st, n, t| {
                visit_clipped(&mut remaining, &mut stopped, body, s, st, n, t)
            });
        *start = 0;
        !stopped
    }

    fn edit(&self, id: &ViewListId, since: TransactionId) -> Option<Edit> {
        self.base.edit(id, since)
    }

    fn first_offset(&self, id: &ExplicitId, style: IteratorStyle) -> Option<usize> {
        let offset = self.base.first_offset(id, style)?;
        offset
            .checked_sub(self.bounds.start)
            .filter(|o| *o < self.bounds.len())
    }
}

#[derive(Debug)]
struct BindExplicit {
    id: ExplicitId,
    owner: Option<tessera_graph::AttributeId>,
    is_unary: bool,
    reuse_id: i32,
}

impl TransformItem for BindExplicit {
    fn apply(&self, sublist: &mut Sublist) {
        self.bind_id(&mut sublist.id);
    }

    fn bind_id(&self, id: &mut ViewListId) {
        id.bind(self.id.clone(), self.owner, self.is_unary, self.reuse_id);
    }
}

/// A list whose elements all carry one explicit ID.
///
/// The binding is unary when the base list has exactly one element, so the
/// element keeps its identity wherever it moves.
#[derive(Debug)]
pub struct BindIdList {
    base: Rc<dyn ViewList>,
    binding: Rc<BindExplicit>,
}

impl BindIdList {
    /// Binds `id` to every element of `base`.
    #[must_use]
    pub fn new(
        base: Rc<dyn ViewList>,
        id: ExplicitId,
        owner: Option<tessera_graph::AttributeId>,
        reuse_id: i32,
    ) -> Self {
        let is_unary = base.count(IteratorStyle::PLAIN) == 1;
        Self {
            base,
            binding: Rc::new(BindExplicit {
                id,
                owner,
                is_unary,
                reuse_id,
            }),
        }
    }

    /// Returns the bound ID.
    #[must_use]
    pub fn id(&self) -> &ExplicitId {
        &self.binding.id
    }
}

impl ViewList for BindIdList {
    fn count(&self, style: IteratorStyle) -> usize {
        self.base.count(style)
    }

    fn estimated_count(&self, style: IteratorStyle) -> usize {
        self.base.estimated_count(style)
    }

    fn traits(&self) -> ViewTraits {
        self.base.traits()
    }

    fn view_ids(&self) -> Option<ViewIds> {
        match self.base.view_ids()? {
            ViewIds::Elements { mut id, count } => {
                self.binding.bind_id(&mut id);
                Some(ViewIds::Elements { id, count })
            }
            _ => None,
        }
    }

    fn apply_nodes(
        &self,
        start: &mut usize,
        style: IteratorStyle,
        transform: &mut SublistTransform,
        body: &mut ApplyBody<'_>,
    ) -> bool {
        transform.push(self.binding.clone());
        let result = self.base.apply_nodes(start, style, transform, body);
        transform.pop();
        result
    }

    fn edit(&self, id: &ViewListId, since: TransactionId) -> Option<Edit> {
        self.base.edit(id, since)
    }

    fn first_offset(&self, id: &ExplicitId, style: IteratorStyle) -> Option<usize> {
        if *id == self.binding.id {
            Some(0)
        } else {
            self.base.first_offset(id, style)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ViewNode;
    use crate::view_list::{BaseInputs, Group, MergedElements, UnaryElements, sublists};
    use alloc::vec::Vec;

    fn leaf(count: usize, implicit_id: i32) -> Rc<dyn ViewList> {
        let parts = (0..count)
            .map(|_| {
                Rc::new(UnaryElements::new(ViewNode::Empty, BaseInputs::default()))
                    as Rc<dyn Elements>
            })
            .collect();
        Rc::new(BaseViewList::new(
            Rc::new(MergedElements::new(parts)),
            implicit_id,
            ViewTraits::default(),
        ))
    }

    #[test]
    fn base_list_emits_one_sublist() {
        let list = leaf(3, 7);
        let found = sublists(&*list, IteratorStyle::PLAIN);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].count, 3);
        assert_eq!(found[0].id.implicit_id(), 7);
        assert_eq!(list.count(IteratorStyle::with_granularity(2)), 6);
    }

    #[test]
    fn empty_list_visits_nothing() {
        assert!(sublists(&EmptyViewList, IteratorStyle::PLAIN).is_empty());
        assert!(EmptyViewList.is_empty());
    }

    #[test]
    fn slice_clips_both_ends() {
        let base: Rc<dyn ViewList> = Rc::new(Group::new(alloc::vec![leaf(3, 0), leaf(4, 1)]));
        let slice = ViewListSlice::new(base, 2..5);
        assert_eq!(slice.count(IteratorStyle::PLAIN), 3);
        let runs: Vec<_> = sublists(&slice, IteratorStyle::PLAIN)
            .into_iter()
            .map(|s| (s.id.implicit_id(), s.start, s.count))
            .collect();
        assert_eq!(runs, alloc::vec![(0, 2, 3), (1, 0, 2)]);
    }

    #[test]
    fn slice_inside_group_does_not_stop_siblings() {
        let slice: Rc<dyn ViewList> = Rc::new(ViewListSlice::new(leaf(4, 0), 0..2));
        let group = Group::new(alloc::vec![slice, leaf(1, 1)]);
        let found = sublists(&group, IteratorStyle::PLAIN);
        assert_eq!(found.len(), 2);
        assert_eq!(group.count(IteratorStyle::PLAIN), 3);
    }

    #[test]
    fn slice_view_ids_window_base() {
        let slice = ViewListSlice::new(leaf(5, 3), 1..4);
        let ids = slice.view_ids().unwrap();
        assert_eq!(ids.len(), 3);
        assert_eq!(ids.get(0).unwrap().index(), 1);
    }

    #[test]
    fn bound_id_reaches_sublists() {
        let list = BindIdList::new(leaf(1, 0), ExplicitId::from("a"), None, 0);
        let found = sublists(&list, IteratorStyle::PLAIN);
        let canonical = found[0].id.element_id(0).canonical();
        assert_eq!(canonical, ViewListId::explicit("a").canonical());
        assert_eq!(list.first_offset(&ExplicitId::from("a"), IteratorStyle::PLAIN), Some(0));
        assert_eq!(list.first_offset(&ExplicitId::from("b"), IteratorStyle::PLAIN), None);
    }
}
