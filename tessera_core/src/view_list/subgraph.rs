// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reference-counted ownership of the subgraphs behind list elements.
//!
//! A list element's graph state lives in a subgraph. Rebuilt lists may keep
//! handing that state to new elements, so the subgraph is torn down only
//! when the last [`Release`] token and its creator have both let go. Tear
//! down needs the graph, which list values do not hold; dropped subgraphs
//! are queued on a [`ReleaseQueue`] that the view graph flushes after each
//! update.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::any::Any;
use core::cell::{Cell, RefCell};
use core::fmt;

use tessera_graph::{Graph, SubgraphId};

use super::{
    ApplyBody, Edit, ElementKind, Elements, ExplicitId, IteratorStyle, MakeBody, Sublist,
    SublistTransform, TransactionId, TransformItem, ViewIds, ViewList, ViewListId, ViewTraits,
};

/// A subgraph whose last reference went away.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReleasedSubgraph {
    /// The subgraph to tear down.
    pub subgraph: SubgraphId,
    /// Whether it was still attached to its parent when released.
    pub is_inserted: bool,
}

/// Subgraphs waiting to be torn down.
#[derive(Clone, Default)]
pub struct ReleaseQueue {
    pending: Rc<RefCell<Vec<ReleasedSubgraph>>>,
}

impl ReleaseQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, released: ReleasedSubgraph) {
        self.pending.borrow_mut().push(released);
    }

    /// Returns the number of queued subgraphs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Returns whether nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }

    /// Removes and returns every queued subgraph.
    pub fn drain(&self) -> Vec<ReleasedSubgraph> {
        core::mem::take(&mut *self.pending.borrow_mut())
    }

    /// Tears down every queued subgraph still alive in `graph`.
    ///
    /// Returns the number of subgraphs invalidated.
    pub fn flush(&self, graph: &mut Graph) -> usize {
        let mut invalidated = 0;
        for released in self.drain() {
            if graph.is_valid(released.subgraph) {
                graph.invalidate_subgraph(released.subgraph);
                invalidated += 1;
            }
        }
        invalidated
    }
}

impl fmt::Debug for ReleaseQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReleaseQueue")
            .field("pending", &self.len())
            .finish()
    }
}

/// A subgraph shared by the list elements built inside it.
///
/// The creator holds the first reference and gives it up with
/// [`remove`](Self::remove). Each [`Release`] token holds another.
pub struct ListSubgraph {
    subgraph: SubgraphId,
    refcount: Cell<u32>,
    queue: ReleaseQueue,
}

impl ListSubgraph {
    /// Takes ownership of `subgraph`, queueing it on `queue` when released.
    #[must_use]
    pub fn new(subgraph: SubgraphId, queue: ReleaseQueue) -> Rc<Self> {
        Rc::new(Self {
            subgraph,
            refcount: Cell::new(1),
            queue,
        })
    }

    /// Returns the owned subgraph.
    #[must_use]
    pub fn subgraph(&self) -> SubgraphId {
        self.subgraph
    }

    /// Returns the number of live references.
    #[must_use]
    pub fn refcount(&self) -> u32 {
        self.refcount.get()
    }

    /// Returns whether the subgraph is still referenced.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.refcount.get() != 0
    }

    fn retain(&self) {
        self.refcount.set(self.refcount.get().wrapping_add(1));
    }

    fn release(&self, is_inserted: bool) {
        let count = self.refcount.get();
        if count == 0 {
            return;
        }
        self.refcount.set(count - 1);
        if count == 1 {
            self.queue.push(ReleasedSubgraph {
                subgraph: self.subgraph,
                is_inserted,
            });
        }
    }

    /// Gives up the creator's reference after detaching from the parent.
    pub fn remove(&self) {
        self.release(false);
    }

    /// Wraps `base` so its elements are only made while this subgraph lives.
    #[must_use]
    pub fn wrap_elements(self: &Rc<Self>, base: Rc<dyn Elements>) -> Rc<dyn Elements> {
        Rc::new(SubgraphElements {
            base,
            subgraph: self.clone(),
        })
    }

    /// Wraps `base` so every sublist below it is tied to this subgraph.
    #[must_use]
    pub fn wrap_list(self: &Rc<Self>, base: Rc<dyn ViewList>) -> Rc<dyn ViewList> {
        Rc::new(SubgraphList {
            base,
            subgraph: self.clone(),
        })
    }
}

impl fmt::Debug for ListSubgraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListSubgraph")
            .field("subgraph", &self.subgraph)
            .field("refcount", &self.refcount.get())
            .finish_non_exhaustive()
    }
}

/// A token keeping list subgraphs alive.
///
/// Dropping the token releases one reference on each subgraph it holds.
pub struct Release {
    subgraphs: Vec<Rc<ListSubgraph>>,
}

impl Release {
    fn retaining(base: Option<Self>, subgraph: &Rc<ListSubgraph>) -> Self {
        subgraph.retain();
        let mut subgraphs = base.map(|mut b| core::mem::take(&mut b.subgraphs)).unwrap_or_default();
        subgraphs.push(subgraph.clone());
        Self { subgraphs }
    }

    /// Combines two tokens into one.
    #[must_use]
    pub fn merge(mut self, mut other: Self) -> Self {
        self.subgraphs.append(&mut other.subgraphs);
        self
    }

    /// Returns the number of subgraphs held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subgraphs.len()
    }

    /// Returns whether the token holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subgraphs.is_empty()
    }
}

impl Drop for Release {
    fn drop(&mut self) {
        for subgraph in &self.subgraphs {
            subgraph.release(true);
        }
    }
}

impl PartialEq for Release {
    fn eq(&self, other: &Self) -> bool {
        self.subgraphs.len() == other.subgraphs.len()
            && self
                .subgraphs
                .iter()
                .zip(&other.subgraphs)
                .all(|(a, b)| Rc::ptr_eq(a, b))
    }
}

impl fmt::Debug for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.subgraphs.iter().map(|s| s.subgraph))
            .finish()
    }
}

#[derive(Debug)]
struct SubgraphElements {
    base: Rc<dyn Elements>,
    subgraph: Rc<ListSubgraph>,
}

impl Elements for SubgraphElements {
    fn kind(&self) -> ElementKind {
        ElementKind::Subgraph
    }

    fn count(&self) -> usize {
        self.base.count()
    }

    fn make_elements(&self, start: &mut usize, body: &mut MakeBody<'_>) -> bool {
        if !self.subgraph.is_valid() {
            return true;
        }
        self.base.make_elements(start, body)
    }

    fn try_to_reuse_element(&self, index: usize, other: &dyn Elements, other_index: usize) -> bool {
        if other.kind() != ElementKind::Subgraph {
            return false;
        }
        let Some(other) = other.as_any().downcast_ref::<Self>() else {
            return false;
        };
        if !other.subgraph.is_valid() {
            return false;
        }
        self.base
            .try_to_reuse_element(index, &*other.base, other_index)
    }

    fn retain(&self) -> Option<Release> {
        if !self.subgraph.is_valid() {
            return None;
        }
        Some(Release::retaining(self.base.retain(), &self.subgraph))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug)]
struct SubgraphTransform {
    subgraph: Rc<ListSubgraph>,
}

impl TransformItem for SubgraphTransform {
    fn apply(&self, sublist: &mut Sublist) {
        sublist.elements = self.subgraph.wrap_elements(sublist.elements.clone());
    }

    fn bind_id(&self, _id: &mut ViewListId) {}
}

#[derive(Debug)]
struct SubgraphList {
    base: Rc<dyn ViewList>,
    subgraph: Rc<ListSubgraph>,
}

impl ViewList for SubgraphList {
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
        self.base.view_ids()
    }

    fn apply_nodes(
        &self,
        start: &mut usize,
        style: IteratorStyle,
        transform: &mut SublistTransform,
        body: &mut ApplyBody<'_>,
    ) -> bool {
        transform.push(Rc::new(SubgraphTransform {
            subgraph: self.subgraph.clone(),
        }));
        let result = self.base.apply_nodes(start, style, transform, body);
        transform.pop();
        result
    }

    fn edit(&self, id: &ViewListId, since: TransactionId) -> Option<Edit> {
        self.base.edit(id, since)
    }

    fn first_offset(&self, id: &ExplicitId, style: IteratorStyle) -> Option<usize> {
        self.base.first_offset(id, style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ViewNode;
    use crate::view_list::{BaseInputs, BaseViewList, UnaryElements, sublists};

    fn make_graph_subgraph(graph: &mut Graph) -> SubgraphId {
        let root = graph.root_subgraph();
        graph.subgraph(root)
    }

    #[test]
    fn creator_release_queues_subgraph() {
        let mut graph = Graph::new();
        let queue = ReleaseQueue::new();
        let id = make_graph_subgraph(&mut graph);
        let owned = ListSubgraph::new(id, queue.clone());
        assert_eq!(owned.refcount(), 1);
        owned.remove();
        assert!(!owned.is_valid());
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.flush(&mut graph), 1);
        assert!(!graph.is_valid(id));
    }

    #[test]
    fn release_token_outlives_creator() {
        let mut graph = Graph::new();
        let queue = ReleaseQueue::new();
        let id = make_graph_subgraph(&mut graph);
        let owned = ListSubgraph::new(id, queue.clone());
        let elements = owned.wrap_elements(Rc::new(UnaryElements::new(
            ViewNode::Empty,
            BaseInputs::default(),
        )));
        let token = elements.retain().unwrap();
        assert_eq!(owned.refcount(), 2);

        owned.remove();
        assert!(queue.is_empty(), "token still holds the subgraph");
        drop(token);
        let released = queue.drain();
        assert_eq!(
            released,
            [ReleasedSubgraph {
                subgraph: id,
                is_inserted: true
            }]
        );
    }

    #[test]
    fn dead_subgraph_makes_nothing_and_refuses_reuse() {
        let mut graph = Graph::new();
        let queue = ReleaseQueue::new();
        let id = make_graph_subgraph(&mut graph);
        let owned = ListSubgraph::new(id, queue);
        let elements = owned.wrap_elements(Rc::new(UnaryElements::new(
            ViewNode::Empty,
            BaseInputs::default(),
        )));
        let live_copy = owned.wrap_elements(Rc::new(UnaryElements::new(
            ViewNode::Empty,
            BaseInputs::default(),
        )));
        assert!(elements.try_to_reuse_element(0, &*live_copy, 0));

        owned.remove();
        let mut made = 0;
        elements.make_elements(&mut 0, &mut |_| {
            made += 1;
            true
        });
        assert_eq!(made, 0);
        assert!(!elements.try_to_reuse_element(0, &*live_copy, 0));
        assert!(elements.retain().is_none());
    }

    #[test]
    fn wrapped_list_ties_sublists_to_subgraph() {
        let mut graph = Graph::new();
        let id = make_graph_subgraph(&mut graph);
        let owned = ListSubgraph::new(id, ReleaseQueue::new());
        let base: Rc<dyn ViewList> = Rc::new(BaseViewList::new(
            Rc::new(UnaryElements::new(ViewNode::Empty, BaseInputs::default())),
            0,
            ViewTraits::default(),
        ));
        let list = owned.wrap_list(base);
        let found = sublists(&*list, IteratorStyle::PLAIN);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].elements.kind(), ElementKind::Subgraph);
    }
}
