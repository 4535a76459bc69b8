// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Subgraph lifecycle: grouping attributes so they can be torn down together.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::graph::Graph;
use crate::id::{INVALID, SubgraphId};

type WillInvalidate = Box<dyn FnMut(SubgraphId)>;

/// Parallel arrays describing the subgraph tree.
#[derive(Default)]
pub(crate) struct SubgraphStore {
    pub(crate) parent: Vec<u32>,
    pub(crate) children: Vec<Vec<u32>>,
    pub(crate) attributes: Vec<Vec<u32>>,
    pub(crate) observers: Vec<Vec<WillInvalidate>>,
    pub(crate) generation: Vec<u32>,
    pub(crate) live: Vec<bool>,
    pub(crate) free_list: Vec<u32>,
}

impl SubgraphStore {
    pub(crate) fn allocate(&mut self, parent: u32) -> SubgraphId {
        let idx = if let Some(idx) = self.free_list.pop() {
            let i = idx as usize;
            self.generation[i] += 1;
            self.parent[i] = parent;
            self.children[i].clear();
            self.attributes[i].clear();
            self.observers[i].clear();
            self.live[i] = true;
            idx
        } else {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "subgraph count is bounded far below u32::MAX"
            )]
            let idx = self.parent.len() as u32;
            self.parent.push(parent);
            self.children.push(Vec::new());
            self.attributes.push(Vec::new());
            self.observers.push(Vec::new());
            self.generation.push(0);
            self.live.push(true);
            idx
        };
        if parent != INVALID {
            self.children[parent as usize].push(idx);
        }
        SubgraphId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    fn is_valid(&self, id: SubgraphId) -> bool {
        (id.idx as usize) < self.live.len()
            && self.live[id.idx as usize]
            && self.generation[id.idx as usize] == id.generation
    }
}

impl Graph {
    /// Returns the root subgraph.
    #[must_use]
    pub fn root_subgraph(&self) -> SubgraphId {
        SubgraphId {
            idx: 0,
            generation: self.subgraphs.generation[0],
        }
    }

    /// Returns the subgraph new attributes are created in.
    #[must_use]
    pub fn current_subgraph(&self) -> SubgraphId {
        self.current
    }

    /// Makes `id` the subgraph that new attributes are created in, returning
    /// the previous one.
    ///
    /// # Panics
    ///
    /// Panics if `id` has been invalidated.
    pub fn set_current_subgraph(&mut self, id: SubgraphId) -> SubgraphId {
        assert!(self.subgraphs.is_valid(id), "stale subgraph handle {id:?}");
        core::mem::replace(&mut self.current, id)
    }

    /// Runs `f` with `id` as the current subgraph.
    pub fn with_subgraph<R>(&mut self, id: SubgraphId, f: impl FnOnce(&mut Self) -> R) -> R {
        let previous = self.set_current_subgraph(id);
        let result = f(self);
        self.current = previous;
        result
    }

    /// Creates an empty subgraph as a child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` has been invalidated.
    pub fn subgraph(&mut self, parent: SubgraphId) -> SubgraphId {
        assert!(
            self.subgraphs.is_valid(parent),
            "stale subgraph handle {parent:?}"
        );
        self.subgraphs.allocate(parent.idx)
    }

    /// Returns whether `id` refers to a live subgraph.
    #[must_use]
    pub fn is_valid(&self, id: SubgraphId) -> bool {
        self.subgraphs.is_valid(id)
    }

    /// Returns the subgraph that owns the given attribute.
    #[must_use]
    pub fn owner(&self, attr: crate::AttributeId) -> SubgraphId {
        self.validate(attr);
        let idx = self.owner[attr.idx as usize];
        SubgraphId {
            idx,
            generation: self.subgraphs.generation[idx as usize],
        }
    }

    /// Returns the number of attributes owned directly by `id`.
    #[must_use]
    pub fn subgraph_len(&self, id: SubgraphId) -> usize {
        if self.subgraphs.is_valid(id) {
            self.subgraphs.attributes[id.idx as usize].len()
        } else {
            0
        }
    }

    /// Registers a callback that runs just before `id` is invalidated.
    pub fn on_will_invalidate(&mut self, id: SubgraphId, f: impl FnMut(SubgraphId) + 'static) {
        if self.subgraphs.is_valid(id) {
            self.subgraphs.observers[id.idx as usize].push(Box::new(f));
        }
    }

    /// Detaches `child` from `parent` without invalidating it.
    ///
    /// A detached subgraph lives until it is invalidated explicitly.
    pub fn remove_child(&mut self, parent: SubgraphId, child: SubgraphId) {
        if !self.subgraphs.is_valid(parent) || !self.subgraphs.is_valid(child) {
            return;
        }
        self.subgraphs.children[parent.idx as usize].retain(|c| *c != child.idx);
        if self.subgraphs.parent[child.idx as usize] == parent.idx {
            self.subgraphs.parent[child.idx as usize] = INVALID;
        }
    }

    /// Tears down `id`, its descendants, and every attribute they own.
    ///
    /// Attributes outside the subgraph that depended on a destroyed attribute
    /// are marked stale. Invalidating an already invalid subgraph is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if `id` is the root subgraph.
    pub fn invalidate_subgraph(&mut self, id: SubgraphId) {
        if !self.subgraphs.is_valid(id) {
            return;
        }
        assert!(id.idx != 0, "cannot invalidate the root subgraph");

        let children = core::mem::take(&mut self.subgraphs.children[id.idx as usize]);
        for child in children {
            let child_id = SubgraphId {
                idx: child,
                generation: self.subgraphs.generation[child as usize],
            };
            self.invalidate_subgraph(child_id);
        }

        let mut observers = core::mem::take(&mut self.subgraphs.observers[id.idx as usize]);
        for observer in &mut observers {
            observer(id);
        }

        let attributes = core::mem::take(&mut self.subgraphs.attributes[id.idx as usize]);
        for idx in attributes {
            if self.live[idx as usize] {
                self.free(idx);
            }
        }

        let parent = self.subgraphs.parent[id.idx as usize];
        if parent != INVALID {
            self.subgraphs.children[parent as usize].retain(|c| *c != id.idx);
        }
        if self.current == id {
            self.current = self.root_subgraph();
        }
        let i = id.idx as usize;
        self.subgraphs.live[i] = false;
        self.subgraphs.generation[i] += 1;
        self.subgraphs.parent[i] = INVALID;
        self.subgraphs.free_list.push(id.idx);
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use core::cell::Cell;

    use crate::{FnRule, Graph};

    #[test]
    fn attributes_are_created_in_current_subgraph() {
        let mut graph = Graph::new();
        let root = graph.root_subgraph();
        let child = graph.subgraph(root);
        let a = graph.with_subgraph(child, |g| g.input(1_u8));
        assert_eq!(graph.owner(a.id()), child);
        assert_eq!(graph.subgraph_len(child), 1);
        assert_eq!(graph.current_subgraph(), root);
    }

    #[test]
    fn invalidate_tears_down_descendants() {
        let mut graph = Graph::new();
        let root = graph.root_subgraph();
        let parent = graph.subgraph(root);
        let child = graph.subgraph(parent);
        let a = graph.with_subgraph(child, |g| g.input(1_u8));
        let b = graph.with_subgraph(parent, |g| g.input(2_u8));

        graph.invalidate_subgraph(parent);
        assert!(!graph.is_valid(parent));
        assert!(!graph.is_valid(child));
        assert!(!graph.is_alive(a.id()));
        assert!(!graph.is_alive(b.id()));
        assert_eq!(graph.attribute_count(), 0);

        // Idempotent.
        graph.invalidate_subgraph(parent);
    }

    #[test]
    fn will_invalidate_runs_once() {
        let mut graph = Graph::new();
        let root = graph.root_subgraph();
        let sub = graph.subgraph(root);
        let calls = Rc::new(Cell::new(0));
        let c = Rc::clone(&calls);
        graph.on_will_invalidate(sub, move |_| c.set(c.get() + 1));
        graph.invalidate_subgraph(sub);
        graph.invalidate_subgraph(sub);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn removed_child_survives_parent_invalidation() {
        let mut graph = Graph::new();
        let root = graph.root_subgraph();
        let parent = graph.subgraph(root);
        let child = graph.subgraph(parent);
        graph.remove_child(parent, child);
        graph.invalidate_subgraph(parent);
        assert!(graph.is_valid(child));
    }

    #[test]
    fn dependents_of_torn_down_attributes_go_stale() {
        let mut graph = Graph::new();
        let root = graph.root_subgraph();
        let sub = graph.subgraph(root);
        let source = graph.with_subgraph(sub, |g| g.input(5_i32));
        let fallback = graph.input(-1_i32);
        let alive = graph.input(true);
        let reader = graph.rule(FnRule::new(move |ctx| {
            if ctx.value(alive) { ctx.value(source) } else { ctx.value(fallback) }
        }));
        assert_eq!(graph.value(reader), 5);

        graph.invalidate_subgraph(sub);
        assert!(graph.is_stale(reader));
        graph.set(alive, false);
        assert_eq!(graph.value(reader), -1);
    }

    #[test]
    fn slots_are_recycled_with_new_generation() {
        let mut graph = Graph::new();
        let root = graph.root_subgraph();
        let sub = graph.subgraph(root);
        let old = graph.with_subgraph(sub, |g| g.input(1_u32));
        graph.invalidate_subgraph(sub);
        let new = graph.input(2_u32);
        assert_eq!(old.id().index(), new.id().index());
        assert_ne!(old.id(), new.id());
        assert!(graph.try_value(old).is_err());
    }
}
