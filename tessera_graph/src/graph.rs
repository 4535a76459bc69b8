// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays attribute storage with push invalidation and pull
//! recomputation.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use crate::dirty;
use crate::error::GraphError;
use crate::id::{Attribute, AttributeId, INVALID, SubgraphId};
use crate::rule::{AnyRule, Rule, RuleContext};
use crate::subgraph::SubgraphStore;
use crate::value::{AnyValue, Value, boxed};

/// Whether a slot holds an input or a rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CellKind {
    Input,
    Rule,
}

/// Counters describing evaluation work, for diagnostics and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EvalStats {
    /// Number of times a rule's `update` ran.
    pub rule_runs: u64,
    /// Number of stale rules whose recomputation was skipped because none of
    /// their dependencies changed value.
    pub cutoffs: u64,
    /// Number of input assignments that changed a value.
    pub input_changes: u64,
}

/// An arena of attributes.
///
/// See the [crate docs](crate) for the evaluation model.
pub struct Graph {
    // -- Cell storage --
    pub(crate) values: Vec<Option<Box<dyn AnyValue>>>,
    pub(crate) rules: Vec<Option<Box<dyn AnyRule>>>,
    pub(crate) kinds: Vec<CellKind>,
    pub(crate) owner: Vec<u32>,

    // -- Versioning --
    /// Revision at which each value last changed.
    pub(crate) changed_at: Vec<u64>,
    /// Revision at which each value was last known to be current.
    pub(crate) verified_at: Vec<u64>,
    pub(crate) stale: Vec<bool>,
    pub(crate) deps: Vec<Vec<AttributeId>>,
    pub(crate) revision: u64,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) live: Vec<bool>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Subgraphs --
    pub(crate) subgraphs: SubgraphStore,
    pub(crate) current: SubgraphId,

    pub(crate) stats: EvalStats,
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("attributes", &self.attribute_count())
            .field("revision", &self.revision)
            .field("current", &self.current)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    /// Creates an empty graph with a single root subgraph.
    #[must_use]
    pub fn new() -> Self {
        let mut subgraphs = SubgraphStore::default();
        let root = subgraphs.allocate(INVALID);
        Self {
            values: Vec::new(),
            rules: Vec::new(),
            kinds: Vec::new(),
            owner: Vec::new(),
            changed_at: Vec::new(),
            verified_at: Vec::new(),
            stale: Vec::new(),
            deps: Vec::new(),
            revision: 0,
            generation: Vec::new(),
            live: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            subgraphs,
            current: root,
            stats: EvalStats::default(),
        }
    }

    // -- Allocation API --

    /// Creates an input attribute in the current subgraph.
    pub fn input<T: Value>(&mut self, value: T) -> Attribute<T> {
        let id = self.allocate(CellKind::Input, Some(boxed(value)), None);
        self.revision += 1;
        self.changed_at[id.idx as usize] = self.revision;
        self.verified_at[id.idx as usize] = self.revision;
        Attribute::new(id)
    }

    /// Creates a rule attribute in the current subgraph.
    ///
    /// The rule does not run until the attribute is first read.
    pub fn rule<R: Rule>(&mut self, rule: R) -> Attribute<R::Value> {
        Attribute::new(self.allocate(CellKind::Rule, None, Some(Box::new(rule))))
    }

    fn allocate(
        &mut self,
        kind: CellKind,
        value: Option<Box<dyn AnyValue>>,
        rule: Option<Box<dyn AnyRule>>,
    ) -> AttributeId {
        let stale = kind == CellKind::Rule;
        let owner = self.current.idx;
        let idx = if let Some(idx) = self.free_list.pop() {
            let i = idx as usize;
            self.generation[i] += 1;
            self.values[i] = value;
            self.rules[i] = rule;
            self.kinds[i] = kind;
            self.owner[i] = owner;
            self.changed_at[i] = 0;
            self.verified_at[i] = 0;
            self.stale[i] = stale;
            self.deps[i].clear();
            self.live[i] = true;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.values.push(value);
            self.rules.push(rule);
            self.kinds.push(kind);
            self.owner.push(owner);
            self.changed_at.push(0);
            self.verified_at.push(0);
            self.stale.push(stale);
            self.deps.push(Vec::new());
            self.generation.push(0);
            self.live.push(true);
            idx
        };
        self.subgraphs.attributes[owner as usize].push(idx);
        AttributeId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Destroys one attribute. Dependents are marked stale.
    pub(crate) fn free(&mut self, idx: u32) {
        let i = idx as usize;
        self.dirty.mark_with(idx, dirty::VALUE, &EagerPolicy);
        self.flush_invalidations();
        self.dirty.remove_key(idx);
        self.values[i] = None;
        self.rules[i] = None;
        self.deps[i].clear();
        self.stale[i] = false;
        self.live[i] = false;
        self.generation[i] += 1;
        self.free_list.push(idx);
    }

    /// Returns whether the given handle refers to a live attribute.
    #[must_use]
    pub fn is_alive(&self, id: AttributeId) -> bool {
        id.idx < self.len
            && self.live[id.idx as usize]
            && self.generation[id.idx as usize] == id.generation
    }

    /// Returns the number of live attributes.
    #[must_use]
    pub fn attribute_count(&self) -> usize {
        self.live.iter().filter(|l| **l).count()
    }

    /// Returns the evaluation counters.
    #[must_use]
    pub fn stats(&self) -> EvalStats {
        self.stats
    }

    /// Returns the graph's current revision. Every value change bumps it.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // -- Input API --

    /// Assigns a new value to an input attribute.
    ///
    /// Returns `false` and does nothing if the value equals the current one.
    /// Otherwise every transitive dependent is marked stale.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or refers to a rule.
    pub fn set<T: Value>(&mut self, attr: Attribute<T>, value: T) -> bool {
        match self.try_set(attr, value) {
            Ok(changed) => changed,
            Err(err) => panic!("{err}"),
        }
    }

    /// Fallible form of [`set`](Self::set).
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::StaleAttribute`] for a destroyed attribute and
    /// [`GraphError::NotAnInput`] for a rule.
    pub fn try_set<T: Value>(&mut self, attr: Attribute<T>, value: T) -> Result<bool, GraphError> {
        let id = attr.id;
        if !self.is_alive(id) {
            return Err(GraphError::StaleAttribute(id));
        }
        let i = id.idx as usize;
        if self.kinds[i] != CellKind::Input {
            return Err(GraphError::NotAnInput(id));
        }
        let unchanged = self.values[i]
            .as_deref()
            .and_then(|v| v.as_any().downcast_ref::<T>())
            .is_some_and(|old| *old == value);
        if unchanged {
            return Ok(false);
        }
        self.values[i] = Some(boxed(value));
        self.revision += 1;
        self.changed_at[i] = self.revision;
        self.verified_at[i] = self.revision;
        self.stats.input_changes += 1;
        self.dirty.mark_with(id.idx, dirty::VALUE, &EagerPolicy);
        self.flush_invalidations();
        Ok(true)
    }

    /// Marks a rule and its dependents stale without changing any input.
    ///
    /// The rule re-runs on the next read. Use this when a rule consults state
    /// outside the graph.
    pub fn invalidate_value(&mut self, id: AttributeId) {
        self.validate(id);
        if self.kinds[id.idx as usize] == CellKind::Rule {
            // Dropping the value forces a re-run instead of a memo check.
            self.stale[id.idx as usize] = true;
            self.values[id.idx as usize] = None;
        }
        self.dirty.mark_with(id.idx, dirty::VALUE, &EagerPolicy);
        self.flush_invalidations();
    }

    /// Converts pending dirty marks into stale bits.
    fn flush_invalidations(&mut self) {
        let affected: Vec<u32> = self
            .dirty
            .drain(dirty::VALUE)
            .affected()
            .deterministic()
            .run()
            .collect();
        for idx in affected {
            let i = idx as usize;
            if i < self.live.len() && self.live[i] && self.kinds[i] == CellKind::Rule {
                self.stale[i] = true;
            }
        }
    }

    // -- Read API --

    /// Returns whether reading `attr` would run or memo-check its rule.
    #[must_use]
    pub fn is_stale<T>(&self, attr: Attribute<T>) -> bool {
        self.validate(attr.id);
        let i = attr.id.idx as usize;
        self.stale[i] || self.values[i].is_none()
    }

    /// Returns whether any live rule in the graph is stale.
    #[must_use]
    pub fn has_stale(&self) -> bool {
        (0..self.len as usize)
            .any(|i| self.live[i] && self.kinds[i] == CellKind::Rule && self.stale[i])
    }

    /// Returns whether the attribute is a rule marked [`Rule::ASYNC`].
    #[must_use]
    pub fn is_async(&self, id: AttributeId) -> bool {
        self.validate(id);
        self.rules[id.idx as usize]
            .as_deref()
            .is_some_and(|r| r.is_async())
    }

    /// Returns the current value of `attr`, recomputing it if needed.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or if the attribute is read while its own
    /// rule is running.
    pub fn value<T: Value>(&mut self, attr: Attribute<T>) -> T {
        match self.try_value(attr) {
            Ok(v) => v,
            Err(err) => panic!("{err}"),
        }
    }

    /// Fallible form of [`value`](Self::value).
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::StaleAttribute`] for a destroyed attribute and
    /// [`GraphError::Cycle`] when a rule transitively reads itself.
    pub fn try_value<T: Value>(&mut self, attr: Attribute<T>) -> Result<T, GraphError> {
        if !self.is_alive(attr.id) {
            return Err(GraphError::StaleAttribute(attr.id));
        }
        self.update(attr.id)?;
        self.cached(attr).ok_or(GraphError::StaleAttribute(attr.id))
    }

    /// Returns the stored value without bringing it up to date.
    #[must_use]
    pub fn cached<T: Value>(&self, attr: Attribute<T>) -> Option<T> {
        if !self.is_alive(attr.id) {
            return None;
        }
        self.values[attr.id.idx as usize]
            .as_deref()
            .and_then(|v| v.as_any().downcast_ref::<T>())
            .cloned()
    }

    /// Brings one attribute up to date.
    fn update(&mut self, id: AttributeId) -> Result<(), GraphError> {
        let i = id.idx as usize;
        if self.kinds[i] == CellKind::Input {
            return Ok(());
        }
        if !self.stale[i] && self.values[i].is_some() {
            return Ok(());
        }
        if self.rules[i].is_none() {
            return Err(GraphError::Cycle(id));
        }
        if self.values[i].is_some() && !self.dependencies_changed(id)? {
            self.stale[i] = false;
            self.verified_at[i] = self.revision;
            self.stats.cutoffs += 1;
            return Ok(());
        }
        self.recompute(id);
        Ok(())
    }

    /// Pulls each recorded dependency and reports whether any changed value
    /// after this attribute was last verified.
    fn dependencies_changed(&mut self, id: AttributeId) -> Result<bool, GraphError> {
        let i = id.idx as usize;
        let deps = core::mem::take(&mut self.deps[i]);
        let mut changed = false;
        for &dep in &deps {
            if !self.is_alive(dep) {
                changed = true;
                break;
            }
            if let Err(err) = self.update(dep) {
                self.deps[i] = deps;
                return Err(err);
            }
            if self.changed_at[dep.idx as usize] > self.verified_at[i] {
                changed = true;
                break;
            }
        }
        self.deps[i] = deps;
        Ok(changed)
    }

    fn recompute(&mut self, id: AttributeId) {
        let i = id.idx as usize;
        let Some(mut rule) = self.rules[i].take() else {
            return;
        };

        // Drop the old edges; the rule may read a different set this time.
        let old = core::mem::take(&mut self.deps[i]);
        for dep in old {
            if self.is_alive(dep) {
                self.dirty.remove_dependency(id.idx, dep.idx, dirty::VALUE);
            }
        }

        let mut ctx = RuleContext {
            graph: self,
            attribute: id,
            deps: Vec::new(),
        };
        let value = rule.eval(&mut ctx);
        let deps = ctx.deps;

        self.rules[i] = Some(rule);
        for dep in &deps {
            if self.is_alive(*dep) {
                let _ = self.dirty.add_dependency(id.idx, dep.idx, dirty::VALUE);
            }
        }
        self.deps[i] = deps;
        self.stats.rule_runs += 1;

        let unchanged = self.values[i]
            .as_deref()
            .is_some_and(|old| old.dyn_eq(&*value));
        if !unchanged {
            self.values[i] = Some(value);
            self.revision += 1;
            self.changed_at[i] = self.revision;
        }
        self.verified_at[i] = self.revision;
        self.stale[i] = false;
    }

    /// Validates that a handle is still alive.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[inline]
    pub(crate) fn validate(&self, id: AttributeId) {
        assert!(self.is_alive(id), "stale attribute handle {id:?}");
    }
}
