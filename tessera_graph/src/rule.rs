// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rules: computations that produce an attribute's value from other attributes.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use core::marker::PhantomData;

use crate::graph::Graph;
use crate::id::{Attribute, AttributeId};
use crate::value::{AnyValue, Value, boxed};

/// A computation descriptor for one attribute.
///
/// `update` receives a [`RuleContext`] through which it reads other
/// attributes; every read is recorded as a dependency for the next
/// invalidation pass. Rules take `&mut self`, so a rule may carry private
/// state from one evaluation to the next.
pub trait Rule: 'static {
    /// The type of value produced.
    type Value: Value;

    /// Whether this rule may be evaluated away from the thread that defined
    /// it. Hosts consult this when deciding whether an update may be deferred
    /// to an asynchronous renderer.
    const ASYNC: bool = false;

    /// Computes the attribute's current value.
    fn update(&mut self, ctx: &mut RuleContext<'_>) -> Self::Value;
}

/// A [`Rule`] backed by a closure.
pub struct FnRule<F, T> {
    f: F,
    _marker: PhantomData<fn() -> T>,
}

impl<F, T> FnRule<F, T>
where
    F: FnMut(&mut RuleContext<'_>) -> T + 'static,
    T: Value,
{
    /// Wraps a closure as a rule.
    pub fn new(f: F) -> Self {
        Self {
            f,
            _marker: PhantomData,
        }
    }
}

impl<F, T> fmt::Debug for FnRule<F, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRule").finish_non_exhaustive()
    }
}

impl<F, T> Rule for FnRule<F, T>
where
    F: FnMut(&mut RuleContext<'_>) -> T + 'static,
    T: Value,
{
    type Value = T;

    fn update(&mut self, ctx: &mut RuleContext<'_>) -> T {
        (self.f)(ctx)
    }
}

/// Type-erased rule storage.
pub(crate) trait AnyRule {
    fn eval(&mut self, ctx: &mut RuleContext<'_>) -> Box<dyn AnyValue>;
    fn is_async(&self) -> bool;
}

impl<R: Rule> AnyRule for R {
    fn eval(&mut self, ctx: &mut RuleContext<'_>) -> Box<dyn AnyValue> {
        boxed(self.update(ctx))
    }

    fn is_async(&self) -> bool {
        R::ASYNC
    }
}

/// The evaluation context handed to [`Rule::update`].
pub struct RuleContext<'g> {
    pub(crate) graph: &'g mut Graph,
    pub(crate) attribute: AttributeId,
    pub(crate) deps: Vec<AttributeId>,
}

impl fmt::Debug for RuleContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleContext")
            .field("attribute", &self.attribute)
            .field("deps", &self.deps)
            .finish_non_exhaustive()
    }
}

impl RuleContext<'_> {
    /// Reads `attr`, bringing it up to date first, and records it as a
    /// dependency of the attribute being computed.
    pub fn value<T: Value>(&mut self, attr: Attribute<T>) -> T {
        if !self.deps.contains(&attr.id) {
            self.deps.push(attr.id);
        }
        self.graph.value(attr)
    }

    /// Returns the attribute whose rule is running.
    #[inline]
    #[must_use]
    pub fn attribute(&self) -> AttributeId {
        self.attribute
    }

    /// Returns the attribute's previous value, if it has been computed before.
    ///
    /// This does not record a dependency.
    #[must_use]
    pub fn previous<T: Value>(&self, attr: Attribute<T>) -> Option<T> {
        debug_assert_eq!(attr.id, self.attribute, "previous() reads the current attribute");
        self.graph.cached(attr)
    }

    /// Gives the rule direct access to the graph, for rules that build child
    /// attributes or subgraphs.
    ///
    /// Reads made through the returned reference are not recorded as
    /// dependencies.
    pub fn graph(&mut self) -> &mut Graph {
        self.graph
    }
}
