// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Attribute and subgraph handles.

use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

/// Sentinel value indicating "no slot" in index fields.
pub(crate) const INVALID: u32 = u32::MAX;

/// An untyped handle to an attribute in a [`Graph`](crate::Graph).
///
/// Contains both a slot index and a generation counter so that stale handles
/// can be detected after an attribute is destroyed and the slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributeId {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

impl AttributeId {
    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}@gen{}", self.idx, self.generation)
    }
}

/// A typed handle to an attribute holding a `T`.
///
/// Handles are `Copy` and do not keep the attribute alive; the owning
/// [`SubgraphId`] does.
pub struct Attribute<T> {
    pub(crate) id: AttributeId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Attribute<T> {
    #[inline]
    pub(crate) const fn new(id: AttributeId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    /// Returns the untyped handle.
    #[inline]
    #[must_use]
    pub const fn id(self) -> AttributeId {
        self.id
    }
}

impl<T> Clone for Attribute<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Attribute<T> {}

impl<T> PartialEq for Attribute<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Attribute<T> {}

impl<T> Hash for Attribute<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for Attribute<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Attribute({:?})", self.id)
    }
}

/// A handle to a subgraph: a group of attributes torn down together.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubgraphId {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

impl SubgraphId {
    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }
}

impl fmt::Debug for SubgraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubgraphId({}@gen{})", self.idx, self.generation)
    }
}
