// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element identity.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;
use core::ops::Range;

use tessera_graph::AttributeId;

/// A user-supplied identity for an element, such as a model key.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExplicitId {
    /// An integer key.
    Int(i64),
    /// A string key.
    Str(Rc<str>),
}

impl From<i64> for ExplicitId {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for ExplicitId {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<&str> for ExplicitId {
    fn from(value: &str) -> Self {
        Self::Str(Rc::from(value))
    }
}

impl fmt::Debug for ExplicitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Str(s) => write!(f, "{s:?}"),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
struct Explicit {
    id: ExplicitId,
    reuse_id: i32,
    owner: Option<AttributeId>,
    is_unary: bool,
}

/// The full identity of one element in a view list.
///
/// An identity combines the element's position, the implicit ID of the
/// scope that produced it, and any explicit IDs bound on the way down. Use
/// [`canonical`](Self::canonical) to compare identities across rebuilds.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ViewListId {
    index: i32,
    implicit_id: i32,
    explicit_ids: Vec<Explicit>,
}

impl ViewListId {
    /// Creates an identity in the given implicit scope, at index zero.
    #[must_use]
    pub fn new(implicit_id: i32) -> Self {
        Self {
            index: 0,
            implicit_id,
            explicit_ids: Vec::new(),
        }
    }

    /// Creates an identity carrying a single unary explicit ID.
    #[must_use]
    pub fn explicit(id: impl Into<ExplicitId>) -> Self {
        let mut this = Self::default();
        this.bind(id, None, true, 0);
        this
    }

    /// Returns the positional index.
    #[inline]
    #[must_use]
    pub fn index(&self) -> usize {
        usize::try_from(self.index).unwrap_or(0)
    }

    /// Returns the implicit scope ID.
    #[inline]
    #[must_use]
    pub const fn implicit_id(&self) -> i32 {
        self.implicit_id
    }

    /// Returns a copy identifying the element at `index` within this scope.
    #[must_use]
    pub fn element_id(&self, index: usize) -> Self {
        let mut id = self.clone();
        id.index = i32::try_from(index).unwrap_or(i32::MAX);
        id
    }

    /// Binds an explicit ID.
    ///
    /// A unary binding names a single element; its canonical form ignores
    /// position and scope entirely.
    pub fn bind(
        &mut self,
        id: impl Into<ExplicitId>,
        owner: Option<AttributeId>,
        is_unary: bool,
        reuse_id: i32,
    ) {
        self.explicit_ids.push(Explicit {
            id: id.into(),
            reuse_id,
            owner,
            is_unary,
        });
    }

    /// Returns the first bound explicit ID.
    #[must_use]
    pub fn primary_explicit_id(&self) -> Option<&ExplicitId> {
        self.explicit_ids.first().map(|e| &e.id)
    }

    /// Returns every bound explicit ID, outermost first.
    pub fn explicit_ids(&self) -> impl Iterator<Item = &ExplicitId> + '_ {
        self.explicit_ids.iter().map(|e| &e.id)
    }

    /// Returns the explicit ID bound by `owner`.
    #[must_use]
    pub fn explicit_id(&self, owner: AttributeId) -> Option<&ExplicitId> {
        self.explicit_ids
            .iter()
            .find(|e| e.owner == Some(owner))
            .map(|e| &e.id)
    }

    /// Returns whether `id` was bound anywhere in this identity.
    #[must_use]
    pub fn contains_id(&self, id: &ExplicitId) -> bool {
        self.explicit_ids.iter().any(|e| e.id == *id)
    }

    /// Collapses this identity into its comparable form.
    #[must_use]
    pub fn canonical(&self) -> CanonicalId {
        match self.explicit_ids.first() {
            None => CanonicalId {
                index: self.index,
                implicit_id: self.implicit_id,
                explicit_id: None,
            },
            Some(first) if first.is_unary => CanonicalId {
                index: 0,
                implicit_id: -1,
                explicit_id: Some(first.id.clone()),
            },
            Some(first) => CanonicalId {
                index: self.index,
                implicit_id: self.implicit_id,
                explicit_id: Some(first.id.clone()),
            },
        }
    }

    /// Returns the key under which recycled elements are matched.
    ///
    /// Unlike the canonical ID, this ignores explicit IDs themselves and
    /// keys on the reuse IDs bound alongside them.
    #[must_use]
    pub fn reuse_identifier(&self) -> ReuseIdentifier {
        ReuseIdentifier {
            index: self.index,
            implicit_id: self.implicit_id,
            reuse_ids: self.explicit_ids.iter().map(|e| e.reuse_id).collect(),
        }
    }
}

impl core::hash::Hash for ViewListId {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.implicit_id.hash(state);
        for explicit in &self.explicit_ids {
            explicit.id.hash(state);
            explicit.owner.hash(state);
        }
    }
}

impl fmt::Debug for ViewListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}:{}", self.implicit_id, self.index)?;
        for explicit in &self.explicit_ids {
            write!(f, "/{:?}", explicit.id)?;
        }
        Ok(())
    }
}

/// The rebuild-stable form of a [`ViewListId`].
///
/// Two elements with equal canonical IDs are the same logical child. When
/// the canonical ID of a position changes, state associated with the old
/// element must be discarded.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CanonicalId {
    index: i32,
    implicit_id: i32,
    explicit_id: Option<ExplicitId>,
}

impl CanonicalId {
    /// Returns the explicit component, if any.
    #[must_use]
    pub fn explicit_id(&self) -> Option<&ExplicitId> {
        self.explicit_id.as_ref()
    }

    /// Returns whether the implicit scope participates in this identity.
    #[must_use]
    pub const fn requires_implicit_id(&self) -> bool {
        self.implicit_id >= 0
    }
}

impl fmt::Debug for CanonicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.explicit_id {
            Some(id) => write!(f, "{id:?}"),
            None => write!(f, "@{}", self.index),
        }
    }
}

/// Key for matching recyclable elements.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ReuseIdentifier {
    index: i32,
    implicit_id: i32,
    reuse_ids: Vec<i32>,
}

/// The identities of a list's elements, addressable by index.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewIds {
    /// `count` consecutive elements of one scope.
    Elements {
        /// The scope identity; elements differ only by index.
        id: ViewListId,
        /// Number of elements.
        count: usize,
    },
    /// Several collections laid end to end.
    Joined(JoinedViews),
    /// A window into another collection.
    Slice {
        /// The collection being windowed.
        base: Rc<ViewIds>,
        /// The visible index range of `base`.
        bounds: Range<usize>,
    },
}

impl ViewIds {
    /// Returns the number of identities.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Elements { count, .. } => *count,
            Self::Joined(joined) => joined.len(),
            Self::Slice { bounds, .. } => bounds.len(),
        }
    }

    /// Returns whether there are no identities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the identity at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<ViewListId> {
        match self {
            Self::Elements { id, count } => (index < *count).then(|| id.element_id(index)),
            Self::Joined(joined) => joined.get(index),
            Self::Slice { base, bounds } => {
                if index < bounds.len() {
                    base.get(bounds.start + index)
                } else {
                    None
                }
            }
        }
    }

    /// Returns the index of the first element whose canonical ID is `id`.
    #[must_use]
    pub fn position(&self, id: &CanonicalId) -> Option<usize> {
        (0..self.len()).find(|&i| self.get(i).is_some_and(|e| e.canonical() == *id))
    }
}

/// Collections of identities joined end to end.
///
/// Lookup by index is a binary search over the cumulative end offsets.
#[derive(Clone, Debug, PartialEq)]
pub struct JoinedViews {
    views: Vec<(ViewIds, usize)>,
    count: usize,
}

impl JoinedViews {
    /// Joins `views` in order.
    #[must_use]
    pub fn new(views: Vec<ViewIds>) -> Self {
        let mut offset = 0;
        let views = views
            .into_iter()
            .map(|v| {
                offset += v.len();
                (v, offset)
            })
            .collect();
        Self {
            views,
            count: offset,
        }
    }

    /// Returns the total number of identities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns whether there are no identities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the identity at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<ViewListId> {
        let part = self.views.partition_point(|(_, end)| *end <= index);
        let (views, _) = self.views.get(part)?;
        let local = match part {
            0 => index,
            _ => index - self.views[part - 1].1,
        };
        views.get(local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use proptest::prelude::*;

    #[test]
    fn implicit_identity_uses_position() {
        let scope = ViewListId::new(3);
        let a = scope.element_id(0).canonical();
        let b = scope.element_id(1).canonical();
        assert_ne!(a, b);
        assert!(a.requires_implicit_id());
        assert_eq!(a.explicit_id(), None);
    }

    #[test]
    fn non_unary_binding_keeps_position() {
        let mut id = ViewListId::new(2);
        id.bind(7, None, false, 0);
        let a = id.element_id(0).canonical();
        let b = id.element_id(1).canonical();
        assert_ne!(a, b);
        assert_eq!(a.explicit_id(), Some(&ExplicitId::Int(7)));
    }

    #[test]
    fn unary_binding_drops_scope() {
        let a = ViewListId::explicit("row").canonical();
        assert!(!a.requires_implicit_id());
        assert_eq!(alloc::format!("{a:?}"), "\"row\"");
    }

    #[test]
    fn owner_lookup_and_contains() {
        let mut id = ViewListId::new(0);
        id.bind(1, None, false, 0);
        id.bind("x", None, true, 4);
        assert!(id.contains_id(&ExplicitId::from("x")));
        assert!(!id.contains_id(&ExplicitId::from(2)));
        assert_eq!(id.primary_explicit_id(), Some(&ExplicitId::Int(1)));
        assert_eq!(id.explicit_ids().count(), 2);
    }

    #[test]
    fn reuse_identifier_ignores_explicit_values() {
        let mut a = ViewListId::new(0);
        a.bind(1, None, true, 5);
        let mut b = ViewListId::new(0);
        b.bind(2, None, true, 5);
        assert_ne!(a.canonical(), b.canonical());
        assert_eq!(a.reuse_identifier(), b.reuse_identifier());
    }

    #[test]
    fn joined_views_index_mapping() {
        let joined = JoinedViews::new(vec![
            ViewIds::Elements {
                id: ViewListId::new(0),
                count: 2,
            },
            ViewIds::Elements {
                id: ViewListId::new(1),
                count: 0,
            },
            ViewIds::Elements {
                id: ViewListId::new(2),
                count: 3,
            },
        ]);
        assert_eq!(joined.len(), 5);
        let third = joined.get(2).unwrap();
        assert_eq!(third.implicit_id(), 2);
        assert_eq!(third.index(), 0);
        let last = joined.get(4).unwrap();
        assert_eq!(last.index(), 2);
        assert!(joined.get(5).is_none());
    }

    #[test]
    fn slice_and_position() {
        let base = Rc::new(ViewIds::Elements {
            id: ViewListId::new(9),
            count: 6,
        });
        let slice = ViewIds::Slice {
            base,
            bounds: 2..5,
        };
        assert_eq!(slice.len(), 3);
        assert_eq!(slice.get(0).unwrap().index(), 2);
        let target = ViewListId::new(9).element_id(4).canonical();
        assert_eq!(slice.position(&target), Some(2));
    }

    fn explicit_strategy() -> impl Strategy<Value = ExplicitId> {
        prop_oneof![
            any::<i64>().prop_map(ExplicitId::Int),
            "[a-z]{1,6}".prop_map(|s| ExplicitId::from(s.as_str())),
        ]
    }

    proptest! {
        #[test]
        fn canonical_is_idempotent(
            index in 0_usize..1000,
            implicit in -4_i32..64,
            bindings in proptest::collection::vec(
                (explicit_strategy(), any::<bool>(), 0_i32..4),
                0..4,
            ),
        ) {
            let mut id = ViewListId::new(implicit);
            for (explicit, unary, reuse) in bindings {
                id.bind(explicit, None, unary, reuse);
            }
            let id = id.element_id(index);
            prop_assert_eq!(id.canonical(), id.canonical());
        }

        #[test]
        fn unary_canonical_ignores_position(
            explicit in explicit_strategy(),
            a in 0_usize..1000,
            b in 0_usize..1000,
            scope_a in 0_i32..64,
            scope_b in 0_i32..64,
        ) {
            let mut first = ViewListId::new(scope_a);
            first.bind(explicit.clone(), None, true, 0);
            let mut second = ViewListId::new(scope_b);
            second.bind(explicit, None, true, 0);
            prop_assert_eq!(
                first.element_id(a).canonical(),
                second.element_id(b).canonical()
            );
        }
    }
}
