// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Insertion and removal history for lists whose contents change.

use alloc::rc::Rc;
use core::fmt;

use hashbrown::{HashMap, HashSet};

use super::{
    ApplyBody, CanonicalId, Edit, ExplicitId, IteratorStyle, SublistTransform, TransactionId,
    ViewIds, ViewList, ViewListId, ViewTraits,
};

/// The most recent edit seen for each element identity.
#[derive(Clone, Default, PartialEq)]
pub struct EditLog {
    entries: HashMap<CanonicalId, (TransactionId, Edit)>,
}

impl EditLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the difference between two generations of a list.
    ///
    /// Identities only in `new` are logged as inserted, identities only in
    /// `old` as removed, both at `transaction`.
    pub fn record(&mut self, old: &ViewIds, new: &ViewIds, transaction: TransactionId) {
        let before: HashSet<CanonicalId> = (0..old.len())
            .filter_map(|i| old.get(i))
            .map(|id| id.canonical())
            .collect();
        let after: HashSet<CanonicalId> = (0..new.len())
            .filter_map(|i| new.get(i))
            .map(|id| id.canonical())
            .collect();
        for id in after.difference(&before) {
            self.entries
                .insert(id.clone(), (transaction, Edit::Inserted));
        }
        for id in before.difference(&after) {
            self.entries.insert(id.clone(), (transaction, Edit::Removed));
        }
    }

    /// Returns the edit for `id` made after `since`, if any was recorded.
    #[must_use]
    pub fn edit(&self, id: &CanonicalId, since: TransactionId) -> Option<Edit> {
        self.entries
            .get(id)
            .filter(|(transaction, _)| *transaction > since)
            .map(|(_, edit)| *edit)
    }

    /// Forgets edits made at or before `through`.
    pub fn prune(&mut self, through: TransactionId) {
        self.entries.retain(|_, (transaction, _)| *transaction > through);
    }

    /// Returns the number of identities with a recorded edit.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether nothing is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for EditLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditLog")
            .field("entries", &self.entries.len())
            .finish()
    }
}

/// A list that answers [`ViewList::edit`] from an [`EditLog`].
#[derive(Debug)]
pub struct TrackedList {
    base: Rc<dyn ViewList>,
    log: Rc<EditLog>,
}

impl TrackedList {
    /// Pairs `base` with its edit history.
    #[must_use]
    pub fn new(base: Rc<dyn ViewList>, log: Rc<EditLog>) -> Self {
        Self { base, log }
    }

    /// Returns the wrapped list.
    #[must_use]
    pub fn base(&self) -> &Rc<dyn ViewList> {
        &self.base
    }
}

impl ViewList for TrackedList {
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
        self.base.apply_nodes(start, style, transform, body)
    }

    fn edit(&self, id: &ViewListId, since: TransactionId) -> Option<Edit> {
        self.log
            .edit(&id.canonical(), since)
            .or_else(|| self.base.edit(id, since))
    }

    fn first_offset(&self, id: &ExplicitId, style: IteratorStyle) -> Option<usize> {
        self.base.first_offset(id, style)
    }
}
