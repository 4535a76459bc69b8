// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! The graph uses a single propagating channel. Dependency edges point from a
//! rule to each attribute it read during its last evaluation, and inputs are
//! marked with [`EagerPolicy`](understory_dirty::EagerPolicy), so marking an
//! input marks every transitive dependent in the same call.
//!
//! Draining the channel (with `affected()`) yields those dependents in
//! dependency order; the graph turns each into a stale bit and does no other
//! work until the attribute is next read.

use understory_dirty::Channel;

/// An attribute's value may have changed.
pub const VALUE: Channel = Channel::new(0);
