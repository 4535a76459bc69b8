// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Incremental attribute graph for Tessera.
//!
//! An [`Attribute`] is a memoized cell owned by a [`Graph`]. Attributes are
//! either **inputs**, whose values are set from outside, or **rules**, whose
//! values are computed from other attributes by a [`Rule`].
//!
//! ```text
//! Graph::set(input) ──► dirty propagation (push) ──► dependents marked stale
//!                                                          │
//! Graph::value(attr) ◄── memo check + recompute (pull) ◄───┘
//! ```
//!
//! - **Push.** Setting an input to a different value marks every transitive
//!   dependent stale through [`understory_dirty`]. Nothing is recomputed yet.
//! - **Pull.** Reading an attribute brings it up to date. A stale rule first
//!   checks whether any dependency actually changed value since it was last
//!   verified; if none did, the old value is kept without running the rule.
//!   A rule that re-runs and produces an equal value does not count as
//!   changed for its own dependents.
//! - **Subgraphs.** Attributes are grouped into [`SubgraphId`]s that can be
//!   invalidated as a unit, tearing down every attribute they own.
//!
//! Storage is an arena of parallel arrays addressed by generational handles,
//! so stale handles are detected instead of aliasing reused slots.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod dirty;
mod error;
mod graph;
mod id;
mod rule;
mod subgraph;
mod value;

pub use error::GraphError;
pub use graph::{EvalStats, Graph};
pub use id::{Attribute, AttributeId, SubgraphId};
pub use rule::{FnRule, Rule, RuleContext};
pub use value::Value;
