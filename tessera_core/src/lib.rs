// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout, view lists, shape styles, and the view graph for Tessera.
//!
//! `tessera_core` is the incremental core of a declarative UI framework. It
//! is `no_std` compatible (with `alloc`) and builds on the attribute graph in
//! [`tessera_graph`]: every derived value is a memoized rule that re-runs
//! only when something it read has changed.
//!
//! # Architecture
//!
//! A host feeds inputs into a [`ViewGraph`](view_graph::ViewGraph) and asks
//! it for outputs:
//!
//! ```text
//!   root view ─► ViewList ─► per-element subgraphs ─► LayoutComputer tree
//!                                                            │
//!   environment ─► ShapeStyle resolution ◄───────────────────┤
//!                         │                                  │
//!                         ▼                                  ▼
//!                       Pack ──────────────────────────► DisplayList
//! ```
//!
//! **[`geometry`]**: proposals, alignments, edges, and insets.
//!
//! **[`layout`]**: the [`LayoutComputer`](layout::LayoutComputer) query
//! handle, the [`Layout`](layout::Layout) container protocol with stacks,
//! and single-child modifier layouts.
//!
//! **[`view_list`]**: lazily materialized, identity-tracked lists of child
//! views, with element reuse across rebuilds and reference-counted
//! subgraph ownership.
//!
//! **[`shape_style`]**: the request/response pipeline that turns style
//! descriptions into a [`Pack`](shape_style::Pack) of concrete paint.
//!
//! **[`view`]**: a small view vocabulary tying lists, layout, and styles
//! together.
//!
//! **[`display_list`]**: the versioned, platform-agnostic render output.
//!
//! **[`view_graph`]**: the façade a host drives.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! update-cycle instrumentation, with a zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates list reuse
//!   events and the update summary builder.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod display_list;
pub mod environment;
pub mod geometry;
pub mod layout;
pub mod shape_style;
pub mod time;
pub mod trace;
pub mod view;
pub mod view_graph;
pub mod view_list;
