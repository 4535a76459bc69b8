// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host scheduling for Tessera view graphs.
//!
//! A platform host (a window, a view, a test harness) owns one [`Host`],
//! which owns the view graph. The host crate decides *when* the graph is
//! updated; [`tessera_core`] decides *what* an update does.
//!
//! # Threads
//!
//! The view graph is not `Send` and lives on the controlling thread. Other
//! threads reach the host through a [`HostHandle`]. The [`DisplayLink`] may
//! deliver ticks to a dedicated render thread instead, which commits frames
//! prepared by [`Host::render_async`]; a tick is never delivered on both.
//!
//! # Clocks
//!
//! Time comes from an [`Executor`]. [`ThreadExecutor`] uses the wall clock;
//! [`FakeExecutor`] with a [`ManualClock`] makes every schedule deterministic.
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Forwards scheduler and update-cycle
//!   events to the sink installed with [`Host::set_trace_sink`].
//! - `trace-rich` (disabled by default, implies `trace`): Adds a per-render
//!   timing summary and list reuse counts.

#![cfg_attr(docsrs, feature(doc_cfg))]

mod config;
mod display_link;
mod error;
mod executor;
mod host;
mod properties;
mod timer;

use std::sync::Arc;

use tessera_core::trace::TraceSink;

pub use config::SchedulerConfig;
pub use display_link::{AsyncHandler, DisplayLink, LinkTick};
pub use error::HostError;
pub use executor::{Executor, FakeExecutor, ManualClock, ThreadExecutor};
pub use host::{Frame, Host, HostHandle, HostState, Presenter};
pub use properties::HostProperties;
pub use tessera_core::trace::LinkThread;
pub use timer::UpdateTimer;

/// A trace sink shared between the host and its display link.
pub type SharedSink = Arc<parking_lot::Mutex<dyn TraceSink + Send>>;
