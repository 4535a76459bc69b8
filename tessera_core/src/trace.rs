// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the update cycle.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! view graph and host scheduler call at each stage. All method bodies default
//! to no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace` enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`) adds [`ListReuseEvent`] and the
//!   [`UpdateSummaryBuilder`] helper that collects phase timestamps during a
//!   render and produces an [`UpdateSummary`] at the end.

use crate::time::Time;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which phase of a render pass is being measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    /// Pushing pending host properties into graph inputs.
    Properties,
    /// Bringing the graph's outputs up to date.
    Update,
    /// Producing the display list.
    Display,
    /// Handing the result to the renderer.
    Commit,
}

/// How a requested update will be delivered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpdatePath {
    /// Rendered synchronously, right away.
    Immediate,
    /// Sent to the controlling thread, then rendered.
    Marshal,
    /// Deferred to the coarse update timer.
    Timer,
    /// Deferred to a display-link tick.
    Link,
    /// Dropped, because an earlier update is already scheduled.
    Superseded,
    /// Held until the host is shown again.
    Held,
}

/// Which thread receives display-link ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LinkThread {
    /// No thread; the link is stopped.
    None,
    /// The controlling thread.
    Controlling,
    /// The dedicated render thread.
    Async,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when an update is requested.
#[derive(Clone, Copy, Debug)]
pub struct UpdateRequestEvent {
    /// Host time of the request.
    pub now: Time,
    /// Requested delay in seconds.
    pub delay: f64,
    /// The deadline the request asked for.
    pub deadline: Time,
    /// How the update will be delivered.
    pub path: UpdatePath,
}

/// Emitted when host properties are invalidated.
#[derive(Clone, Copy, Debug)]
pub struct InvalidateEvent {
    /// Host time of the invalidation.
    pub now: Time,
    /// Host-defined property bits that were added.
    pub properties: u32,
    /// Whether the render may run off the controlling thread.
    pub may_defer: bool,
    /// Whether the bits were already pending, so no new request was made.
    pub coalesced: bool,
}

/// Marks the beginning of a render pass.
#[derive(Clone, Copy, Debug)]
pub struct RenderBeginEvent {
    /// Monotonic render counter.
    pub render_index: u64,
    /// Host time the pass renders for.
    pub now: Time,
    /// Seconds since the previous pass.
    pub interval: f64,
    /// Display time the pass targets, if known.
    pub target: Option<Time>,
    /// Whether the pass runs on the render thread.
    pub is_async: bool,
}

/// Marks the end of a render pass.
#[derive(Clone, Copy, Debug)]
pub struct RenderEndEvent {
    /// Render counter.
    pub render_index: u64,
    /// When the graph next wants an update, or [`Time::INFINITY`].
    pub next_update: Time,
    /// Number of graph update passes run.
    pub passes: u32,
    /// Whether the pass ran on the render thread.
    pub is_async: bool,
}

/// Marks the beginning of a render phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseBeginEvent {
    /// Render counter.
    pub render_index: u64,
    /// Which phase is starting.
    pub phase: PhaseKind,
    /// Host time at the start of the phase.
    pub timestamp: Time,
}

/// Marks the end of a render phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseEndEvent {
    /// Render counter.
    pub render_index: u64,
    /// Which phase is ending.
    pub phase: PhaseKind,
    /// Host time at the end of the phase.
    pub timestamp: Time,
}

/// Emitted when display-link delivery moves between threads.
#[derive(Clone, Copy, Debug)]
pub struct LinkHandoffEvent {
    /// Host time of the handoff.
    pub now: Time,
    /// Thread that stopped receiving ticks.
    pub from: LinkThread,
    /// Thread that started receiving ticks.
    pub to: LinkThread,
}

/// Per-render timing summary.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UpdateSummary {
    /// Render counter.
    pub render_index: u64,
    /// Host time the pass rendered for.
    pub now: Time,
    /// Whether the pass ran on the render thread.
    pub is_async: bool,
    /// Seconds spent applying properties (0 if not measured).
    pub properties_seconds: f64,
    /// Seconds spent updating the graph (0 if not measured).
    pub update_seconds: f64,
    /// Seconds spent producing the display list (0 if not measured).
    pub display_seconds: f64,
    /// Seconds spent committing (0 if not measured).
    pub commit_seconds: f64,
    /// When the graph next wants an update.
    pub next_update: Time,
}

/// Element reuse counts for one list rebuild.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListReuseEvent {
    /// Render counter.
    pub render_index: u64,
    /// Elements that kept their subgraph.
    pub reused: u32,
    /// Elements built from scratch.
    pub created: u32,
    /// Elements whose subgraph was released.
    pub removed: u32,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the update cycle.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when an update is requested.
    fn on_update_request(&mut self, e: &UpdateRequestEvent) {
        _ = e;
    }

    /// Called when host properties are invalidated.
    fn on_invalidate(&mut self, e: &InvalidateEvent) {
        _ = e;
    }

    /// Called when a render pass begins.
    fn on_render_begin(&mut self, e: &RenderBeginEvent) {
        _ = e;
    }

    /// Called when a render pass ends.
    fn on_render_end(&mut self, e: &RenderEndEvent) {
        _ = e;
    }

    /// Called at the beginning of a render phase.
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        _ = e;
    }

    /// Called at the end of a render phase.
    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        _ = e;
    }

    /// Called when display-link delivery moves between threads.
    fn on_link_handoff(&mut self, e: &LinkHandoffEvent) {
        _ = e;
    }

    /// Called with a per-render timing summary.
    fn on_update_summary(&mut self, s: &UpdateSummary) {
        _ = s;
    }

    /// Called with list reuse counts (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_list_reuse(&mut self, e: &ListReuseEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

/// Generates a `Tracer` method forwarding one event to the sink.
macro_rules! forward {
    ($(#[$doc:meta])* $name:ident, $method:ident, $event:ty) => {
        $(#[$doc])*
        #[inline]
        pub fn $name(&mut self, e: &$event) {
            #[cfg(feature = "trace")]
            if let Some(s) = &mut self.sink {
                s.$method(e);
            }
            #[cfg(not(feature = "trace"))]
            {
                _ = e;
            }
        }
    };
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Returns whether events reach a sink.
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        #[cfg(feature = "trace")]
        {
            self.sink.is_some()
        }
        #[cfg(not(feature = "trace"))]
        {
            false
        }
    }

    forward!(
        /// Emits an [`UpdateRequestEvent`].
        update_request, on_update_request, UpdateRequestEvent
    );
    forward!(
        /// Emits an [`InvalidateEvent`].
        invalidate, on_invalidate, InvalidateEvent
    );
    forward!(
        /// Emits a [`RenderBeginEvent`].
        render_begin, on_render_begin, RenderBeginEvent
    );
    forward!(
        /// Emits a [`RenderEndEvent`].
        render_end, on_render_end, RenderEndEvent
    );
    forward!(
        /// Emits a [`PhaseBeginEvent`].
        phase_begin, on_phase_begin, PhaseBeginEvent
    );
    forward!(
        /// Emits a [`PhaseEndEvent`].
        phase_end, on_phase_end, PhaseEndEvent
    );
    forward!(
        /// Emits a [`LinkHandoffEvent`].
        link_handoff, on_link_handoff, LinkHandoffEvent
    );
    forward!(
        /// Emits an [`UpdateSummary`].
        update_summary, on_update_summary, UpdateSummary
    );

    /// Emits list reuse counts (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn list_reuse(&mut self, e: &ListReuseEvent) {
        if let Some(s) = &mut self.sink {
            s.on_list_reuse(e);
        }
    }
}

// ---------------------------------------------------------------------------
// UpdateSummaryBuilder
// ---------------------------------------------------------------------------

/// Collects phase timestamps during a render and produces an
/// [`UpdateSummary`].
#[cfg(feature = "trace-rich")]
#[derive(Debug)]
pub struct UpdateSummaryBuilder {
    begin: RenderBeginEvent,
    phase_starts: [Option<Time>; 4],
    phase_ends: [Option<Time>; 4],
}

#[cfg(feature = "trace-rich")]
impl UpdateSummaryBuilder {
    /// Starts building a summary for the given pass.
    #[must_use]
    pub fn new(begin: &RenderBeginEvent) -> Self {
        Self {
            begin: *begin,
            phase_starts: [None; 4],
            phase_ends: [None; 4],
        }
    }

    /// Records the start of a phase.
    pub fn phase_begin(&mut self, phase: PhaseKind, t: Time) {
        self.phase_starts[phase_index(phase)] = Some(t);
    }

    /// Records the end of a phase.
    pub fn phase_end(&mut self, phase: PhaseKind, t: Time) {
        self.phase_ends[phase_index(phase)] = Some(t);
    }

    /// Consumes the builder and produces the final [`UpdateSummary`].
    #[must_use]
    pub fn finish(self, end: &RenderEndEvent) -> UpdateSummary {
        UpdateSummary {
            render_index: self.begin.render_index,
            now: self.begin.now,
            is_async: self.begin.is_async,
            properties_seconds: self.phase_duration(PhaseKind::Properties),
            update_seconds: self.phase_duration(PhaseKind::Update),
            display_seconds: self.phase_duration(PhaseKind::Display),
            commit_seconds: self.phase_duration(PhaseKind::Commit),
            next_update: end.next_update,
        }
    }

    fn phase_duration(&self, phase: PhaseKind) -> f64 {
        let idx = phase_index(phase);
        match (self.phase_starts[idx], self.phase_ends[idx]) {
            (Some(start), Some(end)) => end.saturating_since(start),
            _ => 0.0,
        }
    }
}

/// Maps a [`PhaseKind`] to an array index.
#[cfg(feature = "trace-rich")]
const fn phase_index(phase: PhaseKind) -> usize {
    match phase {
        PhaseKind::Properties => 0,
        PhaseKind::Update => 1,
        PhaseKind::Display => 2,
        PhaseKind::Commit => 3,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_begin() -> RenderBeginEvent {
        RenderBeginEvent {
            render_index: 42,
            now: Time(1.0),
            interval: 1.0 / 60.0,
            target: Some(Time(1.016)),
            is_async: false,
        }
    }

    fn sample_request() -> UpdateRequestEvent {
        UpdateRequestEvent {
            now: Time(1.0),
            delay: 0.5,
            deadline: Time(1.5),
            path: UpdatePath::Timer,
        }
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_render_begin(&sample_begin());
        sink.on_update_request(&sample_request());
        sink.on_link_handoff(&LinkHandoffEvent {
            now: Time::ZERO,
            from: LinkThread::Controlling,
            to: LinkThread::Async,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        assert!(!tracer.is_enabled(), "no sink installed");
        tracer.render_begin(&sample_begin());
        tracer.update_request(&sample_request());
    }

    #[cfg(feature = "trace-rich")]
    #[test]
    fn summary_builder_computes_durations() {
        let mut builder = UpdateSummaryBuilder::new(&sample_begin());
        builder.phase_begin(PhaseKind::Properties, Time(1.0));
        builder.phase_end(PhaseKind::Properties, Time(1.25));
        builder.phase_begin(PhaseKind::Update, Time(1.25));
        builder.phase_end(PhaseKind::Update, Time(2.0));
        let summary = builder.finish(&RenderEndEvent {
            render_index: 42,
            next_update: Time::INFINITY,
            passes: 1,
            is_async: false,
        });
        assert_eq!(summary.properties_seconds, 0.25);
        assert_eq!(summary.update_seconds, 0.75);
        assert_eq!(summary.display_seconds, 0.0, "unmeasured phases are zero");
        assert_eq!(summary.render_index, 42);
        assert_eq!(summary.next_update, Time::INFINITY);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            renders: Vec<u64>,
            paths: Vec<UpdatePath>,
        }
        impl TraceSink for RecordingSink {
            fn on_render_begin(&mut self, e: &RenderBeginEvent) {
                self.renders.push(e.render_index);
            }

            fn on_update_request(&mut self, e: &UpdateRequestEvent) {
                self.paths.push(e.path);
            }
        }

        let mut sink = RecordingSink {
            renders: Vec::new(),
            paths: Vec::new(),
        };
        let mut tracer = Tracer::new(&mut sink);
        assert!(tracer.is_enabled(), "sink installed");
        tracer.render_begin(&sample_begin());
        tracer.update_request(&sample_request());
        drop(tracer);
        assert_eq!(sink.renders, &[42]);
        assert_eq!(sink.paths, &[UpdatePath::Timer]);
    }
}
