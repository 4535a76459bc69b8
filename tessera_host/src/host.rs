// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scheduler between a platform host and its view graph.
//!
//! A [`Host`] owns one [`ViewGraph`] and lives on the controlling thread.
//! Platform code tells it what changed ([`set_size`](Host::set_size),
//! [`invalidate_properties`](Host::invalidate_properties)) and when it would
//! like a frame ([`request_update`](Host::request_update)); the host turns
//! any number of such calls into a single render pass.
//!
//! Every request takes one of these paths:
//!
//! | Request                          | Path                                    |
//! |----------------------------------|-----------------------------------------|
//! | host hidden                      | held until it is shown again            |
//! | no delay, controlling thread     | rendered at the end of this turn        |
//! | no delay, other thread           | marshaled to the controlling thread     |
//! | delay below the timer threshold  | display-link tick                       |
//! | longer delay                     | coarse [`UpdateTimer`]                  |
//!
//! A deadline never moves later: a request that would fire after one already
//! scheduled is dropped, and one that fires earlier replaces it.
//!
//! The end of a turn is [`Host::poll`]. It applies requests marshaled from
//! other threads, fires the timer, delivers display-link ticks, and renders
//! if anything is still pending.
//!
//! # Render thread
//!
//! With async rendering enabled, a tick whose frame needs no work on the
//! controlling thread goes through [`Host::render_async`]: the graph is
//! updated here, but the frame is committed by the display link's render
//! thread on the next tick. Anything that changes host state cancels frames
//! not yet committed.

use core::fmt;
use std::collections::VecDeque;
use std::sync::Arc;

use kurbo::Size;
use parking_lot::Mutex;
use tessera_core::display_list::DisplayList;
use tessera_core::environment::Environment;
use tessera_core::geometry::EdgeInsets;
use tessera_core::time::Time;
#[cfg(feature = "trace-rich")]
use tessera_core::trace::{ListReuseEvent, UpdateSummaryBuilder};
use tessera_core::trace::{
    InvalidateEvent, LinkThread, PhaseBeginEvent, PhaseEndEvent, PhaseKind, RenderBeginEvent,
    RenderEndEvent, Tracer, UpdatePath, UpdateRequestEvent,
};
use tessera_core::view::ViewNode;
use tessera_core::view_graph::{NextUpdate, RemovedState, ViewGraph, ViewGraphConfig};
use tessera_render::{RenderPlan, diff};

use crate::display_link::{AsyncHandler, DisplayLink, LinkTick};
use crate::{Executor, HostError, HostProperties, SchedulerConfig, SharedSink, UpdateTimer};

// ---------------------------------------------------------------------------
// Frames and presenters
// ---------------------------------------------------------------------------

/// One rendered frame, ready to be shown.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Render counter.
    pub render_index: u64,
    /// Host time the frame was rendered for.
    pub time: Time,
    /// Display time the frame targets, if known.
    pub target: Option<Time>,
    /// Whether the frame is committed by the render thread.
    pub is_async: bool,
    /// What to draw, and what changed since the previous frame.
    pub plan: RenderPlan,
}

/// Shows rendered frames.
///
/// Called on the controlling thread, or on the render thread for frames
/// produced by [`Host::render_async`].
pub trait Presenter: Send {
    /// Shows `frame`.
    fn present(&mut self, frame: &Frame);
}

impl<F: FnMut(&Frame) + Send> Presenter for F {
    fn present(&mut self, frame: &Frame) {
        self(frame);
    }
}

/// Frames waiting for the render thread, and where frames are shown.
///
/// Queueing, dropping and presenting all happen under one lock, so a frame
/// is never shown after a newer one.
struct Commit {
    frames: VecDeque<Frame>,
    presenter: Box<dyn Presenter>,
    presented: u64,
}

impl Commit {
    /// Shows `frame` unless a newer one is already on screen.
    fn present(&mut self, frame: &Frame) -> bool {
        if frame.render_index <= self.presented {
            return false;
        }
        self.presenter.present(frame);
        self.presented = frame.render_index;
        true
    }
}

/// The scheduling state of a [`Host`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostState {
    /// Nothing pending.
    Idle,
    /// Waiting for the update timer.
    PendingTimer,
    /// Waiting for a display-link tick or the end of the turn.
    PendingFrame,
    /// Rendering on the controlling thread.
    RenderingMain,
    /// A frame is waiting to be committed by the render thread.
    RenderingAsync,
}

// ---------------------------------------------------------------------------
// HostHandle
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Marshaled {
    update: Option<f64>,
    properties: HostProperties,
    may_defer: bool,
}

impl Default for Marshaled {
    fn default() -> Self {
        Self {
            update: None,
            properties: HostProperties::empty(),
            may_defer: true,
        }
    }
}

/// A thread-safe way to reach a [`Host`] from other threads.
///
/// Requests are recorded, the controlling thread is woken through the
/// [`Executor`], and the next [`Host::poll`] applies them.
#[derive(Clone, Debug)]
pub struct HostHandle {
    marshaled: Arc<Mutex<Marshaled>>,
    executor: Arc<dyn Executor>,
}

impl HostHandle {
    fn new(executor: Arc<dyn Executor>) -> Self {
        Self {
            marshaled: Arc::default(),
            executor,
        }
    }

    /// Asks for an update no later than `after` seconds from when the
    /// controlling thread picks the request up.
    pub fn request_update(&self, after: f64) {
        {
            let mut marshaled = self.marshaled.lock();
            marshaled.update = Some(marshaled.update.map_or(after, |pending| pending.min(after)));
        }
        self.executor.wake();
    }

    /// Marks host properties as changed.
    pub fn invalidate_properties(&self, properties: HostProperties, may_defer: bool) {
        {
            let mut marshaled = self.marshaled.lock();
            marshaled.properties |= properties;
            marshaled.may_defer &= may_defer;
        }
        self.executor.wake();
    }

    fn take(&self) -> Marshaled {
        core::mem::take(&mut *self.marshaled.lock())
    }
}

// ---------------------------------------------------------------------------
// Host
// ---------------------------------------------------------------------------

/// Schedules and runs the render passes of one [`ViewGraph`].
pub struct Host {
    view_graph: ViewGraph,
    executor: Arc<dyn Executor>,
    config: SchedulerConfig,
    link: DisplayLink,
    timer: UpdateTimer,
    handle: HostHandle,
    commit: Arc<Mutex<Commit>>,
    async_enabled: bool,
    sink: Option<SharedSink>,

    properties: HostProperties,
    root_view: ViewNode,
    environment: Environment,
    size: Size,
    safe_area: EdgeInsets,

    current_timestamp: Time,
    render_requested: bool,
    frame_requested: bool,
    pending_full_fidelity: bool,
    rendering: bool,
    /// Display lists that may be on screen, oldest first: the presented
    /// one, then those of frames still queued for the render thread.
    lists: VecDeque<(u64, DisplayList)>,
    last_frame: Option<Frame>,
    render_count: u64,
    #[cfg(feature = "trace-rich")]
    summary: Option<UpdateSummaryBuilder>,
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("state", &self.state())
            .field("properties", &self.properties)
            .field("current_timestamp", &self.current_timestamp)
            .field("render_count", &self.render_count)
            .field("link", &self.link)
            .field("timer", &self.timer)
            .finish_non_exhaustive()
    }
}

impl Host {
    /// Creates a host showing `root`, presenting frames to `presenter`.
    ///
    /// The first [`poll`](Self::poll) renders.
    pub fn new(
        root: ViewNode,
        executor: Arc<dyn Executor>,
        config: SchedulerConfig,
        presenter: impl Presenter + 'static,
    ) -> Self {
        let view_graph = ViewGraph::new(
            root.clone(),
            ViewGraphConfig {
                max_update_passes: config.max_update_passes,
                ..ViewGraphConfig::DEFAULT
            },
        );
        let commit = Arc::new(Mutex::new(Commit {
            frames: VecDeque::new(),
            presenter: Box::new(presenter),
            presented: 0,
        }));
        let link = DisplayLink::new(config);
        link.set_async_handler(commit_handler(commit.clone()));

        Self {
            current_timestamp: executor.now(),
            handle: HostHandle::new(executor.clone()),
            view_graph,
            executor,
            config,
            link,
            timer: UpdateTimer::new(),
            commit,
            async_enabled: false,
            sink: None,
            properties: HostProperties::empty(),
            root_view: root,
            environment: Environment::default(),
            size: Size::ZERO,
            safe_area: EdgeInsets::ZERO,
            render_requested: true,
            frame_requested: false,
            pending_full_fidelity: false,
            rendering: false,
            lists: VecDeque::new(),
            last_frame: None,
            render_count: 0,
            #[cfg(feature = "trace-rich")]
            summary: None,
        }
    }

    /// Sends scheduler and update-cycle events to `sink`.
    pub fn set_trace_sink(&mut self, sink: Option<SharedSink>) {
        self.link.set_trace_sink(sink.clone());
        self.sink = sink;
    }

    /// Returns a handle for reaching this host from other threads.
    #[must_use]
    pub fn handle(&self) -> HostHandle {
        self.handle.clone()
    }

    /// Returns the view graph.
    #[must_use]
    pub fn view_graph(&self) -> &ViewGraph {
        &self.view_graph
    }

    /// Returns the view graph, for changes the host does not track.
    pub fn view_graph_mut(&mut self) -> &mut ViewGraph {
        &mut self.view_graph
    }

    /// Returns the display link.
    #[must_use]
    pub fn link(&self) -> &DisplayLink {
        &self.link
    }

    /// Returns the update timer.
    #[must_use]
    pub fn timer(&self) -> &UpdateTimer {
        &self.timer
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    // -- Host properties --

    /// Replaces the root view.
    pub fn set_root_view(&mut self, view: ViewNode) {
        self.root_view = view;
        self.invalidate_properties(HostProperties::ROOT_VIEW, false);
    }

    /// Replaces the environment.
    pub fn set_environment(&mut self, environment: Environment) {
        self.environment = environment;
        self.invalidate_properties(HostProperties::ENVIRONMENT, true);
    }

    /// Sets the size offered to the root view.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
        self.invalidate_properties(HostProperties::SIZE, false);
    }

    /// Sets the safe-area insets.
    pub fn set_safe_area_insets(&mut self, insets: EdgeInsets) {
        self.safe_area = insets;
        self.invalidate_properties(HostProperties::SAFE_AREA, false);
    }

    /// Sets why the host is hidden.
    ///
    /// Updates requested while hidden are held; showing the host again
    /// renders once with everything that changed meanwhile.
    pub fn set_removed_state(&mut self, state: RemovedState) {
        self.view_graph.set_removed_state(state);
        if self.view_graph.updates_at_full_fidelity() && self.pending_full_fidelity {
            self.pending_full_fidelity = false;
            self.request_update(0.0);
        }
    }

    /// Marks host properties as changed and asks for an update.
    ///
    /// Does nothing if all of `properties` are already pending. `may_defer`
    /// says whether the render may leave the controlling thread.
    pub fn invalidate_properties(&mut self, properties: HostProperties, may_defer: bool) {
        let coalesced = self.properties.contains(properties);
        let now = self.executor.now();
        with_tracer(self.sink.as_ref(), |tracer| {
            tracer.invalidate(&InvalidateEvent {
                now,
                properties: u32::from(properties.bits()),
                may_defer,
                coalesced,
            });
        });
        if coalesced {
            return;
        }
        self.properties |= properties;
        self.view_graph.set_needs_update(may_defer);
        self.cancel_async_rendering();
        self.request_update(0.0);
    }

    /// Returns the properties not yet pushed into the view graph.
    #[must_use]
    pub fn pending_properties(&self) -> HostProperties {
        self.properties
    }

    /// Pushes pending properties into the view graph.
    pub fn update_graph(&mut self) {
        let properties = core::mem::take(&mut self.properties);
        if properties.contains(HostProperties::ROOT_VIEW) {
            self.view_graph.set_root_view(self.root_view.clone());
        }
        if properties.contains(HostProperties::ENVIRONMENT) {
            self.view_graph.set_environment(self.environment.clone());
        }
        if properties.contains(HostProperties::SIZE) {
            self.view_graph.set_size(self.size);
        }
        if properties.contains(HostProperties::SAFE_AREA) {
            self.view_graph.set_safe_area_insets(self.safe_area);
        }
    }

    // -- Scheduling --

    /// Asks for a render no later than `after` seconds from now.
    pub fn request_update(&mut self, after: f64) {
        let now = self.executor.now();
        let after = after.max(0.0);
        let (path, deadline) = if !self.view_graph.updates_at_full_fidelity() {
            self.pending_full_fidelity = true;
            (UpdatePath::Held, now + after)
        } else if after <= 0.0 {
            if self.executor.is_controlling_thread() {
                self.render_requested = true;
                (UpdatePath::Immediate, now)
            } else {
                self.handle.request_update(0.0);
                (UpdatePath::Marshal, now)
            }
        } else if after >= self.config.timer_threshold {
            let deadline = now + after.max(self.config.min_timer_delay);
            let path = if self.link.next_update() <= deadline || !self.timer.schedule(deadline) {
                UpdatePath::Superseded
            } else {
                UpdatePath::Timer
            };
            (path, deadline)
        } else {
            let before = self.link.next_update();
            let scheduled = self.link.set_next_update(after, now);
            self.frame_requested = true;
            if self.timer.deadline().is_some_and(|armed| armed >= scheduled) {
                self.timer.cancel();
            }
            let path = if scheduled < before {
                UpdatePath::Link
            } else {
                UpdatePath::Superseded
            };
            (path, now + after)
        };
        with_tracer(self.sink.as_ref(), |tracer| {
            tracer.update_request(&UpdateRequestEvent {
                now,
                delay: after,
                deadline,
                path,
            });
        });
    }

    /// Runs one turn of the controlling thread's loop.
    ///
    /// Applies requests from other threads, fires the timer, delivers
    /// display-link ticks, then renders if an update is still pending.
    /// Returns whether anything was rendered.
    pub fn poll(&mut self) -> bool {
        let before = self.render_count;

        let marshaled = self.handle.take();
        if !marshaled.properties.is_empty() {
            self.invalidate_properties(marshaled.properties, marshaled.may_defer);
        }
        if let Some(after) = marshaled.update {
            self.request_update(after);
        }

        if self.timer.fire(self.executor.now()) {
            self.render_requested = true;
        }

        let link = self.link.clone();
        link.deliver_controlling(&mut |tick: &LinkTick, _: bool| self.display_link_timer(tick));

        if self.render_requested {
            let interval = self.executor.now().saturating_since(self.current_timestamp);
            self.render(interval, None);
        }
        self.render_count != before
    }

    /// Moves the host's timeline forward by `seconds` without waiting for the
    /// clock, and renders if an update is due by then.
    ///
    /// Returns whether anything was rendered.
    pub fn advance_time(&mut self, seconds: f64) -> bool {
        let until = self.current_timestamp + seconds;
        let due = self.render_requested
            || !self.properties.is_empty()
            || self.view_graph.needs_update()
            || self.timer.deadline().is_some_and(|deadline| deadline <= until)
            || (self.frame_requested && self.link.next_update() <= until);
        if !due {
            self.current_timestamp = until;
            return false;
        }
        // No tick will consume the link's deadline; this render does.
        self.link.clear_next_update();
        let before = self.render_count;
        self.render(seconds, None);
        self.render_count != before
    }

    fn has_pending_work(&self) -> bool {
        self.render_requested
            || self.frame_requested
            || !self.properties.is_empty()
            || self.view_graph.needs_update()
    }

    fn display_link_timer(&mut self, tick: &LinkTick) -> Option<Time> {
        if !self.has_pending_work() {
            return None;
        }
        let interval = tick.timestamp.saturating_since(self.current_timestamp);
        if self.async_enabled && self.render_async(interval, Some(tick.target)).is_some() {
            // Keep ticking so the render thread commits the frame.
            return Some(tick.timestamp);
        }
        self.render(interval, Some(tick.target));
        None
    }

    // -- Rendering --

    /// Renders on the controlling thread, `interval` seconds after the
    /// previous render. Returns when the graph next wants an update.
    pub fn render(&mut self, interval: f64, target: Option<Time>) -> Time {
        self.cancel_async_rendering();
        let Some((frame, passes, next)) = self.run_frame(interval, target, false) else {
            return Time::INFINITY;
        };
        self.rendering = true;
        self.phase(frame.render_index, PhaseKind::Commit, |host| {
            host.commit.lock().present(&frame);
        });
        self.rendering = false;
        self.finish(frame, passes, next);
        next
    }

    /// Renders a frame whose commit runs on the render thread.
    ///
    /// Returns `None` without rendering when the frame must run on the
    /// controlling thread: async rendering is off, host properties are
    /// pending, the graph refused deferral since its last update, or the
    /// host is hidden.
    pub fn render_async(&mut self, interval: f64, target: Option<Time>) -> Option<Time> {
        if !self.async_enabled
            || !self.properties.is_empty()
            || !self.view_graph.may_defer_update()
            || !self.view_graph.updates_at_full_fidelity()
        {
            return None;
        }
        let interval = interval.max(self.config.async_min_interval);
        let (frame, passes, next) = self.run_frame(interval, target, true)?;
        let presented = {
            let mut commit = self.commit.lock();
            commit.frames.push_back(frame.clone());
            commit.presented
        };
        // Lists older than the screen are never diffed against again.
        while self.lists.front().is_some_and(|(index, _)| *index < presented) {
            self.lists.pop_front();
        }
        self.link.request_thread(LinkThread::Async);
        self.finish(frame, passes, next);
        Some(next)
    }

    /// Drops frames not yet committed by the render thread and sends
    /// further ticks to the controlling thread.
    ///
    /// Safe to call at any time, any number of times. The next frame is
    /// diffed against what was last presented, not against a dropped frame.
    pub fn cancel_async_rendering(&mut self) {
        let presented = {
            let mut commit = self.commit.lock();
            commit.frames.clear();
            commit.presented
        };
        while self.lists.back().is_some_and(|(index, _)| *index > presented) {
            self.lists.pop_back();
        }
        self.link.request_thread(LinkThread::Controlling);
    }

    /// Turns rendering on the render thread on or off.
    ///
    /// The thread itself starts the first time a frame is handed to it.
    pub fn enable_async_rendering(&mut self, enabled: bool) -> Result<(), HostError> {
        if enabled && self.link.current_thread() == LinkThread::None {
            return Err(HostError::ShutDown);
        }
        self.async_enabled = enabled;
        if !enabled {
            self.cancel_async_rendering();
        }
        Ok(())
    }

    /// Returns whether async rendering is on.
    #[must_use]
    pub fn is_async_enabled(&self) -> bool {
        self.async_enabled
    }

    fn run_frame(
        &mut self,
        interval: f64,
        target: Option<Time>,
        is_async: bool,
    ) -> Option<(Frame, u32, Time)> {
        self.render_requested = false;
        self.frame_requested = false;
        if !self.view_graph.updates_at_full_fidelity() {
            self.pending_full_fidelity = true;
            return None;
        }
        self.pending_full_fidelity = false;

        self.render_count += 1;
        let render_index = self.render_count;
        self.current_timestamp += interval.max(0.0);
        let time = self.current_timestamp;
        let sink = self.sink.clone();
        let begin = RenderBeginEvent {
            render_index,
            now: time,
            interval,
            target,
            is_async,
        };
        with_tracer(sink.as_ref(), |tracer| tracer.render_begin(&begin));
        #[cfg(feature = "trace-rich")]
        {
            self.summary = Some(UpdateSummaryBuilder::new(&begin));
        }

        self.phase(render_index, PhaseKind::Properties, Self::update_graph);
        let outcome = self.phase(render_index, PhaseKind::Update, |host| {
            host.view_graph.update_outputs(time)
        });
        #[cfg(feature = "trace-rich")]
        {
            let stats = self.view_graph.reuse_stats();
            with_tracer(sink.as_ref(), |tracer| {
                tracer.list_reuse(&ListReuseEvent {
                    render_index,
                    reused: stats.reused,
                    created: stats.created,
                    removed: stats.removed,
                });
            });
        }
        let plan = self.phase(render_index, PhaseKind::Display, |host| {
            let list = host.view_graph.display_list();
            let plan = diff(host.lists.back().map(|(_, list)| list), &list);
            if !is_async {
                host.lists.clear();
            }
            host.lists.push_back((render_index, list));
            plan
        });

        // This render satisfies whatever the timer was armed for.
        self.timer.cancel();
        let next = self.schedule_next(time, outcome.next_update);
        let frame = Frame {
            render_index,
            time,
            target,
            is_async,
            plan,
        };
        Some((frame, outcome.passes, next))
    }

    fn schedule_next(&mut self, time: Time, next: NextUpdate) -> Time {
        let mut deadline = next.time;
        if next.interval.is_finite() {
            self.link.set_frame_interval(next.interval, next.reasons);
            deadline = deadline.min(time + next.interval);
        }
        if deadline.is_finite() {
            self.request_update(deadline.saturating_since(time));
        }
        deadline
    }

    fn finish(&mut self, frame: Frame, passes: u32, next: Time) {
        let end = RenderEndEvent {
            render_index: frame.render_index,
            next_update: next,
            passes,
            is_async: frame.is_async,
        };
        with_tracer(self.sink.as_ref(), |tracer| tracer.render_end(&end));
        #[cfg(feature = "trace-rich")]
        if let Some(summary) = self.summary.take() {
            let summary = summary.finish(&end);
            with_tracer(self.sink.as_ref(), |tracer| tracer.update_summary(&summary));
        }
        self.last_frame = Some(frame);
    }

    #[cfg(feature = "trace-rich")]
    fn record_phase(&mut self, phase: PhaseKind, begin: bool) {
        let now = self.executor.now();
        if let Some(summary) = &mut self.summary {
            if begin {
                summary.phase_begin(phase, now);
            } else {
                summary.phase_end(phase, now);
            }
        }
    }

    fn phase<R>(
        &mut self,
        render_index: u64,
        phase: PhaseKind,
        f: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let sink = self.sink.clone();
        let timestamp = self.executor.now();
        with_tracer(sink.as_ref(), |tracer| {
            tracer.phase_begin(&PhaseBeginEvent {
                render_index,
                phase,
                timestamp,
            });
        });
        #[cfg(feature = "trace-rich")]
        self.record_phase(phase, true);
        let result = f(self);
        #[cfg(feature = "trace-rich")]
        self.record_phase(phase, false);
        let timestamp = self.executor.now();
        with_tracer(sink.as_ref(), |tracer| {
            tracer.phase_end(&PhaseEndEvent {
                render_index,
                phase,
                timestamp,
            });
        });
        result
    }

    // -- Inspection --

    /// Returns the scheduling state.
    #[must_use]
    pub fn state(&self) -> HostState {
        if self.rendering {
            HostState::RenderingMain
        } else if !self.commit.lock().frames.is_empty() {
            HostState::RenderingAsync
        } else if self.render_requested
            || (self.frame_requested && self.link.next_update().is_finite())
        {
            HostState::PendingFrame
        } else if self.timer.deadline().is_some() {
            HostState::PendingTimer
        } else {
            HostState::Idle
        }
    }

    /// Returns the host time of the most recent render.
    #[must_use]
    pub fn current_timestamp(&self) -> Time {
        self.current_timestamp
    }

    /// Returns the number of render passes so far.
    #[must_use]
    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    /// Returns whether an update is being held until the host is shown.
    #[must_use]
    pub fn has_pending_full_fidelity_update(&self) -> bool {
        self.pending_full_fidelity
    }

    /// Returns the most recently rendered frame.
    #[must_use]
    pub fn last_frame(&self) -> Option<&Frame> {
        self.last_frame.as_ref()
    }
}

impl Drop for Host {
    fn drop(&mut self) {
        self.link.shut_down();
    }
}

/// Commits frames queued by [`Host::render_async`], one per tick.
fn commit_handler(commit: Arc<Mutex<Commit>>) -> AsyncHandler {
    Box::new(move |tick: &LinkTick| {
        let mut commit = commit.lock();
        let frame = commit.frames.pop_front()?;
        commit.present(&frame);
        (!commit.frames.is_empty()).then_some(tick.timestamp)
    })
}

fn with_tracer<R>(sink: Option<&SharedSink>, f: impl FnOnce(&mut Tracer<'_>) -> R) -> R {
    match sink {
        Some(sink) => {
            let mut sink = sink.lock();
            f(&mut Tracer::new(&mut *sink))
        }
        None => f(&mut Tracer::none()),
    }
}
