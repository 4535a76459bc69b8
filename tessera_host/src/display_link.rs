// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-tick delivery with a subscription that can move between threads.
//!
//! A [`DisplayLink`] receives frame-clock callbacks through
//! [`vsync`](DisplayLink::vsync) and routes each tick to the one thread that
//! currently holds the subscription:
//!
//! - **controlling**: ticks queue up until the owner drains them with
//!   [`deliver_controlling`](DisplayLink::deliver_controlling);
//! - **async**: ticks are handed to a dedicated render thread, started the
//!   first time it is needed, which runs the installed async handler.
//!
//! # Scheduling
//!
//! The link keeps a single `next_update` deadline. Requests only ever move it
//! earlier, and a tick is accepted once its timestamp is within the tick
//! tolerance of the deadline. Accepting a tick resets the deadline to
//! infinity; whatever runs during the tick asks again if it wants another
//! frame. A link with nothing to do and no pending handoff pauses itself.
//!
//! # Handoff
//!
//! [`request_thread`](DisplayLink::request_thread) only records where ticks
//! should go. The move happens on the thread that currently holds the
//! subscription, right after it finishes a tick: the old subscription is
//! removed (its queued ticks are discarded) before the new one is added, all
//! under the link's lock. A tick is therefore never delivered on two threads,
//! and the new thread cannot start a delivery while the old one is still
//! inside its handler.

use core::fmt;
use std::collections::VecDeque;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex, MutexGuard};
use tessera_core::time::Time;
use tessera_core::trace::{LinkHandoffEvent, LinkThread, Tracer};

use crate::{HostError, SchedulerConfig, SharedSink};

const ASYNC_THREAD_NAME: &str = "tessera-async-renderer";

/// One frame-clock callback.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkTick {
    /// Sequence number, unique per link.
    pub id: u64,
    /// When the frame started.
    pub timestamp: Time,
    /// When the frame will be displayed.
    pub target: Time,
}

/// Runs on the render thread for each accepted tick.
///
/// Returns the time of the next frame it wants, if any. Returning `None`
/// hands ticks back to the controlling thread.
pub type AsyncHandler = Box<dyn FnMut(&LinkTick) -> Option<Time> + Send>;

struct LinkState {
    next_update: Time,
    current_update: Option<Time>,
    interval: f64,
    reasons: u32,
    paused: bool,
    current: LinkThread,
    next: LinkThread,
    controlling_queue: VecDeque<LinkTick>,
    async_queue: VecDeque<LinkTick>,
    async_handler: Option<AsyncHandler>,
    async_running: bool,
    async_busy: bool,
    async_thread: Option<JoinHandle<()>>,
    shut_down: bool,
    last_error: Option<HostError>,
    next_tick_id: u64,
    handoffs: u64,
    dropped: u64,
}

struct LinkShared {
    config: SchedulerConfig,
    state: Mutex<LinkState>,
    signal: Condvar,
    sink: Mutex<Option<SharedSink>>,
}

/// Frame-tick routing for one host. Clones share the same link.
#[derive(Clone)]
pub struct DisplayLink {
    shared: Arc<LinkShared>,
}

impl fmt::Debug for DisplayLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("DisplayLink")
            .field("next_update", &state.next_update)
            .field("paused", &state.paused)
            .field("current", &state.current)
            .field("next", &state.next)
            .field("async_running", &state.async_running)
            .finish_non_exhaustive()
    }
}

impl DisplayLink {
    /// Creates a paused link delivering to the controlling thread.
    #[must_use]
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            shared: Arc::new(LinkShared {
                config,
                state: Mutex::new(LinkState {
                    next_update: Time::INFINITY,
                    current_update: None,
                    interval: 0.0,
                    reasons: 0,
                    paused: true,
                    current: LinkThread::Controlling,
                    next: LinkThread::Controlling,
                    controlling_queue: VecDeque::new(),
                    async_queue: VecDeque::new(),
                    async_handler: None,
                    async_running: false,
                    async_busy: false,
                    async_thread: None,
                    shut_down: false,
                    last_error: None,
                    next_tick_id: 0,
                    handoffs: 0,
                    dropped: 0,
                }),
                signal: Condvar::new(),
                sink: Mutex::new(None),
            }),
        }
    }

    /// Sends handoff events to `sink`.
    pub fn set_trace_sink(&self, sink: Option<SharedSink>) {
        *self.shared.sink.lock() = sink;
    }

    /// Installs the handler run on the render thread.
    pub fn set_async_handler(&self, handler: AsyncHandler) {
        self.shared.state.lock().async_handler = Some(handler);
    }

    // -- Scheduling --

    /// Asks for a frame `delay` seconds after the frame being rendered, or
    /// after `now` outside of a frame.
    ///
    /// Delays below the link threshold mean the next tick. An earlier
    /// deadline already scheduled is kept. Returns the deadline now in
    /// effect.
    pub fn set_next_update(&self, delay: f64, now: Time) -> Time {
        let mut state = self.shared.state.lock();
        let candidate = if delay >= self.shared.config.link_threshold {
            state.current_update.unwrap_or(now) + delay
        } else {
            Time::ZERO
        };
        if candidate < state.next_update {
            state.next_update = candidate;
            state.paused = false;
        }
        state.next_update
    }

    /// Drops the scheduled deadline, for a frame rendered without a tick.
    pub fn clear_next_update(&self) {
        let mut state = self.shared.state.lock();
        state.next_update = Time::INFINITY;
        if state.next == state.current {
            state.paused = true;
        }
    }

    /// Sets the preferred frame interval and the reasons behind it.
    pub fn set_frame_interval(&self, interval: f64, reasons: u32) {
        let mut state = self.shared.state.lock();
        state.interval = interval;
        state.reasons = reasons;
    }

    /// Returns the scheduled deadline, or [`Time::INFINITY`].
    #[must_use]
    pub fn next_update(&self) -> Time {
        self.shared.state.lock().next_update
    }

    /// Returns the preferred frame interval and its reasons.
    #[must_use]
    pub fn frame_interval(&self) -> (f64, u32) {
        let state = self.shared.state.lock();
        (state.interval, state.reasons)
    }

    /// Returns whether the link ignores frame-clock callbacks.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.shared.state.lock().paused
    }

    // -- Threads --

    /// Asks for ticks to be delivered on `thread` from the next tick on.
    ///
    /// Returns `false` when the link is shut down.
    pub fn request_thread(&self, thread: LinkThread) -> bool {
        let mut state = self.shared.state.lock();
        if state.shut_down || thread == LinkThread::None {
            return false;
        }
        state.next = thread;
        if state.next != state.current {
            state.paused = false;
        }
        true
    }

    /// Returns the thread holding the subscription.
    #[must_use]
    pub fn current_thread(&self) -> LinkThread {
        self.shared.state.lock().current
    }

    /// Returns the thread ticks were last requested on.
    #[must_use]
    pub fn requested_thread(&self) -> LinkThread {
        self.shared.state.lock().next
    }

    /// Starts the render thread if it is not running, and waits until it is
    /// ready to receive ticks.
    pub fn start_async_thread(&self) -> Result<(), HostError> {
        let mut state = self.shared.state.lock();
        self.shared.ensure_async_thread(&mut state)
    }

    /// Returns whether the render thread is running.
    #[must_use]
    pub fn is_async_running(&self) -> bool {
        self.shared.state.lock().async_running
    }

    /// Takes the error from the last failed attempt to start the render
    /// thread.
    pub fn take_error(&self) -> Option<HostError> {
        self.shared.state.lock().last_error.take()
    }

    /// Returns how many times the subscription moved between threads.
    #[must_use]
    pub fn handoff_count(&self) -> u64 {
        self.shared.state.lock().handoffs
    }

    /// Returns how many queued ticks were discarded because their
    /// subscription was removed.
    #[must_use]
    pub fn dropped_count(&self) -> u64 {
        self.shared.state.lock().dropped
    }

    // -- Delivery --

    /// Feeds one frame-clock callback into the link.
    ///
    /// Returns the tick if it was queued for the subscribed thread, or
    /// `None` while the link is paused or shut down.
    pub fn vsync(&self, timestamp: Time, target: Time) -> Option<LinkTick> {
        let mut state = self.shared.state.lock();
        if state.paused || state.shut_down {
            return None;
        }
        let tick = LinkTick {
            id: state.next_tick_id,
            timestamp,
            target,
        };
        state.next_tick_id += 1;
        match state.current {
            LinkThread::Controlling => state.controlling_queue.push_back(tick),
            LinkThread::Async => {
                state.async_queue.push_back(tick);
                self.shared.signal.notify_all();
            }
            LinkThread::None => return None,
        }
        Some(tick)
    }

    /// Delivers the ticks queued for the controlling thread to `handler`.
    ///
    /// `handler` gets the tick and whether it runs on the render thread
    /// (always `false` here), and returns the time of the next frame it
    /// wants. Returns the number of ticks delivered.
    pub fn deliver_controlling(
        &self,
        handler: &mut dyn FnMut(&LinkTick, bool) -> Option<Time>,
    ) -> usize {
        let mut delivered = 0;
        loop {
            let Some(tick) = self.shared.state.lock().controlling_queue.pop_front() else {
                return delivered;
            };
            if self.shared.deliver(&tick, LinkThread::Controlling, handler) {
                delivered += 1;
            }
        }
    }

    /// Waits until the render thread has no ticks left to deliver, or
    /// `timeout` passes. Returns whether it went idle.
    pub fn flush_async(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut state = self.shared.state.lock();
        while state.async_running && (state.async_busy || !state.async_queue.is_empty()) {
            if self
                .shared
                .signal
                .wait_until(&mut state, deadline)
                .timed_out()
            {
                return false;
            }
        }
        true
    }

    /// Stops the link and the render thread.
    ///
    /// Blocks until the render thread has finished the tick it is
    /// delivering. Later calls do nothing.
    pub fn shut_down(&self) {
        let handle = {
            let mut state = self.shared.state.lock();
            state.shut_down = true;
            state.paused = true;
            state.current = LinkThread::None;
            state.next = LinkThread::None;
            state.controlling_queue.clear();
            state.async_queue.clear();
            self.shared.signal.notify_all();
            state.async_thread.take()
        };
        if let Some(handle) = handle
            && handle.thread().id() != thread::current().id()
        {
            // A panicking async handler has already been reported on its own
            // thread.
            _ = handle.join();
        }
    }
}

impl LinkShared {
    /// Runs one tick on thread `on`. Returns whether `handler` ran.
    fn deliver(
        self: &Arc<Self>,
        tick: &LinkTick,
        on: LinkThread,
        handler: &mut dyn FnMut(&LinkTick, bool) -> Option<Time>,
    ) -> bool {
        let mut state = self.state.lock();
        if state.current != on {
            // Queued before the subscription moved away from this thread.
            state.dropped += 1;
            return false;
        }

        let mut delivered = false;
        if state.current == state.next
            && tick.timestamp.seconds() > state.next_update.seconds() - self.config.tick_tolerance
        {
            state.current_update = Some(tick.timestamp);
            state.next_update = Time::INFINITY;
            let is_async = on == LinkThread::Async;
            let next = MutexGuard::unlocked(&mut state, || handler(tick, is_async));
            if let Some(next) = next {
                state.next_update = state.next_update.min(next);
            }
            state.current_update = None;
            delivered = true;

            if !state.next_update.is_finite() && state.next == LinkThread::Async {
                state.next = LinkThread::Controlling;
                state.next_update = tick.timestamp;
            }
        }

        if state.next != state.current && state.current != LinkThread::None {
            self.hand_off(&mut state, tick.timestamp);
        }
        if !state.next_update.is_finite() && state.next == state.current {
            state.paused = true;
        }
        delivered
    }

    fn hand_off(self: &Arc<Self>, state: &mut MutexGuard<'_, LinkState>, now: Time) {
        if state.next == LinkThread::Async
            && let Err(err) = self.ensure_async_thread(state)
        {
            state.last_error = Some(err);
            state.next = LinkThread::Controlling;
            if state.current == LinkThread::Controlling {
                return;
            }
        }

        let from = state.current;
        // Remove the old subscription before adding the new one.
        state.current = LinkThread::None;
        let stale = match from {
            LinkThread::Controlling => core::mem::take(&mut state.controlling_queue),
            LinkThread::Async => core::mem::take(&mut state.async_queue),
            LinkThread::None => VecDeque::new(),
        };
        state.dropped += stale.len() as u64;
        let to = state.next;
        state.current = to;
        state.handoffs += 1;
        self.signal.notify_all();

        if let Some(sink) = self.sink.lock().as_ref() {
            let mut sink = sink.lock();
            Tracer::new(&mut *sink).link_handoff(&LinkHandoffEvent { now, from, to });
        }
    }

    /// Starts the render thread if needed and waits for it to come up.
    fn ensure_async_thread(
        self: &Arc<Self>,
        state: &mut MutexGuard<'_, LinkState>,
    ) -> Result<(), HostError> {
        if state.shut_down {
            return Err(HostError::ShutDown);
        }
        if state.async_running {
            return Ok(());
        }
        if state.async_thread.is_none() {
            let shared = Arc::clone(self);
            let handle = thread::Builder::new()
                .name(ASYNC_THREAD_NAME.into())
                .spawn(move || shared.run_async())
                .map_err(HostError::ThreadSpawn)?;
            state.async_thread = Some(handle);
        }
        // Rendezvous: the new thread flips `async_running` under the lock.
        while !state.async_running {
            if state.shut_down {
                return Err(HostError::ShutDown);
            }
            self.signal.wait(state);
        }
        Ok(())
    }

    fn run_async(self: Arc<Self>) {
        let mut state = self.state.lock();
        state.async_running = true;
        self.signal.notify_all();

        while !state.shut_down {
            let Some(tick) = state.async_queue.pop_front() else {
                self.signal.wait(&mut state);
                continue;
            };
            state.async_busy = true;
            let mut handler = state.async_handler.take();
            MutexGuard::unlocked(&mut state, || {
                self.deliver(&tick, LinkThread::Async, &mut |tick, _| {
                    handler.as_mut().and_then(|handler| handler(tick))
                });
            });
            if state.async_handler.is_none() {
                state.async_handler = handler;
            }
            state.async_busy = false;
            self.signal.notify_all();
        }

        state.async_running = false;
        self.signal.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    const FRAME: f64 = 1.0 / 60.0;
    const WAIT: Duration = Duration::from_secs(5);

    fn frame(n: u32) -> Time {
        Time(f64::from(n) * FRAME)
    }

    fn make_link() -> DisplayLink {
        DisplayLink::new(SchedulerConfig::DEFAULT)
    }

    #[test]
    fn earliest_deadline_wins() {
        let link = make_link();
        assert!(link.is_paused(), "a new link is paused");
        let now = Time(1.0);
        assert_eq!(link.set_next_update(0.2, now), Time(1.2));
        assert_eq!(link.set_next_update(0.05, now), now + 0.05);
        assert_eq!(
            link.set_next_update(0.1, now),
            now + 0.05,
            "a later request never delays an earlier one"
        );
        assert!(!link.is_paused());
    }

    #[test]
    fn cleared_deadline_accepts_a_later_request() {
        let link = make_link();
        link.set_next_update(0.05, Time::ZERO);
        link.clear_next_update();
        assert_eq!(link.next_update(), Time::INFINITY);
        assert!(link.is_paused());
        assert_eq!(link.set_next_update(0.5, Time(1.0)), Time(1.5));
    }

    #[test]
    fn tiny_delays_mean_next_tick() {
        let link = make_link();
        assert_eq!(link.set_next_update(0.001, Time(3.0)), Time::ZERO);
    }

    #[test]
    fn early_ticks_are_held_until_the_deadline() {
        let link = make_link();
        link.set_next_update(0.1, Time::ZERO);
        let mut seen = Vec::new();
        let mut handler = |tick: &LinkTick, _: bool| -> Option<Time> {
            seen.push(tick.id);
            None
        };

        link.vsync(Time(0.05), Time(0.06));
        assert_eq!(link.deliver_controlling(&mut handler), 0, "too early");
        // Within the tolerance of the deadline.
        link.vsync(Time(0.1 - 1.0 / 480.0), Time(0.11));
        assert_eq!(link.deliver_controlling(&mut handler), 1);
        assert_eq!(seen, [1]);
        assert!(link.is_paused(), "nothing asked for another frame");
        assert!(link.vsync(Time(0.2), Time(0.21)).is_none());
    }

    #[test]
    fn handler_can_ask_for_the_next_frame() {
        let link = make_link();
        link.set_next_update(0.0, Time::ZERO);
        link.vsync(frame(1), frame(2));
        let delivered = link.deliver_controlling(&mut |tick, is_async| {
            assert!(!is_async, "controlling delivery");
            Some(tick.timestamp + FRAME)
        });
        assert_eq!(delivered, 1);
        assert!(!link.is_paused());
        assert_eq!(link.next_update(), frame(2));
    }

    #[test]
    fn render_thread_takes_over_and_hands_back() {
        let link = make_link();
        let committed = Arc::new(AtomicUsize::new(0));
        let counter = committed.clone();
        link.set_async_handler(Box::new(move |_: &LinkTick| {
            counter.fetch_add(1, Ordering::SeqCst);
            // Nothing more to do off the controlling thread.
            None
        }));

        link.request_thread(LinkThread::Async);
        link.set_next_update(0.0, Time::ZERO);
        link.vsync(frame(1), frame(2));
        assert_eq!(
            link.deliver_controlling(&mut |_, _| None),
            0,
            "a tick that triggers a handoff is not delivered"
        );
        assert_eq!(link.current_thread(), LinkThread::Async);
        assert!(link.is_async_running(), "thread started with a rendezvous");

        link.vsync(frame(2), frame(3));
        assert!(link.flush_async(WAIT));
        assert_eq!(committed.load(Ordering::SeqCst), 1);
        assert_eq!(link.current_thread(), LinkThread::Controlling);
        assert_eq!(link.handoff_count(), 2);

        let mut controlling = Vec::new();
        link.vsync(frame(3), frame(4));
        link.deliver_controlling(&mut |tick, _| {
            controlling.push(tick.timestamp);
            None
        });
        assert_eq!(
            controlling,
            [frame(3)],
            "controlling thread renders the frame the render thread declined"
        );
        link.shut_down();
        assert!(!link.is_async_running());
    }

    #[test]
    fn shut_down_refuses_new_threads() {
        let link = make_link();
        link.shut_down();
        assert!(matches!(link.start_async_thread(), Err(HostError::ShutDown)));
        assert!(!link.request_thread(LinkThread::Async));
        link.shut_down();
    }

    #[test]
    fn no_tick_is_delivered_on_two_threads() {
        let link = make_link();
        let busy = Arc::new(AtomicBool::new(false));
        let overlaps = Arc::new(AtomicUsize::new(0));
        let log = Arc::new(Mutex::new(Vec::<(u64, LinkThread)>::new()));

        let enter = {
            let busy = busy.clone();
            let overlaps = overlaps.clone();
            let log = log.clone();
            move |tick: &LinkTick, thread: LinkThread| {
                if busy.swap(true, Ordering::SeqCst) {
                    overlaps.fetch_add(1, Ordering::SeqCst);
                }
                log.lock().push((tick.id, thread));
                thread::sleep(Duration::from_micros(50));
                busy.store(false, Ordering::SeqCst);
                Some(tick.timestamp)
            }
        };
        let on_async = enter.clone();
        link.set_async_handler(Box::new(move |tick: &LinkTick| {
            on_async(tick, LinkThread::Async)
        }));
        let mut on_controlling = |tick: &LinkTick, _: bool| enter(tick, LinkThread::Controlling);

        for n in 0..400 {
            match n % 40 {
                0 => _ = link.request_thread(LinkThread::Async),
                20 => _ = link.request_thread(LinkThread::Controlling),
                _ => {}
            }
            link.set_next_update(0.0, frame(n));
            link.vsync(frame(n), frame(n + 1));
            link.deliver_controlling(&mut on_controlling);
            if n % 7 == 0 {
                assert!(link.flush_async(WAIT), "render thread stalled");
            } else {
                thread::yield_now();
            }
        }
        assert!(link.flush_async(WAIT), "render thread stalled");
        link.shut_down();

        assert_eq!(overlaps.load(Ordering::SeqCst), 0, "concurrent delivery");
        let log = log.lock();
        let mut ids: Vec<u64> = log.iter().map(|(id, _)| *id).collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total, "a tick was delivered twice");
        assert!(
            log.iter().any(|(_, t)| *t == LinkThread::Async),
            "render thread received ticks"
        );
        assert!(
            log.iter().any(|(_, t)| *t == LinkThread::Controlling),
            "controlling thread received ticks"
        );
        assert!(link.handoff_count() >= 2);
    }
}
