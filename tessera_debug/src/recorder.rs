// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records, one tag byte followed by
//! the event's fields. Times are stored as the bits of their `f64` seconds,
//! so infinite deadlines survive the trip. [`decode`] reads the records back
//! as an iterator of [`RecordedEvent`].

use tessera_core::time::Time;
use tessera_core::trace::{
    InvalidateEvent, LinkHandoffEvent, LinkThread, ListReuseEvent, PhaseBeginEvent,
    PhaseEndEvent, PhaseKind, RenderBeginEvent, RenderEndEvent, TraceSink, UpdatePath,
    UpdateRequestEvent, UpdateSummary,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_UPDATE_REQUEST: u8 = 1;
const TAG_INVALIDATE: u8 = 2;
const TAG_RENDER_BEGIN: u8 = 3;
const TAG_RENDER_END: u8 = 4;
const TAG_PHASE_BEGIN: u8 = 5;
const TAG_PHASE_END: u8 = 6;
const TAG_LINK_HANDOFF: u8 = 7;
const TAG_UPDATE_SUMMARY: u8 = 8;
const TAG_LIST_REUSE: u8 = 9;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Discards everything recorded so far.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_time(&mut self, t: Time) {
        self.write_f64(t.seconds());
    }

    fn write_option_time(&mut self, t: Option<Time>) {
        match t {
            Some(t) => {
                self.write_u8(1);
                self.write_time(t);
            }
            None => {
                self.write_u8(0);
                self.write_u64(0);
            }
        }
    }

    fn write_phase(&mut self, p: PhaseKind) {
        self.write_u8(match p {
            PhaseKind::Properties => 0,
            PhaseKind::Update => 1,
            PhaseKind::Display => 2,
            PhaseKind::Commit => 3,
        });
    }

    fn write_path(&mut self, p: UpdatePath) {
        self.write_u8(match p {
            UpdatePath::Immediate => 0,
            UpdatePath::Marshal => 1,
            UpdatePath::Timer => 2,
            UpdatePath::Link => 3,
            UpdatePath::Superseded => 4,
            UpdatePath::Held => 5,
        });
    }

    fn write_thread(&mut self, t: LinkThread) {
        self.write_u8(match t {
            LinkThread::None => 0,
            LinkThread::Controlling => 1,
            LinkThread::Async => 2,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_update_request(&mut self, e: &UpdateRequestEvent) {
        self.write_u8(TAG_UPDATE_REQUEST);
        self.write_time(e.now);
        self.write_f64(e.delay);
        self.write_time(e.deadline);
        self.write_path(e.path);
    }

    fn on_invalidate(&mut self, e: &InvalidateEvent) {
        self.write_u8(TAG_INVALIDATE);
        self.write_time(e.now);
        self.write_u32(e.properties);
        self.write_bool(e.may_defer);
        self.write_bool(e.coalesced);
    }

    fn on_render_begin(&mut self, e: &RenderBeginEvent) {
        self.write_u8(TAG_RENDER_BEGIN);
        self.write_u64(e.render_index);
        self.write_time(e.now);
        self.write_f64(e.interval);
        self.write_option_time(e.target);
        self.write_bool(e.is_async);
    }

    fn on_render_end(&mut self, e: &RenderEndEvent) {
        self.write_u8(TAG_RENDER_END);
        self.write_u64(e.render_index);
        self.write_time(e.next_update);
        self.write_u32(e.passes);
        self.write_bool(e.is_async);
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.write_u8(TAG_PHASE_BEGIN);
        self.write_u64(e.render_index);
        self.write_phase(e.phase);
        self.write_time(e.timestamp);
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.write_u8(TAG_PHASE_END);
        self.write_u64(e.render_index);
        self.write_phase(e.phase);
        self.write_time(e.timestamp);
    }

    fn on_link_handoff(&mut self, e: &LinkHandoffEvent) {
        self.write_u8(TAG_LINK_HANDOFF);
        self.write_time(e.now);
        self.write_thread(e.from);
        self.write_thread(e.to);
    }

    fn on_update_summary(&mut self, s: &UpdateSummary) {
        self.write_u8(TAG_UPDATE_SUMMARY);
        self.write_u64(s.render_index);
        self.write_time(s.now);
        self.write_bool(s.is_async);
        self.write_f64(s.properties_seconds);
        self.write_f64(s.update_seconds);
        self.write_f64(s.display_seconds);
        self.write_f64(s.commit_seconds);
        self.write_time(s.next_update);
    }

    fn on_list_reuse(&mut self, e: &ListReuseEvent) {
        self.write_u8(TAG_LIST_REUSE);
        self.write_u64(e.render_index);
        self.write_u32(e.reused);
        self.write_u32(e.created);
        self.write_u32(e.removed);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// An [`UpdateRequestEvent`].
    UpdateRequest(UpdateRequestEvent),
    /// An [`InvalidateEvent`].
    Invalidate(InvalidateEvent),
    /// A [`RenderBeginEvent`].
    RenderBegin(RenderBeginEvent),
    /// A [`RenderEndEvent`].
    RenderEnd(RenderEndEvent),
    /// A [`PhaseBeginEvent`].
    PhaseBegin(PhaseBeginEvent),
    /// A [`PhaseEndEvent`].
    PhaseEnd(PhaseEndEvent),
    /// A [`LinkHandoffEvent`].
    LinkHandoff(LinkHandoffEvent),
    /// An [`UpdateSummary`].
    UpdateSummary(UpdateSummary),
    /// A [`ListReuseEvent`].
    ListReuse(ListReuseEvent),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
///
/// Iteration stops at the first unknown tag or truncated record.
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[v]| v)
    }

    fn read_bool(&mut self) -> Option<bool> {
        Some(self.read_u8()? != 0)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.read_u64().map(f64::from_bits)
    }

    fn read_time(&mut self) -> Option<Time> {
        self.read_f64().map(Time)
    }

    fn read_option_time(&mut self) -> Option<Option<Time>> {
        let present = self.read_u8()?;
        let t = self.read_time()?;
        Some((present != 0).then_some(t))
    }

    fn read_phase(&mut self) -> Option<PhaseKind> {
        Some(match self.read_u8()? {
            0 => PhaseKind::Properties,
            1 => PhaseKind::Update,
            2 => PhaseKind::Display,
            _ => PhaseKind::Commit,
        })
    }

    fn read_path(&mut self) -> Option<UpdatePath> {
        Some(match self.read_u8()? {
            0 => UpdatePath::Immediate,
            1 => UpdatePath::Marshal,
            2 => UpdatePath::Timer,
            3 => UpdatePath::Link,
            4 => UpdatePath::Superseded,
            _ => UpdatePath::Held,
        })
    }

    fn read_thread(&mut self) -> Option<LinkThread> {
        Some(match self.read_u8()? {
            0 => LinkThread::None,
            1 => LinkThread::Controlling,
            _ => LinkThread::Async,
        })
    }

    fn decode_update_request(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::UpdateRequest(UpdateRequestEvent {
            now: self.read_time()?,
            delay: self.read_f64()?,
            deadline: self.read_time()?,
            path: self.read_path()?,
        }))
    }

    fn decode_invalidate(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Invalidate(InvalidateEvent {
            now: self.read_time()?,
            properties: self.read_u32()?,
            may_defer: self.read_bool()?,
            coalesced: self.read_bool()?,
        }))
    }

    fn decode_render_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::RenderBegin(RenderBeginEvent {
            render_index: self.read_u64()?,
            now: self.read_time()?,
            interval: self.read_f64()?,
            target: self.read_option_time()?,
            is_async: self.read_bool()?,
        }))
    }

    fn decode_render_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::RenderEnd(RenderEndEvent {
            render_index: self.read_u64()?,
            next_update: self.read_time()?,
            passes: self.read_u32()?,
            is_async: self.read_bool()?,
        }))
    }

    fn decode_phase_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseBegin(PhaseBeginEvent {
            render_index: self.read_u64()?,
            phase: self.read_phase()?,
            timestamp: self.read_time()?,
        }))
    }

    fn decode_phase_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseEnd(PhaseEndEvent {
            render_index: self.read_u64()?,
            phase: self.read_phase()?,
            timestamp: self.read_time()?,
        }))
    }

    fn decode_link_handoff(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::LinkHandoff(LinkHandoffEvent {
            now: self.read_time()?,
            from: self.read_thread()?,
            to: self.read_thread()?,
        }))
    }

    fn decode_update_summary(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::UpdateSummary(UpdateSummary {
            render_index: self.read_u64()?,
            now: self.read_time()?,
            is_async: self.read_bool()?,
            properties_seconds: self.read_f64()?,
            update_seconds: self.read_f64()?,
            display_seconds: self.read_f64()?,
            commit_seconds: self.read_f64()?,
            next_update: self.read_time()?,
        }))
    }

    fn decode_list_reuse(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::ListReuse(ListReuseEvent {
            render_index: self.read_u64()?,
            reused: self.read_u32()?,
            created: self.read_u32()?,
            removed: self.read_u32()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_u8()? {
            TAG_UPDATE_REQUEST => self.decode_update_request(),
            TAG_INVALIDATE => self.decode_invalidate(),
            TAG_RENDER_BEGIN => self.decode_render_begin(),
            TAG_RENDER_END => self.decode_render_end(),
            TAG_PHASE_BEGIN => self.decode_phase_begin(),
            TAG_PHASE_END => self.decode_phase_end(),
            TAG_LINK_HANDOFF => self.decode_link_handoff(),
            TAG_UPDATE_SUMMARY => self.decode_update_summary(),
            TAG_LIST_REUSE => self.decode_list_reuse(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
