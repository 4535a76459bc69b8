// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Times are
//! printed in milliseconds.

use std::io::Write;

use tessera_core::time::Time;
use tessera_core::trace::{
    InvalidateEvent, LinkHandoffEvent, LinkThread, ListReuseEvent, PhaseBeginEvent,
    PhaseEndEvent, PhaseKind, RenderBeginEvent, RenderEndEvent, TraceSink, UpdatePath,
    UpdateRequestEvent, UpdateSummary,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write + Send>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns its writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn ms(t: Time) -> f64 {
    t.seconds() * 1000.0
}

fn phase_name(phase: PhaseKind) -> &'static str {
    match phase {
        PhaseKind::Properties => "props",
        PhaseKind::Update => "update",
        PhaseKind::Display => "display",
        PhaseKind::Commit => "commit",
    }
}

fn path_name(path: UpdatePath) -> &'static str {
    match path {
        UpdatePath::Immediate => "immediate",
        UpdatePath::Marshal => "marshal",
        UpdatePath::Timer => "timer",
        UpdatePath::Link => "link",
        UpdatePath::Superseded => "superseded",
        UpdatePath::Held => "held",
    }
}

fn thread_name(thread: LinkThread) -> &'static str {
    match thread {
        LinkThread::None => "none",
        LinkThread::Controlling => "main",
        LinkThread::Async => "render",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_update_request(&mut self, e: &UpdateRequestEvent) {
        let _ = writeln!(
            self.writer,
            "[request] at {:.3}ms delay={:.3}ms via {}",
            ms(e.now),
            e.delay * 1000.0,
            path_name(e.path),
        );
    }

    fn on_invalidate(&mut self, e: &InvalidateEvent) {
        let _ = writeln!(
            self.writer,
            "[invalidate] at {:.3}ms props={:#06x} defer={}{}",
            ms(e.now),
            e.properties,
            e.may_defer,
            if e.coalesced { " (coalesced)" } else { "" },
        );
    }

    fn on_render_begin(&mut self, e: &RenderBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[render:begin] #{} at {:.3}ms interval={:.3}ms{}",
            e.render_index,
            ms(e.now),
            e.interval * 1000.0,
            if e.is_async { " async" } else { "" },
        );
    }

    fn on_render_end(&mut self, e: &RenderEndEvent) {
        let next = if e.next_update.is_finite() {
            format!("{:.3}ms", ms(e.next_update))
        } else {
            "never".to_owned()
        };
        let _ = writeln!(
            self.writer,
            "[render:end] #{} passes={} next={next}",
            e.render_index, e.passes,
        );
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:begin] #{} {} at {:.3}ms",
            e.render_index,
            phase_name(e.phase),
            ms(e.timestamp),
        );
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:end] #{} {} at {:.3}ms",
            e.render_index,
            phase_name(e.phase),
            ms(e.timestamp),
        );
    }

    fn on_link_handoff(&mut self, e: &LinkHandoffEvent) {
        let _ = writeln!(
            self.writer,
            "[link] at {:.3}ms {} -> {}",
            ms(e.now),
            thread_name(e.from),
            thread_name(e.to),
        );
    }

    fn on_update_summary(&mut self, s: &UpdateSummary) {
        let _ = writeln!(
            self.writer,
            "[summary] #{} props={:.3}ms update={:.3}ms display={:.3}ms commit={:.3}ms",
            s.render_index,
            s.properties_seconds * 1000.0,
            s.update_seconds * 1000.0,
            s.display_seconds * 1000.0,
            s.commit_seconds * 1000.0,
        );
    }

    fn on_list_reuse(&mut self, e: &ListReuseEvent) {
        let _ = writeln!(
            self.writer,
            "[reuse] #{} reused={} created={} removed={}",
            e.render_index, e.reused, e.created, e.removed,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_line_per_event() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_update_request(&UpdateRequestEvent {
            now: Time(1.0),
            delay: 0.0,
            deadline: Time(1.0),
            path: UpdatePath::Held,
        });
        sink.on_render_end(&RenderEndEvent {
            render_index: 3,
            next_update: Time::INFINITY,
            passes: 1,
            is_async: false,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(output.lines().count(), 2, "got: {output}");
        assert!(output.contains("via held"), "got: {output}");
        assert!(output.contains("#3 passes=1 next=never"), "got: {output}");
    }

    #[test]
    fn handoffs_name_both_threads() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_link_handoff(&LinkHandoffEvent {
            now: Time(0.5),
            from: LinkThread::Async,
            to: LinkThread::Controlling,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.contains("render -> main"), "got: {output}");
    }
}
