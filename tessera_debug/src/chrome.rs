// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! Render passes become duration slices on the thread that ran them, with
//! their phases nested inside. Scheduler events are instants.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use tessera_core::time::Time;

use crate::recorder::{RecordedEvent, decode};

const MAIN_TID: u32 = 0;
const RENDER_TID: u32 = 1;

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
/// Timestamps are in microseconds of host time.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = vec![
        thread_name(MAIN_TID, "controlling"),
        thread_name(RENDER_TID, "render"),
    ];
    // Phases carry no thread, so they follow the pass that contains them.
    let mut tid = MAIN_TID;

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::UpdateRequest(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "UpdateRequest",
                    "cat": "Scheduler",
                    "ts": us(e.now),
                    "pid": 0,
                    "tid": MAIN_TID,
                    "s": "t",
                    "args": {
                        "path": format!("{:?}", e.path),
                        "delay_us": e.delay * 1e6,
                    }
                }));
            }
            RecordedEvent::Invalidate(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Invalidate",
                    "cat": "Scheduler",
                    "ts": us(e.now),
                    "pid": 0,
                    "tid": MAIN_TID,
                    "s": "t",
                    "args": {
                        "properties": e.properties,
                        "may_defer": e.may_defer,
                        "coalesced": e.coalesced,
                    }
                }));
            }
            RecordedEvent::RenderBegin(e) => {
                tid = if e.is_async { RENDER_TID } else { MAIN_TID };
                events.push(json!({
                    "ph": "B",
                    "name": "Render",
                    "cat": "Render",
                    "ts": us(e.now),
                    "pid": 0,
                    "tid": tid,
                    "args": {
                        "render_index": e.render_index,
                        "interval_us": e.interval * 1e6,
                    }
                }));
            }
            RecordedEvent::RenderEnd(e) => {
                events.push(json!({
                    "ph": "E",
                    "name": "Render",
                    "cat": "Render",
                    "ts": Value::Null,
                    "pid": 0,
                    "tid": tid,
                    "args": {
                        "render_index": e.render_index,
                        "passes": e.passes,
                        "next_update_us": e.next_update.is_finite().then(|| us(e.next_update)),
                    }
                }));
            }
            RecordedEvent::PhaseBegin(e) => {
                events.push(json!({
                    "ph": "B",
                    "name": format!("{:?}", e.phase),
                    "cat": "Render",
                    "ts": us(e.timestamp),
                    "pid": 0,
                    "tid": tid,
                    "args": {
                        "render_index": e.render_index,
                    }
                }));
            }
            RecordedEvent::PhaseEnd(e) => {
                events.push(json!({
                    "ph": "E",
                    "name": format!("{:?}", e.phase),
                    "cat": "Render",
                    "ts": us(e.timestamp),
                    "pid": 0,
                    "tid": tid,
                    "args": {
                        "render_index": e.render_index,
                    }
                }));
            }
            RecordedEvent::LinkHandoff(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "LinkHandoff",
                    "cat": "Scheduler",
                    "ts": us(e.now),
                    "pid": 0,
                    "s": "p",
                    "args": {
                        "from": format!("{:?}", e.from),
                        "to": format!("{:?}", e.to),
                    }
                }));
            }
            RecordedEvent::UpdateSummary(s) => {
                events.push(json!({
                    "ph": "i",
                    "name": "UpdateSummary",
                    "cat": "Summary",
                    "ts": us(s.now),
                    "pid": 0,
                    "tid": if s.is_async { RENDER_TID } else { MAIN_TID },
                    "s": "t",
                    "args": {
                        "render_index": s.render_index,
                        "properties_us": s.properties_seconds * 1e6,
                        "update_us": s.update_seconds * 1e6,
                        "display_us": s.display_seconds * 1e6,
                        "commit_us": s.commit_seconds * 1e6,
                    }
                }));
            }
            RecordedEvent::ListReuse(e) => {
                events.push(json!({
                    "ph": "C",
                    "name": "ListReuse",
                    "cat": "Rich",
                    "ts": Value::Null,
                    "pid": 0,
                    "args": {
                        "reused": e.reused,
                        "created": e.created,
                        "removed": e.removed,
                    }
                }));
            }
        }
    }

    fill_missing_timestamps(&mut events);
    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn us(t: Time) -> f64 {
    t.seconds() * 1e6
}

fn thread_name(tid: u32, name: &str) -> Value {
    json!({
        "ph": "M",
        "name": "thread_name",
        "pid": 0,
        "tid": tid,
        "args": { "name": name },
    })
}

/// Events without a time of their own happen when the preceding one did.
fn fill_missing_timestamps(events: &mut [Value]) {
    let mut last = Value::from(0.0);
    for event in events.iter_mut().filter(|e| e["ph"] != "M") {
        if event["ts"].is_null() {
            event["ts"] = last.clone();
        } else {
            last = event["ts"].clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use tessera_core::trace::{
        PhaseBeginEvent, PhaseEndEvent, PhaseKind, RenderBeginEvent, RenderEndEvent, TraceSink,
        UpdatePath, UpdateRequestEvent,
    };

    fn export_to_values(bytes: &[u8]) -> Vec<Value> {
        let mut out = Vec::new();
        export(bytes, &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        serde_json::from_str(&json_str).unwrap()
    }

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_update_request(&UpdateRequestEvent {
            now: Time(1.0),
            delay: 0.0,
            deadline: Time(1.0),
            path: UpdatePath::Immediate,
        });
        rec.on_render_begin(&RenderBeginEvent {
            render_index: 1,
            now: Time(1.0),
            interval: 0.0,
            target: None,
            is_async: true,
        });
        rec.on_phase_begin(&PhaseBeginEvent {
            render_index: 1,
            phase: PhaseKind::Display,
            timestamp: Time(1.0),
        });
        rec.on_phase_end(&PhaseEndEvent {
            render_index: 1,
            phase: PhaseKind::Display,
            timestamp: Time(1.002),
        });
        rec.on_render_end(&RenderEndEvent {
            render_index: 1,
            next_update: Time::INFINITY,
            passes: 1,
            is_async: true,
        });

        let parsed = export_to_values(rec.as_bytes());
        // Two thread-name records, then one per event.
        assert_eq!(parsed.len(), 7);
        assert_eq!(parsed[2]["ph"], "i");
        assert_eq!(parsed[2]["args"]["path"], "Immediate");
        assert_eq!(parsed[3]["ph"], "B");
        assert_eq!(parsed[3]["tid"], RENDER_TID, "async pass");
        assert_eq!(parsed[4]["name"], "Display");
        assert_eq!(parsed[4]["tid"], RENDER_TID, "phase follows its pass");
        assert_eq!(parsed[6]["ph"], "E");
        assert_eq!(parsed[6]["ts"], parsed[5]["ts"], "end takes the last time");
        assert!(parsed[6]["args"]["next_update_us"].is_null());
    }

    #[test]
    fn export_empty_recording() {
        let parsed = export_to_values(&[]);
        assert!(parsed.iter().all(|e| e["ph"] == "M"), "only metadata");
    }
}
