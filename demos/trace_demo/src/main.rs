// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated host frame loop that exercises the tracing pipeline.
//!
//! Drives a [`Host`] for 60 display-link ticks on a manual clock, resizing
//! and restyling the view tree along the way and moving commits to the
//! render thread halfway through. Events go to both a
//! [`PrettyPrintSink`](tessera_debug::pretty::PrettyPrintSink) and a
//! [`RecorderSink`](tessera_debug::recorder::RecorderSink); the recording is
//! exported as a Chrome trace.

use std::fs::File;
use std::io::BufWriter;
use std::sync::Arc;
use std::time::Duration;

use kurbo::Size;
use parking_lot::Mutex;
use tessera_core::environment::Environment;
use tessera_core::geometry::VerticalAlignment;
use tessera_core::layout::{AnyLayout, HStack};
use tessera_core::shape_style::{Color, ForegroundStyle, ShapeStyleExt};
use tessera_core::trace::{
    InvalidateEvent, LinkHandoffEvent, ListReuseEvent, PhaseBeginEvent, PhaseEndEvent,
    RenderBeginEvent, RenderEndEvent, TraceSink, UpdateRequestEvent, UpdateSummary,
};
use tessera_core::view::ViewNode;
use tessera_host::{FakeExecutor, Frame, Host, SchedulerConfig, SharedSink};

use tessera_debug::pretty::PrettyPrintSink;
use tessera_debug::recorder::RecorderSink;

const FRAME_COUNT: u32 = 60;
const FRAME: f64 = 1.0 / 60.0;

/// Forwards every event to both sinks.
#[derive(Debug)]
struct Tee {
    pretty: PrettyPrintSink,
    recorder: RecorderSink,
}

macro_rules! tee {
    ($($method:ident($event:ty)),* $(,)?) => {
        impl TraceSink for Tee {
            $(
                fn $method(&mut self, e: &$event) {
                    self.pretty.$method(e);
                    self.recorder.$method(e);
                }
            )*
        }
    };
}

tee!(
    on_update_request(UpdateRequestEvent),
    on_invalidate(InvalidateEvent),
    on_render_begin(RenderBeginEvent),
    on_render_end(RenderEndEvent),
    on_phase_begin(PhaseBeginEvent),
    on_phase_end(PhaseEndEvent),
    on_link_handoff(LinkHandoffEvent),
    on_update_summary(UpdateSummary),
    on_list_reuse(ListReuseEvent),
);

fn swatches(count: usize) -> ViewNode {
    let children = (0..count)
        .map(|_| ViewNode::fill(ForegroundStyle.erased(), Size::new(20.0, 20.0)))
        .collect();
    ViewNode::container(
        AnyLayout::new(HStack::new(VerticalAlignment::CENTER, Some(4.0))),
        children,
    )
}

fn main() {
    // -- sinks -------------------------------------------------------------
    let tee = Arc::new(Mutex::new(Tee {
        pretty: PrettyPrintSink::stderr(),
        recorder: RecorderSink::new(),
    }));

    // -- host --------------------------------------------------------------
    let executor = Arc::new(FakeExecutor::default());
    let presented = Arc::new(Mutex::new(0_u32));
    let counter = presented.clone();
    let mut host = Host::new(
        swatches(3),
        executor.clone(),
        SchedulerConfig::DEFAULT,
        move |_: &Frame| *counter.lock() += 1,
    );
    let sink: SharedSink = tee.clone();
    host.set_trace_sink(Some(sink));
    host.set_size(Size::new(320.0, 240.0));
    host.poll();

    // -- simulated loop ----------------------------------------------------
    let clock = executor.clock().clone();
    for frame_index in 0..FRAME_COUNT {
        clock.advance(FRAME);
        match frame_index {
            10 => host.set_size(Size::new(400.0, 240.0)),
            20 => {
                host.set_environment(Environment::default().with_foreground(Color::BLUE.erased()));
            }
            30 => host
                .enable_async_rendering(true)
                .expect("display link is running"),
            40 => host.set_root_view(swatches(5)),
            _ => {}
        }
        // Keep the graph busy so every tick has a frame to render.
        host.request_update(FRAME / 2.0);

        let now = clock.now();
        _ = host.link().vsync(now, now + FRAME);
        host.poll();
        _ = host.link().flush_async(Duration::from_secs(1));
    }

    println!(
        "Rendered {} passes, presented {} frames",
        host.render_count(),
        presented.lock()
    );
    drop(host);

    // -- export Chrome trace -----------------------------------------------
    let path = "trace.json";
    let file = File::create(path).expect("failed to create trace.json");
    let mut writer = BufWriter::new(file);
    tessera_debug::chrome::export(tee.lock().recorder.as_bytes(), &mut writer)
        .expect("failed to write Chrome trace");

    println!("Wrote {path} ({FRAME_COUNT} ticks)");
}
