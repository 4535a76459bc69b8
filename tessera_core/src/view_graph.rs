// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The graph behind one hosted view tree.
//!
//! A [`ViewGraph`] owns an attribute [`Graph`] holding the root view, the
//! environment, the proposed size, and the safe area as inputs. From those
//! it derives, on demand:
//!
//! ```text
//!  root view ──► ListAttribute ──► RootLayoutRule ──► DisplayRule ──► DisplayList
//!                                   │  per element:      ▲
//!                                   │  subgraph {        │
//!                                   │    node input      │
//!                                   │    ChildLayoutRule ┘
//!                                   │  }
//!  environment, safe area ──────────┴──────────────────────┘
//! ```
//!
//! Each top-level list element lives in its own subgraph. When the list is
//! rebuilt, an element whose canonical identity matches an old element and
//! whose generator accepts [`Elements::try_to_reuse_element`] keeps the old
//! subgraph, its cached layout, and its display identity. Everything else
//! is built fresh, and subgraphs nobody uses any more are torn down after
//! the update.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::Cell;

use bitflags::bitflags;
use hashbrown::HashMap;
use kurbo::{Point, Rect, Size};
use tessera_graph::{Attribute, Graph, Rule, RuleContext, SubgraphId};

use crate::display_list::{DisplayIdentity, DisplayList, DisplayListBuilder, DisplayVersion};
use crate::environment::Environment;
use crate::geometry::EdgeInsets;
use crate::layout::DEFAULT_SPACING;
use crate::time::Time;
use crate::view::{LayoutContext, ViewLayout, ViewNode, materialize};
use crate::view_list::{
    CanonicalId, Elements, IteratorStyle, ListAttribute, ListInputs, ListSubgraph, ListValue,
    ReleaseQueue,
};

bitflags! {
    /// Outputs a host asks the view graph to keep up to date.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Outputs: u8 {
        /// The display list.
        const DISPLAY_LIST = 1 << 0;
        /// Layout of the root's children.
        const LAYOUT = 1 << 1;
        /// Platform item descriptions.
        const PLATFORM_ITEMS = 1 << 2;
        /// Hit-testing responders.
        const RESPONDERS = 1 << 3;
        /// Focus state.
        const FOCUS = 1 << 4;
    }
}

impl Default for Outputs {
    fn default() -> Self {
        Self::DISPLAY_LIST | Self::LAYOUT
    }
}

bitflags! {
    /// Why a host is not currently showing its view graph.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct RemovedState: u8 {
        /// The host is not in a window.
        const UNATTACHED = 1 << 0;
        /// The host is parked for reuse by a container.
        const HIDDEN_FOR_REUSE = 1 << 1;
    }
}

/// When the graph next wants to be updated, and why.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NextUpdate {
    /// Earliest requested time, or [`Time::INFINITY`].
    pub time: Time,
    /// Shortest requested frame interval, in seconds.
    pub interval: f64,
    /// Host-defined reason bits.
    pub reasons: u32,
}

impl Default for NextUpdate {
    fn default() -> Self {
        Self {
            time: Time::INFINITY,
            interval: f64::INFINITY,
            reasons: 0,
        }
    }
}

impl NextUpdate {
    /// Asks for an update no later than `time`.
    pub fn at(&mut self, time: Time, reason: u32) {
        self.time = self.time.min(time);
        self.reasons |= reason;
    }

    /// Asks for updates at least every `interval` seconds.
    pub fn every(&mut self, interval: f64, reason: u32) {
        self.interval = self.interval.min(interval);
        self.reasons |= reason;
    }

    /// Returns whether nothing has been requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.time.is_finite() && !self.interval.is_finite()
    }

    /// Returns the requests, leaving none behind.
    pub fn take(&mut self) -> Self {
        core::mem::take(self)
    }
}

/// Tunables for a [`ViewGraph`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewGraphConfig {
    /// Maximum number of passes per [`ViewGraph::update_outputs`] call.
    pub max_update_passes: u32,
    /// Spacing used between views that state no preference.
    pub default_spacing: f64,
}

impl ViewGraphConfig {
    /// The default configuration.
    pub const DEFAULT: Self = Self {
        max_update_passes: 8,
        default_spacing: DEFAULT_SPACING,
    };
}

impl Default for ViewGraphConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Element counts from the most recent list rebuild.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReuseStats {
    /// Elements that kept their subgraph.
    pub reused: u32,
    /// Elements built from scratch.
    pub created: u32,
    /// Elements whose subgraph was released.
    pub removed: u32,
}

/// What one [`ViewGraph::update_outputs`] call did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UpdateOutcome {
    /// Update passes run; zero when nothing was stale.
    pub passes: u32,
    /// Subgraphs torn down after the passes.
    pub released: usize,
    /// When the graph next wants an update.
    pub next_update: NextUpdate,
}

/// The laid-out root: one layout per top-level list element.
#[derive(Clone, Debug, PartialEq)]
pub struct RootLayout {
    layout: ViewLayout,
    identities: Rc<[DisplayIdentity]>,
}

impl RootLayout {
    /// Returns the root's layout tree; its children are the list elements.
    #[must_use]
    pub fn layout(&self) -> &ViewLayout {
        &self.layout
    }

    /// Returns the display identity of each top-level element.
    #[must_use]
    pub fn identities(&self) -> &[DisplayIdentity] {
        &self.identities
    }
}

/// Lays out one element from the view stored in its subgraph.
#[derive(Debug)]
struct ChildLayoutRule {
    node: Attribute<ViewNode>,
    environment: Attribute<Environment>,
    safe_area: Attribute<EdgeInsets>,
}

impl Rule for ChildLayoutRule {
    type Value = ViewLayout;

    const ASYNC: bool = true;

    fn update(&mut self, ctx: &mut RuleContext<'_>) -> ViewLayout {
        let node = ctx.value(self.node);
        let environment = ctx.value(self.environment);
        let context = LayoutContext {
            direction: environment.layout_direction,
            safe_area: ctx.value(self.safe_area),
        };
        node.layout(&context)
    }
}

/// State kept for one top-level element between rebuilds.
#[derive(Debug)]
struct ChildEntry {
    canonical: CanonicalId,
    elements: Rc<dyn Elements>,
    index: usize,
    subgraph: Rc<ListSubgraph>,
    layout: Attribute<ViewLayout>,
    identity: DisplayIdentity,
}

#[derive(Debug)]
struct RootLayoutRule {
    list: Attribute<ListValue>,
    phase: Attribute<u32>,
    environment: Attribute<Environment>,
    safe_area: Attribute<EdgeInsets>,
    content: SubgraphId,
    queue: ReleaseQueue,
    entries: Vec<ChildEntry>,
    seen_phase: u32,
    next_identity: u64,
    stats: Rc<Cell<ReuseStats>>,
}

impl RootLayoutRule {
    fn release(&self, graph: &mut Graph, entry: &ChildEntry) {
        graph.remove_child(self.content, entry.subgraph.subgraph());
        entry.subgraph.remove();
    }

    fn create(
        &mut self,
        graph: &mut Graph,
        canonical: CanonicalId,
        elements: Rc<dyn Elements>,
        index: usize,
        body: ViewNode,
    ) -> ChildEntry {
        let subgraph = graph.subgraph(self.content);
        let (environment, safe_area) = (self.environment, self.safe_area);
        let layout = graph.with_subgraph(subgraph, |graph| {
            let node = graph.input(body);
            graph.rule(ChildLayoutRule {
                node,
                environment,
                safe_area,
            })
        });
        self.next_identity += 1;
        ChildEntry {
            canonical,
            elements,
            index,
            subgraph: ListSubgraph::new(subgraph, self.queue.clone()),
            layout,
            identity: DisplayIdentity(self.next_identity),
        }
    }
}

impl Rule for RootLayoutRule {
    type Value = RootLayout;

    fn update(&mut self, ctx: &mut RuleContext<'_>) -> RootLayout {
        let list = ctx.value(self.list);
        let phase = ctx.value(self.phase);
        let environment = ctx.value(self.environment);
        let context = LayoutContext {
            direction: environment.layout_direction,
            safe_area: ctx.value(self.safe_area),
        };

        let mut old: Vec<Option<ChildEntry>> = core::mem::take(&mut self.entries)
            .into_iter()
            .map(Some)
            .collect();
        let mut stats = ReuseStats::default();
        if phase != self.seen_phase {
            // A new phase resets every element's identity.
            for entry in old.drain(..).flatten() {
                self.release(ctx.graph(), &entry);
                stats.removed += 1;
            }
            self.seen_phase = phase;
        }

        let mut by_id: HashMap<CanonicalId, Vec<usize>> = HashMap::new();
        for (slot, entry) in old.iter().enumerate() {
            if let Some(entry) = entry {
                by_id.entry(entry.canonical.clone()).or_default().push(slot);
            }
        }

        let mut entries = Vec::new();
        for element in materialize(&*list.0) {
            let canonical = element.id.canonical();
            let reusable = by_id.get_mut(&canonical).and_then(|slots| {
                let position = slots.iter().position(|&slot| {
                    old[slot].as_ref().is_some_and(|entry| {
                        element.elements.try_to_reuse_element(
                            element.index,
                            &*entry.elements,
                            entry.index,
                        )
                    })
                })?;
                old[slots.remove(position)].take()
            });
            let entry = match reusable {
                Some(mut entry) => {
                    stats.reused += 1;
                    entry.elements = element.elements;
                    entry.index = element.index;
                    entry
                }
                None => {
                    stats.created += 1;
                    let graph = ctx.graph();
                    self.create(graph, canonical, element.elements, element.index, element.body)
                }
            };
            entries.push(entry);
        }
        for entry in old.into_iter().flatten() {
            self.release(ctx.graph(), &entry);
            stats.removed += 1;
        }
        self.stats.set(stats);

        let children = entries.iter().map(|entry| ctx.value(entry.layout)).collect();
        let identities = entries.iter().map(|entry| entry.identity).collect();
        self.entries = entries;
        RootLayout {
            layout: ViewLayout::overlay(children, &context),
            identities,
        }
    }
}

/// Draws the root layout into a versioned display list.
#[derive(Debug)]
struct DisplayRule {
    root: Attribute<RootLayout>,
    size: Attribute<Size>,
    environment: Attribute<Environment>,
    previous: Option<DisplayList>,
    version: u64,
}

impl Rule for DisplayRule {
    type Value = DisplayList;

    fn update(&mut self, ctx: &mut RuleContext<'_>) -> DisplayList {
        let root = ctx.value(self.root);
        let size = ctx.value(self.size);
        let environment = ctx.value(self.environment);

        let frame = Rect::from_origin_size(Point::ORIGIN, size);
        let mut builder = DisplayListBuilder::new();
        let layout = root.layout();
        for ((child, child_frame), identity) in layout
            .children()
            .iter()
            .zip(layout.child_frames(frame))
            .zip(root.identities().iter())
        {
            child.render_offset(child_frame, &environment, *identity, &mut builder);
        }
        let mut list = builder.finish();
        self.version += 1;
        list.assign_versions(self.previous.as_ref(), DisplayVersion(self.version));
        self.previous = Some(list.clone());
        list
    }
}

/// The graph behind one hosted view tree.
pub struct ViewGraph {
    graph: Graph,
    config: ViewGraphConfig,
    root_view: Attribute<ViewNode>,
    environment: Attribute<Environment>,
    size: Attribute<Size>,
    safe_area: Attribute<EdgeInsets>,
    phase: Attribute<u32>,
    list: Attribute<ListValue>,
    root_layout: Attribute<RootLayout>,
    display_list: Attribute<DisplayList>,
    release_queue: ReleaseQueue,
    reuse_stats: Rc<Cell<ReuseStats>>,
    requested_outputs: Outputs,
    removed_state: RemovedState,
    needs_update: bool,
    may_defer_update: bool,
    next_update: NextUpdate,
    last_update: Option<Time>,
}

impl core::fmt::Debug for ViewGraph {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ViewGraph")
            .field("phase", &self.phase())
            .field("requested_outputs", &self.requested_outputs)
            .field("removed_state", &self.removed_state)
            .field("needs_update", &self.needs_update)
            .field("may_defer_update", &self.may_defer_update)
            .field("next_update", &self.next_update)
            .finish_non_exhaustive()
    }
}

impl ViewGraph {
    /// Creates a graph showing `root`.
    #[must_use]
    pub fn new(root: ViewNode, config: ViewGraphConfig) -> Self {
        let mut graph = Graph::new();
        let root_view = graph.input(root);
        let environment = graph.input(Environment::default());
        let size = graph.input(Size::ZERO);
        let safe_area = graph.input(EdgeInsets::ZERO);
        let phase = graph.input(0_u32);
        let list = graph.rule(ListAttribute::new(root_view, ListInputs::default()));

        let release_queue = ReleaseQueue::new();
        let reuse_stats = Rc::new(Cell::new(ReuseStats::default()));
        let content = graph.subgraph(graph.root_subgraph());
        let root_layout = graph.rule(RootLayoutRule {
            list,
            phase,
            environment,
            safe_area,
            content,
            queue: release_queue.clone(),
            entries: Vec::new(),
            seen_phase: 0,
            next_identity: 0,
            stats: reuse_stats.clone(),
        });
        let display_list = graph.rule(DisplayRule {
            root: root_layout,
            size,
            environment,
            previous: None,
            version: 0,
        });

        Self {
            graph,
            config,
            root_view,
            environment,
            size,
            safe_area,
            phase,
            list,
            root_layout,
            display_list,
            release_queue,
            reuse_stats,
            requested_outputs: Outputs::default(),
            removed_state: RemovedState::empty(),
            needs_update: true,
            may_defer_update: true,
            next_update: NextUpdate::default(),
            last_update: None,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ViewGraphConfig {
        &self.config
    }

    // -- Inputs --

    /// Replaces the root view. Returns whether it changed.
    pub fn set_root_view(&mut self, view: ViewNode) -> bool {
        self.graph.set(self.root_view, view)
    }

    /// Replaces the environment. Returns whether it changed.
    pub fn set_environment(&mut self, environment: Environment) -> bool {
        self.graph.set(self.environment, environment)
    }

    /// Sets the size offered to the root. Returns whether it changed.
    pub fn set_size(&mut self, size: Size) -> bool {
        self.graph.set(self.size, size)
    }

    /// Sets the safe-area insets. Returns whether they changed.
    pub fn set_safe_area_insets(&mut self, insets: EdgeInsets) -> bool {
        self.graph.set(self.safe_area, insets)
    }

    /// Starts a new phase: on the next update every element is rebuilt
    /// with a fresh identity, even where it could have been reused.
    pub fn invalidate(&mut self) {
        let next = self.phase().wrapping_add(1);
        self.graph.set(self.phase, next);
        self.set_needs_update(false);
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> u32 {
        self.graph.cached(self.phase).unwrap_or_default()
    }

    /// Returns the current environment.
    #[must_use]
    pub fn environment(&self) -> Environment {
        self.graph.cached(self.environment).unwrap_or_default()
    }

    /// Returns the size offered to the root.
    #[must_use]
    pub fn size(&self) -> Size {
        self.graph.cached(self.size).unwrap_or(Size::ZERO)
    }

    // -- Update state --

    /// Records that outputs must be recomputed.
    ///
    /// The update may run off the controlling thread only if every caller
    /// since the last update allowed it.
    pub fn set_needs_update(&mut self, may_defer: bool) {
        self.needs_update = true;
        self.may_defer_update &= may_defer;
    }

    /// Returns whether outputs must be recomputed.
    #[must_use]
    pub fn needs_update(&self) -> bool {
        self.needs_update || self.outputs_stale()
    }

    /// Returns whether the pending update may run off the controlling thread.
    #[must_use]
    pub fn may_defer_update(&self) -> bool {
        self.may_defer_update
    }

    /// Returns the outputs kept up to date.
    #[must_use]
    pub fn requested_outputs(&self) -> Outputs {
        self.requested_outputs
    }

    /// Sets the outputs kept up to date.
    pub fn set_requested_outputs(&mut self, outputs: Outputs) {
        self.requested_outputs = outputs;
    }

    /// Returns why the host is hidden, if it is.
    #[must_use]
    pub fn removed_state(&self) -> RemovedState {
        self.removed_state
    }

    /// Sets why the host is hidden.
    pub fn set_removed_state(&mut self, state: RemovedState) {
        self.removed_state = state;
    }

    /// Returns whether updates should be rendered now rather than held
    /// until the host is shown again.
    #[must_use]
    pub fn updates_at_full_fidelity(&self) -> bool {
        self.removed_state.is_empty()
    }

    /// Asks for an update no later than `time`.
    pub fn request_update_at(&mut self, time: Time, reason: u32) {
        self.next_update.at(time, reason);
    }

    /// Asks for updates at least every `interval` seconds.
    pub fn request_updates_every(&mut self, interval: f64, reason: u32) {
        self.next_update.every(interval, reason);
    }

    /// Returns the time of the most recent update.
    #[must_use]
    pub fn last_update(&self) -> Option<Time> {
        self.last_update
    }

    fn outputs_stale(&self) -> bool {
        let mut stale = false;
        if self
            .requested_outputs
            .intersects(Outputs::LAYOUT | Outputs::DISPLAY_LIST)
        {
            stale |= self.graph.is_stale(self.root_layout);
        }
        if self.requested_outputs.contains(Outputs::DISPLAY_LIST) {
            stale |= self.graph.is_stale(self.display_list);
        }
        stale
    }

    /// Brings the requested outputs up to date for time `at`.
    ///
    /// Runs at most [`ViewGraphConfig::max_update_passes`] passes, then
    /// tears down the subgraphs of elements that went away.
    pub fn update_outputs(&mut self, at: Time) -> UpdateOutcome {
        let mut passes = 0;
        while passes < self.config.max_update_passes && self.outputs_stale() {
            passes += 1;
            if self
                .requested_outputs
                .intersects(Outputs::LAYOUT | Outputs::DISPLAY_LIST)
            {
                self.graph.value(self.root_layout);
            }
            if self.requested_outputs.contains(Outputs::DISPLAY_LIST) {
                self.graph.value(self.display_list);
            }
        }
        let released = self.release_queue.flush(&mut self.graph);

        self.needs_update = false;
        self.may_defer_update = true;
        self.last_update = Some(at);
        UpdateOutcome {
            passes,
            released,
            next_update: self.next_update.take(),
        }
    }

    // -- Outputs --

    /// Returns the display list from the most recent update.
    #[must_use]
    pub fn display_list(&self) -> DisplayList {
        self.graph.cached(self.display_list).unwrap_or_default()
    }

    /// Returns the root layout from the most recent update.
    #[must_use]
    pub fn root_layout(&self) -> Option<RootLayout> {
        self.graph.cached(self.root_layout)
    }

    /// Returns the frame of each top-level element from the most recent
    /// update.
    #[must_use]
    pub fn child_frames(&self) -> Vec<Rect> {
        self.root_layout().map_or_else(Vec::new, |root| {
            root.layout()
                .child_frames(Rect::from_origin_size(Point::ORIGIN, self.size()))
        })
    }

    /// Returns the number of top-level elements in the current list.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.graph
            .cached(self.list)
            .map_or(0, |list| list.count(IteratorStyle::PLAIN))
    }

    /// Returns the element counts from the most recent list rebuild.
    #[must_use]
    pub fn reuse_stats(&self) -> ReuseStats {
        self.reuse_stats.get()
    }

    /// Returns the underlying graph, for inspection.
    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display_list::DisplayContent;
    use crate::geometry::{Alignment, LayoutDirection};
    use crate::layout::{AnyUnaryLayout, FrameLayout};
    use crate::shape_style::{Color, ForegroundStyle, ShapeStyleExt};
    use crate::view_list::ExplicitId;
    use alloc::vec;

    fn swatch(color: Color) -> ViewNode {
        ViewNode::fill(color.erased(), Size::new(10.0, 10.0))
    }

    fn framed(color: Color) -> ViewNode {
        swatch(color).modified(AnyUnaryLayout::new(FrameLayout::new(
            Some(10.0),
            Some(10.0),
            Alignment::TOP_LEADING,
        )))
    }

    fn items(ids: &[(i64, Color)]) -> ViewNode {
        ViewNode::ForEach {
            items: ids
                .iter()
                .map(|(id, color)| (ExplicitId::from(*id), swatch(*color)))
                .collect(),
        }
    }

    fn make_graph(root: ViewNode) -> ViewGraph {
        let mut graph = ViewGraph::new(root, ViewGraphConfig::default());
        graph.set_size(Size::new(100.0, 50.0));
        graph
    }

    fn update(graph: &mut ViewGraph) -> UpdateOutcome {
        graph.update_outputs(Time::ZERO)
    }

    #[test]
    fn first_update_draws_every_element() {
        let mut graph = make_graph(items(&[(1, Color::RED), (2, Color::BLUE)]));
        assert!(graph.needs_update(), "new graphs start dirty");
        let outcome = update(&mut graph);
        assert_eq!(outcome.passes, 1);
        assert!(!graph.needs_update(), "update clears the dirty state");
        assert_eq!(graph.element_count(), 2);
        assert_eq!(graph.display_list().items.len(), 2);
        assert_eq!(
            graph.reuse_stats(),
            ReuseStats {
                reused: 0,
                created: 2,
                removed: 0
            }
        );
    }

    #[test]
    fn elements_are_centered_in_the_root() {
        let mut graph = make_graph(framed(Color::RED));
        update(&mut graph);
        assert_eq!(graph.child_frames(), vec![Rect::new(45.0, 20.0, 55.0, 30.0)]);
        graph.set_root_view(swatch(Color::RED));
        update(&mut graph);
        assert_eq!(
            graph.child_frames(),
            vec![Rect::new(0.0, 0.0, 100.0, 50.0)],
            "fills take all offered space"
        );
    }

    #[test]
    fn idle_update_runs_no_pass() {
        let mut graph = make_graph(swatch(Color::RED));
        update(&mut graph);
        let runs = graph.graph().stats().rule_runs;
        let outcome = update(&mut graph);
        assert_eq!(outcome.passes, 0);
        assert_eq!(graph.graph().stats().rule_runs, runs, "nothing re-ran");
    }

    #[test]
    fn reordering_reuses_elements_and_identities() {
        let mut graph = make_graph(items(&[(1, Color::RED), (2, Color::BLUE)]));
        update(&mut graph);
        let before = graph.root_layout().map(|r| r.identities().to_vec());

        graph.set_root_view(items(&[(2, Color::BLUE), (1, Color::RED)]));
        let outcome = update(&mut graph);
        assert_eq!(
            graph.reuse_stats(),
            ReuseStats {
                reused: 2,
                created: 0,
                removed: 0
            }
        );
        assert_eq!(outcome.released, 0);
        let after = graph.root_layout().map(|r| r.identities().to_vec());
        let (Some(before), Some(after)) = (before, after) else {
            panic!("layout was computed");
        };
        assert_eq!(before[0], after[1]);
        assert_eq!(before[1], after[0]);
    }

    #[test]
    fn removed_elements_release_their_subgraphs() {
        let mut graph = make_graph(items(&[(1, Color::RED), (2, Color::BLUE)]));
        update(&mut graph);
        let attributes = graph.graph().attribute_count();

        graph.set_root_view(items(&[(1, Color::RED)]));
        let outcome = update(&mut graph);
        assert_eq!(graph.reuse_stats().removed, 1);
        assert_eq!(outcome.released, 1);
        assert!(graph.graph().attribute_count() < attributes, "subgraph torn down");
    }

    #[test]
    fn changed_bodies_are_rebuilt() {
        let mut graph = make_graph(items(&[(1, Color::RED)]));
        update(&mut graph);
        graph.set_root_view(items(&[(1, Color::GREEN)]));
        update(&mut graph);
        assert_eq!(
            graph.reuse_stats(),
            ReuseStats {
                reused: 0,
                created: 1,
                removed: 1
            }
        );
    }

    #[test]
    fn invalidate_starts_a_new_phase() {
        let mut graph = make_graph(items(&[(1, Color::RED)]));
        update(&mut graph);
        let phase = graph.phase();
        graph.invalidate();
        assert_eq!(graph.phase(), phase + 1);
        assert!(graph.needs_update(), "invalidation requests an update");
        assert!(!graph.may_defer_update(), "phase resets run on the controlling thread");
        update(&mut graph);
        assert_eq!(graph.reuse_stats().reused, 0, "no reuse across phases");
        assert_eq!(graph.reuse_stats().created, 1);
    }

    #[test]
    fn size_change_keeps_unchanged_item_versions() {
        let mut graph = make_graph(framed(Color::RED));
        update(&mut graph);
        let first = graph.display_list();

        graph.set_size(Size::new(200.0, 50.0));
        update(&mut graph);
        let second = graph.display_list();
        let (DisplayContent::Offset(_, a), DisplayContent::Offset(_, b)) =
            (&first.items[0].content, &second.items[0].content)
        else {
            panic!("top-level items are offsets");
        };
        assert_eq!(a.items[0].version, b.items[0].version, "moved, not redrawn");
        assert_ne!(first.items[0].version, second.items[0].version);
    }

    #[test]
    fn environment_flows_into_fills() {
        let mut graph = make_graph(ViewNode::fill(ForegroundStyle.erased(), Size::new(10.0, 10.0)));
        graph.set_environment(Environment {
            foreground_style: Some(Color::GREEN.erased()),
            layout_direction: LayoutDirection::RightToLeft,
            ..Environment::default()
        });
        update(&mut graph);
        let mut colors = Vec::new();
        graph.display_list().visit(&mut |item, _, _| {
            if let DisplayContent::Fill(style) = &item.content {
                colors.push(style.color());
            }
        });
        assert_eq!(colors, vec![Some(Color::GREEN)]);
    }

    #[test]
    fn may_defer_is_and_accumulated() {
        let mut graph = make_graph(ViewNode::Empty);
        update(&mut graph);
        graph.set_needs_update(true);
        assert!(graph.may_defer_update());
        graph.set_needs_update(false);
        graph.set_needs_update(true);
        assert!(!graph.may_defer_update(), "one refusal sticks until the update");
        update(&mut graph);
        assert!(graph.may_defer_update());
    }

    #[test]
    fn next_update_takes_the_earliest_request() {
        let mut graph = make_graph(ViewNode::Empty);
        graph.request_update_at(Time(2.0), 1);
        graph.request_update_at(Time(1.0), 2);
        graph.request_updates_every(0.5, 4);
        let outcome = update(&mut graph);
        assert_eq!(outcome.next_update.time, Time(1.0));
        assert_eq!(outcome.next_update.interval, 0.5);
        assert_eq!(outcome.next_update.reasons, 7);
        assert!(update(&mut graph).next_update.is_empty(), "requests are consumed");
    }

    #[test]
    fn removed_state_controls_fidelity() {
        let mut graph = make_graph(ViewNode::Empty);
        assert!(graph.updates_at_full_fidelity());
        graph.set_removed_state(RemovedState::HIDDEN_FOR_REUSE);
        assert!(!graph.updates_at_full_fidelity());
    }
}
