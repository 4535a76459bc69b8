// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Building lists from views.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;
use core::ops::Deref;

use bitflags::bitflags;
use tessera_graph::{Attribute, Rule, RuleContext};

use super::{
    BaseInputs, BaseViewList, Elements, EmptyElements, EmptyViewList, Group, MergedElements,
    UnaryElements, ViewList, ViewTraits,
};
use crate::view::ViewNode;

bitflags! {
    /// Options that change how views contribute to a list.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ListOptions: u16 {
        /// Elements may animate in and out.
        const CAN_TRANSITION = 1 << 0;
        /// Overrides `CAN_TRANSITION`.
        const DISABLE_TRANSITIONS = 1 << 1;
        /// Sections expose only their header, with content nested below it.
        const SECTIONS_ARE_HIERARCHICAL = 1 << 2;
    }
}

/// Inputs for building a list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListInputs {
    /// Implicit scope ID handed to the next list built.
    pub implicit_id: i32,
    /// Build options.
    pub options: ListOptions,
    /// Display-list identity scope, when the parent tracks one.
    pub stable_id_scope: Option<u32>,
    /// Traits attached by modifiers above the list.
    pub traits: Option<ViewTraits>,
    /// Inputs shared by every element.
    pub base: BaseInputs,
}

impl ListInputs {
    /// Returns whether elements may animate in and out.
    #[must_use]
    pub fn can_transition(&self) -> bool {
        self.options.contains(ListOptions::CAN_TRANSITION)
            && !self.options.contains(ListOptions::DISABLE_TRANSITIONS)
    }

    fn list_traits(&self) -> ViewTraits {
        let mut traits = self.traits.clone().unwrap_or_default();
        if self.can_transition() {
            traits.can_transition = true;
        }
        if self.stable_id_scope.is_some() {
            traits.stable_id_scope = self.stable_id_scope;
        }
        traits
    }

    fn needs_dynamic_list(&self) -> bool {
        self.stable_id_scope.is_some() || self.traits.is_some() || self.can_transition()
    }
}

/// Whether a built list kept its generators inline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListKind {
    /// Generators known at build time, with no identity scope, traits, or
    /// transitions to carry.
    Static,
    /// A list value that carries identity, traits, or transitions.
    Dynamic,
}

/// The two shapes of a built list.
#[derive(Clone, Debug)]
pub enum ListViews {
    /// Inline generators.
    Static(Rc<dyn Elements>),
    /// A list value.
    Dynamic(Rc<dyn ViewList>),
}

/// What building a view's list produced.
#[derive(Clone, Debug)]
pub struct ViewListOutputs {
    /// The built list.
    pub views: ListViews,
    /// The implicit scope of a static list.
    pub implicit_id: i32,
    /// Implicit scope ID for the next sibling.
    pub next_implicit_id: i32,
    /// Element count, when known without building the list.
    pub static_count: Option<usize>,
}

impl ViewListOutputs {
    /// Wraps `elements`, promoting them to a list value when the inputs
    /// carry identity, traits, or transitions.
    #[must_use]
    pub fn static_list(
        elements: Rc<dyn Elements>,
        inputs: &ListInputs,
        static_count: usize,
    ) -> Self {
        let views = if inputs.needs_dynamic_list() {
            ListViews::Dynamic(Rc::new(BaseViewList::new(
                elements,
                inputs.implicit_id,
                inputs.list_traits(),
            )))
        } else {
            ListViews::Static(elements)
        };
        Self {
            views,
            implicit_id: inputs.implicit_id,
            next_implicit_id: inputs
                .implicit_id
                .wrapping_add(static_count.try_into().unwrap_or(i32::MAX)),
            static_count: Some(static_count),
        }
    }

    /// A list with the single element `body`.
    #[must_use]
    pub fn unary(body: ViewNode, inputs: &ListInputs) -> Self {
        Self::static_list(
            Rc::new(UnaryElements::new(body, inputs.base.clone())),
            inputs,
            1,
        )
    }

    /// A list with no elements.
    #[must_use]
    pub fn empty(inputs: &ListInputs) -> Self {
        Self::static_list(Rc::new(EmptyElements), inputs, 0)
    }

    /// A list value built elsewhere.
    #[must_use]
    pub fn dynamic(list: Rc<dyn ViewList>, inputs: &ListInputs) -> Self {
        Self {
            views: ListViews::Dynamic(list),
            implicit_id: inputs.implicit_id,
            next_implicit_id: inputs.implicit_id.wrapping_add(1),
            static_count: None,
        }
    }

    /// Returns which shape was built.
    #[must_use]
    pub fn kind(&self) -> ListKind {
        match self.views {
            ListViews::Static(_) => ListKind::Static,
            ListViews::Dynamic(_) => ListKind::Dynamic,
        }
    }

    /// Turns the outputs into a list value.
    #[must_use]
    pub fn into_list(self, inputs: &ListInputs) -> Rc<dyn ViewList> {
        match self.views {
            ListViews::Static(elements) => Rc::new(BaseViewList::new(
                elements,
                self.implicit_id,
                inputs.list_traits(),
            )),
            ListViews::Dynamic(list) => list,
        }
    }

    /// Concatenates sibling outputs.
    ///
    /// Runs of static outputs are merged into one generator. When every
    /// output is static the result stays static; otherwise each static run
    /// becomes a list value in its own implicit scope and the result is the
    /// group of all list values.
    #[must_use]
    pub fn concat(mut outputs: Vec<Self>, inputs: &ListInputs) -> Self {
        if outputs.is_empty() {
            return Self::empty(inputs);
        }
        let mut static_count = Some(0_usize);
        for output in &outputs {
            static_count = static_count.zip(output.static_count).map(|(a, b)| a + b);
        }
        if outputs.iter().all(|o| o.kind() == ListKind::Static) {
            let next_implicit_id = outputs
                .last()
                .map_or(inputs.implicit_id, |o| o.next_implicit_id);
            if outputs.len() == 1 {
                return outputs.remove(0);
            }
            return Self {
                views: ListViews::Static(Rc::new(MergedElements::new(static_elements(&outputs)))),
                implicit_id: outputs[0].implicit_id,
                next_implicit_id,
                static_count,
            };
        }

        let mut implicit_id = inputs.implicit_id;
        let mut lists: Vec<Rc<dyn ViewList>> = Vec::new();
        let mut run: Vec<Self> = Vec::new();
        for output in outputs {
            match output.views {
                ListViews::Static(_) => run.push(output),
                ListViews::Dynamic(list) => {
                    if !run.is_empty() {
                        let statics = core::mem::take(&mut run);
                        lists.push(merge_static(&statics, &mut implicit_id, inputs));
                    }
                    lists.push(list);
                }
            }
        }
        if !run.is_empty() {
            lists.push(merge_static(&run, &mut implicit_id, inputs));
        }

        let list: Rc<dyn ViewList> = match lists.len() {
            0 => Rc::new(EmptyViewList),
            1 => lists.remove(0),
            _ => Rc::new(Group::new(lists)),
        };
        Self {
            views: ListViews::Dynamic(list),
            implicit_id: inputs.implicit_id,
            next_implicit_id: implicit_id,
            static_count,
        }
    }
}

fn static_elements(outputs: &[ViewListOutputs]) -> Vec<Rc<dyn Elements>> {
    outputs
        .iter()
        .filter_map(|o| match &o.views {
            ListViews::Static(elements) => Some(elements.clone()),
            ListViews::Dynamic(_) => None,
        })
        .collect()
}

fn merge_static(
    run: &[ViewListOutputs],
    implicit_id: &mut i32,
    inputs: &ListInputs,
) -> Rc<dyn ViewList> {
    let mut parts = static_elements(run);
    let elements: Rc<dyn Elements> = match parts.len() {
        0 => Rc::new(EmptyElements),
        1 => parts.remove(0),
        _ => Rc::new(MergedElements::new(parts)),
    };
    let list = Rc::new(BaseViewList::new(elements, *implicit_id, inputs.list_traits()));
    *implicit_id = implicit_id.wrapping_add(1);
    list
}

/// A list held in a graph attribute.
///
/// Lists are rebuilt rather than edited, so two values are equal only when
/// they are the same build.
#[derive(Clone)]
pub struct ListValue(pub Rc<dyn ViewList>);

impl PartialEq for ListValue {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for ListValue {
    type Target = dyn ViewList;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl fmt::Debug for ListValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

/// Builds the list of a view's children inside the graph.
#[derive(Debug)]
pub struct ListAttribute {
    view: Attribute<ViewNode>,
    inputs: ListInputs,
}

impl ListAttribute {
    /// Builds the list for the view held in `view`.
    #[must_use]
    pub fn new(view: Attribute<ViewNode>, inputs: ListInputs) -> Self {
        Self { view, inputs }
    }
}

impl Rule for ListAttribute {
    type Value = ListValue;

    const ASYNC: bool = true;

    fn update(&mut self, ctx: &mut RuleContext<'_>) -> ListValue {
        let view = ctx.value(self.view);
        ListValue(view.make_view_list(&self.inputs).into_list(&self.inputs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view_list::{ExplicitId, IteratorStyle, sublists};
    use alloc::vec;
    use tessera_graph::Graph;

    fn unary(implicit_id: i32) -> ViewListOutputs {
        let inputs = ListInputs {
            implicit_id,
            ..ListInputs::default()
        };
        ViewListOutputs::unary(ViewNode::Empty, &inputs)
    }

    #[test]
    fn plain_inputs_stay_static() {
        let out = unary(0);
        assert_eq!(out.kind(), ListKind::Static);
        assert_eq!(out.next_implicit_id, 1);
    }

    #[test]
    fn identity_scope_or_transitions_make_dynamic() {
        let inputs = ListInputs {
            stable_id_scope: Some(3),
            ..ListInputs::default()
        };
        assert_eq!(ViewListOutputs::empty(&inputs).kind(), ListKind::Dynamic);

        let inputs = ListInputs {
            options: ListOptions::CAN_TRANSITION,
            ..ListInputs::default()
        };
        let out = ViewListOutputs::unary(ViewNode::Empty, &inputs);
        assert_eq!(out.kind(), ListKind::Dynamic);
        let list = out.into_list(&inputs);
        assert!(list.traits().can_transition);

        let inputs = ListInputs {
            options: ListOptions::CAN_TRANSITION | ListOptions::DISABLE_TRANSITIONS,
            ..ListInputs::default()
        };
        assert_eq!(ViewListOutputs::empty(&inputs).kind(), ListKind::Static);
    }

    #[test]
    fn concat_of_statics_merges() {
        let inputs = ListInputs::default();
        let out = ViewListOutputs::concat(vec![unary(0), unary(1), unary(2)], &inputs);
        assert_eq!(out.kind(), ListKind::Static);
        assert_eq!(out.static_count, Some(3));
        assert_eq!(out.next_implicit_id, 3);
        let list = out.into_list(&inputs);
        assert_eq!(sublists(&*list, IteratorStyle::PLAIN).len(), 1);
    }

    #[test]
    fn concat_with_dynamic_groups_static_runs() {
        let inputs = ListInputs {
            implicit_id: 10,
            ..ListInputs::default()
        };
        let tagged = ViewListOutputs::dynamic(
            Rc::new(crate::view_list::BindIdList::new(
                unary(0).into_list(&inputs),
                ExplicitId::from("t"),
                None,
                0,
            )),
            &inputs,
        );
        let out = ViewListOutputs::concat(vec![unary(0), unary(1), tagged, unary(2)], &inputs);
        assert_eq!(out.kind(), ListKind::Dynamic);
        assert_eq!(out.static_count, None);
        let list = out.into_list(&inputs);
        assert_eq!(list.count(IteratorStyle::PLAIN), 4);
        let runs = sublists(&*list, IteratorStyle::PLAIN);
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[0].id.implicit_id(), 10);
        assert_eq!(runs[2].id.implicit_id(), 11);
    }

    #[test]
    fn empty_concat_is_empty() {
        let out = ViewListOutputs::concat(Vec::new(), &ListInputs::default());
        assert_eq!(out.static_count, Some(0));
        assert!(out.into_list(&ListInputs::default()).is_empty());
    }

    #[test]
    fn list_attribute_rebuilds_when_view_changes() {
        let mut graph = Graph::new();
        let view = graph.input(ViewNode::group(vec![ViewNode::Empty, ViewNode::Empty]));
        let list = graph.rule(ListAttribute::new(view, ListInputs::default()));
        assert_eq!(graph.value(list).count(IteratorStyle::PLAIN), 0);

        let leaf = ViewNode::Modified {
            layout: crate::layout::AnyUnaryLayout::new(crate::layout::FixedSizeLayout::default()),
            child: Rc::new(ViewNode::Empty),
        };
        graph.set(view, ViewNode::group(vec![leaf.clone(), leaf]));
        assert_eq!(graph.value(list).count(IteratorStyle::PLAIN), 2);
    }
}
