// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small view vocabulary driving lists, layout, and drawing.
//!
//! [`ViewNode`] is the value stored in the root-view attribute. It knows how
//! to contribute to a [`ViewList`] ([`ViewNode::make_view_list`]) and how to
//! become a [`ViewLayout`], a tree of [`LayoutComputer`]s that can be
//! rendered into a [`DisplayList`](crate::display_list::DisplayList).

use alloc::rc::Rc;
use alloc::vec::Vec;

use kurbo::{Rect, Size, Vec2};

use crate::display_list::{DisplayContent, DisplayIdentity, DisplayListBuilder};
use crate::environment::Environment;
use crate::geometry::{Alignment, EdgeInsets, LayoutDirection, ProposedSize};
use crate::layout::{
    AnyLayout, AnyUnaryLayout, LayoutComputer, LayoutEngine, LayoutProxy, ZStack, proxies_for,
};
use crate::shape_style::{AnyShapeStyle, Name, copy_style, resolve};
use crate::view_list::{
    BindIdList, Elements, ExplicitId, IteratorStyle, ListInputs, ListOptions, Section,
    SublistTransform, ViewList, ViewListId, ViewListOutputs,
};

/// A view description.
///
/// Children are shared, so cloning a tree is cheap and comparing two clones
/// is mostly pointer checks.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ViewNode {
    /// Draws nothing and takes no space.
    #[default]
    Empty,
    /// Fills whatever space it is offered with a style.
    Fill {
        /// Paint.
        style: AnyShapeStyle,
        /// Size used for unspecified proposal dimensions.
        ideal: Size,
    },
    /// Lays out its children with a container layout.
    Container {
        /// The container algorithm.
        layout: AnyLayout,
        /// Child views, expanded into a list before layout.
        children: Rc<[ViewNode]>,
    },
    /// Wraps one child in a single-child layout.
    Modified {
        /// The modifier.
        layout: AnyUnaryLayout,
        /// The wrapped view.
        child: Rc<ViewNode>,
    },
    /// Sets the foreground style below it.
    Foreground {
        /// The new foreground.
        style: AnyShapeStyle,
        /// The wrapped view.
        child: Rc<ViewNode>,
    },
    /// Fades its child.
    Opacity {
        /// Opacity multiplier.
        opacity: f32,
        /// The wrapped view.
        child: Rc<ViewNode>,
    },
    /// Gives its child an explicit identity.
    Tagged {
        /// The identity.
        id: ExplicitId,
        /// The wrapped view.
        child: Rc<ViewNode>,
    },
    /// Contributes each child as a sibling.
    Group(Rc<[ViewNode]>),
    /// Contributes one identified child per item.
    ForEach {
        /// Items with their identities.
        items: Rc<[(ExplicitId, ViewNode)]>,
    },
    /// A header, content, and footer.
    Section {
        /// Header view.
        header: Rc<ViewNode>,
        /// Content view.
        content: Rc<ViewNode>,
        /// Footer view.
        footer: Rc<ViewNode>,
    },
}

impl ViewNode {
    /// A fill with the given ideal size.
    #[must_use]
    pub fn fill(style: AnyShapeStyle, ideal: Size) -> Self {
        Self::Fill { style, ideal }
    }

    /// Siblings contributed as one view.
    #[must_use]
    pub fn group(children: Vec<Self>) -> Self {
        Self::Group(children.into())
    }

    /// A container laying out `children`.
    #[must_use]
    pub fn container(layout: AnyLayout, children: Vec<Self>) -> Self {
        Self::Container {
            layout,
            children: children.into(),
        }
    }

    /// Wraps `self` in a single-child layout.
    #[must_use]
    pub fn modified(self, layout: AnyUnaryLayout) -> Self {
        Self::Modified {
            layout,
            child: Rc::new(self),
        }
    }

    /// Sets the foreground style of `self`.
    #[must_use]
    pub fn foreground(self, style: AnyShapeStyle) -> Self {
        Self::Foreground {
            style,
            child: Rc::new(self),
        }
    }

    /// Fades `self`.
    #[must_use]
    pub fn opacity(self, opacity: f32) -> Self {
        Self::Opacity {
            opacity,
            child: Rc::new(self),
        }
    }

    /// Gives `self` an explicit identity.
    #[must_use]
    pub fn tagged(self, id: impl Into<ExplicitId>) -> Self {
        Self::Tagged {
            id: id.into(),
            child: Rc::new(self),
        }
    }

    /// Returns whether this view may contribute other than one element.
    #[must_use]
    pub fn is_multi(&self) -> bool {
        match self {
            Self::Group(_) | Self::ForEach { .. } | Self::Section { .. } => true,
            Self::Tagged { child, .. }
            | Self::Modified { child, .. }
            | Self::Foreground { child, .. }
            | Self::Opacity { child, .. } => child.is_multi(),
            Self::Empty | Self::Fill { .. } | Self::Container { .. } => false,
        }
    }

    /// Pushes `wrap` down to every element this view contributes.
    fn map_elements(&self, wrap: &dyn Fn(Rc<Self>) -> Self) -> Self {
        match self {
            Self::Empty => Self::Empty,
            Self::Group(children) => {
                Self::Group(children.iter().map(|c| c.map_elements(wrap)).collect())
            }
            Self::ForEach { items } => Self::ForEach {
                items: items
                    .iter()
                    .map(|(id, c)| (id.clone(), c.map_elements(wrap)))
                    .collect(),
            },
            Self::Section {
                header,
                content,
                footer,
            } => Self::Section {
                header: Rc::new(header.map_elements(wrap)),
                content: Rc::new(content.map_elements(wrap)),
                footer: Rc::new(footer.map_elements(wrap)),
            },
            Self::Tagged { id, child } if child.is_multi() => Self::Tagged {
                id: id.clone(),
                child: Rc::new(child.map_elements(wrap)),
            },
            Self::Modified { layout, child } if child.is_multi() => Self::Modified {
                layout: layout.clone(),
                child: Rc::new(child.map_elements(wrap)),
            },
            Self::Foreground { style, child } if child.is_multi() => Self::Foreground {
                style: style.clone(),
                child: Rc::new(child.map_elements(wrap)),
            },
            Self::Opacity { opacity, child } if child.is_multi() => Self::Opacity {
                opacity: *opacity,
                child: Rc::new(child.map_elements(wrap)),
            },
            other => wrap(Rc::new(other.clone())),
        }
    }

    /// Builds the list of elements this view contributes.
    #[must_use]
    pub fn make_view_list(&self, inputs: &ListInputs) -> ViewListOutputs {
        match self {
            Self::Empty => ViewListOutputs::empty(inputs),
            Self::Group(children) => make_children(children.iter(), inputs),
            Self::ForEach { items } => {
                let mut child_inputs = inputs.clone();
                let mut outputs = Vec::with_capacity(items.len());
                for (id, body) in items.iter() {
                    let output = bind_id(body, id, &child_inputs);
                    child_inputs.implicit_id = output.next_implicit_id;
                    outputs.push(output);
                }
                ViewListOutputs::concat(outputs, inputs)
            }
            Self::Tagged { id, child } => bind_id(child, id, inputs),
            Self::Section {
                header,
                content,
                footer,
            } => {
                let mut part_inputs = inputs.clone();
                let mut part = |view: &ViewNode| {
                    let output = view.make_view_list(&part_inputs);
                    let list = output.clone().into_list(&part_inputs);
                    part_inputs.implicit_id = output.next_implicit_id;
                    list
                };
                let (header, content, footer) = (part(header), part(content), part(footer));
                let section = Section::new(
                    inputs.implicit_id.cast_unsigned(),
                    header,
                    content,
                    footer,
                    inputs
                        .options
                        .contains(ListOptions::SECTIONS_ARE_HIERARCHICAL),
                );
                let mut output = ViewListOutputs::dynamic(Rc::new(section), inputs);
                output.next_implicit_id = part_inputs.implicit_id.max(output.next_implicit_id);
                output
            }
            Self::Modified { layout, child } if child.is_multi() => {
                let mut inner = inputs.clone();
                inner.base.body_stack.push(layout.clone());
                child.make_view_list(&inner)
            }
            Self::Foreground { style, child } if child.is_multi() => {
                let style = style.clone();
                child
                    .map_elements(&|element| Self::Foreground {
                        style: style.clone(),
                        child: element,
                    })
                    .make_view_list(inputs)
            }
            Self::Opacity { opacity, child } if child.is_multi() => {
                let opacity = *opacity;
                child
                    .map_elements(&|element| Self::Opacity {
                        opacity,
                        child: element,
                    })
                    .make_view_list(inputs)
            }
            _ => ViewListOutputs::unary(self.clone(), inputs),
        }
    }

    /// Builds the layout tree for this view.
    ///
    /// Views contributing several elements are overlaid like a
    /// [`ZStack`].
    #[must_use]
    pub fn layout(&self, context: &LayoutContext) -> ViewLayout {
        match self {
            Self::Empty => ViewLayout::leaf(LayoutComputer::new(EmptyEngine), LayoutContent::Empty),
            Self::Fill { style, ideal } => ViewLayout::leaf(
                LayoutComputer::new(FillEngine { ideal: *ideal }),
                LayoutContent::Fill(style.clone()),
            ),
            Self::Container { layout, children } => {
                let inputs = ListInputs::default();
                let list = make_children(children.iter(), &inputs).into_list(&inputs);
                let children = materialize(&*list)
                    .iter()
                    .map(|element| element.body.layout(context))
                    .collect();
                ViewLayout::container(layout, children, context)
            }
            Self::Modified { layout, child } => {
                let child = child.layout(context);
                let proxy = LayoutProxy::new(child.computer.clone(), 0, context.direction);
                ViewLayout {
                    computer: layout.computer(proxy, context.safe_area),
                    content: LayoutContent::Children,
                    children: Rc::new([child]),
                }
            }
            Self::Foreground { style, child } => ViewLayout::pass_through(
                child.layout(context),
                LayoutContent::Foreground(style.clone()),
            ),
            Self::Opacity { opacity, child } => {
                ViewLayout::pass_through(child.layout(context), LayoutContent::Opacity(*opacity))
            }
            Self::Tagged { child, .. } => child.layout(context),
            Self::Group(_) | Self::ForEach { .. } | Self::Section { .. } => {
                let inputs = ListInputs::default();
                let list = self.make_view_list(&inputs).into_list(&inputs);
                let children = materialize(&*list)
                    .iter()
                    .map(|element| element.body.layout(context))
                    .collect();
                ViewLayout::overlay(children, context)
            }
        }
    }
}

fn make_children<'a>(
    children: impl Iterator<Item = &'a ViewNode>,
    inputs: &ListInputs,
) -> ViewListOutputs {
    let mut child_inputs = inputs.clone();
    let mut outputs = Vec::new();
    for child in children {
        let output = child.make_view_list(&child_inputs);
        child_inputs.implicit_id = output.next_implicit_id;
        outputs.push(output);
    }
    let mut output = ViewListOutputs::concat(outputs, inputs);
    output.next_implicit_id = output.next_implicit_id.max(child_inputs.implicit_id);
    output
}

fn bind_id(body: &ViewNode, id: &ExplicitId, inputs: &ListInputs) -> ViewListOutputs {
    let inner = body.make_view_list(inputs);
    let next_implicit_id = inner.next_implicit_id;
    let list = inner.into_list(inputs);
    let bound = BindIdList::new(list, id.clone(), None, inputs.implicit_id);
    let mut output = ViewListOutputs::dynamic(Rc::new(bound), inputs);
    output.next_implicit_id = next_implicit_id.max(output.next_implicit_id);
    output
}

/// One materialized element of a list.
#[derive(Clone, Debug)]
pub struct ListElement {
    /// The element's identity.
    pub id: ViewListId,
    /// The generator that made it.
    pub elements: Rc<dyn Elements>,
    /// Index of the element within `elements`.
    pub index: usize,
    /// The element's view, with pending modifiers applied.
    pub body: ViewNode,
}

/// Materializes every element of `list`, in order.
#[must_use]
pub fn materialize(list: &dyn ViewList) -> Vec<ListElement> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut transform = SublistTransform::default();
    list.apply_sublists(&mut start, IteratorStyle::PLAIN, &mut transform, &mut |sublist| {
        let mut index = sublist.start;
        let mut skip = sublist.start;
        sublist.elements.make_elements(&mut skip, &mut |body| {
            if index >= sublist.count {
                return false;
            }
            out.push(ListElement {
                id: sublist.id.element_id(index),
                elements: sublist.elements.clone(),
                index,
                body,
            });
            index += 1;
            true
        });
        true
    });
    out
}

/// What layout needs from the surrounding view graph.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayoutContext {
    /// Direction for leading and trailing.
    pub direction: LayoutDirection,
    /// Safe-area insets handed to modifiers.
    pub safe_area: EdgeInsets,
}

/// What a [`ViewLayout`] node draws itself.
#[derive(Clone, Debug, PartialEq)]
pub enum LayoutContent {
    /// Nothing.
    Empty,
    /// A fill of its frame.
    Fill(AnyShapeStyle),
    /// Its only child, with a new foreground style.
    Foreground(AnyShapeStyle),
    /// Its only child, faded.
    Opacity(f32),
    /// Its children, at the frames its computer places them.
    Children,
}

/// A laid-out view: a computer per node, plus what each node draws.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewLayout {
    computer: LayoutComputer,
    content: LayoutContent,
    children: Rc<[ViewLayout]>,
}

impl ViewLayout {
    fn leaf(computer: LayoutComputer, content: LayoutContent) -> Self {
        Self {
            computer,
            content,
            children: Rc::new([]),
        }
    }

    fn pass_through(child: Self, content: LayoutContent) -> Self {
        Self {
            computer: child.computer.clone(),
            content,
            children: Rc::new([child]),
        }
    }

    fn container(layout: &AnyLayout, children: Vec<Self>, context: &LayoutContext) -> Self {
        let proxies = proxies_for(children.iter().map(|c| c.computer.clone()), context.direction);
        Self {
            computer: layout.computer(proxies),
            content: LayoutContent::Children,
            children: children.into(),
        }
    }

    /// Overlays `children` in a centered [`ZStack`].
    #[must_use]
    pub fn overlay(children: Vec<Self>, context: &LayoutContext) -> Self {
        let stack = AnyLayout::new(ZStack {
            alignment: Alignment::CENTER,
        });
        Self::container(&stack, children, context)
    }

    /// Returns the node's computer.
    #[must_use]
    pub fn computer(&self) -> &LayoutComputer {
        &self.computer
    }

    /// Returns what the node draws.
    #[must_use]
    pub fn content(&self) -> &LayoutContent {
        &self.content
    }

    /// Returns the node's children.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Returns the frames of the node's children when it occupies `frame`.
    #[must_use]
    pub fn child_frames(&self, frame: Rect) -> Vec<Rect> {
        match self.content {
            LayoutContent::Children => self.computer.child_geometries(frame),
            LayoutContent::Foreground(_) | LayoutContent::Opacity(_) => {
                alloc::vec![frame; self.children.len()]
            }
            LayoutContent::Empty | LayoutContent::Fill(_) => Vec::new(),
        }
    }

    /// Draws the node into `builder`, occupying `frame`.
    pub fn render(
        &self,
        frame: Rect,
        environment: &Environment,
        identity: DisplayIdentity,
        builder: &mut DisplayListBuilder,
    ) {
        match &self.content {
            LayoutContent::Empty => {}
            LayoutContent::Fill(style) => {
                let pack = resolve(style, environment, Name::Foreground, 0..1);
                builder.fill(identity, frame, pack.get(Name::Foreground, 0).clone());
            }
            LayoutContent::Foreground(style) => {
                let style = copy_style(style, environment, Name::Foreground)
                    .unwrap_or_else(|| style.clone());
                let environment = environment.with_foreground(style);
                self.render_children(frame, &environment, identity, builder);
            }
            LayoutContent::Opacity(opacity) => {
                builder.nested(
                    identity,
                    frame,
                    |inner| self.render_children(frame, environment, identity, inner),
                    |list| DisplayContent::Opacity(*opacity, list),
                );
            }
            LayoutContent::Children => self.render_children(frame, environment, identity, builder),
        }
    }

    fn render_children(
        &self,
        frame: Rect,
        environment: &Environment,
        identity: DisplayIdentity,
        builder: &mut DisplayListBuilder,
    ) {
        let frames = self.child_frames(frame);
        for (index, (child, child_frame)) in self.children.iter().zip(frames).enumerate() {
            child.render(child_frame, environment, identity.child(index), builder);
        }
    }

    /// Draws the node at `frame` as one offset item, so that moving it
    /// leaves its nested items untouched.
    pub fn render_offset(
        &self,
        frame: Rect,
        environment: &Environment,
        identity: DisplayIdentity,
        builder: &mut DisplayListBuilder,
    ) {
        let local = Rect::from_origin_size((0.0, 0.0), frame.size());
        let origin = Vec2::new(frame.x0, frame.y0);
        builder.nested(
            identity,
            frame,
            |inner| self.render(local, environment, identity.child(0), inner),
            |list| DisplayContent::Offset(origin, list),
        );
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct EmptyEngine;

impl LayoutEngine for EmptyEngine {
    fn size_that_fits(&mut self, _proposal: ProposedSize) -> Size {
        Size::ZERO
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct FillEngine {
    ideal: Size,
}

impl LayoutEngine for FillEngine {
    fn size_that_fits(&mut self, proposal: ProposedSize) -> Size {
        proposal.fixing_unspecified_with(self.ideal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display_list::DisplayList;
    use crate::geometry::{EdgeSet, HorizontalAlignment, VerticalAlignment};
    use crate::layout::{HStack, PaddingLayout, VStack};
    use crate::shape_style::{Color, Fill, ForegroundStyle, ShapeStyleExt};
    use crate::view_list::{ListKind, sublists};
    use alloc::vec;

    fn swatch(color: Color) -> ViewNode {
        ViewNode::fill(color.erased(), Size::new(10.0, 10.0))
    }

    fn make_list(view: &ViewNode, options: ListOptions) -> Rc<dyn ViewList> {
        let inputs = ListInputs {
            options,
            ..ListInputs::default()
        };
        view.make_view_list(&inputs).into_list(&inputs)
    }

    fn render(view: &ViewNode, size: Size, environment: &Environment) -> DisplayList {
        let layout = view.layout(&LayoutContext::default());
        let mut builder = DisplayListBuilder::new();
        layout.render(
            Rect::from_origin_size((0.0, 0.0), size),
            environment,
            DisplayIdentity(0),
            &mut builder,
        );
        builder.finish()
    }

    fn fills(list: &DisplayList) -> Vec<(Rect, Option<Color>)> {
        let mut out = Vec::new();
        list.visit(&mut |item, origin, _| {
            if let DisplayContent::Fill(style) = &item.content {
                out.push((item.frame + origin, style.color()));
            }
        });
        out
    }

    #[test]
    fn groups_flatten_and_empties_vanish() {
        let view = ViewNode::group(vec![
            swatch(Color::RED),
            ViewNode::Empty,
            ViewNode::group(vec![swatch(Color::GREEN), swatch(Color::BLUE)]),
        ]);
        let list = make_list(&view, ListOptions::empty());
        assert_eq!(list.count(IteratorStyle::PLAIN), 3);
        let bodies: Vec<_> = materialize(&*list).into_iter().map(|e| e.body).collect();
        assert_eq!(bodies, vec![swatch(Color::RED), swatch(Color::GREEN), swatch(Color::BLUE)]);
    }

    #[test]
    fn for_each_binds_explicit_ids() {
        let view = ViewNode::ForEach {
            items: vec![
                (ExplicitId::from("a"), swatch(Color::RED)),
                (ExplicitId::from("b"), swatch(Color::BLUE)),
            ]
            .into(),
        };
        let elements = materialize(&*make_list(&view, ListOptions::empty()));
        let ids: Vec<_> = elements
            .iter()
            .map(|e| e.id.canonical().explicit_id().cloned())
            .collect();
        assert_eq!(ids, vec![Some(ExplicitId::from("a")), Some(ExplicitId::from("b"))]);
    }

    #[test]
    fn reordered_items_keep_their_canonical_ids() {
        let a = (ExplicitId::from(1), swatch(Color::RED));
        let b = (ExplicitId::from(2), swatch(Color::BLUE));
        let forward = ViewNode::ForEach {
            items: vec![a.clone(), b.clone()].into(),
        };
        let backward = ViewNode::ForEach {
            items: vec![b, a].into(),
        };
        let first = materialize(&*make_list(&forward, ListOptions::empty()));
        let second = materialize(&*make_list(&backward, ListOptions::empty()));
        assert_eq!(first[0].id.canonical(), second[1].id.canonical());
        assert_eq!(first[1].id.canonical(), second[0].id.canonical());
    }

    #[test]
    fn modifier_over_group_wraps_each_element() {
        let padding = AnyUnaryLayout::new(PaddingLayout::new(EdgeSet::all(), Some(2.0)));
        let view = ViewNode::group(vec![swatch(Color::RED), swatch(Color::BLUE)])
            .modified(padding.clone());
        let elements = materialize(&*make_list(&view, ListOptions::empty()));
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].body, swatch(Color::RED).modified(padding));
    }

    #[test]
    fn foreground_over_group_distributes() {
        let view = ViewNode::group(vec![swatch(Color::RED), ViewNode::Empty])
            .foreground(Color::GREEN.erased());
        let elements = materialize(&*make_list(&view, ListOptions::empty()));
        assert_eq!(elements.len(), 1, "empty children stay empty");
        assert!(matches!(elements[0].body, ViewNode::Foreground { .. }));
    }

    #[test]
    fn sections_honor_hierarchical_option() {
        let view = ViewNode::Section {
            header: Rc::new(swatch(Color::RED)),
            content: Rc::new(ViewNode::group(vec![swatch(Color::GREEN), swatch(Color::BLUE)])),
            footer: Rc::new(ViewNode::Empty),
        };
        assert_eq!(make_list(&view, ListOptions::empty()).count(IteratorStyle::PLAIN), 3);
        let hierarchical = make_list(&view, ListOptions::SECTIONS_ARE_HIERARCHICAL);
        assert_eq!(hierarchical.count(IteratorStyle::PLAIN), 1);
    }

    #[test]
    fn leaves_stay_static() {
        let inputs = ListInputs::default();
        assert_eq!(swatch(Color::RED).make_view_list(&inputs).kind(), ListKind::Static);
        let tagged = swatch(Color::RED).tagged(4);
        assert_eq!(tagged.make_view_list(&inputs).kind(), ListKind::Dynamic);
        let list = tagged.make_view_list(&inputs).into_list(&inputs);
        assert_eq!(sublists(&*list, IteratorStyle::PLAIN).len(), 1);
    }

    #[test]
    fn stacks_place_fills_side_by_side() {
        let row = ViewNode::container(
            AnyLayout::new(HStack::new(VerticalAlignment::CENTER, Some(0.0))),
            vec![swatch(Color::RED), swatch(Color::BLUE)],
        );
        let drawn = fills(&render(&row, Size::new(20.0, 10.0), &Environment::default()));
        assert_eq!(
            drawn,
            vec![
                (Rect::new(0.0, 0.0, 10.0, 10.0), Some(Color::RED)),
                (Rect::new(10.0, 0.0, 20.0, 10.0), Some(Color::BLUE)),
            ]
        );
    }

    #[test]
    fn foreground_reaches_nested_fills() {
        let column = ViewNode::container(
            AnyLayout::new(VStack::new(HorizontalAlignment::CENTER, Some(0.0))),
            vec![ViewNode::fill(ForegroundStyle.erased(), Size::new(10.0, 10.0))],
        )
        .foreground(Color::GREEN.erased());
        let drawn = fills(&render(&column, Size::new(10.0, 10.0), &Environment::default()));
        assert_eq!(drawn.len(), 1);
        assert_eq!(drawn[0].1, Some(Color::GREEN));
    }

    #[test]
    fn opacity_wraps_children_in_a_group() {
        let faded = swatch(Color::RED).opacity(0.5);
        let list = render(&faded, Size::new(10.0, 10.0), &Environment::default());
        assert!(matches!(list.items[0].content, DisplayContent::Opacity(o, _) if o == 0.5));
        let mut seen = Vec::new();
        list.visit(&mut |item, _, opacity| {
            if let DisplayContent::Fill(style) = &item.content {
                seen.push((style.fill.clone(), opacity));
            }
        });
        assert_eq!(seen, vec![(Fill::Color(Color::RED), 0.5)]);
    }

    #[test]
    fn empty_takes_no_space() {
        let layout = ViewNode::Empty.layout(&LayoutContext::default());
        assert_eq!(layout.computer().size_that_fits(ProposedSize::INFINITY), Size::ZERO);
        let fill = swatch(Color::RED).layout(&LayoutContext::default());
        assert_eq!(
            fill.computer().size_that_fits(ProposedSize::UNSPECIFIED),
            Size::new(10.0, 10.0)
        );
    }
}
