// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The instruction set that styles interpret.

use core::mem;
use core::ops::Range;

use bitflags::bitflags;

use super::{AnyShapeStyle, Color, Name, Pack, ShapeStyle, Style};
use crate::environment::Environment;

/// What a [`ShapeRequest`] asks of a style.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    /// Produce the color text at `level` should be drawn with.
    PrepareText {
        /// Hierarchy level.
        level: usize,
    },
    /// Produce a [`Pack`] holding `name` at each of `levels`.
    ResolveStyle {
        /// Slot to fill.
        name: Name,
        /// Hierarchy levels wanted.
        levels: Range<usize>,
    },
    /// Produce a single color approximating the style at `level`.
    FallbackColor {
        /// Hierarchy level.
        level: usize,
    },
    /// Report whether the style distinguishes more than one level.
    MultiLevel,
    /// Produce a style value that can be stored in place of this one.
    CopyStyle {
        /// Slot being copied.
        name: Name,
    },
    /// Produce the style an alias stands for at the primary level.
    PrimaryStyle,
    /// Report whether the style at `level` changes the backdrop.
    ModifyBackground {
        /// Hierarchy level.
        level: usize,
    },
}

/// How text should take its color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PreparedText {
    /// A fixed color.
    Resolved(Color),
    /// Draw glyphs as a mask and fill them with the resolved style.
    ForegroundKeyColor,
}

/// The answer to a [`ShapeRequest`].
///
/// Styles that have nothing to say leave [`ShapeResult::None`] in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ShapeResult {
    /// No answer.
    #[default]
    None,
    /// Answer to [`Operation::PrepareText`].
    PreparedText(PreparedText),
    /// Answer to [`Operation::ResolveStyle`].
    Pack(Pack),
    /// Answer to [`Operation::CopyStyle`] and [`Operation::PrimaryStyle`].
    Style(AnyShapeStyle),
    /// Answer to [`Operation::FallbackColor`].
    Color(Color),
    /// Answer to the boolean queries.
    Bool(bool),
}

bitflags! {
    /// Alias styles currently being expanded.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct RecursiveStyles: u8 {
        /// The environment's foreground style.
        const FOREGROUND = 1 << 0;
        /// The environment's background style.
        const BACKGROUND = 1 << 1;
    }
}

/// One question put to a style, and the answer being built.
///
/// Styles receive the request mutably. Composite styles rewrite
/// [`operation`](Self::operation) before passing the request to a part, and
/// restore it afterwards.
#[derive(Debug)]
pub struct ShapeRequest<'e> {
    /// The current question.
    pub operation: Operation,
    /// The answer so far.
    pub result: ShapeResult,
    /// The environment the style resolves in.
    pub environment: &'e Environment,
    /// Alias styles being expanded, which must not be entered again.
    pub active_recursive_styles: RecursiveStyles,
}

impl<'e> ShapeRequest<'e> {
    /// Creates a request with no answer yet.
    #[must_use]
    pub fn new(operation: Operation, environment: &'e Environment) -> Self {
        Self {
            operation,
            result: ShapeResult::None,
            environment,
            active_recursive_styles: RecursiveStyles::empty(),
        }
    }

    /// Returns the pack being built, replacing any non-pack answer with an
    /// empty pack.
    pub fn pack_mut(&mut self) -> &mut Pack {
        if !matches!(self.result, ShapeResult::Pack(_)) {
            self.result = ShapeResult::Pack(Pack::new());
        }
        match &mut self.result {
            ShapeResult::Pack(pack) => pack,
            _ => unreachable!("result was just set to a pack"),
        }
    }

    /// Takes the pack out of the answer, leaving no answer.
    pub fn take_pack(&mut self) -> Pack {
        match mem::take(&mut self.result) {
            ShapeResult::Pack(pack) => pack,
            _ => Pack::new(),
        }
    }

    /// Resolves a single-level style at `levels`.
    ///
    /// The style fills level 0, and each deeper level is a copy faded by the
    /// environment's hierarchy opacity.
    pub fn resolve_leveled(&mut self, name: Name, levels: Range<usize>, style: Style) {
        if levels.is_empty() {
            return;
        }
        let mut pack = Pack::style(style, name, 0);
        pack.create_opacities(levels.end, name, self.environment);
        pack.retain_levels(name, levels);
        self.pack_mut().merge(pack);
    }

    /// Runs `style` on the current operation with no prior answer, and
    /// returns its answer. The answer built so far is left in place.
    pub fn answer(&mut self, style: &dyn ShapeStyle) -> ShapeResult {
        let outer = mem::take(&mut self.result);
        style.apply(self);
        mem::replace(&mut self.result, outer)
    }

    /// Resolves `style` at `levels` on its own and returns its pack.
    pub fn resolved_part(
        &mut self,
        style: &dyn ShapeStyle,
        name: Name,
        levels: Range<usize>,
    ) -> Pack {
        let operation = mem::replace(
            &mut self.operation,
            Operation::ResolveStyle { name, levels },
        );
        let part = self.answer(style);
        self.operation = operation;
        match part {
            ShapeResult::Pack(pack) => pack,
            _ => Pack::new(),
        }
    }

    /// Resolves `style` at `levels` on its own, shifts the resulting levels
    /// by `shift`, and merges them into the pack being built.
    ///
    /// Entries already in the pack are not shifted.
    pub fn resolve_part(
        &mut self,
        style: &dyn ShapeStyle,
        name: Name,
        levels: Range<usize>,
        shift: isize,
    ) {
        let mut part = self.resolved_part(style, name, levels);
        part.adjust_level_indices(name, shift);
        self.pack_mut().merge(part);
    }

    /// Runs `style` with `operation`, restoring the current operation after.
    pub fn apply_with(&mut self, style: &dyn ShapeStyle, operation: Operation) {
        let saved = mem::replace(&mut self.operation, operation);
        style.apply(self);
        self.operation = saved;
    }

    /// Runs `body` with `guard` marked active.
    pub fn guarded(&mut self, guard: RecursiveStyles, body: impl FnOnce(&mut Self)) {
        let saved = self.active_recursive_styles;
        self.active_recursive_styles.insert(guard);
        body(self);
        self.active_recursive_styles = saved;
    }

    /// Answers [`Operation::CopyStyle`] with `style` itself.
    pub fn copy_of<S: ShapeStyle + Clone + PartialEq>(&mut self, style: S) {
        self.result = ShapeResult::Style(AnyShapeStyle::new(style));
    }

    /// Wraps a copied style with `wrap`, leaving other answers unchanged.
    pub fn map_copied_style<S, F>(&mut self, wrap: F)
    where
        S: ShapeStyle + Clone + PartialEq,
        F: FnOnce(AnyShapeStyle) -> S,
    {
        if let ShapeResult::Style(inner) = mem::take(&mut self.result) {
            self.result = ShapeResult::Style(AnyShapeStyle::new(wrap(inner)));
        }
    }
}

fn run(style: &dyn ShapeStyle, environment: &Environment, operation: Operation) -> ShapeResult {
    let mut request = ShapeRequest::new(operation, environment);
    style.apply(&mut request);
    request.result
}

/// Resolves `style` into a [`Pack`] holding `name` at `levels`.
///
/// Levels the style does not produce are absent and read back as clear.
#[must_use]
pub fn resolve(
    style: &dyn ShapeStyle,
    environment: &Environment,
    name: Name,
    levels: Range<usize>,
) -> Pack {
    match run(style, environment, Operation::ResolveStyle { name, levels }) {
        ShapeResult::Pack(pack) => pack,
        _ => Pack::new(),
    }
}

/// Returns a single color standing in for `style` at `level`.
#[must_use]
pub fn fallback_color(
    style: &dyn ShapeStyle,
    environment: &Environment,
    level: usize,
) -> Option<Color> {
    match run(style, environment, Operation::FallbackColor { level }) {
        ShapeResult::Color(color) => Some(color),
        _ => None,
    }
}

/// Returns how text at `level` takes its color from `style`.
#[must_use]
pub fn prepare_text(
    style: &dyn ShapeStyle,
    environment: &Environment,
    level: usize,
) -> Option<PreparedText> {
    match run(style, environment, Operation::PrepareText { level }) {
        ShapeResult::PreparedText(text) => Some(text),
        _ => None,
    }
}

/// Returns whether `style` distinguishes hierarchy levels.
#[must_use]
pub fn is_multi_level(style: &dyn ShapeStyle, environment: &Environment) -> bool {
    matches!(
        run(style, environment, Operation::MultiLevel),
        ShapeResult::Bool(true)
    )
}

/// Returns whether `style` at `level` changes the backdrop.
#[must_use]
pub fn modifies_background(
    style: &dyn ShapeStyle,
    environment: &Environment,
    level: usize,
) -> bool {
    matches!(
        run(style, environment, Operation::ModifyBackground { level }),
        ShapeResult::Bool(true)
    )
}

/// Returns a storable copy of `style` for `name`, with aliases expanded.
#[must_use]
pub fn copy_style(
    style: &dyn ShapeStyle,
    environment: &Environment,
    name: Name,
) -> Option<AnyShapeStyle> {
    match run(style, environment, Operation::CopyStyle { name }) {
        ShapeResult::Style(style) => Some(style),
        _ => None,
    }
}

/// Returns the style an alias stands for at the primary level.
#[must_use]
pub fn primary_style(style: &dyn ShapeStyle, environment: &Environment) -> Option<AnyShapeStyle> {
    match run(style, environment, Operation::PrimaryStyle) {
        ShapeResult::Style(style) => Some(style),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape_style::{Fill, PairShapeStyle};

    #[test]
    fn leveled_styles_fade_by_level() {
        let env = Environment::default();
        let pack = resolve(&Color::RED, &env, Name::Foreground, 1..3);
        assert!(!pack.contains(Name::Foreground, 0), "level 0 was not asked for");
        let secondary = pack.get(Name::Foreground, 1);
        assert_eq!(secondary.fill, Fill::Color(Color::RED));
        assert_eq!(secondary.opacity, env.hierarchy_opacity(1));
        assert_eq!(pack.get(Name::Foreground, 2).opacity, env.hierarchy_opacity(2));
    }

    #[test]
    fn empty_level_range_resolves_nothing() {
        let env = Environment::default();
        assert!(resolve(&Color::RED, &env, Name::Foreground, 2..2).is_empty());
    }

    #[test]
    fn resolve_part_leaves_existing_entries_in_place() {
        let env = Environment::default();
        let mut request = ShapeRequest::new(
            Operation::ResolveStyle {
                name: Name::Foreground,
                levels: 0..1,
            },
            &env,
        );
        request.pack_mut().set(Name::Foreground, 0, Style::new(Fill::Color(Color::GREEN)));
        request.resolve_part(&Color::RED, Name::Foreground, 0..1, 2);
        let pack = request.take_pack();
        assert_eq!(pack.get(Name::Foreground, 0).fill, Fill::Color(Color::GREEN));
        assert_eq!(pack.get(Name::Foreground, 2).fill, Fill::Color(Color::RED));
        assert_eq!(
            request.operation,
            Operation::ResolveStyle {
                name: Name::Foreground,
                levels: 0..1
            },
            "operation restored"
        );
    }

    #[test]
    fn inapplicable_operations_have_no_answer() {
        let env = Environment::default();
        assert!(!is_multi_level(&Color::RED, &env));
        assert!(is_multi_level(&PairShapeStyle::new(Color::RED, Color::BLUE), &env));
        assert_eq!(primary_style(&Color::RED, &env), None);
        assert_eq!(
            prepare_text(&Color::RED, &env, 0),
            Some(PreparedText::Resolved(Color::RED))
        );
    }
}
