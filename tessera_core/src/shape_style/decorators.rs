// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Styles that wrap one style and adjust what it resolves to.

use core::ops::Range;

use super::{BlendMode, Operation, PreparedText, ShapeRequest, ShapeResult, ShapeStyle};

/// Level `n` of this style is level `n + offset` of the wrapped style.
#[derive(Clone, Debug, PartialEq)]
pub struct OffsetShapeStyle<S> {
    style: S,
    offset: isize,
}

impl<S> OffsetShapeStyle<S> {
    /// Shifts `style` by `offset` levels.
    #[must_use]
    pub const fn new(style: S, offset: isize) -> Self {
        Self { style, offset }
    }

    fn shift(&self, level: usize) -> usize {
        level.saturating_add_signed(self.offset)
    }

    /// Shifts `levels`, dropping the ones that would fall below level 0.
    fn shift_range(&self, levels: Range<usize>) -> Range<usize> {
        self.shift(levels.start)..self.shift(levels.end)
    }
}

impl<S: ShapeStyle + Clone + PartialEq> ShapeStyle for OffsetShapeStyle<S> {
    fn apply(&self, request: &mut ShapeRequest<'_>) {
        match request.operation.clone() {
            Operation::ResolveStyle { name, levels } => {
                let shifted = self.shift_range(levels);
                if !shifted.is_empty() {
                    request.resolve_part(&self.style, name, shifted, -self.offset);
                }
            }
            Operation::PrepareText { level } => {
                let level = self.shift(level);
                request.apply_with(&self.style, Operation::PrepareText { level });
            }
            Operation::FallbackColor { level } => {
                let level = self.shift(level);
                request.apply_with(&self.style, Operation::FallbackColor { level });
            }
            Operation::ModifyBackground { level } => {
                let level = self.shift(level);
                request.apply_with(&self.style, Operation::ModifyBackground { level });
            }
            Operation::CopyStyle { .. } => {
                self.style.apply(request);
                let offset = self.offset;
                request.map_copied_style(|inner| OffsetShapeStyle::new(inner, offset));
            }
            Operation::MultiLevel => self.style.apply(request),
            Operation::PrimaryStyle => {
                if self.offset == 0 {
                    self.style.apply(request);
                }
            }
        }
    }
}

/// Multiplies the opacity of the wrapped style, including its effects.
#[derive(Clone, Debug, PartialEq)]
pub struct OpacityShapeStyle<S> {
    style: S,
    opacity: f32,
}

impl<S> OpacityShapeStyle<S> {
    /// Fades `style` by `opacity`.
    #[must_use]
    pub const fn new(style: S, opacity: f32) -> Self {
        Self { style, opacity }
    }
}

impl<S: ShapeStyle + Clone + PartialEq> ShapeStyle for OpacityShapeStyle<S> {
    fn apply(&self, request: &mut ShapeRequest<'_>) {
        let opacity = self.opacity;
        match request.operation.clone() {
            Operation::ResolveStyle { name, levels } => {
                self.style.apply(request);
                request
                    .pack_mut()
                    .modify(name, levels, |style| style.apply_opacity(opacity));
            }
            Operation::FallbackColor { .. } => {
                self.style.apply(request);
                if let ShapeResult::Color(color) = &mut request.result {
                    *color = color.with_opacity(opacity);
                }
            }
            Operation::PrepareText { .. } => {
                self.style.apply(request);
                if let ShapeResult::PreparedText(PreparedText::Resolved(color)) =
                    &mut request.result
                {
                    *color = color.with_opacity(opacity);
                }
            }
            Operation::CopyStyle { .. } => {
                self.style.apply(request);
                request.map_copied_style(|inner| OpacityShapeStyle::new(inner, opacity));
            }
            Operation::MultiLevel | Operation::ModifyBackground { .. } => self.style.apply(request),
            Operation::PrimaryStyle => {}
        }
    }
}

/// Draws the wrapped style, and its effects, with a blend mode.
#[derive(Clone, Debug, PartialEq)]
pub struct BlendModeShapeStyle<S> {
    style: S,
    mode: BlendMode,
}

impl<S> BlendModeShapeStyle<S> {
    /// Blends `style` with `mode`.
    #[must_use]
    pub const fn new(style: S, mode: BlendMode) -> Self {
        Self { style, mode }
    }
}

impl<S: ShapeStyle + Clone + PartialEq> ShapeStyle for BlendModeShapeStyle<S> {
    fn apply(&self, request: &mut ShapeRequest<'_>) {
        let mode = self.mode;
        match request.operation.clone() {
            Operation::ResolveStyle { name, levels } => {
                self.style.apply(request);
                request
                    .pack_mut()
                    .modify(name, levels, |style| style.apply_blend(mode));
            }
            Operation::PrepareText { .. } if mode != BlendMode::Normal => {
                request.result = ShapeResult::PreparedText(PreparedText::ForegroundKeyColor);
            }
            Operation::CopyStyle { .. } => {
                self.style.apply(request);
                request.map_copied_style(|inner| BlendModeShapeStyle::new(inner, mode));
            }
            Operation::PrimaryStyle => {}
            _ => self.style.apply(request),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Environment;
    use crate::shape_style::{
        AnyShapeStyle, Color, ForegroundStyle, Name, ShapeStyleExt, TripleShapeStyle, copy_style,
        fallback_color, prepare_text, resolve,
    };
    use proptest::prelude::*;

    fn sample_environment() -> Environment {
        Environment::default()
            .with_foreground(TripleShapeStyle::new(Color::RED, Color::GREEN, Color::BLUE).erased())
    }

    #[test]
    fn offset_shifts_levels() {
        let env = sample_environment();
        let pack = resolve(&ForegroundStyle.offset(1), &env, Name::Foreground, 0..2);
        assert_eq!(pack.get(Name::Foreground, 0).color(), Some(Color::GREEN));
        assert_eq!(pack.get(Name::Foreground, 1).color(), Some(Color::BLUE));
        assert_eq!(
            fallback_color(&ForegroundStyle.offset(2), &env, 0),
            Some(Color::BLUE)
        );
    }

    #[test]
    fn negative_offset_drops_levels_below_zero() {
        let env = sample_environment();
        let pack = resolve(&ForegroundStyle.offset(-1), &env, Name::Foreground, 0..2);
        assert!(!pack.contains(Name::Foreground, 0));
        assert_eq!(pack.get(Name::Foreground, 1).color(), Some(Color::RED));
    }

    #[test]
    fn opacity_scales_fill_and_text() {
        let env = Environment::default();
        let style = Color::RED.opacity(0.5);
        let pack = resolve(&style, &env, Name::Foreground, 0..1);
        assert_eq!(pack.get(Name::Foreground, 0).opacity, 0.5);
        assert_eq!(
            prepare_text(&style, &env, 0),
            Some(PreparedText::Resolved(Color::RED.with_opacity(0.5)))
        );
    }

    #[test]
    fn blend_mode_marks_every_level() {
        let env = Environment::default();
        let style = Color::RED.blend_mode(BlendMode::Multiply);
        let pack = resolve(&style, &env, Name::Foreground, 0..2);
        assert!(
            pack.slice(Name::Foreground)
                .iter()
                .all(|s| s.blend() == BlendMode::Multiply),
            "both levels blend"
        );
        assert_eq!(
            prepare_text(&style, &env, 0),
            Some(PreparedText::ForegroundKeyColor)
        );
    }

    #[test]
    fn copy_keeps_the_decoration() {
        let env = Environment::default().with_foreground(Color::GREEN.erased());
        let copied = copy_style(&ForegroundStyle.opacity(0.5), &env, Name::Foreground);
        let expected = OpacityShapeStyle::new(AnyShapeStyle::new(Color::GREEN), 0.5).erased();
        assert_eq!(copied, Some(expected));
    }

    proptest! {
        #[test]
        fn zero_offset_is_identity(start in 0_usize..4, len in 0_usize..4) {
            let env = sample_environment();
            let levels = start..start + len;
            prop_assert_eq!(
                resolve(&ForegroundStyle.offset(0), &env, Name::Foreground, levels.clone()),
                resolve(&ForegroundStyle, &env, Name::Foreground, levels)
            );
        }

        #[test]
        fn offset_round_trips(k in 0_isize..3, extra in 0_usize..3, len in 1_usize..4) {
            let env = sample_environment();
            let start = k.cast_unsigned() + extra;
            let levels = start..start + len;
            let there_and_back = ForegroundStyle.offset(k).offset(-k);
            prop_assert_eq!(
                resolve(&there_and_back, &env, Name::Foreground, levels.clone()),
                resolve(&ForegroundStyle, &env, Name::Foreground, levels)
            );
        }
    }
}
