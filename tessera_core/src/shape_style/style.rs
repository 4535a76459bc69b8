// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`ShapeStyle`] trait and its erased form.

use alloc::rc::Rc;
use core::any::Any;
use core::fmt;

use super::{
    BlendMode, BlendModeShapeStyle, OffsetShapeStyle, OpacityShapeStyle, Operation,
    RecursiveStyles, ShadowShapeStyle, ShadowStyle, ShapeRequest, ShapeResult,
};

/// A description of how to paint a shape, resolved on demand.
///
/// A style answers each [`Operation`] of a [`ShapeRequest`] either by
/// writing a result or by forwarding the request, possibly rewritten, to
/// the styles it wraps. Operations that make no sense for a style are left
/// unanswered; callers treat a missing answer as the neutral default.
pub trait ShapeStyle: fmt::Debug + 'static {
    /// Answers `request`.
    fn apply(&self, request: &mut ShapeRequest<'_>);
}

/// Combinators available on every concrete style.
pub trait ShapeStyleExt: ShapeStyle + Clone + PartialEq + Sized {
    /// Shifts hierarchy levels, so level `n` of the result is level
    /// `n + offset` of `self`.
    #[must_use]
    fn offset(self, offset: isize) -> OffsetShapeStyle<Self> {
        OffsetShapeStyle::new(self, offset)
    }

    /// Multiplies every level's opacity by `opacity`.
    #[must_use]
    fn opacity(self, opacity: f32) -> OpacityShapeStyle<Self> {
        OpacityShapeStyle::new(self, opacity)
    }

    /// Draws every level with `mode`.
    #[must_use]
    fn blend_mode(self, mode: BlendMode) -> BlendModeShapeStyle<Self> {
        BlendModeShapeStyle::new(self, mode)
    }

    /// Adds `shadow` to every level.
    #[must_use]
    fn shadow(self, shadow: ShadowStyle) -> ShadowShapeStyle<Self> {
        ShadowShapeStyle::new(self, shadow)
    }

    /// Erases the style's type.
    #[must_use]
    fn erased(self) -> AnyShapeStyle {
        AnyShapeStyle::new(self)
    }
}

impl<S: ShapeStyle + Clone + PartialEq> ShapeStyleExt for S {}

trait ErasedStyle: ShapeStyle {
    fn as_any(&self) -> &dyn Any;
}

impl<S: ShapeStyle> ErasedStyle for S {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn eq_as<T: PartialEq + 'static>(a: &dyn Any, b: &dyn Any) -> bool {
    match (a.downcast_ref::<T>(), b.downcast_ref::<T>()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// A type-erased [`ShapeStyle`].
///
/// Two erased styles are equal when they wrap equal values of the same type.
#[derive(Clone)]
pub struct AnyShapeStyle {
    style: Rc<dyn ErasedStyle>,
    eq: fn(&dyn Any, &dyn Any) -> bool,
}

impl AnyShapeStyle {
    /// Erases `style`. Erasing an erased style does not nest.
    #[must_use]
    pub fn new<S: ShapeStyle + Clone + PartialEq>(style: S) -> Self {
        let any: &dyn Any = &style;
        if let Some(erased) = any.downcast_ref::<Self>() {
            return erased.clone();
        }
        Self {
            style: Rc::new(style),
            eq: eq_as::<S>,
        }
    }

    /// Returns the wrapped style if it has type `S`.
    #[must_use]
    pub fn downcast_ref<S: ShapeStyle>(&self) -> Option<&S> {
        self.style.as_any().downcast_ref()
    }
}

impl PartialEq for AnyShapeStyle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.style, &other.style)
            || (self.eq)(self.style.as_any(), other.style.as_any())
    }
}

impl fmt::Debug for AnyShapeStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AnyShapeStyle(")?;
        fmt::Debug::fmt(&*self.style, f)?;
        f.write_str(")")
    }
}

impl ShapeStyle for AnyShapeStyle {
    fn apply(&self, request: &mut ShapeRequest<'_>) {
        self.style.apply(request);
    }
}

/// The environment's foreground style.
///
/// Resolves to [`Environment::foreground_style`] when set, and to the
/// default foreground color otherwise. If the foreground style itself
/// refers back to the foreground (say, a pair whose second part is
/// `HierarchicalShapeStyle::SECONDARY`), the inner reference resolves to the
/// default color instead of recursing.
///
/// [`Environment::foreground_style`]: crate::environment::Environment::foreground_style
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ForegroundStyle;

impl ShapeStyle for ForegroundStyle {
    fn apply(&self, request: &mut ShapeRequest<'_>) {
        let environment = request.environment;
        let style = match &environment.foreground_style {
            Some(style)
                if !request
                    .active_recursive_styles
                    .contains(RecursiveStyles::FOREGROUND) =>
            {
                style
            }
            _ => return environment.default_foreground().apply(request),
        };
        match request.operation {
            Operation::PrimaryStyle => {
                request.result = ShapeResult::Style(style.clone());
            }
            _ => request.guarded(RecursiveStyles::FOREGROUND, |request| style.apply(request)),
        }
    }
}

/// The environment's background style, guarded like [`ForegroundStyle`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BackgroundStyle;

impl ShapeStyle for BackgroundStyle {
    fn apply(&self, request: &mut ShapeRequest<'_>) {
        let environment = request.environment;
        let style = match &environment.background_style {
            Some(style)
                if !request
                    .active_recursive_styles
                    .contains(RecursiveStyles::BACKGROUND) =>
            {
                style
            }
            _ => return environment.default_background().apply(request),
        };
        match request.operation {
            Operation::PrimaryStyle => {
                request.result = ShapeResult::Style(style.clone());
            }
            _ => request.guarded(RecursiveStyles::BACKGROUND, |request| style.apply(request)),
        }
    }
}

/// One level of the foreground hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HierarchicalShapeStyle {
    level: usize,
}

impl HierarchicalShapeStyle {
    /// The primary level.
    pub const PRIMARY: Self = Self::new(0);
    /// The secondary level.
    pub const SECONDARY: Self = Self::new(1);
    /// The tertiary level.
    pub const TERTIARY: Self = Self::new(2);
    /// The quaternary level.
    pub const QUATERNARY: Self = Self::new(3);
    /// The quinary level.
    pub const QUINARY: Self = Self::new(4);

    /// Creates the style for `level`.
    #[must_use]
    pub const fn new(level: usize) -> Self {
        Self { level }
    }

    /// Returns the level.
    #[must_use]
    pub const fn level(&self) -> usize {
        self.level
    }

    fn as_offset(self) -> OffsetShapeStyle<ForegroundStyle> {
        OffsetShapeStyle::new(ForegroundStyle, self.level.cast_signed())
    }
}

impl ShapeStyle for HierarchicalShapeStyle {
    fn apply(&self, request: &mut ShapeRequest<'_>) {
        match request.operation {
            Operation::PrimaryStyle if self.level == 0 => ForegroundStyle.apply(request),
            Operation::PrimaryStyle => {}
            _ => self.as_offset().apply(request),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::{ColorScheme, Environment};
    use crate::shape_style::{Color, Fill, Name, PairShapeStyle, copy_style, primary_style, resolve};

    #[test]
    fn erased_styles_compare_by_value() {
        let a = AnyShapeStyle::new(Color::RED);
        assert_eq!(a, AnyShapeStyle::new(Color::RED));
        assert_ne!(a, AnyShapeStyle::new(Color::BLUE));
        assert_ne!(a, AnyShapeStyle::new(ForegroundStyle));
        assert_eq!(AnyShapeStyle::new(a.clone()), a, "erasing twice is flat");
        assert_eq!(a.downcast_ref::<Color>(), Some(&Color::RED));
    }

    #[test]
    fn foreground_defaults_to_scheme_color() {
        let env = Environment {
            color_scheme: ColorScheme::Dark,
            ..Environment::default()
        };
        let pack = resolve(&ForegroundStyle, &env, Name::Foreground, 0..1);
        assert_eq!(pack.get(Name::Foreground, 0).fill, Fill::Color(Color::WHITE));
    }

    #[test]
    fn hierarchical_reads_the_foreground_at_its_level() {
        let env = Environment::default()
            .with_foreground(PairShapeStyle::new(Color::RED, Color::BLUE).erased());
        let pack = resolve(&HierarchicalShapeStyle::SECONDARY, &env, Name::Foreground, 0..1);
        assert_eq!(pack.get(Name::Foreground, 0).fill, Fill::Color(Color::BLUE));
        assert_eq!(pack.slice(Name::Foreground).len(), 1);
    }

    #[test]
    fn self_referencing_foreground_terminates() {
        // The secondary level of this foreground refers to the foreground.
        let style = PairShapeStyle::new(Color::RED, HierarchicalShapeStyle::SECONDARY);
        let env = Environment::default().with_foreground(style.erased());
        let pack = resolve(&ForegroundStyle, &env, Name::Foreground, 0..2);
        assert_eq!(pack.get(Name::Foreground, 0).fill, Fill::Color(Color::RED));
        let secondary = pack.get(Name::Foreground, 1);
        assert_eq!(secondary.fill, Fill::Color(env.default_foreground()));
        assert_eq!(secondary.opacity, env.hierarchy_opacity(1));
    }

    #[test]
    fn copy_expands_the_alias() {
        let env = Environment::default().with_foreground(Color::GREEN.erased());
        assert_eq!(
            copy_style(&ForegroundStyle, &env, Name::Foreground),
            Some(Color::GREEN.erased())
        );
        assert_eq!(
            primary_style(&HierarchicalShapeStyle::PRIMARY, &env),
            Some(Color::GREEN.erased())
        );
        assert_eq!(primary_style(&HierarchicalShapeStyle::SECONDARY, &env), None);
    }

    #[test]
    fn background_guard_is_independent() {
        let env = Environment {
            background_style: Some(BackgroundStyle.erased()),
            ..Environment::default()
        };
        let pack = resolve(&BackgroundStyle, &env, Name::Background, 0..1);
        assert_eq!(
            pack.get(Name::Background, 0).fill,
            Fill::Color(env.default_background())
        );
    }
}
