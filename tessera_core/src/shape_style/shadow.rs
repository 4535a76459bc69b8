// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shadows.

use bitflags::bitflags;
use kurbo::Vec2;

use super::{Color, Operation, PreparedText, ShapeRequest, ShapeResult, ShapeStyle};
use crate::geometry::EdgeInsets;

bitflags! {
    /// Variations of a shadow. The empty set is a plain drop shadow.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ShadowKind: u8 {
        /// Drawn inside the shape instead of behind it.
        const INNER = 1 << 0;
        /// Only the shadow is drawn.
        const ONLY = 1 << 1;
        /// The shape is not treated as opaque when casting.
        const NON_OPAQUE = 1 << 2;
        /// The fill does not occlude the shadow.
        const IGNORES_FILL = 1 << 3;
        /// The fill is knocked out of the shadow.
        const REQUIRES_KNOCKOUT = 1 << 4;
    }
}

/// A shadow description.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowStyle {
    kind: ShadowKind,
    color: Color,
    radius: f64,
    offset: Vec2,
    midpoint: f32,
}

impl ShadowStyle {
    /// A drop shadow of `radius` in translucent black.
    #[must_use]
    pub const fn drop(radius: f64) -> Self {
        Self {
            kind: ShadowKind::empty(),
            color: Color::white(0.0, 0.33),
            radius,
            offset: Vec2::ZERO,
            midpoint: 0.5,
        }
    }

    /// An inner shadow of `radius` in translucent black.
    #[must_use]
    pub const fn inner(radius: f64) -> Self {
        Self {
            kind: ShadowKind::INNER,
            color: Color::white(0.0, 0.55),
            radius,
            offset: Vec2::ZERO,
            midpoint: 0.5,
        }
    }

    /// Replaces the color.
    #[must_use]
    pub const fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Offsets the shadow.
    #[must_use]
    pub const fn offset(mut self, x: f64, y: f64) -> Self {
        self.offset = Vec2::new(x, y);
        self
    }

    /// Sets whether the fill occludes the shadow, optionally knocking the
    /// fill out of it.
    #[must_use]
    pub fn ignores_fill(mut self, enabled: bool, knockout: bool) -> Self {
        self.kind
            .remove(ShadowKind::IGNORES_FILL | ShadowKind::REQUIRES_KNOCKOUT);
        if enabled {
            self.kind.insert(ShadowKind::IGNORES_FILL);
            self.kind.set(ShadowKind::REQUIRES_KNOCKOUT, knockout);
        }
        self
    }

    /// Returns the concrete shadow.
    #[must_use]
    pub fn resolve(&self) -> ResolvedShadow {
        ResolvedShadow {
            color: self.color,
            radius: self.radius,
            offset: self.offset,
            midpoint: self.midpoint,
            kind: self.kind,
        }
    }
}

/// A shadow with every value fixed, stored in a resolved style's effects.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedShadow {
    /// Shadow color.
    pub color: Color,
    /// Blur radius.
    pub radius: f64,
    /// Offset from the shape.
    pub offset: Vec2,
    /// Falloff midpoint.
    pub midpoint: f32,
    /// Variations.
    pub kind: ShadowKind,
}

impl Default for ResolvedShadow {
    fn default() -> Self {
        ShadowStyle::drop(1.0).offset(0.0, 1.5).resolve()
    }
}

impl ResolvedShadow {
    /// How far the shadow extends outside the shape on each edge, as
    /// negative insets. Inner shadows extend nowhere.
    #[must_use]
    pub fn insets(&self) -> EdgeInsets {
        if self.kind.contains(ShadowKind::INNER) {
            return EdgeInsets::ZERO;
        }
        let spread = self.radius * -2.8;
        EdgeInsets::new(
            self.offset.y + spread,
            self.offset.x + spread,
            spread - self.offset.y,
            spread - self.offset.x,
        )
    }
}

/// A style that adds a shadow to every level it resolves.
#[derive(Clone, Debug, PartialEq)]
pub struct ShadowShapeStyle<S> {
    style: S,
    shadow: ShadowStyle,
}

impl<S> ShadowShapeStyle<S> {
    /// Adds `shadow` to `style`.
    #[must_use]
    pub const fn new(style: S, shadow: ShadowStyle) -> Self {
        Self { style, shadow }
    }
}

impl<S: ShapeStyle + Clone + PartialEq> ShapeStyle for ShadowShapeStyle<S> {
    fn apply(&self, request: &mut ShapeRequest<'_>) {
        match request.operation.clone() {
            Operation::PrepareText { .. } => {
                request.result = ShapeResult::PreparedText(PreparedText::ForegroundKeyColor);
            }
            Operation::ResolveStyle { name, levels } => {
                self.style.apply(request);
                let resolved = self.shadow.resolve();
                request
                    .pack_mut()
                    .modify(name, levels, |style| style.push_shadow(resolved));
            }
            Operation::CopyStyle { .. } => {
                self.style.apply(request);
                let shadow = self.shadow;
                request.map_copied_style(|inner| ShadowShapeStyle::new(inner, shadow));
            }
            Operation::FallbackColor { .. }
            | Operation::ModifyBackground { .. }
            | Operation::MultiLevel => self.style.apply(request),
            Operation::PrimaryStyle => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Environment;
    use crate::shape_style::{EffectKind, Name, ShapeStyleExt, resolve};

    #[test]
    fn drop_shadow_insets_grow_outward() {
        let shadow = ShadowStyle::drop(10.0).offset(2.0, 4.0).resolve();
        let insets = shadow.insets();
        assert_eq!(insets.top, 4.0 - 28.0);
        assert_eq!(insets.bottom, -28.0 - 4.0);
        assert_eq!(ShadowStyle::inner(10.0).resolve().insets(), EdgeInsets::ZERO);
    }

    #[test]
    fn ignores_fill_toggles_knockout() {
        let s = ShadowStyle::drop(1.0).ignores_fill(true, true);
        assert!(s.kind.contains(ShadowKind::REQUIRES_KNOCKOUT));
        let s = s.ignores_fill(true, false);
        assert!(s.kind.contains(ShadowKind::IGNORES_FILL));
        assert!(!s.kind.contains(ShadowKind::REQUIRES_KNOCKOUT));
        assert!(s.ignores_fill(false, true).kind.is_empty());
    }

    #[test]
    fn shadow_effect_inherits_opacity() {
        let env = Environment::default();
        let style = Color::RED.opacity(0.5).shadow(ShadowStyle::drop(2.0));
        let pack = resolve(&style, &env, Name::Foreground, 0..1);
        let resolved = pack.get(Name::Foreground, 0);
        assert_eq!(resolved.opacity, 0.5);
        assert_eq!(resolved.effects.len(), 1);
        assert_eq!(resolved.effects[0].opacity, 0.5);
        assert!(matches!(resolved.effects[0].kind, EffectKind::Shadow(_)));
        assert_eq!(resolved.color(), None, "effects disqualify a plain color");
    }
}
