// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Styles built from several styles.

use super::{AnyShapeStyle, Operation, ShapeRequest, ShapeResult, ShapeStyle};

/// A primary style and a secondary style.
///
/// Level 0 comes from the first style and level 1 from the second, each
/// queried at its own level 0.
#[derive(Clone, Debug, PartialEq)]
pub struct PairShapeStyle<A, B> {
    first: A,
    second: B,
}

impl<A, B> PairShapeStyle<A, B> {
    /// Pairs two styles.
    #[must_use]
    pub const fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A, B> ShapeStyle for PairShapeStyle<A, B>
where
    A: ShapeStyle + Clone + PartialEq,
    B: ShapeStyle + Clone + PartialEq,
{
    fn apply(&self, request: &mut ShapeRequest<'_>) {
        let parts: [&dyn ShapeStyle; 2] = [&self.first, &self.second];
        apply_parts(&parts, request);
    }
}

/// Primary, secondary, and tertiary styles.
#[derive(Clone, Debug, PartialEq)]
pub struct TripleShapeStyle<A, B, C> {
    first: A,
    second: B,
    third: C,
}

impl<A, B, C> TripleShapeStyle<A, B, C> {
    /// Combines three styles.
    #[must_use]
    pub const fn new(first: A, second: B, third: C) -> Self {
        Self {
            first,
            second,
            third,
        }
    }
}

impl<A, B, C> ShapeStyle for TripleShapeStyle<A, B, C>
where
    A: ShapeStyle + Clone + PartialEq,
    B: ShapeStyle + Clone + PartialEq,
    C: ShapeStyle + Clone + PartialEq,
{
    fn apply(&self, request: &mut ShapeRequest<'_>) {
        let parts: [&dyn ShapeStyle; 3] = [&self.first, &self.second, &self.third];
        apply_parts(&parts, request);
    }
}

/// Dispatches a request across the parts of a multi-level style.
///
/// Part `i` provides level `i`; levels past the last part come from the last
/// part. A level range is resolved one part at a time, last part first,
/// with each part's result moved to the level it stands for.
fn apply_parts(parts: &[&dyn ShapeStyle], request: &mut ShapeRequest<'_>) {
    let last = parts.len() - 1;
    let part_for = |level: usize| parts[level.min(last)];
    match request.operation.clone() {
        Operation::ResolveStyle { name, levels } => {
            if levels.is_empty() {
                return;
            }
            for index in (0..parts.len()).rev() {
                let wanted = if index == last {
                    levels.end > index
                } else {
                    levels.start <= index && levels.end > index
                };
                if wanted {
                    let at = levels.start.max(index);
                    request.resolve_part(parts[index], name, 0..1, at.cast_signed());
                }
            }
        }
        Operation::PrepareText { level } => {
            request.apply_with(part_for(level), Operation::PrepareText { level: 0 });
        }
        Operation::FallbackColor { level } => {
            request.apply_with(part_for(level), Operation::FallbackColor { level: 0 });
        }
        Operation::ModifyBackground { level } => {
            request.apply_with(part_for(level), Operation::ModifyBackground { level: 0 });
        }
        Operation::MultiLevel => request.result = ShapeResult::Bool(true),
        Operation::CopyStyle { .. } | Operation::PrimaryStyle => {}
    }
}

/// A style partway between two others.
///
/// At `progress` 0 it is exactly `from` and at 1 exactly `to`; the other
/// side is not even resolved. In between, color fills blend component-wise
/// and anything else switches at the midpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct InterpolatedShapeStyle {
    from: AnyShapeStyle,
    to: AnyShapeStyle,
    progress: f32,
}

impl InterpolatedShapeStyle {
    /// Blends `from` toward `to` by `progress`, clamped to `0..=1`.
    #[must_use]
    pub fn new(from: AnyShapeStyle, to: AnyShapeStyle, progress: f32) -> Self {
        Self {
            from,
            to,
            progress: progress.clamp(0.0, 1.0),
        }
    }

    /// Returns the blend progress.
    #[must_use]
    pub const fn progress(&self) -> f32 {
        self.progress
    }

    fn nearer(&self) -> &AnyShapeStyle {
        if self.progress < 0.5 { &self.from } else { &self.to }
    }
}

impl ShapeStyle for InterpolatedShapeStyle {
    fn apply(&self, request: &mut ShapeRequest<'_>) {
        if self.progress <= 0.0 {
            return self.from.apply(request);
        }
        if self.progress >= 1.0 {
            return self.to.apply(request);
        }
        match request.operation.clone() {
            Operation::ResolveStyle { name, levels } => {
                let from = request.resolved_part(&self.from, name, levels.clone());
                let to = request.resolved_part(&self.to, name, levels);
                request.pack_mut().merge(from.mix(&to, name, self.progress));
            }
            Operation::FallbackColor { .. } => {
                let from = request.answer(&self.from);
                let to = request.answer(&self.to);
                match (from, to) {
                    (ShapeResult::Color(a), ShapeResult::Color(b)) => {
                        request.result = ShapeResult::Color(a.mix(b, self.progress));
                    }
                    _ => self.nearer().apply(request),
                }
            }
            _ => self.nearer().apply(request),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Environment;
    use crate::shape_style::{
        Color, Fill, Name, PreparedText, ShapeStyleExt, fallback_color, is_multi_level,
        prepare_text, resolve,
    };

    fn sample_triple() -> TripleShapeStyle<Color, Color, Color> {
        TripleShapeStyle::new(Color::RED, Color::GREEN, Color::BLUE)
    }

    #[test]
    fn triple_fills_each_level_from_its_part() {
        let env = Environment::default();
        let pack = resolve(&sample_triple(), &env, Name::Foreground, 0..3);
        let colors: alloc::vec::Vec<_> = pack
            .slice(Name::Foreground)
            .iter()
            .map(|s| s.color())
            .collect();
        assert_eq!(
            colors,
            alloc::vec![Some(Color::RED), Some(Color::GREEN), Some(Color::BLUE)]
        );
    }

    #[test]
    fn levels_past_the_end_use_the_last_part() {
        let env = Environment::default();
        let pair = PairShapeStyle::new(Color::RED, Color::BLUE);
        let pack = resolve(&pair, &env, Name::Foreground, 3..4);
        assert_eq!(pack.get(Name::Foreground, 3).color(), Some(Color::BLUE));
        assert_eq!(fallback_color(&pair, &env, 7), Some(Color::BLUE));
        assert_eq!(
            prepare_text(&sample_triple(), &env, 1),
            Some(PreparedText::Resolved(Color::GREEN))
        );
    }

    #[test]
    fn composites_are_multi_level() {
        let env = Environment::default();
        assert!(is_multi_level(&sample_triple(), &env));
        assert!(is_multi_level(&sample_triple().opacity(0.5), &env));
    }

    fn red_to_blue(progress: f32) -> InterpolatedShapeStyle {
        InterpolatedShapeStyle::new(Color::RED.erased(), Color::BLUE.erased(), progress)
    }

    #[test]
    fn interpolation_is_exact_at_the_ends() {
        let env = Environment::default();
        let at = |progress| resolve(&red_to_blue(progress), &env, Name::Foreground, 0..1);
        assert_eq!(at(0.0), resolve(&Color::RED, &env, Name::Foreground, 0..1));
        assert_eq!(at(1.0), resolve(&Color::BLUE, &env, Name::Foreground, 0..1));

        let Fill::Color(mid) = at(0.5).get(Name::Foreground, 0).fill.clone() else {
            panic!("color fills blend to a color");
        };
        assert!(mid.r > 0.0 && mid.r < 1.0, "red strictly between: {mid:?}");
        assert!(mid.b > 0.0 && mid.b < 1.0, "blue strictly between: {mid:?}");
        assert_eq!(mid.g, 0.0);
    }

    #[test]
    fn interpolated_fallback_blends() {
        let env = Environment::default();
        let color = fallback_color(&red_to_blue(0.25), &env, 0);
        assert_eq!(color, Some(Color::RED.mix(Color::BLUE, 0.25)));
    }
}
