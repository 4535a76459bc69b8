// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resolved styles keyed by name and level.

use alloc::vec::Vec;
use core::ops::Range;

use super::{BlendMode, Color, ResolvedMaterial, ResolvedShadow};
use crate::environment::Environment;

/// Which slot of a view's styling a resolved style fills.
///
/// The order is the storage order inside a [`Pack`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Name {
    /// Content drawn on top: text, symbols, shape fills.
    Foreground,
    /// The fill behind content.
    Background,
    /// Named colors of a multicolor symbol.
    Multicolor,
}

impl Name {
    /// All names, in storage order.
    pub const ALL: [Self; 3] = [Self::Foreground, Self::Background, Self::Multicolor];
}

/// The key of one entry in a [`Pack`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key {
    /// The slot.
    pub name: Name,
    level: u8,
}

impl Key {
    /// Creates a key. Levels past 255 saturate.
    #[must_use]
    pub fn new(name: Name, level: usize) -> Self {
        Self {
            name,
            level: u8::try_from(level).unwrap_or(u8::MAX),
        }
    }

    /// Returns the hierarchy level: 0 is primary, 1 secondary, and so on.
    #[must_use]
    pub fn level(self) -> usize {
        usize::from(self.level)
    }
}

/// What paints a resolved style.
#[derive(Clone, Debug, PartialEq)]
pub enum Fill {
    /// A solid color.
    Color(Color),
    /// A blurred backdrop.
    BackgroundMaterial(ResolvedMaterial),
}

/// The kind of a secondary [`Effect`].
#[derive(Clone, Debug, PartialEq)]
pub enum EffectKind {
    /// No effect; kept so opacity and blend still apply.
    None,
    /// A drop or inner shadow.
    Shadow(ResolvedShadow),
}

/// An effect drawn along with a style's fill.
#[derive(Clone, Debug, PartialEq)]
pub struct Effect {
    /// What to draw.
    pub kind: EffectKind,
    /// Opacity multiplier for the effect alone.
    pub opacity: f32,
    blend: Option<BlendMode>,
}

impl Effect {
    /// Creates an effect with full opacity and no explicit blend.
    #[must_use]
    pub fn new(kind: EffectKind) -> Self {
        Self {
            kind,
            opacity: 1.0,
            blend: None,
        }
    }

    /// Returns the blend mode, defaulting to [`BlendMode::Normal`].
    #[must_use]
    pub fn blend(&self) -> BlendMode {
        self.blend.unwrap_or_default()
    }
}

/// One resolved style: a fill, its opacity and blend, and any effects.
#[derive(Clone, Debug, PartialEq)]
pub struct Style {
    /// What paints the shape.
    pub fill: Fill,
    /// Opacity multiplier for the fill.
    pub opacity: f32,
    blend: Option<BlendMode>,
    /// Effects drawn with the fill.
    pub effects: Vec<Effect>,
}

impl Style {
    /// The style returned for missing entries.
    pub const CLEAR: Self = Self::new(Fill::Color(Color::CLEAR));

    /// Wraps a fill with full opacity.
    #[must_use]
    pub const fn new(fill: Fill) -> Self {
        Self {
            fill,
            opacity: 1.0,
            blend: None,
            effects: Vec::new(),
        }
    }

    /// Returns the blend mode, defaulting to [`BlendMode::Normal`].
    #[must_use]
    pub fn blend(&self) -> BlendMode {
        self.blend.unwrap_or_default()
    }

    /// Returns whether nothing visible would be drawn.
    #[must_use]
    pub fn is_clear(&self) -> bool {
        if self.opacity == 0.0 {
            return true;
        }
        match &self.fill {
            Fill::Color(color) if color.alpha() == 0.0 => {}
            _ => return false,
        }
        self.effects.iter().all(|effect| match effect.kind {
            EffectKind::None => true,
            EffectKind::Shadow(_) => effect.opacity == 0.0,
        })
    }

    /// Returns whether drawing this style fully hides what is behind it.
    #[must_use]
    pub fn ignores_backdrop(&self) -> bool {
        self.opacity == 1.0
            && self.blend() == BlendMode::Normal
            && matches!(self.fill, Fill::Color(color) if color.alpha() == 1.0)
    }

    /// Multiplies the fill's and every effect's opacity by `opacity`.
    pub fn apply_opacity(&mut self, opacity: f32) {
        self.opacity *= opacity;
        for effect in &mut self.effects {
            effect.opacity *= opacity;
        }
    }

    /// Returns a copy with [`apply_opacity`](Self::apply_opacity) applied.
    #[must_use]
    pub fn applying_opacity(&self, opacity: f32) -> Self {
        let mut copy = self.clone();
        copy.apply_opacity(opacity);
        copy
    }

    /// Sets the blend mode of the fill and of every effect.
    pub fn apply_blend(&mut self, blend: BlendMode) {
        self.blend = Some(blend);
        for effect in &mut self.effects {
            effect.blend = Some(blend);
        }
    }

    /// Adds a shadow effect inheriting this style's opacity and blend.
    pub fn push_shadow(&mut self, shadow: ResolvedShadow) {
        self.effects.push(Effect {
            kind: EffectKind::Shadow(shadow),
            opacity: self.opacity,
            blend: self.blend,
        });
    }

    /// Returns the plain color this style draws, if it is nothing more.
    #[must_use]
    pub fn color(&self) -> Option<Color> {
        match self.fill {
            Fill::Color(color) if self.blend() == BlendMode::Normal && self.effects.is_empty() => {
                Some(color)
            }
            _ => None,
        }
    }

    /// Blends toward `other` by `t`.
    ///
    /// Two color fills blend component-wise. Anything else switches over at
    /// the midpoint.
    #[must_use]
    pub fn mix(&self, other: &Self, t: f32) -> Self {
        if t <= 0.0 {
            return self.clone();
        }
        if t >= 1.0 {
            return other.clone();
        }
        let nearer = if t < 0.5 { self } else { other };
        match (&self.fill, &other.fill) {
            (Fill::Color(a), Fill::Color(b)) => Self {
                fill: Fill::Color(a.mix(*b, t)),
                opacity: self.opacity + (other.opacity - self.opacity) * t,
                blend: nearer.blend,
                effects: nearer.effects.clone(),
            },
            _ => nearer.clone(),
        }
    }
}

static CLEAR: Style = Style::CLEAR;

/// A set of resolved styles keyed by [`Name`] and level.
///
/// Entries are kept sorted by key, so the entries of one name are
/// contiguous and ordered by level. Looking up an absent entry yields
/// [`Style::CLEAR`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Pack {
    styles: Vec<(Key, Style)>,
}

impl Pack {
    /// Creates an empty pack.
    #[must_use]
    pub const fn new() -> Self {
        Self { styles: Vec::new() }
    }

    /// Creates a pack holding one style.
    #[must_use]
    pub fn style(style: Style, name: Name, level: usize) -> Self {
        let mut pack = Self::new();
        pack.set(name, level, style);
        pack
    }

    /// Creates a pack holding one fill.
    #[must_use]
    pub fn fill(fill: Fill, name: Name, level: usize) -> Self {
        Self::style(Style::new(fill), name, level)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Returns whether the pack has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    fn search(&self, key: Key) -> Result<usize, usize> {
        self.styles.binary_search_by(|(k, _)| k.cmp(&key))
    }

    /// Returns the style at `(name, level)`, or [`Style::CLEAR`].
    #[must_use]
    pub fn get(&self, name: Name, level: usize) -> &Style {
        match self.search(Key::new(name, level)) {
            Ok(index) => &self.styles[index].1,
            Err(_) => &CLEAR,
        }
    }

    /// Returns whether an entry exists at `(name, level)`.
    #[must_use]
    pub fn contains(&self, name: Name, level: usize) -> bool {
        self.search(Key::new(name, level)).is_ok()
    }

    /// Stores `style` at `(name, level)`, replacing any previous entry.
    pub fn set(&mut self, name: Name, level: usize, style: Style) {
        let key = Key::new(name, level);
        match self.search(key) {
            Ok(index) => self.styles[index].1 = style,
            Err(index) => self.styles.insert(index, (key, style)),
        }
    }

    /// Copies every entry of `other` into this pack.
    pub fn merge(&mut self, other: Self) {
        for (key, style) in other.styles {
            self.set(key.name, key.level(), style);
        }
    }

    /// Returns the entry positions holding `name`.
    ///
    /// When no entry has `name`, the empty range sits where one would be
    /// inserted.
    #[must_use]
    pub fn indices(&self, name: Name) -> Range<usize> {
        let start = self.styles.partition_point(|(k, _)| k.name < name);
        let end = self.styles.partition_point(|(k, _)| k.name <= name);
        start..end
    }

    /// Returns the entries of `name`.
    #[must_use]
    pub fn slice(&self, name: Name) -> Slice<'_> {
        let entries = &self.styles[self.indices(name)];
        Slice {
            base_level: entries.first().map_or(0, |(k, _)| k.level()),
            entries,
        }
    }

    /// Runs `modifier` on each entry of `name` whose level is in `levels`.
    pub fn modify(
        &mut self,
        name: Name,
        levels: Range<usize>,
        mut modifier: impl FnMut(&mut Style),
    ) {
        let range = self.indices(name);
        for (key, style) in &mut self.styles[range] {
            if levels.contains(&key.level()) {
                modifier(style);
            }
        }
    }

    /// Shifts the level of every entry of `name` by `offset`, dropping
    /// entries that would go below level 0.
    pub fn adjust_level_indices(&mut self, name: Name, offset: isize) {
        if offset == 0 {
            return;
        }
        let range = self.indices(name);
        let shifted: Vec<_> = self
            .styles
            .drain(range.clone())
            .filter_map(|(key, style)| {
                let level = key.level().checked_add_signed(offset)?;
                Some((Key::new(name, level), style))
            })
            .collect();
        self.styles.splice(range.start..range.start, shifted);
    }

    /// Expands a single entry of `name` into `count` levels.
    ///
    /// Level `i` copies the base entry with its opacity, and its effects'
    /// opacities, scaled by the environment's opacity for that level. Does
    /// nothing unless `name` has exactly one entry and `count >= 2`.
    pub fn create_opacities(&mut self, count: usize, name: Name, environment: &Environment) {
        let range = self.indices(name);
        if range.len() != 1 || count < 2 {
            return;
        }
        let (key, base) = self.styles[range.start].clone();
        let extra: Vec<_> = (1..count)
            .map(|i| {
                let factor = environment.hierarchy_opacity(i);
                (Key::new(name, key.level() + i), base.applying_opacity(factor))
            })
            .collect();
        let at = range.end;
        self.styles.splice(at..at, extra);
    }

    /// Drops entries of `name` outside `levels`.
    pub fn retain_levels(&mut self, name: Name, levels: Range<usize>) {
        self.styles
            .retain(|(key, _)| key.name != name || levels.contains(&key.level()));
    }

    /// Returns whether every entry of `name` is clear.
    #[must_use]
    pub fn is_clear(&self, name: Name) -> bool {
        self.slice(name).iter().all(Style::is_clear)
    }

    /// Blends the entries of `name` toward `other`'s by `t`.
    ///
    /// Levels present on only one side blend with [`Style::CLEAR`].
    #[must_use]
    pub fn mix(&self, other: &Self, name: Name, t: f32) -> Self {
        let mut levels: Vec<usize> = self
            .slice(name)
            .levels()
            .chain(other.slice(name).levels())
            .collect();
        levels.sort_unstable();
        levels.dedup();
        let mut pack = Self::new();
        for level in levels {
            let mixed = self.get(name, level).mix(other.get(name, level), t);
            pack.set(name, level, mixed);
        }
        pack
    }
}

/// The entries of one [`Name`] in a [`Pack`], ordered by level.
#[derive(Clone, Copy, Debug)]
pub struct Slice<'a> {
    entries: &'a [(Key, Style)],
    base_level: usize,
}

impl<'a> Slice<'a> {
    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the slice has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the lowest level present.
    #[must_use]
    pub fn base_level(&self) -> usize {
        self.base_level
    }

    /// Returns the entry at `level`, if present.
    #[must_use]
    pub fn get(&self, level: usize) -> Option<&'a Style> {
        self.entries
            .iter()
            .find(|(key, _)| key.level() == level)
            .map(|(_, style)| style)
    }

    /// Iterates over the styles in level order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Style> + 'a {
        self.entries.iter().map(|(_, style)| style)
    }

    /// Iterates over the levels present.
    pub fn levels(&self) -> impl Iterator<Item = usize> + 'a {
        self.entries.iter().map(|(key, _)| key.level())
    }

    /// Returns whether every entry is a plain color with normal blending
    /// and no effects.
    #[must_use]
    pub fn all_colors(&self) -> bool {
        self.iter().all(|style| style.color().is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn color(c: Color) -> Style {
        Style::new(Fill::Color(c))
    }

    fn sample_pack() -> Pack {
        let mut pack = Pack::new();
        pack.set(Name::Background, 0, color(Color::WHITE));
        pack.set(Name::Foreground, 1, color(Color::BLUE));
        pack.set(Name::Foreground, 0, color(Color::RED));
        pack
    }

    #[test]
    fn entries_stay_sorted_by_name_then_level() {
        let pack = sample_pack();
        assert_eq!(pack.indices(Name::Foreground), 0..2);
        assert_eq!(pack.indices(Name::Background), 2..3);
        assert_eq!(pack.indices(Name::Multicolor), 3..3);
        let levels: Vec<_> = pack.slice(Name::Foreground).levels().collect();
        assert_eq!(levels, alloc::vec![0, 1]);
    }

    #[test]
    fn adjust_shifts_and_drops_negative_levels() {
        let mut pack = sample_pack();
        pack.adjust_level_indices(Name::Foreground, 2);
        assert!(pack.contains(Name::Foreground, 2));
        assert!(pack.contains(Name::Foreground, 3));
        assert!(pack.contains(Name::Background, 0), "other names untouched");
        pack.adjust_level_indices(Name::Foreground, -3);
        assert_eq!(pack.slice(Name::Foreground).len(), 1);
        assert_eq!(pack.get(Name::Foreground, 0), &color(Color::BLUE));
    }

    #[test]
    fn modify_only_touches_levels_in_range() {
        let mut pack = sample_pack();
        pack.modify(Name::Foreground, 1..2, |s| s.apply_opacity(0.5));
        assert_eq!(pack.get(Name::Foreground, 0).opacity, 1.0);
        assert_eq!(pack.get(Name::Foreground, 1).opacity, 0.5);
        assert_eq!(pack.get(Name::Background, 0).opacity, 1.0);
    }

    #[test]
    fn create_opacities_scales_fill_and_effects() {
        let env = Environment::default();
        let mut base = color(Color::RED);
        base.push_shadow(ResolvedShadow::default());
        let mut pack = Pack::style(base, Name::Foreground, 0);
        pack.create_opacities(3, Name::Foreground, &env);
        assert_eq!(pack.slice(Name::Foreground).len(), 3);
        let secondary = pack.get(Name::Foreground, 1);
        assert_eq!(secondary.opacity, env.hierarchy_opacity(1));
        assert_eq!(secondary.effects[0].opacity, env.hierarchy_opacity(1));

        // Only a single base entry expands.
        let before = pack.clone();
        pack.create_opacities(5, Name::Foreground, &env);
        assert_eq!(pack, before);
    }

    #[test]
    fn all_colors_rejects_blends_and_effects() {
        let mut pack = sample_pack();
        assert!(pack.slice(Name::Foreground).all_colors());
        pack.modify(Name::Foreground, 0..1, |s| s.apply_blend(BlendMode::Multiply));
        assert!(!pack.slice(Name::Foreground).all_colors());
        assert!(pack.slice(Name::Multicolor).all_colors(), "vacuously");
    }

    #[test]
    fn clear_detection() {
        assert!(Style::CLEAR.is_clear());
        assert!(color(Color::RED).applying_opacity(0.0).is_clear());
        assert!(!color(Color::RED).is_clear());
        assert!(Pack::new().is_clear(Name::Foreground));
        assert!(color(Color::RED).ignores_backdrop());
    }

    fn any_name() -> impl Strategy<Value = Name> {
        prop_oneof![
            Just(Name::Foreground),
            Just(Name::Background),
            Just(Name::Multicolor)
        ]
    }

    proptest! {
        #[test]
        fn missing_entries_are_clear(
            present in proptest::collection::vec((any_name(), 0_usize..4), 0..6),
            name in any_name(),
            level in 0_usize..300,
        ) {
            let mut pack = Pack::new();
            for (n, l) in &present {
                pack.set(*n, *l, color(Color::RED));
            }
            prop_assume!(!present.contains(&(name, level)));
            prop_assert_eq!(pack.get(name, level), &Style::CLEAR);
        }
    }
}
