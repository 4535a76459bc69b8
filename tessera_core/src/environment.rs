// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Values inherited down the view tree.

use crate::geometry::LayoutDirection;
use crate::shape_style::{AnyShapeStyle, Color};

/// Light or dark appearance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorScheme {
    /// Dark content on light backgrounds.
    #[default]
    Light,
    /// Light content on dark backgrounds.
    Dark,
}

/// Whether the user asked for stronger contrast.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorSchemeContrast {
    /// The standard palette.
    #[default]
    Standard,
    /// A higher-contrast palette.
    Increased,
}

/// Opacities of hierarchy levels 1 through 4; level 0 is opaque and deeper
/// levels reuse the last entry.
const LEVEL_OPACITIES: [f32; 4] = [0.5, 0.25, 0.18, 0.1];
const LEVEL_OPACITIES_INCREASED: [f32; 4] = [0.7, 0.45, 0.35, 0.25];

/// The environment a subtree is built and resolved in.
///
/// Every field has a default, and the whole value is compared by equality
/// when it is stored in the graph, so changing any field invalidates the
/// subtrees that read it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Environment {
    /// Appearance.
    pub color_scheme: ColorScheme,
    /// Contrast preference.
    pub contrast: ColorSchemeContrast,
    /// Whether translucent materials should be replaced with solid fills.
    pub reduce_transparency: bool,
    /// Reading direction.
    pub layout_direction: LayoutDirection,
    /// The style that `ForegroundStyle` stands for, if overridden.
    pub foreground_style: Option<AnyShapeStyle>,
    /// The style that `BackgroundStyle` stands for, if overridden.
    pub background_style: Option<AnyShapeStyle>,
}

impl Environment {
    /// Returns the opacity that hierarchy `level` applies to a single-level
    /// style: 1 for the primary level, decreasing from there.
    #[must_use]
    pub fn hierarchy_opacity(&self, level: usize) -> f32 {
        let table = match self.contrast {
            ColorSchemeContrast::Standard => &LEVEL_OPACITIES,
            ColorSchemeContrast::Increased => &LEVEL_OPACITIES_INCREASED,
        };
        match level {
            0 => 1.0,
            n => table[(n - 1).min(table.len() - 1)],
        }
    }

    /// The primary color used when no foreground style is set.
    #[must_use]
    pub fn default_foreground(&self) -> Color {
        match self.color_scheme {
            ColorScheme::Light => Color::BLACK,
            ColorScheme::Dark => Color::WHITE,
        }
    }

    /// The color used when no background style is set.
    #[must_use]
    pub fn default_background(&self) -> Color {
        match self.color_scheme {
            ColorScheme::Light => Color::WHITE,
            ColorScheme::Dark => Color::BLACK,
        }
    }

    /// Returns a copy with the foreground style replaced.
    #[must_use]
    pub fn with_foreground(&self, style: AnyShapeStyle) -> Self {
        Self {
            foreground_style: Some(style),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_fade_and_saturate() {
        let env = Environment::default();
        assert_eq!(env.hierarchy_opacity(0), 1.0);
        assert!(env.hierarchy_opacity(1) > env.hierarchy_opacity(2));
        assert_eq!(env.hierarchy_opacity(4), env.hierarchy_opacity(40));
        let contrast = Environment {
            contrast: ColorSchemeContrast::Increased,
            ..Environment::default()
        };
        assert!(contrast.hierarchy_opacity(1) > env.hierarchy_opacity(1));
    }

    #[test]
    fn defaults_follow_the_color_scheme() {
        let dark = Environment {
            color_scheme: ColorScheme::Dark,
            ..Environment::default()
        };
        assert_eq!(dark.default_foreground(), Color::WHITE);
        assert_eq!(Environment::default().default_foreground(), Color::BLACK);
    }
}
