// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Blurred backdrop materials.

use bitflags::bitflags;

use super::{Color, Fill, Operation, ShapeRequest, ShapeResult, ShapeStyle, Style};
use crate::environment::{ColorScheme, ColorSchemeContrast, Environment};

/// The thickness of a blurred backdrop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MaterialId {
    /// Mostly translucent.
    UltraThin,
    /// More translucent than opaque.
    Thin,
    /// Balanced.
    Regular,
    /// More opaque than translucent.
    Thick,
    /// Mostly opaque.
    UltraThick,
    /// The material of system bars.
    Bars,
}

bitflags! {
    /// Environment facts baked into a resolved material.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MaterialFlags: u32 {
        /// Resolved for a dark appearance.
        const DARK_COLOR_SCHEME = 1 << 0;
        /// Translucency replaced with a solid fill.
        const REDUCE_TRANSPARENCY = 1 << 1;
        /// Resolved for increased contrast.
        const INCREASED_CONTRAST = 1 << 2;
        /// The window is active.
        const IS_ACTIVE = 1 << 4;
        /// No blur is applied.
        const NO_BLUR = 1 << 5;
        /// Emphasized variant.
        const IS_EMPHASIZED = 1 << 6;
    }
}

impl MaterialFlags {
    /// Returns the flags that `environment` implies.
    #[must_use]
    pub fn from_environment(environment: &Environment) -> Self {
        let mut flags = Self::empty();
        flags.set(
            Self::DARK_COLOR_SCHEME,
            environment.color_scheme == ColorScheme::Dark,
        );
        flags.set(Self::REDUCE_TRANSPARENCY, environment.reduce_transparency);
        flags.set(
            Self::INCREASED_CONTRAST,
            environment.contrast == ColorSchemeContrast::Increased,
        );
        flags
    }
}

/// A blurred, translucent backdrop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Material {
    id: MaterialId,
    flags: MaterialFlags,
}

impl Material {
    /// Mostly translucent.
    pub const ULTRA_THIN: Self = Self::new(MaterialId::UltraThin);
    /// More translucent than opaque.
    pub const THIN: Self = Self::new(MaterialId::Thin);
    /// Balanced.
    pub const REGULAR: Self = Self::new(MaterialId::Regular);
    /// More opaque than translucent.
    pub const THICK: Self = Self::new(MaterialId::Thick);
    /// Mostly opaque.
    pub const ULTRA_THICK: Self = Self::new(MaterialId::UltraThick);
    /// The material of system bars.
    pub const BAR: Self = Self::new(MaterialId::Bars);

    /// Creates a material with no extra flags.
    #[must_use]
    pub const fn new(id: MaterialId) -> Self {
        Self {
            id,
            flags: MaterialFlags::empty(),
        }
    }

    /// Adds flags that apply regardless of environment.
    #[must_use]
    pub fn with_flags(mut self, flags: MaterialFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Fixes the material for `environment`.
    #[must_use]
    pub fn resolve(&self, environment: &Environment) -> ResolvedMaterial {
        ResolvedMaterial {
            id: self.id,
            flags: MaterialFlags::from_environment(environment) | self.flags,
        }
    }
}

/// A material with its environment flags fixed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ResolvedMaterial {
    /// Thickness.
    pub id: MaterialId,
    /// Environment flags.
    pub flags: MaterialFlags,
}

impl ResolvedMaterial {
    /// Returns the appearance the material was resolved for.
    #[must_use]
    pub fn color_scheme(&self) -> ColorScheme {
        if self.flags.contains(MaterialFlags::DARK_COLOR_SCHEME) {
            ColorScheme::Dark
        } else {
            ColorScheme::Light
        }
    }

    /// Returns whether this is the emphasized variant.
    #[must_use]
    pub fn is_emphasized(&self) -> bool {
        self.flags.contains(MaterialFlags::IS_EMPHASIZED)
    }

    /// A solid color approximating the material, used where blurring is
    /// unavailable or transparency is reduced.
    #[must_use]
    pub fn fallback_color(&self) -> Color {
        let opacity = match self.id {
            MaterialId::UltraThin => 0.35,
            MaterialId::Thin => 0.5,
            MaterialId::Regular | MaterialId::Bars => 0.7,
            MaterialId::Thick => 0.85,
            MaterialId::UltraThick => 0.95,
        };
        let opacity = if self.flags.contains(MaterialFlags::REDUCE_TRANSPARENCY) {
            1.0
        } else {
            opacity
        };
        match self.color_scheme() {
            ColorScheme::Light => Color::white(0.96, opacity),
            ColorScheme::Dark => Color::white(0.12, opacity),
        }
    }
}

impl ShapeStyle for Material {
    fn apply(&self, request: &mut ShapeRequest<'_>) {
        match request.operation.clone() {
            Operation::ResolveStyle { name, levels } => {
                let resolved = self.resolve(request.environment);
                let style = Style::new(Fill::BackgroundMaterial(resolved));
                request.resolve_leveled(name, levels, style);
            }
            Operation::FallbackColor { .. } => {
                let color = self.resolve(request.environment).fallback_color();
                request.result = ShapeResult::Color(color);
            }
            Operation::ModifyBackground { .. } => request.result = ShapeResult::Bool(true),
            Operation::CopyStyle { .. } => request.copy_of(*self),
            Operation::PrepareText { .. } | Operation::MultiLevel | Operation::PrimaryStyle => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape_style::{Name, fallback_color, modifies_background, resolve};

    #[test]
    fn environment_flags_are_baked_in() {
        let env = Environment {
            color_scheme: ColorScheme::Dark,
            reduce_transparency: true,
            ..Environment::default()
        };
        let resolved = Material::THIN
            .with_flags(MaterialFlags::IS_EMPHASIZED)
            .resolve(&env);
        assert_eq!(resolved.color_scheme(), ColorScheme::Dark);
        assert!(resolved.is_emphasized());
        assert_eq!(resolved.fallback_color().alpha(), 1.0);
    }

    #[test]
    fn material_resolves_to_a_backdrop_fill() {
        let env = Environment::default();
        let pack = resolve(&Material::REGULAR, &env, Name::Background, 0..1);
        assert!(matches!(
            pack.get(Name::Background, 0).fill,
            Fill::BackgroundMaterial(ResolvedMaterial {
                id: MaterialId::Regular,
                ..
            })
        ));
        assert!(modifies_background(&Material::REGULAR, &env, 0));
        assert!(!modifies_background(&Color::RED, &env, 0));
        let fallback = fallback_color(&Material::REGULAR, &env, 0);
        assert_eq!(fallback.map(Color::alpha), Some(0.7));
    }
}
