// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Colors and blend modes.

use core::fmt;

use super::{Fill, Operation, PreparedText, ShapeRequest, ShapeResult, ShapeStyle, Style};

/// A color with linear RGB components and straight alpha, each in `0..=1`.
#[derive(Clone, Copy, Default, PartialEq)]
pub struct Color {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Color {
    /// Fully transparent black.
    pub const CLEAR: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Opaque red.
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    /// Opaque green.
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    /// Opaque blue.
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);

    /// Creates an opaque color.
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Creates a color.
    #[must_use]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a gray.
    #[must_use]
    pub const fn white(white: f32, opacity: f32) -> Self {
        Self::rgba(white, white, white, opacity)
    }

    /// Returns the alpha.
    #[must_use]
    pub const fn alpha(self) -> f32 {
        self.a
    }

    /// Returns this color with its alpha multiplied by `opacity`.
    #[must_use]
    pub fn with_opacity(self, opacity: f32) -> Self {
        Self {
            a: self.a * opacity,
            ..self
        }
    }

    /// Linearly interpolates each component toward `other`.
    ///
    /// `t == 0.0` returns `self` and `t == 1.0` returns `other`, exactly.
    #[must_use]
    pub fn mix(self, other: Self, t: f32) -> Self {
        if t <= 0.0 {
            return self;
        }
        if t >= 1.0 {
            return other;
        }
        let lerp = |a: f32, b: f32| a + (b - a) * t;
        Self {
            r: lerp(self.r, other.r),
            g: lerp(self.g, other.g),
            b: lerp(self.b, other.b),
            a: lerp(self.a, other.a),
        }
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color({} {} {} / {})", self.r, self.g, self.b, self.a)
    }
}

impl ShapeStyle for Color {
    fn apply(&self, request: &mut ShapeRequest<'_>) {
        match request.operation.clone() {
            Operation::PrepareText { level } => {
                let opacity = request.environment.hierarchy_opacity(level);
                request.result = ShapeResult::PreparedText(PreparedText::Resolved(
                    self.with_opacity(opacity),
                ));
            }
            Operation::ResolveStyle { name, levels } => {
                request.resolve_leveled(name, levels, Style::new(Fill::Color(*self)));
            }
            Operation::FallbackColor { level } => {
                let opacity = request.environment.hierarchy_opacity(level);
                request.result = ShapeResult::Color(self.with_opacity(opacity));
            }
            Operation::CopyStyle { .. } => request.copy_of(*self),
            Operation::MultiLevel
            | Operation::PrimaryStyle
            | Operation::ModifyBackground { .. } => {}
        }
    }
}

/// How a fill composites with what is behind it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlendMode {
    /// Source over.
    #[default]
    Normal,
    /// Multiply.
    Multiply,
    /// Screen.
    Screen,
    /// Overlay.
    Overlay,
    /// Darken.
    Darken,
    /// Lighten.
    Lighten,
    /// Difference.
    Difference,
    /// Plus lighter.
    PlusLighter,
}
