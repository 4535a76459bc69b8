// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shape styles and their resolution into concrete paint.
//!
//! A [`ShapeStyle`] is a description (a color, a material, "the current
//! foreground", a pair of styles, a faded style, ...) that is turned into
//! paint only when asked. Each question is a [`ShapeRequest`] carrying one
//! [`Operation`]; the answer is a [`ShapeResult`]. The most common question
//! is [`Operation::ResolveStyle`], whose answer is a [`Pack`] of resolved
//! [`Style`]s keyed by [`Name`] and hierarchy level:
//!
//! ```text
//!   OpacityShapeStyle(PairShapeStyle(red, blue), 0.5)
//!        │ ResolveStyle { Foreground, 0..2 }
//!        ▼
//!   PairShapeStyle ── level 1 ──► blue @ 0..1 ──► shift +1
//!        └──────────── level 0 ──► red  @ 0..1
//!        │
//!        ▼
//!   Pack { (Foreground, 0): red × 0.5, (Foreground, 1): blue × 0.5 }
//! ```
//!
//! Resolution is a pure function of the style, the
//! [`Environment`](crate::environment::Environment) and the operation.
//! Operations a style cannot answer leave the result empty, and the helpers
//! here map an empty result to a neutral default: an empty pack (every
//! lookup clear), no color, `false`.

mod color;
mod composite;
mod decorators;
mod material;
mod pack;
mod request;
mod shadow;
mod style;

pub use color::{BlendMode, Color};
pub use composite::{InterpolatedShapeStyle, PairShapeStyle, TripleShapeStyle};
pub use decorators::{BlendModeShapeStyle, OffsetShapeStyle, OpacityShapeStyle};
pub use material::{Material, MaterialFlags, MaterialId, ResolvedMaterial};
pub use pack::{Effect, EffectKind, Fill, Key, Name, Pack, Slice, Style};
pub use request::{
    Operation, PreparedText, RecursiveStyles, ShapeRequest, ShapeResult, copy_style,
    fallback_color, is_multi_level, modifies_background, prepare_text, primary_style, resolve,
};
pub use shadow::{ResolvedShadow, ShadowKind, ShadowShapeStyle, ShadowStyle};
pub use style::{
    AnyShapeStyle, BackgroundStyle, ForegroundStyle, HierarchicalShapeStyle, ShapeStyle,
    ShapeStyleExt,
};
