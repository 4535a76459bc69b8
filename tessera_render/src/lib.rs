// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render plans and damage tracking for Tessera.
//!
//! This crate sits between [`tessera_core`]'s display lists and a renderer.
//! It defines:
//!
//! - [`RenderItem`]: a single flattened draw command in absolute coordinates
//! - [`RenderPlan`]: the draw commands for one update, plus its damage
//! - [`DamageRegion`]: spatial damage tracking for partial re-rendering
//! - [`diff`]: builds a plan from the previous and the current display list

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

mod damage;
mod diff;
mod plan;

pub use damage::DamageRegion;
pub use diff::{diff, flatten};
pub use plan::{ItemChange, PlanStats, RenderItem, RenderPlan};
