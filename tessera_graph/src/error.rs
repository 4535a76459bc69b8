// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Graph errors.

use core::fmt;

use crate::id::AttributeId;

/// Errors returned by the fallible graph accessors.
///
/// The infallible accessors ([`Graph::value`](crate::Graph::value),
/// [`Graph::set`](crate::Graph::set)) panic on the same conditions, since they
/// indicate a wiring bug at the call site.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphError {
    /// The handle refers to an attribute that has been destroyed.
    StaleAttribute(AttributeId),
    /// The attribute is a rule and cannot be assigned directly.
    NotAnInput(AttributeId),
    /// The attribute was read while its own rule was being evaluated.
    Cycle(AttributeId),
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaleAttribute(id) => write!(f, "stale attribute handle {id:?}"),
            Self::NotAnInput(id) => write!(f, "attribute {id:?} is computed by a rule"),
            Self::Cycle(id) => write!(f, "attribute {id:?} depends on itself"),
        }
    }
}

impl core::error::Error for GraphError {}
