// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Values stored in attributes.

use alloc::boxed::Box;
use core::any::Any;

/// A type that can be stored in an attribute.
///
/// Equality drives change detection: assigning or computing a value equal to
/// the current one leaves the attribute's change revision untouched.
pub trait Value: Clone + PartialEq + 'static {}

impl<T: Clone + PartialEq + 'static> Value for T {}

/// Type-erased attribute storage.
pub(crate) trait AnyValue {
    fn as_any(&self) -> &dyn Any;
    fn dyn_eq(&self, other: &dyn AnyValue) -> bool;
}

impl<T: Value> AnyValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn AnyValue) -> bool {
        other.as_any().downcast_ref::<T>().is_some_and(|o| o == self)
    }
}

pub(crate) fn boxed<T: Value>(value: T) -> Box<dyn AnyValue> {
    Box::new(value)
}
