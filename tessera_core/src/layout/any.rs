// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Type-erased layouts.
//!
//! [`AnyLayout`] holds a layout of any type and compares equal only to a
//! layout of the same type with an equal value.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use super::{Layout, LayoutAdapter, LayoutComputer, LayoutProxy, UnaryLayout, UnaryLayoutEngine};
use crate::geometry::EdgeInsets;

trait ErasedLayout {
    fn computer(&self, children: Vec<LayoutProxy>) -> LayoutComputer;
    fn as_any(&self) -> &dyn Any;
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl<L: Layout + Clone + PartialEq + fmt::Debug> ErasedLayout for L {
    fn computer(&self, children: Vec<LayoutProxy>) -> LayoutComputer {
        LayoutComputer::new(LayoutAdapter::new(self.clone(), children))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A type-erased container [`Layout`], for storing heterogeneous layouts or
/// switching layouts without changing the view's identity.
///
/// Two erased layouts are equal when they wrap equal values of the same type.
#[derive(Clone)]
pub struct AnyLayout {
    layout: Rc<dyn ErasedLayout>,
    eq: fn(&dyn Any, &dyn Any) -> bool,
}

fn eq_as<T: PartialEq + 'static>(a: &dyn Any, b: &dyn Any) -> bool {
    match (a.downcast_ref::<T>(), b.downcast_ref::<T>()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

impl AnyLayout {
    /// Erases `layout`.
    #[must_use]
    pub fn new<L: Layout + Clone + PartialEq + fmt::Debug>(layout: L) -> Self {
        Self {
            layout: Rc::new(layout),
            eq: eq_as::<L>,
        }
    }

    /// Builds a computer running this layout over `children`.
    #[must_use]
    pub fn computer(&self, children: Vec<LayoutProxy>) -> LayoutComputer {
        self.layout.computer(children)
    }
}

impl PartialEq for AnyLayout {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.layout, &other.layout)
            || (self.eq)(self.layout.as_any(), other.layout.as_any())
    }
}

impl fmt::Debug for AnyLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AnyLayout(")?;
        self.layout.fmt(f)?;
        f.write_str(")")
    }
}

trait ErasedUnary {
    fn computer(&self, child: LayoutProxy, safe_area: EdgeInsets) -> LayoutComputer;
    fn as_any(&self) -> &dyn Any;
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl<L: UnaryLayout + Clone + fmt::Debug> ErasedUnary for L {
    fn computer(&self, child: LayoutProxy, safe_area: EdgeInsets) -> LayoutComputer {
        LayoutComputer::new(UnaryLayoutEngine::new(self.clone(), child).with_safe_area(safe_area))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A type-erased [`UnaryLayout`].
#[derive(Clone)]
pub struct AnyUnaryLayout {
    layout: Rc<dyn ErasedUnary>,
    eq: fn(&dyn Any, &dyn Any) -> bool,
}

impl AnyUnaryLayout {
    /// Erases `layout`.
    #[must_use]
    pub fn new<L: UnaryLayout + Clone + fmt::Debug>(layout: L) -> Self {
        Self {
            layout: Rc::new(layout),
            eq: eq_as::<L>,
        }
    }

    /// Builds a computer running this layout around `child`.
    #[must_use]
    pub fn computer(&self, child: LayoutProxy, safe_area: EdgeInsets) -> LayoutComputer {
        self.layout.computer(child, safe_area)
    }
}

impl PartialEq for AnyUnaryLayout {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.layout, &other.layout)
            || (self.eq)(self.layout.as_any(), other.layout.as_any())
    }
}

impl fmt::Debug for AnyUnaryLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AnyUnaryLayout(")?;
        self.layout.fmt(f)?;
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{
        Alignment, EdgeSet, HorizontalAlignment, LayoutDirection, ProposedSize,
        VerticalAlignment,
    };
    use crate::layout::{HStack, PaddingLayout, VStack, ZStack};
    use kurbo::Size;

    #[test]
    fn equality_compares_type_and_value() {
        let a = AnyLayout::new(HStack::new(VerticalAlignment::CENTER, None));
        let b = AnyLayout::new(HStack::new(VerticalAlignment::CENTER, None));
        let c = AnyLayout::new(VStack::new(HorizontalAlignment::CENTER, None));
        let d = AnyLayout::new(ZStack {
            alignment: Alignment::CENTER,
        });
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(c, d);
    }

    #[test]
    fn switching_layouts_changes_geometry() {
        let children = || {
            (0..2)
                .map(|i| {
                    LayoutProxy::new(LayoutComputer::default(), i, LayoutDirection::LeftToRight)
                })
                .collect::<Vec<_>>()
        };
        let h = AnyLayout::new(HStack::new(VerticalAlignment::CENTER, Some(0.0)));
        let v = AnyLayout::new(VStack::new(HorizontalAlignment::CENTER, Some(0.0)));
        let p = ProposedSize::UNSPECIFIED;
        assert_eq!(h.computer(children()).size_that_fits(p), Size::new(20.0, 10.0));
        assert_eq!(v.computer(children()).size_that_fits(p), Size::new(10.0, 20.0));
    }

    #[test]
    fn unary_erasure_round_trips() {
        let pad = AnyUnaryLayout::new(PaddingLayout::new(EdgeSet::all(), Some(1.0)));
        assert_eq!(pad, AnyUnaryLayout::new(PaddingLayout::new(EdgeSet::all(), Some(1.0))));
        let child = LayoutProxy::new(LayoutComputer::default(), 0, LayoutDirection::LeftToRight);
        let c = pad.computer(child, EdgeInsets::ZERO);
        assert_eq!(c.size_that_fits(ProposedSize::UNSPECIFIED), Size::new(12.0, 12.0));
    }
}
