// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Iteration styles.

use core::fmt;

/// How a traversal counts elements.
///
/// Some consumers (grids laid out in rows, for instance) treat elements in
/// groups of `granularity`. When granularity is applied, every element counts
/// as `granularity` slots, and section boundaries are padded to the next
/// multiple so that a section never shares a row with its neighbor.
///
/// Bit 0 stores whether granularity is applied; the remaining bits store the
/// granularity itself. The zero value means "granularity 1, not applied".
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct IteratorStyle {
    value: u32,
}

impl IteratorStyle {
    /// Plain one-element-per-slot counting.
    pub const PLAIN: Self = Self { value: 0 };

    /// Creates a style with the given granularity, applied.
    ///
    /// A granularity of zero is treated as one.
    #[must_use]
    pub const fn with_granularity(granularity: u32) -> Self {
        let granularity = if granularity == 0 { 1 } else { granularity };
        Self {
            value: (granularity << 1) | 1,
        }
    }

    /// Returns whether granularity is applied when counting.
    #[inline]
    #[must_use]
    pub const fn applies_granularity(self) -> bool {
        self.value & 1 != 0
    }

    /// Returns a copy with granularity application switched on or off.
    #[inline]
    #[must_use]
    pub const fn applying_granularity(self, apply: bool) -> Self {
        Self {
            value: (self.value & !1) | apply as u32,
        }
    }

    /// Returns the granularity; one when none was set.
    #[inline]
    #[must_use]
    pub const fn granularity(self) -> u32 {
        let granularity = self.value >> 1;
        if granularity == 0 { 1 } else { granularity }
    }

    /// Returns a copy with a new granularity, keeping the applied bit.
    #[must_use]
    pub const fn set_granularity(self, granularity: u32) -> Self {
        Self {
            value: (self.value & 1) | (granularity << 1),
        }
    }

    /// Scales an element count into slots.
    #[inline]
    #[must_use]
    pub const fn apply_granularity(self, count: usize) -> usize {
        if self.applies_granularity() {
            self.granularity() as usize * count
        } else {
            count
        }
    }

    /// Rounds `index` down to a multiple of the granularity.
    pub fn align_to_previous_granularity_multiple(self, index: &mut usize) {
        let granularity = self.granularity() as usize;
        if self.value == 0 || granularity == 1 {
            return;
        }
        *index -= *index % granularity;
    }

    /// Rounds `index` up to a multiple of the granularity.
    pub fn align_to_next_granularity_multiple(self, index: &mut usize) {
        let granularity = self.granularity() as usize;
        if granularity == 1 {
            return;
        }
        let remainder = *index % granularity;
        if remainder != 0 {
            *index += granularity - remainder;
        }
    }

    /// The style used for section headers and footers: granularity is
    /// applied exactly when it is not one.
    #[must_use]
    pub const fn header_footer(self) -> Self {
        self.applying_granularity(self.granularity() != 1)
    }
}

impl fmt::Debug for IteratorStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IteratorStyle")
            .field("granularity", &self.granularity())
            .field("applied", &self.applies_granularity())
            .finish()
    }
}
