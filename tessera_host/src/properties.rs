// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host properties.

use bitflags::bitflags;

bitflags! {
    /// Host-side properties that must be pushed into the view graph before
    /// the next render.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct HostProperties: u16 {
        /// The root view.
        const ROOT_VIEW = 1 << 0;
        /// The environment.
        const ENVIRONMENT = 1 << 1;
        /// Focused values.
        const FOCUSED_VALUES = 1 << 2;
        /// The host's transform in its window.
        const TRANSFORM = 1 << 3;
        /// The size offered to the root.
        const SIZE = 1 << 4;
        /// The safe-area insets.
        const SAFE_AREA = 1 << 5;
        /// The size of the enclosing scroll container.
        const SCROLLABLE_CONTAINER_SIZE = 1 << 6;
        /// The focus store.
        const FOCUS_STORE = 1 << 7;
        /// The accessibility focus store.
        const ACCESSIBILITY_FOCUS_STORE = 1 << 8;
        /// The focused item.
        const FOCUSED_ITEM = 1 << 9;
        /// Accessibility focus.
        const ACCESSIBILITY_FOCUS = 1 << 10;
    }
}
