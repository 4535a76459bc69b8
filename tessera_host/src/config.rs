// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scheduler tunables.

/// Thresholds and limits for a [`Host`](crate::Host).
///
/// All durations are in seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SchedulerConfig {
    /// Delays at or above this use the coarse update timer instead of the
    /// display link.
    pub timer_threshold: f64,
    /// Shortest delay the update timer is armed with.
    pub min_timer_delay: f64,
    /// Display-link delays below this mean "next tick".
    pub link_threshold: f64,
    /// A tick is accepted when it is no more than this early.
    pub tick_tolerance: f64,
    /// Smallest time step of a render on the render thread.
    pub async_min_interval: f64,
    /// Maximum graph update passes per render.
    pub max_update_passes: u32,
}

impl SchedulerConfig {
    /// Default configuration.
    pub const DEFAULT: Self = Self {
        timer_threshold: 0.25,
        min_timer_delay: 0.1,
        link_threshold: 0.01,
        tick_tolerance: 1.0 / 240.0,
        async_min_interval: 1e-6,
        max_update_passes: 8,
    };

    /// Configuration for hosts without a display: every deferred request
    /// goes through the update timer.
    #[must_use]
    pub const fn headless() -> Self {
        Self {
            timer_threshold: 0.0,
            ..Self::DEFAULT
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
