// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host errors.

use std::fmt;
use std::io;

/// Errors from starting the render thread.
///
/// Either way the host keeps rendering on the controlling thread.
#[derive(Debug)]
pub enum HostError {
    /// The operating system refused to start the thread.
    ThreadSpawn(io::Error),
    /// The display link was shut down.
    ShutDown,
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ThreadSpawn(err) => write!(f, "failed to start render thread: {err}"),
            Self::ShutDown => write!(f, "display link is shut down"),
        }
    }
}

impl std::error::Error for HostError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ThreadSpawn(err) => Some(err),
            Self::ShutDown => None,
        }
    }
}
