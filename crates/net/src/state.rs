// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connection lifecycle state shared between the driver task and callers.
//!
//! All transitions happen on the driver task; [`SharedStatus`] mirrors the
//! current state into an atomic so health checks on other threads can read
//! it without a lock.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle state of a managed client connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Constructed but not started.
    Idle,
    /// A connect attempt is in flight or a retry is pending.
    Connecting,
    /// A channel is owned and registered.
    Connected,
    /// Shutdown in progress.
    Stopping,
    /// Shut down; terminal.
    Stopped,
}

impl ConnectionState {
    fn as_u8(self) -> u8 {
        match self {
            ConnectionState::Idle => 0,
            ConnectionState::Connecting => 1,
            ConnectionState::Connected => 2,
            ConnectionState::Stopping => 3,
            ConnectionState::Stopped => 4,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => ConnectionState::Idle,
            1 => ConnectionState::Connecting,
            2 => ConnectionState::Connected,
            3 => ConnectionState::Stopping,
            _ => ConnectionState::Stopped,
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Idle => "idle",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Stopping => "stopping",
            ConnectionState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Lock-free snapshot of the driver's state.
///
/// Written by the driver task on every transition, readable from any
/// thread. The connected flag this exposes is the only piece of driver
/// state meant to be observed from outside the owning task.
pub struct SharedStatus {
    state: AtomicU8,
}

impl SharedStatus {
    /// Creates a status snapshot initialized to [`ConnectionState::Idle`].
    pub fn new() -> Self {
        SharedStatus {
            state: AtomicU8::new(ConnectionState::Idle.as_u8()),
        }
    }

    /// Current state.
    pub fn get(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Records a transition.
    pub fn set(&self, state: ConnectionState) {
        self.state.store(state.as_u8(), Ordering::Release);
    }

    /// True iff the state is [`ConnectionState::Connected`].
    pub fn is_connected(&self) -> bool {
        self.get() == ConnectionState::Connected
    }
}

impl Default for SharedStatus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
