// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Resilient asynchronous client connections.
//!
//! The crate keeps one outbound connection alive per [`TcpClient`]:
//! connect, hand the channel to a [`ConnectionRegistry`], heartbeat it,
//! and reconnect on a fixed delay whenever the peer goes away.
//!
//! ```text
//! TcpClient (handle)
//!     | commands                     events |
//!     v                                     |
//! driver task --- Connector::connect --> Channel
//!     |                                     |
//!     +--- ConnectionRegistry callbacks <---+
//! ```
//!
//! All lifecycle decisions run on the driver task; callers only ever
//! see the atomic state snapshot and the command acknowledgements.

pub mod channel;
pub mod client;
pub mod connector;
pub mod error;
pub mod registry;
pub mod state;

pub use channel::{Channel, CloseCallback, TcpChannel};
pub use client::{TcpClient, HEARTBEAT_INTERVAL, RECONNECT_DELAY};
pub use connector::{Connector, TcpConnector};
pub use error::{Error, Result};
pub use registry::ConnectionRegistry;
pub use state::{ConnectionState, SharedStatus};

#[cfg(test)]
mod test_helpers;
