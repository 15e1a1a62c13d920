// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::channel::Channel;

/// Observer for connection lifecycle, implemented by the layer that
/// hands out connection identities.
///
/// Both callbacks run on the client's driver task, so implementations
/// see open and close notifications in order and never concurrently.
pub trait ConnectionRegistry: Send + Sync {
    /// Registers a freshly opened channel and returns the identity the
    /// client will report on close.
    fn on_new_connection(&self, channel: &dyn Channel) -> u64;

    /// Reports that a previously registered connection is gone. The
    /// return value is advisory; the client ignores it.
    fn on_connection_closed(&self, conn_id: u64) -> bool;
}
