// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use thiserror::Error;

use crate::state::ConnectionState;

/// All possible errors that can occur in the tether-net library.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connect timed out after {0:?}")]
    ConnectTimeout(Duration),

    #[error("channel is closed")]
    ChannelClosed,

    #[error("channel already has a lifecycle attachment")]
    AlreadyAttached,

    #[error("start requires an idle client (state: {0})")]
    NotIdle(ConnectionState),

    #[error("client is stopped")]
    Stopped,
}

/// A specialized Result type for tether-net operations.
pub type Result<T> = std::result::Result<T, Error>;
