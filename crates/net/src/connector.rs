// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Outbound connection establishment.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tokio::net::TcpStream;

use tether_core::ServiceConfig;

use crate::channel::{Channel, TcpChannel};
use crate::error::{Error, Result};

/// Dials the remote endpoint. One call is exactly one attempt; retry
/// policy lives in the client, not here.
pub trait Connector: Send + Sync {
    fn connect(&self) -> Pin<Box<dyn Future<Output = Result<Box<dyn Channel>>> + Send + '_>>;
}

/// [`Connector`] that opens plain TCP connections to a fixed address.
pub struct TcpConnector {
    addr: String,
    timeout: Option<Duration>,
}

impl TcpConnector {
    pub fn new(config: &ServiceConfig) -> Self {
        TcpConnector {
            addr: config.addr(),
            timeout: None,
        }
    }

    /// Bounds each connect attempt. A zero duration means no bound,
    /// matching an unset value in loaded configuration.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = if timeout.is_zero() { None } else { Some(timeout) };
        self
    }
}

impl Connector for TcpConnector {
    fn connect(&self) -> Pin<Box<dyn Future<Output = Result<Box<dyn Channel>>> + Send + '_>> {
        Box::pin(async move {
            let stream = match self.timeout {
                Some(limit) => tokio::time::timeout(limit, TcpStream::connect(&self.addr))
                    .await
                    .map_err(|_| Error::ConnectTimeout(limit))??,
                None => TcpStream::connect(&self.addr).await?,
            };
            Ok(Box::new(TcpChannel::new(stream)) as Box<dyn Channel>)
        })
    }
}

#[cfg(test)]
#[path = "connector_tests.rs"]
mod tests;
