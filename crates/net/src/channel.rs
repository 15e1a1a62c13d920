// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Framed view over one live transport.
//!
//! A channel owns a single established connection. It reports the peer
//! going away through a one-shot close callback; a locally initiated
//! [`Channel::close`] never fires that callback, so the lifecycle owner
//! can tell "the peer dropped us" apart from "we hung up".

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;

use crate::error::{Error, Result};

/// Callback a channel fires at most once, when the transport closes
/// from the remote side.
pub type CloseCallback = Box<dyn FnOnce() + Send>;

/// One live connection to the remote endpoint.
pub trait Channel: Send {
    /// Writes one frame to the transport.
    fn send(&mut self, frame: Vec<u8>) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Closes the transport. Idempotent. The close callback does not
    /// fire for a locally initiated close.
    fn close(&mut self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;

    /// Attaches the lifecycle owner's close callback. A channel accepts
    /// at most one attachment.
    fn attach(&mut self, on_closed: CloseCallback) -> Result<()>;

    /// True while the transport is believed open.
    fn is_open(&self) -> bool;
}

/// [`Channel`] over a connected [`TcpStream`].
///
/// Attaching spawns a background task that drains inbound bytes; EOF or
/// a read error on that side marks the channel closed and fires the
/// callback. Inbound payloads are discarded, consuming traffic is the
/// composing layer's concern.
pub struct TcpChannel {
    writer: OwnedWriteHalf,
    reader: Option<OwnedReadHalf>,
    open: Arc<AtomicBool>,
    drain_task: Option<JoinHandle<()>>,
}

impl TcpChannel {
    pub fn new(stream: TcpStream) -> Self {
        let (reader, writer) = stream.into_split();
        TcpChannel {
            writer,
            reader: Some(reader),
            open: Arc::new(AtomicBool::new(true)),
            drain_task: None,
        }
    }
}

impl Channel for TcpChannel {
    fn send(&mut self, frame: Vec<u8>) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            if !self.open.load(Ordering::Acquire) {
                return Err(Error::ChannelClosed);
            }
            if let Err(e) = self.writer.write_all(&frame).await {
                self.open.store(false, Ordering::Release);
                return Err(e.into());
            }
            Ok(())
        })
    }

    fn close(&mut self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(async move {
            self.open.store(false, Ordering::Release);
            // Stopping the drain task before shutdown keeps the close
            // callback from firing for a local close.
            if let Some(task) = self.drain_task.take() {
                task.abort();
            }
            let _ = self.writer.shutdown().await;
        })
    }

    fn attach(&mut self, on_closed: CloseCallback) -> Result<()> {
        let mut reader = self.reader.take().ok_or(Error::AlreadyAttached)?;
        let open = Arc::clone(&self.open);
        self.drain_task = Some(tokio::spawn(async move {
            let mut buf = [0u8; 4096];
            loop {
                match reader.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(_) => {}
                }
            }
            open.store(false, Ordering::Release);
            on_closed();
        }));
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }
}

impl Drop for TcpChannel {
    fn drop(&mut self) {
        if let Some(task) = self.drain_task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
#[path = "channel_tests.rs"]
mod tests;
