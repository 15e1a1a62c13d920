// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

//! Shared test doubles for the connection lifecycle tests.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::channel::{Channel, CloseCallback};
use crate::connector::Connector;
use crate::error::{Error, Result};
use crate::registry::ConnectionRegistry;

/// Scripted outcome for one connect attempt.
pub enum ConnectOutcome {
    Succeed,
    Fail(&'static str),
}

/// Connector that replays scripted outcomes and counts attempts.
/// An exhausted script keeps failing.
pub struct ScriptedConnector {
    outcomes: Mutex<VecDeque<ConnectOutcome>>,
    attempts: AtomicU32,
    channels: Mutex<Vec<MockChannelHandle>>,
}

impl ScriptedConnector {
    pub fn new(outcomes: Vec<ConnectOutcome>) -> Arc<Self> {
        Arc::new(ScriptedConnector {
            outcomes: Mutex::new(outcomes.into()),
            attempts: AtomicU32::new(0),
            channels: Mutex::new(Vec::new()),
        })
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn channel_count(&self) -> usize {
        self.channels.lock().unwrap().len()
    }

    /// Handle to the nth channel this connector produced.
    pub fn channel(&self, index: usize) -> MockChannelHandle {
        self.channels.lock().unwrap()[index].clone()
    }
}

impl Connector for ScriptedConnector {
    fn connect(&self) -> Pin<Box<dyn Future<Output = Result<Box<dyn Channel>>> + Send + '_>> {
        Box::pin(async move {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            match self.outcomes.lock().unwrap().pop_front() {
                Some(ConnectOutcome::Succeed) => {
                    let (channel, handle) = MockChannel::new();
                    self.channels.lock().unwrap().push(handle);
                    Ok(Box::new(channel) as Box<dyn Channel>)
                }
                Some(ConnectOutcome::Fail(reason)) => Err(Error::Io(std::io::Error::other(reason))),
                None => Err(Error::Io(std::io::Error::other("script exhausted"))),
            }
        })
    }
}

struct MockShared {
    open: AtomicBool,
    sent: Mutex<Vec<Vec<u8>>>,
    on_closed: Mutex<Option<CloseCallback>>,
}

/// In-memory [`Channel`] that records sent frames.
pub struct MockChannel {
    shared: Arc<MockShared>,
    attached: bool,
}

/// Test-side view of a [`MockChannel`], kept after ownership moves
/// into the client.
#[derive(Clone)]
pub struct MockChannelHandle {
    shared: Arc<MockShared>,
}

impl MockChannel {
    pub fn new() -> (Self, MockChannelHandle) {
        let shared = Arc::new(MockShared {
            open: AtomicBool::new(true),
            sent: Mutex::new(Vec::new()),
            on_closed: Mutex::new(None),
        });
        let handle = MockChannelHandle {
            shared: Arc::clone(&shared),
        };
        (
            MockChannel {
                shared,
                attached: false,
            },
            handle,
        )
    }
}

impl Channel for MockChannel {
    fn send(&mut self, frame: Vec<u8>) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            if !self.shared.open.load(Ordering::SeqCst) {
                return Err(Error::ChannelClosed);
            }
            self.shared.sent.lock().unwrap().push(frame);
            Ok(())
        })
    }

    fn close(&mut self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(async move {
            self.shared.open.store(false, Ordering::SeqCst);
            // Local close never notifies.
            drop(self.shared.on_closed.lock().unwrap().take());
        })
    }

    fn attach(&mut self, on_closed: CloseCallback) -> Result<()> {
        if self.attached {
            return Err(Error::AlreadyAttached);
        }
        self.attached = true;
        *self.shared.on_closed.lock().unwrap() = Some(on_closed);
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.shared.open.load(Ordering::SeqCst)
    }
}

impl MockChannelHandle {
    pub fn is_open(&self) -> bool {
        self.shared.open.load(Ordering::SeqCst)
    }

    pub fn sent_frames(&self) -> Vec<Vec<u8>> {
        self.shared.sent.lock().unwrap().clone()
    }

    /// Simulates the peer dropping the transport.
    pub fn force_close(&self) {
        self.shared.open.store(false, Ordering::SeqCst);
        if let Some(on_closed) = self.shared.on_closed.lock().unwrap().take() {
            on_closed();
        }
    }

    /// Drops the transport without delivering the close notification.
    pub fn close_silently(&self) {
        self.shared.open.store(false, Ordering::SeqCst);
        drop(self.shared.on_closed.lock().unwrap().take());
    }
}

/// [`ConnectionRegistry`] that hands out sequential ids and records
/// every callback.
pub struct RecordingRegistry {
    next_id: AtomicU64,
    opened: Mutex<Vec<u64>>,
    closed: Mutex<Vec<u64>>,
}

impl RecordingRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(RecordingRegistry {
            next_id: AtomicU64::new(1),
            opened: Mutex::new(Vec::new()),
            closed: Mutex::new(Vec::new()),
        })
    }

    pub fn opened(&self) -> Vec<u64> {
        self.opened.lock().unwrap().clone()
    }

    pub fn closed(&self) -> Vec<u64> {
        self.closed.lock().unwrap().clone()
    }
}

impl ConnectionRegistry for RecordingRegistry {
    fn on_new_connection(&self, _channel: &dyn Channel) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.opened.lock().unwrap().push(id);
        id
    }

    fn on_connection_closed(&self, conn_id: u64) -> bool {
        self.closed.lock().unwrap().push(conn_id);
        true
    }
}
