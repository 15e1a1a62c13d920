// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Resilient TCP client with automatic reconnect and heartbeats.
//!
//! [`TcpClient`] is a handle to a driver task that owns all connection
//! state. Commands and transport events funnel through the driver's
//! queues, so connects, closes, retries, heartbeat ticks, and registry
//! callbacks are fully serialized with respect to each other.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{interval_at, sleep, Instant, Interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use tether_core::ServiceConfig;

use crate::channel::Channel;
use crate::connector::{Connector, TcpConnector};
use crate::error::{Error, Result};
use crate::registry::ConnectionRegistry;
use crate::state::{ConnectionState, SharedStatus};

/// Delay between a lost or failed connection and the next attempt.
pub const RECONNECT_DELAY: Duration = Duration::from_millis(10_000);

/// Spacing of keepalive frames while connected.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(10_000);

/// Single-byte keepalive payload.
const KEEPALIVE_FRAME: [u8; 1] = [0];

enum Command {
    Start(oneshot::Sender<Result<()>>),
    Pause(oneshot::Sender<Result<()>>),
    Stop(oneshot::Sender<()>),
}

enum Event {
    ConnectSucceeded(Box<dyn Channel>),
    ConnectFailed(String),
    RetryTimer,
    ChannelClosed,
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::ConnectSucceeded(_) => f.write_str("ConnectSucceeded"),
            Event::ConnectFailed(reason) => write!(f, "ConnectFailed({reason})"),
            Event::RetryTimer => f.write_str("RetryTimer"),
            Event::ChannelClosed => f.write_str("ChannelClosed"),
        }
    }
}

/// Handle to a managed client connection.
///
/// Dropping the handle shuts the driver down the same way
/// [`TcpClient::stop`] does.
pub struct TcpClient {
    config: ServiceConfig,
    cmd_tx: mpsc::Sender<Command>,
    status: Arc<SharedStatus>,
}

impl TcpClient {
    /// Creates a client that dials the configured endpoint over TCP.
    ///
    /// Must be called within a tokio runtime; the driver task is
    /// spawned immediately and waits for [`TcpClient::start`].
    pub fn new(config: ServiceConfig, registry: Arc<dyn ConnectionRegistry>) -> Self {
        let connector = Arc::new(TcpConnector::new(&config));
        Self::with_connector(config, connector, registry)
    }

    /// Creates a client over a caller-supplied [`Connector`].
    pub fn with_connector(
        config: ServiceConfig,
        connector: Arc<dyn Connector>,
        registry: Arc<dyn ConnectionRegistry>,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let (event_tx, event_rx) = mpsc::channel(32);
        let status = Arc::new(SharedStatus::new());
        let driver = Driver {
            remote: config.addr(),
            connector,
            registry,
            status: Arc::clone(&status),
            state: ConnectionState::Idle,
            cmd_rx,
            event_tx,
            event_rx,
            channel: None,
            conn_id: None,
            heartbeat: None,
            cancel: CancellationToken::new(),
        };
        tokio::spawn(driver.run());
        TcpClient {
            config,
            cmd_tx,
            status,
        }
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Begins connecting. Valid only from [`ConnectionState::Idle`];
    /// from then on the driver keeps the connection alive until
    /// [`TcpClient::stop`].
    pub async fn start(&self) -> Result<()> {
        self.command(Command::Start).await
    }

    /// Control point reserved for suspending traffic. Currently verifies
    /// the client is still running and otherwise does nothing.
    pub async fn pause(&self) -> Result<()> {
        self.command(Command::Pause).await
    }

    /// Stops the client, closing any live connection and cancelling
    /// pending retries. Idempotent; the state ends at
    /// [`ConnectionState::Stopped`] and no restart is possible.
    pub async fn stop(&self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        if self.cmd_tx.send(Command::Stop(tx)).await.is_err() {
            // Driver already gone, which is what stop wants.
            return Ok(());
        }
        let _ = rx.await;
        Ok(())
    }

    /// True while a connection is registered. Safe to call from any
    /// thread at any time.
    pub fn connected(&self) -> bool {
        self.status.is_connected()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.status.get()
    }

    async fn command(
        &self,
        make: impl FnOnce(oneshot::Sender<Result<()>>) -> Command,
    ) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        if self.cmd_tx.send(make(tx)).await.is_err() {
            return Err(Error::Stopped);
        }
        rx.await.map_err(|_| Error::Stopped)?
    }
}

enum Wake {
    Command(Option<Command>),
    Event(Option<Event>),
    Heartbeat,
}

struct Driver {
    remote: String,
    connector: Arc<dyn Connector>,
    registry: Arc<dyn ConnectionRegistry>,
    status: Arc<SharedStatus>,
    state: ConnectionState,
    cmd_rx: mpsc::Receiver<Command>,
    event_tx: mpsc::Sender<Event>,
    event_rx: mpsc::Receiver<Event>,
    channel: Option<Box<dyn Channel>>,
    conn_id: Option<u64>,
    heartbeat: Option<Interval>,
    cancel: CancellationToken,
}

impl Driver {
    async fn run(mut self) {
        loop {
            let heartbeat_armed = self.heartbeat.is_some();
            let wake = tokio::select! {
                cmd = self.cmd_rx.recv() => Wake::Command(cmd),
                event = self.event_rx.recv() => Wake::Event(event),
                _ = tick(&mut self.heartbeat), if heartbeat_armed => Wake::Heartbeat,
            };
            match wake {
                Wake::Command(Some(cmd)) => {
                    if self.handle_command(cmd).await {
                        break;
                    }
                }
                Wake::Command(None) => {
                    // Handle dropped without an explicit stop.
                    self.shutdown().await;
                    break;
                }
                Wake::Event(Some(event)) => self.handle_event(event).await,
                Wake::Event(None) => {}
                Wake::Heartbeat => self.handle_heartbeat().await,
            }
        }
    }

    /// Returns true when the driver should exit.
    async fn handle_command(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::Start(ack) => {
                let result = match self.state {
                    ConnectionState::Idle => {
                        info!("starting client for {}", self.remote);
                        self.set_state(ConnectionState::Connecting);
                        self.spawn_connect();
                        Ok(())
                    }
                    state => Err(Error::NotIdle(state)),
                };
                let _ = ack.send(result);
                false
            }
            Command::Pause(ack) => {
                debug!("pause requested for {}", self.remote);
                let _ = ack.send(Ok(()));
                false
            }
            Command::Stop(ack) => {
                self.shutdown().await;
                let _ = ack.send(());
                true
            }
        }
    }

    async fn handle_event(&mut self, event: Event) {
        match event {
            Event::ConnectSucceeded(mut channel) => {
                if self.state != ConnectionState::Connecting {
                    // Stale attempt; nothing owns this channel.
                    channel.close().await;
                    return;
                }
                let events = self.event_tx.clone();
                if let Err(e) = channel.attach(Box::new(move || {
                    match events.try_send(Event::ChannelClosed) {
                        Ok(()) | Err(TrySendError::Closed(_)) => {}
                        Err(TrySendError::Full(_)) => {
                            warn!("close notification dropped: event queue full");
                        }
                    }
                })) {
                    error!("failed to attach to new channel: {}", e);
                    channel.close().await;
                    self.schedule_retry();
                    return;
                }
                let conn_id = self.registry.on_new_connection(channel.as_ref());
                info!(conn_id, "connected to {}", self.remote);
                self.channel = Some(channel);
                self.conn_id = Some(conn_id);
                self.set_state(ConnectionState::Connected);
                let first = Instant::now() + HEARTBEAT_INTERVAL;
                self.heartbeat = Some(interval_at(first, HEARTBEAT_INTERVAL));
            }
            Event::ConnectFailed(reason) => {
                error!("error connecting to {}: {}", self.remote, reason);
                if self.state != ConnectionState::Connecting {
                    return;
                }
                self.schedule_retry();
            }
            Event::RetryTimer => {
                if self.state != ConnectionState::Connecting {
                    return;
                }
                self.spawn_connect();
            }
            Event::ChannelClosed => {
                if self.state != ConnectionState::Connected {
                    return;
                }
                self.handle_connection_lost().await;
            }
        }
    }

    async fn handle_connection_lost(&mut self) {
        warn!("connection to {} closed", self.remote);
        self.heartbeat = None;
        if let Some(mut channel) = self.channel.take() {
            channel.close().await;
        }
        if let Some(conn_id) = self.conn_id.take() {
            self.registry.on_connection_closed(conn_id);
        }
        self.set_state(ConnectionState::Connecting);
        self.schedule_retry();
    }

    async fn handle_heartbeat(&mut self) {
        if self.state != ConnectionState::Connected {
            return;
        }
        let open = match self.channel.as_ref() {
            Some(channel) => channel.is_open(),
            None => return,
        };
        if !open {
            // Backstop for a close notification that never arrived.
            self.handle_connection_lost().await;
            return;
        }
        if let Some(channel) = self.channel.as_mut() {
            if let Err(e) = channel.send(KEEPALIVE_FRAME.to_vec()).await {
                debug!("heartbeat send failed: {}", e);
            }
        }
    }

    fn spawn_connect(&self) {
        let connector = Arc::clone(&self.connector);
        let events = self.event_tx.clone();
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            let outcome = tokio::select! {
                _ = cancel.cancelled() => return,
                result = connector.connect() => result,
            };
            let event = match outcome {
                Ok(channel) => Event::ConnectSucceeded(channel),
                Err(e) => Event::ConnectFailed(e.to_string()),
            };
            let _ = events.send(event).await;
        });
    }

    fn schedule_retry(&self) {
        debug!("retrying {} in {:?}", self.remote, RECONNECT_DELAY);
        let events = self.event_tx.clone();
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = sleep(RECONNECT_DELAY) => {
                    let _ = events.send(Event::RetryTimer).await;
                }
            }
        });
    }

    async fn shutdown(&mut self) {
        info!("stopping client for {}", self.remote);
        self.set_state(ConnectionState::Stopping);
        self.cancel.cancel();
        self.heartbeat = None;
        if let Some(mut channel) = self.channel.take() {
            channel.close().await;
        }
        if let Some(conn_id) = self.conn_id.take() {
            self.registry.on_connection_closed(conn_id);
        }
        self.set_state(ConnectionState::Stopped);
    }

    fn set_state(&mut self, state: ConnectionState) {
        self.state = state;
        self.status.set(state);
    }
}

async fn tick(heartbeat: &mut Option<Interval>) {
    match heartbeat {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
