//! Lifecycle of one Bluetooth serial socket.

use std::time::Duration;

use crate::address::DeviceAddress;
use crate::error::{ConnectError, WriteError};
use crate::transport::{Connector, Transport};

/// Connection lifecycle state. Transitions happen only inside
/// [`DeviceConnection`]; there is no terminal state, a failed connection can
/// always be reconnected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

/// Owns at most one open serial-profile socket to one peer.
///
/// The socket handle is never shared: writes go through `&mut self`, and the
/// caller (normally the supervisor plus the queue worker) serializes access
/// behind one mutex.
pub struct DeviceConnection {
    connector: Box<dyn Connector>,
    transport: Option<Box<dyn Transport>>,
    state: ConnectionState,
    address: Option<DeviceAddress>,
    connect_timeout: Duration,
}

impl DeviceConnection {
    pub fn new(connector: Box<dyn Connector>, connect_timeout: Duration) -> Self {
        Self {
            connector,
            transport: None,
            state: ConnectionState::Disconnected,
            address: None,
            connect_timeout,
        }
    }

    /// Open a serial-profile socket to `address`.
    ///
    /// Fails with [`ConnectError::AlreadyConnected`] while a connection is
    /// open. On any failure the state settles to `Failed`, never stays
    /// `Connecting`.
    pub async fn connect(&mut self, address: DeviceAddress) -> Result<(), ConnectError> {
        if self.state == ConnectionState::Connected {
            return Err(ConnectError::AlreadyConnected);
        }

        tracing::info!("Connecting to printer {}", address);
        self.state = ConnectionState::Connecting;
        self.address = Some(address);

        match tokio::time::timeout(self.connect_timeout, self.connector.dial(&address)).await {
            Ok(Ok(transport)) => {
                self.transport = Some(transport);
                self.state = ConnectionState::Connected;
                tracing::info!("Connected to printer {}", address);
                Ok(())
            }
            Ok(Err(e)) => {
                tracing::warn!("Connect to {} failed: {}", address, e);
                self.transport = None;
                self.state = ConnectionState::Failed;
                Err(e)
            }
            Err(_) => {
                tracing::warn!(
                    "Connect to {} timed out after {:?}",
                    address,
                    self.connect_timeout
                );
                self.transport = None;
                self.state = ConnectionState::Failed;
                Err(ConnectError::RefusedOrTimeout)
            }
        }
    }

    /// Write and flush one payload.
    ///
    /// Requires the connection to be open. A transport error poisons the
    /// connection to `Failed`; further writes fail with `NotConnected` until
    /// the caller reconnects.
    pub async fn write(&mut self, bytes: &[u8]) -> Result<(), WriteError> {
        if self.state != ConnectionState::Connected {
            return Err(WriteError::NotConnected);
        }
        let transport = self.transport.as_mut().ok_or(WriteError::NotConnected)?;

        tracing::debug!("printer <- {} bytes", bytes.len());
        if let Err(e) = transport.send(bytes).await {
            tracing::warn!("Write to printer failed: {}", e);
            self.state = ConnectionState::Failed;
            self.transport = None;
            return Err(WriteError::Io(e));
        }
        Ok(())
    }

    /// Close the socket if one is open. Idempotent; close errors are logged,
    /// never propagated, and the state is `Disconnected` afterwards
    /// regardless of what it was before.
    pub async fn disconnect(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            if let Err(e) = transport.shutdown().await {
                tracing::warn!("Error closing printer socket: {}", e);
            }
            tracing::info!("Disconnected from printer");
        }
        self.address = None;
        self.state = ConnectionState::Disconnected;
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Peer of the current (or in-progress) connection, if any.
    pub fn address(&self) -> Option<&DeviceAddress> {
        self.address.as_ref()
    }
}
