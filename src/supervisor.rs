//! Front door consumed by the external bridge.
//!
//! One object, safe under concurrent calls: the host environment may invoke
//! connect/print/disconnect from multiple callback threads even when the UI
//! itself is single threaded.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::address::DeviceAddress;
use crate::connection::{ConnectionState, DeviceConnection};
use crate::error::{ConnectError, WriteError};
use crate::queue::{JobHandle, WriteQueue};
use crate::transport::Connector;

/// Drives one [`DeviceConnection`] through its states and funnels all
/// outbound payloads through one [`WriteQueue`].
pub struct ConnectionSupervisor {
    connection: Arc<Mutex<DeviceConnection>>,
    queue: WriteQueue,
}

impl ConnectionSupervisor {
    pub fn new(connector: Box<dyn Connector>, connect_timeout: Duration) -> Self {
        let connection = Arc::new(Mutex::new(DeviceConnection::new(connector, connect_timeout)));
        let queue = WriteQueue::new(connection.clone());
        Self { connection, queue }
    }

    /// Connect to the printer at `address`.
    ///
    /// No-op when already connected to the same address. A different address
    /// (or a failed previous connection) first cancels pending print jobs
    /// and tears the old socket down, so the connection never holds two
    /// sockets.
    pub async fn connect(&self, address: &str) -> Result<(), ConnectError> {
        let address: DeviceAddress = address.parse().map_err(ConnectError::InvalidAddress)?;
        let mut conn = self.connection.lock().await;

        if matches!(
            conn.state(),
            ConnectionState::Connected | ConnectionState::Connecting
        ) && conn.address() == Some(&address)
        {
            tracing::debug!("Already connected to {}, nothing to do", address);
            return Ok(());
        }

        // Jobs queued for the old link are meaningless on the new one.
        self.queue.cancel_pending().await;
        conn.disconnect().await;
        conn.connect(address).await
    }

    /// Encode `text` as UTF-8 and enqueue it for delivery.
    ///
    /// No control-character translation and no printer command codes; the
    /// payload goes to the wire as-is. Fails fast with
    /// [`WriteError::NotConnected`] when no connection is open; the returned
    /// handle resolves once the queue worker has delivered (or failed to
    /// deliver) the payload.
    pub async fn print(&self, text: &str) -> Result<JobHandle, WriteError> {
        if self.state().await != ConnectionState::Connected {
            return Err(WriteError::NotConnected);
        }
        Ok(self.queue.enqueue(text.as_bytes().to_vec()).await)
    }

    /// Cancel pending print jobs and close the connection. Idempotent; an
    /// in-flight write finishes before the socket is torn down.
    pub async fn disconnect(&self) {
        self.queue.cancel_pending().await;
        let mut conn = self.connection.lock().await;
        conn.disconnect().await;
    }

    /// Current connection state, polled by the bridge (no pushed events in
    /// this design).
    pub async fn state(&self) -> ConnectionState {
        self.connection.lock().await.state()
    }

    /// Disconnect and stop the queue worker. Consumes the supervisor.
    pub async fn shutdown(self) {
        self.disconnect().await;
        self.queue.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::{DialOutcome, MockConnector};

    const ADDR: &str = "AA:BB:CC:DD:EE:FF";

    fn supervisor(outcome: DialOutcome) -> (ConnectionSupervisor, MockConnector) {
        let connector = MockConnector::new(outcome);
        let supervisor =
            ConnectionSupervisor::new(Box::new(connector.clone()), Duration::from_millis(100));
        (supervisor, connector)
    }

    #[tokio::test]
    async fn test_connect_rejects_malformed_address() {
        let (supervisor, _) = supervisor(DialOutcome::Accept);
        let err = supervisor.connect("not-an-address").await.unwrap_err();
        assert!(matches!(err, ConnectError::InvalidAddress(_)));
        assert_eq!(supervisor.state().await, ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_connect_same_address_is_noop() {
        let (supervisor, _) = supervisor(DialOutcome::Accept);
        supervisor.connect(ADDR).await.unwrap();
        // Second call must not error with AlreadyConnected.
        supervisor.connect(ADDR).await.unwrap();
        assert_eq!(supervisor.state().await, ConnectionState::Connected);
    }

    #[tokio::test]
    async fn test_connect_other_address_replaces_connection() {
        let (supervisor, _) = supervisor(DialOutcome::Accept);
        supervisor.connect(ADDR).await.unwrap();
        supervisor.connect("11:22:33:44:55:66").await.unwrap();
        assert_eq!(supervisor.state().await, ConnectionState::Connected);
    }

    #[tokio::test]
    async fn test_print_fails_fast_when_disconnected() {
        let (supervisor, connector) = supervisor(DialOutcome::Accept);
        let err = supervisor.print("receipt").await.unwrap_err();
        assert!(matches!(err, WriteError::NotConnected));
        assert!(connector.delivered().is_empty());
    }

    #[tokio::test]
    async fn test_print_delivers_utf8_bytes() {
        let (supervisor, connector) = supervisor(DialOutcome::Accept);
        supervisor.connect(ADDR).await.unwrap();
        let handle = supervisor.print("Thé 2,50€\n").await.unwrap();
        handle.await.unwrap().unwrap();
        assert_eq!(connector.delivered(), vec!["Thé 2,50€\n".as_bytes().to_vec()]);
    }
}
