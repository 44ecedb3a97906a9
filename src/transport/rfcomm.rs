//! RFCOMM transport over BlueZ.
//!
//! Dials `bluer::rfcomm::Stream` directly by address and channel. Channel 1
//! is the conventional Serial Port Profile binding on receipt printers; SDP
//! lookup of the SPP record is a pairing-time concern and stays outside this
//! crate.

use async_trait::async_trait;
use bluer::rfcomm::{SocketAddr, Stream};
use tokio::io::AsyncWriteExt;

use super::{Connector, Transport};
use crate::address::DeviceAddress;
use crate::error::ConnectError;

/// Opens RFCOMM streams on a fixed channel.
pub struct RfcommConnector {
    channel: u8,
}

impl RfcommConnector {
    pub fn new(channel: u8) -> Self {
        Self { channel }
    }
}

impl Default for RfcommConnector {
    fn default() -> Self {
        Self::new(super::DEFAULT_RFCOMM_CHANNEL)
    }
}

#[async_trait]
impl Connector for RfcommConnector {
    async fn dial(&self, address: &DeviceAddress) -> Result<Box<dyn Transport>, ConnectError> {
        let target = SocketAddr::new(bluer::Address::new(address.octets()), self.channel);
        tracing::debug!("Dialing RFCOMM {} channel {}", address, self.channel);
        let stream = Stream::connect(target).await.map_err(map_dial_error)?;
        Ok(Box::new(RfcommTransport { stream }))
    }
}

fn map_dial_error(err: std::io::Error) -> ConnectError {
    match err.kind() {
        std::io::ErrorKind::ConnectionRefused
        | std::io::ErrorKind::ConnectionReset
        | std::io::ErrorKind::TimedOut => ConnectError::RefusedOrTimeout,
        _ => {
            tracing::debug!("RFCOMM dial error treated as unresolved peer: {}", err);
            ConnectError::NotFound
        }
    }
}

/// One connected RFCOMM stream.
pub struct RfcommTransport {
    stream: Stream,
}

#[async_trait]
impl Transport for RfcommTransport {
    async fn send(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.stream.write_all(bytes).await?;
        self.stream.flush().await
    }

    async fn shutdown(&mut self) -> std::io::Result<()> {
        self.stream.shutdown().await
    }
}
