//! Transport seam between the connection manager and the platform socket.
//!
//! The connection logic never touches a Bluetooth API directly; it talks to
//! a [`Transport`] obtained from a [`Connector`]. Production code dials a
//! real RFCOMM socket (see [`rfcomm`] on Linux), tests dial an in-memory
//! recorder.

use async_trait::async_trait;
use uuid::{Uuid, uuid};

use crate::address::DeviceAddress;
use crate::error::ConnectError;

#[cfg(target_os = "linux")]
pub mod rfcomm;

/// Well-known Serial Port Profile service UUID used for RFCOMM serial
/// emulation service discovery.
pub const SERIAL_PORT_PROFILE_UUID: Uuid = uuid!("00001101-0000-1000-8000-00805f9b34fb");

/// RFCOMM channel conventionally bound to the Serial Port Profile.
pub const DEFAULT_RFCOMM_CHANNEL: u8 = 1;

/// One open byte stream to a printer.
///
/// Exclusively owned by the `DeviceConnection` that created it; dropped on
/// disconnect or failure.
#[async_trait]
pub trait Transport: Send {
    /// Write the whole payload and flush it before returning.
    async fn send(&mut self, bytes: &[u8]) -> std::io::Result<()>;

    /// Close the stream. Best effort; callers log but do not propagate.
    async fn shutdown(&mut self) -> std::io::Result<()>;
}

/// Opens transports to a given peer.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Open a serial-profile stream to `address`.
    ///
    /// Implementations map resolution failures to [`ConnectError::NotFound`]
    /// and refused handshakes to [`ConnectError::RefusedOrTimeout`]; the
    /// overall connect timeout is enforced by the caller.
    async fn dial(&self, address: &DeviceAddress) -> Result<Box<dyn Transport>, ConnectError>;
}
