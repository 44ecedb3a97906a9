//! Connection-management core for Bluetooth serial-port (SPP) receipt
//! printers.
//!
//! A thin UI bridge typically exposes three calls -- connect, print,
//! disconnect -- and forwards them here. This crate owns everything those
//! calls need to be safe: a [`DeviceConnection`] with an explicit state
//! machine around one RFCOMM socket, a [`WriteQueue`] that serializes
//! concurrent print requests so payloads never interleave on the wire, and a
//! [`ConnectionSupervisor`] tying both together behind a single API.
//!
//! No automatic retries and no printer command-language encoding: failures
//! on thermal printers usually need user intervention (out of paper, powered
//! off), so every error is surfaced as a typed result for the caller to act
//! on.

pub mod address;
pub mod config;
pub mod connection;
pub mod error;
pub mod queue;
pub mod supervisor;
pub mod transport;

pub use address::DeviceAddress;
pub use connection::{ConnectionState, DeviceConnection};
pub use error::{ConnectError, WriteError};
pub use queue::{JobHandle, WriteQueue};
pub use supervisor::ConnectionSupervisor;
pub use transport::{Connector, Transport, DEFAULT_RFCOMM_CHANNEL, SERIAL_PORT_PROFILE_UUID};
