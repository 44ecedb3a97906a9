//! Error taxonomy for connecting to and writing to a printer.
//!
//! Every failure is returned as a typed result so the bridge layer on top
//! can show an actionable message ("printer not connected" vs "connection
//! timed out") instead of crashing on a missing value.

use thiserror::Error;

use crate::address::AddressParseError;

/// Errors from establishing a printer connection.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// The address string is not a valid Bluetooth device address.
    #[error(transparent)]
    InvalidAddress(#[from] AddressParseError),

    /// The peer could not be resolved (unknown or unpaired device).
    #[error("device not found")]
    NotFound,

    /// The peer refused the connection or the handshake did not complete
    /// within the configured timeout.
    #[error("connection refused or timed out")]
    RefusedOrTimeout,

    /// A connection is already open; disconnect first.
    #[error("already connected")]
    AlreadyConnected,
}

/// Errors from delivering bytes to the printer.
#[derive(Debug, Error)]
pub enum WriteError {
    /// There is no open connection to write to.
    #[error("not connected")]
    NotConnected,

    /// The transport reported an error; the connection is considered failed.
    #[error("transport error: {0}")]
    Io(#[from] std::io::Error),

    /// The job was cancelled before delivery (disconnect or reconnect).
    #[error("print job cancelled")]
    Cancelled,
}
