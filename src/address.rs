//! Bluetooth device addresses.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error returned when a string is not a valid Bluetooth device address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid device address '{0}': expected six colon-separated hex octets")]
pub struct AddressParseError(pub String);

/// Address of a Bluetooth peer, e.g. `AA:BB:CC:DD:EE:FF`.
///
/// Validated on construction and immutable afterwards. The canonical display
/// form is uppercase hex with colon separators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceAddress {
    octets: [u8; 6],
}

impl DeviceAddress {
    pub fn new(octets: [u8; 6]) -> Self {
        Self { octets }
    }

    /// The six raw address bytes, most significant first.
    pub fn octets(&self) -> [u8; 6] {
        self.octets
    }
}

impl FromStr for DeviceAddress {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut octets = [0u8; 6];
        let mut parts = s.split(':');
        for octet in octets.iter_mut() {
            let part = parts.next().ok_or_else(|| AddressParseError(s.to_string()))?;
            if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(AddressParseError(s.to_string()));
            }
            *octet = u8::from_str_radix(part, 16).map_err(|_| AddressParseError(s.to_string()))?;
        }
        if parts.next().is_some() {
            return Err(AddressParseError(s.to_string()));
        }
        Ok(Self { octets })
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = &self.octets;
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            o[0], o[1], o[2], o[3], o[4], o[5]
        )
    }
}
