//! Client configuration.
//!
//! Defaults match a heat meter behind an optical head on the first USB serial
//! adapter. Serial line settings are fixed by the protocol and not configurable.

use crate::constants::{KMP_DESTINATION_ADDRESS_DEFAULT, KMP_READ_TIMEOUT_MS};
use std::time::Duration;

/// Prefix of `serial_device` selecting a TCP connection, e.g. to ser2net.
pub const SOCKET_URL_PREFIX: &str = "socket://";

/// Configuration for talking to one meter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Serial device path or `socket://<host>:<port>`.
    pub serial_device: String,
    pub destination_address: u16,
    /// Maximum wait for the first byte of a response.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            serial_device: "/dev/ttyUSB0".to_string(),
            destination_address: u16::from(KMP_DESTINATION_ADDRESS_DEFAULT),
            timeout: Duration::from_millis(KMP_READ_TIMEOUT_MS),
        }
    }
}

impl ClientConfig {
    pub fn new(serial_device: impl Into<String>) -> Self {
        ClientConfig {
            serial_device: serial_device.into(),
            ..Default::default()
        }
    }

    pub fn with_destination_address(mut self, destination_address: u16) -> Self {
        self.destination_address = destination_address;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The `host:port` part if the device is a socket URL.
    pub fn socket_address(&self) -> Option<&str> {
        self.serial_device.strip_prefix(SOCKET_URL_PREFIX)
    }
}
