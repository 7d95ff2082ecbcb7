//! # KMP Application Layer
//!
//! Splits application bytes into a command ID (CID) and the command data.
//! This covers both requests and responses; the command data may be empty.

use crate::error::{KmpError, ValidRange};
use crate::kmp::bytes::{ApplicationBytes, ApplicationDataBytes};

/// Data of the application layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationData {
    /// Must fit in one byte to be encoded.
    pub command_id: u16,
    pub data: ApplicationDataBytes,
}

impl ApplicationData {
    pub fn new(command_id: impl Into<u16>, data: ApplicationDataBytes) -> Self {
        ApplicationData {
            command_id: command_id.into(),
            data,
        }
    }
}

/// Codec for the application layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplicationCodec;

impl ApplicationCodec {
    pub const APPLICATION_BYTES_LENGTH_MIN: usize = 1;

    pub fn new() -> Self {
        ApplicationCodec
    }

    pub fn decode(&self, data: &ApplicationBytes) -> Result<ApplicationData, KmpError> {
        match data.split_first() {
            Some((command_id, rest)) => Ok(ApplicationData {
                command_id: u16::from(*command_id),
                data: ApplicationDataBytes::from(rest),
            }),
            None => Err(KmpError::length_min(
                "Application data message to destructure",
                data.len(),
                Self::APPLICATION_BYTES_LENGTH_MIN,
            )),
        }
    }

    pub fn encode(&self, to_encode: &ApplicationData) -> Result<ApplicationBytes, KmpError> {
        let command_id = u8::try_from(to_encode.command_id).map_err(|_| {
            KmpError::out_of_range(
                "Command ID",
                ValidRange::between(0, 255),
                to_encode.command_id,
            )
        })?;

        let mut raw = Vec::with_capacity(to_encode.data.len() + 1);
        raw.push(command_id);
        raw.extend_from_slice(&to_encode.data);
        Ok(ApplicationBytes::new(raw))
    }
}
