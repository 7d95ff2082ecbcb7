//! # KMP Data Link Layer
//!
//! Destination addressing and checksum integrity over the application bytes.
//!
//! ```text
//! [address:1] [application bytes:N] [crc16:2, big-endian]
//! ```
//!
//! The checksum is CRC-16 CCITT (polynomial 0x1021) with one deviation from the
//! standard: the initial value is 0x0000 instead of 0xFFFF.

use crate::error::KmpError;
use crate::kmp::bytes::{ApplicationBytes, DataLinkBytes};
use crc::{Algorithm, Crc};
use log::{debug, error};

/// CRC-16 CCITT with an initial value of 0x0000.
pub const CRC_16_KMP: Algorithm<u16> = Algorithm {
    width: 16,
    poly: 0x1021,
    init: 0x0000,
    refin: false,
    refout: false,
    xorout: 0x0000,
    check: 0x31C3,
    residue: 0x0000,
};

const KMP_CRC: Crc<u16> = Crc::<u16>::new(&CRC_16_KMP);

/// Calculates the KMP checksum over `data`.
///
/// Running it over data including its (big-endian) checksum yields zero.
pub fn calculate_crc(data: &[u8]) -> u16 {
    KMP_CRC.checksum(data)
}

/// Data of the data link layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLinkData {
    /// Must fit in one byte to be encoded.
    pub destination_address: u16,
    pub application_bytes: ApplicationBytes,
    /// Set when decoded; ignored (recalculated) when encoding.
    pub crc_value: Option<u16>,
}

impl DataLinkData {
    pub fn new(destination_address: u16, application_bytes: ApplicationBytes) -> Self {
        DataLinkData {
            destination_address,
            application_bytes,
            crc_value: None,
        }
    }
}

/// Codec for the data link layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DataLinkCodec;

impl DataLinkCodec {
    /// Address byte, at least one application byte and two CRC bytes.
    pub const DATA_LINK_BYTES_LENGTH_MIN: usize = 4;
    pub const APPLICATION_BYTES_LENGTH_MIN: usize = 1;

    pub fn new() -> Self {
        DataLinkCodec
    }

    /// Destructures data link bytes and verifies the checksum.
    pub fn decode(&self, raw: &DataLinkBytes) -> Result<DataLinkData, KmpError> {
        if raw.len() < Self::DATA_LINK_BYTES_LENGTH_MIN {
            return Err(KmpError::length_min(
                "Data link layer message to destructure",
                raw.len(),
                Self::DATA_LINK_BYTES_LENGTH_MIN,
            ));
        }

        let (without_crc, crc_bytes) = raw.split_at(raw.len() - 2);
        let given = u16::from_be_bytes([crc_bytes[0], crc_bytes[1]]);

        if calculate_crc(raw) != 0 {
            let calculated = calculate_crc(without_crc);
            error!(
                "Checksum verification FAILED [raw={}, crc_given={}, crc_calculated={:x}]",
                hex::encode(raw),
                hex::encode(crc_bytes),
                calculated
            );
            return Err(KmpError::ChecksumInvalid { given, calculated });
        }
        debug!(
            "Checksum verification OK [raw={}, crc_given={}]",
            hex::encode(raw),
            hex::encode(crc_bytes)
        );

        Ok(DataLinkData {
            destination_address: u16::from(without_crc[0]),
            application_bytes: ApplicationBytes::from(&without_crc[1..]),
            crc_value: Some(given),
        })
    }

    /// Builds data link bytes: address, application bytes and the calculated CRC.
    pub fn encode(&self, data: &DataLinkData) -> Result<DataLinkBytes, KmpError> {
        let address = u8::try_from(data.destination_address)
            .map_err(|_| KmpError::InvalidDestinationAddress(data.destination_address))?;

        if data.application_bytes.len() < Self::APPLICATION_BYTES_LENGTH_MIN {
            return Err(KmpError::length_min(
                "Application data",
                data.application_bytes.len(),
                Self::APPLICATION_BYTES_LENGTH_MIN,
            ));
        }

        let mut raw = Vec::with_capacity(data.application_bytes.len() + 3);
        raw.push(address);
        raw.extend_from_slice(&data.application_bytes);
        let crc = calculate_crc(&raw);
        raw.extend_from_slice(&crc.to_be_bytes());
        Ok(DataLinkBytes::new(raw))
    }
}
