//! # KMP Physical Layer
//!
//! Framing of data link bytes for the wire: a direction dependent start byte,
//! byte stuffing of the special byte values and a stop byte.
//!
//! ```text
//! [start] [stuffed data link bytes ...] [stop]
//! ```
//!
//! An escaped byte is sent as `0x1B` followed by the original byte XOR `0xFF`.
//! The single byte ACK (`0x06`) is sent as-is, without start/stop bytes.
//!
//! ## Usage
//!
//! ```
//! use kmp_rs::kmp::{DataLinkBytes, PhysicalCodec, PhysicalDirection, PhysicalFrame};
//!
//! let codec = PhysicalCodec::new(PhysicalDirection::ToMeter);
//! let frame = codec.encode(&DataLinkBytes::from(&[0x3F, 0x10, 0x01, 0x00, 0x80, 0xD4, 0x08])).unwrap();
//! assert_eq!(frame.as_slice(), &[0x80, 0x3F, 0x10, 0x01, 0x00, 0x1B, 0x7F, 0xD4, 0x08, 0x0D]);
//!
//! let codec = PhysicalCodec::new(PhysicalDirection::FromMeter);
//! assert_eq!(codec.decode(&PhysicalCodec::encode_ack()).unwrap(), PhysicalFrame::Ack);
//! ```

use crate::constants::{
    KMP_ACK, KMP_START_FROM_METER, KMP_START_TO_METER, KMP_STOP, KMP_STUFFED_BYTES, KMP_STUFFING,
};
use crate::error::{BoundaryByte, KmpError};
use crate::kmp::bytes::{DataLinkBytes, PhysicalBytes};

/// Direction of communication; selects the start byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicalDirection {
    ToMeter,
    FromMeter,
}

impl PhysicalDirection {
    pub const fn start_byte(self) -> u8 {
        match self {
            PhysicalDirection::ToMeter => KMP_START_TO_METER,
            PhysicalDirection::FromMeter => KMP_START_FROM_METER,
        }
    }
}

/// Outcome of decoding one physical frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhysicalFrame {
    /// A bare ACK byte; there are no data link bytes.
    Ack,
    /// A regular frame with its de-stuffed content.
    Data(DataLinkBytes),
}

/// Codec for the physical layer, for one direction of communication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicalCodec {
    direction: PhysicalDirection,
    start_byte: u8,
}

impl PhysicalCodec {
    pub const fn new(direction: PhysicalDirection) -> Self {
        PhysicalCodec {
            direction,
            start_byte: direction.start_byte(),
        }
    }

    pub fn direction(&self) -> PhysicalDirection {
        self.direction
    }

    /// Decodes a frame read from the wire.
    ///
    /// The frame must start with the start byte of the configured direction and
    /// end with the stop byte, unless it is a lone ACK byte.
    pub fn decode(&self, frame: &PhysicalBytes) -> Result<PhysicalFrame, KmpError> {
        let raw = frame.as_slice();
        let (first, last) = match (raw.first(), raw.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Err(KmpError::length_unspecified("Frame", 0)),
        };

        if raw == [KMP_ACK] {
            return Ok(PhysicalFrame::Ack);
        }

        if first != self.start_byte {
            return Err(KmpError::BoundaryByteInvalid {
                which: BoundaryByte::Start,
                expected: self.start_byte,
                actual: first,
            });
        }
        if last != KMP_STOP || raw.len() < 2 {
            return Err(KmpError::BoundaryByteInvalid {
                which: BoundaryByte::Stop,
                expected: KMP_STOP,
                actual: last,
            });
        }

        Ok(PhysicalFrame::Data(DataLinkBytes::new(destuff(
            &raw[1..raw.len() - 1],
        ))))
    }

    /// Encodes data link bytes to a frame: stuffing plus start/stop bytes.
    ///
    /// For an ACK see [`PhysicalCodec::encode_ack`].
    pub fn encode(&self, data: &DataLinkBytes) -> Result<PhysicalBytes, KmpError> {
        if data.is_empty() {
            return Err(KmpError::length_unspecified("Data link bytes", 0));
        }

        let mut frame = Vec::with_capacity(data.len() * 2 + 2);
        frame.push(self.start_byte);
        for &byte in data.iter() {
            if is_stuffed(byte) {
                frame.push(KMP_STUFFING);
                frame.push(byte ^ 0xFF);
            } else {
                frame.push(byte);
            }
        }
        frame.push(KMP_STOP);
        Ok(PhysicalBytes::new(frame))
    }

    /// The ACK frame; never stuffed or framed, identical for both directions.
    pub fn encode_ack() -> PhysicalBytes {
        PhysicalBytes::new(vec![KMP_ACK])
    }
}

fn is_stuffed(byte: u8) -> bool {
    KMP_STUFFED_BYTES.contains(&byte)
}

/// Reverses the byte stuffing. An escape byte that is not followed by the
/// complement of a special byte is kept as-is.
fn destuff(stuffed: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(stuffed.len());
    let mut i = 0;
    while i < stuffed.len() {
        let byte = stuffed[i];
        match stuffed.get(i + 1) {
            Some(&next) if byte == KMP_STUFFING && is_stuffed(next ^ 0xFF) => {
                out.push(next ^ 0xFF);
                i += 2;
            }
            _ => {
                out.push(byte);
                i += 1;
            }
        }
    }
    out
}
