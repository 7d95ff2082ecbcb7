//! # KMP Error Handling
//!
//! This module defines the KmpError enum, which represents the different error
//! types that can occur in the kmp-rs crate. Each variant formats its own message.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Inclusive range of valid values; either bound may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidRange {
    pub lower: Option<i128>,
    pub upper: Option<i128>,
}

impl ValidRange {
    pub const fn between(lower: i128, upper: i128) -> Self {
        ValidRange {
            lower: Some(lower),
            upper: Some(upper),
        }
    }

    pub const fn at_least(lower: i128) -> Self {
        ValidRange {
            lower: Some(lower),
            upper: None,
        }
    }

    pub const fn at_most(upper: i128) -> Self {
        ValidRange {
            lower: None,
            upper: Some(upper),
        }
    }

    pub fn contains(&self, value: i128) -> bool {
        self.lower.map_or(true, |lower| value >= lower)
            && self.upper.map_or(true, |upper| value <= upper)
    }
}

/// Which framing byte of a physical frame was wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryByte {
    Start,
    Stop,
}

impl fmt::Display for BoundaryByte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryByte::Start => f.write_str("start"),
            BoundaryByte::Stop => f.write_str("stop"),
        }
    }
}

/// Represents the different error types that can occur in the KMP crate.
#[derive(Debug, Error)]
pub enum KmpError {
    /// Wrong or insufficient number of bytes at a layer boundary.
    #[error("{}", length_message(.what, *.actual, *.expected, *.expected_is_minimum))]
    LengthUnexpected {
        what: String,
        actual: usize,
        expected: Option<usize>,
        expected_is_minimum: bool,
    },

    /// First or last byte of a frame is not the start or stop byte respectively.
    #[error(
        "Frame expected {which} byte is {expected} (hex: {expected:02X}), but got {actual} (hex: {actual:02X})"
    )]
    BoundaryByteInvalid {
        which: BoundaryByte,
        expected: u8,
        actual: u8,
    },

    /// CRC verification of the data link bytes did not pass.
    #[error("CRC checksum invalid: given {given:04X}, calculated {calculated:04X}")]
    ChecksumInvalid { given: u16, calculated: u16 },

    /// Destination address does not fit in one byte.
    #[error("Invalid destination address for data link layer")]
    InvalidDestinationAddress(u16),

    /// A numeric field is outside its (inclusive) valid range.
    #[error("{}", range_message(.what, .range, *.actual))]
    OutOfRange {
        what: String,
        range: ValidRange,
        actual: i128,
    },

    /// The decimal cannot be expressed as the base-10 float format (no integer exponent).
    #[error("Unsupported exponent {actual} where an integer is expected.")]
    UnsupportedExponent { actual: String },

    #[error("Invalid decimal value '{0}'.")]
    DecimalInvalid(String),

    /// Command ID in the data does not match the message type to decode to.
    #[error("Expected Command ID {expected} for {message}, got {actual}.")]
    CidMismatch {
        message: &'static str,
        expected: u8,
        actual: u16,
    },

    /// A command without payload received data (aside the command ID).
    #[error("{message} does not take any data.")]
    DataWithNoData { message: &'static str },

    #[error("Software revision string '{0}' is invalid.")]
    SoftwareRevisionInvalid(String),

    #[error("Serial '{0}' is invalid; should contain digits only.")]
    SerialNumberInvalid(String),

    /// A bare ACK frame arrived where a response with data was expected.
    #[error("Received an ACK frame instead of a response with data")]
    UnexpectedAck,

    /// Indicates an error related to the serial port or socket communication.
    #[error("Serial port error: {0}")]
    SerialPortError(String),

    /// No bytes were received within the configured read timeout.
    #[error("Did not receive any bytes within {} seconds.", seconds(.0))]
    Timeout(Duration),
}

impl KmpError {
    /// Length error with an exact expected length.
    pub fn length(what: impl Into<String>, actual: usize, expected: usize) -> Self {
        KmpError::LengthUnexpected {
            what: what.into(),
            actual,
            expected: Some(expected),
            expected_is_minimum: false,
        }
    }

    /// Length error where the expected length is a minimum.
    pub fn length_min(what: impl Into<String>, actual: usize, minimum: usize) -> Self {
        KmpError::LengthUnexpected {
            what: what.into(),
            actual,
            expected: Some(minimum),
            expected_is_minimum: true,
        }
    }

    /// Length error without a specific expectation (typically: empty input).
    pub fn length_unspecified(what: impl Into<String>, actual: usize) -> Self {
        KmpError::LengthUnexpected {
            what: what.into(),
            actual,
            expected: None,
            expected_is_minimum: false,
        }
    }

    pub fn out_of_range(what: impl Into<String>, range: ValidRange, actual: impl Into<i128>) -> Self {
        KmpError::OutOfRange {
            what: what.into(),
            range,
            actual: actual.into(),
        }
    }
}

fn length_message(what: &str, actual: usize, expected: Option<usize>, minimum: bool) -> String {
    match expected {
        Some(expected) => format!(
            "{what} is of length {actual}, expected length is {expected}{}.",
            if minimum { " at minimum" } else { "" }
        ),
        None if actual == 0 => format!("{what} is of zero length."),
        None => format!("{what} is of unexpected length."),
    }
}

fn seconds(duration: &Duration) -> f64 {
    duration.as_secs_f64()
}

fn range_message(what: &str, range: &ValidRange, actual: i128) -> String {
    match (range.lower, range.upper) {
        (Some(lower), Some(upper)) => {
            format!("{what} is out of range [{lower},{upper}]: {actual}.")
        }
        (None, Some(upper)) => format!("{what} is over maximum of {upper}: {actual}."),
        (Some(lower), None) => format!("{what} is under minimum of {lower}: {actual}."),
        (None, None) => format!("{what} is invalid: {actual}."),
    }
}
