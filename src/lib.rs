//! # kmp-rs - A Rust Crate for the Kamstrup Meter Protocol (KMP)
//!
//! The kmp-rs crate implements the KMP protocol used to read heat meters and
//! other utility meters through an optical head on a half duplex serial line.
//!
//! ## Features
//!
//! - Physical layer framing with byte stuffing and ACK detection
//! - Data link layer addressing with the KMP CRC-16 checksum
//! - Application layer command framing
//! - The variable length base-10 floating point format of register values, decoded without precision loss
//! - GetType, GetSerialNo and GetRegister requests and responses
//! - An async device handle for serial ports and TCP sockets
//! - Support for logging and error handling
//!
//! ## Usage
//!
//! ```rust
//! use kmp_rs::{ClientCodec, EncodedResponse, FloatCodec, PhysicalBytes};
//! use kmp_rs::messages::{GetRegisterRequest, RegisterId};
//!
//! let codec = ClientCodec::default();
//! let request = GetRegisterRequest::new([RegisterId(128)]);
//! let encoded = codec.encode(&request).unwrap();
//! assert_eq!(encoded.physical_bytes().to_hex(), "803F1001001B7FD4080D");
//!
//! let received = PhysicalBytes::from(&[
//!     0x40, 0x3F, 0x10, 0x00, 0x1B, 0x7F, 0x16, 0x04, 0x11, 0x01, 0x2A, 0xF0, 0x24, 0x63, 0x03, 0x0D,
//! ]);
//! let response = codec.decode(&EncodedResponse::<GetRegisterRequest>::new(received)).unwrap();
//! let value = FloatCodec::decode(&response.registers[&RegisterId(128)].value).unwrap();
//! assert_eq!(value.to_string().parse::<f64>().unwrap(), 1.9591204e24);
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod kmp;
pub mod logging;
pub mod messages;
pub mod payload;

pub use crate::config::ClientConfig;
pub use crate::error::KmpError;
pub use crate::logging::{init_logger, init_with_verbosity};

pub use kmp::{
    ApplicationBytes, ApplicationCodec, ApplicationData, ApplicationDataBytes, ClientCodec,
    DataLinkBytes, DataLinkCodec, DataLinkData, EncodedRequest, EncodedResponse,
    KmpDeviceHandle, PhysicalBytes, PhysicalCodec, PhysicalDirection, PhysicalFrame,
};
pub use messages::{KmpMessage, KmpRequest, KmpResponse};
pub use payload::{FloatCodec, IntOrFloat, RegisterOutput};
