//! The kmp module contains the protocol layers (physical, data link and
//! application), the client codec running messages through all of them, and
//! the device handle that exchanges frames with a meter.

pub mod application;
pub mod bytes;
pub mod client;
pub mod data_link;
pub mod physical;
pub mod serial;
pub mod serial_mock;

pub use application::{ApplicationCodec, ApplicationData};
pub use bytes::{ApplicationBytes, ApplicationDataBytes, DataLinkBytes, PhysicalBytes};
pub use client::{ClientCodec, EncodedRequest, EncodedResponse};
pub use data_link::{calculate_crc, DataLinkCodec, DataLinkData};
pub use physical::{PhysicalCodec, PhysicalDirection, PhysicalFrame};
pub use serial::KmpDeviceHandle;
