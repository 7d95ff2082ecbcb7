//! # KMP Client Codec
//!
//! Runs a message through all protocol layers: encoding goes from a request
//! message down to physical bytes, decoding goes from the received physical
//! bytes up to the response message paired with the request.
//!
//! ## Usage
//!
//! ```
//! use kmp_rs::kmp::{ClientCodec, EncodedResponse, PhysicalBytes};
//! use kmp_rs::messages::GetSerialRequest;
//!
//! let codec = ClientCodec::default();
//! let encoded = codec.encode(&GetSerialRequest).unwrap();
//! assert_eq!(encoded.physical_bytes().as_slice(), &[0x80, 0x3F, 0x02, 0x35, 0xE9, 0x0D]);
//!
//! let received = PhysicalBytes::from(&[0x40, 0x3F, 0x02, 0x01, 0x23, 0x45, 0x67, 0xE9, 0x56, 0x0D]);
//! let response = codec.decode(&EncodedResponse::<GetSerialRequest>::new(received)).unwrap();
//! assert_eq!(response.serial, 19088743);
//! ```

use crate::constants::KMP_DESTINATION_ADDRESS_DEFAULT;
use crate::error::KmpError;
use crate::kmp::application::{ApplicationCodec, ApplicationData};
use crate::kmp::bytes::PhysicalBytes;
use crate::kmp::data_link::{DataLinkCodec, DataLinkData};
use crate::kmp::physical::{PhysicalCodec, PhysicalDirection, PhysicalFrame};
use crate::messages::{KmpMessage, KmpRequest};
use log::debug;
use std::marker::PhantomData;

/// Physical bytes of an encoded request of type `R`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedRequest<R> {
    physical_bytes: PhysicalBytes,
    _request: PhantomData<R>,
}

impl<R: KmpRequest> EncodedRequest<R> {
    pub fn physical_bytes(&self) -> &PhysicalBytes {
        &self.physical_bytes
    }

    pub fn into_physical_bytes(self) -> PhysicalBytes {
        self.physical_bytes
    }
}

/// Physical bytes received in response to a request of type `R`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedResponse<R> {
    physical_bytes: PhysicalBytes,
    _request: PhantomData<R>,
}

impl<R: KmpRequest> EncodedResponse<R> {
    pub fn new(physical_bytes: PhysicalBytes) -> Self {
        EncodedResponse {
            physical_bytes,
            _request: PhantomData,
        }
    }

    pub fn physical_bytes(&self) -> &PhysicalBytes {
        &self.physical_bytes
    }
}

/// Encoder/decoder for one destination address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientCodec {
    pub destination_address: u16,
    data_link: DataLinkCodec,
    application: ApplicationCodec,
}

impl Default for ClientCodec {
    fn default() -> Self {
        Self::new(u16::from(KMP_DESTINATION_ADDRESS_DEFAULT))
    }
}

impl ClientCodec {
    const PHYSICAL_TO_METER: PhysicalCodec = PhysicalCodec::new(PhysicalDirection::ToMeter);
    const PHYSICAL_FROM_METER: PhysicalCodec = PhysicalCodec::new(PhysicalDirection::FromMeter);

    pub fn new(destination_address: u16) -> Self {
        ClientCodec {
            destination_address,
            data_link: DataLinkCodec,
            application: ApplicationCodec,
        }
    }

    /// Encodes a request message to physical bytes to send to the meter.
    pub fn encode<R: KmpRequest>(&self, request: &R) -> Result<EncodedRequest<R>, KmpError> {
        let application_data = request.encode()?;
        let application_bytes = self.application.encode(&application_data)?;
        let data_link_bytes = self.data_link.encode(&DataLinkData::new(
            self.destination_address,
            application_bytes,
        ))?;
        let physical_bytes = Self::PHYSICAL_TO_METER.encode(&data_link_bytes)?;
        debug!(
            "Encoded {} to {}",
            R::TYPE_NAME,
            physical_bytes.to_hex()
        );

        Ok(EncodedRequest {
            physical_bytes,
            _request: PhantomData,
        })
    }

    /// Decodes bytes received from the meter to the response of request `R`.
    ///
    /// A bare ACK frame results in [`KmpError::UnexpectedAck`].
    pub fn decode<R: KmpRequest>(
        &self,
        frame: &EncodedResponse<R>,
    ) -> Result<R::Response, KmpError> {
        let data_link_bytes = match Self::PHYSICAL_FROM_METER.decode(&frame.physical_bytes)? {
            PhysicalFrame::Ack => return Err(KmpError::UnexpectedAck),
            PhysicalFrame::Data(bytes) => bytes,
        };
        let data_link = self.data_link.decode(&data_link_bytes)?;
        let application_data: ApplicationData =
            self.application.decode(&data_link.application_bytes)?;
        debug!(
            "Decoding {} [cid={}, data={}]",
            <R::Response as KmpMessage>::TYPE_NAME,
            application_data.command_id,
            application_data.data.to_hex()
        );
        <R::Response as KmpMessage>::decode(&application_data)
    }
}
