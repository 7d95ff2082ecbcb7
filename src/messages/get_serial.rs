//! GetSerialNo (CID 0x02): the meter serial number.

use super::{encode_no_data, validate_command_id, validate_no_data};
use super::{KmpMessage, KmpRequest, KmpResponse};
use crate::constants::CommandId;
use crate::error::{KmpError, ValidRange};
use crate::kmp::{ApplicationData, ApplicationDataBytes};
use std::fmt;
use std::str::FromStr;

const SERIAL_LENGTH: usize = 4;

/// Requests the serial number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetSerialRequest;

impl KmpMessage for GetSerialRequest {
    const COMMAND_ID: CommandId = CommandId::GetSerial;
    const COMMAND_NAME: &'static str = "GetSerialNo";
    const TYPE_NAME: &'static str = "GetSerialRequest";

    fn decode(data: &ApplicationData) -> Result<Self, KmpError> {
        validate_no_data::<Self>(data)?;
        Ok(GetSerialRequest)
    }

    fn encode(&self) -> Result<ApplicationData, KmpError> {
        Ok(encode_no_data::<Self>())
    }
}

impl KmpRequest for GetSerialRequest {
    type Response = GetSerialResponse;
}

/// The meter serial number, a 32 bit unsigned integer on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetSerialResponse {
    pub serial: u32,
    pub data_raw: Option<ApplicationDataBytes>,
}

impl GetSerialResponse {
    pub fn new(serial: u32) -> Self {
        GetSerialResponse {
            serial,
            data_raw: None,
        }
    }

    fn serial_range() -> ValidRange {
        ValidRange::between(0, i128::from(u32::MAX))
    }
}

impl fmt::Display for GetSerialResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.serial)
    }
}

/// Parses a serial from its decimal digit string.
impl FromStr for GetSerialResponse {
    type Err = KmpError;

    fn from_str(serial: &str) -> Result<Self, Self::Err> {
        if serial.is_empty() || !serial.bytes().all(|b| b.is_ascii_digit()) {
            return Err(KmpError::SerialNumberInvalid(serial.to_string()));
        }
        // digits only, so the only parse failure left is overflow
        let value = serial
            .parse::<u128>()
            .map_or(i128::MAX, |value| i128::try_from(value).unwrap_or(i128::MAX));
        Self::try_from(value)
    }
}

impl TryFrom<i128> for GetSerialResponse {
    type Error = KmpError;

    fn try_from(value: i128) -> Result<Self, Self::Error> {
        let serial = u32::try_from(value)
            .map_err(|_| KmpError::out_of_range("Serial number", Self::serial_range(), value))?;
        Ok(GetSerialResponse::new(serial))
    }
}

impl KmpMessage for GetSerialResponse {
    const COMMAND_ID: CommandId = CommandId::GetSerial;
    const COMMAND_NAME: &'static str = "GetSerialNo";
    const TYPE_NAME: &'static str = "GetSerialResponse";

    fn decode(data: &ApplicationData) -> Result<Self, KmpError> {
        validate_command_id::<Self>(data)?;
        let bytes: [u8; SERIAL_LENGTH] = data
            .data
            .as_slice()
            .try_into()
            .map_err(|_| KmpError::length("Serial data", data.data.len(), SERIAL_LENGTH))?;

        Ok(GetSerialResponse {
            serial: u32::from_be_bytes(bytes),
            data_raw: Some(data.data.clone()),
        })
    }

    fn encode(&self) -> Result<ApplicationData, KmpError> {
        Ok(ApplicationData::new(
            Self::COMMAND_ID.value(),
            ApplicationDataBytes::from(&self.serial.to_be_bytes()),
        ))
    }
}

impl KmpResponse for GetSerialResponse {}
