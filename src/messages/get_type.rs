//! GetType (CID 0x01): meter type and software revision.

use super::{encode_no_data, validate_command_id, validate_no_data};
use super::{KmpMessage, KmpRequest, KmpResponse};
use crate::constants::CommandId;
use crate::error::{KmpError, ValidRange};
use crate::kmp::{ApplicationData, ApplicationDataBytes};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

const METER_TYPE_LENGTH: usize = 2;
const SOFTWARE_REVISION_LENGTH: usize = 2;
const SOFTWARE_REVISION_LETTER_MIN: u8 = 1;
const SOFTWARE_REVISION_LETTER_MAX: u8 = 26;
const SOFTWARE_REVISION_UNAVAILABLE: [u8; 2] = [0x00, 0x00];

/// One uppercase letter followed by a number 0-255.
static SOFTWARE_REVISION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<letter>[A-Z])(?P<number>1?[0-9]{1,2}|2[0-4][0-9]|25[0-5])$")
        .unwrap_or_else(|e| unreachable!("software revision pattern is valid: {e}"))
});

/// Requests the meter type and software revision.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetTypeRequest;

impl KmpMessage for GetTypeRequest {
    const COMMAND_ID: CommandId = CommandId::GetType;
    const COMMAND_NAME: &'static str = "GetType";
    const TYPE_NAME: &'static str = "GetTypeRequest";

    fn decode(data: &ApplicationData) -> Result<Self, KmpError> {
        validate_no_data::<Self>(data)?;
        Ok(GetTypeRequest)
    }

    fn encode(&self) -> Result<ApplicationData, KmpError> {
        Ok(encode_no_data::<Self>())
    }
}

impl KmpRequest for GetTypeRequest {
    type Response = GetTypeResponse;
}

/// Meter type and software revision.
///
/// The software revision is a letter and a number, e.g. `"F1"`. Meters that do
/// not report it send two zero bytes, decoded as `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetTypeResponse {
    /// Opaque meter type code.
    pub meter_type: [u8; 2],
    pub software_revision: Option<String>,
    /// Data as received, if decoded.
    pub data_raw: Option<ApplicationDataBytes>,
}

impl GetTypeResponse {
    pub fn new(meter_type: [u8; 2], software_revision: Option<String>) -> Self {
        GetTypeResponse {
            meter_type,
            software_revision,
            data_raw: None,
        }
    }

    fn decode_software_revision(bytes: [u8; 2]) -> Result<Option<String>, KmpError> {
        if bytes == SOFTWARE_REVISION_UNAVAILABLE {
            return Ok(None);
        }

        let [letter, number] = bytes;
        if !(SOFTWARE_REVISION_LETTER_MIN..=SOFTWARE_REVISION_LETTER_MAX).contains(&letter) {
            debug!(
                "Decoding {} response; software revision letter out of range. [data={}]",
                Self::COMMAND_NAME,
                hex::encode_upper(bytes)
            );
            return Err(KmpError::out_of_range(
                "Software revision letter (int value)",
                ValidRange::between(
                    i128::from(SOFTWARE_REVISION_LETTER_MIN),
                    i128::from(SOFTWARE_REVISION_LETTER_MAX),
                ),
                letter,
            ));
        }

        // 0x01 is 'A'
        let letter = char::from(b'A' + letter - 1);
        Ok(Some(format!("{letter}{number}")))
    }

    fn encode_software_revision(revision: &str) -> Result<[u8; 2], KmpError> {
        let invalid = || KmpError::SoftwareRevisionInvalid(revision.to_string());
        let captures = SOFTWARE_REVISION_RE.captures(revision).ok_or_else(invalid)?;

        let letter = captures
            .name("letter")
            .and_then(|m| m.as_str().bytes().next())
            .ok_or_else(invalid)?;
        let number: u8 = captures
            .name("number")
            .and_then(|m| m.as_str().parse().ok())
            .ok_or_else(invalid)?;

        Ok([letter - b'A' + 1, number])
    }
}

impl KmpMessage for GetTypeResponse {
    const COMMAND_ID: CommandId = CommandId::GetType;
    const COMMAND_NAME: &'static str = "GetType";
    const TYPE_NAME: &'static str = "GetTypeResponse";

    fn decode(data: &ApplicationData) -> Result<Self, KmpError> {
        validate_command_id::<Self>(data)?;

        let length_expected = METER_TYPE_LENGTH + SOFTWARE_REVISION_LENGTH;
        debug!(
            "Decoding GetType data. [len={}, expected_len={}, data={}]",
            data.data.len(),
            length_expected,
            data.data.to_hex()
        );
        let bytes: [u8; 4] = data
            .data
            .as_slice()
            .try_into()
            .map_err(|_| KmpError::length("GetType response data", data.data.len(), length_expected))?;

        Ok(GetTypeResponse {
            meter_type: [bytes[0], bytes[1]],
            software_revision: Self::decode_software_revision([bytes[2], bytes[3]])?,
            data_raw: Some(data.data.clone()),
        })
    }

    fn encode(&self) -> Result<ApplicationData, KmpError> {
        debug!(
            "Encoding {} response [meter_type={}, software_revision={:?}]",
            Self::COMMAND_NAME,
            hex::encode_upper(self.meter_type),
            self.software_revision
        );
        let revision = match &self.software_revision {
            Some(revision) => Self::encode_software_revision(revision)?,
            None => SOFTWARE_REVISION_UNAVAILABLE,
        };

        let mut raw = Vec::with_capacity(METER_TYPE_LENGTH + SOFTWARE_REVISION_LENGTH);
        raw.extend_from_slice(&self.meter_type);
        raw.extend_from_slice(&revision);
        Ok(ApplicationData::new(
            Self::COMMAND_ID.value(),
            ApplicationDataBytes::new(raw),
        ))
    }
}

impl KmpResponse for GetTypeResponse {}
