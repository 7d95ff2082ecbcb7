//! # GetRegister (CID 0x10)
//!
//! The request holds a count byte and up to eight big-endian register IDs.
//!
//! The response is a sequence of variable length register records:
//!
//! ```text
//! [id:2] [unit:1] [value length L:1] [sign/exponent:1] [mantissa:L]
//!                 \_____________ register value ______________/
//! ```
//!
//! The register value is kept in its raw floating point encoding; use
//! [`crate::payload::FloatCodec`] to turn it into a number.

use super::{validate_command_id, KmpMessage, KmpRequest, KmpResponse};
use crate::constants::CommandId;
use crate::error::{KmpError, ValidRange};
use crate::kmp::{ApplicationData, ApplicationDataBytes};
use indexmap::IndexMap;
use log::{debug, warn};
use nom::multi::count;
use nom::number::complete::{be_u16, be_u8};
use nom::sequence::tuple;
use nom::IResult;
use std::fmt;

const NUM_REGISTERS_MAX: usize = 8;
const REGISTER_ID_LENGTH: usize = 2;

/// Register ID, unit byte and value length byte.
const REGISTER_HEADER_LENGTH: usize = 4;
/// Header plus the sign/exponent byte and one mantissa byte.
const REGISTER_RECORD_LENGTH_MIN: usize = REGISTER_HEADER_LENGTH + 2;

/// Numeric identifier of a register on the meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegisterId(pub u16);

impl RegisterId {
    pub const fn value(self) -> u16 {
        self.0
    }
}

impl From<u16> for RegisterId {
    fn from(id: u16) -> Self {
        RegisterId(id)
    }
}

impl TryFrom<i64> for RegisterId {
    type Error = KmpError;

    fn try_from(id: i64) -> Result<Self, Self::Error> {
        u16::try_from(id).map(RegisterId).map_err(|_| {
            KmpError::out_of_range(
                "Register ID",
                ValidRange::between(0, i128::from(u16::MAX)),
                id,
            )
        })
    }
}

impl fmt::Display for RegisterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One register from a GetRegister response, value still encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterData {
    pub id: RegisterId,
    pub unit: u8,
    /// Value in floating point format, including its length byte.
    pub value: Vec<u8>,
}

impl RegisterData {
    pub fn new(id: impl Into<RegisterId>, unit: u8, value: impl Into<Vec<u8>>) -> Self {
        RegisterData {
            id: id.into(),
            unit,
            value: value.into(),
        }
    }
}

/// Requests the values of one or more registers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetRegisterRequest {
    pub registers: Vec<RegisterId>,
    pub data_raw: Option<ApplicationDataBytes>,
}

impl GetRegisterRequest {
    pub fn new(registers: impl IntoIterator<Item = RegisterId>) -> Self {
        GetRegisterRequest {
            registers: registers.into_iter().collect(),
            data_raw: None,
        }
    }

    /// Builds a request from plain integers, validating each register ID.
    pub fn from_ids(ids: impl IntoIterator<Item = i64>) -> Result<Self, KmpError> {
        let registers = ids
            .into_iter()
            .map(RegisterId::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(registers))
    }

    fn parse_register_ids(input: &[u8], num_registers: usize) -> IResult<&[u8], Vec<u16>> {
        count(be_u16, num_registers)(input)
    }
}

impl KmpMessage for GetRegisterRequest {
    const COMMAND_ID: CommandId = CommandId::GetRegister;
    const COMMAND_NAME: &'static str = "GetRegister";
    const TYPE_NAME: &'static str = "GetRegisterRequest";

    fn decode(data: &ApplicationData) -> Result<Self, KmpError> {
        validate_command_id::<Self>(data)?;

        let Some((&num_registers, packed)) = data.data.split_first() else {
            return Err(KmpError::length_min(
                format!("{} request data", Self::COMMAND_NAME),
                0,
                1,
            ));
        };

        let num_registers = usize::from(num_registers);
        if !(1..=NUM_REGISTERS_MAX).contains(&num_registers) {
            warn!(
                "Number of registers ({}) in {} request is outside the defined range (1-{}).",
                num_registers,
                Self::COMMAND_NAME,
                NUM_REGISTERS_MAX
            );
        }

        let length_expected = num_registers * REGISTER_ID_LENGTH;
        if packed.len() != length_expected {
            debug!(
                "{}: Unexpected number of bytes for register IDs (len={} != {}, num_registers={}): {}",
                Self::COMMAND_NAME,
                packed.len(),
                length_expected,
                num_registers,
                hex::encode_upper(packed)
            );
            return Err(KmpError::length(
                format!(
                    "{} request data for {} register ID(s)",
                    Self::COMMAND_NAME,
                    num_registers
                ),
                packed.len(),
                length_expected,
            ));
        }

        let (_, ids) = Self::parse_register_ids(packed, num_registers).map_err(|_| {
            KmpError::length(
                format!("{} request data", Self::COMMAND_NAME),
                packed.len(),
                length_expected,
            )
        })?;

        Ok(GetRegisterRequest {
            registers: ids.into_iter().map(RegisterId).collect(),
            data_raw: Some(data.data.clone()),
        })
    }

    fn encode(&self) -> Result<ApplicationData, KmpError> {
        let num_registers = self.registers.len();
        if !(1..=NUM_REGISTERS_MAX).contains(&num_registers) {
            return Err(KmpError::out_of_range(
                format!("Number of registers requested in {} request", Self::COMMAND_NAME),
                ValidRange::between(1, NUM_REGISTERS_MAX as i128),
                num_registers as i128,
            ));
        }

        let mut raw = Vec::with_capacity(1 + num_registers * REGISTER_ID_LENGTH);
        raw.push(num_registers as u8);
        for register in &self.registers {
            raw.extend_from_slice(&register.0.to_be_bytes());
        }
        Ok(ApplicationData::new(
            Self::COMMAND_ID.value(),
            ApplicationDataBytes::new(raw),
        ))
    }
}

impl KmpRequest for GetRegisterRequest {
    type Response = GetRegisterResponse;
}

/// Register values, in the order the meter sent them.
///
/// A register ID that appears more than once keeps its first position and
/// the value of its last occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetRegisterResponse {
    pub registers: IndexMap<RegisterId, RegisterData>,
    pub data_raw: Option<ApplicationDataBytes>,
}

impl GetRegisterResponse {
    pub fn new(registers: impl IntoIterator<Item = RegisterData>) -> Self {
        GetRegisterResponse {
            registers: registers
                .into_iter()
                .map(|register| (register.id, register))
                .collect(),
            data_raw: None,
        }
    }

    fn parse_register_header(input: &[u8]) -> IResult<&[u8], (u16, u8, u8)> {
        tuple((be_u16, be_u8, be_u8))(input)
    }

    /// Peels one register record off the front of `raw`.
    fn decode_one_register(raw: &[u8]) -> Result<(RegisterData, &[u8]), KmpError> {
        debug!(
            "Decoding register bytes. [raw={}, length_min={}]",
            hex::encode_upper(raw),
            REGISTER_RECORD_LENGTH_MIN
        );
        if raw.len() < REGISTER_RECORD_LENGTH_MIN {
            return Err(KmpError::length_min(
                "Data to decode register data",
                raw.len(),
                REGISTER_RECORD_LENGTH_MIN,
            ));
        }

        let (_, (id, unit, value_length)) = Self::parse_register_header(raw).map_err(|_| {
            KmpError::length_min(
                "Data to decode register data",
                raw.len(),
                REGISTER_RECORD_LENGTH_MIN,
            )
        })?;

        // length byte counts the mantissa only, not the sign/exponent byte
        let record_length = REGISTER_HEADER_LENGTH + usize::from(value_length) + 1;
        if raw.len() < record_length {
            return Err(KmpError::length_min(
                "Register value data left in buffer",
                raw.len(),
                record_length,
            ));
        }

        let register = RegisterData::new(id, unit, &raw[REGISTER_HEADER_LENGTH - 1..record_length]);
        let remaining = &raw[record_length..];
        if !remaining.is_empty() && remaining.len() < REGISTER_RECORD_LENGTH_MIN {
            warn!(
                "Remaining data after decoding register value is unexpectedly short. [len={}, min={}]",
                remaining.len(),
                REGISTER_RECORD_LENGTH_MIN
            );
        }
        Ok((register, remaining))
    }
}

impl KmpMessage for GetRegisterResponse {
    const COMMAND_ID: CommandId = CommandId::GetRegister;
    const COMMAND_NAME: &'static str = "GetRegister";
    const TYPE_NAME: &'static str = "GetRegisterResponse";

    fn decode(data: &ApplicationData) -> Result<Self, KmpError> {
        validate_command_id::<Self>(data)?;

        let mut registers = IndexMap::new();
        let mut remaining = data.data.as_slice();
        while !remaining.is_empty() {
            let (register, rest) = Self::decode_one_register(remaining)?;
            remaining = rest;
            debug!(
                "Decoded register values: [id={}, unit={}, value_bytes={}, remaining bytes={}]",
                register.id,
                register.unit,
                hex::encode_upper(&register.value),
                remaining.len()
            );
            if registers.contains_key(&register.id) {
                warn!(
                    "Duplicate register ID {} in response, overwriting value.",
                    register.id
                );
            }
            registers.insert(register.id, register);
        }

        Ok(GetRegisterResponse {
            registers,
            data_raw: Some(data.data.clone()),
        })
    }

    fn encode(&self) -> Result<ApplicationData, KmpError> {
        let mut raw = Vec::new();
        for register in self.registers.values() {
            raw.extend_from_slice(&register.id.0.to_be_bytes());
            raw.push(register.unit);
            raw.extend_from_slice(&register.value);
        }
        Ok(ApplicationData::new(
            Self::COMMAND_ID.value(),
            ApplicationDataBytes::new(raw),
        ))
    }
}

impl KmpResponse for GetRegisterResponse {}
