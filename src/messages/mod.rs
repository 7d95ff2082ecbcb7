//! # KMP Messages
//!
//! Structured requests and responses on top of the application layer. Every
//! message type knows its command ID and converts from/to [`ApplicationData`].
//!
//! A request type names its response type, so a client can decode a received
//! frame to the right type without any runtime dispatch.
//!
//! ## Usage
//!
//! ```
//! use kmp_rs::messages::{GetSerialResponse, KmpMessage};
//! use kmp_rs::kmp::{ApplicationData, ApplicationDataBytes};
//!
//! let data = ApplicationData::new(0x02u8, ApplicationDataBytes::from(&[0x01, 0x23, 0x45, 0x67]));
//! let response = GetSerialResponse::decode(&data).unwrap();
//! assert_eq!(response.serial, 19088743);
//! ```

pub mod get_register;
pub mod get_serial;
pub mod get_type;

pub use get_register::{GetRegisterRequest, GetRegisterResponse, RegisterData, RegisterId};
pub use get_serial::{GetSerialRequest, GetSerialResponse};
pub use get_type::{GetTypeRequest, GetTypeResponse};

use crate::constants::CommandId;
use crate::error::KmpError;
use crate::kmp::{ApplicationData, ApplicationDataBytes};

/// A message that can be decoded from and encoded to application data.
pub trait KmpMessage: Sized {
    const COMMAND_ID: CommandId;
    /// Name of the command, shared by request and response.
    const COMMAND_NAME: &'static str;
    /// Name of this message type, used in error messages.
    const TYPE_NAME: &'static str;

    fn decode(data: &ApplicationData) -> Result<Self, KmpError>;

    fn encode(&self) -> Result<ApplicationData, KmpError>;
}

/// A message sent to the meter.
pub trait KmpRequest: KmpMessage {
    /// The message the meter answers this request with.
    type Response: KmpResponse;
}

/// A message sent by the meter.
pub trait KmpResponse: KmpMessage {}

/// Fails unless `data` carries the command ID of `M`.
pub(crate) fn validate_command_id<M: KmpMessage>(data: &ApplicationData) -> Result<(), KmpError> {
    let expected = M::COMMAND_ID.value();
    if data.command_id != u16::from(expected) {
        return Err(KmpError::CidMismatch {
            message: M::TYPE_NAME,
            expected,
            actual: data.command_id,
        });
    }
    Ok(())
}

/// Validates a message that is just a command ID without any data.
pub(crate) fn validate_no_data<M: KmpMessage>(data: &ApplicationData) -> Result<(), KmpError> {
    validate_command_id::<M>(data)?;
    if !data.data.is_empty() {
        return Err(KmpError::DataWithNoData {
            message: M::TYPE_NAME,
        });
    }
    Ok(())
}

pub(crate) fn encode_no_data<M: KmpMessage>() -> ApplicationData {
    ApplicationData::new(M::COMMAND_ID.value(), ApplicationDataBytes::default())
}
