//! # KMP Base-10 Floating Point Format
//!
//! Register values are sent in a variable length base-10 floating point format.
//! The mantissa length is encoded and is commonly 32 bits (4 bytes).
//!
//! ```text
//! data: 0x024300FB
//!
//!     0x02     0x43     0x00     0xFB (hex)
//! 00000010 01000011 00000000 11111011 (bin)
//!
//! 00000010 ________ ________ ________ <- length of significand
//! ________ 0_______ ________ ________ <- sign bit for significand 'SI' (1=negative)
//! ________ _1______ ________ ________ <- sign bit for exponent 'SE'
//! ________ __000011 ________ ________ <- 6 exponent bits
//! ________ ________ 00000000 11111011 <- significand (int) 'mantissa'
//! ```
//!
//! value = (-1)^SI * mantissa * 10^((-1)^SE * exponent), here 251 * 10^-3 = 0.251.
//!
//! [`FloatCodec::decode`] keeps every digit by producing a [`BigDecimal`].
//! [`FloatCodec::decode_int_or_float`] is the legacy path returning machine
//! numbers; with a negative exponent it divides in binary floating point and
//! may print as e.g. `63.440000000000005` instead of `63.44`.

use crate::error::{KmpError, ValidRange};
use bigdecimal::BigDecimal;
use log::debug;
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{ToPrimitive, Zero};
use std::str::FromStr;

const SIGN_BIT: u8 = 0b1000_0000;
const EXPONENT_SIGN_BIT: u8 = 0b0100_0000;
const EXPONENT_MASK: u8 = 0b0011_1111;

/// Machine number result of [`FloatCodec::decode_int_or_float`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntOrFloat {
    Int(i128),
    Float(f64),
}

impl IntOrFloat {
    pub fn as_f64(self) -> f64 {
        match self {
            IntOrFloat::Int(value) => value as f64,
            IntOrFloat::Float(value) => value,
        }
    }
}

#[derive(Debug)]
struct FloatParts {
    negative: bool,
    exponent_negative: bool,
    exponent: u8,
    mantissa: BigUint,
}

impl FloatParts {
    fn signed_exponent(&self) -> i64 {
        if self.exponent_negative {
            -i64::from(self.exponent)
        } else {
            i64::from(self.exponent)
        }
    }
}

/// Codec for the variable length base-10 floating point format.
pub struct FloatCodec;

impl FloatCodec {
    /// Mantissa length used by meters for nearly all registers.
    pub const SIGNIFICAND_BYTES_DEFAULT: u8 = 4;

    fn decode_parts(data: &[u8]) -> Result<FloatParts, KmpError> {
        let Some(&integer_length) = data.first() else {
            return Err(KmpError::length_unspecified(
                "Data for floating point decoding",
                0,
            ));
        };
        debug!(
            "Decoding parts of floating point data. [data={}, integer_length={}]",
            hex::encode_upper(data),
            integer_length
        );

        if integer_length == 0 {
            return Err(KmpError::out_of_range(
                "Integer length byte value for floating point data decoding",
                ValidRange::at_least(1),
                0,
            ));
        }

        let length_expected = usize::from(integer_length) + 2;
        if data.len() != length_expected {
            return Err(KmpError::length(
                "Floating point data",
                data.len(),
                length_expected,
            ));
        }

        let sign_exp = data[1];
        Ok(FloatParts {
            negative: sign_exp & SIGN_BIT != 0,
            exponent_negative: sign_exp & EXPONENT_SIGN_BIT != 0,
            exponent: sign_exp & EXPONENT_MASK,
            mantissa: BigUint::from_bytes_be(&data[2..]),
        })
    }

    /// Decodes the floating point format to an exact decimal.
    pub fn decode(data: &[u8]) -> Result<BigDecimal, KmpError> {
        let parts = Self::decode_parts(data)?;
        let exponent = parts.signed_exponent();
        let sign = if parts.negative { Sign::Minus } else { Sign::Plus };
        let digits = BigInt::from_biguint(sign, parts.mantissa.clone());
        let value = BigDecimal::new(digits, -exponent);
        debug!(
            "Decoded floating point data: {} [data={}, man={}, si={}, se={}, exp={}]",
            value,
            hex::encode_upper(data),
            parts.mantissa,
            parts.negative,
            parts.exponent_negative,
            parts.exponent
        );
        Ok(value)
    }

    /// Decodes the floating point format to an integer if the exponent is not
    /// negative, or else to a binary floating point number (lossy).
    ///
    /// Prefer [`FloatCodec::decode`]; this exists for callers that need
    /// machine numbers and accept binary rounding.
    pub fn decode_int_or_float(data: &[u8]) -> Result<IntOrFloat, KmpError> {
        let parts = Self::decode_parts(data)?;

        let value = if parts.exponent_negative {
            let mantissa = parts.mantissa.to_f64().unwrap_or(f64::INFINITY);
            let value = mantissa * 10f64.powf(-f64::from(parts.exponent));
            IntOrFloat::Float(if parts.negative { -value } else { value })
        } else {
            let scaled = &parts.mantissa * BigUint::from(10u8).pow(u32::from(parts.exponent));
            let magnitude = scaled.to_i128().ok_or_else(|| {
                KmpError::out_of_range(
                    "Integer bit length of floating point value",
                    ValidRange::at_most(127),
                    scaled.bits(),
                )
            })?;
            IntOrFloat::Int(if parts.negative { -magnitude } else { magnitude })
        };

        debug!(
            "Decoded floating point data: {:?} [data={}, man={}, si={}, se={}, exp={}]",
            value,
            hex::encode_upper(data),
            parts.mantissa,
            parts.negative,
            parts.exponent_negative,
            parts.exponent
        );
        Ok(value)
    }

    /// Encodes a decimal to the floating point format.
    ///
    /// With `significand_num_bytes` set, the mantissa is zero-padded to exactly
    /// that many bytes. With `None` the shortest form is used.
    pub fn encode(
        value: &BigDecimal,
        significand_num_bytes: Option<u8>,
    ) -> Result<Vec<u8>, KmpError> {
        let (digits, scale) = value.normalized().into_bigint_and_exponent();
        let negative = digits.sign() == Sign::Minus;
        let exponent = -scale;
        let mantissa = digits.magnitude();

        let needed = usize::try_from(mantissa.bits().div_ceil(8)).unwrap_or(usize::MAX);
        let mantissa_length = match significand_num_bytes {
            Some(requested) => {
                if needed > usize::from(requested) {
                    return Err(KmpError::out_of_range(
                        "Significand bytes length of decimal to encode as mantissa",
                        ValidRange::between(i128::from(requested), i128::from(requested)),
                        needed as i128,
                    ));
                }
                usize::from(requested)
            }
            None => needed.max(1),
        };

        let exponent_abs = exponent.unsigned_abs();
        if exponent_abs > u64::from(EXPONENT_MASK) {
            return Err(KmpError::out_of_range(
                format!("Exponent ({exponent_abs}) to encode"),
                ValidRange::at_most(i128::from(EXPONENT_MASK)),
                exponent_abs,
            ));
        }
        let length_byte = u8::try_from(mantissa_length).map_err(|_| {
            KmpError::out_of_range(
                "Significand bytes length of decimal to encode as mantissa",
                ValidRange::between(1, 255),
                mantissa_length as i128,
            )
        })?;

        let mut sign_exp = exponent_abs as u8;
        if negative {
            sign_exp |= SIGN_BIT;
        }
        if exponent < 0 {
            sign_exp |= EXPONENT_SIGN_BIT;
        }

        let mantissa_bytes = if mantissa.is_zero() {
            Vec::new()
        } else {
            mantissa.to_bytes_be()
        };

        let mut encoded = Vec::with_capacity(mantissa_length + 2);
        encoded.push(length_byte);
        encoded.push(sign_exp);
        encoded.resize(2 + mantissa_length - mantissa_bytes.len(), 0);
        encoded.extend_from_slice(&mantissa_bytes);
        Ok(encoded)
    }

    /// Parses a decimal from text and encodes it.
    ///
    /// Non-finite values (`NaN`, `sNaN`, `Infinity`) have no integer exponent
    /// and cannot be represented.
    pub fn encode_str(text: &str, significand_num_bytes: Option<u8>) -> Result<Vec<u8>, KmpError> {
        let trimmed = text.trim();
        let unsigned = trimmed.trim_start_matches(['+', '-']).to_ascii_lowercase();
        let special = match unsigned.as_str() {
            "nan" => Some("n"),
            "snan" => Some("N"),
            "inf" | "infinity" => Some("F"),
            _ => None,
        };
        if let Some(exponent) = special {
            return Err(KmpError::UnsupportedExponent {
                actual: exponent.to_string(),
            });
        }

        let value = BigDecimal::from_str(trimmed)
            .map_err(|_| KmpError::DecimalInvalid(text.to_string()))?;
        Self::encode(&value, significand_num_bytes)
    }
}
