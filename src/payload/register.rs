//! # Register Presentation
//!
//! Turns a [`RegisterData`] from a GetRegister response into something a user
//! can read: the value decoded from its floating point format, together with
//! the register name and unit looked up in the known tables.

use crate::constants::{register_name, unit_name, KMP_REGISTERS};
use crate::error::KmpError;
use crate::messages::RegisterData;
use crate::payload::float::FloatCodec;
use bigdecimal::BigDecimal;
use log::warn;
use serde::Serialize;

/// One register prepared for text or JSON output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisterOutput {
    pub id_int: u16,
    pub id_hex: String,
    pub name: String,
    pub unit_int: u8,
    pub unit_hex: String,
    pub unit_str: String,
    pub value_float: f64,
    /// Exact decimal value.
    pub value_str: String,
    #[serde(skip)]
    pub value_dec: BigDecimal,
}

impl RegisterOutput {
    pub fn new(id: u16, unit: u8, value: BigDecimal) -> Self {
        RegisterOutput {
            id_int: id,
            id_hex: format!("0x{id:04X}"),
            name: register_name(id)
                .map(str::to_string)
                .unwrap_or_else(|| format!("<unknown reg {id}>")),
            unit_int: unit,
            unit_hex: format!("0x{unit:02X}"),
            unit_str: unit_name(unit)
                .map(str::to_string)
                .unwrap_or_else(|| format!("<unknown unit {unit}>")),
            // parsed from text for correct rounding of values like 0.251
            value_float: value.to_string().parse().unwrap_or(f64::NAN),
            value_str: value.to_string(),
            value_dec: value,
        }
    }

    /// Decodes the register value.
    pub fn from_register_data(register: &RegisterData) -> Result<Self, KmpError> {
        let value = FloatCodec::decode(&register.value)?;
        Ok(Self::new(register.id.value(), register.unit, value))
    }

    /// One aligned line: `  60 → Heat Energy (E1)    = 1234.5 GJ`.
    pub fn to_pretty_line(&self) -> String {
        format!(
            "{:>4} → {:<width$} = {} {}",
            self.id_int,
            self.name,
            self.value_str,
            self.unit_str,
            width = register_names_width()
        )
    }
}

fn register_names_width() -> usize {
    KMP_REGISTERS
        .iter()
        .map(|(_, name)| name.chars().count())
        .max()
        .unwrap_or(0)
}

/// Logs a warning if any register ID or unit is not in the known tables.
pub fn warn_registers_unknowns<'a>(registers: impl IntoIterator<Item = &'a RegisterData>) {
    let (mut unknown_unit, mut unknown_id) = (false, false);
    for register in registers {
        unknown_unit |= unit_name(register.unit).is_none();
        unknown_id |= register_name(register.id.value()).is_none();
    }

    if unknown_unit {
        warn!(
            "Unknown unit(s) in output; please report this if you have more information. \
             Optimistic value decoding as floating point may fail."
        );
    }
    if unknown_id {
        warn!("Unknown register ID(s); please report this if you have more information.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_known_register_output() {
        let register = RegisterData::new(0x3Cu16, 0x08, vec![0x04, 0x43, 0x00, 0x00, 0x00, 0xFB]);
        let output = RegisterOutput::from_register_data(&register).unwrap();
        assert_eq!(output.id_hex, "0x003C");
        assert_eq!(output.name, "Heat Energy (E1)");
        assert_eq!(output.unit_hex, "0x08");
        assert_eq!(output.unit_str, "GJ");
        assert_eq!(output.value_str, "0.251");
        assert_eq!(output.value_float, 0.251);
        assert_eq!(output.value_dec, BigDecimal::from_str("0.251").unwrap());
    }

    #[test]
    fn test_unknown_register_and_unit() {
        let output = RegisterOutput::new(2, 0x99, BigDecimal::from(5));
        assert_eq!(output.name, "<unknown reg 2>");
        assert_eq!(output.unit_str, "<unknown unit 153>");
    }

    #[test]
    fn test_pretty_line_alignment() {
        let output = RegisterOutput::new(60, 0x02, BigDecimal::from(12));
        let line = output.to_pretty_line();
        assert!(line.starts_with("  60 → Heat Energy (E1)"));
        assert!(line.ends_with(" = 12 kWh"));
    }

    #[test]
    fn test_json_skips_decimal() {
        let output = RegisterOutput::new(60, 0x02, BigDecimal::from(12));
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["id_int"], 60);
        assert_eq!(json["value_str"], "12");
        assert!(json.get("value_dec").is_none());
    }
}
