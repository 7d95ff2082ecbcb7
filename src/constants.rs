//! KMP Protocol Constants
//!
//! This module defines constants used in the Kamstrup Meter Protocol (KMP)
//! implementation: special byte values of the physical layer, data link
//! addresses, command IDs and the known register/unit tables.

// ----------------------------------------------------------------------------
// Physical layer byte codes
// ----------------------------------------------------------------------------

/// Start byte of a frame sent by the meter
pub const KMP_START_FROM_METER: u8 = 0x40;

/// Start byte of a frame sent to the meter
pub const KMP_START_TO_METER: u8 = 0x80;

/// Stop byte, terminates every (non-ACK) frame
pub const KMP_STOP: u8 = 0x0D;

/// Application level acknowledge, sent as a single byte without framing
pub const KMP_ACK: u8 = 0x06;

/// Byte stuffing escape
pub const KMP_STUFFING: u8 = 0x1B;

/// Bytes that must be escaped on the physical layer. The stuffing byte itself
/// must come first; it is part of every escaped sequence.
pub const KMP_STUFFED_BYTES: [u8; 5] = [
    KMP_STUFFING,
    KMP_ACK,
    KMP_START_FROM_METER,
    KMP_START_TO_METER,
    KMP_STOP,
];

// ----------------------------------------------------------------------------
// Data link layer
// ----------------------------------------------------------------------------

/// Data link layer destination addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DestinationAddress {
    HeatMeter = 0x3F,
    LoggerTop = 0x7F,
    LoggerBase = 0xBF,
}

impl DestinationAddress {
    pub const ALL: [DestinationAddress; 3] = [
        DestinationAddress::HeatMeter,
        DestinationAddress::LoggerTop,
        DestinationAddress::LoggerBase,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DestinationAddress::HeatMeter => "HEAT_METER",
            DestinationAddress::LoggerTop => "LOGGER_TOP",
            DestinationAddress::LoggerBase => "LOGGER_BASE",
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|address| *address as u8 == value)
    }
}

/// Default destination address (heat meter)
pub const KMP_DESTINATION_ADDRESS_DEFAULT: u8 = DestinationAddress::HeatMeter as u8;

// ----------------------------------------------------------------------------
// Application layer
// ----------------------------------------------------------------------------

/// Command ID (CID) values for messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CommandId {
    GetType = 0x01,
    GetSerial = 0x02,
    SetClock = 0x09,
    GetRegister = 0x10,
    PutRegister = 0x11,
    GetEventStatus = 0x9B,
    ClearEventStatus = 0x9C,
    GetLogTimePresent = 0xA0,
    GetLogPastPresent = 0xA1,
    GetLogIdPresent = 0xA2,
    GetLogTimePast = 0xA3,
}

impl CommandId {
    pub const fn value(self) -> u8 {
        self as u8
    }
}

// ----------------------------------------------------------------------------
// Serial line settings
// ----------------------------------------------------------------------------

pub const KMP_SERIAL_BAUDRATE: u32 = 1200;

/// Default read timeout in milliseconds
pub const KMP_READ_TIMEOUT_MS: u64 = 2000;

// ----------------------------------------------------------------------------
// Register and unit names
// ----------------------------------------------------------------------------

/// Known register IDs for the GetRegister command (CID=0x10).
pub const KMP_REGISTERS: &[(u16, &str)] = &[
    (0x003C, "Heat Energy (E1)"),
    (0x0044, "Volume"),
    (0x004A, "Flow"),
    (0x0050, "Current Power"),
    (0x0056, "Temp1"),
    (0x0057, "Temp2"),
    (0x0059, "Tempdiff"),
    (0x0061, "Temp1xm3"),
    (0x006E, "Temp2xm3"),
    (0x0071, "Infoevent"),
    (0x007B, "MaxFlowDate_Y"),
    (0x007C, "MaxFlow_Y"),
    (0x007D, "MinFlowDate_Y"),
    (0x007E, "MinFlow_Y"),
    (0x007F, "MaxPowerDate_Y"),
    (0x0080, "MaxPower_Y"),
    (0x0081, "MinPowerDate_Y"),
    (0x0082, "MinPower_Y"),
    (0x008A, "MaxFlowDate_M"),
    (0x008B, "MaxFlow_M"),
    (0x008C, "MinFlowDate_M"),
    (0x008D, "MinFlow_M"),
    (0x008E, "MaxPowerDate_M"),
    (0x008F, "MaxPower_M"),
    (0x0090, "MinPowerDate_M"),
    (0x0091, "MinPower_M"),
    (0x0092, "AvgTemp1_Y"),
    (0x0093, "AvgTemp2_Y"),
    (0x0095, "AvgTemp1_M"),
    (0x0096, "AvgTemp2_M"),
    (0x010A, "E1HighRes"),
    (0x03EC, "HourCounter"),
];

/// Unit codes as found in GetRegister responses.
pub const KMP_UNITS: &[(u8, &str)] = &[
    (0x00, "no unit (number)"),
    (0x01, "Wh"),
    (0x02, "kWh"),
    (0x03, "MWh"),
    (0x04, "GWh"),
    (0x05, "J"),
    (0x06, "kJ"),
    (0x07, "MJ"),
    (0x08, "GJ"),
    (0x09, "Cal"),
    (0x0A, "kCal"),
    (0x0B, "Mcal"),
    (0x0C, "Gcal"),
    (0x0D, "varh"),
    (0x0E, "kvarh"),
    (0x0F, "Mvarh"),
    (0x10, "Gvarh"),
    (0x11, "VAh"),
    (0x12, "kVAh"),
    (0x13, "MVAh"),
    (0x14, "GVAh"),
    (0x15, "kW"),
    (0x16, "kW"),
    (0x17, "MW"),
    (0x18, "GW"),
    (0x19, "kvar"),
    (0x1A, "kvar"),
    (0x1B, "Mvar"),
    (0x1C, "Gvar"),
    (0x1D, "VA"),
    (0x1E, "kVA"),
    (0x1F, "MVA"),
    (0x20, "GVA"),
    (0x21, "V"),
    (0x22, "A"),
    (0x23, "kV"),
    (0x24, "kA"),
    (0x25, "°C"),
    (0x26, "°K"),
    (0x27, "l"),
    (0x28, "m³"),
    (0x29, "l/h"),
    (0x2A, "m³/h"),
    (0x2B, "m³×C"),
    (0x2C, "ton"),
    (0x2D, "ton/h"),
    (0x2E, "h"),
    (0x2F, "hh:mm:ss"),
    (0x30, "yy:mm:dd"),
    (0x31, "yyyy:mm:dd"),
    (0x32, "mm:dd"),
    (0x33, "no unit (number)"),
    (0x34, "bar"),
    (0x35, "RTC"),
    (0x36, "ASCII"),
    (0x37, "m³ ×10"),
    (0x38, "ton ×10"),
    (0x39, "GJ ×10"),
    (0x3A, "minutes"),
    (0x3B, "Bitfield"),
    (0x3C, "s"),
    (0x3D, "ms"),
    (0x3E, "days"),
    (0x3F, "RTC-Q"),
    (0x40, "Datetime"),
];

/// Name of a known register, if any.
pub fn register_name(id: u16) -> Option<&'static str> {
    KMP_REGISTERS
        .iter()
        .find(|(register_id, _)| *register_id == id)
        .map(|(_, name)| *name)
}

/// Name of a known unit code, if any.
pub fn unit_name(unit: u8) -> Option<&'static str> {
    KMP_UNITS
        .iter()
        .find(|(code, _)| *code == unit)
        .map(|(_, name)| *name)
}
