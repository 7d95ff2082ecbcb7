//! Tests for the GetType, GetSerialNo and GetRegister messages.

mod common;

use common::{bytes, capture_logs, warnings};
use kmp_rs::kmp::{ApplicationData, ApplicationDataBytes};
use kmp_rs::messages::{
    GetRegisterRequest, GetRegisterResponse, GetSerialRequest, GetSerialResponse,
    GetTypeRequest, GetTypeResponse, KmpMessage, RegisterData, RegisterId,
};
use kmp_rs::KmpError;

fn app(command_id: u8, data: &str) -> ApplicationData {
    ApplicationData::new(command_id, ApplicationDataBytes::new(bytes(data)))
}

/// Tests that requests without payload encode to just their command ID.
#[test]
fn test_no_data_requests_encode() {
    assert_eq!(GetTypeRequest.encode().unwrap(), app(0x01, ""));
    assert_eq!(GetSerialRequest.encode().unwrap(), app(0x02, ""));
}

/// Tests that requests without payload reject data.
#[test]
fn test_no_data_requests_reject_data() {
    let err = GetTypeRequest::decode(&app(0x01, "00")).unwrap_err();
    assert_eq!(err.to_string(), "GetTypeRequest does not take any data.");

    let err = GetSerialRequest::decode(&app(0x02, "00 01")).unwrap_err();
    assert_eq!(err.to_string(), "GetSerialRequest does not take any data.");

    assert_eq!(GetSerialRequest::decode(&app(0x02, "")).unwrap(), GetSerialRequest);
}

/// Tests that every message checks the command ID it is decoded from.
#[test]
fn test_command_id_mismatch() {
    let err = GetTypeResponse::decode(&app(0x02, "00 04 06 01")).unwrap_err();
    assert_eq!(err.to_string(), "Expected Command ID 1 for GetTypeResponse, got 2.");

    let err = GetSerialResponse::decode(&app(0x10, "01 23 45 67")).unwrap_err();
    assert_eq!(err.to_string(), "Expected Command ID 2 for GetSerialResponse, got 16.");

    let err = GetRegisterRequest::decode(&app(0x01, "01 00 80")).unwrap_err();
    assert!(matches!(
        err,
        KmpError::CidMismatch { expected: 0x10, actual: 0x01, .. }
    ));

    let err = GetRegisterResponse::decode(&app(0x11, "")).unwrap_err();
    assert!(matches!(err, KmpError::CidMismatch { actual: 0x11, .. }));
}

/// Tests decoding the software revision.
#[test]
fn test_get_type_response_decode() {
    let cases = [
        ("00 04 06 01", Some("F1")),
        ("00 04 01 00", Some("A0")),
        ("00 04 1A FF", Some("Z255")),
        ("00 04 00 00", None),
    ];
    for (data, revision) in cases {
        let response = GetTypeResponse::decode(&app(0x01, data)).unwrap();
        assert_eq!(response.meter_type, [0x00, 0x04]);
        assert_eq!(response.software_revision.as_deref(), revision, "{data}");
        assert_eq!(response.data_raw, Some(ApplicationDataBytes::new(bytes(data))));

        let reencoded = response.encode().unwrap();
        assert_eq!(reencoded, app(0x01, data));
    }
}

/// Tests the fixed payload length of the GetType response.
#[test]
fn test_get_type_response_length() {
    for (data, length) in [("00 04 06 01 00", 5), ("00 04 06", 3), ("", 0)] {
        let err = GetTypeResponse::decode(&app(0x01, data)).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("GetType response data is of length {length}, expected length is 4.")
        );
    }
}

/// Tests that the revision letter must be A-Z.
#[test]
fn test_get_type_response_letter_out_of_range() {
    let err = GetTypeResponse::decode(&app(0x01, "00 04 1B 01")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Software revision letter (int value) is out of range [1,26]: 27."
    );

    let err = GetTypeResponse::decode(&app(0x01, "00 04 00 01")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Software revision letter (int value) is out of range [1,26]: 0."
    );
}

/// Tests that invalid revision strings are not encoded.
#[test]
fn test_get_type_response_encode_invalid_revision() {
    for revision in ["FF", "F256", "a1", "", "F1a"] {
        let response = GetTypeResponse::new([0x00, 0x04], Some(revision.to_string()));
        let err = response.encode().unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("Software revision string '{revision}' is invalid.")
        );
    }
}

/// Tests serial numbers round trip through their four bytes.
#[test]
fn test_get_serial_response_round_trip() {
    for data in ["01 23 45 67", "00 00 00 00", "FF FF FF FF"] {
        let response = GetSerialResponse::decode(&app(0x02, data)).unwrap();
        assert_eq!(response.encode().unwrap(), app(0x02, data));
    }
    let response = GetSerialResponse::decode(&app(0x02, "01 23 45 67")).unwrap();
    assert_eq!(response.to_string(), "19088743");
}

/// Tests the fixed payload length of the serial response.
#[test]
fn test_get_serial_response_length() {
    for (data, length) in [("01 23 45 67 89", 5), ("01 23 45", 3), ("", 0)] {
        let err = GetSerialResponse::decode(&app(0x02, data)).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("Serial data is of length {length}, expected length is 4.")
        );
    }
}

/// Tests validation of serials constructed from text or integers.
#[test]
fn test_get_serial_response_validation() {
    let err = "Foobar".parse::<GetSerialResponse>().unwrap_err();
    assert_eq!(
        err.to_string(),
        "Serial 'Foobar' is invalid; should contain digits only."
    );

    let err = "4294967296".parse::<GetSerialResponse>().unwrap_err();
    assert_eq!(
        err.to_string(),
        "Serial number is out of range [0,4294967295]: 4294967296."
    );

    let err = GetSerialResponse::try_from(-1i128).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Serial number is out of range [0,4294967295]: -1."
    );

    let response = GetSerialResponse::try_from(1234i128).unwrap();
    assert_eq!(response.encode().unwrap(), app(0x02, "00 00 04 D2"));
}

/// Tests decoding register IDs from a request.
#[test]
fn test_get_register_request_decode() {
    let request = GetRegisterRequest::decode(&app(0x10, "01 00 80")).unwrap();
    assert_eq!(request.registers, vec![RegisterId(128)]);

    let data = "08 00 01 00 02 00 03 00 04 00 05 00 06 00 07 00 08";
    let (request, logs) = capture_logs(|| GetRegisterRequest::decode(&app(0x10, data)));
    assert_eq!(request.unwrap().registers.len(), 8);
    assert!(warnings(&logs).is_empty());
}

/// Tests that the count must match the register ID bytes.
#[test]
fn test_get_register_request_decode_length() {
    let err = GetRegisterRequest::decode(&app(0x10, "01")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "GetRegister request data for 1 register ID(s) is of length 0, expected length is 2."
    );

    let err = GetRegisterRequest::decode(&app(0x10, "03 00 36 00 37")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "GetRegister request data for 3 register ID(s) is of length 4, expected length is 6."
    );

    let err = GetRegisterRequest::decode(&app(0x10, "")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "GetRegister request data is of length 0, expected length is 1 at minimum."
    );
}

/// Tests that an unusual register count is tolerated with a warning.
#[test]
fn test_get_register_request_decode_count_outside_range() {
    let (request, logs) = capture_logs(|| GetRegisterRequest::decode(&app(0x10, "00")));
    assert!(request.unwrap().registers.is_empty());
    assert_eq!(
        warnings(&logs),
        vec!["Number of registers (0) in GetRegister request is outside the defined range (1-8)."]
    );

    let data = "09 00 01 00 02 00 03 00 04 00 05 00 06 00 07 00 08 00 09";
    let (request, logs) = capture_logs(|| GetRegisterRequest::decode(&app(0x10, data)));
    assert_eq!(request.unwrap().registers.len(), 9);
    assert_eq!(warnings(&logs).len(), 1);
}

/// Tests encoding a request and its limits.
#[test]
fn test_get_register_request_encode() {
    let request = GetRegisterRequest::from_ids([60, 0x10A]).unwrap();
    assert_eq!(request.encode().unwrap(), app(0x10, "02 00 3C 01 0A"));

    for count in [0, 9] {
        let request = GetRegisterRequest::new((0..count).map(RegisterId));
        let err = request.encode().unwrap_err();
        assert_eq!(
            err.to_string(),
            format!(
                "Number of registers requested in GetRegister request is out of range [1,8]: {count}."
            )
        );
    }

    let err = GetRegisterRequest::from_ids([60, 65536]).unwrap_err();
    assert_eq!(err.to_string(), "Register ID is out of range [0,65535]: 65536.");
    let err = GetRegisterRequest::from_ids([-1]).unwrap_err();
    assert_eq!(err.to_string(), "Register ID is out of range [0,65535]: -1.");
}

/// Tests decoding one register record.
#[test]
fn test_get_register_response_decode() {
    let (response, logs) = capture_logs(|| {
        GetRegisterResponse::decode(&app(0x10, "00 80 16 04 11 01 2A F0 24"))
    });
    let response = response.unwrap();
    assert_eq!(response.registers.len(), 1);
    assert_eq!(
        response.registers[&RegisterId(128)],
        RegisterData::new(128u16, 0x16, bytes("04 11 01 2A F0 24"))
    );
    assert!(warnings(&logs).is_empty());
}

/// Tests decoding several records in wire order.
#[test]
fn test_get_register_response_decode_multiple() {
    let data = "00 3C 08 04 43 00 00 00 FB 00 44 29 02 42 18 C8";
    let response = GetRegisterResponse::decode(&app(0x10, data)).unwrap();
    let ids: Vec<_> = response.registers.keys().copied().collect();
    assert_eq!(ids, vec![RegisterId(0x3C), RegisterId(0x44)]);
    assert_eq!(response.registers[&RegisterId(0x44)].value, bytes("02 42 18 C8"));
    assert_eq!(response.encode().unwrap(), app(0x10, data));
}

/// Tests that a response without registers is valid.
#[test]
fn test_get_register_response_empty() {
    let response = GetRegisterResponse::decode(&app(0x10, "")).unwrap();
    assert!(response.registers.is_empty());
    assert_eq!(response.encode().unwrap(), app(0x10, ""));
}

/// Tests the length errors of truncated records.
#[test]
fn test_get_register_response_truncated() {
    let err = GetRegisterResponse::decode(&app(0x10, "00 80 16 04 11 01 2A F0")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Register value data left in buffer is of length 8, expected length is 9 at minimum."
    );

    let err = GetRegisterResponse::decode(&app(0x10, "00 80 16 04 11")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Data to decode register data is of length 5, expected length is 6 at minimum."
    );
}

/// Tests that a short trailing fragment warns and then fails.
#[test]
fn test_get_register_response_trailing_fragment() {
    let (result, logs) = capture_logs(|| {
        GetRegisterResponse::decode(&app(0x10, "00 80 16 04 11 01 2A F0 24 FF"))
    });
    assert_eq!(
        result.unwrap_err().to_string(),
        "Data to decode register data is of length 1, expected length is 6 at minimum."
    );
    assert_eq!(warnings(&logs).len(), 1);
}

/// Tests that a duplicate register ID overwrites and warns once.
#[test]
fn test_get_register_response_duplicate() {
    let data = "00 80 16 04 11 01 2A F0 24 00 80 16 04 11 01 2A F0 24";
    let (response, logs) = capture_logs(|| GetRegisterResponse::decode(&app(0x10, data)));
    let response = response.unwrap();
    assert_eq!(response.registers.len(), 1);
    assert_eq!(
        warnings(&logs),
        vec!["Duplicate register ID 128 in response, overwriting value."]
    );
}
