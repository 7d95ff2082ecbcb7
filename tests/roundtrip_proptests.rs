//! Property tests for the round trip guarantees of the codecs.

use bigdecimal::BigDecimal;
use kmp_rs::kmp::{
    ApplicationBytes, DataLinkBytes, DataLinkCodec, DataLinkData, PhysicalCodec,
    PhysicalDirection, PhysicalFrame,
};
use kmp_rs::payload::FloatCodec;
use num_bigint::BigInt;
use proptest::prelude::*;

const SPECIAL_BYTES: [u8; 5] = [0x1B, 0x06, 0x40, 0x80, 0x0D];

/// Byte sequences rich in bytes that need stuffing.
fn stuffing_heavy_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(
        prop_oneof![
            3 => prop::sample::select(SPECIAL_BYTES.to_vec()),
            1 => prop::sample::select(vec![0xE4, 0xF9, 0xBF, 0x7F, 0xF2]),
            2 => any::<u8>(),
        ],
        1..64,
    )
}

proptest! {
    #[test]
    fn prop_stuffing_symmetric(data in stuffing_heavy_bytes(), to_meter in any::<bool>()) {
        let direction = if to_meter { PhysicalDirection::ToMeter } else { PhysicalDirection::FromMeter };
        let codec = PhysicalCodec::new(direction);
        let data = DataLinkBytes::new(data);

        let encoded = codec.encode(&data).unwrap();
        // no special byte is left between start and stop
        let interior = &encoded[1..encoded.len() - 1];
        prop_assert!(interior.iter().all(|b| !SPECIAL_BYTES[1..].contains(b)));
        prop_assert_eq!(codec.decode(&encoded).unwrap(), PhysicalFrame::Data(data));
    }

    #[test]
    fn prop_data_link_round_trip(
        address in any::<u8>(),
        application in prop::collection::vec(any::<u8>(), 1..64),
    ) {
        let codec = DataLinkCodec::new();
        let data = DataLinkData::new(u16::from(address), ApplicationBytes::new(application));

        let encoded = codec.encode(&data).unwrap();
        let decoded = codec.decode(&encoded).unwrap();
        prop_assert_eq!(decoded.destination_address, data.destination_address);
        prop_assert_eq!(&decoded.application_bytes, &data.application_bytes);
        let crc = u16::from_be_bytes([encoded[encoded.len() - 2], encoded[encoded.len() - 1]]);
        prop_assert_eq!(decoded.crc_value, Some(crc));
    }

    #[test]
    fn prop_float_round_trip_fixed_length(
        mantissa in any::<u32>(),
        exponent in -63i64..=63,
        negative in any::<bool>(),
    ) {
        let digits = BigInt::from(mantissa) * if negative { -1 } else { 1 };
        let value = BigDecimal::new(digits, -exponent);
        // normalizing may move trailing zeros into a too large exponent
        prop_assume!(FloatCodec::encode(&value, Some(4)).is_ok());

        let encoded = FloatCodec::encode(&value, Some(4)).unwrap();
        prop_assert_eq!(encoded.len(), 6);
        prop_assert_eq!(FloatCodec::decode(&encoded).unwrap(), value);
    }

    #[test]
    fn prop_float_shortest_form(
        length in 1u8..=8,
        sign_exp in any::<u8>(),
        mantissa_seed in prop::collection::vec(any::<u8>(), 8),
    ) {
        let mut encoded = vec![length, sign_exp];
        encoded.extend_from_slice(&mantissa_seed[..usize::from(length)]);
        let value = FloatCodec::decode(&encoded).unwrap();

        if let Ok(shortest) = FloatCodec::encode(&value, None) {
            prop_assert!(shortest.len() <= encoded.len());
            prop_assert_eq!(FloatCodec::decode(&shortest).unwrap(), value.clone());
            // idempotent
            prop_assert_eq!(FloatCodec::encode(&FloatCodec::decode(&shortest).unwrap(), None).unwrap(), shortest);
        }
    }
}
