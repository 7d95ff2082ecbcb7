#![no_main]

use kmp_rs::payload::FloatCodec;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = FloatCodec::decode_int_or_float(data);

    if let Ok(value) = FloatCodec::decode(data) {
        // Shortest form may fail only on exponent overflow after normalization
        if let Ok(shortest) = FloatCodec::encode(&value, None) {
            assert!(shortest.len() <= data.len());
            assert_eq!(FloatCodec::decode(&shortest).unwrap(), value);
        }
    }
});
