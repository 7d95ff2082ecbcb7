#![no_main]

use kmp_rs::kmp::{ClientCodec, EncodedResponse, PhysicalBytes, PhysicalCodec, PhysicalDirection, PhysicalFrame};
use kmp_rs::messages::GetRegisterRequest;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let frame = PhysicalBytes::from(data);
    let codec = PhysicalCodec::new(PhysicalDirection::FromMeter);

    // Whatever decodes must encode back to a frame that decodes the same
    if let Ok(PhysicalFrame::Data(data_link)) = codec.decode(&frame) {
        if !data_link.is_empty() {
            let reencoded = codec.encode(&data_link).unwrap();
            assert_eq!(codec.decode(&reencoded).unwrap(), PhysicalFrame::Data(data_link));
        }
    }

    // The full decode stack must never panic
    let _ = ClientCodec::default().decode(&EncodedResponse::<GetRegisterRequest>::new(frame));
});
