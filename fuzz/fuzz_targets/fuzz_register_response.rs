#![no_main]

use kmp_rs::kmp::{ApplicationData, ApplicationDataBytes};
use kmp_rs::messages::{GetRegisterRequest, GetRegisterResponse, KmpMessage};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let app = ApplicationData::new(0x10u8, ApplicationDataBytes::from(data));
    let _ = GetRegisterRequest::decode(&app);

    if let Ok(response) = GetRegisterResponse::decode(&app) {
        // Without duplicates the records encode back to the input
        let encoded = response.encode().unwrap();
        if encoded.data.len() == data.len() {
            assert_eq!(encoded.data.as_slice(), data);
        }
    }
});
