use bigdecimal::BigDecimal;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kmp_rs::kmp::{ClientCodec, DataLinkBytes, EncodedResponse, PhysicalBytes, PhysicalCodec, PhysicalDirection};
use kmp_rs::messages::{GetRegisterRequest, RegisterId};
use kmp_rs::payload::FloatCodec;
use std::str::FromStr;

fn hex_to_bytes(hex: &str) -> Vec<u8> {
    hex::decode(hex).unwrap()
}

fn benchmark_physical(c: &mut Criterion) {
    let codec = PhysicalCodec::new(PhysicalDirection::FromMeter);
    // every other byte needs stuffing
    let data = DataLinkBytes::new((0..128u8).map(|i| if i % 2 == 0 { 0x1B } else { i }).collect::<Vec<_>>());
    let frame = codec.encode(&data).unwrap();

    c.bench_function("physical_encode", |b| b.iter(|| codec.encode(black_box(&data))));
    c.bench_function("physical_decode", |b| b.iter(|| codec.decode(black_box(&frame))));
}

fn benchmark_float(c: &mut Criterion) {
    let encoded = hex_to_bytes("0411012AF024");
    let value = BigDecimal::from_str("-123.45").unwrap();

    c.bench_function("float_decode", |b| b.iter(|| FloatCodec::decode(black_box(&encoded))));
    c.bench_function("float_decode_int_or_float", |b| {
        b.iter(|| FloatCodec::decode_int_or_float(black_box(&encoded)))
    });
    c.bench_function("float_encode", |b| b.iter(|| FloatCodec::encode(black_box(&value), Some(4))));
}

fn benchmark_client(c: &mut Criterion) {
    let codec = ClientCodec::default();
    let request = GetRegisterRequest::new((0x3Cu16..0x44).map(RegisterId));
    // eight registers of heat energy in GJ
    let mut response = hex_to_bytes("3F10");
    for id in 0x3Cu16..0x44 {
        response.extend_from_slice(&id.to_be_bytes());
        response.extend_from_slice(&hex_to_bytes("080443000000FB"));
    }
    let crc = kmp_rs::kmp::calculate_crc(&response);
    response.extend_from_slice(&crc.to_be_bytes());
    let frame = PhysicalCodec::new(PhysicalDirection::FromMeter)
        .encode(&DataLinkBytes::new(response))
        .unwrap();
    let frame = EncodedResponse::<GetRegisterRequest>::new(PhysicalBytes::new(frame.into_vec()));

    c.bench_function("client_encode_get_register", |b| b.iter(|| codec.encode(black_box(&request))));
    c.bench_function("client_decode_get_register", |b| b.iter(|| codec.decode(black_box(&frame))));
}

criterion_group!(benches, benchmark_physical, benchmark_float, benchmark_client);
criterion_main!(benches);
