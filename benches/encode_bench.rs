//! Benchmarks for snake encoding, content dictionaries and message codec

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sbtcell::boc::serialize_boc;
use sbtcell::content::build_onchain_content;
use sbtcell::protocol::{decode_message, encode_message, Command, Message};
use sbtcell::{snake, Address, Cell};

fn snake_benchmarks(c: &mut Criterion) {
    let data = vec![0x5Au8; 16 * 1024];

    c.bench_function("snake_encode_16k", |b| {
        b.iter(|| snake::encode(black_box(&data)).unwrap())
    });

    let root = snake::encode(&data).unwrap();
    c.bench_function("snake_decode_16k", |b| {
        b.iter(|| snake::decode(black_box(&root)).unwrap())
    });
}

fn content_benchmarks(c: &mut Criterion) {
    let fields: Vec<(String, String)> = (0..32)
        .map(|i| (format!("field_{}", i), "value ".repeat(40)))
        .collect();

    c.bench_function("content_build_32_fields", |b| {
        b.iter(|| build_onchain_content(black_box(&fields).iter().map(|(k, v)| (k, v))).unwrap())
    });

    let cell = build_onchain_content(fields.iter().map(|(k, v)| (k, v))).unwrap();
    c.bench_function("content_boc_32_fields", |b| {
        b.iter(|| serialize_boc(black_box(&cell)))
    });
}

fn codec_benchmarks(c: &mut Criterion) {
    let message = Message::new(
        1,
        Command::ProveOwnership {
            destination: Address::new(0, [7; 32]),
            forward_payload: Arc::new(Cell::empty()),
            with_content: true,
        },
    );

    c.bench_function("message_encode", |b| {
        b.iter(|| encode_message(black_box(&message)).unwrap())
    });

    let cell = encode_message(&message).unwrap();
    c.bench_function("message_decode", |b| {
        b.iter(|| decode_message(black_box(&cell)).unwrap())
    });
}

criterion_group!(benches, snake_benchmarks, content_benchmarks, codec_benchmarks);
criterion_main!(benches);
