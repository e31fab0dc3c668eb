//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//


//! Benchmarks for framer performance

use bytes::BytesMut;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rrepl_telnetcodec::{FramerEvent, TelnetFramer, consts};
use std::hint::black_box;
use tokio_util::codec::{Decoder, Encoder};

// ============================================================================
// Encoding Benchmarks
// ============================================================================

fn bench_encode_single_byte(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_single_byte");

    group.bench_function("data_byte", |b| {
        let mut framer = TelnetFramer::new();
        let mut buffer = BytesMut::with_capacity(1024);

        b.iter(|| {
            buffer.clear();
            framer.encode(black_box(b'A'), &mut buffer).unwrap();
        });
    });

    group.bench_function("iac_byte", |b| {
        let mut framer = TelnetFramer::new();
        let mut buffer = BytesMut::with_capacity(1024);

        b.iter(|| {
            buffer.clear();
            framer.encode(black_box(consts::IAC), &mut buffer).unwrap();
        });
    });

    group.finish();
}

fn bench_encode_slices(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_slices");

    for size in [10, 100, 1000, 10000].iter() {
        group.throughput(Throughput::Bytes(*size as u64));

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let mut framer = TelnetFramer::new();
            let mut buffer = BytesMut::with_capacity(size * 2);
            let data: Vec<u8> = (0..size).map(|i| (i % 256) as u8).collect();

            b.iter(|| {
                buffer.clear();
                framer.encode(black_box(&data[..]), &mut buffer).unwrap();
            });
        });
    }

    group.finish();
}

// ============================================================================
// Decoding Benchmarks
// ============================================================================

fn bench_decode_data(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_data");

    for size in [10, 100, 1000, 10000].iter() {
        group.throughput(Throughput::Bytes(*size as u64));

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let data: Vec<u8> = (0..size).map(|i| (i % 0x7F) as u8).collect();

            b.iter(|| {
                let mut framer = TelnetFramer::new();
                let mut buffer = BytesMut::from(&data[..]);
                let mut count = 0usize;
                while let Some(FramerEvent::Data(byte)) = framer.decode(&mut buffer).unwrap() {
                    count += usize::from(black_box(byte) > 0);
                }
                count
            });
        });
    }

    group.finish();
}

fn bench_decode_negotiation(c: &mut Criterion) {
    c.bench_function("decode_negotiation_burst", |b| {
        let burst = [
            consts::IAC,
            consts::DO,
            consts::option::ECHO,
            consts::IAC,
            consts::DO,
            consts::option::SUPPRESS_GO_AHEAD,
            consts::IAC,
            consts::WILL,
            0x18,
            consts::IAC,
            consts::DO,
            consts::option::STATUS,
        ];

        b.iter(|| {
            let mut framer = TelnetFramer::new();
            let mut replies = 0usize;
            for &byte in black_box(&burst) {
                if let Some(FramerEvent::Respond(_)) = framer.step(byte) {
                    replies += 1;
                }
            }
            replies
        });
    });
}

criterion_group!(
    benches,
    bench_encode_single_byte,
    bench_encode_slices,
    bench_decode_data,
    bench_decode_negotiation
);
criterion_main!(benches);
