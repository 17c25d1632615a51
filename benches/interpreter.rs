// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Benchmark for the single-step interpreter.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use m68k_emu::M68k;

pub fn criterion_benchmark(c: &mut Criterion) {
    let mut cpu = M68k::new().unwrap();

    // BRA.S -2: the tightest possible loop.
    cpu.load_program(0x1000, &[0x60, 0xFE], 0x1000).unwrap();

    c.bench_function("tick", |b| b.iter(|| {
        black_box(cpu.tick()).unwrap();
    }));

    c.bench_function("decode_table_build", |b| b.iter(|| {
        black_box(m68k_emu::decoder::DecodeTable::build()).unwrap();
    }));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
