use std::io::Cursor;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use nsf_benchmark::{synthetic_continuous, synthetic_continuous_bytes};
use nsf_core::Recording;

const RATE: u16 = 1000;
/// Десять секунд записи
const SAMPLES: usize = 10 * RATE as usize;

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("continuous_load");

    for channels in [8usize, 32, 64] {
        let bytes = synthetic_continuous_bytes(channels, SAMPLES, RATE).unwrap();
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::new("channels", channels), &bytes, |b, bytes| {
            b.iter(|| Recording::load(Cursor::new(black_box(bytes.as_slice()))).unwrap());
        });
    }

    group.finish();
}

fn bench_save(c: &mut Criterion) {
    let mut group = c.benchmark_group("continuous_save");

    for channels in [8usize, 32, 64] {
        let mut rec = synthetic_continuous(channels, SAMPLES, RATE).unwrap();
        let mut out = Vec::with_capacity(synthetic_continuous_bytes(channels, SAMPLES, RATE).unwrap().len());

        group.throughput(Throughput::Elements((channels * SAMPLES) as u64));
        group.bench_function(BenchmarkId::new("channels", channels), |b| {
            b.iter(|| {
                out.clear();
                rec.save(black_box(&mut out)).unwrap();
            });
        });
    }

    group.finish();
}

fn bench_transpose(c: &mut Criterion) {
    c.bench_function("builder_32ch_10s", |b| {
        b.iter(|| synthetic_continuous(black_box(32), SAMPLES, RATE).unwrap());
    });
}

criterion_group!(benches, bench_load, bench_save, bench_transpose);
criterion_main!(benches);
