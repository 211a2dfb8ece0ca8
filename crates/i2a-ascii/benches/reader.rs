//! Benchmarks for grid reading.
//!
//! Run with: cargo bench -p i2a-ascii

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use i2a_ascii::quantize::quantize;
use i2a_ascii::reader::AsciiReader;
use i2a_core::config::ReaderConfig;
use i2a_core::frame::FrameBuffer;

fn source() -> FrameBuffer {
    FrameBuffer::from_fn(1024, 768, |x, y| ((x % 256) as u8, (y % 256) as u8, ((x ^ y) % 256) as u8))
}

/// Cached reads: the resample happens once, the rest is sampling.
fn bench_read_cached(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_cached");
    for &(cols, rows) in &[(80, 40), (200, 100), (400, 200)] {
        let mut reader = AsciiReader::new(source(), ReaderConfig::default()).unwrap();
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{cols}x{rows}")),
            &(cols, rows),
            |b, &(cols, rows)| {
                b.iter(|| {
                    let mut n = 0usize;
                    for row in reader.read(cols, rows).unwrap() {
                        for cell in row {
                            n += cell.ch as usize;
                        }
                    }
                    black_box(n)
                });
            },
        );
    }
    group.finish();
}

/// Alternating sizes: every read resamples.
fn bench_read_resample(c: &mut Criterion) {
    let mut reader = AsciiReader::new(source(), ReaderConfig::default()).unwrap();
    let mut flip = false;
    c.bench_function("read_resample", |b| {
        b.iter(|| {
            flip = !flip;
            let (cols, rows) = if flip { (120, 60) } else { (121, 60) };
            black_box(reader.read_grid(cols, rows).unwrap())
        });
    });
}

fn bench_quantize(c: &mut Criterion) {
    c.bench_function("quantize", |b| {
        b.iter(|| {
            let mut acc = 0u32;
            for v in (0..=255u8).step_by(5) {
                let q = quantize(black_box((v, 255 - v, v / 2)), f32::from(v) / 255.0, false);
                acc += q.color as u32;
            }
            acc
        });
    });
}

criterion_group!(benches, bench_read_cached, bench_read_resample, bench_quantize);
criterion_main!(benches);
