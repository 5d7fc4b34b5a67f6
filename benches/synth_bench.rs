//! Benchmarks for pitch synthesis and buffer lookup.
//!
//! Run with: cargo bench
//!
//! Synthesis happens once per distinct pitch at the start of a song, so it
//! sits on the path between "play" and the first audible note. At the default
//! 49152 Hz a buffer is one measure (49152 samples).

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use handbell::dsp::{synthesize, PitchTable};
use handbell::sequencing::Pitch;
use handbell::{MEASURE_LENGTH_SECS, SAMPLE_RATE};

fn bench_synthesize(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/synthesize");

    for pitch in [Pitch::Rest, Pitch::A4, Pitch::A5] {
        group.bench_with_input(BenchmarkId::from_parameter(pitch), &pitch, |b, &pitch| {
            b.iter(|| synthesize(black_box(pitch), SAMPLE_RATE, MEASURE_LENGTH_SECS))
        });
    }

    group.finish();
}

fn bench_pitch_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/pitch_table");

    // Cold: every pitch synthesized, as at the start of a song
    group.bench_function("fill_all", |b| {
        b.iter(|| {
            let mut table = PitchTable::new(SAMPLE_RATE, MEASURE_LENGTH_SECS);
            for pitch in Pitch::ALL {
                black_box(table.sample_of(pitch));
            }
        })
    });

    // Warm: a repeated note is only a lookup
    let mut table = PitchTable::new(SAMPLE_RATE, MEASURE_LENGTH_SECS);
    table.sample_of(Pitch::C4);
    group.bench_function("cached_lookup", |b| {
        b.iter(|| black_box(table.sample_of(black_box(Pitch::C4))))
    });

    group.finish();
}

criterion_group!(benches, bench_synthesize, bench_pitch_table);
criterion_main!(benches);
