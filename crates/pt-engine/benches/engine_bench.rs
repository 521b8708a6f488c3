//! Render throughput benchmarks.
//!
//! Run with: cargo bench -p pt-engine
//!
//! At 44.1kHz a 512-frame block must render in under 11.6ms.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use pt_engine::{AudioGenerator, PlaybackConfig};
use pt_ir::{EffectType, Instrument, Module, Pattern, Row};

const BLOCK_SIZES: &[usize] = &[64, 256, 512, 1024];

/// Four busy channels: arpeggio, vibrato, slide-to-note and a volume slide.
fn busy_module() -> Module {
    let saw: Vec<i8> = (0..256).map(|i| (i as i32 - 128) as i8).collect();
    let mut module = Module::new("bench").with_order(&[0]);
    module.instruments.push(Instrument::from_pcm8("saw", &saw).with_loop(0, 128));

    let mut pattern = Pattern::new(4);
    for row in (0..64).step_by(8) {
        *pattern.row_mut(row, 0) = Row::new(1, 428).with_effect(EffectType::Arpeggio, 3, 7);
        *pattern.row_mut(row, 1) = Row::new(1, 214).with_effect(EffectType::Vibrato, 6, 8);
        *pattern.row_mut(row, 2) = Row::new(1, 320).with_effect(EffectType::SlideToNote, 0, 4);
        *pattern.row_mut(row, 3) = Row::new(1, 170).with_effect(EffectType::VolumeSlide, 0, 1);
    }
    module.patterns.push(pattern);
    module
}

fn bench_generate(c: &mut Criterion) {
    let module = busy_module();
    let mut group = c.benchmark_group("generator/fill");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0i16; size * 2];
        let mut generator = AudioGenerator::new(&module, PlaybackConfig::default()).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                if !generator.song_still_active() {
                    generator = AudioGenerator::new(&module, PlaybackConfig::default()).unwrap();
                }
                generator.fill(black_box(&mut buffer));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_generate);
criterion_main!(benches);
