//! Reframing engine benchmarks.
//!
//! # Running Benchmarks
//! ```bash
//! cargo bench --package vclip-media --bench reframe_engine
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use image::{Rgb, RgbImage};
use vclip_media::intelligent::{ReframeConfig, ReframingEngine, SeparatorStyle};
use vclip_media::render_crop;
use vclip_models::{FaceBox, FrameInput, SceneContext, SceneSpan, SmoothingStrength, TargetSize};

/// Synthetic stream with a drifting speaker, a second face every few frames
/// and a scene cut every 300 frames.
fn synthetic_stream(frames: u64) -> (Vec<FrameInput>, SceneContext) {
    let inputs = (0..frames)
        .map(|i| {
            let drift = (i as f64 * 0.05).sin() * 400.0;
            let mut faces = vec![FaceBox::new(760.0 + drift, 300.0, 960.0 + drift, 560.0)];
            if i % 4 == 0 {
                faces.push(FaceBox::new(1500.0, 320.0, 1650.0, 500.0));
            }
            FrameInput::new(i, faces, Some(i % 2 == 0))
        })
        .collect();

    let spans: Vec<SceneSpan> = (0..frames.div_ceil(300))
        .filter_map(|s| SceneSpan::new(s * 300, ((s + 1) * 300).min(frames)).ok())
        .collect();

    (inputs, SceneContext::from_spans(&spans))
}

fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("reframe_engine");

    for &frames in &[300u64, 3000] {
        let (inputs, scenes) = synthetic_stream(frames);
        group.throughput(Throughput::Elements(frames));

        for dual in [false, true] {
            let config = ReframeConfig::with_strength(SmoothingStrength::Medium).dual_mode(dual);
            let id = BenchmarkId::new(if dual { "dual" } else { "single" }, frames);

            group.bench_with_input(id, &inputs, |b, inputs| {
                b.iter(|| {
                    let mut engine = ReframingEngine::new(config.clone(), scenes.clone()).unwrap();
                    let reports = engine.process_all(inputs, 1920, 1080).unwrap();
                    black_box(reports)
                })
            });
        }
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let frame = RgbImage::from_pixel(1920, 1080, Rgb([90, 120, 150]));
    let mut engine = ReframingEngine::new(ReframeConfig::default().dual_mode(true), SceneContext::empty()).unwrap();

    let single = engine
        .compute_crop(0, &[FaceBox::new(900.0, 400.0, 1100.0, 700.0)], None, 1920, 1080)
        .unwrap();
    let dual = engine
        .compute_crop(
            1,
            &[
                FaceBox::new(300.0, 400.0, 500.0, 600.0),
                FaceBox::new(1400.0, 380.0, 1600.0, 620.0),
            ],
            None,
            1920,
            1080,
        )
        .unwrap();

    let mut group = c.benchmark_group("render_crop");
    group.bench_function("single", |b| {
        b.iter(|| render_crop(black_box(&frame), &single, TargetSize::SHORTS, None).unwrap())
    });
    group.bench_function("dual", |b| {
        b.iter(|| render_crop(black_box(&frame), &dual, TargetSize::SHORTS, Some(SeparatorStyle::default())).unwrap())
    });
    group.finish();
}

criterion_group!(benches, bench_engine, bench_render);
criterion_main!(benches);
