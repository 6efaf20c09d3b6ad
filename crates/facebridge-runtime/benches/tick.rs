//! Benchmarks for the FaceBridge tick path

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use facebridge_core::{Quaternion, RawExpression, RawWeights, TrackingOutput, RAW_EXPRESSION_COUNT};
use facebridge_mapping::{
    combined_gaze, mouth_sources, update_mouth_expressions, Capabilities, FaceMapper,
    SmoothingFilter,
};
use facebridge_runtime::{LoopbackTransport, ModuleConfig, TrackingModule};
use facebridge_wire::{RawSnapshot, ValidityFlags};

fn sample_snapshot() -> RawSnapshot {
    let mut snapshot = RawSnapshot::new();
    snapshot.flags = ValidityFlags::ALL;
    snapshot.left_eye = Quaternion::from_euler(0.15, -0.05, 0.0);
    snapshot.right_eye = Quaternion::from_euler(0.1, -0.08, 0.0);
    for i in 0..RAW_EXPRESSION_COUNT {
        snapshot.weights.0[i] = (i as f32 * 0.37).fract();
    }
    snapshot
}

fn bench_gaze(c: &mut Criterion) {
    let left = Quaternion::from_euler(0.15, -0.05, 0.0);
    let right = Quaternion::from_euler(0.1, -0.08, 0.0);

    c.bench_function("combined_gaze", |b| {
        b.iter(|| combined_gaze(black_box(&left), black_box(&right)))
    });
}

fn bench_mouth(c: &mut Criterion) {
    let weights: RawWeights = sample_snapshot().weights;

    c.bench_function("mouth_sources", |b| {
        b.iter(|| mouth_sources(black_box(&weights)))
    });

    c.bench_function("mouth_update_smoothed", |b| {
        let mut output = TrackingOutput::new();
        let mut filter = SmoothingFilter::new();
        b.iter(|| update_mouth_expressions(&mut output.shapes, black_box(&weights), &mut filter))
    });
}

fn bench_map(c: &mut Criterion) {
    let snapshot = sample_snapshot();

    c.bench_function("map_snapshot", |b| {
        let mut mapper = FaceMapper::new();
        let mut output = TrackingOutput::new();
        b.iter(|| mapper.map(black_box(&snapshot), Capabilities::ALL, &mut output))
    });
}

fn bench_tick(c: &mut Criterion) {
    let config = ModuleConfig::headless();
    let transport = LoopbackTransport::new(&config.region_name, &config.signal_name);
    let producer = transport.producer();
    let module = TrackingModule::with_config(config);
    if module.attach(&transport, true, true).is_err() {
        return;
    }

    let mut snapshot = sample_snapshot();
    snapshot.weights.set(RawExpression::JawDrop, 0.8);

    c.bench_function("tick_publish_and_map", |b| {
        let mut output = TrackingOutput::new();
        b.iter(|| {
            if producer.publish(&snapshot).is_err() {
                return None;
            }
            Some(module.tick(black_box(&mut output)))
        })
    });
}

criterion_group!(benches, bench_gaze, bench_mouth, bench_map, bench_tick);
criterion_main!(benches);
