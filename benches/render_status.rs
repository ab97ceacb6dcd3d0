// Run with: cargo bench --bench render_status

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use lcdbench::lcg::Lcg;
use lcdbench::modes::Arithmetic;
use lcdbench::status::draw_panel;
use lcdbench::{ButtonState, Buttons, Engine, Input, LcdFrameBuffer, Mode, Refresh};
use std::hint::black_box;
use std::time::Duration;

fn configure_criterion() -> Criterion {
    Criterion::default()
        .sample_size(100)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(2))
}

struct Idle;

impl Input for Idle {
    fn button_state(&mut self) -> ButtonState {
        ButtonState::held(Buttons::new())
    }

    fn crank_change(&mut self) -> i32 {
        0
    }
}

fn status_text_benchmark(c: &mut Criterion) {
    let arithmetic = Arithmetic::new();
    c.bench_function("status_text", |b| {
        b.iter(|| black_box(arithmetic.status_text(black_box(49.9))));
    });
}

fn draw_panel_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("draw_panel");
    let text = Arithmetic::new().status_text(49.9);

    for (name, refresh) in [("full", Refresh::Full), ("incremental", Refresh::Incremental)] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &refresh, |b, &refresh| {
            let mut fb = LcdFrameBuffer::new();
            b.iter(|| {
                draw_panel(&mut fb, black_box(refresh), black_box(text.as_str()));
                black_box(&fb);
            });
        });
    }

    group.finish();
}

// Whole idle frames minus the workloads, which have benches of their own
fn idle_frame_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("idle_frame");

    for mode in [Mode::Screen, Mode::MetricRuler, Mode::ImperialRuler] {
        group.bench_with_input(BenchmarkId::from_parameter(mode.name()), &mode, |b, &mode| {
            let mut fb = LcdFrameBuffer::new();
            let mut engine = Engine::new(Lcg::new(1));
            engine.select_mode(mode);
            engine.update(&mut fb, &mut Idle);
            b.iter(|| black_box(engine.update(&mut fb, &mut Idle)));
        });
    }

    group.finish();
}

criterion_group!(name = benches; config = configure_criterion(); targets = status_text_benchmark, draw_panel_benchmark, idle_frame_benchmark);
criterion_main!(benches);
