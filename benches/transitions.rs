use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use portfolio_reel::assets::ClipLibrary;
use portfolio_reel::config::AppConfig;
use portfolio_reel::controller::PlaybackController;
use portfolio_reel::metrics::PlaybackMetrics;
use portfolio_reel::playback_state::Language;
use portfolio_reel::test_fixtures::{PlayBehavior, RecordingSurface};

/// Hover in/out followed by an interrupted intro pair
fn run_cycle(controller: &mut PlaybackController<RecordingSurface>) {
    controller.on_pointer_enter();
    controller.on_pointer_leave();
    controller.request_intro(Language::Secondary);
    controller.request_intro(Language::Primary);
    controller.on_clip_ended();
    controller.surface_mut().clear_calls();
}

fn benchmark_transitions(c: &mut Criterion) {
    let mut group = c.benchmark_group("transitions");
    group.throughput(Throughput::Elements(5));

    let behaviors = [
        ("started", PlayBehavior::Start),
        ("rejected", PlayBehavior::Reject(portfolio_reel::error::RejectReason::Blocked)),
    ];

    for (name, behavior) in behaviors {
        let library = ClipLibrary::from_config(&AppConfig::default().clips);
        let mut controller = PlaybackController::mount(
            RecordingSurface::with_behavior(behavior),
            library,
            PlaybackMetrics::default(),
        );

        group.bench_with_input(BenchmarkId::new("cycle", name), &(), |b, _| {
            b.iter(|| {
                run_cycle(black_box(&mut controller));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_transitions);
criterion_main!(benches);
