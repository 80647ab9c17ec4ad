use arena_core::GameConfig;
use arena_runtime::{top_series, GameSession, Standings};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_pipeline::synthetic::SyntheticMarket;

fn bench_session(c: &mut Criterion) {
    let market = SyntheticMarket {
        months: 120,
        ..Default::default()
    };
    let docs = market.generate();
    let capital = 1_000_000.0;
    let data = data_pipeline::build_game_data(&docs.primary, Some(&docs.secondary), capital)
        .unwrap();
    let doc = data_pipeline::BenchmarkDocument::from_value(&docs.benchmarks);
    let curves = data_pipeline::BenchmarkCurves::from_document(&doc, capital);

    c.bench_function("full 10y session with standings", |b| {
        b.iter(|| {
            let mut s = GameSession::new(GameConfig::default(), Some("bench"));
            s.load(data.clone()).unwrap();
            s.attach_benchmarks(Some(curves.clone()));
            while s.advance().is_ok_and(|o| o != arena_runtime::StepOutcome::Finished) {
                black_box(Standings::compute(&s));
            }
            let st = Standings::compute(&s);
            black_box(top_series(&s, &st, 3))
        })
    });
}

criterion_group!(benches, bench_session);
criterion_main!(benches);
