use criterion::{black_box, criterion_group, criterion_main, Criterion};
use simon_says::core::{SequenceGame, SequenceGenerator, SimpleRng};
use simon_says::types::Phase;

fn bench_tick(c: &mut Criterion) {
    let mut game = SequenceGame::with_seed(12345);
    game.start(0).unwrap_or_default();

    c.bench_function("engine_tick_16ms", |b| {
        b.iter(|| {
            game.tick(black_box(16));
        })
    });
}

fn bench_full_round(c: &mut Criterion) {
    c.bench_function("ten_rounds", |b| {
        b.iter(|| {
            let mut game = SequenceGame::with_seed(black_box(7));
            game.start(1).unwrap_or_default();
            for _ in 0..10 {
                while game.phase() != Phase::AwaitingInput {
                    game.tick(16);
                }
                let picks = game.sequence().to_vec();
                for pick in picks {
                    let _ = game.submit(pick);
                }
            }
            game.score()
        })
    });
}

fn bench_generator(c: &mut Criterion) {
    let mut generator = SequenceGenerator::new(Box::new(SimpleRng::new(1)), 4);

    c.bench_function("generator_next", |b| {
        b.iter(|| black_box(generator.next()))
    });
}

fn bench_view(c: &mut Criterion) {
    let mut game = SequenceGame::with_seed(3);
    game.start(2).unwrap_or_default();
    game.tick(300);

    c.bench_function("engine_view", |b| b.iter(|| black_box(game.view())));
}

criterion_group!(benches, bench_tick, bench_full_round, bench_generator, bench_view);
criterion_main!(benches);
