use criterion::{Criterion, criterion_group, criterion_main};
use geocoin_core::*;
use std::hint::black_box;

fn bench_luck(c: &mut Criterion) {
    c.bench_function("luck 17x17", |b| {
        b.iter(|| {
            let mut spawned = 0;
            for i in -8..=8 {
                for j in -8..=8 {
                    if cell_luck(black_box(Cell::new(i, j))) < 0.1 {
                        spawned += 1;
                    }
                }
            }
            spawned
        })
    });
}

fn bench_walk(c: &mut Criterion) {
    c.bench_function("walk 16 cells", |b| {
        b.iter(|| {
            let mut session = GameSession::new(GameConfig::default()).unwrap();
            for direction in [Direction::Up, Direction::Right, Direction::Down, Direction::Left] {
                for _ in 0..4 {
                    session.move_player(black_box(direction)).unwrap();
                }
            }
            session.mementos().len()
        })
    });
}

fn bench_restore(c: &mut Criterion) {
    let mut store = MemoryStore::new();
    let mut session = GameSession::new(GameConfig::default()).unwrap();
    for _ in 0..32 {
        session.move_player(Direction::Up).unwrap();
    }
    session.save(&mut store).unwrap();

    c.bench_function("load 33 rows", |b| {
        b.iter(|| {
            let mut resumed = GameSession::new(GameConfig::default()).unwrap();
            resumed.load(black_box(&store)).is_some()
        })
    });
}

criterion_group!(benches, bench_luck, bench_walk, bench_restore);
criterion_main!(benches);
