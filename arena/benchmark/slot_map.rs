use criterion::{black_box, criterion_group, criterion_main, Criterion};

use slotted_arena::SlotMap;

#[allow(clippy::many_single_char_names)]
pub fn slot_map(c: &mut Criterion) {
    c.bench_function("slot_map insertion", |b| {
        b.iter(|| {
            let mut arena = SlotMap::new();
            let arena = black_box(&mut arena);
            let _ = arena.insert(());
        })
    });
    c.bench_function("slot_map re-insertion", |b| {
        let mut arena = SlotMap::new();
        b.iter(|| {
            let arena = black_box(&mut arena);
            let a = arena.insert(()).unwrap();
            let b = arena.insert(()).unwrap();
            let c = arena.insert(()).unwrap();
            let d = arena.insert(()).unwrap();
            let e = arena.insert(()).unwrap();

            let (a, b, c, d, e) = black_box((a, b, c, d, e));

            arena.remove(b);
            arena.remove(d);
            arena.remove(a);
            arena.remove(c);
            arena.remove(e);

            let _ = black_box((a, b, c, d, e));
        })
    });
    c.bench_function("slot_map stale lookup", |b| {
        let mut arena = SlotMap::new();
        let stale = arena.insert(0u64).unwrap();
        arena.remove(stale);
        let _ = arena.insert(1u64).unwrap();

        b.iter(|| black_box(&arena).get(black_box(stale)).is_none())
    });
    c.bench_function("slot_map iteration non-contigious", |b| {
        let mut arena = SlotMap::new();

        let keys = (0..1000).map(|i| arena.insert(i).unwrap()).collect::<Vec<_>>();

        for (i, key) in keys.into_iter().enumerate() {
            if i % 2 == 0 || i % 11 == 0 {
                arena.remove(key);
            }
        }

        b.iter(|| black_box(&arena).values().sum::<i32>())
    });
    c.bench_function("slot_map iteration packed", |b| {
        let mut arena = SlotMap::new();

        for i in 0..545 {
            let _ = arena.insert(i).unwrap();
        }

        b.iter(|| black_box(&arena).values().sum::<i32>())
    });
}

criterion_group!(benches, slot_map);
criterion_main!(benches);
