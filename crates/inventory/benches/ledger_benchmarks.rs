use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use petshop_inventory::InventoryLedger;

const CATEGORIES: [&str; 4] = ["goldfish", "hamster", "parrot", "rabbit"];

fn seeded_ledger(ops: usize) -> InventoryLedger {
    let mut ledger = InventoryLedger::journaled("Bench");
    for i in 0..ops {
        ledger.add(CATEGORIES[i % CATEGORIES.len()], 10);
    }
    ledger
}

fn bench_add_remove(c: &mut Criterion) {
    c.bench_function("add_then_remove", |b| {
        let mut ledger = InventoryLedger::new("Bench");
        b.iter(|| {
            ledger.add(black_box("goldfish"), 5);
            black_box(ledger.remove(black_box("goldfish"), 5));
        });
    });
}

fn bench_count(c: &mut Criterion) {
    let ledger = seeded_ledger(1000);
    c.bench_function("count_known_and_unknown", |b| {
        b.iter(|| {
            black_box(ledger.count(black_box("parrot")));
            black_box(ledger.count(black_box("iguana")));
        });
    });
}

fn bench_rehydrate(c: &mut Criterion) {
    let mut group = c.benchmark_group("rehydrate");

    for event_count in [10, 100, 1000, 10000].iter() {
        let journal = seeded_ledger(*event_count).take_journal();
        group.bench_with_input(
            BenchmarkId::new("from_journal", event_count),
            &journal,
            |b, journal| {
                b.iter(|| InventoryLedger::rehydrate("Bench", journal.iter().cloned()));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_add_remove, bench_count, bench_rehydrate);
criterion_main!(benches);
