use criterion::{criterion_group, criterion_main, Criterion};

use lazygrid::{new_grid, GridConfig, Item, ObserverOptions, Viewport};

fn demo_items(n: u64) -> Vec<Item> {
    (0..n).map(|i| Item::new(i, format!("{}.png", i))).collect()
}

fn bench_mount(c: &mut Criterion) {
    let items = demo_items(1000);
    c.bench_function("mount_1k_items", |b| {
        b.iter(|| {
            let mut grid = new_grid(GridConfig::default()).expect("failed to create grid");
            grid.mount(&items).expect("mount failed");
        })
    });
}

fn bench_query_selector(c: &mut Criterion) {
    let mut grid = new_grid(GridConfig::default()).expect("failed to create grid");
    grid.mount(&demo_items(1000)).expect("mount failed");

    c.bench_function("query_selector_1k", |b| {
        b.iter(|| {
            let _ = grid.document().query_selector_all(".image").unwrap();
        })
    });
}

fn bench_pump_steady_state(c: &mut Criterion) {
    // Threshold 1.0 keeps partially visible and off-screen cells subscribed,
    // so every pump recomputes a full batch without draining the watch set.
    let config = GridConfig {
        viewport: Viewport {
            width: 450,
            height: 360,
        },
        observer: ObserverOptions {
            threshold: 1.0,
            ..Default::default()
        },
        ..Default::default()
    };
    let mut grid = new_grid(config).expect("failed to create grid");
    grid.mount(&demo_items(1000)).expect("mount failed");
    // Drain the fully visible first rows once
    grid.pump().expect("pump failed");

    c.bench_function("pump_steady_state_1k", |b| {
        b.iter(|| {
            let _ = grid.pump().expect("pump failed");
        })
    });
}

criterion_group!(
    benches,
    bench_mount,
    bench_query_selector,
    bench_pump_steady_state
);
criterion_main!(benches);
