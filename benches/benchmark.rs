use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use rand::{Rng, SeedableRng, rngs::StdRng};

use spoofing_sim::orderbook::OrderBook;
use spoofing_sim::orders::{Intent, Order, Side};

fn setup_order_book(levels: usize) -> OrderBook {
    let mut rng = StdRng::seed_from_u64(42);
    let mut book = OrderBook::new();
    for i in 1..=levels {
        let offset = i as f64 * 0.1 + rng.random_range(0.0..0.05);
        let quantity = rng.random_range(50..250);
        book.insert_limit(Order::limit(
            Side::Buy,
            100.0 - offset,
            quantity,
            Intent::Genuine,
        ));
        book.insert_limit(Order::limit(
            Side::Sell,
            100.0 + offset,
            quantity,
            Intent::Genuine,
        ));
    }
    book
}

fn bench_execute_market(c: &mut Criterion) {
    let book = setup_order_book(500);
    let half_depth: u64 = book.depth(Side::Sell) / 2;

    c.bench_function("market buy through half the book", |b| {
        b.iter_batched(
            || book.clone(),
            |mut book| book.execute_market(&Order::market(Side::Buy, half_depth)),
            BatchSize::SmallInput,
        )
    });

    c.bench_function("market sell sweeping every bid", |b| {
        let all: u64 = book.depth(Side::Buy) + 1;
        b.iter_batched(
            || book.clone(),
            |mut book| book.execute_market(&Order::market(Side::Sell, all)),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_execute_market);
criterion_main!(benches);
