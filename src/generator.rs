//! Synthetic liquidity for the simulator.
//!
//! Seeds a plausible-looking starting book around a base price: ten bids
//! stacked below, ten asks stacked above, one tenth of a point apart with a
//! little jitter so two runs never look identical. Re-invocation yields a
//! structurally identical but numerically different book.
//!
//! All randomness flows through the caller's [`Rng`] so a seeded generator
//! reproduces the same book under test.

use std::time::{Duration, SystemTime};

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::{
    history::{PriceHistory, PricePoint},
    orderbook::OrderBook,
    orders::{Intent, Order, Side},
};

/// Resting orders generated per side.
pub const LEVELS_PER_SIDE: usize = 10;

/// Synthetic order quantities are drawn uniformly from [MIN_QTY, MAX_QTY).
pub const MIN_QTY: u64 = 50;
pub const MAX_QTY: u64 = 250;

const PRICE_STEP: f64 = 0.1;
const PRICE_JITTER: f64 = 0.05;

/// Builds the starting book: [`LEVELS_PER_SIDE`] genuine limit buys strictly
/// below `base_price` and as many limit sells strictly above it.
///
/// Level `i` sits `i * 0.1` away from the base, plus jitter in [0, 0.05).
pub fn initial_book(base_price: f64, rng: &mut impl Rng) -> OrderBook {
    let mut book = OrderBook::new();

    for i in 1..=LEVELS_PER_SIDE {
        let offset = i as f64 * PRICE_STEP + rng.random_range(0.0..PRICE_JITTER);
        let quantity = rng.random_range(MIN_QTY..MAX_QTY);
        book.insert_limit(Order::limit(
            Side::Buy,
            base_price - offset,
            quantity,
            Intent::Genuine,
        ));
    }

    for i in 1..=LEVELS_PER_SIDE {
        let offset = i as f64 * PRICE_STEP + rng.random_range(0.0..PRICE_JITTER);
        let quantity = rng.random_range(MIN_QTY..MAX_QTY);
        book.insert_limit(Order::limit(
            Side::Sell,
            base_price + offset,
            quantity,
            Intent::Genuine,
        ));
    }

    book
}

/// Seeds `points` backdated price samples, one minute apart, so the chart has
/// something to show before the first real tick. Gaussian noise around the
/// base keeps the line from being flat.
pub fn seed_history(base_price: f64, points: usize, rng: &mut impl Rng) -> PriceHistory {
    let noise = Normal::new(0.0, 0.5).expect("sigma must be non-negative");
    let mut history = PriceHistory::default();
    let now = SystemTime::now();
    for i in 0..points {
        let age = Duration::from_secs(60 * (points - i) as u64);
        history.record(PricePoint {
            time: now - age,
            price: base_price + noise.sample(rng),
        });
    }
    history
}

/// One synthetic genuine limit order near `reference_price` (within ±1%),
/// sized like the seeded book. The rebound reaction injects these to model
/// participants returning after a large cancellation.
pub fn reaction_order(side: Side, reference_price: f64, rng: &mut impl Rng) -> Order {
    let price = reference_price * rng.random_range(0.99..1.01);
    let quantity = rng.random_range(MIN_QTY..MAX_QTY);
    Order::limit(side, price, quantity, Intent::Genuine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn book_shape_and_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let base = 100.0;
        let book = initial_book(base, &mut rng);

        assert_eq!(book.buy_orders.len(), LEVELS_PER_SIDE);
        assert_eq!(book.sell_orders.len(), LEVELS_PER_SIDE);
        for order in &book.buy_orders {
            assert!(order.price < base);
            assert!((MIN_QTY..MAX_QTY).contains(&order.quantity));
            assert_eq!(order.intent, Intent::Genuine);
        }
        for order in &book.sell_orders {
            assert!(order.price > base);
            assert!((MIN_QTY..MAX_QTY).contains(&order.quantity));
            assert_eq!(order.intent, Intent::Genuine);
        }
    }

    #[test]
    fn bounds_hold_for_other_base_prices() {
        let mut rng = StdRng::seed_from_u64(7);
        for base in [1.0, 55.5, 4000.0] {
            let book = initial_book(base, &mut rng);
            assert!(book.buy_orders.iter().all(|o| o.price < base));
            assert!(book.sell_orders.iter().all(|o| o.price > base));
        }
    }

    #[test]
    fn same_seed_same_book() {
        let a = initial_book(100.0, &mut StdRng::seed_from_u64(9));
        let b = initial_book(100.0, &mut StdRng::seed_from_u64(9));
        let prices = |book: &OrderBook| -> Vec<(f64, u64)> {
            book.buy_orders
                .iter()
                .chain(&book.sell_orders)
                .map(|o| (o.price, o.quantity))
                .collect()
        };
        assert_eq!(prices(&a), prices(&b));
    }

    #[test]
    fn seeded_history_is_time_ascending() {
        let mut rng = StdRng::seed_from_u64(3);
        let history = seed_history(100.0, 30, &mut rng);
        assert_eq!(history.len(), 30);
        let times: Vec<_> = history.iter().map(|p| p.time).collect();
        assert!(times.windows(2).all(|w| w[0] <= w[1]));
        assert!(history.iter().all(|p| (p.price - 100.0).abs() < 5.0));
    }

    #[test]
    fn reaction_orders_hug_the_reference_price() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let order = reaction_order(Side::Buy, 100.0, &mut rng);
            assert!(order.price >= 99.0 && order.price < 101.0);
            assert!((MIN_QTY..MAX_QTY).contains(&order.quantity));
            assert_eq!(order.intent, Intent::Genuine);
        }
    }
}
