//! Randomized market-reaction policies.
//!
//! Models how the rest of the market behaves around a large resting order:
//! liquidity on the threatened side thins out and reprices away, and when a
//! large order is pulled, participants drift back. The policies sample per
//! resting order, so they are non-deterministic by construction; the RNG is
//! injected and tests drive them with a seeded [`rand::rngs::StdRng`].

use rand::Rng;
use tracing::debug;

use crate::{
    generator,
    orderbook::OrderBook,
    orders::Side,
};

/// Resting orders at or above this quantity count as "large" and provoke a
/// reaction.
pub const LARGE_ORDER_THRESHOLD: u64 = 300;

/// Chance an individual resting order is pulled when a large order lands on
/// the other side.
const RETREAT_PROB: f64 = 0.3;
/// Chance a surviving order reprices away from the large order.
const REPRICE_PROB: f64 = 0.5;
/// Chance a resting order reprices toward recovery after a large cancel.
const REBOUND_REPRICE_PROB: f64 = 0.4;
/// Synthetic orders injected when a large order is cancelled.
const REBOUND_ORDERS: usize = 3;

/// Multiplicative nudge in [0.5%, 1.5%).
fn nudge(rng: &mut impl Rng) -> f64 {
    0.005 + rng.random::<f64>() * 0.01
}

/// A pending reaction, produced when a large order lands or is pulled and
/// applied after the configured delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    /// A large order rested on `side`; the opposite side retreats.
    Absorb { side: Side },
    /// A large non-spoof order on `side` was cancelled; the pressure it
    /// exerted unwinds.
    Rebound { side: Side },
}

/// Applies `reaction` to the book. `current_price` anchors the synthetic
/// orders the rebound injects.
pub fn apply(book: &mut OrderBook, reaction: Reaction, current_price: f64, rng: &mut impl Rng) {
    match reaction {
        Reaction::Absorb { side } => absorb_large_order(book, side, rng),
        Reaction::Rebound { side } => rebound_after_cancel(book, side, current_price, rng),
    }
}

/// Reaction to a large order resting on `trigger_side`.
///
/// A large sell is bearish: each resting buy is independently dropped with
/// probability [`RETREAT_PROB`], and each survivor's price is cut by
/// 0.5-1.5% with probability [`REPRICE_PROB`]. A large buy is the mirror
/// image on the sell side, prices pushed up. A surviving bid is never
/// repriced upward here, nor a surviving ask downward.
pub fn absorb_large_order(book: &mut OrderBook, trigger_side: Side, rng: &mut impl Rng) {
    let reacting_side = trigger_side.opposite();
    let dropped = book.retain_side(reacting_side, |_, _| !rng.random_bool(RETREAT_PROB));

    let factor_sign = match trigger_side {
        Side::Sell => -1.0,
        Side::Buy => 1.0,
    };
    let mut repriced = 0usize;
    for order in match reacting_side {
        Side::Buy => &mut book.buy_orders,
        Side::Sell => &mut book.sell_orders,
    } {
        if rng.random_bool(REPRICE_PROB) {
            order.price *= 1.0 + factor_sign * nudge(rng);
            repriced += 1;
        }
    }
    debug!(?trigger_side, dropped, repriced, "absorbed large order");
}

/// Reaction to the cancellation of a large non-spoof order on
/// `cancelled_side`: the inverse of [`absorb_large_order`].
///
/// Pulling a large sell releases downward pressure, so three synthetic buys
/// appear near the current price and resting bids drift up by 0.5-1.5% with
/// probability [`REBOUND_REPRICE_PROB`]. Pulling a large buy is the mirror
/// image on the sell side.
pub fn rebound_after_cancel(
    book: &mut OrderBook,
    cancelled_side: Side,
    current_price: f64,
    rng: &mut impl Rng,
) {
    let reacting_side = cancelled_side.opposite();
    for _ in 0..REBOUND_ORDERS {
        book.insert_limit(generator::reaction_order(reacting_side, current_price, rng));
    }

    let factor_sign = match cancelled_side {
        Side::Sell => 1.0,
        Side::Buy => -1.0,
    };
    let mut repriced = 0usize;
    for order in match reacting_side {
        Side::Buy => &mut book.buy_orders,
        Side::Sell => &mut book.sell_orders,
    } {
        if rng.random_bool(REBOUND_REPRICE_PROB) {
            order.price *= 1.0 + factor_sign * nudge(rng);
            repriced += 1;
        }
    }
    debug!(?cancelled_side, injected = REBOUND_ORDERS, repriced, "rebound after cancel");
}
