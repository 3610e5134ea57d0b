use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    orders::{Intent, Order, Side},
    trade::Trade,
};

/// Price reported when the book is completely empty.
pub const DEFAULT_PRICE: f64 = 100.0;

/// An [`OrderBook`] stores **active** buy and sell orders in two separate
/// [`Vec`]s kept in insertion order:
/// - `buy_orders` (bids)
/// - `sell_orders` (asks)
///
/// No price-sorted structure is persisted. Matching re-sorts on demand, and
/// because the sort is stable, orders at an identical price fill in insertion
/// order (FIFO).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderBook {
    pub buy_orders: Vec<Order>,
    pub sell_orders: Vec<Order>,
}

/// The outcome of running a market order through the book.
///
/// `execution_price` is the price of the **first** resting order matched, the
/// single price the simulator reports even when the order walked several
/// levels. Demand beyond the book's total liquidity is dropped rather than
/// rested or rejected; `requested` vs `filled` makes that visible to the
/// caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Execution {
    pub requested: u64,
    pub filled: u64,
    pub execution_price: Option<f64>,
    pub trades: Vec<Trade>,
}

impl Execution {
    /// Quantity that found no liquidity and simply vanished.
    pub fn unfilled(&self) -> u64 {
        self.requested - self.filled
    }
}

impl OrderBook {
    /// Creates a new, empty [`OrderBook`], with no active bids or asks.
    pub fn new() -> Self {
        Self {
            buy_orders: Vec::new(),
            sell_orders: Vec::new(),
        }
    }

    pub fn side(&self, side: Side) -> &[Order] {
        match side {
            Side::Buy => &self.buy_orders,
            Side::Sell => &self.sell_orders,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut Vec<Order> {
        match side {
            Side::Buy => &mut self.buy_orders,
            Side::Sell => &mut self.sell_orders,
        }
    }

    /// Adds a **limit** order to its side of the book.
    ///
    /// Limit orders rest unconditionally: no crossing check is performed
    /// against the opposite side, so a marketable limit order still rests
    /// instead of executing. Only market orders trigger matching in this
    /// model.
    pub fn insert_limit(&mut self, order: Order) {
        self.side_mut(order.side).push(order);
    }

    /// Removes a resting order by id, searching both sides. Returns the
    /// removed order so the caller can inspect its size and intent.
    pub fn cancel(&mut self, order_id: &str) -> Option<Order> {
        for book_side in [&mut self.buy_orders, &mut self.sell_orders] {
            if let Some(pos) = book_side.iter().position(|o| o.id == order_id) {
                return Some(book_side.remove(pos));
            }
        }
        None
    }

    /// Drops every spoof-intent order from both sides. Returns how many were
    /// removed.
    pub fn purge_spoofs(&mut self) -> usize {
        let before = self.order_count();
        self.buy_orders.retain(|o| o.intent != Intent::Spoof);
        self.sell_orders.retain(|o| o.intent != Intent::Spoof);
        before - self.order_count()
    }

    /// Keeps only the orders on `side` for which `keep(index, order)` holds,
    /// where `index` is the order's current position. Returns how many orders
    /// were dropped.
    pub fn retain_side(&mut self, side: Side, mut keep: impl FnMut(usize, &Order) -> bool) -> usize {
        let orders = self.side_mut(side);
        let before = orders.len();
        let mut idx = 0;
        orders.retain(|o| {
            let keep_it = keep(idx, o);
            idx += 1;
            keep_it
        });
        before - orders.len()
    }

    pub fn order_count(&self) -> usize {
        self.buy_orders.len() + self.sell_orders.len()
    }

    /// Total resting quantity on one side.
    pub fn depth(&self, side: Side) -> u64 {
        self.side(side).iter().map(|o| o.quantity).sum()
    }

    /// Highest resting buy price, if any.
    pub fn best_bid(&self) -> Option<f64> {
        self.buy_orders.iter().map(|o| o.price).max_by(f64::total_cmp)
    }

    /// Lowest resting sell price, if any.
    pub fn best_ask(&self) -> Option<f64> {
        self.sell_orders.iter().map(|o| o.price).min_by(f64::total_cmp)
    }

    /// Derives the current price from the best resting orders.
    ///
    /// - Both sides empty: [`DEFAULT_PRICE`].
    /// - Only bids: the highest bid.
    /// - Only asks: the lowest ask.
    /// - Otherwise: the arithmetic midpoint of best bid and best ask.
    ///
    /// Pure; the market re-derives it after every book mutation because it is
    /// not maintained incrementally.
    pub fn mid_price(&self) -> f64 {
        match (self.best_bid(), self.best_ask()) {
            (None, None) => DEFAULT_PRICE,
            (Some(bid), None) => bid,
            (None, Some(ask)) => ask,
            (Some(bid), Some(ask)) => (bid + ask) / 2.0,
        }
    }

    /// Matches an incoming **market** order against the opposite side of the
    /// book.
    ///
    /// # Behavior
    /// - A market buy consumes resting sells from the lowest price up; a
    ///   market sell consumes resting buys from the highest price down.
    /// - Greedy fills: each resting order gives `min(remaining, resting.quantity)`.
    ///   A fully consumed order is removed from the book; a partially consumed
    ///   one has its quantity reduced in place.
    /// - Orders at an identical price fill in insertion order (stable sort).
    /// - If the requested quantity exceeds the side's total liquidity the
    ///   remainder is dropped, never rested. The [`Execution`] reports it.
    ///
    /// Routing by order type (limit orders rest, market orders match) is the
    /// caller's job; this function matches purely by side and quantity.
    pub fn execute_market(&mut self, incoming: &Order) -> Execution {
        debug!(side = ?incoming.side, quantity = incoming.quantity, "matching market order");
        let resting = self.side_mut(incoming.side.opposite());

        // Price-priority scan order, re-derived on demand. Stable sort keeps
        // insertion order as the tie-break at equal prices.
        let mut ranked: Vec<(f64, String)> =
            resting.iter().map(|o| (o.price, o.id.clone())).collect();
        match incoming.side {
            Side::Buy => ranked.sort_by(|a, b| a.0.total_cmp(&b.0)),
            Side::Sell => ranked.sort_by(|a, b| b.0.total_cmp(&a.0)),
        }

        let mut remaining = incoming.quantity;
        let mut execution_price = None;
        let mut trades = Vec::new();

        for (_, id) in ranked {
            if remaining == 0 {
                break;
            }
            let Some(pos) = resting.iter().position(|o| o.id == id) else {
                continue;
            };
            let fill = remaining.min(resting[pos].quantity);
            if execution_price.is_none() {
                execution_price = Some(resting[pos].price);
            }
            trades.push(Trade {
                price: resting[pos].price,
                quantity: fill,
                maker_id: id,
                taker_id: incoming.id.clone(),
                timestamp: SystemTime::now(),
            });
            remaining -= fill;
            if fill == resting[pos].quantity {
                resting.remove(pos);
            } else {
                resting[pos].quantity -= fill;
            }
        }

        debug!(
            filled = incoming.quantity - remaining,
            dropped = remaining,
            trades = trades.len(),
            "market order done"
        );
        Execution {
            requested: incoming.quantity,
            filled: incoming.quantity - remaining,
            execution_price,
            trades,
        }
    }
}
