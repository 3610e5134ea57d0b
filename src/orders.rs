use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents which side of the market the order is on.
///
/// # Intuition
/// - `Buy` (Bid): The trader wants to purchase the asset. Buy orders rest **below**
///   the current price and the matching engine consumes them from the highest price down.
/// - `Sell` (Ask): The trader wants to sell the asset. Sell orders rest **above**
///   the current price and are consumed from the lowest price up.
///
/// This ordering ensures an incoming market order always trades at the **best price first**:
/// - Buyers match with the **lowest ask**
/// - Sellers match with the **highest bid**
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Buy,  // Bid
    Sell, // Ask
}

impl Side {
    /// The side an incoming order of this side executes against.
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// Specifies whether an order is a Limit or Market order.
///
/// - `Limit`: Rests in the book at its stated price. In this simulator a limit
///   order **never** executes on its own, even when it crosses the opposite
///   side. Only market orders trigger matching.
/// - `Market`: Executes immediately at the best available price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    Limit,
    Market,
}

/// Why the trader placed the order. Display-only: intent is carried so the
/// spoofing demonstration can label orders, it has no effect on matching or
/// pricing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// A real order the trader wants filled.
    Genuine,
    /// A real order placed to move the market.
    Aggressive,
    /// An order placed with no intention of execution, to be cancelled.
    Spoof,
}

/// An order submitted by a trader or by the scripted replay.
///
/// - `price` is 0.0 and ignored for market orders
/// - `quantity` is always > 0 while the order is in the book; fully filled
///   orders are removed, never retained at zero
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub side: Side,
    pub order_type: OrderType,
    pub price: f64,
    pub quantity: u64,
    pub timestamp: SystemTime,
    pub intent: Intent,
}

impl Order {
    /// A limit order with a fresh opaque id.
    pub fn limit(side: Side, price: f64, quantity: u64, intent: Intent) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            side,
            order_type: OrderType::Limit,
            price,
            quantity,
            timestamp: SystemTime::now(),
            intent,
        }
    }

    /// A market order. Price is fixed at 0.0 by convention; the fill price
    /// comes from the book.
    pub fn market(side: Side, quantity: u64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            side,
            order_type: OrderType::Market,
            price: 0.0,
            quantity,
            timestamp: SystemTime::now(),
            intent: Intent::Genuine,
        }
    }

    /// Whether this is a resting order big enough to provoke a market
    /// reaction. Market orders never qualify, they are gone immediately.
    pub fn is_large(&self, threshold: u64) -> bool {
        self.order_type == OrderType::Limit && self.quantity >= threshold
    }
}
