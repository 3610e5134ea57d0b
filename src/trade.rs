use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// A trade represents a matched transaction between two orders.
///
/// # Terminology
/// - **Maker**: The order that was already resting in the order book (providing liquidity).
/// - **Taker**: The incoming market order that triggered the trade (taking liquidity).
///
/// # Behavior
/// - The trade always executes at the **maker's price** (book price).
/// - Partial fills may occur: one market order can generate a series of trades
///   walking down the book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub price: f64,
    pub quantity: u64,
    pub maker_id: String,
    pub taker_id: String,
    pub timestamp: SystemTime,
}
