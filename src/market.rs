//! The single owner of all simulation state.
//!
//! Every mutation (placement, cancellation, reaction, replay step) goes
//! through [`Market`], which re-derives the current price from the book
//! afterwards and records the move in the price history. Single ownership is
//! what makes the whole engine sequentially consistent: wrap it in a mutex
//! and there is nothing left to race.

use std::time::Duration;

use rand::{SeedableRng, rngs::StdRng};
use tracing::info;

use crate::{
    errors::{EngineError, EngineResult},
    generator,
    history::{LogKind, MarketLog, PriceHistory},
    orderbook::{DEFAULT_PRICE, Execution, OrderBook},
    orders::{Intent, Order, OrderType, Side},
    reaction::{self, LARGE_ORDER_THRESHOLD, Reaction},
};

#[derive(Debug, Clone)]
pub struct MarketConfig {
    /// Price the synthetic book is generated around.
    pub base_price: f64,
    /// Resting quantity at or above which an order provokes a reaction.
    pub large_order_threshold: u64,
    /// Lag before a provoked reaction hits the book. Zero applies reactions
    /// with no scheduling delay; the default models participants' lagged
    /// response.
    pub reaction_delay: Duration,
    /// Backdated samples seeded into the price history at startup.
    pub history_points: usize,
    /// Seed for the engine RNG. `None` draws from OS entropy; tests pass
    /// `Some` for reproducible books and reactions.
    pub seed: Option<u64>,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            base_price: DEFAULT_PRICE,
            large_order_threshold: LARGE_ORDER_THRESHOLD,
            reaction_delay: Duration::from_millis(900),
            history_points: 30,
            seed: None,
        }
    }
}

/// What happened to a placed order.
#[derive(Debug, PartialEq)]
pub enum Placed {
    /// A limit order now resting in the book. `reaction` is present when the
    /// order was large enough to provoke one; the caller decides when to feed
    /// it back through [`Market::react`].
    Rested {
        order_id: String,
        reaction: Option<Reaction>,
    },
    /// A market order, executed immediately.
    Executed(Execution),
}

pub struct Market {
    book: OrderBook,
    current_price: f64,
    history: PriceHistory,
    log: MarketLog,
    rng: StdRng,
    config: MarketConfig,
}

impl Market {
    pub fn new(config: MarketConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let book = generator::initial_book(config.base_price, &mut rng);
        let history = generator::seed_history(config.base_price, config.history_points, &mut rng);
        let current_price = book.mid_price();

        let mut market = Self {
            book,
            current_price,
            history,
            log: MarketLog::new(),
            rng,
            config,
        };
        market.history.push(current_price);
        market.log.push(
            LogKind::Info,
            format!(
                "Market simulation initialized. Current price: ${:.2}",
                current_price
            ),
        );
        market
    }

    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    pub fn current_price(&self) -> f64 {
        self.current_price
    }

    pub fn history(&self) -> &PriceHistory {
        &self.history
    }

    pub fn log(&self) -> &MarketLog {
        &self.log
    }

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Write a line to the market log.
    pub fn note(&mut self, kind: LogKind, message: impl Into<String>) {
        self.log.push(kind, message);
    }

    fn validate(order: &Order) -> EngineResult<()> {
        if order.quantity == 0 {
            return Err(EngineError::InvalidQuantity);
        }
        if order.order_type == OrderType::Limit && (!order.price.is_finite() || order.price < 0.0) {
            return Err(EngineError::InvalidPrice(order.price));
        }
        Ok(())
    }

    /// Places an order.
    ///
    /// Market orders execute against the book immediately. Limit orders rest
    /// unconditionally (even when marketable); a large one yields the
    /// [`Reaction`] the market will have to it.
    pub fn place(&mut self, order: Order) -> EngineResult<Placed> {
        Self::validate(&order)?;
        match order.order_type {
            OrderType::Market => {
                let execution = self.book.execute_market(&order);
                let reported = execution.execution_price.unwrap_or(self.current_price);
                self.log.push(
                    LogKind::Info,
                    format!(
                        "Market order executed: {} @ ${:.2}",
                        order.quantity, reported
                    ),
                );
                self.refresh_price();
                Ok(Placed::Executed(execution))
            }
            OrderType::Limit => {
                let reaction = order
                    .is_large(self.config.large_order_threshold)
                    .then_some(Reaction::Absorb { side: order.side });
                let side_word = match order.side {
                    Side::Buy => "buy",
                    Side::Sell => "sell",
                };
                let (kind, label) = match order.intent {
                    Intent::Spoof => (LogKind::Warning, "spoofed "),
                    _ => (LogKind::Success, ""),
                };
                self.log.push(
                    kind,
                    format!(
                        "New {}{} order: {} @ ${:.2}",
                        label, side_word, order.quantity, order.price
                    ),
                );
                let order_id = order.id.clone();
                self.book.insert_limit(order);
                self.refresh_price();
                Ok(Placed::Rested { order_id, reaction })
            }
        }
    }

    /// Cancels a resting order by id.
    ///
    /// Cancelling a large order that was not marked as a spoof is exactly
    /// what spoofing looks like from the outside, so it provokes the inverse
    /// reaction: the pressure the order exerted unwinds.
    pub fn cancel(&mut self, order_id: &str) -> EngineResult<Option<Reaction>> {
        let Some(order) = self.book.cancel(order_id) else {
            return Err(EngineError::UnknownOrder(order_id.to_string()));
        };

        let short_id: String = order.id.chars().take(8).collect();
        let reaction = if order.intent != Intent::Spoof
            && order.is_large(self.config.large_order_threshold)
        {
            self.log.push(
                LogKind::Warning,
                format!("Order {short_id} cancelled manually - this simulates spoofing behavior"),
            );
            Some(Reaction::Rebound { side: order.side })
        } else {
            self.log
                .push(LogKind::Info, format!("Order {short_id} cancelled"));
            None
        };
        self.refresh_price();
        Ok(reaction)
    }

    /// Applies a pending reaction through the engine RNG.
    pub fn react(&mut self, pending: Reaction) {
        reaction::apply(&mut self.book, pending, self.current_price, &mut self.rng);
        let message = match pending {
            Reaction::Absorb { side: Side::Sell } => {
                "Market reacts to large sell order: buy orders retreating, price falling"
            }
            Reaction::Absorb { side: Side::Buy } => {
                "Market reacts to large buy order: sell orders retreating, price rising"
            }
            Reaction::Rebound { side: Side::Sell } => {
                "Market reacts to cancelled sell order: price rebounds as selling pressure is removed"
            }
            Reaction::Rebound { side: Side::Buy } => {
                "Market reacts to cancelled buy order: price drops as buying pressure is removed"
            }
        };
        self.log.push(LogKind::Info, message);
        self.refresh_price();
    }

    /// Runs a direct book mutation (the replay sequencer's primitives) and
    /// re-derives the price afterwards.
    pub fn mutate_book<R>(&mut self, f: impl FnOnce(&mut OrderBook) -> R) -> R {
        let result = f(&mut self.book);
        self.refresh_price();
        result
    }

    /// Replaces the book with a freshly generated one. Price history and log
    /// are kept.
    pub fn reseed(&mut self) {
        self.book = generator::initial_book(self.config.base_price, &mut self.rng);
        self.refresh_price();
    }

    /// Explicit user-facing reset.
    pub fn reset(&mut self) {
        self.reseed();
        self.log.push(LogKind::Info, "Simulation reset");
        info!("market reset");
    }

    /// Price is not maintained incrementally; re-derive it after every book
    /// mutation and record the sample when it moved.
    fn refresh_price(&mut self) {
        let price = self.book.mid_price();
        if price != self.current_price {
            self.current_price = price;
            self.history.push(price);
        }
    }
}
