//! Scripted replay of the Sarao spoofing strategy.
//!
//! A fixed five-step sequence driven through the same engine as manual
//! trading: build a spoof wall, let the bid side thin out, buy the dip, pull
//! the wall, sell the rebound. [`Replay`] holds nothing but a step counter;
//! each step is the Matcher or a direct book mutation.
//!
//! [`run_replay`] drives the steps on a timer. Cancelling its token stops the
//! timer so no further scripted step executes; that is the only cancellation
//! semantic in the system.

use std::time::Duration;

use rand::Rng;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{
    history::LogKind,
    market::Market,
    orders::{Intent, Order, Side},
    state::AppState,
};

/// Steps in the scripted strategy.
pub const REPLAY_STEPS: usize = 5;

const SPOOF_WALL_ORDERS: usize = 5;
const SPOOF_MIN_QTY: u64 = 500;
const SPOOF_MAX_QTY: u64 = 1000;
/// Size of the dip-buy and rebound-sell market orders.
const SWEEP_QTY: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayStep {
    /// Five large spoof sells stacked just above the market.
    SpoofWall,
    /// Every third resting buy retreats under the sell pressure.
    BuyersRetreat,
    /// A 1000-unit market buy into the depressed price.
    BuyTheDip,
    /// All spoof orders pulled before anyone can hit them.
    PullSpoofs,
    /// A 1000-unit market sell into the recovered price.
    SellTheRebound,
}

/// The sequencer: a step counter and nothing else.
#[derive(Debug, Default)]
pub struct Replay {
    step: usize,
}

impl Replay {
    /// Resets the market to a fresh synthetic book (history and log are
    /// kept) and returns a sequencer at step zero.
    pub fn start(market: &mut Market) -> Self {
        market.reseed();
        market.note(
            LogKind::Info,
            "Starting Sarao spoofing strategy simulation...",
        );
        Self { step: 0 }
    }

    /// Steps completed so far.
    pub fn step(&self) -> usize {
        self.step
    }

    pub fn is_complete(&self) -> bool {
        self.step >= REPLAY_STEPS
    }

    /// Executes the next scripted step against `market`. Returns the step
    /// that ran, or `None` once the script has halted.
    pub fn advance(&mut self, market: &mut Market) -> Option<ReplayStep> {
        let step = match self.step {
            0 => ReplayStep::SpoofWall,
            1 => ReplayStep::BuyersRetreat,
            2 => ReplayStep::BuyTheDip,
            3 => ReplayStep::PullSpoofs,
            4 => ReplayStep::SellTheRebound,
            _ => return None,
        };
        self.step += 1;

        match step {
            ReplayStep::SpoofWall => {
                let anchor = market.current_price();
                for i in 0..SPOOF_WALL_ORDERS {
                    let quantity = market.rng_mut().random_range(SPOOF_MIN_QTY..SPOOF_MAX_QTY);
                    let price = anchor + 0.5 + i as f64 * 0.1;
                    let order = Order::limit(Side::Sell, price, quantity, Intent::Spoof);
                    market.mutate_book(|book| book.insert_limit(order));
                }
                market.note(
                    LogKind::Warning,
                    "Large spoof sell orders placed above market price",
                );
            }
            ReplayStep::BuyersRetreat => {
                market.mutate_book(|book| book.retain_side(Side::Buy, |i, _| i % 3 != 0));
                market.note(
                    LogKind::Info,
                    "Market reacts: Buy orders retreating due to sell pressure",
                );
            }
            ReplayStep::BuyTheDip => {
                let order = Order::market(Side::Buy, SWEEP_QTY);
                market.mutate_book(|book| book.execute_market(&order));
                market.note(
                    LogKind::Success,
                    "Price dropped! Sarao buys the dip with large market buy order",
                );
            }
            ReplayStep::PullSpoofs => {
                market.mutate_book(|book| book.purge_spoofs());
                market.note(
                    LogKind::Warning,
                    "Spoof sell orders cancelled before they could be executed",
                );
            }
            ReplayStep::SellTheRebound => {
                let order = Order::market(Side::Sell, SWEEP_QTY);
                market.mutate_book(|book| book.execute_market(&order));
                market.note(LogKind::Success, "Price rebounds! Sarao sells for profit");
            }
        }
        Some(step)
    }
}

/// Drives a full replay on a timer, one step per `interval`.
///
/// Stops early when `cancel` fires; the pending tick is abandoned so no
/// further step executes. Returns the number of steps that ran.
pub async fn run_replay(state: AppState, interval: Duration, cancel: CancellationToken) -> usize {
    let mut replay = {
        let mut market = state.market.lock().unwrap();
        Replay::start(&mut market)
    };
    let mut executed = 0;

    while !replay.is_complete() {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!(step = replay.step(), "replay cancelled");
                let mut market = state.market.lock().unwrap();
                market.note(LogKind::Info, "Simulation paused");
                break;
            }
            _ = sleep(interval) => {
                let mut market = state.market.lock().unwrap();
                if let Some(step) = replay.advance(&mut market) {
                    executed += 1;
                    info!(?step, "replay step executed");
                }
            }
        }
    }
    executed
}
