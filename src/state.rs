use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::market::{Market, MarketConfig};
use crate::reaction::Reaction;

/// Shared handle to the single-owner [`Market`]. The mutex serializes every
/// book mutation, which is all the concurrency discipline this engine needs.
#[derive(Clone)]
pub struct AppState {
    pub market: Arc<Mutex<Market>>,
}

impl AppState {
    pub fn new(config: MarketConfig) -> Self {
        Self {
            market: Arc::new(Mutex::new(Market::new(config))),
        }
    }
}

/// Applies `pending` to the market after its configured reaction delay,
/// modeling the lagged response of other participants. The market is not
/// kept locked while the delay elapses.
pub fn schedule_reaction(state: &AppState, pending: Reaction) -> JoinHandle<()> {
    let state = state.clone();
    tokio::spawn(async move {
        let delay: Duration = state.market.lock().unwrap().config().reaction_delay;
        sleep(delay).await;
        let mut market = state.market.lock().unwrap();
        market.react(pending);
    })
}
