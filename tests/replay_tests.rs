use std::time::Duration;

use tokio_util::sync::CancellationToken;

use spoofing_sim::market::MarketConfig;
use spoofing_sim::orders::{Intent, Order, Side};
use spoofing_sim::reaction::Reaction;
use spoofing_sim::replay::{REPLAY_STEPS, run_replay};
use spoofing_sim::state::{AppState, schedule_reaction};

fn seeded_state(seed: u64) -> AppState {
    AppState::new(MarketConfig {
        seed: Some(seed),
        reaction_delay: Duration::ZERO,
        ..MarketConfig::default()
    })
}

#[tokio::test]
async fn replay_runs_to_completion() {
    let state = seeded_state(21);
    let cancel = CancellationToken::new();
    let executed = run_replay(state.clone(), Duration::from_millis(1), cancel).await;

    assert_eq!(executed, REPLAY_STEPS);
    let market = state.market.lock().unwrap();
    assert!(
        market
            .book()
            .sell_orders
            .iter()
            .chain(&market.book().buy_orders)
            .all(|o| o.intent != Intent::Spoof)
    );
    assert!(
        market
            .log()
            .entries()
            .any(|e| e.message.contains("sells for profit"))
    );
}

#[tokio::test]
async fn cancelled_replay_executes_no_steps() {
    let state = seeded_state(22);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let executed = run_replay(state.clone(), Duration::from_secs(60), cancel).await;

    assert_eq!(executed, 0);
    let market = state.market.lock().unwrap();
    assert!(
        market
            .log()
            .entries()
            .any(|e| e.message.contains("Simulation paused"))
    );
}

#[tokio::test]
async fn scheduled_reaction_lands_after_the_delay() {
    let state = seeded_state(23);
    let reaction = {
        let mut market = state.market.lock().unwrap();
        let price = market.current_price() + 0.3;
        let placed = market
            .place(Order::limit(
                Side::Sell,
                price,
                450,
                Intent::Genuine,
            ))
            .unwrap();
        match placed {
            spoofing_sim::market::Placed::Rested { reaction, .. } => reaction.unwrap(),
            spoofing_sim::market::Placed::Executed(_) => panic!("limit order executed"),
        }
    };
    assert_eq!(reaction, Reaction::Absorb { side: Side::Sell });

    let handle = schedule_reaction(&state, reaction);
    handle.await.unwrap();

    let market = state.market.lock().unwrap();
    assert!(
        market
            .log()
            .entries()
            .any(|e| e.message.contains("buy orders retreating"))
    );
}
