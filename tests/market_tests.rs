use std::time::Duration;

use spoofing_sim::errors::EngineError;
use spoofing_sim::market::{Market, MarketConfig, Placed};
use spoofing_sim::orders::{Intent, Order, Side};
use spoofing_sim::reaction::Reaction;

fn seeded_market(seed: u64) -> Market {
    Market::new(MarketConfig {
        seed: Some(seed),
        reaction_delay: Duration::ZERO,
        ..MarketConfig::default()
    })
}

/// End-to-end spoof: a large spoof sell lands, the market absorbs it, and no
/// surviving bid ends up more expensive than it started.
#[test]
fn spoof_sell_wall_depresses_the_bid_side() {
    let mut market = seeded_market(1);
    let bids_before: Vec<(String, f64)> = market
        .book()
        .buy_orders
        .iter()
        .map(|o| (o.id.clone(), o.price))
        .collect();

    let placed = market
        .place(Order::limit(
            Side::Sell,
            market.current_price() + 0.5,
            600,
            Intent::Spoof,
        ))
        .unwrap();
    let Placed::Rested { reaction, .. } = placed else {
        panic!("limit order executed");
    };
    market.react(reaction.expect("large order must provoke a reaction"));

    for order in &market.book().buy_orders {
        if let Some((_, old)) = bids_before.iter().find(|(id, _)| *id == order.id) {
            assert!(order.price <= *old);
        }
    }
    assert!(
        market
            .log()
            .entries()
            .any(|e| e.message.contains("buy orders retreating"))
    );
}

/// The full manual spoof cycle: place large, wait, cancel, rebound.
#[test]
fn cancelling_the_wall_rebounds_the_market() {
    let mut market = seeded_market(2);

    let Placed::Rested { order_id, reaction } = market
        .place(Order::limit(
            Side::Sell,
            market.current_price() + 0.4,
            500,
            Intent::Genuine,
        ))
        .unwrap()
    else {
        panic!("limit order executed");
    };
    market.react(reaction.unwrap());

    let bids_after_absorb = market.book().buy_orders.len();
    let rebound = market.cancel(&order_id).unwrap();
    assert_eq!(rebound, Some(Reaction::Rebound { side: Side::Sell }));
    market.react(rebound.unwrap());

    // three synthetic bids came back
    assert_eq!(market.book().buy_orders.len(), bids_after_absorb + 3);
}

/// Requested quantity beyond total liquidity empties the side; price falls to
/// the surviving best bid.
#[test]
fn sweeping_the_asks_moves_price_to_the_bid() {
    let mut market = seeded_market(3);
    let total_asks = market.book().depth(Side::Sell);

    let Placed::Executed(execution) =
        market.place(Order::market(Side::Buy, total_asks + 500)).unwrap()
    else {
        panic!("market order rested");
    };

    assert_eq!(execution.filled, total_asks);
    assert_eq!(execution.unfilled(), 500);
    assert!(market.book().sell_orders.is_empty());
    let best_bid = market.book().best_bid().unwrap();
    assert_eq!(market.current_price(), best_bid);
}

#[test]
fn price_history_tracks_every_price_move() {
    let mut market = seeded_market(4);
    let before = market.history().len();
    // generated levels never exceed 249 units, so these sweep at least one
    // full level each and must move the best price
    market.place(Order::market(Side::Buy, 400)).unwrap();
    market.place(Order::market(Side::Sell, 350)).unwrap();
    assert!(market.history().len() > before);
    assert_eq!(
        market.history().latest().unwrap().price,
        market.current_price()
    );
}

#[test]
fn engine_rejects_garbage_orders() {
    let mut market = seeded_market(5);

    let mut zero = Order::market(Side::Sell, 1);
    zero.quantity = 0;
    assert_eq!(market.place(zero), Err(EngineError::InvalidQuantity));

    assert!(matches!(
        market.place(Order::limit(Side::Buy, f64::INFINITY, 5, Intent::Genuine)),
        Err(EngineError::InvalidPrice(_))
    ));

    // the book is untouched by rejected orders
    assert_eq!(market.book().order_count(), 20);
}

#[test]
fn intent_never_affects_matching() {
    // two markets, same seed, same-size sell at the same price; one spoof,
    // one genuine. A market buy must fill both identically.
    let run = |intent: Intent| {
        let mut market = seeded_market(6);
        market
            .place(Order::limit(Side::Sell, 100.05, 80, intent))
            .unwrap();
        let Placed::Executed(execution) = market.place(Order::market(Side::Buy, 80)).unwrap()
        else {
            panic!("market order rested");
        };
        (execution.filled, execution.execution_price)
    };
    assert_eq!(run(Intent::Spoof), run(Intent::Genuine));
}
