use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand, builder::PossibleValuesParser};

use crate::{
    market::{Market, MarketConfig, Placed},
    orders::{Intent, Order, Side},
    replay::{self, Replay},
    state::AppState,
    utils,
};

/// Simple CLI to drive the spoofing simulator
#[derive(Parser)]
#[command(name = "spoofing-sim")]
#[command(
    version = "0.1",
    about = "An educational order-book spoofing simulator"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed a synthetic market and print the book
    Book {
        /// Seed for a reproducible market
        #[arg(long)]
        seed: Option<u64>,

        /// Print the book as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Place a single order against a freshly seeded market
    Add {
        /// BUY or SELL
        #[arg(value_parser = PossibleValuesParser::new(["buy", "sell"]))]
        side: String,

        /// LIMIT or MARKET
        #[arg(value_parser = PossibleValuesParser::new(["limit", "market"]))]
        order_type: String,

        /// Quantity (must be > 0)
        quantity: u64,

        /// Price (limit orders only; defaults to the current price)
        #[arg(long)]
        price: Option<f64>,

        /// Label the order as a spoof
        #[arg(long)]
        spoof: bool,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// Execute a market order against a freshly seeded market
    Match {
        /// BUY or SELL
        #[arg(value_parser = PossibleValuesParser::new(["buy", "sell"]))]
        side: String,

        /// Quantity
        quantity: u64,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// Replay the Sarao spoofing strategy
    Replay {
        #[arg(long)]
        seed: Option<u64>,

        /// Milliseconds between scripted steps
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,

        /// Single-step: run only this many steps, with no timer
        #[arg(long)]
        steps: Option<usize>,
    },
}

fn build_market(seed: Option<u64>) -> Market {
    Market::new(MarketConfig {
        seed,
        // one-shot commands apply reactions inline
        reaction_delay: Duration::ZERO,
        ..MarketConfig::default()
    })
}

fn parse_side(side: &str) -> Side {
    match side {
        "buy" => Side::Buy,
        "sell" => Side::Sell,
        _ => unreachable!(),
    }
}

fn print_book(market: &Market) {
    let book = market.book();
    println!("------ Order Book ------");
    println!("Asks (lowest first):");
    let mut asks: Vec<_> = book.sell_orders.iter().collect();
    asks.sort_by(|a, b| a.price.total_cmp(&b.price));
    for order in asks {
        println!(
            "  {:>8.2}  x{:<5} {:?}",
            order.price, order.quantity, order.intent
        );
    }
    println!("Bids (highest first):");
    let mut bids: Vec<_> = book.buy_orders.iter().collect();
    bids.sort_by(|a, b| b.price.total_cmp(&a.price));
    for order in bids {
        println!(
            "  {:>8.2}  x{:<5} {:?}",
            order.price, order.quantity, order.intent
        );
    }
    println!("Current price: {:.2}", market.current_price());
    println!("------------------------");
}

fn print_log(market: &Market) {
    for entry in market.log().entries() {
        println!("[{}] {}", entry.kind, entry.message);
    }
}

fn handle_book(seed: Option<u64>, json: bool) -> Result<()> {
    let market = build_market(seed);
    if json {
        println!("{}", serde_json::to_string_pretty(market.book())?);
    } else {
        print_book(&market);
    }
    Ok(())
}

fn handle_add(
    side_str: String,
    order_type_str: String,
    price: Option<f64>,
    quantity: u64,
    spoof: bool,
    seed: Option<u64>,
) -> Result<()> {
    let mut market = build_market(seed);
    let side = parse_side(&side_str);
    let intent = if spoof { Intent::Spoof } else { Intent::Genuine };

    let order = match order_type_str.as_str() {
        "limit" => Order::limit(
            side,
            price.unwrap_or_else(|| market.current_price()),
            quantity,
            intent,
        ),
        "market" => Order::market(side, quantity),
        _ => unreachable!(),
    };

    match market.place(order)? {
        Placed::Executed(execution) => {
            if execution.trades.is_empty() {
                println!("No trades occurred.");
            } else {
                println!("Trades generated from market order:");
                for trade in &execution.trades {
                    println!("  {} @ {:.2}", trade.quantity, trade.price);
                }
            }
            if execution.unfilled() > 0 {
                println!("Unfilled (no liquidity): {}", execution.unfilled());
            }
        }
        Placed::Rested { order_id, reaction } => {
            println!("Limit order resting: {order_id}");
            if let Some(pending) = reaction {
                market.react(pending);
                println!("Large order provoked a market reaction.");
            }
        }
    }
    print_book(&market);
    Ok(())
}

fn handle_match(side_str: String, quantity: u64, seed: Option<u64>) -> Result<()> {
    let mut market = build_market(seed);
    let side = parse_side(&side_str);
    let Placed::Executed(execution) = market.place(Order::market(side, quantity))? else {
        unreachable!()
    };
    if execution.trades.is_empty() {
        println!("No trades occurred.");
    } else {
        println!(
            "Filled {}/{} @ first price {:.2}",
            execution.filled,
            execution.requested,
            execution.execution_price.unwrap_or(market.current_price())
        );
        for trade in &execution.trades {
            println!("  {} @ {:.2}", trade.quantity, trade.price);
        }
    }
    print_book(&market);
    Ok(())
}

async fn handle_replay(seed: Option<u64>, interval_ms: u64, steps: Option<usize>) -> Result<()> {
    let state = AppState::new(MarketConfig {
        seed,
        ..MarketConfig::default()
    });

    if let Some(count) = steps {
        // single-stepped, no timer
        let mut market = state.market.lock().unwrap();
        let mut replay = Replay::start(&mut market);
        for _ in 0..count {
            if replay.advance(&mut market).is_none() {
                break;
            }
        }
        print_log(&market);
        print_book(&market);
        return Ok(());
    }

    let cancel = utils::shutdown_token();
    let executed = replay::run_replay(
        state.clone(),
        Duration::from_millis(interval_ms),
        cancel,
    )
    .await;
    println!("--- replay finished: {executed} steps ---");
    let market = state.market.lock().unwrap();
    print_log(&market);
    print_book(&market);
    Ok(())
}

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Book { seed, json } => handle_book(seed, json),
        Commands::Add {
            side,
            order_type,
            price,
            quantity,
            spoof,
            seed,
        } => handle_add(side, order_type, price, quantity, spoof, seed),
        Commands::Match {
            side,
            quantity,
            seed,
        } => handle_match(side, quantity, seed),
        Commands::Replay {
            seed,
            interval_ms,
            steps,
        } => handle_replay(seed, interval_ms, steps).await,
    }
}
