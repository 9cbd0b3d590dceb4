//! Daily history of one share over the last month, plus yesterday's correlations.
//!
//! Run with: cargo run --example 02_share_history --features tracing-subscriber -- SBER

use chrono::{Local, TimeDelta};
use moex_iss::statistics::{DEFAULT_ENGINE, DEFAULT_MARKET};
use moex_iss::{Board, IssClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "tracing-subscriber")]
    moex_iss::init_tracing_for_tests();

    let security = std::env::args().nth(1).unwrap_or_else(|| "SBER".to_string());
    let client = IssClient::builder().connect().await?;

    let till = Local::now().date_naive();
    let from = till - TimeDelta::days(30);
    let history = client
        .share_history(&security)
        .board(Board::default())
        .between(from, till)
        .fetch()
        .await?;
    println!("{security}: {} trading days\n{history}", history.len());

    let correlations = client
        .correlations(DEFAULT_ENGINE, DEFAULT_MARKET, None)
        .await?;
    println!("correlation pairs for yesterday: {}", correlations.len());
    Ok(())
}
