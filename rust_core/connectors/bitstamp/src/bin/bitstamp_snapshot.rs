use connector_bitstamp::{Bitstamp, BitstampConfig};
use connectors_common::Pair;
use log::{info, warn};
use std::env;

fn print_usage() {
    eprintln!("Usage: bitstamp_snapshot [BASE] [QUOTE] [DEPTH]   (default: btc usd 5)");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        print_usage();
        return Ok(());
    }
    let base = args.first().map(String::as_str).unwrap_or("btc");
    let quote = args.get(1).map(String::as_str).unwrap_or("usd");
    let depth: usize = match args.get(2) {
        Some(d) => d.parse()?,
        None => 5,
    };

    let config = BitstampConfig::from_env()?;
    info!("using {}", config.base_url);
    let bitstamp = Bitstamp::new(config);

    let pair = Pair::new(base, quote);
    if !bitstamp.supports(&pair) {
        warn!("{} is not in the known bitstamp pair list, requesting anyway", pair);
    }

    let ticker = bitstamp.get_ticker(base, quote).await?;
    println!("{}", serde_json::to_string_pretty(&ticker)?);

    let book = bitstamp.get_order_book(base, quote).await?;
    println!("{}", serde_json::to_string_pretty(&book.top(depth))?);
    Ok(())
}
