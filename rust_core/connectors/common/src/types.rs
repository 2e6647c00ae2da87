use serde::{Deserialize, Serialize};
use std::fmt;

/// Currency identifier, normalized to trimmed uppercase ("btc" -> "BTC").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Currency(String);

impl Currency {
    pub fn new(code: &str) -> Self {
        Currency(code.trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered (base, quote) market identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pair {
    pub first: Currency,
    pub second: Currency,
}

impl Pair {
    pub fn new(base: &str, quote: &str) -> Self {
        Pair {
            first: Currency::new(base),
            second: Currency::new(quote),
        }
    }

    /// Lowercase form joined by `sep`, e.g. `lower("")` -> "btcusd".
    pub fn lower(&self, sep: &str) -> String {
        format!("{}{}{}", self.first, sep, self.second).to_lowercase()
    }

    pub fn upper(&self, sep: &str) -> String {
        format!("{}{}{}", self.first, sep, self.second)
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.first, self.second)
    }
}

/// Point-in-time market summary shared by every exchange adapter.
///
/// The struct has the same shape for all venues. A venue that does not report
/// a field sets it to `0.0`; adapters document which of their zeros mean
/// "not reported" rather than a real zero value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    /// Unix seconds.
    pub timestamp: i64,
    pub last_price: f64,
    pub last_quantity: f64,
    pub high: f64,
    pub low: f64,
    pub open: f64,
    pub close: f64,
    pub ask: f64,
    pub ask_quantity: f64,
    pub bid: f64,
    pub bid_quantity: f64,
    pub vwap: f64,
    pub volume: f64,
    pub quote_volume: f64,
    pub price_change: f64,
    pub percent_change: f64,
    pub pair: Pair,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BookOrder {
    pub price: f64,
    pub quantity: f64,
}

/// Order book snapshot. Levels keep the order the venue delivered them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBook {
    /// Unix seconds.
    pub timestamp: i64,
    pub bids: Vec<BookOrder>,
    pub asks: Vec<BookOrder>,
}

impl OrderBook {
    pub fn best_bid(&self) -> Option<&BookOrder> {
        self.bids.first()
    }

    pub fn best_ask(&self) -> Option<&BookOrder> {
        self.asks.first()
    }

    /// Copy of the book truncated to `depth` levels per side.
    pub fn top(&self, depth: usize) -> OrderBook {
        OrderBook {
            timestamp: self.timestamp,
            bids: self.bids.iter().take(depth).copied().collect(),
            asks: self.asks.iter().take(depth).copied().collect(),
        }
    }
}
