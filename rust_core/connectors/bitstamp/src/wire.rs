//! Bitstamp JSON payloads as they arrive on the wire.
//!
//! Bitstamp sends every number as a JSON string. Decoding keeps them as
//! strings; the `into_*` conversions coerce them explicitly so a bad value
//! is reported with the field it came from.

use connectors_common::{BookOrder, ConnectorError, OrderBook, Pair, Result, Ticker};
use serde::Deserialize;

/// `/api/v2/ticker/{pair}/` and `/api/v2/ticker_hour/{pair}/`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTicker {
    pub high: String,
    pub last: String,
    pub timestamp: String,
    pub bid: String,
    pub vwap: String,
    pub volume: String,
    pub low: String,
    pub ask: String,
    pub open: String,
}

/// `/api/v2/order_book/{pair}/`. Levels are `[price, amount]`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawOrderBook {
    pub timestamp: String,
    pub bids: Vec<Vec<String>>,
    pub asks: Vec<Vec<String>>,
}

pub fn parse_decimal(field: &str, text: &str) -> Result<f64> {
    match text.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ConnectorError::Parse(format!("{}: {:?} is not a decimal number", field, text))),
    }
}

pub fn parse_timestamp(text: &str) -> Result<i64> {
    text.trim()
        .parse::<i64>()
        .map_err(|e| ConnectorError::Parse(format!("timestamp: {:?}: {}", text, e)))
}

impl RawTicker {
    /// Maps onto the shared ticker. Bitstamp does not report last/ask/bid
    /// quantity, close, quote volume, price change or percent change; those
    /// are set to `0.0`, meaning "not reported".
    pub fn into_ticker(self, pair: Pair) -> Result<Ticker> {
        Ok(Ticker {
            timestamp: parse_timestamp(&self.timestamp)?,
            last_price: parse_decimal("last", &self.last)?,
            last_quantity: 0.0,
            high: parse_decimal("high", &self.high)?,
            low: parse_decimal("low", &self.low)?,
            open: parse_decimal("open", &self.open)?,
            close: 0.0,
            ask: parse_decimal("ask", &self.ask)?,
            ask_quantity: 0.0,
            bid: parse_decimal("bid", &self.bid)?,
            bid_quantity: 0.0,
            vwap: parse_decimal("vwap", &self.vwap)?,
            volume: parse_decimal("volume", &self.volume)?,
            quote_volume: 0.0,
            price_change: 0.0,
            percent_change: 0.0,
            pair,
        })
    }
}

impl RawOrderBook {
    pub fn into_order_book(self) -> Result<OrderBook> {
        Ok(OrderBook {
            timestamp: parse_timestamp(&self.timestamp)?,
            bids: parse_levels("bids", &self.bids)?,
            asks: parse_levels("asks", &self.asks)?,
        })
    }
}

// Keeps the exchange's ordering as-is.
fn parse_levels(side: &str, levels: &[Vec<String>]) -> Result<Vec<BookOrder>> {
    let mut out = Vec::with_capacity(levels.len());
    for (i, level) in levels.iter().enumerate() {
        match level.as_slice() {
            [price, quantity] => out.push(BookOrder {
                price: parse_decimal(&format!("{}[{}].price", side, i), price)?,
                quantity: parse_decimal(&format!("{}[{}].quantity", side, i), quantity)?,
            }),
            _ => {
                return Err(ConnectorError::Parse(format!(
                    "{}[{}]: expected [price, quantity], got {} elements",
                    side,
                    i,
                    level.len()
                )))
            }
        }
    }
    Ok(out)
}
