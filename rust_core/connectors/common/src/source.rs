use crate::errors::Result;
use crate::types::{OrderBook, Ticker};
use async_trait::async_trait;

/// What a multi-exchange client needs from each venue adapter.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn get_ticker(&self, base: &str, quote: &str) -> Result<Ticker>;

    async fn get_order_book(&self, base: &str, quote: &str) -> Result<OrderBook>;
}
