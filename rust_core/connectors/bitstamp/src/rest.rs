use crate::auth::{AuthParameters, Credentials, Signer};
use crate::config::BitstampConfig;
use crate::wire::{RawOrderBook, RawTicker};
use async_trait::async_trait;
use connectors_common::{
    ConnectorError, HttpGet, MarketDataSource, OrderBook, Pair, ReqwestGet, Result, Ticker,
};
use log::{debug, warn};

/// Pairs Bitstamp listed in `/api/v2/trading-pairs-info/` for these endpoints.
pub const SUPPORTED_PAIRS: &[&str] = &[
    "btcusd", "btceur", "eurusd", "xrpusd", "xrpeur", "xrpbtc", "ltcusd", "ltceur", "ltcbtc",
    "ethusd", "etheur", "ethbtc", "bchusd", "bcheur", "bchbtc",
];

/// Bitstamp REST adapter.
///
/// Tickers are mapped onto the shared [`Ticker`] with `last_quantity`,
/// `close`, `ask_quantity`, `bid_quantity`, `quote_volume`, `price_change`
/// and `percent_change` always `0.0`: Bitstamp does not report them, so a
/// zero in those fields means "unsupported", never an observed value.
pub struct Bitstamp {
    http: Box<dyn HttpGet>,
    base_url: String,
    signer: Option<Signer>,
}

impl Bitstamp {
    pub fn new(config: BitstampConfig) -> Self {
        let http = ReqwestGet::new(config.timeout);
        Bitstamp::with_transport(config, http)
    }

    pub fn with_transport(config: BitstampConfig, http: impl HttpGet + 'static) -> Self {
        Bitstamp {
            http: Box::new(http),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            signer: None,
        }
    }

    pub fn with_credentials(self, credentials: Credentials) -> Self {
        self.with_signer(Signer::new(credentials))
    }

    pub fn with_signer(mut self, signer: Signer) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn supports(&self, pair: &Pair) -> bool {
        SUPPORTED_PAIRS.contains(&pair.lower("").as_str())
    }

    /// Fresh `key`/`signature`/`nonce` for one private request.
    pub fn auth_values(&self) -> Result<AuthParameters> {
        match &self.signer {
            Some(signer) => signer.compute_auth(),
            None => Err(ConnectorError::Config("bitstamp adapter has no credentials".to_string())),
        }
    }

    /// Last-24h ticker from `/api/v2/ticker/{pair}/`.
    pub async fn get_ticker(&self, base: &str, quote: &str) -> Result<Ticker> {
        self.fetch_ticker("ticker", Pair::new(base, quote)).await
    }

    /// Last-hour ticker from `/api/v2/ticker_hour/{pair}/`.
    pub async fn get_hourly_ticker(&self, base: &str, quote: &str) -> Result<Ticker> {
        self.fetch_ticker("ticker_hour", Pair::new(base, quote)).await
    }

    /// Full book from `/api/v2/order_book/{pair}/`, levels in the order
    /// Bitstamp sent them. Any malformed level fails the whole call.
    pub async fn get_order_book(&self, base: &str, quote: &str) -> Result<OrderBook> {
        let pair = Pair::new(base, quote);
        let body = self.fetch("order_book", &pair).await?;
        let raw: RawOrderBook = serde_json::from_slice(&body)?;
        let book = raw.into_order_book().map_err(|e| {
            warn!("bitstamp order_book {}: {}", pair, e);
            e
        })?;
        debug!("bitstamp order_book {}: {} bids, {} asks", pair, book.bids.len(), book.asks.len());
        Ok(book)
    }

    async fn fetch_ticker(&self, endpoint: &str, pair: Pair) -> Result<Ticker> {
        let body = self.fetch(endpoint, &pair).await?;
        let raw: RawTicker = serde_json::from_slice(&body)?;
        raw.into_ticker(pair.clone()).map_err(|e| {
            warn!("bitstamp {} {}: {}", endpoint, pair, e);
            e
        })
    }

    fn url(&self, endpoint: &str, pair: &Pair) -> String {
        format!("{}/api/v2/{}/{}/", self.base_url, endpoint, pair.lower(""))
    }

    async fn fetch(&self, endpoint: &str, pair: &Pair) -> Result<Vec<u8>> {
        let url = self.url(endpoint, pair);
        self.http.get(&url, &[]).await.map_err(|e| {
            warn!("bitstamp {} {}: {}", endpoint, pair, e);
            let msg = match e {
                ConnectorError::Network(msg) => msg,
                other => other.to_string(),
            };
            ConnectorError::Network(format!("bitstamp {} {}: bad HTTP response: {}", endpoint, pair, msg))
        })
    }
}

#[async_trait]
impl MarketDataSource for Bitstamp {
    fn name(&self) -> &'static str {
        "bitstamp"
    }

    async fn get_ticker(&self, base: &str, quote: &str) -> Result<Ticker> {
        Bitstamp::get_ticker(self, base, quote).await
    }

    async fn get_order_book(&self, base: &str, quote: &str) -> Result<OrderBook> {
        Bitstamp::get_order_book(self, base, quote).await
    }
}
