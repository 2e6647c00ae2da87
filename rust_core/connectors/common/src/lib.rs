pub mod errors;
pub mod http;
pub mod source;
pub mod types;

pub use errors::{ConnectorError, Result};
pub use http::{HttpGet, ReqwestGet};
pub use source::MarketDataSource;
pub use types::{BookOrder, Currency, OrderBook, Pair, Ticker};
