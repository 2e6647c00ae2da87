//! Bitstamp REST connector: public ticker and order book fetchers mapped onto
//! the shared `connectors_common` types, plus request signing for private
//! endpoints.

pub mod auth;
pub mod config;
pub mod rest;
pub mod wire;

pub use auth::{AuthParameters, Clock, Credentials, FixedClock, Signer, SystemClock};
pub use config::BitstampConfig;
pub use rest::{Bitstamp, SUPPORTED_PAIRS};
