//! Exchange client module
//!
//! Market discovery, live prices, signed order placement, and the
//! self-healing session machinery behind all of it.

mod cache;
mod client;
pub mod parse;
mod retry;
mod signing;
mod types;

pub use cache::MarketCache;
pub use client::ExchangeClient;
pub use parse::ParseError;
pub use retry::RetryPolicy;
pub use signing::OrderSigner;
pub use types::{split_up_down, Asset, ExchangeError, Market, Outcome, Receipt};

use async_trait::async_trait;

/// Read-side of the exchange: market discovery and live prices.
///
/// The trait seam lets the signal engine and trader run against an
/// in-memory feed in tests.
#[async_trait]
pub trait MarketFeed: Send + Sync {
    /// Active up/down markets matching the target pattern
    async fn markets(&self) -> Result<Vec<Market>, ExchangeError>;

    /// Current outcome list for a market, always live
    async fn prices(&self, market_id: &str) -> Result<Vec<Outcome>, ExchangeError>;
}
