//! Exchange domain types and errors

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::parse::ParseError;

/// Crypto assets with short-interval up/down markets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Asset {
    Btc,
    Eth,
    Sol,
    Xrp,
}

impl Asset {
    /// All assets the venue lists up/down markets for
    pub const ALL: [Asset; 4] = [Asset::Btc, Asset::Eth, Asset::Sol, Asset::Xrp];

    /// Ticker symbol as it appears in market questions
    pub fn symbol(&self) -> &'static str {
        match self {
            Asset::Btc => "BTC",
            Asset::Eth => "ETH",
            Asset::Sol => "SOL",
            Asset::Xrp => "XRP",
        }
    }

    /// Detect the asset a market question refers to
    pub fn detect(question: &str) -> Option<Asset> {
        let upper = question.to_uppercase();
        Asset::ALL.into_iter().find(|a| upper.contains(a.symbol()))
    }
}

impl std::fmt::Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A tradable binary up/down market
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Market {
    /// Venue market identifier
    pub id: String,
    /// Market question text
    pub question: String,
    /// Longer description, empty if the venue omits it
    pub description: String,
    /// Market end time as reported by the venue (RFC 3339, may be empty)
    pub end_date: String,
    /// Whether the market is currently tradable
    pub active: bool,
    /// Traded volume
    pub volume: Decimal,
    /// Posted liquidity
    pub liquidity: Decimal,
    /// Asset the market tracks, if recognizable from the question
    pub asset: Option<Asset>,
    /// URL slug
    pub slug: String,
}

/// One side of a binary market with its live quote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome {
    /// Token identifier
    pub id: String,
    /// Outcome label, e.g. "Up" or "Down"
    pub label: String,
    /// Last price in [0, 1]
    pub price: Decimal,
    /// Implied probability in [0, 1]
    pub probability: Decimal,
    /// Outstanding token supply
    pub supply: Decimal,
}

impl Outcome {
    pub fn is_up(&self) -> bool {
        self.label.to_lowercase().contains("up")
    }

    pub fn is_down(&self) -> bool {
        self.label.to_lowercase().contains("down")
    }
}

/// Locate the up and down outcomes in a market's outcome list.
///
/// Labels are matched case-insensitively; the first match per side wins.
pub fn split_up_down(outcomes: &[Outcome]) -> (Option<&Outcome>, Option<&Outcome>) {
    let up = outcomes.iter().find(|o| o.is_up());
    let down = outcomes.iter().find(|o| o.is_down());
    (up, down)
}

/// Opaque order receipt returned by the venue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    /// Venue-assigned order identifier
    pub id: String,
}

/// Exchange client errors
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// All retry attempts were consumed without a successful response
    #[error("request failed after {attempts} attempts: {last}")]
    RetryExhausted { attempts: u32, last: String },
    /// Non-success HTTP status that is not worth retrying
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    /// Could not build an HTTP session
    #[error("failed to create session: {0}")]
    Session(String),
    /// Order placement requires a signing credential
    #[error("signing credential not configured")]
    Unauthorized,
    /// The venue rejected the order
    #[error("order rejected: {0}")]
    OrderRejected(String),
    /// The response body did not match any known payload shape
    #[error(transparent)]
    Parse(#[from] ParseError),
}
