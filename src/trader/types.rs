//! Trade records and cycle outcomes

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::signal::Direction;

/// Lifecycle of one execution attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    Pending,
    Confirmed,
    Failed,
}

/// One execution attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub id: Uuid,
    pub market_id: String,
    pub direction: Direction,
    /// Amount put at risk; always > 0 and ceiling-respecting
    pub amount: Decimal,
    pub price: Decimal,
    pub probability: Decimal,
    pub timestamp: DateTime<Utc>,
    pub status: TradeStatus,
    /// Venue receipt, present when settlement confirmed the order
    pub receipt_id: Option<String>,
}

/// Aggregates over confirmed trades only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSummary {
    pub total_trades: usize,
    pub total_amount: Decimal,
    pub up_trades: usize,
    pub down_trades: usize,
    pub average_probability: Decimal,
    pub last_trade_time: Option<DateTime<Utc>>,
}

/// Result of one trading cycle.
///
/// Every variant except `Traded` is a normal "no trade this cycle"
/// outcome, not an error.
#[derive(Debug, Clone)]
pub enum CycleOutcome {
    /// A trade was attempted and recorded (confirmed or failed)
    Traded(Trade),
    /// No market matched the target pattern
    NoMarket,
    /// The signal carried no directional conviction
    NeutralSignal,
    /// Signal probability was under the configured threshold
    BelowThreshold { probability: Decimal },
    /// The cumulative spend ceiling leaves no room to trade
    LimitReached,
    /// No outcome matched the signal's direction
    OutcomeNotFound { direction: Direction },
}

impl CycleOutcome {
    /// Short label for logs
    pub fn describe(&self) -> &'static str {
        match self {
            CycleOutcome::Traded(_) => "traded",
            CycleOutcome::NoMarket => "no market",
            CycleOutcome::NeutralSignal => "neutral signal",
            CycleOutcome::BelowThreshold { .. } => "below threshold",
            CycleOutcome::LimitReached => "limit reached",
            CycleOutcome::OutcomeNotFound { .. } => "outcome not found",
        }
    }
}
