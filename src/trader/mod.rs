//! Risk-limited trade execution
//!
//! The trader turns a directional signal into at most one order per
//! cycle, sized against a session-wide spend ceiling. Settlement goes
//! through a trait seam so live, simulated, and test execution share the
//! same cycle logic.

mod engine;
mod history;
mod ledger;
mod settlement;
mod types;

pub use engine::Trader;
pub use history::{TradeHistory, MAX_TRADE_HISTORY};
pub use ledger::SpendLedger;
pub use settlement::{OrderRequest, OrderSettlement, Settlement};
pub use types::{CycleOutcome, Trade, TradeStatus, TradeSummary};
