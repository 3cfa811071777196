//! Bounded trade history with confirmed-only aggregation

use rust_decimal::Decimal;
use std::collections::VecDeque;

use super::types::{Trade, TradeStatus, TradeSummary};
use crate::signal::Direction;

/// Retained trade records; the oldest record is dropped first
pub const MAX_TRADE_HISTORY: usize = 256;

/// Session-scoped record of execution attempts
#[derive(Debug, Default)]
pub struct TradeHistory {
    trades: VecDeque<Trade>,
}

impl TradeHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, trade: Trade) {
        if self.trades.len() == MAX_TRADE_HISTORY {
            self.trades.pop_front();
        }
        self.trades.push_back(trade);
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trade> {
        self.trades.iter()
    }

    /// Aggregate confirmed trades. Pending and failed attempts are
    /// excluded from every figure.
    pub fn summary(&self) -> TradeSummary {
        let confirmed: Vec<&Trade> = self
            .trades
            .iter()
            .filter(|t| t.status == TradeStatus::Confirmed)
            .collect();

        let total_amount: Decimal = confirmed.iter().map(|t| t.amount).sum();
        let probability_sum: Decimal = confirmed.iter().map(|t| t.probability).sum();
        let average_probability = if confirmed.is_empty() {
            Decimal::ZERO
        } else {
            probability_sum / Decimal::from(confirmed.len() as u64)
        };

        TradeSummary {
            total_trades: confirmed.len(),
            total_amount,
            up_trades: confirmed
                .iter()
                .filter(|t| t.direction == Direction::Up)
                .count(),
            down_trades: confirmed
                .iter()
                .filter(|t| t.direction == Direction::Down)
                .count(),
            average_probability,
            last_trade_time: confirmed.iter().map(|t| t.timestamp).max(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn trade(amount: Decimal, status: TradeStatus, direction: Direction) -> Trade {
        Trade {
            id: Uuid::new_v4(),
            market_id: "m1".to_string(),
            direction,
            amount,
            price: dec!(0.55),
            probability: dec!(0.75),
            timestamp: Utc::now(),
            status,
            receipt_id: None,
        }
    }

    #[test]
    fn test_summary_excludes_pending_trades() {
        let mut history = TradeHistory::new();
        history.push(trade(dec!(0.8), TradeStatus::Confirmed, Direction::Up));
        history.push(trade(dec!(0.6), TradeStatus::Confirmed, Direction::Down));
        history.push(trade(dec!(0.4), TradeStatus::Pending, Direction::Up));

        let summary = history.summary();
        assert_eq!(summary.total_trades, 2);
        assert_eq!(summary.total_amount, dec!(1.4));
        assert_eq!(summary.up_trades, 1);
        assert_eq!(summary.down_trades, 1);
        assert_eq!(summary.average_probability, dec!(0.75));
        assert!(summary.last_trade_time.is_some());
    }

    #[test]
    fn test_summary_excludes_failed_trades() {
        let mut history = TradeHistory::new();
        history.push(trade(dec!(0.8), TradeStatus::Failed, Direction::Up));

        let summary = history.summary();
        assert_eq!(summary.total_trades, 0);
        assert_eq!(summary.total_amount, dec!(0));
        assert_eq!(summary.average_probability, dec!(0));
        assert!(summary.last_trade_time.is_none());
    }

    #[test]
    fn test_empty_history_summary() {
        let summary = TradeHistory::new().summary();
        assert_eq!(summary.total_trades, 0);
        assert!(summary.last_trade_time.is_none());
    }

    #[test]
    fn test_history_is_bounded() {
        let mut history = TradeHistory::new();
        for _ in 0..MAX_TRADE_HISTORY + 5 {
            history.push(trade(dec!(0.1), TradeStatus::Confirmed, Direction::Up));
        }
        assert_eq!(history.len(), MAX_TRADE_HISTORY);
    }

    #[test]
    fn test_last_trade_time_is_most_recent() {
        let mut history = TradeHistory::new();
        let mut older = trade(dec!(0.5), TradeStatus::Confirmed, Direction::Up);
        older.timestamp = Utc::now() - chrono::Duration::hours(1);
        let newer = trade(dec!(0.5), TradeStatus::Confirmed, Direction::Down);
        let newest_ts = newer.timestamp;

        history.push(newer);
        history.push(older);

        assert_eq!(history.summary().last_trade_time, Some(newest_ts));
    }
}
