//! Risk-limited trading cycle
//!
//! One cycle walks Idle → market selected → signal obtained → limit
//! checked → executed or rejected. Every rejection is a normal business
//! outcome; only network-level failures escalate to the supervisor.

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::TradingConfig;
use crate::exchange::{split_up_down, ExchangeError, MarketFeed, Outcome};
use crate::signal::{Direction, SignalEngine};

use super::history::TradeHistory;
use super::ledger::SpendLedger;
use super::settlement::{OrderRequest, Settlement};
use super::types::{CycleOutcome, Trade, TradeStatus, TradeSummary};

/// Orchestrates one trading attempt per cycle under a cumulative spend
/// ceiling. Owns its ledger and history for its whole lifetime; the
/// supervisor replaces the instance wholesale instead of mutating it.
pub struct Trader {
    feed: Arc<dyn MarketFeed>,
    signals: SignalEngine,
    settlement: Option<Arc<dyn Settlement>>,
    config: TradingConfig,
    ledger: SpendLedger,
    history: TradeHistory,
}

impl Trader {
    pub fn new(
        feed: Arc<dyn MarketFeed>,
        signals: SignalEngine,
        settlement: Option<Arc<dyn Settlement>>,
        config: TradingConfig,
    ) -> Self {
        let ledger = SpendLedger::new(config.max_total_spend);
        Self {
            feed,
            signals,
            settlement,
            config,
            ledger,
            history: TradeHistory::new(),
        }
    }

    /// Run one complete trading cycle.
    ///
    /// Network failures (retry exhaustion) propagate so the supervisor's
    /// error counter can observe them; every business rejection returns a
    /// `CycleOutcome` variant instead.
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome, ExchangeError> {
        let market = match self.signals.best_market().await? {
            Some(market) => market,
            None => return Ok(CycleOutcome::NoMarket),
        };
        tracing::info!(market_id = %market.id, question = %market.question, "Cycle market selected");

        // Execution reads live prices; the windowed sampler is an
        // analysis tool, not part of the trade decision.
        let signal = self.signals.instant(&market).await?;

        if signal.direction == Direction::Neutral {
            tracing::info!(market_id = %market.id, "Neutral signal, no trade");
            return Ok(CycleOutcome::NeutralSignal);
        }

        if signal.probability < self.config.probability_threshold {
            tracing::info!(
                probability = %signal.probability,
                threshold = %self.config.probability_threshold,
                "Signal probability under threshold, no trade"
            );
            return Ok(CycleOutcome::BelowThreshold {
                probability: signal.probability,
            });
        }

        let amount = match self.ledger.next_amount(self.config.default_amount) {
            Some(amount) => amount,
            None => {
                tracing::warn!(spent = %self.ledger.spent(), "Spend ceiling reached, no trade");
                return Ok(CycleOutcome::LimitReached);
            }
        };

        let outcomes = self.feed.prices(&market.id).await?;
        let target = match find_direction_outcome(&outcomes, signal.direction) {
            Some(outcome) => outcome.clone(),
            None => {
                tracing::warn!(
                    market_id = %market.id,
                    direction = %signal.direction,
                    "No outcome matches signal direction, no trade"
                );
                return Ok(CycleOutcome::OutcomeNotFound {
                    direction: signal.direction,
                });
            }
        };

        let mut trade = Trade {
            id: Uuid::new_v4(),
            market_id: market.id.clone(),
            direction: signal.direction,
            amount,
            price: target.price,
            probability: target.probability,
            timestamp: Utc::now(),
            status: TradeStatus::Pending,
            receipt_id: None,
        };

        match &self.settlement {
            Some(settlement) => {
                let order = OrderRequest {
                    market_id: market.id.clone(),
                    outcome_label: target.label.clone(),
                    amount,
                    price: target.price,
                };
                match settlement.submit(&order).await {
                    Ok(receipt) => {
                        trade.status = TradeStatus::Confirmed;
                        trade.receipt_id = Some(receipt.id);
                    }
                    Err(e) => {
                        // Fatal to this attempt only, not to the supervisor
                        tracing::error!(error = %e, "Settlement failed");
                        trade.status = TradeStatus::Failed;
                    }
                }
            }
            None => {
                tracing::info!(
                    direction = %trade.direction,
                    %amount,
                    price = %trade.price,
                    probability = %trade.probability,
                    "Simulated trade (no settlement channel)"
                );
                trade.status = TradeStatus::Confirmed;
            }
        }

        // Failed settlements still charge the ledger: the amount was put
        // at risk, and the ceiling bounds risk, not realized fills.
        self.ledger.charge(amount);
        self.history.push(trade.clone());

        tracing::info!(
            trade_id = %trade.id,
            direction = %trade.direction,
            %amount,
            status = ?trade.status,
            total_spent = %self.ledger.spent(),
            "Trade recorded"
        );
        Ok(CycleOutcome::Traded(trade))
    }

    /// Confirmed-only aggregates for the session so far
    pub fn summary(&self) -> TradeSummary {
        self.history.summary()
    }

    pub fn total_spent(&self) -> rust_decimal::Decimal {
        self.ledger.spent()
    }
}

/// The outcome whose label matches the signal direction
fn find_direction_outcome(outcomes: &[Outcome], direction: Direction) -> Option<&Outcome> {
    let (up, down) = split_up_down(outcomes);
    match direction {
        Direction::Up => up,
        Direction::Down => down,
        Direction::Neutral => None,
    }
}
