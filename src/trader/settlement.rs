//! Settlement seam
//!
//! Submitting a signed order to the venue is abstracted behind a trait so
//! the trader can run against a fake in tests and so the dry-run path is a
//! configuration rather than a code branch deep in the client.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::exchange::{ExchangeClient, ExchangeError, Receipt};

/// Everything the settlement channel needs to place one order
#[derive(Debug, Clone)]
pub struct OrderRequest {
    pub market_id: String,
    /// Outcome label as listed by the venue, e.g. "Up"
    pub outcome_label: String,
    pub amount: Decimal,
    pub price: Decimal,
}

/// Submits a signed order and returns the venue's receipt
#[async_trait]
pub trait Settlement: Send + Sync {
    async fn submit(&self, order: &OrderRequest) -> Result<Receipt, ExchangeError>;
}

/// Live settlement through the exchange client's signed order endpoint
pub struct OrderSettlement {
    client: Arc<ExchangeClient>,
}

impl OrderSettlement {
    pub fn new(client: Arc<ExchangeClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Settlement for OrderSettlement {
    async fn submit(&self, order: &OrderRequest) -> Result<Receipt, ExchangeError> {
        self.client
            .place_order(
                &order.market_id,
                &order.outcome_label,
                order.amount,
                order.price,
            )
            .await
    }
}
