//! Cumulative spend ledger
//!
//! Session-scoped and never decremented: once an amount is charged it
//! stays charged, so the ceiling can never be over-spent even when a
//! settlement attempt fails mid-flight.

use rust_decimal::Decimal;

/// Tracks cumulative spend against a fixed ceiling
#[derive(Debug, Clone)]
pub struct SpendLedger {
    ceiling: Decimal,
    spent: Decimal,
}

impl SpendLedger {
    pub fn new(ceiling: Decimal) -> Self {
        Self {
            ceiling,
            spent: Decimal::ZERO,
        }
    }

    pub fn spent(&self) -> Decimal {
        self.spent
    }

    pub fn remaining(&self) -> Decimal {
        self.ceiling - self.spent
    }

    /// Amount the next trade may use: `min(preferred, remaining)`, or
    /// `None` when the ceiling leaves no positive room.
    pub fn next_amount(&self, preferred: Decimal) -> Option<Decimal> {
        if self.spent >= self.ceiling {
            return None;
        }
        let amount = preferred.min(self.remaining());
        (amount > Decimal::ZERO).then_some(amount)
    }

    /// Charge an executed amount. Callers must have sized the amount via
    /// `next_amount`; charging is unconditional and final.
    pub fn charge(&mut self, amount: Decimal) {
        self.spent += amount;
    }
}
