//! Least-squares trend estimation
//!
//! Fits a first-degree line over a price sequence indexed 0..n and returns
//! its slope. The slope is the per-poll price drift, so a 0.01 slope over
//! 10-second polls is a steep move for a [0, 1]-bounded price.

use rust_decimal::Decimal;

/// Slope of the least-squares line through `prices`.
///
/// Fewer than two points have no trend and yield zero.
pub fn slope(prices: &[Decimal]) -> Decimal {
    let n = prices.len();
    if n < 2 {
        return Decimal::ZERO;
    }

    let count = Decimal::from(n as u64);
    let mut sum_x = Decimal::ZERO;
    let mut sum_y = Decimal::ZERO;
    let mut sum_xy = Decimal::ZERO;
    let mut sum_xx = Decimal::ZERO;

    for (i, price) in prices.iter().enumerate() {
        let x = Decimal::from(i as u64);
        sum_x += x;
        sum_y += price;
        sum_xy += x * price;
        sum_xx += x * x;
    }

    let denominator = count * sum_xx - sum_x * sum_x;
    if denominator.is_zero() {
        return Decimal::ZERO;
    }

    (count * sum_xy - sum_x * sum_y) / denominator
}
