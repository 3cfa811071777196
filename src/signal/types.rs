//! Signal types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Hard cap per side on retained samples; the oldest point is dropped
/// first. A 5-minute window at 10-second polls stays far below this.
pub const MAX_SAMPLES_PER_SIDE: usize = 256;

/// Trade direction derived from a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    /// No directional conviction; never traded
    Neutral,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One sampled observation of a single side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: Decimal,
    pub probability: Decimal,
}

/// Bounded per-side sample buffers collected over an observation window
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SampleSet {
    up: VecDeque<PricePoint>,
    down: VecDeque<PricePoint>,
}

impl SampleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_up(&mut self, point: PricePoint) {
        push_bounded(&mut self.up, point);
    }

    pub fn push_down(&mut self, point: PricePoint) {
        push_bounded(&mut self.down, point);
    }

    pub fn up(&self) -> &VecDeque<PricePoint> {
        &self.up
    }

    pub fn down(&self) -> &VecDeque<PricePoint> {
        &self.down
    }

    /// Total points across both sides
    pub fn len(&self) -> usize {
        self.up.len() + self.down.len()
    }

    pub fn is_empty(&self) -> bool {
        self.up.is_empty() && self.down.is_empty()
    }

    pub fn up_prices(&self) -> Vec<Decimal> {
        self.up.iter().map(|p| p.price).collect()
    }

    pub fn down_prices(&self) -> Vec<Decimal> {
        self.down.iter().map(|p| p.price).collect()
    }
}

fn push_bounded(buffer: &mut VecDeque<PricePoint>, point: PricePoint) {
    if buffer.len() == MAX_SAMPLES_PER_SIDE {
        buffer.pop_front();
    }
    buffer.push_back(point);
}

/// A derived trading decision for one market
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub market_id: String,
    pub direction: Direction,
    /// Conviction in [0, 1]; always 0 when the direction is neutral
    pub confidence: Decimal,
    /// Probability of the winning side (0.5 when neutral)
    pub probability: Decimal,
    pub timestamp: DateTime<Utc>,
    /// Samples the decision was based on; empty for the instantaneous path
    pub samples: SampleSet,
}

impl Signal {
    /// A no-conviction signal
    pub fn neutral(market_id: impl Into<String>, samples: SampleSet) -> Self {
        Self {
            market_id: market_id.into(),
            direction: Direction::Neutral,
            confidence: Decimal::ZERO,
            probability: Decimal::new(5, 1),
            timestamp: Utc::now(),
            samples,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn point(price: Decimal) -> PricePoint {
        PricePoint {
            timestamp: Utc::now(),
            price,
            probability: price,
        }
    }

    #[test]
    fn test_neutral_signal_invariants() {
        let signal = Signal::neutral("m1", SampleSet::new());
        assert_eq!(signal.direction, Direction::Neutral);
        assert_eq!(signal.confidence, dec!(0));
        assert_eq!(signal.probability, dec!(0.5));
    }

    #[test]
    fn test_sample_set_counts_both_sides() {
        let mut samples = SampleSet::new();
        samples.push_up(point(dec!(0.6)));
        samples.push_down(point(dec!(0.4)));
        samples.push_up(point(dec!(0.61)));
        assert_eq!(samples.len(), 3);
        assert_eq!(samples.up_prices(), vec![dec!(0.6), dec!(0.61)]);
    }

    #[test]
    fn test_sample_buffer_is_bounded() {
        let mut samples = SampleSet::new();
        for i in 0..MAX_SAMPLES_PER_SIDE + 10 {
            samples.push_up(point(Decimal::new(i as i64, 4)));
        }
        assert_eq!(samples.up().len(), MAX_SAMPLES_PER_SIDE);
        // Oldest points were evicted
        assert_eq!(samples.up().front().unwrap().price, Decimal::new(10, 4));
    }

    #[test]
    fn test_direction_display() {
        assert_eq!(Direction::Up.to_string(), "up");
        assert_eq!(Direction::Neutral.to_string(), "neutral");
    }
}
