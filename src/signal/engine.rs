//! Signal engine: sampling, trend fitting, and direction rules

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::sleep;

use crate::config::SamplingConfig;
use crate::exchange::{split_up_down, Asset, ExchangeError, Market, MarketFeed};

use super::trend;
use super::types::{Direction, PricePoint, SampleSet, Signal};

/// Trends with absolute slope below this carry no conviction
const MIN_TREND: Decimal = dec!(0.001);

/// Minimum total sample count before a windowed analysis is meaningful
const MIN_SAMPLES: usize = 6;

/// Derives directional signals for one target asset
pub struct SignalEngine {
    feed: Arc<dyn MarketFeed>,
    asset: Asset,
    config: SamplingConfig,
}

impl SignalEngine {
    pub fn new(feed: Arc<dyn MarketFeed>, asset: Asset, config: SamplingConfig) -> Self {
        Self {
            feed,
            asset,
            config,
        }
    }

    /// Pick the most tradable market for the target asset.
    ///
    /// Markets are scored as `liquidity + 0.1 * volume`; the maximum wins
    /// and ties keep the first-encountered market. An empty candidate set
    /// is a legitimate `None`, not an error.
    pub async fn best_market(&self) -> Result<Option<Market>, ExchangeError> {
        let markets = self.feed.markets().await?;

        let mut best: Option<(Decimal, Market)> = None;
        for market in markets {
            if market.asset != Some(self.asset) {
                continue;
            }
            let score = market.liquidity + market.volume * dec!(0.1);
            match &best {
                Some((best_score, _)) if score <= *best_score => {}
                _ => best = Some((score, market)),
            }
        }

        if let Some((score, market)) = &best {
            tracing::info!(
                market_id = %market.id,
                question = %market.question,
                %score,
                "Selected best market"
            );
        } else {
            tracing::warn!(asset = %self.asset, "No matching markets for target asset");
        }

        Ok(best.map(|(_, market)| market))
    }

    /// Observe a market over a window, polling every `interval`, then fit
    /// trends over the collected samples.
    ///
    /// A zero window is the instantaneous fast path. Within a window, a
    /// failed poll is logged and sampling resumes after a short pause; the
    /// window itself never aborts.
    pub async fn sample(
        &self,
        market: &Market,
        window: Duration,
        interval: Duration,
    ) -> Result<Signal, ExchangeError> {
        if window.is_zero() {
            return self.instant(market).await;
        }

        tracing::info!(market_id = %market.id, ?window, ?interval, "Sampling market");

        let mut samples = SampleSet::new();
        let started = Instant::now();

        while started.elapsed() < window {
            match self.feed.prices(&market.id).await {
                Ok(outcomes) => {
                    if let (Some(up), Some(down)) = split_up_down(&outcomes) {
                        let now = Utc::now();
                        samples.push_up(PricePoint {
                            timestamp: now,
                            price: up.price,
                            probability: up.probability,
                        });
                        samples.push_down(PricePoint {
                            timestamp: now,
                            price: down.price,
                            probability: down.probability,
                        });
                        tracing::debug!(
                            up_price = %up.price,
                            down_price = %down.price,
                            samples = samples.len(),
                            "Recorded price point"
                        );
                    }
                    sleep(interval).await;
                }
                Err(e) => {
                    tracing::warn!(market_id = %market.id, error = %e, "Poll failed, continuing window");
                    sleep(Duration::from_secs(self.config.error_pause_secs)).await;
                }
            }
        }

        let signal = self.analyze(&market.id, samples);
        tracing::info!(
            market_id = %market.id,
            direction = %signal.direction,
            confidence = %signal.confidence,
            probability = %signal.probability,
            "Window analysis complete"
        );
        Ok(signal)
    }

    /// Instantaneous signal: compare the two sides' current probabilities.
    ///
    /// The higher-probability side wins with confidence equal to the
    /// probability gap; equal probabilities are neutral.
    pub async fn instant(&self, market: &Market) -> Result<Signal, ExchangeError> {
        let outcomes = self.feed.prices(&market.id).await?;

        let (up, down) = split_up_down(&outcomes);
        let (up, down) = match (up, down) {
            (Some(up), Some(down)) => (up, down),
            _ => {
                tracing::warn!(market_id = %market.id, "Could not find up/down outcomes");
                return Ok(Signal::neutral(&market.id, SampleSet::new()));
            }
        };

        if up.probability == down.probability {
            return Ok(Signal::neutral(&market.id, SampleSet::new()));
        }

        let (direction, winner) = if up.probability > down.probability {
            (Direction::Up, up)
        } else {
            (Direction::Down, down)
        };

        Ok(Signal {
            market_id: market.id.clone(),
            direction,
            confidence: (up.probability - down.probability).abs(),
            probability: winner.probability,
            timestamp: Utc::now(),
            samples: SampleSet::new(),
        })
    }

    /// Fit per-side trends and apply the direction rule
    fn analyze(&self, market_id: &str, samples: SampleSet) -> Signal {
        if samples.len() < MIN_SAMPLES {
            tracing::debug!(
                market_id = %market_id,
                samples = samples.len(),
                "Too few samples for a trend"
            );
            return Signal::neutral(market_id, samples);
        }

        let up_trend = trend::slope(&samples.up_prices());
        let down_trend = trend::slope(&samples.down_prices());

        let (direction, confidence) =
            if up_trend.abs() < MIN_TREND && down_trend.abs() < MIN_TREND {
                (Direction::Neutral, Decimal::ZERO)
            } else if up_trend > down_trend && up_trend > Decimal::ZERO {
                (Direction::Up, scale_confidence(up_trend))
            } else if down_trend > up_trend && down_trend > Decimal::ZERO {
                (Direction::Down, scale_confidence(down_trend))
            } else {
                (Direction::Neutral, Decimal::ZERO)
            };

        let probability = match direction {
            Direction::Up => samples.up().back().map(|p| p.probability),
            Direction::Down => samples.down().back().map(|p| p.probability),
            Direction::Neutral => None,
        }
        .unwrap_or(dec!(0.5));

        Signal {
            market_id: market_id.to_string(),
            direction,
            confidence,
            probability,
            timestamp: Utc::now(),
            samples,
        }
    }
}

/// Map a slope to a confidence score in [0, 1]
fn scale_confidence(slope: Decimal) -> Decimal {
    (slope.abs() * dec!(100)).min(dec!(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::Outcome;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// In-memory feed serving canned markets and prices
    struct FakeFeed {
        markets: Vec<Market>,
        prices: Mutex<Vec<Outcome>>,
    }

    #[async_trait]
    impl MarketFeed for FakeFeed {
        async fn markets(&self) -> Result<Vec<Market>, ExchangeError> {
            Ok(self.markets.clone())
        }

        async fn prices(&self, _market_id: &str) -> Result<Vec<Outcome>, ExchangeError> {
            Ok(self.prices.lock().unwrap().clone())
        }
    }

    fn market(id: &str, asset: Asset, liquidity: Decimal, volume: Decimal) -> Market {
        Market {
            id: id.to_string(),
            question: format!("{} Up or Down - 15 minute", asset.symbol()),
            description: String::new(),
            end_date: String::new(),
            active: true,
            volume,
            liquidity,
            asset: Some(asset),
            slug: String::new(),
        }
    }

    fn outcome(label: &str, probability: Decimal) -> Outcome {
        Outcome {
            id: format!("tok-{label}"),
            label: label.to_string(),
            price: probability,
            probability,
            supply: dec!(1000),
        }
    }

    fn engine(feed: FakeFeed) -> SignalEngine {
        SignalEngine::new(Arc::new(feed), Asset::Btc, SamplingConfig::default())
    }

    fn point(price: Decimal) -> PricePoint {
        PricePoint {
            timestamp: Utc::now(),
            price,
            probability: price,
        }
    }

    #[tokio::test]
    async fn test_best_market_scores_liquidity_and_volume() {
        let feed = FakeFeed {
            markets: vec![
                market("low", Asset::Btc, dec!(100), dec!(0)),
                market("high", Asset::Btc, dec!(100), dec!(500)), // 100 + 50
                market("eth", Asset::Eth, dec!(9999), dec!(9999)),
            ],
            prices: Mutex::new(vec![]),
        };

        let best = engine(feed).best_market().await.unwrap().unwrap();
        assert_eq!(best.id, "high");
    }

    #[tokio::test]
    async fn test_best_market_tie_keeps_first() {
        let feed = FakeFeed {
            markets: vec![
                market("first", Asset::Btc, dec!(100), dec!(0)),
                market("second", Asset::Btc, dec!(100), dec!(0)),
            ],
            prices: Mutex::new(vec![]),
        };

        let best = engine(feed).best_market().await.unwrap().unwrap();
        assert_eq!(best.id, "first");
    }

    #[tokio::test]
    async fn test_best_market_empty_set() {
        let feed = FakeFeed {
            markets: vec![market("eth", Asset::Eth, dec!(100), dec!(0))],
            prices: Mutex::new(vec![]),
        };
        assert!(engine(feed).best_market().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_instant_up_signal() {
        let feed = FakeFeed {
            markets: vec![],
            prices: Mutex::new(vec![outcome("Up", dec!(0.75)), outcome("Down", dec!(0.25))]),
        };
        let m = market("m1", Asset::Btc, dec!(0), dec!(0));

        let signal = engine(feed).instant(&m).await.unwrap();
        assert_eq!(signal.direction, Direction::Up);
        assert_eq!(signal.confidence, dec!(0.5));
        assert_eq!(signal.probability, dec!(0.75));
    }

    #[tokio::test]
    async fn test_instant_equal_probabilities_neutral() {
        let feed = FakeFeed {
            markets: vec![],
            prices: Mutex::new(vec![outcome("Up", dec!(0.5)), outcome("Down", dec!(0.5))]),
        };
        let m = market("m1", Asset::Btc, dec!(0), dec!(0));

        let signal = engine(feed).instant(&m).await.unwrap();
        assert_eq!(signal.direction, Direction::Neutral);
        assert_eq!(signal.confidence, dec!(0));
    }

    #[tokio::test]
    async fn test_instant_missing_side_neutral() {
        let feed = FakeFeed {
            markets: vec![],
            prices: Mutex::new(vec![outcome("Yes", dec!(0.6))]),
        };
        let m = market("m1", Asset::Btc, dec!(0), dec!(0));

        let signal = engine(feed).instant(&m).await.unwrap();
        assert_eq!(signal.direction, Direction::Neutral);
    }

    #[test]
    fn test_analyze_rising_up_side_wins() {
        let feed = FakeFeed {
            markets: vec![],
            prices: Mutex::new(vec![]),
        };
        let engine = engine(feed);

        let mut samples = SampleSet::new();
        for price in [dec!(0.5), dec!(0.55), dec!(0.6), dec!(0.65), dec!(0.7)] {
            samples.push_up(point(price));
            samples.push_down(point(dec!(1) - price));
        }

        let signal = engine.analyze("m1", samples);
        assert_eq!(signal.direction, Direction::Up);
        // Slope 0.05 scales to confidence 1.0 (capped)
        assert_eq!(signal.confidence, dec!(1));
        // Most recent up-side probability
        assert_eq!(signal.probability, dec!(0.7));
    }

    #[test]
    fn test_analyze_flat_sides_neutral() {
        let feed = FakeFeed {
            markets: vec![],
            prices: Mutex::new(vec![]),
        };
        let engine = engine(feed);

        let mut samples = SampleSet::new();
        for _ in 0..5 {
            samples.push_up(point(dec!(0.5)));
            samples.push_down(point(dec!(0.5)));
        }

        let signal = engine.analyze("m1", samples);
        assert_eq!(signal.direction, Direction::Neutral);
        assert_eq!(signal.confidence, dec!(0));
        assert_eq!(signal.probability, dec!(0.5));
    }

    #[test]
    fn test_analyze_both_falling_neutral() {
        let feed = FakeFeed {
            markets: vec![],
            prices: Mutex::new(vec![]),
        };
        let engine = engine(feed);

        let mut samples = SampleSet::new();
        for price in [dec!(0.7), dec!(0.65), dec!(0.6), dec!(0.55)] {
            samples.push_up(point(price));
            samples.push_down(point(price));
        }

        // Neither slope is positive, so no side can win
        let signal = engine.analyze("m1", samples);
        assert_eq!(signal.direction, Direction::Neutral);
    }

    #[test]
    fn test_analyze_too_few_samples_neutral() {
        let feed = FakeFeed {
            markets: vec![],
            prices: Mutex::new(vec![]),
        };
        let engine = engine(feed);

        let mut samples = SampleSet::new();
        samples.push_up(point(dec!(0.9)));
        samples.push_down(point(dec!(0.1)));

        let signal = engine.analyze("m1", samples);
        assert_eq!(signal.direction, Direction::Neutral);
        assert_eq!(signal.probability, dec!(0.5));
    }
}
