//! Analyze command implementation

use clap::Args;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::exchange::{ExchangeClient, MarketFeed};
use crate::signal::SignalEngine;

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Override the sampling window in seconds
    #[arg(long)]
    pub window_secs: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl AnalyzeArgs {
    /// Watch the best market over the sampling window and report the
    /// trend-based signal without trading.
    pub async fn execute(&self, config: Config) -> anyhow::Result<()> {
        let client = Arc::new(ExchangeClient::new(
            config.exchange.clone(),
            &config.market,
            None,
        ));
        let feed: Arc<dyn MarketFeed> = client;
        let signals = SignalEngine::new(feed, config.market.asset, config.sampling.clone());

        let market = match signals.best_market().await? {
            Some(market) => market,
            None => {
                tracing::warn!(asset = %config.market.asset, "No matching market to analyze");
                return Ok(());
            }
        };

        let window = Duration::from_secs(self.window_secs.unwrap_or(config.sampling.window_secs));
        let interval = Duration::from_secs(config.sampling.interval_secs);
        let signal = signals.sample(&market, window, interval).await?;

        println!("Market:      {} ({})", market.question, market.id);
        println!("Direction:   {}", signal.direction);
        println!("Confidence:  {}", signal.confidence);
        println!("Probability: {}", signal.probability);
        println!("Samples:     {}", signal.samples.len());
        Ok(())
    }
}
