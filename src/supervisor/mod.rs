//! Supervisory loop with layered recovery
//!
//! Recovery has three rungs. Individual network calls retry inside the
//! exchange client. A failed health check heals: the client/trader graph
//! is rebuilt immediately, with no delay and no counter reset. Too many
//! consecutive cycle or health failures trigger a full restart: the same
//! rebuild after a pause, plus an error-counter reset.
//!
//! The spend ledger lives inside the trader, so healing and restarting
//! both open a fresh spending session.

mod state;

pub use state::SupervisorState;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::sleep;

use crate::config::{Config, Credentials};
use crate::exchange::{ExchangeClient, MarketFeed};
use crate::signal::SignalEngine;
use crate::trader::{OrderSettlement, Settlement, Trader};

/// One fully wired client/trader graph. Replaced wholesale on restart,
/// never mutated in place.
struct Engine {
    client: Arc<ExchangeClient>,
    trader: Trader,
}

/// Runs trading cycles forever, healing and restarting as needed
pub struct Supervisor {
    config: Config,
    credentials: Option<Credentials>,
    dry_run: bool,
    state: SupervisorState,
    running: Arc<AtomicBool>,
}

impl Supervisor {
    pub fn new(config: Config, credentials: Option<Credentials>, dry_run: bool) -> Self {
        let state = SupervisorState::new(config.supervisor.max_errors);
        Self {
            config,
            credentials,
            dry_run,
            state,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    fn build_engine(&self) -> Engine {
        let client = Arc::new(ExchangeClient::new(
            self.config.exchange.clone(),
            &self.config.market,
            self.credentials.as_ref(),
        ));
        let feed: Arc<dyn MarketFeed> = client.clone();
        let signals = SignalEngine::new(
            feed.clone(),
            self.config.market.asset,
            self.config.sampling.clone(),
        );

        let settlement: Option<Arc<dyn Settlement>> = if self.dry_run {
            tracing::info!("Dry-run mode: orders will be simulated");
            None
        } else if client.can_trade() {
            Some(Arc::new(OrderSettlement::new(client.clone())))
        } else {
            tracing::warn!("No credentials configured, orders will be simulated");
            None
        };

        let trader = Trader::new(feed, signals, settlement, self.config.trading.clone());
        Engine { client, trader }
    }

    /// Tear everything down, wait out the restart delay, and rebuild
    async fn restart(&mut self) -> Engine {
        tracing::warn!(
            errors = self.state.error_count(),
            delay_secs = self.config.supervisor.restart_delay_secs,
            "Error threshold reached, performing full restart"
        );
        self.interruptible_sleep(Duration::from_secs(self.config.supervisor.restart_delay_secs))
            .await;
        self.state.reset();
        self.build_engine()
    }

    /// Discard the active graph and rebuild it without a pause. The error
    /// counter is left alone so repeated healing still escalates.
    fn heal(&self) -> Engine {
        tracing::warn!("Healing: rebuilding client and trader");
        self.build_engine()
    }

    /// Rate-limited health check. Returns true while the exchange looks
    /// healthy or the check is not due yet.
    async fn health_check(&mut self, engine: &Engine) -> bool {
        let interval = Duration::from_secs(self.config.supervisor.health_check_interval_secs);
        if !self.state.health_check_due(interval, Instant::now()) {
            return true;
        }
        engine.client.health_check().await
    }

    /// Run trading cycles until a shutdown signal arrives
    pub async fn run_continuous(&mut self) -> anyhow::Result<()> {
        self.spawn_signal_listener();

        let mut engine = self.build_engine();
        tracing::info!(
            asset = %self.config.market.asset,
            cycle_interval_secs = self.config.supervisor.cycle_interval_secs,
            "Supervisor started"
        );

        while self.running.load(Ordering::SeqCst) {
            if !self.health_check(&engine).await {
                engine = if self.state.record_error() {
                    self.restart().await
                } else {
                    self.heal()
                };
                continue;
            }

            match engine.trader.run_cycle().await {
                Ok(outcome) => {
                    tracing::info!(outcome = outcome.describe(), "Cycle complete");
                    self.interruptible_sleep(Duration::from_secs(
                        self.config.supervisor.cycle_interval_secs,
                    ))
                    .await;
                }
                Err(e) => {
                    tracing::error!(error = %e, errors = self.state.error_count() + 1, "Cycle failed");
                    if self.state.record_error() {
                        engine = self.restart().await;
                    } else {
                        self.interruptible_sleep(Duration::from_secs(
                            self.config.supervisor.error_wait_secs,
                        ))
                        .await;
                    }
                }
            }
        }

        let summary = engine.trader.summary();
        tracing::info!(
            total_trades = summary.total_trades,
            total_amount = %summary.total_amount,
            "Supervisor stopped"
        );
        Ok(())
    }

    /// Run exactly one trading cycle and report the outcome
    pub async fn run_single(&mut self) -> anyhow::Result<()> {
        let mut engine = self.build_engine();

        let outcome = engine.trader.run_cycle().await?;
        let summary = engine.trader.summary();
        tracing::info!(
            outcome = outcome.describe(),
            total_trades = summary.total_trades,
            total_amount = %summary.total_amount,
            "Single cycle complete"
        );
        Ok(())
    }

    fn spawn_signal_listener(&self) {
        let running = self.running.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown signal received");
                running.store(false, Ordering::SeqCst);
            }
        });
    }

    /// Sleep in one-second slices so a shutdown signal cuts the wait short
    async fn interruptible_sleep(&self, duration: Duration) {
        let deadline = Instant::now() + duration;
        while self.running.load(Ordering::SeqCst) && Instant::now() < deadline {
            let remaining = deadline.saturating_duration_since(Instant::now());
            sleep(remaining.min(Duration::from_secs(1))).await;
        }
    }
}
