//! Self-healing HTTP client for the venue's order-book API
//!
//! Session creation is lazy and idempotent: every call first ensures a live
//! session, creating one if absent or previously discarded. Rate limiting
//! (429) backs off exponentially without touching the session; connection
//! failures discard the session, back off linearly, and recreate it.

use reqwest::{Method, StatusCode};
use serde_json::{json, Map, Value};
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tokio::time::sleep;

use crate::config::{Credentials, ExchangeConfig, MarketConfig};

use super::cache::MarketCache;
use super::parse;
use super::retry::RetryPolicy;
use super::signing::OrderSigner;
use super::types::{ExchangeError, Market, Outcome, Receipt};
use super::MarketFeed;

const USER_AGENT: &str = concat!("poly-updown/", env!("CARGO_PKG_VERSION"));

/// HTTP client with retry, rate-limit handling, and a short-TTL market cache
pub struct ExchangeClient {
    config: ExchangeConfig,
    duration_marker: String,
    signer: Option<OrderSigner>,
    wallet_address: Option<String>,
    retry: RetryPolicy,
    session: Mutex<Option<reqwest::Client>>,
    cache: RwLock<MarketCache>,
}

impl ExchangeClient {
    /// Create a new client. With no credentials the client can read market
    /// data and run health checks but refuses to place orders.
    pub fn new(
        config: ExchangeConfig,
        market: &MarketConfig,
        credentials: Option<&Credentials>,
    ) -> Self {
        let retry = RetryPolicy::new(
            config.max_retries,
            Duration::from_secs(config.retry_base_delay_secs),
        );
        let cache = MarketCache::new(Duration::from_secs(config.cache_ttl_secs));

        Self {
            duration_marker: market.duration.clone(),
            signer: credentials.map(|c| OrderSigner::new(c.signing_key.clone())),
            wallet_address: credentials.map(|c| c.wallet_address.clone()),
            retry,
            session: Mutex::new(None),
            cache: RwLock::new(cache),
            config,
        }
    }

    /// List active up/down markets matching the target pattern.
    ///
    /// Served from the cache while it is younger than the TTL; otherwise one
    /// fetch refreshes the whole cache atomically.
    pub async fn list_markets(&self) -> Result<Vec<Market>, ExchangeError> {
        {
            let cache = self.cache.read().await;
            if cache.is_fresh(Instant::now()) {
                tracing::debug!(markets = cache.len(), "Serving markets from cache");
                return Ok(cache.all());
            }
        }

        let payload = self.get_with_version_fallback("/markets").await?;
        let markets = self.filter_markets(&payload)?;

        let mut cache = self.cache.write().await;
        cache.replace(markets.clone(), Instant::now());

        tracing::info!(markets = markets.len(), "Refreshed up/down market cache");
        Ok(markets)
    }

    /// Fetch a single market by id, consulting the cache first.
    ///
    /// Absence is a legitimate outcome, never an error: lookup or fetch
    /// failures are logged and collapse to `None`.
    pub async fn get_market(&self, id: &str) -> Option<Market> {
        if let Some(market) = self.cache.read().await.get(id).cloned() {
            return Some(market);
        }

        let payload = match self.request(Method::GET, &format!("/markets/{id}"), true, None).await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(market_id = %id, error = %e, "Market fetch failed");
                return None;
            }
        };

        match parse::parse_market(&payload) {
            Ok(market) => {
                self.cache.write().await.insert(market.clone());
                Some(market)
            }
            Err(e) => {
                tracing::warn!(market_id = %id, error = %e, "Malformed market payload");
                None
            }
        }
    }

    /// Fetch the current outcome list for a market. Prices are always live
    /// and never cached.
    pub async fn get_prices(&self, market_id: &str) -> Result<Vec<Outcome>, ExchangeError> {
        let payload = self
            .request(Method::GET, &format!("/markets/{market_id}"), true, None)
            .await?;
        Ok(parse::parse_outcomes(&payload)?)
    }

    /// Fetch historical samples for a market. Best-effort: any failure
    /// yields an empty vector.
    pub async fn get_history(&self, market_id: &str, limit: usize) -> Vec<Value> {
        let path = format!("/markets/{market_id}/history?limit={limit}");
        match self.request(Method::GET, &path, true, None).await {
            Ok(payload) => parse::history_array(&payload),
            Err(e) => {
                tracing::debug!(market_id = %market_id, error = %e, "History fetch failed");
                Vec::new()
            }
        }
    }

    /// Place a signed order. Requires a signing credential.
    pub async fn place_order(
        &self,
        market_id: &str,
        outcome: &str,
        amount: rust_decimal::Decimal,
        price: rust_decimal::Decimal,
    ) -> Result<Receipt, ExchangeError> {
        let (signer, wallet) = match (&self.signer, &self.wallet_address) {
            (Some(signer), Some(wallet)) => (signer, wallet),
            _ => return Err(ExchangeError::Unauthorized),
        };

        let mut body: Map<String, Value> = Map::new();
        body.insert("market_id".into(), json!(market_id));
        body.insert("outcome".into(), json!(outcome));
        body.insert("amount".into(), json!(amount));
        body.insert("price".into(), json!(price));
        body.insert("wallet_address".into(), json!(wallet));

        let signature = signer.sign(&body)?;
        body.insert("signature".into(), json!(signature));

        let payload = self
            .request(Method::POST, "/orders", true, Some(Value::Object(body)))
            .await
            .map_err(|e| match e {
                ExchangeError::Status(code) => {
                    ExchangeError::OrderRejected(format!("HTTP {code}"))
                }
                other => other,
            })?;

        let receipt = parse::parse_receipt(&payload)?;
        tracing::info!(
            market_id = %market_id,
            outcome = %outcome,
            %amount,
            %price,
            receipt = %receipt.id,
            "Order placed"
        );
        Ok(receipt)
    }

    /// Lightweight liveness probe. Never propagates: any failure is `false`.
    pub async fn health_check(&self) -> bool {
        match self.get_with_version_fallback("/health").await {
            Ok(payload) => {
                let healthy = parse::parse_health(&payload);
                if healthy {
                    tracing::debug!("Health check passed");
                } else {
                    tracing::warn!("Health check returned unhealthy payload");
                }
                healthy
            }
            Err(e) => {
                tracing::warn!(error = %e, "Health check failed");
                false
            }
        }
    }

    /// Whether a signing credential is configured
    pub fn can_trade(&self) -> bool {
        self.signer.is_some()
    }

    /// Parse a list-markets payload and keep only active up/down markets
    /// matching the target pattern. Malformed entries are skipped, never
    /// fatal to the batch.
    fn filter_markets(&self, payload: &Value) -> Result<Vec<Market>, ExchangeError> {
        let raw = parse::market_array(payload)?;

        let mut markets = Vec::new();
        for entry in raw {
            let market = match parse::parse_market(entry) {
                Ok(market) => market,
                Err(e) => {
                    tracing::debug!(error = %e, "Skipping malformed market entry");
                    continue;
                }
            };
            if market.active && self.matches_pattern(&market.question) {
                markets.push(market);
            }
        }
        Ok(markets)
    }

    /// Up/down markets are recognized by their question text: the duration
    /// marker, a known asset symbol, and both directional terms.
    fn matches_pattern(&self, question: &str) -> bool {
        let lower = question.to_lowercase();
        lower.contains(&self.duration_marker)
            && lower.contains("min")
            && lower.contains("up")
            && lower.contains("down")
            && super::types::Asset::detect(question).is_some()
    }

    /// GET an endpoint trying the unversioned path first, then the
    /// versioned one. Some deployments expose only one of the two.
    async fn get_with_version_fallback(&self, path: &str) -> Result<Value, ExchangeError> {
        match self.request(Method::GET, path, false, None).await {
            Ok(payload) => Ok(payload),
            Err(first) => {
                tracing::debug!(path = %path, error = %first, "Unversioned path failed, trying versioned");
                self.request(Method::GET, path, true, None).await
            }
        }
    }

    fn endpoint(&self, path: &str, versioned: bool) -> String {
        if versioned {
            format!("{}/{}{}", self.config.base_url, self.config.api_version, path)
        } else {
            format!("{}{}", self.config.base_url, path)
        }
    }

    /// Return the live session, creating one if absent or discarded
    async fn ensure_session(&self) -> Result<reqwest::Client, ExchangeError> {
        let mut session = self.session.lock().await;
        if let Some(client) = session.as_ref() {
            return Ok(client.clone());
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ExchangeError::Session(e.to_string()))?;

        tracing::info!("Created new exchange API session");
        *session = Some(client.clone());
        Ok(client)
    }

    /// Discard the session so the next call recreates it
    async fn drop_session(&self) {
        let mut session = self.session.lock().await;
        *session = None;
    }

    /// Core request loop: retry with backoff, heal the session on
    /// connection-level failure, and surface exhaustion as one error.
    async fn request(
        &self,
        method: Method,
        path: &str,
        versioned: bool,
        body: Option<Value>,
    ) -> Result<Value, ExchangeError> {
        let url = self.endpoint(path, versioned);
        let mut last = String::from("no attempts made");

        for attempt in 0..self.retry.max_attempts {
            let client = self.ensure_session().await?;

            let mut builder = client.request(method.clone(), &url);
            if let Some(ref body) = body {
                builder = builder.json(body);
            }

            let response = match builder.send().await {
                Ok(response) => response,
                Err(e) => {
                    // Connection-level failure: heal the session
                    last = e.to_string();
                    tracing::warn!(
                        url = %url,
                        attempt = attempt + 1,
                        error = %last,
                        "Request failed, recreating session"
                    );
                    self.drop_session().await;
                    sleep(self.retry.reconnect_delay(attempt)).await;
                    continue;
                }
            };

            let status = response.status();
            if status.is_success() {
                return response
                    .json::<Value>()
                    .await
                    .map_err(|e| ExchangeError::Session(format!("body decode failed: {e}")));
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                last = format!("HTTP 429 from {url}");
                let delay = self.retry.rate_limit_delay(attempt);
                tracing::warn!(url = %url, attempt = attempt + 1, ?delay, "Rate limited");
                sleep(delay).await;
                continue;
            }

            if status.is_server_error() {
                last = format!("HTTP {} from {url}", status.as_u16());
                tracing::warn!(url = %url, attempt = attempt + 1, status = status.as_u16(), "Server error");
                sleep(self.retry.reconnect_delay(attempt)).await;
                continue;
            }

            // Remaining client errors are not retryable
            return Err(ExchangeError::Status(status.as_u16()));
        }

        tracing::error!(url = %url, attempts = self.retry.max_attempts, "Retries exhausted");
        Err(ExchangeError::RetryExhausted {
            attempts: self.retry.max_attempts,
            last,
        })
    }
}

#[async_trait::async_trait]
impl MarketFeed for ExchangeClient {
    async fn markets(&self) -> Result<Vec<Market>, ExchangeError> {
        self.list_markets().await
    }

    async fn prices(&self, market_id: &str) -> Result<Vec<Outcome>, ExchangeError> {
        self.get_prices(market_id).await
    }
}
