//! poly-updown: Self-healing trading bot for Polymarket up/down markets
//!
//! This library provides the core components for:
//! - A retrying, self-healing exchange API client with a short-TTL market cache
//! - Market discovery and scoring for one target asset
//! - Price sampling and trend-based signal derivation
//! - Risk-limited trade execution under a cumulative spend ceiling
//! - A supervisory loop with health checks, healing, and full restarts

pub mod cli;
pub mod config;
pub mod exchange;
pub mod signal;
pub mod supervisor;
pub mod telemetry;
pub mod trader;
