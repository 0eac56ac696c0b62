//! momentum-exit: sell a held balance after a momentum peak, before a deadline
//!
//! This library provides the core components for:
//! - Momentum segmentation of historical candles
//! - A stateless sell-or-hold decision engine
//! - Binance REST candle feed
//! - Paper account (persisted ledger) and market-sell execution
//! - Persisted selling sessions (deadline per asset)
//! - A balance poller driving the engine
//! - Logging and Prometheus metrics

pub mod cli;
pub mod config;
pub mod engine;
pub mod execution;
pub mod feed;
pub mod momentum;
pub mod persist;
pub mod poller;
pub mod session;
pub mod telemetry;
