//! CLI interface for momentum-exit
//!
//! Provides subcommands for:
//! - `run`: Poll the balance and sell before the deadline
//! - `check`: Run a single decision now
//! - `session`: Show or clear the stored selling session
//! - `config`: Show configuration

mod check;
mod run;
mod session;

pub use check::CheckArgs;
pub use run::RunArgs;
pub use session::{SessionAction, SessionArgs};

use crate::config::Config;
use crate::execution::PaperAccount;
use crate::feed::BinanceKlines;
use crate::poller::{Poller, PollerSettings};
use crate::session::JsonFileSessionStore;
use clap::{Parser, Subcommand};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "momentum-exit")]
#[command(about = "Sell a held balance after a momentum peak, before a deadline")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll the balance and sell before the deadline
    Run(RunArgs),
    /// Run a single decision now
    Check(CheckArgs),
    /// Show or clear the stored selling session
    Session(SessionArgs),
    /// Show configuration
    Config,
}

/// Wire a poller from configuration: Binance candles, paper ledger, JSON session file
pub async fn build_poller(config: &Config) -> anyhow::Result<Poller> {
    let feed = Arc::new(BinanceKlines::with_config(config.market.feed_config())?);
    let account = Arc::new(
        PaperAccount::open(
            config.paper.ledger_path.clone(),
            config.paper.fee_rate,
            feed.clone(),
            &config.poller.asset,
            config.paper.starting_balance,
        )
        .await?,
    );
    let sessions = Arc::new(JsonFileSessionStore::new(config.session.path.clone()));

    Ok(Poller::new(
        PollerSettings::from_config(config),
        account,
        feed,
        sessions,
    ))
}
