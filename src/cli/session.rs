//! Session command implementation

use crate::config::Config;
use crate::session::{JsonFileSessionStore, SessionStore};
use chrono::Utc;
use clap::{Args, Subcommand};

#[derive(Args, Debug)]
pub struct SessionArgs {
    #[command(subcommand)]
    pub action: SessionAction,
}

#[derive(Subcommand, Debug)]
pub enum SessionAction {
    /// Show the active selling session
    Show,
    /// Drop the active selling session; the next tick starts a new window
    Clear,
}

impl SessionArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let store = JsonFileSessionStore::new(config.session.path.clone());
        let asset = config.poller.asset.as_str();

        match self.action {
            SessionAction::Show => match store.load(asset).await? {
                Some(session) => {
                    let remaining = session.remaining(Utc::now());
                    println!("Selling session for {}", session.asset_id);
                    println!("  Deadline: {}", session.deadline);
                    println!("  Timeframe: {}h", session.timeframe().num_hours());
                    println!("  Remaining: {}h", remaining.num_hours());
                }
                None => println!("No active selling session for {}", asset),
            },
            SessionAction::Clear => {
                if store.clear(asset).await? {
                    println!("Cleared selling session for {}", asset);
                } else {
                    println!("No active selling session for {}", asset);
                }
            }
        }
        Ok(())
    }
}
