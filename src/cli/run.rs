//! Run command implementation

use super::build_poller;
use crate::config::Config;
use clap::Args;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Override the seconds between balance checks
    #[arg(short, long)]
    pub interval: Option<u64>,
}

impl RunArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let mut config = config.clone();
        if let Some(interval) = self.interval {
            config.poller.interval_secs = interval;
            config.validate()?;
        }

        let poller = build_poller(&config).await?;
        poller
            .run(async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!(error = %e, "Failed to listen for ctrl-c");
                    std::future::pending::<()>().await;
                }
            })
            .await
    }
}
