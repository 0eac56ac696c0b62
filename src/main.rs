use anyhow::Context;
use clap::Parser;
use momentum_exit::cli::{Cli, Commands};
use momentum_exit::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
            eprintln!("Using default configuration");
            toml::from_str(include_str!("../config.toml.example"))
                .context("Invalid default config")?
        }
    };

    // Initialize telemetry
    momentum_exit::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Run(args) => {
            tracing::info!("Starting balance poller");
            args.execute(&config).await?;
        }
        Commands::Check(args) => {
            args.execute(&config).await?;
        }
        Commands::Session(args) => {
            args.execute(&config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!(
                "  Market: {} {} (lookback {}h)",
                config.market.symbol, config.market.interval, config.market.lookback_hours
            );
            println!(
                "  Decision: risk tolerance {}, selling window {}h",
                config.decision.risk_tolerance, config.decision.selling_timeframe_hours
            );
            println!(
                "  Poller: {} every {}s, force sell on expiry: {}",
                config.poller.asset, config.poller.interval_secs, config.poller.force_sell_on_expiry
            );
            println!("  Session file: {}", config.session.path.display());
            println!(
                "  Paper: {} (starting balance {}, fee rate {})",
                config.paper.ledger_path.display(),
                config.paper.starting_balance,
                config.paper.fee_rate
            );
        }
    }

    Ok(())
}
