use clap::Parser;
use poly_updown::cli::{Cli, Commands};
use poly_updown::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        Config::default()
    });

    let verbose = match &cli.command {
        Commands::Run(args) => args.verbose,
        Commands::Once(args) => args.verbose,
        Commands::Analyze(args) => args.verbose,
        Commands::Config => false,
    };
    if verbose {
        config.telemetry.log_level = "debug".to_string();
    }

    // Initialize telemetry
    poly_updown::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Run(args) => {
            tracing::info!("Starting continuous trading mode");
            args.execute(config).await?;
        }
        Commands::Once(args) => {
            tracing::info!("Starting single-cycle mode");
            args.execute(config).await?;
        }
        Commands::Analyze(args) => {
            tracing::info!("Starting analysis mode");
            args.execute(config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!("  Exchange: {}", config.exchange.base_url);
            println!(
                "  Market: {} {}-minute up/down",
                config.market.asset, config.market.duration
            );
            println!(
                "  Trading: ceiling={}, amount={}, threshold={}",
                config.trading.max_total_spend,
                config.trading.default_amount,
                config.trading.probability_threshold
            );
            println!(
                "  Supervisor: cycle={}s, max_errors={}",
                config.supervisor.cycle_interval_secs, config.supervisor.max_errors
            );
        }
    }

    Ok(())
}
