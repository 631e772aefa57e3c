use alpha_desk::cli::{Cli, Commands};
use alpha_desk::config::Config;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        toml::from_str(include_str!("../config.toml.example")).expect("Invalid default config")
    });

    // Initialize telemetry
    alpha_desk::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Scan(args) => {
            tracing::info!("Starting signal scan");
            args.execute(&config).await?;
        }
        Commands::Risk(args) => {
            tracing::info!("Starting portfolio risk analysis");
            args.execute(&config).await?;
        }
        Commands::Status => {
            println!("alpha-desk status");
            println!("  Mode: Paper Trading");
            println!("  Status: Not running");
        }
        Commands::Config => {
            println!("Current configuration:");
            println!(
                "  Data: {} ({} days)",
                config.data.base_url, config.data.lookback_days
            );
            println!("  Watchlist: {:?}", config.engine.watchlist);
            println!(
                "  Engine: min confidence {}, history {}",
                config.engine.min_signal_confidence, config.engine.signal_history_limit
            );
            println!(
                "  Strategies: MA enabled={} ({}/{}), RSI enabled={} ({}/{}/{})",
                config.strategies.moving_average.enabled,
                config.strategies.moving_average.fast_period,
                config.strategies.moving_average.slow_period,
                config.strategies.rsi.enabled,
                config.strategies.rsi.rsi_period,
                config.strategies.rsi.oversold_threshold,
                config.strategies.rsi.overbought_threshold
            );
            println!(
                "  Risk limits: weight {:.0}%, vol {:.0}%, VaR {:.0}%, margin {:.0}%",
                config.risk.max_position_weight * 100.0,
                config.risk.max_portfolio_volatility * 100.0,
                config.risk.max_daily_var * 100.0,
                config.risk.margin_utilization_max * 100.0
            );
        }
    }

    Ok(())
}
