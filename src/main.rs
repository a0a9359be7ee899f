use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;

mod clock;
mod config;
mod error;
mod fetch;
mod ledger;
mod normalize;
mod runner;
#[cfg(test)]
mod test_server;
mod types;

use config::{Config, Strategy, DEFAULT_OUTFILE};

#[derive(Parser)]
#[command(name = "sugar-futures")]
#[command(about = "Append today's nearby sugar futures quotes to a CSV ledger, once per day")]
struct Cli {
    /// How to retrieve quotes
    #[arg(long, value_enum, default_value_t = Strategy::Api)]
    strategy: Strategy,
    /// Ledger CSV file
    #[arg(short, long, default_value = DEFAULT_OUTFILE)]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let config = Config {
        strategy: cli.strategy,
        output: cli.output,
        ..Config::default()
    };

    let fetcher = fetch::strategy_for(&config)?;
    runner::run(&config, Utc::now(), fetcher.as_ref())
        .with_context(|| format!("{} run failed", fetcher.name()))?;
    Ok(())
}
