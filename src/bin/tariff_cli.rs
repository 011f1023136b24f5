//! tariff_cli - draw tariffs from the terminal
//!
//! Usage: tariff_cli [--config PATH] <command>

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tariff_calculator::countries::{self, flag_emoji};
use tariff_calculator::{Selection, TariffConfig, TariffGenerator};

#[derive(Parser)]
#[command(name = "tariff_cli")]
#[command(about = "Country-of-origin tariff generator")]
struct Cli {
    /// YAML file overriding range, thresholds and assets
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List selectable countries
    Countries {
        /// Only names containing this text
        #[arg(long)]
        filter: Option<String>,
    },

    /// Print the flag emoji for a two-letter code
    Flag { code: String },

    /// Print the tier a tariff value falls into
    Classify { value: u32 },

    /// Generate tariffs for a country (name or code)
    Generate {
        country: String,
        /// Seed for a reproducible draw
        #[arg(long)]
        seed: Option<u64>,
        /// Number of draws
        #[arg(long, default_value_t = 1)]
        count: usize,
        /// Emit JSON lines instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => TariffConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => TariffConfig::default(),
    };

    match cli.command {
        Command::Countries { filter } => {
            for country in countries::search(filter.as_deref().unwrap_or("")) {
                println!("{} {} {}", country.flag(), country.code, country.name);
            }
        }
        Command::Flag { code } => println!("{}", flag_emoji(&code)?),
        Command::Classify { value } => println!("{}", config.classify(value)),
        Command::Generate {
            country,
            seed,
            count,
            json,
        } => {
            let selection = Selection::parse(&country)?;
            let mut generator = match seed {
                Some(seed) => TariffGenerator::seeded(config, seed)?,
                None => TariffGenerator::new(config)?,
            };

            for _ in 0..count {
                let result = generator.draw(&selection);
                if json {
                    println!("{}", serde_json::to_string(&result)?);
                } else {
                    println!(
                        "{} Estimated tariff for {}: {}% [{}] {}",
                        selection.country().flag(),
                        result.country,
                        result.value,
                        result.tier,
                        result.asset
                    );
                }
            }
        }
    }

    Ok(())
}
