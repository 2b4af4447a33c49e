use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use informer_core::{
    Config, CurrencyCode, Informer, ProviderId,
    provider::{default_provider_from_config, provider_from_config, rate_provider_from_config},
};
use inquire::{Confirm, Password, PasswordDisplayMode, Select};
use tracing::info;

const FALLBACK_CURRENCY: CurrencyCode = CurrencyCode::Eur;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "informer", version, about = "Local time, weather and currency rates for a city")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a weather provider.
    Configure {
        /// Provider short name, e.g. "weatherapi" or "openweather".
        provider: String,
    },

    /// Show everything: local time, weather and currency rates.
    Show(CityArgs),

    /// Show the current local time in a city.
    Time(CityArgs),

    /// Show weather yesterday, now and tomorrow.
    Weather(CityArgs),

    /// Show the currency rate for yesterday, today and tomorrow.
    Rates(CityArgs),

    /// Show which of the three days has the highest currency rate.
    MaxRate(CityArgs),
}

#[derive(Debug, Args)]
pub struct CityArgs {
    /// City name, e.g. "Moscow".
    city: String,

    /// Currency code, e.g. "USD". Defaults to the configured currency, then EUR.
    #[arg(long, short)]
    currency: Option<CurrencyCode>,

    /// Weather provider to use instead of the configured default.
    #[arg(long)]
    provider: Option<String>,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { provider } => configure(&provider)?,
            Command::Show(args) => {
                let informer = build_informer(&args).await?;
                println!("City: {}", informer.city());
                println!("Local time: {}", informer.local_time().await?.format("%H:%M"));
                println!();
                println!("{}", informer.three_day_weather().await?);
                println!();
                println!("{}", informer.three_day_currency_rate().await?);
                println!();
                println!("{}", informer.three_day_max_currency_rate_info().await?);
            }
            Command::Time(args) => {
                let informer = build_informer(&args).await?;
                println!(
                    "{}: {}",
                    informer.city(),
                    informer.local_time().await?.format("%H:%M")
                );
            }
            Command::Weather(args) => {
                let informer = build_informer(&args).await?;
                println!("{}", informer.three_day_weather().await?);
            }
            Command::Rates(args) => {
                let informer = build_informer(&args).await?;
                println!("{}", informer.three_day_currency_rate().await?);
            }
            Command::MaxRate(args) => {
                let informer = build_informer(&args).await?;
                println!("{}", informer.three_day_max_currency_rate_info().await?);
            }
        }

        Ok(())
    }
}

async fn build_informer(args: &CityArgs) -> anyhow::Result<Informer> {
    let config = Config::load()?;

    let weather = match args.provider.as_deref() {
        Some(name) => provider_from_config(ProviderId::try_from(name)?, &config)?,
        None => default_provider_from_config(&config)?,
    };

    let currency = match args.currency {
        Some(code) => code,
        None => config.default_currency()?.unwrap_or(FALLBACK_CURRENCY),
    };

    Informer::new(&args.city, currency, weather, rate_provider_from_config(&config))
        .await
        .with_context(|| format!("Cannot report on city '{}'", args.city))
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    let mut config = Config::load()?;

    if config.is_provider_configured(id)
        && !Confirm::new(&format!("Replace the existing {id} API key?"))
            .with_default(false)
            .prompt()
            .context("Failed to read answer")?
    {
        println!("Kept the existing {id} configuration.");
        return Ok(());
    }

    let api_key = Password::new(&format!("API key for {id}:"))
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let had_other_default = config
        .default_provider_id()
        .is_ok_and(|current| current != id);

    config.upsert_provider_api_key(id, api_key.trim().to_string());

    if had_other_default
        && Confirm::new(&format!("Make {id} the default provider?"))
            .with_default(false)
            .prompt()
            .context("Failed to read answer")?
    {
        config.set_default_provider(id);
    }

    let current = config.default_currency()?.unwrap_or(FALLBACK_CURRENCY);
    let start = CurrencyCode::all().iter().position(|c| *c == current).unwrap_or(0);
    let currency = Select::new("Default currency:", CurrencyCode::all().to_vec())
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read currency")?;
    config.set_default_currency(currency);

    config.save()?;
    info!(provider = %id, %currency, "configuration saved");
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}
