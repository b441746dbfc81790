use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use weather_core::{Config, FileSlotStore, Unit, WeatherApp, provider_from_config};

use crate::session;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather card CLI")]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show the current weather card.
    Show {
        /// Display unit: c (celsius) or f (fahrenheit).
        #[arg(long, default_value = "c")]
        unit: Unit,
    },

    /// Look up a city and show its card.
    Search {
        /// City name.
        city: String,

        /// Display unit: c (celsius) or f (fahrenheit).
        #[arg(long, default_value = "c")]
        unit: Unit,
    },

    /// Remove the current card.
    Remove,

    /// Interactive session: search, toggle units and remove from a prompt.
    Interactive,
}

impl Command {
    /// Subcommand name as typed on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Configure => "configure",
            Command::Show { .. } => "show",
            Command::Search { .. } => "search",
            Command::Remove => "remove",
            Command::Interactive => "interactive",
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;
        debug!(
            command = self.command.name(),
            api_key_set = config.api_key().is_some(),
            "running command"
        );

        match self.command {
            Command::Configure => configure(config),
            Command::Show { unit } => {
                let app = start_app(&config, unit)?;
                print!("{}", app.render());
                Ok(())
            }
            Command::Search { city, unit } => {
                let provider = provider_from_config(&config)?;
                let mut app = start_app(&config, unit)?;
                app.search(provider.as_ref(), &city).await?;
                print!("{}", app.render());
                Ok(())
            }
            Command::Remove => {
                let mut app = start_app(&config, Unit::default())?;
                app.remove()?;
                print!("{}", app.render());
                Ok(())
            }
            Command::Interactive => {
                let provider = provider_from_config(&config)?;
                let app = start_app(&config, Unit::default())?;
                session::run(app, provider.as_ref()).await
            }
        }
    }
}

fn start_app(config: &Config, unit: Unit) -> anyhow::Result<WeatherApp<FileSlotStore>> {
    let data_dir = config.data_dir()?;
    debug!(data_dir = %data_dir.display(), %unit, "starting weather app");
    let slots = FileSlotStore::new(data_dir);
    WeatherApp::start_with_unit(slots, unit)
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let api_key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_display_mode(inquire::PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    config.set_api_key(api_key.trim().to_string());
    config.save()?;
    info!("stored OpenWeather API key");

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
