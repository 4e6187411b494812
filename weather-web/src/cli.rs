use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use std::sync::Arc;
use weather_core::{
    Config, SystemClock, WeatherLookup, WeatherReport, WeatherResult, client_from_config,
};

use crate::{server, telemetry};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "City weather lookup form")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the weather form over HTTP.
    Serve {
        /// Listen address, e.g. "0.0.0.0:8080". Overrides config and WEATHER_BIND.
        #[arg(long)]
        bind: Option<String>,

        /// Verbose logging.
        #[arg(long)]
        debug: bool,
    },

    /// Look up the current weather for a city once and print it.
    Show {
        /// City name.
        city: String,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Store the OpenWeatherMap API key in the config file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Serve { bind, debug } => {
                let mut config = Config::load()?;
                if let Some(bind) = bind {
                    config.bind = bind;
                }
                config.debug |= debug;

                telemetry::init(config.debug);
                server::serve(&config).await
            }
            Command::Show { city, json } => {
                let config = Config::load()?;
                telemetry::init(config.debug);

                let lookup = WeatherLookup::new(client_from_config(&config)?, Arc::new(SystemClock));
                let result = lookup.resolve(&city).await;

                if json {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                    return if result.is_success() {
                        Ok(())
                    } else {
                        Err(anyhow!("weather lookup failed"))
                    };
                }
                match result {
                    WeatherResult::Success(report) => {
                        print_report(&report);
                        Ok(())
                    }
                    WeatherResult::Failure { message } => Err(anyhow!(message)),
                }
            }
            Command::Configure => configure(),
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load_file()?;

    let api_key = Password::new("OpenWeatherMap API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim();
    if api_key.is_empty() {
        return Err(anyhow!("API key must not be empty"));
    }

    config.set_api_key(api_key.to_string());
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn print_report(report: &WeatherReport) {
    println!("{}", report.city);
    println!("{}, {}", report.day, report.date);
    println!("Temperature:    {} (feels like {})", report.temperature, report.feels_like);
    println!("Conditions:     {}", report.description);
    println!("Humidity:       {}", report.humidity);
    println!("Wind:           {} at {}", report.wind_speed, report.wind_deg);
    println!("Sunrise/sunset: {} / {}", report.sunrise, report.sunset);
}
