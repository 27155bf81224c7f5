use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dashboard_core::{Config, ErrorCategory, ServiceError, WeatherService};

use crate::output::{self, Render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-dashboard", version, about = "Weather, forecast and air quality by city")]
pub struct Cli {
    /// Print the result as JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeatherMap API key.
    Configure,

    /// Current conditions for a city.
    Current { city: String },

    /// One sample per day for the next five days.
    Forecast { city: String },

    /// Air quality index and pollutant concentrations.
    AirQuality { city: String },

    /// Mock history for the past few days.
    Historical {
        city: String,

        /// Number of past days (1-30).
        #[arg(long)]
        days: Option<u32>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let json = self.json;

        match self.command {
            Command::Configure => {
                configure()?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Current { city } => {
                let svc = service()?;
                report(svc.current_weather(&city).await, json)
            }
            Command::Forecast { city } => {
                let svc = service()?;
                report(svc.forecast(&city).await, json)
            }
            Command::AirQuality { city } => {
                let svc = service()?;
                report(svc.air_quality(&city).await, json)
            }
            Command::Historical { city, days } => {
                let svc = service()?;
                report(svc.historical(&city, days), json)
            }
        }
    }
}

fn service() -> anyhow::Result<WeatherService<dashboard_core::HttpProviderClient>> {
    let config = Config::load()?;
    WeatherService::from_config(&config)
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = inquire::Password::new("OpenWeatherMap API key:")
        .without_confirmation()
        .with_display_mode(inquire::PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim();
    if api_key.is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    config.set_api_key(api_key.to_string());
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn report<T: Render>(result: Result<T, ServiceError>, json: bool) -> anyhow::Result<ExitCode> {
    match result {
        Ok(value) => {
            println!("{}", output::render(&value, json)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            tracing::debug!(error = ?err, "request failed");
            eprintln!("Error: {}", err.public_message());
            Ok(exit_code(err.category()))
        }
    }
}

/// 0 is success, 1 is reserved for setup failures reported through anyhow.
fn exit_code(category: ErrorCategory) -> ExitCode {
    ExitCode::from(exit_status(category))
}

fn exit_status(category: ErrorCategory) -> u8 {
    match category {
        ErrorCategory::BadRequest => 2,
        ErrorCategory::NotFound => 3,
        ErrorCategory::BadGateway => 4,
    }
}
