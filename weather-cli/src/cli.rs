use std::{sync::Arc, time::Duration};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, Text};
use weather_core::{
    Config, Coordinate, DEFAULT_BASE_ADDRESS, HttpTransport, LocationInfo, WeatherProvider,
    WeatherSession,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather for a map location")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key and, optionally, a custom service address.
    Configure,

    /// Show current weather at a coordinate.
    Show {
        /// Latitude in degrees, -90..=90.
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude in degrees, -180..=180.
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Give up on the network request after this many seconds.
        #[arg(long)]
        timeout: Option<u64>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { lat, lon, timeout } => show(lat, lon, timeout).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let api_key = Password::new("API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let current_base = cfg.base_address.clone().unwrap_or_else(|| DEFAULT_BASE_ADDRESS.to_string());
    let base_address = Text::new("Service address:")
        .with_default(&current_base)
        .prompt()
        .context("Failed to read service address")?;

    cfg.api_key = Some(api_key);
    cfg.base_address = (base_address != DEFAULT_BASE_ADDRESS).then_some(base_address);

    // Validate before persisting so a typo is reported now rather than on every `show`.
    if let WeatherProvider::Unavailable(err) = WeatherProvider::from_config(&cfg) {
        bail!("Configuration rejected: {err}");
    }

    cfg.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

async fn show(lat: f64, lon: f64, timeout: Option<u64>) -> anyhow::Result<()> {
    let coordinate = Coordinate::new(lat, lon)?;
    let cfg = Config::load()?.with_env_overrides();
    if !cfg.has_api_key() {
        tracing::warn!("no API key configured; the request will report an unavailable provider");
    }

    let transport = match timeout {
        Some(secs) => HttpTransport::with_timeout(Duration::from_secs(secs))?,
        None => HttpTransport::new(),
    };

    let mut session = WeatherSession::new(WeatherProvider::from_config(&cfg), Arc::new(transport));
    let request = session.fetch(coordinate);
    tracing::info!(%request, lat, lon, "requested current weather");
    println!("{}", render::location_info(session.location_info()));

    let info = session.settle().await;
    println!("{}", render::location_info(info));

    if let LocationInfo::FailedToLoad(err) = info {
        if let Some(hint) = render::hint(err) {
            eprintln!("{hint}");
        }
        bail!("{err}");
    }

    Ok(())
}
