#![allow(clippy::missing_errors_doc)]

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::domain::weather::{parse_date, parse_datetime, parse_observation_time};

pub const DEFAULT_REFRESH_SECS: u64 = 300;

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_date(value).ok_or_else(|| format!("expected YYYY-MM-DD, got {value:?}"))
}

fn hour_arg(value: &str) -> Result<NaiveDateTime, String> {
    parse_datetime(value).ok_or_else(|| format!("expected YYYY-MM-DDTHH:MM, got {value:?}"))
}

fn instant_arg(value: &str) -> Result<NaiveDateTime, String> {
    parse_observation_time(value)
        .ok_or_else(|| format!("expected RFC 3339 or YYYY-MM-DDTHH:MM[:SS], got {value:?}"))
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "atmos-engine",
    version,
    about = "Derive sky, light and mood parameters from live or recorded weather"
)]
pub struct Cli {
    /// Derive from a JSON weather snapshot instead of fetching
    #[arg(long, conflicts_with_all = ["watch", "date", "hour"])]
    pub snapshot: Option<PathBuf>,

    /// Latitude (requires --lon)
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude (requires --lat)
    #[arg(long, allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// Display name for --lat/--lon
    #[arg(long)]
    pub name: Option<String>,

    /// Promote a forecast day (YYYY-MM-DD)
    #[arg(long, value_parser = date_arg, conflicts_with = "hour")]
    pub date: Option<NaiveDate>,

    /// Promote a forecast hour (YYYY-MM-DDTHH:MM)
    #[arg(long, value_parser = hour_arg)]
    pub hour: Option<NaiveDateTime>,

    /// Fixed "now" used when a snapshot has no observation time
    #[arg(long, value_parser = instant_arg)]
    pub at: Option<NaiveDateTime>,

    /// Seed for headline selection
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Refresh interval in seconds for --watch
    #[arg(long, default_value_t = DEFAULT_REFRESH_SECS)]
    pub refresh_interval: u64,

    /// Keep refreshing until interrupted
    #[arg(long)]
    pub watch: bool,

    /// Persist the effective location, seed and format
    #[arg(long)]
    pub save: bool,

    /// Ignore saved settings
    #[arg(long, conflicts_with = "save")]
    pub no_config: bool,

    /// Forecast endpoint override
    #[arg(long, hide = true)]
    pub forecast_url: Option<String>,
}

impl Cli {
    pub fn validate(&self) -> anyhow::Result<()> {
        match (self.lat, self.lon) {
            (Some(_), None) | (None, Some(_)) => {
                anyhow::bail!("--lat and --lon must be provided together")
            }
            _ => {}
        }
        if let Some(lat) = self.lat
            && !(-90.0..=90.0).contains(&lat)
        {
            anyhow::bail!("--lat must be within -90..=90, got {lat}");
        }
        if let Some(lon) = self.lon
            && !(-180.0..=180.0).contains(&lon)
        {
            anyhow::bail!("--lon must be within -180..=180, got {lon}");
        }
        Ok(())
    }
}
