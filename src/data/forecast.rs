use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::domain::weather::{
    DailyForecast, ForecastBundle, HourlyForecast, Location, RawWeatherSnapshot,
    derive_snapshot_for_date, parse_date, parse_datetime,
};

const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
const FORECAST_DAYS: u8 = 8;

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,wind_speed_10m,wind_direction_10m,surface_pressure,cloud_cover,precipitation,weather_code,is_day";
const HOURLY_FIELDS: &str = "temperature_2m,weather_code,precipitation,relative_humidity_2m,wind_speed_10m,wind_direction_10m,surface_pressure,cloud_cover,is_day";
const DAILY_FIELDS: &str =
    "temperature_2m_max,temperature_2m_min,weather_code,precipitation_sum,sunrise,sunset";

#[derive(Debug, Clone)]
pub struct ForecastClient {
    client: Client,
    base_url: String,
}

impl Default for ForecastClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ForecastClient {
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url(FORECAST_URL)
    }

    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
            base_url: base_url.into(),
        }
    }

    fn base_query(location: &Location) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", location.latitude.to_string()),
            ("longitude", location.longitude.to_string()),
            ("current", CURRENT_FIELDS.to_string()),
            ("hourly", HOURLY_FIELDS.to_string()),
            ("daily", DAILY_FIELDS.to_string()),
            ("timezone", "auto".to_string()),
        ]
    }

    async fn request(&self, query: &[(&'static str, String)]) -> Result<ForecastResponse> {
        let response = self
            .client
            .get(&self.base_url)
            .query(query)
            .send()
            .await
            .context("forecast request failed")?
            .error_for_status()
            .context("forecast request returned non-success status")?;

        response
            .json()
            .await
            .context("failed to parse forecast payload")
    }

    /// Current conditions plus the full hourly and daily series.
    pub async fn fetch(&self, location: Location) -> Result<ForecastBundle> {
        let mut query = Self::base_query(&location);
        query.push(("forecast_days", FORECAST_DAYS.to_string()));
        let payload = self.request(&query).await?;

        let daily = parse_daily(&payload.daily);
        let today = daily
            .first()
            .context("forecast payload has no daily entries")?;
        let current = payload.current.into_snapshot(today);

        tracing::debug!(
            location = %location.display_name(),
            hourly = payload.hourly.time.len(),
            daily = daily.len(),
            "forecast fetched"
        );

        Ok(ForecastBundle {
            location,
            current,
            hourly: parse_hourly(&payload.hourly),
            daily,
            fetched_at: Utc::now(),
        })
    }

    /// Snapshot representing `date` as a whole: its midday hour (or the middle
    /// hour available) with that day's sunrise and sunset.
    pub async fn fetch_for_date(
        &self,
        location: &Location,
        date: NaiveDate,
    ) -> Result<RawWeatherSnapshot> {
        let day = date.format("%Y-%m-%d").to_string();
        let mut query = Self::base_query(location);
        query.push(("start_date", day.clone()));
        query.push(("end_date", day));
        let payload = self.request(&query).await?;

        derive_snapshot_for_date(
            date,
            &parse_hourly(&payload.hourly),
            &parse_daily(&payload.daily),
        )
        .with_context(|| format!("no weather data for {date}"))
    }
}

/// `2026-02-12T07:41` to `07:41`; plain clock strings pass through.
fn clock_part(value: &str) -> String {
    value
        .split_once('T')
        .map_or(value, |(_, time)| time)
        .to_string()
}

fn value_at<T: Copy>(values: &[Option<T>], idx: usize) -> Option<T> {
    values.get(idx).copied().flatten()
}

fn parse_hourly(hourly: &HourlyBlock) -> Vec<HourlyForecast> {
    let mut out = Vec::new();
    for (idx, raw_time) in hourly.time.iter().enumerate() {
        let Some(time) = parse_datetime(raw_time) else {
            continue;
        };
        let (Some(temperature), Some(weather_code)) = (
            value_at(&hourly.temperature_2m, idx),
            value_at(&hourly.weather_code, idx),
        ) else {
            continue;
        };

        out.push(HourlyForecast {
            time,
            temperature,
            weather_code,
            precipitation: value_at(&hourly.precipitation, idx).unwrap_or(0.0),
            humidity: value_at(&hourly.relative_humidity_2m, idx).unwrap_or(0.0),
            wind_speed: value_at(&hourly.wind_speed_10m, idx).unwrap_or(0.0),
            wind_direction: value_at(&hourly.wind_direction_10m, idx),
            pressure: value_at(&hourly.surface_pressure, idx),
            cloud_cover: value_at(&hourly.cloud_cover, idx),
            is_day: value_at(&hourly.is_day, idx).map(|flag| flag == 1),
        });
    }
    out
}

fn parse_daily(daily: &DailyBlock) -> Vec<DailyForecast> {
    let mut out = Vec::new();
    for (idx, raw_date) in daily.time.iter().enumerate() {
        let Some(date) = parse_date(raw_date) else {
            continue;
        };

        out.push(DailyForecast {
            date,
            temperature_max: value_at(&daily.temperature_2m_max, idx).unwrap_or(0.0),
            temperature_min: value_at(&daily.temperature_2m_min, idx).unwrap_or(0.0),
            weather_code: value_at(&daily.weather_code, idx).unwrap_or(0),
            precipitation: value_at(&daily.precipitation_sum, idx).unwrap_or(0.0),
            sunrise: daily.sunrise.get(idx).map(|v| clock_part(v)).unwrap_or_default(),
            sunset: daily.sunset.get(idx).map(|v| clock_part(v)).unwrap_or_default(),
        });
    }
    out
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentBlock,
    hourly: HourlyBlock,
    daily: DailyBlock,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    #[serde(default)]
    time: Option<String>,
    temperature_2m: f64,
    relative_humidity_2m: f64,
    wind_speed_10m: f64,
    wind_direction_10m: f64,
    surface_pressure: f64,
    cloud_cover: f64,
    precipitation: f64,
    weather_code: u8,
    is_day: u8,
}

impl CurrentBlock {
    fn into_snapshot(self, today: &DailyForecast) -> RawWeatherSnapshot {
        RawWeatherSnapshot {
            temperature: self.temperature_2m,
            humidity: self.relative_humidity_2m,
            wind_speed: self.wind_speed_10m,
            wind_direction: self.wind_direction_10m,
            pressure: self.surface_pressure,
            cloud_cover: self.cloud_cover,
            precipitation: self.precipitation,
            weather_code: self.weather_code,
            is_day: self.is_day == 1,
            sunrise: today.sunrise.clone(),
            sunset: today.sunset.clone(),
            observation_time: self.time,
        }
    }
}

#[derive(Debug, Deserialize)]
struct HourlyBlock {
    time: Vec<String>,
    temperature_2m: Vec<Option<f64>>,
    weather_code: Vec<Option<u8>>,
    #[serde(default)]
    precipitation: Vec<Option<f64>>,
    #[serde(default)]
    relative_humidity_2m: Vec<Option<f64>>,
    #[serde(default)]
    wind_speed_10m: Vec<Option<f64>>,
    #[serde(default)]
    wind_direction_10m: Vec<Option<f64>>,
    #[serde(default)]
    surface_pressure: Vec<Option<f64>>,
    #[serde(default)]
    cloud_cover: Vec<Option<f64>>,
    #[serde(default)]
    is_day: Vec<Option<u8>>,
}

#[derive(Debug, Deserialize)]
struct DailyBlock {
    time: Vec<String>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
    weather_code: Vec<Option<u8>>,
    #[serde(default)]
    precipitation_sum: Vec<Option<f64>>,
    sunrise: Vec<String>,
    sunset: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hourly_block(times: &[&str]) -> HourlyBlock {
        let n = times.len();
        HourlyBlock {
            time: times.iter().map(ToString::to_string).collect(),
            temperature_2m: vec![Some(12.0); n],
            weather_code: vec![Some(61); n],
            precipitation: vec![Some(0.4); n],
            relative_humidity_2m: vec![Some(80.0); n],
            wind_speed_10m: vec![Some(14.0); n],
            wind_direction_10m: vec![Some(200.0); n],
            surface_pressure: Vec::new(),
            cloud_cover: vec![None; n],
            is_day: vec![Some(0); n],
        }
    }

    #[test]
    fn parse_hourly_skips_bad_timestamps() {
        let parsed = parse_hourly(&hourly_block(&["bad", "2026-02-12T10:00"]));
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].pressure, None);
        assert_eq!(parsed[0].cloud_cover, None);
        assert_eq!(parsed[0].is_day, Some(false));
    }

    #[test]
    fn parse_hourly_skips_entries_without_temperature() {
        let mut block = hourly_block(&["2026-02-12T10:00", "2026-02-12T11:00"]);
        block.temperature_2m[0] = None;
        let parsed = parse_hourly(&block);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].label(), "11 AM");
    }

    #[test]
    fn parse_daily_keeps_clock_part_of_sun_times() {
        let block = DailyBlock {
            time: vec!["2026-02-12".to_string()],
            temperature_2m_max: vec![Some(4.0)],
            temperature_2m_min: vec![Some(-2.0)],
            weather_code: vec![Some(3)],
            precipitation_sum: vec![None],
            sunrise: vec!["2026-02-12T07:41".to_string()],
            sunset: vec!["2026-02-12T16:32".to_string()],
        };
        let parsed = parse_daily(&block);
        assert_eq!(parsed[0].sunrise, "07:41");
        assert_eq!(parsed[0].sunset, "16:32");
        assert_eq!(parsed[0].precipitation, 0.0);
    }

    #[test]
    fn clock_part_passes_plain_times_through() {
        assert_eq!(clock_part("06:05"), "06:05");
        assert_eq!(clock_part("2026-02-12T06:05"), "06:05");
    }
}
