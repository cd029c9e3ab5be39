use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize};

mod conditions;
mod conversions;


pub use conditions::{WeatherCondition, classify_condition, storm_intensity, weather_label};
pub use conversions::{
    DEFAULT_SUNRISE_HOUR, DEFAULT_SUNSET_HOUR, SunWindow, clock_hours, parse_clock_hour,
    parse_date, parse_datetime, parse_observation_time, precise_clock_hours,
};

const DEFAULT_PRESSURE_HPA: f64 = 1013.0;

/// One observation or forecast slice as delivered by the fetch layer.
///
/// `sunrise`/`sunset` are wall-clock `HH:MM` strings without a date; all time
/// math assumes they share the calendar day of the observation instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawWeatherSnapshot {
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub wind_direction: f64,
    pub pressure: f64,
    pub cloud_cover: f64,
    pub precipitation: f64,
    #[serde(deserialize_with = "saturating_weather_code")]
    pub weather_code: u8,
    pub is_day: bool,
    pub sunrise: String,
    pub sunset: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observation_time: Option<String>,
}

/// Any integer is accepted; values outside `0..=255` saturate to the nearest
/// end so they still land in the classifier's fallback bands.
fn saturating_weather_code<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let code = i64::deserialize(deserializer)?;
    Ok(u8::try_from(code.clamp(0, i64::from(u8::MAX))).unwrap_or(u8::MAX))
}

impl RawWeatherSnapshot {
    /// Local wall-clock instant of the observation, or `fallback` when the
    /// snapshot carries no parseable observation time.
    #[must_use]
    pub fn observation_instant(&self, fallback: NaiveDateTime) -> NaiveDateTime {
        self.observation_time
            .as_deref()
            .and_then(parse_observation_time)
            .unwrap_or(fallback)
    }

    #[must_use]
    pub fn sun_window(&self) -> SunWindow {
        SunWindow::from_clock_strings(&self.sunrise, &self.sunset)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl Location {
    #[must_use]
    pub fn from_coords(lat: f64, lon: f64) -> Self {
        Self {
            name: format!("{lat:.4}, {lon:.4}"),
            latitude: lat,
            longitude: lon,
            country: None,
        }
    }

    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.country {
            Some(country) => format!("{}, {}", self.name, country),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyForecast {
    pub time: NaiveDateTime,
    pub temperature: f64,
    pub weather_code: u8,
    pub precipitation: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    #[serde(default)]
    pub wind_direction: Option<f64>,
    #[serde(default)]
    pub pressure: Option<f64>,
    #[serde(default)]
    pub cloud_cover: Option<f64>,
    #[serde(default)]
    pub is_day: Option<bool>,
}

impl HourlyForecast {
    /// Short 12-hour label such as `3 PM`.
    #[must_use]
    pub fn label(&self) -> String {
        self.time.format("%-I %p").to_string()
    }

    /// Builds the snapshot used when this hour is selected as the active slice.
    #[must_use]
    pub fn promote(&self, sunrise: &str, sunset: &str) -> RawWeatherSnapshot {
        RawWeatherSnapshot {
            temperature: self.temperature,
            humidity: self.humidity,
            wind_speed: self.wind_speed,
            wind_direction: self.wind_direction.unwrap_or(0.0),
            pressure: self.pressure.unwrap_or(DEFAULT_PRESSURE_HPA),
            cloud_cover: self.cloud_cover.unwrap_or(0.0),
            precipitation: self.precipitation,
            weather_code: self.weather_code,
            is_day: self.is_day.unwrap_or(true),
            sunrise: sunrise.to_string(),
            sunset: sunset.to_string(),
            observation_time: Some(self.time.format("%Y-%m-%dT%H:%M").to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub temperature_max: f64,
    pub temperature_min: f64,
    pub weather_code: u8,
    pub precipitation: f64,
    pub sunrise: String,
    pub sunset: String,
}

impl DailyForecast {
    #[must_use]
    pub fn day_name(&self, today: NaiveDate) -> String {
        if self.date == today {
            "Today".to_string()
        } else if today.succ_opt() == Some(self.date) {
            "Tomorrow".to_string()
        } else {
            self.date.format("%a").to_string()
        }
    }
}

#[derive(Debug, Clone)]
pub struct ForecastBundle {
    pub location: Location,
    pub current: RawWeatherSnapshot,
    pub hourly: Vec<HourlyForecast>,
    pub daily: Vec<DailyForecast>,
    pub fetched_at: DateTime<Utc>,
}

impl ForecastBundle {
    #[must_use]
    pub fn snapshot_for_date(&self, date: NaiveDate) -> Option<RawWeatherSnapshot> {
        derive_snapshot_for_date(date, &self.hourly, &self.daily)
    }

    /// Promotes the hourly entry at `hour` using that day's sunrise and sunset.
    #[must_use]
    pub fn snapshot_for_hour(&self, hour: NaiveDateTime) -> Option<RawWeatherSnapshot> {
        let entry = self.hourly.iter().find(|h| h.time == hour)?;
        let day = self.daily.iter().find(|d| d.date == hour.date())?;
        Some(entry.promote(&day.sunrise, &day.sunset))
    }

    /// Hourly entries starting at the hour of `now`, at most `count` of them.
    #[must_use]
    pub fn upcoming_hours(&self, now: NaiveDateTime, count: usize) -> Vec<HourlyForecast> {
        let Some(start) = now.with_minute(0).and_then(|t| t.with_second(0)) else {
            return Vec::new();
        };
        self.hourly
            .iter()
            .filter(|h| h.time >= start)
            .take(count)
            .cloned()
            .collect()
    }

    /// Daily entries after `today`, at most `count` of them.
    #[must_use]
    pub fn upcoming_days(&self, today: NaiveDate, count: usize) -> Vec<DailyForecast> {
        self.daily
            .iter()
            .filter(|d| d.date > today)
            .take(count)
            .cloned()
            .collect()
    }
}

/// Picks the representative slice of a forecast day: the `12:00` hour when the
/// day has one, otherwise the middle of the available hours.
#[must_use]
pub fn representative_index(hourly: &[HourlyForecast], date: NaiveDate) -> Option<usize> {
    let indices: Vec<usize> = hourly
        .iter()
        .enumerate()
        .filter_map(|(idx, h)| (h.time.date() == date).then_some(idx))
        .collect();
    if indices.is_empty() {
        return None;
    }
    indices
        .iter()
        .copied()
        .find(|&idx| hourly[idx].time.hour() == 12 && hourly[idx].time.minute() == 0)
        .or_else(|| indices.get(indices.len() / 2).copied())
}

#[must_use]
pub fn derive_snapshot_for_date(
    date: NaiveDate,
    hourly: &[HourlyForecast],
    daily: &[DailyForecast],
) -> Option<RawWeatherSnapshot> {
    let day = daily.iter().find(|d| d.date == date)?;
    let idx = representative_index(hourly, date)?;
    let mut snapshot = hourly[idx].promote(&day.sunrise, &day.sunset);
    // Date selections describe the whole day rather than a particular instant.
    snapshot.observation_time = None;
    Some(snapshot)
}
