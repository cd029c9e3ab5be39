use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SUNRISE_HOUR: f64 = 6.0;
pub const DEFAULT_SUNSET_HOUR: f64 = 18.0;

/// Sunrise and sunset as fractional hours of the observation's calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SunWindow {
    pub sunrise: f64,
    pub sunset: f64,
}

impl Default for SunWindow {
    fn default() -> Self {
        Self::new(DEFAULT_SUNRISE_HOUR, DEFAULT_SUNSET_HOUR)
    }
}

impl SunWindow {
    #[must_use]
    pub fn new(sunrise: f64, sunset: f64) -> Self {
        Self { sunrise, sunset }
    }

    /// Parses both strings, substituting 06:00 / 18:00 for whichever one is
    /// missing or malformed.
    #[must_use]
    pub fn from_clock_strings(sunrise: &str, sunset: &str) -> Self {
        let parsed_sunrise = parse_clock_hour(sunrise);
        let parsed_sunset = parse_clock_hour(sunset);
        if parsed_sunrise.is_none() || parsed_sunset.is_none() {
            tracing::warn!(
                sunrise,
                sunset,
                "unparseable sunrise/sunset, falling back to 06:00/18:00"
            );
        }
        Self {
            sunrise: parsed_sunrise.unwrap_or(DEFAULT_SUNRISE_HOUR),
            sunset: parsed_sunset.unwrap_or(DEFAULT_SUNSET_HOUR),
        }
    }

    #[must_use]
    pub fn daylight_hours(&self) -> f64 {
        self.sunset - self.sunrise
    }

    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.daylight_hours() > 0.0
    }
}

/// `"HH:MM"` (trailing `:SS` ignored, a leading `YYYY-MM-DDT` date stripped) to
/// fractional hours.
#[must_use]
pub fn parse_clock_hour(value: &str) -> Option<f64> {
    let value = value.trim();
    let clock = value.split_once('T').map_or(value, |(_, time)| time);
    let mut parts = clock.split(':');
    let hours: u32 = parts.next()?.trim().parse().ok()?;
    let minutes: u32 = parts.next()?.trim().parse().ok()?;
    if hours > 24 || minutes >= 60 {
        return None;
    }
    Some(f64::from(hours) + f64::from(minutes) / 60.0)
}

/// Accepts RFC 3339 (keeping the wall clock of its own offset) or a naive local
/// `YYYY-MM-DDTHH:MM[:SS]` timestamp.
#[must_use]
pub fn parse_observation_time(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Some(instant.naive_local());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| parse_datetime(value))
}

#[must_use]
pub fn clock_hours(instant: NaiveDateTime) -> f64 {
    f64::from(instant.hour()) + f64::from(instant.minute()) / 60.0
}

#[must_use]
pub fn precise_clock_hours(instant: NaiveDateTime) -> f64 {
    clock_hours(instant) + f64::from(instant.second()) / 3600.0
}

#[must_use]
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M").ok()
}

#[must_use]
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}
