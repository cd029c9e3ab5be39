use serde::{Deserialize, Serialize};

use super::solar::SolarClockResult;
use crate::domain::weather::{RawWeatherSnapshot, storm_intensity};

pub const TEMPERATURE_RANGE_C: (f64, f64) = (-20.0, 45.0);
pub const HUMIDITY_RANGE_PCT: (f64, f64) = (0.0, 100.0);
pub const WIND_SPEED_RANGE_KMH: (f64, f64) = (0.0, 100.0);
pub const WIND_DIRECTION_RANGE_DEG: (f64, f64) = (0.0, 360.0);
pub const PRESSURE_RANGE_HPA: (f64, f64) = (950.0, 1050.0);
pub const CLOUD_COVER_RANGE_PCT: (f64, f64) = (0.0, 100.0);
pub const PRECIPITATION_RANGE_MM: (f64, f64) = (0.0, 50.0);

/// Every raw field scaled into `[0, 1]`, plus the derived storm and
/// time-of-day scalars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedWeather {
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub wind_direction: f64,
    pub pressure: f64,
    pub cloud_cover: f64,
    pub precipitation: f64,
    pub storm_intensity: f64,
    pub time_of_day: f64,
    pub golden_hour: f64,
    pub blue_hour: f64,
}

impl Default for NormalizedWeather {
    fn default() -> Self {
        Self {
            temperature: 0.5,
            humidity: 0.5,
            wind_speed: 0.2,
            wind_direction: 0.0,
            pressure: 0.5,
            cloud_cover: 0.3,
            precipitation: 0.0,
            storm_intensity: 0.0,
            time_of_day: 0.5,
            golden_hour: 0.0,
            blue_hour: 0.0,
        }
    }
}

impl NormalizedWeather {
    #[must_use]
    pub fn fields(&self) -> [(&'static str, f64); 11] {
        [
            ("temperature", self.temperature),
            ("humidity", self.humidity),
            ("windSpeed", self.wind_speed),
            ("windDirection", self.wind_direction),
            ("pressure", self.pressure),
            ("cloudCover", self.cloud_cover),
            ("precipitation", self.precipitation),
            ("stormIntensity", self.storm_intensity),
            ("timeOfDay", self.time_of_day),
            ("goldenHour", self.golden_hour),
            ("blueHour", self.blue_hour),
        ]
    }
}

#[must_use]
pub fn normalize_value(value: f64, min: f64, max: f64) -> f64 {
    let scaled = (value - min) / (max - min);
    if scaled.is_nan() {
        return 0.0;
    }
    scaled.clamp(0.0, 1.0)
}

fn normalize_in(value: f64, (min, max): (f64, f64)) -> f64 {
    normalize_value(value, min, max)
}

#[must_use]
pub fn normalize_snapshot(raw: &RawWeatherSnapshot, solar: &SolarClockResult) -> NormalizedWeather {
    NormalizedWeather {
        temperature: normalize_in(raw.temperature, TEMPERATURE_RANGE_C),
        humidity: normalize_in(raw.humidity, HUMIDITY_RANGE_PCT),
        wind_speed: normalize_in(raw.wind_speed, WIND_SPEED_RANGE_KMH),
        wind_direction: normalize_in(raw.wind_direction, WIND_DIRECTION_RANGE_DEG),
        pressure: normalize_in(raw.pressure, PRESSURE_RANGE_HPA),
        cloud_cover: normalize_in(raw.cloud_cover, CLOUD_COVER_RANGE_PCT),
        precipitation: normalize_in(raw.precipitation, PRECIPITATION_RANGE_MM),
        storm_intensity: storm_intensity(raw.weather_code),
        time_of_day: solar.time_of_day.clamp(0.0, 1.0),
        golden_hour: solar.golden_hour.clamp(0.0, 1.0),
        blue_hour: solar.blue_hour.clamp(0.0, 1.0),
    }
}
