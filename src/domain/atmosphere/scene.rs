use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use super::compose::AtmosphericState;
use super::normalize::NormalizedWeather;
use crate::domain::weather::{HourlyForecast, WeatherCondition, classify_condition};

/// Forecast precipitation (mm) above which the next hour leaks into the scene.
const FORECAST_PRECIP_THRESHOLD: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneMode {
    Clear,
    Rain,
    Snow,
    Storm,
    Foggy,
}

impl SceneMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Rain => "rain",
            Self::Snow => "snow",
            Self::Storm => "storm",
            Self::Foggy => "foggy",
        }
    }
}

/// Particle and fog parameters handed to the precipitation layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDirective {
    pub mode: SceneMode,
    pub effective_condition: WeatherCondition,
    pub rain_intensity: f64,
    pub snow_intensity: f64,
    pub fog_density: f64,
    pub cloud_density: f64,
    pub visibility: f64,
    pub wind_angle: f64,
    pub fog_exp2_density: f64,
    pub thunder_active: bool,
    pub time_phase_value: f64,
}

/// Blends the current atmosphere with the upcoming hour so precipitation that
/// is about to start already shows.
#[must_use]
pub fn direct_scene(
    atmosphere: &AtmosphericState,
    normalized: &NormalizedWeather,
    next_hour: Option<&HourlyForecast>,
) -> SceneDirective {
    let mut condition = atmosphere.weather_condition;
    let mut rain = atmosphere.rain_intensity;
    let mut snow = atmosphere.snow_intensity;

    if let Some(hour) = next_hour
        && hour.precipitation > FORECAST_PRECIP_THRESHOLD
    {
        let precip = hour.precipitation;
        match classify_condition(hour.weather_code) {
            WeatherCondition::Snow => {
                snow = snow.max((0.35 + precip * 0.18).min(1.0));
                condition = WeatherCondition::Snow;
            }
            forecast @ (WeatherCondition::Rain | WeatherCondition::Storm) => {
                rain = rain.max((0.25 + precip * 0.15).min(1.0));
                condition = forecast;
            }
            WeatherCondition::Clear | WeatherCondition::Cloudy | WeatherCondition::Fog => {}
        }
    }

    let mode = if snow > 0.3 {
        SceneMode::Snow
    } else if condition == WeatherCondition::Storm || normalized.storm_intensity > 0.75 {
        SceneMode::Storm
    } else if rain > 0.25 {
        SceneMode::Rain
    } else if condition == WeatherCondition::Fog || atmosphere.fog_density > 0.45 {
        SceneMode::Foggy
    } else {
        SceneMode::Clear
    };

    SceneDirective {
        mode,
        effective_condition: condition,
        rain_intensity: rain,
        snow_intensity: snow,
        fog_density: atmosphere.fog_density,
        cloud_density: atmosphere.cloud_density,
        visibility: 1.0 - atmosphere.fog_density,
        wind_angle: normalized.wind_direction * TAU,
        fog_exp2_density: 0.001 + (0.08 - 0.001) * atmosphere.fog_density,
        thunder_active: mode == SceneMode::Storm,
        time_phase_value: atmosphere.time_phase.shader_value(),
    }
}
