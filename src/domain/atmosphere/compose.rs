use serde::{Deserialize, Serialize};

use super::color::KelvinColor;
use super::normalize::{NormalizedWeather, normalize_value};
use crate::domain::weather::{SunWindow, WeatherCondition, classify_condition};

const STORM_RAIN_FLOOR: f64 = 0.6;
const RAIN_FLOOR: f64 = 0.4;
const SNOW_FLOOR: f64 = 0.45;
const FOG_FLOOR: f64 = 0.55;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimePhase {
    Night,
    Dawn,
    Day,
    Evening,
}

impl TimePhase {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Night => "night",
            Self::Dawn => "dawn",
            Self::Day => "day",
            Self::Evening => "evening",
        }
    }

    /// Scalar the sky shader keys its base gradient on.
    #[must_use]
    pub fn shader_value(self) -> f64 {
        match self {
            Self::Night => 0.0,
            Self::Dawn => 0.25,
            Self::Day => 0.5,
            Self::Evening => 0.75,
        }
    }
}

/// Coarse lighting bucket relative to sunrise and sunset.
#[must_use]
pub fn time_phase(time_of_day: f64, window: SunWindow) -> TimePhase {
    let hours = time_of_day * 24.0;
    let SunWindow { sunrise, sunset } = window;

    if hours >= sunrise - 1.0 && hours < sunrise + 1.0 {
        TimePhase::Dawn
    } else if hours >= sunset - 1.5 && hours < sunset + 0.5 {
        TimePhase::Evening
    } else if hours >= sunrise + 1.0 && hours < sunset - 1.5 {
        TimePhase::Day
    } else {
        TimePhase::Night
    }
}

/// The numbers every renderer consumes: effect intensities, shader knobs and
/// the categorical condition/phase pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtmosphericState {
    pub noise_frequency: f64,
    pub noise_amplitude: f64,
    pub bloom_intensity: f64,
    pub chromatic_aberration: f64,
    pub grain_intensity: f64,
    pub grain_size: f64,
    pub visual_gravity: f64,
    pub color_temperature: KelvinColor,
    pub weather_condition: WeatherCondition,
    pub time_phase: TimePhase,
    pub rain_intensity: f64,
    pub snow_intensity: f64,
    pub fog_density: f64,
    pub cloud_density: f64,
    pub sun_intensity: f64,
}

impl Default for AtmosphericState {
    fn default() -> Self {
        Self {
            noise_frequency: 1.0,
            noise_amplitude: 0.5,
            bloom_intensity: 0.3,
            chromatic_aberration: 0.005,
            grain_intensity: 0.05,
            grain_size: 1.5,
            visual_gravity: 0.5,
            color_temperature: KelvinColor::from_kelvin(6500.0),
            weather_condition: WeatherCondition::Clear,
            time_phase: TimePhase::Day,
            rain_intensity: 0.0,
            snow_intensity: 0.0,
            fog_density: 0.0,
            cloud_density: 0.3,
            sun_intensity: 0.7,
        }
    }
}

impl AtmosphericState {
    #[must_use]
    pub fn intensities(&self) -> [(&'static str, f64); 5] {
        [
            ("rainIntensity", self.rain_intensity),
            ("snowIntensity", self.snow_intensity),
            ("fogDensity", self.fog_density),
            ("cloudDensity", self.cloud_density),
            ("sunIntensity", self.sun_intensity),
        ]
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct EffectIntensities {
    rain: f64,
    snow: f64,
    fog: f64,
    cloud: f64,
    sun: f64,
}

fn effect_intensities(
    normalized: &NormalizedWeather,
    condition: WeatherCondition,
    phase: TimePhase,
) -> EffectIntensities {
    let mut fx = EffectIntensities {
        cloud: normalized.cloud_cover,
        sun: 1.0 - normalized.cloud_cover,
        ..EffectIntensities::default()
    };

    match condition {
        WeatherCondition::Rain | WeatherCondition::Storm => {
            let floor = if condition == WeatherCondition::Storm {
                STORM_RAIN_FLOOR
            } else {
                RAIN_FLOOR
            };
            fx.rain = floor.max(normalized.precipitation + normalized.storm_intensity * 0.5);
        }
        WeatherCondition::Snow => {
            fx.snow = SNOW_FLOOR.max(normalized.precipitation * 0.8 + 0.2);
        }
        WeatherCondition::Fog => {
            fx.fog = FOG_FLOOR.max(0.4 + normalized.humidity * 0.6);
        }
        WeatherCondition::Clear | WeatherCondition::Cloudy => {}
    }

    match phase {
        TimePhase::Night => {
            fx.sun = 0.0;
            fx.cloud *= 0.7;
        }
        TimePhase::Dawn | TimePhase::Evening => fx.sun *= 0.6,
        TimePhase::Day => {}
    }

    fx
}

#[must_use]
pub fn compose_atmosphere(
    normalized: &NormalizedWeather,
    kelvin: f64,
    weather_code: u8,
    window: SunWindow,
) -> AtmosphericState {
    let weather_condition = classify_condition(weather_code);
    let time_phase = time_phase(normalized.time_of_day, window);
    let fx = effect_intensities(normalized, weather_condition, time_phase);

    AtmosphericState {
        noise_frequency: 0.5 + normalized.wind_speed * 2.0,
        noise_amplitude: 0.3 + normalized.storm_intensity * 0.7,
        bloom_intensity: 0.1 + normalized.humidity * 0.6,
        chromatic_aberration: normalized.storm_intensity * 0.02 + normalized.wind_speed * 0.01,
        grain_intensity: 0.03 + normalized.temperature * 0.05,
        grain_size: if normalized.temperature > 0.5 { 2.0 } else { 1.0 },
        visual_gravity: 1.0 - normalize_value(normalized.pressure, 0.0, 1.0) * 0.5,
        color_temperature: KelvinColor::from_kelvin(kelvin),
        weather_condition,
        time_phase,
        rain_intensity: fx.rain.clamp(0.0, 1.0),
        snow_intensity: fx.snow.clamp(0.0, 1.0),
        fog_density: fx.fog.clamp(0.0, 1.0),
        cloud_density: fx.cloud.clamp(0.0, 1.0),
        sun_intensity: fx.sun.clamp(0.0, 1.0),
    }
}
