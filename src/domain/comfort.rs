//! Thermal comfort estimate for the current observation: an apparent
//! temperature, a six-step comfort level and the advice shown alongside it.

use serde::{Deserialize, Serialize};

use crate::domain::weather::RawWeatherSnapshot;

const IDEAL_C: f64 = 22.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComfortLevel {
    Frigid,
    Cold,
    Cool,
    Comfortable,
    Warm,
    Oppressive,
}

impl ComfortLevel {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Frigid => "Biting cold",
            Self::Cold => "Chilly",
            Self::Cool => "Cool & breezy",
            Self::Comfortable => "Comfortable",
            Self::Warm => "Warm",
            Self::Oppressive => "Oppressive heat",
        }
    }

    fn summary(self, humidity: f64) -> &'static str {
        let muggy = humidity > 65.0;
        match self {
            Self::Frigid => "Biting cold and heightened frost risk.",
            Self::Cold => "Chilly air that cools the skin quickly.",
            Self::Cool => "Fresh breeze; light layers keep you comfortable.",
            Self::Comfortable => "Balanced air with minimal thermal stress.",
            Self::Warm if muggy => "Warm and muggy; heat sticks to the skin.",
            Self::Warm => "Warm sunshine with a mild edge.",
            Self::Oppressive if muggy => "Heavy, humid air slows heat relief.",
            Self::Oppressive => "Intense heat; body struggles to cool down.",
        }
    }

    fn recommendations(self, humidity: f64) -> &'static [&'static str] {
        match self {
            Self::Frigid => &[
                "Layer thermal fabrics",
                "Protect ears and hands",
                "Limit outdoor exposure",
            ],
            Self::Cold => &["Add an insulating mid-layer", "Cover head and neck"],
            Self::Cool => &[
                "Carry a light jacket",
                "Use breathable but wind-blocking fabrics",
            ],
            Self::Comfortable => &[
                "Conditions feel balanced",
                "Stay hydrated and enjoy the day",
            ],
            Self::Warm if humidity > 65.0 => &[
                "Prefer moisture-wicking fabrics",
                "Stay hydrated frequently",
            ],
            Self::Warm => &["Choose breathable cotton or linen", "Keep water handy"],
            Self::Oppressive => &[
                "Avoid strenuous activity outdoors",
                "Seek shade and hydrate continually",
            ],
        }
    }
}

/// Bands on the apparent temperature. Humid air tips the warm band into
/// oppressive.
#[must_use]
pub fn classify_comfort(apparent_c: f64, humidity: f64) -> ComfortLevel {
    if apparent_c <= -5.0 {
        ComfortLevel::Frigid
    } else if apparent_c <= 8.0 {
        ComfortLevel::Cold
    } else if apparent_c <= 17.0 {
        ComfortLevel::Cool
    } else if apparent_c <= 27.0 {
        ComfortLevel::Comfortable
    } else if apparent_c <= 32.0 && humidity <= 70.0 {
        ComfortLevel::Warm
    } else {
        ComfortLevel::Oppressive
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComfortDriver {
    pub label: String,
    pub detail: String,
}

impl ComfortDriver {
    fn new(label: &str, detail: &str) -> Self {
        Self {
            label: label.to_string(),
            detail: detail.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComfortIndex {
    pub is_available: bool,
    pub level: ComfortLevel,
    pub level_label: String,
    pub summary: String,
    pub feels_like_c: Option<f64>,
    /// 0 is uncomfortable, 1 ideal.
    pub score: f64,
    pub recommendations: Vec<String>,
    pub drivers: Vec<ComfortDriver>,
}

impl ComfortIndex {
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            is_available: false,
            level: ComfortLevel::Comfortable,
            level_label: "Comfort unavailable".to_string(),
            summary: "No weather data to estimate comfort.".to_string(),
            feels_like_c: None,
            score: 0.5,
            recommendations: vec!["Check back once data loads".to_string()],
            drivers: vec![ComfortDriver::new(
                "Thermal load",
                "Waiting for live observations.",
            )],
        }
    }
}

fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

fn fahrenheit_to_celsius(f: f64) -> f64 {
    (f - 32.0) * 5.0 / 9.0
}

/// Rothfusz regression of the NWS heat index, in °C.
#[must_use]
pub fn heat_index(temp_c: f64, humidity: f64) -> f64 {
    let t = celsius_to_fahrenheit(temp_c);
    let rh = humidity;
    let hi = -42.379 + 2.049_015_23 * t + 10.143_331_27 * rh
        - 0.224_755_41 * t * rh
        - 0.006_837_83 * t * t
        - 0.054_817_17 * rh * rh
        + 0.001_228_74 * t * t * rh
        + 0.000_852_82 * t * rh * rh
        - 0.000_001_99 * t * t * rh * rh;
    fahrenheit_to_celsius(hi)
}

/// NWS wind chill, in °C. `wind_kmh` is converted to mph internally.
#[must_use]
pub fn wind_chill(temp_c: f64, wind_kmh: f64) -> f64 {
    let t = celsius_to_fahrenheit(temp_c);
    let v = (wind_kmh / 1.609).powf(0.16);
    fahrenheit_to_celsius(35.74 + 0.6215 * t - 35.75 * v + 0.4275 * t * v)
}

#[must_use]
pub fn feels_like(temperature: f64, humidity: f64, wind_speed: f64) -> f64 {
    if temperature >= 27.0 && humidity >= 40.0 {
        heat_index(temperature, humidity)
    } else if temperature <= 10.0 && wind_speed >= 8.0 {
        wind_chill(temperature, wind_speed)
    } else {
        temperature
    }
}

fn comfort_score(feels_like: f64, humidity: f64, wind_speed: f64) -> f64 {
    let temp_penalty = (feels_like - IDEAL_C).abs() / IDEAL_C;
    let humidity_penalty = ((humidity - 60.0) / 50.0).max(0.0);
    let wind_penalty = ((wind_speed - 25.0) / 40.0).max(0.0);
    (1.0 - (temp_penalty * 0.6 + humidity_penalty * 0.25 + wind_penalty * 0.15)).clamp(0.0, 1.0)
}

fn thermal_load(feels_like: f64) -> &'static str {
    let delta = feels_like - IDEAL_C;
    if delta <= -10.0 {
        "Air pulls heat rapidly; limit exposure."
    } else if delta <= -4.0 {
        "Noticeable chill without proper layers."
    } else if delta <= 4.0 {
        "Close to ideal metabolic range."
    } else if delta <= 8.0 {
        "Body warms faster, seek shade periodically."
    } else {
        "High heat load; cool-down breaks are essential."
    }
}

fn humidity_effect(humidity: f64) -> &'static str {
    if humidity >= 80.0 {
        "Moist air blocks sweat evaporation."
    } else if humidity >= 60.0 {
        "Humidity slightly slows cooling."
    } else if humidity >= 35.0 {
        "Moisture balance feels neutral."
    } else {
        "Dry air accelerates skin dehydration."
    }
}

fn wind_relief(wind_speed: f64) -> &'static str {
    if wind_speed >= 35.0 {
        "Strong gusts amplify cooling sharply."
    } else if wind_speed >= 18.0 {
        "Steady breeze helps vent excess heat."
    } else if wind_speed >= 8.0 {
        "Light breeze offers mild relief."
    } else {
        "Still air can feel stagnant."
    }
}

/// Rounds to one decimal, halves toward positive infinity.
fn round_tenth(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}

#[must_use]
pub fn comfort_index(raw: &RawWeatherSnapshot) -> ComfortIndex {
    let RawWeatherSnapshot {
        temperature,
        humidity,
        wind_speed,
        ..
    } = *raw;
    let apparent = feels_like(temperature, humidity, wind_speed);
    let level = classify_comfort(apparent, humidity);

    ComfortIndex {
        is_available: true,
        level,
        level_label: level.label().to_string(),
        summary: level.summary(humidity).to_string(),
        feels_like_c: Some(round_tenth(apparent)),
        score: comfort_score(apparent, humidity, wind_speed),
        recommendations: level
            .recommendations(humidity)
            .iter()
            .map(ToString::to_string)
            .collect(),
        drivers: vec![
            ComfortDriver::new("Thermal load", thermal_load(apparent)),
            ComfortDriver::new("Humidity effect", humidity_effect(humidity)),
            ComfortDriver::new("Wind relief", wind_relief(wind_speed)),
        ],
    }
}
