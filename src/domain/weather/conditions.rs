use serde::{Deserialize, Serialize};

/// Coarse condition category driving which weather effects a scene shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherCondition {
    Clear,
    Cloudy,
    Rain,
    Snow,
    Storm,
    Fog,
}

impl WeatherCondition {
    pub const ALL: [Self; 6] = [
        Self::Clear,
        Self::Cloudy,
        Self::Rain,
        Self::Snow,
        Self::Storm,
        Self::Fog,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Cloudy => "cloudy",
            Self::Rain => "rain",
            Self::Snow => "snow",
            Self::Storm => "storm",
            Self::Fog => "fog",
        }
    }

    #[must_use]
    pub fn is_precipitating(self) -> bool {
        matches!(self, Self::Rain | Self::Storm | Self::Snow)
    }
}

/// Total over every code: values outside the documented WMO set fall through to
/// the nearest threshold band instead of being rejected.
#[must_use]
pub fn classify_condition(code: u8) -> WeatherCondition {
    match code {
        95..=u8::MAX => WeatherCondition::Storm,
        71..=79 => WeatherCondition::Snow,
        51..=70 => WeatherCondition::Rain,
        40..=49 => WeatherCondition::Fog,
        2..=39 => WeatherCondition::Cloudy,
        _ => WeatherCondition::Clear,
    }
}

#[must_use]
pub fn storm_intensity(code: u8) -> f64 {
    STORM_STEPS
        .iter()
        .find_map(|&(threshold, intensity)| (code >= threshold).then_some(intensity))
        .unwrap_or(0.0)
}

const STORM_STEPS: &[(u8, f64)] = &[
    (95, 1.0),
    (80, 0.7),
    (70, 0.5),
    (60, 0.4),
    (50, 0.2),
    (40, 0.15),
    (3, 0.05),
];

#[must_use]
pub fn weather_label(code: u8) -> &'static str {
    WEATHER_LABELS
        .iter()
        .find_map(|(candidate, label)| (*candidate == code).then_some(*label))
        .unwrap_or("Unknown")
}

const WEATHER_LABELS: &[(u8, &str)] = &[
    (0, "Clear sky"),
    (1, "Mainly clear"),
    (2, "Partly cloudy"),
    (3, "Overcast"),
    (45, "Fog"),
    (48, "Depositing rime fog"),
    (51, "Light drizzle"),
    (53, "Moderate drizzle"),
    (55, "Dense drizzle"),
    (56, "Light freezing drizzle"),
    (57, "Dense freezing drizzle"),
    (61, "Slight rain"),
    (63, "Moderate rain"),
    (65, "Heavy rain"),
    (66, "Light freezing rain"),
    (67, "Heavy freezing rain"),
    (71, "Slight snowfall"),
    (73, "Moderate snowfall"),
    (75, "Heavy snowfall"),
    (77, "Snow grains"),
    (80, "Slight rain showers"),
    (81, "Moderate rain showers"),
    (82, "Violent rain showers"),
    (85, "Slight snow showers"),
    (86, "Heavy snow showers"),
    (95, "Thunderstorm"),
    (96, "Thunderstorm + light hail"),
    (99, "Thunderstorm + heavy hail"),
];
