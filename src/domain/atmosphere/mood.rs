use rand::Rng;
use serde::{Deserialize, Serialize};

use super::normalize::NormalizedWeather;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodCategory {
    Storm,
    Rain,
    Cloudy,
    Sunny,
    Snow,
    Fog,
    Windy,
    ClearNight,
}

impl MoodCategory {
    pub const ALL: [Self; 8] = [
        Self::Storm,
        Self::Rain,
        Self::Cloudy,
        Self::Sunny,
        Self::Snow,
        Self::Fog,
        Self::Windy,
        Self::ClearNight,
    ];

    #[must_use]
    pub fn mood(self) -> &'static str {
        match self {
            Self::Storm => "dramatic",
            Self::Rain => "contemplative",
            Self::Cloudy => "serene",
            Self::Sunny => "energetic",
            Self::Snow => "peaceful",
            Self::Fog => "mysterious",
            Self::Windy => "restless",
            Self::ClearNight => "tranquil",
        }
    }

    #[must_use]
    pub fn headlines(self) -> &'static [&'static str] {
        match self {
            Self::Storm => &[
                "The sky speaks in thunder",
                "Electric atmosphere",
                "Nature's symphony unfolds",
            ],
            Self::Rain => &[
                "A day for dreaming",
                "Let the rain compose",
                "Rhythm of the clouds",
            ],
            Self::Cloudy => &[
                "Soft light embraces",
                "Gentle grey canvas",
                "Whispers of change",
            ],
            Self::Sunny => &[
                "Charged with energy",
                "Golden possibilities",
                "Radiant momentum",
            ],
            Self::Snow => &[
                "Silence falls softly",
                "Crystal stillness",
                "Winter's gentle touch",
            ],
            Self::Fog => &["Veiled in mystery", "Between worlds", "The unseen beckons"],
            Self::Windy => &[
                "Winds of change",
                "Untamed currents",
                "Movement in the air",
            ],
            Self::ClearNight => &["Stars illuminate", "Cosmic stillness", "Night's embrace"],
        }
    }
}

/// Short mood label plus one headline drawn from its category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoodState {
    pub category: Option<MoodCategory>,
    pub mood: &'static str,
    pub headline: &'static str,
}

impl Default for MoodState {
    fn default() -> Self {
        Self {
            category: None,
            mood: "serene",
            headline: "Atmospheric intelligence",
        }
    }
}

/// First matching rule wins. The snow/rain/fog bands here are keyed on the raw
/// code and are slightly wider than the condition classifier's.
#[must_use]
pub fn classify_mood(normalized: &NormalizedWeather, weather_code: u8) -> MoodCategory {
    if normalized.storm_intensity > 0.7 {
        MoodCategory::Storm
    } else if (70..80).contains(&weather_code) {
        MoodCategory::Snow
    } else if (50..70).contains(&weather_code) {
        MoodCategory::Rain
    } else if (40..50).contains(&weather_code) {
        MoodCategory::Fog
    } else if normalized.wind_speed > 0.6 {
        MoodCategory::Windy
    } else if normalized.cloud_cover > 0.6 {
        MoodCategory::Cloudy
    } else if normalized.time_of_day < 0.25 || normalized.time_of_day > 0.85 {
        MoodCategory::ClearNight
    } else {
        MoodCategory::Sunny
    }
}

#[must_use]
pub fn select_mood<R: Rng + ?Sized>(
    normalized: &NormalizedWeather,
    weather_code: u8,
    rng: &mut R,
) -> MoodState {
    let category = classify_mood(normalized, weather_code);
    let headlines = category.headlines();
    MoodState {
        category: Some(category),
        mood: category.mood(),
        headline: headlines[rng.random_range(0..headlines.len())],
    }
}
