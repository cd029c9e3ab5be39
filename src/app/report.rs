use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::{
    app::store::StoreSnapshot,
    domain::{
        atmosphere::{DerivedState, SceneDirective, SolarCycleSummary},
        comfort::ComfortIndex,
        weather::{Location, RawWeatherSnapshot, weather_label},
    },
};

/// Machine-readable view of a store snapshot.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report<'a> {
    pub location: Option<&'a Location>,
    pub label: Option<&'static str>,
    pub raw: Option<&'a RawWeatherSnapshot>,
    pub derived: &'a DerivedState,
    pub scene: SceneDirective,
    pub comfort: ComfortIndex,
    pub solar_cycle: SolarCycleSummary,
    pub active_date: Option<NaiveDate>,
    pub active_hour: Option<NaiveDateTime>,
    pub error: Option<&'a str>,
}

impl<'a> Report<'a> {
    #[must_use]
    pub fn new(snapshot: &'a StoreSnapshot, now: NaiveDateTime) -> Self {
        Self {
            location: snapshot.location.as_ref(),
            label: snapshot
                .raw_weather
                .as_ref()
                .map(|raw| weather_label(raw.weather_code)),
            raw: snapshot.raw_weather.as_ref(),
            derived: &snapshot.derived,
            scene: snapshot.scene(),
            comfort: snapshot.comfort(),
            solar_cycle: snapshot.solar_cycle(now),
            active_date: snapshot.active_date,
            active_hour: snapshot.active_hour,
            error: snapshot.error.as_deref(),
        }
    }
}

pub fn render_json(snapshot: &StoreSnapshot, now: NaiveDateTime) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&Report::new(snapshot, now))
}

fn on_off(strength: f64, shown: bool, uv: [f64; 2]) -> String {
    if shown {
        format!("{strength:.2} at ({:.2}, {:.2})", uv[0], uv[1])
    } else {
        "hidden".to_string()
    }
}

struct TextReport<'a> {
    snapshot: &'a StoreSnapshot,
    now: NaiveDateTime,
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.snapshot;
        if let Some(location) = &snapshot.location {
            writeln!(
                f,
                "{} ({:.4}, {:.4})",
                location.display_name(),
                location.latitude,
                location.longitude
            )?;
        }

        let Some(raw) = &snapshot.raw_weather else {
            if snapshot.is_loading {
                writeln!(f, "Loading weather...")?;
            } else {
                writeln!(f, "No weather data")?;
            }
            return write_error(f, snapshot);
        };

        let derived = &snapshot.derived;
        let atmosphere = &derived.atmosphere;
        let normalized = &derived.normalized;
        let celestial = &derived.celestial;
        let rig = &derived.light_rig;

        writeln!(
            f,
            "{}, {:.1} °C | {} | {}",
            weather_label(raw.weather_code),
            raw.temperature,
            atmosphere.weather_condition.as_str(),
            atmosphere.time_phase.as_str()
        )?;
        if let Some(date) = snapshot.active_date {
            writeln!(f, "Day        {date}")?;
        } else if let Some(observed) = derived.observed_at {
            writeln!(f, "Observed   {}", observed.format("%Y-%m-%d %H:%M"))?;
        }

        let [r, g, b] = atmosphere.color_temperature.rgb;
        writeln!(
            f,
            "Light      {:.0} K rgb({r:.2}, {g:.2}, {b:.2}) golden {:.2} blue {:.2}",
            atmosphere.color_temperature.kelvin, normalized.golden_hour, normalized.blue_hour
        )?;
        writeln!(
            f,
            "Effects    rain {:.2} snow {:.2} fog {:.2} clouds {:.2} sun {:.2}",
            atmosphere.rain_intensity,
            atmosphere.snow_intensity,
            atmosphere.fog_density,
            atmosphere.cloud_density,
            atmosphere.sun_intensity
        )?;
        writeln!(
            f,
            "Sky        sun {} moon {} stars {:.2} ambient {:.2}",
            on_off(celestial.sun_strength, celestial.show_sun, celestial.sun_uv),
            on_off(celestial.moon_strength, celestial.show_moon, celestial.moon_uv),
            rig.star_opacity,
            rig.ambient_light
        )?;

        let scene = snapshot.scene();
        writeln!(
            f,
            "Scene      {} visibility {:.2}{}",
            scene.mode.as_str(),
            scene.visibility,
            if scene.thunder_active { " thunder" } else { "" }
        )?;

        let cycle = snapshot.solar_cycle(self.now);
        if cycle.is_available {
            writeln!(
                f,
                "Daylight   {:.0}% elapsed of {} ({} to {})",
                cycle.sun_progress_percent,
                cycle.daylight_duration_label.as_deref().unwrap_or("--"),
                cycle.sunrise_label,
                cycle.sunset_label
            )?;
        } else {
            writeln!(f, "Daylight   unavailable")?;
        }

        let comfort = snapshot.comfort();
        if let Some(feels) = comfort.feels_like_c {
            writeln!(
                f,
                "Comfort    {}, feels like {feels:.1} °C (score {:.2})",
                comfort.level_label, comfort.score
            )?;
        }

        writeln!(
            f,
            "Mood       {}: {}",
            derived.mood.mood, derived.mood.headline
        )?;
        write_error(f, snapshot)
    }
}

fn write_error(f: &mut fmt::Formatter<'_>, snapshot: &StoreSnapshot) -> fmt::Result {
    match &snapshot.error {
        Some(error) => writeln!(f, "Error      {error}"),
        None => Ok(()),
    }
}

/// Renders the snapshot as plain text, one aspect per line.
#[must_use]
pub fn render_text(snapshot: &StoreSnapshot, now: NaiveDateTime) -> String {
    TextReport { snapshot, now }.to_string()
}
