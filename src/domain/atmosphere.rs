//! Derivation pipeline from a raw weather snapshot to everything the sky
//! renderer and the text surfaces read.
//!
//! All functions here are pure: the observation instant and the headline RNG
//! are passed in, nothing reads the system clock.

use chrono::NaiveDateTime;
use rand::Rng;
use serde::Serialize;

mod celestial;
mod color;
mod compose;
mod mood;
mod normalize;
mod scene;
mod solar;


pub use celestial::{
    CelestialState, LightRig, MOON_ARC_ANCHOR, MOON_ARC_RADIUS, SUN_ARC_ANCHOR, SUN_ARC_RADIUS,
    SUN_CLOUD_CEILING, SUN_VISIBLE_INTENSITY, arc_uv, compute_celestial_state, compute_light_rig,
};
pub use color::{KelvinColor, kelvin_to_rgb};
pub use compose::{AtmosphericState, TimePhase, compose_atmosphere, time_phase};
pub use mood::{MoodCategory, MoodState, classify_mood, select_mood};
pub use normalize::{NormalizedWeather, normalize_snapshot, normalize_value};
pub use scene::{SceneDirective, SceneMode, direct_scene};
pub use solar::{
    BLUE_HOUR_SPAN, GOLDEN_HOUR_SPAN, MAX_KELVIN, MIN_KELVIN, NIGHT_KELVIN, SolarClockResult,
    SolarCycleSummary, SolarWindow, compute_solar_clock, solar_window, summarize_solar_cycle,
};

use crate::domain::weather::{RawWeatherSnapshot, precise_clock_hours};

/// Everything derived from one snapshot. Replaced as a whole on every update.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedState {
    pub normalized: NormalizedWeather,
    pub atmosphere: AtmosphericState,
    pub celestial: CelestialState,
    pub light_rig: LightRig,
    pub mood: MoodState,
    pub observed_at: Option<NaiveDateTime>,
}

impl Default for DerivedState {
    fn default() -> Self {
        Self {
            normalized: NormalizedWeather::default(),
            atmosphere: AtmosphericState::default(),
            celestial: CelestialState::default(),
            light_rig: LightRig::default(),
            mood: MoodState::default(),
            observed_at: None,
        }
    }
}

/// Runs the full derivation for `raw`. `fallback_now` stands in for the
/// observation instant when the snapshot has none.
pub fn derive<R: Rng + ?Sized>(
    raw: &RawWeatherSnapshot,
    fallback_now: NaiveDateTime,
    rng: &mut R,
) -> DerivedState {
    let observed_at = raw.observation_instant(fallback_now);
    let window = raw.sun_window();

    let solar = compute_solar_clock(window, observed_at);
    let normalized = normalize_snapshot(raw, &solar);
    let atmosphere = compose_atmosphere(&normalized, solar.kelvin, raw.weather_code, window);

    let now_hour = precise_clock_hours(observed_at);
    let celestial = compute_celestial_state(
        window,
        now_hour,
        atmosphere.weather_condition,
        atmosphere.sun_intensity,
        normalized.cloud_cover,
    );
    let light_rig = compute_light_rig(window, now_hour, atmosphere.sun_intensity);
    let mood = select_mood(&normalized, raw.weather_code, rng);

    tracing::debug!(
        condition = atmosphere.weather_condition.as_str(),
        phase = atmosphere.time_phase.as_str(),
        kelvin = solar.kelvin,
        mood = mood.mood,
        "derived atmosphere"
    );

    DerivedState {
        normalized,
        atmosphere,
        celestial,
        light_rig,
        mood,
        observed_at: Some(observed_at),
    }
}
