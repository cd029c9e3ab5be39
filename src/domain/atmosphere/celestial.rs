use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::domain::weather::{SunWindow, WeatherCondition};

pub const SUN_ARC_ANCHOR: [f64; 2] = [0.5, 0.55];
pub const SUN_ARC_RADIUS: f64 = 0.38;
pub const MOON_ARC_ANCHOR: [f64; 2] = [0.5, 0.6];
pub const MOON_ARC_RADIUS: f64 = 0.32;

/// Sun stays visible through cloud while the composed sun intensity is above
/// this, or the cloud cover below [`SUN_CLOUD_CEILING`].
pub const SUN_VISIBLE_INTENSITY: f64 = 0.18;
pub const SUN_CLOUD_CEILING: f64 = 0.6;

const TWILIGHT_WINDOW_HOURS: f64 = 1.2;

/// Visibility, strength and screen position of the sun and moon actors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CelestialState {
    pub show_sun: bool,
    pub sun_strength: f64,
    pub sun_uv: [f64; 2],
    pub show_moon: bool,
    pub moon_strength: f64,
    pub moon_uv: [f64; 2],
}

impl Default for CelestialState {
    fn default() -> Self {
        compute_celestial_state(SunWindow::default(), 12.0, WeatherCondition::Clear, 0.7, 0.3)
    }
}

/// Light intensities for the scene's directional and ambient lights, plus the
/// starfield opacity the renderer eases toward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightRig {
    pub sun_light: f64,
    pub moon_light: f64,
    pub ambient_light: f64,
    pub star_opacity: f64,
}

impl Default for LightRig {
    fn default() -> Self {
        compute_light_rig(SunWindow::default(), 12.0, 0.7)
    }
}

/// Day/night partition shared by the celestial and lighting derivations.
#[derive(Debug, Clone, Copy)]
struct Arcs {
    is_daylight: bool,
    day_progress: f64,
    night_progress: f64,
    sun_arc: f64,
    moon_arc: f64,
}

impl Arcs {
    fn new(window: SunWindow, now_hour: f64) -> Self {
        let SunWindow { sunrise, sunset } = window;
        let daylight_span = (sunset - sunrise).max(1.0);
        let is_daylight = now_hour >= sunrise && now_hour < sunset;
        let day_progress = ((now_hour - sunrise) / daylight_span).clamp(0.0, 1.0);

        let night_duration = 24.0 - daylight_span;
        let night_progress = if !is_daylight && night_duration > 0.0 {
            let elapsed = if now_hour >= sunset {
                now_hour - sunset
            } else {
                now_hour + (24.0 - sunset)
            };
            (elapsed / night_duration).clamp(0.0, 1.0)
        } else {
            0.0
        };

        Self {
            is_daylight,
            day_progress,
            night_progress,
            sun_arc: if is_daylight {
                (day_progress * PI).sin().max(0.0)
            } else {
                0.0
            },
            moon_arc: if is_daylight {
                0.0
            } else {
                (night_progress * PI).sin().max(0.0)
            },
        }
    }
}

/// Point on a semicircle swept from 90° down to -90° as `progress` goes 0 → 1.
/// Screen space grows downward, hence the negated sine.
#[must_use]
pub fn arc_uv(anchor: [f64; 2], radius: f64, progress: f64) -> [f64; 2] {
    let angle = (90.0 - progress * 180.0).to_radians();
    [
        (anchor[0] + radius * angle.cos()).clamp(0.0, 1.0),
        (anchor[1] - radius * angle.sin()).clamp(0.0, 1.0),
    ]
}

#[must_use]
pub fn compute_celestial_state(
    window: SunWindow,
    now_hour: f64,
    condition: WeatherCondition,
    sun_intensity: f64,
    cloud_cover: f64,
) -> CelestialState {
    let arcs = Arcs::new(window, now_hour);
    let sun_breaks_through = condition == WeatherCondition::Clear
        || sun_intensity > SUN_VISIBLE_INTENSITY
        || cloud_cover < SUN_CLOUD_CEILING;

    // The moon is never cloud-gated.
    CelestialState {
        show_sun: arcs.is_daylight && sun_breaks_through,
        sun_strength: arcs.sun_arc,
        sun_uv: arc_uv(SUN_ARC_ANCHOR, SUN_ARC_RADIUS, arcs.day_progress),
        show_moon: !arcs.is_daylight,
        moon_strength: arcs.moon_arc,
        moon_uv: arc_uv(MOON_ARC_ANCHOR, MOON_ARC_RADIUS, arcs.night_progress),
    }
}

fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

#[must_use]
pub fn compute_light_rig(window: SunWindow, now_hour: f64, sun_intensity: f64) -> LightRig {
    let arcs = Arcs::new(window, now_hour);

    if arcs.is_daylight {
        return LightRig {
            sun_light: (lerp(0.15, 1.3, arcs.sun_arc) * (0.4 + sun_intensity * 0.8))
                .clamp(0.0, 1.0),
            moon_light: 0.0,
            ambient_light: lerp(0.2, 0.6, arcs.sun_arc),
            star_opacity: 0.0,
        };
    }

    let SunWindow { sunrise, sunset } = window;
    let to_sunrise = (now_hour - sunrise)
        .abs()
        .min((now_hour - (sunrise + 24.0)).abs());
    let to_sunset = (now_hour - sunset).abs().min((now_hour - (sunset - 24.0)).abs());
    let closest_edge = to_sunrise.min(to_sunset);
    let visibility = (closest_edge / TWILIGHT_WINDOW_HOURS)
        .clamp(0.0, 1.0)
        .powf(1.4);

    LightRig {
        sun_light: 0.0,
        moon_light: lerp(0.05, 0.35, arcs.moon_arc),
        ambient_light: lerp(0.04, 0.22, arcs.moon_arc + 0.05),
        star_opacity: (visibility * (0.2 + arcs.moon_arc * 0.45)).clamp(0.0, 1.0),
    }
}
