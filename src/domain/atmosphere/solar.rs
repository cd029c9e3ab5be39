#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]

use std::f64::consts::PI;

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::weather::{RawWeatherSnapshot, SunWindow, clock_hours, parse_clock_hour};

pub const GOLDEN_HOUR_SPAN: f64 = 1.0;
pub const BLUE_HOUR_SPAN: f64 = 0.5;
pub const NIGHT_KELVIN: f64 = 4000.0;
pub const MIN_KELVIN: f64 = 2500.0;
pub const MAX_KELVIN: f64 = 10_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolarClockResult {
    pub time_of_day: f64,
    pub golden_hour: f64,
    pub blue_hour: f64,
    pub kelvin: f64,
}

/// Which of the six consecutive windows of the day an hour falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolarWindow {
    MorningBlue,
    MorningGolden,
    Midday,
    EveningGolden,
    EveningBlue,
    Night,
}

#[must_use]
pub fn solar_window(window: SunWindow, hours: f64) -> SolarWindow {
    let SunWindow { sunrise, sunset } = window;
    if !window.is_well_formed() {
        return SolarWindow::Night;
    }

    if hours >= sunrise - BLUE_HOUR_SPAN && hours < sunrise {
        SolarWindow::MorningBlue
    } else if hours >= sunrise && hours < sunrise + GOLDEN_HOUR_SPAN {
        SolarWindow::MorningGolden
    } else if hours >= sunrise + GOLDEN_HOUR_SPAN && hours < sunset - GOLDEN_HOUR_SPAN {
        SolarWindow::Midday
    } else if hours >= sunset - GOLDEN_HOUR_SPAN && hours < sunset {
        SolarWindow::EveningGolden
    } else if hours >= sunset && hours < sunset + BLUE_HOUR_SPAN {
        SolarWindow::EveningBlue
    } else {
        SolarWindow::Night
    }
}

/// Tent function: 1 at `peak`, falling linearly to 0 at `peak ± half_width`.
fn tent(hours: f64, peak: f64, half_width: f64) -> f64 {
    (1.0 - (hours - peak).abs() / half_width).max(0.0)
}

fn golden_kelvin(intensity: f64) -> f64 {
    MIN_KELVIN + (1.0 - intensity) * 2000.0
}

fn blue_kelvin(intensity: f64) -> f64 {
    9000.0 + intensity * 1000.0
}

#[must_use]
pub fn compute_solar_clock(window: SunWindow, observed: NaiveDateTime) -> SolarClockResult {
    let hours = clock_hours(observed);
    let time_of_day = hours / 24.0;
    let SunWindow { sunrise, sunset } = window;

    let mut golden_hour = 0.0;
    let mut blue_hour = 0.0;
    let kelvin = match solar_window(window, hours) {
        SolarWindow::MorningBlue => {
            blue_hour = tent(hours, sunrise - BLUE_HOUR_SPAN / 2.0, BLUE_HOUR_SPAN / 2.0);
            blue_kelvin(blue_hour)
        }
        SolarWindow::MorningGolden => {
            golden_hour = tent(hours, sunrise + GOLDEN_HOUR_SPAN / 2.0, GOLDEN_HOUR_SPAN / 2.0);
            golden_kelvin(golden_hour)
        }
        SolarWindow::Midday => 5500.0 + ((hours - 12.0) * PI / 12.0).sin() * 500.0,
        SolarWindow::EveningGolden => {
            golden_hour = tent(hours, sunset - GOLDEN_HOUR_SPAN / 2.0, GOLDEN_HOUR_SPAN / 2.0);
            golden_kelvin(golden_hour)
        }
        SolarWindow::EveningBlue => {
            blue_hour = tent(hours, sunset + BLUE_HOUR_SPAN / 2.0, BLUE_HOUR_SPAN / 2.0);
            blue_kelvin(blue_hour)
        }
        SolarWindow::Night => NIGHT_KELVIN,
    };

    SolarClockResult {
        time_of_day,
        golden_hour,
        blue_hour,
        kelvin,
    }
}

/// Daylight progress figures for a sunrise-to-sunset progress bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolarCycleSummary {
    pub is_available: bool,
    pub sun_progress_percent: f64,
    pub remaining_light_percent: f64,
    pub daylight_duration_label: Option<String>,
    pub sunrise_label: String,
    pub sunset_label: String,
    pub now_label: String,
}

impl SolarCycleSummary {
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            is_available: false,
            sun_progress_percent: 0.0,
            remaining_light_percent: 100.0,
            daylight_duration_label: None,
            sunrise_label: "--:--".to_string(),
            sunset_label: "--:--".to_string(),
            now_label: "--:--".to_string(),
        }
    }
}

fn format_solar_time(value: &str) -> String {
    let mut parts = value.split(':');
    let hours = parts.next().filter(|s| !s.is_empty()).unwrap_or("--");
    let minutes = parts.next().filter(|s| !s.is_empty()).unwrap_or("--");
    format!("{hours:0>2}:{minutes:0>2}")
}

fn at_clock(reference: NaiveDateTime, value: &str) -> Option<NaiveDateTime> {
    let hours = parse_clock_hour(value)?;
    let minutes = (hours * 60.0).round() as u32;
    let time = NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)?;
    Some(reference.date().and_time(time))
}

#[must_use]
pub fn summarize_solar_cycle(raw: &RawWeatherSnapshot, now: NaiveDateTime) -> SolarCycleSummary {
    let sunrise = at_clock(now, &raw.sunrise);
    let sunset = at_clock(now, &raw.sunset);

    let mut daylight_percent = 0.0;
    let mut daylight_duration_label = None;
    if let (Some(rise), Some(set)) = (sunrise, sunset)
        && set > rise
    {
        let total = (set - rise).num_seconds() as f64;
        let elapsed = ((now - rise).num_seconds() as f64).clamp(0.0, total);
        daylight_percent = elapsed / total * 100.0;
        let minutes = (total / 60.0).round() as i64;
        daylight_duration_label = Some(format!("{}h {:02}m", minutes / 60, minutes % 60));
    }

    let sun_progress_percent = daylight_percent.clamp(0.0, 100.0);
    SolarCycleSummary {
        is_available: sunrise.is_some() && sunset.is_some(),
        sun_progress_percent,
        remaining_light_percent: (100.0 - sun_progress_percent).max(0.0),
        daylight_duration_label,
        sunrise_label: format_solar_time(&raw.sunrise),
        sunset_label: format_solar_time(&raw.sunset),
        now_label: now.format("%I:%M %p").to_string(),
    }
}
