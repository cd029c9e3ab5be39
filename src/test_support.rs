use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime, Utc};
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    app::store::{FixedClock, WeatherStore},
    domain::weather::{DailyForecast, ForecastBundle, HourlyForecast, Location, RawWeatherSnapshot},
};

pub(crate) fn parse_time(value: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M").expect("valid time fixture")
}

pub(crate) fn stockholm_location() -> Location {
    Location {
        name: "Stockholm".to_string(),
        latitude: 59.3293,
        longitude: 18.0686,
        country: Some("Sweden".to_string()),
    }
}

pub(crate) fn fixed_store(now: &str) -> WeatherStore {
    WeatherStore::new(
        Arc::new(FixedClock(parse_time(now))),
        Box::new(StdRng::seed_from_u64(17)),
    )
}

pub(crate) fn midsummer_current() -> RawWeatherSnapshot {
    RawWeatherSnapshot {
        temperature: 19.0,
        humidity: 62.0,
        wind_speed: 11.0,
        wind_direction: 225.0,
        pressure: 1011.0,
        cloud_cover: 40.0,
        precipitation: 0.0,
        weather_code: 2,
        is_day: true,
        sunrise: "03:31".to_string(),
        sunset: "22:08".to_string(),
        observation_time: Some("2026-06-21T10:00".to_string()),
    }
}

/// Two days of hours from midnight on 2026-06-21, with a shower at 11:00 each day.
pub(crate) fn midsummer_bundle() -> ForecastBundle {
    let start = parse_time("2026-06-21T00:00");
    let hourly = (0..48)
        .map(|idx| {
            let shower = idx % 24 == 11;
            HourlyForecast {
                time: start + Duration::hours(idx),
                temperature: 14.0 + (idx % 24) as f64 * 0.3,
                weather_code: if shower { 61 } else { 2 },
                precipitation: if shower { 1.2 } else { 0.0 },
                humidity: 65.0,
                wind_speed: 10.0,
                wind_direction: Some(220.0),
                pressure: Some(1010.0),
                cloud_cover: Some(if shower { 90.0 } else { 35.0 }),
                is_day: Some((4..22).contains(&(idx % 24))),
            }
        })
        .collect();

    let first_day = NaiveDate::from_ymd_opt(2026, 6, 21).expect("valid date fixture");
    let daily = (0..8)
        .map(|idx| DailyForecast {
            date: first_day + Duration::days(idx),
            temperature_max: 22.0,
            temperature_min: 12.0,
            weather_code: 2,
            precipitation: 0.0,
            sunrise: "03:31".to_string(),
            sunset: "22:08".to_string(),
        })
        .collect();

    ForecastBundle {
        location: stockholm_location(),
        current: midsummer_current(),
        hourly,
        daily,
        fetched_at: Utc::now(),
    }
}
