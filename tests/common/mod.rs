#![allow(dead_code)]

use std::sync::Arc;

use atmos_engine::{
    app::{
        settings::EngineSettings,
        state::{EngineSession, FetchTarget},
        store::{FixedClock, WeatherStore},
    },
    data::forecast::ForecastClient,
    domain::weather::Location,
};
use chrono::NaiveDateTime;
use rand::{SeedableRng, rngs::StdRng};
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

pub const FORECAST_PATH: &str = "/v1/forecast";

pub fn at(value: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M").expect("fixture time")
}

pub fn stockholm_location() -> Location {
    Location {
        name: "Stockholm".to_string(),
        latitude: 59.3293,
        longitude: 18.0686,
        country: Some("Sweden".to_string()),
    }
}

pub fn fixed_store(now: &str) -> WeatherStore {
    WeatherStore::new(
        Arc::new(FixedClock(at(now))),
        Box::new(StdRng::seed_from_u64(5)),
    )
}

pub fn session(server: &MockServer, target: FetchTarget, watch: bool) -> EngineSession {
    let settings = EngineSettings {
        location: Some(stockholm_location()),
        ..EngineSettings::default()
    };
    EngineSession::new(
        fixed_store("2026-06-21T10:30"),
        settings,
        ForecastClient::with_base_url(format!("{}{FORECAST_PATH}", server.uri())),
        target,
        watch,
    )
}

/// Open-Meteo shaped payload covering `days`, current conditions at 10:00 on
/// the first day and a shower at noon every day.
pub fn forecast_payload(days: &[&str]) -> Value {
    let mut time = Vec::new();
    let mut temperature = Vec::new();
    let mut code = Vec::new();
    let mut precipitation = Vec::new();
    let mut is_day = Vec::new();
    for day in days {
        for hour in 0..24u8 {
            time.push(format!("{day}T{hour:02}:00"));
            temperature.push(12.0 + f64::from(hour) * 0.25);
            code.push(if hour == 12 { 61 } else { 3 });
            precipitation.push(if hour == 12 { 0.8 } else { 0.0 });
            is_day.push(u8::from((4..22).contains(&hour)));
        }
    }
    let n = time.len();

    json!({
        "latitude": 59.33,
        "longitude": 18.07,
        "timezone": "Europe/Stockholm",
        "current": {
            "time": format!("{}T10:00", days[0]),
            "temperature_2m": 15.5,
            "relative_humidity_2m": 68.0,
            "wind_speed_10m": 12.0,
            "wind_direction_10m": 210.0,
            "surface_pressure": 1009.0,
            "cloud_cover": 75.0,
            "precipitation": 0.0,
            "weather_code": 3,
            "is_day": 1
        },
        "hourly": {
            "time": time,
            "temperature_2m": temperature,
            "weather_code": code,
            "precipitation": precipitation,
            "relative_humidity_2m": vec![70.0; n],
            "wind_speed_10m": vec![14.0; n],
            "wind_direction_10m": vec![200.0; n],
            "surface_pressure": vec![1008.0; n],
            "cloud_cover": vec![80.0; n],
            "is_day": is_day
        },
        "daily": {
            "time": days,
            "temperature_2m_max": vec![18.0; days.len()],
            "temperature_2m_min": vec![9.0; days.len()],
            "weather_code": vec![61; days.len()],
            "precipitation_sum": vec![4.2; days.len()],
            "sunrise": days.iter().map(|d| format!("{d}T03:31")).collect::<Vec<_>>(),
            "sunset": days.iter().map(|d| format!("{d}T22:08")).collect::<Vec<_>>()
        }
    })
}

pub async fn mount_forecast(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}
