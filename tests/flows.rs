mod common;

use atmos_engine::{
    app::{
        events::EngineEvent,
        report::render_text,
        state::{EngineSession, FetchTarget},
    },
    data::snapshot::load_snapshot,
    domain::{
        atmosphere::{SceneMode, TimePhase},
        weather::WeatherCondition,
    },
};
use chrono::NaiveDate;
use common::{at, fixed_store, forecast_payload, mount_forecast, session};
use tokio::sync::mpsc;
use wiremock::{Mock, MockServer, ResponseTemplate, matchers::method};

/// Feeds the next `steps` queued events back into the session.
async fn pump(
    session: &mut EngineSession,
    tx: &mpsc::Sender<EngineEvent>,
    rx: &mut mpsc::Receiver<EngineEvent>,
    steps: usize,
) {
    for _ in 0..steps {
        let event = rx.recv().await.expect("event");
        session.handle_event(event, tx).await.expect("handle event");
    }
}

#[tokio::test]
async fn one_shot_fetch_populates_store() {
    let server = MockServer::start().await;
    mount_forecast(&server, forecast_payload(&["2026-06-21", "2026-06-22"])).await;

    let mut session = session(&server, FetchTarget::Current, false);
    session.fetch_once().await.expect("fetch");

    let snapshot = session.store.snapshot();
    assert_eq!(
        snapshot.location.as_ref().map(|l| l.name.as_str()),
        Some("Stockholm")
    );
    assert_eq!(snapshot.hourly_forecast.len(), 24);
    assert_eq!(snapshot.hourly_forecast[0].time, at("2026-06-21T10:00"));
    assert_eq!(snapshot.daily_forecast.len(), 1);
    assert_eq!(
        snapshot.derived.atmosphere.weather_condition,
        WeatherCondition::Cloudy
    );
    assert_eq!(snapshot.derived.atmosphere.time_phase, TimePhase::Day);
    assert_eq!(snapshot.derived.observed_at, Some(at("2026-06-21T10:00")));

    // The hour in progress is dry, so the scene stays clear even though noon brings rain.
    assert_eq!(snapshot.next_hour().map(|h| h.time), Some(at("2026-06-21T10:00")));
    assert_eq!(snapshot.scene().mode, SceneMode::Clear);
}

#[tokio::test]
async fn event_loop_applies_fetched_forecast() {
    let server = MockServer::start().await;
    mount_forecast(&server, forecast_payload(&["2026-06-21", "2026-06-22"])).await;

    let (tx, mut rx) = mpsc::channel(16);
    let mut session = session(&server, FetchTarget::Hour(at("2026-06-22T12:00")), false);
    let mut updates = session.store.subscribe();

    session
        .handle_event(EngineEvent::Bootstrap, &tx)
        .await
        .expect("bootstrap");
    // TickRefresh, then the fetch result.
    pump(&mut session, &tx, &mut rx, 2).await;

    assert!(updates.has_changed().expect("store alive"));
    let snapshot = updates.borrow_and_update().clone();
    assert!(!snapshot.is_loading);
    assert_eq!(snapshot.active_hour, Some(at("2026-06-22T12:00")));
    assert_eq!(
        snapshot.derived.atmosphere.weather_condition,
        WeatherCondition::Rain
    );
    assert!(snapshot.derived.atmosphere.rain_intensity > 0.0);

    session
        .select_hour(at("2026-06-22T09:00"))
        .expect("cached hour");
    assert_eq!(
        session.store.snapshot().derived.atmosphere.weather_condition,
        WeatherCondition::Cloudy
    );
}

#[tokio::test]
async fn date_selection_refetches_whole_day() {
    let server = MockServer::start().await;
    mount_forecast(&server, forecast_payload(&["2026-06-22"])).await;

    let (tx, mut rx) = mpsc::channel(16);
    let mut session = session(&server, FetchTarget::Current, false);
    let date = NaiveDate::from_ymd_opt(2026, 6, 22).expect("date");
    session.select_date(Some(date), &tx).expect("start fetch");
    pump(&mut session, &tx, &mut rx, 1).await;

    let snapshot = session.store.snapshot();
    assert_eq!(snapshot.active_date, Some(date));
    assert_eq!(snapshot.raw_weather.as_ref().map(|r| r.weather_code), Some(61));
    // Whole-day snapshots carry no observation time, so the clock applies.
    assert_eq!(snapshot.derived.observed_at, Some(at("2026-06-21T10:30")));
    assert_eq!(session.target, FetchTarget::Date(date));
}

#[tokio::test]
async fn failed_fetch_surfaces_error_and_keeps_last_data() {
    let server = MockServer::start().await;
    mount_forecast(&server, forecast_payload(&["2026-06-21"])).await;

    let (tx, mut rx) = mpsc::channel(16);
    let mut session = session(&server, FetchTarget::Current, false);
    session.fetch_once().await.expect("first fetch");

    server.reset().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    session
        .handle_event(EngineEvent::TickRefresh, &tx)
        .await
        .expect("tick");
    pump(&mut session, &tx, &mut rx, 1).await;

    let snapshot = session.store.snapshot();
    assert!(
        snapshot
            .error
            .as_deref()
            .is_some_and(|e| e.contains("non-success status"))
    );
    assert!(!snapshot.is_loading);
    assert!(snapshot.raw_weather.is_some());

    let text = render_text(&snapshot, session.store.now());
    assert!(text.contains("Error      forecast request returned non-success status"));
}

#[test]
fn snapshot_file_derives_without_network() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("night.json");
    std::fs::write(
        &path,
        r#"{
            "temperature": -4.0,
            "humidity": 80,
            "windSpeed": 6,
            "windDirection": 10,
            "pressure": 1024,
            "cloudCover": 5,
            "precipitation": 0,
            "weatherCode": 0,
            "isDay": false,
            "sunrise": "08:40",
            "sunset": "15:50",
            "observationTime": "2026-12-21T23:10"
        }"#,
    )
    .expect("write snapshot");

    let mut store = fixed_store("2026-12-21T12:00");
    store.set_weather_data(load_snapshot(&path).expect("load"));

    let snapshot = store.snapshot();
    assert_eq!(snapshot.derived.atmosphere.time_phase, TimePhase::Night);
    assert!(snapshot.derived.celestial.show_moon);
    assert!(!snapshot.derived.celestial.show_sun);
    assert_eq!(snapshot.derived.mood.mood, "tranquil");
    assert!(render_text(&snapshot, store.now()).contains("moon 0."));
}
