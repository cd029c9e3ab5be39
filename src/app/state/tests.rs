use std::time::Duration;

use tokio::sync::mpsc;

use super::*;
use crate::{
    app::settings::EngineSettings,
    test_support::{fixed_store, midsummer_bundle, parse_time, stockholm_location},
};

const UNREACHABLE: &str = "http://127.0.0.1:9/v1/forecast";

fn session(target: FetchTarget, watch: bool) -> EngineSession {
    let settings = EngineSettings {
        location: Some(stockholm_location()),
        ..EngineSettings::default()
    };
    EngineSession::new(
        fixed_store("2026-06-21T10:30"),
        settings,
        ForecastClient::with_base_url(UNREACHABLE),
        target,
        watch,
    )
}

#[test]
fn forecast_payload_fills_location_and_windows() {
    let mut session = session(FetchTarget::Current, false);
    session.apply_payload(FetchPayload::Forecast(midsummer_bundle()));

    let snapshot = session.store.snapshot();
    assert_eq!(
        snapshot.location.as_ref().map(|l| l.name.as_str()),
        Some("Stockholm")
    );
    assert_eq!(snapshot.hourly_forecast.len(), HOURLY_WINDOW);
    assert_eq!(
        snapshot.hourly_forecast.first().map(|h| h.time),
        Some(parse_time("2026-06-21T10:00"))
    );
    assert_eq!(snapshot.daily_forecast.len(), DAILY_WINDOW);
    assert_eq!(
        snapshot.daily_forecast.first().map(|d| d.date),
        NaiveDate::from_ymd_opt(2026, 6, 22)
    );
    assert_eq!(snapshot.raw_weather.as_ref().map(|r| r.weather_code), Some(2));
    assert_eq!(
        snapshot.derived.observed_at,
        Some(parse_time("2026-06-21T10:00"))
    );
    assert!(snapshot.active_hour.is_none());
    assert!(session.bundle.is_some());
}

#[test]
fn hour_target_promotes_that_hour() {
    let hour = parse_time("2026-06-21T11:00");
    let mut session = session(FetchTarget::Hour(hour), false);
    session.apply_payload(FetchPayload::Forecast(midsummer_bundle()));

    let snapshot = session.store.snapshot();
    assert_eq!(snapshot.raw_weather.as_ref().map(|r| r.weather_code), Some(61));
    assert_eq!(snapshot.active_hour, Some(hour));
    assert!(snapshot.error.is_none());
}

#[test]
fn hour_outside_forecast_reports_error() {
    let mut session = session(FetchTarget::Hour(parse_time("2026-07-30T11:00")), false);
    session.apply_payload(FetchPayload::Forecast(midsummer_bundle()));

    let snapshot = session.store.snapshot();
    assert!(snapshot.raw_weather.is_none());
    assert!(
        snapshot
            .error
            .as_deref()
            .is_some_and(|e| e.contains("no hourly forecast"))
    );
    assert_eq!(snapshot.hourly_forecast.len(), HOURLY_WINDOW);
}

#[test]
fn date_payload_marks_active_date() {
    let bundle = midsummer_bundle();
    let date = NaiveDate::from_ymd_opt(2026, 6, 22).expect("valid date");
    let snapshot = bundle.snapshot_for_date(date).expect("fixture covers date");

    let mut session = session(FetchTarget::Date(date), false);
    session.apply_payload(FetchPayload::Date { date, snapshot });

    let stored = session.store.snapshot();
    assert_eq!(stored.active_date, Some(date));
    assert!(stored.active_hour.is_none());
    // Whole-day snapshots fall back to the clock.
    assert_eq!(stored.derived.observed_at, Some(parse_time("2026-06-21T10:30")));
}

#[test]
fn select_hour_uses_cached_bundle() {
    let mut session = session(FetchTarget::Current, false);
    let err = session
        .select_hour(parse_time("2026-06-21T11:00"))
        .expect_err("nothing loaded yet");
    assert!(err.to_string().contains("no forecast loaded"));

    session.apply_payload(FetchPayload::Forecast(midsummer_bundle()));
    session
        .select_hour(parse_time("2026-06-22T11:00"))
        .expect("hour within bundle");
    let snapshot = session.store.snapshot();
    assert_eq!(snapshot.raw_weather.as_ref().map(|r| r.weather_code), Some(61));
    assert_eq!(session.target, FetchTarget::Hour(parse_time("2026-06-22T11:00")));

    assert!(session.select_hour(parse_time("2026-06-21T11:30")).is_err());
}

#[tokio::test]
async fn superseded_results_are_dropped() {
    let (tx, _rx) = mpsc::channel(8);
    let mut session = session(FetchTarget::Current, false);
    session.start_fetch(&tx).expect("location configured");
    session.start_fetch(&tx).expect("location configured");
    assert_eq!(session.fetch.generation(), 2);

    session
        .handle_event(
            EngineEvent::FetchSucceeded {
                generation: 1,
                payload: Box::new(FetchPayload::Forecast(midsummer_bundle())),
            },
            &tx,
        )
        .await
        .expect("event handled");
    assert!(session.store.snapshot().raw_weather.is_none());

    session
        .handle_event(
            EngineEvent::FetchSucceeded {
                generation: 2,
                payload: Box::new(FetchPayload::Forecast(midsummer_bundle())),
            },
            &tx,
        )
        .await
        .expect("event handled");
    let snapshot = session.store.snapshot();
    assert!(snapshot.raw_weather.is_some());
    assert!(!snapshot.is_loading);
    session.shutdown();
}

#[tokio::test]
async fn failure_sets_error_and_advances_backoff() {
    let (tx, _rx) = mpsc::channel(8);
    let mut session = session(FetchTarget::Current, false);
    session.start_fetch(&tx).expect("location configured");
    assert!(session.store.snapshot().is_loading);

    session
        .handle_event(
            EngineEvent::FetchFailed {
                generation: 1,
                error: "forecast request failed".to_string(),
            },
            &tx,
        )
        .await
        .expect("event handled");

    let snapshot = session.store.snapshot();
    assert_eq!(snapshot.error.as_deref(), Some("forecast request failed"));
    assert!(!snapshot.is_loading);
    assert_eq!(session.backoff.next_delay(), Duration::from_secs(20));
}

#[tokio::test(start_paused = true)]
async fn watch_mode_retries_after_failure() {
    let (tx, mut rx) = mpsc::channel(8);
    let mut session = session(FetchTarget::Current, true);
    session.fetch.begin();

    session
        .handle_event(
            EngineEvent::FetchFailed {
                generation: 1,
                error: "boom".to_string(),
            },
            &tx,
        )
        .await
        .expect("event handled");

    tokio::time::advance(Duration::from_secs(11)).await;
    assert!(matches!(rx.recv().await, Some(EngineEvent::TickRefresh)));
}

#[tokio::test]
async fn bootstrap_requests_first_refresh() {
    let (tx, mut rx) = mpsc::channel(8);
    let mut session = session(FetchTarget::Current, false);
    session
        .handle_event(EngineEvent::Bootstrap, &tx)
        .await
        .expect("event handled");
    assert!(matches!(rx.recv().await, Some(EngineEvent::TickRefresh)));
    assert!(session.refresh_task.is_none());
}

#[tokio::test]
async fn quit_stops_the_session() {
    let (tx, _rx) = mpsc::channel(8);
    let mut session = session(FetchTarget::Current, true);
    session
        .handle_event(EngineEvent::Bootstrap, &tx)
        .await
        .expect("event handled");
    assert!(session.refresh_task.is_some());

    session
        .handle_event(EngineEvent::Quit, &tx)
        .await
        .expect("event handled");
    assert!(!session.running);
    assert!(session.refresh_task.is_none());
    assert!(!session.fetch.in_flight());
}

#[tokio::test]
async fn missing_location_is_an_error() {
    let (tx, _rx) = mpsc::channel(8);
    let mut session = session(FetchTarget::Current, false);
    session.settings.location = None;
    let err = session.start_fetch(&tx).expect_err("no location");
    assert!(err.to_string().contains("--lat and --lon"));
    assert!(session.fetch_once().await.is_err());
}
