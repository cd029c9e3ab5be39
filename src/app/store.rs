use std::sync::Arc;

use chrono::{Local, NaiveDate, NaiveDateTime};
use rand::RngCore;
use tokio::sync::watch;

use crate::domain::{
    atmosphere::{
        DerivedState, SceneDirective, SolarCycleSummary, derive, direct_scene,
        summarize_solar_cycle,
    },
    comfort::{ComfortIndex, comfort_index},
    weather::{DailyForecast, HourlyForecast, Location, RawWeatherSnapshot},
};

/// Source of "now" for snapshots that carry no observation time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Everything observers see. Published whole on every transition.
#[derive(Debug, Clone, Default)]
pub struct StoreSnapshot {
    pub raw_weather: Option<RawWeatherSnapshot>,
    pub location: Option<Location>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub last_updated: Option<NaiveDateTime>,
    pub active_date: Option<NaiveDate>,
    pub active_hour: Option<NaiveDateTime>,
    pub hourly_forecast: Vec<HourlyForecast>,
    pub daily_forecast: Vec<DailyForecast>,
    pub derived: DerivedState,
}

impl StoreSnapshot {
    #[must_use]
    pub fn comfort(&self) -> ComfortIndex {
        self.raw_weather
            .as_ref()
            .map_or_else(ComfortIndex::unavailable, comfort_index)
    }

    #[must_use]
    pub fn solar_cycle(&self, now: NaiveDateTime) -> SolarCycleSummary {
        let at = self.derived.observed_at.unwrap_or(now);
        self.raw_weather
            .as_ref()
            .map_or_else(SolarCycleSummary::unavailable, |raw| {
                summarize_solar_cycle(raw, at)
            })
    }

    /// Head of the published hourly window, i.e. the hour in progress.
    #[must_use]
    pub fn next_hour(&self) -> Option<&HourlyForecast> {
        self.hourly_forecast.first()
    }

    #[must_use]
    pub fn scene(&self) -> SceneDirective {
        direct_scene(
            &self.derived.atmosphere,
            &self.derived.normalized,
            self.next_hour(),
        )
    }
}

/// Single-writer holder of the latest derived state.
///
/// Every setter builds the next [`StoreSnapshot`] off to the side and swaps it
/// in with one `send_replace`, so subscribers never observe a half-applied
/// update.
pub struct WeatherStore {
    state: watch::Sender<Arc<StoreSnapshot>>,
    clock: Arc<dyn Clock>,
    rng: Box<dyn RngCore + Send>,
}

impl WeatherStore {
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, rng: Box<dyn RngCore + Send>) -> Self {
        let (state, _) = watch::channel(Arc::new(StoreSnapshot::default()));
        Self { state, clock, rng }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<StoreSnapshot>> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> Arc<StoreSnapshot> {
        Arc::clone(&self.state.borrow())
    }

    #[must_use]
    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    fn update(&self, apply: impl FnOnce(&mut StoreSnapshot)) {
        let mut next = StoreSnapshot::clone(&self.state.borrow());
        apply(&mut next);
        self.state.send_replace(Arc::new(next));
    }

    pub fn set_weather_data(&mut self, raw: RawWeatherSnapshot) {
        let now = self.clock.now();
        let derived = derive(&raw, now, self.rng.as_mut());
        self.update(|s| {
            s.raw_weather = Some(raw);
            s.derived = derived;
            s.last_updated = Some(now);
            s.is_loading = false;
            s.error = None;
        });
    }

    pub fn set_forecast_data(&mut self, hourly: Vec<HourlyForecast>, daily: Vec<DailyForecast>) {
        self.update(|s| {
            s.hourly_forecast = hourly;
            s.daily_forecast = daily;
        });
    }

    pub fn set_hourly_forecast(&mut self, hourly: Vec<HourlyForecast>) {
        self.update(|s| s.hourly_forecast = hourly);
    }

    pub fn set_location(&mut self, location: Location) {
        self.update(|s| s.location = Some(location));
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.update(|s| s.is_loading = loading);
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.update(|s| {
            s.error = error;
            s.is_loading = false;
        });
    }

    pub fn set_active_date(&mut self, date: Option<NaiveDate>) {
        self.update(|s| s.active_date = date);
    }

    pub fn set_active_hour(&mut self, hour: Option<NaiveDateTime>) {
        self.update(|s| s.active_hour = hour);
    }
}
