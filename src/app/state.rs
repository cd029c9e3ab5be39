use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    app::{
        events::{EngineEvent, FetchPayload, FetchSlot, schedule_retry, start_refresh_task},
        settings::EngineSettings,
        store::WeatherStore,
    },
    cli::Cli,
    data::forecast::ForecastClient,
    domain::weather::{ForecastBundle, Location},
    resilience::backoff::Backoff,
};

const HOURLY_WINDOW: usize = 24;
const DAILY_WINDOW: usize = 7;

/// What a fetch should promote into the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchTarget {
    Current,
    Date(NaiveDate),
    Hour(NaiveDateTime),
}

impl FetchTarget {
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        match (cli.date, cli.hour) {
            (Some(date), _) => Self::Date(date),
            (None, Some(hour)) => Self::Hour(hour),
            (None, None) => Self::Current,
        }
    }
}

/// Drives fetches into a [`WeatherStore`]: refresh ticks, retries with
/// backoff, and dropping of superseded results.
pub struct EngineSession {
    pub store: WeatherStore,
    pub settings: EngineSettings,
    pub backoff: Backoff,
    pub running: bool,
    pub target: FetchTarget,
    pub bundle: Option<ForecastBundle>,
    client: ForecastClient,
    fetch: FetchSlot,
    refresh_task: Option<JoinHandle<()>>,
    watch: bool,
}

impl EngineSession {
    #[must_use]
    pub fn new(
        store: WeatherStore,
        settings: EngineSettings,
        client: ForecastClient,
        target: FetchTarget,
        watch: bool,
    ) -> Self {
        Self {
            store,
            settings,
            backoff: Backoff::default(),
            running: true,
            target,
            bundle: None,
            client,
            fetch: FetchSlot::default(),
            refresh_task: None,
            watch,
        }
    }

    pub async fn handle_event(
        &mut self,
        event: EngineEvent,
        tx: &mpsc::Sender<EngineEvent>,
    ) -> Result<()> {
        match event {
            EngineEvent::Bootstrap => {
                if self.watch {
                    let every = Duration::from_secs(self.settings.refresh_interval_secs);
                    self.refresh_task = Some(start_refresh_task(tx.clone(), every));
                }
                tx.send(EngineEvent::TickRefresh).await?;
            }
            EngineEvent::TickRefresh => self.start_fetch(tx)?,
            EngineEvent::FetchSucceeded {
                generation,
                payload,
            } => {
                if self.fetch.finish(generation) {
                    self.backoff.reset();
                    self.apply_payload(*payload);
                } else {
                    tracing::debug!(generation, "dropping superseded fetch result");
                }
            }
            EngineEvent::FetchFailed { generation, error } => {
                if self.fetch.finish(generation) {
                    self.handle_fetch_failed(tx, error);
                } else {
                    tracing::debug!(generation, "dropping superseded fetch failure");
                }
            }
            EngineEvent::Quit => self.shutdown(),
        }

        Ok(())
    }

    fn handle_fetch_failed(&mut self, tx: &mpsc::Sender<EngineEvent>, error: String) {
        let delay = self.backoff.next_delay();
        tracing::error!(%error, retry_in = ?delay, "weather fetch failed");
        self.store.set_error(Some(error));
        if self.watch {
            schedule_retry(tx.clone(), delay);
        }
    }

    fn location(&self) -> Result<Location> {
        self.settings
            .location
            .clone()
            .context("no location configured; pass --lat and --lon or save one with --save")
    }

    /// Spawns a fetch for the current target, superseding any fetch in flight.
    pub fn start_fetch(&mut self, tx: &mpsc::Sender<EngineEvent>) -> Result<()> {
        let location = self.location()?;
        let generation = self.fetch.begin();
        self.store.set_loading(true);
        tracing::info!(
            generation,
            location = %location.display_name(),
            target = ?self.target,
            "fetching weather"
        );

        let client = self.client.clone();
        let target = self.target;
        let tx = tx.clone();
        let handle = tokio::spawn(async move {
            let event = match fetch_payload(&client, location, target).await {
                Ok(payload) => EngineEvent::FetchSucceeded {
                    generation,
                    payload: Box::new(payload),
                },
                Err(err) => EngineEvent::FetchFailed {
                    generation,
                    error: format!("{err:#}"),
                },
            };
            let _ = tx.send(event).await;
        });
        self.fetch.attach(handle);
        Ok(())
    }

    /// Fetches the current target and applies it inline, without the event
    /// loop.
    pub async fn fetch_once(&mut self) -> Result<()> {
        let location = self.location()?;
        self.store.set_loading(true);
        match fetch_payload(&self.client, location, self.target).await {
            Ok(payload) => {
                self.apply_payload(payload);
                Ok(())
            }
            Err(err) => {
                self.store.set_error(Some(format!("{err:#}")));
                Err(err)
            }
        }
    }

    /// Switches to a whole-day view, or back to current conditions with `None`.
    pub fn select_date(
        &mut self,
        date: Option<NaiveDate>,
        tx: &mpsc::Sender<EngineEvent>,
    ) -> Result<()> {
        self.target = date.map_or(FetchTarget::Current, FetchTarget::Date);
        self.start_fetch(tx)
    }

    /// Promotes an hour of the last fetched forecast without refetching.
    pub fn select_hour(&mut self, hour: NaiveDateTime) -> Result<()> {
        let snapshot = self
            .bundle
            .as_ref()
            .context("no forecast loaded yet")?
            .snapshot_for_hour(hour)
            .with_context(|| format!("no hourly forecast for {hour}"))?;
        self.target = FetchTarget::Hour(hour);
        self.store.set_weather_data(snapshot);
        self.store.set_active_date(None);
        self.store.set_active_hour(Some(hour));
        Ok(())
    }

    pub fn apply_payload(&mut self, payload: FetchPayload) {
        match payload {
            FetchPayload::Forecast(bundle) => self.apply_bundle(bundle),
            FetchPayload::Date { date, snapshot } => {
                self.store.set_weather_data(snapshot);
                self.store.set_active_hour(None);
                self.store.set_active_date(Some(date));
            }
        }
    }

    fn apply_bundle(&mut self, bundle: ForecastBundle) {
        let reference = bundle.current.observation_instant(self.store.now());
        self.store.set_location(bundle.location.clone());
        self.store.set_forecast_data(
            bundle.upcoming_hours(reference, HOURLY_WINDOW),
            bundle.upcoming_days(reference.date(), DAILY_WINDOW),
        );

        match self.target {
            FetchTarget::Hour(hour) => match bundle.snapshot_for_hour(hour) {
                Some(snapshot) => {
                    self.store.set_weather_data(snapshot);
                    self.store.set_active_date(None);
                    self.store.set_active_hour(Some(hour));
                }
                None => {
                    tracing::warn!(%hour, "requested hour is outside the forecast");
                    self.store
                        .set_error(Some(format!("no hourly forecast for {hour}")));
                }
            },
            FetchTarget::Current | FetchTarget::Date(_) => {
                self.store.set_weather_data(bundle.current.clone());
                self.store.set_active_date(None);
                self.store.set_active_hour(None);
            }
        }
        self.bundle = Some(bundle);
    }

    pub fn shutdown(&mut self) {
        self.running = false;
        self.fetch.cancel();
        if let Some(task) = self.refresh_task.take() {
            task.abort();
        }
    }
}

async fn fetch_payload(
    client: &ForecastClient,
    location: Location,
    target: FetchTarget,
) -> Result<FetchPayload> {
    match target {
        FetchTarget::Date(date) => {
            let snapshot = client.fetch_for_date(&location, date).await?;
            Ok(FetchPayload::Date { date, snapshot })
        }
        FetchTarget::Current | FetchTarget::Hour(_) => {
            Ok(FetchPayload::Forecast(client.fetch(location).await?))
        }
    }
}

#[cfg(test)]
mod tests;
