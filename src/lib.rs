pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod resilience;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use anyhow::{Context, Result};
use app::{
    events::EngineEvent,
    report::{render_json, render_text},
    settings::{CONFIG_DIR_ENV, load_settings, save_settings},
    state::{EngineSession, FetchTarget},
    store::{Clock, FixedClock, StoreSnapshot, SystemClock, WeatherStore},
};
use chrono::NaiveDateTime;
use cli::{Cli, OutputFormat};
use data::{forecast::ForecastClient, snapshot::load_snapshot};
use tokio::sync::mpsc;

pub async fn run(cli: Cli) -> Result<()> {
    cli.validate()?;

    let (settings, settings_path) = load_settings(&cli, !cli.no_config);
    if cli.save {
        let path = settings_path.with_context(|| {
            format!("no settings directory; set {CONFIG_DIR_ENV} or HOME")
        })?;
        save_settings(&path, &settings)?;
        tracing::info!(path = %path.display(), "settings saved");
    }

    let clock: Arc<dyn Clock> = match cli.at {
        Some(at) => Arc::new(FixedClock(at)),
        None => Arc::new(SystemClock),
    };
    let mut store = WeatherStore::new(clock, settings.rng());
    let format = settings.format;

    if let Some(path) = &cli.snapshot {
        store.set_weather_data(load_snapshot(path)?);
        return print_report(&store.snapshot(), store.now(), format);
    }

    let client = cli
        .forecast_url
        .as_deref()
        .map_or_else(ForecastClient::new, ForecastClient::with_base_url);
    let mut session = EngineSession::new(
        store,
        settings,
        client,
        FetchTarget::from_cli(&cli),
        cli.watch,
    );

    if cli.watch {
        return watch(session, format).await;
    }
    session.fetch_once().await?;
    print_report(&session.store.snapshot(), session.store.now(), format)
}

/// Refreshes until Ctrl-C, printing each snapshot that is not mid-fetch.
async fn watch(mut session: EngineSession, format: OutputFormat) -> Result<()> {
    let (tx, mut rx) = mpsc::channel::<EngineEvent>(64);
    let mut updates = session.store.subscribe();

    let quit_tx = tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = quit_tx.send(EngineEvent::Quit).await;
        }
    });

    tx.send(EngineEvent::Bootstrap).await?;

    while session.running {
        tokio::select! {
            maybe_event = rx.recv() => {
                let Some(event) = maybe_event else { break };
                session.handle_event(event, &tx).await?;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                if !snapshot.is_loading {
                    print_report(&snapshot, session.store.now(), format)?;
                }
            }
        }
    }

    Ok(())
}

fn print_report(snapshot: &StoreSnapshot, now: NaiveDateTime, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", render_text(snapshot, now)),
        OutputFormat::Json => println!("{}", render_json(snapshot, now)?),
    }
    Ok(())
}
