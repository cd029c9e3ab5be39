use std::{
    fs, io,
    path::{Path, PathBuf},
};

use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    cli::{Cli, DEFAULT_REFRESH_SECS, OutputFormat},
    domain::weather::Location,
};

pub const CONFIG_DIR_ENV: &str = "ATMOS_ENGINE_CONFIG_DIR";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("settings I/O on {path} failed: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("settings file {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("serializing settings failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineSettings {
    pub location: Option<Location>,
    pub refresh_interval_secs: u64,
    pub seed: Option<u64>,
    pub format: OutputFormat,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            location: None,
            refresh_interval_secs: DEFAULT_REFRESH_SECS,
            seed: None,
            format: OutputFormat::Text,
        }
    }
}

impl EngineSettings {
    #[must_use]
    pub fn from_cli_defaults(cli: &Cli) -> Self {
        Self {
            location: cli_location(cli),
            refresh_interval_secs: cli.refresh_interval,
            seed: cli.seed,
            format: cli.format,
        }
    }

    /// Seeded generator when a seed is configured, OS entropy otherwise.
    #[must_use]
    pub fn rng(&self) -> Box<dyn RngCore + Send> {
        match self.seed {
            Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
            None => Box::new(StdRng::from_os_rng()),
        }
    }

    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(location) = cli_location(cli) {
            self.location = Some(location);
        }
        if cli.refresh_interval != DEFAULT_REFRESH_SECS {
            self.refresh_interval_secs = cli.refresh_interval;
        }
        if cli.seed.is_some() {
            self.seed = cli.seed;
        }
        if cli.format != OutputFormat::Text {
            self.format = cli.format;
        }
    }
}

fn cli_location(cli: &Cli) -> Option<Location> {
    let (lat, lon) = (cli.lat?, cli.lon?);
    let mut location = Location::from_coords(lat, lon);
    if let Some(name) = &cli.name {
        location.name.clone_from(name);
    }
    Some(location)
}

/// Saved settings layered under the CLI. A missing file is not an error.
pub fn read_settings(path: &Path) -> Result<Option<EngineSettings>, SettingsError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(SettingsError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| SettingsError::Malformed {
            path: path.to_path_buf(),
            source,
        })
}

pub fn load_settings(cli: &Cli, enable_disk: bool) -> (EngineSettings, Option<PathBuf>) {
    if !enable_disk {
        return (EngineSettings::from_cli_defaults(cli), None);
    }
    let Some(path) = settings_path() else {
        return (EngineSettings::from_cli_defaults(cli), None);
    };
    (load_settings_at(cli, &path), Some(path))
}

/// Settings saved at `path` with the CLI applied on top.
#[must_use]
pub fn load_settings_at(cli: &Cli, path: &Path) -> EngineSettings {
    let mut settings = match read_settings(path) {
        Ok(Some(saved)) => saved,
        Ok(None) => EngineSettings::default(),
        Err(err) => {
            tracing::warn!(error = %err, "ignoring saved settings");
            EngineSettings::default()
        }
    };
    settings.apply_cli_overrides(cli);
    settings
}

pub fn save_settings(path: &Path, settings: &EngineSettings) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| SettingsError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let payload = serde_json::to_string_pretty(settings)?;
    fs::write(path, payload).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn settings_path() -> Option<PathBuf> {
    if let Some(base) = std::env::var_os(CONFIG_DIR_ENV) {
        return Some(PathBuf::from(base).join("settings.json"));
    }

    let home = std::env::var_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("atmos-engine")
            .join("settings.json"),
    )
}
