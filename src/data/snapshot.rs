use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::weather::RawWeatherSnapshot;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("reading snapshot {path} failed: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("snapshot {path} is not a valid weather snapshot: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Reads a camelCase JSON `RawWeatherSnapshot` from disk.
pub fn load_snapshot(path: &Path) -> Result<RawWeatherSnapshot, SnapshotError> {
    let content = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| SnapshotError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn loads_camel_case_snapshot() {
        let mut file = NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{"temperature":18.5,"humidity":64,"windSpeed":12,"windDirection":250,
            "pressure":1009,"cloudCover":75,"precipitation":0.6,"weatherCode":61,
            "isDay":true,"sunrise":"05:48","sunset":"20:51",
            "observationTime":"2026-06-02T15:30"}}"#
        )
        .expect("write snapshot");

        let snapshot = load_snapshot(file.path()).expect("load snapshot");
        assert_eq!(snapshot.weather_code, 61);
        assert_eq!(snapshot.sunset, "20:51");
        assert_eq!(snapshot.observation_time.as_deref(), Some("2026-06-02T15:30"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = load_snapshot(&dir.path().join("absent.json")).expect_err("should fail");
        assert!(matches!(err, SnapshotError::Io { .. }));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let mut file = NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"temperature": "warm"}}"#).expect("write snapshot");
        let err = load_snapshot(file.path()).expect_err("should fail");
        assert!(matches!(err, SnapshotError::Parse { .. }));
        assert!(err.to_string().contains("not a valid weather snapshot"));
    }
}
