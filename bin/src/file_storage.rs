use std::path::{Path, PathBuf};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::debug;
use forecast_lib::{Observation, Series, SeriesMetadata};

#[derive(Serialize)]
struct StoredHistoryRef<'a> {
    metadata : &'a SeriesMetadata,
    series : &'a [Observation]
}

#[derive(Deserialize)]
struct StoredHistory {
    metadata : SeriesMetadata,
    series : Series
}

pub struct FileStorage {
    directory : PathBuf
}

impl FileStorage {
    /// The directory is created on the first save.
    pub fn create(directory : &Path) -> FileStorage {
        FileStorage { directory : directory.to_path_buf() }
    }

    fn entry_path(&self, name : &str) -> PathBuf {
        self.directory.join(format!("{}.json", name))
    }
}

impl forecast_lib::Storage for FileStorage {
    fn save_price_history(&mut self, name : &str, series : &[Observation], metadata : &SeriesMetadata) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.directory)
            .with_context(|| format!("Failed to create storage directory {}", self.directory.display()))?;
        let path = self.entry_path(name);
        let file = std::fs::File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;

        ::serde_json::to_writer(&file, &StoredHistoryRef { metadata, series })?;
        debug!("Wrote {}", path.display());
        Ok(())
    }

    fn load_price_history(&mut self, name : &str) -> anyhow::Result<(Series, SeriesMetadata)> {
        let path = self.entry_path(name);
        let file = std::fs::File::open(&path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        let stored : StoredHistory = ::serde_json::from_reader(&file)?;
        Ok((stored.series, stored.metadata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use forecast_lib::Storage;

    #[test]
    fn save_and_load_history() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let mut storage = FileStorage::create(&dir.path().join("nested"));

        let date = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        let series = vec!(Observation { date : date(2), price : 185.64 }, Observation { date : date(3), price : 184.25 });
        let metadata = SeriesMetadata { symbol : String::from("AAPL"), from_date : date(1), to_date : date(31) };
        storage.save_price_history("AAPL_20240101_20240131", &series, &metadata)?;

        assert!(dir.path().join("nested").join("AAPL_20240101_20240131.json").exists());
        let (loaded_series, loaded_metadata) = storage.load_price_history("AAPL_20240101_20240131")?;
        assert_eq!(loaded_series, series);
        assert_eq!(loaded_metadata, metadata);
        Ok(())
    }

    #[test]
    fn load_missing_history() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let mut storage = FileStorage::create(&dir.path().join("absent"));

        assert!(storage.load_price_history("missing").is_err());
        assert!(!dir.path().join("absent").exists());
        Ok(())
    }
}
