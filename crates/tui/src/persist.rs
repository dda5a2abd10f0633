use std::{fs, io::Write, path::PathBuf};

use directories::BaseDirs;
use roast_core::history::{HistoryError, HistoryRepository, SavedEntry, STORAGE_KEY};

pub fn data_dir() -> Option<PathBuf> {
    let base = BaseDirs::new()?;
    Some(base.data_dir().join("roast"))
}

pub fn default_history_path() -> Option<PathBuf> {
    Some(data_dir()?.join(format!("{}.json", STORAGE_KEY)))
}

/// Saved roasts as one JSON array on disk.
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl HistoryRepository for JsonFileRepository {
    fn load(&self) -> Result<Vec<SavedEntry>, HistoryError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read(&self.path)?;
        Ok(serde_json::from_slice(&data)?)
    }

    fn store(&mut self, entries: &[SavedEntry]) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(entries)?;
        let mut tmp = self.path.clone();
        tmp.set_extension("json.tmp");
        {
            let mut f = fs::File::create(&tmp)?;
            f.write_all(&data)?;
            f.flush()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roast_core::history::SavedHistory;

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("savedRoasts.json"));
        assert!(repo.load().unwrap().is_empty());
    }

    #[test]
    fn survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("savedRoasts.json");

        let mut h = SavedHistory::initialize(JsonFileRepository::new(path.clone()));
        h.save("first", "{}").unwrap();
        h.save("second", "{\n  \"roasts\": []\n}").unwrap();
        let before = h.entries().to_vec();
        drop(h);

        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
        let h = SavedHistory::initialize(JsonFileRepository::new(path));
        assert_eq!(h.entries(), before.as_slice());
    }

    #[test]
    fn garbage_on_disk_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("savedRoasts.json");
        fs::write(&path, b"[{\"id\": 1").unwrap();
        let mut h = SavedHistory::initialize(JsonFileRepository::new(path.clone()));
        assert!(h.is_empty());
        // the next mutation overwrites the broken file
        h.save("fresh", "{}").unwrap();
        let again = SavedHistory::initialize(JsonFileRepository::new(path));
        assert_eq!(again.len(), 1);
    }
}
