use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::schedule::Meeting;
use super::{MeetingStore, StoreError};

const TEMP_SUFFIX: &str = ".json.tmp";

/// One `<CODE>.json` file per meeting under a data directory
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    dir: PathBuf,
}

/// Codes become file names, so only plain alphanumerics are accepted
fn is_safe_key(code: &str) -> bool {
    !code.is_empty() && code.chars().all(|c| c.is_ascii_alphanumeric())
}

impl JsonDirStore {
    /// Opens the store, creating the directory if needed. Temp files left
    /// behind by an interrupted write are removed.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        let store = JsonDirStore { dir };
        store.sweep_temp_files()?;
        Ok(store)
    }

    fn sweep_temp_files(&self) -> Result<(), StoreError> {
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_temp = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(TEMP_SUFFIX));
            if is_temp && path.is_file() {
                log::warn!("Removing interrupted write {}", path.display());
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, code: &str) -> PathBuf {
        self.dir.join(format!("{code}.json"))
    }
}

impl MeetingStore for JsonDirStore {
    fn get(&self, code: &str) -> Result<Option<Meeting>, StoreError> {
        if !is_safe_key(code) {
            return Ok(None);
        }
        match fs::read(self.record_path(code)) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&self, code: &str, meeting: &Meeting) -> Result<(), StoreError> {
        if !is_safe_key(code) {
            return Err(StoreError::InvalidKey(code.to_string()));
        }
        let bytes = serde_json::to_vec_pretty(meeting)?;
        // Write aside, then swap in, so readers never see a half-written record
        let tmp = self.dir.join(format!("{code}{TEMP_SUFFIX}"));
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, self.record_path(code))?;
        Ok(())
    }

    fn list(&self) -> Result<Vec<Meeting>, StoreError> {
        let mut meetings = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let bytes = fs::read(&path)?;
            meetings.push(serde_json::from_slice::<Meeting>(&bytes)?);
        }
        meetings.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(meetings)
    }
}
