use async_trait::async_trait;
use job_tracking::KeyValue;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

use crate::{Error, Result};

/// Key/value pairs kept as one JSON object in a file.
///
/// A missing file is an empty store. Writes replace the file through a
/// sibling temp file named after the writing process and write. The lock
/// only orders writers sharing this instance.
#[derive(Debug)]
pub struct FileKeyValue {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileKeyValue {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw)
            .map_err(|e| Error::Malformed(self.path.display().to_string(), e))
    }

    /// `<path>.<pid>.<n>.tmp`, unique per process and write.
    fn temp_path(&self) -> PathBuf {
        static WRITES: AtomicUsize = AtomicUsize::new(0);
        let n = WRITES.fetch_add(1, Ordering::Relaxed);
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(format!(".{}.{}.tmp", std::process::id(), n));
        PathBuf::from(tmp)
    }

    async fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let data = serde_json::to_string_pretty(entries)?;
        let tmp = self.temp_path();
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&tmp, data).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        log::debug!("wrote {} entries to {}", entries.len(), self.path.display());
        Ok(())
    }
}

#[async_trait]
impl KeyValue for FileKeyValue {
    type E = Error;

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_entries().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;
        entries.insert(key.to_owned(), value.to_owned());
        self.write_entries(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;
        if entries.remove(key).is_some() {
            self.write_entries(&entries).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use job_tracking::{JobPosting, JobTrackingState, KeyedStore, Store};

    fn scratch_path(name: &str) -> PathBuf {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        let n = COUNTER.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir()
            .join(format!("job-tracking-{}-{}", std::process::id(), n))
            .join(name)
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let kv = FileKeyValue::new(scratch_path("missing.json"));
        assert_eq!(kv.get("savedJobs_ana").await.unwrap(), None);
        kv.remove("savedJobs_ana").await.unwrap();
        assert!(!kv.path().exists());
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let path = scratch_path("store.json");
        let kv = FileKeyValue::new(&path);
        kv.set("a", "1").await.unwrap();
        kv.set("b", "2").await.unwrap();
        kv.remove("a").await.unwrap();

        let reopened = FileKeyValue::new(&path);
        assert_eq!(reopened.get("a").await.unwrap(), None);
        assert_eq!(reopened.get("b").await.unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_temp_files_are_unique_per_process_and_write() {
        let kv = FileKeyValue::new("state.json");
        let first = kv.temp_path();
        let second = kv.temp_path();
        assert_ne!(first, second);
        let name = first.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(&format!("state.json.{}.", std::process::id())));
        assert!(name.ends_with(".tmp"));
    }

    #[tokio::test]
    async fn test_concurrent_writers_leave_no_temp_files() {
        let path = scratch_path("shared.json");
        let first = FileKeyValue::new(&path);
        let second = FileKeyValue::new(&path);
        let (a, b) = tokio::join!(first.set("a", "1"), second.set("b", "2"));
        a.unwrap();
        b.unwrap();

        assert!(path.exists());
        let reopened = FileKeyValue::new(&path);
        assert!(reopened.get("a").await.unwrap().is_some() || reopened.get("b").await.unwrap().is_some());
        let mut dir = tokio::fs::read_dir(path.parent().unwrap()).await.unwrap();
        while let Some(entry) = dir.next_entry().await.unwrap() {
            let name = entry.file_name().to_string_lossy().into_owned();
            assert!(!name.ends_with(".tmp"), "temp file left behind: {}", name);
        }
    }

    #[tokio::test]
    async fn test_malformed_file_is_reported() {
        let path = scratch_path("broken.json");
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::write(&path, "[1, 2").await.unwrap();
        let kv = FileKeyValue::new(&path);
        assert!(matches!(kv.get("a").await, Err(Error::Malformed(..))));
    }

    #[tokio::test]
    async fn test_tracking_state_round_trip_through_file() {
        let path = scratch_path("tracking.json");
        let store = KeyedStore::new(FileKeyValue::new(&path));
        let mut state = JobTrackingState::default();
        state.save(JobPosting::new("Acme", "Intern").with_job_id(1));
        state.dismiss(&JobPosting::new("X", "Y"));
        store.persist("ana", &state).await.unwrap();

        let reopened = KeyedStore::new(FileKeyValue::new(&path));
        assert_eq!(reopened.load("ana").await.unwrap(), state);
    }
}
