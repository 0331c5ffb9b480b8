//! Content storage collaborators for draft persistence.

use crate::error::DraftError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Durable home of a draft body.
///
/// Implementations are moved onto the save worker thread.
pub trait ContentStore: Send + 'static {
    /// Load the persisted body, `None` when nothing was saved yet.
    fn load(&self) -> Result<Option<String>, DraftError>;

    /// Persist `content`, replacing any previous body.
    fn persist(&self, content: &str) -> Result<(), DraftError>;
}

/// Draft stored as a single file on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "draft".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ContentStore for FileStore {
    fn load(&self) -> Result<Option<String>, DraftError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Writes a sibling temp file, then renames it over the target.
    fn persist(&self, content: &str) -> Result<(), DraftError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| {
                DraftError::Storage(format!(
                    "Failed to prepare draft directory '{}': {}",
                    parent.display(),
                    err
                ))
            })?;
        }
        let temp = self.temp_path();
        fs::write(&temp, content)?;
        fs::rename(&temp, &self.path).map_err(|err| {
            DraftError::Storage(format!(
                "Failed to replace draft '{}': {}",
                self.path.display(),
                err
            ))
        })?;
        debug!(path = %self.path.display(), bytes = content.len(), "draft persisted");
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    content: Option<String>,
    saves: usize,
    fail_next: bool,
}

/// Shared in-memory store; clones observe the same content.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn with_content(content: &str) -> Self {
        let store = Self::default();
        store.lock().content = Some(content.to_string());
        store
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Last persisted body.
    pub fn content(&self) -> Option<String> {
        self.lock().content.clone()
    }

    /// Number of successful persists.
    pub fn save_count(&self) -> usize {
        self.lock().saves
    }

    /// Make the next persist fail with a storage error.
    pub fn fail_next_save(&self) {
        self.lock().fail_next = true;
    }
}

impl ContentStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, DraftError> {
        Ok(self.content())
    }

    fn persist(&self, content: &str) -> Result<(), DraftError> {
        let mut state = self.lock();
        if std::mem::take(&mut state.fail_next) {
            return Err(DraftError::Storage("simulated storage outage".to_string()));
        }
        state.content = Some(content.to_string());
        state.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_store_reports_missing_draft_as_none() {
        let dir = TempDir::new().expect("temp dir");
        let store = FileStore::new(dir.path().join("missing.md"));
        assert_eq!(store.load().expect("load"), None);
    }

    #[test]
    fn file_store_creates_parents_and_replaces_content() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("nested").join("post.md");
        let store = FileStore::new(&path);
        store.persist("first").expect("persist first");
        store.persist("# second").expect("persist second");
        assert_eq!(store.load().expect("load").as_deref(), Some("# second"));
        assert!(!dir.path().join("nested").join("post.md.tmp").exists());
    }

    #[test]
    fn memory_store_shares_state_between_clones() {
        let store = MemoryStore::with_content("seed");
        let handle = store.clone();
        handle.persist("updated").expect("persist");
        assert_eq!(store.content().as_deref(), Some("updated"));
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn memory_store_failure_switch_is_one_shot() {
        let store = MemoryStore::default();
        store.fail_next_save();
        assert!(matches!(store.persist("lost"), Err(DraftError::Storage(_))));
        assert_eq!(store.content(), None);
        store.persist("kept").expect("persist");
        assert_eq!(store.content().as_deref(), Some("kept"));
    }
}
