//! Key-value persistence for per-user task snapshots.
//!
//! One data directory, one JSON file per key. The only keys in use are
//! `tasks_<user_id>`, each holding the whole task collection for that user.
//! Snapshots are written wholesale after every mutation and read once when a
//! session opens; an absent or malformed snapshot simply means "no saved
//! state" and the caller falls back to the seed collection.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::task::Task;

/// File-backed key-value store rooted at the data directory.
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    pub fn new(root: PathBuf) -> Self {
        Storage { root }
    }

    /// The data directory this store writes into.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Snapshot key for a user's task collection.
    pub fn tasks_key(user_id: &str) -> String {
        format!("tasks_{user_id}")
    }

    /// On-disk path backing the given key.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    /// On-disk path of a user's snapshot.
    pub fn snapshot_path(&self, user_id: &str) -> PathBuf {
        self.path_for(&Self::tasks_key(user_id))
    }

    /// Load a user's snapshot. Returns `None` when the snapshot is absent,
    /// unreadable, or fails to parse; parse problems get one stderr note and
    /// are otherwise discarded.
    pub fn load_tasks(&self, user_id: &str) -> Option<Vec<Task>> {
        let path = self.snapshot_path(user_id);
        if !path.exists() {
            return None;
        }
        let mut buf = String::new();
        match File::open(&path).and_then(|mut f| f.read_to_string(&mut buf)) {
            Ok(_) => match serde_json::from_str(&buf) {
                Ok(tasks) => Some(tasks),
                Err(e) => {
                    eprintln!("Discarding unreadable snapshot {}: {e}", path.display());
                    None
                }
            },
            Err(e) => {
                eprintln!("Error reading snapshot {}: {e}", path.display());
                None
            }
        }
    }

    /// Write a user's snapshot using atomic write (temp file + rename).
    pub fn save_tasks(&self, user_id: &str, tasks: &[Task]) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        let path = self.snapshot_path(user_id);
        let tmp = path.with_extension("json.tmp");
        let data = serde_json::to_string_pretty(tasks)?;
        let mut f = File::create(&tmp)?;
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Status;

    fn sample_task(id: &str) -> Task {
        Task {
            id: id.to_string(),
            title: "persisted".to_string(),
            description: Some("goes to disk".to_string()),
            status: Status::InProgress,
            department: Some("Development".to_string()),
            subtasks: Vec::new(),
            created_at_utc: 1_700_000_000,
            updated_at_utc: 1_700_000_000,
        }
    }

    #[test]
    fn key_and_path_follow_the_naming_convention() {
        let storage = Storage::new(PathBuf::from("/data"));
        assert_eq!(Storage::tasks_key("ava"), "tasks_ava");
        assert_eq!(storage.snapshot_path("ava"), PathBuf::from("/data/tasks_ava.json"));
    }

    #[test]
    fn snapshot_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path().to_path_buf());
        let tasks = vec![sample_task("t1"), sample_task("t2")];

        storage.save_tasks("ava", &tasks).unwrap();
        let loaded = storage.load_tasks("ava").unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, "t1");
        assert_eq!(loaded[0].status, Status::InProgress);
    }

    #[test]
    fn absent_snapshot_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path().to_path_buf());
        assert!(storage.load_tasks("nobody").is_none());
    }

    #[test]
    fn malformed_snapshot_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path().to_path_buf());
        fs::create_dir_all(storage.root()).unwrap();
        fs::write(storage.snapshot_path("ava"), "{not json").unwrap();
        assert!(storage.load_tasks("ava").is_none());
    }

    #[test]
    fn saves_are_per_user() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path().to_path_buf());
        storage.save_tasks("ava", &[sample_task("a")]).unwrap();
        storage.save_tasks("tom", &[sample_task("b"), sample_task("c")]).unwrap();

        assert_eq!(storage.load_tasks("ava").unwrap().len(), 1);
        assert_eq!(storage.load_tasks("tom").unwrap().len(), 2);
    }
}
