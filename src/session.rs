//! Per-user board session.
//!
//! A `Session` is constructed when a profile is selected and dropped when
//! the user switches away. It owns the canonical `TaskStore` (loaded from
//! the user's snapshot, or the seed collection when none exists) and the
//! injected `Storage` collaborator, and mirrors the collection back to disk
//! after every mutation.

use crate::error::Result;
use crate::store::{NewTask, TaskStore};
use crate::storage::Storage;
use crate::task::Task;
use crate::user::{role_can_edit, User};
use crate::view::{visible_tasks, Visibility};

pub struct Session {
    user: User,
    visibility: Visibility,
    store: TaskStore,
    storage: Storage,
}

impl Session {
    /// Open a session for the given profile, reading its snapshot or
    /// falling back to the seed collection.
    pub fn open(user: User, storage: Storage) -> Self {
        let store = match storage.load_tasks(&user.id) {
            Some(tasks) => TaskStore::from_tasks(tasks),
            None => TaskStore::seed(),
        };
        let visibility = Visibility::for_role(user.role);
        Session {
            user,
            visibility,
            store,
            storage,
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    /// Whether this session's role may mutate the board.
    pub fn can_edit(&self) -> bool {
        role_can_edit(self.user.role)
    }

    /// Canonical collection, insertion-ordered.
    pub fn tasks(&self) -> &[Task] {
        self.store.tasks()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.store.get(id)
    }

    /// The list to display for this viewer and search query.
    pub fn visible(&self, query: &str) -> Vec<&Task> {
        visible_tasks(self.store.tasks(), &self.visibility, query)
    }

    /// Add a task and persist the collection. Returns the created record.
    pub fn add(&mut self, new: NewTask) -> Result<Task> {
        let task = self.store.add(new)?.clone();
        self.persist()?;
        Ok(task)
    }

    /// Replace a task and persist the collection.
    pub fn update(&mut self, task: Task) -> Result<()> {
        self.store.update(task)?;
        self.persist()
    }

    /// Remove a task (no-op for unknown ids) and persist the collection.
    pub fn remove(&mut self, id: &str) -> Result<()> {
        self.store.remove(id);
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        self.storage.save_tasks(&self.user.id, self.store.tasks())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Role, Status};
    use crate::user::profiles;

    fn admin() -> User {
        profiles().remove(0)
    }

    fn open_in(dir: &std::path::Path, user: User) -> Session {
        Session::open(user, Storage::new(dir.to_path_buf()))
    }

    #[test]
    fn falls_back_to_seed_when_no_snapshot_exists() {
        let dir = tempfile::tempdir().unwrap();
        let session = open_in(dir.path(), admin());
        assert!(!session.tasks().is_empty());
    }

    #[test]
    fn mutations_survive_a_session_restart() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = open_in(dir.path(), admin());
        let added = session
            .add(NewTask {
                title: "Survive restart".to_string(),
                status: Some(Status::InProgress),
                ..NewTask::default()
            })
            .unwrap();

        let reopened = open_in(dir.path(), admin());
        let found = reopened.get(&added.id).expect("snapshot should contain the task");
        assert_eq!(found.title, "Survive restart");
        assert_eq!(found.status, Status::InProgress);
    }

    #[test]
    fn remove_persists_too() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = open_in(dir.path(), admin());
        let id = session.tasks()[0].id.clone();
        session.remove(&id).unwrap();

        let reopened = open_in(dir.path(), admin());
        assert!(reopened.get(&id).is_none());
    }

    #[test]
    fn snapshots_are_per_user() {
        let dir = tempfile::tempdir().unwrap();
        let mut ava = open_in(dir.path(), admin());
        ava.add(NewTask {
            title: "Only Ava sees this".to_string(),
            ..NewTask::default()
        })
        .unwrap();

        // Tom has no snapshot yet, so he gets the untouched seed.
        let tom = open_in(dir.path(), profiles().into_iter().find(|u| u.id == "tom").unwrap());
        assert!(tom.tasks().iter().all(|t| t.title != "Only Ava sees this"));
    }

    #[test]
    fn marketing_lead_sessions_are_scoped() {
        let dir = tempfile::tempdir().unwrap();
        let priya = open_in(
            dir.path(),
            profiles().into_iter().find(|u| u.role == Role::MarketingLead).unwrap(),
        );
        assert!(priya
            .visible("")
            .iter()
            .all(|t| t.department.as_deref() == Some("Marketing")));
        assert!(priya.can_edit());
    }
}
