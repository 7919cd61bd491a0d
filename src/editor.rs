//! Working-copy editing for the detail panel.
//!
//! The detail editor never mutates the store. It works on a `TaskDraft`
//! cloned from the canonical record; field edits and checklist changes land
//! in the draft, and only an explicit save turns the draft back into a task
//! and commits it through `TaskStore::update`. Until then no other consumer
//! of the store sees the changes.

use crate::fields::Status;
use crate::store::fresh_id;
use crate::task::{Subtask, Task};

/// Editable clone of a task.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    id: String,
    created_at_utc: i64,
    updated_at_utc: i64,
    pub title: String,
    pub description: String,
    pub status: Status,
    pub department: Option<String>,
    pub subtasks: Vec<Subtask>,
}

impl TaskDraft {
    /// Clone the editable fields out of a canonical record.
    pub fn from_task(task: &Task) -> Self {
        TaskDraft {
            id: task.id.clone(),
            created_at_utc: task.created_at_utc,
            updated_at_utc: task.updated_at_utc,
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            status: task.status,
            department: task.department.clone(),
            subtasks: task.subtasks.clone(),
        }
    }

    /// Id of the task this draft was cloned from.
    pub fn task_id(&self) -> &str {
        &self.id
    }

    /// Flip one checklist item. Unknown ids are ignored.
    pub fn toggle_subtask(&mut self, subtask_id: &str) {
        if let Some(s) = self.subtasks.iter_mut().find(|s| s.id == subtask_id) {
            s.completed = !s.completed;
        }
    }

    /// Append a checklist item. Blank titles are silently ignored; returns
    /// whether an item was added.
    pub fn add_subtask(&mut self, title: &str) -> bool {
        let title = title.trim();
        if title.is_empty() {
            return false;
        }
        self.subtasks.push(Subtask {
            id: fresh_id(),
            title: title.to_string(),
            completed: false,
        });
        true
    }

    /// Delete one checklist item. Unknown ids are ignored.
    pub fn remove_subtask(&mut self, subtask_id: &str) {
        self.subtasks.retain(|s| s.id != subtask_id);
    }

    /// Number of completed checklist items.
    pub fn checklist_done(&self) -> usize {
        self.subtasks.iter().filter(|s| s.completed).count()
    }

    /// Checklist completion as a rounded percentage. 0 for an empty checklist.
    pub fn progress_percent(&self) -> u8 {
        let total = self.subtasks.len();
        if total == 0 {
            return 0;
        }
        ((self.checklist_done() as f64 / total as f64) * 100.0).round() as u8
    }

    /// Field-by-field comparison against the canonical record. Gates the
    /// save affordance: no differences, nothing to save.
    pub fn differs_from(&self, task: &Task) -> bool {
        self.title != task.title
            || self.description != task.description.clone().unwrap_or_default()
            || self.status != task.status
            || self.department != task.department
            || self.subtasks != task.subtasks
    }

    /// Turn the draft into the replacement record for `TaskStore::update`.
    pub fn to_task(&self) -> Task {
        Task {
            id: self.id.clone(),
            title: self.title.clone(),
            description: if self.description.trim().is_empty() {
                None
            } else {
                Some(self.description.clone())
            },
            status: self.status,
            department: self.department.clone(),
            subtasks: self.subtasks.clone(),
            created_at_utc: self.created_at_utc,
            updated_at_utc: self.updated_at_utc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{NewTask, TaskStore};

    fn store_with_checklist() -> (TaskStore, String) {
        let mut store = TaskStore::new();
        let id = store
            .add(NewTask {
                title: "Ship beta".to_string(),
                description: Some("cut a release candidate".to_string()),
                ..NewTask::default()
            })
            .expect("add should succeed")
            .id
            .clone();
        let mut task = store.get(&id).unwrap().clone();
        task.subtasks.push(Subtask {
            id: "st1".to_string(),
            title: "tag the build".to_string(),
            completed: false,
        });
        store.update(task).expect("update should succeed");
        (store, id)
    }

    #[test]
    fn fresh_draft_matches_canonical_record() {
        let (store, id) = store_with_checklist();
        let draft = TaskDraft::from_task(store.get(&id).unwrap());
        assert!(!draft.differs_from(store.get(&id).unwrap()));
    }

    #[test]
    fn draft_changes_stay_out_of_the_store_until_saved() {
        let (mut store, id) = store_with_checklist();
        let mut draft = TaskDraft::from_task(store.get(&id).unwrap());

        draft.toggle_subtask("st1");
        draft.status = Status::InProgress;

        // Canonical record untouched.
        let canonical = store.get(&id).unwrap();
        assert!(!canonical.subtasks[0].completed);
        assert_eq!(canonical.status, Status::ToDo);
        assert!(draft.differs_from(canonical));

        store.update(draft.to_task()).expect("update should succeed");
        let canonical = store.get(&id).unwrap();
        assert!(canonical.subtasks[0].completed);
        assert_eq!(canonical.status, Status::InProgress);
    }

    #[test]
    fn toggle_untoggle_leaves_nothing_to_save() {
        let (store, id) = store_with_checklist();
        let mut draft = TaskDraft::from_task(store.get(&id).unwrap());
        draft.toggle_subtask("st1");
        draft.toggle_subtask("st1");
        assert!(!draft.differs_from(store.get(&id).unwrap()));
    }

    #[test]
    fn add_subtask_trims_and_rejects_blank_titles() {
        let (store, id) = store_with_checklist();
        let mut draft = TaskDraft::from_task(store.get(&id).unwrap());
        assert!(!draft.add_subtask("   "));
        assert_eq!(draft.subtasks.len(), 1);

        assert!(draft.add_subtask("  publish notes "));
        let added = draft.subtasks.last().unwrap();
        assert_eq!(added.title, "publish notes");
        assert!(!added.completed);
        assert!(!added.id.is_empty());
    }

    #[test]
    fn remove_subtask_by_id() {
        let (store, id) = store_with_checklist();
        let mut draft = TaskDraft::from_task(store.get(&id).unwrap());
        draft.remove_subtask("st1");
        assert!(draft.subtasks.is_empty());
        // Removing again is a no-op.
        draft.remove_subtask("st1");
    }

    #[test]
    fn empty_description_commits_as_none() {
        let (store, id) = store_with_checklist();
        let mut draft = TaskDraft::from_task(store.get(&id).unwrap());
        draft.description = "  ".to_string();
        assert_eq!(draft.to_task().description, None);
    }
}
