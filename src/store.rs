//! Canonical task collection and utility functions for the board.
//!
//! This module provides the `TaskStore` holding the active user's tasks,
//! along with formatting helpers for the CLI table output.

use chrono::{Local, TimeZone, Utc};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::fields::{format_department, format_status, Status};
use crate::task::{Subtask, Task};

/// Field values for a task about to be created.
///
/// Ids, timestamps and the (initially empty) checklist are assigned by the
/// store, never by callers.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<Status>,
    pub department: Option<String>,
}

/// In-memory collection of tasks for one user.
///
/// Canonical order is insertion order with new tasks at the front; any
/// recency sorting happens in the view layer and never touches this list.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    /// Create an empty store.
    pub fn new() -> Self {
        TaskStore { tasks: Vec::new() }
    }

    /// Create a store over an existing collection, e.g. a loaded snapshot.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        TaskStore { tasks }
    }

    /// The built-in seed collection used when no snapshot exists for a user.
    pub fn seed() -> Self {
        let now = Utc::now().timestamp();
        let task = |age_secs: i64, title: &str, desc: &str, status, department: &str, steps: &[(&str, bool)]| Task {
            id: fresh_id(),
            title: title.to_string(),
            description: Some(desc.to_string()),
            status,
            department: Some(department.to_string()),
            subtasks: steps
                .iter()
                .map(|&(title, completed)| Subtask {
                    id: fresh_id(),
                    title: title.to_string(),
                    completed,
                })
                .collect(),
            created_at_utc: now - age_secs,
            updated_at_utc: now - age_secs,
        };
        TaskStore {
            tasks: vec![
                task(
                    3_600,
                    "Draft launch announcement",
                    "Write the copy for the new feature announcement and line up the social posts.",
                    Status::InProgress,
                    "Marketing",
                    &[
                        ("Outline key messages", true),
                        ("Review draft with design", false),
                        ("Schedule posts", false),
                    ],
                ),
                task(
                    86_400,
                    "Set up staging environment",
                    "Provision a staging server that mirrors production and wire it into CI.",
                    Status::ToDo,
                    "Development",
                    &[
                        ("Provision server", false),
                        ("Configure CI deploy step", false),
                    ],
                ),
                task(
                    172_800,
                    "Quarterly planning notes",
                    "Collect team updates and circulate the summary before the planning call.",
                    Status::Done,
                    "General",
                    &[
                        ("Collect team updates", true),
                        ("Circulate summary", true),
                    ],
                ),
            ],
        }
    }

    /// All tasks in canonical order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Get a task by id.
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Create a task from the given fields and prepend it to the collection.
    ///
    /// Fails with `Error::EmptyTitle` when the title is blank after trimming;
    /// the collection is left untouched in that case.
    pub fn add(&mut self, new: NewTask) -> Result<&Task> {
        let title = new.title.trim();
        if title.is_empty() {
            return Err(Error::EmptyTitle);
        }
        let now = Utc::now().timestamp();
        let task = Task {
            id: fresh_id(),
            title: title.to_string(),
            description: new.description.map(|d| d.trim().to_string()).filter(|d| !d.is_empty()),
            status: new.status.unwrap_or(Status::ToDo),
            department: new.department.map(|d| d.trim().to_string()).filter(|d| !d.is_empty()),
            subtasks: Vec::new(),
            created_at_utc: now,
            updated_at_utc: now,
        };
        self.tasks.insert(0, task);
        Ok(&self.tasks[0])
    }

    /// Replace the stored record whose id matches the given task.
    ///
    /// The replacement keeps the caller's fields wholesale apart from
    /// `updated_at_utc`, which the store bumps itself.
    pub fn update(&mut self, task: Task) -> Result<()> {
        match self.tasks.iter().position(|t| t.id == task.id) {
            Some(idx) => {
                let mut task = task;
                task.updated_at_utc = Utc::now().timestamp();
                self.tasks[idx] = task;
                Ok(())
            }
            None => Err(Error::TaskNotFound(task.id)),
        }
    }

    /// Delete the task with the given id. Unknown ids are a no-op.
    pub fn remove(&mut self, id: &str) {
        self.tasks.retain(|t| t.id != id);
    }
}

/// Generate an opaque unique id.
pub fn fresh_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Shortened id for table and status-bar display.
pub fn short_id(id: &str) -> &str {
    if id.len() > 8 {
        &id[..8]
    } else {
        id
    }
}

/// Format an epoch-seconds timestamp as a local date.
pub fn format_created(created_at_utc: i64) -> String {
    match Local.timestamp_opt(created_at_utc, 0) {
        chrono::LocalResult::Single(dt) => dt.format("%Y-%m-%d").to_string(),
        _ => "-".to_string(),
    }
}

/// Print tasks in a formatted table.
pub fn print_table(tasks: &[&Task]) {
    println!(
        "{:<9} {:<11} {:<12} {:<11} {:<7} {}",
        "ID", "Status", "Department", "Created", "List", "Title"
    );
    for t in tasks {
        let checklist = if t.subtasks.is_empty() {
            "-".to_string()
        } else {
            format!("{}/{}", t.checklist_done(), t.subtasks.len())
        };
        println!(
            "{:<9} {:<11} {:<12} {:<11} {:<7} {}",
            short_id(&t.id),
            format_status(t.status),
            truncate(format_department(t.department.as_deref()), 12),
            format_created(t.created_at_utc),
            checklist,
            t.title
        );
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_titled(store: &mut TaskStore, title: &str) -> String {
        store
            .add(NewTask {
                title: title.to_string(),
                ..NewTask::default()
            })
            .expect("add should succeed")
            .id
            .clone()
    }

    #[test]
    fn add_assigns_fresh_id_and_timestamp() {
        let mut store = TaskStore::new();
        let before = Utc::now().timestamp();
        let task = store
            .add(NewTask {
                title: "  Write report  ".to_string(),
                description: Some("  q3 numbers ".to_string()),
                status: None,
                department: Some("General".to_string()),
            })
            .expect("add should succeed");
        assert!(!task.id.is_empty());
        assert_eq!(task.title, "Write report");
        assert_eq!(task.description.as_deref(), Some("q3 numbers"));
        assert_eq!(task.status, Status::ToDo);
        assert!(task.subtasks.is_empty());
        assert!(task.created_at_utc >= before);
        assert!(task.created_at_utc <= Utc::now().timestamp());
    }

    #[test]
    fn add_ids_are_unique() {
        let mut store = TaskStore::new();
        let a = add_titled(&mut store, "one");
        let b = add_titled(&mut store, "two");
        assert_ne!(a, b);
    }

    #[test]
    fn blank_title_is_rejected_and_store_unchanged() {
        let mut store = TaskStore::seed();
        let len = store.len();
        let err = store.add(NewTask {
            title: "   \t ".to_string(),
            ..NewTask::default()
        });
        assert!(matches!(err, Err(Error::EmptyTitle)));
        assert_eq!(store.len(), len);
    }

    #[test]
    fn new_tasks_are_prepended() {
        let mut store = TaskStore::new();
        add_titled(&mut store, "A");
        add_titled(&mut store, "B");
        add_titled(&mut store, "C");
        let titles: Vec<_> = store.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["C", "B", "A"]);
    }

    #[test]
    fn update_replaces_record_wholesale() {
        let mut store = TaskStore::new();
        let id = add_titled(&mut store, "original");
        let mut replacement = store.get(&id).unwrap().clone();
        replacement.title = "revised".to_string();
        replacement.status = Status::Done;
        replacement.subtasks.push(Subtask {
            id: fresh_id(),
            title: "step".to_string(),
            completed: true,
        });
        store.update(replacement).expect("update should succeed");

        let stored = store.get(&id).unwrap();
        assert_eq!(stored.title, "revised");
        assert_eq!(stored.status, Status::Done);
        assert_eq!(stored.subtasks.len(), 1);
    }

    #[test]
    fn update_unknown_id_reports_not_found() {
        let mut store = TaskStore::new();
        let ghost = Task {
            id: "missing".to_string(),
            title: "ghost".to_string(),
            description: None,
            status: Status::ToDo,
            department: None,
            subtasks: Vec::new(),
            created_at_utc: 0,
            updated_at_utc: 0,
        };
        assert!(matches!(store.update(ghost), Err(Error::TaskNotFound(_))));
    }

    #[test]
    fn remove_deletes_and_tolerates_unknown_ids() {
        let mut store = TaskStore::new();
        let id = add_titled(&mut store, "short-lived");
        store.remove(&id);
        assert!(store.get(&id).is_none());

        let len = store.len();
        store.remove("no-such-id");
        assert_eq!(store.len(), len);
    }
}
