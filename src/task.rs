//! Task data structure and related functionality.
//!
//! This module defines the `Task` record shown on the board and the
//! `Subtask` checklist items it owns.

use serde::{Deserialize, Serialize};

use crate::fields::Status;

/// A checklist item belonging to exactly one task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subtask {
    pub id: String,
    pub title: String,
    pub completed: bool,
}

/// A unit of work with status, optional department, and a checklist.
///
/// `id` and `created_at_utc` are fixed at creation; everything else changes
/// via whole-record replacement through the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: Status,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    pub created_at_utc: i64,
    pub updated_at_utc: i64,
}

impl Task {
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
        let done = self.checklist_done();
        ((done as f64 / total as f64) * 100.0).round() as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task_with_checklist(flags: &[bool]) -> Task {
        Task {
            id: "t1".into(),
            title: "sample".into(),
            description: None,
            status: Status::ToDo,
            department: None,
            subtasks: flags
                .iter()
                .enumerate()
                .map(|(i, &completed)| Subtask {
                    id: format!("s{i}"),
                    title: format!("step {i}"),
                    completed,
                })
                .collect(),
            created_at_utc: 0,
            updated_at_utc: 0,
        }
    }

    #[test]
    fn progress_is_zero_for_empty_checklist() {
        assert_eq!(task_with_checklist(&[]).progress_percent(), 0);
    }

    #[test]
    fn progress_rounds_to_nearest_percent() {
        assert_eq!(task_with_checklist(&[true, false, false]).progress_percent(), 33);
        assert_eq!(task_with_checklist(&[true, true, false]).progress_percent(), 67);
        assert_eq!(task_with_checklist(&[true, true]).progress_percent(), 100);
    }
}
