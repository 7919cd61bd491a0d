//! Derivation pipeline for the displayed task list.
//!
//! The board never renders the canonical collection directly. It renders the
//! output of `visible_tasks`: a recency-sorted, scope-restricted, search-
//! filtered borrow of the store's tasks. The pipeline is pure; re-run it
//! whenever the collection, the viewer, or the query changes.

use crate::fields::Role;
use crate::task::Task;

/// What a viewer is permitted to see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility {
    Unrestricted,
    DepartmentScoped(String),
}

impl Visibility {
    /// Map a role to its visibility policy.
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::MarketingLead => Visibility::DepartmentScoped("Marketing".to_string()),
            Role::Admin | Role::Manager | Role::Member => Visibility::Unrestricted,
        }
    }

    fn admits(&self, task: &Task) -> bool {
        match self {
            Visibility::Unrestricted => true,
            Visibility::DepartmentScoped(dept) => task.department.as_deref() == Some(dept.as_str()),
        }
    }
}

/// Derive the list to display.
///
/// Sorts by creation time descending (stable, so same-timestamp tasks keep
/// their canonical relative order), restricts to the viewer's scope, then
/// applies the case-insensitive substring search over title and description.
pub fn visible_tasks<'a>(tasks: &'a [Task], visibility: &Visibility, query: &str) -> Vec<&'a Task> {
    let mut view: Vec<&Task> = tasks.iter().collect();
    view.sort_by(|a, b| b.created_at_utc.cmp(&a.created_at_utc));

    view.retain(|t| visibility.admits(t));

    let query = query.trim().to_lowercase();
    if !query.is_empty() {
        view.retain(|t| {
            t.title.to_lowercase().contains(&query)
                || t.description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&query))
        });
    }
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Status;

    fn task(id: &str, title: &str, desc: Option<&str>, department: Option<&str>, created: i64) -> Task {
        Task {
            id: id.to_string(),
            title: title.to_string(),
            description: desc.map(String::from),
            status: Status::ToDo,
            department: department.map(String::from),
            subtasks: Vec::new(),
            created_at_utc: created,
            updated_at_utc: created,
        }
    }

    fn ids(view: &[&Task]) -> Vec<String> {
        view.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn sorts_by_recency_descending() {
        // A created 10:00, B created 14:30, C just added.
        let tasks = vec![
            task("c", "newest", None, None, 3_000),
            task("a", "oldest", None, None, 1_000),
            task("b", "middle", None, None, 2_000),
        ];
        let view = visible_tasks(&tasks, &Visibility::Unrestricted, "");
        assert_eq!(ids(&view), ["c", "b", "a"]);
    }

    #[test]
    fn sort_is_stable_for_equal_timestamps() {
        let tasks = vec![
            task("first", "tie one", None, None, 500),
            task("second", "tie two", None, None, 500),
            task("third", "tie three", None, None, 500),
        ];
        let view = visible_tasks(&tasks, &Visibility::Unrestricted, "");
        assert_eq!(ids(&view), ["first", "second", "third"]);
    }

    #[test]
    fn department_scope_restricts_regardless_of_query() {
        let tasks = vec![
            task("m1", "Campaign brief", None, Some("Marketing"), 3),
            task("d1", "Campaign tracker service", None, Some("Development"), 2),
            task("g1", "Weekly sync", None, None, 1),
        ];
        let scope = Visibility::DepartmentScoped("Marketing".to_string());
        assert_eq!(ids(&visible_tasks(&tasks, &scope, "")), ["m1"]);
        assert_eq!(ids(&visible_tasks(&tasks, &scope, "campaign")), ["m1"]);
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_description() {
        let tasks = vec![
            task("a", "Fix LOGIN form", None, None, 3),
            task("b", "Tidy backlog", Some("remove stale login issues"), None, 2),
            task("c", "Unrelated", Some("nothing here"), None, 1),
        ];
        let view = visible_tasks(&tasks, &Visibility::Unrestricted, "LoGiN");
        assert_eq!(ids(&view), ["a", "b"]);
    }

    #[test]
    fn empty_query_keeps_everything_sorted() {
        let tasks = vec![
            task("a", "one", None, None, 1),
            task("b", "two", None, None, 2),
        ];
        let view = visible_tasks(&tasks, &Visibility::Unrestricted, "   ");
        assert_eq!(ids(&view), ["b", "a"]);
    }

    #[test]
    fn marketing_lead_is_scoped_and_others_are_not() {
        assert_eq!(
            Visibility::for_role(Role::MarketingLead),
            Visibility::DepartmentScoped("Marketing".to_string())
        );
        assert_eq!(Visibility::for_role(Role::Admin), Visibility::Unrestricted);
        assert_eq!(Visibility::for_role(Role::Member), Visibility::Unrestricted);
    }
}
