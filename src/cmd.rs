//! Command implementations for the CLI interface.
//!
//! This module contains the subcommand definitions and their handlers, from
//! basic board operations to checklist editing and the TUI entry point.

use std::io;

use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::editor::TaskDraft;
use crate::error::Error;
use crate::fields::{format_department, format_role, format_status, Status};
use crate::session::Session;
use crate::storage::Storage;
use crate::store::{format_created, print_table, short_id, NewTask};
use crate::tui::run::run_tui;
use crate::user::{profiles, role_can_edit};
use crate::view::Visibility;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive board interface.
    Ui,

    /// Add a new task to the board.
    Add {
        /// Short title for the task.
        title: String,
        /// Optional longer description.
        #[arg(long)]
        desc: Option<String>,
        /// Status: to-do | in-progress | done.
        #[arg(long, value_enum, default_value_t = Status::ToDo)]
        status: Status,
        /// Department label (Marketing, Development, General, or any other).
        #[arg(long)]
        department: Option<String>,
    },

    /// List the board as the current profile sees it.
    List {
        /// Filter by status.
        #[arg(long, value_enum)]
        status: Option<Status>,
        /// Filter by department label.
        #[arg(long)]
        department: Option<String>,
        /// Case-insensitive substring search over title and description.
        #[arg(long)]
        search: Option<String>,
        /// Limit number of rows printed.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// View a single task by id, id prefix, or title.
    View {
        /// Task to view.
        id: String,
    },

    /// Update fields on a task.
    Update {
        /// Task to update.
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long, value_enum)]
        status: Option<Status>,
        #[arg(long)]
        department: Option<String>,
        /// Remove the description.
        #[arg(long)]
        clear_desc: bool,
        /// Remove the department label.
        #[arg(long)]
        clear_department: bool,
    },

    /// Delete a task.
    Delete {
        /// Task to delete.
        id: String,
    },

    /// Edit a task's checklist.
    Subtask {
        #[command(subcommand)]
        action: SubtaskAction,
    },

    /// List the available profiles.
    Users,

    /// Generate shell completions.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum SubtaskAction {
    /// Append a checklist item.
    Add {
        /// Parent task (id, id prefix, or title).
        task: String,
        /// Checklist item title.
        title: String,
    },
    /// Flip a checklist item's completed flag.
    Toggle {
        /// Parent task (id, id prefix, or title).
        task: String,
        /// Checklist item (id, id prefix, or title).
        item: String,
    },
    /// Delete a checklist item.
    Remove {
        /// Parent task (id, id prefix, or title).
        task: String,
        /// Checklist item (id, id prefix, or title).
        item: String,
    },
}

/// Resolve a task identifier (id, unique id prefix, or title) to a task id.
/// Returns an error if the identifier matches nothing or is ambiguous.
pub fn resolve_task(session: &Session, identifier: &str) -> Result<String, String> {
    let wanted = identifier.trim();
    if let Some(task) = session.get(wanted) {
        return Ok(task.id.clone());
    }

    let by_prefix: Vec<_> = session
        .tasks()
        .iter()
        .filter(|t| t.id.starts_with(wanted))
        .collect();
    if by_prefix.len() == 1 {
        return Ok(by_prefix[0].id.clone());
    }

    let by_title: Vec<_> = session
        .tasks()
        .iter()
        .filter(|t| t.title.eq_ignore_ascii_case(wanted))
        .collect();
    match by_title.len() {
        0 if by_prefix.is_empty() => Err(format!("No task found matching '{wanted}'")),
        0 => Err(format!("Id prefix '{wanted}' is ambiguous")),
        1 => Ok(by_title[0].id.clone()),
        _ => {
            let mut msg = format!("Multiple tasks titled '{wanted}':\n");
            for t in by_title {
                msg.push_str(&format!("  {}: {}\n", short_id(&t.id), t.title));
            }
            msg.push_str("Please use the id instead.");
            Err(msg)
        }
    }
}

/// Resolve a checklist item within a draft by id, id prefix, or title.
fn resolve_subtask(draft: &TaskDraft, identifier: &str) -> Result<String, String> {
    let wanted = identifier.trim();
    if let Some(s) = draft.subtasks.iter().find(|s| s.id == wanted) {
        return Ok(s.id.clone());
    }
    let matches: Vec<_> = draft
        .subtasks
        .iter()
        .filter(|s| s.id.starts_with(wanted) || s.title.eq_ignore_ascii_case(wanted))
        .collect();
    match matches.len() {
        0 => Err(format!("No checklist item matching '{wanted}'")),
        1 => Ok(matches[0].id.clone()),
        _ => Err(format!("'{wanted}' matches more than one checklist item; use the id")),
    }
}

fn require_edit(session: &Session) {
    if !session.can_edit() {
        eprintln!("{}", Error::ReadOnlyUser(session.user().name.clone()));
        std::process::exit(1);
    }
}

fn resolve_or_exit(session: &Session, identifier: &str) -> String {
    match resolve_task(session, identifier) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

pub fn cmd_ui(storage: Storage) {
    if let Err(e) = run_tui(storage) {
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

/// Add a new task for the current profile.
pub fn cmd_add(
    session: &mut Session,
    title: String,
    desc: Option<String>,
    status: Status,
    department: Option<String>,
) {
    require_edit(session);
    match session.add(NewTask {
        title,
        description: desc,
        status: Some(status),
        department,
    }) {
        Ok(task) => println!("Added task {}", short_id(&task.id)),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

/// Print the derived view, optionally narrowed further.
pub fn cmd_list(
    session: &Session,
    status: Option<Status>,
    department: Option<String>,
    search: Option<String>,
    limit: Option<usize>,
) {
    let query = search.unwrap_or_default();
    let mut view = session.visible(&query);

    if let Some(s) = status {
        view.retain(|t| t.status == s);
    }
    if let Some(ref d) = department {
        view.retain(|t| format_department(t.department.as_deref()).eq_ignore_ascii_case(d));
    }
    if let Some(n) = limit {
        view.truncate(n);
    }

    print_table(&view);
}

/// View detailed information about a single task.
pub fn cmd_view(session: &Session, id: String) {
    let task_id = resolve_or_exit(session, &id);
    let Some(task) = session.get(&task_id) else {
        eprintln!("Task {task_id} not found");
        std::process::exit(1);
    };

    println!("{}", task.title);
    println!("  id:         {}", task.id);
    println!("  status:     {}", format_status(task.status));
    println!("  department: {}", format_department(task.department.as_deref()));
    println!("  created:    {}", format_created(task.created_at_utc));
    println!("  updated:    {}", format_created(task.updated_at_utc));
    if let Some(ref desc) = task.description {
        println!("\n  {desc}");
    }
    if !task.subtasks.is_empty() {
        println!(
            "\n  Checklist ({}/{}, {}%)",
            task.checklist_done(),
            task.subtasks.len(),
            task.progress_percent()
        );
        for s in &task.subtasks {
            let mark = if s.completed { "x" } else { " " };
            println!("  [{mark}] {}  ({})", s.title, short_id(&s.id));
        }
    }
}

/// Update fields on a task via whole-record replacement.
pub fn cmd_update(
    session: &mut Session,
    id: String,
    title: Option<String>,
    desc: Option<String>,
    status: Option<Status>,
    department: Option<String>,
    clear_desc: bool,
    clear_department: bool,
) {
    require_edit(session);
    let task_id = resolve_or_exit(session, &id);
    let mut draft = TaskDraft::from_task(session.get(&task_id).expect("resolved id exists"));

    if let Some(t) = title {
        if t.trim().is_empty() {
            eprintln!("{}", Error::EmptyTitle);
            std::process::exit(1);
        }
        draft.title = t.trim().to_string();
    }
    if clear_desc {
        draft.description = String::new();
    } else if let Some(d) = desc {
        draft.description = d;
    }
    if let Some(s) = status {
        draft.status = s;
    }
    if clear_department {
        draft.department = None;
    } else if let Some(d) = department {
        draft.department = Some(d.trim().to_string()).filter(|d| !d.is_empty());
    }

    if let Err(e) = session.update(draft.to_task()) {
        eprintln!("{e}");
        std::process::exit(1);
    }
    println!("Updated task {}", short_id(&task_id));
}

/// Delete a task. Unknown ids resolve first, so a bad identifier is reported
/// rather than silently ignored.
pub fn cmd_delete(session: &mut Session, id: String) {
    require_edit(session);
    let task_id = resolve_or_exit(session, &id);
    if let Err(e) = session.remove(&task_id) {
        eprintln!("{e}");
        std::process::exit(1);
    }
    println!("Deleted task {}", short_id(&task_id));
}

/// Checklist edits go through a draft and a whole-record update; subtasks
/// have no lifecycle of their own.
pub fn cmd_subtask(session: &mut Session, action: SubtaskAction) {
    require_edit(session);
    let (task_ident, apply): (&str, Box<dyn Fn(&mut TaskDraft) -> Result<(), String>>) = match &action {
        SubtaskAction::Add { task, title } => (
            task,
            Box::new(move |draft| {
                if draft.add_subtask(title) {
                    Ok(())
                } else {
                    Err(Error::EmptyTitle.to_string())
                }
            }),
        ),
        SubtaskAction::Toggle { task, item } => (
            task,
            Box::new(move |draft| {
                let id = resolve_subtask(draft, item)?;
                draft.toggle_subtask(&id);
                Ok(())
            }),
        ),
        SubtaskAction::Remove { task, item } => (
            task,
            Box::new(move |draft| {
                let id = resolve_subtask(draft, item)?;
                draft.remove_subtask(&id);
                Ok(())
            }),
        ),
    };

    let task_id = resolve_or_exit(session, task_ident);
    let mut draft = TaskDraft::from_task(session.get(&task_id).expect("resolved id exists"));
    if let Err(e) = apply(&mut draft) {
        eprintln!("{e}");
        std::process::exit(1);
    }
    if let Err(e) = session.update(draft.to_task()) {
        eprintln!("{e}");
        std::process::exit(1);
    }
    println!(
        "Checklist updated: {}/{} done",
        draft.checklist_done(),
        draft.subtasks.len()
    );
}

/// Print the built-in profiles with their scope and edit rights.
pub fn cmd_users() {
    println!("{:<10} {:<16} {:<16} {:<18} {}", "ID", "Name", "Role", "Sees", "Edits");
    for user in profiles() {
        let sees = match Visibility::for_role(user.role) {
            Visibility::Unrestricted => "all departments".to_string(),
            Visibility::DepartmentScoped(d) => format!("{d} only"),
        };
        let edits = if role_can_edit(user.role) { "yes" } else { "read-only" };
        println!(
            "{:<10} {:<16} {:<16} {:<18} {}",
            user.id,
            user.name,
            format_role(user.role),
            sees,
            edits
        );
    }
}

pub fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "tb", &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::resolve_user;

    fn session() -> (tempfile::TempDir, Session) {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::open(
            resolve_user("ava").unwrap(),
            Storage::new(dir.path().to_path_buf()),
        );
        (dir, session)
    }

    #[test]
    fn resolves_by_prefix_and_title() {
        let (_dir, s) = session();
        let first = &s.tasks()[0];
        assert_eq!(resolve_task(&s, &first.id[..8]).unwrap(), first.id);
        assert_eq!(resolve_task(&s, &first.title.to_uppercase()).unwrap(), first.id);
        assert!(resolve_task(&s, "zzz-nope").is_err());
    }
}
