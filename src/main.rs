//! # TB - Task-Board CLI
//!
//! A local task-board with user profiles, department scoping and a
//! keyboard-driven terminal interface.
//!
//! ## Key Features
//!
//! - **Profiles**: pick who is working; each profile keeps its own board,
//!   persisted as a per-user JSON snapshot
//! - **Role-aware views**: marketing leads see only Marketing tasks, members
//!   browse read-only, admins and managers see and edit everything
//! - **Checklists**: every task carries subtasks with a progress readout
//! - **Two Interfaces**: full CLI for scripting + interactive TUI with live
//!   search and a working-copy detail editor
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the board UI (profile menu first)
//! tb ui
//!
//! # Add a task as a specific profile
//! tb --user ava add "Refresh landing page" --department Marketing
//!
//! # List what a profile can see
//! tb --user priya list --search landing
//!
//! # View, update, delete
//! tb view "Refresh landing page"
//! tb update <id> --status in-progress
//! tb delete <id>
//! ```
//!
//! Snapshots are stored in `~/.taskboard/` as one `tasks_<user>.json` per
//! profile. A missing or unreadable snapshot falls back to the built-in
//! sample board.

use std::path::PathBuf;

use clap::Parser;

pub mod cli;
pub mod cmd;
pub mod editor;
pub mod error;
pub mod fields;
pub mod session;
pub mod storage;
pub mod store;
pub mod task;
pub mod user;
pub mod view;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod menu;
    pub mod run;
    pub mod task_form;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use session::Session;
use storage::Storage;
use user::{most_recent_user, resolve_user};

fn main() {
    let cli = Cli::parse();

    // Determine the data directory
    let data_dir = cli.data_dir.unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".taskboard")
    });
    let storage = Storage::new(data_dir);

    // Commands that don't need a session
    match cli.command {
        Commands::Ui => {
            cmd_ui(storage);
            return;
        }
        Commands::Users => {
            cmd_users();
            return;
        }
        Commands::Completions { shell } => {
            cmd_completions(shell);
            return;
        }
        _ => {}
    }

    // Everything else acts as a profile
    let user = match cli.user {
        Some(ref ident) => match resolve_user(ident) {
            Ok(user) => user,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        },
        None => most_recent_user(&storage),
    };
    let mut session = Session::open(user, storage);

    match cli.command {
        Commands::Ui | Commands::Users | Commands::Completions { .. } => {
            unreachable!("handled above")
        }
        Commands::Add {
            title,
            desc,
            status,
            department,
        } => cmd_add(&mut session, title, desc, status, department),

        Commands::List {
            status,
            department,
            search,
            limit,
        } => cmd_list(&session, status, department, search, limit),

        Commands::View { id } => cmd_view(&session, id),

        Commands::Update {
            id,
            title,
            desc,
            status,
            department,
            clear_desc,
            clear_department,
        } => cmd_update(
            &mut session,
            id,
            title,
            desc,
            status,
            department,
            clear_desc,
            clear_department,
        ),

        Commands::Delete { id } => cmd_delete(&mut session, id),

        Commands::Subtask { action } => cmd_subtask(&mut session, action),
    }
}
