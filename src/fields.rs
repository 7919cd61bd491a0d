//! Enumerations and field types for the task-board.
//!
//! This module defines the structured values carried by tasks and profiles:
//! board status, user roles, and the known department labels.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Board column a task currently sits in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[serde(alias = "ToDo")]
    ToDo,
    #[serde(alias = "InProgress")]
    InProgress,
    #[serde(alias = "Done")]
    Done,
}

/// Profile role. Roles decide what a viewer sees and whether they may edit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    #[serde(alias = "Admin")]
    Admin,
    #[serde(alias = "Manager")]
    Manager,
    #[serde(alias = "MarketingLead")]
    MarketingLead,
    #[serde(alias = "Member")]
    Member,
}

/// Department labels offered by the selectors. Tasks may carry any label;
/// these are just the well-known ones.
pub const DEPARTMENTS: [&str; 3] = ["Marketing", "Development", "General"];

/// Display fallback for tasks without a department.
pub const DEFAULT_DEPARTMENT: &str = "General";

/// Format a status for display.
pub fn format_status(s: Status) -> &'static str {
    match s {
        Status::ToDo => "ToDo",
        Status::InProgress => "InProgress",
        Status::Done => "Done",
    }
}

/// Format an optional department, falling back to the catch-all label.
pub fn format_department(d: Option<&str>) -> &str {
    match d {
        Some(d) if !d.is_empty() => d,
        _ => DEFAULT_DEPARTMENT,
    }
}

/// Format a role for display.
pub fn format_role(r: Role) -> &'static str {
    match r {
        Role::Admin => "Admin",
        Role::Manager => "Manager",
        Role::MarketingLead => "Marketing Lead",
        Role::Member => "Member",
    }
}
