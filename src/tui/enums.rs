//! Enumerations for TUI state management.

/// Application state for the terminal user interface.
#[derive(Clone, Copy, PartialEq)]
pub enum AppState {
    TaskList,
    TaskDetail,
    AddTask,
    Help,
    Confirm,
}

/// Input mode for text entry fields.
#[derive(Clone, Copy, PartialEq)]
pub enum InputMode {
    None,
    Text,
}

/// Selectable row inside the detail editor.
///
/// The editor cursor walks the editable fields first, then the checklist
/// items, then the add-item row (only offered to profiles that may edit).
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum DetailRow {
    Title,
    Description,
    Status,
    Department,
    Subtask(usize),
    NewSubtask,
}
