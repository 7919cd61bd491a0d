//! Add-task form handling for the terminal user interface.
//!
//! This module provides the `TaskForm` structure backing the add-task
//! screen, including field ordering and selector cycling for the status
//! and department choices.

use crate::fields::{Status, DEPARTMENTS};
use crate::store::NewTask;
use crate::tui::input::InputField;

/// Global order constants for the add-task form fields.
pub const TITLE_FIELD: usize = 0;
pub const DESCRIPTION_FIELD: usize = 1;
pub const STATUS_FIELD: usize = 2;
pub const DEPARTMENT_FIELD: usize = 3;

/// The department choices offered by selectors: no label first, then the
/// well-known ones. Tasks loaded with any other label keep it.
pub fn department_options() -> Vec<Option<String>> {
    let mut options: Vec<Option<String>> = vec![None];
    options.extend(DEPARTMENTS.iter().map(|d| Some(d.to_string())));
    options
}

/// Form state for creating a task.
pub struct TaskForm {
    pub title: InputField,
    pub description: InputField,
    pub status: usize,
    pub department: usize,
    pub current_field: usize,
    pub statuses: Vec<Status>,
    pub departments: Vec<Option<String>>,
}

impl TaskForm {
    /// Create an empty form with the default selector positions.
    pub fn new() -> Self {
        Self {
            title: InputField::new(),
            description: InputField::new(),
            status: 0, // ToDo
            department: 0, // none
            current_field: 0,
            statuses: vec![Status::ToDo, Status::InProgress, Status::Done],
            departments: department_options(),
        }
    }

    /// Total number of fields (text inputs + selectors).
    pub fn field_count(&self) -> usize {
        4
    }

    /// Move to the next field in the form.
    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % self.field_count();
    }

    /// Move to the previous field in the form.
    pub fn prev_field(&mut self) {
        self.current_field = if self.current_field == 0 {
            self.field_count() - 1
        } else {
            self.current_field - 1
        };
    }

    /// Handle character input for the currently active field.
    pub fn handle_char(&mut self, c: char) {
        match self.current_field {
            TITLE_FIELD => self.title.handle_char(c),
            DESCRIPTION_FIELD => self.description.handle_char(c),
            _ => {}
        }
    }

    /// Handle backspace input for the currently active field.
    pub fn handle_backspace(&mut self) {
        match self.current_field {
            TITLE_FIELD => self.title.handle_backspace(),
            DESCRIPTION_FIELD => self.description.handle_backspace(),
            _ => {}
        }
    }

    /// Handle delete input for the currently active field.
    pub fn handle_delete(&mut self) {
        match self.current_field {
            TITLE_FIELD => self.title.handle_delete(),
            DESCRIPTION_FIELD => self.description.handle_delete(),
            _ => {}
        }
    }

    /// Handle left/right arrow keys for cursor movement or selector changes.
    pub fn handle_left_right(&mut self, right: bool) {
        match self.current_field {
            TITLE_FIELD => {
                if right {
                    self.title.move_cursor_right()
                } else {
                    self.title.move_cursor_left()
                }
            }
            DESCRIPTION_FIELD => {
                if right {
                    self.description.move_cursor_right()
                } else {
                    self.description.move_cursor_left()
                }
            }
            STATUS_FIELD => {
                if right {
                    self.status = (self.status + 1) % self.statuses.len();
                } else {
                    self.status = if self.status == 0 {
                        self.statuses.len() - 1
                    } else {
                        self.status - 1
                    };
                }
            }
            DEPARTMENT_FIELD => {
                if right {
                    self.department = (self.department + 1) % self.departments.len();
                } else {
                    self.department = if self.department == 0 {
                        self.departments.len() - 1
                    } else {
                        self.department - 1
                    };
                }
            }
            _ => {}
        }
    }

    /// The currently selected status.
    pub fn selected_status(&self) -> Status {
        self.statuses[self.status]
    }

    /// The currently selected department, if any.
    pub fn selected_department(&self) -> Option<String> {
        self.departments[self.department].clone()
    }

    /// Assemble the store input from the form contents.
    pub fn to_new_task(&self) -> NewTask {
        NewTask {
            title: self.title.value.clone(),
            description: Some(self.description.value.clone())
                .filter(|d| !d.trim().is_empty()),
            status: Some(self.selected_status()),
            department: self.selected_department(),
        }
    }
}
