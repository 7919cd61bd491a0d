//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which manages the board screen for
//! one profile session: the recency-sorted task list with live search, the
//! working-copy detail editor, the add-task form, and the delete
//! confirmation dialog.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};

use crate::editor::TaskDraft;
use crate::fields::{format_department, format_role, format_status, Status};
use crate::session::Session;
use crate::store::{format_created, short_id};
use crate::tui::{
    colors::{DARK_GREEN, DARK_RED, GOLD},
    enums::{AppState, DetailRow, InputMode},
    input::InputField,
    task_form::{department_options, TaskForm, DEPARTMENT_FIELD, DESCRIPTION_FIELD, STATUS_FIELD, TITLE_FIELD},
    utils::centered_rect,
};

/// What the entry point should do after the board exits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoardExit {
    Quit,
    SwitchProfile,
}

/// Width of the field labels in the detail editor, marker excluded.
const DETAIL_LABEL_WIDTH: usize = 13;

/// Main application state for the board screen.
///
/// Holds the session for the active profile, the derived view driving the
/// task table, and the working copy behind the detail editor. The canonical
/// collection is only touched through the session; everything on screen is
/// recomputed from it after each change.
pub struct App {
    state: AppState,
    session: Session,
    task_list_state: TableState,
    visible_ids: Vec<String>,
    task_form: TaskForm,
    input_mode: InputMode,
    status_message: String,
    filter_text: String,
    filter_active: bool,
    confirm_delete: Option<String>,
    draft: Option<TaskDraft>,
    detail_index: usize,
    edit_buffer: Option<InputField>,
    exit_action: BoardExit,
}

impl App {
    /// Create a new App over an opened session.
    pub fn new(session: Session) -> Self {
        let mut app = App {
            state: AppState::TaskList,
            session,
            task_list_state: TableState::default(),
            visible_ids: Vec::new(),
            task_form: TaskForm::new(),
            input_mode: InputMode::None,
            status_message: String::new(),
            filter_text: String::new(),
            filter_active: false,
            confirm_delete: None,
            draft: None,
            detail_index: 0,
            edit_buffer: None,
            exit_action: BoardExit::Quit,
        };

        app.refresh_view();
        app
    }

    /// What should happen after `run` returns.
    pub fn exit_action(&self) -> BoardExit {
        self.exit_action
    }

    /// Recompute the derived view for the current search text.
    ///
    /// Attempts to preserve the selection when the task survives the filter,
    /// falling back to the first row.
    fn refresh_view(&mut self) {
        let old_selected_id = self
            .task_list_state
            .selected()
            .and_then(|idx| self.visible_ids.get(idx))
            .cloned();

        self.visible_ids = self
            .session
            .visible(&self.filter_text)
            .iter()
            .map(|t| t.id.clone())
            .collect();

        if let Some(old_id) = old_selected_id {
            if let Some(new_idx) = self.visible_ids.iter().position(|id| *id == old_id) {
                self.task_list_state.select(Some(new_idx));
            } else {
                self.task_list_state.select(if self.visible_ids.is_empty() {
                    None
                } else {
                    Some(0)
                });
            }
        } else if !self.visible_ids.is_empty() && self.task_list_state.selected().is_none() {
            self.task_list_state.select(Some(0));
        } else if self.visible_ids.is_empty() {
            self.task_list_state.select(None);
        }
    }

    /// Id of the task under the list cursor.
    fn selected_id(&self) -> Option<String> {
        self.task_list_state
            .selected()
            .and_then(|idx| self.visible_ids.get(idx))
            .cloned()
    }

    /// Set a status message to display in the status bar.
    fn set_status_message(&mut self, msg: String) {
        self.status_message = msg;
    }

    /// Clear the current status message.
    fn clear_status_message(&mut self) {
        self.status_message.clear();
    }

    /// Whether the active profile may mutate the board. Leaves a status
    /// message when it may not.
    fn require_edit(&mut self) -> bool {
        if self.session.can_edit() {
            true
        } else {
            self.set_status_message(format!(
                "{} has a read-only role",
                self.session.user().name
            ));
            false
        }
    }

    /// Open the detail editor over a fresh working copy of the given task.
    fn open_detail(&mut self, task_id: &str) {
        if let Some(task) = self.session.get(task_id) {
            self.draft = Some(TaskDraft::from_task(task));
            self.detail_index = 0;
            self.edit_buffer = None;
            self.state = AppState::TaskDetail;
        }
    }

    /// The selectable rows of the detail editor, top to bottom.
    fn detail_rows(&self) -> Vec<DetailRow> {
        let mut rows = vec![
            DetailRow::Title,
            DetailRow::Description,
            DetailRow::Status,
            DetailRow::Department,
        ];
        if let Some(draft) = self.draft.as_ref() {
            rows.extend((0..draft.subtasks.len()).map(DetailRow::Subtask));
        }
        if self.session.can_edit() {
            rows.push(DetailRow::NewSubtask);
        }
        rows
    }

    /// Whether the working copy has edits the canonical record lacks.
    fn draft_dirty(&self) -> bool {
        self.draft
            .as_ref()
            .and_then(|d| self.session.get(d.task_id()).map(|t| d.differs_from(t)))
            .unwrap_or(false)
    }

    /// Leave the detail editor, dropping the working copy.
    fn close_detail(&mut self) {
        if self.draft_dirty() {
            self.set_status_message("Discarded unsaved changes".to_string());
        }
        self.draft = None;
        self.edit_buffer = None;
        self.input_mode = InputMode::None;
        self.state = AppState::TaskList;
    }

    /// Commit the working copy through the session and re-clone it from the
    /// saved record so the editor starts clean again.
    fn save_draft(&mut self) {
        let (task, id, dirty) = match self.draft.as_ref() {
            Some(draft) => {
                let id = draft.task_id().to_string();
                let dirty = self
                    .session
                    .get(&id)
                    .map(|t| draft.differs_from(t))
                    .unwrap_or(false);
                (draft.to_task(), id, dirty)
            }
            None => return,
        };

        if !dirty {
            self.set_status_message("No changes to save".to_string());
            return;
        }

        match self.session.update(task) {
            Ok(()) => {
                if let Some(saved) = self.session.get(&id) {
                    self.draft = Some(TaskDraft::from_task(saved));
                }
                self.refresh_view();
                self.set_status_message("Task saved".to_string());
            }
            Err(e) => self.set_status_message(format!("Error saving: {e}")),
        }
    }

    /// Handle keyboard input when in the task list view.
    ///
    /// Returns true if the application should quit.
    fn handle_task_list_input(
        &mut self,
        key: KeyCode,
        modifiers: KeyModifiers,
    ) -> io::Result<bool> {
        if self.filter_active {
            match key {
                KeyCode::Esc => {
                    self.filter_active = false;
                    self.filter_text.clear();
                    self.input_mode = InputMode::None;
                    self.refresh_view();
                    self.clear_status_message();
                }
                KeyCode::Enter => {
                    self.filter_active = false;
                    self.input_mode = InputMode::None;
                    if self.filter_text.is_empty() {
                        self.set_status_message("Search cleared".to_string());
                    } else {
                        self.set_status_message(format!(
                            "Search applied: '{}' ({} tasks)",
                            self.filter_text,
                            self.visible_ids.len()
                        ));
                    }
                }
                KeyCode::Backspace => {
                    if !self.filter_text.is_empty() {
                        self.filter_text.pop();
                        self.refresh_view();
                    }
                }
                KeyCode::Char(c) => {
                    self.filter_text.push(c);
                    self.refresh_view();
                }
                _ => {}
            }
            return Ok(false);
        }

        match key {
            KeyCode::Char('q') if modifiers.contains(KeyModifiers::CONTROL) => return Ok(true),
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Ok(true),
            KeyCode::Esc => {
                if !self.filter_text.is_empty() {
                    self.filter_text.clear();
                    self.refresh_view();
                    self.clear_status_message();
                } else {
                    return Ok(true);
                }
            }

            KeyCode::Up => {
                if let Some(selected) = self.task_list_state.selected() {
                    if selected > 0 {
                        self.task_list_state.select(Some(selected - 1));
                    }
                } else if !self.visible_ids.is_empty() {
                    self.task_list_state.select(Some(0));
                }
            }
            KeyCode::Down => {
                if let Some(selected) = self.task_list_state.selected() {
                    if selected + 1 < self.visible_ids.len() {
                        self.task_list_state.select(Some(selected + 1));
                    }
                } else if !self.visible_ids.is_empty() {
                    self.task_list_state.select(Some(0));
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('e') => {
                if let Some(id) = self.selected_id() {
                    self.open_detail(&id);
                }
            }
            KeyCode::Char('a') => {
                if self.require_edit() {
                    self.task_form = TaskForm::new();
                    self.state = AppState::AddTask;
                    self.input_mode = InputMode::Text;
                }
            }
            KeyCode::Char('d') => {
                if self.require_edit() {
                    if let Some(id) = self.selected_id() {
                        self.confirm_delete = Some(id);
                        self.state = AppState::Confirm;
                    }
                }
            }
            KeyCode::Char('s') => {
                if self.require_edit() {
                    if let Some(id) = self.selected_id() {
                        if let Some(task) = self.session.get(&id) {
                            let mut draft = TaskDraft::from_task(task);
                            draft.status = next_status(draft.status);
                            let label = format_status(draft.status);
                            match self.session.update(draft.to_task()) {
                                Ok(()) => {
                                    self.refresh_view();
                                    self.set_status_message(format!("Status set to {label}"));
                                }
                                Err(e) => {
                                    self.set_status_message(format!("Error saving: {e}"))
                                }
                            }
                        }
                    }
                }
            }
            KeyCode::Char('/') => {
                self.filter_active = true;
                self.input_mode = InputMode::Text;
                self.set_status_message(
                    "Search mode: type to match title/description, Enter to apply, Esc to cancel"
                        .to_string(),
                );
            }
            KeyCode::Char('h') => {
                self.state = AppState::Help;
            }
            KeyCode::Char('u') => {
                self.exit_action = BoardExit::SwitchProfile;
                return Ok(true);
            }
            _ => {}
        }
        Ok(false)
    }

    /// Handle keyboard input inside the detail editor.
    ///
    /// Returns true if the application should quit.
    fn handle_detail_input(&mut self, key: KeyCode, _modifiers: KeyModifiers) -> io::Result<bool> {
        let rows = self.detail_rows();
        let current_row = rows.get(self.detail_index).copied();

        // A field edit in progress captures everything except Esc/Enter.
        if self.edit_buffer.is_some() {
            match key {
                KeyCode::Esc => {
                    self.edit_buffer = None;
                    self.input_mode = InputMode::None;
                }
                KeyCode::Enter => self.commit_edit_buffer(current_row),
                KeyCode::Backspace => {
                    if let Some(buf) = self.edit_buffer.as_mut() {
                        buf.handle_backspace();
                    }
                }
                KeyCode::Delete => {
                    if let Some(buf) = self.edit_buffer.as_mut() {
                        buf.handle_delete();
                    }
                }
                KeyCode::Left => {
                    if let Some(buf) = self.edit_buffer.as_mut() {
                        buf.move_cursor_left();
                    }
                }
                KeyCode::Right => {
                    if let Some(buf) = self.edit_buffer.as_mut() {
                        buf.move_cursor_right();
                    }
                }
                KeyCode::Char(c) => {
                    if let Some(buf) = self.edit_buffer.as_mut() {
                        buf.handle_char(c);
                    }
                }
                _ => {}
            }
            return Ok(false);
        }

        match key {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.close_detail();
            }
            KeyCode::Up => {
                if self.detail_index > 0 {
                    self.detail_index -= 1;
                }
            }
            KeyCode::Down => {
                if self.detail_index + 1 < rows.len() {
                    self.detail_index += 1;
                }
            }
            KeyCode::Enter => match current_row {
                Some(DetailRow::Title) => {
                    if self.require_edit() {
                        let value = self.draft.as_ref().map(|d| d.title.clone()).unwrap_or_default();
                        self.edit_buffer = Some(InputField::with_value(&value));
                        self.input_mode = InputMode::Text;
                    }
                }
                Some(DetailRow::Description) => {
                    if self.require_edit() {
                        let value = self
                            .draft
                            .as_ref()
                            .map(|d| d.description.clone())
                            .unwrap_or_default();
                        self.edit_buffer = Some(InputField::with_value(&value));
                        self.input_mode = InputMode::Text;
                    }
                }
                Some(DetailRow::NewSubtask) => {
                    if self.require_edit() {
                        self.edit_buffer = Some(InputField::new());
                        self.input_mode = InputMode::Text;
                    }
                }
                Some(DetailRow::Subtask(idx)) => self.toggle_subtask_at(idx),
                _ => {}
            },
            KeyCode::Char(' ') => {
                if let Some(DetailRow::Subtask(idx)) = current_row {
                    self.toggle_subtask_at(idx);
                }
            }
            KeyCode::Left => self.handle_detail_left_right(current_row, false),
            KeyCode::Right => self.handle_detail_left_right(current_row, true),
            KeyCode::Char('x') => {
                if let Some(DetailRow::Subtask(idx)) = current_row {
                    if self.require_edit() {
                        if let Some(draft) = self.draft.as_mut() {
                            if let Some(subtask_id) =
                                draft.subtasks.get(idx).map(|s| s.id.clone())
                            {
                                draft.remove_subtask(&subtask_id);
                            }
                        }
                        let len = self.detail_rows().len();
                        if self.detail_index >= len {
                            self.detail_index = len - 1;
                        }
                    }
                }
            }
            KeyCode::Char('s') => {
                if self.require_edit() {
                    self.save_draft();
                }
            }
            KeyCode::Char('d') => {
                if self.require_edit() {
                    if let Some(id) = self.draft.as_ref().map(|d| d.task_id().to_string()) {
                        self.confirm_delete = Some(id);
                        self.state = AppState::Confirm;
                    }
                }
            }
            _ => {}
        }
        Ok(false)
    }

    /// Apply a finished field edit to the working copy.
    fn commit_edit_buffer(&mut self, row: Option<DetailRow>) {
        let Some(buf) = self.edit_buffer.as_mut() else {
            return;
        };
        let value = buf.take();

        match row {
            Some(DetailRow::Title) => {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    // Keep the editor open rather than committing a blank title.
                    self.edit_buffer = Some(InputField::with_value(&value));
                    self.set_status_message("Title cannot be empty".to_string());
                    return;
                }
                if let Some(draft) = self.draft.as_mut() {
                    draft.title = trimmed.to_string();
                }
            }
            Some(DetailRow::Description) => {
                if let Some(draft) = self.draft.as_mut() {
                    draft.description = value;
                }
            }
            Some(DetailRow::NewSubtask) => {
                if let Some(draft) = self.draft.as_mut() {
                    draft.add_subtask(&value);
                }
                // The add-item row stays last; follow it past the new entry.
                self.detail_index = self.detail_rows().len() - 1;
            }
            _ => {}
        }

        self.edit_buffer = None;
        self.input_mode = InputMode::None;
    }

    /// Flip the checklist item at the given position in the working copy.
    fn toggle_subtask_at(&mut self, idx: usize) {
        if self.require_edit() {
            if let Some(draft) = self.draft.as_mut() {
                if let Some(subtask_id) = draft.subtasks.get(idx).map(|s| s.id.clone()) {
                    draft.toggle_subtask(&subtask_id);
                }
            }
        }
    }

    /// Cycle the status or department selector under the editor cursor.
    fn handle_detail_left_right(&mut self, row: Option<DetailRow>, right: bool) {
        match row {
            Some(DetailRow::Status) => {
                if self.require_edit() {
                    if let Some(draft) = self.draft.as_mut() {
                        draft.status = if right {
                            next_status(draft.status)
                        } else {
                            prev_status(draft.status)
                        };
                    }
                }
            }
            Some(DetailRow::Department) => {
                if self.require_edit() {
                    if let Some(draft) = self.draft.as_mut() {
                        let options = department_options();
                        // An unknown stored label is kept until the selector
                        // moves, at which point it joins the known cycle.
                        let pos = options
                            .iter()
                            .position(|o| o.as_deref() == draft.department.as_deref());
                        let next = match pos {
                            Some(i) if right => (i + 1) % options.len(),
                            Some(0) => options.len() - 1,
                            Some(i) => i - 1,
                            None => 0,
                        };
                        draft.department = options[next].clone();
                    }
                }
            }
            _ => {}
        }
    }

    /// Handle keyboard input in the add-task form.
    ///
    /// Returns true if the application should quit.
    fn handle_form_input(&mut self, key: KeyCode, _modifiers: KeyModifiers) -> io::Result<bool> {
        match key {
            KeyCode::Esc => {
                self.state = AppState::TaskList;
                self.input_mode = InputMode::None;
            }
            KeyCode::Tab | KeyCode::Down => {
                self.task_form.next_field();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.task_form.prev_field();
            }
            KeyCode::Left => {
                self.task_form.handle_left_right(false);
            }
            KeyCode::Right => {
                self.task_form.handle_left_right(true);
            }
            KeyCode::Backspace => {
                self.task_form.handle_backspace();
            }
            KeyCode::Delete => {
                self.task_form.handle_delete();
            }
            KeyCode::Enter => {
                // A blank title keeps the form open; the add is simply not
                // attempted.
                if self.task_form.title.value.trim().is_empty() {
                    return Ok(false);
                }

                match self.session.add(self.task_form.to_new_task()) {
                    Ok(task) => {
                        self.state = AppState::TaskList;
                        self.input_mode = InputMode::None;
                        self.refresh_view();
                        if let Some(idx) = self.visible_ids.iter().position(|id| *id == task.id) {
                            self.task_list_state.select(Some(idx));
                        }
                        self.set_status_message("Task created".to_string());
                    }
                    Err(e) => {
                        self.set_status_message(format!("Error: {e}"));
                    }
                }
            }
            KeyCode::Char(c) => {
                self.task_form.handle_char(c);
            }
            _ => {}
        }
        Ok(false)
    }

    /// Handle keyboard input in the delete confirmation dialog.
    ///
    /// Returns true if the application should quit.
    fn handle_confirm_input(&mut self, key: KeyCode, _modifiers: KeyModifiers) -> io::Result<bool> {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                if let Some(id) = self.confirm_delete.take() {
                    match self.session.remove(&id) {
                        Ok(()) => self.set_status_message("Task deleted".to_string()),
                        Err(e) => self.set_status_message(format!("Error deleting: {e}")),
                    }
                }
                self.draft = None;
                self.state = AppState::TaskList;
                self.refresh_view();
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.confirm_delete = None;
                self.state = if self.draft.is_some() {
                    AppState::TaskDetail
                } else {
                    AppState::TaskList
                };
            }
            _ => {}
        }
        Ok(false)
    }

    /// Handle keyboard input when viewing the help screen.
    ///
    /// Returns true if the application should quit.
    fn handle_help_input(&mut self, key: KeyCode, _modifiers: KeyModifiers) -> io::Result<bool> {
        match key {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('h') => {
                self.state = AppState::TaskList;
            }
            _ => {}
        }
        Ok(false)
    }

    /// Poll for and handle keyboard events based on current application state.
    ///
    /// Returns true if the application should quit.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                self.clear_status_message();

                let should_quit = match self.state {
                    AppState::TaskList => self.handle_task_list_input(key.code, key.modifiers)?,
                    AppState::TaskDetail => self.handle_detail_input(key.code, key.modifiers)?,
                    AppState::AddTask => self.handle_form_input(key.code, key.modifiers)?,
                    AppState::Help => self.handle_help_input(key.code, key.modifiers)?,
                    AppState::Confirm => self.handle_confirm_input(key.code, key.modifiers)?,
                };
                if should_quit {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// Render the board: header, task table, and counts.
    fn render_task_list(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Task table
            ])
            .split(area);

        let user = self.session.user();
        let context_display = format!(
            "Profile: {} ({})",
            user.name,
            format_role(user.role)
        );
        let header_text = vec![Line::from(vec![
            Span::styled("TASK BOARD", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                context_display,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ),
        ])];

        let header_block = Paragraph::new(header_text)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(header_block, chunks[0]);

        let header_cells = ["ID", "Status", "Department", "Created", "List", "Title"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD)));

        let header = Row::new(header_cells)
            .style(Style::default().bg(Color::Blue).fg(Color::White))
            .height(1);

        let rows: Vec<Row> = self
            .visible_ids
            .iter()
            .filter_map(|id| self.session.get(id))
            .map(|task| {
                let checklist = if task.subtasks.is_empty() {
                    "-".to_string()
                } else {
                    format!("{}/{}", task.checklist_done(), task.subtasks.len())
                };

                let style = match task.status {
                    Status::Done => Style::default().fg(Color::DarkGray),
                    Status::InProgress => {
                        Style::default().fg(GOLD).add_modifier(Modifier::BOLD)
                    }
                    Status::ToDo => Style::default().fg(Color::White),
                };

                Row::new(vec![
                    Cell::from(short_id(&task.id).to_string()),
                    Cell::from(format_status(task.status)),
                    Cell::from(format_department(task.department.as_deref()).to_string()),
                    Cell::from(format_created(task.created_at_utc)),
                    Cell::from(checklist),
                    Cell::from(task.title.clone()),
                ])
                .style(style)
            })
            .collect();

        let widths = [
            Constraint::Length(9),  // ID
            Constraint::Length(11), // Status
            Constraint::Length(13), // Department
            Constraint::Length(11), // Created
            Constraint::Length(6),  // List
            Constraint::Min(25),    // Title
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(format!(
                "Tasks ({}/{}) - Press 'h' for help",
                self.visible_ids.len(),
                self.session.tasks().len()
            )))
            .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, chunks[1], &mut self.task_list_state);
    }

    /// Render the detail editor over the working copy.
    fn render_task_detail(&mut self, f: &mut Frame, area: Rect) {
        let Some(draft) = self.draft.as_ref() else {
            return;
        };

        let rows = self.detail_rows();
        let can_edit = self.session.can_edit();
        let dirty = self.draft_dirty();
        let created = self
            .session
            .get(draft.task_id())
            .map(|t| format_created(t.created_at_utc))
            .unwrap_or_else(|| "-".to_string());

        let mut lines: Vec<Line> = Vec::new();
        let mut cursor_pos: Option<(u16, u16)> = None;

        let field_line = |label: &str, value: String, selected: bool| {
            let marker = if selected { "> " } else { "  " };
            Line::from(vec![
                Span::raw(marker.to_string()),
                Span::styled(
                    format!("{:<width$}", label, width = DETAIL_LABEL_WIDTH),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(value),
            ])
        };

        for (idx, row) in rows.iter().enumerate() {
            let selected = idx == self.detail_index;
            let editing = selected && self.edit_buffer.is_some();

            match row {
                DetailRow::Title => {
                    let value = if editing {
                        self.edit_buffer.as_ref().map(|b| b.value.clone()).unwrap_or_default()
                    } else {
                        draft.title.clone()
                    };
                    if editing {
                        let cursor = self.edit_buffer.as_ref().map(|b| b.cursor).unwrap_or(0);
                        cursor_pos = Some((
                            (2 + DETAIL_LABEL_WIDTH + cursor) as u16,
                            lines.len() as u16,
                        ));
                    }
                    lines.push(field_line("Title:", value, selected));
                }
                DetailRow::Description => {
                    let value = if editing {
                        self.edit_buffer.as_ref().map(|b| b.value.clone()).unwrap_or_default()
                    } else if draft.description.is_empty() {
                        "-".to_string()
                    } else {
                        draft.description.clone()
                    };
                    if editing {
                        let cursor = self.edit_buffer.as_ref().map(|b| b.cursor).unwrap_or(0);
                        cursor_pos = Some((
                            (2 + DETAIL_LABEL_WIDTH + cursor) as u16,
                            lines.len() as u16,
                        ));
                    }
                    lines.push(field_line("Description:", value, selected));
                }
                DetailRow::Status => {
                    lines.push(field_line(
                        "Status:",
                        format!("< {} >", format_status(draft.status)),
                        selected,
                    ));
                }
                DetailRow::Department => {
                    lines.push(field_line(
                        "Department:",
                        format!("< {} >", format_department(draft.department.as_deref())),
                        selected,
                    ));

                    // Fixed metadata and the checklist header sit between the
                    // fields and the checklist rows.
                    lines.push(field_line("Created:", created.clone(), false));
                    lines.push(Line::from(""));
                    lines.push(Line::from(vec![Span::styled(
                        format!(
                            "  Checklist {}/{} ({}%)",
                            draft.checklist_done(),
                            draft.subtasks.len(),
                            draft.progress_percent()
                        ),
                        Style::default().add_modifier(Modifier::BOLD),
                    )]));
                }
                DetailRow::Subtask(i) => {
                    if let Some(subtask) = draft.subtasks.get(*i) {
                        let marker = if selected { "> " } else { "  " };
                        let mark = if subtask.completed { "x" } else { " " };
                        let style = if subtask.completed {
                            Style::default().fg(DARK_GREEN)
                        } else {
                            Style::default()
                        };
                        lines.push(Line::from(vec![
                            Span::raw(marker.to_string()),
                            Span::styled(format!("[{mark}] {}", subtask.title), style),
                        ]));
                    }
                }
                DetailRow::NewSubtask => {
                    let marker = if selected { "> " } else { "  " };
                    if editing {
                        let buf = self.edit_buffer.as_ref();
                        let value = buf.map(|b| b.value.clone()).unwrap_or_default();
                        let cursor = buf.map(|b| b.cursor).unwrap_or(0);
                        cursor_pos = Some(((2 + 2 + cursor) as u16, lines.len() as u16));
                        lines.push(Line::from(format!("{marker}+ {value}")));
                    } else {
                        lines.push(Line::from(vec![
                            Span::raw(marker.to_string()),
                            Span::styled(
                                "+ Add checklist item",
                                Style::default().fg(Color::DarkGray),
                            ),
                        ]));
                    }
                }
            }
        }

        let title = if !can_edit {
            "Task (read-only) - [Esc] back".to_string()
        } else if dirty {
            "Task (unsaved changes) - [s]ave, [d]elete, [Esc] back".to_string()
        } else {
            "Task - [s]ave, [d]elete, [Esc] back".to_string()
        };

        let border_style = if dirty {
            Style::default().fg(GOLD)
        } else {
            Style::default()
        };

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(border_style),
        );

        f.render_widget(paragraph, area);

        if let Some((x, y)) = cursor_pos {
            f.set_cursor_position((area.x + 1 + x, area.y + 1 + y));
        }
    }

    /// Render the add-task form.
    fn render_task_form(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                [
                    Constraint::Length(3), // Title
                    Constraint::Length(3), // Description
                    Constraint::Length(3), // Status
                    Constraint::Length(3), // Department
                    Constraint::Min(1),    // Instructions
                ]
                .as_ref(),
            )
            .split(area);

        let active_style = |field: usize| {
            if self.task_form.current_field == field {
                Style::default().fg(GOLD)
            } else {
                Style::default()
            }
        };

        let title_input = Paragraph::new(self.task_form.title.value.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Title *")
                .border_style(active_style(TITLE_FIELD)),
        );
        f.render_widget(title_input, chunks[0]);

        let desc_input = Paragraph::new(self.task_form.description.value.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Description")
                .border_style(active_style(DESCRIPTION_FIELD)),
        );
        f.render_widget(desc_input, chunks[1]);

        let status_selector =
            Paragraph::new(format!("< {} >", format_status(self.task_form.selected_status())))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Status")
                        .border_style(active_style(STATUS_FIELD)),
                );
        f.render_widget(status_selector, chunks[2]);

        let department = self
            .task_form
            .selected_department()
            .unwrap_or_else(|| "None".to_string());
        let department_selector = Paragraph::new(format!("< {department} >")).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Department")
                .border_style(active_style(DEPARTMENT_FIELD)),
        );
        f.render_widget(department_selector, chunks[3]);

        let instructions = Paragraph::new(
            "Tab/↑↓ move between fields  ←→ move cursor / change selectors  Enter create  Esc cancel",
        )
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
        f.render_widget(instructions, chunks[4]);

        let cursor_field = match self.task_form.current_field {
            TITLE_FIELD => Some((chunks[0], &self.task_form.title)),
            DESCRIPTION_FIELD => Some((chunks[1], &self.task_form.description)),
            _ => None,
        };
        if let Some((chunk, field)) = cursor_field {
            f.set_cursor_position((chunk.x + field.cursor as u16 + 1, chunk.y + 1));
        }
    }

    /// Render the help screen with keyboard shortcuts.
    fn render_help(&mut self, f: &mut Frame, area: Rect) {
        let help_text = vec![
            Line::from(vec![Span::styled(
                "Task Board Help",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Board:",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from("  ↑/↓          Navigate tasks"),
            Line::from("  Enter/Space  Open the task editor"),
            Line::from("  a            Add a new task"),
            Line::from("  d            Delete the selected task"),
            Line::from("  s            Cycle status (ToDo, InProgress, Done)"),
            Line::from("  /            Search title and description"),
            Line::from("  u            Switch profile"),
            Line::from("  h            Show this help"),
            Line::from("  Esc          Clear search / quit"),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Task Editor:",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from("  ↑/↓          Select a field or checklist item"),
            Line::from("  Enter        Edit the selected field / add a checklist item"),
            Line::from("  ←/→          Change status or department"),
            Line::from("  Space        Toggle the selected checklist item"),
            Line::from("  x            Remove the selected checklist item"),
            Line::from("  s            Save changes"),
            Line::from("  d            Delete the task"),
            Line::from("  Esc          Back to the board (unsaved edits are discarded)"),
            Line::from(""),
            Line::from("Read-only profiles can browse and search but not change the board."),
        ];

        let paragraph = Paragraph::new(help_text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Help - Press any key to return"),
            )
            .wrap(Wrap { trim: true });

        f.render_widget(paragraph, area);
    }

    /// Render a confirmation dialog for task deletion.
    fn render_confirm(&mut self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Confirm Action")
            .borders(Borders::ALL)
            .style(Style::default().bg(DARK_RED));

        let area = centered_rect(50, 20, area);
        f.render_widget(Clear, area);

        let title = self
            .confirm_delete
            .as_ref()
            .and_then(|id| self.session.get(id))
            .map(|t| t.title.clone())
            .unwrap_or_default();

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "Are you sure you want to:",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from(format!("Delete task '{title}'")),
            Line::from(""),
            Line::from("This action cannot be undone."),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];

        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        f.render_widget(paragraph, area);
    }

    /// Render the status bar at the bottom of the screen.
    fn render_status_bar(&mut self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else if self.filter_active {
            format!(
                "Search: {} (Esc to clear, Enter to confirm)",
                self.filter_text
            )
        } else if !self.filter_text.is_empty() && self.state == AppState::TaskList {
            format!(
                "Tasks: {} (matching '{}') | Press 'h' for help",
                self.visible_ids.len(),
                self.filter_text
            )
        } else {
            match self.state {
                AppState::TaskList => {
                    format!("Tasks: {} | Press 'h' for help", self.visible_ids.len())
                }
                AppState::TaskDetail => {
                    if self.input_mode == InputMode::Text {
                        "Editing - Enter to apply, Esc to cancel".to_string()
                    } else if self.session.can_edit() {
                        "↑↓ select  Enter edit  Space toggle  s save  Esc back".to_string()
                    } else {
                        "Read-only view - Esc back".to_string()
                    }
                }
                AppState::AddTask => "Add Task - Enter to create, Esc to cancel".to_string(),
                AppState::Help => "Help".to_string(),
                AppState::Confirm => "Confirm Action".to_string(),
            }
        };

        let status = Paragraph::new(status_text)
            .style(Style::default().bg(Color::Blue).fg(Color::White))
            .alignment(Alignment::Left);

        f.render_widget(status, area);
    }

    /// Main render function that dispatches to appropriate view renderers.
    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
            .split(f.area());

        match self.state {
            AppState::TaskList => self.render_task_list(f, chunks[0]),
            AppState::TaskDetail => self.render_task_detail(f, chunks[0]),
            AppState::AddTask => self.render_task_form(f, chunks[0]),
            AppState::Help => self.render_help(f, chunks[0]),
            AppState::Confirm => {
                if self.draft.is_some() {
                    self.render_task_detail(f, chunks[0]);
                } else {
                    self.render_task_list(f, chunks[0]);
                }
                self.render_confirm(f, chunks[0]);
            }
        }

        self.render_status_bar(f, chunks[1]);
    }

    /// Main event loop for the board application.
    ///
    /// Handles rendering and input processing until the user exits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}

/// Next status in the ToDo, InProgress, Done cycle.
fn next_status(status: Status) -> Status {
    match status {
        Status::ToDo => Status::InProgress,
        Status::InProgress => Status::Done,
        Status::Done => Status::ToDo,
    }
}

/// Previous status in the ToDo, InProgress, Done cycle.
fn prev_status(status: Status) -> Status {
    match status {
        Status::ToDo => Status::Done,
        Status::InProgress => Status::ToDo,
        Status::Done => Status::InProgress,
    }
}
