//! Profile selection menu shown when the board UI starts.
//!
//! Picking a profile is the whole login story: the menu lists the built-in
//! users with their role and scope, and hands the selection back to the
//! entry point, which opens a board session for it.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};

use crate::fields::format_role;
use crate::storage::Storage;
use crate::user::{most_recent_user, profiles, role_can_edit, User};
use crate::view::Visibility;

/// Profile menu application state.
pub struct MenuApp {
    list_state: ListState,
    users: Vec<User>,
    status_message: String,
    should_exit: bool,
    selected_user: Option<User>,
}

impl MenuApp {
    /// Create a new menu, preselecting the most recently used profile.
    pub fn new(storage: &Storage) -> Self {
        let users = profiles();
        let recent = most_recent_user(storage);
        let initial = users.iter().position(|u| u.id == recent.id).unwrap_or(0);

        let mut app = MenuApp {
            list_state: ListState::default(),
            users,
            status_message: String::new(),
            should_exit: false,
            selected_user: None,
        };
        app.list_state.select(Some(initial));
        app
    }

    /// Get the selected profile if one was chosen.
    pub fn selected_user(&self) -> Option<&User> {
        self.selected_user.as_ref()
    }

    /// Handle keyboard input for the profile list.
    fn handle_input(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                self.status_message.clear();

                match key.code {
                    KeyCode::Up => {
                        if let Some(selected) = self.list_state.selected() {
                            if selected > 0 {
                                self.list_state.select(Some(selected - 1));
                            }
                        }
                    }
                    KeyCode::Down => {
                        if let Some(selected) = self.list_state.selected() {
                            if selected + 1 < self.users.len() {
                                self.list_state.select(Some(selected + 1));
                            }
                        }
                    }
                    KeyCode::Enter => {
                        if let Some(selected) = self.list_state.selected() {
                            if let Some(user) = self.users.get(selected) {
                                self.selected_user = Some(user.clone());
                                self.should_exit = true;
                            }
                        }
                    }
                    KeyCode::Esc | KeyCode::Char('q') => {
                        self.should_exit = true;
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Main render function for the menu screen.
    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
            .split(f.area());

        self.render_profile_list(f, chunks[0]);
        self.render_status_bar(f, chunks[1]);
    }

    /// Render the header and the profile list.
    fn render_profile_list(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Profiles
            ])
            .split(area);

        let header_text = vec![Line::from(vec![Span::styled(
            "TASK BOARD",
            Style::default().add_modifier(Modifier::BOLD),
        )])];

        let header = Paragraph::new(header_text)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::White));

        f.render_widget(header, chunks[0]);

        let profile_items: Vec<ListItem> = self
            .users
            .iter()
            .map(|user| {
                let note = match Visibility::for_role(user.role) {
                    Visibility::DepartmentScoped(d) => format!("{d} only"),
                    Visibility::Unrestricted if !role_can_edit(user.role) => {
                        "read-only".to_string()
                    }
                    Visibility::Unrestricted => String::new(),
                };
                ListItem::new(Line::from(format!(
                    "  {:<18} {:<16} {}",
                    user.name,
                    format_role(user.role),
                    note
                )))
            })
            .collect();

        let profile_list = List::new(profile_items)
            .block(Block::default().borders(Borders::ALL).title("Who is working?"))
            .highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol("► ");

        f.render_stateful_widget(profile_list, chunks[1], &mut self.list_state);
    }

    /// Render the status bar with key hints.
    fn render_status_bar(&mut self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            "Use ↑↓ to navigate, Enter to select, q/Esc to quit".to_string()
        };

        let status = Paragraph::new(status_text)
            .style(Style::default().bg(Color::Blue).fg(Color::White))
            .alignment(Alignment::Left);

        f.render_widget(status, area);
    }

    /// Main event loop for the menu.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            self.handle_input()?;

            if self.should_exit {
                break;
            }
        }
        Ok(())
    }
}
