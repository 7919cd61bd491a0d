//! Board UI entry point and terminal setup.
//!
//! The UI flows profile menu -> board. Switching profiles from the board
//! drops the session and returns to the menu; quitting anywhere tears the
//! terminal down and returns to the shell.

use std::io;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::session::Session;
use crate::storage::Storage;
use crate::tui::app::{App, BoardExit};
use crate::tui::menu::MenuApp;
use crate::user::User;

/// Run the full interface: profile menu, then the board for the chosen
/// profile, until the user quits.
pub fn run_tui(storage: Storage) -> io::Result<()> {
    loop {
        let Some(user) = run_menu(&storage)? else {
            return Ok(());
        };

        match run_board(user, storage.clone())? {
            BoardExit::SwitchProfile => continue,
            BoardExit::Quit => return Ok(()),
        }
    }
}

/// Initialise the terminal and run the profile menu.
/// Returns the chosen profile, or `None` when the user quit instead.
fn run_menu(storage: &Storage) -> io::Result<Option<User>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = MenuApp::new(storage);
    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;
    Ok(app.selected_user().cloned())
}

/// Initialise the terminal and run the board for one profile session.
/// Returns the exit action requested by the user.
fn run_board(user: User, storage: Storage) -> io::Result<BoardExit> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(Session::open(user, storage));
    let result = app.run(&mut terminal);
    let exit_action = app.exit_action();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;
    Ok(exit_action)
}
