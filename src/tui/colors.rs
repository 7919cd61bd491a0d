//! Color constants for the terminal user interface.

use ratatui::style::Color;

// Status accents for board rows and the detail editor

/// Used for InProgress tasks and the active form field
pub const GOLD: Color = Color::Rgb(255, 215, 0);
/// Used for completed checklist items
pub const DARK_GREEN: Color = Color::Rgb(0, 80, 0);
/// Used for the delete confirmation dialog
pub const DARK_RED: Color = Color::Rgb(114, 0, 0);
