// TUI widget modules for each dashboard panel.

pub mod dialogs;
pub mod documents;
pub mod help_bar;
pub mod policies;
pub mod status_bar;
pub mod upload;
