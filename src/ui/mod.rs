//! UI module containing all user interface components and signal handlers.

pub mod dialogs;
pub mod editor;
pub mod file_ops;
pub mod main_window;
pub mod settings;
