//! Terminal interaction: line prompts, session menus and the clipboard

mod clipboard;
mod terminal;

pub use clipboard::copy_to_clipboard;
pub use terminal::Terminal;
