pub mod hooks;
pub mod rich_text;
pub mod sticky_note;
pub mod ui;
