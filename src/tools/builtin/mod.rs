//! Built-in tool stubs
//!
//! Neither tool touches the filesystem or a database. Each logs the call
//! and returns what a real implementation would report.

pub mod activity_log;
pub mod save_file;

pub use activity_log::ActivityLogTool;
pub use save_file::SaveFileTool;
