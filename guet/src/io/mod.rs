//! I/O helpers for guet commands.

pub mod committers;
pub mod errors_log;
pub mod files;
pub mod git;
pub mod hooks;
pub mod paths;
pub mod settings;
