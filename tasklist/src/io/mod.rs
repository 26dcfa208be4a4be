//! I/O helpers for tasklist commands.

pub mod answers_store;
pub mod config;
pub mod init;
pub mod schema_store;
