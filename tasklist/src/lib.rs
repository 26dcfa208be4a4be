//! Task-list status and navigation engine for multi-page forms.
//!
//! Given a form schema (tasks made of pages made of fields) and the answers
//! submitted so far, this crate derives each task's status, the path a user
//! should visit next, and whether the final "check your answers" step may be
//! entered. The architecture keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (inclusion, status, navigation,
//!   task-list projection, schema compilation). No I/O.
//! - **[`io`]**: Loading config, form definitions and answers from disk.
//!
//! Orchestration modules ([`project`], [`report`], [`route`], [`review`],
//! [`validate`]) coordinate core logic with I/O to implement CLI commands.

pub mod core;
pub mod exit_codes;
pub mod form;
pub mod io;
pub mod logging;
pub mod project;
pub mod report;
pub mod review;
pub mod route;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod validate;
