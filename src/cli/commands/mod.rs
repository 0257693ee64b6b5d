//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results. reqcheck has a
//! single command, [`check::CheckCommand`], routed by [`CommandDispatcher`].

pub mod check;
pub mod dispatcher;

pub use check::{CheckCommand, USAGE};
pub use dispatcher::{Command, CommandDispatcher, CommandResult};
