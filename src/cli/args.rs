//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::Parser;
use std::path::PathBuf;

use crate::requirements::probe::DEFAULT_PYTHON;

/// reqcheck - Report the installed version satisfying each requirement.
#[derive(Debug, Clone, Parser)]
#[command(name = "reqcheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Site-packages directory to scan instead of asking the interpreter
    /// (repeatable or comma-separated)
    #[arg(
        long = "site-packages",
        value_name = "DIR",
        env = "REQCHECK_SITE_PACKAGES",
        value_delimiter = ','
    )]
    pub site_packages: Vec<PathBuf>,

    /// Python interpreter whose search path is scanned
    #[arg(long, value_name = "PROGRAM", env = "REQCHECK_PYTHON", default_value = DEFAULT_PYTHON)]
    pub python: String,

    /// Print `None` for malformed requirements instead of aborting
    #[arg(long, env = "REQCHECK_KEEP_GOING")]
    pub keep_going: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Requirement specifiers, e.g. `requests>=2.31`
    #[arg(value_name = "REQUIREMENT")]
    pub requirements: Vec<String>,
}
