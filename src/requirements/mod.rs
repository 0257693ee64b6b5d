//! Requirement parsing and installed-version lookup.
//!
//! This module answers "which installed distribution satisfies this
//! requirement?" for Python requirement specifiers.
//!
//! # Modules
//!
//! - [`checker`] - Walks requirement arguments and reports one line each
//! - [`metadata`] - Installed distribution metadata (`METADATA`, `PKG-INFO`)
//! - [`probe`] - Interpreter probe for discovering the package search path
//! - [`registry`] - Installed-package registry built from search path directories
//! - [`specifier`] - PEP 508 requirement specifier parsing
//! - [`status`] - Check status types and output lines

pub mod checker;
pub mod metadata;
pub mod probe;
pub mod registry;
pub mod specifier;
pub mod status;

pub use checker::{CheckReport, MalformedPolicy, RequirementChecker};
pub use metadata::InstalledDistribution;
pub use probe::InterpreterProbe;
pub use registry::{InstalledRegistry, SitePackagesRegistry};
pub use specifier::{Pep508Parser, RequirementParser, RequirementSpec};
pub use status::{CheckResult, CheckStatus};
