//! reqcheck - Report installed Python package versions.
//!
//! Given one or more PEP 508 requirement specifiers, reqcheck prints the
//! installed distribution satisfying each one (as `name^version`), or
//! `None` when nothing installed does. Installers and build pipelines use
//! the output and exit status to check preconditions.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`error`] - Error types and result aliases
//! - [`requirements`] - Requirement parsing, installed-package registry, checking
//!
//! # Example
//!
//! ```
//! use std::path::PathBuf;
//! use reqcheck::requirements::{
//!     InstalledDistribution, Pep508Parser, RequirementChecker, SitePackagesRegistry,
//! };
//!
//! let registry = SitePackagesRegistry::from_distributions(vec![
//!     InstalledDistribution::new("somepkg", "1.2.3", PathBuf::from("/site-packages")).unwrap(),
//! ]);
//! let checker = RequirementChecker::new(&Pep508Parser, &registry);
//!
//! let mut out = Vec::new();
//! let report = checker
//!     .check_all(&["somepkg==1.2.3".to_string()], &mut out)
//!     .unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "somepkg^1.2.3\n");
//! assert_eq!(report.exit_code(), 0);
//! ```

pub mod cli;
pub mod error;
pub mod requirements;

pub use error::{ReqcheckError, Result};
