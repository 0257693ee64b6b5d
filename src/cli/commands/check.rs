//! Check command implementation.
//!
//! `reqcheck <requirement>...` prints one line per requirement: the
//! satisfying installed distribution as `name^version`, or `None`.

use std::io::Write;
use std::path::PathBuf;

use crate::cli::args::Cli;
use crate::error::Result;
use crate::requirements::checker::{MalformedPolicy, RequirementChecker, EXIT_USAGE};
use crate::requirements::probe::InterpreterProbe;
use crate::requirements::registry::SitePackagesRegistry;
use crate::requirements::specifier::Pep508Parser;

use super::dispatcher::{Command, CommandResult};

/// Printed to stdout when no requirements are given.
pub const USAGE: &str = "Usage: reqcheck requirement [requirements]";

/// The check command implementation.
pub struct CheckCommand {
    args: Cli,
}

impl CheckCommand {
    /// Create a new check command.
    pub fn new(args: Cli) -> Self {
        Self { args }
    }

    fn policy(&self) -> MalformedPolicy {
        if self.args.keep_going {
            MalformedPolicy::Report
        } else {
            MalformedPolicy::Abort
        }
    }

    /// Directories to scan: explicit ones if given, else the interpreter's.
    fn search_path(&self) -> Result<Vec<PathBuf>> {
        if !self.args.site_packages.is_empty() {
            tracing::debug!(dirs = ?self.args.site_packages, "using configured site-packages");
            return Ok(self.args.site_packages.clone());
        }

        let info = InterpreterProbe::new(self.args.python.as_str()).run()?;
        Ok(info.site_dirs())
    }
}

impl Command for CheckCommand {
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult> {
        if self.args.requirements.is_empty() {
            writeln!(out, "{}", USAGE)?;
            return Ok(CommandResult::failure(EXIT_USAGE));
        }

        let search_path = self.search_path()?;
        let registry = SitePackagesRegistry::discover(&search_path);
        let checker = RequirementChecker::new(&Pep508Parser, &registry).with_policy(self.policy());

        let report = checker.check_all(&self.args.requirements, out)?;
        for failure in report.failures() {
            tracing::debug!(requirement = %failure.requirement, "not satisfied");
        }

        Ok(CommandResult::from_exit_code(report.exit_code()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReqcheckError;
    use clap::Parser;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn site_packages(installed: &[(&str, &str)]) -> TempDir {
        let temp = TempDir::new().unwrap();
        for (name, version) in installed {
            let entry = temp.path().join(format!("{}-{}.dist-info", name, version));
            fs::create_dir(&entry).unwrap();
            fs::write(
                entry.join("METADATA"),
                format!("Name: {}\nVersion: {}\n", name, version),
            )
            .unwrap();
        }
        temp
    }

    fn command(site: &Path, extra: &[&str]) -> CheckCommand {
        let site = site.display().to_string();
        let mut argv = vec!["reqcheck", "--site-packages", site.as_str()];
        argv.extend_from_slice(extra);
        CheckCommand::new(Cli::parse_from(argv))
    }

    fn execute(cmd: &CheckCommand) -> (Result<CommandResult>, String) {
        let mut out = Vec::new();
        let result = cmd.execute(&mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn all_satisfied_exits_zero() {
        let site = site_packages(&[("somepkg", "1.2.3")]);
        let (result, out) = execute(&command(site.path(), &["somepkg==1.2.3"]));
        let result = result.unwrap();
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
        assert_eq!(out, "somepkg^1.2.3\n");
    }

    #[test]
    fn any_missing_exits_one() {
        let site = site_packages(&[("pkgA", "1.0")]);
        let (result, out) = execute(&command(site.path(), &["pkgA==1.0", "pkgB"]));
        let result = result.unwrap();
        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
        assert_eq!(out, "pkgA^1.0\nNone\n");
    }

    #[test]
    fn no_requirements_prints_usage() {
        let site = site_packages(&[]);
        let (result, out) = execute(&command(site.path(), &[]));
        assert_eq!(result.unwrap().exit_code, 2);
        assert_eq!(out, format!("{}\n", USAGE));
    }

    #[test]
    fn malformed_aborts_without_keep_going() {
        let site = site_packages(&[]);
        let cmd = command(site.path(), &["==1.0"]);
        assert_eq!(cmd.policy(), MalformedPolicy::Abort);
        let (result, out) = execute(&cmd);
        assert!(matches!(
            result.unwrap_err(),
            ReqcheckError::MalformedRequirement { .. }
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn malformed_reported_with_keep_going() {
        let site = site_packages(&[("pkgA", "1.0")]);
        let (result, out) = execute(&command(site.path(), &["--keep-going", "==1.0", "pkgA"]));
        let result = result.unwrap();
        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
        assert_eq!(out, "None\npkgA^1.0\n");
    }

    #[test]
    fn missing_interpreter_is_an_error() {
        let cmd = CheckCommand::new(Cli::parse_from([
            "reqcheck",
            "--python",
            "/nonexistent/bin/python3",
            "pkg",
        ]));
        let (result, out) = execute(&cmd);
        assert!(matches!(
            result.unwrap_err(),
            ReqcheckError::InterpreterNotFound { .. }
        ));
        assert!(out.is_empty());
    }
}
