//! Interpreter probe for discovering the package search path.
//!
//! Which packages count as "installed" depends on the Python interpreter
//! doing the importing: its `sys.path` decides which site-packages
//! directories are visible, and in which order. The `InterpreterProbe` runs
//! the interpreter once and asks it for that list.
//!
//! # Example
//!
//! ```no_run
//! use reqcheck::requirements::probe::InterpreterProbe;
//!
//! let probe = InterpreterProbe::new("python3");
//! let info = probe.run().unwrap();
//! for dir in info.site_dirs() {
//!     println!("search path entry: {}", dir.display());
//! }
//! ```

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::Deserialize;

use crate::error::{ReqcheckError, Result};

/// Interpreter used when none is configured.
pub const DEFAULT_PYTHON: &str = "python3";

/// Printed by the interpreter; must stay a single `-c` argument.
const SYS_PATH_SCRIPT: &str =
    "import json, sys; json.dump({'sys_path': sys.path, 'prefix': sys.prefix}, sys.stdout)";

/// What the interpreter reports about itself.
#[derive(Debug, Clone, Deserialize)]
pub struct InterpreterInfo {
    /// `sys.path`, in import order.
    pub sys_path: Vec<PathBuf>,
    /// `sys.prefix` (the venv root when running inside one).
    pub prefix: PathBuf,
}

impl InterpreterInfo {
    /// Decode the probe script's output.
    pub fn from_json(output: &str) -> serde_json::Result<Self> {
        serde_json::from_str(output.trim())
    }

    /// `sys.path` entries worth scanning: non-empty directories that exist.
    ///
    /// Unzipped `.egg` entries are kept (the registry reads them as a single
    /// distribution). Zip archives and missing entries are dropped; duplicates
    /// keep their first position.
    pub fn site_dirs(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = Vec::new();
        for entry in &self.sys_path {
            if entry.as_os_str().is_empty() || !entry.is_dir() || dirs.contains(entry) {
                continue;
            }
            dirs.push(entry.clone());
        }
        dirs
    }
}

/// Whether `path` could be launched as an interpreter.
///
/// A stale `python3` left without its execute bits (a half-removed pyenv
/// shim, say) is not a candidate.
#[cfg(unix)]
pub fn is_runnable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// Outside unix any regular file is a candidate; the OS decides on launch.
#[cfg(not(unix))]
pub fn is_runnable(path: &Path) -> bool {
    path.is_file()
}

/// Find the interpreter named `python` in `dirs`, first runnable match wins.
pub fn find_interpreter(python: &str, dirs: &[PathBuf]) -> Option<PathBuf> {
    dirs.iter()
        .map(|dir| dir.join(python))
        .find(|candidate| is_runnable(candidate))
}

/// Directories listed in `PATH`, in lookup order.
pub fn path_dirs() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}

/// Runs a Python interpreter to learn its search path.
#[derive(Debug, Clone)]
pub struct InterpreterProbe {
    python: String,
    path_entries: Vec<PathBuf>,
}

impl InterpreterProbe {
    /// Probe `python`, looked up on the system PATH unless it is a path.
    pub fn new(python: impl Into<String>) -> Self {
        Self::with_path_entries(python, path_dirs())
    }

    /// Look the interpreter up in `path_entries` instead of `PATH`.
    pub fn with_path_entries(python: impl Into<String>, path_entries: Vec<PathBuf>) -> Self {
        Self {
            python: python.into(),
            path_entries,
        }
    }

    /// Locate the interpreter binary.
    pub fn resolve(&self) -> Result<PathBuf> {
        let not_found = || ReqcheckError::InterpreterNotFound {
            python: self.python.clone(),
        };

        let as_path = Path::new(&self.python);
        if as_path.components().count() > 1 || as_path.is_absolute() {
            return if as_path.is_file() {
                Ok(as_path.to_path_buf())
            } else {
                Err(not_found())
            };
        }

        find_interpreter(&self.python, &self.path_entries).ok_or_else(not_found)
    }

    /// Run the interpreter and decode what it reports.
    pub fn run(&self) -> Result<InterpreterInfo> {
        let binary = self.resolve()?;
        tracing::debug!(python = %binary.display(), "probing interpreter search path");

        let failed = |message: String| ReqcheckError::InterpreterProbeFailed {
            python: binary.display().to_string(),
            message,
        };

        let output = Command::new(&binary)
            .arg("-c")
            .arg(SYS_PATH_SCRIPT)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| failed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(failed(match output.status.code() {
                Some(code) => format!("exited with code {}: {}", code, stderr.trim()),
                None => format!("terminated by signal: {}", stderr.trim()),
            }));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let info = InterpreterInfo::from_json(&stdout)
            .map_err(|e| failed(format!("unexpected output: {}", e)))?;

        tracing::debug!(prefix = %info.prefix.display(), entries = info.sys_path.len(), "interpreter probed");
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Stand-in interpreter: a shell script running `body` for any arguments.
    fn fake_python(path: &Path, body: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    /// A `python3` that lost its execute bits.
    #[cfg(unix)]
    fn stale_python(path: &Path) {
        use std::os::unix::fs::PermissionsExt;
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "#!/bin/sh\n").unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(0o644)).unwrap();
    }

    #[test]
    fn earlier_path_dir_wins() {
        let temp = TempDir::new().unwrap();
        let venv_bin = temp.path().join("venv/bin");
        let usr_bin = temp.path().join("usr/bin");

        fake_python(&venv_bin.join("python3"), "");
        fake_python(&usr_bin.join("python3"), "");

        let found = find_interpreter("python3", &[venv_bin.clone(), usr_bin]);
        assert_eq!(found, Some(venv_bin.join("python3")));
    }

    #[test]
    fn interpreter_absent_from_path_dirs() {
        let temp = TempDir::new().unwrap();
        assert!(find_interpreter("python3", &[temp.path().to_path_buf()]).is_none());
    }

    #[test]
    fn directory_named_like_interpreter_is_skipped() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("bin/python3")).unwrap();
        assert!(find_interpreter("python3", &[temp.path().join("bin")]).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn stale_interpreter_without_exec_bits_is_skipped() {
        let temp = TempDir::new().unwrap();
        let shim_bin = temp.path().join("shims");
        let usr_bin = temp.path().join("usr/bin");

        stale_python(&shim_bin.join("python3"));
        fake_python(&usr_bin.join("python3"), "");

        let found = find_interpreter("python3", &[shim_bin, usr_bin.clone()]);
        assert_eq!(found, Some(usr_bin.join("python3")));
    }

    #[test]
    fn missing_file_is_not_runnable() {
        assert!(!is_runnable(Path::new("/nonexistent/bin/python3")));
    }

    #[cfg(unix)]
    #[test]
    fn interpreter_info_decodes_and_filters() {
        let temp = TempDir::new().unwrap();
        let site = temp.path().join("site-packages");
        fs::create_dir(&site).unwrap();

        let json = format!(
            r#"{{"sys_path": ["", "{site}", "{missing}", "{site}"], "prefix": "{prefix}"}}"#,
            site = site.display(),
            missing = temp.path().join("lib/python311.zip").display(),
            prefix = temp.path().display(),
        );
        let info = InterpreterInfo::from_json(&json).unwrap();
        assert_eq!(info.sys_path.len(), 4);
        assert_eq!(info.site_dirs(), vec![site]);
    }

    #[test]
    fn interpreter_info_rejects_garbage() {
        assert!(InterpreterInfo::from_json("Python 3.12.1").is_err());
    }

    #[test]
    fn resolve_reports_missing_interpreter() {
        let temp = TempDir::new().unwrap();
        let probe =
            InterpreterProbe::with_path_entries("python-nope", vec![temp.path().to_path_buf()]);
        let err = probe.resolve().unwrap_err();
        assert!(matches!(err, ReqcheckError::InterpreterNotFound { .. }));
    }

    #[test]
    fn resolve_accepts_explicit_path() {
        let temp = TempDir::new().unwrap();
        let python = temp.path().join("bin/python");
        fake_python(&python, "");

        let probe = InterpreterProbe::with_path_entries(python.display().to_string(), vec![]);
        assert_eq!(probe.resolve().unwrap(), python);
    }

    #[test]
    fn resolve_rejects_missing_explicit_path() {
        let temp = TempDir::new().unwrap();
        let python = temp.path().join("bin/python");
        let probe = InterpreterProbe::with_path_entries(python.display().to_string(), vec![]);
        assert!(probe.resolve().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn run_decodes_interpreter_output() {
        let temp = TempDir::new().unwrap();
        let bin = temp.path().join("bin");
        let site = temp.path().join("lib/site-packages");
        fs::create_dir_all(&site).unwrap();
        fake_python(
            &bin.join("python3"),
            &format!(
                r#"echo '{{"sys_path": ["{}"], "prefix": "{}"}}'"#,
                site.display(),
                temp.path().display()
            ),
        );

        let probe = InterpreterProbe::with_path_entries("python3", vec![bin]);
        let info = probe.run().unwrap();
        assert_eq!(info.site_dirs(), vec![site]);
        assert_eq!(info.prefix, temp.path());
    }

    #[cfg(unix)]
    #[test]
    fn run_reports_failing_interpreter() {
        let temp = TempDir::new().unwrap();
        let bin = temp.path().join("bin");
        fake_python(&bin.join("python3"), "echo boom >&2; exit 3");

        let probe = InterpreterProbe::with_path_entries("python3", vec![bin]);
        let err = probe.run().unwrap_err();
        match err {
            ReqcheckError::InterpreterProbeFailed { message, .. } => {
                assert!(message.contains("exited with code 3"));
                assert!(message.contains("boom"));
            }
            other => panic!("Expected InterpreterProbeFailed, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn run_reports_undecodable_output() {
        let temp = TempDir::new().unwrap();
        let bin = temp.path().join("bin");
        fake_python(&bin.join("python3"), "echo not-json");

        let probe = InterpreterProbe::with_path_entries("python3", vec![bin]);
        let err = probe.run().unwrap_err();
        assert!(err.to_string().contains("unexpected output"));
    }
}
