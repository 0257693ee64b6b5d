//! Installed distribution metadata.
//!
//! Installed Python packages record their identity in core metadata files
//! (`*.dist-info/METADATA`, `*.egg-info/PKG-INFO`, a bare `*.egg-info`
//! file, or `*.egg/EGG-INFO/PKG-INFO`). These use RFC 822 style headers; only `Name` and `Version` matter
//! here. When a header is absent the directory stem is used instead.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use pep440_rs::Version;
use pep508_rs::PackageName;
use regex::Regex;

/// `<name>-<version>[-<tag>].dist-info` / `.egg-info` / `.egg`
static METADATA_DIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>[^-]+)(?:-(?P<version>[^-]+))?(?:-[^-]+)*\.(?:dist-info|egg-info|egg)$")
        .unwrap()
});

static UNSAFE_NAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9.]+").unwrap());

/// Kind of metadata entry found in a search path directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataKind {
    /// `*.dist-info` directory (wheel installs).
    DistInfo,
    /// `*.egg-info` directory (setuptools develop / legacy installs).
    EggInfoDir,
    /// `*.egg-info` single file (distutils installs).
    EggInfoFile,
    /// Unzipped `*.egg` directory (easy_install).
    Egg,
}

impl MetadataKind {
    /// Classify a directory entry, if it is a metadata entry at all.
    pub fn classify(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        if name.ends_with(".dist-info") && path.is_dir() {
            Some(Self::DistInfo)
        } else if name.ends_with(".egg-info") {
            if path.is_dir() {
                Some(Self::EggInfoDir)
            } else {
                Some(Self::EggInfoFile)
            }
        } else if name.ends_with(".egg") && path.is_dir() {
            Some(Self::Egg)
        } else {
            None
        }
    }

    /// The file holding the core metadata headers.
    pub fn metadata_file(self, entry: &Path) -> PathBuf {
        match self {
            Self::DistInfo => entry.join("METADATA"),
            Self::EggInfoDir => entry.join("PKG-INFO"),
            Self::EggInfoFile => entry.to_path_buf(),
            Self::Egg => entry.join("EGG-INFO").join("PKG-INFO"),
        }
    }
}

/// A concrete installed package found on the search path.
#[derive(Debug, Clone)]
pub struct InstalledDistribution {
    /// Display name, in setuptools "safe name" form.
    pub name: String,
    /// Normalized name used for lookups.
    pub normalized: PackageName,
    /// Version string exactly as recorded.
    pub raw_version: String,
    /// Parsed version, when the recorded one is valid PEP 440.
    pub version: Option<Version>,
    /// Metadata entry this distribution was read from.
    pub location: PathBuf,
}

impl InstalledDistribution {
    /// Build a distribution from a recorded name and version.
    ///
    /// Returns `None` when the name cannot be normalized.
    pub fn new(name: &str, raw_version: &str, location: PathBuf) -> Option<Self> {
        let name = safe_name(name);
        let normalized = PackageName::new(name.clone()).ok()?;
        let raw_version = raw_version.trim().to_string();
        let version = Version::from_str(&raw_version).ok();
        Some(Self {
            name,
            normalized,
            raw_version,
            version,
            location,
        })
    }

    /// Read a distribution from a classified metadata entry.
    pub fn from_entry(entry: &Path, kind: MetadataKind) -> Result<Self> {
        let file = kind.metadata_file(entry);
        // Legacy PKG-INFO bodies are often latin-1; the identity headers are ASCII.
        let bytes = fs::read(&file).with_context(|| format!("failed to read {}", file.display()))?;
        let headers = CoreMetadata::parse(&String::from_utf8_lossy(&bytes));

        let stem = entry
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(parse_entry_name);

        let name = headers
            .name
            .or_else(|| stem.as_ref().map(|(n, _)| n.clone()))
            .with_context(|| format!("no Name in {}", file.display()))?;
        let version = headers
            .version
            .or_else(|| stem.and_then(|(_, v)| v))
            .with_context(|| format!("no Version in {}", file.display()))?;

        Self::new(&name, &version, entry.to_path_buf())
            .with_context(|| format!("invalid distribution name '{}' in {}", name, file.display()))
    }

    /// Version for display: normalized when it parses, raw otherwise.
    pub fn display_version(&self) -> String {
        match &self.version {
            Some(version) => version.to_string(),
            None => self.raw_version.clone(),
        }
    }
}

impl fmt::Display for InstalledDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.display_version())
    }
}

/// The identity headers of a core metadata file.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CoreMetadata {
    pub name: Option<String>,
    pub version: Option<String>,
}

impl CoreMetadata {
    /// Parse the header block, stopping at the first blank line.
    ///
    /// Folded continuation lines are skipped. The first occurrence of a
    /// header wins.
    pub fn parse(contents: &str) -> Self {
        let mut metadata = Self::default();
        for line in contents.lines() {
            if line.trim().is_empty() {
                break;
            }
            if line.starts_with([' ', '\t']) {
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key.trim().to_ascii_lowercase().as_str() {
                "name" if metadata.name.is_none() => metadata.name = Some(value.to_string()),
                "version" if metadata.version.is_none() => {
                    metadata.version = Some(value.to_string())
                }
                _ => {}
            }
        }
        metadata
    }
}

/// Split a metadata entry name into `(name, version)`.
pub fn parse_entry_name(entry: &str) -> Option<(String, Option<String>)> {
    let caps = METADATA_DIR.captures(entry)?;
    let name = caps.name("name")?.as_str().replace('_', "-");
    let version = caps.name("version").map(|v| v.as_str().replace('_', "-"));
    Some((name, version))
}

/// Replace every run of characters outside `[A-Za-z0-9.]` with a single `-`.
pub fn safe_name(name: &str) -> String {
    UNSAFE_NAME_CHARS.replace_all(name.trim(), "-").into_owned()
}
