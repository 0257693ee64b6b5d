//! Installed-package registry.
//!
//! The registry answers one question: which installed distribution, if any,
//! satisfies a requirement. [`SitePackagesRegistry`] builds its index by
//! scanning an ordered list of search path directories, the same way a
//! Python working set is built from `sys.path`.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use pep440_rs::Version;
use pep508_rs::PackageName;

use crate::requirements::metadata::{InstalledDistribution, MetadataKind};
use crate::requirements::specifier::RequirementSpec;

/// Read-only view of the packages installed in an environment.
pub trait InstalledRegistry {
    /// Return the installed distribution satisfying `requirement`, if any.
    fn find_satisfying(&self, requirement: &RequirementSpec) -> Option<&InstalledDistribution>;
}

/// Registry of distributions found under site-packages style directories.
///
/// Lookup is first-wins by search path order: only the first distribution
/// found for a normalized name is considered, even when a later directory
/// holds a copy that would satisfy the requirement.
#[derive(Debug, Default)]
pub struct SitePackagesRegistry {
    search_path: Vec<PathBuf>,
    distributions: Vec<InstalledDistribution>,
    by_name: HashMap<PackageName, usize>,
}

impl SitePackagesRegistry {
    /// Scan each search path entry in order and index the distributions found.
    ///
    /// An entry that is itself an unzipped `.egg` counts as one distribution;
    /// any other entry is listed as a directory. Entries that do not exist or
    /// cannot be listed are skipped, as are individual entries whose metadata
    /// is unreadable.
    pub fn discover(search_path: &[PathBuf]) -> Self {
        let mut registry = Self {
            search_path: search_path.to_vec(),
            ..Default::default()
        };

        for entry in search_path {
            if MetadataKind::classify(entry) == Some(MetadataKind::Egg) {
                registry.load(entry, MetadataKind::Egg);
            } else {
                registry.scan_dir(entry);
            }
        }

        tracing::debug!(
            directories = search_path.len(),
            distributions = registry.distributions.len(),
            "indexed installed distributions"
        );
        registry
    }

    /// Build a registry from already known distributions, in priority order.
    pub fn from_distributions(distributions: Vec<InstalledDistribution>) -> Self {
        let mut registry = Self::default();
        for dist in distributions {
            registry.insert(dist);
        }
        registry
    }

    /// Directories this registry was built from.
    pub fn search_path(&self) -> &[PathBuf] {
        &self.search_path
    }

    /// All distributions found, shadowed ones included, in discovery order.
    pub fn distributions(&self) -> &[InstalledDistribution] {
        &self.distributions
    }

    /// The active distribution for a name (the first one on the search path).
    pub fn get(&self, name: &PackageName) -> Option<&InstalledDistribution> {
        self.by_name.get(name).map(|&idx| &self.distributions[idx])
    }

    fn scan_dir(&mut self, dir: &Path) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!(path = %dir.display(), error = %e, "skipping search path entry");
                return;
            }
        };

        let mut paths: Vec<PathBuf> = entries.filter_map(|e| e.ok()).map(|e| e.path()).collect();
        paths.sort();

        let mut found: Vec<InstalledDistribution> = paths
            .iter()
            .filter_map(|path| {
                let kind = MetadataKind::classify(path)?;
                Self::read_entry(path, kind)
            })
            .collect();

        // Within one directory the newest copy of a name is the active one;
        // unparseable versions go last. The sort is stable, so ties keep
        // path order.
        found.sort_by(|a, b| newest_first(&a.version, &b.version));

        for dist in found {
            self.insert(dist);
        }
    }

    fn load(&mut self, entry: &Path, kind: MetadataKind) {
        if let Some(dist) = Self::read_entry(entry, kind) {
            self.insert(dist);
        }
    }

    fn read_entry(path: &Path, kind: MetadataKind) -> Option<InstalledDistribution> {
        match InstalledDistribution::from_entry(path, kind) {
            Ok(dist) => Some(dist),
            Err(e) => {
                tracing::warn!("Skipping {}: {:#}", path.display(), e);
                None
            }
        }
    }

    fn insert(&mut self, dist: InstalledDistribution) {
        let idx = self.distributions.len();
        if let Some(&active) = self.by_name.get(&dist.normalized) {
            tracing::debug!(
                shadowed = %dist.location.display(),
                active = %self.distributions[active].location.display(),
                "distribution shadowed by earlier search path entry"
            );
        } else {
            self.by_name.insert(dist.normalized.clone(), idx);
        }
        self.distributions.push(dist);
    }
}

fn newest_first(a: &Option<Version>, b: &Option<Version>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl InstalledRegistry for SitePackagesRegistry {
    fn find_satisfying(&self, requirement: &RequirementSpec) -> Option<&InstalledDistribution> {
        let Some(dist) = self.get(requirement.name()) else {
            tracing::debug!(name = %requirement.name(), "not installed");
            return None;
        };

        if requirement.is_satisfied_by(dist.version.as_ref()) {
            tracing::debug!(requirement = requirement.raw(), found = %dist, "satisfied");
            Some(dist)
        } else {
            tracing::debug!(
                requirement = requirement.raw(),
                installed = %dist,
                "installed version does not satisfy requirement"
            );
            None
        }
    }
}
