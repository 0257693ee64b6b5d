//! Check status types.
//!
//! Each requirement argument produces a `CheckStatus` describing whether an
//! installed distribution satisfies it, and renders as one output line.

use std::fmt;

use crate::requirements::metadata::InstalledDistribution;

/// Printed in place of a distribution when nothing matched.
pub const NO_MATCH: &str = "None";

/// Stands in for spaces so a matched line stays a single shell token.
pub const SPACE_PLACEHOLDER: &str = "^";

/// The result of checking a single requirement.
#[derive(Debug, Clone)]
pub enum CheckStatus {
    /// An installed distribution satisfies the requirement.
    Satisfied(InstalledDistribution),

    /// Nothing installed satisfies the requirement (absent, or wrong version).
    Missing,

    /// The specifier could not be parsed and was reported inline rather
    /// than aborting the run.
    Malformed {
        /// Parser diagnostic
        message: String,
    },
}

impl CheckStatus {
    /// Whether the requirement is satisfied.
    pub fn is_satisfied(&self) -> bool {
        matches!(self, CheckStatus::Satisfied(_))
    }

    /// The matched distribution, if any.
    pub fn distribution(&self) -> Option<&InstalledDistribution> {
        match self {
            CheckStatus::Satisfied(dist) => Some(dist),
            _ => None,
        }
    }

    /// The output line for this status, without a trailing newline.
    pub fn line(&self) -> String {
        match self {
            CheckStatus::Satisfied(dist) => dist.to_string().replace(' ', SPACE_PLACEHOLDER),
            CheckStatus::Missing | CheckStatus::Malformed { .. } => NO_MATCH.to_string(),
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line())
    }
}

/// The result of checking one requirement argument.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// The argument as supplied
    pub requirement: String,
    /// What was found for it
    pub status: CheckStatus,
}
