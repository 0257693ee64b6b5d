//! Requirement specifier parsing.
//!
//! A requirement specifier is a PEP 508 string such as `requests>=2.31`,
//! `uvicorn[standard]==0.30.1` or `pkg @ https://example.com/pkg.whl`.
//! Parsing is a capability behind [`RequirementParser`] so the checker never
//! depends on a particular grammar implementation.

use std::str::FromStr;

use pep440_rs::Version;
use pep508_rs::{PackageName, Requirement, VersionOrUrl};

use crate::error::{ReqcheckError, Result};

/// Turns a raw command-line argument into a structured requirement.
pub trait RequirementParser {
    /// Parse a single specifier.
    ///
    /// Malformed input is reported as [`ReqcheckError::MalformedRequirement`];
    /// the caller decides whether that aborts the run.
    fn parse(&self, raw: &str) -> Result<RequirementSpec>;
}

/// Parser backed by the `pep508_rs` grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pep508Parser;

impl RequirementParser for Pep508Parser {
    fn parse(&self, raw: &str) -> Result<RequirementSpec> {
        let requirement =
            Requirement::from_str(raw).map_err(|e| ReqcheckError::MalformedRequirement {
                requirement: raw.to_string(),
                message: e.to_string(),
            })?;

        tracing::debug!(raw, parsed = %requirement, "parsed requirement");

        Ok(RequirementSpec {
            raw: raw.to_string(),
            requirement,
        })
    }
}

/// A parsed requirement specifier together with the text it came from.
#[derive(Debug, Clone)]
pub struct RequirementSpec {
    raw: String,
    requirement: Requirement,
}

impl RequirementSpec {
    /// The argument exactly as supplied.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized package name (`Foo_Bar` and `foo-bar` compare equal).
    pub fn name(&self) -> &PackageName {
        &self.requirement.name
    }

    /// Requested extras, in the order given.
    pub fn extras(&self) -> Vec<String> {
        self.requirement
            .extras
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    /// Whether this is a direct reference (`name @ url`).
    pub fn is_direct_url(&self) -> bool {
        matches!(self.requirement.version_or_url, Some(VersionOrUrl::Url(_)))
    }

    /// Whether an installed version satisfies this requirement.
    ///
    /// Pre-releases are accepted. A requirement with no specifiers, or a
    /// direct URL reference, is satisfied by any installed version. An
    /// installed version that is not valid PEP 440 only satisfies an
    /// unconstrained requirement.
    pub fn is_satisfied_by(&self, installed: Option<&Version>) -> bool {
        match &self.requirement.version_or_url {
            None | Some(VersionOrUrl::Url(_)) => true,
            Some(VersionOrUrl::VersionSpecifier(specifiers)) => {
                installed.is_some_and(|version| specifiers.contains(version))
            }
        }
    }
}
