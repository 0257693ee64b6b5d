//! Requirement checker.
//!
//! The `RequirementChecker` walks the requirement arguments in order, asks
//! the registry for a satisfying installed distribution for each, and writes
//! one line per argument. Failures on one argument never stop the others,
//! except for malformed specifiers under [`MalformedPolicy::Abort`].

use std::io::Write;

use crate::error::{ReqcheckError, Result};
use crate::requirements::registry::InstalledRegistry;
use crate::requirements::specifier::RequirementParser;
use crate::requirements::status::{CheckResult, CheckStatus};

/// Every requirement was satisfied.
pub const EXIT_SATISFIED: i32 = 0;
/// At least one requirement was not satisfied.
pub const EXIT_UNSATISFIED: i32 = 1;
/// No requirements were given.
pub const EXIT_USAGE: i32 = 2;

/// What to do when a specifier cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedPolicy {
    /// Stop at the malformed argument and return the parse error. Lines
    /// already written for earlier arguments stay written.
    #[default]
    Abort,
    /// Print `None` for the malformed argument and carry on.
    Report,
}

/// Checks requirement specifiers against the installed packages.
pub struct RequirementChecker<'a> {
    parser: &'a dyn RequirementParser,
    registry: &'a dyn InstalledRegistry,
    policy: MalformedPolicy,
}

impl<'a> RequirementChecker<'a> {
    /// Create a checker that aborts on malformed specifiers.
    pub fn new(parser: &'a dyn RequirementParser, registry: &'a dyn InstalledRegistry) -> Self {
        Self {
            parser,
            registry,
            policy: MalformedPolicy::default(),
        }
    }

    /// Set how malformed specifiers are handled.
    pub fn with_policy(mut self, policy: MalformedPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The malformed-specifier policy in effect.
    pub fn policy(&self) -> MalformedPolicy {
        self.policy
    }

    /// Check a single specifier.
    ///
    /// Returns `Err` only when the specifier is malformed.
    pub fn check_one(&self, raw: &str) -> Result<CheckStatus> {
        let spec = self.parser.parse(raw)?;

        let extras = spec.extras();
        if !extras.is_empty() {
            tracing::debug!(requirement = raw, ?extras, "extras do not affect the lookup");
        }
        if spec.is_direct_url() {
            tracing::debug!(requirement = raw, "direct URL reference; any installed version matches");
        }

        Ok(match self.registry.find_satisfying(&spec) {
            Some(dist) => CheckStatus::Satisfied(dist.clone()),
            None => CheckStatus::Missing,
        })
    }

    /// Check every specifier in order, writing one line per specifier.
    ///
    /// Each line is flushed as soon as it is produced.
    pub fn check_all<W: Write + ?Sized>(
        &self,
        requirements: &[String],
        out: &mut W,
    ) -> Result<CheckReport> {
        let mut results = Vec::with_capacity(requirements.len());

        for raw in requirements {
            let status = match self.check_one(raw) {
                Ok(status) => status,
                Err(ReqcheckError::MalformedRequirement { message, .. })
                    if self.policy == MalformedPolicy::Report =>
                {
                    tracing::warn!("Invalid requirement '{}': {}", raw, message);
                    CheckStatus::Malformed { message }
                }
                Err(e) => return Err(e),
            };

            writeln!(out, "{}", status.line())?;
            out.flush()?;

            results.push(CheckResult {
                requirement: raw.clone(),
                status,
            });
        }

        Ok(CheckReport { results })
    }
}

/// Outcome of checking a list of requirements.
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    /// One result per requirement, in input order.
    pub results: Vec<CheckResult>,
}

impl CheckReport {
    /// Whether every requirement was satisfied.
    pub fn all_satisfied(&self) -> bool {
        self.results.iter().all(|r| r.status.is_satisfied())
    }

    /// Results that were not satisfied.
    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(|r| !r.status.is_satisfied())
    }

    /// Process exit code for this report.
    pub fn exit_code(&self) -> i32 {
        if self.all_satisfied() {
            EXIT_SATISFIED
        } else {
            EXIT_UNSATISFIED
        }
    }
}
