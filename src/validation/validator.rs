//! The central validator that runs every checker against one dataset.
use super::checker::Rule;
use super::error::{CheckError, Violation};
use super::rules::{jumps::JumpChecker, params::ParChecker, toas::ToaChecker};
use crate::config::CheckerConfig;
use crate::store::{TimingModel, ToaTable};
use log::warn;

/// Violations collected per checker, in the order the checkers ran.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    pub results: Vec<(&'static str, Vec<Violation>)>,
}

impl Report {
    pub fn passed(&self) -> bool {
        self.results.iter().all(|(_, v)| v.is_empty())
    }

    pub fn violations(&self) -> impl Iterator<Item = &Violation> {
        self.results.iter().flat_map(|(_, v)| v.iter())
    }

    pub fn for_checker(&self, checker: &str) -> &[Violation] {
        self.results
            .iter()
            .find(|(name, _)| *name == checker)
            .map(|(_, v)| v.as_slice())
            .unwrap_or(&[])
    }
}

/// Runs the parameter, TOA and JUMP checkers in one pass.
///
/// Name and binary checks run as part of the parameter checker when its
/// config enables them. Like a linter, every checker runs even after an
/// earlier one failed.
pub struct Validator<'a> {
    model: &'a TimingModel,
    toas: &'a ToaTable,
}

impl<'a> Validator<'a> {
    pub fn new(model: &'a TimingModel, toas: &'a ToaTable) -> Self {
        Self { model, toas }
    }

    pub fn evaluate(&self, config: &CheckerConfig) -> Report {
        let (model, toas) = (self.model, self.toas);
        Report {
            results: vec![
                (ParChecker::NAME, ParChecker::new(model, toas).evaluate(&config.par)),
                (ToaChecker::NAME, ToaChecker::new(model, toas).evaluate(&config.toa)),
                (JumpChecker::NAME, JumpChecker::new(model, toas).evaluate(&config.jump)),
            ],
        }
    }

    /// # Returns
    /// - `Ok(true)` if every checker passed.
    /// - `Ok(false)` under `FailurePolicy::Warn`, after one warning per violation.
    /// - `Err(CheckError::Failed)` with the violations of all checkers under `FailurePolicy::Raise`.
    pub fn validate(&self, config: &CheckerConfig) -> Result<bool, CheckError> {
        let report = self.evaluate(config);
        if report.passed() {
            return Ok(true);
        }
        match config.policy {
            super::FailurePolicy::Raise => Err(CheckError::Failed {
                checker: "Validator",
                violations: report.violations().cloned().collect(),
            }),
            super::FailurePolicy::Warn => {
                for (checker, violations) in &report.results {
                    for v in violations {
                        warn!("{}: {}", checker, v);
                    }
                }
                Ok(false)
            }
        }
    }
}
