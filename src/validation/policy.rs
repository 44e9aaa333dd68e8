//! Raise-or-warn handling shared by every checker.
use super::error::{CheckError, Violation};
use log::{debug, warn};
use serde::{Serialize, Deserialize};

/// What a checker does with the violations it collected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Return one aggregate `CheckError::Failed` listing every violation.
    #[default]
    Raise,
    /// Log one warning per violation and report the failure as `Ok(false)`.
    Warn,
}

impl FailurePolicy {
    /// Mirrors the `raiseexcept` switch of the Python API.
    pub fn from_raise(raise: bool) -> Self {
        if raise { FailurePolicy::Raise } else { FailurePolicy::Warn }
    }

    /// Turns a violation list into the caller-visible outcome.
    pub fn resolve(self, checker: &'static str, violations: Vec<Violation>) -> Result<bool, CheckError> {
        if violations.is_empty() {
            debug!("{} passed", checker);
            return Ok(true);
        }
        match self {
            FailurePolicy::Raise => Err(CheckError::Failed { checker, violations }),
            FailurePolicy::Warn => {
                for v in &violations {
                    warn!("{}: {}", checker, v);
                }
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::error::ViolationKind;

    fn one_violation() -> Vec<Violation> {
        vec![Violation::new(ViolationKind::Format, "PSR", "Pulsar name 'X' does not match required format")]
    }

    #[test]
    fn test_clean_run_passes_under_both_policies() {
        assert!(FailurePolicy::Raise.resolve("NameChecker", vec![]).unwrap());
        assert!(FailurePolicy::Warn.resolve("NameChecker", vec![]).unwrap());
    }

    #[test]
    fn test_raise_returns_aggregate_error() {
        let err = FailurePolicy::Raise.resolve("NameChecker", one_violation()).unwrap_err();
        assert_eq!(err.violations().len(), 1);
    }

    #[test]
    fn test_warn_reports_failure_without_error() {
        let _ = env_logger::builder().is_test(true).try_init();
        assert!(!FailurePolicy::Warn.resolve("NameChecker", one_violation()).unwrap());
    }

    #[test]
    fn test_from_raise() {
        assert_eq!(FailurePolicy::from_raise(true), FailurePolicy::Raise);
        assert_eq!(FailurePolicy::from_raise(false), FailurePolicy::Warn);
    }
}
