//! Defines the violation and error types for the validation module.
use serde::{Serialize, Deserialize};
use std::fmt;
use thiserror::Error;

/// The specific category of a policy violation.
///
/// This enum allows for programmatic inspection of violations, which is more
/// robust than string matching on the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationKind {
    /// Pulsar name does not follow the J/B naming convention.
    Format,
    /// A required parameter is absent or unset.
    MissingParameter,
    /// A parameter that must be fit is frozen.
    FrozenParameter,
    /// A parameter that must not appear is present.
    ExcludedParameter,
    /// A parameter is present with the wrong value (ephemeris, clock, ...).
    ValueMismatch,
    /// Only one half of a parameter pair is fittable (`M2`/`SINI`, ...).
    PairedParameter,
    /// The model declares a binary model with no registered policy.
    UnsupportedBinary,
    /// A TOA carries the wrong format version.
    VersionMismatch,
    /// A TOA falls inside an excluded (backend, MJD) range.
    ExcludedRange,
    /// JUMP / `-to` coverage does not partition the TOAs correctly.
    Coverage,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ViolationKind::Format => "FormatError",
            ViolationKind::MissingParameter => "MissingParameterError",
            ViolationKind::FrozenParameter => "FrozenParameterError",
            ViolationKind::ExcludedParameter => "ExcludedParameterError",
            ViolationKind::ValueMismatch => "ValueMismatchError",
            ViolationKind::PairedParameter => "PairedParameterError",
            ViolationKind::UnsupportedBinary => "UnsupportedBinaryError",
            ViolationKind::VersionMismatch => "VersionMismatchError",
            ViolationKind::ExcludedRange => "ExcludedRangeError",
            ViolationKind::Coverage => "CoverageError",
        };
        f.write_str(s)
    }
}

/// One failed rule, with the parameter/backend/group it concerns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub kind: ViolationKind,
    /// What the violation is about: a parameter name, backend, partition key...
    pub subject: String,
    /// A human-readable message explaining the violation.
    pub message: String,
}

impl Violation {
    pub fn new(kind: ViolationKind, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self { kind, subject: subject.into(), message: message.into() }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Errors surfaced to the caller of a checker or of the configuration loader.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("{checker} found {} violation(s):\n{}", .violations.len(), format_violations(.violations))]
    Failed { checker: &'static str, violations: Vec<Violation> },
    #[error("Invalid checker configuration: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CheckError {
    /// The violations carried by a `Failed` error, empty otherwise.
    pub fn violations(&self) -> &[Violation] {
        match self {
            CheckError::Failed { violations, .. } => violations,
            _ => &[],
        }
    }
}

impl From<serde_json::Error> for CheckError {
    fn from(e: serde_json::Error) -> Self {
        CheckError::Config(e.to_string())
    }
}

fn format_violations(violations: &[Violation]) -> String {
    violations.iter().map(|v| format!("  - {}", v)).collect::<Vec<_>>().join("\n")
}
