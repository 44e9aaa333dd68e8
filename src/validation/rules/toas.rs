//! Validation rule for TOA format versions and excluded (backend, MJD) ranges.

use crate::store::{TimingModel, ToaTable};
use crate::validation::checker::Rule;
use crate::validation::error::{CheckError, Violation, ViolationKind};
use serde::{Serialize, Deserialize};
use std::collections::BTreeMap;
use std::fmt;

/// A closed MJD interval, serialised as `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "(f64, f64)", into = "(f64, f64)")]
pub struct MjdRange {
    start: f64,
    end: f64,
}

impl MjdRange {
    pub fn new(start: f64, end: f64) -> Result<Self, CheckError> {
        if !(start.is_finite() && end.is_finite()) || start > end {
            return Err(CheckError::Config(format!("Invalid MJD range [{}, {}]", start, end)));
        }
        Ok(Self { start, end })
    }

    /// Inclusive at both bounds.
    pub fn contains(&self, mjd: f64) -> bool {
        mjd >= self.start && mjd <= self.end
    }
}

impl TryFrom<(f64, f64)> for MjdRange {
    type Error = CheckError;

    fn try_from((start, end): (f64, f64)) -> Result<Self, Self::Error> {
        MjdRange::new(start, end)
    }
}

impl From<MjdRange> for (f64, f64) {
    fn from(r: MjdRange) -> Self { (r.start, r.end) }
}

impl fmt::Display for MjdRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MJD {} and {}", self.start, self.end)
    }
}

/// Options for `ToaChecker`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToaConfig {
    /// Expected `-ver` flag on every TOA; `None` skips the version check.
    pub version: Option<String>,
    /// Backend (`-be`) to MJD ranges where that backend must have no TOAs.
    pub badranges: BTreeMap<String, Vec<MjdRange>>,
}

impl ToaConfig {
    pub fn new() -> Self {
        Self { version: None, badranges: BTreeMap::new() }
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn exclude_range(mut self, backend: impl Into<String>, range: MjdRange) -> Self {
        self.badranges.entry(backend.into()).or_default().push(range);
        self
    }
}

/// The NANOGrav release version and the PUPPI timing-offset window.
impl Default for ToaConfig {
    fn default() -> Self {
        Self {
            version: Some("2025.02.05-1fb9ef4.01.31-08c1687".to_string()),
            badranges: BTreeMap::from([(
                "PUPPI".to_string(),
                vec![MjdRange { start: 57984.0, end: 58447.0 }],
            )]),
        }
    }
}

pub struct ToaChecker<'a> {
    toas: &'a ToaTable,
}

impl<'a> ToaChecker<'a> {
    pub fn new(_model: &'a TimingModel, toas: &'a ToaTable) -> Self {
        Self { toas }
    }

    fn check_version(&self, expected: &str, out: &mut Vec<Violation>) {
        // Offending versions with their TOA counts; `None` is a missing flag.
        let mut wrong: BTreeMap<Option<&str>, usize> = BTreeMap::new();
        for toa in self.toas.iter().filter(|t| t.version() != Some(expected)) {
            *wrong.entry(toa.version()).or_insert(0) += 1;
        }
        for (found, count) in wrong {
            let (subject, message) = match found {
                Some(v) => (v.to_string(), format!("{} TOAs have version '{}', not '{}'", count, v, expected)),
                None => ("<missing>".to_string(), format!("{} TOAs have no version flag, expected '{}'", count, expected)),
            };
            out.push(Violation::new(ViolationKind::VersionMismatch, subject, message));
        }
    }

    fn check_ranges(&self, badranges: &BTreeMap<String, Vec<MjdRange>>, out: &mut Vec<Violation>) {
        for (backend, ranges) in badranges {
            let mjds: Vec<f64> = self
                .toas
                .iter()
                .filter(|t| t.backend() == Some(backend.as_str()))
                .map(|t| t.mjd)
                .collect();
            for range in ranges {
                let inside = mjds.iter().filter(|&&m| range.contains(m)).count();
                if inside > 0 {
                    out.push(Violation::new(
                        ViolationKind::ExcludedRange,
                        backend.as_str(),
                        format!("TOAs for backend '{}' contain {} values between {}", backend, inside, range),
                    ));
                }
            }
        }
    }
}

impl Rule for ToaChecker<'_> {
    type Config = ToaConfig;
    const NAME: &'static str = "TOAChecker";

    fn evaluate(&self, config: &ToaConfig) -> Vec<Violation> {
        let mut violations = Vec::new();
        if let Some(version) = &config.version {
            self.check_version(version, &mut violations);
        }
        self.check_ranges(&config.badranges, &mut violations);
        violations
    }
}
