//! Value types shared by the model and TOA snapshots.

use serde::{Serialize, Deserialize};
use std::fmt;

/// Relative tolerance used when comparing numeric parameter values.
const REL_TOLERANCE: f64 = 1e-12;

/// The value carried by a timing-model parameter.
///
/// PINT stores booleans, integers, floats and strings behind one `value`
/// attribute; the checkers only need equality under light normalisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl ParamValue {
    /// Compares against an expected value after type normalisation.
    ///
    /// Units are not converted; see [`Parameter::matches`]. Strings are
    /// trimmed and compared case-insensitively, booleans also accept the
    /// par-file spellings (`Y`, `T`, `1`, ...), and numbers compare across
    /// `Int`/`Float` within a relative tolerance.
    pub fn matches(&self, expected: &ParamValue) -> bool {
        use ParamValue::*;
        match (self, expected) {
            (Str(a), Str(b)) => a.trim().eq_ignore_ascii_case(b.trim()),
            (Bool(a), Bool(b)) => a == b,
            (Bool(b), other) | (other, Bool(b)) => other.as_bool() == Some(*b),
            (Int(a), Int(b)) => a == b,
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(a), Some(b)) => close(a, b),
                _ => false,
            },
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            ParamValue::Int(0) => Some(false),
            ParamValue::Int(1) => Some(true),
            ParamValue::Int(_) | ParamValue::Float(_) => None,
            ParamValue::Str(s) => match s.trim().to_ascii_uppercase().as_str() {
                "Y" | "YES" | "T" | "TRUE" | "1" => Some(true),
                "N" | "NO" | "F" | "FALSE" | "0" => Some(false),
                _ => None,
            },
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Int(i) => Some(*i as f64),
            ParamValue::Float(f) => Some(*f),
            ParamValue::Str(s) => s.trim().parse().ok(),
            ParamValue::Bool(_) => None,
        }
    }
}

fn close(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    (a - b).abs() <= REL_TOLERANCE * a.abs().max(b.abs())
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{}", if *b { "Y" } else { "N" }),
            ParamValue::Int(i) => write!(f, "{}", i),
            ParamValue::Float(v) => write!(f, "{}", v),
            ParamValue::Str(s) => f.write_str(s),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self { ParamValue::Bool(b) }
}

impl From<i64> for ParamValue {
    fn from(i: i64) -> Self { ParamValue::Int(i) }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self { ParamValue::Float(v) }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self { ParamValue::Str(s.to_string()) }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self { ParamValue::Str(s) }
}

/// A single named model parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    /// `None` mirrors a PINT parameter that exists on a component but is unset.
    #[serde(default)]
    pub value: Option<ParamValue>,
    #[serde(default = "default_frozen")]
    pub frozen: bool,
    #[serde(default)]
    pub unit: Option<String>,
}

fn default_frozen() -> bool { true }

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        Self { name: name.into(), value: Some(value.into()), frozen: true, unit: None }
    }

    pub fn unset(name: impl Into<String>) -> Self {
        Self { name: name.into(), value: None, frozen: true, unit: None }
    }

    pub fn fit(mut self) -> Self {
        self.frozen = false;
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn is_set(&self) -> bool { self.value.is_some() }

    /// Compares the value against `expected`, which must be given in this
    /// parameter's unit; PINT reports every value in its declared unit.
    pub fn matches(&self, expected: &ParamValue) -> bool {
        self.value.as_ref().map_or(false, |v| v.matches(expected))
    }

    /// The value as written in a par file, followed by the unit if declared.
    pub fn value_text(&self) -> String {
        match (&self.value, &self.unit) {
            (Some(v), Some(u)) => format!("{} {}", v, u),
            (Some(v), None) => v.to_string(),
            (None, _) => "<unset>".to_string(),
        }
    }

    /// Present and free to vary in a fit.
    pub fn is_fittable(&self) -> bool { self.is_set() && !self.frozen }
}

/// Distinguishes phase offsets (`JUMP`) from wideband DM offsets (`DMJUMP`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JumpKind {
    Phase,
    Dispersion,
}

impl fmt::Display for JumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JumpKind::Phase => "JUMP",
            JumpKind::Dispersion => "DMJUMP",
        })
    }
}

/// The TOA selection attached to a JUMP, as written after the keyword in a par file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "key", rename_all = "lowercase")]
pub enum JumpSelector {
    /// `JUMP -fe Rcvr1_2 ...`
    Flag { flag: String, value: String },
    /// `JUMP MJD 55000 56000 ...`, inclusive.
    Mjd { start: f64, end: f64 },
    /// `JUMP FREQ 1000 2000 ...` in MHz, inclusive.
    Freq { low: f64, high: f64 },
    /// `JUMP TEL ao ...`
    Tel { observatory: String },
}

impl fmt::Display for JumpSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JumpSelector::Flag { flag, value } => write!(f, "-{} {}", flag, value),
            JumpSelector::Mjd { start, end } => write!(f, "MJD {} {}", start, end),
            JumpSelector::Freq { low, high } => write!(f, "FREQ {} {}", low, high),
            JumpSelector::Tel { observatory } => write!(f, "TEL {}", observatory),
        }
    }
}

/// A JUMP or DMJUMP parameter together with the TOAs it applies to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JumpParam {
    pub name: String,
    pub kind: JumpKind,
    pub selector: JumpSelector,
    #[serde(default)]
    pub frozen: bool,
}

impl JumpParam {
    pub fn phase(name: impl Into<String>, selector: JumpSelector) -> Self {
        Self { name: name.into(), kind: JumpKind::Phase, selector, frozen: false }
    }

    pub fn dispersion(name: impl Into<String>, selector: JumpSelector) -> Self {
        Self { name: name.into(), kind: JumpKind::Dispersion, selector, frozen: false }
    }

    pub fn frozen(mut self) -> Self {
        self.frozen = true;
        self
    }
}
