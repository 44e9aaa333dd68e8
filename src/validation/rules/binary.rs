//! Validation rules for binary-orbit parameterisations.
//!
//! Each binary model is its own `BinaryPolicy`; `BinaryChecker` picks the one
//! matching the model's `BINARY` at construction time.

use super::presence;
use crate::store::{TimingModel, ToaTable};
use crate::validation::checker::Rule;
use crate::validation::error::{Violation, ViolationKind};

/// One group of constraints of a binary policy.
#[derive(Debug, Clone, Default)]
pub struct RuleBlock {
    /// Must be present and fittable.
    pub required: &'static [&'static str],
    /// May be absent, but if present must be fittable.
    pub optional: &'static [&'static str],
    /// Both fittable or neither.
    pub paired: &'static [[&'static str; 2]],
}

/// A binary-model-specific parameter policy.
pub trait BinaryPolicy {
    /// The `BINARY` value this policy applies to.
    fn model_name(&self) -> &'static str;

    fn blocks(&self) -> Vec<RuleBlock>;

    fn evaluate(&self, model: &TimingModel) -> Vec<Violation> {
        let mut violations = Vec::new();
        for block in self.blocks() {
            violations.extend(block.required.iter().filter_map(|p| presence::required(model, p, true)));
            violations.extend(block.optional.iter().filter_map(|p| presence::optional(model, p)));
            violations.extend(block.paired.iter().filter_map(|pair| presence::paired(model, *pair)));
        }
        violations
    }
}

const ORBIT_DERIVATIVES: &[&str] = &["PBDOT", "A1DOT", "OMDOT", "EDOT"];

/// Low-eccentricity orbits with Shapiro delay in `M2`/`SINI`.
pub struct Ell1Checker;

impl BinaryPolicy for Ell1Checker {
    fn model_name(&self) -> &'static str { "ELL1" }

    fn blocks(&self) -> Vec<RuleBlock> {
        vec![RuleBlock {
            required: &["A1", "TASC", "EPS1", "EPS2", "PBDOT", "A1DOT"],
            paired: &[["M2", "SINI"], ["EPS1DOT", "EPS2DOT"]],
            ..Default::default()
        }]
    }
}

/// ELL1 with the orthometric Shapiro parameterisation.
pub struct Ell1HChecker;

impl BinaryPolicy for Ell1HChecker {
    fn model_name(&self) -> &'static str { "ELL1H" }

    fn blocks(&self) -> Vec<RuleBlock> {
        vec![RuleBlock {
            required: &["A1", "TASC", "EPS1", "EPS2", "A1DOT", "H3", "PBDOT"],
            paired: &[["EPS1DOT", "EPS2DOT"]],
            ..Default::default()
        }]
    }
}

/// Damour-Deruelle eccentric orbits.
pub struct DdChecker;

impl BinaryPolicy for DdChecker {
    fn model_name(&self) -> &'static str { "DD" }

    fn blocks(&self) -> Vec<RuleBlock> {
        vec![RuleBlock {
            required: &["A1", "E", "T0", "PB", "OM"],
            optional: ORBIT_DERIVATIVES,
            paired: &[["M2", "SINI"]],
        }]
    }
}

/// DD with Kopeikin annual-orbital parallax terms.
pub struct DdkChecker;

impl BinaryPolicy for DdkChecker {
    fn model_name(&self) -> &'static str { "DDK" }

    fn blocks(&self) -> Vec<RuleBlock> {
        vec![RuleBlock {
            required: &["A1", "E", "T0", "PB", "OM", "M2", "K96", "KOM", "KIN"],
            optional: ORBIT_DERIVATIVES,
            ..Default::default()
        }]
    }
}

/// Every supported policy, keyed by `model_name`.
fn registered() -> Vec<Box<dyn BinaryPolicy>> {
    vec![Box::new(Ell1Checker), Box::new(Ell1HChecker), Box::new(DdChecker), Box::new(DdkChecker)]
}

pub fn policy_for(binary: &str) -> Option<Box<dyn BinaryPolicy>> {
    registered()
        .into_iter()
        .find(|p| p.model_name().eq_ignore_ascii_case(binary.trim()))
}

enum Selection {
    Isolated,
    Policy(Box<dyn BinaryPolicy>),
    Unsupported(String),
}

pub struct BinaryChecker<'a> {
    model: &'a TimingModel,
    selection: Selection,
}

impl<'a> BinaryChecker<'a> {
    pub fn new(model: &'a TimingModel, _toas: &'a ToaTable) -> Self {
        let selection = match model.binary.as_deref() {
            None => Selection::Isolated,
            Some(name) => match policy_for(name) {
                Some(policy) => Selection::Policy(policy),
                None => Selection::Unsupported(name.to_string()),
            },
        };
        Self { model, selection }
    }

    /// The `BINARY` name of the selected policy, if any.
    pub fn selected(&self) -> Option<&'static str> {
        match &self.selection {
            Selection::Policy(p) => Some(p.model_name()),
            _ => None,
        }
    }
}

impl Rule for BinaryChecker<'_> {
    type Config = ();
    const NAME: &'static str = "BinaryChecker";

    fn evaluate(&self, _config: &()) -> Vec<Violation> {
        match &self.selection {
            Selection::Isolated => Vec::new(),
            Selection::Policy(policy) => policy.evaluate(self.model),
            Selection::Unsupported(name) => vec![Violation::new(
                ViolationKind::UnsupportedBinary,
                "BINARY",
                format!("Binary parameters not found: {} not supported", name),
            )],
        }
    }
}
