//! Validation rule for the pulsar name (`PSR`).

use crate::store::{TimingModel, ToaTable};
use crate::validation::checker::Rule;
use crate::validation::error::{Violation, ViolationKind};
use once_cell::sync::Lazy;
use regex::Regex;

/// J2000 or B1950 names: four RA digits, a sign, then two to four Dec digits.
static PULSAR_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[JB][0-9]{4}[+-][0-9]{2,4}$").expect("static regex"));

pub fn is_valid_name(name: &str) -> bool {
    PULSAR_NAME.is_match(name)
}

pub struct NameChecker<'a> {
    model: &'a TimingModel,
}

impl<'a> NameChecker<'a> {
    pub fn new(model: &'a TimingModel, _toas: &'a ToaTable) -> Self {
        Self { model }
    }
}

impl Rule for NameChecker<'_> {
    type Config = ();
    const NAME: &'static str = "NameChecker";

    fn evaluate(&self, _config: &()) -> Vec<Violation> {
        if is_valid_name(&self.model.psr) {
            return Vec::new();
        }
        vec![Violation::new(
            ViolationKind::Format,
            "PSR",
            format!("Pulsar name '{}' does not match required format", self.model.psr),
        )]
    }
}
