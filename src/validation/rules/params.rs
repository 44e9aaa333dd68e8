//! Validation rule for required, excluded and fixed-value model parameters.

use super::binary::BinaryChecker;
use super::name::NameChecker;
use super::presence;
use crate::store::{ParamValue, TimingModel, ToaTable};
use crate::validation::checker::Rule;
use crate::validation::error::{Violation, ViolationKind};
use serde::{Serialize, Deserialize};
use std::collections::BTreeMap;

/// Options for `ParChecker`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParConfig {
    /// Parameter names that must be present.
    pub required: Vec<String>,
    /// Parameter names that must be absent.
    pub excluded: Vec<String>,
    /// Parameters that must be present with the given value.
    pub required_value: BTreeMap<String, ParamValue>,
    /// Required parameters must also be unfrozen.
    pub require_fittable: bool,
    /// Also run `NameChecker`.
    pub check_name: bool,
    /// Also run the binary policy selected for the model.
    pub check_binary: bool,
}

impl ParConfig {
    /// An empty configuration with every switch off.
    pub fn new() -> Self {
        Self {
            required: Vec::new(),
            excluded: Vec::new(),
            required_value: BTreeMap::new(),
            require_fittable: false,
            check_name: false,
            check_binary: false,
        }
    }

    pub fn require<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn require_value(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.required_value.insert(name.into(), value.into());
        self
    }

    pub fn fittable(mut self, on: bool) -> Self {
        self.require_fittable = on;
        self
    }

    pub fn with_subchecks(mut self, name: bool, binary: bool) -> Self {
        self.check_name = name;
        self.check_binary = binary;
        self
    }
}

/// The NANOGrav data-release conventions.
impl Default for ParConfig {
    fn default() -> Self {
        ParConfig::new()
            .require(["F0", "F1", "PX", "ELONG", "ELAT", "PMELONG", "PMELAT"])
            .exclude(["F2"])
            .require_value("PLANET_SHAPIRO", true)
            .require_value("EPHEM", "DE440")
            .require_value("CLOCK", "TT(BIPM2023)")
            .require_value("CORRECT_TROPOSPHERE", true)
            .fittable(true)
            .with_subchecks(true, true)
    }
}

pub struct ParChecker<'a> {
    model: &'a TimingModel,
    toas: &'a ToaTable,
}

impl<'a> ParChecker<'a> {
    pub fn new(model: &'a TimingModel, toas: &'a ToaTable) -> Self {
        Self { model, toas }
    }

    fn check_required(&self, config: &ParConfig, out: &mut Vec<Violation>) {
        out.extend(
            config
                .required
                .iter()
                .filter_map(|p| presence::required(self.model, p, config.require_fittable)),
        );
    }

    fn check_excluded(&self, config: &ParConfig, out: &mut Vec<Violation>) {
        for p in config.excluded.iter().filter(|p| self.model.is_present(p)) {
            out.push(Violation::new(
                ViolationKind::ExcludedParameter,
                p.as_str(),
                format!("Excluded parameter '{}' is present in timing model", p),
            ));
        }
    }

    fn check_values(&self, config: &ParConfig, out: &mut Vec<Violation>) {
        for (p, expected) in &config.required_value {
            match self.model.param(p).filter(|param| param.is_set()) {
                None => out.extend(presence::required(self.model, p, false)),
                Some(param) if !param.matches(expected) => out.push(Violation::new(
                    ViolationKind::ValueMismatch,
                    p.as_str(),
                    format!(
                        "Required parameter '{}' is present, but value is '{}', not '{}'",
                        p,
                        param.value_text(),
                        expected
                    ),
                )),
                Some(_) => {}
            }
        }
    }
}

impl Rule for ParChecker<'_> {
    type Config = ParConfig;
    const NAME: &'static str = "ParChecker";

    fn evaluate(&self, config: &ParConfig) -> Vec<Violation> {
        let mut violations = Vec::new();
        self.check_required(config, &mut violations);
        self.check_values(config, &mut violations);
        self.check_excluded(config, &mut violations);

        if config.check_name {
            violations.extend(NameChecker::new(self.model, self.toas).evaluate(&()));
        }
        if config.check_binary {
            violations.extend(BinaryChecker::new(self.model, self.toas).evaluate(&()));
        }
        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fixtures::{ell1_model, fit, isolated_model};
    use crate::store::Parameter;
    use crate::validation::FailurePolicy;
    use rstest::rstest;

    fn run(model: &TimingModel, config: &ParConfig) -> Vec<(ViolationKind, String)> {
        let toas = ToaTable::new();
        ParChecker::new(model, &toas)
            .evaluate(config)
            .into_iter()
            .map(|v| (v.kind, v.subject))
            .collect()
    }

    #[test]
    fn test_excluded_f2_is_named() {
        let model = TimingModel::new("J1909-3744")
            .with_param(fit("F0", 339.3))
            .with_param(fit("F1", -1.6e-15))
            .with_param(fit("F2", 1e-27));
        let config = ParConfig::new().require(["F0", "F1"]).exclude(["F2"]);
        let toas = ToaTable::new();

        let err = ParChecker::new(&model, &toas).check(&config, FailurePolicy::Raise).unwrap_err();
        let violations = err.violations();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::ExcludedParameter);
        assert_eq!(violations[0].subject, "F2");
        assert!(err.to_string().contains("F2"));
    }

    #[test]
    fn test_default_conventions_pass_for_compliant_models() {
        assert!(run(&isolated_model(), &ParConfig::default()).is_empty());
        assert!(run(&ell1_model(), &ParConfig::default()).is_empty());
    }

    #[test]
    fn test_value_mismatch_names_declared_unit() {
        let model = TimingModel::new("J1909-3744").with_param(Parameter::new("DM", 10.39).with_unit("pc / cm3"));
        let toas = ToaTable::new();
        let checker = ParChecker::new(&model, &toas);

        assert!(checker.evaluate(&ParConfig::new().require_value("DM", 10.39)).is_empty());
        let violations = checker.evaluate(&ParConfig::new().require_value("DM", 10.4));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::ValueMismatch);
        assert_eq!(
            violations[0].message,
            "Required parameter 'DM' is present, but value is '10.39 pc / cm3', not '10.4'"
        );
    }

    #[test]
    fn test_every_violation_is_reported() {
        let mut model = ell1_model()
            .with_param(Parameter::unset("PX"))
            .with_param(Parameter::new("F1", -1.6e-15))
            .with_param(fit("F2", 1e-27))
            .with_param(Parameter::new("EPHEM", "DE421"))
            .with_param(Parameter::new("CLOCK", "TT(BIPM2019)"))
            .with_param(Parameter::unset("PLANET_SHAPIRO"))
            .with_param(Parameter::unset("SINI"));
        model.psr = "1909-3744".into();

        let found = run(&model, &ParConfig::default());
        let expected = vec![
            (ViolationKind::FrozenParameter, "F1".to_string()),
            (ViolationKind::MissingParameter, "PX".to_string()),
            (ViolationKind::ValueMismatch, "CLOCK".to_string()),
            (ViolationKind::ValueMismatch, "EPHEM".to_string()),
            (ViolationKind::MissingParameter, "PLANET_SHAPIRO".to_string()),
            (ViolationKind::ExcludedParameter, "F2".to_string()),
            (ViolationKind::Format, "PSR".to_string()),
            (ViolationKind::PairedParameter, "M2/SINI".to_string()),
        ];
        assert_eq!(found, expected);
    }

    #[test]
    fn test_required_value_keys_need_not_be_fittable() {
        let model = isolated_model().with_param(Parameter::new("EPHEM", "de440"));
        let config = ParConfig::new().require_value("EPHEM", "DE440").fittable(true);
        assert!(run(&model, &config).is_empty());
    }

    // Fails iff required ⊄ present, excluded ∩ present ≠ ∅, or a value mismatches.
    #[rstest]
    #[case(&["F0"], &["F2"], None, false)]
    #[case(&["F0", "PX"], &[], None, false)]
    #[case(&["F0", "DM"], &[], None, true)]
    #[case(&[], &["PX"], None, true)]
    #[case(&[], &["DM"], None, false)]
    #[case(&[], &[], Some(("EPHEM", "DE440")), false)]
    #[case(&[], &[], Some(("EPHEM", "DE436")), true)]
    #[case(&[], &[], Some(("DMX", "0.1")), true)]
    fn test_failure_iff_property(
        #[case] required: &[&str],
        #[case] excluded: &[&str],
        #[case] value: Option<(&str, &str)>,
        #[case] fails: bool,
    ) {
        let mut config = ParConfig::new().require(required.iter().copied()).exclude(excluded.iter().copied());
        if let Some((name, v)) = value {
            config = config.require_value(name, v);
        }
        assert_eq!(!run(&isolated_model(), &config).is_empty(), fails);
    }

    #[test]
    fn test_subchecks_are_opt_in() {
        let model = TimingModel::new("bad-name").with_binary("BT");
        assert!(run(&model, &ParConfig::new()).is_empty());

        let found = run(&model, &ParConfig::new().with_subchecks(true, true));
        assert_eq!(
            found,
            vec![
                (ViolationKind::Format, "PSR".to_string()),
                (ViolationKind::UnsupportedBinary, "BINARY".to_string()),
            ]
        );
    }

    #[test]
    fn test_check_is_idempotent() {
        let model = ell1_model().with_param(fit("F2", 1e-27));
        let toas = ToaTable::new();
        let checker = ParChecker::new(&model, &toas);
        let config = ParConfig::default();
        assert_eq!(checker.evaluate(&config), checker.evaluate(&config));
        assert!(!checker.check(&config, FailurePolicy::Warn).unwrap());
        assert!(!checker.check(&config, FailurePolicy::Warn).unwrap());
    }

    #[test]
    fn test_config_deserialises_with_defaults() {
        let config: ParConfig = serde_json::from_str(r#"{ "excluded": ["F2", "F3"] }"#).unwrap();
        assert_eq!(config.excluded, vec!["F2", "F3"]);
        assert_eq!(config.required, ParConfig::default().required);
        assert_eq!(config.required_value.get("EPHEM"), Some(&ParamValue::from("DE440")));
    }
}
