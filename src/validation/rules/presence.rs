//! Parameter presence primitives shared by the parameter and binary rules.

use crate::store::TimingModel;
use crate::validation::error::{Violation, ViolationKind};

/// The parameter must be set and, when `require_fittable`, unfrozen.
pub(crate) fn required(model: &TimingModel, name: &str, require_fittable: bool) -> Option<Violation> {
    let param = match model.param(name) {
        Some(p) if p.is_set() => p,
        _ => {
            return Some(Violation::new(
                ViolationKind::MissingParameter,
                name,
                format!("Parameter '{}' not found in timing model", name),
            ))
        }
    };
    if require_fittable && param.frozen {
        return Some(frozen(name));
    }
    None
}

/// If the parameter is set it must be unfrozen; absence is fine.
pub(crate) fn optional(model: &TimingModel, name: &str) -> Option<Violation> {
    match model.param(name) {
        Some(p) if p.is_set() && p.frozen => Some(frozen(name)),
        _ => None,
    }
}

/// Both parameters fittable, or neither.
pub(crate) fn paired(model: &TimingModel, pair: [&str; 2]) -> Option<Violation> {
    let [a, b] = pair;
    let (fit_a, fit_b) = (model.is_fittable(a), model.is_fittable(b));
    if fit_a == fit_b {
        return None;
    }
    let (active, inactive) = if fit_a { (a, b) } else { (b, a) };
    let state = if model.is_present(inactive) { "frozen" } else { "absent" };
    Some(Violation::new(
        ViolationKind::PairedParameter,
        format!("{}/{}", a, b),
        format!(
            "Parameters '{}' and '{}' must be fit together: '{}' is fittable but '{}' is {}",
            a, b, active, inactive, state
        ),
    ))
}

fn frozen(name: &str) -> Violation {
    Violation::new(
        ViolationKind::FrozenParameter,
        name,
        format!("Parameter '{}' found in timing model but frozen", name),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Parameter;
    use rstest::rstest;

    fn model() -> TimingModel {
        TimingModel::new("J1909-3744")
            .with_param(Parameter::new("F0", 339.3).fit())
            .with_param(Parameter::new("F1", -1.6e-15))
            .with_param(Parameter::unset("F2").fit())
    }

    #[rstest]
    #[case("F0", true, None)]
    #[case("F1", false, None)]
    #[case("F1", true, Some(ViolationKind::FrozenParameter))]
    #[case("F2", false, Some(ViolationKind::MissingParameter))]
    #[case("PX", false, Some(ViolationKind::MissingParameter))]
    fn test_required(#[case] name: &str, #[case] fittable: bool, #[case] expected: Option<ViolationKind>) {
        assert_eq!(required(&model(), name, fittable).map(|v| v.kind), expected);
    }

    #[test]
    fn test_optional_only_flags_frozen_values() {
        assert!(optional(&model(), "F0").is_none());
        assert!(optional(&model(), "F2").is_none());
        assert!(optional(&model(), "PX").is_none());
        assert_eq!(optional(&model(), "F1").map(|v| v.kind), Some(ViolationKind::FrozenParameter));
    }

    #[test]
    fn test_paired_message_names_the_odd_one_out() {
        let v = paired(&model(), ["F1", "F0"]).expect("F0 fittable, F1 frozen");
        assert_eq!(v.kind, ViolationKind::PairedParameter);
        assert!(v.message.contains("'F0' is fittable but 'F1' is frozen"), "{}", v.message);
        assert!(paired(&model(), ["F2", "PX"]).is_none());
    }
}
