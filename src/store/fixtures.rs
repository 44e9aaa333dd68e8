//! Shared test fixtures: a model and TOA table that satisfy the NANOGrav defaults.
use super::{JumpParam, JumpSelector, Parameter, TimingModel, Toa, ToaTable};

pub(crate) const VERSION: &str = "2025.02.05-1fb9ef4.01.31-08c1687";

pub(crate) fn fit(name: &str, value: f64) -> Parameter {
    Parameter::new(name, value).fit()
}

/// Isolated pulsar with every default-required parameter fittable.
pub(crate) fn isolated_model() -> TimingModel {
    TimingModel::new("J1909-3744")
        .with_param(fit("F0", 339.315_687_218_9))
        .with_param(fit("F1", -1.614_8e-15))
        .with_param(fit("PX", 0.861))
        .with_param(fit("ELONG", 284.206_9))
        .with_param(fit("ELAT", -15.155_5))
        .with_param(fit("PMELONG", -13.87))
        .with_param(fit("PMELAT", -35.78))
        .with_param(Parameter::unset("F2"))
        .with_param(Parameter::new("PLANET_SHAPIRO", true))
        .with_param(Parameter::new("EPHEM", "DE440"))
        .with_param(Parameter::new("CLOCK", "TT(BIPM2023)"))
        .with_param(Parameter::new("CORRECT_TROPOSPHERE", "Y"))
        .with_component("TroposphereDelay")
        .with_component("SolarSystemShapiro")
}

/// The isolated model turned into a compliant ELL1 binary.
pub(crate) fn ell1_model() -> TimingModel {
    isolated_model()
        .with_binary("ELL1")
        .with_component("BinaryELL1")
        .with_param(fit("PB", 1.533_449_45))
        .with_param(fit("A1", 1.897_991))
        .with_param(fit("TASC", 53_630.723_214))
        .with_param(fit("EPS1", 2.7e-8))
        .with_param(fit("EPS2", -1.04e-7))
        .with_param(fit("PBDOT", 5.05e-13))
        .with_param(fit("A1DOT", -6.0e-16))
        .with_param(fit("M2", 0.209))
        .with_param(fit("SINI", 0.998))
}

pub(crate) fn toa(mjd: f64, fe: &str, be: &str) -> Toa {
    Toa::new(mjd)
        .at("gbt", 1400.0)
        .flag_value("f", format!("{}_{}", fe, be))
        .flag_value("fe", fe)
        .flag_value("be", be)
        .flag_value("ver", VERSION)
}

/// Two receivers on GUPPI followed by two on VEGAS.
pub(crate) fn toas() -> ToaTable {
    let mut table = ToaTable::new();
    for (i, (fe, be)) in [("Rcvr1_2", "GUPPI"), ("Rcvr_800", "GUPPI"), ("Rcvr1_2", "VEGAS"), ("Rcvr_800", "VEGAS")]
        .into_iter()
        .enumerate()
    {
        for k in 0..3 {
            table.push(toa(55_000.0 + 1000.0 * i as f64 + k as f64, fe, be));
        }
    }
    table
}

/// JUMPs on every `-f` group except `Rcvr1_2_GUPPI`, which is the reference.
pub(crate) fn jumped_model() -> TimingModel {
    ["Rcvr_800_GUPPI", "Rcvr1_2_VEGAS", "Rcvr_800_VEGAS"]
        .into_iter()
        .enumerate()
        .fold(ell1_model(), |model, (i, f)| {
            model.with_jump(JumpParam::phase(
                format!("JUMP{}", i + 1),
                JumpSelector::Flag { flag: "f".into(), value: f.into() },
            ))
        })
}
