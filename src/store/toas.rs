//! Read-only snapshot of a PINT `TOAs` table.

use super::types::JumpSelector;
use serde::{Serialize, Deserialize};
use std::collections::BTreeMap;

/// Backend flag (`-be`).
pub const BACKEND_FLAG: &str = "be";
/// TOA-format version flag (`-ver`).
pub const VERSION_FLAG: &str = "ver";
/// Explicit time offset flag (`-to`), an alternative to a JUMP.
pub const OFFSET_FLAG: &str = "to";
/// Wideband DM measurement flag (`-pp_dm`).
pub const WIDEBAND_FLAG: &str = "pp_dm";

/// A single time-of-arrival record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toa {
    pub mjd: f64,
    #[serde(default)]
    pub freq_mhz: f64,
    #[serde(default)]
    pub observatory: String,
    #[serde(default)]
    pub flags: BTreeMap<String, String>,
}

impl Toa {
    pub fn new(mjd: f64) -> Self {
        Self { mjd, freq_mhz: 0.0, observatory: String::new(), flags: BTreeMap::new() }
    }

    pub fn at(mut self, observatory: impl Into<String>, freq_mhz: f64) -> Self {
        self.observatory = observatory.into();
        self.freq_mhz = freq_mhz;
        self
    }

    /// Flag names are stored without the leading dash.
    pub fn flag_value(mut self, flag: &str, value: impl Into<String>) -> Self {
        self.flags.insert(flag.trim_start_matches('-').to_string(), value.into());
        self
    }

    pub fn flag(&self, name: &str) -> Option<&str> {
        self.flags.get(name.trim_start_matches('-')).map(String::as_str)
    }

    pub fn backend(&self) -> Option<&str> { self.flag(BACKEND_FLAG) }

    pub fn version(&self) -> Option<&str> { self.flag(VERSION_FLAG) }

    /// True when the TOA carries a usable `-to` offset.
    pub fn has_offset(&self) -> bool {
        self.flag(OFFSET_FLAG)
            .map_or(false, |v| v.trim().parse::<f64>().map_or(false, f64::is_finite))
    }

    pub fn is_wideband(&self) -> bool { self.flag(WIDEBAND_FLAG).is_some() }
}

impl JumpSelector {
    /// Whether this JUMP applies to `toa`, following PINT's `select_toa_mask`.
    pub fn selects(&self, toa: &Toa) -> bool {
        match self {
            JumpSelector::Flag { flag, value } => toa.flag(flag) == Some(value.as_str()),
            JumpSelector::Mjd { start, end } => toa.mjd >= *start && toa.mjd <= *end,
            JumpSelector::Freq { low, high } => toa.freq_mhz >= *low && toa.freq_mhz <= *high,
            JumpSelector::Tel { observatory } => toa.observatory.eq_ignore_ascii_case(observatory),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToaTable {
    toas: Vec<Toa>,
}

impl ToaTable {
    pub fn new() -> Self { Self::default() }

    pub fn push(&mut self, toa: Toa) { self.toas.push(toa); }

    pub fn len(&self) -> usize { self.toas.len() }

    pub fn is_empty(&self) -> bool { self.toas.is_empty() }

    pub fn iter(&self) -> std::slice::Iter<'_, Toa> { self.toas.iter() }

    /// A table is wideband when every TOA carries a DM measurement.
    pub fn is_wideband(&self) -> bool {
        !self.toas.is_empty() && self.toas.iter().all(Toa::is_wideband)
    }
}

impl From<Vec<Toa>> for ToaTable {
    fn from(toas: Vec<Toa>) -> Self { Self { toas } }
}

impl FromIterator<Toa> for ToaTable {
    fn from_iter<I: IntoIterator<Item = Toa>>(iter: I) -> Self {
        Self { toas: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a ToaTable {
    type Item = &'a Toa;
    type IntoIter = std::slice::Iter<'a, Toa>;

    fn into_iter(self) -> Self::IntoIter { self.toas.iter() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn toa() -> Toa {
        Toa::new(58000.5).at("ao", 1400.0).flag_value("-fe", "L-wide").flag_value("be", "PUPPI")
    }

    #[rstest]
    #[case(JumpSelector::Flag { flag: "fe".into(), value: "L-wide".into() }, true)]
    #[case(JumpSelector::Flag { flag: "fe".into(), value: "430".into() }, false)]
    #[case(JumpSelector::Flag { flag: "f".into(), value: "L-wide".into() }, false)]
    #[case(JumpSelector::Mjd { start: 58000.5, end: 58001.0 }, true)]
    #[case(JumpSelector::Mjd { start: 57000.0, end: 58000.0 }, false)]
    #[case(JumpSelector::Freq { low: 1100.0, high: 1400.0 }, true)]
    #[case(JumpSelector::Tel { observatory: "AO".into() }, true)]
    #[case(JumpSelector::Tel { observatory: "gbt".into() }, false)]
    fn test_selector_matching(#[case] selector: JumpSelector, #[case] expected: bool) {
        assert_eq!(selector.selects(&toa()), expected, "{}", selector);
    }

    #[test]
    fn test_offset_flag_must_parse() {
        assert!(toa().flag_value("to", "-0.789e-6").has_offset());
        assert!(!toa().flag_value("to", "nope").has_offset());
        assert!(!toa().has_offset());
    }

    #[test]
    fn test_wideband_requires_every_toa() {
        let mut table: ToaTable = vec![toa().flag_value("pp_dm", "10.39")].into();
        assert!(table.is_wideband());
        table.push(toa());
        assert!(!table.is_wideband());
        assert!(!ToaTable::new().is_wideband());
    }
}
