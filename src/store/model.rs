//! Read-only snapshot of a PINT `TimingModel`: parameters, components and JUMPs.

use super::types::{JumpKind, JumpParam, ParamValue, Parameter};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimingModel {
    /// Source name (`PSR`).
    pub psr: String,
    /// Declared binary model (`BINARY`), `None` for isolated pulsars.
    #[serde(default)]
    pub binary: Option<String>,
    #[serde(default, deserialize_with = "params_by_name")]
    params: BTreeMap<String, Parameter>,
    #[serde(default)]
    components: BTreeSet<String>,
    #[serde(default)]
    jumps: Vec<JumpParam>,
}

impl TimingModel {
    pub fn new(psr: impl Into<String>) -> Self {
        Self { psr: psr.into(), ..Default::default() }
    }

    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = Some(binary.into());
        self
    }

    pub fn with_param(mut self, param: Parameter) -> Self {
        self.insert_param(param);
        self
    }

    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.components.insert(component.into());
        self
    }

    pub fn with_jump(mut self, jump: JumpParam) -> Self {
        self.jumps.push(jump);
        self
    }

    /// Parameter names are upper-cased, as PINT does.
    pub fn insert_param(&mut self, param: Parameter) {
        let (name, param) = keyed(param);
        self.params.insert(name, param);
    }

    pub fn insert_component(&mut self, component: impl Into<String>) {
        self.components.insert(component.into());
    }

    pub fn insert_jump(&mut self, jump: JumpParam) {
        self.jumps.push(jump);
    }

    // --- Lookups ---

    pub fn param(&self, name: &str) -> Option<&Parameter> {
        self.params.get(&name.to_ascii_uppercase())
    }

    /// A parameter counts as present only when it carries a value.
    pub fn is_present(&self, name: &str) -> bool {
        self.param(name).map_or(false, Parameter::is_set)
    }

    pub fn is_fittable(&self, name: &str) -> bool {
        self.param(name).map_or(false, Parameter::is_fittable)
    }

    pub fn value(&self, name: &str) -> Option<&ParamValue> {
        self.param(name).and_then(|p| p.value.as_ref())
    }

    pub fn params(&self) -> impl Iterator<Item = &Parameter> {
        self.params.values()
    }

    pub fn has_component(&self, component: &str) -> bool {
        self.components.contains(component)
    }

    pub fn is_binary(&self) -> bool {
        self.binary.is_some()
    }

    pub fn jumps(&self, kind: JumpKind) -> impl Iterator<Item = &JumpParam> {
        self.jumps.iter().filter(move |j| j.kind == kind)
    }
}

fn keyed(mut param: Parameter) -> (String, Parameter) {
    param.name = param.name.to_ascii_uppercase();
    (param.name.clone(), param)
}

/// Snapshot entries are keyed by their own `name`, whatever the map key says.
fn params_by_name<'de, D>(deserializer: D) -> Result<BTreeMap<String, Parameter>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, Parameter>::deserialize(deserializer)?;
    Ok(raw.into_values().map(keyed).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive_and_ignores_unset() {
        let model = TimingModel::new("J1909-3744")
            .with_param(Parameter::new("f0", 339.3).fit())
            .with_param(Parameter::unset("F2"));

        assert!(model.is_present("F0"));
        assert!(model.is_fittable("F0"));
        assert!(model.param("F2").is_some());
        assert!(!model.is_present("F2"));
        assert!(!model.is_present("PX"));
    }

    #[test]
    fn test_snapshot_round_trip_from_json() {
        let json = r#"{
            "psr": "J1909-3744",
            "binary": "ELL1",
            "params": {
                "F0": { "name": "F0", "value": 339.3, "frozen": false },
                "EPHEM": { "name": "EPHEM", "value": "DE440" }
            },
            "components": ["TroposphereDelay"],
            "jumps": [
                { "name": "JUMP1", "kind": "Phase", "selector": { "key": "flag", "flag": "fe", "value": "L-wide" } }
            ]
        }"#;
        let model: TimingModel = serde_json::from_str(json).expect("snapshot should parse");
        assert!(model.is_fittable("F0"));
        assert!(!model.is_fittable("EPHEM"));
        assert!(model.has_component("TroposphereDelay"));
        assert_eq!(model.jumps(JumpKind::Phase).count(), 1);
        assert_eq!(model.jumps(JumpKind::Dispersion).count(), 0);
    }

    #[test]
    fn test_snapshot_keys_are_normalised() {
        let json = r#"{
            "psr": "J1909-3744",
            "params": { "f0": { "name": "f0", "value": 339.3, "frozen": false } }
        }"#;
        let model: TimingModel = serde_json::from_str(json).expect("snapshot should parse");
        assert!(model.is_present("F0"));
        assert!(model.is_fittable("f0"));
        assert_eq!(model.param("F0").map(|p| p.name.as_str()), Some("F0"));

        let text = serde_json::to_string(&model).expect("snapshot should serialise");
        let back: TimingModel = serde_json::from_str(&text).expect("snapshot should parse");
        assert_eq!(back, model);
    }
}
