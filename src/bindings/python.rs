//! Python bindings: builder classes for the model/TOA snapshot and one
//! function per checker, mirroring the `raiseexcept` switch of the Python API.

use crate::config::CheckerConfig;
use crate::store::{JumpParam, JumpSelector, ParamValue, Parameter, TimingModel, Toa, ToaTable};
use crate::validation::{
    BinaryChecker, CheckError, FailurePolicy, JumpChecker, NameChecker, ParChecker, Rule, ToaChecker, Validator,
};
use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

fn to_py_err(e: CheckError) -> PyErr {
    match e {
        CheckError::Io(io) => PyIOError::new_err(io.to_string()),
        other => PyValueError::new_err(other.to_string()),
    }
}

/// Parses one config section; `None` or an empty string means the defaults.
fn section<T: DeserializeOwned + Default>(json: Option<&str>) -> PyResult<T> {
    match json.map(str::trim) {
        None | Some("") => Ok(T::default()),
        Some(text) => serde_json::from_str(text).map_err(|e| to_py_err(e.into())),
    }
}

/// Python `bool` is an `int` subclass, so it is tried first.
fn extract_value(value: &Bound<'_, PyAny>) -> PyResult<ParamValue> {
    if let Ok(b) = value.extract::<bool>() {
        return Ok(ParamValue::Bool(b));
    }
    if let Ok(i) = value.extract::<i64>() {
        return Ok(ParamValue::Int(i));
    }
    if let Ok(f) = value.extract::<f64>() {
        return Ok(ParamValue::Float(f));
    }
    if let Ok(s) = value.extract::<String>() {
        return Ok(ParamValue::Str(s));
    }
    Err(PyValueError::new_err("Parameter value must be bool, int, float or str"))
}

/// Builds a selector from PINT's `key` and `key_value` of a maskParameter.
fn parse_selector(key: &str, values: &[String]) -> PyResult<JumpSelector> {
    let float = |i: usize| -> PyResult<f64> {
        values
            .get(i)
            .ok_or_else(|| PyValueError::new_err(format!("JUMP '{}' needs {} values", key, i + 1)))?
            .parse::<f64>()
            .map_err(|e| PyValueError::new_err(format!("Invalid JUMP value: {}", e)))
    };
    let text = || -> PyResult<String> {
        values
            .first()
            .cloned()
            .ok_or_else(|| PyValueError::new_err(format!("JUMP '{}' needs a value", key)))
    };
    match key.to_ascii_lowercase().as_str() {
        "mjd" => Ok(JumpSelector::Mjd { start: float(0)?, end: float(1)? }),
        "freq" => Ok(JumpSelector::Freq { low: float(0)?, high: float(1)? }),
        "tel" => Ok(JumpSelector::Tel { observatory: text()? }),
        flag if flag.starts_with('-') => Ok(JumpSelector::Flag {
            flag: key.trim_start_matches('-').to_string(),
            value: text()?,
        }),
        _ => Err(PyValueError::new_err(format!("Unsupported JUMP key '{}'", key))),
    }
}

#[pyclass(name = "_TimingModel")]
#[derive(Debug, Clone, Default)]
pub struct PyTimingModel {
    pub(crate) inner: TimingModel,
}

#[pymethods]
impl PyTimingModel {
    #[new]
    #[pyo3(signature = (psr, binary=None))]
    pub fn new(psr: String, binary: Option<String>) -> Self {
        let mut inner = TimingModel::new(psr);
        inner.binary = binary;
        Self { inner }
    }

    #[staticmethod]
    pub fn from_json(json: &str) -> PyResult<Self> {
        let inner = serde_json::from_str(json).map_err(|e| to_py_err(e.into()))?;
        Ok(Self { inner })
    }

    #[pyo3(signature = (name, value=None, frozen=true, unit=None))]
    pub fn add_parameter(
        &mut self,
        name: String,
        value: Option<&Bound<'_, PyAny>>,
        frozen: bool,
        unit: Option<String>,
    ) -> PyResult<()> {
        let value = match value {
            Some(v) if !v.is_none() => Some(extract_value(v)?),
            _ => None,
        };
        self.inner.insert_param(Parameter { name, value, frozen, unit });
        Ok(())
    }

    pub fn add_component(&mut self, component: String) {
        self.inner.insert_component(component);
    }

    #[pyo3(signature = (name, key, key_value, frozen=false, dm=false))]
    pub fn add_jump(&mut self, name: String, key: &str, key_value: Vec<String>, frozen: bool, dm: bool) -> PyResult<()> {
        let selector = parse_selector(key, &key_value)?;
        let jump = if dm { JumpParam::dispersion(name, selector) } else { JumpParam::phase(name, selector) };
        self.inner.insert_jump(if frozen { jump.frozen() } else { jump });
        Ok(())
    }

    pub fn to_json(&self) -> PyResult<String> {
        serde_json::to_string(&self.inner).map_err(|e| to_py_err(e.into()))
    }
}

#[pyclass(name = "_ToaTable")]
#[derive(Debug, Clone, Default)]
pub struct PyToaTable {
    pub(crate) inner: ToaTable,
}

#[pymethods]
impl PyToaTable {
    #[new]
    pub fn new() -> Self { Self::default() }

    #[staticmethod]
    pub fn from_json(json: &str) -> PyResult<Self> {
        let inner = serde_json::from_str(json).map_err(|e| to_py_err(e.into()))?;
        Ok(Self { inner })
    }

    #[pyo3(signature = (mjd, freq_mhz, observatory, flags))]
    pub fn add_toa(&mut self, mjd: f64, freq_mhz: f64, observatory: String, flags: BTreeMap<String, String>) {
        let toa = flags
            .into_iter()
            .fold(Toa::new(mjd).at(observatory, freq_mhz), |t, (k, v)| t.flag_value(&k, v));
        self.inner.push(toa);
    }

    pub fn __len__(&self) -> usize { self.inner.len() }
}

#[pyfunction]
#[pyo3(signature = (model, toas, raiseexcept=true))]
pub fn check_name(model: &PyTimingModel, toas: &PyToaTable, raiseexcept: bool) -> PyResult<bool> {
    NameChecker::new(&model.inner, &toas.inner)
        .check(&(), FailurePolicy::from_raise(raiseexcept))
        .map_err(to_py_err)
}

#[pyfunction]
#[pyo3(signature = (model, toas, raiseexcept=true))]
pub fn check_binary(model: &PyTimingModel, toas: &PyToaTable, raiseexcept: bool) -> PyResult<bool> {
    BinaryChecker::new(&model.inner, &toas.inner)
        .check(&(), FailurePolicy::from_raise(raiseexcept))
        .map_err(to_py_err)
}

#[pyfunction]
#[pyo3(signature = (model, toas, config=None, raiseexcept=true))]
pub fn check_par(model: &PyTimingModel, toas: &PyToaTable, config: Option<&str>, raiseexcept: bool) -> PyResult<bool> {
    let config = section(config)?;
    ParChecker::new(&model.inner, &toas.inner)
        .check(&config, FailurePolicy::from_raise(raiseexcept))
        .map_err(to_py_err)
}

#[pyfunction]
#[pyo3(signature = (model, toas, config=None, raiseexcept=true))]
pub fn check_toas(model: &PyTimingModel, toas: &PyToaTable, config: Option<&str>, raiseexcept: bool) -> PyResult<bool> {
    let config = section(config)?;
    ToaChecker::new(&model.inner, &toas.inner)
        .check(&config, FailurePolicy::from_raise(raiseexcept))
        .map_err(to_py_err)
}

#[pyfunction]
#[pyo3(signature = (model, toas, config=None, raiseexcept=true))]
pub fn check_jumps(model: &PyTimingModel, toas: &PyToaTable, config: Option<&str>, raiseexcept: bool) -> PyResult<bool> {
    let config = section(config)?;
    JumpChecker::new(&model.inner, &toas.inner)
        .check(&config, FailurePolicy::from_raise(raiseexcept))
        .map_err(to_py_err)
}

/// Runs every checker; `raiseexcept` overrides the policy from `config`.
#[pyfunction]
#[pyo3(signature = (model, toas, config=None, raiseexcept=None))]
pub fn validate(
    model: &PyTimingModel,
    toas: &PyToaTable,
    config: Option<&str>,
    raiseexcept: Option<bool>,
) -> PyResult<bool> {
    let mut config = CheckerConfig::from_json_str(config.unwrap_or("")).map_err(to_py_err)?;
    if let Some(raise) = raiseexcept {
        config.policy = FailurePolicy::from_raise(raise);
    }
    Validator::new(&model.inner, &toas.inner).validate(&config).map_err(to_py_err)
}
