//! NANOGrav data checks for pulsar-timing models and TOA tables.
//!
//! The timing library (PINT) parses par/tim files; this crate receives a
//! read-only snapshot of the parsed model and TOAs and verifies that they
//! follow the data-release conventions. With the `python` feature the
//! checkers are exposed as the `_core` Python module.

pub mod config;
pub mod store;
pub mod validation;

#[cfg(feature = "python")]
mod bindings {
    pub mod python;
}

pub use config::CheckerConfig;
pub use store::{JumpKind, JumpParam, JumpSelector, ParamValue, Parameter, TimingModel, Toa, ToaTable};
pub use validation::{
    BinaryChecker, CheckError, FailurePolicy, JumpChecker, JumpConfig, NameChecker, ParChecker, ParConfig, Rule,
    ToaChecker, ToaConfig, Validator, Violation, ViolationKind,
};

#[cfg(feature = "python")]
use pyo3::prelude::*;

// --- Module Definition ---
/// This function defines the `ngchecker._core` Python module.
/// The name `_core` is chosen to indicate it's an internal, compiled component.
#[cfg(feature = "python")]
#[pymodule]
fn _core(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    use bindings::python::*;

    m.add_class::<PyTimingModel>()?;
    m.add_class::<PyToaTable>()?;
    m.add_function(wrap_pyfunction!(check_name, m)?)?;
    m.add_function(wrap_pyfunction!(check_binary, m)?)?;
    m.add_function(wrap_pyfunction!(check_par, m)?)?;
    m.add_function(wrap_pyfunction!(check_toas, m)?)?;
    m.add_function(wrap_pyfunction!(check_jumps, m)?)?;
    m.add_function(wrap_pyfunction!(validate, m)?)?;
    Ok(())
}
