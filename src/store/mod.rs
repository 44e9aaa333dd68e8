//! The read-only data the checkers inspect: a timing-model snapshot and a TOA table.
pub mod model;
pub mod toas;
pub mod types;

#[cfg(test)]
pub(crate) mod fixtures;

pub use model::TimingModel;
pub use toas::{Toa, ToaTable};
pub use types::{JumpKind, JumpParam, JumpSelector, ParamValue, Parameter};
