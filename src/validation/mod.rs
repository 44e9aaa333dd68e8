//! The NANOGrav data checks.
//!
//! Each checker borrows a `TimingModel` and `ToaTable`, collects every
//! violation it finds, and then raises or warns according to the caller's
//! `FailurePolicy`. Checkers never modify their inputs.

pub use self::checker::Rule;
pub use self::error::{CheckError, Violation, ViolationKind};
pub use self::policy::FailurePolicy;
pub use self::rules::binary::{BinaryChecker, BinaryPolicy, DdChecker, DdkChecker, Ell1Checker, Ell1HChecker, RuleBlock};
pub use self::rules::jumps::{JumpChecker, JumpConfig, PartitionKey};
pub use self::rules::name::NameChecker;
pub use self::rules::params::{ParChecker, ParConfig};
pub use self::rules::toas::{MjdRange, ToaChecker, ToaConfig};
pub use self::validator::{Report, Validator};

// --- MODULE DECLARATIONS ---
mod checker;
mod error;
mod policy;
mod validator;
pub mod rules {
    pub mod binary;
    pub mod jumps;
    pub mod name;
    pub mod params;
    pub(crate) mod presence;
    pub mod toas;
}
