//! The contract every checker implements.
use super::error::{CheckError, Violation};
use super::policy::FailurePolicy;

/// A stateless policy rule over a borrowed (model, TOA table) pair.
///
/// Implementors only collect violations in `evaluate`; `check` applies the
/// caller's raise-or-warn policy. Neither may mutate the inputs, so calling
/// `check` twice on the same inputs yields the same result.
pub trait Rule {
    /// Options recognised by `check`.
    type Config;

    /// Name used in logs and aggregate errors.
    const NAME: &'static str;

    /// Runs every sub-rule and returns all violations found.
    fn evaluate(&self, config: &Self::Config) -> Vec<Violation>;

    /// # Returns
    /// - `Ok(true)` if no violations are found.
    /// - `Ok(false)` if violations were found and logged under `FailurePolicy::Warn`.
    /// - `Err(CheckError::Failed)` containing every violation under `FailurePolicy::Raise`.
    fn check(&self, config: &Self::Config, policy: FailurePolicy) -> Result<bool, CheckError> {
        policy.resolve(Self::NAME, self.evaluate(config))
    }
}
