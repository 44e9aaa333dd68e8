//! Checker configuration, loadable from JSON.
//!
//! Every section is optional; a missing section or field falls back to the
//! NANOGrav conventions carried by the `Default` impls.

use crate::validation::{CheckError, FailurePolicy, JumpConfig, ParConfig, ToaConfig};
use serde::{Serialize, Deserialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    pub policy: FailurePolicy,
    pub par: ParConfig,
    pub toa: ToaConfig,
    pub jump: JumpConfig,
}

impl CheckerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, CheckError> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CheckError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> Result<String, CheckError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
