//! Runtime configuration for the verification subsystem.

use serde::Deserialize;

use crate::error::{Result, VerificationError};

/// Options recognized by the verification subsystem.
///
/// The host owns configuration loading and hands the parsed struct in; the
/// service consults it at session-creation time, so hosts that rebuild the
/// service pick up new values for subsequent joins.
#[derive(Clone, Debug, Deserialize)]
pub struct VerificationConfig {
    /// Number of decimal digits in a generated code.
    #[serde(default = "default_code_length")]
    pub code_length: usize,

    /// Seconds after issuance during which the code is accepted.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Interval for the optional expiry sweep.
    ///
    /// `None` keeps the default policy: expiry is detected lazily, on the
    /// member's next group message, and never-posting members stay resident.
    #[serde(default)]
    pub sweep_interval_secs: Option<u64>,
}

fn default_code_length() -> usize {
    crate::DEFAULT_CODE_LENGTH
}

fn default_timeout_secs() -> u64 {
    crate::DEFAULT_TIMEOUT_SECS
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_length: default_code_length(),
            timeout_secs: default_timeout_secs(),
            sweep_interval_secs: None,
        }
    }
}

impl VerificationConfig {
    /// Checks the configuration for values the subsystem cannot operate
    /// with.
    ///
    /// # Errors
    /// Returns [`VerificationError::InvalidConfig`] if `code_length` or
    /// `timeout_secs` is zero, or a sweep interval of zero is requested.
    pub fn validate(&self) -> Result<()> {
        if self.code_length == 0 {
            return Err(VerificationError::InvalidConfig(
                "code_length must be at least 1".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(VerificationError::InvalidConfig(
                "timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.sweep_interval_secs == Some(0) {
            return Err(VerificationError::InvalidConfig(
                "sweep_interval_secs must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }

    /// Creates a minimal config for testing: short codes, short window.
    pub fn for_testing() -> Self {
        Self {
            code_length: 4,
            timeout_secs: 2,
            sweep_interval_secs: None,
        }
    }
}
