//! Code generator adapters.

use rand::rngs::OsRng;
use rand::Rng;

use crate::ports::CodeGenerator;

/// Production code generator drawing digits from OS entropy.
///
/// Codes are short (default 6 digits, a 10^6 space) and echoed in a public
/// group, so the generator must not be seedable from anything an observer
/// can see. `OsRng` is a handle to the operating system's CSPRNG and holds
/// no state of its own.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsRngCodeGenerator;

impl CodeGenerator for OsRngCodeGenerator {
    fn generate(&self, length: usize) -> String {
        let mut rng = OsRng;
        (0..length)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect()
    }
}

/// Deterministic code generator for testing.
///
/// Cycles the configured digits to the requested length, so tests know the
/// exact code a join will produce.
#[derive(Clone, Debug)]
pub struct FixedCodeGenerator {
    digits: String,
}

impl FixedCodeGenerator {
    /// Creates a generator that yields `digits`, cycled or truncated to each
    /// requested length.
    pub fn new(digits: impl Into<String>) -> Self {
        let digits = digits.into();
        assert!(!digits.is_empty(), "at least one digit is required");
        Self { digits }
    }
}

impl CodeGenerator for FixedCodeGenerator {
    fn generate(&self, length: usize) -> String {
        self.digits.chars().cycle().take(length).collect()
    }
}
