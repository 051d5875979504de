//! Instrument identifier.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Instrument code - newtype for type safety.
///
/// The inner String is private to ensure all construction goes through
/// the defined constructors. Codes are immutable once assigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstrumentCode(String);

impl InstrumentCode {
    /// Create a new `InstrumentCode` from a string.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Get the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the code is the empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for InstrumentCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for InstrumentCode {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for InstrumentCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_inner_code() {
        let code = InstrumentCode::from("600000");
        assert_eq!(code.to_string(), "600000");
        assert_eq!(code.as_str(), "600000");
    }

    #[test]
    fn codes_order_lexicographically() {
        let mut codes = vec![
            InstrumentCode::from("600519"),
            InstrumentCode::from("000001"),
            InstrumentCode::from("300750"),
        ];
        codes.sort();
        assert_eq!(codes[0].as_str(), "000001");
        assert_eq!(codes[2].as_str(), "600519");
    }
}
