//! Static instrument profile.

use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::InstrumentCode;

/// Static descriptive fields of an instrument.
///
/// Loaded once at startup from the backing store and never touched by the
/// real-time path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentProfile {
    pub code: InstrumentCode,
    pub name: String,
    pub industry: String,
    pub market: String,
    /// Popularity counter maintained by the watchlist service.
    pub visit_heat: u32,
}

impl InstrumentProfile {
    /// Create a profile with only code and name set.
    pub fn new(code: impl Into<InstrumentCode>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            industry: String::new(),
            market: String::new(),
            visit_heat: 0,
        }
    }

    /// Set the industry classification.
    #[must_use]
    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = industry.into();
        self
    }

    /// Set the listing market.
    #[must_use]
    pub fn with_market(mut self, market: impl Into<String>) -> Self {
        self.market = market.into();
        self
    }

    /// A profile is empty when it has no code or no name.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.code.is_empty() || self.name.is_empty()
    }

    /// Reject empty profiles.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.is_empty() {
            return Err(DomainError::EmptyProfile {
                code: self.code.clone(),
            });
        }
        Ok(())
    }
}
