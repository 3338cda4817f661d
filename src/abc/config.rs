//! ABC configuration.

use crate::error::Result;

/// Configuration for the Artificial Bee Colony.
///
/// # Examples
///
/// ```
/// use u_immune::abc::AbcConfig;
///
/// let config = AbcConfig::default().with_limit(50);
/// assert_eq!(config.limit, 50);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbcConfig {
    /// Number of unsuccessful improvement attempts after which a food source
    /// becomes eligible for abandonment by the scout phase.
    pub limit: u32,
}

impl Default for AbcConfig {
    fn default() -> Self {
        Self { limit: 100 }
    }
}

impl AbcConfig {
    /// Sets the abandonment limit.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Validates the configuration.
    ///
    /// Every `limit` is meaningful; `0` abandons any source that failed once.
    pub fn validate(&self) -> Result<()> {
        Ok(())
    }
}
