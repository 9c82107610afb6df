//! Engine configuration
//!
//! The defaults a new quote starts from. Always passed explicitly to the
//! services that need it; there is no process-wide mutable settings object.

use serde::{Deserialize, Serialize};

use crate::error::BdError;
use crate::result::BdResult;

/// Defaults applied when composing a new quote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Margin coefficient applied to assembly cost price on insertion
    pub default_margin_coefficient: f64,

    /// VAT rate in percent
    pub default_vat_rate: f64,

    /// Quote validity in days from the quote date
    pub default_validity_days: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_margin_coefficient: 1.5,
            default_vat_rate: 20.0,
            default_validity_days: 30,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables, falling back to the
    /// defaults for anything unset.
    pub fn from_env() -> BdResult<Self> {
        let mut config = Self::default();

        if let Ok(coefficient) = std::env::var("BATIDEVIS_DEFAULT_MARGIN") {
            config.default_margin_coefficient = coefficient
                .parse()
                .map_err(|_| BdError::Config(format!("invalid margin coefficient: {}", coefficient)))?;
        }
        if let Ok(rate) = std::env::var("BATIDEVIS_DEFAULT_VAT_RATE") {
            config.default_vat_rate = rate
                .parse()
                .map_err(|_| BdError::Config(format!("invalid VAT rate: {}", rate)))?;
        }
        if let Ok(days) = std::env::var("BATIDEVIS_QUOTE_VALIDITY_DAYS") {
            config.default_validity_days = days
                .parse()
                .map_err(|_| BdError::Config(format!("invalid validity days: {}", days)))?;
        }

        config.check()?;
        Ok(config)
    }

    fn check(&self) -> BdResult<()> {
        if !(self.default_margin_coefficient.is_finite() && self.default_margin_coefficient > 0.0) {
            return Err(BdError::Config(
                "default margin coefficient must be positive".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&self.default_vat_rate) {
            return Err(BdError::Config(
                "default VAT rate must be between 0 and 100".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.default_margin_coefficient, 1.5);
        assert_eq!(config.default_vat_rate, 20.0);
        assert_eq!(config.default_validity_days, 30);
    }

    #[test]
    fn test_check_rejects_bad_values() {
        let mut config = EngineConfig::default();
        config.default_margin_coefficient = 0.0;
        assert!(config.check().is_err());

        let mut config = EngineConfig::default();
        config.default_vat_rate = 150.0;
        assert!(config.check().is_err());
    }
}
