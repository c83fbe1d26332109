//! Configured min/max temperature thresholds

use crate::config::{ConfigError, RiceCookerConfig};

/// Threshold check result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ThresholdStatus {
    /// Within limits, or no reading yet
    #[default]
    Normal,
    /// Above `max_c`
    OverMax,
    /// Below `min_c`
    UnderMin,
}

/// Immutable temperature thresholds (°C)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TemperatureLimits {
    min_c: u8,
    max_c: u8,
}

impl TemperatureLimits {
    /// Create limits; `min_c` must be below `max_c`
    pub fn new(min_c: u8, max_c: u8) -> Result<Self, ConfigError> {
        if min_c >= max_c {
            return Err(ConfigError::InvalidTemperatureRange);
        }
        Ok(Self { min_c, max_c })
    }

    /// Limits taken from a driver configuration
    pub fn from_config(config: &RiceCookerConfig) -> Result<Self, ConfigError> {
        Self::new(config.min_temp_c, config.max_temp_c)
    }

    /// Lower threshold (°C)
    pub fn min_c(&self) -> u8 {
        self.min_c
    }

    /// Upper threshold (°C)
    pub fn max_c(&self) -> u8 {
        self.max_c
    }

    /// Strictly above the maximum
    pub fn is_over_max(&self, temp_c: u8) -> bool {
        temp_c > self.max_c
    }

    /// Strictly below the minimum
    pub fn is_under_min(&self, temp_c: u8) -> bool {
        temp_c < self.min_c
    }

    /// Classify a reading; `None` (no reading) is always normal
    pub fn check(&self, temp_c: Option<u8>) -> ThresholdStatus {
        match temp_c {
            Some(t) if self.is_over_max(t) => ThresholdStatus::OverMax,
            Some(t) if self.is_under_min(t) => ThresholdStatus::UnderMin,
            _ => ThresholdStatus::Normal,
        }
    }
}
