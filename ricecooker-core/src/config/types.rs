//! Configuration type definitions

use ricecooker_protocol::Led;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default interval between adapter publishes (host polling interval "5s")
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 5_000;

/// Default interval between UART exchanges with the panel MCU
pub const DEFAULT_EXCHANGE_INTERVAL_MS: u32 = 100;

/// Default interval between heater/program control steps
pub const DEFAULT_CONTROL_INTERVAL_MS: u32 = 500;

/// Default age after which device data counts as stale
pub const DEFAULT_STALE_AFTER_MS: u32 = 15_000;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// `min_temp_c` is not below `max_temp_c`
    InvalidTemperatureRange,
    /// An interval is zero
    ZeroInterval,
    /// UART exchanges must run at least as often as publishes
    ExchangeSlowerThanPoll,
    /// Staleness window shorter than the poll interval
    StaleWindowTooShort,
    /// Duration string could not be parsed
    InvalidDuration,
    /// Stored configuration could not be decoded
    Deserialize,
    /// Output buffer too small for the encoded configuration
    Serialize,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            ConfigError::InvalidTemperatureRange => "min_temp must be below max_temp",
            ConfigError::ZeroInterval => "intervals must be non-zero",
            ConfigError::ExchangeSlowerThanPoll => "exchange interval exceeds poll interval",
            ConfigError::StaleWindowTooShort => "stale window shorter than poll interval",
            ConfigError::InvalidDuration => "invalid duration",
            ConfigError::Deserialize => "stored configuration is corrupt",
            ConfigError::Serialize => "configuration does not fit the buffer",
        };
        f.write_str(msg)
    }
}

/// Rice cooker driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RiceCookerConfig {
    /// Lower temperature threshold (°C)
    pub min_temp_c: u8,
    /// Upper temperature threshold (°C)
    pub max_temp_c: u8,
    /// Interval between adapter publishes
    pub poll_interval_ms: u32,
    /// Interval between UART exchanges
    pub exchange_interval_ms: u32,
    /// Interval between heater/program steps
    pub control_interval_ms: u32,
    /// Device data older than this is stale
    pub stale_after_ms: u32,
    /// Panel LED used to show wifi status
    pub wifi_led: Led,
}

impl Default for RiceCookerConfig {
    fn default() -> Self {
        Self {
            min_temp_c: 0,
            max_temp_c: 130,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            exchange_interval_ms: DEFAULT_EXCHANGE_INTERVAL_MS,
            control_interval_ms: DEFAULT_CONTROL_INTERVAL_MS,
            stale_after_ms: DEFAULT_STALE_AFTER_MS,
            wifi_led: Led::Led9Blue,
        }
    }
}

impl RiceCookerConfig {
    /// Default timing with the given temperature thresholds
    pub fn with_thresholds(min_temp_c: u8, max_temp_c: u8) -> Self {
        Self {
            min_temp_c,
            max_temp_c,
            ..Self::default()
        }
    }

    /// Check the configuration, returning the first violated rule
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_temp_c >= self.max_temp_c {
            return Err(ConfigError::InvalidTemperatureRange);
        }
        if self.poll_interval_ms == 0
            || self.exchange_interval_ms == 0
            || self.control_interval_ms == 0
        {
            return Err(ConfigError::ZeroInterval);
        }
        if self.exchange_interval_ms > self.poll_interval_ms {
            return Err(ConfigError::ExchangeSlowerThanPoll);
        }
        if self.stale_after_ms < self.poll_interval_ms {
            return Err(ConfigError::StaleWindowTooShort);
        }
        Ok(())
    }

    /// Encode as postcard binary, returning the used part of `buf`
    #[cfg(feature = "serde")]
    pub fn to_postcard<'b>(&self, buf: &'b mut [u8]) -> Result<&'b mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Serialize)
    }

    /// Decode postcard binary and validate the result
    #[cfg(feature = "serde")]
    pub fn from_postcard(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)?;
        config.validate()?;
        Ok(config)
    }
}

/// Parse a host-style duration such as `"5s"`, `"100ms"`, `"2min"` or `"1h"`
///
/// Only whole numbers are accepted. Whitespace around the value is ignored.
pub fn parse_duration_ms(text: &str) -> Result<u32, ConfigError> {
    let text = text.trim();
    let split = text
        .find(|c: char| !c.is_ascii_digit())
        .ok_or(ConfigError::InvalidDuration)?;
    let (digits, unit) = text.split_at(split);
    if digits.is_empty() {
        return Err(ConfigError::InvalidDuration);
    }

    let value: u32 = digits.parse().map_err(|_| ConfigError::InvalidDuration)?;
    let scale: u32 = match unit.trim() {
        "ms" => 1,
        "s" => 1_000,
        "min" => 60_000,
        "h" => 3_600_000,
        _ => return Err(ConfigError::InvalidDuration),
    };

    value.checked_mul(scale).ok_or(ConfigError::InvalidDuration)
}
