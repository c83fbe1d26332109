//! Rice cooker driver
//!
//! [`RiceCooker`] owns the UART to the panel MCU and everything derived
//! from it. It is driven by [`RiceCooker::tick`] from the host's loop;
//! nothing in here blocks or spawns.

pub mod builder;
pub mod driver;
pub mod stats;

pub use builder::RiceCookerBuilder;
pub use driver::{RiceCooker, KEY_QUEUE_LEN};
pub use stats::DriverStats;

use ricecooker_core::config::ConfigError;

/// Errors that prevent the driver from being created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SetupError {
    /// No UART was given to the builder
    NoUartAttached,
    /// The configuration failed validation
    Config(ConfigError),
}

impl From<ConfigError> for SetupError {
    fn from(err: ConfigError) -> Self {
        SetupError::Config(err)
    }
}

impl core::fmt::Display for SetupError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SetupError::NoUartAttached => f.write_str("no UART attached"),
            SetupError::Config(err) => write!(f, "invalid configuration: {}", err),
        }
    }
}
