//! Hardware-facing parts of the rice cooker driver
//!
//! - [`cooker::RiceCooker`]: the driver, talking to the panel MCU over any
//!   `embedded-io` UART
//! - [`adapter`]: adapter registry and concrete sensor/output adapters

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod adapter;
pub mod cooker;

pub use adapter::{AdapterId, AdapterSet, AttachError, GpioOutput, LatestState, LatestTemperature};
pub use cooker::{DriverStats, RiceCooker, RiceCookerBuilder, SetupError};
