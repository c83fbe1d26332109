//! Heater control
//!
//! The heater relay is switched by the panel MCU; this module decides when
//! the relay bit in the control frame should be set.

pub mod modulator;

pub use modulator::{HeatBand, PowerModulator, DEFAULT_THERMAL_MASS_MS_PER_C, HEATER_REST_MS};
