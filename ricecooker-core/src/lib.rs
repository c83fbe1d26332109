//! Board-agnostic core logic for the rice cooker driver
//!
//! This crate contains everything that does not touch the UART or pins:
//!
//! - Device state with staleness tracking
//! - Poll timers for the cooperative tick loop
//! - Temperature limit checks
//! - Link state machine
//! - Adapter traits for pushed sensor/output values
//! - Heater power modulation and cooking programs
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod config;
pub mod heater;
pub mod program;
pub mod safety;
pub mod scheduler;
pub mod state;
pub mod traits;
