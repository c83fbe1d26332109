//! Temperature limit monitoring
//!
//! Limits are reported, never enforced: a breach is a queryable condition
//! and the heater keeps following its program.

pub mod limits;

pub use limits::{TemperatureLimits, ThresholdStatus};
