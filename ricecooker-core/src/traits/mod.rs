//! Adapter traits
//!
//! These traits define the interface between the driver and whatever
//! consumes its derived values (host sensors, LEDs, GPIO outputs).

pub mod adapter;

pub use adapter::{BinarySink, Channel, TemperatureSink};
