//! Sensor and output adapters
//!
//! [`AdapterSet`] is the driver's ordered subscription list. The concrete
//! adapters here cover the common cases: keeping the last value for a host
//! to read, and driving a GPIO pin.

pub mod gpio;
pub mod sensor;
pub mod set;

pub use gpio::GpioOutput;
pub use sensor::{LatestState, LatestTemperature};
pub use set::{AdapterId, AdapterSet, AttachError, MAX_ADAPTERS};
