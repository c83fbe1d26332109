//! Sensor and output adapter traits
//!
//! Adapters are pushed values by the driver after each publish tick. They
//! take `&self` so that the driver can hold plain shared references;
//! implementations keep their own state in `Cell`/`RefCell`.

/// Derived value an adapter subscribes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// Lid temperature (°C)
    TopTemperature,
    /// Pot temperature (°C)
    BottomTemperature,
    /// Wifi status LED
    WifiStatus,
}

impl Channel {
    /// True for channels carrying a temperature
    pub fn is_temperature(&self) -> bool {
        matches!(self, Channel::TopTemperature | Channel::BottomTemperature)
    }
}

/// Consumer of a temperature reading
pub trait TemperatureSink {
    /// Receive a temperature in whole degrees Celsius
    fn publish_celsius(&self, celsius: u8);
}

/// Consumer of an on/off state
pub trait BinarySink {
    /// Receive the current state
    fn write_state(&self, on: bool);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_kinds() {
        assert!(Channel::TopTemperature.is_temperature());
        assert!(Channel::BottomTemperature.is_temperature());
        assert!(!Channel::WifiStatus.is_temperature());
    }
}
