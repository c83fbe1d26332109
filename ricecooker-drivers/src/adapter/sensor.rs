//! Last-value adapters
//!
//! Hosts that poll rather than react attach one of these and read the
//! value whenever they like.

use core::cell::Cell;

use ricecooker_core::traits::{BinarySink, TemperatureSink};

/// Keeps the last published temperature
#[derive(Debug, Default)]
pub struct LatestTemperature {
    value: Cell<Option<u8>>,
    updates: Cell<u32>,
}

impl LatestTemperature {
    pub const fn new() -> Self {
        Self {
            value: Cell::new(None),
            updates: Cell::new(0),
        }
    }

    /// Last value, `None` until the first publish
    pub fn get(&self) -> Option<u8> {
        self.value.get()
    }

    /// Number of publishes received
    pub fn updates(&self) -> u32 {
        self.updates.get()
    }
}

impl TemperatureSink for LatestTemperature {
    fn publish_celsius(&self, celsius: u8) {
        self.value.set(Some(celsius));
        self.updates.set(self.updates.get().wrapping_add(1));
    }
}

/// Keeps the last published on/off state
#[derive(Debug, Default)]
pub struct LatestState {
    value: Cell<Option<bool>>,
    updates: Cell<u32>,
}

impl LatestState {
    pub const fn new() -> Self {
        Self {
            value: Cell::new(None),
            updates: Cell::new(0),
        }
    }

    pub fn get(&self) -> Option<bool> {
        self.value.get()
    }

    pub fn updates(&self) -> u32 {
        self.updates.get()
    }
}

impl BinarySink for LatestState {
    fn write_state(&self, on: bool) {
        self.value.set(Some(on));
        self.updates.set(self.updates.get().wrapping_add(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_temperature() {
        let sink = LatestTemperature::new();
        assert_eq!(sink.get(), None);
        assert_eq!(sink.updates(), 0);

        sink.publish_celsius(70);
        sink.publish_celsius(72);
        assert_eq!(sink.get(), Some(72));
        assert_eq!(sink.updates(), 2);
    }

    #[test]
    fn test_latest_state() {
        let sink = LatestState::new();
        assert_eq!(sink.get(), None);

        sink.write_state(true);
        assert_eq!(sink.get(), Some(true));
        sink.write_state(false);
        assert_eq!(sink.get(), Some(false));
        assert_eq!(sink.updates(), 2);
    }
}
