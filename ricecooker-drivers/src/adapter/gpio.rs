//! GPIO output adapter
//!
//! Mirrors a binary channel (e.g. the wifi status) on a GPIO pin.

use core::cell::{Cell, RefCell};

use embedded_hal::digital::OutputPin;
use ricecooker_core::traits::BinarySink;

/// Binary channel on a GPIO pin
///
/// The pin can be configured as active-high (default) or active-low.
pub struct GpioOutput<P> {
    pin: RefCell<P>,
    /// If true, output ON = pin LOW
    inverted: bool,
    /// Current logical state (true = on)
    on: Cell<bool>,
    faults: Cell<u32>,
}

impl<P: OutputPin> GpioOutput<P> {
    /// Create a new GPIO output, initially off
    ///
    /// # Arguments
    /// - `pin`: The GPIO pin to drive
    /// - `inverted`: If true, output is ON when pin is LOW
    pub fn new(pin: P, inverted: bool) -> Self {
        let output = Self {
            pin: RefCell::new(pin),
            inverted,
            on: Cell::new(false),
            faults: Cell::new(0),
        };
        output.write_state(false);
        output
    }

    pub fn new_active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, true)
    }

    /// Logical state last written
    pub fn is_on(&self) -> bool {
        self.on.get()
    }

    /// Number of failed pin writes
    pub fn faults(&self) -> u32 {
        self.faults.get()
    }

    /// Give the pin back
    pub fn release(self) -> P {
        self.pin.into_inner()
    }

    fn fault(&self) {
        self.faults.set(self.faults.get().wrapping_add(1));
    }
}

impl<P: OutputPin> BinarySink for GpioOutput<P> {
    fn write_state(&self, on: bool) {
        self.on.set(on);

        let Ok(mut pin) = self.pin.try_borrow_mut() else {
            self.fault();
            return;
        };
        // on != inverted → high
        let result = if on != self.inverted {
            pin.set_high()
        } else {
            pin.set_low()
        };
        if result.is_err() {
            warn!("GPIO output write failed");
            self.fault();
        }
    }
}
