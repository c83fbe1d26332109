//! Adaptive heater power modulation
//!
//! The pot has a lot of thermal inertia, so a plain bang-bang controller
//! overshoots badly. Instead the heater is switched on in timed pulses
//! sized to the distance from the top of the target band, followed by a
//! fixed rest so the heat can spread before the next decision:
//!
//! ```text
//! pulse_ms = (band.high_c - bottom_c) × thermal_mass
//! ```
//!
//! `thermal_mass` (ms of heating per °C) is learned: before each new pulse
//! the peak reached after the previous one is compared with its target and
//! the estimate is nudged up or down.

use crate::scheduler::elapsed_ms;

/// Rest time after each pulse
pub const HEATER_REST_MS: u32 = 30_000;

/// Initial thermal mass estimate (ms of heating per °C)
pub const DEFAULT_THERMAL_MASS_MS_PER_C: i32 = 1_500;

const MIN_THERMAL_MASS_MS_PER_C: i32 = 100;
const MAX_THERMAL_MASS_MS_PER_C: i32 = 8_000;

/// Heat spent boiling water does not raise the temperature
const BOILING_C: u8 = 100;

/// Target band (°C)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HeatBand {
    pub low_c: u8,
    pub high_c: u8,
}

impl HeatBand {
    /// Band of `target_c ± hysteresis_c`, saturating at 0 and 255
    pub fn around(target_c: u8, hysteresis_c: u8) -> Self {
        Self {
            low_c: target_c.saturating_sub(hysteresis_c),
            high_c: target_c.saturating_add(hysteresis_c),
        }
    }
}

/// Pulse-based heater controller with thermal mass learning
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerModulator {
    band: Option<HeatBand>,
    on: bool,
    /// `Some(0)` marks an expired pulse awaiting switch-off
    pulse_remaining_ms: Option<u32>,
    rest_remaining_ms: u32,
    last_step_ms: Option<u32>,

    top_c: u8,
    bottom_c: u8,

    // Learning state for the previous pulse
    peak_c: u8,
    last_high_c: u8,
    pulse_start_c: u8,
    last_pulse_ms: u32,
    just_reset: bool,
    thermal_mass: i32,
}

impl Default for PowerModulator {
    fn default() -> Self {
        Self::new()
    }
}

impl PowerModulator {
    pub fn new() -> Self {
        Self {
            band: None,
            on: false,
            pulse_remaining_ms: None,
            rest_remaining_ms: 0,
            last_step_ms: None,
            top_c: 0,
            bottom_c: 0,
            peak_c: 0,
            last_high_c: 0,
            pulse_start_c: 0,
            last_pulse_ms: 0,
            just_reset: true,
            thermal_mass: DEFAULT_THERMAL_MASS_MS_PER_C,
        }
    }

    /// Turn the heater on immediately
    pub fn power_on(&mut self) {
        if !self.on {
            debug!("Heater power: on");
            self.on = true;
        }
    }

    /// Turn the heater off immediately
    pub fn power_off(&mut self) {
        if self.on {
            debug!("Heater power: off");
            self.on = false;
        }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Aim for `target_c ± hysteresis_c` from the next step on
    pub fn set_target(&mut self, target_c: u8, hysteresis_c: u8) {
        self.band = Some(HeatBand::around(target_c, hysteresis_c));
    }

    /// Drop the target; the next step switches the heater off
    pub fn clear_target(&mut self) {
        self.band = None;
    }

    pub fn band(&self) -> Option<HeatBand> {
        self.band
    }

    /// Current thermal mass estimate (ms per °C)
    pub fn thermal_mass_ms_per_c(&self) -> i32 {
        self.thermal_mass
    }

    pub fn top_temperature(&self) -> u8 {
        self.top_c
    }

    pub fn bottom_temperature(&self) -> u8 {
        self.bottom_c
    }

    /// Feed the latest temperatures
    pub fn update(&mut self, top_c: u8, bottom_c: u8) {
        self.top_c = top_c;
        self.bottom_c = bottom_c;
        self.peak_c = self.peak_c.max(bottom_c);
    }

    /// Forget the target and pulse history; keeps the learned thermal mass
    pub fn reset(&mut self) {
        self.power_off();
        self.band = None;
        self.pulse_remaining_ms = None;
        self.rest_remaining_ms = 0;
        self.last_step_ms = None;
        self.peak_c = 0;
        self.last_high_c = 0;
        self.pulse_start_c = 0;
        self.last_pulse_ms = 0;
        self.just_reset = true;
    }

    /// Advance the controller to `now_ms`
    pub fn step(&mut self, now_ms: u32) {
        let lapsed = self
            .last_step_ms
            .map(|last| elapsed_ms(now_ms, last))
            .unwrap_or(0);
        self.last_step_ms = Some(now_ms);

        if let Some(remaining) = self.pulse_remaining_ms.as_mut() {
            *remaining = remaining.saturating_sub(lapsed);
        }
        self.rest_remaining_ms = self.rest_remaining_ms.saturating_sub(lapsed);

        let Some(band) = self.band else {
            self.power_off();
            self.pulse_remaining_ms = None;
            return;
        };

        if self.bottom_c < band.low_c
            && self.pulse_remaining_ms.is_none()
            && self.rest_remaining_ms == 0
        {
            self.start_pulse(band);
        } else if self.bottom_c >= band.high_c || self.pulse_remaining_ms == Some(0) {
            self.power_off();
            self.pulse_remaining_ms = None;
            self.rest_remaining_ms = HEATER_REST_MS;
        } else {
            // Hold the relay as it is to limit switching
            trace!(
                "Heater holding: pulse {} ms, rest {} ms",
                self.pulse_remaining_ms.unwrap_or(0),
                self.rest_remaining_ms
            );
        }
    }

    fn start_pulse(&mut self, band: HeatBand) {
        // Water at boiling point hides how much heat the pot took
        if !self.just_reset && self.peak_c < BOILING_C {
            self.learn();
        }

        let pulse_ms = (band.high_c - self.bottom_c) as u32 * self.thermal_mass as u32;

        self.last_high_c = band.high_c;
        self.peak_c = self.bottom_c;
        self.pulse_start_c = self.bottom_c;
        self.last_pulse_ms = pulse_ms;
        self.just_reset = false;

        self.pulse_remaining_ms = Some(pulse_ms);
        self.power_on();

        debug!(
            "Heater pulse: {} ms, thermal mass {} ms/C",
            pulse_ms, self.thermal_mass
        );
    }

    fn learn(&mut self) {
        let last_pulse = self.last_pulse_ms as i32;
        let rise = self.peak_c as i32 - self.pulse_start_c as i32;
        let needed = if rise >= 1 {
            last_pulse / rise
        } else {
            // No measurable rise: the last pulse was too short
            last_pulse + last_pulse / 4
        };

        // Positive: peak stayed below target; negative: overshoot
        let shortfall = (self.last_high_c as i32 - self.peak_c as i32).clamp(-3, 3);
        let error = needed - self.thermal_mass;

        let adjustment = match shortfall {
            0 => error.clamp(-200, 200),
            s if s > 0 => error.clamp(200, 500 * s),
            s => error.clamp(500 * s, -200),
        };

        self.thermal_mass = (self.thermal_mass + adjustment)
            .clamp(MIN_THERMAL_MASS_MS_PER_C, MAX_THERMAL_MASS_MS_PER_C);

        debug!(
            "Heater learning: needed {} ms/C, shortfall {} C, thermal mass {} ms/C",
            needed, shortfall, self.thermal_mass
        );
    }
}
