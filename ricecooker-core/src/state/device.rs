//! Last-known device values with staleness tracking

use ricecooker_protocol::StatusFrame;

use crate::safety::{TemperatureLimits, ThresholdStatus};
use crate::scheduler::elapsed_ms;

/// Device state owned by the driver
///
/// `last_frame` is replaced whole on every accepted frame, so readers never
/// see values from two different frames. Thresholds are checked against the
/// top (lid) temperature.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceState {
    last_frame: Option<StatusFrame>,
    last_update_ms: u32,
    limits: TemperatureLimits,
    frames_applied: u32,
}

impl DeviceState {
    /// Create an empty state with fixed thresholds
    pub fn new(limits: TemperatureLimits) -> Self {
        Self {
            last_frame: None,
            last_update_ms: 0,
            limits,
            frames_applied: 0,
        }
    }

    /// Replace the current frame and stamp the time
    pub fn apply(&mut self, frame: StatusFrame, now_ms: u32) {
        self.last_frame = Some(frame);
        self.last_update_ms = now_ms;
        self.frames_applied = self.frames_applied.wrapping_add(1);
    }

    /// Most recently accepted frame
    pub fn last_frame(&self) -> Option<&StatusFrame> {
        self.last_frame.as_ref()
    }

    /// Time of the last accepted frame
    pub fn last_update_ms(&self) -> Option<u32> {
        self.last_frame.map(|_| self.last_update_ms)
    }

    /// Number of frames applied since construction
    pub fn frames_applied(&self) -> u32 {
        self.frames_applied
    }

    /// Thresholds fixed at construction
    pub fn limits(&self) -> &TemperatureLimits {
        &self.limits
    }

    /// True if no frame ever arrived, or the last one is older than `max_age_ms`
    pub fn is_stale(&self, now_ms: u32, max_age_ms: u32) -> bool {
        match self.last_frame {
            None => true,
            Some(_) => elapsed_ms(now_ms, self.last_update_ms) > max_age_ms,
        }
    }

    /// Lid temperature (°C) from the last frame
    pub fn top_temperature(&self) -> Option<u8> {
        self.last_frame.map(|f| f.top_temp_c)
    }

    /// Bottom temperature (°C) from the last frame
    pub fn bottom_temperature(&self) -> Option<u8> {
        self.last_frame.map(|f| f.bottom_temp_c)
    }

    /// Wifi LED as last reported; false before the first frame
    pub fn wifi_led_on(&self) -> bool {
        self.last_frame.map(|f| f.wifi_led_on).unwrap_or(false)
    }

    /// Top temperature classified against the limits
    pub fn threshold_status(&self) -> ThresholdStatus {
        self.limits.check(self.top_temperature())
    }

    /// False when no frame has been applied
    pub fn is_over_max(&self) -> bool {
        self.threshold_status() == ThresholdStatus::OverMax
    }

    /// False when no frame has been applied
    pub fn is_under_min(&self) -> bool {
        self.threshold_status() == ThresholdStatus::UnderMin
    }
}
