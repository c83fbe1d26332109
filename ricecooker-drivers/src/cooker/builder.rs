//! Driver construction

use embedded_io::{Read, ReadReady, Write};
use ricecooker_core::config::RiceCookerConfig;

use super::{RiceCooker, SetupError};

/// Collects what the driver needs before it can run
///
/// ```ignore
/// let mut cooker = RiceCookerBuilder::new(RiceCookerConfig::with_thresholds(60, 100))
///     .uart(uart)
///     .build(now_ms)?;
/// cooker.attach_top_temperature(&lid_sensor)?;
/// loop {
///     cooker.tick(clock.now_ms());
/// }
/// ```
pub struct RiceCookerBuilder<U> {
    config: RiceCookerConfig,
    uart: Option<U>,
}

impl<U> RiceCookerBuilder<U>
where
    U: Read + ReadReady + Write,
{
    pub fn new(config: RiceCookerConfig) -> Self {
        Self { config, uart: None }
    }

    /// Attach the UART connected to the panel MCU
    pub fn uart(mut self, uart: U) -> Self {
        self.uart = Some(uart);
        self
    }

    /// Validate the configuration and create the driver
    ///
    /// Timers start counting from `now_ms`.
    pub fn build<'a>(self, now_ms: u32) -> Result<RiceCooker<'a, U>, SetupError> {
        let uart = self.uart.ok_or(SetupError::NoUartAttached)?;
        RiceCooker::new(uart, self.config, now_ms)
    }
}
