//! The rice cooker driver
//!
//! Each [`RiceCooker::tick`] runs whichever of three timers are due:
//!
//! - exchange: write one control frame, read whatever the MCU sent
//! - control: feed temperatures to the heater, step the program
//! - poll: push values to adapters, report threshold changes
//!
//! The first five exchanges after construction send the panel reset
//! sequence instead of control frames.

use embedded_io::{Read, ReadReady, Write};
use heapless::Deque;
use ricecooker_core::config::RiceCookerConfig;
use ricecooker_core::heater::PowerModulator;
use ricecooker_core::program::{Program, StepOutcome};
use ricecooker_core::safety::{TemperatureLimits, ThresholdStatus};
use ricecooker_core::scheduler::PollTimer;
use ricecooker_core::state::{DeviceState, LinkEvent, LinkState};
use ricecooker_core::traits::{BinarySink, Channel, TemperatureSink};
use ricecooker_protocol::{
    ControlFrame, FrameError, KeyEvent, Led, StatusDecoder, StatusFrame, RESET_SEQUENCE,
    RX_BUFFER_SIZE,
};

use super::stats::{bump, DriverStats};
use super::SetupError;
use crate::adapter::{AdapterId, AdapterSet, AttachError};

/// Pending key events kept for [`RiceCooker::take_key_event`]
pub const KEY_QUEUE_LEN: usize = 8;

/// Upper bound on UART reads per exchange, so a chattering line cannot
/// hold up the caller's loop
const MAX_READS_PER_EXCHANGE: usize = 8;

/// UART driver for the rice cooker panel MCU
pub struct RiceCooker<'a, U> {
    uart: U,
    config: RiceCookerConfig,

    decoder: StatusDecoder,
    device: DeviceState,
    link: LinkState,

    exchange_timer: PollTimer,
    control_timer: PollTimer,
    poll_timer: PollTimer,

    /// Next control frame; display and LEDs are updated in place
    control: ControlFrame,
    /// Reset frames already sent
    reset_step: usize,
    wifi_led: bool,

    heater: PowerModulator,
    program: Option<Program>,

    keys: Deque<KeyEvent, KEY_QUEUE_LEN>,
    last_key_byte: u8,

    adapters: AdapterSet<'a>,
    threshold: ThresholdStatus,
    stale_reported: bool,

    now_ms: u32,
    stats: DriverStats,
}

impl<'a, U> RiceCooker<'a, U>
where
    U: Read + ReadReady + Write,
{
    pub(crate) fn new(uart: U, config: RiceCookerConfig, now_ms: u32) -> Result<Self, SetupError> {
        config.validate()?;
        let limits = TemperatureLimits::from_config(&config)?;
        let link = LinkState::AwaitingUart.transition(LinkEvent::UartAttached);

        info!(
            "Rice cooker driver up: limits {}..{} C, poll {} ms",
            config.min_temp_c,
            config.max_temp_c,
            config.poll_interval_ms
        );

        Ok(Self {
            uart,
            decoder: StatusDecoder::new(),
            device: DeviceState::new(limits),
            link,
            exchange_timer: PollTimer::new(now_ms, config.exchange_interval_ms),
            control_timer: PollTimer::new(now_ms, config.control_interval_ms),
            poll_timer: PollTimer::new(now_ms, config.poll_interval_ms),
            control: ControlFrame::new(),
            reset_step: 0,
            wifi_led: false,
            heater: PowerModulator::new(),
            program: None,
            keys: Deque::new(),
            last_key_byte: 0,
            adapters: AdapterSet::new(),
            threshold: ThresholdStatus::Normal,
            stale_reported: false,
            now_ms,
            stats: DriverStats::default(),
            config,
        })
    }

    /// Run whatever is due at `now_ms`
    ///
    /// Call this often, at least every `exchange_interval_ms`. A late call
    /// runs each due task once; missed periods are not caught up.
    pub fn tick(&mut self, now_ms: u32) {
        self.now_ms = now_ms;

        if self.exchange_timer.tick(now_ms) {
            self.send();
            self.receive(now_ms);
        }
        if self.control_timer.tick(now_ms) {
            self.control_step(now_ms);
        }
        if self.poll_timer.tick(now_ms) {
            self.publish(now_ms);
        }
    }

    fn send(&mut self) {
        let frame = match RESET_SEQUENCE.get(self.reset_step) {
            Some(frame) => {
                self.reset_step += 1;
                debug!(
                    "Panel reset frame {}/{}",
                    self.reset_step,
                    RESET_SEQUENCE.len()
                );
                *frame
            }
            None => {
                let heater_on = self.heater.is_on();
                self.control.heater_on = heater_on;
                self.control.set_led(Led::Led1, heater_on);
                self.control.set_led(self.config.wifi_led, self.wifi_led);
                self.control.encode()
            }
        };

        if self.uart.write_all(&frame).is_err() {
            warn!("UART write failed");
            bump(&mut self.stats.tx_errors);
        }
    }

    fn receive(&mut self, now_ms: u32) {
        let mut scratch = [0u8; RX_BUFFER_SIZE];

        for _ in 0..MAX_READS_PER_EXCHANGE {
            match self.uart.read_ready() {
                Ok(true) => {}
                Ok(false) => break,
                Err(_) => {
                    warn!("UART read_ready failed");
                    bump(&mut self.stats.rx_errors);
                    break;
                }
            }

            let free = self.decoder.free();
            let count = match self.uart.read(&mut scratch[..free]) {
                Ok(0) => break,
                Ok(count) => count,
                Err(_) => {
                    warn!("UART read failed");
                    bump(&mut self.stats.rx_errors);
                    break;
                }
            };
            self.stats.bytes_received = self.stats.bytes_received.saturating_add(count as u32);
            self.decoder.push(&scratch[..count]);

            self.drain_frames(now_ms);
        }
    }

    fn drain_frames(&mut self, now_ms: u32) {
        while let Some(result) = self.decoder.next_frame() {
            match result {
                Ok(frame) => self.accept(frame, now_ms),
                Err(FrameError::ChecksumMismatch) => {
                    debug!("Status frame checksum mismatch, resyncing");
                    bump(&mut self.stats.frames_dropped);
                }
                Err(FrameError::NoMarker) => {
                    trace!("Skipping bytes before start marker");
                }
            }
        }
    }

    fn accept(&mut self, frame: StatusFrame, now_ms: u32) {
        self.device.apply(frame, now_ms);
        bump(&mut self.stats.frames_accepted);

        let link = self.link.transition(LinkEvent::FrameAccepted);
        if link != self.link {
            info!("Panel MCU link active");
            self.link = link;
        }
        if self.stale_reported {
            info!("Status frames resumed");
            self.stale_reported = false;
        }

        self.control
            .show_pair(frame.top_temp_c, frame.bottom_temp_c, true);

        // The MCU repeats the key byte while a key is held
        if frame.key_byte != self.last_key_byte {
            self.last_key_byte = frame.key_byte;
            if let Some(key) = frame.key() {
                self.handle_key(key);
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        info!("Key pressed: {}", key);

        if self.keys.is_full() {
            self.keys.pop_front();
        }
        let _ = self.keys.push_back(key);

        match key {
            KeyEvent::Start => self.start(),
            KeyEvent::Cancel => self.cancel(),
            KeyEvent::Timer | KeyEvent::Select => {}
        }
    }

    fn control_step(&mut self, now_ms: u32) {
        let stale = self.device.is_stale(now_ms, self.config.stale_after_ms);
        let frame = match self.device.last_frame() {
            Some(frame) if !stale => *frame,
            _ => {
                if self.heater.is_on() {
                    warn!("No fresh temperatures, heater off");
                }
                self.heater.power_off();
                return;
            }
        };

        self.heater.update(frame.top_temp_c, frame.bottom_temp_c);

        let outcome = match self.program.as_mut() {
            Some(program) => program.step(now_ms, &mut self.heater),
            None => StepOutcome::Continue,
        };
        match outcome {
            StepOutcome::Continue => {}
            StepOutcome::Abort => {
                warn!("Program {} aborted", self.program_name());
                self.set_program(None);
            }
            StepOutcome::Handover(next) => self.set_program(Some(next)),
        }

        self.heater.step(now_ms);
    }

    fn publish(&mut self, now_ms: u32) {
        let status = self.device.threshold_status();
        if status != self.threshold {
            let limits = self.device.limits();
            match status {
                ThresholdStatus::OverMax => {
                    warn!("Top temperature above {} C", limits.max_c())
                }
                ThresholdStatus::UnderMin => {
                    warn!("Top temperature below {} C", limits.min_c())
                }
                ThresholdStatus::Normal => info!("Top temperature back within limits"),
            }
            self.threshold = status;
        }

        if self.link.is_active()
            && !self.stale_reported
            && self.device.is_stale(now_ms, self.config.stale_after_ms)
        {
            warn!("No status frame for {} ms", self.config.stale_after_ms);
            self.stale_reported = true;
        }

        let Some(frame) = self.device.last_frame() else {
            trace!("Nothing to publish yet");
            return;
        };
        self.adapters.publish(frame);
        bump(&mut self.stats.publishes);
    }

    // Adapters

    /// Receive the lid temperature on every poll
    pub fn attach_top_temperature(
        &mut self,
        sink: &'a dyn TemperatureSink,
    ) -> Result<AdapterId, AttachError> {
        self.adapters.attach_temperature(Channel::TopTemperature, sink)
    }

    /// Receive the pot temperature on every poll
    pub fn attach_bottom_temperature(
        &mut self,
        sink: &'a dyn TemperatureSink,
    ) -> Result<AdapterId, AttachError> {
        self.adapters
            .attach_temperature(Channel::BottomTemperature, sink)
    }

    /// Receive the wifi LED state on every poll
    pub fn attach_wifi_status(&mut self, sink: &'a dyn BinarySink) -> Result<AdapterId, AttachError> {
        self.adapters.attach_binary(Channel::WifiStatus, sink)
    }

    /// Returns false if `id` was not attached
    pub fn detach(&mut self, id: AdapterId) -> bool {
        self.adapters.detach(id)
    }

    // Queries

    /// Lid temperature, `None` before the first frame
    pub fn top_temperature(&self) -> Option<u8> {
        self.device.top_temperature()
    }

    /// Pot temperature, `None` before the first frame
    pub fn bottom_temperature(&self) -> Option<u8> {
        self.device.bottom_temperature()
    }

    /// Wifi LED as echoed by the MCU
    pub fn wifi_status(&self) -> bool {
        self.device.wifi_led_on()
    }

    pub fn is_over_max_temp(&self) -> bool {
        self.device.is_over_max()
    }

    pub fn is_under_min_temp(&self) -> bool {
        self.device.is_under_min()
    }

    /// True if no frame arrived within `stale_after_ms` of the last tick
    pub fn is_stale(&self) -> bool {
        self.device.is_stale(self.now_ms, self.config.stale_after_ms)
    }

    pub fn link_state(&self) -> LinkState {
        self.link
    }

    pub fn stats(&self) -> DriverStats {
        self.stats
    }

    pub fn config(&self) -> &RiceCookerConfig {
        &self.config
    }

    pub fn device(&self) -> &DeviceState {
        &self.device
    }

    /// True once the panel reset sequence has been sent
    pub fn is_panel_ready(&self) -> bool {
        self.reset_step >= RESET_SEQUENCE.len()
    }

    /// Relay state sent with the next control frame
    pub fn heater_on(&self) -> bool {
        self.heater.is_on()
    }

    /// Oldest unread key press
    pub fn take_key_event(&mut self) -> Option<KeyEvent> {
        self.keys.pop_front()
    }

    // Control

    /// Replace the program; the heater starts from scratch
    ///
    /// The new program is not started. `None` leaves the heater off.
    pub fn set_program(&mut self, program: Option<Program>) {
        match &program {
            Some(p) => info!("Program: {}", p.name()),
            None => info!("Program: none"),
        }
        self.heater.reset();
        self.program = program;
    }

    pub fn program(&self) -> Option<&Program> {
        self.program.as_ref()
    }

    pub fn program_name(&self) -> &'static str {
        self.program.as_ref().map(Program::name).unwrap_or("None")
    }

    /// Estimated minutes until the selected program finishes
    pub fn remaining_time_min(&self) -> Option<u32> {
        self.program
            .as_ref()
            .and_then(|p| p.remaining_time_min(self.now_ms))
    }

    /// Start the selected program from its first stage
    pub fn start(&mut self) {
        match self.program.as_mut() {
            Some(program) => {
                info!("Starting {}", program.name());
                program.start(self.now_ms);
            }
            None => debug!("Start ignored, no program selected"),
        }
    }

    /// Stop the selected program and switch the heater off
    pub fn cancel(&mut self) {
        self.heater.power_off();
        if let Some(program) = self.program.as_mut() {
            info!("Cancelling {}", program.name());
            program.cancel(self.now_ms);
        }
    }

    /// Light or clear the configured wifi LED from the next control frame
    pub fn set_wifi_led(&mut self, on: bool) {
        self.wifi_led = on;
    }

    /// Give the UART back
    pub fn release(self) -> U {
        self.uart
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{LatestState, LatestTemperature};
    use crate::cooker::RiceCookerBuilder;
    use core::cell::RefCell;
    use embedded_io::{ErrorKind, ErrorType};
    use ricecooker_core::program::{KeepWarm, RiceProgram, RiceStage};
    use ricecooker_protocol::CONTROL_FRAME_LEN;
    use std::collections::VecDeque;
    use std::rc::Rc;
    use std::vec::Vec;

    #[derive(Default)]
    struct Wire {
        rx: VecDeque<u8>,
        tx: Vec<u8>,
        max_read: Option<usize>,
        broken: bool,
    }

    /// Mock UART; clones share the same wire so the test can feed bytes
    /// after handing one to the driver
    #[derive(Clone, Default)]
    struct MockUart(Rc<RefCell<Wire>>);

    impl MockUart {
        fn feed(&self, bytes: &[u8]) {
            self.0.borrow_mut().rx.extend(bytes.iter().copied());
        }

        fn sent_frames(&self) -> Vec<[u8; CONTROL_FRAME_LEN]> {
            self.0
                .borrow()
                .tx
                .chunks_exact(CONTROL_FRAME_LEN)
                .map(|chunk| chunk.try_into().unwrap())
                .collect()
        }

        fn last_sent(&self) -> [u8; CONTROL_FRAME_LEN] {
            *self.sent_frames().last().unwrap()
        }
    }

    impl ErrorType for MockUart {
        type Error = ErrorKind;
    }

    impl Read for MockUart {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, ErrorKind> {
            let mut wire = self.0.borrow_mut();
            if wire.broken {
                return Err(ErrorKind::Other);
            }
            let limit = wire.max_read.unwrap_or(usize::MAX);
            let count = buf.len().min(wire.rx.len()).min(limit);
            for slot in &mut buf[..count] {
                *slot = wire.rx.pop_front().unwrap();
            }
            Ok(count)
        }
    }

    impl ReadReady for MockUart {
        fn read_ready(&mut self) -> Result<bool, ErrorKind> {
            let wire = self.0.borrow();
            if wire.broken {
                return Err(ErrorKind::Other);
            }
            Ok(!wire.rx.is_empty())
        }
    }

    impl Write for MockUart {
        fn write(&mut self, buf: &[u8]) -> Result<usize, ErrorKind> {
            let mut wire = self.0.borrow_mut();
            if wire.broken {
                return Err(ErrorKind::Other);
            }
            wire.tx.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> Result<(), ErrorKind> {
            Ok(())
        }
    }

    fn cooker<'a>(uart: &MockUart, config: RiceCookerConfig) -> RiceCooker<'a, MockUart> {
        RiceCookerBuilder::new(config)
            .uart(uart.clone())
            .build(0)
            .unwrap()
    }

    /// Tick every 100 ms over `from..=to`
    fn run(cooker: &mut RiceCooker<'_, MockUart>, from: u32, to: u32) {
        let mut now = from;
        while now <= to {
            cooker.tick(now);
            now += 100;
        }
    }

    fn status(top: u8, bottom: u8, wifi: bool, key: u8) -> [u8; 10] {
        StatusFrame::new(top, bottom, wifi, key).encode()
    }

    #[test]
    fn test_build_requires_uart() {
        let result = RiceCookerBuilder::<MockUart>::new(RiceCookerConfig::default()).build(0);
        assert_eq!(result.err(), Some(SetupError::NoUartAttached));
    }

    #[test]
    fn test_build_validates_config() {
        let result = RiceCookerBuilder::new(RiceCookerConfig::with_thresholds(100, 60))
            .uart(MockUart::default())
            .build(0);
        assert_eq!(
            result.err(),
            Some(SetupError::Config(
                ricecooker_core::config::ConfigError::InvalidTemperatureRange
            ))
        );
    }

    #[test]
    fn test_initial_state() {
        let uart = MockUart::default();
        let cooker = cooker(&uart, RiceCookerConfig::default());

        assert_eq!(cooker.link_state(), LinkState::Syncing);
        assert_eq!(cooker.top_temperature(), None);
        assert_eq!(cooker.bottom_temperature(), None);
        assert!(!cooker.wifi_status());
        assert!(!cooker.is_over_max_temp());
        assert!(!cooker.is_under_min_temp());
        assert!(cooker.is_stale());
        assert!(!cooker.is_panel_ready());
    }

    #[test]
    fn test_reset_sequence_then_control_frames() {
        let uart = MockUart::default();
        let mut cooker = cooker(&uart, RiceCookerConfig::default());

        run(&mut cooker, 100, 500);
        assert_eq!(uart.sent_frames(), RESET_SEQUENCE);
        assert!(cooker.is_panel_ready());

        cooker.tick(600);
        assert_eq!(uart.sent_frames().len(), 6);
        assert_eq!(uart.last_sent(), ControlFrame::new().encode());
    }

    #[test]
    fn test_frame_updates_queries_and_display() {
        let uart = MockUart::default();
        let mut cooker = cooker(&uart, RiceCookerConfig::default());

        uart.feed(&status(70, 65, true, 0));
        cooker.tick(100);
        assert_eq!(cooker.link_state(), LinkState::Active);
        assert_eq!(cooker.top_temperature(), Some(70));
        assert_eq!(cooker.bottom_temperature(), Some(65));
        assert!(cooker.wifi_status());
        assert!(!cooker.is_stale());
        assert_eq!(cooker.stats().frames_accepted, 1);
        assert_eq!(cooker.stats().bytes_received, 10);

        run(&mut cooker, 200, 600);
        let mut expected = ControlFrame::new();
        expected.show_pair(70, 65, true);
        assert_eq!(uart.last_sent(), expected.encode());
    }

    #[test]
    fn test_frame_split_across_exchanges() {
        let uart = MockUart::default();
        uart.0.borrow_mut().max_read = Some(3);
        let mut cooker = cooker(&uart, RiceCookerConfig::default());
        let bytes = status(70, 65, false, 0);

        uart.feed(&bytes[..6]);
        cooker.tick(100);
        assert_eq!(cooker.top_temperature(), None);
        assert_eq!(cooker.link_state(), LinkState::Syncing);

        uart.feed(&bytes[6..]);
        cooker.tick(200);
        assert_eq!(cooker.top_temperature(), Some(70));
        assert_eq!(cooker.link_state(), LinkState::Active);
    }

    #[test]
    fn test_corrupt_frame_dropped() {
        let uart = MockUart::default();
        let mut cooker = cooker(&uart, RiceCookerConfig::default());

        let mut bad = status(70, 65, true, 0);
        bad[9] ^= 0x01;
        uart.feed(&[0x13, 0x37]);
        uart.feed(&bad);
        uart.feed(&status(80, 75, false, 0));
        cooker.tick(100);

        let stats = cooker.stats();
        assert_eq!(stats.frames_dropped, 1);
        assert_eq!(stats.frames_accepted, 1);
        assert_eq!(cooker.top_temperature(), Some(80));
        assert!(!cooker.wifi_status());
    }

    #[test]
    fn test_markers_inside_corrupt_frame_counted_once() {
        let uart = MockUart::default();
        let mut cooker = cooker(&uart, RiceCookerConfig::default());

        let mut bad = status(0xAA, 0xAA, false, 0);
        bad[9] ^= 0x01;
        uart.feed(&status(70, 65, true, 0));
        uart.feed(&bad);
        uart.feed(&status(80, 75, false, 0));
        cooker.tick(100);

        let stats = cooker.stats();
        assert_eq!(stats.frames_accepted, 2);
        assert_eq!(stats.frames_dropped, 1);
        assert_eq!(cooker.top_temperature(), Some(80));
    }

    #[test]
    fn test_thresholds() {
        let uart = MockUart::default();
        let mut cooker = cooker(&uart, RiceCookerConfig::with_thresholds(60, 100));
        assert!(!cooker.is_over_max_temp());

        uart.feed(&status(105, 90, false, 0));
        cooker.tick(100);
        assert!(cooker.is_over_max_temp());
        assert!(!cooker.is_under_min_temp());

        uart.feed(&status(55, 50, false, 0));
        cooker.tick(200);
        assert!(!cooker.is_over_max_temp());
        assert!(cooker.is_under_min_temp());

        uart.feed(&status(100, 90, false, 0));
        cooker.tick(300);
        assert!(!cooker.is_over_max_temp());
        assert!(!cooker.is_under_min_temp());
    }

    #[test]
    fn test_publish_on_poll_only() {
        let top = LatestTemperature::new();
        let bottom = LatestTemperature::new();
        let wifi = LatestState::new();
        let uart = MockUart::default();
        let mut cooker = cooker(&uart, RiceCookerConfig::default());
        cooker.attach_top_temperature(&top).unwrap();
        cooker.attach_bottom_temperature(&bottom).unwrap();
        cooker.attach_wifi_status(&wifi).unwrap();

        uart.feed(&status(70, 65, true, 0));
        run(&mut cooker, 100, 4_900);
        assert_eq!(top.get(), None);
        assert_eq!(top.updates(), 0);

        cooker.tick(5_000);
        assert_eq!(top.get(), Some(70));
        assert_eq!(bottom.get(), Some(65));
        assert_eq!(wifi.get(), Some(true));
        assert_eq!(cooker.stats().publishes, 1);
    }

    #[test]
    fn test_no_publish_before_first_frame() {
        let top = LatestTemperature::new();
        let uart = MockUart::default();
        let mut cooker = cooker(&uart, RiceCookerConfig::default());
        cooker.attach_top_temperature(&top).unwrap();

        run(&mut cooker, 100, 5_000);
        assert_eq!(top.updates(), 0);
        assert_eq!(cooker.stats().publishes, 0);
    }

    #[test]
    fn test_late_tick_publishes_once() {
        let top = LatestTemperature::new();
        let uart = MockUart::default();
        let mut cooker = cooker(&uart, RiceCookerConfig::default());
        cooker.attach_top_temperature(&top).unwrap();

        uart.feed(&status(70, 65, false, 0));
        cooker.tick(50_000);
        assert_eq!(top.updates(), 1);
        assert_eq!(uart.sent_frames().len(), 1);

        cooker.tick(50_001);
        cooker.tick(54_999);
        assert_eq!(top.updates(), 1);
        cooker.tick(55_000);
        assert_eq!(top.updates(), 2);
    }

    #[test]
    fn test_staleness() {
        let uart = MockUart::default();
        let mut cooker = cooker(&uart, RiceCookerConfig::default());

        uart.feed(&status(70, 65, false, 0));
        cooker.tick(100);
        assert!(!cooker.is_stale());

        cooker.tick(15_100);
        assert!(!cooker.is_stale());
        cooker.tick(15_101);
        assert!(cooker.is_stale());

        // Last values stay readable and the link stays up
        assert_eq!(cooker.top_temperature(), Some(70));
        assert_eq!(cooker.link_state(), LinkState::Active);

        uart.feed(&status(71, 65, false, 0));
        cooker.tick(15_200);
        assert!(!cooker.is_stale());
    }

    #[test]
    fn test_attach_and_detach() {
        let top = LatestTemperature::new();
        let uart = MockUart::default();
        let mut cooker = cooker(&uart, RiceCookerConfig::default());

        let id = cooker.attach_top_temperature(&top).unwrap();
        assert_eq!(cooker.attach_top_temperature(&top), Ok(id));

        assert!(cooker.detach(id));
        assert!(!cooker.detach(id));

        uart.feed(&status(70, 65, false, 0));
        run(&mut cooker, 100, 5_000);
        assert_eq!(top.get(), None);
        assert_eq!(cooker.stats().publishes, 1);
    }

    #[test]
    fn test_uart_errors_counted() {
        let uart = MockUart::default();
        uart.0.borrow_mut().broken = true;
        let mut cooker = cooker(&uart, RiceCookerConfig::default());

        run(&mut cooker, 100, 300);
        let stats = cooker.stats();
        assert_eq!(stats.tx_errors, 3);
        assert_eq!(stats.rx_errors, 3);
        assert_eq!(cooker.link_state(), LinkState::Syncing);
    }

    #[test]
    fn test_key_events() {
        let uart = MockUart::default();
        let mut cooker = cooker(&uart, RiceCookerConfig::default());
        cooker.set_program(Some(RiceProgram::new(40).into()));
        assert_eq!(cooker.remaining_time_min(), None);

        uart.feed(&status(20, 20, false, KeyEvent::Start.to_byte()));
        // Held key repeats the byte
        uart.feed(&status(20, 20, false, KeyEvent::Start.to_byte()));
        cooker.tick(100);

        assert_eq!(cooker.take_key_event(), Some(KeyEvent::Start));
        assert_eq!(cooker.take_key_event(), None);
        match cooker.program() {
            Some(Program::Rice(rice)) => assert_eq!(rice.stage(), RiceStage::Start),
            other => panic!("unexpected program {:?}", other),
        }
        assert_eq!(cooker.remaining_time_min(), Some(99));

        uart.feed(&status(20, 20, false, 0));
        uart.feed(&status(20, 20, false, KeyEvent::Cancel.to_byte()));
        cooker.tick(200);
        assert_eq!(cooker.take_key_event(), Some(KeyEvent::Cancel));
        match cooker.program() {
            Some(Program::Rice(rice)) => assert_eq!(rice.stage(), RiceStage::Waiting),
            other => panic!("unexpected program {:?}", other),
        }
    }

    #[test]
    fn test_key_queue_drops_oldest() {
        let uart = MockUart::default();
        let mut cooker = cooker(&uart, RiceCookerConfig::default());

        for _ in 0..KEY_QUEUE_LEN {
            uart.feed(&status(20, 20, false, KeyEvent::Timer.to_byte()));
            uart.feed(&status(20, 20, false, 0));
        }
        uart.feed(&status(20, 20, false, KeyEvent::Select.to_byte()));
        run(&mut cooker, 100, 300);

        let mut events = Vec::new();
        while let Some(key) = cooker.take_key_event() {
            events.push(key);
        }
        assert_eq!(events.len(), KEY_QUEUE_LEN);
        assert_eq!(events.last(), Some(&KeyEvent::Select));
    }

    #[test]
    fn test_program_drives_heater_bit() {
        let uart = MockUart::default();
        let mut cooker = cooker(&uart, RiceCookerConfig::default());
        cooker.set_program(Some(KeepWarm::started(65, 2).into()));
        assert_eq!(cooker.program_name(), "Keep Warm");

        uart.feed(&status(40, 40, false, 0));
        run(&mut cooker, 100, 500);
        assert!(cooker.heater_on());

        cooker.tick(600);
        let sent = uart.last_sent();
        // Panel on + heater relay, LED1 mirrors the relay
        assert_eq!(sent[2], 0x05);
        assert_eq!(sent[7] & 0x01, 0x01);
    }

    #[test]
    fn test_stale_data_switches_heater_off() {
        let uart = MockUart::default();
        let mut cooker = cooker(&uart, RiceCookerConfig::default());
        cooker.set_program(Some(KeepWarm::started(65, 2).into()));

        uart.feed(&status(40, 40, false, 0));
        run(&mut cooker, 100, 500);
        assert!(cooker.heater_on());

        run(&mut cooker, 600, 15_000);
        assert!(cooker.heater_on());

        run(&mut cooker, 15_100, 15_500);
        assert!(!cooker.heater_on());
    }

    #[test]
    fn test_no_program_keeps_heater_off() {
        let uart = MockUart::default();
        let mut cooker = cooker(&uart, RiceCookerConfig::default());
        assert_eq!(cooker.program_name(), "None");

        uart.feed(&status(20, 20, false, KeyEvent::Start.to_byte()));
        run(&mut cooker, 100, 1_000);
        assert!(!cooker.heater_on());
        assert_eq!(uart.last_sent()[2], 0x01);
    }

    #[test]
    fn test_wifi_led() {
        let uart = MockUart::default();
        let mut cooker = cooker(&uart, RiceCookerConfig::default());
        cooker.set_wifi_led(true);

        run(&mut cooker, 100, 600);
        // LED9 blue is bit 4 of the second LED byte
        assert_eq!(uart.last_sent()[8], 0x10);

        cooker.set_wifi_led(false);
        cooker.tick(700);
        assert_eq!(uart.last_sent()[8], 0x00);
    }
}
