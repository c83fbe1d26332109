//! Control frame encoding for the driver → MCU direction.
//!
//! Frame format (11 bytes):
//! - START (1 byte): 0x55
//! - LENGTH (1 byte): 0x07
//! - FLAGS (1 byte): bit 0 panel on, bit 2 heater relay, bit 4 beep, bit 5 sleep
//! - DIGITS (4 bytes): seven-segment patterns, bit 7 lights the dot
//! - LEDS_A (1 byte): LED1..LED5 in bits 0..4
//! - LEDS_B (1 byte): LED6, LED7, LED8, LED9 orange, LED9 blue in bits 0..4
//! - CRC (2 bytes, big-endian): CRC16/XMODEM over LENGTH..LEDS_B

use crate::crc::crc16;

/// Control frame synchronization byte
pub const CONTROL_START: u8 = 0x55;

/// Complete control frame size
pub const CONTROL_FRAME_LEN: usize = 11;

const CONTROL_BODY_LEN: u8 = 0x07;

const FLAG_PANEL_ON: u8 = 0b0000_0001;
const FLAG_HEATER: u8 = 0b0000_0100;
const FLAG_BEEP: u8 = 0b0001_0000;
const FLAG_SLEEP: u8 = 0b0010_0000;

const SEGMENT_DOT: u8 = 0b1000_0000;

/// Segment patterns for digits 0-9
const SEGMENTS: [u8; 10] = [
    0b0011_1111, // 0
    0b0000_0110, // 1
    0b0101_1011, // 2
    0b0100_1111, // 3
    0b0110_0110, // 4
    0b0110_1101, // 5
    0b0111_1101, // 6
    0b0000_0111, // 7
    0b0111_1111, // 8
    0b0110_1111, // 9
];

/// Panel reset sequence sent once at power-on: blank, beep, beep with all
/// digits lit, everything lit, blank.
pub const RESET_SEQUENCE: [[u8; CONTROL_FRAME_LEN]; 5] = [
    [0x55, 0x07, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC7, 0x18],
    [0x55, 0x07, 0x10, 0x00, 0x00, 0x00, 0x00, 0x1F, 0x1F, 0x00, 0xF0],
    [0x55, 0x07, 0x10, 0xFF, 0xFF, 0xFF, 0xFF, 0x1F, 0x1F, 0x8A, 0x20],
    [0x55, 0x07, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0x1F, 0x1F, 0xBD, 0x5B],
    [0x55, 0x07, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC7, 0x18],
];

/// Panel LEDs addressable through the control frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Led {
    Led1 = 0,
    Led2 = 1,
    Led3 = 2,
    Led4 = 3,
    Led5 = 4,
    Led6 = 5,
    Led7 = 6,
    Led8 = 7,
    Led9Orange = 8,
    Led9Blue = 9,
}

impl Led {
    fn mask(self) -> u16 {
        1 << (self as u8)
    }
}

/// Seven-segment pattern for the last decimal digit of `value`
pub fn seven_segment(value: u8, dot: bool) -> u8 {
    let pattern = SEGMENTS[(value % 10) as usize];
    if dot {
        pattern | SEGMENT_DOT
    } else {
        pattern
    }
}

/// Desired panel state, sent to the MCU every exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlFrame {
    /// Keep the panel powered
    pub panel_on: bool,
    /// Heater relay closed
    pub heater_on: bool,
    /// Sound the buzzer
    pub beep: bool,
    /// Put the panel to sleep
    pub sleep: bool,
    /// Raw segment patterns, left to right
    pub digits: [u8; 4],
    leds: u16,
}

impl Default for ControlFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlFrame {
    /// Panel on, heater off, display blank, all LEDs off
    pub fn new() -> Self {
        Self {
            panel_on: true,
            heater_on: false,
            beep: false,
            sleep: false,
            digits: [0; 4],
            leds: 0,
        }
    }

    /// Light or clear one LED
    pub fn set_led(&mut self, led: Led, on: bool) {
        if on {
            self.leds |= led.mask();
        } else {
            self.leds &= !led.mask();
        }
    }

    /// Check whether an LED is lit
    pub fn led(&self, led: Led) -> bool {
        self.leds & led.mask() != 0
    }

    /// Show two two-digit values, e.g. `HH:MM`
    ///
    /// Values are shown modulo 100. `middle_dots` lights the separator
    /// between the pairs.
    pub fn show_pair(&mut self, left: u8, right: u8, middle_dots: bool) {
        let left = left % 100;
        let right = right % 100;
        self.digits = [
            seven_segment(left / 10, false),
            seven_segment(left % 10, middle_dots),
            seven_segment(right / 10, middle_dots),
            seven_segment(right % 10, false),
        ];
    }

    /// Encode into wire format
    pub fn encode(&self) -> [u8; CONTROL_FRAME_LEN] {
        let mut flags = 0;
        if self.panel_on {
            flags |= FLAG_PANEL_ON;
        }
        if self.heater_on {
            flags |= FLAG_HEATER;
        }
        if self.beep {
            flags |= FLAG_BEEP;
        }
        if self.sleep {
            flags |= FLAG_SLEEP;
        }

        let mut out = [0u8; CONTROL_FRAME_LEN];
        out[0] = CONTROL_START;
        out[1] = CONTROL_BODY_LEN;
        out[2] = flags;
        out[3..7].copy_from_slice(&self.digits);
        out[7] = (self.leds & 0x1F) as u8;
        out[8] = ((self.leds >> 5) & 0x1F) as u8;

        let crc = crc16(&out[1..9]).to_be_bytes();
        out[9] = crc[0];
        out[10] = crc[1];
        out
    }
}
