//! Rice cooker panel MCU protocol
//!
//! The rice cooker's front panel (keys, seven-segment display, LEDs) and
//! heater relay are run by a small MCU. The driver talks to it over UART
//! using two fixed-length frame types:
//!
//! ```text
//! MCU → driver (status, 10 bytes)
//! ┌──────┬────────┬─────┬─────┬────────┬───────┬──────────┬────────────┐
//! │ 0xAA │ LENGTH │ KEY │ TOP │ BOTTOM │ FLAGS │ RESERVED │ CRC16 (BE) │
//! └──────┴────────┴─────┴─────┴────────┴───────┴──────────┴────────────┘
//!
//! driver → MCU (control, 11 bytes)
//! ┌──────┬────────┬───────┬──────────────┬────────┬────────┬────────────┐
//! │ 0x55 │ LENGTH │ FLAGS │ DIGITS (4B)  │ LEDS_A │ LEDS_B │ CRC16 (BE) │
//! └──────┴────────┴───────┴──────────────┴────────┴────────┴────────────┘
//! ```
//!
//! Both frames carry a CRC16/XMODEM over everything between the start
//! byte and the CRC itself.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod crc;
pub mod events;
pub mod frame;

pub use command::{ControlFrame, Led, CONTROL_FRAME_LEN, CONTROL_START, RESET_SEQUENCE};
pub use crc::crc16;
pub use events::KeyEvent;
pub use frame::{
    decode, Decoded, FrameError, StatusDecoder, StatusFrame, RX_BUFFER_SIZE, STATUS_FRAME_LEN,
    STATUS_START,
};
